use crate::calculations::ordering::priority_order;
use crate::calculations::scoring::{ScoreBreakdown, select_best};
use crate::employee::{Employee, EmployeeId};
use crate::task::{Task, TaskId, UnassignmentReason};
use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet};

/// Outcome of one task in a pass.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum Decision {
    Assigned {
        task_id: TaskId,
        employee_id: EmployeeId,
        score: ScoreBreakdown,
    },
    Rejected {
        task_id: TaskId,
        reasons: Vec<String>,
    },
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct AssignmentSummary {
    /// Task ids in the order they were processed.
    pub order: Vec<TaskId>,
    pub decisions: Vec<Decision>,
    pub assigned_count: usize,
    pub unassigned_count: usize,
}

impl AssignmentSummary {
    pub fn all_assigned(&self) -> bool {
        self.unassigned_count == 0
    }

    pub fn rejected_reasons(&self) -> BTreeMap<TaskId, Vec<String>> {
        self.decisions
            .iter()
            .filter_map(|decision| match decision {
                Decision::Rejected { task_id, reasons } => Some((*task_id, reasons.clone())),
                Decision::Assigned { .. } => None,
            })
            .collect()
    }

    pub fn to_cli_summary(&self) -> String {
        format!(
            "tasks={}, assigned={}, unassigned={}",
            self.order.len(),
            self.assigned_count,
            self.unassigned_count
        )
    }
}

/// Greedy single pass over tasks in dispatch order. Each decision is final
/// for the pass and later tasks see the hours committed by earlier ones.
///
/// Expects employees and tasks to be reset; `Schedule::run_assignment_pass`
/// takes care of that.
pub struct AssignmentPass<'a> {
    employees: &'a mut [Employee],
    tasks: &'a mut [Task],
}

impl<'a> AssignmentPass<'a> {
    pub fn new(employees: &'a mut [Employee], tasks: &'a mut [Task]) -> Self {
        Self { employees, tasks }
    }

    pub fn execute(self) -> AssignmentSummary {
        let order = priority_order(&*self.tasks);
        let mut summary = AssignmentSummary {
            order: order.iter().map(|&idx| self.tasks[idx].id).collect(),
            decisions: Vec::with_capacity(order.len()),
            ..AssignmentSummary::default()
        };

        for task_idx in order {
            let task = &self.tasks[task_idx];
            let eligible = self
                .employees
                .iter()
                .enumerate()
                .filter(|(_, employee)| task.can_be_assigned_to(employee));

            match select_best(task, eligible) {
                Some((employee_idx, score)) => {
                    let employee = &mut self.employees[employee_idx];
                    employee.assign_hours(task.duration);
                    tracing::debug!(
                        target: "scheduler",
                        task_id = task.id,
                        employee_id = employee.id,
                        score = score.total(),
                        committed_hours = employee.current_hours,
                        "task_assigned"
                    );
                    summary.decisions.push(Decision::Assigned {
                        task_id: task.id,
                        employee_id: employee.id,
                        score,
                    });
                    let employee_id = employee.id;
                    self.tasks[task_idx].link(employee_id);
                    summary.assigned_count += 1;
                }
                None => {
                    let reasons = collect_unassignment_reasons(task, &*self.employees);
                    tracing::debug!(
                        target: "scheduler",
                        task_id = task.id,
                        reasons = ?reasons,
                        "task_rejected"
                    );
                    summary.decisions.push(Decision::Rejected {
                        task_id: task.id,
                        reasons,
                    });
                    summary.unassigned_count += 1;
                }
            }
        }

        tracing::info!(
            target: "scheduler",
            tasks = summary.order.len(),
            assigned = summary.assigned_count,
            unassigned = summary.unassigned_count,
            "assignment_pass_completed"
        );
        summary
    }
}

/// Re-tests `task` against every employee and returns each distinct violation,
/// sorted for stable output.
pub fn collect_unassignment_reasons(task: &Task, employees: &[Employee]) -> Vec<String> {
    if employees.is_empty() {
        return vec![UnassignmentReason::NoEmployees.to_string()];
    }

    let reasons: BTreeSet<String> = employees
        .iter()
        .flat_map(|employee| task.unassignment_reasons(employee))
        .map(|reason| reason.to_string())
        .collect();

    if reasons.is_empty() {
        tracing::warn!(
            target: "scheduler",
            task_id = task.id,
            "unassigned task has no violated constraint"
        );
        return vec![UnassignmentReason::Unknown.to_string()];
    }
    reasons.into_iter().collect()
}
