use crate::calculations::{AssignmentPass, AssignmentSummary};
use crate::employee::{Employee, EmployeeId};
use crate::period::SchedulePeriod;
use crate::report::{EmployeeWorkloadReport, TaskBrief, UnassignedTaskReport, round2};
use crate::task::{Task, TaskId};
use chrono::{Local, NaiveDateTime};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use thiserror::Error;

/// Fallback reason for unassigned tasks that were never rejected by a pass.
pub const UNKNOWN_REASON: &str = "Unknown";

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ScheduleError {
    #[error("employee {0} already exists")]
    DuplicateEmployee(EmployeeId),
    #[error("task {0} already exists")]
    DuplicateTask(TaskId),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScheduleStatistics {
    pub total_employees: usize,
    pub total_tasks: usize,
    pub assigned_tasks: usize,
    pub unassigned_tasks: usize,
    pub completion_rate: f64,
    pub total_hours_scheduled: f64,
    pub average_hours_per_employee: f64,
    pub is_valid: bool,
}

impl ScheduleStatistics {
    pub fn to_cli_summary(&self) -> String {
        format!(
            "employees={}, tasks={}, assigned={}, unassigned={}, completion={}%, hours={}, valid={}",
            self.total_employees,
            self.total_tasks,
            self.assigned_tasks,
            self.unassigned_tasks,
            self.completion_rate,
            self.total_hours_scheduled,
            self.is_valid
        )
    }
}

/// The roster, the task list and the period for one scheduling run.
///
/// Tasks reference their assignee by id only; the reverse lookup is computed
/// by [`Schedule::employee_tasks`].
#[derive(Debug, Clone)]
pub struct Schedule {
    employees: Vec<Employee>,
    tasks: Vec<Task>,
    period: SchedulePeriod,
    created_at: NaiveDateTime,
    unassigned_reasons: BTreeMap<TaskId, Vec<String>>,
}

impl Default for Schedule {
    fn default() -> Self {
        Self::new(Vec::new(), Vec::new(), SchedulePeriod::current())
    }
}

impl Schedule {
    pub fn new(employees: Vec<Employee>, tasks: Vec<Task>, period: SchedulePeriod) -> Self {
        Self::from_parts(employees, tasks, period, Local::now().naive_local())
    }

    pub(crate) fn from_parts(
        employees: Vec<Employee>,
        tasks: Vec<Task>,
        period: SchedulePeriod,
        created_at: NaiveDateTime,
    ) -> Self {
        Self {
            employees,
            tasks,
            period,
            created_at,
            unassigned_reasons: BTreeMap::new(),
        }
    }

    pub fn employees(&self) -> &[Employee] {
        &self.employees
    }

    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    pub fn period(&self) -> &SchedulePeriod {
        &self.period
    }

    pub fn set_period(&mut self, period: SchedulePeriod) {
        self.period = period;
    }

    pub fn created_at(&self) -> NaiveDateTime {
        self.created_at
    }

    pub fn find_employee(&self, employee_id: EmployeeId) -> Option<&Employee> {
        self.employees.iter().find(|e| e.id == employee_id)
    }

    pub fn find_task(&self, task_id: TaskId) -> Option<&Task> {
        self.tasks.iter().find(|t| t.id == task_id)
    }

    pub fn next_employee_id(&self) -> EmployeeId {
        self.employees.iter().map(|e| e.id).max().map_or(1, |m| m + 1)
    }

    pub fn next_task_id(&self) -> TaskId {
        self.tasks.iter().map(|t| t.id).max().map_or(1, |m| m + 1)
    }

    pub fn add_employee(&mut self, employee: Employee) -> Result<(), ScheduleError> {
        if self.find_employee(employee.id).is_some() {
            return Err(ScheduleError::DuplicateEmployee(employee.id));
        }
        self.employees.push(employee);
        Ok(())
    }

    pub fn add_task(&mut self, task: Task) -> Result<(), ScheduleError> {
        if self.find_task(task.id).is_some() {
            return Err(ScheduleError::DuplicateTask(task.id));
        }
        self.tasks.push(task);
        Ok(())
    }

    /// Removes the employee and unassigns every task linked to it.
    pub fn remove_employee(&mut self, employee_id: EmployeeId) -> Option<Employee> {
        let idx = self.employees.iter().position(|e| e.id == employee_id)?;
        let removed = self.employees.remove(idx);
        for task in self.tasks.iter_mut().filter(|t| t.is_assigned_to(employee_id)) {
            task.unlink();
        }
        Some(removed)
    }

    /// Removes the task and gives its hours back to the assignee.
    pub fn remove_task(&mut self, task_id: TaskId) -> Option<Task> {
        let idx = self.tasks.iter().position(|t| t.id == task_id)?;
        let mut removed = self.tasks.remove(idx);
        if let Some(employee_id) = removed.unlink() {
            if let Some(employee) = self.employees.iter_mut().find(|e| e.id == employee_id) {
                employee.release_hours(removed.duration);
            }
        }
        self.unassigned_reasons.remove(&task_id);
        Some(removed)
    }

    pub fn clear(&mut self) {
        self.employees.clear();
        self.tasks.clear();
        self.unassigned_reasons.clear();
    }

    /// Zeroes every employee's hours and clears every task link and stored
    /// rejection reason. Order and contents are untouched.
    pub fn reset(&mut self) {
        for employee in &mut self.employees {
            employee.reset_hours();
        }
        for task in &mut self.tasks {
            task.unlink();
        }
        self.unassigned_reasons.clear();
    }

    /// Resets, then runs one greedy pass over all tasks.
    pub fn run_assignment_pass(&mut self) -> AssignmentSummary {
        self.reset();
        let summary = AssignmentPass::new(&mut self.employees, &mut self.tasks).execute();
        self.unassigned_reasons = summary.rejected_reasons();
        summary
    }

    /// True when every task ended up assigned.
    pub fn schedule_all(&mut self) -> bool {
        self.run_assignment_pass().all_assigned()
    }

    /// Reasons recorded when the task was rejected, as of that moment.
    pub fn unassigned_reasons(&self, task_id: TaskId) -> Option<&[String]> {
        self.unassigned_reasons.get(&task_id).map(Vec::as_slice)
    }

    pub fn assigned_tasks(&self) -> Vec<&Task> {
        self.tasks.iter().filter(|t| t.is_assigned()).collect()
    }

    pub fn unassigned_tasks(&self) -> Vec<&Task> {
        self.tasks.iter().filter(|t| !t.is_assigned()).collect()
    }

    pub fn employee_tasks(&self, employee_id: EmployeeId) -> Vec<&Task> {
        self.tasks
            .iter()
            .filter(|t| t.is_assigned_to(employee_id))
            .collect()
    }

    pub fn completion_rate(&self) -> f64 {
        if self.tasks.is_empty() {
            return 100.0;
        }
        self.assigned_tasks().len() as f64 / self.tasks.len() as f64 * 100.0
    }

    /// Re-checks hour budgets and every assignment against the current state.
    pub fn is_valid(&self) -> bool {
        if self.employees.iter().any(Employee::is_over_capacity) {
            return false;
        }
        self.tasks.iter().all(|task| match task.assigned_employee {
            None => true,
            Some(employee_id) => self
                .find_employee(employee_id)
                .is_some_and(|employee| task.is_held_by(employee)),
        })
    }

    pub fn statistics(&self) -> ScheduleStatistics {
        let assigned = self.assigned_tasks().len();
        let total_hours: f64 = self.employees.iter().map(|e| e.current_hours).sum();
        let average = if self.employees.is_empty() {
            0.0
        } else {
            round2(total_hours / self.employees.len() as f64)
        };
        ScheduleStatistics {
            total_employees: self.employees.len(),
            total_tasks: self.tasks.len(),
            assigned_tasks: assigned,
            unassigned_tasks: self.tasks.len() - assigned,
            completion_rate: round2(self.completion_rate()),
            total_hours_scheduled: total_hours,
            average_hours_per_employee: average,
            is_valid: self.is_valid(),
        }
    }

    pub fn unassigned_tasks_report(&self) -> Vec<UnassignedTaskReport> {
        self.unassigned_tasks()
            .into_iter()
            .map(|task| UnassignedTaskReport {
                task_id: task.id,
                task_name: task.name.clone(),
                priority: task.priority,
                duration: task.duration,
                required_training: task.required_training.iter().cloned().collect(),
                min_rank: task.min_rank,
                reasons: self
                    .unassigned_reasons
                    .get(&task.id)
                    .cloned()
                    .unwrap_or_else(|| vec![UNKNOWN_REASON.to_string()]),
            })
            .collect()
    }

    /// One entry per employee, most utilized first. Equal utilization keeps
    /// roster order.
    pub fn employee_workload_report(&self) -> Vec<EmployeeWorkloadReport> {
        let mut report: Vec<EmployeeWorkloadReport> = self
            .employees
            .iter()
            .map(|employee| {
                let tasks: Vec<TaskBrief> = self
                    .employee_tasks(employee.id)
                    .into_iter()
                    .map(TaskBrief::from)
                    .collect();
                EmployeeWorkloadReport {
                    employee_id: employee.id,
                    name: employee.name.clone(),
                    position: employee.position.clone(),
                    rank: employee.rank,
                    assigned_hours: employee.current_hours,
                    max_hours: employee.max_hours,
                    available_hours: employee.available_hours(),
                    utilization: round2(employee.utilization()),
                    task_count: tasks.len(),
                    tasks,
                }
            })
            .collect();
        report.sort_by(|a, b| b.utilization.total_cmp(&a.utilization));
        report
    }
}
