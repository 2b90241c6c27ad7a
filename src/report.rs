//! Read-only views over a [`Schedule`]: report records for collaborators and
//! the plain-text report renderer.

use crate::employee::EmployeeId;
use crate::schedule::Schedule;
use crate::task::{Task, TaskId};
use crate::validation::format_training_list;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

const RULE_WIDTH: usize = 80;

pub(crate) fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UnassignedTaskReport {
    pub task_id: TaskId,
    pub task_name: String,
    pub priority: u8,
    pub duration: f64,
    pub required_training: Vec<String>,
    pub min_rank: u8,
    pub reasons: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TaskBrief {
    pub id: TaskId,
    pub name: String,
    pub duration: f64,
}

impl From<&Task> for TaskBrief {
    fn from(task: &Task) -> Self {
        Self {
            id: task.id,
            name: task.name.clone(),
            duration: task.duration,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EmployeeWorkloadReport {
    pub employee_id: EmployeeId,
    pub name: String,
    pub position: String,
    pub rank: u8,
    pub assigned_hours: f64,
    pub max_hours: f64,
    pub available_hours: f64,
    pub utilization: f64,
    pub task_count: usize,
    pub tasks: Vec<TaskBrief>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReportKind {
    Summary,
    Employees,
    Tasks,
    Full,
}

impl ReportKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ReportKind::Summary => "summary",
            ReportKind::Employees => "employees",
            ReportKind::Tasks => "tasks",
            ReportKind::Full => "full",
        }
    }

    pub fn file_name(&self) -> &'static str {
        match self {
            ReportKind::Summary => "summary.txt",
            ReportKind::Employees => "employee_report.txt",
            ReportKind::Tasks => "task_report.txt",
            ReportKind::Full => "full_report.txt",
        }
    }
}

impl fmt::Display for ReportKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ReportKind {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "summary" => Ok(ReportKind::Summary),
            "employees" => Ok(ReportKind::Employees),
            "tasks" => Ok(ReportKind::Tasks),
            "full" => Ok(ReportKind::Full),
            other => Err(format!("unknown report kind '{other}'")),
        }
    }
}

/// Renders fixed-width text reports.
pub struct ReportGenerator<'a> {
    schedule: &'a Schedule,
}

impl<'a> ReportGenerator<'a> {
    pub fn new(schedule: &'a Schedule) -> Self {
        Self { schedule }
    }

    pub fn render(&self, kind: ReportKind) -> String {
        match kind {
            ReportKind::Summary => self.summary(),
            ReportKind::Employees => self.employee_report(),
            ReportKind::Tasks => self.task_report(),
            ReportKind::Full => self.full_report(),
        }
    }

    pub fn summary(&self) -> String {
        let stats = self.schedule.statistics();
        let mut lines = header("SCHEDULE SUMMARY REPORT");
        lines.push(format!("Period: {}", self.schedule.period().description()));
        lines.push(format!(
            "Generated: {}",
            self.schedule.created_at().format("%Y-%m-%d")
        ));
        lines.push(String::new());
        lines.push("STATISTICS".to_string());
        lines.push("-".repeat(RULE_WIDTH));
        lines.push(format!("Total Employees:     {}", stats.total_employees));
        lines.push(format!("Total Tasks:         {}", stats.total_tasks));
        lines.push(format!("Assigned Tasks:      {}", stats.assigned_tasks));
        lines.push(format!("Unassigned Tasks:    {}", stats.unassigned_tasks));
        lines.push(format!("Completion Rate:     {}%", stats.completion_rate));
        lines.push(format!("Total Hours:         {}", stats.total_hours_scheduled));
        lines.push(format!(
            "Avg Hours/Employee:  {}",
            stats.average_hours_per_employee
        ));
        lines.push(format!(
            "Valid Schedule:      {}",
            if stats.is_valid { "Yes" } else { "No" }
        ));
        lines.push(String::new());
        lines.join("\n")
    }

    pub fn employee_report(&self) -> String {
        let mut lines = header("EMPLOYEE WORKLOAD REPORT");
        lines.push(String::new());
        for entry in self.schedule.employee_workload_report() {
            lines.push(format!("Employee: {}", entry.name));
            lines.push(format!("Position: {} (Rank {})", entry.position, entry.rank));
            lines.push(format!(
                "Hours: {}/{} ({}% utilized)",
                entry.assigned_hours, entry.max_hours, entry.utilization
            ));
            lines.push(format!("Available: {} hours", entry.available_hours));
            lines.push(format!("Tasks Assigned: {}", entry.task_count));
            if entry.tasks.is_empty() {
                lines.push("  No tasks assigned".to_string());
            } else {
                lines.push("  Tasks:".to_string());
                for task in &entry.tasks {
                    lines.push(format!("    - {} ({}h)", task.name, task.duration));
                }
            }
            lines.push("-".repeat(RULE_WIDTH));
        }
        lines.join("\n")
    }

    pub fn task_report(&self) -> String {
        let mut lines = header("TASK ASSIGNMENT REPORT");
        lines.push(String::new());
        lines.push("ASSIGNED TASKS".to_string());
        lines.push("-".repeat(RULE_WIDTH));
        for task in self.schedule.assigned_tasks() {
            lines.push(format!("Task: {} (ID: {})", task.name, task.id));
            lines.push(task_detail_line(task.duration, task.priority, task.min_rank));
            lines.push(format!(
                "  Required Training: {}",
                format_training_list(&task.required_training)
            ));
            if let Some(employee) = task
                .assigned_employee
                .and_then(|id| self.schedule.find_employee(id))
            {
                lines.push(format!(
                    "  Assigned To: {} ({})",
                    employee.name, employee.position
                ));
            }
            lines.push(String::new());
        }

        let unassigned = self.schedule.unassigned_tasks_report();
        if !unassigned.is_empty() {
            lines.push(String::new());
            lines.push("UNASSIGNED TASKS".to_string());
            lines.push("-".repeat(RULE_WIDTH));
            for entry in unassigned {
                lines.push(format!("Task: {} (ID: {})", entry.task_name, entry.task_id));
                lines.push(task_detail_line(entry.duration, entry.priority, entry.min_rank));
                lines.push(format!(
                    "  Required Training: {}",
                    entry.required_training.join(", ")
                ));
                lines.push("  Reasons for non-assignment:".to_string());
                for reason in &entry.reasons {
                    lines.push(format!("    - {reason}"));
                }
                lines.push(String::new());
            }
        }
        lines.join("\n")
    }

    pub fn full_report(&self) -> String {
        [self.summary(), self.employee_report(), self.task_report()].join("\n\n")
    }
}

fn header(title: &str) -> Vec<String> {
    vec!["=".repeat(RULE_WIDTH), title.to_string(), "=".repeat(RULE_WIDTH)]
}

fn task_detail_line(duration: f64, priority: u8, min_rank: u8) -> String {
    format!("  Duration: {duration}h | Priority: {priority}/10 | Min Rank: {min_rank}")
}
