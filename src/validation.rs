//! Input checks applied before entities reach the engine. The engine itself
//! assumes validated entities.

use crate::employee::{Employee, EmployeeId};
use crate::task::{Task, TaskId};
use std::collections::{BTreeSet, HashSet};
use thiserror::Error;

pub const MIN_RANK: u8 = 1;
pub const MAX_RANK: u8 = 10;
pub const MIN_PRIORITY: u8 = 1;
pub const MAX_PRIORITY: u8 = 10;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum ValidationError {
    #[error("employee {id} requires a non-empty {field}")]
    EmptyEmployeeField { id: EmployeeId, field: &'static str },
    #[error("employee {id} has rank {rank} (must be between 1 and 10)")]
    EmployeeRank { id: EmployeeId, rank: u8 },
    #[error("employee {id} has invalid max_hours {hours} (must be positive)")]
    MaxHours { id: EmployeeId, hours: f64 },
    #[error("employee {id} has invalid current_hours {hours}")]
    CurrentHours { id: EmployeeId, hours: f64 },
    #[error("task {id} requires a non-empty name")]
    EmptyTaskName { id: TaskId },
    #[error("task {id} has priority {priority} (must be between 1 and 10)")]
    Priority { id: TaskId, priority: u8 },
    #[error("task {id} has min_rank {min_rank} (must be between 1 and 10)")]
    TaskMinRank { id: TaskId, min_rank: u8 },
    #[error("task {id} has invalid duration {duration} (must be positive)")]
    Duration { id: TaskId, duration: f64 },
    #[error("duplicate employee id {0}")]
    DuplicateEmployee(EmployeeId),
    #[error("duplicate task id {0}")]
    DuplicateTask(TaskId),
    #[error("task {task_id} is assigned to unknown employee {employee_id}")]
    DanglingAssignment {
        task_id: TaskId,
        employee_id: EmployeeId,
    },
}

pub fn validate_rank(rank: u8) -> bool {
    (MIN_RANK..=MAX_RANK).contains(&rank)
}

pub fn validate_priority(priority: u8) -> bool {
    (MIN_PRIORITY..=MAX_PRIORITY).contains(&priority)
}

pub fn validate_hours(hours: f64) -> bool {
    hours.is_finite() && hours > 0.0
}

pub fn validate_employee(employee: &Employee) -> Result<(), ValidationError> {
    if employee.name.trim().is_empty() {
        return Err(ValidationError::EmptyEmployeeField {
            id: employee.id,
            field: "name",
        });
    }
    if employee.position.trim().is_empty() {
        return Err(ValidationError::EmptyEmployeeField {
            id: employee.id,
            field: "position",
        });
    }
    if !validate_rank(employee.rank) {
        return Err(ValidationError::EmployeeRank {
            id: employee.id,
            rank: employee.rank,
        });
    }
    if !validate_hours(employee.max_hours) {
        return Err(ValidationError::MaxHours {
            id: employee.id,
            hours: employee.max_hours,
        });
    }
    if !employee.current_hours.is_finite() || employee.current_hours < 0.0 {
        return Err(ValidationError::CurrentHours {
            id: employee.id,
            hours: employee.current_hours,
        });
    }
    Ok(())
}

pub fn validate_task(task: &Task) -> Result<(), ValidationError> {
    if task.name.trim().is_empty() {
        return Err(ValidationError::EmptyTaskName { id: task.id });
    }
    if !validate_priority(task.priority) {
        return Err(ValidationError::Priority {
            id: task.id,
            priority: task.priority,
        });
    }
    if !validate_rank(task.min_rank) {
        return Err(ValidationError::TaskMinRank {
            id: task.id,
            min_rank: task.min_rank,
        });
    }
    if !validate_hours(task.duration) {
        return Err(ValidationError::Duration {
            id: task.id,
            duration: task.duration,
        });
    }
    Ok(())
}

/// Validates both collections together: unique ids, valid entities, and task
/// links that point at a rostered employee.
pub fn validate_roster(employees: &[Employee], tasks: &[Task]) -> Result<(), ValidationError> {
    let mut employee_ids = HashSet::with_capacity(employees.len());
    for employee in employees {
        if !employee_ids.insert(employee.id) {
            return Err(ValidationError::DuplicateEmployee(employee.id));
        }
        validate_employee(employee)?;
    }

    let mut task_ids = HashSet::with_capacity(tasks.len());
    for task in tasks {
        if !task_ids.insert(task.id) {
            return Err(ValidationError::DuplicateTask(task.id));
        }
        validate_task(task)?;
        if let Some(employee_id) = task.assigned_employee {
            if !employee_ids.contains(&employee_id) {
                return Err(ValidationError::DanglingAssignment {
                    task_id: task.id,
                    employee_id,
                });
            }
        }
    }
    Ok(())
}

/// Splits a comma separated skill list, trimming entries and dropping blanks.
pub fn parse_training_list(input: &str) -> BTreeSet<String> {
    input
        .split(',')
        .map(str::trim)
        .filter(|item| !item.is_empty())
        .map(ToOwned::to_owned)
        .collect()
}

pub fn format_training_list(training: &BTreeSet<String>) -> String {
    training.iter().map(String::as_str).collect::<Vec<_>>().join(", ")
}
