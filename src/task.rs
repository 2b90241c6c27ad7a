use crate::employee::{Employee, EmployeeId};
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;

pub type TaskId = i32;

/// A unit of work that needs exactly one employee for the period.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Task {
    pub id: TaskId,
    pub name: String,
    #[serde(default)]
    pub required_training: BTreeSet<String>,
    /// Duration in hours.
    pub duration: f64,
    /// Priority from 1 to 10, higher is scheduled first.
    pub priority: u8,
    #[serde(default = "default_min_rank")]
    pub min_rank: u8,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub deadline: Option<NaiveDateTime>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub assigned_employee: Option<EmployeeId>,
}

fn default_min_rank() -> u8 {
    1
}

impl Task {
    pub fn new<I, S>(
        id: TaskId,
        name: impl Into<String>,
        required_training: I,
        duration: f64,
        priority: u8,
    ) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            id,
            name: name.into(),
            required_training: required_training.into_iter().map(Into::into).collect(),
            duration,
            priority,
            min_rank: default_min_rank(),
            deadline: None,
            assigned_employee: None,
        }
    }

    pub fn with_min_rank(mut self, min_rank: u8) -> Self {
        self.min_rank = min_rank;
        self
    }

    pub fn with_deadline(mut self, deadline: NaiveDateTime) -> Self {
        self.deadline = Some(deadline);
        self
    }

    pub fn is_assigned(&self) -> bool {
        self.assigned_employee.is_some()
    }

    pub fn is_assigned_to(&self, employee_id: EmployeeId) -> bool {
        self.assigned_employee == Some(employee_id)
    }

    /// Skill, capacity and rank check against the employee's current state.
    pub fn can_be_assigned_to(&self, employee: &Employee) -> bool {
        employee.has_training(&self.required_training)
            && employee.can_work_hours(self.duration)
            && employee.rank >= self.min_rank
    }

    /// Re-checks a committed assignment. The assignee's `current_hours`
    /// already include this task, so capacity only requires staying within
    /// `max_hours`.
    pub fn is_held_by(&self, employee: &Employee) -> bool {
        employee.has_training(&self.required_training)
            && employee.rank >= self.min_rank
            && !employee.is_over_capacity()
    }

    /// Every constraint this task violates for the given employee. Empty when
    /// `can_be_assigned_to` holds.
    pub fn unassignment_reasons(&self, employee: &Employee) -> Vec<UnassignmentReason> {
        let mut reasons = Vec::new();
        let missing = employee.missing_training(&self.required_training);
        if !missing.is_empty() {
            reasons.push(UnassignmentReason::MissingTraining(missing));
        }
        if !employee.can_work_hours(self.duration) {
            reasons.push(UnassignmentReason::InsufficientHours {
                available: employee.available_hours(),
                needed: self.duration,
            });
        }
        if employee.rank < self.min_rank {
            reasons.push(UnassignmentReason::RankTooLow {
                rank: employee.rank,
                min_rank: self.min_rank,
            });
        }
        reasons
    }

    pub(crate) fn link(&mut self, employee_id: EmployeeId) {
        self.assigned_employee = Some(employee_id);
    }

    pub(crate) fn unlink(&mut self) -> Option<EmployeeId> {
        self.assigned_employee.take()
    }
}

/// Why a task could not be placed with an employee.
#[derive(Debug, Clone, PartialEq)]
pub enum UnassignmentReason {
    MissingTraining(Vec<String>),
    InsufficientHours { available: f64, needed: f64 },
    RankTooLow { rank: u8, min_rank: u8 },
    NoEmployees,
    /// No employee reported a violation although none was eligible.
    Unknown,
}

impl fmt::Display for UnassignmentReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            UnassignmentReason::MissingTraining(missing) => {
                write!(f, "Missing required training: {}", missing.join(", "))
            }
            UnassignmentReason::InsufficientHours { available, needed } => write!(
                f,
                "Insufficient hours available ({}h available, {}h needed)",
                format_hours(*available),
                format_hours(*needed)
            ),
            UnassignmentReason::RankTooLow { rank, min_rank } => write!(
                f,
                "Rank too low (rank {rank}, minimum {min_rank} required)"
            ),
            UnassignmentReason::NoEmployees => write!(f, "No employees available"),
            UnassignmentReason::Unknown => write!(f, "Unknown reason (this shouldn't happen)"),
        }
    }
}

/// Renders hours with at least one decimal place (`20.0`, `12.5`).
pub fn format_hours(hours: f64) -> String {
    if hours.fract() == 0.0 && hours.is_finite() {
        format!("{hours:.1}")
    } else {
        hours.to_string()
    }
}
