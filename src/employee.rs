use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

pub type EmployeeId = i32;

/// A member of the roster with the skills, seniority and hour budget used by
/// the assignment engine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Employee {
    pub id: EmployeeId,
    pub name: String,
    /// Training and skill tags held by the employee.
    #[serde(default)]
    pub training: BTreeSet<String>,
    /// Seniority from 1 to 10, higher is more senior.
    pub rank: u8,
    pub position: String,
    /// Maximum committed hours for the two-week period.
    pub max_hours: f64,
    /// Hours committed so far in the current pass.
    #[serde(default)]
    pub current_hours: f64,
}

impl Employee {
    pub fn new<I, S>(
        id: EmployeeId,
        name: impl Into<String>,
        training: I,
        rank: u8,
        position: impl Into<String>,
        max_hours: f64,
    ) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            id,
            name: name.into(),
            training: training.into_iter().map(Into::into).collect(),
            rank,
            position: position.into(),
            max_hours,
            current_hours: 0.0,
        }
    }

    pub fn has_training(&self, required: &BTreeSet<String>) -> bool {
        required.is_subset(&self.training)
    }

    /// Required tags the employee lacks, in sorted order.
    pub fn missing_training(&self, required: &BTreeSet<String>) -> Vec<String> {
        required.difference(&self.training).cloned().collect()
    }

    pub fn can_work_hours(&self, hours: f64) -> bool {
        self.current_hours + hours <= self.max_hours
    }

    pub fn assign_hours(&mut self, hours: f64) {
        self.current_hours += hours;
    }

    pub fn release_hours(&mut self, hours: f64) {
        self.current_hours = (self.current_hours - hours).max(0.0);
    }

    pub fn reset_hours(&mut self) {
        self.current_hours = 0.0;
    }

    pub fn available_hours(&self) -> f64 {
        (self.max_hours - self.current_hours).max(0.0)
    }

    /// Committed hours as a percentage of `max_hours`; 0 when the budget is 0.
    pub fn utilization(&self) -> f64 {
        if self.max_hours > 0.0 {
            self.current_hours / self.max_hours * 100.0
        } else {
            0.0
        }
    }

    pub fn is_over_capacity(&self) -> bool {
        self.current_hours > self.max_hours
    }
}
