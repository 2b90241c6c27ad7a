//! Desirability score used to pick one employee among the eligible ones.
//! Rank fit prefers the least senior employee that still qualifies.

use crate::employee::Employee;
use crate::task::Task;
use serde::Serialize;

pub const RANK_EXACT_SCORE: f64 = 50.0;
pub const RANK_CLOSE_SCORE: f64 = 40.0;
pub const RANK_ACCEPTABLE_SCORE: f64 = 20.0;
pub const RANK_OVERQUALIFIED_SCORE: f64 = 10.0;
pub const AVAILABILITY_WEIGHT: f64 = 30.0;
pub const BALANCE_WEIGHT: f64 = 20.0;

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ScoreBreakdown {
    pub rank_fit: f64,
    pub availability: f64,
    pub balance: f64,
}

impl ScoreBreakdown {
    pub fn total(&self) -> f64 {
        self.rank_fit + self.availability + self.balance
    }
}

pub fn rank_fit_score(task: &Task, employee: &Employee) -> f64 {
    let diff = i32::from(employee.rank) - i32::from(task.min_rank);
    match diff {
        0 => RANK_EXACT_SCORE,
        d if d <= 2 => RANK_CLOSE_SCORE,
        d if d <= 4 => RANK_ACCEPTABLE_SCORE,
        _ => RANK_OVERQUALIFIED_SCORE,
    }
}

/// Scores the employee using its hours before this task is committed.
pub fn score_employee(task: &Task, employee: &Employee) -> ScoreBreakdown {
    let (availability, balance) = if employee.max_hours > 0.0 {
        (
            employee.available_hours() / employee.max_hours * AVAILABILITY_WEIGHT,
            (1.0 - employee.current_hours / employee.max_hours) * BALANCE_WEIGHT,
        )
    } else {
        (0.0, 0.0)
    };
    ScoreBreakdown {
        rank_fit: rank_fit_score(task, employee),
        availability,
        balance,
    }
}

/// Highest scoring candidate; the first one encountered wins a tie.
pub fn select_best<'a, I>(task: &Task, candidates: I) -> Option<(usize, ScoreBreakdown)>
where
    I: IntoIterator<Item = (usize, &'a Employee)>,
{
    let mut best: Option<(usize, ScoreBreakdown)> = None;
    for (idx, employee) in candidates {
        let score = score_employee(task, employee);
        match best {
            Some((_, current)) if score.total() <= current.total() => {}
            _ => best = Some((idx, score)),
        }
    }
    best
}
