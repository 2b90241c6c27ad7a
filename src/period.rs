use chrono::{Duration, Local, NaiveDate};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Number of days covered by a scheduling period.
pub const PERIOD_DAYS: i64 = 14;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PeriodError {
    #[error("period start date {start} must be on or before period end date {end}")]
    StartAfterEnd { start: NaiveDate, end: NaiveDate },
}

/// The two-week window a schedule describes. Descriptive only; the
/// assignment engine never reads it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SchedulePeriod {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl Default for SchedulePeriod {
    fn default() -> Self {
        Self::current()
    }
}

impl SchedulePeriod {
    pub fn new(start: NaiveDate, end: NaiveDate) -> Result<Self, PeriodError> {
        if start > end {
            return Err(PeriodError::StartAfterEnd { start, end });
        }
        Ok(Self { start, end })
    }

    /// Fourteen days starting at `start` (inclusive), so `end = start + 13`.
    pub fn two_week(start: NaiveDate) -> Self {
        Self {
            start,
            end: start + Duration::days(PERIOD_DAYS - 1),
        }
    }

    pub fn current() -> Self {
        Self::two_week(Local::now().date_naive())
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start <= date && date <= self.end
    }

    pub fn days(&self) -> i64 {
        (self.end - self.start).num_days() + 1
    }

    pub fn description(&self) -> String {
        format!(
            "{} to {}",
            self.start.format("%Y-%m-%d"),
            self.end.format("%Y-%m-%d")
        )
    }
}
