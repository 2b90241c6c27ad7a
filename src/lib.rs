pub mod calculations;
pub mod config;
pub mod employee;
#[cfg(feature = "http_api")]
pub mod http_api;
pub mod logging;
pub mod period;
pub mod persistence;
pub mod report;
pub mod sample;
pub mod schedule;
pub mod task;
pub mod validation;

pub use calculations::{AssignmentSummary, Decision, ScoreBreakdown};
pub use config::AppConfig;
pub use employee::{Employee, EmployeeId};
pub use period::{PeriodError, SchedulePeriod};
#[cfg(feature = "sqlite")]
pub use persistence::sqlite::SqliteScheduleStore;
pub use persistence::{
    CsvExportKind, PersistenceError, ScheduleStore, export_assignments_csv, export_csv,
    export_employees_csv, export_tasks_csv, load_schedule_from_json, save_csv_export,
    save_schedule_to_json, schedule_to_json_string, validate_schedule,
};
pub use report::{
    EmployeeWorkloadReport, ReportGenerator, ReportKind, TaskBrief, UnassignedTaskReport,
};
pub use schedule::{Schedule, ScheduleError, ScheduleStatistics};
pub use task::{Task, TaskId, UnassignmentReason};
pub use validation::ValidationError;
