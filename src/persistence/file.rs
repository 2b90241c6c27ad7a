use super::{PersistenceError, PersistenceResult};
use crate::schedule::ScheduleStatistics;
use crate::validation::format_training_list;
use crate::{Employee, Schedule, SchedulePeriod, Task};
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs::File;
use std::io::Write;
use std::path::Path;
use std::str::FromStr;

#[derive(Serialize, Deserialize)]
struct ScheduleSnapshot {
    period: SchedulePeriod,
    created_at: NaiveDateTime,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    statistics: Option<ScheduleStatistics>,
    employees: Vec<Employee>,
    tasks: Vec<Task>,
}

impl ScheduleSnapshot {
    fn from_schedule(schedule: &Schedule, with_statistics: bool) -> PersistenceResult<Self> {
        super::validate_schedule(schedule)?;
        Ok(Self {
            period: *schedule.period(),
            created_at: schedule.created_at(),
            statistics: with_statistics.then(|| schedule.statistics()),
            employees: schedule.employees().to_vec(),
            tasks: schedule.tasks().to_vec(),
        })
    }

    fn into_schedule(self) -> PersistenceResult<Schedule> {
        crate::validation::validate_roster(&self.employees, &self.tasks)?;
        if self.period.start > self.period.end {
            return Err(PersistenceError::InvalidData(format!(
                "period start {} is after period end {}",
                self.period.start, self.period.end
            )));
        }
        Ok(Schedule::from_parts(
            self.employees,
            self.tasks,
            self.period,
            self.created_at,
        ))
    }
}

/// Pretty JSON of the whole schedule, statistics block included.
pub fn schedule_to_json_string(schedule: &Schedule) -> PersistenceResult<String> {
    let snapshot = ScheduleSnapshot::from_schedule(schedule, true)?;
    Ok(serde_json::to_string_pretty(&snapshot)?)
}

pub fn save_schedule_to_json<P: AsRef<Path>>(
    schedule: &Schedule,
    path: P,
) -> PersistenceResult<()> {
    let snapshot = ScheduleSnapshot::from_schedule(schedule, true)?;
    let file = File::create(path)?;
    serde_json::to_writer_pretty(file, &snapshot)?;
    Ok(())
}

pub fn load_schedule_from_json<P: AsRef<Path>>(path: P) -> PersistenceResult<Schedule> {
    let file = File::open(path)?;
    let snapshot: ScheduleSnapshot = serde_json::from_reader(file)?;
    snapshot.into_schedule()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CsvExportKind {
    Employees,
    Tasks,
    Schedule,
}

impl CsvExportKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            CsvExportKind::Employees => "employees",
            CsvExportKind::Tasks => "tasks",
            CsvExportKind::Schedule => "schedule",
        }
    }

    pub fn file_name(&self) -> &'static str {
        match self {
            CsvExportKind::Employees => "employees.csv",
            CsvExportKind::Tasks => "tasks.csv",
            CsvExportKind::Schedule => "schedule.csv",
        }
    }
}

impl fmt::Display for CsvExportKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CsvExportKind {
    type Err = PersistenceError;

    /// Anything other than `employees` or `tasks` selects the assignment export.
    fn from_str(value: &str) -> Result<Self, Self::Err> {
        Ok(match value.trim().to_ascii_lowercase().as_str() {
            "employees" => CsvExportKind::Employees,
            "tasks" => CsvExportKind::Tasks,
            _ => CsvExportKind::Schedule,
        })
    }
}

#[derive(Serialize)]
struct EmployeeCsvRecord<'a> {
    #[serde(rename = "ID")]
    id: i32,
    #[serde(rename = "Name")]
    name: &'a str,
    #[serde(rename = "Position")]
    position: &'a str,
    #[serde(rename = "Rank")]
    rank: u8,
    #[serde(rename = "Training")]
    training: String,
    #[serde(rename = "Max Hours")]
    max_hours: f64,
    #[serde(rename = "Assigned Hours")]
    assigned_hours: f64,
    #[serde(rename = "Available Hours")]
    available_hours: f64,
}

impl<'a> From<&'a Employee> for EmployeeCsvRecord<'a> {
    fn from(employee: &'a Employee) -> Self {
        Self {
            id: employee.id,
            name: &employee.name,
            position: &employee.position,
            rank: employee.rank,
            training: format_training_list(&employee.training),
            max_hours: employee.max_hours,
            assigned_hours: employee.current_hours,
            available_hours: employee.available_hours(),
        }
    }
}

#[derive(Serialize)]
struct TaskCsvRecord<'a> {
    #[serde(rename = "ID")]
    id: i32,
    #[serde(rename = "Name")]
    name: &'a str,
    #[serde(rename = "Duration (hrs)")]
    duration: f64,
    #[serde(rename = "Priority")]
    priority: u8,
    #[serde(rename = "Min Rank")]
    min_rank: u8,
    #[serde(rename = "Required Training")]
    required_training: String,
    #[serde(rename = "Assigned To")]
    assigned_to: &'a str,
    #[serde(rename = "Status")]
    status: &'static str,
}

#[derive(Serialize)]
struct AssignmentCsvRecord<'a> {
    #[serde(rename = "Employee ID")]
    employee_id: i32,
    #[serde(rename = "Employee Name")]
    employee_name: &'a str,
    #[serde(rename = "Position")]
    position: &'a str,
    #[serde(rename = "Rank")]
    rank: u8,
    #[serde(rename = "Task ID")]
    task_id: String,
    #[serde(rename = "Task Name")]
    task_name: &'a str,
    #[serde(rename = "Duration (hrs)")]
    duration: f64,
    #[serde(rename = "Priority")]
    priority: String,
}

pub fn export_employees_csv<W: Write>(schedule: &Schedule, writer: W) -> PersistenceResult<()> {
    let mut writer = csv::Writer::from_writer(writer);
    for employee in schedule.employees() {
        writer.serialize(EmployeeCsvRecord::from(employee))?;
    }
    writer.flush()?;
    Ok(())
}

pub fn export_tasks_csv<W: Write>(schedule: &Schedule, writer: W) -> PersistenceResult<()> {
    let mut writer = csv::Writer::from_writer(writer);
    for task in schedule.tasks() {
        let assignee = task
            .assigned_employee
            .and_then(|id| schedule.find_employee(id));
        writer.serialize(TaskCsvRecord {
            id: task.id,
            name: &task.name,
            duration: task.duration,
            priority: task.priority,
            min_rank: task.min_rank,
            required_training: format_training_list(&task.required_training),
            assigned_to: assignee.map_or("Unassigned", |e| e.name.as_str()),
            status: if task.is_assigned() {
                "Assigned"
            } else {
                "Unassigned"
            },
        })?;
    }
    writer.flush()?;
    Ok(())
}

/// One row per (employee, task) pair; employees without work get a
/// placeholder row.
pub fn export_assignments_csv<W: Write>(schedule: &Schedule, writer: W) -> PersistenceResult<()> {
    let mut writer = csv::Writer::from_writer(writer);
    for employee in schedule.employees() {
        let tasks = schedule.employee_tasks(employee.id);
        if tasks.is_empty() {
            writer.serialize(AssignmentCsvRecord {
                employee_id: employee.id,
                employee_name: &employee.name,
                position: &employee.position,
                rank: employee.rank,
                task_id: "N/A".to_string(),
                task_name: "No tasks assigned",
                duration: 0.0,
                priority: "N/A".to_string(),
            })?;
            continue;
        }
        for task in tasks {
            writer.serialize(AssignmentCsvRecord {
                employee_id: employee.id,
                employee_name: &employee.name,
                position: &employee.position,
                rank: employee.rank,
                task_id: task.id.to_string(),
                task_name: &task.name,
                duration: task.duration,
                priority: task.priority.to_string(),
            })?;
        }
    }
    writer.flush()?;
    Ok(())
}

pub fn export_csv<W: Write>(
    schedule: &Schedule,
    kind: CsvExportKind,
    writer: W,
) -> PersistenceResult<()> {
    match kind {
        CsvExportKind::Employees => export_employees_csv(schedule, writer),
        CsvExportKind::Tasks => export_tasks_csv(schedule, writer),
        CsvExportKind::Schedule => export_assignments_csv(schedule, writer),
    }
}

pub fn save_csv_export<P: AsRef<Path>>(
    schedule: &Schedule,
    kind: CsvExportKind,
    path: P,
) -> PersistenceResult<()> {
    let file = File::create(path)?;
    export_csv(schedule, kind, file)
}
