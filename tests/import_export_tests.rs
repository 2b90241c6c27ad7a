use chrono::NaiveDate;
use roster_scheduler::{
    CsvExportKind, Employee, PersistenceError, Schedule, SchedulePeriod, Task,
    export_assignments_csv, export_employees_csv, export_tasks_csv, load_schedule_from_json,
    sample, save_csv_export, save_schedule_to_json, schedule_to_json_string,
};
use std::str::FromStr;
use tempfile::NamedTempFile;

fn d(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn build_sample_schedule() -> Schedule {
    let mut schedule = sample::sample_schedule(SchedulePeriod::two_week(d(2025, 1, 6)));
    let idle = Employee::new(5, "Erin Idle", ["COBOL"], 3, "Maintainer", 20.0);
    schedule.add_employee(idle).unwrap();
    let deadline = d(2025, 1, 10).and_hms_opt(17, 0, 0).unwrap();
    schedule
        .add_task(Task::new(7, "Migrate Mainframe", ["Rust"], 8.0, 2).with_deadline(deadline))
        .unwrap();
    schedule.schedule_all();
    schedule
}

fn csv_lines(bytes: Vec<u8>) -> Vec<String> {
    String::from_utf8(bytes)
        .unwrap()
        .lines()
        .map(str::to_string)
        .collect()
}

#[test]
fn json_round_trip_preserves_assignments() {
    let schedule = build_sample_schedule();
    let file = NamedTempFile::new().unwrap();
    save_schedule_to_json(&schedule, file.path()).expect("save json");

    let loaded = load_schedule_from_json(file.path()).expect("load json");
    assert_eq!(loaded.period(), schedule.period());
    assert_eq!(loaded.created_at(), schedule.created_at());
    assert_eq!(loaded.employees(), schedule.employees());
    assert_eq!(loaded.tasks(), schedule.tasks());
    assert_eq!(loaded.find_task(3).unwrap().assigned_employee, Some(1));
    assert_eq!(
        loaded.find_task(7).unwrap().deadline,
        Some(d(2025, 1, 10).and_hms_opt(17, 0, 0).unwrap())
    );
    assert_eq!(loaded.statistics(), schedule.statistics());
}

#[test]
fn json_string_includes_statistics() {
    let schedule = build_sample_schedule();
    let json = schedule_to_json_string(&schedule).unwrap();
    let value: serde_json::Value = serde_json::from_str(&json).unwrap();
    assert_eq!(value["statistics"]["total_tasks"], 7);
    assert_eq!(value["statistics"]["assigned_tasks"], 6);
    assert_eq!(value["period"]["start"], "2025-01-06");
    assert_eq!(value["employees"].as_array().unwrap().len(), 5);
}

#[test]
fn loading_dangling_link_is_rejected() {
    let schedule = build_sample_schedule();
    let json = schedule_to_json_string(&schedule).unwrap();
    let mut value: serde_json::Value = serde_json::from_str(&json).unwrap();
    value["tasks"][0]["assigned_employee"] = serde_json::json!(42);

    let file = NamedTempFile::new().unwrap();
    std::fs::write(file.path(), serde_json::to_vec(&value).unwrap()).unwrap();
    let err = load_schedule_from_json(file.path()).unwrap_err();
    assert!(matches!(err, PersistenceError::InvalidData(_)), "{err}");
}

#[test]
fn employees_csv_has_header_and_rows() {
    let schedule = build_sample_schedule();
    let mut buffer = Vec::new();
    export_employees_csv(&schedule, &mut buffer).unwrap();
    let lines = csv_lines(buffer);
    assert_eq!(
        lines[0],
        "ID,Name,Position,Rank,Training,Max Hours,Assigned Hours,Available Hours"
    );
    assert_eq!(lines.len(), 6);
    assert!(lines[1].starts_with("1,Alice Johnson,Senior Software Engineer,8,"));
}

#[test]
fn tasks_csv_marks_status() {
    let schedule = build_sample_schedule();
    let mut buffer = Vec::new();
    export_tasks_csv(&schedule, &mut buffer).unwrap();
    let lines = csv_lines(buffer);
    assert_eq!(
        lines[0],
        "ID,Name,Duration (hrs),Priority,Min Rank,Required Training,Assigned To,Status"
    );
    let migrate = lines.iter().find(|l| l.starts_with("7,")).unwrap();
    assert!(migrate.ends_with(",Unassigned,Unassigned"));
    let pipeline = lines.iter().find(|l| l.starts_with("3,")).unwrap();
    assert!(pipeline.ends_with(",Alice Johnson,Assigned"));
}

#[test]
fn assignments_csv_has_placeholder_for_idle_employee() {
    let schedule = build_sample_schedule();
    let mut buffer = Vec::new();
    export_assignments_csv(&schedule, &mut buffer).unwrap();
    let lines = csv_lines(buffer);
    assert_eq!(
        lines[0],
        "Employee ID,Employee Name,Position,Rank,Task ID,Task Name,Duration (hrs),Priority"
    );
    let idle = lines.iter().find(|l| l.starts_with("5,")).unwrap();
    assert!(idle.contains(",N/A,No tasks assigned,"));
    assert!(idle.ends_with(",N/A"));
    // Six assignments plus one placeholder.
    assert_eq!(lines.len(), 8);
}

#[test]
fn csv_export_to_file_by_kind() {
    let schedule = build_sample_schedule();
    let file = NamedTempFile::new().unwrap();
    let kind = CsvExportKind::from_str("tasks").unwrap();
    save_csv_export(&schedule, kind, file.path()).unwrap();
    let content = std::fs::read_to_string(file.path()).unwrap();
    assert!(content.starts_with("ID,Name,Duration (hrs)"));

    assert_eq!(
        CsvExportKind::from_str("anything").unwrap(),
        CsvExportKind::Schedule
    );
}
