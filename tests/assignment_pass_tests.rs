use chrono::NaiveDate;
use roster_scheduler::calculations::{collect_unassignment_reasons, priority_order};
use roster_scheduler::{Decision, Employee, Schedule, SchedulePeriod, Task, sample};

fn period() -> SchedulePeriod {
    SchedulePeriod::two_week(NaiveDate::from_ymd_opt(2025, 3, 3).unwrap())
}

fn deadline(y: i32, m: u32, d: u32) -> chrono::NaiveDateTime {
    NaiveDate::from_ymd_opt(y, m, d)
        .unwrap()
        .and_hms_opt(0, 0, 0)
        .unwrap()
}

fn hours_of(schedule: &Schedule, employee_id: i32) -> f64 {
    schedule.find_employee(employee_id).unwrap().current_hours
}

fn assignee_of(schedule: &Schedule, task_id: i32) -> Option<i32> {
    schedule.find_task(task_id).unwrap().assigned_employee
}

#[test]
fn demo_team_is_fully_assigned() {
    let mut schedule = sample::sample_schedule(period());
    assert!(schedule.schedule_all());

    assert_eq!(assignee_of(&schedule, 3), Some(1));
    assert_eq!(assignee_of(&schedule, 1), Some(2));
    assert_eq!(assignee_of(&schedule, 5), Some(4));
    assert_eq!(assignee_of(&schedule, 2), Some(3));
    assert_eq!(assignee_of(&schedule, 4), Some(2));
    assert_eq!(assignee_of(&schedule, 6), Some(1));

    assert_eq!(hours_of(&schedule, 1), 35.0);
    assert_eq!(hours_of(&schedule, 2), 32.0);
    assert_eq!(hours_of(&schedule, 3), 15.0);
    assert_eq!(hours_of(&schedule, 4), 18.0);

    let stats = schedule.statistics();
    assert_eq!(stats.completion_rate, 100.0);
    assert_eq!(stats.total_hours_scheduled, 100.0);
    assert_eq!(stats.average_hours_per_employee, 25.0);
    assert!(stats.is_valid);
}

#[test]
fn demo_processing_order_follows_priority() {
    let mut schedule = sample::sample_schedule(period());
    let summary = schedule.run_assignment_pass();
    // Tasks 1 and 5 share priority 9 and keep insertion order.
    assert_eq!(summary.order, vec![3, 1, 5, 2, 4, 6]);
    assert_eq!(summary.assigned_count, 6);
    assert_eq!(summary.unassigned_count, 0);
    assert_eq!(summary.to_cli_summary(), "tasks=6, assigned=6, unassigned=0");
}

#[test]
fn repeated_runs_produce_identical_results() {
    let mut schedule = sample::sample_schedule(period());
    schedule.schedule_all();
    let first: Vec<_> = schedule.tasks().to_vec();
    let first_hours: Vec<f64> = schedule.employees().iter().map(|e| e.current_hours).collect();

    schedule.schedule_all();
    assert_eq!(schedule.tasks(), first.as_slice());
    let second_hours: Vec<f64> = schedule.employees().iter().map(|e| e.current_hours).collect();
    assert_eq!(first_hours, second_hours);
}

#[test]
fn committed_hours_never_exceed_capacity() {
    let employees = vec![
        Employee::new(1, "A", ["Ops"], 5, "Operator", 10.0),
        Employee::new(2, "B", ["Ops"], 5, "Operator", 8.0),
    ];
    let tasks = (1..=6)
        .map(|id| Task::new(id, format!("Shift {id}"), ["Ops"], 4.0, 5))
        .collect();
    let mut schedule = Schedule::new(employees, tasks, period());
    schedule.schedule_all();

    for employee in schedule.employees() {
        assert!(employee.current_hours <= employee.max_hours);
        let linked: f64 = schedule
            .employee_tasks(employee.id)
            .iter()
            .map(|t| t.duration)
            .sum();
        assert_eq!(linked, employee.current_hours);
    }
    // 10h fits two 4h shifts, 8h fits two.
    assert_eq!(schedule.assigned_tasks().len(), 4);
    assert!(schedule.is_valid());
}

#[test]
fn employee_filled_to_exact_budget_stays_valid() {
    let employees = vec![Employee::new(1, "Full", ["Ops"], 5, "Operator", 10.0)];
    let tasks = vec![
        Task::new(1, "Morning", ["Ops"], 5.0, 5),
        Task::new(2, "Evening", ["Ops"], 5.0, 5),
    ];
    let mut schedule = Schedule::new(employees, tasks, period());
    assert!(schedule.schedule_all());
    assert_eq!(hours_of(&schedule, 1), 10.0);
    assert!(schedule.is_valid());
    assert!(schedule.statistics().is_valid);
}

#[test]
fn assignment_that_lost_its_skill_is_invalid() {
    let mut task = Task::new(1, "Weld", ["Welding"], 4.0, 5);
    task.assigned_employee = Some(1);
    let employees = vec![Employee::new(1, "Clerk", ["Filing"], 5, "Clerk", 10.0)];
    let schedule = Schedule::new(employees, vec![task], period());
    assert!(!schedule.is_valid());
}

#[test]
fn single_task_goes_to_exact_rank_match() {
    let employees = vec![
        Employee::new(1, "Senior", ["Python", "Database"], 8, "Senior Engineer", 80.0),
        Employee::new(2, "Mid", ["Python", "Database"], 5, "Engineer", 80.0),
    ];
    let tasks = vec![Task::new(1, "API", ["Python", "Database"], 20.0, 9).with_min_rank(5)];
    let mut schedule = Schedule::new(employees, tasks, period());
    assert!(schedule.schedule_all());

    assert_eq!(assignee_of(&schedule, 1), Some(2));
    assert_eq!(hours_of(&schedule, 2), 20.0);
    assert_eq!(hours_of(&schedule, 1), 0.0);
    assert_eq!(schedule.completion_rate(), 100.0);
    assert!(schedule.is_valid());
}

#[test]
fn higher_priority_task_claims_the_only_slot() {
    let employees = vec![Employee::new(1, "Solo", ["Rust"], 5, "Engineer", 10.0)];
    let tasks = vec![
        Task::new(1, "Low", ["Rust"], 10.0, 2),
        Task::new(2, "High", ["Rust"], 10.0, 9),
    ];
    let mut schedule = Schedule::new(employees, tasks, period());
    assert!(!schedule.schedule_all());

    assert_eq!(assignee_of(&schedule, 2), Some(1));
    assert_eq!(assignee_of(&schedule, 1), None);
    assert_eq!(
        schedule.unassigned_reasons(1).unwrap(),
        ["Insufficient hours available (0.0h available, 10.0h needed)"]
    );
}

#[test]
fn closer_rank_fit_wins_over_overqualified_employee() {
    let employees = vec![
        Employee::new(1, "Veteran", ["Rust"], 10, "Principal", 40.0),
        Employee::new(2, "Mid", ["Rust"], 5, "Engineer", 40.0),
    ];
    let tasks = vec![Task::new(1, "Feature", ["Rust"], 8.0, 5).with_min_rank(5)];
    let mut schedule = Schedule::new(employees, tasks, period());
    assert!(schedule.schedule_all());
    assert_eq!(assignee_of(&schedule, 1), Some(2));
}

#[test]
fn equal_scores_go_to_first_employee_in_roster_order() {
    let employees = vec![
        Employee::new(7, "First", ["Rust"], 5, "Engineer", 40.0),
        Employee::new(3, "Second", ["Rust"], 5, "Engineer", 40.0),
    ];
    let tasks = vec![Task::new(1, "Feature", ["Rust"], 8.0, 5).with_min_rank(5)];
    let mut schedule = Schedule::new(employees, tasks, period());
    let summary = schedule.run_assignment_pass();
    match &summary.decisions[0] {
        Decision::Assigned {
            employee_id, score, ..
        } => {
            assert_eq!(*employee_id, 7);
            assert_eq!(score.total(), 100.0);
        }
        other => panic!("expected assignment, got {other:?}"),
    }
}

#[test]
fn load_balance_prefers_less_loaded_employee() {
    let employees = vec![
        Employee::new(1, "A", ["Ops"], 5, "Operator", 40.0),
        Employee::new(2, "B", ["Ops"], 5, "Operator", 40.0),
    ];
    let tasks = vec![
        Task::new(1, "First", ["Ops"], 10.0, 9),
        Task::new(2, "Second", ["Ops"], 10.0, 8),
    ];
    let mut schedule = Schedule::new(employees, tasks, period());
    schedule.schedule_all();
    assert_eq!(assignee_of(&schedule, 1), Some(1));
    assert_eq!(assignee_of(&schedule, 2), Some(2));
}

#[test]
fn missing_skill_is_reported() {
    let employees = vec![Employee::new(1, "Py", ["Python"], 5, "Engineer", 40.0)];
    let tasks = vec![Task::new(1, "Port", ["Rust"], 4.0, 5)];
    let mut schedule = Schedule::new(employees, tasks, period());
    assert!(!schedule.schedule_all());
    assert_eq!(
        schedule.unassigned_reasons(1).unwrap(),
        ["Missing required training: Rust"]
    );
}

#[test]
fn rank_reason_lists_rank_and_minimum() {
    let employees = vec![Employee::new(1, "Junior", ["Rust"], 3, "Engineer", 40.0)];
    let tasks = vec![Task::new(1, "Design", ["Rust"], 4.0, 5).with_min_rank(6)];
    let mut schedule = Schedule::new(employees, tasks, period());
    schedule.schedule_all();
    assert_eq!(
        schedule.unassigned_reasons(1).unwrap(),
        ["Rank too low (rank 3, minimum 6 required)"]
    );
}

#[test]
fn reasons_are_deduplicated_across_employees() {
    let employees = vec![
        Employee::new(1, "A", ["Python"], 2, "Engineer", 40.0),
        Employee::new(2, "B", ["Python"], 2, "Engineer", 40.0),
    ];
    let task = Task::new(1, "Port", ["Rust"], 4.0, 5).with_min_rank(4);
    let reasons = collect_unassignment_reasons(&task, &employees);
    assert_eq!(
        reasons,
        vec![
            "Missing required training: Rust".to_string(),
            "Rank too low (rank 2, minimum 4 required)".to_string(),
        ]
    );
}

#[test]
fn empty_roster_reports_no_employees() {
    let tasks = vec![Task::new(1, "Orphan", ["Rust"], 4.0, 5)];
    let mut schedule = Schedule::new(Vec::new(), tasks, period());
    assert!(!schedule.schedule_all());
    assert_eq!(
        schedule.unassigned_reasons(1).unwrap(),
        ["No employees available"]
    );
}

#[test]
fn empty_task_list_is_complete() {
    let employees = sample::sample_employees();
    let mut schedule = Schedule::new(employees, Vec::new(), period());
    assert!(schedule.schedule_all());
    assert_eq!(schedule.completion_rate(), 100.0);
    assert!(schedule.employees().iter().all(|e| e.current_hours == 0.0));
}

#[test]
fn zero_capacity_employee_does_not_break_the_pass() {
    let employees = vec![
        Employee::new(1, "Off", Vec::<String>::new(), 5, "Engineer", 0.0),
        Employee::new(2, "On", Vec::<String>::new(), 5, "Engineer", 20.0),
    ];
    let tasks = vec![
        Task::new(1, "Anything", Vec::<String>::new(), 5.0, 5),
        Task::new(2, "Free", Vec::<String>::new(), 0.0, 5),
    ];
    let mut schedule = Schedule::new(employees, tasks, period());
    assert!(schedule.schedule_all());
    assert_eq!(assignee_of(&schedule, 1), Some(2));
    // A zero-hour task fits the zero-capacity employee; both score 50 on rank
    // but the employee with headroom wins on the ratio terms.
    assert_eq!(assignee_of(&schedule, 2), Some(2));
}

#[test]
fn earlier_deadline_breaks_priority_ties() {
    let tasks = vec![
        Task::new(1, "No deadline", ["Ops"], 1.0, 5),
        Task::new(2, "Late", ["Ops"], 1.0, 5).with_deadline(deadline(2025, 3, 14)),
        Task::new(3, "Early", ["Ops"], 1.0, 5).with_deadline(deadline(2025, 3, 5)),
        Task::new(4, "Urgent", ["Ops"], 1.0, 8),
    ];
    let order: Vec<i32> = priority_order(&tasks)
        .into_iter()
        .map(|idx| tasks[idx].id)
        .collect();
    assert_eq!(order, vec![4, 3, 2, 1]);
}

#[test]
fn end_to_end_mixed_outcome() {
    let employees = vec![
        Employee::new(1, "Lead", ["Rust", "Review"], 8, "Lead Engineer", 20.0),
        Employee::new(2, "Dev", ["Rust"], 4, "Engineer", 20.0),
    ];
    let tasks = vec![
        Task::new(1, "Review", ["Review"], 15.0, 9).with_min_rank(7),
        Task::new(2, "Build", ["Rust"], 15.0, 7).with_min_rank(3),
        Task::new(3, "Hotfix", ["Rust"], 10.0, 5).with_min_rank(3),
    ];
    let mut schedule = Schedule::new(employees, tasks, period());
    let summary = schedule.run_assignment_pass();

    assert_eq!(summary.assigned_count, 2);
    assert_eq!(assignee_of(&schedule, 1), Some(1));
    assert_eq!(assignee_of(&schedule, 2), Some(2));
    assert_eq!(assignee_of(&schedule, 3), None);

    let rejected = summary.rejected_reasons();
    assert_eq!(
        rejected[&3],
        vec![
            "Insufficient hours available (5.0h available, 10.0h needed)".to_string()
        ]
    );
    let stats = schedule.statistics();
    assert_eq!(stats.completion_rate, 66.67);
    assert_eq!(stats.unassigned_tasks, 1);
}
