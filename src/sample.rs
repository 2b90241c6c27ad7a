//! A small engineering team and backlog, handy for demos and smoke tests.

use crate::{Employee, Schedule, SchedulePeriod, Task};

pub fn sample_employees() -> Vec<Employee> {
    vec![
        Employee::new(
            1,
            "Alice Johnson",
            ["Python", "JavaScript", "Database", "Leadership"],
            8,
            "Senior Software Engineer",
            80.0,
        ),
        Employee::new(
            2,
            "Bob Smith",
            ["Python", "Database", "Testing"],
            5,
            "Software Engineer",
            80.0,
        ),
        Employee::new(
            3,
            "Carol Williams",
            ["JavaScript", "HTML", "CSS", "Design"],
            6,
            "Frontend Developer",
            60.0,
        ),
        Employee::new(
            4,
            "David Brown",
            ["Python", "Machine Learning", "Database"],
            7,
            "Data Scientist",
            70.0,
        ),
    ]
}

pub fn sample_tasks() -> Vec<Task> {
    vec![
        Task::new(1, "Build User Authentication API", ["Python", "Database"], 20.0, 9)
            .with_min_rank(5),
        Task::new(2, "Design Dashboard UI", ["JavaScript", "HTML", "CSS"], 15.0, 8)
            .with_min_rank(4),
        Task::new(3, "Implement Data Pipeline", ["Python", "Database"], 25.0, 10)
            .with_min_rank(6),
        Task::new(4, "Write Unit Tests", ["Python", "Testing"], 12.0, 7).with_min_rank(4),
        Task::new(5, "Deploy ML Model", ["Python", "Machine Learning"], 18.0, 9)
            .with_min_rank(7),
        Task::new(6, "Code Review Process", ["Leadership", "Python"], 10.0, 6)
            .with_min_rank(7),
    ]
}

pub fn sample_schedule(period: SchedulePeriod) -> Schedule {
    Schedule::new(sample_employees(), sample_tasks(), period)
}
