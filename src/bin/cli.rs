use anyhow::Result;
use chrono::NaiveDate;
use roster_scheduler::validation::{self, format_training_list, parse_training_list};
use roster_scheduler::{
    AppConfig, CsvExportKind, Employee, ReportGenerator, ReportKind, Schedule, SchedulePeriod,
    Task, load_schedule_from_json, logging, sample, save_csv_export, save_schedule_to_json,
};
use std::fs;
use std::io::{self, Write};
use std::str::FromStr;

fn render_row(widths: &[usize], cells: &[&str]) -> String {
    let mut line = String::from("|");
    for (cell, width) in cells.iter().zip(widths) {
        line.push(' ');
        line.push_str(cell);
        line.push_str(&" ".repeat(width.saturating_sub(cell.len())));
        line.push_str(" |");
    }
    line
}

fn render_text_table(headers: &[&str], rows: &[Vec<String>]) -> String {
    let mut widths: Vec<usize> = headers.iter().map(|h| h.len()).collect();
    for row in rows {
        for (ci, cell) in row.iter().enumerate() {
            if cell.len() > widths[ci] {
                widths[ci] = cell.len();
            }
        }
    }

    let mut sep = String::from("+");
    for w in &widths {
        sep.push_str(&"-".repeat(*w + 2));
        sep.push('+');
    }

    let mut out = String::new();
    out.push_str(&sep);
    out.push('\n');
    out.push_str(&render_row(&widths, headers));
    out.push('\n');
    out.push_str(&sep);
    out.push('\n');
    for row in rows {
        let cells: Vec<&str> = row.iter().map(String::as_str).collect();
        out.push_str(&render_row(&widths, &cells));
        out.push('\n');
    }
    out.push_str(&sep);
    out.push('\n');
    out
}

fn render_employees(schedule: &Schedule) -> String {
    let rows: Vec<Vec<String>> = schedule
        .employees()
        .iter()
        .map(|e| {
            vec![
                e.id.to_string(),
                e.name.clone(),
                e.position.clone(),
                e.rank.to_string(),
                format_training_list(&e.training),
                format!("{}/{}", e.current_hours, e.max_hours),
            ]
        })
        .collect();
    render_text_table(
        &["id", "name", "position", "rank", "training", "hours"],
        &rows,
    )
}

fn render_tasks(schedule: &Schedule) -> String {
    let rows: Vec<Vec<String>> = schedule
        .tasks()
        .iter()
        .map(|t| {
            let assignee = t
                .assigned_employee
                .and_then(|id| schedule.find_employee(id))
                .map(|e| e.name.clone())
                .unwrap_or_else(|| "Unassigned".to_string());
            vec![
                t.id.to_string(),
                t.name.clone(),
                t.duration.to_string(),
                t.priority.to_string(),
                t.min_rank.to_string(),
                format_training_list(&t.required_training),
                t.deadline.map(|d| d.to_string()).unwrap_or_default(),
                assignee,
            ]
        })
        .collect();
    render_text_table(
        &[
            "id", "name", "duration", "priority", "min_rank", "training", "deadline", "assigned",
        ],
        &rows,
    )
}

fn print_help() {
    println!(
        "Commands:\n  help                               Show this help\n  show                               Show employees and tasks\n  employee add <name>; <position>; <rank>; <max_hours>; <training_csv>\n                                     Add an employee\n  employee list                      List employees\n  employee delete <id>               Delete an employee and unassign its tasks\n  task add <name>; <duration>; <priority>; <min_rank>; <training_csv>[; <YYYY-MM-DD>]\n                                     Add a task with optional deadline\n  task list                          List tasks\n  task delete <id>                   Delete a task\n  period <YYYY-MM-DD>                Start a two-week period on the given date\n  generate                           Run the assignment pass\n  reset                              Clear all assignments and hours\n  stats                              Show schedule statistics\n  unassigned                         Show unassigned tasks with reasons\n  report <summary|employees|tasks|full>\n                                     Print a text report\n  export json <path>                 Write the schedule as JSON\n  export csv <employees|tasks|schedule> <path>\n                                     Write a CSV export\n  export report <kind> <path>        Write a text report\n  save [path]                        Persist the schedule (JSON file, or the configured SQLite store)\n  load [path]                        Load a schedule (JSON file, or the configured SQLite store)\n  demo                               Load the sample team and backlog\n  clear                              Remove all employees and tasks\n  quit|exit                          Exit"
    );
}

fn split_fields(rest: &str) -> Vec<&str> {
    rest.split(';').map(str::trim).collect()
}

fn parse_employee(id: i32, rest: &str) -> Result<Employee, String> {
    let fields = split_fields(rest);
    let [name, position, rank, max_hours, training] = fields.as_slice() else {
        return Err(
            "Usage: employee add <name>; <position>; <rank>; <max_hours>; <training_csv>".into(),
        );
    };
    let rank: u8 = rank.parse().map_err(|_| "Rank must be a number!".to_string())?;
    let max_hours: f64 = max_hours
        .parse()
        .map_err(|_| "Hours must be a number!".to_string())?;
    let employee = Employee::new(
        id,
        *name,
        parse_training_list(training),
        rank,
        *position,
        max_hours,
    );
    validation::validate_employee(&employee).map_err(|e| e.to_string())?;
    Ok(employee)
}

fn parse_task(id: i32, rest: &str) -> Result<Task, String> {
    let fields = split_fields(rest);
    let (name, duration, priority, min_rank, training, deadline) = match fields.as_slice() {
        [n, d, p, r, t] => (*n, *d, *p, *r, *t, None),
        [n, d, p, r, t, dl] => (*n, *d, *p, *r, *t, Some(*dl)),
        _ => {
            return Err(
                "Usage: task add <name>; <duration>; <priority>; <min_rank>; <training_csv>[; <YYYY-MM-DD>]"
                    .into(),
            );
        }
    };
    let duration: f64 = duration
        .parse()
        .map_err(|_| "Duration must be a number!".to_string())?;
    let priority: u8 = priority
        .parse()
        .map_err(|_| "Priority must be a number!".to_string())?;
    let min_rank: u8 = min_rank
        .parse()
        .map_err(|_| "Min rank must be a number!".to_string())?;
    let mut task = Task::new(id, name, parse_training_list(training), duration, priority)
        .with_min_rank(min_rank);
    if let Some(deadline) = deadline.filter(|d| !d.is_empty()) {
        let date = NaiveDate::parse_from_str(deadline, "%Y-%m-%d")
            .map_err(|_| "Invalid deadline (YYYY-MM-DD)".to_string())?;
        task.deadline = date.and_hms_opt(0, 0, 0);
    }
    validation::validate_task(&task).map_err(|e| e.to_string())?;
    Ok(task)
}

fn print_unassigned(schedule: &Schedule) {
    let report = schedule.unassigned_tasks_report();
    if report.is_empty() {
        println!("All tasks are assigned.");
        return;
    }
    for entry in report {
        println!("Task {} ({}):", entry.task_id, entry.task_name);
        for reason in entry.reasons {
            println!("  - {reason}");
        }
    }
}

#[cfg(feature = "sqlite")]
mod store {
    use anyhow::{Context, Result, bail};
    use roster_scheduler::{AppConfig, Schedule, ScheduleStore, SqliteScheduleStore};

    fn open(config: &AppConfig) -> Result<SqliteScheduleStore> {
        let Some(path) = config.storage.sqlite_path.as_ref() else {
            bail!("no [storage] sqlite_path configured");
        };
        SqliteScheduleStore::new(path).with_context(|| format!("open {}", path.display()))
    }

    pub fn save(config: &AppConfig, schedule: &Schedule) -> Result<()> {
        open(config)?.save_schedule(schedule)?;
        Ok(())
    }

    pub fn load(config: &AppConfig) -> Result<Option<Schedule>> {
        Ok(open(config)?.load_schedule()?)
    }
}

#[cfg(not(feature = "sqlite"))]
mod store {
    use anyhow::{Result, bail};
    use roster_scheduler::{AppConfig, Schedule};

    pub fn save(_config: &AppConfig, _schedule: &Schedule) -> Result<()> {
        bail!("built without the `sqlite` feature")
    }

    pub fn load(_config: &AppConfig) -> Result<Option<Schedule>> {
        bail!("built without the `sqlite` feature")
    }
}

fn main() -> Result<()> {
    let config = AppConfig::load()?;
    logging::init_tracing(&config.logging.filter)?;

    let mut schedule = Schedule::new(Vec::new(), Vec::new(), config.schedule_period());

    println!("Roster Scheduler (CLI) - type 'help' for commands\n");

    let stdin = io::stdin();
    let mut line = String::new();
    loop {
        print!("> ");
        io::stdout().flush()?;
        line.clear();
        match stdin.read_line(&mut line) {
            Ok(0) | Err(_) => break,
            Ok(_) => {}
        }
        let input = line.trim();
        if input.is_empty() {
            continue;
        }

        let (cmd, rest) = input.split_once(' ').unwrap_or((input, ""));
        let rest = rest.trim();

        match cmd {
            "help" => print_help(),
            "quit" | "exit" => break,
            "show" => {
                println!("Period: {}", schedule.period().description());
                println!("{}", render_employees(&schedule));
                println!("{}", render_tasks(&schedule));
            }
            "employee" => {
                let (sub, args) = rest.split_once(' ').unwrap_or((rest, ""));
                match sub {
                    "add" => match parse_employee(schedule.next_employee_id(), args) {
                        Ok(employee) => {
                            let (id, name) = (employee.id, employee.name.clone());
                            match schedule.add_employee(employee) {
                                Ok(()) => println!("Employee '{name}' added (ID: {id})."),
                                Err(e) => println!("Error: {e}"),
                            }
                        }
                        Err(e) => println!("Error: {e}"),
                    },
                    "list" => println!("{}", render_employees(&schedule)),
                    "delete" => match args.trim().parse::<i32>() {
                        Ok(id) => match schedule.remove_employee(id) {
                            Some(e) => println!("Deleted employee {id} ({}).", e.name),
                            None => println!("Employee {id} not found."),
                        },
                        Err(_) => println!("Usage: employee delete <id>"),
                    },
                    _ => println!("Usage: employee <add|list|delete> ..."),
                }
            }
            "task" => {
                let (sub, args) = rest.split_once(' ').unwrap_or((rest, ""));
                match sub {
                    "add" => match parse_task(schedule.next_task_id(), args) {
                        Ok(task) => {
                            let (id, name) = (task.id, task.name.clone());
                            match schedule.add_task(task) {
                                Ok(()) => println!("Task '{name}' added (ID: {id})."),
                                Err(e) => println!("Error: {e}"),
                            }
                        }
                        Err(e) => println!("Error: {e}"),
                    },
                    "list" => println!("{}", render_tasks(&schedule)),
                    "delete" => match args.trim().parse::<i32>() {
                        Ok(id) => match schedule.remove_task(id) {
                            Some(_) => println!("Deleted task {id}."),
                            None => println!("Task {id} not found."),
                        },
                        Err(_) => println!("Usage: task delete <id>"),
                    },
                    _ => println!("Usage: task <add|list|delete> ..."),
                }
            }
            "period" => match NaiveDate::parse_from_str(rest, "%Y-%m-%d") {
                Ok(start) => {
                    schedule.set_period(SchedulePeriod::two_week(start));
                    println!("Period set to {}.", schedule.period().description());
                }
                Err(_) => println!("Usage: period <YYYY-MM-DD>"),
            },
            "generate" => {
                if schedule.tasks().is_empty() || schedule.employees().is_empty() {
                    println!("Add at least one employee and one task first.");
                    continue;
                }
                let summary = schedule.run_assignment_pass();
                println!("Schedule generated ({})", summary.to_cli_summary());
                if !summary.all_assigned() {
                    print_unassigned(&schedule);
                }
            }
            "reset" => {
                schedule.reset();
                println!("All assignments cleared.");
            }
            "stats" => println!("{}", schedule.statistics().to_cli_summary()),
            "unassigned" => print_unassigned(&schedule),
            "report" => match ReportKind::from_str(if rest.is_empty() { "full" } else { rest }) {
                Ok(kind) => println!("{}", ReportGenerator::new(&schedule).render(kind)),
                Err(e) => println!("Error: {e}"),
            },
            "export" => {
                let parts: Vec<&str> = rest.split_whitespace().collect();
                match parts.as_slice() {
                    ["json", path] => match save_schedule_to_json(&schedule, path) {
                        Ok(()) => println!("Exported JSON: {path}"),
                        Err(e) => println!("Export error: {e}"),
                    },
                    ["csv", kind, path] => {
                        let result = CsvExportKind::from_str(kind)
                            .and_then(|kind| save_csv_export(&schedule, kind, path));
                        match result {
                            Ok(()) => println!("Exported CSV ({kind}): {path}"),
                            Err(e) => println!("Export error: {e}"),
                        }
                    }
                    ["report", kind, path] => match ReportKind::from_str(kind) {
                        Ok(kind) => {
                            let content = ReportGenerator::new(&schedule).render(kind);
                            match fs::write(path, content) {
                                Ok(()) => println!("Exported text report: {path}"),
                                Err(e) => println!("Export error: {e}"),
                            }
                        }
                        Err(e) => println!("Error: {e}"),
                    },
                    _ => println!(
                        "Usage: export json <path> | export csv <kind> <path> | export report <kind> <path>"
                    ),
                }
            }
            "save" if rest.is_empty() => match store::save(&config, &schedule) {
                Ok(()) => println!("Schedule saved to the configured store."),
                Err(e) => println!("Save error: {e}"),
            },
            "save" => match save_schedule_to_json(&schedule, rest) {
                Ok(()) => println!("Schedule saved to {rest}"),
                Err(e) => println!("Save error: {e}"),
            },
            "load" if rest.is_empty() => match store::load(&config) {
                Ok(Some(loaded)) => {
                    schedule = loaded;
                    println!("Schedule loaded from the configured store.");
                }
                Ok(None) => println!("No schedule stored yet."),
                Err(e) => println!("Load error: {e}"),
            },
            "load" => match load_schedule_from_json(rest) {
                Ok(loaded) => {
                    schedule = loaded;
                    println!("Schedule loaded from {rest}");
                }
                Err(e) => println!("Load error: {e}"),
            },
            "demo" => {
                schedule = sample::sample_schedule(*schedule.period());
                println!(
                    "Loaded {} employees and {} tasks.",
                    schedule.employees().len(),
                    schedule.tasks().len()
                );
            }
            "clear" => {
                schedule.clear();
                println!("All data cleared.");
            }
            _ => println!("Unknown command. Type 'help'."),
        }
    }
    Ok(())
}
