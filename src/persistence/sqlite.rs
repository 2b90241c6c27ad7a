use super::{PersistenceError, PersistenceResult, ScheduleStore};
use crate::{Employee, Schedule, SchedulePeriod, Task};
use chrono::NaiveDateTime;
use rusqlite::{Connection, OptionalExtension, Transaction, params};
use std::sync::{Mutex, MutexGuard};

pub struct SqliteScheduleStore {
    connection: Mutex<Connection>,
}

impl SqliteScheduleStore {
    pub fn new<P: AsRef<std::path::Path>>(path: P) -> PersistenceResult<Self> {
        let connection = Connection::open(path)?;
        Self::initialize_schema(&connection)?;
        Ok(Self {
            connection: Mutex::new(connection),
        })
    }

    pub fn in_memory() -> PersistenceResult<Self> {
        let connection = Connection::open_in_memory()?;
        Self::initialize_schema(&connection)?;
        Ok(Self {
            connection: Mutex::new(connection),
        })
    }

    fn initialize_schema(connection: &Connection) -> PersistenceResult<()> {
        let ddl = r#"
            CREATE TABLE IF NOT EXISTS schedule_period (
                id INTEGER PRIMARY KEY CHECK (id = 1),
                period_json TEXT NOT NULL,
                created_at TEXT NOT NULL
            );
            CREATE TABLE IF NOT EXISTS employees (
                seq INTEGER PRIMARY KEY,
                id INTEGER NOT NULL UNIQUE,
                employee_json TEXT NOT NULL
            );
            CREATE TABLE IF NOT EXISTS tasks (
                seq INTEGER PRIMARY KEY,
                id INTEGER NOT NULL UNIQUE,
                task_json TEXT NOT NULL
            );
        "#;
        connection.execute_batch(ddl)?;
        Ok(())
    }

    fn lock(&self) -> PersistenceResult<MutexGuard<'_, Connection>> {
        self.connection
            .lock()
            .map_err(|_| PersistenceError::InvalidData("sqlite connection lock poisoned".into()))
    }

    fn save_period(&self, tx: &Transaction, schedule: &Schedule) -> PersistenceResult<()> {
        let json = serde_json::to_string(schedule.period())?;
        let created_at = schedule.created_at().format("%Y-%m-%dT%H:%M:%S%.f").to_string();
        tx.execute("DELETE FROM schedule_period", [])?;
        tx.execute(
            "INSERT INTO schedule_period (id, period_json, created_at) VALUES (1, ?1, ?2)",
            params![json, created_at],
        )?;
        Ok(())
    }

    fn save_employees(&self, tx: &Transaction, employees: &[Employee]) -> PersistenceResult<()> {
        tx.execute("DELETE FROM employees", [])?;
        let mut stmt =
            tx.prepare("INSERT INTO employees (seq, id, employee_json) VALUES (?1, ?2, ?3)")?;
        for (seq, employee) in employees.iter().enumerate() {
            let json = serde_json::to_string(employee)?;
            stmt.execute(params![seq as i64, employee.id, json])?;
        }
        Ok(())
    }

    fn save_tasks(&self, tx: &Transaction, tasks: &[Task]) -> PersistenceResult<()> {
        tx.execute("DELETE FROM tasks", [])?;
        let mut stmt = tx.prepare("INSERT INTO tasks (seq, id, task_json) VALUES (?1, ?2, ?3)")?;
        for (seq, task) in tasks.iter().enumerate() {
            let json = serde_json::to_string(task)?;
            stmt.execute(params![seq as i64, task.id, json])?;
        }
        Ok(())
    }
}

impl ScheduleStore for SqliteScheduleStore {
    fn save_schedule(&self, schedule: &Schedule) -> PersistenceResult<()> {
        super::validate_schedule(schedule)?;
        let mut conn = self.lock()?;
        let tx = conn.transaction()?;
        self.save_period(&tx, schedule)?;
        self.save_employees(&tx, schedule.employees())?;
        self.save_tasks(&tx, schedule.tasks())?;
        tx.commit()?;
        tracing::debug!(
            target: "persistence",
            employees = schedule.employees().len(),
            tasks = schedule.tasks().len(),
            "schedule_saved_to_sqlite"
        );
        Ok(())
    }

    fn load_schedule(&self) -> PersistenceResult<Option<Schedule>> {
        let conn = self.lock()?;

        let mut stmt =
            conn.prepare("SELECT period_json, created_at FROM schedule_period WHERE id = 1")?;
        let header: Option<(String, String)> = stmt
            .query_row([], |row| Ok((row.get(0)?, row.get(1)?)))
            .optional()?;

        let Some((period_json, created_at)) = header else {
            return Ok(None);
        };

        let period: SchedulePeriod = serde_json::from_str(&period_json)?;
        let created_at = NaiveDateTime::parse_from_str(&created_at, "%Y-%m-%dT%H:%M:%S%.f")
            .map_err(|err| {
                PersistenceError::InvalidData(format!("invalid created_at '{created_at}': {err}"))
            })?;

        let mut stmt = conn.prepare("SELECT employee_json FROM employees ORDER BY seq ASC")?;
        let rows = stmt.query_map([], |row| row.get::<_, String>(0))?;
        let mut employees = Vec::new();
        for json in rows {
            let employee: Employee = serde_json::from_str(&json?)?;
            employees.push(employee);
        }

        let mut stmt = conn.prepare("SELECT task_json FROM tasks ORDER BY seq ASC")?;
        let rows = stmt.query_map([], |row| row.get::<_, String>(0))?;
        let mut tasks = Vec::new();
        for json in rows {
            let task: Task = serde_json::from_str(&json?)?;
            tasks.push(task);
        }

        crate::validation::validate_roster(&employees, &tasks)?;
        Ok(Some(Schedule::from_parts(
            employees, tasks, period, created_at,
        )))
    }
}
