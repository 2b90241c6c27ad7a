use std::{net::SocketAddr, str::FromStr, sync::Arc};

use axum::{
    Json, Router,
    extract::{Path, State},
    http::{StatusCode, header},
    response::{IntoResponse, Response},
    routing::{get, post},
};
use chrono::NaiveDateTime;
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::persistence::{self, CsvExportKind, PersistenceError};
use crate::validation::{self, ValidationError};
use crate::{
    AssignmentSummary, Employee, EmployeeWorkloadReport, ReportGenerator, ReportKind, Schedule,
    ScheduleError, ScheduleStatistics, Task, UnassignedTaskReport,
};

#[derive(Clone)]
pub struct AppState {
    schedule: Arc<RwLock<Schedule>>,
}

impl AppState {
    pub fn new(schedule: Schedule) -> Self {
        Self {
            schedule: Arc::new(RwLock::new(schedule)),
        }
    }

    pub fn with_shared(schedule: Arc<RwLock<Schedule>>) -> Self {
        Self { schedule }
    }

    fn schedule(&self) -> Arc<RwLock<Schedule>> {
        self.schedule.clone()
    }
}

#[derive(Debug, Serialize)]
struct ErrorBody<'a> {
    error: &'a str,
    message: String,
}

#[derive(Debug)]
enum ApiError {
    NotFound(String),
    Conflict(String),
    Invalid(String),
    Internal(String),
}

impl ApiError {
    fn not_found(message: impl Into<String>) -> Self {
        ApiError::NotFound(message.into())
    }

    fn invalid(message: impl Into<String>) -> Self {
        ApiError::Invalid(message.into())
    }

    fn internal(message: impl Into<String>) -> Self {
        ApiError::Internal(message.into())
    }
}

impl From<ValidationError> for ApiError {
    fn from(value: ValidationError) -> Self {
        ApiError::Invalid(value.to_string())
    }
}

impl From<ScheduleError> for ApiError {
    fn from(value: ScheduleError) -> Self {
        ApiError::Conflict(value.to_string())
    }
}

impl From<PersistenceError> for ApiError {
    fn from(value: PersistenceError) -> Self {
        match value {
            PersistenceError::InvalidData(message) => ApiError::Invalid(message),
            other => ApiError::Internal(other.to_string()),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, error, message) = match self {
            ApiError::NotFound(message) => (StatusCode::NOT_FOUND, "not_found", message),
            ApiError::Conflict(message) => (StatusCode::CONFLICT, "conflict", message),
            ApiError::Invalid(message) => (StatusCode::BAD_REQUEST, "invalid_request", message),
            ApiError::Internal(message) => {
                tracing::warn!(target: "http_api", message = %message, "internal_error");
                (StatusCode::INTERNAL_SERVER_ERROR, "internal_error", message)
            }
        };
        (status, Json(ErrorBody { error, message })).into_response()
    }
}

/// Employee as submitted by a client. The id is allocated when absent.
#[derive(Debug, Deserialize)]
pub struct EmployeePayload {
    #[serde(default)]
    pub id: Option<i32>,
    pub name: String,
    #[serde(default)]
    pub training: Vec<String>,
    pub rank: u8,
    pub position: String,
    pub max_hours: f64,
}

#[derive(Debug, Deserialize)]
pub struct TaskPayload {
    #[serde(default)]
    pub id: Option<i32>,
    pub name: String,
    #[serde(default)]
    pub required_training: Vec<String>,
    pub duration: f64,
    #[serde(default = "default_priority")]
    pub priority: u8,
    #[serde(default = "default_min_rank")]
    pub min_rank: u8,
    #[serde(default)]
    pub deadline: Option<NaiveDateTime>,
}

fn default_priority() -> u8 {
    5
}

fn default_min_rank() -> u8 {
    1
}

#[derive(Debug, Serialize)]
struct GenerateResponse {
    all_assigned: bool,
    summary: AssignmentSummary,
    statistics: ScheduleStatistics,
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/employees", get(list_employees).post(create_employee))
        .route("/employees/:id", get(get_employee).delete(delete_employee))
        .route("/tasks", get(list_tasks).post(create_task))
        .route("/tasks/:id", get(get_task).delete(delete_task))
        .route("/schedule", get(export_schedule_json))
        .route("/schedule/generate", post(generate_schedule))
        .route("/schedule/reset", post(reset_schedule))
        .route("/statistics", get(get_statistics))
        .route("/reports/unassigned", get(unassigned_report))
        .route("/reports/workload", get(workload_report))
        .route("/export/csv/:kind", get(export_csv))
        .route("/export/report/:kind", get(export_report))
        .route("/data/clear", post(clear_data))
        .with_state(state)
}

pub async fn serve(addr: SocketAddr, schedule: Schedule) -> std::io::Result<()> {
    let state = AppState::new(schedule);
    let app = router(state);
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await
}

async fn health() -> impl IntoResponse {
    Json(json!({ "status": "ok" }))
}

async fn list_employees(State(state): State<AppState>) -> Json<Vec<Employee>> {
    let schedule = state.schedule();
    let employees = schedule.read().employees().to_vec();
    Json(employees)
}

async fn get_employee(
    State(state): State<AppState>,
    Path(employee_id): Path<i32>,
) -> Result<Json<Employee>, ApiError> {
    let schedule = state.schedule();
    let found = schedule.read().find_employee(employee_id).cloned();
    found
        .map(Json)
        .ok_or_else(|| ApiError::not_found(format!("employee {employee_id} not found")))
}

async fn create_employee(
    State(state): State<AppState>,
    Json(payload): Json<EmployeePayload>,
) -> Result<(StatusCode, Json<Employee>), ApiError> {
    let schedule = state.schedule();
    let mut guard = schedule.write();
    let id = payload.id.unwrap_or_else(|| guard.next_employee_id());
    let employee = Employee::new(
        id,
        payload.name.trim(),
        payload.training.iter().map(|s| s.trim()).filter(|s| !s.is_empty()),
        payload.rank,
        payload.position.trim(),
        payload.max_hours,
    );
    validation::validate_employee(&employee)?;
    guard.add_employee(employee.clone())?;
    tracing::info!(target: "http_api", employee_id = id, "employee_created");
    Ok((StatusCode::CREATED, Json(employee)))
}

async fn delete_employee(
    State(state): State<AppState>,
    Path(employee_id): Path<i32>,
) -> Result<StatusCode, ApiError> {
    let schedule = state.schedule();
    let removed = schedule.write().remove_employee(employee_id);
    match removed {
        Some(_) => Ok(StatusCode::NO_CONTENT),
        None => Err(ApiError::not_found(format!(
            "employee {employee_id} not found"
        ))),
    }
}

async fn list_tasks(State(state): State<AppState>) -> Json<Vec<Task>> {
    let schedule = state.schedule();
    let tasks = schedule.read().tasks().to_vec();
    Json(tasks)
}

async fn get_task(
    State(state): State<AppState>,
    Path(task_id): Path<i32>,
) -> Result<Json<Task>, ApiError> {
    let schedule = state.schedule();
    let found = schedule.read().find_task(task_id).cloned();
    found
        .map(Json)
        .ok_or_else(|| ApiError::not_found(format!("task {task_id} not found")))
}

async fn create_task(
    State(state): State<AppState>,
    Json(payload): Json<TaskPayload>,
) -> Result<(StatusCode, Json<Task>), ApiError> {
    let schedule = state.schedule();
    let mut guard = schedule.write();
    let id = payload.id.unwrap_or_else(|| guard.next_task_id());
    let mut task = Task::new(
        id,
        payload.name.trim(),
        payload
            .required_training
            .iter()
            .map(|s| s.trim())
            .filter(|s| !s.is_empty()),
        payload.duration,
        payload.priority,
    )
    .with_min_rank(payload.min_rank);
    task.deadline = payload.deadline;
    validation::validate_task(&task)?;
    guard.add_task(task.clone())?;
    tracing::info!(target: "http_api", task_id = id, "task_created");
    Ok((StatusCode::CREATED, Json(task)))
}

async fn delete_task(
    State(state): State<AppState>,
    Path(task_id): Path<i32>,
) -> Result<StatusCode, ApiError> {
    let schedule = state.schedule();
    let removed = schedule.write().remove_task(task_id);
    match removed {
        Some(_) => Ok(StatusCode::NO_CONTENT),
        None => Err(ApiError::not_found(format!("task {task_id} not found"))),
    }
}

async fn generate_schedule(
    State(state): State<AppState>,
) -> Result<Json<GenerateResponse>, ApiError> {
    let schedule = state.schedule();
    let mut guard = schedule.write();
    persistence::validate_schedule(&guard)?;
    let summary = guard.run_assignment_pass();
    Ok(Json(GenerateResponse {
        all_assigned: summary.all_assigned(),
        summary,
        statistics: guard.statistics(),
    }))
}

async fn reset_schedule(State(state): State<AppState>) -> Json<ScheduleStatistics> {
    let schedule = state.schedule();
    let mut guard = schedule.write();
    guard.reset();
    Json(guard.statistics())
}

async fn get_statistics(State(state): State<AppState>) -> Json<ScheduleStatistics> {
    let schedule = state.schedule();
    let stats = schedule.read().statistics();
    Json(stats)
}

async fn unassigned_report(State(state): State<AppState>) -> Json<Vec<UnassignedTaskReport>> {
    let schedule = state.schedule();
    let report = schedule.read().unassigned_tasks_report();
    Json(report)
}

async fn workload_report(State(state): State<AppState>) -> Json<Vec<EmployeeWorkloadReport>> {
    let schedule = state.schedule();
    let report = schedule.read().employee_workload_report();
    Json(report)
}

async fn export_schedule_json(State(state): State<AppState>) -> Result<Response, ApiError> {
    let schedule = state.schedule();
    let body = persistence::schedule_to_json_string(&schedule.read())?;
    Ok(attachment("application/json", "schedule.json", body))
}

async fn export_csv(
    State(state): State<AppState>,
    Path(kind): Path<String>,
) -> Result<Response, ApiError> {
    let kind = CsvExportKind::from_str(&kind)?;
    let schedule = state.schedule();
    let mut buffer = Vec::new();
    persistence::export_csv(&schedule.read(), kind, &mut buffer)?;
    let body = String::from_utf8(buffer)
        .map_err(|err| ApiError::internal(format!("csv export is not utf-8: {err}")))?;
    Ok(attachment("text/csv", kind.file_name(), body))
}

async fn export_report(
    State(state): State<AppState>,
    Path(kind): Path<String>,
) -> Result<Response, ApiError> {
    let kind = ReportKind::from_str(&kind).map_err(ApiError::invalid)?;
    let schedule = state.schedule();
    let body = ReportGenerator::new(&schedule.read()).render(kind);
    Ok(attachment("text/plain", kind.file_name(), body))
}

async fn clear_data(State(state): State<AppState>) -> StatusCode {
    let schedule = state.schedule();
    schedule.write().clear();
    StatusCode::NO_CONTENT
}

fn attachment(content_type: &'static str, file_name: &str, body: String) -> Response {
    (
        [
            (header::CONTENT_TYPE, content_type.to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename={file_name}"),
            ),
        ],
        body,
    )
        .into_response()
}
