use std::{net::SocketAddr, sync::Arc};

use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
};
use chrono::{NaiveTime, Utc};
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::{HistoryEntry, PlanError, Planner, Preferences, Task, TripPlan};

#[derive(Clone)]
pub struct AppState {
    planner: Arc<RwLock<Planner>>,
}

impl AppState {
    pub fn new(planner: Planner) -> Self {
        Self {
            planner: Arc::new(RwLock::new(planner)),
        }
    }

    pub fn with_shared(planner: Arc<RwLock<Planner>>) -> Self {
        Self { planner }
    }

    fn planner(&self) -> Arc<RwLock<Planner>> {
        self.planner.clone()
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
    Invalid(String),
    Internal(String),
}

impl ApiError {
    fn not_found(message: impl Into<String>) -> Self {
        ApiError::NotFound(message.into())
    }

    fn internal(message: impl Into<String>) -> Self {
        ApiError::Internal(message.into())
    }
}

impl From<polars::prelude::PolarsError> for ApiError {
    fn from(value: polars::prelude::PolarsError) -> Self {
        ApiError::Invalid(value.to_string())
    }
}

impl From<PlanError> for ApiError {
    fn from(value: PlanError) -> Self {
        ApiError::Invalid(value.to_string())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match self {
            ApiError::NotFound(message) => {
                let body = Json(ErrorBody {
                    error: "not_found",
                    message,
                });
                (StatusCode::NOT_FOUND, body).into_response()
            }
            ApiError::Invalid(message) => {
                let body = Json(ErrorBody {
                    error: "invalid_request",
                    message,
                });
                (StatusCode::BAD_REQUEST, body).into_response()
            }
            ApiError::Internal(message) => {
                let body = Json(ErrorBody {
                    error: "internal_error",
                    message,
                });
                (StatusCode::INTERNAL_SERVER_ERROR, body).into_response()
            }
        }
    }
}

#[derive(Debug, Deserialize)]
struct TaskPayload {
    title: String,
    duration_minutes: i64,
}

#[derive(Debug, Default, Deserialize)]
struct SelectionPayload {
    destination: Option<String>,
    arrival_time: Option<NaiveTime>,
    transport: Option<String>,
}

#[derive(Debug, Serialize)]
struct SelectionView {
    destination: Option<String>,
    arrival_time: Option<NaiveTime>,
    transport: Option<String>,
}

impl SelectionView {
    fn from_planner(planner: &Planner) -> Self {
        Self {
            destination: planner.destination().map(ToOwned::to_owned),
            arrival_time: planner.arrival_time(),
            transport: planner.transport_key().map(ToOwned::to_owned),
        }
    }
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/tasks", get(list_tasks).post(create_task))
        .route(
            "/tasks/:id",
            get(get_task).put(update_task).delete(delete_task),
        )
        .route("/tasks/:id/toggle", post(toggle_task))
        .route("/preferences", get(get_preferences).put(update_preferences))
        .route("/selection", get(get_selection).put(update_selection))
        .route("/plan", post(compute_plan))
        .route("/history", get(list_history))
        .route("/history/:id/apply", post(apply_history))
        .with_state(state)
}

pub async fn serve(addr: SocketAddr, planner: Planner) -> std::io::Result<()> {
    let state = AppState::new(planner);
    let app = router(state);
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await
}

async fn health() -> impl IntoResponse {
    Json(json!({ "status": "ok" }))
}

async fn list_tasks(State(state): State<AppState>) -> Result<Json<Vec<Task>>, ApiError> {
    let planner = state.planner();
    let tasks = {
        let guard = planner.read();
        guard.tasks()?
    };
    Ok(Json(tasks))
}

async fn create_task(
    State(state): State<AppState>,
    Json(payload): Json<TaskPayload>,
) -> Result<(StatusCode, Json<Task>), ApiError> {
    let planner = state.planner();
    let created = {
        let mut guard = planner.write();
        let id = guard.add_task(&payload.title, payload.duration_minutes)?;
        guard
            .find_task(id)?
            .ok_or_else(|| ApiError::internal("task not found after creation"))?
    };
    Ok((StatusCode::CREATED, Json(created)))
}

async fn get_task(
    State(state): State<AppState>,
    Path(task_id): Path<i32>,
) -> Result<Json<Task>, ApiError> {
    let planner = state.planner();
    let result = {
        let guard = planner.read();
        guard.find_task(task_id)?
    };
    match result {
        Some(task) => Ok(Json(task)),
        None => Err(ApiError::not_found(format!("task {task_id} not found"))),
    }
}

async fn update_task(
    State(state): State<AppState>,
    Path(task_id): Path<i32>,
    Json(payload): Json<TaskPayload>,
) -> Result<Json<Task>, ApiError> {
    let planner = state.planner();
    let updated = {
        let mut guard = planner.write();
        if !guard.edit_task(task_id, &payload.title, payload.duration_minutes)? {
            return Err(ApiError::not_found(format!("task {task_id} not found")));
        }
        guard
            .find_task(task_id)?
            .ok_or_else(|| ApiError::internal("task not found after update"))?
    };
    Ok(Json(updated))
}

async fn toggle_task(
    State(state): State<AppState>,
    Path(task_id): Path<i32>,
) -> Result<Json<Task>, ApiError> {
    let planner = state.planner();
    let toggled = {
        let mut guard = planner.write();
        if !guard.toggle_task(task_id)? {
            return Err(ApiError::not_found(format!("task {task_id} not found")));
        }
        guard
            .find_task(task_id)?
            .ok_or_else(|| ApiError::internal("task not found after toggle"))?
    };
    Ok(Json(toggled))
}

async fn delete_task(
    State(state): State<AppState>,
    Path(task_id): Path<i32>,
) -> Result<StatusCode, ApiError> {
    let planner = state.planner();
    let removed = {
        let mut guard = planner.write();
        guard.delete_task(task_id)?
    };
    if !removed {
        return Err(ApiError::not_found(format!("task {task_id} not found")));
    }
    Ok(StatusCode::NO_CONTENT)
}

async fn get_preferences(State(state): State<AppState>) -> Json<Preferences> {
    let planner = state.planner();
    let preferences = {
        let guard = planner.read();
        *guard.preferences()
    };
    Json(preferences)
}

async fn update_preferences(
    State(state): State<AppState>,
    Json(preferences): Json<Preferences>,
) -> Json<Preferences> {
    let planner = state.planner();
    let current = {
        let mut guard = planner.write();
        guard.set_dark_mode(preferences.dark_mode);
        guard.set_consider_traffic(preferences.consider_traffic);
        *guard.preferences()
    };
    Json(current)
}

async fn get_selection(State(state): State<AppState>) -> Json<SelectionView> {
    let planner = state.planner();
    let view = {
        let guard = planner.read();
        SelectionView::from_planner(&guard)
    };
    Json(view)
}

async fn update_selection(
    State(state): State<AppState>,
    Json(payload): Json<SelectionPayload>,
) -> Result<Json<SelectionView>, ApiError> {
    let planner = state.planner();
    let view = {
        let mut guard = planner.write();
        if let Some(destination) = payload.destination {
            guard.set_destination(destination);
        }
        if let Some(arrival) = payload.arrival_time {
            guard.set_arrival_time(arrival);
        }
        if let Some(transport) = payload.transport {
            guard.set_transport(transport)?;
        }
        SelectionView::from_planner(&guard)
    };
    Ok(Json(view))
}

async fn compute_plan(State(state): State<AppState>) -> Result<Json<TripPlan>, ApiError> {
    let planner = state.planner();
    let plan = {
        let mut guard = planner.write();
        guard.calculate(Utc::now().date_naive())?
    };
    Ok(Json(plan))
}

async fn list_history(State(state): State<AppState>) -> Json<Vec<HistoryEntry>> {
    let planner = state.planner();
    let entries = {
        let guard = planner.read();
        guard.history().to_vec()
    };
    Json(entries)
}

async fn apply_history(
    State(state): State<AppState>,
    Path(entry_id): Path<i64>,
) -> Result<Json<SelectionView>, ApiError> {
    let planner = state.planner();
    let view = {
        let mut guard = planner.write();
        if !guard.apply_history_entry(entry_id) {
            return Err(ApiError::not_found(format!(
                "history entry {entry_id} not found"
            )));
        }
        SelectionView::from_planner(&guard)
    };
    Ok(Json(view))
}
