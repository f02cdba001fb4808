use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use chrono::Utc;
use serde::Deserialize;
use serde_json::json;
use tracing::warn;

use super::domain::{EmployeeId, EmployeePatch, NewEmployee, NewProjectRequest};
use super::repository::EmployeeRepository;
use super::service::{EmployeeQuery, EmployeeService, EmployeeServiceError};

/// Router builder exposing the roster, analytics, and index preview endpoints.
pub fn employee_router<R>(service: Arc<EmployeeService<R>>) -> Router
where
    R: EmployeeRepository + 'static,
{
    Router::new()
        .route(
            "/api/v1/employees",
            get(list_handler::<R>).post(create_handler::<R>),
        )
        .route(
            "/api/v1/employees/:employee_id",
            get(fetch_handler::<R>)
                .patch(update_handler::<R>)
                .delete(delete_handler::<R>),
        )
        .route(
            "/api/v1/employees/:employee_id/projects",
            post(assign_project_handler::<R>),
        )
        .route(
            "/api/v1/employees/:employee_id/factors",
            get(factors_handler::<R>),
        )
        .route("/api/v1/analytics/team", get(analytics_handler::<R>))
        .route("/api/v1/index", get(preview_handler::<R>))
        .with_state(service)
}

#[derive(Debug, Deserialize)]
pub(crate) struct PreviewParams {
    pub(crate) active_requests: usize,
}

pub(crate) async fn list_handler<R>(
    State(service): State<Arc<EmployeeService<R>>>,
    Query(query): Query<EmployeeQuery>,
) -> Response
where
    R: EmployeeRepository + 'static,
{
    match service.list(&query) {
        Ok(employees) => (StatusCode::OK, Json(employees)).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn create_handler<R>(
    State(service): State<Arc<EmployeeService<R>>>,
    Json(draft): Json<NewEmployee>,
) -> Response
where
    R: EmployeeRepository + 'static,
{
    match service.create(draft) {
        Ok(employee) => (StatusCode::CREATED, Json(employee)).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn fetch_handler<R>(
    State(service): State<Arc<EmployeeService<R>>>,
    Path(employee_id): Path<u64>,
) -> Response
where
    R: EmployeeRepository + 'static,
{
    match service.get(EmployeeId(employee_id)) {
        Ok(employee) => (StatusCode::OK, Json(employee)).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn update_handler<R>(
    State(service): State<Arc<EmployeeService<R>>>,
    Path(employee_id): Path<u64>,
    Json(patch): Json<EmployeePatch>,
) -> Response
where
    R: EmployeeRepository + 'static,
{
    match service.update(EmployeeId(employee_id), patch) {
        Ok(employee) => (StatusCode::OK, Json(employee)).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn delete_handler<R>(
    State(service): State<Arc<EmployeeService<R>>>,
    Path(employee_id): Path<u64>,
) -> Response
where
    R: EmployeeRepository + 'static,
{
    match service.delete(EmployeeId(employee_id)) {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn assign_project_handler<R>(
    State(service): State<Arc<EmployeeService<R>>>,
    Path(employee_id): Path<u64>,
    Json(project): Json<NewProjectRequest>,
) -> Response
where
    R: EmployeeRepository + 'static,
{
    match service.assign_project(EmployeeId(employee_id), project) {
        Ok(employee) => (StatusCode::CREATED, Json(employee)).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn factors_handler<R>(
    State(service): State<Arc<EmployeeService<R>>>,
    Path(employee_id): Path<u64>,
) -> Response
where
    R: EmployeeRepository + 'static,
{
    let today = Utc::now().date_naive();
    match service.factor_breakdown(EmployeeId(employee_id), today) {
        Ok(detail) => (StatusCode::OK, Json(detail)).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn analytics_handler<R>(
    State(service): State<Arc<EmployeeService<R>>>,
    Query(query): Query<EmployeeQuery>,
) -> Response
where
    R: EmployeeRepository + 'static,
{
    match service.analytics(&query) {
        Ok(analytics) => (StatusCode::OK, Json(analytics)).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn preview_handler<R>(
    State(service): State<Arc<EmployeeService<R>>>,
    Query(params): Query<PreviewParams>,
) -> Response
where
    R: EmployeeRepository + 'static,
{
    match service.preview(params.active_requests) {
        Ok(score) => (
            StatusCode::OK,
            Json(json!({
                "active_requests": params.active_requests,
                "current_index": score.current_index(),
                "status": score.status(),
                "color": score.status().color(),
            })),
        )
            .into_response(),
        Err(error) => error_response(error),
    }
}

fn error_response(error: EmployeeServiceError) -> Response {
    let status = error.status_code();
    if status.is_server_error() {
        warn!(%error, "employee request failed");
    }
    let payload = json!({
        "error": error.to_string(),
    });
    (status, Json(payload)).into_response()
}
