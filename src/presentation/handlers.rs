// HTTP request handlers
use crate::domain::error::{DashboardError, ForecastError};
use crate::infrastructure::json_mapper::{DashboardDto, SubjectDto, dashboard_to_dto, subject_to_dto};
use crate::infrastructure::svg_chart::chart_to_svg;
use crate::presentation::app_state::AppState;
use axum::{
    Json,
    extract::{Path, State},
    http::{StatusCode, header},
    response::{IntoResponse, Response},
};
use serde_json::json;
use std::sync::Arc;

/// Error response: `{ "error": message }` with a status per error kind
#[derive(Debug)]
pub struct ApiError(DashboardError);

impl From<DashboardError> for ApiError {
    fn from(error: DashboardError) -> Self {
        Self(error)
    }
}

impl ApiError {
    fn status(&self) -> StatusCode {
        match &self.0 {
            DashboardError::UnknownSubject(_) => StatusCode::NOT_FOUND,
            DashboardError::ForecastInProgress => StatusCode::CONFLICT,
            DashboardError::Forecast(ForecastError::InvariantViolation(_)) => StatusCode::CONFLICT,
            DashboardError::Forecast(ForecastError::ExternalService(_)) => StatusCode::BAD_GATEWAY,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        (status, Json(json!({ "error": self.0.to_string() }))).into_response()
    }
}

/// Health check endpoint
pub async fn health_check() -> &'static str {
    "ok"
}

/// List the subject catalog
pub async fn list_subjects(State(state): State<Arc<AppState>>) -> Json<Vec<SubjectDto>> {
    Json(
        state
            .dashboard_service
            .subjects()
            .iter()
            .map(subject_to_dto)
            .collect(),
    )
}

pub async fn get_dashboard(State(state): State<Arc<AppState>>) -> Json<DashboardDto> {
    Json(dashboard_to_dto(state.dashboard_service.get_dashboard().await))
}

/// Current series as an SVG chart
pub async fn get_chart(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let chart = state.dashboard_service.get_chart().await;
    (
        [(header::CONTENT_TYPE, "image/svg+xml")],
        chart_to_svg(&chart),
    )
}

pub async fn select_subject(
    Path(id): Path<String>,
    State(state): State<Arc<AppState>>,
) -> Result<Json<DashboardDto>, ApiError> {
    let dashboard = state.dashboard_service.select_subject(&id).await?;
    Ok(Json(dashboard_to_dto(dashboard)))
}

pub async fn reset(State(state): State<Arc<AppState>>) -> Result<Json<DashboardDto>, ApiError> {
    let dashboard = state.dashboard_service.reset().await?;
    Ok(Json(dashboard_to_dto(dashboard)))
}

pub async fn run_forecast(
    State(state): State<Arc<AppState>>,
) -> Result<Json<DashboardDto>, ApiError> {
    let dashboard = state.dashboard_service.run_forecast().await?;
    Ok(Json(dashboard_to_dto(dashboard)))
}
