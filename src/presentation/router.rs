// Route table for the dashboard API
use crate::presentation::app_state::AppState;
use crate::presentation::handlers::{
    get_chart, get_dashboard, health_check, list_subjects, reset, run_forecast, select_subject,
};
use axum::{
    Router,
    routing::{get, post},
};
use std::sync::Arc;

pub fn build_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/healthz", get(health_check))
        .route("/subjects", get(list_subjects))
        .route("/dashboard", get(get_dashboard))
        .route("/dashboard/chart.svg", get(get_chart))
        .route("/dashboard/subjects/:id", post(select_subject))
        .route("/dashboard/reset", post(reset))
        .route("/dashboard/forecast", post(run_forecast))
        .with_state(state)
}
