// Main entry point - Dependency injection and server setup
mod domain;
mod application;
mod infrastructure;
mod presentation;

use std::{net::SocketAddr, sync::Arc, time::Duration};
use tower_http::{compression::CompressionLayer, trace::TraceLayer};
use tracing_subscriber::EnvFilter;

use crate::application::chart_renderer::{ChartLayout, ChartRenderer};
use crate::application::dashboard_service::DashboardService;
use crate::application::forecast_client::ForecastClient;
use crate::application::series_generator::SeriesGenerator;
use crate::infrastructure::config::{load_app_config, load_subject_catalog};
use crate::infrastructure::gemini_provider::GeminiProvider;
use crate::presentation::app_state::AppState;
use crate::presentation::router::build_router;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("epicast=info,tower_http=info")),
        )
        .init();

    // Load configuration
    let app_config = load_app_config()?;
    let catalog = load_subject_catalog()?;

    // Create forecast provider (infrastructure layer)
    let timeout = Duration::from_secs(app_config.gemini.timeout_secs);
    let provider = Arc::new(GeminiProvider::new(
        app_config.gemini.base_url,
        app_config.gemini.api_key,
        app_config.gemini.model,
        timeout,
    )?);

    // Create services (application layer)
    let mut forecast_client = ForecastClient::new(provider, timeout);
    if let Some(template) = app_config.forecast.prompt_template {
        forecast_client = forecast_client.with_prompt_template(template);
    }
    let dashboard_service = DashboardService::new(
        Arc::new(catalog),
        SeriesGenerator::new(app_config.series.weeks),
        forecast_client,
        ChartRenderer::new(ChartLayout::with_size(
            app_config.chart.width,
            app_config.chart.height,
        )),
        app_config.series.default_subject.as_deref(),
    )?;

    let state = Arc::new(AppState { dashboard_service });

    // Build router (presentation layer)
    let router = build_router(state)
        .layer(CompressionLayer::new())
        .layer(TraceLayer::new_for_http());

    // Start server
    let addr: SocketAddr = app_config.server.bind_address.parse()?;
    tracing::info!(%addr, "starting epicast dashboard");

    axum::serve(tokio::net::TcpListener::bind(addr).await?, router).await?;

    Ok(())
}
