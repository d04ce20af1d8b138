// Application layer - Business logic and use cases
pub mod chart_renderer;
pub mod dashboard_service;
pub mod forecast_client;
pub mod forecast_provider;
pub mod series_generator;
pub mod series_merger;
pub mod session;
