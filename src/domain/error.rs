// Error taxonomy for the forecast pipeline
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq)]
pub enum ForecastError {
    /// The external forecasting call failed or returned an unusable payload
    #[error("external forecast service error: {0}")]
    ExternalService(String),

    /// A series or merge would break the ordering/segment invariants
    #[error("series invariant violated: {0}")]
    InvariantViolation(String),
}

impl ForecastError {
    pub fn external(msg: impl Into<String>) -> Self {
        Self::ExternalService(msg.into())
    }

    pub fn invariant(msg: impl Into<String>) -> Self {
        Self::InvariantViolation(msg.into())
    }
}

#[derive(Debug, Error, Clone, PartialEq)]
pub enum DashboardError {
    #[error("unknown subject: {0}")]
    UnknownSubject(String),

    #[error("a forecast request is already in progress")]
    ForecastInProgress,

    #[error(transparent)]
    Forecast(#[from] ForecastError),
}
