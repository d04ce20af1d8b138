// Session state machine - (session, event) -> session
use crate::application::series_merger::merge;
use crate::domain::error::{DashboardError, ForecastError};
use crate::domain::forecast::{ForecastInsight, ForecastResult};
use crate::domain::series::Series;
use crate::domain::subject::Subject;

/// Snapshot of what the dashboard shows. Never mutated in place: every
/// transition yields a new value.
#[derive(Debug, Clone)]
pub struct Session {
    pub subject: Subject,
    pub series: Series,
    pub insight: Option<ForecastInsight>,
    /// A forecast call is outstanding
    pub pending: bool,
}

#[derive(Debug, Clone)]
pub enum SessionEvent {
    /// Fresh history for a subject (subject selection or reset)
    Regenerated { subject: Subject, series: Series },
    ForecastRequested,
    ForecastCompleted(ForecastResult),
    ForecastFailed,
}

impl SessionEvent {
    fn name(&self) -> &'static str {
        match self {
            SessionEvent::Regenerated { .. } => "regenerated",
            SessionEvent::ForecastRequested => "forecast_requested",
            SessionEvent::ForecastCompleted(_) => "forecast_completed",
            SessionEvent::ForecastFailed => "forecast_failed",
        }
    }
}

impl Session {
    pub fn new(subject: Subject, series: Series) -> Self {
        Self {
            subject,
            series,
            insight: None,
            pending: false,
        }
    }

    pub fn apply(&self, event: SessionEvent) -> Result<Session, DashboardError> {
        let event_name = event.name();
        let next = match event {
            SessionEvent::Regenerated { subject, series } => {
                if self.pending {
                    return Err(DashboardError::ForecastInProgress);
                }
                Session::new(subject, series)
            }
            SessionEvent::ForecastRequested => {
                if self.pending {
                    return Err(DashboardError::ForecastInProgress);
                }
                if self.series.has_forecast() {
                    return Err(ForecastError::invariant(
                        "series already has a forecast; reset before forecasting again",
                    )
                    .into());
                }
                Session {
                    pending: true,
                    ..self.clone()
                }
            }
            SessionEvent::ForecastCompleted(result) => {
                if !self.pending {
                    return Err(ForecastError::invariant("no forecast request is outstanding").into());
                }
                let series = merge(&self.series, &result)?;
                Session {
                    subject: self.subject.clone(),
                    series,
                    insight: Some(ForecastInsight::new(&result, &self.subject.weather_factor)),
                    pending: false,
                }
            }
            SessionEvent::ForecastFailed => Session {
                pending: false,
                ..self.clone()
            },
        };

        tracing::debug!(
            event = event_name,
            subject = %next.subject.id,
            points = next.series.len(),
            pending = next.pending,
            "session transition"
        );
        Ok(next)
    }
}
