// Dashboard service - Session controller driving generate -> forecast -> merge -> render
use crate::application::chart_renderer::ChartRenderer;
use crate::application::forecast_client::ForecastClient;
use crate::application::series_generator::SeriesGenerator;
use crate::application::session::{Session, SessionEvent};
use crate::domain::chart::ChartData;
use crate::domain::dashboard::Dashboard;
use crate::domain::error::{DashboardError, ForecastError};
use crate::domain::forecast::FORECAST_HORIZON_WEEKS;
use crate::domain::series::Series;
use crate::domain::subject::{Subject, SubjectCatalog};
use chrono::Utc;
use std::sync::Arc;
use tokio::sync::RwLock;

#[derive(Clone)]
pub struct DashboardService {
    catalog: Arc<SubjectCatalog>,
    generator: SeriesGenerator,
    forecast_client: ForecastClient,
    renderer: ChartRenderer,
    session: Arc<RwLock<Session>>,
}

impl DashboardService {
    pub fn new(
        catalog: Arc<SubjectCatalog>,
        generator: SeriesGenerator,
        forecast_client: ForecastClient,
        renderer: ChartRenderer,
        initial_subject: Option<&str>,
    ) -> Result<Self, DashboardError> {
        let subject = match initial_subject {
            Some(id) => catalog.get(id)?.clone(),
            None => catalog.first().clone(),
        };
        let series = generate_history(&generator, &subject);
        tracing::info!(subject = %subject.id, points = series.len(), "session initialised");

        Ok(Self {
            catalog,
            generator,
            forecast_client,
            renderer,
            session: Arc::new(RwLock::new(Session::new(subject, series))),
        })
    }

    pub fn subjects(&self) -> &[Subject] {
        self.catalog.subjects()
    }

    pub async fn get_dashboard(&self) -> Dashboard {
        let session = self.session.read().await;
        dashboard_of(&session)
    }

    pub async fn get_chart(&self) -> ChartData {
        let session = self.session.read().await;
        self.renderer
            .render(&session.series, &session.subject.color, &session.subject.unit)
    }

    /// Switch subject and regenerate its history
    pub async fn select_subject(&self, id: &str) -> Result<Dashboard, DashboardError> {
        let subject = self.catalog.get(id)?.clone();
        self.regenerate(subject).await
    }

    /// Drop any forecast and regenerate history for the current subject
    pub async fn reset(&self) -> Result<Dashboard, DashboardError> {
        let subject = self.session.read().await.subject.clone();
        self.regenerate(subject).await
    }

    /// Request a forecast for the current series and merge it on success.
    ///
    /// The call runs on its own task so that an abandoned HTTP request cannot
    /// leave the session stuck in the pending state.
    pub async fn run_forecast(&self) -> Result<Dashboard, DashboardError> {
        let (subject, series) = {
            let mut session = self.session.write().await;
            let next = session
                .apply(SessionEvent::ForecastRequested)
                .inspect_err(|e| tracing::warn!(error = %e, "forecast request rejected"))?;
            *session = next;
            (session.subject.clone(), session.series.clone())
        };
        tracing::info!(subject = %subject.id, points = series.len(), "forecast requested");

        let service = self.clone();
        let task = tokio::spawn(async move { service.complete_forecast(subject, series).await });

        match task.await {
            Ok(outcome) => outcome,
            Err(join_error) => {
                tracing::error!(error = %join_error, "forecast task aborted");
                let mut session = self.session.write().await;
                let next = session.apply(SessionEvent::ForecastFailed)?;
                *session = next;
                Err(ForecastError::external(format!("forecast task aborted: {}", join_error)).into())
            }
        }
    }

    async fn complete_forecast(
        &self,
        subject: Subject,
        series: Series,
    ) -> Result<Dashboard, DashboardError> {
        let outcome = self
            .forecast_client
            .request_forecast(&subject.name, &series, &subject.unit)
            .await;

        let mut session = self.session.write().await;
        let applied = match outcome {
            Ok(result) => session.apply(SessionEvent::ForecastCompleted(result)),
            Err(e) => Err(e.into()),
        };

        match applied {
            Ok(next) => {
                *session = next;
                tracing::info!(
                    subject = %subject.id,
                    points = session.series.len(),
                    "forecast merged"
                );
                Ok(dashboard_of(&session))
            }
            Err(err) => {
                tracing::error!(subject = %subject.id, error = %err, "forecast failed");
                let next = session.apply(SessionEvent::ForecastFailed)?;
                *session = next;
                Err(err)
            }
        }
    }

    async fn regenerate(&self, subject: Subject) -> Result<Dashboard, DashboardError> {
        let series = generate_history(&self.generator, &subject);

        let mut session = self.session.write().await;
        let next = session
            .apply(SessionEvent::Regenerated {
                subject: subject.clone(),
                series,
            })
            .inspect_err(|e| tracing::warn!(error = %e, "regeneration rejected"))?;
        *session = next;
        tracing::info!(subject = %subject.id, "history regenerated");

        Ok(dashboard_of(&session))
    }
}

fn generate_history(generator: &SeriesGenerator, subject: &Subject) -> Series {
    let mut rng = rand::thread_rng();
    generator.generate(subject, Utc::now().date_naive(), &mut rng)
}

fn dashboard_of(session: &Session) -> Dashboard {
    Dashboard::new(
        session.subject.clone(),
        session.series.clone(),
        FORECAST_HORIZON_WEEKS,
        session.pending,
        session.insight.clone(),
    )
}
