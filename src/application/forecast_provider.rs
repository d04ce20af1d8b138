// Capability trait for the external forecasting collaborator
use crate::domain::error::ForecastError;
use async_trait::async_trait;

#[async_trait]
pub trait ForecastProvider: Send + Sync {
    /// Send a prompt with a structured-output schema and return the raw
    /// response text, expected to be a JSON document matching the schema.
    async fn generate(
        &self,
        prompt: &str,
        response_schema: &serde_json::Value,
    ) -> Result<String, ForecastError>;
}

#[cfg(test)]
pub mod testing {
    use super::*;
    use std::sync::Mutex;
    use std::time::Duration;

    /// Stub provider returning a canned response and recording prompts.
    pub struct StubForecastProvider {
        response: Result<String, ForecastError>,
        delay: Option<Duration>,
        prompts: Mutex<Vec<String>>,
    }

    impl StubForecastProvider {
        pub fn returning(body: impl Into<String>) -> Self {
            Self {
                response: Ok(body.into()),
                delay: None,
                prompts: Mutex::new(Vec::new()),
            }
        }

        pub fn failing(error: ForecastError) -> Self {
            Self {
                response: Err(error),
                delay: None,
                prompts: Mutex::new(Vec::new()),
            }
        }

        pub fn with_delay(mut self, delay: Duration) -> Self {
            self.delay = Some(delay);
            self
        }

        pub fn prompts(&self) -> Vec<String> {
            self.prompts.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl ForecastProvider for StubForecastProvider {
        async fn generate(
            &self,
            prompt: &str,
            _response_schema: &serde_json::Value,
        ) -> Result<String, ForecastError> {
            self.prompts.lock().unwrap().push(prompt.to_string());
            if let Some(delay) = self.delay {
                tokio::time::sleep(delay).await;
            }
            self.response.clone()
        }
    }

    /// JSON payload with `count` weekly entries starting one week after `last`.
    pub fn weekly_payload(last: chrono::NaiveDate, count: usize, value: u32) -> String {
        let forecasts: Vec<serde_json::Value> = (1..=count)
            .map(|week| {
                let date = last + chrono::Duration::weeks(week as i64);
                let v = value + week as u32;
                serde_json::json!({
                    "date": date.format("%Y-%m-%d").to_string(),
                    "value": v,
                    "ciLower": v - 10,
                    "ciUpper": v + 10,
                })
            })
            .collect();

        serde_json::json!({
            "forecasts": forecasts,
            "explanation": "Cases continue the recent upward trend.",
            "academicFraming": "Early warning supports bed and staff allocation.",
        })
        .to_string()
    }
}
