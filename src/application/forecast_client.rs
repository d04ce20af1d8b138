// Forecast client - Prompt assembly and response validation
use crate::application::forecast_provider::ForecastProvider;
use crate::domain::error::ForecastError;
use crate::domain::forecast::{FORECAST_HORIZON_WEEKS, ForecastEntry, ForecastResult};
use crate::domain::series::Series;
use crate::infrastructure::config::prepare_prompt;
use chrono::{Duration, NaiveDate};
use serde::Deserialize;
use serde_json::json;
use std::collections::HashMap;
use std::sync::Arc;

pub const DEFAULT_TIMEOUT_SECS: u64 = 60;

pub const DEFAULT_PROMPT_TEMPLATE: &str = "\
You are a senior epidemiologist and data scientist.
Below is the historical weekly surveillance data for ${disease}, measured in ${unit}.

HISTORICAL DATA:
${history}

TASK:
1. Produce a short-term ${horizon}-week forecast using a simulated statistical model (e.g. Prophet or ARIMA).
2. Give a 95% confidence interval (lower and upper bound) for every forecasted week.
3. Explain the reasoning behind the forecast in terms of recent trends and epidemiology.
4. Give an 'Academic Framing' explaining why this forecast matters for public health resource allocation.

Return exactly ${horizon} forecasts spaced one week apart, the first dated ${start_date} \
(the week after the last historical date). All values must be non-negative integers.";

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ForecastPayload {
    forecasts: Vec<ForecastPayloadEntry>,
    explanation: String,
    academic_framing: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ForecastPayloadEntry {
    date: String,
    value: f64,
    ci_lower: f64,
    ci_upper: f64,
}

#[derive(Clone)]
pub struct ForecastClient {
    provider: Arc<dyn ForecastProvider>,
    prompt_template: String,
    timeout: std::time::Duration,
}

impl ForecastClient {
    pub fn new(provider: Arc<dyn ForecastProvider>, timeout: std::time::Duration) -> Self {
        Self {
            provider,
            prompt_template: DEFAULT_PROMPT_TEMPLATE.to_string(),
            timeout,
        }
    }

    pub fn with_prompt_template(mut self, template: impl Into<String>) -> Self {
        self.prompt_template = template.into();
        self
    }

    /// Request a forecast for the historical part of `series`.
    ///
    /// Forecast points already present are never sent, so repeated calls
    /// cannot compound earlier forecasts.
    pub async fn request_forecast(
        &self,
        subject_name: &str,
        series: &Series,
        unit: &str,
    ) -> Result<ForecastResult, ForecastError> {
        let history = series.historical_only();
        if history.is_empty() {
            return Err(ForecastError::invariant(
                "cannot forecast a series without historical points",
            ));
        }

        let prompt = self.build_prompt(subject_name, &history, unit);
        let schema = response_schema();
        tracing::debug!(
            subject = subject_name,
            points = history.len(),
            prompt_len = prompt.len(),
            "requesting forecast"
        );

        let raw = tokio::time::timeout(self.timeout, self.provider.generate(&prompt, &schema))
            .await
            .map_err(|_| {
                ForecastError::external(format!(
                    "forecast call timed out after {}s",
                    self.timeout.as_secs_f64()
                ))
            })??;

        let result = parse_forecast_response(&raw)?;
        tracing::debug!(
            subject = subject_name,
            forecasts = result.forecasts.len(),
            "forecast response validated"
        );
        Ok(result)
    }

    pub fn build_prompt(&self, subject_name: &str, series: &Series, unit: &str) -> String {
        let history = series
            .historical()
            .map(|p| format!("Date: {}, Cases: {}", p.date.format("%Y-%m-%d"), p.actual))
            .collect::<Vec<_>>()
            .join("\n");

        let start_date = series
            .boundary_date()
            .map(|d| (d + Duration::weeks(1)).format("%Y-%m-%d").to_string())
            .unwrap_or_default();

        let mut vars = HashMap::new();
        vars.insert("disease".to_string(), subject_name.to_string());
        vars.insert("unit".to_string(), unit.to_string());
        vars.insert("history".to_string(), history);
        vars.insert("horizon".to_string(), FORECAST_HORIZON_WEEKS.to_string());
        vars.insert("start_date".to_string(), start_date);

        prepare_prompt(&self.prompt_template, &vars)
    }
}

/// Structured-output schema declared to the forecaster
pub fn response_schema() -> serde_json::Value {
    json!({
        "type": "OBJECT",
        "properties": {
            "forecasts": {
                "type": "ARRAY",
                "items": {
                    "type": "OBJECT",
                    "properties": {
                        "date": { "type": "STRING" },
                        "value": { "type": "NUMBER" },
                        "ciLower": { "type": "NUMBER" },
                        "ciUpper": { "type": "NUMBER" }
                    },
                    "required": ["date", "value", "ciLower", "ciUpper"]
                }
            },
            "explanation": { "type": "STRING" },
            "academicFraming": { "type": "STRING" }
        },
        "required": ["forecasts", "explanation", "academicFraming"]
    })
}

/// Parse and shape-check a raw forecaster response.
pub fn parse_forecast_response(raw: &str) -> Result<ForecastResult, ForecastError> {
    let payload: ForecastPayload = serde_json::from_str(raw.trim())
        .map_err(|e| ForecastError::external(format!("malformed forecast payload: {}", e)))?;

    let forecasts = payload
        .forecasts
        .into_iter()
        .map(|entry| {
            let date = NaiveDate::parse_from_str(&entry.date, "%Y-%m-%d").map_err(|e| {
                ForecastError::external(format!("invalid forecast date {:?}: {}", entry.date, e))
            })?;

            Ok(ForecastEntry {
                date,
                value: to_count("value", date, entry.value)?,
                ci_lower: to_count("ciLower", date, entry.ci_lower)?,
                ci_upper: to_count("ciUpper", date, entry.ci_upper)?,
            })
        })
        .collect::<Result<Vec<_>, ForecastError>>()?;

    Ok(ForecastResult {
        forecasts,
        explanation: payload.explanation,
        academic_framing: payload.academic_framing,
    })
}

fn to_count(field: &str, date: NaiveDate, value: f64) -> Result<u32, ForecastError> {
    let rounded = value.round();
    if !rounded.is_finite() || rounded < 0.0 || rounded > f64::from(u32::MAX) {
        return Err(ForecastError::external(format!(
            "{} for {} is not a non-negative count: {}",
            field, date, value
        )));
    }
    Ok(rounded as u32)
}
