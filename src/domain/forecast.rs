// Forecast result domain models
use chrono::NaiveDate;

/// Number of weekly points requested from the forecaster.
pub const FORECAST_HORIZON_WEEKS: usize = 4;

/// One forecast entry as returned by the external collaborator.
///
/// Band ordering is not checked here; the merger rejects entries that break it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ForecastEntry {
    pub date: NaiveDate,
    pub value: u32,
    pub ci_lower: u32,
    pub ci_upper: u32,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ForecastResult {
    pub forecasts: Vec<ForecastEntry>,
    pub explanation: String,
    pub academic_framing: String,
}

/// Narrative shown next to the chart once a forecast has been merged
#[derive(Debug, Clone, PartialEq)]
pub struct ForecastInsight {
    pub explanation: String,
    pub academic_framing: String,
    pub environmental_driver: String,
}

impl ForecastInsight {
    pub fn new(result: &ForecastResult, environmental_driver: &str) -> Self {
        Self {
            explanation: result.explanation.clone(),
            academic_framing: result.academic_framing.clone(),
            environmental_driver: environmental_driver.to_string(),
        }
    }
}
