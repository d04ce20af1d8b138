// Surveillance series domain models
use super::error::ForecastError;
use chrono::NaiveDate;

/// Observed weekly count.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HistoricalPoint {
    pub date: NaiveDate,
    pub actual: u32,
}

impl HistoricalPoint {
    pub fn new(date: NaiveDate, actual: u32) -> Self {
        Self { date, actual }
    }
}

/// Forecasted count with its 95% confidence band.
///
/// Fields are private so that `ci_lower <= forecast <= ci_upper` always holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ForecastPoint {
    date: NaiveDate,
    forecast: u32,
    ci_lower: u32,
    ci_upper: u32,
}

impl ForecastPoint {
    pub fn new(
        date: NaiveDate,
        forecast: u32,
        ci_lower: u32,
        ci_upper: u32,
    ) -> Result<Self, ForecastError> {
        if ci_lower > forecast || forecast > ci_upper {
            return Err(ForecastError::invariant(format!(
                "forecast for {} is {} but its confidence band is [{}, {}]",
                date, forecast, ci_lower, ci_upper
            )));
        }

        Ok(Self {
            date,
            forecast,
            ci_lower,
            ci_upper,
        })
    }

    pub fn date(&self) -> NaiveDate {
        self.date
    }

    pub fn forecast(&self) -> u32 {
        self.forecast
    }

    pub fn ci_lower(&self) -> u32 {
        self.ci_lower
    }

    pub fn ci_upper(&self) -> u32 {
        self.ci_upper
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SeriesPoint {
    Historical(HistoricalPoint),
    Forecast(ForecastPoint),
}

impl SeriesPoint {
    pub fn date(&self) -> NaiveDate {
        match self {
            SeriesPoint::Historical(p) => p.date,
            SeriesPoint::Forecast(p) => p.date(),
        }
    }

    pub fn actual(&self) -> Option<u32> {
        match self {
            SeriesPoint::Historical(p) => Some(p.actual),
            SeriesPoint::Forecast(_) => None,
        }
    }

    pub fn forecast(&self) -> Option<u32> {
        match self {
            SeriesPoint::Historical(_) => None,
            SeriesPoint::Forecast(p) => Some(p.forecast()),
        }
    }

    /// `(ci_lower, ci_upper)` for forecast points
    pub fn confidence_band(&self) -> Option<(u32, u32)> {
        match self {
            SeriesPoint::Historical(_) => None,
            SeriesPoint::Forecast(p) => Some((p.ci_lower(), p.ci_upper())),
        }
    }

    pub fn is_forecast(&self) -> bool {
        matches!(self, SeriesPoint::Forecast(_))
    }
}

impl From<HistoricalPoint> for SeriesPoint {
    fn from(point: HistoricalPoint) -> Self {
        SeriesPoint::Historical(point)
    }
}

impl From<ForecastPoint> for SeriesPoint {
    fn from(point: ForecastPoint) -> Self {
        SeriesPoint::Forecast(point)
    }
}

/// Date-ordered series: a historical prefix followed by a forecast suffix.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Series {
    points: Vec<SeriesPoint>,
}

impl Series {
    #[cfg(test)]
    pub fn empty() -> Self {
        Self::default()
    }

    /// Build a series, checking that dates strictly ascend and that no
    /// historical point follows a forecast point.
    pub fn from_points(points: Vec<SeriesPoint>) -> Result<Self, ForecastError> {
        for pair in points.windows(2) {
            let (prev, next) = (pair[0], pair[1]);
            if next.date() <= prev.date() {
                return Err(ForecastError::invariant(format!(
                    "dates must strictly ascend, found {} after {}",
                    next.date(),
                    prev.date()
                )));
            }
            if prev.is_forecast() && !next.is_forecast() {
                return Err(ForecastError::invariant(format!(
                    "historical point {} follows forecast point {}",
                    next.date(),
                    prev.date()
                )));
            }
        }

        Ok(Self { points })
    }

    pub fn points(&self) -> &[SeriesPoint] {
        &self.points
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn historical(&self) -> impl Iterator<Item = &HistoricalPoint> {
        self.points.iter().filter_map(|p| match p {
            SeriesPoint::Historical(h) => Some(h),
            SeriesPoint::Forecast(_) => None,
        })
    }

    pub fn forecasts(&self) -> impl Iterator<Item = &ForecastPoint> {
        self.points.iter().filter_map(|p| match p {
            SeriesPoint::Historical(_) => None,
            SeriesPoint::Forecast(f) => Some(f),
        })
    }

    pub fn has_forecast(&self) -> bool {
        self.points.iter().any(SeriesPoint::is_forecast)
    }

    /// Copy of this series with every forecast point dropped
    pub fn historical_only(&self) -> Series {
        Self {
            points: self
                .points
                .iter()
                .filter(|p| !p.is_forecast())
                .copied()
                .collect(),
        }
    }

    /// Date of the last historical point, i.e. the actual/forecast transition
    pub fn boundary_date(&self) -> Option<NaiveDate> {
        self.historical().last().map(|p| p.date)
    }

    pub fn latest_actual(&self) -> Option<u32> {
        self.historical().last().map(|p| p.actual)
    }
}
