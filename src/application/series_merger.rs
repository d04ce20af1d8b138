// Splices validated forecast entries onto a historical series
use crate::domain::error::ForecastError;
use crate::domain::forecast::{FORECAST_HORIZON_WEEKS, ForecastResult};
use crate::domain::series::{ForecastPoint, Series, SeriesPoint};
use chrono::Duration;

/// Append the forecast entries, in the order returned, after the historical
/// points of `series`. The input is left untouched.
///
/// Rejects a series that already carries forecasts, an entry count other than
/// the forecast horizon, dates that do not strictly ascend past the boundary,
/// and bands that do not contain their value.
pub fn merge(series: &Series, result: &ForecastResult) -> Result<Series, ForecastError> {
    if series.has_forecast() {
        return Err(ForecastError::invariant(
            "series already contains forecast points",
        ));
    }
    if result.forecasts.len() != FORECAST_HORIZON_WEEKS {
        return Err(ForecastError::invariant(format!(
            "expected {} forecast points, got {}",
            FORECAST_HORIZON_WEEKS,
            result.forecasts.len()
        )));
    }

    let mut previous = series.boundary_date();
    let mut points: Vec<SeriesPoint> = Vec::with_capacity(series.len() + result.forecasts.len());
    points.extend_from_slice(series.points());

    for entry in &result.forecasts {
        if let Some(prev) = previous {
            if entry.date <= prev {
                return Err(ForecastError::invariant(format!(
                    "forecast date {} is not after {}",
                    entry.date, prev
                )));
            }
            if entry.date - prev != Duration::weeks(1) {
                tracing::warn!(
                    date = %entry.date,
                    previous = %prev,
                    "forecast date is off the weekly cadence"
                );
            }
        }

        let point = ForecastPoint::new(entry.date, entry.value, entry.ci_lower, entry.ci_upper)?;
        points.push(SeriesPoint::Forecast(point));
        previous = Some(entry.date);
    }

    Series::from_points(points)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::forecast_client::parse_forecast_response;
    use crate::application::forecast_provider::testing::weekly_payload;
    use crate::domain::forecast::ForecastEntry;
    use crate::domain::series::HistoricalPoint;
    use chrono::NaiveDate;

    fn start() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 1, 1).unwrap()
    }

    fn history(weeks: i64) -> Series {
        let points: Vec<SeriesPoint> = (0..weeks)
            .map(|i| HistoricalPoint::new(start() + Duration::weeks(i), 100 + i as u32).into())
            .collect();
        Series::from_points(points).unwrap()
    }

    fn result_after(series: &Series) -> ForecastResult {
        let last = series.boundary_date().unwrap();
        parse_forecast_response(&weekly_payload(last, 4, 140)).unwrap()
    }

    #[test]
    fn test_merge_appends_four_forecast_points() {
        let series = history(27);
        let result = result_after(&series);
        let merged = merge(&series, &result).unwrap();

        assert_eq!(merged.len(), 31);
        assert_eq!(&merged.points()[..27], series.points());
        for (point, entry) in merged.points()[27..].iter().zip(&result.forecasts) {
            assert_eq!(point.actual(), None);
            assert_eq!(point.forecast(), Some(entry.value));
            assert_eq!(point.confidence_band(), Some((entry.ci_lower, entry.ci_upper)));
            assert_eq!(point.date(), entry.date);
        }
        assert_eq!(merged.boundary_date(), series.boundary_date());
        // input untouched
        assert_eq!(series.len(), 27);
    }

    #[test]
    fn test_merge_rejects_already_forecasted_series() {
        let series = history(5);
        let merged = merge(&series, &result_after(&series)).unwrap();

        let err = merge(&merged, &result_after(&series)).unwrap_err();
        assert!(matches!(err, ForecastError::InvariantViolation(_)));
    }

    #[test]
    fn test_merge_rejects_wrong_count() {
        let series = history(5);
        let mut result = result_after(&series);
        result.forecasts.pop();

        let err = merge(&series, &result).unwrap_err();
        assert!(matches!(err, ForecastError::InvariantViolation(_)));
    }

    #[test]
    fn test_merge_rejects_dates_not_after_boundary() {
        let series = history(5);
        let mut result = result_after(&series);
        result.forecasts[0].date = series.boundary_date().unwrap();

        let err = merge(&series, &result).unwrap_err();
        assert!(matches!(err, ForecastError::InvariantViolation(_)));
    }

    #[test]
    fn test_merge_rejects_unordered_forecast_dates() {
        let series = history(5);
        let mut result = result_after(&series);
        result.forecasts.swap(1, 2);

        let err = merge(&series, &result).unwrap_err();
        assert!(matches!(err, ForecastError::InvariantViolation(_)));
    }

    #[test]
    fn test_merge_rejects_band_not_containing_value() {
        let series = history(5);
        let mut result = result_after(&series);
        result.forecasts[3] = ForecastEntry {
            ci_upper: result.forecasts[3].value - 1,
            ..result.forecasts[3]
        };

        let err = merge(&series, &result).unwrap_err();
        assert!(matches!(err, ForecastError::InvariantViolation(_)));
    }

    #[test]
    fn test_merge_accepts_off_cadence_dates() {
        let series = history(5);
        let mut result = result_after(&series);
        for entry in &mut result.forecasts {
            entry.date += Duration::days(2);
        }

        let merged = merge(&series, &result).unwrap();
        assert_eq!(merged.len(), 9);
    }
}
