// Dashboard domain model
use super::forecast::ForecastInsight;
use super::series::Series;
use super::subject::Subject;

#[derive(Debug, Clone)]
pub struct Dashboard {
    pub title: String,
    pub subject: Subject,
    pub series: Series,
    pub horizon_weeks: usize,
    pub forecast_pending: bool,
    pub insight: Option<ForecastInsight>,
}

impl Dashboard {
    pub fn new(
        subject: Subject,
        series: Series,
        horizon_weeks: usize,
        forecast_pending: bool,
        insight: Option<ForecastInsight>,
    ) -> Self {
        let title = format!("{} Surveillance", subject.name);
        Self {
            title,
            subject,
            series,
            horizon_weeks,
            forecast_pending,
            insight,
        }
    }

    /// The forecast trigger is disabled while a call is outstanding and once
    /// the series already carries forecast points.
    pub fn can_forecast(&self) -> bool {
        !self.forecast_pending && !self.series.has_forecast()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::series::{ForecastPoint, HistoricalPoint, SeriesPoint};
    use crate::domain::subject::fixtures::dengue;
    use chrono::NaiveDate;

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 1, d).unwrap()
    }

    #[test]
    fn test_title_and_forecast_gate() {
        let historical = Series::from_points(vec![HistoricalPoint::new(day(1), 5).into()]).unwrap();
        let dashboard = Dashboard::new(dengue(), historical.clone(), 4, false, None);
        assert_eq!(dashboard.title, "Dengue Fever Surveillance");
        assert!(dashboard.can_forecast());

        let pending = Dashboard::new(dengue(), historical.clone(), 4, true, None);
        assert!(!pending.can_forecast());

        let forecasted = Series::from_points(vec![
            HistoricalPoint::new(day(1), 5).into(),
            SeriesPoint::Forecast(ForecastPoint::new(day(8), 6, 4, 8).unwrap()),
        ])
        .unwrap();
        let done = Dashboard::new(dengue(), forecasted, 4, false, None);
        assert!(!done.can_forecast());
    }
}
