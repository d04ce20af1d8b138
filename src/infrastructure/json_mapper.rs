// Mapper to convert domain models to JSON wire types
use crate::domain::dashboard::Dashboard;
use crate::domain::forecast::ForecastInsight;
use crate::domain::series::{Series, SeriesPoint};
use crate::domain::subject::Subject;
use serde::Serialize;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SubjectDto {
    pub id: String,
    pub name: String,
    pub unit: String,
    pub description: String,
    pub color: String,
    pub weather_factor: String,
}

/// Flattened point: exactly one of `actual` / `forecast` is non-null.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SeriesPointDto {
    pub date: String,
    pub actual: Option<u32>,
    pub forecast: Option<u32>,
    pub ci_lower: Option<u32>,
    pub ci_upper: Option<u32>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InsightDto {
    pub explanation: String,
    pub academic_framing: String,
    pub environmental_driver: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardDto {
    pub title: String,
    pub subject: SubjectDto,
    pub series: Vec<SeriesPointDto>,
    pub boundary_date: Option<String>,
    pub latest_actual: Option<u32>,
    pub horizon_weeks: usize,
    pub forecast_pending: bool,
    pub can_forecast: bool,
    pub insight: Option<InsightDto>,
}

pub fn dashboard_to_dto(dashboard: Dashboard) -> DashboardDto {
    let can_forecast = dashboard.can_forecast();
    let boundary_date = dashboard
        .series
        .boundary_date()
        .map(|d| d.format("%Y-%m-%d").to_string());
    let latest_actual = dashboard.series.latest_actual();

    DashboardDto {
        title: dashboard.title,
        subject: subject_to_dto(&dashboard.subject),
        series: series_to_dto(&dashboard.series),
        boundary_date,
        latest_actual,
        horizon_weeks: dashboard.horizon_weeks,
        forecast_pending: dashboard.forecast_pending,
        can_forecast,
        insight: dashboard.insight.map(insight_to_dto),
    }
}

pub fn subject_to_dto(subject: &Subject) -> SubjectDto {
    SubjectDto {
        id: subject.id.clone(),
        name: subject.name.clone(),
        unit: subject.unit.clone(),
        description: subject.description.clone(),
        color: subject.color.clone(),
        weather_factor: subject.weather_factor.clone(),
    }
}

pub fn series_to_dto(series: &Series) -> Vec<SeriesPointDto> {
    series.points().iter().map(point_to_dto).collect()
}

fn point_to_dto(point: &SeriesPoint) -> SeriesPointDto {
    let band = point.confidence_band();
    SeriesPointDto {
        date: point.date().format("%Y-%m-%d").to_string(),
        actual: point.actual(),
        forecast: point.forecast(),
        ci_lower: band.map(|(lower, _)| lower),
        ci_upper: band.map(|(_, upper)| upper),
    }
}

fn insight_to_dto(insight: ForecastInsight) -> InsightDto {
    InsightDto {
        explanation: insight.explanation,
        academic_framing: insight.academic_framing,
        environmental_driver: insight.environmental_driver,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::series::{ForecastPoint, HistoricalPoint};
    use crate::domain::subject::fixtures::dengue;
    use chrono::NaiveDate;
    use serde_json::json;

    #[test]
    fn test_points_flatten_to_nullable_fields() {
        let series = Series::from_points(vec![
            HistoricalPoint::new(NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(), 120).into(),
            ForecastPoint::new(NaiveDate::from_ymd_opt(2024, 1, 8).unwrap(), 130, 110, 150)
                .unwrap()
                .into(),
        ])
        .unwrap();

        let value = serde_json::to_value(series_to_dto(&series)).unwrap();
        assert_eq!(
            value,
            json!([
                { "date": "2024-01-01", "actual": 120, "forecast": null, "ciLower": null, "ciUpper": null },
                { "date": "2024-01-08", "actual": null, "forecast": 130, "ciLower": 110, "ciUpper": 150 }
            ])
        );
    }

    #[test]
    fn test_dashboard_summary_fields() {
        let series = Series::from_points(vec![
            HistoricalPoint::new(NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(), 120).into(),
            HistoricalPoint::new(NaiveDate::from_ymd_opt(2024, 1, 8).unwrap(), 135).into(),
        ])
        .unwrap();
        let dto = dashboard_to_dto(Dashboard::new(dengue(), series, 4, false, None));
        let value = serde_json::to_value(&dto).unwrap();

        assert_eq!(value["title"], "Dengue Fever Surveillance");
        assert_eq!(value["boundaryDate"], "2024-01-08");
        assert_eq!(value["latestActual"], 135);
        assert_eq!(value["horizonWeeks"], 4);
        assert_eq!(value["canForecast"], true);
        assert_eq!(value["insight"], serde_json::Value::Null);
        assert_eq!(value["subject"]["weatherFactor"], dengue().weather_factor);
    }
}
