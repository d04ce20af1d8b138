// Synthetic surveillance history
use crate::domain::series::{HistoricalPoint, Series, SeriesPoint};
use crate::domain::subject::Subject;
use chrono::{Duration, NaiveDate};
use rand::Rng;

pub const DEFAULT_HISTORY_WEEKS: u32 = 26;

#[derive(Debug, Clone, Copy)]
pub struct SeriesGenerator {
    weeks: u32,
}

impl Default for SeriesGenerator {
    fn default() -> Self {
        Self::new(DEFAULT_HISTORY_WEEKS)
    }
}

impl SeriesGenerator {
    pub fn new(weeks: u32) -> Self {
        Self { weeks }
    }

    /// Generate `weeks + 1` weekly points ending at `today`, oldest first.
    ///
    /// Each count is `base + seasonal + noise + trend`, rounded and clamped at 0.
    pub fn generate<R: Rng + ?Sized>(&self, subject: &Subject, today: NaiveDate, rng: &mut R) -> Series {
        let base = subject.base_magnitude;
        let noise_amplitude = 0.1 * base;

        let points = (0..=self.weeks)
            .map(|index| {
                let weeks_back = i64::from(self.weeks - index);
                let date = today - Duration::weeks(weeks_back);

                let i = f64::from(index);
                let seasonal = (i / 4.0).sin() * 0.4 * base;
                let noise = if noise_amplitude > 0.0 {
                    rng.gen_range(-noise_amplitude..=noise_amplitude)
                } else {
                    0.0
                };
                let trend = i * 0.02 * base;

                let count = (base + seasonal + noise + trend).round().max(0.0);
                SeriesPoint::Historical(HistoricalPoint::new(date, count as u32))
            })
            .collect::<Vec<_>>();

        tracing::debug!(
            subject = %subject.id,
            points = points.len(),
            "generated synthetic history"
        );

        // Dates are built strictly ascending and all points are historical
        Series::from_points(points).unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::subject::fixtures::{dengue, influenza};
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 6, 30).unwrap()
    }

    #[test]
    fn test_generates_weekly_points_ending_today() {
        let mut rng = StdRng::seed_from_u64(7);
        let series = SeriesGenerator::default().generate(&dengue(), today(), &mut rng);

        assert_eq!(series.len(), 27);
        assert_eq!(series.points().last().unwrap().date(), today());
        assert_eq!(
            series.points().first().unwrap().date(),
            today() - Duration::weeks(26)
        );

        for pair in series.points().windows(2) {
            assert_eq!(pair[1].date() - pair[0].date(), Duration::days(7));
        }
    }

    #[test]
    fn test_generated_points_are_historical_only() {
        let mut rng = StdRng::seed_from_u64(11);
        let series = SeriesGenerator::new(10).generate(&influenza(), today(), &mut rng);

        assert_eq!(series.len(), 11);
        assert!(!series.has_forecast());
        for point in series.points() {
            assert!(point.actual().is_some());
            assert!(point.forecast().is_none());
            assert!(point.confidence_band().is_none());
        }
    }

    #[test]
    fn test_counts_stay_within_model_envelope() {
        let subject = dengue();
        let base = subject.base_magnitude;

        for seed in 0..20 {
            let mut rng = StdRng::seed_from_u64(seed);
            let series = SeriesGenerator::default().generate(&subject, today(), &mut rng);

            for (index, point) in series.historical().enumerate() {
                let i = index as f64;
                let center = base + (i / 4.0).sin() * 0.4 * base + i * 0.02 * base;
                let actual = f64::from(point.actual);
                // noise is at most 10% of base, plus rounding
                assert!((actual - center).abs() <= 0.1 * base + 0.5, "{actual} vs {center}");
            }
        }
    }

    #[test]
    fn test_counts_never_negative() {
        let mut subject = dengue();
        subject.base_magnitude = 0.0;
        let mut rng = StdRng::seed_from_u64(3);
        let series = SeriesGenerator::default().generate(&subject, today(), &mut rng);

        assert_eq!(series.len(), 27);
        assert!(series.historical().all(|p| p.actual == 0));
    }
}
