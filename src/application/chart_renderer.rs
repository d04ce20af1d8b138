// Chart renderer - Lays out the combined series for display
use crate::domain::chart::{
    AxisTick, BandData, BoundaryMarker, ChartData, LineStyle, PlotArea, PlotPoint, TooltipData,
    TraceData,
};
use crate::domain::series::{Series, SeriesPoint};

pub const ACTUAL_TRACE_NAME: &str = "Actual Cases";
pub const FORECAST_TRACE_NAME: &str = "AI Forecast";
pub const BAND_NAME: &str = "95% Conf. Interval";
pub const BOUNDARY_LABEL: &str = "Today";

const BAND_OPACITY: f64 = 0.1;
const Y_TICK_INTERVALS: u32 = 4;
const X_LABEL_EVERY: usize = 3;

#[derive(Debug, Clone, Copy)]
pub struct ChartLayout {
    pub width: f64,
    pub height: f64,
    pub margin_top: f64,
    pub margin_right: f64,
    pub margin_bottom: f64,
    pub margin_left: f64,
}

impl Default for ChartLayout {
    fn default() -> Self {
        Self {
            width: 900.0,
            height: 450.0,
            margin_top: 30.0,
            margin_right: 30.0,
            margin_bottom: 70.0,
            margin_left: 80.0,
        }
    }
}

impl ChartLayout {
    pub fn with_size(width: f64, height: f64) -> Self {
        Self {
            width,
            height,
            ..Self::default()
        }
    }

    fn plot_area(&self) -> PlotArea {
        PlotArea {
            left: self.margin_left,
            top: self.margin_top,
            width: (self.width - self.margin_left - self.margin_right).max(1.0),
            height: (self.height - self.margin_top - self.margin_bottom).max(1.0),
        }
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct ChartRenderer {
    layout: ChartLayout,
}

impl ChartRenderer {
    pub fn new(layout: ChartLayout) -> Self {
        Self { layout }
    }

    /// Lay out `series` as two traces, a confidence band over the forecast
    /// segment and a boundary marker at the last actual date.
    pub fn render(&self, series: &Series, color: &str, unit: &str) -> ChartData {
        let plot = self.layout.plot_area();
        let scale = Scale::new(plot, series);
        let points = series.points();

        let mut actual = Vec::new();
        let mut forecast = Vec::new();
        let mut band_dates = Vec::new();
        let mut band_upper = Vec::new();
        let mut band_lower = Vec::new();
        let mut tooltips = Vec::with_capacity(points.len());

        for (index, point) in points.iter().enumerate() {
            let x = scale.x(index);
            let date = point.date();

            match point {
                SeriesPoint::Historical(h) => {
                    let y = scale.y(h.actual);
                    actual.push(PlotPoint { date, value: h.actual, x, y });
                    tooltips.push(TooltipData {
                        date,
                        x,
                        y,
                        lines: vec![format!("{}: {}", ACTUAL_TRACE_NAME, h.actual)],
                    });
                }
                SeriesPoint::Forecast(f) => {
                    let y = scale.y(f.forecast());
                    forecast.push(PlotPoint {
                        date,
                        value: f.forecast(),
                        x,
                        y,
                    });
                    band_dates.push(date);
                    band_upper.push((x, scale.y(f.ci_upper())));
                    band_lower.push((x, scale.y(f.ci_lower())));
                    tooltips.push(TooltipData {
                        date,
                        x,
                        y,
                        lines: vec![
                            format!("{}: {}", FORECAST_TRACE_NAME, f.forecast()),
                            format!("95% CI: [{} - {}]", f.ci_lower(), f.ci_upper()),
                        ],
                    });
                }
            }
        }

        let band = (!band_dates.is_empty()).then(|| BandData {
            name: BAND_NAME.to_string(),
            color: color.to_string(),
            opacity: BAND_OPACITY,
            dates: band_dates,
            upper: band_upper,
            lower: band_lower,
        });

        // The marker only separates two segments; a purely historical series has none
        let boundary = if series.has_forecast() {
            points
                .iter()
                .rposition(|p| !p.is_forecast())
                .map(|index| BoundaryMarker {
                    date: points[index].date(),
                    x: scale.x(index),
                    label: BOUNDARY_LABEL.to_string(),
                })
        } else {
            None
        };

        let x_ticks = points
            .iter()
            .enumerate()
            .filter(|(index, _)| index % X_LABEL_EVERY == 0)
            .map(|(index, p)| AxisTick {
                label: p.date().format("%Y-%m-%d").to_string(),
                position: scale.x(index),
            })
            .collect();

        let y_ticks = (0..=Y_TICK_INTERVALS)
            .map(|i| {
                let value = scale.step * f64::from(i);
                AxisTick {
                    label: format_tick(value),
                    position: scale.y_f64(value),
                }
            })
            .collect();

        ChartData {
            width: self.layout.width,
            height: self.layout.height,
            plot,
            unit: unit.to_string(),
            x_ticks,
            y_ticks,
            band,
            actual: TraceData {
                name: ACTUAL_TRACE_NAME.to_string(),
                color: color.to_string(),
                style: LineStyle::Solid,
                points: actual,
            },
            forecast: TraceData {
                name: FORECAST_TRACE_NAME.to_string(),
                color: color.to_string(),
                style: LineStyle::Dashed,
                points: forecast,
            },
            boundary,
            tooltips,
        }
    }
}

/// Category x-axis (one slot per point) and linear y-axis from zero.
struct Scale {
    plot: PlotArea,
    count: usize,
    step: f64,
    y_max: f64,
}

impl Scale {
    fn new(plot: PlotArea, series: &Series) -> Self {
        let max_value = series
            .points()
            .iter()
            .map(|p| match p.confidence_band() {
                Some((_, upper)) => upper,
                None => p.actual().unwrap_or(0),
            })
            .max()
            .unwrap_or(0);

        let step = nice_step(f64::from(max_value) / f64::from(Y_TICK_INTERVALS));
        Self {
            plot,
            count: series.len(),
            step,
            y_max: step * f64::from(Y_TICK_INTERVALS),
        }
    }

    fn x(&self, index: usize) -> f64 {
        let slot = self.plot.width / self.count.max(1) as f64;
        self.plot.left + slot * (index as f64 + 0.5)
    }

    fn y(&self, value: u32) -> f64 {
        self.y_f64(f64::from(value))
    }

    fn y_f64(&self, value: f64) -> f64 {
        self.plot.bottom() - value / self.y_max * self.plot.height
    }
}

/// Smallest of 1, 2, 2.5, 5 x 10^k that is at least `raw`; 2.5 for empty data.
fn nice_step(raw: f64) -> f64 {
    if raw <= 0.0 || !raw.is_finite() {
        return 2.5;
    }
    let magnitude = 10f64.powf(raw.log10().floor());
    [1.0, 2.0, 2.5, 5.0, 10.0]
        .iter()
        .map(|m| m * magnitude)
        .find(|candidate| *candidate >= raw)
        .unwrap_or(10.0 * magnitude)
}

fn format_tick(value: f64) -> String {
    if (value - value.round()).abs() < 1e-6 {
        format!("{}", value.round() as i64)
    } else {
        format!("{:.2}", value)
            .trim_end_matches('0')
            .trim_end_matches('.')
            .to_string()
    }
}
