// Chart domain models, in display-surface coordinates
use chrono::NaiveDate;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineStyle {
    Solid,
    Dashed,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PlotPoint {
    pub date: NaiveDate,
    pub value: u32,
    pub x: f64,
    pub y: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TraceData {
    pub name: String,
    pub color: String,
    pub style: LineStyle,
    pub points: Vec<PlotPoint>,
}

/// Shaded region between the lower and upper confidence bounds.
/// `upper` and `lower` run left to right over the same dates.
#[derive(Debug, Clone, PartialEq)]
pub struct BandData {
    pub name: String,
    pub color: String,
    pub opacity: f64,
    pub dates: Vec<NaiveDate>,
    pub upper: Vec<(f64, f64)>,
    pub lower: Vec<(f64, f64)>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct BoundaryMarker {
    pub date: NaiveDate,
    pub x: f64,
    pub label: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct AxisTick {
    pub label: String,
    pub position: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TooltipData {
    pub date: NaiveDate,
    pub x: f64,
    pub y: f64,
    pub lines: Vec<String>,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlotArea {
    pub left: f64,
    pub top: f64,
    pub width: f64,
    pub height: f64,
}

impl PlotArea {
    pub fn right(&self) -> f64 {
        self.left + self.width
    }

    pub fn bottom(&self) -> f64 {
        self.top + self.height
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ChartData {
    pub width: f64,
    pub height: f64,
    pub plot: PlotArea,
    pub unit: String,
    pub x_ticks: Vec<AxisTick>,
    pub y_ticks: Vec<AxisTick>,
    /// Drawn first so it sits beneath both traces
    pub band: Option<BandData>,
    pub actual: TraceData,
    pub forecast: TraceData,
    pub boundary: Option<BoundaryMarker>,
    pub tooltips: Vec<TooltipData>,
}
