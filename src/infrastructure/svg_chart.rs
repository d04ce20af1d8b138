// SVG output for laid-out charts
use crate::application::chart_renderer::BAND_NAME;
use crate::domain::chart::{BandData, ChartData, LineStyle, TraceData};

const AXIS_COLOR: &str = "#94a3b8";
const GRID_COLOR: &str = "#f1f5f9";

/// Serialize a chart as a standalone SVG document.
///
/// Paint order: grid, confidence band, axes, traces, boundary marker, legend.
/// Marker `<title>` elements carry the hover tooltips.
pub fn chart_to_svg(chart: &ChartData) -> String {
    let mut svg = String::with_capacity(16 * 1024);
    let plot = chart.plot;

    svg.push_str(&format!(
        r#"<svg xmlns="http://www.w3.org/2000/svg" width="{w}" height="{h}" viewBox="0 0 {w} {h}" font-family="sans-serif" font-size="11">"#,
        w = chart.width,
        h = chart.height
    ));
    svg.push_str(&format!(
        r##"<rect x="0" y="0" width="{}" height="{}" fill="#ffffff"/>"##,
        chart.width, chart.height
    ));

    svg.push_str(r#"<g class="grid">"#);
    for tick in &chart.y_ticks {
        svg.push_str(&format!(
            r#"<line x1="{:.1}" y1="{:.1}" x2="{:.1}" y2="{:.1}" stroke="{}" stroke-dasharray="3 3"/>"#,
            plot.left,
            tick.position,
            plot.right(),
            tick.position,
            GRID_COLOR
        ));
    }
    svg.push_str("</g>");

    if let Some(band) = &chart.band {
        svg.push_str(&band_polygon(band));
    }

    svg.push_str(r#"<g class="axes">"#);
    svg.push_str(&format!(
        r#"<line x1="{l:.1}" y1="{b:.1}" x2="{r:.1}" y2="{b:.1}" stroke="{c}"/><line x1="{l:.1}" y1="{t:.1}" x2="{l:.1}" y2="{b:.1}" stroke="{c}"/>"#,
        l = plot.left,
        r = plot.right(),
        t = plot.top,
        b = plot.bottom(),
        c = AXIS_COLOR
    ));
    for tick in &chart.y_ticks {
        svg.push_str(&format!(
            r#"<text x="{:.1}" y="{:.1}" text-anchor="end" dominant-baseline="middle" fill="{}">{}</text>"#,
            plot.left - 8.0,
            tick.position,
            AXIS_COLOR,
            escape_xml(&tick.label)
        ));
    }
    for tick in &chart.x_ticks {
        svg.push_str(&format!(
            r#"<text x="{:.1}" y="{:.1}" text-anchor="middle" fill="{}">{}</text>"#,
            tick.position,
            plot.bottom() + 18.0,
            AXIS_COLOR,
            escape_xml(&tick.label)
        ));
    }
    let label_x = plot.left - 55.0;
    let label_y = plot.top + plot.height / 2.0;
    svg.push_str(&format!(
        r#"<text x="{x:.1}" y="{y:.1}" text-anchor="middle" transform="rotate(-90 {x:.1} {y:.1})" fill="{c}">{unit}</text>"#,
        x = label_x,
        y = label_y,
        c = AXIS_COLOR,
        unit = escape_xml(&chart.unit)
    ));
    svg.push_str("</g>");

    svg.push_str(&trace_polyline(&chart.actual));
    svg.push_str(&trace_polyline(&chart.forecast));

    svg.push_str(r#"<g class="markers">"#);
    for tooltip in &chart.tooltips {
        let color = if chart.forecast.points.iter().any(|p| p.date == tooltip.date) {
            &chart.forecast.color
        } else {
            &chart.actual.color
        };
        let title = std::iter::once(tooltip.date.format("%Y-%m-%d").to_string())
            .chain(tooltip.lines.iter().cloned())
            .collect::<Vec<_>>()
            .join("\n");
        svg.push_str(&format!(
            r##"<circle cx="{:.1}" cy="{:.1}" r="4" fill="#ffffff" stroke="{}" stroke-width="2"><title>{}</title></circle>"##,
            tooltip.x,
            tooltip.y,
            escape_xml(color),
            escape_xml(&title)
        ));
    }
    svg.push_str("</g>");

    if let Some(boundary) = &chart.boundary {
        svg.push_str(&format!(
            r#"<g class="boundary"><line x1="{x:.1}" y1="{t:.1}" x2="{x:.1}" y2="{b:.1}" stroke="{c}" stroke-dasharray="3 3"/><text x="{x:.1}" y="{ly:.1}" text-anchor="middle" font-size="10" fill="{c}">{label}</text></g>"#,
            x = boundary.x,
            t = plot.top,
            b = plot.bottom(),
            ly = plot.top - 6.0,
            c = AXIS_COLOR,
            label = escape_xml(&boundary.label)
        ));
    }

    svg.push_str(&legend(chart));
    svg.push_str("</svg>");
    svg
}

fn band_polygon(band: &BandData) -> String {
    let points = band
        .upper
        .iter()
        .chain(band.lower.iter().rev())
        .map(|(x, y)| format!("{:.1},{:.1}", x, y))
        .collect::<Vec<_>>()
        .join(" ");

    format!(
        r#"<polygon class="band" points="{}" fill="{}" fill-opacity="{}" stroke="none"><title>{}</title></polygon>"#,
        points,
        escape_xml(&band.color),
        band.opacity,
        escape_xml(&band.name)
    )
}

fn trace_polyline(trace: &TraceData) -> String {
    if trace.points.is_empty() {
        return String::new();
    }

    let points = trace
        .points
        .iter()
        .map(|p| format!("{:.1},{:.1}", p.x, p.y))
        .collect::<Vec<_>>()
        .join(" ");
    let dash = match trace.style {
        LineStyle::Solid => "",
        LineStyle::Dashed => r#" stroke-dasharray="5 5""#,
    };

    format!(
        r#"<polyline class="trace" points="{}" fill="none" stroke="{}" stroke-width="3"{}><title>{}</title></polyline>"#,
        points,
        escape_xml(&trace.color),
        dash,
        escape_xml(&trace.name)
    )
}

fn legend(chart: &ChartData) -> String {
    let y = chart.height - 14.0;
    let mut x = chart.plot.left;
    let mut out = String::from(r#"<g class="legend">"#);

    let entries: [(&str, &str, Option<&str>); 3] = [
        (chart.actual.name.as_str(), chart.actual.color.as_str(), None),
        (chart.forecast.name.as_str(), chart.forecast.color.as_str(), Some("5 5")),
        (
            chart.band.as_ref().map(|b| b.name.as_str()).unwrap_or(BAND_NAME),
            chart.actual.color.as_str(),
            None,
        ),
    ];

    for (i, (name, color, dash)) in entries.iter().enumerate() {
        if i == 2 {
            out.push_str(&format!(
                r#"<rect x="{:.1}" y="{:.1}" width="20" height="10" fill="{}" fill-opacity="0.1"/>"#,
                x,
                y - 5.0,
                escape_xml(color)
            ));
        } else {
            let dash_attr = dash
                .map(|d| format!(r#" stroke-dasharray="{}""#, d))
                .unwrap_or_default();
            out.push_str(&format!(
                r#"<line x1="{:.1}" y1="{:.1}" x2="{:.1}" y2="{:.1}" stroke="{}" stroke-width="3"{}/>"#,
                x,
                y,
                x + 20.0,
                y,
                escape_xml(color),
                dash_attr
            ));
        }
        out.push_str(&format!(
            r#"<text x="{:.1}" y="{:.1}" dominant-baseline="middle" fill="{}">{}</text>"#,
            x + 26.0,
            y,
            AXIS_COLOR,
            escape_xml(name)
        ));
        x += 160.0;
    }

    out.push_str("</g>");
    out
}

fn escape_xml(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&apos;"),
            _ => escaped.push(c),
        }
    }
    escaped
}
