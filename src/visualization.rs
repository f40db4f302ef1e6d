/// Visualization module: self-contained HTML fragments for the four charts.
///
/// Produces HTML strings with inline JS that handle:
/// - Heat map: weighted radial-gradient circles on a lon/lat plane, with a
///   toggle revealing the underlying data table
/// - Trend: two-series line chart (national vs selected prefecture)
/// - Bubble: animated scatter, one frame per year, grouped by age bracket
/// - Bar: animated horizontal bars, one frame per age bracket
///
/// All SVG rendering is done client-side by wage_charts.js. This module
/// extracts data from DataFrames, serializes to JSON, and emits the HTML
/// shells the host embeds verbatim.
use std::fmt::Write as FmtWrite;

use polars::prelude::*;

use crate::error::WageError;
use crate::schema::{category, derived, location, prefecture, wage};
use crate::views::{BarView, WageField};

const CHARTS_JS: &str = include_str!("wage_charts.js");

// ── Config ──────────────────────────────────────────────────────────────────

/// Heat-map rendering parameters. Defaults center the view on Tokyo.
pub struct MapChartConfig {
    pub center_lon: f64,
    pub center_lat: f64,
    pub zoom: f64,
    /// Fill opacity of the heat circles.
    pub opacity: f64,
    /// Weights below this value are not drawn.
    pub threshold: f64,
    pub width: u32,
    pub height: u32,
}

impl Default for MapChartConfig {
    fn default() -> Self {
        Self {
            center_lon: 139.691648,
            center_lat: 35.689185,
            zoom: 4.0,
            opacity: 0.4,
            threshold: 0.3,
            width: 800,
            height: 560,
        }
    }
}

pub struct TrendChartConfig {
    pub width: u32,
    pub height: u32,
}

impl Default for TrendChartConfig {
    fn default() -> Self {
        Self {
            width: 800,
            height: 420,
        }
    }
}

/// Bubble-chart rendering parameters. The axis ranges are fixed so the
/// animation frames share one coordinate system.
pub struct BubbleChartConfig {
    pub x_range: (f64, f64),
    pub y_range: (f64, f64),
    pub size_max: f64,
    pub width: u32,
    pub height: u32,
}

impl Default for BubbleChartConfig {
    fn default() -> Self {
        Self {
            x_range: (150.0, 700.0),
            y_range: (0.0, 150.0),
            size_max: 38.0,
            width: 800,
            height: 480,
        }
    }
}

pub struct BarChartConfig {
    pub width: u32,
    pub height: u32,
}

impl Default for BarChartConfig {
    fn default() -> Self {
        Self {
            width: 800,
            height: 500,
        }
    }
}

// ── Intermediate data structures ────────────────────────────────────────────

struct MapPoint {
    prefecture: String,
    lon: f64,
    lat: f64,
    wage: f64,
    weight: f64,
}

struct TrendPoint {
    year: i64,
    national: f64,
    prefecture: f64,
}

struct BubblePoint {
    year: i64,
    bracket: String,
    per_capita: f64,
    special: f64,
    scheduled: f64,
}

struct BarRow {
    industry: String,
    bracket: String,
    value: f64,
}

// ── Data extraction ─────────────────────────────────────────────────────────

fn extract_map_points(view: &DataFrame) -> Result<Vec<MapPoint>, WageError> {
    let names = view.column(prefecture::PREFECTURE_NAME)?.str()?;
    let lons = view.column(location::LONGITUDE)?.f64()?;
    let lats = view.column(location::LATITUDE)?.f64()?;
    let wages = view.column(wage::PER_CAPITA_WAGE)?.f64()?;
    let weights = view.column(derived::NORMALIZED_WAGE)?.f64()?;

    let mut points = Vec::with_capacity(view.height());
    for i in 0..view.height() {
        points.push(MapPoint {
            prefecture: names.get(i).unwrap_or("").to_string(),
            lon: lons.get(i).unwrap_or(0.0),
            lat: lats.get(i).unwrap_or(0.0),
            wage: wages.get(i).unwrap_or(0.0),
            weight: weights.get(i).unwrap_or(0.0),
        });
    }
    Ok(points)
}

fn extract_trend_points(view: &DataFrame) -> Result<Vec<TrendPoint>, WageError> {
    let years = view.column(wage::YEAR)?.i64()?;
    let national = view.column(derived::NATIONAL_WAGE)?.f64()?;
    let prefecture = view.column(derived::PREFECTURE_WAGE)?.f64()?;

    let mut points = Vec::with_capacity(view.height());
    for i in 0..view.height() {
        points.push(TrendPoint {
            year: years.get(i).unwrap_or(0),
            national: national.get(i).unwrap_or(0.0),
            prefecture: prefecture.get(i).unwrap_or(0.0),
        });
    }
    Ok(points)
}

fn extract_bubble_points(view: &DataFrame) -> Result<Vec<BubblePoint>, WageError> {
    let years = view.column(wage::YEAR)?.i64()?;
    let brackets = view.column(wage::AGE_BRACKET)?.str()?;
    let per_capita = view.column(wage::PER_CAPITA_WAGE)?.f64()?;
    let special = view.column(wage::SPECIAL_WAGE)?.f64()?;
    let scheduled = view.column(wage::SCHEDULED_WAGE)?.f64()?;

    let mut points = Vec::with_capacity(view.height());
    for i in 0..view.height() {
        points.push(BubblePoint {
            year: years.get(i).unwrap_or(0),
            bracket: brackets.get(i).unwrap_or("").to_string(),
            per_capita: per_capita.get(i).unwrap_or(0.0),
            special: special.get(i).unwrap_or(0.0),
            scheduled: scheduled.get(i).unwrap_or(0.0),
        });
    }
    Ok(points)
}

fn extract_bar_rows(view: &BarView, field: WageField) -> Result<Vec<BarRow>, WageError> {
    let industries = view.frame.column(category::INDUSTRY_CATEGORY)?.str()?;
    let brackets = view.frame.column(wage::AGE_BRACKET)?.str()?;
    let values = view.frame.column(field.column())?.f64()?;

    let mut rows = Vec::with_capacity(view.frame.height());
    for i in 0..view.frame.height() {
        rows.push(BarRow {
            industry: industries.get(i).unwrap_or("").to_string(),
            bracket: brackets.get(i).unwrap_or("").to_string(),
            value: values.get(i).unwrap_or(0.0),
        });
    }
    Ok(rows)
}

// ── HTML generation ─────────────────────────────────────────────────────────

/// Heat map over prefecture coordinates, weighted by the normalized wage.
///
/// The shell carries a "Show data" toggle that reveals the joined table,
/// mirroring the dashboard's DataFrame checkbox.
pub fn generate_map_html(
    view: &DataFrame,
    config: &MapChartConfig,
) -> Result<String, WageError> {
    let points = extract_map_points(view)?;
    if points.is_empty() {
        return Ok("<div>No wage rows to visualize.</div>".to_string());
    }

    let html = format!(
        r##"<div style="position:relative; width:100%; border:1px solid #dee2e6; border-radius:4px; background:#fff;">
  <div style="padding:4px 8px; border-bottom:1px solid #dee2e6; font-family:sans-serif; font-size:12px; color:#495057; display:flex; align-items:center; gap:8px;">
    <span style="font-weight:600;">Per-capita wage heat map</span>
    <button onclick="WageCharts.toggleTable('wd-map')" style="cursor:pointer; padding:2px 8px;">Show data</button>
  </div>
  <svg id="wd-map-svg" xmlns="http://www.w3.org/2000/svg" width="{width}" height="{height}">
    <style>
      .map-point {{ cursor: pointer; }}
      .map-label {{ font-family: sans-serif; font-size: 10px; fill: #868e96; }}
    </style>
  </svg>
  <div id="wd-map-table" style="display:none; max-height:320px; overflow:auto; border-top:1px solid #dee2e6;"></div>
</div>
<script>
{charts_js}
WageCharts.heatMap({{
  target: "wd-map",
  width: {width}, height: {height},
  centerLon: {center_lon}, centerLat: {center_lat},
  zoom: {zoom}, opacity: {opacity}, threshold: {threshold},
  points: {points_json}
}});
</script>"##,
        width = config.width,
        height = config.height,
        center_lon = config.center_lon,
        center_lat = config.center_lat,
        zoom = config.zoom,
        opacity = config.opacity,
        threshold = config.threshold,
        points_json = map_points_to_json(&points),
        charts_js = CHARTS_JS,
    );
    Ok(html)
}

/// Two-series line chart: national average vs the selected prefecture.
pub fn generate_trend_html(
    view: &DataFrame,
    selected_prefecture: &str,
    config: &TrendChartConfig,
) -> Result<String, WageError> {
    let points = extract_trend_points(view)?;
    if points.is_empty() {
        return Ok("<div>No wage rows to visualize.</div>".to_string());
    }

    let html = format!(
        r##"<div style="position:relative; width:100%; border:1px solid #dee2e6; border-radius:4px; background:#fff;">
  <div style="padding:4px 8px; border-bottom:1px solid #dee2e6; font-family:sans-serif; font-size:12px; color:#495057;">
    <span style="font-weight:600;">Per-capita wage by year: national vs {prefecture}</span>
  </div>
  <svg id="wd-trend-svg" xmlns="http://www.w3.org/2000/svg" width="{width}" height="{height}">
    <style>
      .axis-line {{ stroke: #adb5bd; stroke-width: 1; }}
      .axis-label {{ font-family: sans-serif; font-size: 10px; fill: #868e96; }}
      .series-label {{ font-family: sans-serif; font-size: 11px; }}
    </style>
  </svg>
</div>
<script>
{charts_js}
WageCharts.lineChart({{
  target: "wd-trend",
  width: {width}, height: {height},
  prefecture: "{prefecture}",
  points: {points_json}
}});
</script>"##,
        width = config.width,
        height = config.height,
        prefecture = escape_json(selected_prefecture),
        points_json = trend_points_to_json(&points),
        charts_js = CHARTS_JS,
    );
    Ok(html)
}

/// Animated bubble chart: one frame per year, one bubble per age bracket.
pub fn generate_bubble_html(
    view: &DataFrame,
    config: &BubbleChartConfig,
) -> Result<String, WageError> {
    let points = extract_bubble_points(view)?;
    if points.is_empty() {
        return Ok("<div>No wage rows to visualize.</div>".to_string());
    }

    let html = format!(
        r##"<div style="position:relative; width:100%; border:1px solid #dee2e6; border-radius:4px; background:#fff;">
  <div style="padding:4px 8px; border-bottom:1px solid #dee2e6; font-family:sans-serif; font-size:12px; color:#495057; display:flex; align-items:center; gap:8px;">
    <span style="font-weight:600;">National per-capita wage by age bracket</span>
    <button onclick="WageCharts.play('wd-bubble')" style="cursor:pointer; padding:2px 8px;">Play</button>
    <button onclick="WageCharts.pause('wd-bubble')" style="cursor:pointer; padding:2px 8px;">Pause</button>
    <span id="wd-bubble-frame-label" style="color:#868e96; font-size:11px;"></span>
  </div>
  <svg id="wd-bubble-svg" xmlns="http://www.w3.org/2000/svg" width="{width}" height="{height}">
    <style>
      .axis-line {{ stroke: #adb5bd; stroke-width: 1; }}
      .axis-label {{ font-family: sans-serif; font-size: 10px; fill: #868e96; }}
      .bubble {{ stroke: #fff; stroke-width: 1; cursor: pointer; }}
    </style>
  </svg>
  <input id="wd-bubble-slider" type="range" min="0" value="0" step="1" style="width:100%; margin:0;" />
</div>
<script>
{charts_js}
WageCharts.bubbleChart({{
  target: "wd-bubble",
  width: {width}, height: {height},
  xRange: [{x_lo}, {x_hi}], yRange: [{y_lo}, {y_hi}],
  sizeMax: {size_max},
  points: {points_json}
}});
</script>"##,
        width = config.width,
        height = config.height,
        x_lo = config.x_range.0,
        x_hi = config.x_range.1,
        y_lo = config.y_range.0,
        y_hi = config.y_range.1,
        size_max = config.size_max,
        points_json = bubble_points_to_json(&points),
        charts_js = CHARTS_JS,
    );
    Ok(html)
}

/// Animated horizontal bar chart: one frame per age bracket, one bar per
/// industry category, x-axis fixed to the view's derived bound.
pub fn generate_bar_html(
    view: &BarView,
    field: WageField,
    config: &BarChartConfig,
) -> Result<String, WageError> {
    let rows = extract_bar_rows(view, field)?;
    if rows.is_empty() {
        return Ok("<div>No wage rows to visualize.</div>".to_string());
    }

    let html = format!(
        r##"<div style="position:relative; width:100%; border:1px solid #dee2e6; border-radius:4px; background:#fff;">
  <div style="padding:4px 8px; border-bottom:1px solid #dee2e6; font-family:sans-serif; font-size:12px; color:#495057; display:flex; align-items:center; gap:8px;">
    <span style="font-weight:600;">Wage by industry category</span>
    <button onclick="WageCharts.play('wd-bar')" style="cursor:pointer; padding:2px 8px;">Play</button>
    <button onclick="WageCharts.pause('wd-bar')" style="cursor:pointer; padding:2px 8px;">Pause</button>
    <span id="wd-bar-frame-label" style="color:#868e96; font-size:11px;"></span>
  </div>
  <svg id="wd-bar-svg" xmlns="http://www.w3.org/2000/svg" width="{width}" height="{height}">
    <style>
      .axis-line {{ stroke: #adb5bd; stroke-width: 1; }}
      .axis-label {{ font-family: sans-serif; font-size: 10px; fill: #868e96; }}
      .bar-label {{ font-family: sans-serif; font-size: 11px; fill: #495057; text-anchor: end; }}
      .bar-rect {{ cursor: pointer; }}
    </style>
  </svg>
  <input id="wd-bar-slider" type="range" min="0" value="0" step="1" style="width:100%; margin:0;" />
</div>
<script>
{charts_js}
WageCharts.barChart({{
  target: "wd-bar",
  width: {width}, height: {height},
  axisBound: {axis_bound},
  valueLabel: "{value_label}",
  rows: {rows_json}
}});
</script>"##,
        width = config.width,
        height = config.height,
        axis_bound = view.axis_bound,
        value_label = escape_json(field.column()),
        rows_json = bar_rows_to_json(&rows),
        charts_js = CHARTS_JS,
    );
    Ok(html)
}

// ── JSON serialization helpers ──────────────────────────────────────────────

fn map_points_to_json(points: &[MapPoint]) -> String {
    let mut s = String::from("[");
    for (i, p) in points.iter().enumerate() {
        if i > 0 {
            s.push(',');
        }
        write!(
            s,
            r##"{{"prefecture":"{}","lon":{},"lat":{},"wage":{},"weight":{}}}"##,
            escape_json(&p.prefecture),
            p.lon,
            p.lat,
            p.wage,
            p.weight,
        )
        .unwrap();
    }
    s.push(']');
    s
}

fn trend_points_to_json(points: &[TrendPoint]) -> String {
    let mut s = String::from("[");
    for (i, p) in points.iter().enumerate() {
        if i > 0 {
            s.push(',');
        }
        write!(
            s,
            r##"{{"year":{},"national":{},"prefecture":{}}}"##,
            p.year, p.national, p.prefecture,
        )
        .unwrap();
    }
    s.push(']');
    s
}

fn bubble_points_to_json(points: &[BubblePoint]) -> String {
    let mut s = String::from("[");
    for (i, p) in points.iter().enumerate() {
        if i > 0 {
            s.push(',');
        }
        write!(
            s,
            r##"{{"year":{},"bracket":"{}","perCapita":{},"special":{},"scheduled":{}}}"##,
            p.year,
            escape_json(&p.bracket),
            p.per_capita,
            p.special,
            p.scheduled,
        )
        .unwrap();
    }
    s.push(']');
    s
}

fn bar_rows_to_json(rows: &[BarRow]) -> String {
    let mut s = String::from("[");
    for (i, r) in rows.iter().enumerate() {
        if i > 0 {
            s.push(',');
        }
        write!(
            s,
            r##"{{"industry":"{}","bracket":"{}","value":{}}}"##,
            escape_json(&r.industry),
            escape_json(&r.bracket),
            r.value,
        )
        .unwrap();
    }
    s.push(']');
    s
}

fn escape_json(s: &str) -> String {
    s.replace('\\', "\\\\")
        .replace('"', "\\\"")
        .replace('\n', "\\n")
        .replace('\r', "\\r")
        .replace('\t', "\\t")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::age;
    use crate::views;
    use polars::df;

    fn map_view() -> DataFrame {
        let prefectures = df!(
            wage::YEAR => [2019i64, 2019],
            wage::AGE_BRACKET => [age::ALL_AGES, age::ALL_AGES],
            prefecture::PREFECTURE_NAME => ["Tokyo", "Osaka"],
            wage::PER_CAPITA_WAGE => [620.0, 520.0],
        )
        .unwrap();
        let locations = df!(
            prefecture::PREFECTURE_NAME => ["Tokyo", "Osaka"],
            location::LATITUDE => [35.689185, 34.686316],
            location::LONGITUDE => [139.691648, 135.519711],
        )
        .unwrap();
        views::build_map_view(&prefectures, &locations, 2019, age::ALL_AGES).unwrap()
    }

    #[test]
    fn map_html_embeds_points_and_controls() {
        let html = generate_map_html(&map_view(), &MapChartConfig::default()).unwrap();
        assert!(html.contains(r#""prefecture":"Tokyo""#));
        assert!(html.contains("WageCharts.heatMap"));
        assert!(html.contains("Show data"));
        assert!(html.contains("\"threshold\": 0.3") || html.contains("threshold: 0.3"));
    }

    #[test]
    fn empty_views_render_placeholder() {
        let empty = df!(
            prefecture::PREFECTURE_NAME => Vec::<String>::new(),
            location::LONGITUDE => Vec::<f64>::new(),
            location::LATITUDE => Vec::<f64>::new(),
            wage::PER_CAPITA_WAGE => Vec::<f64>::new(),
            derived::NORMALIZED_WAGE => Vec::<f64>::new(),
        )
        .unwrap();
        let html = generate_map_html(&empty, &MapChartConfig::default()).unwrap();
        assert_eq!(html, "<div>No wage rows to visualize.</div>");
    }

    #[test]
    fn trend_html_names_the_prefecture() {
        let view = df!(
            wage::YEAR => [2018i64, 2019],
            derived::NATIONAL_WAGE => [490.0, 500.0],
            derived::PREFECTURE_WAGE => [600.0, 620.0],
        )
        .unwrap();
        let html = generate_trend_html(&view, "Tokyo", &TrendChartConfig::default()).unwrap();
        assert!(html.contains("national vs Tokyo"));
        assert!(html.contains(r#""year":2018"#));
        assert!(html.contains("WageCharts.lineChart"));
    }

    #[test]
    fn bar_html_carries_axis_bound() {
        let frame = df!(
            category::INDUSTRY_CATEGORY => ["Construction", "Medical"],
            wage::AGE_BRACKET => ["all_ages", "all_ages"],
            wage::PER_CAPITA_WAGE => [510.0, 470.0],
        )
        .unwrap();
        let view = BarView {
            frame,
            axis_bound: 560.0,
        };
        let html =
            generate_bar_html(&view, WageField::PerCapita, &BarChartConfig::default()).unwrap();
        assert!(html.contains("axisBound: 560"));
        assert!(html.contains(r#""industry":"Construction""#));
    }

    #[test]
    fn bubble_html_embeds_frames() {
        let view = df!(
            wage::YEAR => [2018i64, 2019],
            wage::AGE_BRACKET => ["25_29", "25_29"],
            wage::PER_CAPITA_WAGE => [380.0, 390.0],
            wage::SPECIAL_WAGE => [60.0, 62.0],
            wage::SCHEDULED_WAGE => [300.0, 305.0],
        )
        .unwrap();
        let html = generate_bubble_html(&view, &BubbleChartConfig::default()).unwrap();
        assert!(html.contains(r#""bracket":"25_29""#));
        assert!(html.contains("WageCharts.bubbleChart"));
        assert!(html.contains("sizeMax: 38"));
    }
}
