//! Geometry for the reports screen's trend line and distribution pie.

use serde::Serialize;

use crate::calc::{DistributionBucket, TrendSeries};

pub const LINE_CHART_HEIGHT: f64 = 150.0;
pub const DEFAULT_LINE_CHART_WIDTH: f64 = 300.0;
const LINE_PADDING_X: f64 = 20.0;
const LINE_BASELINE_Y: f64 = 130.0;
const LINE_SPAN_Y: f64 = 100.0;

pub const PIE_RADIUS: f64 = 60.0;
pub const PIE_CENTER: (f64, f64) = (80.0, 80.0);

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartPoint {
    pub x: f64,
    pub y: f64,
    pub label: String,
    pub value: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LineChart {
    pub width: f64,
    pub height: f64,
    pub points: Vec<ChartPoint>,
    /// SVG `points` attribute.
    pub polyline: String,
}

pub fn line_chart(series: &TrendSeries, width: f64) -> LineChart {
    let values = &series.data;
    let max = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    let min = values.iter().copied().fold(f64::INFINITY, f64::min);
    let range = if values.is_empty() || max - min == 0.0 {
        1.0
    } else {
        max - min
    };
    let steps = values.len().saturating_sub(1).max(1) as f64;

    let points: Vec<ChartPoint> = values
        .iter()
        .enumerate()
        .map(|(i, v)| ChartPoint {
            x: (i as f64 / steps) * (width - 2.0 * LINE_PADDING_X) + LINE_PADDING_X,
            y: LINE_BASELINE_Y - ((v - min) / range) * LINE_SPAN_Y,
            label: series.labels.get(i).cloned().unwrap_or_default(),
            value: *v,
        })
        .collect();
    let polyline = points
        .iter()
        .map(|p| format!("{},{}", fmt_num(p.x), fmt_num(p.y)))
        .collect::<Vec<_>>()
        .join(" ");

    LineChart {
        width,
        height: LINE_CHART_HEIGHT,
        points,
        polyline,
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PieSlice {
    pub name: String,
    pub count: u32,
    pub color: String,
    pub start_angle: f64,
    pub end_angle: f64,
    /// SVG path `d` attribute.
    pub path: String,
}

fn polar(angle_deg: f64) -> (f64, f64) {
    let rad = (angle_deg - 90.0).to_radians();
    (
        PIE_CENTER.0 + PIE_RADIUS * rad.cos(),
        PIE_CENTER.1 + PIE_RADIUS * rad.sin(),
    )
}

pub fn pie_slices(buckets: &[DistributionBucket]) -> Vec<PieSlice> {
    let total: u32 = buckets.iter().map(|b| b.count).sum();
    if total == 0 {
        return Vec::new();
    }
    let mut current = 0.0;
    buckets
        .iter()
        .map(|b| {
            let angle = b.count as f64 / total as f64 * 360.0;
            let start = current;
            let end = current + angle;
            current = end;
            let (sx, sy) = polar(start);
            let (ex, ey) = polar(end);
            let large_arc = if angle > 180.0 { 1 } else { 0 };
            PieSlice {
                name: b.name.clone(),
                count: b.count,
                color: b.color.clone(),
                start_angle: start,
                end_angle: end,
                path: format!(
                    "M {} {} L {} {} A {} {} 0 {} 1 {} {} Z",
                    fmt_num(PIE_CENTER.0),
                    fmt_num(PIE_CENTER.1),
                    fmt_num(sx),
                    fmt_num(sy),
                    fmt_num(PIE_RADIUS),
                    fmt_num(PIE_RADIUS),
                    large_arc,
                    fmt_num(ex),
                    fmt_num(ey)
                ),
            }
        })
        .collect()
}

/// Two decimals, trailing zeros trimmed.
fn fmt_num(v: f64) -> String {
    let s = format!("{:.2}", v);
    let s = s.trim_end_matches('0').trim_end_matches('.');
    if s == "-0" {
        "0".to_string()
    } else {
        s.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn series(data: Vec<f64>) -> TrendSeries {
        TrendSeries {
            labels: (0..data.len()).map(|i| format!("M{i}")).collect(),
            data,
        }
    }

    fn bucket(name: &str, count: u32) -> DistributionBucket {
        DistributionBucket {
            name: name.to_string(),
            count,
            color: "#000".to_string(),
        }
    }

    #[test]
    fn line_points_span_padding_and_height() {
        let chart = line_chart(&series(vec![80.0, 90.0, 85.0]), 300.0);
        let p = &chart.points;
        assert_eq!((p[0].x, p[0].y), (20.0, 130.0));
        assert_eq!((p[1].x, p[1].y), (150.0, 30.0));
        assert_eq!((p[2].x, p[2].y), (280.0, 80.0));
        assert_eq!(chart.polyline, "20,130 150,30 280,80");
        assert_eq!(p[1].label, "M1");
    }

    #[test]
    fn flat_and_single_value_series_do_not_divide_by_zero() {
        let flat = line_chart(&series(vec![70.0, 70.0]), 300.0);
        assert!(flat.points.iter().all(|p| p.y == 130.0));

        let single = line_chart(&series(vec![42.0]), 300.0);
        assert_eq!(single.points[0].x, 20.0);
        assert_eq!(single.points[0].y, 130.0);

        assert!(line_chart(&series(vec![]), 300.0).points.is_empty());
    }

    #[test]
    fn pie_slices_cover_full_circle() {
        let slices = pie_slices(&[bucket("a", 1), bucket("b", 3)]);
        assert_eq!(slices.len(), 2);
        assert_eq!(slices[0].start_angle, 0.0);
        assert_eq!(slices[0].end_angle, 90.0);
        assert_eq!(slices[1].end_angle, 360.0);
        assert_eq!(slices[0].path, "M 80 80 L 80 20 A 60 60 0 0 1 140 80 Z");
        assert!(slices[1].path.contains(" 0 1 1 "), "{}", slices[1].path);
    }

    #[test]
    fn empty_distribution_has_no_slices() {
        assert!(pie_slices(&[bucket("a", 0)]).is_empty());
        assert!(pie_slices(&[]).is_empty());
    }
}
