//! Maps a monthly income/expense series onto SVG path strings for the
//! dashboard's cash-flow trend chart. Lines are smoothed with per-segment
//! cubic Beziers whose control points sit at one-third and two-thirds of the
//! horizontal span, which keeps the curve monotone between data points.

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use vaultly_repo::transaction_repo::MonthlyTotal;

const HEADROOM: f64 = 1.1;
const FALLBACK_MAX: f64 = 1000.0;

#[derive(Clone, Copy, Debug)]
pub struct Padding {
    pub top: f64,
    pub right: f64,
    pub bottom: f64,
    pub left: f64,
}

#[derive(Clone, Copy, Debug)]
pub struct Viewport {
    pub width: f64,
    pub height: f64,
    pub padding: Padding,
}

impl Default for Viewport {
    fn default() -> Viewport {
        Viewport {
            width: 800.0,
            height: 300.0,
            padding: Padding {
                top: 20.0,
                right: 20.0,
                bottom: 50.0,
                left: 20.0,
            },
        }
    }
}

impl Viewport {
    pub fn sized(width: f64, height: f64) -> Viewport {
        Viewport {
            width,
            height,
            ..Viewport::default()
        }
    }

    fn graph_width(&self) -> f64 {
        self.width - self.padding.left - self.padding.right
    }

    fn graph_height(&self) -> f64 {
        self.height - self.padding.top - self.padding.bottom
    }

    fn base_y(&self) -> f64 {
        self.height - self.padding.bottom
    }
}

#[derive(Serialize, Deserialize, Clone, PartialEq, Debug)]
pub struct Point {
    pub x: f64,
    pub y: f64,
    pub value: f64,
}

#[derive(Serialize, Deserialize, Debug)]
pub struct ChartGeometry {
    pub width: f64,
    pub height: f64,
    pub max_value: f64,
    pub months: Vec<String>,
    pub income_points: Vec<Point>,
    pub expense_points: Vec<Point>,
    pub income_path: String,
    pub income_area_path: String,
    pub expense_path: String,
}

pub fn render(series: &[MonthlyTotal], viewport: &Viewport) -> ChartGeometry {
    let max_value = scale_max(series);
    let income_points = scale_points(series, |t| t.income, max_value, viewport);
    let expense_points = scale_points(series, |t| t.expense, max_value, viewport);

    ChartGeometry {
        width: viewport.width,
        height: viewport.height,
        max_value,
        months: series
            .iter()
            .map(|t| t.month.format("%Y-%m").to_string())
            .collect(),
        income_path: line_path(&income_points),
        income_area_path: area_path(&income_points, viewport),
        expense_path: line_path(&expense_points),
        income_points,
        expense_points,
    }
}

/// Top of the value axis: the largest income/expense value with 10%
/// headroom, or a fixed default when the series is empty or all zero.
pub fn scale_max(series: &[MonthlyTotal]) -> f64 {
    let max = series
        .iter()
        .flat_map(|t| [to_f64(t.income), to_f64(t.expense)])
        .fold(0.0f64, f64::max);
    if max > 0.0 {
        max * HEADROOM
    } else {
        FALLBACK_MAX
    }
}

fn scale_points(
    series: &[MonthlyTotal],
    value: impl Fn(&MonthlyTotal) -> Decimal,
    max_value: f64,
    viewport: &Viewport,
) -> Vec<Point> {
    series
        .iter()
        .enumerate()
        .map(|(index, total)| {
            let value = to_f64(value(total));
            Point {
                x: x_position(index, series.len(), viewport),
                y: y_position(value, max_value, viewport),
                value,
            }
        })
        .collect()
}

fn x_position(index: usize, count: usize, viewport: &Viewport) -> f64 {
    let segments = if count > 1 { (count - 1) as f64 } else { 1.0 };
    viewport.padding.left + viewport.graph_width() / segments * index as f64
}

fn y_position(value: f64, max_value: f64, viewport: &Viewport) -> f64 {
    viewport.padding.top + viewport.graph_height() - value / max_value * viewport.graph_height()
}

/// Smoothed move-to/curve-to path through the points. Empty input yields an
/// empty path, a single point a lone move-to.
pub fn line_path(points: &[Point]) -> String {
    let Some(first) = points.first() else {
        return String::new();
    };
    let mut path = format!("M {} {}", first.x, first.y);
    for window in points.windows(2) {
        let (prev, point) = (&window[0], &window[1]);
        let cpx1 = prev.x + (point.x - prev.x) / 3.0;
        let cpx2 = prev.x + 2.0 * (point.x - prev.x) / 3.0;
        path.push_str(&format!(
            " C {} {}, {} {}, {} {}",
            cpx1, prev.y, cpx2, point.y, point.x, point.y
        ));
    }
    path
}

/// The line path closed down to the bottom of the plot region, for the
/// gradient fill under the income curve.
pub fn area_path(points: &[Point], viewport: &Viewport) -> String {
    let (Some(first), Some(last)) = (points.first(), points.last()) else {
        return String::new();
    };
    format!(
        "{} L {} {} L {} {} Z",
        line_path(points),
        last.x,
        viewport.base_y(),
        first.x,
        viewport.base_y()
    )
}

fn to_f64(value: Decimal) -> f64 {
    value.to_f64().unwrap_or_default()
}
