//! Pie chart rendering
//!
//! One slice per indoor room, colored from the fixed room table, no legend,
//! with a fixed-width ring around the pie. Rendered as inline SVG.

use std::f64::consts::PI;
use std::fmt::Write;

use crate::tracker::{RoomCode, RoomTimeDistribution};

/// Ring width in pixels
pub const BORDER_WIDTH: f64 = 4.0;

/// Chart canvas size in pixels
pub const CHART_SIZE: f64 = 200.0;

const FIRST_CHART_BORDER: &str = "#ffffff";
const SECOND_CHART_BORDER: &str = "#222222";

/// Ring color for the chart rendered into `target_id`
///
/// Chosen by the chart's element identifier, not by pet.
pub fn border_color(target_id: &str) -> &'static str {
    if target_id == "pet0-chart" {
        FIRST_CHART_BORDER
    } else {
        SECOND_CHART_BORDER
    }
}

/// One slice of the pie
#[derive(Debug, Clone, PartialEq)]
pub struct Segment {
    pub room: RoomCode,
    pub value: f64,
    pub color: &'static str,
    /// Radians, clockwise from twelve o'clock
    pub start_angle: f64,
    pub end_angle: f64,
}

impl Segment {
    pub fn sweep(&self) -> f64 {
        self.end_angle - self.start_angle
    }
}

/// A pie chart ready to be drawn
#[derive(Debug, Clone, PartialEq)]
pub struct PieChart {
    pub target_id: String,
    pub segments: Vec<Segment>,
    pub border_color: &'static str,
    pub border_width: f64,
}

/// Lay out the pie for one distribution
///
/// Every indoor room gets a segment, in display order; empty rooms get a
/// zero sweep. An all-zero distribution yields zero-sweep segments only.
pub fn render_pie_chart(target_id: &str, distribution: &RoomTimeDistribution) -> PieChart {
    let total = distribution.total();
    let mut angle = 0.0;
    let segments = distribution
        .iter()
        .map(|(room, value)| {
            let sweep = if total > 0.0 {
                value / total * 2.0 * PI
            } else {
                0.0
            };
            let segment = Segment {
                room,
                value,
                color: room.color(),
                start_angle: angle,
                end_angle: angle + sweep,
            };
            angle += sweep;
            segment
        })
        .collect();

    PieChart {
        target_id: target_id.to_string(),
        segments,
        border_color: border_color(target_id),
        border_width: BORDER_WIDTH,
    }
}

impl PieChart {
    /// Inline SVG markup for the chart
    pub fn to_svg(&self) -> String {
        let c = CHART_SIZE / 2.0;
        let r = c - self.border_width;
        let mut svg = String::new();

        let _ = write!(
            svg,
            r#"<svg id="{id}" class="pie" width="{s}" height="{s}" viewBox="0 0 {s} {s}">"#,
            id = self.target_id,
            s = CHART_SIZE
        );

        for seg in &self.segments {
            let sweep = seg.sweep();
            if sweep <= 0.0 {
                continue;
            }
            if sweep >= 2.0 * PI - 1e-9 {
                // A single room holds everything; an arc cannot close on itself
                let _ = write!(
                    svg,
                    r#"<circle cx="{c}" cy="{c}" r="{r:.3}" fill="{fill}"><title>{name}</title></circle>"#,
                    fill = seg.color,
                    name = seg.room.display_name()
                );
                continue;
            }

            let (x0, y0) = point_on_circle(c, r, seg.start_angle);
            let (x1, y1) = point_on_circle(c, r, seg.end_angle);
            let large_arc = if sweep > PI { 1 } else { 0 };
            let _ = write!(
                svg,
                r#"<path d="M {c} {c} L {x0:.3} {y0:.3} A {r:.3} {r:.3} 0 {large_arc} 1 {x1:.3} {y1:.3} Z" fill="{fill}"><title>{name}</title></path>"#,
                fill = seg.color,
                name = seg.room.display_name()
            );
        }

        let _ = write!(
            svg,
            r#"<circle cx="{c}" cy="{c}" r="{r:.3}" fill="none" stroke="{stroke}" stroke-width="{w}"/></svg>"#,
            stroke = self.border_color,
            w = self.border_width
        );

        svg
    }
}

fn point_on_circle(c: f64, r: f64, angle: f64) -> (f64, f64) {
    (c + r * angle.sin(), c - r * angle.cos())
}
