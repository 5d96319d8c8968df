//! Shape types for the annotation scene graph.
//!
//! All geometry is stored in the surface's logical (unzoomed, unpanned)
//! coordinate space so it survives zoom and pan changes unchanged. Raw
//! pointer pixels never end up in shape geometry.

use bevy::prelude::*;
use serde::{Deserialize, Serialize};

use crate::constants::{ARROW_HEAD_ANGLE, ARROW_HEAD_LENGTH};

pub type ShapeId = u64;

/// Stroke/fill styling shared by all shape variants
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShapeStyle {
    /// Stroke color as a hex string, e.g. "#e53935"
    pub stroke: String,
    #[serde(default)]
    pub fill: Option<String>,
    pub stroke_width: f32,
}

impl Default for ShapeStyle {
    fn default() -> Self {
        Self {
            stroke: "#e53935".to_string(),
            fill: None,
            stroke_width: 3.0,
        }
    }
}

/// A single annotation in the scene graph
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Shape {
    pub id: ShapeId,
    #[serde(flatten)]
    pub kind: ShapeKind,
    pub stroke: String,
    #[serde(default)]
    pub fill: Option<String>,
    pub stroke_width: f32,
    #[serde(default = "default_selectable")]
    pub selectable: bool,
}

fn default_selectable() -> bool {
    true
}

impl Shape {
    pub fn new(id: ShapeId, kind: ShapeKind, style: ShapeStyle) -> Self {
        Self {
            id,
            kind,
            stroke: style.stroke,
            fill: style.fill,
            stroke_width: style.stroke_width,
            selectable: true,
        }
    }

    /// Line segments making up this shape's stroke, for hit testing and
    /// rendering. Rectangles decompose into their four edges; text boxes
    /// have no stroke segments.
    pub fn segments(&self) -> Vec<(Vec2, Vec2)> {
        match &self.kind {
            ShapeKind::Freehand { points } | ShapeKind::Highlight { points } => {
                points.windows(2).map(|w| (w[0], w[1])).collect()
            }
            ShapeKind::Line { start, end } => vec![(*start, *end)],
            ShapeKind::Arrow {
                start,
                end,
                head_left,
                head_right,
            } => vec![(*start, *end), (*end, *head_left), (*end, *head_right)],
            ShapeKind::Rectangle { origin, size } => {
                let tl = *origin;
                let tr = *origin + Vec2::new(size.x, 0.0);
                let br = *origin + *size;
                let bl = *origin + Vec2::new(0.0, size.y);
                vec![(tl, tr), (tr, br), (br, bl), (bl, tl)]
            }
            ShapeKind::TextBox { .. } => Vec::new(),
        }
    }
}

/// Variant-specific geometry, tagged for the persisted document format
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ShapeKind {
    /// Freehand pen path
    Freehand { points: Vec<Vec2> },
    /// Freehand highlighter path, rendered translucent and wide
    Highlight { points: Vec<Vec2> },
    Line { start: Vec2, end: Vec2 },
    /// Shaft plus two head segments, grouped as one atomic entity. The head
    /// points are recomputed from (start, end) whenever the arrow is
    /// finalized, never stored independently of the shaft.
    Arrow {
        start: Vec2,
        end: Vec2,
        head_left: Vec2,
        head_right: Vec2,
    },
    /// Axis-aligned rectangle; `origin` is always the top-left corner and
    /// `size` is always non-negative (see [`normalized_rect`])
    Rectangle { origin: Vec2, size: Vec2 },
    TextBox {
        position: Vec2,
        content: String,
        font_size: f32,
    },
}

impl ShapeKind {
    /// Build an arrow from a dragged shaft, computing the head geometry
    pub fn arrow(start: Vec2, end: Vec2) -> Self {
        let (head_left, head_right) = arrow_head_points(start, end);
        Self::Arrow {
            start,
            end,
            head_left,
            head_right,
        }
    }
}

/// Compute the two arrowhead endpoints for a shaft from `start` to `end`.
///
/// Each head segment runs from `end` back toward the shaft, offset from the
/// shaft angle by [`ARROW_HEAD_ANGLE`] on either side, with length
/// [`ARROW_HEAD_LENGTH`].
pub fn arrow_head_points(start: Vec2, end: Vec2) -> (Vec2, Vec2) {
    let angle = (end.y - start.y).atan2(end.x - start.x);
    let left = angle - ARROW_HEAD_ANGLE;
    let right = angle + ARROW_HEAD_ANGLE;
    (
        end - ARROW_HEAD_LENGTH * Vec2::new(left.cos(), left.sin()),
        end - ARROW_HEAD_LENGTH * Vec2::new(right.cos(), right.sin()),
    )
}

/// Normalize a rectangle drag so the stored origin is the top-left corner
/// and the size is non-negative, regardless of which direction the user
/// dragged.
pub fn normalized_rect(anchor: Vec2, corner: Vec2) -> (Vec2, Vec2) {
    (anchor.min(corner), (corner - anchor).abs())
}

/// Parse a "#rrggbb" or "#rrggbbaa" hex string into a Color.
///
/// Malformed colors fall back to an opaque red rather than failing; a bad
/// color in a loaded document must not reject the document.
pub fn parse_hex_color(hex: &str) -> Color {
    let s = hex.trim_start_matches('#');
    let channel = |i: usize| {
        u8::from_str_radix(s.get(i..i + 2).unwrap_or("00"), 16)
            .map(|v| v as f32 / 255.0)
            .unwrap_or(0.0)
    };
    match s.len() {
        6 => Color::srgb(channel(0), channel(2), channel(4)),
        8 => Color::srgba(channel(0), channel(2), channel(4), channel(6)),
        _ => Color::srgb(1.0, 0.0, 0.0),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_arrow_has_three_segments() {
        let shape = Shape::new(
            1,
            ShapeKind::arrow(Vec2::ZERO, Vec2::new(100.0, 0.0)),
            ShapeStyle::default(),
        );
        assert_eq!(shape.segments().len(), 3);
    }

    #[test]
    fn test_arrow_head_length() {
        let (left, right) = arrow_head_points(Vec2::ZERO, Vec2::new(100.0, 0.0));
        let end = Vec2::new(100.0, 0.0);
        assert!((end.distance(left) - ARROW_HEAD_LENGTH).abs() < 1e-3);
        assert!((end.distance(right) - ARROW_HEAD_LENGTH).abs() < 1e-3);
    }

    #[test]
    fn test_arrow_head_symmetry() {
        // For a horizontal shaft the head points mirror across the x axis
        let (left, right) = arrow_head_points(Vec2::ZERO, Vec2::new(100.0, 0.0));
        assert!((left.x - right.x).abs() < 1e-3);
        assert!((left.y + right.y).abs() < 1e-3);
        // Both head points sit behind the tip
        assert!(left.x < 100.0);
        assert!(right.x < 100.0);
    }

    #[test]
    fn test_arrow_head_follows_shaft_angle() {
        let start = Vec2::new(20.0, 30.0);
        let end = Vec2::new(-45.0, 80.0);
        let (left, right) = arrow_head_points(start, end);
        assert!((end.distance(left) - ARROW_HEAD_LENGTH).abs() < 1e-3);
        assert!((end.distance(right) - ARROW_HEAD_LENGTH).abs() < 1e-3);
        // Head points straddle the shaft: their midpoint lies on the shaft
        // direction behind the tip
        let mid = (left + right) / 2.0;
        let shaft_dir = (end - start).normalize();
        let back = (end - mid).normalize();
        assert!(shaft_dir.dot(back) > 0.999);
    }

    #[test]
    fn test_rect_normalization_reverse_drag() {
        let (origin, size) = normalized_rect(Vec2::new(100.0, 100.0), Vec2::new(10.0, 10.0));
        assert_eq!(origin, Vec2::new(10.0, 10.0));
        assert_eq!(size, Vec2::new(90.0, 90.0));
    }

    #[test]
    fn test_rect_normalization_all_quadrants() {
        for corner in [
            Vec2::new(60.0, 70.0),
            Vec2::new(40.0, 70.0),
            Vec2::new(60.0, 30.0),
            Vec2::new(40.0, 30.0),
        ] {
            let (origin, size) = normalized_rect(Vec2::new(50.0, 50.0), corner);
            assert!(size.x >= 0.0 && size.y >= 0.0);
            assert!(origin.x <= corner.x.max(50.0));
            assert!(origin.y <= corner.y.max(50.0));
        }
    }

    #[test]
    fn test_parse_hex_color() {
        let c = parse_hex_color("#ff0000").to_srgba();
        assert!((c.red - 1.0).abs() < 1e-6);
        assert!(c.green.abs() < 1e-6);

        let c = parse_hex_color("#00ff0080").to_srgba();
        assert!((c.green - 1.0).abs() < 1e-6);
        assert!((c.alpha - 128.0 / 255.0).abs() < 1e-2);
    }

    #[test]
    fn test_parse_hex_color_malformed_falls_back() {
        let c = parse_hex_color("not-a-color").to_srgba();
        assert!((c.red - 1.0).abs() < 1e-6);
        assert!((c.alpha - 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_rectangle_segments_form_closed_outline() {
        let shape = Shape::new(
            1,
            ShapeKind::Rectangle {
                origin: Vec2::new(10.0, 20.0),
                size: Vec2::new(30.0, 40.0),
            },
            ShapeStyle::default(),
        );
        let segments = shape.segments();
        assert_eq!(segments.len(), 4);
        // Each segment ends where the next begins
        for i in 0..4 {
            assert_eq!(segments[i].1, segments[(i + 1) % 4].0);
        }
    }
}
