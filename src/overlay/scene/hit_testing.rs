//! Hit testing functions for detecting clicks on shapes.
//!
//! Stroke-based shapes (paths, lines, arrows) use segment proximity within a
//! stroke-width tolerance; rectangles and text boxes use bounding-box
//! containment. All tests run in logical coordinates.

use bevy::prelude::*;

use super::shape::{Shape, ShapeKind};

/// Check if a point is within a given distance of a line segment
fn point_near_segment(point: Vec2, seg_start: Vec2, seg_end: Vec2, threshold: f32) -> bool {
    let line_vec = seg_end - seg_start;
    let line_len_sq = line_vec.length_squared();

    if line_len_sq < 0.0001 {
        // Segment is essentially a point
        return point.distance(seg_start) <= threshold;
    }

    // Project point onto line, clamped to segment
    let t = ((point - seg_start).dot(line_vec) / line_len_sq).clamp(0.0, 1.0);
    let projection = seg_start + line_vec * t;

    point.distance(projection) <= threshold
}

/// Tolerance for stroke proximity tests: proportional to stroke width, with
/// a floor so thin strokes stay clickable
fn stroke_threshold(stroke_width: f32) -> f32 {
    (stroke_width * 2.0).max(8.0)
}

/// Check whether a logical point hits the given shape
pub fn shape_contains(shape: &Shape, point: Vec2) -> bool {
    match &shape.kind {
        ShapeKind::Freehand { .. }
        | ShapeKind::Highlight { .. }
        | ShapeKind::Line { .. }
        | ShapeKind::Arrow { .. } => {
            let threshold = stroke_threshold(shape.stroke_width);
            shape
                .segments()
                .iter()
                .any(|(a, b)| point_near_segment(point, *a, *b, threshold))
        }
        ShapeKind::Rectangle { origin, size } => {
            let pad = shape.stroke_width;
            point.x >= origin.x - pad
                && point.x <= origin.x + size.x + pad
                && point.y >= origin.y - pad
                && point.y <= origin.y + size.y + pad
        }
        ShapeKind::TextBox {
            position,
            content,
            font_size,
        } => {
            let size = text_extent(content, *font_size);
            point.x >= position.x
                && point.x <= position.x + size.x
                && point.y >= position.y
                && point.y <= position.y + size.y
        }
    }
}

/// Approximate rendered extent of a text box (no font metrics available in
/// the core; matches the renderer's sizing assumptions)
pub fn text_extent(content: &str, font_size: f32) -> Vec2 {
    let width = (content.chars().count() as f32 * font_size * 0.5).max(40.0);
    let height = font_size.max(20.0);
    Vec2::new(width, height)
}

/// Axis-aligned bounding box of a shape (min, max corners), expanded by the
/// stroke width. Used for selection indicators.
pub fn shape_bounds(shape: &Shape) -> (Vec2, Vec2) {
    let (min, max) = match &shape.kind {
        ShapeKind::Freehand { points } | ShapeKind::Highlight { points } => {
            if points.is_empty() {
                return (Vec2::ZERO, Vec2::ZERO);
            }
            let mut min = points[0];
            let mut max = points[0];
            for &p in points {
                min = min.min(p);
                max = max.max(p);
            }
            (min, max)
        }
        ShapeKind::Line { start, end } => (start.min(*end), start.max(*end)),
        ShapeKind::Arrow {
            start,
            end,
            head_left,
            head_right,
        } => {
            let min = start.min(*end).min(*head_left).min(*head_right);
            let max = start.max(*end).max(*head_left).max(*head_right);
            (min, max)
        }
        ShapeKind::Rectangle { origin, size } => (*origin, *origin + *size),
        ShapeKind::TextBox {
            position,
            content,
            font_size,
        } => {
            let size = text_extent(content, *font_size);
            (*position, *position + size)
        }
    };
    let padding = Vec2::splat(shape.stroke_width);
    (min - padding, max + padding)
}

#[cfg(test)]
mod tests {
    use super::super::shape::{ShapeStyle, normalized_rect};
    use super::*;

    fn shape(kind: ShapeKind) -> Shape {
        Shape::new(1, kind, ShapeStyle::default())
    }

    #[test]
    fn test_point_near_path_within_tolerance() {
        let path = shape(ShapeKind::Freehand {
            points: vec![Vec2::ZERO, Vec2::new(100.0, 0.0)],
        });
        assert!(shape_contains(&path, Vec2::new(50.0, 5.0)));
        assert!(!shape_contains(&path, Vec2::new(50.0, 30.0)));
    }

    #[test]
    fn test_point_near_degenerate_segment() {
        let line = shape(ShapeKind::Line {
            start: Vec2::new(10.0, 10.0),
            end: Vec2::new(10.0, 10.0),
        });
        assert!(shape_contains(&line, Vec2::new(12.0, 12.0)));
        assert!(!shape_contains(&line, Vec2::new(30.0, 30.0)));
    }

    #[test]
    fn test_arrow_head_segments_are_hittable() {
        let arrow = shape(ShapeKind::arrow(Vec2::ZERO, Vec2::new(100.0, 0.0)));
        // A point near a head segment but off the shaft
        assert!(shape_contains(&arrow, Vec2::new(92.0, 7.0)));
    }

    #[test]
    fn test_rectangle_containment() {
        let (origin, size) = normalized_rect(Vec2::new(100.0, 100.0), Vec2::new(10.0, 10.0));
        let rect = shape(ShapeKind::Rectangle { origin, size });
        assert!(shape_contains(&rect, Vec2::new(50.0, 50.0)));
        assert!(!shape_contains(&rect, Vec2::new(200.0, 50.0)));
    }

    #[test]
    fn test_text_containment() {
        let text = shape(ShapeKind::TextBox {
            position: Vec2::new(10.0, 10.0),
            content: "hello".to_string(),
            font_size: 20.0,
        });
        assert!(shape_contains(&text, Vec2::new(20.0, 20.0)));
        assert!(!shape_contains(&text, Vec2::new(10.0, 200.0)));
    }

    #[test]
    fn test_empty_text_still_has_minimum_extent() {
        // Zero-length content is permitted and renders as empty; it keeps a
        // minimum clickable extent so it can be selected and deleted
        let text = shape(ShapeKind::TextBox {
            position: Vec2::ZERO,
            content: String::new(),
            font_size: 18.0,
        });
        assert!(shape_contains(&text, Vec2::new(5.0, 5.0)));
    }

    #[test]
    fn test_bounds_cover_arrow_head() {
        let arrow = shape(ShapeKind::arrow(Vec2::ZERO, Vec2::new(0.0, 100.0)));
        let (min, max) = shape_bounds(&arrow);
        // Head points extend sideways from the vertical shaft
        assert!(min.x < 0.0);
        assert!(max.x > 0.0);
        assert!(max.y >= 100.0);
    }
}
