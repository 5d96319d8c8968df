//! The serializable annotation document.
//!
//! An ordered sequence of shapes (order = z-order = paint order) plus a
//! format version tag. This is the sole externally persisted artifact: it is
//! handed to the persistence collaborator on every committed mutation and
//! consumed whole on load. Must round-trip exactly through serde.

use serde::{Deserialize, Serialize};

use super::shape::{Shape, ShapeId};

/// Current persisted format version
pub const DOCUMENT_VERSION: &str = "1";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnnotationDocument {
    pub version: String,
    pub shapes: Vec<Shape>,
}

impl Default for AnnotationDocument {
    fn default() -> Self {
        Self {
            version: DOCUMENT_VERSION.to_string(),
            shapes: Vec::new(),
        }
    }
}

impl AnnotationDocument {
    pub fn shape(&self, id: ShapeId) -> Option<&Shape> {
        self.shapes.iter().find(|s| s.id == id)
    }

    pub fn shape_mut(&mut self, id: ShapeId) -> Option<&mut Shape> {
        self.shapes.iter_mut().find(|s| s.id == id)
    }

    /// Smallest id strictly greater than every id in the document. Used to
    /// re-seed the id allocator after a load.
    pub fn max_id(&self) -> ShapeId {
        self.shapes.iter().map(|s| s.id).max().unwrap_or(0)
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }

    pub fn from_json(json: &str) -> serde_json::Result<Self> {
        serde_json::from_str(json)
    }
}

#[cfg(test)]
mod tests {
    use super::super::shape::{ShapeKind, ShapeStyle};
    use super::*;
    use bevy::prelude::*;

    fn sample_document() -> AnnotationDocument {
        let style = ShapeStyle {
            stroke: "#1e88e5".to_string(),
            fill: Some("#1e88e540".to_string()),
            stroke_width: 2.5,
        };
        AnnotationDocument {
            version: DOCUMENT_VERSION.to_string(),
            shapes: vec![
                Shape::new(
                    1,
                    ShapeKind::Freehand {
                        points: vec![Vec2::ZERO, Vec2::new(4.0, 8.0), Vec2::new(9.0, 3.0)],
                    },
                    style.clone(),
                ),
                Shape::new(
                    2,
                    ShapeKind::arrow(Vec2::new(10.0, 10.0), Vec2::new(110.0, 60.0)),
                    style.clone(),
                ),
                Shape::new(
                    3,
                    ShapeKind::Rectangle {
                        origin: Vec2::new(5.0, 6.0),
                        size: Vec2::new(70.0, 20.0),
                    },
                    style.clone(),
                ),
                Shape::new(
                    4,
                    ShapeKind::TextBox {
                        position: Vec2::new(40.0, 200.0),
                        content: "needs contrast".to_string(),
                        font_size: 18.0,
                    },
                    style,
                ),
            ],
        }
    }

    #[test]
    fn test_round_trip_is_deep_equal() {
        let doc = sample_document();
        let json = doc.to_json().unwrap();
        let restored = AnnotationDocument::from_json(&json).unwrap();
        assert_eq!(doc, restored);
    }

    #[test]
    fn test_shapes_tagged_by_type() {
        let doc = sample_document();
        let json = doc.to_json().unwrap();
        assert!(json.contains("\"type\": \"freehand\""));
        assert!(json.contains("\"type\": \"arrow\""));
        assert!(json.contains("\"type\": \"rectangle\""));
        assert!(json.contains("\"type\": \"text_box\""));
    }

    #[test]
    fn test_malformed_json_is_rejected() {
        assert!(AnnotationDocument::from_json("{\"version\": 3}").is_err());
        assert!(AnnotationDocument::from_json("not json").is_err());
    }

    #[test]
    fn test_unknown_shape_type_is_rejected() {
        let json = r##"{
            "version": "1",
            "shapes": [
                {"id": 1, "type": "hologram", "stroke": "#fff", "stroke_width": 1.0}
            ]
        }"##;
        assert!(AnnotationDocument::from_json(json).is_err());
    }

    #[test]
    fn test_missing_optional_fields_default() {
        // fill and selectable are optional in the wire format
        let json = r##"{
            "version": "1",
            "shapes": [
                {
                    "id": 7,
                    "type": "line",
                    "start": [0.0, 0.0],
                    "end": [10.0, 0.0],
                    "stroke": "#222222",
                    "stroke_width": 3.0
                }
            ]
        }"##;
        let doc = AnnotationDocument::from_json(json).unwrap();
        assert_eq!(doc.shapes.len(), 1);
        assert!(doc.shapes[0].fill.is_none());
        assert!(doc.shapes[0].selectable);
    }

    #[test]
    fn test_max_id() {
        assert_eq!(AnnotationDocument::default().max_id(), 0);
        assert_eq!(sample_document().max_id(), 4);
    }
}
