//! The drawing surface: exclusive owner of the annotation document.
//!
//! Every mutation goes through the methods here; no other component touches
//! shape geometry directly. Mutations bump a revision counter that the
//! debounced persistence stage watches, and callers that want undo coverage
//! go through [`SurfaceMutator`] so a history snapshot is recorded
//! synchronously with each mutation.

use bevy::ecs::system::SystemParam;
use bevy::prelude::*;

use super::super::history::SnapshotHistory;
use super::document::AnnotationDocument;
use super::hit_testing::shape_contains;
use super::shape::{Shape, ShapeId, ShapeKind, ShapeStyle};

/// Partial update applied by [`DrawingSurface::update_shape`]. Fields left
/// as None are untouched; geometry fields that do not apply to the target
/// variant are ignored.
#[derive(Debug, Clone, Default)]
pub struct ShapePatch {
    pub stroke: Option<String>,
    pub fill: Option<Option<String>>,
    pub stroke_width: Option<f32>,
    /// New text content (TextBox only)
    pub content: Option<String>,
    /// New anchor position (TextBox or Rectangle origin)
    pub position: Option<Vec2>,
}

#[derive(Resource)]
pub struct DrawingSurface {
    document: AnnotationDocument,
    next_id: ShapeId,
    revision: u64,
}

impl Default for DrawingSurface {
    fn default() -> Self {
        Self {
            document: AnnotationDocument::default(),
            next_id: 1,
            revision: 0,
        }
    }
}

impl DrawingSurface {
    pub fn document(&self) -> &AnnotationDocument {
        &self.document
    }

    /// Monotonic counter bumped on every committed mutation, including
    /// loads. Consumers treat any change as "the document changed".
    pub fn revision(&self) -> u64 {
        self.revision
    }

    pub fn shape_count(&self) -> usize {
        self.document.shapes.len()
    }

    /// Append a shape at the top of the z-order
    pub fn add_shape(&mut self, kind: ShapeKind, style: ShapeStyle) -> ShapeId {
        let id = self.next_id;
        self.next_id += 1;
        self.document.shapes.push(Shape::new(id, kind, style));
        self.revision += 1;
        id
    }

    /// Apply a partial update. Unknown ids are a silent no-op: the eraser
    /// and undo can race, and losing that race is benign.
    pub fn update_shape(&mut self, id: ShapeId, patch: ShapePatch) -> bool {
        let Some(shape) = self.document.shape_mut(id) else {
            return false;
        };

        if let Some(stroke) = patch.stroke {
            shape.stroke = stroke;
        }
        if let Some(fill) = patch.fill {
            shape.fill = fill;
        }
        if let Some(width) = patch.stroke_width {
            shape.stroke_width = width;
        }
        if let Some(text) = patch.content
            && let ShapeKind::TextBox { content, .. } = &mut shape.kind
        {
            *content = text;
        }
        if let Some(pos) = patch.position {
            match &mut shape.kind {
                ShapeKind::TextBox { position, .. } => *position = pos,
                ShapeKind::Rectangle { origin, .. } => *origin = pos,
                _ => {}
            }
        }

        self.revision += 1;
        true
    }

    /// Remove a shape. Unknown ids are a silent no-op.
    pub fn remove_shape(&mut self, id: ShapeId) -> bool {
        let before = self.document.shapes.len();
        self.document.shapes.retain(|s| s.id != id);
        if self.document.shapes.len() == before {
            return false;
        }
        self.revision += 1;
        true
    }

    /// Empty the document. Still a history-significant mutation, so it is
    /// undoable when issued through [`SurfaceMutator`].
    pub fn clear(&mut self) {
        self.document.shapes.clear();
        self.revision += 1;
    }

    /// Topmost shape whose geometry contains the point, or None. Shapes
    /// flagged non-selectable are skipped.
    pub fn hit_test(&self, logical_point: Vec2) -> Option<ShapeId> {
        self.document
            .shapes
            .iter()
            .rev()
            .find(|s| s.selectable && shape_contains(s, logical_point))
            .map(|s| s.id)
    }

    pub fn serialize(&self) -> AnnotationDocument {
        self.document.clone()
    }

    /// Replace the whole document (undo/redo restore path). The id
    /// allocator is re-seeded past every id in the incoming document.
    pub fn restore(&mut self, document: AnnotationDocument) {
        self.next_id = document.max_id() + 1;
        self.document = document;
        self.revision += 1;
    }
}

/// Mutation facade bundling the surface with the history so a snapshot is
/// recorded synchronously with every mutation. Systems that mutate the
/// scene take this instead of the bare resources.
#[derive(SystemParam)]
pub struct SurfaceMutator<'w> {
    pub surface: ResMut<'w, DrawingSurface>,
    pub history: ResMut<'w, SnapshotHistory>,
}

impl SurfaceMutator<'_> {
    pub fn add_shape(&mut self, kind: ShapeKind, style: ShapeStyle) -> ShapeId {
        let id = self.surface.add_shape(kind, style);
        self.history.record(self.surface.serialize());
        id
    }

    pub fn update_shape(&mut self, id: ShapeId, patch: ShapePatch) {
        if self.surface.update_shape(id, patch) {
            self.history.record(self.surface.serialize());
        }
    }

    pub fn remove_shape(&mut self, id: ShapeId) {
        if self.surface.remove_shape(id) {
            self.history.record(self.surface.serialize());
        }
    }

    pub fn clear(&mut self) {
        if self.surface.shape_count() > 0 {
            self.surface.clear();
            self.history.record(self.surface.serialize());
        }
    }

    /// Load a document from outside (file open). Replaces everything and
    /// resets history to a single snapshot at the loaded state.
    pub fn load_from(&mut self, document: AnnotationDocument) {
        self.surface.restore(document);
        self.history.reset(self.surface.serialize());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn style() -> ShapeStyle {
        ShapeStyle::default()
    }

    #[test]
    fn test_add_assigns_increasing_ids() {
        let mut surface = DrawingSurface::default();
        let a = surface.add_shape(
            ShapeKind::Line {
                start: Vec2::ZERO,
                end: Vec2::new(10.0, 0.0),
            },
            style(),
        );
        let b = surface.add_shape(
            ShapeKind::Line {
                start: Vec2::ZERO,
                end: Vec2::new(0.0, 10.0),
            },
            style(),
        );
        assert!(b > a);
        assert_eq!(surface.shape_count(), 2);
    }

    #[test]
    fn test_remove_unknown_id_is_noop() {
        let mut surface = DrawingSurface::default();
        let rev = surface.revision();
        assert!(!surface.remove_shape(42));
        assert_eq!(surface.revision(), rev);
    }

    #[test]
    fn test_update_unknown_id_is_noop() {
        let mut surface = DrawingSurface::default();
        let rev = surface.revision();
        assert!(!surface.update_shape(
            42,
            ShapePatch {
                stroke: Some("#000000".to_string()),
                ..Default::default()
            }
        ));
        assert_eq!(surface.revision(), rev);
    }

    #[test]
    fn test_update_text_content() {
        let mut surface = DrawingSurface::default();
        let id = surface.add_shape(
            ShapeKind::TextBox {
                position: Vec2::ZERO,
                content: String::new(),
                font_size: 18.0,
            },
            style(),
        );
        surface.update_shape(
            id,
            ShapePatch {
                content: Some("broken layout".to_string()),
                ..Default::default()
            },
        );
        match &surface.document().shape(id).unwrap().kind {
            ShapeKind::TextBox { content, .. } => assert_eq!(content, "broken layout"),
            other => panic!("unexpected kind: {:?}", other),
        }
    }

    #[test]
    fn test_hit_test_returns_topmost() {
        // Two overlapping rectangles; the most recently added wins the tie
        let mut surface = DrawingSurface::default();
        let bottom = surface.add_shape(
            ShapeKind::Rectangle {
                origin: Vec2::ZERO,
                size: Vec2::new(100.0, 100.0),
            },
            style(),
        );
        let top = surface.add_shape(
            ShapeKind::Rectangle {
                origin: Vec2::ZERO,
                size: Vec2::new(100.0, 100.0),
            },
            style(),
        );
        assert_eq!(surface.hit_test(Vec2::new(50.0, 50.0)), Some(top));

        surface.remove_shape(top);
        assert_eq!(surface.hit_test(Vec2::new(50.0, 50.0)), Some(bottom));
    }

    #[test]
    fn test_hit_test_skips_non_selectable() {
        let mut surface = DrawingSurface::default();
        let id = surface.add_shape(
            ShapeKind::Rectangle {
                origin: Vec2::ZERO,
                size: Vec2::new(10.0, 10.0),
            },
            style(),
        );
        surface.document.shape_mut(id).unwrap().selectable = false;
        assert_eq!(surface.hit_test(Vec2::new(5.0, 5.0)), None);
    }

    #[test]
    fn test_serialize_restore_round_trip() {
        let mut surface = DrawingSurface::default();
        surface.add_shape(
            ShapeKind::Freehand {
                points: vec![Vec2::ZERO, Vec2::new(3.0, 4.0)],
            },
            style(),
        );
        let snapshot = surface.serialize();

        let mut other = DrawingSurface::default();
        other.restore(snapshot.clone());
        assert_eq!(other.serialize(), snapshot);

        // Ids allocated after a restore never collide with loaded shapes
        let new_id = other.add_shape(
            ShapeKind::Line {
                start: Vec2::ZERO,
                end: Vec2::ONE,
            },
            style(),
        );
        assert!(new_id > snapshot.max_id());
    }

    #[test]
    fn test_revision_bumps_on_every_mutation() {
        let mut surface = DrawingSurface::default();
        let r0 = surface.revision();
        let id = surface.add_shape(
            ShapeKind::Line {
                start: Vec2::ZERO,
                end: Vec2::ONE,
            },
            style(),
        );
        let r1 = surface.revision();
        assert!(r1 > r0);
        surface.remove_shape(id);
        assert!(surface.revision() > r1);
        let r2 = surface.revision();
        surface.clear();
        assert!(surface.revision() > r2);
    }
}
