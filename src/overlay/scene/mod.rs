//! The annotation scene graph: shape types, the owning surface, hit
//! testing, and rendering.

mod document;
mod hit_testing;
mod rendering;
mod shape;
mod surface;

pub use document::{AnnotationDocument, DOCUMENT_VERSION};
pub use hit_testing::{shape_bounds, shape_contains, text_extent};
pub use rendering::{
    configure_annotation_gizmos, render_annotations, render_in_flight_preview,
    render_selection_indicator, render_text_annotations, AnnotationGizmoGroup,
};
pub use shape::{
    arrow_head_points, normalized_rect, parse_hex_color, Shape, ShapeId, ShapeKind, ShapeStyle,
};
pub use surface::{DrawingSurface, ShapePatch, SurfaceMutator};
