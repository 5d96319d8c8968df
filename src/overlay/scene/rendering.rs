//! Gizmo rendering of the annotation scene.
//!
//! Everything vector-shaped goes through the gizmo pipeline: committed
//! shapes, the in-flight preview, and the selection indicator. Text boxes
//! are painted through egui instead, which has the font pipeline.

use bevy::camera::visibility::RenderLayers;
use bevy::gizmos::config::{GizmoConfigGroup, GizmoConfigStore};
use bevy::prelude::*;
use bevy_egui::{egui, EguiContexts};

use crate::constants::ARROW_HEAD_LENGTH;

use super::super::machine::{InFlight, ToolMachine};
use super::super::selection::SelectionState;
use super::super::viewport::ViewportTransform;
use super::super::OverlayState;
use super::hit_testing::shape_bounds;
use super::shape::{arrow_head_points, normalized_rect, parse_hex_color, Shape, ShapeKind};
use super::surface::DrawingSurface;

const HIGHLIGHT_ALPHA: f32 = 0.35;
const SELECTION_COLOR: Color = Color::srgb(0.25, 0.6, 1.0);

/// Custom gizmo group for annotation rendering
#[derive(Default, Reflect, GizmoConfigGroup)]
pub struct AnnotationGizmoGroup;

pub fn configure_annotation_gizmos(mut config_store: ResMut<GizmoConfigStore>) {
    let (config, _) = config_store.config_mut::<AnnotationGizmoGroup>();
    config.render_layers = RenderLayers::layer(0);
    config.line.width = 3.0;
}

/// Draw every committed shape's stroke segments, mapped through the
/// viewport transform
pub fn render_annotations(
    mut gizmos: Gizmos<AnnotationGizmoGroup>,
    surface: Res<DrawingSurface>,
    viewport: Res<ViewportTransform>,
    state: Res<OverlayState>,
) {
    if !state.visible {
        return;
    }
    for shape in &surface.document().shapes {
        let color = shape_color(shape);
        for (a, b) in shape.segments() {
            gizmos.line_2d(
                viewport.logical_to_world(a),
                viewport.logical_to_world(b),
                color,
            );
        }
    }
}

/// Draw the in-flight shape the machine is accumulating. Previews render
/// slightly translucent so a half-drawn shape reads as provisional.
pub fn render_in_flight_preview(
    mut gizmos: Gizmos<AnnotationGizmoGroup>,
    machine: Res<ToolMachine>,
    viewport: Res<ViewportTransform>,
    state: Res<OverlayState>,
) {
    if !state.visible {
        return;
    }
    let Some((in_flight, style)) = machine.in_flight() else {
        return;
    };
    let color = parse_hex_color(&style.stroke).with_alpha(0.7);

    match in_flight {
        InFlight::Path { points, .. } => {
            for window in points.windows(2) {
                gizmos.line_2d(
                    viewport.logical_to_world(window[0]),
                    viewport.logical_to_world(window[1]),
                    color,
                );
            }
        }
        InFlight::Arrow { start, end } => {
            let (head_left, head_right) = arrow_head_points(*start, *end);
            for (a, b) in [(*start, *end), (*end, head_left), (*end, head_right)] {
                gizmos.line_2d(
                    viewport.logical_to_world(a),
                    viewport.logical_to_world(b),
                    color,
                );
            }
        }
        InFlight::Rect { anchor, corner } => {
            let (origin, size) = normalized_rect(*anchor, *corner);
            let center = viewport.logical_to_world(origin + size / 2.0);
            gizmos.rect_2d(
                Isometry2d::from_translation(center),
                size * viewport.zoom(),
                color,
            );
        }
    }
}

/// Dashed-free bounding rectangle around the selected shape
pub fn render_selection_indicator(
    mut gizmos: Gizmos<AnnotationGizmoGroup>,
    selection: Res<SelectionState>,
    surface: Res<DrawingSurface>,
    viewport: Res<ViewportTransform>,
    state: Res<OverlayState>,
) {
    if !state.visible {
        return;
    }
    let Some(shape) = selection.selected.and_then(|id| surface.document().shape(id)) else {
        return;
    };

    let (min, max) = shape_bounds(shape);
    let center = viewport.logical_to_world((min + max) / 2.0);
    let size = (max - min) * viewport.zoom();
    gizmos.rect_2d(Isometry2d::from_translation(center), size, SELECTION_COLOR);

    // Corner tick at the top-left so very thin shapes still read as selected
    let corner = viewport.logical_to_world(min);
    gizmos.line_2d(
        corner,
        corner + Vec2::new(ARROW_HEAD_LENGTH / 2.0, 0.0),
        SELECTION_COLOR,
    );
}

/// Paint text box content through egui's background layer. Gizmos have no
/// text path; egui does, and its screen space matches the window's.
pub fn render_text_annotations(
    mut contexts: EguiContexts,
    surface: Res<DrawingSurface>,
    viewport: Res<ViewportTransform>,
    state: Res<OverlayState>,
    window_query: Query<&Window, With<bevy::window::PrimaryWindow>>,
) -> Result {
    if !state.visible {
        return Ok(());
    }
    let Ok(window) = window_query.single() else {
        return Ok(());
    };
    let ctx = contexts.ctx_mut()?;
    let painter = ctx.layer_painter(egui::LayerId::background());

    for shape in &surface.document().shapes {
        let ShapeKind::TextBox {
            position,
            content,
            font_size,
        } = &shape.kind
        else {
            continue;
        };
        if content.is_empty() {
            continue;
        }

        // World space (camera at origin) to egui screen space
        let world = viewport.logical_to_world(*position);
        let screen = egui::pos2(world.x + window.width() / 2.0, window.height() / 2.0 - world.y);

        let c = parse_hex_color(&shape.stroke).to_srgba();
        painter.text(
            screen,
            egui::Align2::LEFT_TOP,
            content,
            egui::FontId::proportional(font_size * viewport.zoom()),
            egui::Color32::from_rgba_unmultiplied(
                (c.red * 255.0) as u8,
                (c.green * 255.0) as u8,
                (c.blue * 255.0) as u8,
                (c.alpha * 255.0) as u8,
            ),
        );
    }

    Ok(())
}

fn shape_color(shape: &Shape) -> Color {
    let base = parse_hex_color(&shape.stroke);
    if matches!(shape.kind, ShapeKind::Highlight { .. }) {
        base.with_alpha(HIGHLIGHT_ALPHA)
    } else {
        base
    }
}
