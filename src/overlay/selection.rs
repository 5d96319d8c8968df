//! Shape selection with the select tool.
//!
//! Selection is an overlay-side affordance: clicking a shape highlights it
//! and lets Delete remove it or a double-click re-open a text box for
//! editing. The select tool remains pass-through for the page underneath;
//! only clicks that land on a shape have any overlay-side effect.

use bevy::prelude::*;
use bevy_egui::EguiContexts;

use super::machine::TextEditState;
use super::scene::{DrawingSurface, ShapeId, ShapeKind, SurfaceMutator};
use super::tools::{ActiveTool, ReviewTool};
use super::viewport::{CameraParams, ViewportTransform};
use super::OverlayState;

#[derive(Resource, Default)]
pub struct SelectionState {
    pub selected: Option<ShapeId>,
}

pub fn handle_selection_click(
    mouse: Res<ButtonInput<MouseButton>>,
    overlay: Res<OverlayState>,
    active_tool: Res<ActiveTool>,
    viewport: Res<ViewportTransform>,
    camera: CameraParams,
    surface: Res<DrawingSurface>,
    mut selection: ResMut<SelectionState>,
    mut text_edit: ResMut<TextEditState>,
    mut last_click: Local<(f64, Option<ShapeId>)>,
    time: Res<Time>,
    mut contexts: EguiContexts,
) {
    if !overlay.visible || active_tool.tool != ReviewTool::Select {
        return;
    }
    if !mouse.just_pressed(MouseButton::Left) {
        return;
    }
    if let Ok(ctx) = contexts.ctx_mut()
        && ctx.is_pointer_over_area()
    {
        return;
    }
    let Some(p) = camera.cursor_logical_pos(&viewport) else {
        return;
    };

    let hit = surface.hit_test(p);
    let now = time.elapsed_secs_f64();
    let double = hit.is_some() && hit == last_click.1 && now - last_click.0 < 0.4;
    *last_click = (now, hit);

    selection.selected = hit;

    // Double-click on a text box re-opens the inline editor
    if double
        && let Some(id) = hit
        && let Some(shape) = surface.document().shape(id)
        && let ShapeKind::TextBox { content, .. } = &shape.kind
    {
        text_edit.begin(id, content.clone());
    }
}

pub fn handle_delete_selected(
    keyboard: Res<ButtonInput<KeyCode>>,
    overlay: Res<OverlayState>,
    mut selection: ResMut<SelectionState>,
    mut mutator: SurfaceMutator,
    mut contexts: EguiContexts,
) {
    if !overlay.visible {
        return;
    }
    if let Ok(ctx) = contexts.ctx_mut()
        && ctx.wants_keyboard_input()
    {
        return;
    }
    if !keyboard.just_pressed(KeyCode::Delete) && !keyboard.just_pressed(KeyCode::Backspace) {
        return;
    }
    if let Some(id) = selection.selected.take() {
        mutator.remove_shape(id);
        debug!("Deleted selected shape {}", id);
    }
}

/// Drop a selection whose shape no longer exists (erased, undone, or the
/// document was replaced by a load)
pub fn validate_selection(surface: Res<DrawingSurface>, mut selection: ResMut<SelectionState>) {
    if let Some(id) = selection.selected
        && surface.document().shape(id).is_none()
    {
        selection.selected = None;
    }
}
