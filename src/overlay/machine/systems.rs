//! Input translation: pointer and wheel events into machine transitions.

use bevy::input::mouse::MouseWheel;
use bevy::prelude::*;
use bevy_egui::EguiContexts;

use super::super::scene::{ShapeKind, ShapeStyle, SurfaceMutator};
use super::super::tools::{ActiveStyle, ActiveTool};
use super::super::viewport::{CameraParams, ViewportTransform};
use super::super::OverlayState;
use super::machine::{DownAction, ToolMachine};
use super::text_edit::TextEditState;

/// Translate pointer input into machine transitions and committed shapes.
///
/// Gesture starts are gated on the intercept decision and on the pointer
/// being over the page rather than the UI; a gesture already in flight
/// keeps receiving moves and its release even if the pointer wanders over
/// a panel mid-drag.
pub fn handle_pointer_input(
    mouse: Res<ButtonInput<MouseButton>>,
    time: Res<Time>,
    overlay: Res<OverlayState>,
    active_tool: Res<ActiveTool>,
    active_style: Res<ActiveStyle>,
    viewport: Res<ViewportTransform>,
    camera: CameraParams,
    mut machine: ResMut<ToolMachine>,
    mut mutator: SurfaceMutator,
    mut text_edit: ResMut<TextEditState>,
    mut last_logical: Local<Option<Vec2>>,
    mut contexts: EguiContexts,
) {
    // A hidden overlay is fully transparent to input; in-flight shapes are
    // discarded by cancel_on_overlay_hidden
    if !overlay.visible {
        return;
    }

    let cursor = camera.cursor_logical_pos(&viewport);
    if let Some(p) = cursor {
        *last_logical = Some(p);
    }

    if machine.is_drawing() {
        if let Some(p) = cursor {
            machine.pointer_move(p);
        }

        // Finalize on release, or when the cursor leaves the window mid-drag
        let finish_at = if mouse.just_released(MouseButton::Left) {
            cursor.or(*last_logical)
        } else if cursor.is_none() {
            *last_logical
        } else {
            None
        };

        if let Some(p) = finish_at
            && let Some((kind, style)) = machine.pointer_up(p)
        {
            let id = mutator.add_shape(kind, style);
            debug!("Finalized shape {}", id);
        }
        return;
    }

    if !mouse.just_pressed(MouseButton::Left) {
        return;
    }
    if !machine.intercepts(active_tool.tool, time.elapsed_secs_f64()) {
        return;
    }
    if let Ok(ctx) = contexts.ctx_mut()
        && ctx.is_pointer_over_area()
    {
        return;
    }
    let Some(p) = cursor else {
        return;
    };
    // Clicks outside the page content fall through to the host chrome
    if !viewport.contains_logical(p) {
        return;
    }

    match machine.pointer_down(active_tool.tool, p, &active_style) {
        DownAction::Began | DownAction::None => {}
        DownAction::CreateText(p) => {
            let id = mutator.add_shape(
                ShapeKind::TextBox {
                    position: p,
                    content: String::new(),
                    font_size: active_style.font_size,
                },
                ShapeStyle {
                    stroke: active_style.stroke.clone(),
                    fill: None,
                    stroke_width: active_style.stroke_width,
                },
            );
            text_edit.begin(id, String::new());
        }
        DownAction::EraseAt(p) => {
            if let Some(id) = mutator.surface.hit_test(p) {
                mutator.remove_shape(id);
                debug!("Erased shape {}", id);
            }
        }
    }
}

/// Wheel gestures while a drawing tool is active open the temporary
/// pass-through window; the page scroll itself is handled by the page
/// module, which always receives wheel input.
pub fn watch_wheel_for_pass_through(
    mut wheel: MessageReader<MouseWheel>,
    time: Res<Time>,
    active_tool: Res<ActiveTool>,
    mut machine: ResMut<ToolMachine>,
) {
    let mut seen = false;
    for _ in wheel.read() {
        seen = true;
    }
    if seen && active_tool.tool.is_drawing_tool() {
        machine.notice_wheel(time.elapsed_secs_f64());
    }
}

/// Hiding the overlay mid-gesture discards the in-flight shape rather than
/// committing a half-drawn one
pub fn cancel_on_overlay_hidden(state: Res<OverlayState>, mut machine: ResMut<ToolMachine>) {
    if state.is_changed() && !state.visible && machine.is_drawing() {
        machine.cancel();
        debug!("In-flight shape discarded: overlay hidden");
    }
}
