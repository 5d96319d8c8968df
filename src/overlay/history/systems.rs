//! Bevy systems for handling undo/redo keyboard shortcuts.

use bevy::prelude::*;
use bevy_egui::EguiContexts;

use super::super::scene::DrawingSurface;
use super::super::selection::SelectionState;
use super::super::OverlayState;
use super::snapshots::SnapshotHistory;

/// System to handle undo keyboard shortcut (Ctrl+Z)
pub fn handle_undo(
    keyboard: Res<ButtonInput<KeyCode>>,
    overlay: Res<OverlayState>,
    mut history: ResMut<SnapshotHistory>,
    mut surface: ResMut<DrawingSurface>,
    mut selection: ResMut<SelectionState>,
    mut contexts: EguiContexts,
) {
    if !overlay.visible {
        return;
    }
    // Don't trigger if typing in UI
    if let Ok(ctx) = contexts.ctx_mut()
        && ctx.wants_keyboard_input()
    {
        return;
    }

    let ctrl = keyboard.pressed(KeyCode::ControlLeft)
        || keyboard.pressed(KeyCode::ControlRight)
        || keyboard.pressed(KeyCode::SuperLeft)
        || keyboard.pressed(KeyCode::SuperRight);
    let shift = keyboard.pressed(KeyCode::ShiftLeft) || keyboard.pressed(KeyCode::ShiftRight);

    // Ctrl+Z (without shift) = undo
    if ctrl && !shift && keyboard.just_pressed(KeyCode::KeyZ) && history.undo_onto(&mut surface) {
        selection.selected = None;
        debug!("Undo ({} steps left)", history.undo_depth());
    }
}

/// System to handle redo keyboard shortcut (Ctrl+Y or Ctrl+Shift+Z)
pub fn handle_redo(
    keyboard: Res<ButtonInput<KeyCode>>,
    overlay: Res<OverlayState>,
    mut history: ResMut<SnapshotHistory>,
    mut surface: ResMut<DrawingSurface>,
    mut selection: ResMut<SelectionState>,
    mut contexts: EguiContexts,
) {
    if !overlay.visible {
        return;
    }
    // Don't trigger if typing in UI
    if let Ok(ctx) = contexts.ctx_mut()
        && ctx.wants_keyboard_input()
    {
        return;
    }

    let ctrl = keyboard.pressed(KeyCode::ControlLeft)
        || keyboard.pressed(KeyCode::ControlRight)
        || keyboard.pressed(KeyCode::SuperLeft)
        || keyboard.pressed(KeyCode::SuperRight);
    let shift = keyboard.pressed(KeyCode::ShiftLeft) || keyboard.pressed(KeyCode::ShiftRight);

    // Ctrl+Y or Ctrl+Shift+Z = redo
    let redo_pressed = (ctrl && keyboard.just_pressed(KeyCode::KeyY))
        || (ctrl && shift && keyboard.just_pressed(KeyCode::KeyZ));

    if redo_pressed && history.redo_onto(&mut surface) {
        selection.selected = None;
        debug!("Redo ({} steps left)", history.redo_depth());
    }
}
