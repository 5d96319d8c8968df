//! Inline text editing for text box annotations.
//!
//! The text tool creates the box immediately on click and hands it to this
//! editor; double-clicking an existing box with the select tool re-opens
//! it. The edit buffer is local until committed, so undo history only sees
//! whole text states, never keystrokes.

use bevy::prelude::*;
use bevy_egui::{egui, EguiContexts};

use super::super::scene::{ShapeId, ShapeKind, ShapePatch, SurfaceMutator};
use super::super::viewport::{CameraParams, ViewportTransform};

pub struct ActiveEdit {
    pub id: ShapeId,
    pub buffer: String,
    /// Focus is requested on the first frame only
    needs_focus: bool,
}

#[derive(Resource, Default)]
pub struct TextEditState {
    editing: Option<ActiveEdit>,
}

impl TextEditState {
    pub fn begin(&mut self, id: ShapeId, initial: String) {
        self.editing = Some(ActiveEdit {
            id,
            buffer: initial,
            needs_focus: true,
        });
    }

    pub fn is_editing(&self) -> bool {
        self.editing.is_some()
    }

    pub fn editing_id(&self) -> Option<ShapeId> {
        self.editing.as_ref().map(|e| e.id)
    }
}

/// Floating single-line editor anchored to the text box's on-screen
/// position. Enter commits, Escape cancels; a box left empty either way is
/// removed instead of lingering invisibly.
pub fn text_edit_ui(
    mut contexts: EguiContexts,
    mut state: ResMut<TextEditState>,
    mut mutator: SurfaceMutator,
    viewport: Res<ViewportTransform>,
    camera: CameraParams,
) -> Result {
    let Some(edit) = &mut state.editing else {
        return Ok(());
    };

    // The edited shape can disappear underneath us (undo past its creation)
    let Some(shape) = mutator.surface.document().shape(edit.id) else {
        state.editing = None;
        return Ok(());
    };
    let ShapeKind::TextBox { position, .. } = &shape.kind else {
        state.editing = None;
        return Ok(());
    };
    let screen = annotation_screen_pos(*position, &viewport, &camera);

    let ctx = contexts.ctx_mut()?;
    let mut commit = false;
    let mut cancel = false;

    egui::Area::new(egui::Id::new("text-annotation-editor"))
        .fixed_pos(egui::pos2(screen.x, screen.y))
        .show(ctx, |ui| {
            let response = ui.add(
                egui::TextEdit::singleline(&mut edit.buffer)
                    .hint_text("Note...")
                    .desired_width(220.0),
            );
            if edit.needs_focus {
                response.request_focus();
                edit.needs_focus = false;
            }
            if response.lost_focus() {
                if ui.input(|i| i.key_pressed(egui::Key::Enter)) {
                    commit = true;
                } else if ui.input(|i| i.key_pressed(egui::Key::Escape)) {
                    cancel = true;
                } else {
                    // Clicking elsewhere commits rather than losing the text
                    commit = true;
                }
            }
        });

    if commit || cancel {
        let Some(edit) = state.editing.take() else {
            return Ok(());
        };
        let text = if cancel {
            String::new()
        } else {
            edit.buffer.trim().to_string()
        };
        if text.is_empty() {
            mutator.remove_shape(edit.id);
        } else {
            mutator.update_shape(
                edit.id,
                ShapePatch {
                    content: Some(text),
                    ..Default::default()
                },
            );
        }
    }

    Ok(())
}

/// Project a logical page position into window screen coordinates for
/// egui. Falls back to the raw logical position if the camera is not
/// available yet.
fn annotation_screen_pos(logical: Vec2, viewport: &ViewportTransform, camera: &CameraParams) -> Vec2 {
    let world = viewport.logical_to_world(logical);
    let Ok((cam, transform)) = camera.camera.single() else {
        return logical;
    };
    cam.world_to_viewport(transform, world.extend(0.0))
        .map(|v| Vec2::new(v.x, v.y))
        .unwrap_or(logical)
}
