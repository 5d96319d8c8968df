//! The annotation overlay: everything drawn on top of the embedded page.
//!
//! Four cooperating parts: the scene graph and its owning surface, the tool
//! gesture machine, the scroll synchronizer keeping annotations glued to
//! page content, and the snapshot history behind undo/redo. Debounced
//! persistence watches the surface from the side.

pub mod history;
pub mod machine;
pub mod persistence;
pub mod scene;
pub mod selection;
pub mod sync;
pub mod tools;
pub mod viewport;

use bevy::prelude::*;
use bevy_egui::EguiPrimaryContextPass;

/// Whether the overlay is shown and receiving input. Hiding it reveals the
/// bare page; annotations and history are retained.
#[derive(Resource)]
pub struct OverlayState {
    pub visible: bool,
}

impl Default for OverlayState {
    fn default() -> Self {
        Self { visible: true }
    }
}

pub struct OverlayPlugin;

impl Plugin for OverlayPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<OverlayState>()
            .init_resource::<scene::DrawingSurface>()
            .init_resource::<history::SnapshotHistory>()
            .init_resource::<tools::ActiveTool>()
            .init_resource::<tools::ActiveStyle>()
            .init_resource::<machine::ToolMachine>()
            .init_resource::<machine::TextEditState>()
            .init_resource::<selection::SelectionState>()
            .init_resource::<sync::ScrollSync>()
            .init_resource::<viewport::ViewportTransform>()
            .init_resource::<persistence::ReviewFile>()
            .init_resource::<persistence::PersistDebounce>()
            .init_resource::<persistence::WriteQueue>()
            .add_message::<persistence::AnnotationsChanged>()
            .add_message::<persistence::SaveReviewRequest>()
            .add_message::<persistence::LoadReviewRequest>()
            .init_gizmo_group::<scene::AnnotationGizmoGroup>()
            .add_systems(
                Startup,
                (
                    viewport::spawn_camera,
                    scene::configure_annotation_gizmos,
                    sync::attach_on_startup,
                ),
            )
            .add_systems(
                Update,
                (
                    viewport::track_window_origin,
                    viewport::handle_zoom_shortcuts,
                    tools::handle_tool_shortcuts,
                    tools::update_cursor_icon,
                    sync::reprobe_on_navigation,
                    sync::reprobe_on_resize,
                    sync::drive_sync,
                ),
            )
            .add_systems(
                Update,
                (
                    machine::watch_wheel_for_pass_through,
                    machine::handle_pointer_input,
                    machine::cancel_on_overlay_hidden,
                    selection::handle_selection_click,
                    selection::handle_delete_selected,
                    selection::validate_selection,
                    history::handle_undo,
                    history::handle_redo,
                ),
            )
            .add_systems(
                Update,
                (
                    scene::render_annotations,
                    scene::render_in_flight_preview,
                    scene::render_selection_indicator,
                    persistence::watch_document_changes,
                    persistence::flush_debounced_changes,
                    persistence::autosave_on_change,
                    persistence::handle_save_requests,
                    persistence::handle_load_requests,
                    persistence::poll_write_tasks,
                    persistence::poll_load_tasks,
                ),
            )
            .add_systems(
                EguiPrimaryContextPass,
                (machine::text_edit_ui, scene::render_text_annotations),
            );
    }
}
