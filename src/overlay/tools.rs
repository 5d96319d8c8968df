use bevy::prelude::*;
use bevy::window::{CursorIcon, PrimaryWindow, SystemCursorIcon};
use bevy_egui::EguiContexts;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ReviewTool {
    #[default]
    Select,
    Pen,
    Highlighter,
    Text,
    Arrow,
    Rectangle,
    Eraser,
}

impl ReviewTool {
    pub fn display_name(&self) -> &'static str {
        match self {
            ReviewTool::Select => "Select (V)",
            ReviewTool::Pen => "Pen (P)",
            ReviewTool::Highlighter => "Highlighter (H)",
            ReviewTool::Text => "Text (T)",
            ReviewTool::Arrow => "Arrow (A)",
            ReviewTool::Rectangle => "Rectangle (R)",
            ReviewTool::Eraser => "Eraser (E)",
        }
    }

    pub fn cursor_icon(&self) -> CursorIcon {
        match self {
            ReviewTool::Select => CursorIcon::System(SystemCursorIcon::Default),
            ReviewTool::Pen => CursorIcon::System(SystemCursorIcon::Crosshair),
            ReviewTool::Highlighter => CursorIcon::System(SystemCursorIcon::Crosshair),
            ReviewTool::Text => CursorIcon::System(SystemCursorIcon::Text),
            ReviewTool::Arrow => CursorIcon::System(SystemCursorIcon::Crosshair),
            ReviewTool::Rectangle => CursorIcon::System(SystemCursorIcon::Crosshair),
            ReviewTool::Eraser => CursorIcon::System(SystemCursorIcon::Cell),
        }
    }

    pub fn all() -> &'static [ReviewTool] {
        &[
            ReviewTool::Select,
            ReviewTool::Pen,
            ReviewTool::Highlighter,
            ReviewTool::Text,
            ReviewTool::Arrow,
            ReviewTool::Rectangle,
            ReviewTool::Eraser,
        ]
    }

    /// Tools for which the overlay intercepts pointer input. Select is the
    /// pass-through tool: the embedded page receives gestures directly.
    pub fn is_drawing_tool(&self) -> bool {
        !matches!(self, ReviewTool::Select)
    }

    /// Tools whose gesture drags out a shape (pen/highlighter accumulate a
    /// path, arrow/rectangle drag an endpoint)
    pub fn has_drag_phase(&self) -> bool {
        matches!(
            self,
            ReviewTool::Pen | ReviewTool::Highlighter | ReviewTool::Arrow | ReviewTool::Rectangle
        )
    }
}

#[derive(Resource, Default)]
pub struct ActiveTool {
    pub tool: ReviewTool,
}

/// Style applied to newly created shapes. Mirrored from the toolbox UI;
/// changes mid-gesture take effect on the next gesture, not the in-flight
/// shape.
#[derive(Resource)]
pub struct ActiveStyle {
    /// Hex color, e.g. "#e53935"
    pub stroke: String,
    pub stroke_width: f32,
    pub font_size: f32,
}

impl Default for ActiveStyle {
    fn default() -> Self {
        Self {
            stroke: "#e53935".to_string(),
            stroke_width: 3.0,
            font_size: 18.0,
        }
    }
}

pub fn handle_tool_shortcuts(
    keyboard: Res<ButtonInput<KeyCode>>,
    mut active_tool: ResMut<ActiveTool>,
    mut contexts: EguiContexts,
) {
    // Don't change tools if typing in a text field
    if let Ok(ctx) = contexts.ctx_mut()
        && ctx.wants_keyboard_input()
    {
        return;
    }

    let new_tool = if keyboard.just_pressed(KeyCode::KeyV) {
        Some(ReviewTool::Select)
    } else if keyboard.just_pressed(KeyCode::KeyP) {
        Some(ReviewTool::Pen)
    } else if keyboard.just_pressed(KeyCode::KeyH) {
        Some(ReviewTool::Highlighter)
    } else if keyboard.just_pressed(KeyCode::KeyT) {
        Some(ReviewTool::Text)
    } else if keyboard.just_pressed(KeyCode::KeyA) {
        Some(ReviewTool::Arrow)
    } else if keyboard.just_pressed(KeyCode::KeyR) {
        Some(ReviewTool::Rectangle)
    } else if keyboard.just_pressed(KeyCode::KeyE) {
        Some(ReviewTool::Eraser)
    } else {
        None
    };

    if let Some(tool) = new_tool {
        active_tool.tool = tool;
    }
}

pub fn update_cursor_icon(
    active_tool: Res<ActiveTool>,
    mut window_query: Query<(Entity, &Window), With<PrimaryWindow>>,
    mut commands: Commands,
    mut contexts: EguiContexts,
) {
    let Ok((entity, _window)) = window_query.single_mut() else {
        return;
    };

    // Use default cursor over UI, tool cursor over the page
    if let Ok(ctx) = contexts.ctx_mut()
        && ctx.is_pointer_over_area()
    {
        commands
            .entity(entity)
            .insert(CursorIcon::System(SystemCursorIcon::Default));
        return;
    }

    commands.entity(entity).insert(active_tool.tool.cursor_icon());
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_names_contain_shortcuts() {
        for tool in ReviewTool::all() {
            let name = tool.display_name();
            assert!(name.contains('('), "Display name should contain shortcut: {}", name);
            assert!(name.contains(')'), "Display name should contain shortcut: {}", name);
        }
    }

    #[test]
    fn test_all_returns_seven_tools() {
        let all = ReviewTool::all();
        assert_eq!(all.len(), 7);
        assert!(all.contains(&ReviewTool::Select));
        assert!(all.contains(&ReviewTool::Eraser));
    }

    #[test]
    fn test_select_is_the_only_pass_through_tool() {
        for tool in ReviewTool::all() {
            assert_eq!(*tool != ReviewTool::Select, tool.is_drawing_tool());
        }
    }

    #[test]
    fn test_drag_phase_tools() {
        assert!(ReviewTool::Pen.has_drag_phase());
        assert!(ReviewTool::Highlighter.has_drag_phase());
        assert!(ReviewTool::Arrow.has_drag_phase());
        assert!(ReviewTool::Rectangle.has_drag_phase());
        assert!(!ReviewTool::Text.has_drag_phase());
        assert!(!ReviewTool::Eraser.has_drag_phase());
        assert!(!ReviewTool::Select.has_drag_phase());
    }

    #[test]
    fn test_default_tool_is_select() {
        assert_eq!(ReviewTool::default(), ReviewTool::Select);
    }

    #[test]
    fn test_cursor_icons_are_system_cursors() {
        for tool in ReviewTool::all() {
            assert!(matches!(tool.cursor_icon(), CursorIcon::System(_)));
        }
    }
}
