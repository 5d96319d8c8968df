//! The overlay's viewport transform and cursor-to-logical conversion.
//!
//! Shape geometry lives in the page's logical coordinate space: origin at
//! the page content's top-left, y growing downward, unzoomed and unpanned.
//! The transform maps that space to Bevy world coordinates (y up) for
//! rendering, and back for incoming pointer events: raw pointer pixels are
//! divided by the zoom level and offset by the pan before they ever reach
//! shape geometry.

use bevy::ecs::system::SystemParam;
use bevy::prelude::*;
use bevy::window::PrimaryWindow;

use crate::constants::{DEFAULT_CONTENT_HEIGHT, DEFAULT_CONTENT_WIDTH};

#[derive(Component)]
pub struct OverlayCamera;

/// { zoom, pan } plus the logical content size and the world position of
/// the page's top-left corner.
///
/// Written by exactly two callers: the scroll synchronizer (pan) and the
/// host chrome's zoom control (zoom). Everyone else reads.
#[derive(Resource)]
pub struct ViewportTransform {
    zoom: f32,
    pan: Vec2,
    logical_size: Vec2,
    /// World-space position of the page's top-left as currently rendered
    origin: Vec2,
}

impl Default for ViewportTransform {
    fn default() -> Self {
        Self {
            zoom: 1.0,
            pan: Vec2::ZERO,
            logical_size: Vec2::new(DEFAULT_CONTENT_WIDTH, DEFAULT_CONTENT_HEIGHT),
            origin: Vec2::ZERO,
        }
    }
}

impl ViewportTransform {
    pub fn zoom(&self) -> f32 {
        self.zoom
    }

    pub fn pan(&self) -> Vec2 {
        self.pan
    }

    pub fn logical_size(&self) -> Vec2 {
        self.logical_size
    }

    /// Whether a logical point falls on the drawing surface. Pointer
    /// gestures outside the page content never start a shape.
    pub fn contains_logical(&self, p: Vec2) -> bool {
        p.x >= 0.0 && p.y >= 0.0 && p.x <= self.logical_size.x && p.y <= self.logical_size.y
    }

    /// Update zoom and pan together. Returns false (and does nothing) when
    /// the values are unchanged, so redundant scroll emissions don't
    /// trigger downstream work.
    pub fn set_viewport(&mut self, zoom: f32, pan: Vec2) -> bool {
        if self.zoom == zoom && self.pan == pan {
            return false;
        }
        // Zoom must stay positive; a zero zoom would collapse the transform
        self.zoom = zoom.max(0.01);
        self.pan = pan;
        true
    }

    /// Resize the drawing surface to the embedded document's rendered
    /// size. Distinct from zoom: this is the unscaled content size.
    pub fn set_logical_size(&mut self, size: Vec2) {
        self.logical_size = size;
    }

    pub fn set_origin(&mut self, origin: Vec2) {
        self.origin = origin;
    }

    /// Logical page coordinates to Bevy world coordinates
    pub fn logical_to_world(&self, p: Vec2) -> Vec2 {
        Vec2::new(
            self.origin.x + (p.x - self.pan.x) * self.zoom,
            self.origin.y - (p.y - self.pan.y) * self.zoom,
        )
    }

    /// Bevy world coordinates back to logical page coordinates
    pub fn world_to_logical(&self, w: Vec2) -> Vec2 {
        Vec2::new(
            (w.x - self.origin.x) / self.zoom + self.pan.x,
            (self.origin.y - w.y) / self.zoom + self.pan.y,
        )
    }
}

/// Bundled camera and window queries for cursor-to-world calculations
#[derive(SystemParam)]
pub struct CameraParams<'w, 's> {
    pub window: Query<'w, 's, &'static Window, With<PrimaryWindow>>,
    pub camera: Query<'w, 's, (&'static Camera, &'static GlobalTransform), With<OverlayCamera>>,
}

impl CameraParams<'_, '_> {
    /// Get the world position of the cursor, if available
    pub fn cursor_world_pos(&self) -> Option<Vec2> {
        let window = self.window.single().ok()?;
        let (camera, transform) = self.camera.single().ok()?;
        let cursor_pos = window.cursor_position()?;
        camera.viewport_to_world_2d(transform, cursor_pos).ok()
    }

    /// Cursor position in the page's logical space, if available
    pub fn cursor_logical_pos(&self, viewport: &ViewportTransform) -> Option<Vec2> {
        self.cursor_world_pos().map(|w| viewport.world_to_logical(w))
    }
}

pub fn spawn_camera(mut commands: Commands) {
    commands.spawn((
        Camera2d,
        OverlayCamera,
        Transform::from_translation(Vec3::new(0.0, 0.0, 1000.0)),
    ));
}

/// Keep the page's top-left pinned to the window's top-left. With the
/// camera at the world origin, the window's top-left corner sits at
/// (-w/2, +h/2) in world space.
pub fn track_window_origin(
    window_query: Query<&Window, With<PrimaryWindow>>,
    mut viewport: ResMut<ViewportTransform>,
) {
    let Ok(window) = window_query.single() else {
        return;
    };
    viewport.set_origin(Vec2::new(-window.width() / 2.0, window.height() / 2.0));
}

/// Host-chrome zoom control: Ctrl+= / Ctrl+- step the zoom, Ctrl+0 resets.
/// Pan is preserved so the page does not jump while zooming.
pub fn handle_zoom_shortcuts(
    keyboard: Res<ButtonInput<KeyCode>>,
    mut viewport: ResMut<ViewportTransform>,
) {
    let ctrl = keyboard.pressed(KeyCode::ControlLeft)
        || keyboard.pressed(KeyCode::ControlRight)
        || keyboard.pressed(KeyCode::SuperLeft)
        || keyboard.pressed(KeyCode::SuperRight);
    if !ctrl {
        return;
    }

    let zoom = viewport.zoom();
    let pan = viewport.pan();
    if keyboard.just_pressed(KeyCode::Equal) {
        viewport.set_viewport((zoom * 1.1).min(4.0), pan);
    } else if keyboard.just_pressed(KeyCode::Minus) {
        viewport.set_viewport((zoom / 1.1).max(0.25), pan);
    } else if keyboard.just_pressed(KeyCode::Digit0) {
        viewport.set_viewport(1.0, pan);
    }
}
