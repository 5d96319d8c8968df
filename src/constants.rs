//! Centralized constants used across the application.
//!
//! This module contains magic numbers and configuration values that are used
//! in multiple places or would benefit from being named constants.

/// Default window width in pixels
pub const DEFAULT_WINDOW_WIDTH: f32 = 1600.0;

/// Default window height in pixels
pub const DEFAULT_WINDOW_HEIGHT: f32 = 900.0;

/// Origin under which embedded pages are considered same-origin with the
/// review host. Pages outside this origin deny direct scroll observation.
pub const HOST_ORIGIN: &str = "https://review.overmark.local";

/// Page loaded on startup
pub const DEFAULT_PAGE_URL: &str = "https://review.overmark.local/welcome";

/// Unscaled content width of an embedded page, in logical pixels
pub const DEFAULT_CONTENT_WIDTH: f32 = 1280.0;

/// Unscaled content height of an embedded page, in logical pixels
pub const DEFAULT_CONTENT_HEIGHT: f32 = 3200.0;

/// Pixels scrolled per wheel line unit
pub const WHEEL_LINE_SCROLL_PX: f32 = 40.0;

/// Interval between scroll reads when the synchronizer runs in polling mode
pub const SCROLL_POLL_INTERVAL_SECS: f64 = 0.05;

/// Quiet period after a committed mutation before the serialized document is
/// pushed to persistence. Rapid edits coalesce into one write.
pub const PERSIST_DEBOUNCE_SECS: f64 = 1.0;

/// How long the overlay stops intercepting pointer input after a wheel
/// event while a drawing tool is active. Reset by each new wheel event.
pub const WHEEL_PASS_THROUGH_SECS: f64 = 1.0;

/// Maximum number of document snapshots retained for undo/redo
pub const MAX_HISTORY_SNAPSHOTS: usize = 50;

/// Length of each arrowhead segment, in logical pixels
pub const ARROW_HEAD_LENGTH: f32 = 16.0;

/// Angle between the arrow shaft and each head segment (30 degrees)
pub const ARROW_HEAD_ANGLE: f32 = std::f32::consts::FRAC_PI_6;

/// Minimum cursor travel before a new point is appended to a freehand path
pub const MIN_FREEHAND_POINT_DISTANCE: f32 = 2.0;

/// Multiplier applied to the active stroke width for highlighter strokes
pub const HIGHLIGHTER_WIDTH_FACTOR: f32 = 4.0;

/// Maximum number of recently visited pages remembered in config
pub const MAX_RECENT_PAGES: usize = 5;
