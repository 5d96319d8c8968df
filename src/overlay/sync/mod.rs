//! Coordinate synchronization between the embedded page and the overlay.
//!
//! The embedded document scrolls independently of the overlay and, when it
//! is cross-origin, offers no event channel at all. [`ScrollSync`] produces
//! a continuous best-effort estimate of its scroll position either way:
//! a capability probe selects **direct mode** (scroll events from the page)
//! or **polling mode** (fixed-interval reads of the host-side estimate),
//! and every reading is coalesced to at most one emission per frame.
//!
//! ## Module Structure
//!
//! - [`synchronizer`] - ScrollSync state machine and the ScrollSource seam
//! - [`systems`] - Bevy systems driving the machine each frame and
//!   re-probing on navigation/resize

mod synchronizer;
mod systems;

// Re-exports
pub use synchronizer::{AccessDenied, ScrollSource, ScrollSync, SyncMode};
pub use systems::{attach_on_startup, drive_sync, reprobe_on_navigation, reprobe_on_resize};
