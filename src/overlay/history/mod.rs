//! Undo/Redo over full-document snapshots.
//!
//! Every committed scene mutation records a complete serialized
//! [`AnnotationDocument`](super::scene::AnnotationDocument) snapshot. Undo
//! and redo move a cursor through the bounded snapshot list and restore the
//! selected snapshot wholesale; simplicity over efficiency, acceptable
//! because snapshot size is bounded by realistic annotation counts.
//!
//! ## Usage
//!
//! - **Ctrl+Z**: Undo the last action
//! - **Ctrl+Y** or **Ctrl+Shift+Z**: Redo the last undone action
//!
//! ## Module Structure
//!
//! - [`snapshots`] - SnapshotHistory resource (cursor, bound, truncation)
//! - [`systems`] - Bevy systems for the keyboard shortcuts

mod snapshots;
mod systems;


// Re-exports
pub use snapshots::SnapshotHistory;
pub use systems::{handle_redo, handle_undo};
