//! Snapshot history resource for tracking undo/redo state.

use bevy::prelude::*;

use crate::constants::MAX_HISTORY_SNAPSHOTS;
use crate::overlay::scene::{AnnotationDocument, DrawingSurface};

/// Bounded linear history of document snapshots with a cursor.
///
/// Invariants: the list is never empty (the entry at the cursor is the
/// current document state) and the cursor is always a valid index. Undoing
/// past the start and redoing past the end are no-ops.
#[derive(Resource)]
pub struct SnapshotHistory {
    entries: Vec<AnnotationDocument>,
    cursor: usize,
}

impl Default for SnapshotHistory {
    fn default() -> Self {
        Self::new(AnnotationDocument::default())
    }
}

impl SnapshotHistory {
    pub fn new(initial: AnnotationDocument) -> Self {
        Self {
            entries: vec![initial],
            cursor: 0,
        }
    }

    /// Record a snapshot after a committed mutation.
    ///
    /// Entries beyond the cursor (the redo tail) are discarded first, so the
    /// history becomes linear again after a new edit. Past the retention
    /// bound the oldest entry is dropped and its state becomes
    /// unrecoverable.
    pub fn record(&mut self, document: AnnotationDocument) {
        self.entries.truncate(self.cursor + 1);
        self.entries.push(document);
        self.cursor += 1;

        while self.entries.len() > MAX_HISTORY_SNAPSHOTS {
            self.entries.remove(0);
            self.cursor -= 1;
        }
    }

    /// Move the cursor back one snapshot, or None at the oldest entry
    pub fn undo(&mut self) -> Option<&AnnotationDocument> {
        if self.cursor == 0 {
            return None;
        }
        self.cursor -= 1;
        Some(&self.entries[self.cursor])
    }

    /// Move the cursor forward one snapshot, or None at the newest entry
    pub fn redo(&mut self) -> Option<&AnnotationDocument> {
        if self.cursor + 1 >= self.entries.len() {
            return None;
        }
        self.cursor += 1;
        Some(&self.entries[self.cursor])
    }

    /// Step back one snapshot and restore it onto the surface. Returns
    /// false at the oldest entry. Shared by the keyboard shortcut and the
    /// toolbar button; callers drop any live selection on success.
    pub fn undo_onto(&mut self, surface: &mut DrawingSurface) -> bool {
        match self.undo().cloned() {
            Some(snapshot) => {
                surface.restore(snapshot);
                true
            }
            None => false,
        }
    }

    /// Step forward one snapshot and restore it onto the surface. Returns
    /// false at the newest entry.
    pub fn redo_onto(&mut self, surface: &mut DrawingSurface) -> bool {
        match self.redo().cloned() {
            Some(snapshot) => {
                surface.restore(snapshot);
                true
            }
            None => false,
        }
    }

    /// Collapse history to a single snapshot (used after loading a document
    /// from outside)
    pub fn reset(&mut self, document: AnnotationDocument) {
        self.entries = vec![document];
        self.cursor = 0;
    }

    pub fn can_undo(&self) -> bool {
        self.cursor > 0
    }

    pub fn can_redo(&self) -> bool {
        self.cursor + 1 < self.entries.len()
    }

    /// Number of undo steps available from the current position
    pub fn undo_depth(&self) -> usize {
        self.cursor
    }

    /// Number of redo steps available from the current position
    pub fn redo_depth(&self) -> usize {
        self.entries.len() - 1 - self.cursor
    }

    /// Total snapshots retained, including the current one
    pub fn len(&self) -> usize {
        self.entries.len()
    }
}
