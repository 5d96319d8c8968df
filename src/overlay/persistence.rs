//! Debounced persistence of the annotation document.
//!
//! Committed mutations bump the surface's revision counter; a watcher turns
//! that into a dirty flag, and after a quiet period the serialized document
//! is pushed out in one [`AnnotationsChanged`] message. Rapid edit bursts
//! coalesce into a single write. File I/O runs on the IO task pool so a
//! slow disk never blocks a frame.

use std::collections::{HashMap, HashSet};
use std::path::{Path, PathBuf};

use bevy::prelude::*;
use bevy::tasks::{IoTaskPool, Task};
use futures_lite::future;

use crate::constants::PERSIST_DEBOUNCE_SECS;
use crate::paths::autosave_file;

use super::scene::{AnnotationDocument, DrawingSurface, SurfaceMutator};

/// The document changed and the quiet period elapsed. Carries the full
/// serialized state; consumers never see intermediate revisions.
#[derive(Message)]
pub struct AnnotationsChanged {
    pub document: AnnotationDocument,
}

/// Explicit save to a user-chosen file
#[derive(Message)]
pub struct SaveReviewRequest {
    pub path: PathBuf,
}

/// Load a review file, replacing the current document
#[derive(Message)]
pub struct LoadReviewRequest {
    pub path: PathBuf,
}

/// The file the current review is bound to, if any. Debounced writes go
/// here once set; before that they go to the autosave file.
#[derive(Resource, Default)]
pub struct ReviewFile {
    pub path: Option<PathBuf>,
}

#[derive(Resource, Default)]
pub struct PersistDebounce {
    last_seen_revision: u64,
    last_change_at: f64,
    dirty: bool,
}

impl PersistDebounce {
    /// Note the surface's current revision; a new revision restarts the
    /// quiet period
    pub fn note_revision(&mut self, revision: u64, now: f64) {
        if revision != self.last_seen_revision {
            self.last_seen_revision = revision;
            self.last_change_at = now;
            self.dirty = true;
        }
    }

    /// True exactly once per dirty period, after the quiet period elapses
    pub fn should_flush(&mut self, now: f64) -> bool {
        if !self.dirty || now - self.last_change_at < PERSIST_DEBOUNCE_SECS {
            return false;
        }
        self.dirty = false;
        true
    }

    /// Mark the given revision as already persisted (load path)
    pub fn mark_clean(&mut self, revision: u64) {
        self.last_seen_revision = revision;
        self.dirty = false;
    }
}

/// Orders writes per path: at most one write to a given path is in flight,
/// and a newer document submitted meanwhile is held back and dispatched
/// when the in-flight write completes. Without the ordering, a slow
/// autosave could land after a newer manual save and leave stale content
/// on disk.
#[derive(Resource, Default)]
pub struct WriteQueue {
    in_flight: HashSet<PathBuf>,
    pending: HashMap<PathBuf, AnnotationDocument>,
}

impl WriteQueue {
    /// Claim the path for writing. Returns the document to dispatch now,
    /// or None when a write to that path is already running; in that case
    /// the document is held (latest submission wins) until [`complete`].
    ///
    /// [`complete`]: WriteQueue::complete
    pub fn submit(
        &mut self,
        path: PathBuf,
        document: AnnotationDocument,
    ) -> Option<(PathBuf, AnnotationDocument)> {
        if self.in_flight.contains(&path) {
            self.pending.insert(path, document);
            return None;
        }
        self.in_flight.insert(path.clone());
        Some((path, document))
    }

    /// Release the path after its write finishes. Returns the held
    /// follow-up write to dispatch, if one arrived in the meantime.
    pub fn complete(&mut self, path: &Path) -> Option<(PathBuf, AnnotationDocument)> {
        self.in_flight.remove(path);
        let document = self.pending.remove(path)?;
        self.in_flight.insert(path.to_path_buf());
        Some((path.to_path_buf(), document))
    }
}

struct WriteOutcome {
    path: PathBuf,
    error: Option<String>,
}

#[derive(Component)]
pub(crate) struct WriteReviewTask(Task<WriteOutcome>);

struct ReadOutcome {
    path: PathBuf,
    result: Result<AnnotationDocument, String>,
}

#[derive(Component)]
pub(crate) struct ReadReviewTask(Task<ReadOutcome>);

/// Watch the surface's revision counter and restart the quiet period on
/// every committed mutation
pub fn watch_document_changes(
    surface: Res<DrawingSurface>,
    time: Res<Time>,
    mut debounce: ResMut<PersistDebounce>,
) {
    debounce.note_revision(surface.revision(), time.elapsed_secs_f64());
}

/// Once the quiet period elapses, emit the serialized document exactly once
pub fn flush_debounced_changes(
    surface: Res<DrawingSurface>,
    time: Res<Time>,
    mut debounce: ResMut<PersistDebounce>,
    mut changed: MessageWriter<AnnotationsChanged>,
) {
    if debounce.should_flush(time.elapsed_secs_f64()) {
        changed.write(AnnotationsChanged {
            document: surface.serialize(),
        });
    }
}

/// Write each coalesced document state to the bound review file, or to the
/// autosave file when no file is bound yet
pub fn autosave_on_change(
    mut commands: Commands,
    mut changed: MessageReader<AnnotationsChanged>,
    review_file: Res<ReviewFile>,
    mut queue: ResMut<WriteQueue>,
) {
    // Only the last message per frame matters; earlier states are stale
    let Some(event) = changed.read().last() else {
        return;
    };
    let path = review_file.path.clone().unwrap_or_else(autosave_file);
    if let Some((path, document)) = queue.submit(path, event.document.clone()) {
        spawn_write_task(&mut commands, path, document);
    }
}

pub fn handle_save_requests(
    mut commands: Commands,
    mut requests: MessageReader<SaveReviewRequest>,
    surface: Res<DrawingSurface>,
    mut review_file: ResMut<ReviewFile>,
    mut queue: ResMut<WriteQueue>,
) {
    for request in requests.read() {
        review_file.path = Some(request.path.clone());
        if let Some((path, document)) = queue.submit(request.path.clone(), surface.serialize()) {
            spawn_write_task(&mut commands, path, document);
        }
    }
}

fn spawn_write_task(commands: &mut Commands, path: PathBuf, document: AnnotationDocument) {
    let task = IoTaskPool::get().spawn(async move {
        let error = document
            .to_json()
            .map_err(|e| format!("Failed to serialize review: {}", e))
            .and_then(|json| {
                std::fs::write(&path, json).map_err(|e| format!("Failed to write file: {}", e))
            })
            .err();
        WriteOutcome { path, error }
    });
    commands.spawn(WriteReviewTask(task));
}

pub fn poll_write_tasks(
    mut commands: Commands,
    mut tasks: Query<(Entity, &mut WriteReviewTask)>,
    mut queue: ResMut<WriteQueue>,
) {
    for (entity, mut task) in tasks.iter_mut() {
        if let Some(outcome) = future::block_on(future::poll_once(&mut task.0)) {
            match outcome.error {
                None => debug!("Review written to {:?}", outcome.path),
                Some(error) => error!("{}", error),
            }
            // A newer document queued behind this write goes out next
            if let Some((path, document)) = queue.complete(&outcome.path) {
                spawn_write_task(&mut commands, path, document);
            }
            commands.entity(entity).despawn();
        }
    }
}

pub fn handle_load_requests(mut commands: Commands, mut requests: MessageReader<LoadReviewRequest>) {
    for request in requests.read() {
        let path = request.path.clone();
        let task = IoTaskPool::get().spawn(async move {
            let result = std::fs::read_to_string(&path)
                .map_err(|e| format!("Failed to read file: {}", e))
                .and_then(|json| {
                    AnnotationDocument::from_json(&json)
                        .map_err(|e| format!("Failed to parse review: {}", e))
                });
            ReadOutcome { path, result }
        });
        commands.spawn(ReadReviewTask(task));
    }
}

/// Apply loaded documents. A file that fails to read or parse is rejected
/// whole; the current document is left untouched.
pub fn poll_load_tasks(
    mut commands: Commands,
    mut tasks: Query<(Entity, &mut ReadReviewTask)>,
    mut mutator: SurfaceMutator,
    mut review_file: ResMut<ReviewFile>,
    mut debounce: ResMut<PersistDebounce>,
) {
    for (entity, mut task) in tasks.iter_mut() {
        if let Some(outcome) = future::block_on(future::poll_once(&mut task.0)) {
            match outcome.result {
                Ok(document) => {
                    info!(
                        "Loaded review from {:?} ({} shapes)",
                        outcome.path,
                        document.shapes.len()
                    );
                    mutator.load_from(document);
                    review_file.path = Some(outcome.path);
                    // The load itself is not an edit worth autosaving
                    let revision = mutator.surface.revision();
                    debounce.mark_clean(revision);
                }
                Err(error) => error!("{}", error),
            }
            commands.entity(entity).despawn();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_burst_of_edits_flushes_once_after_quiet_period() {
        let mut debounce = PersistDebounce::default();

        // Three rapid edits; each restarts the quiet period
        debounce.note_revision(1, 0.0);
        debounce.note_revision(2, 0.2);
        debounce.note_revision(3, 0.4);

        assert!(!debounce.should_flush(0.4 + PERSIST_DEBOUNCE_SECS - 0.01));
        assert!(debounce.should_flush(0.4 + PERSIST_DEBOUNCE_SECS));
        // Exactly once
        assert!(!debounce.should_flush(10.0));
    }

    #[test]
    fn test_unchanged_revision_does_not_dirty() {
        let mut debounce = PersistDebounce::default();
        debounce.note_revision(5, 0.0);
        assert!(debounce.should_flush(PERSIST_DEBOUNCE_SECS));

        // Same revision observed again; nothing new to persist
        debounce.note_revision(5, 3.0);
        assert!(!debounce.should_flush(100.0));
    }

    #[test]
    fn test_write_to_busy_path_is_held_until_complete() {
        let mut queue = WriteQueue::default();
        let path = PathBuf::from("/reviews/homepage.json");

        let doc_a = AnnotationDocument {
            version: "a".to_string(),
            ..Default::default()
        };
        let doc_b = AnnotationDocument {
            version: "b".to_string(),
            ..Default::default()
        };

        assert!(queue.submit(path.clone(), doc_a).is_some());
        // The path is busy; the newer document waits its turn
        assert!(queue.submit(path.clone(), doc_b.clone()).is_none());

        let (next_path, next_doc) = queue.complete(&path).unwrap();
        assert_eq!(next_path, path);
        assert_eq!(next_doc, doc_b);

        // Second completion finds nothing queued
        assert!(queue.complete(&path).is_none());
        assert!(queue.submit(path, AnnotationDocument::default()).is_some());
    }

    #[test]
    fn test_latest_held_write_wins() {
        let mut queue = WriteQueue::default();
        let path = PathBuf::from("/reviews/homepage.json");

        let stale = AnnotationDocument {
            version: "stale".to_string(),
            ..Default::default()
        };
        let fresh = AnnotationDocument {
            version: "fresh".to_string(),
            ..Default::default()
        };

        assert!(queue.submit(path.clone(), AnnotationDocument::default()).is_some());
        queue.submit(path.clone(), stale);
        queue.submit(path.clone(), fresh.clone());

        let (_, next_doc) = queue.complete(&path).unwrap();
        assert_eq!(next_doc, fresh);
    }

    #[test]
    fn test_distinct_paths_write_independently() {
        let mut queue = WriteQueue::default();
        let a = PathBuf::from("/reviews/a.json");
        let b = PathBuf::from("/reviews/b.json");

        assert!(queue.submit(a.clone(), AnnotationDocument::default()).is_some());
        assert!(queue.submit(b, AnnotationDocument::default()).is_some());
        assert!(queue.complete(&a).is_none());
    }

    #[test]
    fn test_mark_clean_suppresses_flush_for_that_revision() {
        let mut debounce = PersistDebounce::default();
        debounce.note_revision(7, 0.0);
        debounce.mark_clean(7);
        assert!(!debounce.should_flush(100.0));

        // A later edit still flushes
        debounce.note_revision(8, 100.0);
        assert!(debounce.should_flush(100.0 + PERSIST_DEBOUNCE_SECS));
    }
}
