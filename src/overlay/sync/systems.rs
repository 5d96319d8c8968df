//! Bevy systems driving the scroll synchronizer.

use bevy::prelude::*;
use bevy::window::WindowResized;

use crate::page::{EmbeddedPage, PageNavigated};

use super::super::viewport::ViewportTransform;
use super::synchronizer::ScrollSync;

/// Probe the initial page once at startup
pub fn attach_on_startup(mut sync: ResMut<ScrollSync>, mut page: ResMut<EmbeddedPage>) {
    sync.attach(&mut *page);
    info!(
        "Scroll sync attached to {} in {:?} mode",
        page.url(),
        sync.mode()
    );
}

/// A same-origin page may navigate to a cross-origin one or vice versa, so
/// the access mode is re-probed from scratch on every navigation
pub fn reprobe_on_navigation(
    mut navigations: MessageReader<PageNavigated>,
    mut sync: ResMut<ScrollSync>,
    mut page: ResMut<EmbeddedPage>,
) {
    let mut navigated = false;
    for _ in navigations.read() {
        navigated = true;
    }
    if navigated {
        sync.attach(&mut *page);
        info!(
            "Scroll sync re-probed after navigation to {}: {:?} mode",
            page.url(),
            sync.mode()
        );
    }
}

/// Resizing the hosting viewport re-lays-out the embedded frame, so the
/// access mode is re-probed there too
pub fn reprobe_on_resize(
    mut resizes: MessageReader<WindowResized>,
    mut sync: ResMut<ScrollSync>,
    mut page: ResMut<EmbeddedPage>,
) {
    let mut resized = false;
    for _ in resizes.read() {
        resized = true;
    }
    if resized {
        sync.attach(&mut *page);
        debug!("Scroll sync re-probed after resize: {:?} mode", sync.mode());
    }
}

/// Per-frame step: run the synchronizer once and apply any emitted offset
/// as the overlay's pan. Running once per frame is what coalesces bursts of
/// observations to the display refresh rate.
pub fn drive_sync(
    time: Res<Time>,
    mut sync: ResMut<ScrollSync>,
    mut page: ResMut<EmbeddedPage>,
    mut viewport: ResMut<ViewportTransform>,
) {
    if let Some(offset) = sync.tick(&mut *page, time.elapsed_secs_f64()) {
        let zoom = viewport.zoom();
        viewport.set_viewport(zoom, offset);
    }
}
