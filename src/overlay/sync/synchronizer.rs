//! The scroll synchronization state machine.

use bevy::prelude::*;

use crate::constants::SCROLL_POLL_INTERVAL_SECS;

/// The embedded document refused direct access (cross-origin sandbox).
///
/// This is an expected, frequent condition during normal use, not an error;
/// the synchronizer handles it by switching modes and never re-raises it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AccessDenied;

/// Capability seam between the synchronizer and the embedded page.
///
/// Direct reads and the event channel are gated by the page's origin
/// policy; the host-side estimate is what the hosting chrome can always
/// observe about its own frame and is the basis of the polling fallback.
pub trait ScrollSource {
    /// Read the embedded document's scroll offset directly. Fails when the
    /// document is cross-origin.
    fn try_read_scroll(&self) -> Result<Vec2, AccessDenied>;

    /// Scroll observations delivered by the embedded document since the
    /// last drain. Only reachable in direct mode.
    fn drain_scroll_events(&mut self) -> Result<Vec<Vec2>, AccessDenied>;

    /// Host-side estimate of the scroll offset. Never fails.
    fn estimated_scroll(&self) -> Vec2;
}

/// Which synchronization strategy the capability probe selected
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyncMode {
    /// Direct access permitted: scroll events are drained from the page
    Direct,
    /// Cross-origin: the host-side estimate is read at a fixed interval
    Polling,
}

/// Best-effort estimate of the embedded document's scroll position.
///
/// [`tick`](ScrollSync::tick) is called exactly once per frame, which is
/// what coalesces bursts of observations down to a single latest-value
/// emission. Emitted values are absolute offsets, never deltas; dropped
/// intermediate observations are by design.
#[derive(Resource, Default)]
pub struct ScrollSync {
    mode: Option<SyncMode>,
    pending: Option<Vec2>,
    last_emitted: Option<Vec2>,
    last_poll: f64,
}

impl ScrollSync {
    /// Probe the page and enter direct or polling mode.
    ///
    /// A successful direct read also queues one immediate reading so
    /// downstream state converges without waiting for the first event.
    /// Denial is silent: polling mode is selected and nothing is surfaced.
    pub fn attach<S: ScrollSource>(&mut self, page: &mut S) {
        self.detach();
        match page.try_read_scroll() {
            Ok(offset) => {
                self.mode = Some(SyncMode::Direct);
                // Discard events that predate the attach
                let _ = page.drain_scroll_events();
                self.pending = Some(offset);
            }
            Err(AccessDenied) => {
                self.mode = Some(SyncMode::Polling);
                // Force an immediate poll on the next tick
                self.last_poll = f64::NEG_INFINITY;
            }
        }
    }

    /// Stop observing: drops the active mode and cancels any pending
    /// coalesced update. Safe to call repeatedly and from any state.
    pub fn detach(&mut self) {
        self.mode = None;
        self.pending = None;
        // Forget the last emission so a future attach re-emits the current
        // offset even if it hasn't moved
        self.last_emitted = None;
    }

    /// Record an observation; collapses with any earlier observation in the
    /// same frame, keeping only the latest value
    pub fn observe(&mut self, offset: Vec2) {
        if self.mode.is_some() {
            self.pending = Some(offset);
        }
    }

    /// Per-frame step: gather observations for the active mode, then emit
    /// at most one changed value.
    pub fn tick<S: ScrollSource>(&mut self, page: &mut S, now: f64) -> Option<Vec2> {
        match self.mode? {
            SyncMode::Direct => match page.drain_scroll_events() {
                Ok(events) => {
                    if let Some(last) = events.last() {
                        self.pending = Some(*last);
                    }
                }
                Err(AccessDenied) => {
                    // The page navigated under us to a cross-origin
                    // document; degrade without dropping a frame
                    self.mode = Some(SyncMode::Polling);
                    self.last_poll = f64::NEG_INFINITY;
                }
            },
            SyncMode::Polling => {
                if now - self.last_poll >= SCROLL_POLL_INTERVAL_SECS {
                    self.last_poll = now;
                    self.pending = Some(page.estimated_scroll());
                }
            }
        }

        let offset = self.pending.take()?;
        if self.last_emitted == Some(offset) {
            return None;
        }
        self.last_emitted = Some(offset);
        Some(offset)
    }

    pub fn mode(&self) -> Option<SyncMode> {
        self.mode
    }

    pub fn is_direct(&self) -> bool {
        self.mode == Some(SyncMode::Direct)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct MockPage {
        same_origin: bool,
        scroll: Vec2,
        events: Vec<Vec2>,
    }

    impl MockPage {
        fn same_origin() -> Self {
            Self {
                same_origin: true,
                scroll: Vec2::ZERO,
                events: Vec::new(),
            }
        }

        fn cross_origin() -> Self {
            Self {
                same_origin: false,
                scroll: Vec2::ZERO,
                events: Vec::new(),
            }
        }

        fn scroll_to(&mut self, offset: Vec2) {
            self.scroll = offset;
            self.events.push(offset);
        }
    }

    impl ScrollSource for MockPage {
        fn try_read_scroll(&self) -> Result<Vec2, AccessDenied> {
            if self.same_origin {
                Ok(self.scroll)
            } else {
                Err(AccessDenied)
            }
        }

        fn drain_scroll_events(&mut self) -> Result<Vec<Vec2>, AccessDenied> {
            if self.same_origin {
                Ok(std::mem::take(&mut self.events))
            } else {
                Err(AccessDenied)
            }
        }

        fn estimated_scroll(&self) -> Vec2 {
            self.scroll
        }
    }

    #[test]
    fn test_probe_selects_direct_mode() {
        let mut page = MockPage::same_origin();
        let mut sync = ScrollSync::default();
        sync.attach(&mut page);
        assert_eq!(sync.mode(), Some(SyncMode::Direct));
    }

    #[test]
    fn test_probe_denial_degrades_to_polling() {
        let mut page = MockPage::cross_origin();
        let mut sync = ScrollSync::default();
        sync.attach(&mut page);
        assert_eq!(sync.mode(), Some(SyncMode::Polling));
    }

    #[test]
    fn test_attach_emits_immediate_reading() {
        let mut page = MockPage::same_origin();
        page.scroll = Vec2::new(0.0, 140.0);
        let mut sync = ScrollSync::default();
        sync.attach(&mut page);
        assert_eq!(sync.tick(&mut page, 0.0), Some(Vec2::new(0.0, 140.0)));
    }

    #[test]
    fn test_burst_coalesces_to_latest_value() {
        let mut page = MockPage::same_origin();
        let mut sync = ScrollSync::default();
        sync.attach(&mut page);
        sync.tick(&mut page, 0.0);

        // 100 observations inside one frame interval
        for y in 1..=100 {
            page.scroll_to(Vec2::new(0.0, y as f32));
        }

        assert_eq!(sync.tick(&mut page, 0.016), Some(Vec2::new(0.0, 100.0)));
        // Nothing left to emit on the next frame
        assert_eq!(sync.tick(&mut page, 0.033), None);
    }

    #[test]
    fn test_unchanged_value_is_not_re_emitted() {
        let mut page = MockPage::same_origin();
        let mut sync = ScrollSync::default();
        sync.attach(&mut page);
        sync.tick(&mut page, 0.0);

        page.scroll_to(Vec2::ZERO);
        assert_eq!(sync.tick(&mut page, 0.016), None);
    }

    #[test]
    fn test_polling_honors_interval() {
        let mut page = MockPage::cross_origin();
        let mut sync = ScrollSync::default();
        sync.attach(&mut page);

        // First tick polls immediately
        page.scroll = Vec2::new(0.0, 50.0);
        assert_eq!(sync.tick(&mut page, 0.0), Some(Vec2::new(0.0, 50.0)));

        // Within the poll interval nothing is read
        page.scroll = Vec2::new(0.0, 80.0);
        assert_eq!(sync.tick(&mut page, 0.016), None);

        // Past the interval the new estimate is picked up
        assert_eq!(
            sync.tick(&mut page, SCROLL_POLL_INTERVAL_SECS + 0.001),
            Some(Vec2::new(0.0, 80.0))
        );
    }

    #[test]
    fn test_detach_cancels_pending_update() {
        let mut page = MockPage::same_origin();
        let mut sync = ScrollSync::default();
        sync.attach(&mut page);
        page.scroll_to(Vec2::new(0.0, 10.0));

        sync.detach();
        assert_eq!(sync.mode(), None);
        assert_eq!(sync.tick(&mut page, 0.0), None);

        // Detach is idempotent
        sync.detach();
        sync.detach();
        assert_eq!(sync.tick(&mut page, 0.1), None);
    }

    #[test]
    fn test_observe_is_ignored_when_detached() {
        let mut page = MockPage::same_origin();
        let mut sync = ScrollSync::default();
        sync.observe(Vec2::new(5.0, 5.0));
        assert_eq!(sync.tick(&mut page, 0.0), None);
    }

    #[test]
    fn test_reprobe_switches_modes_on_navigation() {
        // Same-origin page navigates to a cross-origin one
        let mut sync = ScrollSync::default();
        let mut page = MockPage::same_origin();
        sync.attach(&mut page);
        assert!(sync.is_direct());

        let mut page = MockPage::cross_origin();
        sync.attach(&mut page);
        assert_eq!(sync.mode(), Some(SyncMode::Polling));

        // ... and back
        let mut page = MockPage::same_origin();
        sync.attach(&mut page);
        assert!(sync.is_direct());
    }

    #[test]
    fn test_mid_session_denial_degrades_silently() {
        let mut page = MockPage::same_origin();
        let mut sync = ScrollSync::default();
        sync.attach(&mut page);
        sync.tick(&mut page, 0.0);

        // Page navigates cross-origin without a reprobe
        page.same_origin = false;
        page.scroll = Vec2::new(0.0, 33.0);

        // First tick switches to polling; the following tick polls
        sync.tick(&mut page, 1.0);
        assert_eq!(sync.mode(), Some(SyncMode::Polling));
        assert_eq!(sync.tick(&mut page, 2.0), Some(Vec2::new(0.0, 33.0)));
    }
}
