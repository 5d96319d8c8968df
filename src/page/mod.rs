//! The embedded page being reviewed.
//!
//! Stands in for the framed third-party document: it owns the page's URL,
//! content size, and scroll state, and exposes them through the
//! [`ScrollSource`] capability seam. Whether the synchronizer may observe
//! the scroll directly depends on the page's origin relative to the review
//! host; cross-origin pages deny direct reads and the host falls back to
//! its own estimate.

use bevy::camera::visibility::RenderLayers;
use bevy::gizmos::config::{GizmoConfigGroup, GizmoConfigStore};
use bevy::input::mouse::{MouseScrollUnit, MouseWheel};
use bevy::prelude::*;
use bevy::window::WindowResized;
use bevy_egui::EguiContexts;

use crate::constants::{
    DEFAULT_CONTENT_HEIGHT, DEFAULT_CONTENT_WIDTH, DEFAULT_PAGE_URL, DEFAULT_WINDOW_HEIGHT,
    DEFAULT_WINDOW_WIDTH, HOST_ORIGIN, WHEEL_LINE_SCROLL_PX,
};
use crate::overlay::sync::{AccessDenied, ScrollSource};
use crate::overlay::viewport::ViewportTransform;

/// Ask the page frame to load a new URL
#[derive(Message)]
pub struct NavigateRequest {
    pub url: String,
}

/// The page frame finished loading a new document. Consumers re-probe
/// anything origin-dependent.
#[derive(Message)]
pub struct PageNavigated {
    pub url: String,
}

#[derive(Resource)]
pub struct EmbeddedPage {
    url: String,
    same_origin: bool,
    content_size: Vec2,
    scroll: Vec2,
    /// Scroll observations since the last drain; only handed out to
    /// same-origin observers
    scroll_events: Vec<Vec2>,
    viewport_size: Vec2,
}

impl Default for EmbeddedPage {
    fn default() -> Self {
        Self::new(DEFAULT_PAGE_URL)
    }
}

impl EmbeddedPage {
    pub fn new(url: &str) -> Self {
        Self {
            url: url.to_string(),
            same_origin: is_same_origin(url),
            content_size: Vec2::new(DEFAULT_CONTENT_WIDTH, DEFAULT_CONTENT_HEIGHT),
            scroll: Vec2::ZERO,
            scroll_events: Vec::new(),
            viewport_size: Vec2::new(DEFAULT_WINDOW_WIDTH, DEFAULT_WINDOW_HEIGHT),
        }
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    pub fn is_same_origin(&self) -> bool {
        self.same_origin
    }

    pub fn content_size(&self) -> Vec2 {
        self.content_size
    }

    pub fn scroll(&self) -> Vec2 {
        self.scroll
    }

    /// Load a new document: scroll resets to the top and stale observations
    /// from the previous document are dropped
    pub fn navigate(&mut self, url: &str) {
        self.url = url.to_string();
        self.same_origin = is_same_origin(url);
        self.scroll = Vec2::ZERO;
        self.scroll_events.clear();
    }

    pub fn set_viewport_size(&mut self, size: Vec2) {
        self.viewport_size = size;
        self.clamp_scroll();
    }

    /// Scroll by a delta, clamped to the document's scrollable range
    pub fn scroll_by(&mut self, delta: Vec2) {
        self.scroll += delta;
        self.clamp_scroll();
        self.scroll_events.push(self.scroll);
    }

    fn clamp_scroll(&mut self) {
        let max = (self.content_size - self.viewport_size).max(Vec2::ZERO);
        self.scroll = self.scroll.clamp(Vec2::ZERO, max);
    }
}

impl ScrollSource for EmbeddedPage {
    fn try_read_scroll(&self) -> Result<Vec2, AccessDenied> {
        if self.same_origin {
            Ok(self.scroll)
        } else {
            Err(AccessDenied)
        }
    }

    fn drain_scroll_events(&mut self) -> Result<Vec<Vec2>, AccessDenied> {
        if self.same_origin {
            Ok(std::mem::take(&mut self.scroll_events))
        } else {
            // Cross-origin documents never surface their events; clear them
            // so a later same-origin navigation starts clean
            self.scroll_events.clear();
            Err(AccessDenied)
        }
    }

    fn estimated_scroll(&self) -> Vec2 {
        self.scroll
    }
}

fn is_same_origin(url: &str) -> bool {
    url.starts_with(HOST_ORIGIN)
}

/// Mirror the initial page's content size into the overlay's drawing
/// surface before the first frame; [`handle_navigation`] keeps the two in
/// step afterwards
pub fn seed_viewport_size(page: Res<EmbeddedPage>, mut viewport: ResMut<ViewportTransform>) {
    viewport.set_logical_size(page.content_size());
}

pub fn handle_navigation(
    mut requests: MessageReader<NavigateRequest>,
    mut navigated: MessageWriter<PageNavigated>,
    mut page: ResMut<EmbeddedPage>,
    mut viewport: ResMut<ViewportTransform>,
) {
    for request in requests.read() {
        page.navigate(&request.url);
        viewport.set_logical_size(page.content_size());
        info!(
            "Navigated to {} ({})",
            page.url(),
            if page.is_same_origin() {
                "same-origin"
            } else {
                "cross-origin"
            }
        );
        navigated.write(PageNavigated {
            url: request.url.clone(),
        });
    }
}

/// Wheel input always reaches the page frame; the overlay's pointer
/// interception never captures the wheel
pub fn scroll_page_on_wheel(
    mut wheel: MessageReader<MouseWheel>,
    mut page: ResMut<EmbeddedPage>,
    mut contexts: EguiContexts,
) {
    let over_ui = contexts
        .ctx_mut()
        .map(|ctx| ctx.is_pointer_over_area())
        .unwrap_or(false);

    for event in wheel.read() {
        if over_ui {
            continue;
        }
        let scale = match event.unit {
            MouseScrollUnit::Line => WHEEL_LINE_SCROLL_PX,
            MouseScrollUnit::Pixel => 1.0,
        };
        // Wheel up (positive y) scrolls toward the top of the document
        page.scroll_by(Vec2::new(-event.x * scale, -event.y * scale));
    }
}

pub fn track_frame_size(mut resizes: MessageReader<WindowResized>, mut page: ResMut<EmbeddedPage>) {
    for resize in resizes.read() {
        page.set_viewport_size(Vec2::new(resize.width, resize.height));
    }
}

/// Gizmo group for the placeholder page frame
#[derive(Default, Reflect, GizmoConfigGroup)]
pub struct PageGizmoGroup;

pub fn configure_page_gizmos(mut config_store: ResMut<GizmoConfigStore>) {
    let (config, _) = config_store.config_mut::<PageGizmoGroup>();
    config.render_layers = RenderLayers::layer(0);
    config.line.width = 1.0;
}

/// Placeholder rendering of the embedded document: the content outline and
/// a ruled texture so scroll and zoom are visible against the annotations
pub fn render_page_frame(
    mut gizmos: Gizmos<PageGizmoGroup>,
    page: Res<EmbeddedPage>,
    viewport: Res<ViewportTransform>,
) {
    let size = page.content_size();
    let border = Color::srgb(0.45, 0.45, 0.5);
    let rule = Color::srgba(0.55, 0.55, 0.6, 0.4);

    let center = viewport.logical_to_world(size / 2.0);
    gizmos.rect_2d(
        Isometry2d::from_translation(center),
        size * viewport.zoom(),
        border,
    );

    // A rule every 200 logical px stands in for page content
    let mut y = 200.0;
    while y < size.y {
        gizmos.line_2d(
            viewport.logical_to_world(Vec2::new(40.0, y)),
            viewport.logical_to_world(Vec2::new(size.x - 40.0, y)),
            rule,
        );
        y += 200.0;
    }
}

pub struct PagePlugin;

impl Plugin for PagePlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<EmbeddedPage>()
            .add_message::<NavigateRequest>()
            .add_message::<PageNavigated>()
            .init_gizmo_group::<PageGizmoGroup>()
            .add_systems(Startup, (configure_page_gizmos, seed_viewport_size))
            .add_systems(
                Update,
                (
                    handle_navigation,
                    scroll_page_on_wheel,
                    track_frame_size,
                    render_page_frame,
                ),
            );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_host_origin_pages_are_same_origin() {
        let page = EmbeddedPage::new("https://review.overmark.local/app/settings");
        assert!(page.is_same_origin());
        assert!(page.try_read_scroll().is_ok());
    }

    #[test]
    fn test_external_pages_are_cross_origin() {
        let page = EmbeddedPage::new("https://example.com/pricing");
        assert!(!page.is_same_origin());
        assert_eq!(page.try_read_scroll(), Err(AccessDenied));
    }

    #[test]
    fn test_navigation_resets_scroll_and_events() {
        let mut page = EmbeddedPage::new("https://review.overmark.local/a");
        page.scroll_by(Vec2::new(0.0, 500.0));
        assert!(!page.drain_scroll_events().unwrap().is_empty());

        page.scroll_by(Vec2::new(0.0, 100.0));
        page.navigate("https://review.overmark.local/b");
        assert_eq!(page.scroll(), Vec2::ZERO);
        assert!(page.drain_scroll_events().unwrap().is_empty());
    }

    #[test]
    fn test_scroll_clamped_to_document_range() {
        let mut page = EmbeddedPage::default();
        page.scroll_by(Vec2::new(0.0, -100.0));
        assert_eq!(page.scroll(), Vec2::ZERO);

        page.scroll_by(Vec2::new(0.0, 1.0e9));
        let max_y = DEFAULT_CONTENT_HEIGHT - DEFAULT_WINDOW_HEIGHT;
        assert_eq!(page.scroll().y, max_y);
    }

    #[test]
    fn test_cross_origin_denies_event_drain_but_not_estimate() {
        let mut page = EmbeddedPage::new("https://example.com");
        page.scroll_by(Vec2::new(0.0, 250.0));
        assert_eq!(page.drain_scroll_events(), Err(AccessDenied));
        assert_eq!(page.estimated_scroll(), Vec2::new(0.0, 250.0));
    }

    #[test]
    fn test_default_surface_size_matches_default_page() {
        // The drawing surface and the page frame agree on the content size
        // before any navigation happens
        assert_eq!(
            ViewportTransform::default().logical_size(),
            EmbeddedPage::default().content_size()
        );
    }

    #[test]
    fn test_origin_recomputed_on_navigation() {
        let mut page = EmbeddedPage::new("https://review.overmark.local/a");
        assert!(page.is_same_origin());
        page.navigate("https://example.com/docs");
        assert!(!page.is_same_origin());
        page.navigate("https://review.overmark.local/c");
        assert!(page.is_same_origin());
    }
}
