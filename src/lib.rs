//! Flipbook: a right-to-left two-page book navigation core
//!
//! This crate provides the navigation engine behind an animated page-flip
//! viewer:
//! - Side assignment and materialization order for RTL pairing (cover alone,
//!   then pairs anchored on the right page)
//! - A spread state machine with a two-phase flip protocol (reveal behind,
//!   then animate the front leaf off)
//! - A transition lock so only one flip is ever in flight
//! - Jump normalization from arbitrary page targets to valid spread anchors
//!
//! Rendering pages, building DOM elements, and timing the visual transform
//! are external collaborators reached through the [`host`] traits; a
//! browser implementation lives in [`wasm`] (wasm32 targets only).

pub mod document;
pub mod host;
pub mod input;
pub mod layout;
pub mod nav;
pub mod render;
#[cfg(target_arch = "wasm32")]
pub mod wasm;

// Re-export WASM entry points for direct use
#[cfg(target_arch = "wasm32")]
pub use wasm::WasmFlipbook;

// Re-export primary types
pub use document::{Document, Page, PageOrdinal, PageRegistry, Side};
pub use host::{DisplayHost, PageRenderer};
pub use input::Intent;
pub use nav::{FlipDirection, NavOutcome, NavigationState, TransitionPlan};
pub use render::{PagePlacement, Scene, StackOrder};

use log::debug;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Tunables for the viewer, mirroring what embedders configure
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct FlipbookConfig {
    /// Rasterization scale passed to the page renderer
    pub scale: f64,
    /// Fixed flip duration; the lock is held for exactly this long
    pub animation_duration_ms: u32,
    pub min_zoom: f64,
    pub max_zoom: f64,
    pub zoom_step: f64,
    /// Minimum horizontal travel for a swipe to register
    pub swipe_threshold_px: f64,
}

impl Default for FlipbookConfig {
    fn default() -> Self {
        Self {
            scale: 2.0,
            animation_duration_ms: 800,
            min_zoom: 0.5,
            max_zoom: 2.0,
            zoom_step: 0.1,
            swipe_threshold_px: 50.0,
        }
    }
}

/// Fatal load-time failures. Navigation itself never errors: out-of-range
/// and mid-transition requests are dropped silently by design.
#[derive(Debug, Error)]
pub enum FlipbookError {
    #[error("invalid document: page count must be at least 1")]
    InvalidDocument,
    #[error("failed to render page {ordinal}: {reason}")]
    RenderFailed { ordinal: u32, reason: String },
}

/// Serializable view of the navigation state, for debug surfaces
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NavSnapshot {
    pub current_page: u32,
    pub page_count: u32,
    pub transitioning: bool,
    pub zoom: f64,
}

/// The flipbook engine: document, page registry, navigation state, and the
/// display host they drive.
pub struct Flipbook<H: DisplayHost> {
    document: Document,
    registry: PageRegistry<H::Surface>,
    nav: NavigationState,
    config: FlipbookConfig,
    host: H,
}

impl<H: DisplayHost> Flipbook<H> {
    /// Build the book: render every page in materialization order, attach
    /// the surfaces, and apply the cover's resting layout.
    ///
    /// A single render failure aborts the load with no partial state — the
    /// half-built host tree is dropped along with the engine.
    pub async fn load<R>(
        mut host: H,
        renderer: &mut R,
        page_count: u32,
        config: FlipbookConfig,
    ) -> Result<Self, FlipbookError>
    where
        R: PageRenderer<Surface = H::Surface>,
    {
        let document = Document::new(page_count)?;

        let mut registry = PageRegistry::new();
        for slot in layout::build_order(&document) {
            let surface = renderer
                .render_surface(slot.ordinal, config.scale)
                .await
                .map_err(|e| FlipbookError::RenderFailed {
                    ordinal: slot.ordinal.0,
                    reason: e.to_string(),
                })?;
            host.attach(slot.ordinal, slot.side, &surface);
            registry.insert(Page {
                ordinal: slot.ordinal,
                side: slot.side,
                surface,
            });
        }
        debug!("nav: loaded {} pages", page_count);

        let mut book = Self {
            document,
            registry,
            nav: NavigationState::new(),
            config,
            host,
        };
        book.apply_resting();
        Ok(book)
    }

    /// Flip forward to the next spread, returning once the resting layout
    /// is applied. Dropped silently while a transition is in flight or when
    /// no further pair exists.
    pub async fn advance(&mut self) -> NavOutcome {
        let Some(plan) = self.begin_advance() else {
            return NavOutcome::Ignored;
        };
        self.transition_delay().await;
        self.settle(plan);
        NavOutcome::Applied
    }

    /// Flip back to the previous spread. Dropped silently at the cover or
    /// while a transition is in flight.
    pub async fn retreat(&mut self) -> NavOutcome {
        let Some(plan) = self.begin_retreat() else {
            return NavOutcome::Ignored;
        };
        self.transition_delay().await;
        self.settle(plan);
        NavOutcome::Applied
    }

    /// Jump straight to the spread containing `target`: no animation, just
    /// a resting-layout reset on the normalized anchor. Out-of-range targets
    /// and jumps during a transition are dropped silently.
    pub fn jump_to(&mut self, target: u32) -> NavOutcome {
        if self.nav.is_transitioning() {
            debug!("nav: jump to {} ignored, transition in flight", target);
            return NavOutcome::Ignored;
        }
        if target < 1 || !self.document.contains(PageOrdinal(target)) {
            debug!("nav: jump to {} ignored, out of range", target);
            return NavOutcome::Ignored;
        }

        let anchor = nav::normalize_jump(PageOrdinal(target));
        debug!("nav: jump target={} anchor={}", target, anchor);
        self.nav.set_anchor(anchor);
        self.apply_resting();
        NavOutcome::Applied
    }

    /// Accept a forward-flip intent: acquire the lock and apply the
    /// transition scene. Returns `None` for the silent no-op cases.
    ///
    /// Split-phase twin of [`advance`](Self::advance) for callers that
    /// cannot hold the engine across the await point; follow with
    /// [`transition_delay`](Self::transition_delay) and
    /// [`settle`](Self::settle).
    pub fn begin_advance(&mut self) -> Option<TransitionPlan> {
        let plan = nav::plan_advance(&self.nav, &self.document);
        let Some(plan) = plan else {
            debug!(
                "nav: advance ignored anchor={} transitioning={}",
                self.nav.current_page(),
                self.nav.is_transitioning()
            );
            return None;
        };
        self.accept(plan)
    }

    /// Accept a backward-flip intent; see [`begin_advance`](Self::begin_advance)
    pub fn begin_retreat(&mut self) -> Option<TransitionPlan> {
        let plan = nav::plan_retreat(&self.nav, &self.document);
        let Some(plan) = plan else {
            debug!(
                "nav: retreat ignored anchor={} transitioning={}",
                self.nav.current_page(),
                self.nav.is_transitioning()
            );
            return None;
        };
        self.accept(plan)
    }

    fn accept(&mut self, plan: TransitionPlan) -> Option<TransitionPlan> {
        debug!(
            "nav: flip {:?} anchor={} leaf={} reveal={:?} next={}",
            plan.direction,
            self.nav.current_page(),
            plan.flipping,
            plan.reveal,
            plan.next_anchor
        );
        self.nav.begin_transition();
        render::during_transition(&plan).apply(&mut self.host);
        Some(plan)
    }

    /// Completion signal for the configured flip duration
    pub fn transition_delay(&mut self) -> H::Sleep {
        self.host.schedule_after(self.config.animation_duration_ms)
    }

    /// Finish an accepted flip: move the anchor, release the lock, and
    /// re-apply the resting layout.
    pub fn settle(&mut self, plan: TransitionPlan) {
        self.nav.settle_to(plan.next_anchor);
        self.apply_resting();
    }

    /// Step the zoom factor in, returning the new factor when it changed
    pub fn zoom_in(&mut self) -> Option<f64> {
        self.nav.step_zoom(true, &self.config)
    }

    /// Step the zoom factor out, returning the new factor when it changed
    pub fn zoom_out(&mut self) -> Option<f64> {
        self.nav.step_zoom(false, &self.config)
    }

    /// Snap zoom back to 1:1 (resize handler)
    pub fn reset_zoom(&mut self) -> Option<f64> {
        self.nav.reset_zoom()
    }

    /// Current spread anchor: 1 for the cover, otherwise the even ordinal
    /// shown in the right slot
    pub fn current_page(&self) -> u32 {
        self.nav.current_page().0
    }

    pub fn page_count(&self) -> u32 {
        self.document.page_count()
    }

    pub fn is_transitioning(&self) -> bool {
        self.nav.is_transitioning()
    }

    pub fn zoom(&self) -> f64 {
        self.nav.zoom()
    }

    pub fn config(&self) -> &FlipbookConfig {
        &self.config
    }

    pub fn registry(&self) -> &PageRegistry<H::Surface> {
        &self.registry
    }

    pub fn host(&self) -> &H {
        &self.host
    }

    pub fn host_mut(&mut self) -> &mut H {
        &mut self.host
    }

    pub fn snapshot(&self) -> NavSnapshot {
        NavSnapshot {
            current_page: self.current_page(),
            page_count: self.page_count(),
            transitioning: self.is_transitioning(),
            zoom: self.zoom(),
        }
    }

    fn apply_resting(&mut self) {
        render::resting(self.nav.current_page(), &self.document).apply(&mut self.host);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rustc_hash::FxHashMap;
    use std::future::{ready, Ready};

    /// Recording host: keeps the last state set for every page plus the
    /// order pages were attached in.
    #[derive(Default)]
    struct MockHost {
        attached: Vec<(u32, Side)>,
        visible: FxHashMap<u32, bool>,
        z: FxHashMap<u32, i32>,
        animating: FxHashMap<u32, Option<FlipDirection>>,
        sleeps: Vec<u32>,
    }

    impl MockHost {
        fn visible_pages(&self) -> Vec<u32> {
            let mut pages: Vec<u32> = self
                .visible
                .iter()
                .filter(|(_, &v)| v)
                .map(|(&page, _)| page)
                .collect();
            pages.sort_unstable();
            pages
        }

        /// (page, visible, z) triples sorted by page, for layout equality
        fn layout_snapshot(&self) -> Vec<(u32, bool, i32)> {
            let mut rows: Vec<(u32, bool, i32)> = self
                .visible
                .iter()
                .map(|(&page, &v)| (page, v, self.z.get(&page).copied().unwrap_or(0)))
                .collect();
            rows.sort_unstable();
            rows
        }
    }

    impl DisplayHost for MockHost {
        type Surface = u32;
        type Sleep = Ready<()>;

        fn attach(&mut self, page: PageOrdinal, side: Side, _surface: &u32) {
            self.attached.push((page.0, side));
        }

        fn set_stack_order(&mut self, page: PageOrdinal, order: StackOrder) {
            self.z.insert(page.0, order.z());
        }

        fn set_visible(&mut self, page: PageOrdinal, visible: bool) {
            self.visible.insert(page.0, visible);
        }

        fn set_animating(&mut self, page: PageOrdinal, direction: Option<FlipDirection>) {
            self.animating.insert(page.0, direction);
        }

        fn schedule_after(&mut self, duration_ms: u32) -> Ready<()> {
            self.sleeps.push(duration_ms);
            ready(())
        }
    }

    struct MockRenderer {
        fail_at: Option<u32>,
    }

    impl MockRenderer {
        fn ok() -> Self {
            Self { fail_at: None }
        }
    }

    impl PageRenderer for MockRenderer {
        type Surface = u32;
        type Error = String;

        async fn render_surface(&mut self, page: PageOrdinal, _scale: f64) -> Result<u32, String> {
            if self.fail_at == Some(page.0) {
                return Err(format!("page {} unavailable", page.0));
            }
            Ok(page.0 * 10)
        }
    }

    async fn make_book(page_count: u32) -> Flipbook<MockHost> {
        Flipbook::load(
            MockHost::default(),
            &mut MockRenderer::ok(),
            page_count,
            FlipbookConfig::default(),
        )
        .await
        .unwrap()
    }

    fn assert_anchor_invariant<H: DisplayHost>(book: &Flipbook<H>) {
        let anchor = book.current_page();
        assert!(
            anchor == 1 || anchor % 2 == 0,
            "anchor {} violates invariant",
            anchor
        );
        assert!(anchor <= book.page_count());
    }

    #[tokio::test]
    async fn test_load_builds_rights_then_lefts() {
        let book = make_book(7).await;

        let order: Vec<(u32, Side)> = book.host().attached.clone();
        assert_eq!(
            order,
            vec![
                (2, Side::Right),
                (4, Side::Right),
                (6, Side::Right),
                (1, Side::Left),
                (3, Side::Left),
                (5, Side::Left),
                (7, Side::Left),
            ]
        );
        assert_eq!(book.registry().len(), 7);
        assert_eq!(book.registry().surface(PageOrdinal(3)), Some(&30));
    }

    #[tokio::test]
    async fn test_load_rejects_empty_document() {
        let result = Flipbook::load(
            MockHost::default(),
            &mut MockRenderer::ok(),
            0,
            FlipbookConfig::default(),
        )
        .await;
        assert!(matches!(result, Err(FlipbookError::InvalidDocument)));
    }

    #[tokio::test]
    async fn test_load_surfaces_render_failure() {
        let result = Flipbook::load(
            MockHost::default(),
            &mut MockRenderer { fail_at: Some(4) },
            7,
            FlipbookConfig::default(),
        )
        .await;
        match result {
            Err(FlipbookError::RenderFailed { ordinal, reason }) => {
                assert_eq!(ordinal, 4);
                assert!(reason.contains("unavailable"));
            }
            _ => panic!("expected RenderFailed"),
        }
    }

    #[tokio::test]
    async fn test_cover_shows_alone_after_load() {
        let book = make_book(7).await;
        assert_eq!(book.current_page(), 1);
        assert_eq!(book.host().visible_pages(), vec![1]);
        assert_eq!(book.host().z.get(&1), Some(&StackOrder::Front.z()));
        assert!(!book.is_transitioning());
    }

    #[tokio::test]
    async fn test_seven_page_walkthrough() {
        let mut book = make_book(7).await;

        assert_eq!(book.advance().await, NavOutcome::Applied);
        assert_eq!(book.current_page(), 2);
        assert_eq!(book.host().visible_pages(), vec![2, 3]);
        assert_eq!(book.host().z.get(&2), Some(&2));
        assert_eq!(book.host().z.get(&3), Some(&1));
        assert_anchor_invariant(&book);

        assert_eq!(book.advance().await, NavOutcome::Applied);
        assert_eq!(book.current_page(), 4);
        assert_eq!(book.host().visible_pages(), vec![4, 5]);
        assert_anchor_invariant(&book);

        assert_eq!(book.retreat().await, NavOutcome::Applied);
        assert_eq!(book.current_page(), 2);
        assert_eq!(book.host().visible_pages(), vec![2, 3]);
        assert_anchor_invariant(&book);

        // Even targets are valid anchors; odd targets round down.
        assert_eq!(book.jump_to(6), NavOutcome::Applied);
        assert_eq!(book.current_page(), 6);
        assert_eq!(book.host().visible_pages(), vec![6, 7]);
        assert_anchor_invariant(&book);

        assert_eq!(book.jump_to(7), NavOutcome::Applied);
        assert_eq!(book.current_page(), 6);
        assert_anchor_invariant(&book);

        assert_eq!(book.jump_to(1), NavOutcome::Applied);
        assert_eq!(book.current_page(), 1);
        assert_eq!(book.host().visible_pages(), vec![1]);
    }

    #[tokio::test]
    async fn test_out_of_range_jumps_dropped() {
        let mut book = make_book(7).await;
        book.jump_to(4);

        assert_eq!(book.jump_to(0), NavOutcome::Ignored);
        assert_eq!(book.jump_to(8), NavOutcome::Ignored);
        assert_eq!(book.current_page(), 4);
        assert_eq!(book.host().visible_pages(), vec![4, 5]);
    }

    #[tokio::test]
    async fn test_advance_then_retreat_restores_layout() {
        let mut book = make_book(9).await;
        book.jump_to(4);
        let before = book.host().layout_snapshot();
        let anchor_before = book.current_page();

        book.advance().await;
        book.retreat().await;

        assert_eq!(book.current_page(), anchor_before);
        assert_eq!(book.host().layout_snapshot(), before);
    }

    #[tokio::test]
    async fn test_lock_drops_reentrant_flips() {
        let mut book = make_book(7).await;

        let plan = book.begin_advance().expect("first flip accepted");
        assert!(book.is_transitioning());

        // Intents issued mid-flip are dropped, not deferred.
        assert_eq!(book.advance().await, NavOutcome::Ignored);
        assert_eq!(book.retreat().await, NavOutcome::Ignored);
        assert!(book.begin_advance().is_none());
        assert_eq!(book.jump_to(6), NavOutcome::Ignored);
        assert_eq!(book.current_page(), 1);
        assert!(book.is_transitioning());

        book.settle(plan);
        assert!(!book.is_transitioning());
        assert_eq!(book.current_page(), 2);
        assert_eq!(book.host().visible_pages(), vec![2, 3]);
    }

    #[tokio::test]
    async fn test_transition_scene_between_phases() {
        let mut book = make_book(7).await;
        book.jump_to(2);

        let plan = book.begin_advance().unwrap();
        // Mid-flip: the leaf is raised and animating, reveals sit behind.
        assert_eq!(book.host().visible_pages(), vec![2, 3, 4, 5]);
        assert_eq!(book.host().z.get(&3), Some(&StackOrder::Animating.z()));
        assert_eq!(book.host().z.get(&4), Some(&StackOrder::Behind.z()));
        assert_eq!(
            book.host().animating.get(&3),
            Some(&Some(FlipDirection::Forward))
        );

        book.settle(plan);
        assert_eq!(book.host().visible_pages(), vec![4, 5]);
        assert_eq!(book.host().animating.get(&3), Some(&None));
    }

    #[tokio::test]
    async fn test_boundary_noops() {
        let mut book = make_book(7).await;
        assert_eq!(book.retreat().await, NavOutcome::Ignored);
        assert_eq!(book.current_page(), 1);

        book.jump_to(6);
        assert_eq!(book.advance().await, NavOutcome::Ignored);
        assert_eq!(book.current_page(), 6);

        let mut single = make_book(1).await;
        assert_eq!(single.advance().await, NavOutcome::Ignored);
        assert_eq!(single.retreat().await, NavOutcome::Ignored);
        assert_eq!(single.current_page(), 1);
    }

    #[tokio::test]
    async fn test_flip_waits_configured_duration() {
        let mut book = make_book(7).await;
        book.advance().await;
        assert_eq!(
            book.host().sleeps,
            vec![FlipbookConfig::default().animation_duration_ms]
        );
    }

    #[tokio::test]
    async fn test_zoom_is_independent_of_navigation() {
        let mut book = make_book(7).await;

        assert_eq!(book.zoom_in(), Some(1.1));
        book.advance().await;
        assert!((book.zoom() - 1.1).abs() < 1e-9);

        for _ in 0..30 {
            book.zoom_in();
        }
        assert_eq!(book.zoom(), book.config().max_zoom);
        assert_eq!(book.zoom_in(), None);

        assert_eq!(book.reset_zoom(), Some(1.0));
        assert_eq!(book.reset_zoom(), None);
    }

    #[tokio::test]
    async fn test_snapshot_reflects_state() {
        let mut book = make_book(7).await;
        book.jump_to(4);
        book.zoom_in();

        let snapshot = book.snapshot();
        assert_eq!(snapshot.current_page, 4);
        assert_eq!(snapshot.page_count, 7);
        assert!(!snapshot.transitioning);
        assert!((snapshot.zoom - 1.1).abs() < 1e-9);

        let json = serde_json::to_string(&snapshot).unwrap();
        assert!(json.contains("\"currentPage\":4"));
    }

    #[test]
    fn test_config_from_json() {
        let config: FlipbookConfig =
            serde_json::from_str(r#"{"animationDurationMs": 300, "scale": 1.5}"#).unwrap();
        assert_eq!(config.animation_duration_ms, 300);
        assert_eq!(config.scale, 1.5);
        // Unspecified fields keep their defaults.
        assert_eq!(config.swipe_threshold_px, 50.0);
    }
}
