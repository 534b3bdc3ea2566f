//! Navigation state machine: spread anchors, flip planning, and zoom.
//!
//! The anchor (`current_page`) is always 1 (cover shown alone) or the even
//! ordinal of the right page of the displayed pair. Flip transitions are
//! planned here as data; the engine in the crate root drives them against
//! the display host.

use smallvec::SmallVec;

use crate::document::{Document, PageOrdinal};
use crate::FlipbookConfig;

/// Visual direction of a flip transition
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FlipDirection {
    /// "Next": the front leaf flips toward the reader's left
    Forward,
    /// "Previous": the front leaf flips toward the reader's right
    Backward,
}

/// Result of a navigation request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NavOutcome {
    Applied,
    /// Dropped silently: out of range, no further pair, or a transition
    /// already in flight. Skipped intents are never queued.
    Ignored,
}

/// A planned flip transition.
///
/// `reveal` pages are shown behind the current spread before `flipping`
/// animates off; once the completion signal fires, the spread settles on
/// `next_anchor`.
#[derive(Debug, Clone, PartialEq)]
pub struct TransitionPlan {
    pub direction: FlipDirection,
    pub flipping: PageOrdinal,
    pub reveal: SmallVec<[PageOrdinal; 2]>,
    pub next_anchor: PageOrdinal,
}

/// Mutable navigation state, owned exclusively by the engine
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NavigationState {
    current_page: PageOrdinal,
    transitioning: bool,
    zoom: f64,
}

impl NavigationState {
    pub fn new() -> Self {
        Self {
            current_page: PageOrdinal::COVER,
            transitioning: false,
            zoom: 1.0,
        }
    }

    pub fn current_page(&self) -> PageOrdinal {
        self.current_page
    }

    pub fn is_transitioning(&self) -> bool {
        self.transitioning
    }

    pub fn zoom(&self) -> f64 {
        self.zoom
    }

    /// Acquire the transition lock. Held for the full reveal + animate +
    /// settle sequence.
    pub(crate) fn begin_transition(&mut self) {
        debug_assert!(!self.transitioning, "transition already in flight");
        self.transitioning = true;
    }

    /// Move to the new anchor and release the transition lock
    pub(crate) fn settle_to(&mut self, anchor: PageOrdinal) {
        self.current_page = anchor;
        self.transitioning = false;
    }

    /// Discontinuous jump: anchor changes with no transition
    pub(crate) fn set_anchor(&mut self, anchor: PageOrdinal) {
        self.current_page = anchor;
    }

    /// Step the zoom factor, refusing once a bound has been reached.
    /// Returns the new factor when it changed.
    pub(crate) fn step_zoom(&mut self, zoom_in: bool, config: &FlipbookConfig) -> Option<f64> {
        if zoom_in {
            if self.zoom >= config.max_zoom {
                return None;
            }
            self.zoom = (self.zoom + config.zoom_step).min(config.max_zoom);
        } else {
            if self.zoom <= config.min_zoom {
                return None;
            }
            self.zoom = (self.zoom - config.zoom_step).max(config.min_zoom);
        }
        Some(self.zoom)
    }

    /// Snap back to 1:1, used by the resize handler
    pub(crate) fn reset_zoom(&mut self) -> Option<f64> {
        if self.zoom == 1.0 {
            return None;
        }
        self.zoom = 1.0;
        Some(self.zoom)
    }
}

impl Default for NavigationState {
    fn default() -> Self {
        Self::new()
    }
}

/// Plan a forward flip, or `None` for the silent no-op cases.
///
/// Advancing needs a pair anchored at `current + 2`; this single bound also
/// covers the cover spread (a two-page document never leaves the cover).
pub fn plan_advance(state: &NavigationState, document: &Document) -> Option<TransitionPlan> {
    if state.is_transitioning() {
        return None;
    }

    let anchor = state.current_page();
    let next_anchor = PageOrdinal(anchor.0 + 2);
    if !document.contains(next_anchor) {
        return None;
    }

    if anchor.is_cover() {
        // Cover flips off to expose the first pair.
        let mut reveal = SmallVec::new();
        reveal.push(PageOrdinal(2));
        reveal.push(PageOrdinal(3));
        return Some(TransitionPlan {
            direction: FlipDirection::Forward,
            flipping: PageOrdinal::COVER,
            reveal,
            next_anchor: PageOrdinal(2),
        });
    }

    // The left leaf of the current pair flips off.
    let leaf = PageOrdinal(anchor.0 + 1);
    let mut reveal = SmallVec::new();
    reveal.push(next_anchor);
    let next_left = PageOrdinal(anchor.0 + 3);
    if document.contains(next_left) {
        reveal.push(next_left);
    }

    Some(TransitionPlan {
        direction: FlipDirection::Forward,
        flipping: leaf,
        reveal,
        next_anchor,
    })
}

/// Plan a backward flip, or `None` for the silent no-op cases
pub fn plan_retreat(state: &NavigationState, _document: &Document) -> Option<TransitionPlan> {
    if state.is_transitioning() {
        return None;
    }

    let anchor = state.current_page();
    if anchor.0 <= 1 {
        return None;
    }

    if anchor.0 == 2 {
        // First pair flips back to the lone cover.
        let mut reveal = SmallVec::new();
        reveal.push(PageOrdinal::COVER);
        return Some(TransitionPlan {
            direction: FlipDirection::Backward,
            flipping: PageOrdinal(2),
            reveal,
            next_anchor: PageOrdinal::COVER,
        });
    }

    // The right page of the current pair flips back over the previous pair.
    let next_anchor = PageOrdinal(anchor.0 - 2);
    let mut reveal = SmallVec::new();
    reveal.push(next_anchor);
    reveal.push(PageOrdinal(anchor.0 - 1));

    Some(TransitionPlan {
        direction: FlipDirection::Backward,
        flipping: anchor,
        reveal,
        next_anchor,
    })
}

/// Normalize an arbitrary in-range jump target to a valid spread anchor.
///
/// The cover maps to itself, even targets already name the right page of
/// their pair, and odd non-cover targets round down to the even anchor of
/// the pair that displays them.
pub fn normalize_jump(target: PageOrdinal) -> PageOrdinal {
    if target.is_cover() || target.is_even() {
        target
    } else {
        PageOrdinal(target.0 - 1)
    }
}
