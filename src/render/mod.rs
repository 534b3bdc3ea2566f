//! Visibility and stacking control: what is on screen and in which order.
//!
//! A [`Scene`] is a list of placements replayed through the display host.
//! The resting scene is total over the document and is the single source of
//! truth between transitions; the transition scene only touches the pages a
//! flip reveals or animates, leaving the rest of the spread in place until
//! settle.

use crate::document::{Document, PageOrdinal};
use crate::host::DisplayHost;
use crate::nav::{FlipDirection, TransitionPlan};

/// Relative stacking layer for a page element
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StackOrder {
    /// Revealed-behind pages and resting left pages
    Behind,
    /// The front page of the resting spread
    Front,
    /// The animating leaf, occluding everything it reveals
    Animating,
}

impl StackOrder {
    /// z-index value for DOM-backed hosts
    pub fn z(self) -> i32 {
        match self {
            StackOrder::Behind => 1,
            StackOrder::Front => 2,
            StackOrder::Animating => 10,
        }
    }
}

/// One page's target display state
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PagePlacement {
    pub page: PageOrdinal,
    pub visible: bool,
    pub order: StackOrder,
    pub animating: Option<FlipDirection>,
}

/// An ordered batch of placements
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Scene {
    pub placements: Vec<PagePlacement>,
}

impl Scene {
    /// Replay the placements through the host, in order
    pub fn apply<H: DisplayHost>(&self, host: &mut H) {
        for placement in &self.placements {
            host.set_visible(placement.page, placement.visible);
            host.set_stack_order(placement.page, placement.order);
            host.set_animating(placement.page, placement.animating);
        }
    }

    pub fn placement(&self, page: PageOrdinal) -> Option<&PagePlacement> {
        self.placements.iter().find(|p| p.page == page)
    }

    /// Visible ordinals, ascending
    pub fn visible_pages(&self) -> Vec<PageOrdinal> {
        let mut pages: Vec<PageOrdinal> = self
            .placements
            .iter()
            .filter(|p| p.visible)
            .map(|p| p.page)
            .collect();
        pages.sort_unstable();
        pages
    }
}

/// Resting layout for a spread anchor: the cover alone, or the pair
/// `{anchor (right, front), anchor + 1 (left, behind)}`. Everything else is
/// hidden. Idempotent.
pub fn resting(anchor: PageOrdinal, document: &Document) -> Scene {
    let left_partner = PageOrdinal(anchor.0 + 1);
    let mut placements = Vec::with_capacity(document.page_count() as usize);

    for n in 1..=document.page_count() {
        let page = PageOrdinal(n);
        let (visible, order) = if page == anchor {
            (true, StackOrder::Front)
        } else if !anchor.is_cover() && page == left_partner {
            (true, StackOrder::Behind)
        } else {
            (false, StackOrder::Behind)
        };

        placements.push(PagePlacement {
            page,
            visible,
            order,
            animating: None,
        });
    }

    Scene { placements }
}

/// Mid-flip layout: revealed pages go behind, then the flipping leaf is
/// raised on top and flagged as animating so it occludes them until the
/// completion signal fires.
pub fn during_transition(plan: &TransitionPlan) -> Scene {
    let mut placements = Vec::with_capacity(plan.reveal.len() + 1);

    for &page in &plan.reveal {
        placements.push(PagePlacement {
            page,
            visible: true,
            order: StackOrder::Behind,
            animating: None,
        });
    }
    placements.push(PagePlacement {
        page: plan.flipping,
        visible: true,
        order: StackOrder::Animating,
        animating: Some(plan.direction),
    });

    Scene { placements }
}
