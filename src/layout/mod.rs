//! Layout resolution: side assignment and materialization order.
//!
//! Right-to-left pairing: the cover (page 1) sits alone in the left slot;
//! from page 2 on, pairs start on the right, so even ordinals take the
//! right slot and odd ordinals the left.

use crate::document::{Document, PageOrdinal, Side};
use crate::FlipbookError;

/// A page's slot in the materialization schedule
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageSlot {
    pub ordinal: PageOrdinal,
    pub side: Side,
}

/// Side assignment for a single ordinal
pub fn side_for(ordinal: PageOrdinal) -> Side {
    if ordinal.is_cover() {
        Side::Left
    } else if ordinal.is_even() {
        Side::Right
    } else {
        Side::Left
    }
}

/// Materialization order for the whole document.
///
/// Right pages first (ascending), then left pages (ascending). Right pages
/// surface first during forward flips, so they are built first; the order
/// only affects initial build scheduling, never steady-state navigation.
pub fn build_order(document: &Document) -> Vec<PageSlot> {
    let count = document.page_count();
    let mut slots = Vec::with_capacity(count as usize);

    for n in 1..=count {
        let ordinal = PageOrdinal(n);
        if side_for(ordinal) == Side::Right {
            slots.push(PageSlot {
                ordinal,
                side: Side::Right,
            });
        }
    }
    for n in 1..=count {
        let ordinal = PageOrdinal(n);
        if side_for(ordinal) == Side::Left {
            slots.push(PageSlot {
                ordinal,
                side: Side::Left,
            });
        }
    }

    slots
}

/// Validate a page count and produce the materialization schedule
pub fn resolve(page_count: u32) -> Result<Vec<PageSlot>, FlipbookError> {
    let document = Document::new(page_count)?;
    Ok(build_order(&document))
}
