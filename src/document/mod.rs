//! Document model: page ordinals, spread sides, and the surface registry

use rustc_hash::FxHashMap;

use crate::FlipbookError;

/// 1-based page ordinal within the loaded document
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PageOrdinal(pub u32);

impl PageOrdinal {
    /// Ordinal of the cover page
    pub const COVER: PageOrdinal = PageOrdinal(1);

    pub fn is_cover(self) -> bool {
        self.0 == 1
    }

    pub fn is_even(self) -> bool {
        self.0 % 2 == 0
    }
}

impl core::fmt::Display for PageOrdinal {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Slot a page occupies within a spread
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Side {
    Left,
    Right,
}

impl Side {
    /// Lowercase name used for CSS class suffixes
    pub fn as_str(self) -> &'static str {
        match self {
            Side::Left => "left",
            Side::Right => "right",
        }
    }
}

/// Immutable page count wrapper with bounds helpers
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Document {
    page_count: u32,
}

impl Document {
    /// Create a document descriptor; fails for an empty document
    pub fn new(page_count: u32) -> Result<Self, FlipbookError> {
        if page_count < 1 {
            return Err(FlipbookError::InvalidDocument);
        }
        Ok(Self { page_count })
    }

    pub fn page_count(&self) -> u32 {
        self.page_count
    }

    pub fn contains(&self, ordinal: PageOrdinal) -> bool {
        ordinal.0 >= 1 && ordinal.0 <= self.page_count
    }

    pub fn last(&self) -> PageOrdinal {
        PageOrdinal(self.page_count)
    }
}

/// A registered page: its side assignment and the externally-rendered surface
#[derive(Debug)]
pub struct Page<S> {
    pub ordinal: PageOrdinal,
    pub side: Side,
    pub surface: S,
}

/// Total mapping from ordinal to page.
///
/// The registry is the sole owner of every surface handle for the lifetime
/// of the document; nothing else detaches or replaces them.
#[derive(Debug)]
pub struct PageRegistry<S> {
    pages: FxHashMap<PageOrdinal, Page<S>>,
}

impl<S> PageRegistry<S> {
    pub fn new() -> Self {
        Self {
            pages: FxHashMap::default(),
        }
    }

    pub fn insert(&mut self, page: Page<S>) {
        debug_assert!(
            !self.pages.contains_key(&page.ordinal),
            "page {} registered twice",
            page.ordinal
        );
        self.pages.insert(page.ordinal, page);
    }

    pub fn get(&self, ordinal: PageOrdinal) -> Option<&Page<S>> {
        self.pages.get(&ordinal)
    }

    pub fn side(&self, ordinal: PageOrdinal) -> Option<Side> {
        self.pages.get(&ordinal).map(|page| page.side)
    }

    pub fn surface(&self, ordinal: PageOrdinal) -> Option<&S> {
        self.pages.get(&ordinal).map(|page| &page.surface)
    }

    pub fn len(&self) -> usize {
        self.pages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pages.is_empty()
    }
}

impl<S> Default for PageRegistry<S> {
    fn default() -> Self {
        Self::new()
    }
}
