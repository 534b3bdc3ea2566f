//! Translation from raw gestures to navigation intents.
//!
//! Input capture itself stays outside the core; these helpers map already
//! captured events (key names, wheel deltas, swipe endpoints) onto the
//! intents the engine understands. The keyboard map follows right-to-left
//! reading: the left arrow moves forward through the book.

/// A discrete navigation intent
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Intent {
    Advance,
    Retreat,
    JumpTo(u32),
    ZoomIn,
    ZoomOut,
    ToggleFullscreen,
}

/// Map a keyboard key (DOM `KeyboardEvent.key` name) to an intent
pub fn for_key(key: &str, page_count: u32) -> Option<Intent> {
    match key {
        "ArrowLeft" => Some(Intent::Advance),
        "ArrowRight" => Some(Intent::Retreat),
        "Home" => Some(Intent::JumpTo(1)),
        "End" => Some(Intent::JumpTo(page_count)),
        "f" | "F" => Some(Intent::ToggleFullscreen),
        _ => None,
    }
}

/// Map a wheel event to a zoom intent. Plain scrolling is left to the page;
/// only modifier-held wheel events zoom.
pub fn for_wheel(delta_y: f64, zoom_modifier: bool) -> Option<Intent> {
    if !zoom_modifier {
        return None;
    }
    if delta_y < 0.0 {
        Some(Intent::ZoomIn)
    } else {
        Some(Intent::ZoomOut)
    }
}

/// Map a completed horizontal swipe to an intent. Movements at or under the
/// threshold are ignored; a leftward swipe advances (RTL).
pub fn for_swipe(start_x: f64, end_x: f64, threshold_px: f64) -> Option<Intent> {
    let distance = start_x - end_x;
    if distance.abs() <= threshold_px {
        return None;
    }
    if distance > 0.0 {
        Some(Intent::Advance)
    } else {
        Some(Intent::Retreat)
    }
}
