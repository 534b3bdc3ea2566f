//! Contracts with the external display and rendering collaborators.
//!
//! The engine never touches a real screen: it drives whatever implements
//! [`DisplayHost`] (DOM elements in the browser, a recording mock in tests)
//! and sources its page surfaces from a [`PageRenderer`] (pdf.js or any
//! other document engine behind the boundary).

use core::future::Future;

use crate::document::{PageOrdinal, Side};
use crate::nav::FlipDirection;
use crate::render::StackOrder;

/// Display primitives the engine requires from its host.
///
/// `schedule_after` is the only timing primitive: it stands in for the
/// host's animation/style system and resolves once the configured flip
/// duration has elapsed. It must not block the execution context.
pub trait DisplayHost {
    /// Externally rendered visual surface (a canvas element in the browser)
    type Surface;
    /// Completion signal from the host's timing primitive
    type Sleep: Future<Output = ()>;

    /// Create the displayable element hosting `surface` in the given slot
    fn attach(&mut self, page: PageOrdinal, side: Side, surface: &Self::Surface);

    fn set_stack_order(&mut self, page: PageOrdinal, order: StackOrder);

    fn set_visible(&mut self, page: PageOrdinal, visible: bool);

    /// Mark or clear the flip animation on a page element. Clearing also
    /// resets any transform the animation left behind.
    fn set_animating(&mut self, page: PageOrdinal, direction: Option<FlipDirection>);

    fn schedule_after(&mut self, duration_ms: u32) -> Self::Sleep;
}

/// Asynchronous page rasterization, invoked once per page during load.
///
/// Failures are surfaced to the load step; the engine has no retry policy.
#[allow(async_fn_in_trait)]
pub trait PageRenderer {
    type Surface;
    type Error: core::fmt::Display;

    async fn render_surface(
        &mut self,
        page: PageOrdinal,
        scale: f64,
    ) -> Result<Self::Surface, Self::Error>;
}
