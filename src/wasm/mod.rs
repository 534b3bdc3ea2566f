//! WASM bindings: DOM-backed display host and the exported flipbook.
//!
//! The bridge owns the page markup contract: every page lives in
//! a `div.page.page-left|right` wrapper holding a `.page-content` element
//! with the rendered surface and a `.page-number` badge, stacked with
//! z-index and animated through the `flipping` / `flipping-reverse` CSS
//! classes. Page rasterization stays in JavaScript (pdf.js or similar) and
//! is reached through a `(pageNum, scale) -> Promise<Element>` callback.

use std::cell::RefCell;
use std::future::Future;
use std::pin::Pin;
use std::rc::Rc;
use std::task::{Context, Poll};

use js_sys::{Function, Promise};
use rustc_hash::FxHashMap;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use wasm_bindgen_futures::{spawn_local, JsFuture};

use crate::document::{PageOrdinal, Side};
use crate::host::{DisplayHost, PageRenderer};
use crate::input::{self, Intent};
use crate::nav::{FlipDirection, NavOutcome};
use crate::render::StackOrder;
use crate::{Flipbook, FlipbookConfig};

/// Initialize panic hook for better error messages
#[wasm_bindgen(start)]
pub fn init() {
    #[cfg(feature = "console_error_panic_hook")]
    console_error_panic_hook::set_once();
}

/// setTimeout-backed completion signal
pub struct DomSleep(JsFuture);

impl Future for DomSleep {
    type Output = ();

    fn poll(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<()> {
        match Pin::new(&mut self.0).poll(cx) {
            Poll::Ready(_) => Poll::Ready(()),
            Poll::Pending => Poll::Pending,
        }
    }
}

fn sleep(duration_ms: u32) -> DomSleep {
    let promise = Promise::new(&mut |resolve, _reject| {
        if let Some(window) = web_sys::window() {
            let _ = window.set_timeout_with_callback_and_timeout_and_arguments_0(
                &resolve,
                duration_ms as i32,
            );
        }
    });
    DomSleep(JsFuture::from(promise))
}

/// Display host driving real DOM elements under the book container
pub struct DomHost {
    document: web_sys::Document,
    book: web_sys::HtmlElement,
    pages: FxHashMap<PageOrdinal, web_sys::HtmlElement>,
}

impl DomHost {
    pub fn new(book_id: &str) -> Result<Self, JsValue> {
        let window = web_sys::window().ok_or_else(|| JsValue::from_str("no window"))?;
        let document = window
            .document()
            .ok_or_else(|| JsValue::from_str("no document"))?;
        let book = document
            .get_element_by_id(book_id)
            .ok_or_else(|| JsValue::from_str("book container not found"))?
            .dyn_into::<web_sys::HtmlElement>()?;

        Ok(Self {
            document,
            book,
            pages: FxHashMap::default(),
        })
    }

    /// Scale the whole book; zoom lives on the container, not the pages
    pub fn apply_zoom(&self, factor: f64) {
        let _ = self
            .book
            .style()
            .set_property("transform", &format!("scale({factor})"));
    }
}

impl DisplayHost for DomHost {
    type Surface = web_sys::Element;
    type Sleep = DomSleep;

    fn attach(&mut self, page: PageOrdinal, side: Side, surface: &web_sys::Element) {
        let Ok(wrapper) = self.document.create_element("div") else {
            return;
        };
        let _ = wrapper.set_attribute("class", &format!("page page-{}", side.as_str()));
        let _ = wrapper.set_attribute("data-page-num", &page.to_string());

        let Ok(content) = self.document.create_element("div") else {
            return;
        };
        let _ = content.set_attribute("class", "page-content");
        let _ = content.append_child(surface);

        if let Ok(badge) = self.document.create_element("div") {
            let _ = badge.set_attribute("class", "page-number");
            badge.set_text_content(Some(&page.to_string()));
            let _ = content.append_child(&badge);
        }

        let _ = wrapper.append_child(&content);
        let _ = self.book.append_child(&wrapper);
        if let Ok(element) = wrapper.dyn_into::<web_sys::HtmlElement>() {
            self.pages.insert(page, element);
        }
    }

    fn set_stack_order(&mut self, page: PageOrdinal, order: StackOrder) {
        if let Some(element) = self.pages.get(&page) {
            let _ = element
                .style()
                .set_property("z-index", &order.z().to_string());
        }
    }

    fn set_visible(&mut self, page: PageOrdinal, visible: bool) {
        if let Some(element) = self.pages.get(&page) {
            let display = if visible { "block" } else { "none" };
            let _ = element.style().set_property("display", display);
        }
    }

    fn set_animating(&mut self, page: PageOrdinal, direction: Option<FlipDirection>) {
        let Some(element) = self.pages.get(&page) else {
            return;
        };
        let classes = element.class_list();
        match direction {
            Some(FlipDirection::Forward) => {
                let _ = classes.add_1("flipping");
            }
            Some(FlipDirection::Backward) => {
                let _ = classes.add_1("flipping-reverse");
            }
            None => {
                let _ = classes.remove_1("flipping");
                let _ = classes.remove_1("flipping-reverse");
                let _ = element.style().remove_property("transform");
            }
        }
    }

    fn schedule_after(&mut self, duration_ms: u32) -> DomSleep {
        sleep(duration_ms)
    }
}

/// Page renderer backed by a JS `(pageNum, scale) -> Promise<Element>` callback
pub struct JsPageRenderer {
    render: Function,
}

impl JsPageRenderer {
    pub fn new(render: Function) -> Self {
        Self { render }
    }
}

impl PageRenderer for JsPageRenderer {
    type Surface = web_sys::Element;
    type Error = String;

    async fn render_surface(&mut self, page: PageOrdinal, scale: f64) -> Result<web_sys::Element, String> {
        let value = self
            .render
            .call2(&JsValue::NULL, &JsValue::from(page.0), &JsValue::from(scale))
            .map_err(|e| format!("render callback threw for page {}: {:?}", page, e))?;
        let resolved = JsFuture::from(Promise::resolve(&value))
            .await
            .map_err(|e| format!("render promise rejected for page {}: {:?}", page, e))?;
        resolved
            .dyn_into::<web_sys::Element>()
            .map_err(|_| format!("render callback for page {} did not return an element", page))
    }
}

/// WASM-exposed flipbook wrapper
#[wasm_bindgen]
pub struct WasmFlipbook {
    inner: Rc<RefCell<Flipbook<DomHost>>>,
}

/// Build a flipbook under the container with the given element id.
///
/// `config_json` accepts the camelCase config object as a JSON string;
/// pass nothing for the defaults.
#[wasm_bindgen(js_name = loadFlipbook)]
pub async fn load_flipbook(
    book_id: String,
    page_count: u32,
    render_page: Function,
    config_json: Option<String>,
) -> Result<WasmFlipbook, JsValue> {
    let config: FlipbookConfig = match config_json {
        Some(json) => serde_json::from_str(&json)
            .map_err(|e| JsValue::from_str(&format!("invalid config: {e}")))?,
        None => FlipbookConfig::default(),
    };

    let host = DomHost::new(&book_id)?;
    let mut renderer = JsPageRenderer::new(render_page);
    let book = Flipbook::load(host, &mut renderer, page_count, config)
        .await
        .map_err(|e| JsValue::from_str(&e.to_string()))?;

    Ok(WasmFlipbook {
        inner: Rc::new(RefCell::new(book)),
    })
}

#[wasm_bindgen]
impl WasmFlipbook {
    /// Flip to the next spread (fire and forget; dropped mid-transition)
    pub fn next(&self) {
        schedule_flip(Rc::clone(&self.inner), FlipDirection::Forward);
    }

    /// Flip to the previous spread
    pub fn previous(&self) {
        schedule_flip(Rc::clone(&self.inner), FlipDirection::Backward);
    }

    /// Jump straight to the spread containing `target`, no animation
    #[wasm_bindgen(js_name = jumpTo)]
    pub fn jump_to(&self, target: u32) -> bool {
        self.inner.borrow_mut().jump_to(target) == NavOutcome::Applied
    }

    #[wasm_bindgen(js_name = currentPage)]
    pub fn current_page(&self) -> u32 {
        self.inner.borrow().current_page()
    }

    #[wasm_bindgen(js_name = pageCount)]
    pub fn page_count(&self) -> u32 {
        self.inner.borrow().page_count()
    }

    #[wasm_bindgen(js_name = isTransitioning)]
    pub fn is_transitioning(&self) -> bool {
        self.inner.borrow().is_transitioning()
    }

    pub fn zoom(&self) -> f64 {
        self.inner.borrow().zoom()
    }

    #[wasm_bindgen(js_name = zoomIn)]
    pub fn zoom_in(&self) -> f64 {
        let mut book = self.inner.borrow_mut();
        if let Some(factor) = book.zoom_in() {
            book.host().apply_zoom(factor);
        }
        book.zoom()
    }

    #[wasm_bindgen(js_name = zoomOut)]
    pub fn zoom_out(&self) -> f64 {
        let mut book = self.inner.borrow_mut();
        if let Some(factor) = book.zoom_out() {
            book.host().apply_zoom(factor);
        }
        book.zoom()
    }

    /// Snap zoom back to 1:1, for the window resize handler
    #[wasm_bindgen(js_name = resetZoom)]
    pub fn reset_zoom(&self) -> f64 {
        let mut book = self.inner.borrow_mut();
        if let Some(factor) = book.reset_zoom() {
            book.host().apply_zoom(factor);
        }
        book.zoom()
    }

    /// Handle a `KeyboardEvent.key` name; returns whether it was consumed
    #[wasm_bindgen(js_name = handleKey)]
    pub fn handle_key(&self, key: &str) -> bool {
        let page_count = self.inner.borrow().page_count();
        match input::for_key(key, page_count) {
            Some(intent) => {
                self.dispatch(intent);
                true
            }
            None => false,
        }
    }

    /// Handle a wheel event; only modifier-held wheels zoom
    #[wasm_bindgen(js_name = handleWheel)]
    pub fn handle_wheel(&self, delta_y: f64, zoom_modifier: bool) -> bool {
        match input::for_wheel(delta_y, zoom_modifier) {
            Some(intent) => {
                self.dispatch(intent);
                true
            }
            None => false,
        }
    }

    /// Handle a completed touch swipe from its X endpoints
    #[wasm_bindgen(js_name = handleSwipe)]
    pub fn handle_swipe(&self, start_x: f64, end_x: f64) -> bool {
        let threshold = self.inner.borrow().config().swipe_threshold_px;
        match input::for_swipe(start_x, end_x, threshold) {
            Some(intent) => {
                self.dispatch(intent);
                true
            }
            None => false,
        }
    }

    #[wasm_bindgen(js_name = toggleFullscreen)]
    pub fn toggle_fullscreen(&self) {
        let Some(document) = web_sys::window().and_then(|w| w.document()) else {
            return;
        };
        if document.fullscreen_element().is_some() {
            document.exit_fullscreen();
        } else if let Some(root) = document.document_element() {
            let _ = root.request_fullscreen();
        }
    }

    /// Navigation state as a JSON string, for debug overlays
    #[wasm_bindgen(js_name = debugState)]
    pub fn debug_state(&self) -> String {
        serde_json::to_string(&self.inner.borrow().snapshot()).unwrap_or_default()
    }
}

impl WasmFlipbook {
    fn dispatch(&self, intent: Intent) {
        match intent {
            Intent::Advance => self.next(),
            Intent::Retreat => self.previous(),
            Intent::JumpTo(target) => {
                self.jump_to(target);
            }
            Intent::ZoomIn => {
                self.zoom_in();
            }
            Intent::ZoomOut => {
                self.zoom_out();
            }
            Intent::ToggleFullscreen => self.toggle_fullscreen(),
        }
    }
}

/// Run a full flip without borrowing the engine across the await point:
/// accept the intent, drop the borrow for the animation delay, settle.
fn schedule_flip(inner: Rc<RefCell<Flipbook<DomHost>>>, direction: FlipDirection) {
    spawn_local(async move {
        let (plan, delay) = {
            let mut book = inner.borrow_mut();
            let plan = match direction {
                FlipDirection::Forward => book.begin_advance(),
                FlipDirection::Backward => book.begin_retreat(),
            };
            let Some(plan) = plan else {
                return;
            };
            let delay = book.transition_delay();
            (plan, delay)
        };
        delay.await;
        inner.borrow_mut().settle(plan);
    });
}
