use crate::core::{wheel_delta_px, ScrollConfig, SmoothScroll};
use crate::dom::{self, ElementResizeObserver, EventListener};
use crate::frame::{start_loop, AnimationLoop};
use std::cell::{Cell, RefCell};
use std::rc::Rc;
use wasm_bindgen::JsCast;
use web_sys as web;

/// Smoothed document scroll, advanced by its own animation-frame loop.
///
/// Wheel input is intercepted and eased; the document is scrolled to the eased
/// offset each frame so DOM and planes move together. The scroll limit follows
/// both window resizes and document content growth.
pub struct ScrollSource {
    state: Rc<RefCell<SmoothScroll>>,
    _wheel: EventListener,
    _native: EventListener,
    _resize: EventListener,
    _content: Option<ElementResizeObserver>,
    _loop: AnimationLoop,
}

impl ScrollSource {
    pub fn new(window: &web::Window, config: ScrollConfig) -> Self {
        let metrics = dom::window_metrics(window);
        let state = Rc::new(RefCell::new(SmoothScroll::new(
            config,
            metrics.scroll_y,
            dom::scroll_limit(window),
        )));

        let wheel = {
            let state = state.clone();
            let window = window.clone();
            EventListener::new_non_passive(window.as_ref(), "wheel", move |ev| {
                let Some(ev) = ev.dyn_ref::<web::WheelEvent>() else {
                    return;
                };
                if ev.ctrl_key() {
                    // pinch-zoom gestures arrive as ctrl+wheel
                    return;
                }
                ev.prevent_default();
                let inner_height = dom::window_metrics(&window).inner_height;
                let delta = wheel_delta_px(ev.delta_y() as f32, ev.delta_mode(), inner_height);
                state.borrow_mut().scroll_by(delta);
            })
        };

        let native = {
            let state = state.clone();
            let window = window.clone();
            EventListener::new(window.as_ref(), "scroll", move |_| {
                let y = window.scroll_y().unwrap_or(0.0) as f32;
                state.borrow_mut().sync(y);
            })
        };

        let resize = {
            let state = state.clone();
            let window = window.clone();
            EventListener::new(window.as_ref(), "resize", move |_| {
                let limit = dom::scroll_limit(&window);
                state.borrow_mut().resize(limit);
                log::debug!("[scroll] limit {limit:.0}px");
            })
        };

        let content = dom::document_element(window).and_then(|root| {
            let state = state.clone();
            let window = window.clone();
            let observed = ElementResizeObserver::new(&root, move || {
                let limit = dom::scroll_limit(&window);
                state.borrow_mut().resize(limit);
            });
            observed
                .map_err(|e| log::warn!("[scroll] content size not tracked: {e:#}"))
                .ok()
        });

        let frame_loop = {
            let state = state.clone();
            let window = window.clone();
            let last_ms: Cell<Option<f64>> = Cell::new(None);
            start_loop(move |now_ms| {
                let dt_sec = last_ms
                    .replace(Some(now_ms))
                    .map(|prev| ((now_ms - prev) / 1000.0) as f32)
                    .unwrap_or(0.0);
                let next = state.borrow_mut().advance(dt_sec);
                if let Some(y) = next {
                    window.scroll_to_with_x_and_y(0.0, y as f64);
                }
            })
        };

        Self {
            state,
            _wheel: wheel,
            _native: native,
            _resize: resize,
            _content: content,
            _loop: frame_loop,
        }
    }

    /// Latest committed offset in CSS pixels.
    pub fn get_scroll(&self) -> f32 {
        self.state.borrow().offset()
    }
}
