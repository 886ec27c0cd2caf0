use crate::core::{DeviceViewport, DomRect, Layout, WindowMetrics, MAX_PIXEL_RATIO};
use wasm_bindgen::closure::Closure;
use wasm_bindgen::JsCast;
use web_sys as web;

pub fn window_metrics(window: &web::Window) -> WindowMetrics {
    let px = |v: Result<wasm_bindgen::JsValue, wasm_bindgen::JsValue>| {
        v.ok().and_then(|v| v.as_f64()).unwrap_or(0.0) as f32
    };
    WindowMetrics {
        inner_width: px(window.inner_width()),
        inner_height: px(window.inner_height()),
        device_pixel_ratio: window.device_pixel_ratio() as f32,
        scroll_y: window.scroll_y().unwrap_or(0.0) as f32,
    }
}

pub fn document_element(window: &web::Window) -> Option<web::Element> {
    window.document().and_then(|d| d.document_element())
}

/// Maximum scroll offset of the document (never negative).
pub fn scroll_limit(window: &web::Window) -> f32 {
    let inner_height = window_metrics(window).inner_height;
    let scroll_height = document_element(window)
        .map(|el| el.scroll_height() as f32)
        .unwrap_or(0.0);
    (scroll_height - inner_height).max(0.0)
}

/// Every `<img>` matching `selector` at call time.
pub fn query_images(document: &web::Document, selector: &str) -> Vec<web::HtmlImageElement> {
    let Ok(list) = document.query_selector_all(selector) else {
        log::warn!("[dom] invalid selector {selector:?}");
        return Vec::new();
    };
    (0..list.length())
        .filter_map(|i| list.item(i))
        .filter_map(|node| node.dyn_into::<web::HtmlImageElement>().ok())
        .collect()
}

/// Live DOM measurements for the scene coordinator.
pub struct DomLayout {
    window: web::Window,
}

impl DomLayout {
    pub fn new(window: web::Window) -> Self {
        Self { window }
    }
}

impl Layout for DomLayout {
    type Element = web::HtmlImageElement;

    fn window_metrics(&self) -> WindowMetrics {
        window_metrics(&self.window)
    }

    // getBoundingClientRect forces a synchronous reflow, so this always sees
    // the post-resize layout.
    fn measure(&self, element: &Self::Element) -> Option<DomRect> {
        let rect = element.get_bounding_client_rect();
        Some(DomRect::new(
            rect.left() as f32,
            rect.top() as f32,
            rect.width() as f32,
            rect.height() as f32,
        ))
    }

    fn is_attached(&self, element: &Self::Element) -> bool {
        element.is_connected()
    }
}

/// An event subscription that is removed when dropped.
pub struct EventListener {
    target: web::EventTarget,
    event: &'static str,
    closure: Closure<dyn FnMut(web::Event)>,
}

impl EventListener {
    pub fn new(
        target: &web::EventTarget,
        event: &'static str,
        handler: impl FnMut(web::Event) + 'static,
    ) -> Self {
        let closure = Closure::wrap(Box::new(handler) as Box<dyn FnMut(web::Event)>);
        _ = target.add_event_listener_with_callback(event, closure.as_ref().unchecked_ref());
        Self {
            target: target.clone(),
            event,
            closure,
        }
    }

    /// Like `new`, but allows the handler to call `prevent_default`.
    pub fn new_non_passive(
        target: &web::EventTarget,
        event: &'static str,
        handler: impl FnMut(web::Event) + 'static,
    ) -> Self {
        let closure = Closure::wrap(Box::new(handler) as Box<dyn FnMut(web::Event)>);
        let options = web::AddEventListenerOptions::new();
        options.set_passive(false);
        _ = target.add_event_listener_with_callback_and_add_event_listener_options(
            event,
            closure.as_ref().unchecked_ref(),
            &options,
        );
        Self {
            target: target.clone(),
            event,
            closure,
        }
    }
}

impl Drop for EventListener {
    fn drop(&mut self) {
        _ = self
            .target
            .remove_event_listener_with_callback(self.event, self.closure.as_ref().unchecked_ref());
    }
}

/// Match the canvas backing store to the window size at the capped pixel ratio.
pub fn sync_canvas_backing_size(canvas: &web::HtmlCanvasElement, window: &web::Window) {
    let device = DeviceViewport::from_window(&window_metrics(window), MAX_PIXEL_RATIO);
    let (w_px, h_px) = device.physical_size();
    canvas.set_width(w_px);
    canvas.set_height(h_px);
}

type ResizeCallback = Closure<dyn FnMut(js_sys::Array, web::ResizeObserver)>;

/// ResizeObserver on one element; disconnects when dropped.
///
/// Observing the document element catches content growth (images finishing
/// loading, late DOM changes) that never fires a window `resize`.
pub struct ElementResizeObserver {
    observer: web::ResizeObserver,
    _callback: ResizeCallback,
}

impl ElementResizeObserver {
    pub fn new(
        element: &web::Element,
        mut handler: impl FnMut() + 'static,
    ) -> anyhow::Result<Self> {
        let callback: ResizeCallback = Closure::wrap(Box::new(
            move |_entries: js_sys::Array, _observer: web::ResizeObserver| handler(),
        )
            as Box<dyn FnMut(js_sys::Array, web::ResizeObserver)>);
        let observer = web::ResizeObserver::new(callback.as_ref().unchecked_ref())
            .map_err(|e| anyhow::anyhow!("ResizeObserver error: {:?}", e))?;
        observer.observe(element);
        Ok(Self {
            observer,
            _callback: callback,
        })
    }
}

impl Drop for ElementResizeObserver {
    fn drop(&mut self) {
        self.observer.disconnect();
    }
}
