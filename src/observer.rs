use crate::core::PlaneId;
use crate::frame::Scene;
use std::cell::RefCell;
use std::rc::Rc;
use wasm_bindgen::closure::Closure;
use wasm_bindgen::{JsCast, JsValue};
use web_sys as web;

type ObserverCallback = Closure<dyn FnMut(js_sys::Array, web::IntersectionObserver)>;

/// IntersectionObserver on one plane's element; disconnects when dropped.
///
/// Notifications are queued on the scene and applied at the next render tick.
pub struct PlaneObserver {
    observer: web::IntersectionObserver,
    _callback: ObserverCallback,
}

impl PlaneObserver {
    pub fn observe(
        id: PlaneId,
        element: &web::Element,
        scene: &Rc<RefCell<Scene>>,
    ) -> anyhow::Result<Self> {
        let scene = Rc::downgrade(scene);
        let callback: ObserverCallback = Closure::wrap(Box::new(
            move |entries: js_sys::Array, _observer: web::IntersectionObserver| {
                // Only the latest entry matters when several are batched
                let Some(entry) = entries
                    .iter()
                    .last()
                    .and_then(|e| e.dyn_into::<web::IntersectionObserverEntry>().ok())
                else {
                    return;
                };
                if let Some(scene) = scene.upgrade() {
                    scene
                        .borrow_mut()
                        .queue_visibility(id, entry.is_intersecting());
                }
            },
        )
            as Box<dyn FnMut(js_sys::Array, web::IntersectionObserver)>);

        let options = web::IntersectionObserverInit::new();
        options.set_threshold(&JsValue::from_f64(0.0));
        let observer = web::IntersectionObserver::new_with_options(
            callback.as_ref().unchecked_ref(),
            &options,
        )
        .map_err(|e| anyhow::anyhow!("IntersectionObserver error: {:?}", e))?;
        observer.observe(element);

        Ok(Self {
            observer,
            _callback: callback,
        })
    }
}

impl Drop for PlaneObserver {
    fn drop(&mut self) {
        self.observer.disconnect();
    }
}
