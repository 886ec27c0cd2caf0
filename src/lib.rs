#![cfg(target_arch = "wasm32")]
use crate::core::{SceneConfig, SceneCoordinator, ScrollConfig};
use fnv::FnvHashMap;
use instant::Instant;
use std::cell::RefCell;
use std::rc::Rc;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use wasm_bindgen_futures::spawn_local;
use web_sys as web;

mod constants;
pub mod core;
mod dom;
mod frame;
mod observer;
mod render;
mod scroll;
mod texture;

/// Everything that must stay alive for the page to keep rendering.
///
/// Dropping it removes every listener, observer and animation-frame loop.
struct App {
    scene: Rc<RefCell<frame::Scene>>,
    observers: texture::Observers,
    _scroll: Rc<scroll::ScrollSource>,
    _resize: dom::EventListener,
    _content: Option<dom::ElementResizeObserver>,
    _render_loop: frame::AnimationLoop,
}

thread_local! {
    static APP: RefCell<Option<App>> = const { RefCell::new(None) };
}

/// Drop planes whose elements left the document, then re-measure the rest.
fn sync_layout(
    scene: &Rc<RefCell<frame::Scene>>,
    observers: &texture::Observers,
    window_resized: bool,
) {
    let mut scene = scene.borrow_mut();
    for id in scene.dispose_detached() {
        observers.borrow_mut().remove(&id);
    }
    if window_resized {
        scene.on_resize();
    } else {
        scene.relayout();
    }
}

fn wire_resize(
    window: &web::Window,
    scene: &Rc<RefCell<frame::Scene>>,
    observers: &texture::Observers,
) -> dom::EventListener {
    let scene = scene.clone();
    let observers = observers.clone();
    dom::EventListener::new(window.as_ref(), "resize", move |_| {
        sync_layout(&scene, &observers, true);
    })
}

// Removed images and late layout shifts change the document's size without a
// window resize.
fn wire_content_resize(
    window: &web::Window,
    scene: &Rc<RefCell<frame::Scene>>,
    observers: &texture::Observers,
) -> Option<dom::ElementResizeObserver> {
    let root = dom::document_element(window)?;
    let scene = scene.clone();
    let observers = observers.clone();
    dom::ElementResizeObserver::new(&root, move || sync_layout(&scene, &observers, false))
        .map_err(|e| log::warn!("[scene] content size not tracked: {e:#}"))
        .ok()
}

#[wasm_bindgen(start)]
pub fn start() -> Result<(), JsValue> {
    console_error_panic_hook::set_once();
    console_log::init_with_level(log::Level::Info).ok();
    log::info!("media-planes starting");

    spawn_local(async move {
        match init().await {
            Ok(app) => APP.with(|slot| *slot.borrow_mut() = Some(app)),
            Err(e) => log::error!("init error: {:?}", e),
        }
    });
    Ok(())
}

/// Tear down the scene: listeners, observers, loops and GPU meshes.
#[wasm_bindgen]
pub fn shutdown() {
    let app = APP.with(|slot| slot.borrow_mut().take());
    if let Some(app) = app {
        app.observers.borrow_mut().clear();
        let ids: Vec<_> = app.scene.borrow().planes().iter().map(|p| p.id()).collect();
        let mut scene = app.scene.borrow_mut();
        for id in ids {
            _ = scene.dispose(id);
        }
        drop(scene);
        log::info!("media-planes stopped");
    }
}

async fn init() -> anyhow::Result<App> {
    let window = web::window().ok_or_else(|| anyhow::anyhow!("no window"))?;
    let document = window
        .document()
        .ok_or_else(|| anyhow::anyhow!("no document"))?;

    let canvas_el = document
        .get_element_by_id(constants::CANVAS_ID)
        .ok_or_else(|| anyhow::anyhow!("missing #{}", constants::CANVAS_ID))?;
    let canvas: web::HtmlCanvasElement = canvas_el
        .dyn_into::<web::HtmlCanvasElement>()
        .map_err(|e| anyhow::anyhow!(format!("{:?}", e)))?;

    // Size the backing store before the surface is created
    dom::sync_canvas_backing_size(&canvas, &window);
    let gpu = render::GpuState::new(&canvas).await?;

    let layout = dom::DomLayout::new(window.clone());
    let images = dom::query_images(&document, constants::IMAGE_SELECTOR);
    let scene = Rc::new(RefCell::new(SceneCoordinator::new(
        SceneConfig::default(),
        layout,
        gpu,
    )));
    let ids = scene.borrow_mut().populate(images.iter().cloned());
    log::info!("[scene] tracking {} images", ids.len());

    let observers: texture::Observers = Rc::new(RefCell::new(FnvHashMap::default()));
    for (id, element) in ids.into_iter().zip(images) {
        spawn_local(texture::load_plane_texture(
            id,
            element,
            scene.clone(),
            observers.clone(),
        ));
    }

    let scroll = Rc::new(scroll::ScrollSource::new(&window, ScrollConfig::default()));
    let resize = wire_resize(&window, &scene, &observers);
    let content = wire_content_resize(&window, &scene, &observers);

    let render_loop = frame::start_render_loop(frame::FrameContext {
        scene: scene.clone(),
        scroll: scroll.clone(),
        last_instant: Instant::now(),
    });

    Ok(App {
        scene,
        observers,
        _scroll: scroll,
        _resize: resize,
        _content: content,
        _render_loop: render_loop,
    })
}
