use crate::core::PlaneId;
use crate::frame::Scene;
use crate::observer::PlaneObserver;
use fnv::FnvHashMap;
use glam::Vec2;
use std::cell::RefCell;
use std::rc::Rc;
use wasm_bindgen_futures::JsFuture;
use web_sys as web;

pub type Observers = Rc<RefCell<FnvHashMap<PlaneId, PlaneObserver>>>;

/// Fetch and decode `src` off the render path.
pub async fn load_image(src: &str) -> anyhow::Result<web::HtmlImageElement> {
    let img = web::HtmlImageElement::new().map_err(|e| anyhow::anyhow!("{:?}", e))?;
    img.set_cross_origin(Some("anonymous"));
    img.set_src(src);
    JsFuture::from(img.decode())
        .await
        .map_err(|e| anyhow::anyhow!("decode {src}: {:?}", e))?;
    Ok(img)
}

/// Load the plane's texture, then start observing its element.
///
/// The plane keeps drawing with a blank texture until this completes; on
/// failure it stays blank and is never observed.
pub async fn load_plane_texture(
    id: PlaneId,
    element: web::HtmlImageElement,
    scene: Rc<RefCell<Scene>>,
    observers: Observers,
) {
    let src = element.current_src();
    let src = if src.is_empty() { element.src() } else { src };
    let image = match load_image(&src).await {
        Ok(image) => image,
        Err(e) => {
            scene.borrow_mut().on_texture_failed(id, &format!("{e:#}"));
            return;
        }
    };

    let resolution = Vec2::new(image.natural_width() as f32, image.natural_height() as f32);
    if let Err(e) = scene
        .borrow_mut()
        .on_texture_loaded(id, &image, resolution)
    {
        log::warn!("[texture] {e}");
        return;
    }

    match PlaneObserver::observe(id, &element, &scene) {
        Ok(observer) => {
            observers.borrow_mut().insert(id, observer);
        }
        Err(e) => log::error!("[texture] {id}: {e:#}"),
    }
}
