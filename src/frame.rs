use crate::core::SceneCoordinator;
use crate::dom::DomLayout;
use crate::render::GpuState;
use crate::scroll::ScrollSource;
use instant::Instant;
use std::cell::{Cell, RefCell};
use std::rc::Rc;
use wasm_bindgen::closure::Closure;
use wasm_bindgen::JsCast;
use web_sys as web;

// Upper bound on the frame delta fed to reveal tweens (hidden tabs stall RAF)
const MAX_FRAME_DT_SEC: f32 = 0.1;

pub type Scene = SceneCoordinator<DomLayout, GpuState>;

/// Per-frame render tick: pull the scroll offset, hand it to the scene.
pub struct FrameContext {
    pub scene: Rc<RefCell<Scene>>,
    pub scroll: Rc<ScrollSource>,
    pub last_instant: Instant,
}

impl FrameContext {
    pub fn frame(&mut self) {
        let now = Instant::now();
        let dt = now - self.last_instant;
        self.last_instant = now;
        let dt_sec = dt.as_secs_f32().min(MAX_FRAME_DT_SEC);

        let scroll = self.scroll.get_scroll();
        if let Err(e) = self.scene.borrow_mut().render(scroll, dt_sec) {
            log::error!("render error: {e}");
        }
    }
}

type TickClosure = Closure<dyn FnMut(f64)>;

/// A self-rescheduling requestAnimationFrame loop; cancelled when dropped.
pub struct AnimationLoop {
    tick: Rc<RefCell<Option<TickClosure>>>,
    handle: Rc<Cell<Option<i32>>>,
}

impl Drop for AnimationLoop {
    fn drop(&mut self) {
        if let (Some(w), Some(id)) = (web::window(), self.handle.take()) {
            _ = w.cancel_animation_frame(id);
        }
        // Break the closure's reference cycle back to `tick`
        self.tick.borrow_mut().take();
    }
}

fn request_frame(tick: &Rc<RefCell<Option<TickClosure>>>) -> Option<i32> {
    let w = web::window()?;
    let tick = tick.borrow();
    let closure = tick.as_ref()?;
    w.request_animation_frame(closure.as_ref().unchecked_ref()).ok()
}

/// Run `on_frame(timestamp_ms)` once per display frame until the handle drops.
pub fn start_loop(mut on_frame: impl FnMut(f64) + 'static) -> AnimationLoop {
    let tick: Rc<RefCell<Option<TickClosure>>> = Rc::new(RefCell::new(None));
    let handle: Rc<Cell<Option<i32>>> = Rc::new(Cell::new(None));
    let tick_clone = tick.clone();
    let handle_clone = handle.clone();
    *tick.borrow_mut() = Some(Closure::wrap(Box::new(move |now_ms: f64| {
        on_frame(now_ms);
        handle_clone.set(request_frame(&tick_clone));
    }) as Box<dyn FnMut(f64)>));
    handle.set(request_frame(&tick));
    AnimationLoop { tick, handle }
}

pub fn start_render_loop(mut frame_ctx: FrameContext) -> AnimationLoop {
    start_loop(move |_| frame_ctx.frame())
}
