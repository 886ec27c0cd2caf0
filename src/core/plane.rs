use super::tween::{AnimatedScalar, Easing};
use super::viewport::{ViewportSize, WindowMetrics};
use super::visibility::{VisibilityEdge, VisibilityWatcher};
use glam::{Mat4, Quat, Vec2, Vec3};
use std::fmt;

/// Stable identifier of a plane within one scene.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PlaneId(pub u64);

impl fmt::Display for PlaneId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "plane#{}", self.0)
    }
}

/// Bounding client rectangle in CSS pixels, relative to the window's top-left.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct DomRect {
    pub left: f32,
    pub top: f32,
    pub width: f32,
    pub height: f32,
}

impl DomRect {
    pub fn new(left: f32, top: f32, width: f32, height: f32) -> Self {
        Self {
            left,
            top,
            width,
            height,
        }
    }

    /// Replace non-finite fields with 0 and negative sizes with 0.
    pub fn sanitized(self) -> Self {
        let f = |v: f32| if v.is_finite() { v } else { 0.0 };
        Self {
            left: f(self.left),
            top: f(self.top),
            width: f(self.width).max(0.0),
            height: f(self.height).max(0.0),
        }
    }
}

/// Reveal and color parameters fed to the plane shader each frame.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct MaterialUniforms {
    pub resolution: Vec2,
    pub progress: f32,
    pub color: Vec3,
}

/// Per-plane reveal settings.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RevealConfig {
    pub duration_sec: f32,
    pub easing: Easing,
    pub base_color: Vec3,
}

/// `0xRRGGBB` to normalized RGB.
pub fn rgb_from_hex(hex: u32) -> Vec3 {
    let r = ((hex >> 16) & 0xff) as f32 / 255.0;
    let g = ((hex >> 8) & 0xff) as f32 / 255.0;
    let b = (hex & 0xff) as f32 / 255.0;
    Vec3::new(r, g, b)
}

/// World-space twin of one DOM image element.
///
/// Owns the mesh transform, the scroll-delta integration and the reveal state.
/// `E` is whatever handle the host uses to re-measure the element.
pub struct MediaPlane<E> {
    id: PlaneId,
    element: E,
    viewport: ViewportSize,
    window: WindowMetrics,
    bounds: DomRect,
    dimensions: Vec2,
    position: Vec2,
    // world units, negated like the DOM offset they come from
    current_scroll: f32,
    last_scroll: f32,
    resolution: Vec2,
    progress: AnimatedScalar,
    reveal: RevealConfig,
    watcher: VisibilityWatcher,
    texture_ready: bool,
}

impl<E> MediaPlane<E> {
    /// Build a plane from the element's current bounding rectangle.
    ///
    /// `window.scroll_y` is taken as the scroll the rectangle reflects, so the
    /// first `update_scroll` only applies movement that happened afterwards.
    pub fn create_from_element(
        id: PlaneId,
        element: E,
        rect: DomRect,
        window: WindowMetrics,
        viewport: ViewportSize,
        reveal: RevealConfig,
    ) -> Self {
        let mut plane = Self {
            id,
            element,
            viewport,
            window,
            bounds: DomRect::default(),
            dimensions: Vec2::ZERO,
            position: Vec2::ZERO,
            current_scroll: 0.0,
            last_scroll: 0.0,
            resolution: Vec2::ZERO,
            progress: AnimatedScalar::new(0.0),
            reveal,
            watcher: VisibilityWatcher::new(),
            texture_ready: false,
        };
        plane.remeasure(rect, window);
        plane
    }

    #[inline]
    pub fn id(&self) -> PlaneId {
        self.id
    }

    #[inline]
    pub fn element(&self) -> &E {
        &self.element
    }

    #[inline]
    pub fn bounds(&self) -> DomRect {
        self.bounds
    }

    #[inline]
    pub fn viewport(&self) -> ViewportSize {
        self.viewport
    }

    #[inline]
    pub fn dimensions(&self) -> Vec2 {
        self.dimensions
    }

    #[inline]
    pub fn position(&self) -> Vec2 {
        self.position
    }

    #[inline]
    pub fn current_scroll(&self) -> f32 {
        self.current_scroll
    }

    #[inline]
    pub fn progress(&self) -> f32 {
        self.progress.get()
    }

    #[inline]
    pub fn is_texture_ready(&self) -> bool {
        self.texture_ready
    }

    #[inline]
    pub fn is_visible(&self) -> bool {
        self.watcher.is_visible()
    }

    /// Shift the plane by the scroll movement since the previous sample.
    pub fn update_scroll(&mut self, scroll_offset: f32) {
        if !scroll_offset.is_finite() {
            return;
        }
        let ratio = self.viewport.px_to_world(&self.window).y;
        self.current_scroll = -scroll_offset * ratio;
        let delta = self.current_scroll - self.last_scroll;
        self.last_scroll = self.current_scroll;
        self.position.y -= delta;
    }

    /// Rebuild size and position from a fresh measurement under a new viewport.
    pub fn on_resize(&mut self, viewport: ViewportSize, rect: DomRect, window: WindowMetrics) {
        self.viewport = viewport;
        self.remeasure(rect, window);
    }

    /// Record the decoded image size and start listening for visibility.
    pub fn on_texture_loaded(&mut self, resolution: Vec2) {
        self.resolution = resolution;
        self.texture_ready = true;
        self.watcher.arm();
    }

    /// Apply an intersection report. Returns the edge when the state changed.
    pub fn on_intersection(&mut self, intersecting: bool) -> Option<VisibilityEdge> {
        let edge = self.watcher.report(intersecting)?;
        match edge {
            VisibilityEdge::Entered => {
                self.progress
                    .animate_to(1.0, self.reveal.duration_sec, self.reveal.easing)
            }
            VisibilityEdge::Left => self.progress.set(0.0),
        }
        Some(edge)
    }

    /// Step the reveal animation.
    pub fn advance(&mut self, dt_sec: f32) {
        self.progress.advance(dt_sec);
    }

    pub fn material_uniforms(&self) -> MaterialUniforms {
        MaterialUniforms {
            resolution: self.resolution,
            progress: self.progress.get(),
            color: self.reveal.base_color,
        }
    }

    /// Unit quad scaled to the plane size and moved onto its DOM footprint.
    pub fn model_matrix(&self) -> Mat4 {
        Mat4::from_scale_rotation_translation(
            Vec3::new(self.dimensions.x, self.dimensions.y, 1.0),
            Quat::IDENTITY,
            Vec3::new(self.position.x, self.position.y, 0.0),
        )
    }

    fn remeasure(&mut self, rect: DomRect, window: WindowMetrics) {
        self.window = window;
        self.bounds = rect.sanitized();
        let ratio = self.viewport.px_to_world(&self.window);

        self.dimensions = Vec2::new(self.bounds.width * ratio.x, self.bounds.height * ratio.y);

        let mut position = Vec2::new(self.bounds.left * ratio.x, -self.bounds.top * ratio.y);
        position.x -= self.viewport.width / 2.0;
        position.x += self.dimensions.x / 2.0;
        position.y -= self.dimensions.y / 2.0;
        position.y += self.viewport.height / 2.0;
        self.position = position;

        // The rect already includes the scroll it was measured at; rebase there.
        let scroll_y = if window.scroll_y.is_finite() {
            window.scroll_y
        } else {
            0.0
        };
        self.current_scroll = -scroll_y * ratio.y;
        self.last_scroll = self.current_scroll;
    }
}
