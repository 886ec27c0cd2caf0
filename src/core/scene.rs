use super::constants::{
    CAMERA_DISTANCE, CAMERA_FOV_DEG, MAX_PIXEL_RATIO, PLANE_BASE_COLOR_HEX, REVEAL_DURATION_SEC,
};
use super::plane::{rgb_from_hex, DomRect, MaterialUniforms, MediaPlane, PlaneId, RevealConfig};
use super::tween::Easing;
use super::viewport::{measure_viewports, CameraModel, DeviceViewport, ViewportSize, WindowMetrics};
use super::visibility::VisibilityEdge;
use glam::{Mat4, Vec2};
use smallvec::SmallVec;
use std::collections::VecDeque;

/// Read-only access to the page layout the planes mirror.
pub trait Layout {
    type Element;

    fn window_metrics(&self) -> WindowMetrics;

    /// Current bounding client rectangle, or `None` when it cannot be measured.
    fn measure(&self, element: &Self::Element) -> Option<DomRect>;

    /// Whether the element is still part of the document.
    fn is_attached(&self, element: &Self::Element) -> bool;
}

/// Everything the renderer needs to draw one plane for one frame.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct MeshInstance {
    pub id: PlaneId,
    pub model: Mat4,
    pub material: MaterialUniforms,
}

/// Drawing backend for the scene graph.
pub trait SceneRenderer {
    /// Decoded image handed over once a plane's texture has loaded.
    type Image;

    /// Register a mesh; it draws with a blank texture until `set_texture`.
    fn add_mesh(&mut self, id: PlaneId);
    fn remove_mesh(&mut self, id: PlaneId);
    fn set_texture(&mut self, id: PlaneId, image: &Self::Image) -> anyhow::Result<()>;
    fn set_surface_size(&mut self, device: &DeviceViewport);
    fn draw(&mut self, camera: &CameraModel, meshes: &[MeshInstance]) -> anyhow::Result<()>;
}

#[derive(Debug, thiserror::Error)]
pub enum SceneError {
    #[error("no plane with id {0}")]
    UnknownPlane(PlaneId),
    #[error("texture upload for {id} failed: {source:#}")]
    Texture { id: PlaneId, source: anyhow::Error },
    #[error("draw failed: {0:#}")]
    Draw(anyhow::Error),
}

/// Scene-wide tuning; defaults mirror `core::constants`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SceneConfig {
    pub fov_degrees: f32,
    pub camera_distance: f32,
    pub max_pixel_ratio: f32,
    pub reveal: RevealConfig,
}

impl Default for SceneConfig {
    fn default() -> Self {
        Self {
            fov_degrees: CAMERA_FOV_DEG,
            camera_distance: CAMERA_DISTANCE,
            max_pixel_ratio: MAX_PIXEL_RATIO,
            reveal: RevealConfig {
                duration_sec: REVEAL_DURATION_SEC,
                easing: Easing::Linear,
                base_color: rgb_from_hex(PLANE_BASE_COLOR_HEX),
            },
        }
    }
}

/// Owns the camera, the planes and the renderer; drives the per-frame tick.
///
/// Typical usage:
/// - Construct with `SceneCoordinator::new(config, layout, renderer)`
/// - Register elements with `add_element` / `populate`
/// - Call `render(scroll_offset, dt_sec)` once per animation frame
/// - Call `on_resize()` from the window resize handler and `relayout()` when
///   the document content changes size
pub struct SceneCoordinator<L: Layout, R: SceneRenderer> {
    config: SceneConfig,
    layout: L,
    renderer: R,
    camera: CameraModel,
    window: WindowMetrics,
    device: DeviceViewport,
    viewport: ViewportSize,
    planes: Vec<MediaPlane<L::Element>>,
    next_id: u64,
    pending_visibility: VecDeque<(PlaneId, bool)>,
    meshes: Vec<MeshInstance>,
}

impl<L: Layout, R: SceneRenderer> SceneCoordinator<L, R> {
    pub fn new(config: SceneConfig, layout: L, mut renderer: R) -> Self {
        let mut camera = CameraModel::new(config.fov_degrees, config.camera_distance);
        let window = layout.window_metrics();
        let (device, viewport) = measure_viewports(&mut camera, &window, config.max_pixel_ratio);
        renderer.set_surface_size(&device);
        log::info!(
            "[scene] viewport {:.3}x{:.3} world, surface {:.0}x{:.0}@{:.2}",
            viewport.width,
            viewport.height,
            device.width,
            device.height,
            device.pixel_ratio
        );
        Self {
            config,
            layout,
            renderer,
            camera,
            window,
            device,
            viewport,
            planes: Vec::new(),
            next_id: 0,
            pending_visibility: VecDeque::new(),
            meshes: Vec::new(),
        }
    }

    /// Create a plane for `element` and add its mesh to the scene right away.
    pub fn add_element(&mut self, element: L::Element) -> PlaneId {
        let id = PlaneId(self.next_id);
        self.next_id += 1;
        let rect = self.layout.measure(&element).unwrap_or_else(|| {
            log::warn!("[scene] {id} has no bounding rect; using a zero-size plane");
            DomRect::default()
        });
        let plane = MediaPlane::create_from_element(
            id,
            element,
            rect,
            self.window,
            self.viewport,
            self.config.reveal,
        );
        self.renderer.add_mesh(id);
        self.planes.push(plane);
        id
    }

    pub fn populate(&mut self, elements: impl IntoIterator<Item = L::Element>) -> Vec<PlaneId> {
        elements.into_iter().map(|e| self.add_element(e)).collect()
    }

    /// One animation frame: visibility, reveal tweens, scroll, then a single draw.
    pub fn render(&mut self, scroll_offset: f32, dt_sec: f32) -> Result<(), SceneError> {
        self.apply_pending_visibility();

        self.meshes.clear();
        for plane in &mut self.planes {
            plane.advance(dt_sec);
            plane.update_scroll(scroll_offset);
            self.meshes.push(MeshInstance {
                id: plane.id(),
                model: plane.model_matrix(),
                material: plane.material_uniforms(),
            });
        }

        self.renderer
            .draw(&self.camera, &self.meshes)
            .map_err(SceneError::Draw)
    }

    /// Recompute camera and surface sizing, then re-measure every plane.
    pub fn on_resize(&mut self) {
        self.window = self.layout.window_metrics();
        let (device, viewport) =
            measure_viewports(&mut self.camera, &self.window, self.config.max_pixel_ratio);
        self.device = device;
        self.viewport = viewport;
        self.renderer.set_surface_size(&self.device);
        self.remeasure_planes();
        log::debug!(
            "[scene] resized: viewport {:.3}x{:.3}, {} planes",
            self.viewport.width,
            self.viewport.height,
            self.planes.len()
        );
    }

    /// Re-measure every plane after the page layout moved under an unchanged window.
    ///
    /// Falls back to `on_resize` when the window size or pixel ratio changed.
    pub fn relayout(&mut self) {
        let window = self.layout.window_metrics();
        if window.clamped_size() != self.window.clamped_size()
            || window.device_pixel_ratio != self.window.device_pixel_ratio
        {
            self.on_resize();
            return;
        }
        self.window = window;
        self.remeasure_planes();
    }

    /// Upload the decoded image, arm the plane's visibility watcher and pick up
    /// any layout shift the loaded image caused.
    pub fn on_texture_loaded(
        &mut self,
        id: PlaneId,
        image: &R::Image,
        resolution: Vec2,
    ) -> Result<(), SceneError> {
        let index = self.index_of(id)?;
        self.renderer
            .set_texture(id, image)
            .map_err(|source| SceneError::Texture { id, source })?;
        self.planes[index].on_texture_loaded(resolution);
        self.relayout();
        log::debug!(
            "[texture] {id} ready at {}x{}",
            resolution.x as u32,
            resolution.y as u32
        );
        Ok(())
    }

    /// The plane keeps its blank texture and never starts observing.
    pub fn on_texture_failed(&mut self, id: PlaneId, reason: &str) {
        log::warn!("[texture] {id} failed to load: {reason}");
    }

    /// Queue an intersection report; applied at the start of the next `render`.
    pub fn queue_visibility(&mut self, id: PlaneId, intersecting: bool) {
        self.pending_visibility.push_back((id, intersecting));
    }

    /// Remove a plane and its mesh.
    pub fn dispose(&mut self, id: PlaneId) -> Result<MediaPlane<L::Element>, SceneError> {
        let index = self.index_of(id)?;
        let plane = self.planes.remove(index);
        self.renderer.remove_mesh(id);
        self.pending_visibility.retain(|(pending, _)| *pending != id);
        log::debug!("[scene] disposed {id}");
        Ok(plane)
    }

    /// Dispose every plane whose element left the document.
    pub fn dispose_detached(&mut self) -> Vec<PlaneId> {
        let detached: SmallVec<[PlaneId; 8]> = self
            .planes
            .iter()
            .filter(|p| !self.layout.is_attached(p.element()))
            .map(|p| p.id())
            .collect();
        detached
            .into_iter()
            .filter(|id| self.dispose(*id).is_ok())
            .collect()
    }

    pub fn plane(&self, id: PlaneId) -> Option<&MediaPlane<L::Element>> {
        self.planes.iter().find(|p| p.id() == id)
    }

    pub fn planes(&self) -> &[MediaPlane<L::Element>] {
        &self.planes
    }

    pub fn camera(&self) -> &CameraModel {
        &self.camera
    }

    pub fn viewport(&self) -> ViewportSize {
        self.viewport
    }

    pub fn device_viewport(&self) -> DeviceViewport {
        self.device
    }

    pub fn window(&self) -> WindowMetrics {
        self.window
    }

    pub fn layout(&self) -> &L {
        &self.layout
    }

    pub fn renderer(&self) -> &R {
        &self.renderer
    }

    pub fn renderer_mut(&mut self) -> &mut R {
        &mut self.renderer
    }

    fn index_of(&self, id: PlaneId) -> Result<usize, SceneError> {
        self.planes
            .iter()
            .position(|p| p.id() == id)
            .ok_or(SceneError::UnknownPlane(id))
    }

    // Rects reflect `self.window.scroll_y`, which each plane rebases to.
    fn remeasure_planes(&mut self) {
        for plane in &mut self.planes {
            let rect = self.layout.measure(plane.element()).unwrap_or_default();
            plane.on_resize(self.viewport, rect, self.window);
        }
    }

    fn apply_pending_visibility(&mut self) {
        while let Some((id, intersecting)) = self.pending_visibility.pop_front() {
            let Some(plane) = self.planes.iter_mut().find(|p| p.id() == id) else {
                continue;
            };
            match plane.on_intersection(intersecting) {
                Some(VisibilityEdge::Entered) => log::debug!("[scene] {id} entered viewport"),
                Some(VisibilityEdge::Left) => log::debug!("[scene] {id} left viewport"),
                None => {}
            }
        }
    }
}
