use super::constants::{
    CAMERA_DISTANCE, CAMERA_FAR, CAMERA_FOV_DEG, CAMERA_NEAR, MIN_WINDOW_PX,
};
use glam::{Mat4, Vec2, Vec3};

/// Snapshot of the browser window as seen by layout queries.
///
/// `scroll_y` is the document scroll that bounding rectangles measured in the
/// same pass are relative to.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct WindowMetrics {
    pub inner_width: f32,
    pub inner_height: f32,
    pub device_pixel_ratio: f32,
    pub scroll_y: f32,
}

impl WindowMetrics {
    pub fn new(inner_width: f32, inner_height: f32) -> Self {
        Self {
            inner_width,
            inner_height,
            device_pixel_ratio: 1.0,
            scroll_y: 0.0,
        }
    }

    /// Window size in CSS pixels, clamped so it is always safe to divide by.
    #[inline]
    pub fn clamped_size(&self) -> Vec2 {
        Vec2::new(
            finite_or(self.inner_width, 0.0).max(MIN_WINDOW_PX),
            finite_or(self.inner_height, 0.0).max(MIN_WINDOW_PX),
        )
    }

    #[inline]
    pub fn aspect(&self) -> f32 {
        let size = self.clamped_size();
        size.x / size.y
    }
}

/// Raw window pixel size and capped device pixel ratio; sizes the output surface only.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DeviceViewport {
    pub width: f32,
    pub height: f32,
    pub pixel_ratio: f32,
}

impl DeviceViewport {
    pub fn from_window(window: &WindowMetrics, max_pixel_ratio: f32) -> Self {
        let size = window.clamped_size();
        let dpr = finite_or(window.device_pixel_ratio, 1.0).max(0.0);
        Self {
            width: size.x,
            height: size.y,
            pixel_ratio: dpr.min(max_pixel_ratio),
        }
    }

    /// Backing-store size in physical pixels (never zero).
    #[inline]
    pub fn physical_size(&self) -> (u32, u32) {
        let w = (self.width * self.pixel_ratio).round().max(1.0) as u32;
        let h = (self.height * self.pixel_ratio).round().max(1.0) as u32;
        (w, h)
    }
}

/// World-space size of the visible frustum slice at the scene's working depth.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct ViewportSize {
    pub width: f32,
    pub height: f32,
}

impl ViewportSize {
    /// World units per CSS pixel along each axis for the given window.
    #[inline]
    pub fn px_to_world(&self, window: &WindowMetrics) -> Vec2 {
        let size = window.clamped_size();
        Vec2::new(self.width / size.x, self.height / size.y)
    }
}

/// Fixed perspective camera looking down -Z at the origin.
///
/// The scene lives on the z = 0 plane; `distance` is how far the eye sits in
/// front of it. Only `aspect` changes at runtime (on resize).
#[derive(Clone, Debug, PartialEq)]
pub struct CameraModel {
    pub fov_degrees: f32,
    pub distance: f32,
    pub aspect: f32,
    pub near: f32,
    pub far: f32,
}

impl Default for CameraModel {
    fn default() -> Self {
        Self {
            fov_degrees: CAMERA_FOV_DEG,
            distance: CAMERA_DISTANCE,
            aspect: 1.0,
            near: CAMERA_NEAR,
            far: CAMERA_FAR,
        }
    }
}

impl CameraModel {
    pub fn new(fov_degrees: f32, distance: f32) -> Self {
        Self {
            fov_degrees,
            distance,
            ..Self::default()
        }
    }

    #[inline]
    pub fn fov_radians(&self) -> f32 {
        self.fov_degrees.to_radians()
    }

    pub fn set_window(&mut self, window: &WindowMetrics) {
        self.aspect = window.aspect();
    }

    /// `height = 2 · distance · tan(fov / 2)`, `width = height · aspect`.
    pub fn viewport_size(&self) -> ViewportSize {
        let height = 2.0 * self.distance * (self.fov_radians() / 2.0).tan();
        ViewportSize {
            width: height * self.aspect,
            height,
        }
    }

    pub fn eye(&self) -> Vec3 {
        Vec3::new(0.0, 0.0, self.distance)
    }

    pub fn projection_matrix(&self) -> Mat4 {
        // wgpu clip space has z in [0, 1], so no GL variant here
        Mat4::perspective_rh(self.fov_radians(), self.aspect, self.near, self.far)
    }

    pub fn view_matrix(&self) -> Mat4 {
        Mat4::look_at_rh(self.eye(), Vec3::ZERO, Vec3::Y)
    }

    pub fn view_projection(&self) -> Mat4 {
        self.projection_matrix() * self.view_matrix()
    }
}

/// Derive both viewport descriptions for a window in one pass.
pub fn measure_viewports(
    camera: &mut CameraModel,
    window: &WindowMetrics,
    max_pixel_ratio: f32,
) -> (DeviceViewport, ViewportSize) {
    camera.set_window(window);
    (
        DeviceViewport::from_window(window, max_pixel_ratio),
        camera.viewport_size(),
    )
}

#[inline]
fn finite_or(v: f32, fallback: f32) -> f32 {
    if v.is_finite() {
        v
    } else {
        fallback
    }
}
