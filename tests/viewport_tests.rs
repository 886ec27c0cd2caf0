// Host-side tests for the camera/viewport model.
// The main crate is wasm-only, so we include the pure-Rust modules directly.

#![allow(dead_code)]
mod constants {
    include!("../src/core/constants.rs");
}
mod viewport {
    include!("../src/core/viewport.rs");
}

use constants::*;
use viewport::*;

fn approx(a: f32, b: f32, eps: f32) -> bool {
    (a - b).abs() <= eps * b.abs().max(1.0)
}

#[test]
fn viewport_height_follows_fov_and_distance() {
    let distances = [0.5_f32, 1.0, 10.0, 42.0];
    let fovs = [1.0_f32, 30.0, 45.0, 75.0, 120.0, 179.0];
    for &d in &distances {
        for &fov in &fovs {
            let mut camera = CameraModel::new(fov, d);
            camera.set_window(&WindowMetrics::new(1280.0, 720.0));
            let size = camera.viewport_size();
            let expected = 2.0 * d * (fov.to_radians() / 2.0).tan();
            assert!(
                approx(size.height, expected, 1e-5),
                "d={d} fov={fov}: {} vs {expected}",
                size.height
            );
            assert!(approx(size.width / size.height, 1280.0 / 720.0, 1e-5));
        }
    }
}

#[test]
fn default_camera_matches_scene_constants() {
    let mut camera = CameraModel::default();
    let (_, size) = measure_viewports(&mut camera, &WindowMetrics::new(1000.0, 1000.0), MAX_PIXEL_RATIO);
    // 2 · 10 · tan(37.5°)
    assert!(approx(size.height, 15.346_539, 1e-5));
    assert!(approx(size.width, size.height, 1e-6));
    assert_eq!(camera.fov_degrees, CAMERA_FOV_DEG);
    assert_eq!(camera.distance, CAMERA_DISTANCE);
}

#[test]
fn zero_window_height_is_clamped() {
    let mut camera = CameraModel::default();
    let window = WindowMetrics::new(800.0, 0.0);
    let (device, size) = measure_viewports(&mut camera, &window, MAX_PIXEL_RATIO);
    assert!(camera.aspect.is_finite());
    assert_eq!(camera.aspect, 800.0 / MIN_WINDOW_PX);
    assert!(size.width.is_finite() && size.height.is_finite());
    assert_eq!(device.height, MIN_WINDOW_PX);
    let ratio = size.px_to_world(&window);
    assert!(ratio.x.is_finite() && ratio.y.is_finite());
}

#[test]
fn non_finite_window_falls_back_to_minimum() {
    let window = WindowMetrics::new(f32::NAN, f32::INFINITY);
    let size = window.clamped_size();
    assert_eq!(size.x, MIN_WINDOW_PX);
    assert_eq!(size.y, MIN_WINDOW_PX);
}

#[test]
fn device_pixel_ratio_is_capped() {
    let mut window = WindowMetrics::new(1440.0, 900.0);
    window.device_pixel_ratio = 3.0;
    let device = DeviceViewport::from_window(&window, MAX_PIXEL_RATIO);
    assert_eq!(device.pixel_ratio, 2.0);
    assert_eq!(device.physical_size(), (2880, 1800));

    window.device_pixel_ratio = 1.25;
    let device = DeviceViewport::from_window(&window, MAX_PIXEL_RATIO);
    assert_eq!(device.pixel_ratio, 1.25);
    assert_eq!(device.physical_size(), (1800, 1125));
}

#[test]
fn physical_size_is_never_zero() {
    let mut window = WindowMetrics::new(0.0, 0.0);
    window.device_pixel_ratio = 0.0;
    let device = DeviceViewport::from_window(&window, MAX_PIXEL_RATIO);
    assert_eq!(device.physical_size(), (1, 1));
}

#[test]
fn origin_projects_to_screen_center() {
    let mut camera = CameraModel::default();
    camera.set_window(&WindowMetrics::new(1600.0, 900.0));
    let clip = camera.view_projection() * glam::Vec4::new(0.0, 0.0, 0.0, 1.0);
    let ndc = clip.truncate() / clip.w;
    assert!(ndc.x.abs() < 1e-6);
    assert!(ndc.y.abs() < 1e-6);
    assert!(ndc.z > 0.0 && ndc.z < 1.0);
}

#[test]
fn viewport_corners_project_to_screen_corners() {
    let mut camera = CameraModel::default();
    let window = WindowMetrics::new(1600.0, 900.0);
    let (_, size) = measure_viewports(&mut camera, &window, MAX_PIXEL_RATIO);
    let corner = glam::Vec4::new(size.width / 2.0, size.height / 2.0, 0.0, 1.0);
    let clip = camera.view_projection() * corner;
    let ndc = clip.truncate() / clip.w;
    assert!(approx(ndc.x, 1.0, 1e-4), "ndc.x = {}", ndc.x);
    assert!(approx(ndc.y, 1.0, 1e-4), "ndc.y = {}", ndc.y);
}
