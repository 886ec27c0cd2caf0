// Host-side tests for plane sizing, placement and scroll integration.
// The main crate is wasm-only, so we include the pure-Rust modules directly.

#![allow(dead_code)]
mod constants {
    include!("../src/core/constants.rs");
}
mod tween {
    include!("../src/core/tween.rs");
}
mod viewport {
    include!("../src/core/viewport.rs");
}
mod visibility {
    include!("../src/core/visibility.rs");
}
mod plane {
    include!("../src/core/plane.rs");
}

use glam::Vec2;
use plane::*;
use tween::Easing;
use viewport::*;

const EPS: f32 = 1e-4;

fn reveal() -> RevealConfig {
    RevealConfig {
        duration_sec: constants::REVEAL_DURATION_SEC,
        easing: Easing::Linear,
        base_color: rgb_from_hex(constants::PLANE_BASE_COLOR_HEX),
    }
}

fn plane_at(rect: DomRect, window: WindowMetrics, viewport: ViewportSize) -> MediaPlane<()> {
    MediaPlane::create_from_element(PlaneId(0), (), rect, window, viewport, reveal())
}

fn close(a: Vec2, b: Vec2) -> bool {
    (a - b).abs().max_element() < EPS
}

fn top_left(p: &MediaPlane<()>) -> Vec2 {
    let pos = p.position();
    let dims = p.dimensions();
    Vec2::new(pos.x - dims.x / 2.0, pos.y + dims.y / 2.0)
}

#[test]
fn full_window_rect_covers_the_viewport() {
    let window = WindowMetrics::new(1000.0, 800.0);
    let viewport = ViewportSize {
        width: 20.0,
        height: 16.0,
    };
    let p = plane_at(DomRect::new(0.0, 0.0, 1000.0, 800.0), window, viewport);
    assert!(close(p.dimensions(), Vec2::new(20.0, 16.0)));
    assert!(close(p.position(), Vec2::ZERO));
}

#[test]
fn top_left_corner_tracks_the_dom_rect() {
    let window = WindowMetrics::new(1000.0, 800.0);
    let viewport = ViewportSize {
        width: 20.0,
        height: 16.0,
    };
    let origin = plane_at(DomRect::new(0.0, 0.0, 300.0, 200.0), window, viewport);
    assert!(close(top_left(&origin), Vec2::new(-10.0, 8.0)));

    let offset = plane_at(DomRect::new(250.0, 100.0, 300.0, 200.0), window, viewport);
    // 250px · 20/1000 = 5 right, 100px · 16/800 = 2 down
    assert!(close(top_left(&offset), Vec2::new(-5.0, 6.0)));
    assert!(close(offset.dimensions(), Vec2::new(6.0, 4.0)));
}

#[test]
fn scroll_deltas_move_the_plane_by_world_distance() {
    let window = WindowMetrics::new(1000.0, 1000.0);
    let viewport = ViewportSize {
        width: 10.0,
        height: 10.0,
    };
    let mut p = plane_at(DomRect::new(0.0, 400.0, 100.0, 100.0), window, viewport);
    let start = p.position().y;

    p.update_scroll(0.0);
    assert!((p.position().y - start).abs() < EPS);

    p.update_scroll(100.0);
    assert!((p.position().y - (start + 1.0)).abs() < EPS);

    p.update_scroll(250.0);
    assert!((p.position().y - (start + 2.5)).abs() < EPS);
    assert!((p.current_scroll() + 2.5).abs() < EPS);
}

#[test]
fn scrolling_back_restores_the_original_position() {
    let window = WindowMetrics::new(1280.0, 720.0);
    let viewport = ViewportSize {
        width: 16.0,
        height: 9.0,
    };
    let mut p = plane_at(DomRect::new(40.0, 900.0, 400.0, 300.0), window, viewport);
    let start = p.position();
    for offset in [12.0, 480.0, 1333.3, 7.5, 0.0] {
        p.update_scroll(offset);
    }
    assert!(close(p.position(), start));
    assert_eq!(p.position().x, start.x);
}

#[test]
fn non_finite_scroll_is_ignored() {
    let window = WindowMetrics::new(1000.0, 1000.0);
    let viewport = ViewportSize {
        width: 10.0,
        height: 10.0,
    };
    let mut p = plane_at(DomRect::new(0.0, 0.0, 10.0, 10.0), window, viewport);
    p.update_scroll(50.0);
    let before = p.position();
    p.update_scroll(f32::NAN);
    assert_eq!(p.position(), before);
}

#[test]
fn zero_rect_yields_zero_size_plane() {
    let window = WindowMetrics::new(1000.0, 1000.0);
    let viewport = ViewportSize {
        width: 10.0,
        height: 10.0,
    };
    let p = plane_at(DomRect::default(), window, viewport);
    assert_eq!(p.dimensions(), Vec2::ZERO);
    assert!(close(p.position(), Vec2::new(-5.0, 5.0)));
    assert!(p.model_matrix().is_finite());
}

#[test]
fn garbage_rect_is_sanitized() {
    let rect = DomRect::new(f32::NAN, 10.0, -50.0, f32::INFINITY).sanitized();
    assert_eq!(rect, DomRect::new(0.0, 10.0, 0.0, 0.0));
}

#[test]
fn resize_is_idempotent() {
    let window = WindowMetrics::new(1000.0, 1000.0);
    let viewport = ViewportSize {
        width: 10.0,
        height: 10.0,
    };
    let rect = DomRect::new(100.0, 300.0, 200.0, 150.0);
    let mut p = plane_at(rect, window, viewport);

    let resized = WindowMetrics::new(800.0, 600.0);
    let new_viewport = ViewportSize {
        width: 12.0,
        height: 9.0,
    };
    let new_rect = DomRect::new(80.0, 240.0, 160.0, 120.0);
    p.on_resize(new_viewport, new_rect, resized);
    let (pos, dims) = (p.position(), p.dimensions());
    p.on_resize(new_viewport, new_rect, resized);
    assert_eq!(p.position(), pos);
    assert_eq!(p.dimensions(), dims);
    assert_eq!(p.viewport(), new_viewport);
}

#[test]
fn resize_while_scrolled_rebases_the_scroll_baseline() {
    let window = WindowMetrics::new(1000.0, 1000.0);
    let viewport = ViewportSize {
        width: 10.0,
        height: 10.0,
    };
    // Page-space top of 1200px, measured at scroll 0
    let mut p = plane_at(DomRect::new(0.0, 1200.0, 100.0, 100.0), window, viewport);
    p.update_scroll(300.0);

    // Window shrinks to 800px tall while the page sits at scroll 300
    let mut resized = WindowMetrics::new(1000.0, 800.0);
    resized.scroll_y = 300.0;
    let new_viewport = ViewportSize {
        width: 12.5,
        height: 10.0,
    };
    let rect = DomRect::new(0.0, 900.0, 100.0, 100.0);
    p.on_resize(new_viewport, rect, resized);

    let fresh = MediaPlane::create_from_element(PlaneId(1), (), rect, resized, new_viewport, reveal());
    assert!(close(p.position(), fresh.position()));

    // Same offset again: nothing moved since the measurement
    p.update_scroll(300.0);
    assert!(close(p.position(), fresh.position()));

    // 100px more scroll at 10/800 world units per px
    p.update_scroll(400.0);
    let expected = fresh.position().y + 100.0 * 10.0 / 800.0;
    assert!((p.position().y - expected).abs() < EPS);
}

#[test]
fn model_matrix_scales_and_translates_the_unit_quad() {
    let window = WindowMetrics::new(1000.0, 1000.0);
    let viewport = ViewportSize {
        width: 10.0,
        height: 10.0,
    };
    let p = plane_at(DomRect::new(500.0, 0.0, 200.0, 400.0), window, viewport);
    let m = p.model_matrix();
    let corner = m.transform_point3(glam::Vec3::new(-0.5, 0.5, 0.0));
    assert!(close(corner.truncate(), top_left(&p)));
    assert!(close(top_left(&p), Vec2::new(0.0, 5.0)));
}

#[test]
fn hex_colors_are_normalized() {
    let c = rgb_from_hex(0x242424);
    assert!((c.x - 36.0 / 255.0).abs() < 1e-6);
    assert_eq!(c.x, c.y);
    assert_eq!(c.y, c.z);
    assert_eq!(rgb_from_hex(0xff0080), glam::Vec3::new(1.0, 0.0, 128.0 / 255.0));
}

#[test]
fn plane_ids_display_with_prefix() {
    assert_eq!(PlaneId(7).to_string(), "plane#7");
}
