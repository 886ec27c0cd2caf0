// Host-side tests for the reveal transition: easing, tweens and visibility edges.
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

use constants::REVEAL_DURATION_SEC;
use glam::Vec2;
use plane::*;
use tween::*;
use viewport::*;
use visibility::*;

const FRAME: f32 = 1.0 / 60.0;

fn loaded_plane() -> MediaPlane<()> {
    let mut p = MediaPlane::create_from_element(
        PlaneId(0),
        (),
        DomRect::new(0.0, 0.0, 100.0, 100.0),
        WindowMetrics::new(1000.0, 1000.0),
        ViewportSize {
            width: 10.0,
            height: 10.0,
        },
        RevealConfig {
            duration_sec: REVEAL_DURATION_SEC,
            easing: Easing::Linear,
            base_color: rgb_from_hex(0x242424),
        },
    );
    p.on_texture_loaded(Vec2::new(640.0, 480.0));
    p
}

#[test]
fn easings_hit_their_endpoints() {
    for easing in [
        Easing::Linear,
        Easing::QuadInOut,
        Easing::CubicOut,
        Easing::ExpoOut,
    ] {
        assert_eq!(easing.apply(0.0), 0.0, "{easing:?}");
        assert!((easing.apply(1.0) - 1.0).abs() < 1e-6, "{easing:?}");
        assert_eq!(easing.apply(-3.0), easing.apply(0.0));
        assert_eq!(easing.apply(4.0), easing.apply(1.0));
    }
    assert!((Easing::QuadInOut.apply(0.5) - 0.5).abs() < 1e-6);
}

#[test]
fn tween_ends_exactly_on_target() {
    let mut t = Tween::new(0.0, 1.0, 1.6, Easing::CubicOut);
    let mut steps = 0;
    while !t.is_finished() {
        t.advance(FRAME);
        steps += 1;
        assert!(steps < 1000);
    }
    assert_eq!(t.value(), 1.0);
    assert_eq!(t.target(), 1.0);
}

#[test]
fn tween_ignores_bad_time_steps() {
    let mut t = Tween::new(2.0, 4.0, 1.0, Easing::Linear);
    t.advance(-1.0);
    t.advance(f32::NAN);
    assert_eq!(t.value(), 2.0);
    t.advance(0.5);
    assert!((t.value() - 3.0).abs() < 1e-6);
}

#[test]
fn zero_duration_completes_immediately() {
    let mut s = AnimatedScalar::new(0.0);
    s.animate_to(1.0, 0.0, Easing::Linear);
    assert_eq!(s.get(), 1.0);
    assert!(!s.is_animating());
}

#[test]
fn retarget_starts_from_current_value() {
    let mut s = AnimatedScalar::new(0.5);
    s.animate_to(1.0, 1.6, Easing::Linear);
    s.advance(0.8);
    assert!((s.get() - 0.75).abs() < 1e-5);

    s.animate_to(0.0, 1.0, Easing::Linear);
    assert!((s.get() - 0.75).abs() < 1e-5);
    s.advance(0.5);
    assert!((s.get() - 0.375).abs() < 1e-5);
}

#[test]
fn set_cancels_running_tween() {
    let mut s = AnimatedScalar::new(0.0);
    s.animate_to(1.0, 1.0, Easing::Linear);
    s.advance(0.3);
    s.set(0.0);
    assert!(!s.is_animating());
    s.advance(1.0);
    assert_eq!(s.get(), 0.0);
}

#[test]
fn watcher_ignores_reports_until_armed() {
    let mut w = VisibilityWatcher::new();
    assert!(!w.is_visible());
    assert_eq!(w.report(true), None);
    assert!(!w.is_visible());

    w.arm();
    assert!(w.is_armed());
    assert_eq!(w.report(true), Some(VisibilityEdge::Entered));
    assert_eq!(w.report(true), None);
    assert_eq!(w.report(false), Some(VisibilityEdge::Left));
    assert_eq!(w.report(false), None);
}

#[test]
fn entering_reveals_over_the_configured_duration() {
    let mut p = loaded_plane();
    assert_eq!(p.progress(), 0.0);
    assert_eq!(p.on_intersection(true), Some(VisibilityEdge::Entered));

    let mut last = p.progress();
    let mut elapsed = 0.0;
    while elapsed < REVEAL_DURATION_SEC - FRAME {
        p.advance(FRAME);
        elapsed += FRAME;
        let now = p.progress();
        assert!(now >= last, "progress went backwards at {elapsed}s");
        assert!(now < 1.0 || elapsed >= REVEAL_DURATION_SEC - 1e-4);
        last = now;
    }
    p.advance(FRAME);
    p.advance(FRAME);
    assert_eq!(p.progress(), 1.0);
    assert_eq!(p.material_uniforms().progress, 1.0);
}

#[test]
fn leaving_hides_immediately() {
    let mut p = loaded_plane();
    p.on_intersection(true);
    p.advance(0.8);
    assert!(p.progress() > 0.0);

    assert_eq!(p.on_intersection(false), Some(VisibilityEdge::Left));
    assert_eq!(p.progress(), 0.0);
    p.advance(1.0);
    assert_eq!(p.progress(), 0.0);
}

#[test]
fn reentering_restarts_the_full_reveal() {
    let mut p = loaded_plane();
    p.on_intersection(true);
    p.advance(REVEAL_DURATION_SEC);
    assert_eq!(p.progress(), 1.0);

    p.on_intersection(false);
    p.on_intersection(true);
    p.advance(REVEAL_DURATION_SEC / 2.0);
    assert!((p.progress() - 0.5).abs() < 1e-4);
}

#[test]
fn duplicate_enter_does_not_restart() {
    let mut p = loaded_plane();
    p.on_intersection(true);
    p.advance(0.4);
    let before = p.progress();
    assert_eq!(p.on_intersection(true), None);
    assert_eq!(p.progress(), before);
    p.advance(0.4);
    assert!((p.progress() - 0.5).abs() < 1e-4);
}

#[test]
fn unloaded_plane_never_reveals() {
    let mut p = MediaPlane::create_from_element(
        PlaneId(3),
        (),
        DomRect::new(0.0, 0.0, 100.0, 100.0),
        WindowMetrics::new(1000.0, 1000.0),
        ViewportSize {
            width: 10.0,
            height: 10.0,
        },
        RevealConfig {
            duration_sec: REVEAL_DURATION_SEC,
            easing: Easing::Linear,
            base_color: rgb_from_hex(0x242424),
        },
    );
    assert_eq!(p.on_intersection(true), None);
    p.advance(REVEAL_DURATION_SEC);
    assert_eq!(p.progress(), 0.0);
    assert!(!p.is_visible());
    assert!(!p.is_texture_ready());
    assert_eq!(p.material_uniforms().resolution, Vec2::ZERO);
}
