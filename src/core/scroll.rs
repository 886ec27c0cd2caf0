use super::constants::{
    SCROLL_ECHO_PX, SCROLL_LERP, SCROLL_SNAP_PX, WHEEL_LINE_PX, WHEEL_MULTIPLIER,
};

/// DOM `WheelEvent.deltaMode` values.
pub const WHEEL_DELTA_PIXEL: u32 = 0;
pub const WHEEL_DELTA_LINE: u32 = 1;
pub const WHEEL_DELTA_PAGE: u32 = 2;

/// Tuning for [`SmoothScroll`].
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ScrollConfig {
    /// Fraction of the remaining distance covered per 60 Hz frame.
    pub lerp: f32,
    pub wheel_multiplier: f32,
    pub snap_px: f32,
    /// Native offsets within this distance of the eased offset are echoes of our own scroll.
    pub echo_px: f32,
}

impl Default for ScrollConfig {
    fn default() -> Self {
        Self {
            lerp: SCROLL_LERP,
            wheel_multiplier: WHEEL_MULTIPLIER,
            snap_px: SCROLL_SNAP_PX,
            echo_px: SCROLL_ECHO_PX,
        }
    }
}

/// Normalize a wheel delta to CSS pixels.
#[inline]
pub fn wheel_delta_px(delta: f32, delta_mode: u32, inner_height: f32) -> f32 {
    match delta_mode {
        WHEEL_DELTA_LINE => delta * WHEEL_LINE_PX,
        WHEEL_DELTA_PAGE => delta * inner_height.max(0.0),
        _ => delta,
    }
}

/// Frame-rate independent exponential approach of `current` toward `target`.
#[inline]
pub fn damp(current: f32, target: f32, lambda: f32, dt_sec: f32) -> f32 {
    let t = 1.0 - (-lambda * dt_sec.max(0.0)).exp();
    current + (target - current) * t
}

/// Smoothed document scroll offset.
///
/// Wheel input moves a clamped `target`; every frame the committed offset
/// approaches it and snaps once close enough. The committed offset is what the
/// host writes back to the document, so a native scroll that lands elsewhere
/// (keyboard, scrollbar, touch) is user input: it cancels the ease and is
/// adopted as is.
#[derive(Clone, Debug)]
pub struct SmoothScroll {
    config: ScrollConfig,
    target: f32,
    animated: f32,
    limit: f32,
    animating: bool,
}

impl SmoothScroll {
    pub fn new(config: ScrollConfig, initial: f32, limit: f32) -> Self {
        let start = if initial.is_finite() { initial.max(0.0) } else { 0.0 };
        let limit = limit.max(start);
        Self {
            config,
            target: start,
            animated: start,
            limit,
            animating: false,
        }
    }

    /// Current committed offset in CSS pixels.
    #[inline]
    pub fn offset(&self) -> f32 {
        self.animated
    }

    #[inline]
    pub fn target(&self) -> f32 {
        self.target
    }

    #[inline]
    pub fn limit(&self) -> f32 {
        self.limit
    }

    #[inline]
    pub fn is_animating(&self) -> bool {
        self.animating
    }

    pub fn scroll_by(&mut self, delta_px: f32) {
        if !delta_px.is_finite() || delta_px == 0.0 {
            return;
        }
        let next = (self.target + delta_px * self.config.wheel_multiplier).clamp(0.0, self.limit);
        if next != self.target {
            self.target = next;
            self.animating = true;
        }
    }

    /// Advance by one frame. Returns the new offset when it changed.
    pub fn advance(&mut self, dt_sec: f32) -> Option<f32> {
        if !self.animating {
            return None;
        }
        let lambda = self.config.lerp * 60.0;
        let mut next = damp(self.animated, self.target, lambda, dt_sec);
        if (self.target - next).abs() < self.config.snap_px {
            next = self.target;
            self.animating = false;
        }
        if next == self.animated {
            return None;
        }
        self.animated = next;
        Some(next)
    }

    /// Adopt a scroll position that happened outside the smoother.
    ///
    /// The document is ground truth: the offset is taken unclamped and the
    /// limit grows to include it.
    pub fn sync(&mut self, native_offset: f32) {
        if !native_offset.is_finite() {
            return;
        }
        let y = native_offset.max(0.0);
        if self.animating && (y - self.animated).abs() <= self.config.echo_px {
            return;
        }
        self.limit = self.limit.max(y);
        self.target = y;
        self.animated = y;
        self.animating = false;
    }

    /// Recompute bounds after the document or window changed size.
    pub fn resize(&mut self, limit: f32) {
        self.limit = limit.max(0.0);
        self.target = self.target.clamp(0.0, self.limit);
        self.animated = self.animated.clamp(0.0, self.limit);
        if self.animated == self.target {
            self.animating = false;
        }
    }
}
