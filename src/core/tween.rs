/// Easing curves for scalar tweens. Input and output are both in \[0, 1\].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Easing {
    #[default]
    Linear,
    QuadInOut,
    CubicOut,
    ExpoOut,
}

impl Easing {
    #[inline]
    pub fn apply(self, t: f32) -> f32 {
        let t = t.clamp(0.0, 1.0);
        match self {
            Easing::Linear => t,
            Easing::QuadInOut => {
                if t < 0.5 {
                    2.0 * t * t
                } else {
                    1.0 - (-2.0 * t + 2.0).powi(2) / 2.0
                }
            }
            Easing::CubicOut => 1.0 - (1.0 - t).powi(3),
            Easing::ExpoOut => {
                if t >= 1.0 {
                    1.0
                } else {
                    1.0 - 2.0_f32.powf(-10.0 * t)
                }
            }
        }
    }
}

/// Time-driven interpolation of a single scalar.
///
/// The tween owns no clock; callers feed elapsed time through [`Tween::advance`].
/// Once `elapsed >= duration` the value is exactly `to`.
#[derive(Clone, Debug, PartialEq)]
pub struct Tween {
    from: f32,
    to: f32,
    duration: f32,
    elapsed: f32,
    easing: Easing,
}

impl Tween {
    pub fn new(from: f32, to: f32, duration_sec: f32, easing: Easing) -> Self {
        Self {
            from,
            to,
            duration: duration_sec.max(0.0),
            elapsed: 0.0,
            easing,
        }
    }

    pub fn advance(&mut self, dt_sec: f32) {
        if dt_sec.is_finite() && dt_sec > 0.0 {
            self.elapsed = (self.elapsed + dt_sec).min(self.duration);
        }
    }

    #[inline]
    pub fn is_finished(&self) -> bool {
        self.elapsed >= self.duration
    }

    pub fn value(&self) -> f32 {
        if self.is_finished() {
            return self.to;
        }
        let t = self.elapsed / self.duration;
        self.from + (self.to - self.from) * self.easing.apply(t)
    }

    #[inline]
    pub fn target(&self) -> f32 {
        self.to
    }
}

/// A scalar that is either at rest or being tweened, like a shader uniform
/// handed to an animation engine.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct AnimatedScalar {
    value: f32,
    tween: Option<Tween>,
}

impl AnimatedScalar {
    pub fn new(value: f32) -> Self {
        Self { value, tween: None }
    }

    #[inline]
    pub fn get(&self) -> f32 {
        self.value
    }

    /// Start animating from the current value toward `to`, replacing any running tween.
    pub fn animate_to(&mut self, to: f32, duration_sec: f32, easing: Easing) {
        let tween = Tween::new(self.value, to, duration_sec, easing);
        self.value = tween.value();
        self.tween = if tween.is_finished() { None } else { Some(tween) };
    }

    /// Jump to `value` immediately, cancelling any running tween.
    pub fn set(&mut self, value: f32) {
        self.tween = None;
        self.value = value;
    }

    pub fn advance(&mut self, dt_sec: f32) {
        if let Some(tween) = &mut self.tween {
            tween.advance(dt_sec);
            self.value = tween.value();
            if tween.is_finished() {
                self.tween = None;
            }
        }
    }

    #[inline]
    pub fn is_animating(&self) -> bool {
        self.tween.is_some()
    }
}
