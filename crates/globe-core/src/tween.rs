//! Time-sampled tweens.
//!
//! A tween is a small value record: given the elapsed scene time it returns
//! the animated value, so nothing needs to be scheduled or called back.

#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum Ease {
    #[default]
    Linear,
    /// Quadratic ease-out: fast start, gentle arrival.
    QuadOut,
}

impl Ease {
    #[inline]
    pub fn apply(self, t: f32) -> f32 {
        let t = t.clamp(0.0, 1.0);
        match self {
            Ease::Linear => t,
            Ease::QuadOut => 1.0 - (1.0 - t) * (1.0 - t),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Repeat {
    Once,
    Forever,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Tween {
    pub from: f32,
    pub to: f32,
    pub duration: f32,
    pub delay: f32,
    pub repeat: Repeat,
    /// Play every other cycle backwards.
    pub yoyo: bool,
    pub ease: Ease,
}

impl Tween {
    pub fn new(from: f32, to: f32, duration: f32) -> Self {
        Self {
            from,
            to,
            duration,
            delay: 0.0,
            repeat: Repeat::Once,
            yoyo: false,
            ease: Ease::Linear,
        }
    }

    pub fn with_delay(mut self, delay: f32) -> Self {
        self.delay = delay.max(0.0);
        self
    }

    pub fn with_ease(mut self, ease: Ease) -> Self {
        self.ease = ease;
        self
    }

    /// Repeat forever, reversing direction every cycle.
    pub fn yoyo_forever(mut self) -> Self {
        self.repeat = Repeat::Forever;
        self.yoyo = true;
        self
    }

    /// Normalized progress in `[0, 1]` after easing, before mapping to values.
    pub fn progress(&self, elapsed: f32) -> f32 {
        let local = elapsed - self.delay;
        if !local.is_finite() || local <= 0.0 {
            return self.ease.apply(0.0);
        }
        if self.duration <= 0.0 {
            return 1.0;
        }
        let cycles = local / self.duration;
        let raw = match self.repeat {
            Repeat::Once => cycles.min(1.0),
            Repeat::Forever => {
                let cycle = cycles.floor();
                let frac = cycles - cycle;
                if self.yoyo && (cycle as u64) % 2 == 1 {
                    1.0 - frac
                } else {
                    frac
                }
            }
        };
        self.ease.apply(raw)
    }

    #[inline]
    pub fn sample(&self, elapsed: f32) -> f32 {
        self.from + (self.to - self.from) * self.progress(elapsed)
    }

    /// Whether a `Repeat::Once` tween has reached its end.
    pub fn is_finished(&self, elapsed: f32) -> bool {
        self.repeat == Repeat::Once && elapsed - self.delay >= self.duration
    }
}
