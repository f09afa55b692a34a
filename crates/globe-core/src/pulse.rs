use rand::prelude::*;

use crate::config::PulseConfig;
use crate::marker::Marker;
use crate::registry::MarkerRegistry;
use crate::tween::{Ease, Tween};

/// Hands every marker a perpetual depth oscillation with a random start delay.
///
/// Pulses only touch `depth_scale`; highlight only touches opacity, so the two
/// never contend for the same field.
pub struct PulseAnimator {
    config: PulseConfig,
    rng: StdRng,
}

impl PulseAnimator {
    pub fn new(config: PulseConfig) -> Self {
        let rng = StdRng::seed_from_u64(config.seed);
        Self { config, rng }
    }

    pub fn attach(&mut self, marker: &mut Marker) {
        let max_delay = self.config.max_delay_sec.max(0.0);
        let delay = if max_delay > 0.0 {
            self.rng.gen_range(0.0..max_delay)
        } else {
            0.0
        };
        marker.pulse_phase_offset = delay;
        marker.pulse = Some(
            Tween::new(1.0, self.config.target_depth_scale, self.config.duration_sec)
                .with_delay(delay)
                .with_ease(Ease::Linear)
                .yoyo_forever(),
        );
    }

    pub fn attach_all(&mut self, registry: &mut MarkerRegistry) {
        for marker in registry.iter_mut() {
            self.attach(marker);
        }
    }
}

/// Set every marker's depth scale from its pulse at `elapsed_sec`.
pub fn advance_pulses(registry: &mut MarkerRegistry, elapsed_sec: f32) {
    for marker in registry.iter_mut() {
        if let Some(pulse) = &marker.pulse {
            marker.depth_scale = pulse.sample(elapsed_sec);
        }
    }
}
