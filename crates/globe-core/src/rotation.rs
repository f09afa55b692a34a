use std::f32::consts::TAU;

use glam::{Quat, Vec2};

use crate::config::RotationMode;
use crate::pointer::PointerState;
use crate::tween::Ease;

/// Pitch (about X) and yaw (about Y) of the marker group, in radians.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct GroupRotation {
    pub pitch: f32,
    pub yaw: f32,
}

impl GroupRotation {
    /// Pitch applied after yaw, matching an XYZ Euler order.
    #[inline]
    pub fn quat(&self) -> Quat {
        Quat::from_rotation_x(self.pitch) * Quat::from_rotation_y(self.yaw)
    }

    #[inline]
    fn as_vec2(&self) -> Vec2 {
        Vec2::new(self.pitch, self.yaw)
    }
}

/// An in-flight ease from `from` to `to`.
#[derive(Clone, Copy, Debug)]
struct Approach {
    from: Vec2,
    to: Vec2,
    elapsed: f32,
}

/// Advances the group rotation once per frame.
pub struct RotationController {
    mode: RotationMode,
    current: GroupRotation,
    approach: Option<Approach>,
}

impl RotationController {
    pub fn new(mode: RotationMode) -> Self {
        Self {
            mode,
            current: GroupRotation::default(),
            approach: None,
        }
    }

    pub fn mode(&self) -> RotationMode {
        self.mode
    }

    #[inline]
    pub fn current(&self) -> GroupRotation {
        self.current
    }

    /// Target `(pitch, yaw)` for a pointer; `None` for a degenerate pointer.
    pub fn pointer_target(pointer: &PointerState, max_tilt: f32) -> Option<Vec2> {
        pointer
            .is_valid()
            .then(|| Vec2::new(-pointer.y * max_tilt, pointer.x * max_tilt))
    }

    pub fn advance(&mut self, dt_sec: f32, pointer: &PointerState) -> GroupRotation {
        match self.mode {
            RotationMode::Autonomous { yaw_per_frame } => {
                self.current.yaw = (self.current.yaw + yaw_per_frame).rem_euclid(TAU);
            }
            RotationMode::PointerDriven {
                max_tilt,
                duration_sec,
            } => {
                if let Some(target) = Self::pointer_target(pointer, max_tilt) {
                    self.retarget(target);
                }
                self.step_approach(dt_sec.max(0.0), duration_sec);
            }
        }
        self.current
    }

    fn retarget(&mut self, target: Vec2) {
        let unchanged = self.approach.map_or(false, |a| a.to == target)
            || (self.approach.is_none() && self.current.as_vec2() == target);
        if !unchanged {
            self.approach = Some(Approach {
                from: self.current.as_vec2(),
                to: target,
                elapsed: 0.0,
            });
        }
    }

    fn step_approach(&mut self, dt_sec: f32, duration_sec: f32) {
        let Some(mut a) = self.approach else {
            return;
        };
        a.elapsed += dt_sec;
        let t = if duration_sec > 0.0 {
            a.elapsed / duration_sec
        } else {
            1.0
        };
        let v = a.from.lerp(a.to, Ease::QuadOut.apply(t));
        self.current = GroupRotation {
            pitch: v.x,
            yaw: v.y,
        };
        self.approach = (t < 1.0).then_some(a);
    }
}
