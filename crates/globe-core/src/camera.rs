//! Perspective camera and picking rays.

use glam::{Mat4, Vec2, Vec3, Vec4};

use crate::config::CameraConfig;

/// Half-line `origin + t * dir`, `t >= 0`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Ray {
    pub origin: Vec3,
    /// Unit length.
    pub dir: Vec3,
}

impl Ray {
    #[inline]
    pub fn at(&self, t: f32) -> Vec3 {
        self.origin + self.dir * t
    }
}

/// Simple right-handed camera description with perspective projection.
#[derive(Clone, Debug)]
pub struct Camera {
    pub eye: Vec3,
    pub target: Vec3,
    pub up: Vec3,
    pub aspect: f32,
    pub fovy_radians: f32,
    pub znear: f32,
    pub zfar: f32,
}

impl Camera {
    pub fn from_config(config: &CameraConfig, aspect: f32) -> Self {
        Self {
            eye: Vec3::from_array(config.eye),
            target: Vec3::from_array(config.target),
            up: Vec3::Y,
            aspect,
            fovy_radians: config.fovy_degrees.to_radians(),
            znear: config.znear,
            zfar: config.zfar,
        }
    }

    /// Compute the clip-space projection matrix.
    pub fn projection_matrix(&self) -> Mat4 {
        Mat4::perspective_rh(self.fovy_radians, self.aspect, self.znear, self.zfar)
    }

    /// Compute the view matrix that transforms world to view space.
    pub fn view_matrix(&self) -> Mat4 {
        Mat4::look_at_rh(self.eye, self.target, self.up)
    }

    pub fn view_projection(&self) -> Mat4 {
        self.projection_matrix() * self.view_matrix()
    }

    /// World-space ray from the eye through normalized device coordinates.
    ///
    /// Returns `None` when `ndc` is not finite.
    pub fn ray_from_ndc(&self, ndc: Vec2) -> Option<Ray> {
        if !ndc.is_finite() {
            return None;
        }
        let inv = self.view_projection().inverse();
        let p_far = inv * Vec4::new(ndc.x, ndc.y, 1.0, 1.0);
        let p1: Vec3 = p_far.truncate() / p_far.w;
        let dir = (p1 - self.eye).try_normalize()?;
        Some(Ray {
            origin: self.eye,
            dir,
        })
    }

    /// Project a world point to normalized device coordinates.
    pub fn project_to_ndc(&self, world: Vec3) -> Vec3 {
        self.view_projection().project_point3(world)
    }
}
