//! Latitude/longitude to sphere-surface poses.

use glam::{Mat3, Quat, Vec3};

/// Geographic coordinate in degrees.
///
/// Values outside `[-90, 90]` / `[-180, 180]` are not rejected; they simply
/// land somewhere else on (or off) the expected sphere.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct GeoCoordinate {
    pub latitude: f32,
    pub longitude: f32,
}

impl GeoCoordinate {
    pub fn new(latitude: f32, longitude: f32) -> Self {
        Self {
            latitude,
            longitude,
        }
    }
}

/// Result of projecting a coordinate onto a sphere centred on the origin.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Projection {
    pub position: Vec3,
    /// Point the marker's principal axis is aimed at; always the sphere centre.
    pub look_target: Vec3,
}

impl Projection {
    /// Unit normal pointing away from the sphere centre (zero at the centre).
    #[inline]
    pub fn outward(&self) -> Vec3 {
        (self.position - self.look_target).normalize_or_zero()
    }

    /// Rotation that aims the local -Z axis at `look_target`.
    #[inline]
    pub fn orientation(&self) -> Quat {
        look_at_origin(self.position - self.look_target)
    }
}

/// Project `(lat, lng)` in degrees onto a sphere of `radius`.
///
/// `(0, 0)` maps to +Z, `(0, 90)` to +X and `(90, _)` to +Y.
#[inline]
pub fn project(lat_deg: f32, lng_deg: f32, radius: f32) -> Projection {
    let phi = lat_deg.to_radians();
    let lambda = lng_deg.to_radians();
    let position = Vec3::new(
        radius * phi.cos() * lambda.sin(),
        radius * phi.sin(),
        radius * phi.cos() * lambda.cos(),
    );
    Projection {
        position,
        look_target: Vec3::ZERO,
    }
}

/// Orientation for an object at `position` whose -Z axis faces the origin.
///
/// Local +Z becomes the outward surface normal, so geometry extruded along +Z
/// grows away from the sphere. Local +Y stays as close to world up as the
/// normal allows; at the poles world -Z is used as the reference instead.
pub fn look_at_origin(position: Vec3) -> Quat {
    let z = position.normalize_or_zero();
    if z == Vec3::ZERO {
        return Quat::IDENTITY;
    }
    let mut x = Vec3::Y.cross(z);
    if x.length_squared() < 1e-10 {
        x = Vec3::NEG_Z.cross(z);
    }
    let x = x.normalize();
    let y = z.cross(x);
    Quat::from_mat3(&Mat3::from_cols(x, y, z)).normalize()
}
