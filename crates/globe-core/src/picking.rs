//! Pointer ray against marker boxes.

use glam::{Mat4, Quat, Vec2, Vec3};

use crate::camera::{Camera, Ray};
use crate::marker::Marker;
use crate::pointer::{PointerState, Viewport};
use crate::registry::MarkerRegistry;

/// Distance along `ray` to the first point on a sphere, or 0.0 when the ray
/// starts inside it.
#[inline]
pub fn ray_sphere(ray: &Ray, center: Vec3, radius: f32) -> Option<f32> {
    let oc = ray.origin - center;
    let b = oc.dot(ray.dir);
    let c = oc.dot(oc) - radius * radius;
    let disc = b * b - c;
    if disc < 0.0 {
        return None;
    }
    let sq = disc.sqrt();
    let (t0, t1) = (-b - sq, -b + sq);
    if t1 < 0.0 {
        return None;
    }
    Some(t0.max(0.0))
}

/// Distance along `ray` to the unit cube `[-0.5, 0.5]^3` placed by `model`.
///
/// The ray is carried into cube space without renormalizing, so the returned
/// parameter is a world-space distance even when `model` scales. A ray that
/// starts inside reports where it leaves.
pub fn ray_unit_box(ray: &Ray, model: &Mat4) -> Option<f32> {
    let inv = model.inverse();
    if !inv.is_finite() {
        return None;
    }
    let o = inv.transform_point3(ray.origin);
    let d = inv.transform_vector3(ray.dir);
    let mut t_min = f32::NEG_INFINITY;
    let mut t_max = f32::INFINITY;
    for axis in 0..3 {
        let (oa, da) = (o[axis], d[axis]);
        if da.abs() < 1e-12 {
            if !(-0.5..=0.5).contains(&oa) {
                return None;
            }
            continue;
        }
        let inv_d = 1.0 / da;
        let mut t0 = (-0.5 - oa) * inv_d;
        let mut t1 = (0.5 - oa) * inv_d;
        if t0 > t1 {
            std::mem::swap(&mut t0, &mut t1);
        }
        t_min = t_min.max(t0);
        t_max = t_max.min(t1);
        if t_min > t_max {
            return None;
        }
    }
    if t_max < 0.0 {
        return None;
    }
    Some(if t_min >= 0.0 { t_min } else { t_max })
}

/// Distance to a marker's box under the group rotation `group`.
pub fn ray_marker(ray: &Ray, marker: &Marker, group: Quat) -> Option<f32> {
    let model = marker.model_matrix(group);
    let d = marker.dimensions;
    let half_diag = 0.5 * Vec3::new(d.width, d.height, d.depth * marker.depth_scale).length();
    let center = group * marker.center();
    ray_sphere(ray, center, half_diag)?;
    ray_unit_box(ray, &model)
}

/// What the tooltip should show this frame.
#[derive(Clone, Debug, PartialEq)]
pub struct Tooltip {
    pub label: String,
    pub metric: String,
    /// Pointer position in viewport pixels.
    pub screen_position: Vec2,
}

/// Per-frame outcome of hit-testing, recomputed from scratch every frame.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct HighlightResult {
    /// Registry index of the hit marker.
    pub hit: Option<usize>,
    pub distance: Option<f32>,
    pub tooltip: Option<Tooltip>,
}

impl HighlightResult {
    pub fn tooltip_frame(&self) -> TooltipFrame {
        match &self.tooltip {
            Some(t) => TooltipFrame {
                visible: true,
                screen_position: Some(t.screen_position),
                label: Some(t.label.clone()),
                metric: Some(t.metric.clone()),
            },
            None => TooltipFrame::default(),
        }
    }
}

/// Flat tuple handed to the presentation surface each frame.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct TooltipFrame {
    pub visible: bool,
    pub screen_position: Option<Vec2>,
    pub label: Option<String>,
    pub metric: Option<String>,
}

/// Maps the pointer to at most one highlighted marker.
#[derive(Clone, Copy, Debug, Default)]
pub struct PointerHitTester;

impl PointerHitTester {
    pub fn new() -> Self {
        Self
    }

    /// Nearest hit-testable marker along the pointer ray.
    ///
    /// Equal distances keep the earlier registry entry.
    pub fn pick(
        &self,
        pointer: &PointerState,
        camera: &Camera,
        group: Quat,
        registry: &MarkerRegistry,
    ) -> Option<(usize, f32)> {
        if !pointer.is_valid() {
            return None;
        }
        let ray = camera.ray_from_ndc(pointer.ndc())?;
        let mut best = None::<(usize, f32)>;
        for (i, marker) in registry.iter().enumerate() {
            if !marker.hit_testable {
                continue;
            }
            if let Some(t) = ray_marker(&ray, marker, group) {
                match best {
                    Some((_, bt)) if t >= bt => {}
                    _ => best = Some((i, t)),
                }
            }
        }
        best
    }

    /// Pick, re-apply opacities to every marker and build the tooltip.
    pub fn resolve(
        &self,
        pointer: &PointerState,
        camera: &Camera,
        group: Quat,
        registry: &mut MarkerRegistry,
        viewport: Viewport,
    ) -> HighlightResult {
        let best = self.pick(pointer, camera, group, registry);
        registry.apply_highlight(best.map(|(i, _)| i));

        let Some((i, t)) = best else {
            return HighlightResult::default();
        };
        let tooltip = registry.get(i).map(|m| Tooltip {
            label: m.label.clone(),
            metric: m.metric_display.clone(),
            screen_position: viewport.ndc_to_pixels(pointer.ndc()),
        });
        HighlightResult {
            hit: Some(i),
            distance: Some(t),
            tooltip,
        }
    }
}
