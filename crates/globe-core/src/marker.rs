use glam::{Mat4, Quat, Vec3};

use crate::config::MarkerStyle;
use crate::error::RecordError;
use crate::feed::{check_metric, format_population, MarkerRecord};
use crate::geo::{project, GeoCoordinate};
use crate::tween::Tween;

/// Box extents of a marker before any pulse is applied.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct MarkerDimensions {
    pub width: f32,
    pub height: f32,
    /// Extent along the outward normal.
    pub depth: f32,
}

/// One country bar standing on the globe.
///
/// Pose fields are fixed at build time. Per frame only `current_opacity`
/// (highlight) and `depth_scale` (pulse) change.
#[derive(Clone, Debug)]
pub struct Marker {
    pub coordinate: GeoCoordinate,
    pub label: String,
    pub metric: f64,
    /// Preformatted metric for the tooltip.
    pub metric_display: String,
    /// Base of the bar on the sphere surface, in group space.
    pub position: Vec3,
    /// Unit vector pointing away from the sphere centre.
    pub forward: Vec3,
    pub orientation: Quat,
    pub dimensions: MarkerDimensions,
    pub color: [f32; 3],
    pub base_opacity: f32,
    pub highlight_opacity: f32,
    pub current_opacity: f32,
    /// Start delay of the pulse, in seconds.
    pub pulse_phase_offset: f32,
    pub pulse: Option<Tween>,
    pub depth_scale: f32,
    pub hit_testable: bool,
}

impl Marker {
    /// Unit-cube-to-group transform.
    ///
    /// The cube is centred on its origin; it is shifted half a depth along
    /// local +Z so its base sits on the surface, then scaled, so pulsing only
    /// grows the bar outward.
    pub fn local_matrix(&self) -> Mat4 {
        let d = self.dimensions;
        Mat4::from_scale_rotation_translation(
            Vec3::new(d.width, d.height, d.depth * self.depth_scale),
            self.orientation,
            self.position,
        ) * Mat4::from_translation(Vec3::new(0.0, 0.0, 0.5))
    }

    /// Unit-cube-to-world transform under the current group rotation.
    #[inline]
    pub fn model_matrix(&self, group: Quat) -> Mat4 {
        Mat4::from_quat(group) * self.local_matrix()
    }

    /// Centre of the bar in group space.
    #[inline]
    pub fn center(&self) -> Vec3 {
        self.position + self.forward * (0.5 * self.dimensions.depth * self.depth_scale)
    }

    #[inline]
    pub fn is_highlighted(&self) -> bool {
        self.current_opacity == self.highlight_opacity
    }
}

/// Builds markers on a sphere of fixed radius with one shared style.
#[derive(Clone, Debug)]
pub struct MarkerFactory {
    pub radius: f32,
    pub style: MarkerStyle,
}

impl MarkerFactory {
    pub fn new(radius: f32, style: MarkerStyle) -> Self {
        Self { radius, style }
    }

    /// Box size for a metric: width/height and depth grow linearly with
    /// `metric / population_normalization`, each with a floor.
    pub fn dimensions_for(&self, metric: f64) -> MarkerDimensions {
        let s = &self.style;
        let scale = (metric / s.population_normalization) as f32;
        let side = (s.width_per_scale * scale).max(s.min_width);
        MarkerDimensions {
            width: side,
            height: side,
            depth: (s.depth_per_scale * scale).max(s.min_depth),
        }
    }

    /// Build a marker; `index` is only used to label a rejection.
    pub fn build(&self, record: &MarkerRecord, index: usize) -> Result<Marker, RecordError> {
        let metric = check_metric(record.metric, index, &record.label)?;
        let c = record.coordinate;
        let projection = project(c.latitude, c.longitude, self.radius);
        let s = &self.style;
        Ok(Marker {
            coordinate: c,
            label: record.label.clone(),
            metric,
            metric_display: format_population(metric),
            position: projection.position,
            forward: projection.outward(),
            orientation: projection.orientation(),
            dimensions: self.dimensions_for(metric),
            color: s.color,
            base_opacity: s.base_opacity,
            highlight_opacity: s.highlight_opacity,
            current_opacity: s.base_opacity,
            pulse_phase_offset: 0.0,
            pulse: None,
            depth_scale: 1.0,
            hit_testable: true,
        })
    }
}
