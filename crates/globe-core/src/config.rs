//! Scene tuning in one place.
//!
//! Defaults reproduce the deployed globe; any subset can be overridden from
//! JSON since every struct is `#[serde(default)]`. All markers in one scene
//! share a single `MarkerStyle`, which keeps their sizes comparable.

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

// Globe layout
pub const GLOBE_RADIUS: f32 = 5.0;
pub const ATMOSPHERE_SCALE: f32 = 1.1; // atmosphere shell relative to the globe

// Marker sizing: scale = population / POPULATION_NORMALIZATION
pub const POPULATION_NORMALIZATION: f64 = 1_000_000_000.0;
pub const MARKER_WIDTH_PER_SCALE: f32 = 0.2;
pub const MARKER_MIN_WIDTH: f32 = 0.1;
pub const MARKER_DEPTH_PER_SCALE: f32 = 0.8;
pub const MARKER_MIN_DEPTH: f32 = 0.2;

// Marker opacity
pub const MARKER_BASE_OPACITY: f32 = 0.4; // dimmed, not hovered
pub const MARKER_HIGHLIGHT_OPACITY: f32 = 1.0;
pub const MARKER_COLOR: [f32; 3] = [0.231, 0.969, 1.0]; // #3bf7ff

// Pulse
pub const PULSE_TARGET_DEPTH_SCALE: f32 = 1.4;
pub const PULSE_DURATION_SEC: f32 = 2.0;
pub const PULSE_MAX_DELAY_SEC: f32 = 1.0;

// Rotation
pub const AUTONOMOUS_YAW_PER_FRAME: f32 = 0.002; // radians
pub const POINTER_MAX_TILT: f32 = 1.8; // radians at the viewport edge
pub const POINTER_EASE_DURATION_SEC: f32 = 2.0;

// Camera
pub const CAMERA_FOVY_DEG: f32 = 75.0;
pub const CAMERA_EYE: [f32; 3] = [0.0, 1.0, 15.0];
// Level with the eye so the view direction is straight down -Z.
pub const CAMERA_TARGET: [f32; 3] = [0.0, 1.0, 0.0];
pub const CAMERA_ZNEAR: f32 = 0.1;
pub const CAMERA_ZFAR: f32 = 1000.0;

// Starfield
pub const STAR_COUNT: usize = 10_000;
pub const STAR_SPREAD: f32 = 2000.0;

/// Top-level globe configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct GlobeConfig {
    pub globe_radius: f32,
    pub atmosphere_scale: f32,
    pub camera: CameraConfig,
    pub marker: MarkerStyle,
    pub pulse: PulseConfig,
    pub rotation: RotationMode,
    pub stars: StarConfig,
}

impl Default for GlobeConfig {
    fn default() -> Self {
        Self {
            globe_radius: GLOBE_RADIUS,
            atmosphere_scale: ATMOSPHERE_SCALE,
            camera: CameraConfig::default(),
            marker: MarkerStyle::default(),
            pulse: PulseConfig::default(),
            rotation: RotationMode::default(),
            stars: StarConfig::default(),
        }
    }
}

impl GlobeConfig {
    /// Parse a (possibly partial) JSON override on top of the defaults.
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        serde_json::from_str(json).map_err(ConfigError::ParseConfig)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct CameraConfig {
    pub fovy_degrees: f32,
    pub eye: [f32; 3],
    pub target: [f32; 3],
    pub znear: f32,
    pub zfar: f32,
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            fovy_degrees: CAMERA_FOVY_DEG,
            eye: CAMERA_EYE,
            target: CAMERA_TARGET,
            znear: CAMERA_ZNEAR,
            zfar: CAMERA_ZFAR,
        }
    }
}

/// How population maps to marker box dimensions and opacity.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct MarkerStyle {
    /// Population that maps to a scale of 1.0.
    pub population_normalization: f64,
    pub width_per_scale: f32,
    pub min_width: f32,
    pub depth_per_scale: f32,
    pub min_depth: f32,
    pub base_opacity: f32,
    pub highlight_opacity: f32,
    pub color: [f32; 3],
}

impl Default for MarkerStyle {
    fn default() -> Self {
        Self {
            population_normalization: POPULATION_NORMALIZATION,
            width_per_scale: MARKER_WIDTH_PER_SCALE,
            min_width: MARKER_MIN_WIDTH,
            depth_per_scale: MARKER_DEPTH_PER_SCALE,
            min_depth: MARKER_MIN_DEPTH,
            base_opacity: MARKER_BASE_OPACITY,
            highlight_opacity: MARKER_HIGHLIGHT_OPACITY,
            color: MARKER_COLOR,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct PulseConfig {
    pub target_depth_scale: f32,
    pub duration_sec: f32,
    /// Start delays are drawn uniformly from `[0, max_delay_sec)`.
    pub max_delay_sec: f32,
    /// Seed for the start-delay generator so a scene replays identically.
    pub seed: u64,
}

impl Default for PulseConfig {
    fn default() -> Self {
        Self {
            target_depth_scale: PULSE_TARGET_DEPTH_SCALE,
            duration_sec: PULSE_DURATION_SEC,
            max_delay_sec: PULSE_MAX_DELAY_SEC,
            seed: 42,
        }
    }
}

/// Which of the two rotation behaviors drives the marker group.
///
/// Both write the same group transform, so exactly one is active per scene.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum RotationMode {
    /// Constant yaw increment every frame.
    Autonomous { yaw_per_frame: f32 },
    /// Ease toward a pitch/yaw target derived from the pointer.
    PointerDriven { max_tilt: f32, duration_sec: f32 },
}

impl Default for RotationMode {
    fn default() -> Self {
        Self::Autonomous {
            yaw_per_frame: AUTONOMOUS_YAW_PER_FRAME,
        }
    }
}

impl RotationMode {
    pub fn pointer_driven() -> Self {
        Self::PointerDriven {
            max_tilt: POINTER_MAX_TILT,
            duration_sec: POINTER_EASE_DURATION_SEC,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct StarConfig {
    pub count: usize,
    pub spread: f32,
    pub seed: u64,
}

impl Default for StarConfig {
    fn default() -> Self {
        Self {
            count: STAR_COUNT,
            spread: STAR_SPREAD,
            seed: 7,
        }
    }
}
