use std::time::Duration;

use glam::Quat;

use crate::camera::Camera;
use crate::config::GlobeConfig;
use crate::error::RecordError;
use crate::feed::MarkerRecord;
use crate::marker::{Marker, MarkerFactory};
use crate::picking::{HighlightResult, PointerHitTester, TooltipFrame};
use crate::pointer::{PointerState, Viewport};
use crate::pulse::{advance_pulses, PulseAnimator};
use crate::registry::MarkerRegistry;
use crate::rotation::{GroupRotation, RotationController};

/// Read-only view of everything a renderer needs for one frame.
pub struct SceneView<'a> {
    pub camera: &'a Camera,
    pub group: GroupRotation,
    pub markers: &'a [Marker],
    pub elapsed_sec: f32,
}

impl<'a> SceneView<'a> {
    #[inline]
    pub fn group_quat(&self) -> Quat {
        self.group.quat()
    }
}

/// Draws the scene. Errors are logged by the loop and never stop it.
pub trait SceneRenderer {
    type Error: std::fmt::Debug;

    fn render(&mut self, view: &SceneView<'_>) -> Result<(), Self::Error>;
}

/// Shows (or hides) the tooltip.
pub trait TooltipSurface {
    fn present(&mut self, frame: &TooltipFrame);
}

/// Owns the per-scene state and runs one iteration per displayed frame.
pub struct FrameLoop {
    pub registry: MarkerRegistry,
    pub camera: Camera,
    viewport: Viewport,
    rotation: RotationController,
    hit_tester: PointerHitTester,
    elapsed_sec: f32,
    frames: u64,
}

impl FrameLoop {
    pub fn new(config: &GlobeConfig, registry: MarkerRegistry, viewport: Viewport) -> Self {
        Self {
            registry,
            camera: Camera::from_config(&config.camera, viewport.aspect()),
            viewport,
            rotation: RotationController::new(config.rotation),
            hit_tester: PointerHitTester::new(),
            elapsed_sec: 0.0,
            frames: 0,
        }
    }

    /// Registry built from `markers`, each with a pulse attached.
    pub fn with_markers(
        config: &GlobeConfig,
        factory: &MarkerFactory,
        markers: impl IntoIterator<Item = MarkerRecord>,
        viewport: Viewport,
    ) -> Result<Self, RecordError> {
        let mut registry = MarkerRegistry::new();
        for (i, record) in markers.into_iter().enumerate() {
            registry.insert(factory.build(&record, i)?);
        }
        PulseAnimator::new(config.pulse.clone()).attach_all(&mut registry);
        Ok(Self::new(config, registry, viewport))
    }

    pub fn resize(&mut self, viewport: Viewport) {
        self.viewport = viewport;
        self.camera.aspect = viewport.aspect();
    }

    #[inline]
    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    #[inline]
    pub fn rotation(&self) -> GroupRotation {
        self.rotation.current()
    }

    #[inline]
    pub fn elapsed_sec(&self) -> f32 {
        self.elapsed_sec
    }

    #[inline]
    pub fn frames(&self) -> u64 {
        self.frames
    }

    /// Render, rotate, pulse, hit-test against the new transform, present.
    pub fn tick<R, T>(
        &mut self,
        dt: Duration,
        pointer: &PointerState,
        renderer: &mut R,
        tooltip: &mut T,
    ) -> HighlightResult
    where
        R: SceneRenderer,
        T: TooltipSurface,
    {
        let view = SceneView {
            camera: &self.camera,
            group: self.rotation.current(),
            markers: self.registry.as_slice(),
            elapsed_sec: self.elapsed_sec,
        };
        if let Err(e) = renderer.render(&view) {
            log::error!("render error: {:?}", e);
        }

        let result = self.step(dt, pointer);
        tooltip.present(&result.tooltip_frame());
        result
    }

    /// The non-presentation part of a frame: animation then hit-testing.
    pub fn step(&mut self, dt: Duration, pointer: &PointerState) -> HighlightResult {
        let dt_sec = dt.as_secs_f32();
        self.elapsed_sec += dt_sec;
        self.frames += 1;

        let group = self.rotation.advance(dt_sec, pointer);
        advance_pulses(&mut self.registry, self.elapsed_sec);

        self.hit_tester.resolve(
            pointer,
            &self.camera,
            group.quat(),
            &mut self.registry,
            self.viewport,
        )
    }
}
