//! Visualization system tying the signal pipeline together.
//!
//! Owns the converter, animator, and geometry builder plus the current
//! settings, and exposes the two external call sites: `process_frame` at
//! audio cadence and `update` at render cadence. Callers must not overlap
//! the two for the same instance; the binary drives both from one thread.

use crate::animation::{HeightAnimator, RotationState};
use crate::geometry::{BarGeometryBuilder, MeshBuffers};
use crate::params::{SettingsUpdate, VizSettings};
use crate::spectrum::PowerConverter;

/// The signal-to-geometry pipeline with its animation state.
pub struct VizSystem {
    converter: PowerConverter,
    animator: HeightAnimator,
    builder: BarGeometryBuilder,
    rotation: RotationState,
    settings: VizSettings,
}

impl VizSystem {
    pub fn new(settings: VizSettings) -> Self {
        Self {
            converter: PowerConverter::new(),
            animator: HeightAnimator::new(),
            builder: BarGeometryBuilder::new(),
            rotation: RotationState::new(),
            settings,
        }
    }

    /// Stream-start lifecycle hook: resets all history and animation
    /// state. The stream format is accepted for interface completeness;
    /// the pipeline consumes pre-computed magnitudes and does not depend
    /// on it.
    pub fn start(&mut self, _channels: u16, _sample_rate: u32, _bits_per_sample: u16) {
        self.converter.reset();
        self.animator.reset();
        self.rotation = RotationState::new();
    }

    pub fn settings(&self) -> &VizSettings {
        &self.settings
    }

    /// Route one settings change to the value it controls. Plain scalar
    /// writes, read at the start of the next tick.
    pub fn apply(&mut self, update: SettingsUpdate) {
        match update {
            SettingsUpdate::HeightScale(scale) => self.settings.height_scale = scale,
            SettingsUpdate::AnimationSpeed(speed) => self.settings.animation_speed = speed,
            SettingsUpdate::RenderMode(mode) => self.settings.render_mode = mode,
            SettingsUpdate::PointSize(size) => self.settings.point_size = size,
            SettingsUpdate::FixedYAngle(angle) => self.settings.fixed_y_angle = angle,
        }
    }

    /// Audio-cadence call site: fold one magnitude frame into the target
    /// height grid.
    pub fn process_frame(&mut self, magnitudes: &[f32]) {
        self.converter
            .process_frame(magnitudes, self.settings.height_scale.factor());
    }

    /// Render-cadence call site: smooth heights, advance rotation, and
    /// rebuild the mesh. Returns the buffers to upload.
    pub fn update(&mut self) -> &MeshBuffers {
        self.animator.tick(
            self.converter.targets(),
            self.settings.animation_speed.rate(),
        );
        self.rotation.advance(self.settings.fixed_y_angle);
        self.builder
            .build(self.animator.displayed(), self.settings.render_mode)
    }

    pub fn rotation(&self) -> &RotationState {
        &self.rotation
    }
}
