//! Temporal smoothing of bar heights and grid rotation state.
//!
//! Displayed heights converge toward target heights at a constant rate per
//! render tick (not exponentially), giving predictable linear rise/fall
//! motion independent of how far a bar has to travel.

use glam::{Mat4, Vec3};

use crate::params::NUM_BANDS;
use crate::spectrum::HeightGrid;

/// Advances the displayed height grid toward the target grid, bounded by
/// the animation speed per tick.
pub struct HeightAnimator {
    displayed: HeightGrid,
}

impl HeightAnimator {
    pub fn new() -> Self {
        Self {
            displayed: HeightGrid::new(),
        }
    }

    /// Heights actually used for rendering.
    pub fn displayed(&self) -> &HeightGrid {
        &self.displayed
    }

    /// Reset to a flat grid (stream start).
    pub fn reset(&mut self) {
        self.displayed.reset();
    }

    /// Advance every displayed cell one step toward `target`.
    ///
    /// A cell further than `speed` from its target moves by exactly
    /// `speed`; otherwise it snaps to the target. `speed == 0` disables
    /// smoothing and snaps the whole grid each tick.
    pub fn tick(&mut self, target: &HeightGrid, speed: f32) {
        for row in 0..NUM_BANDS {
            for col in 0..NUM_BANDS {
                let current = self.displayed.get(row, col);
                let wanted = target.get(row, col);

                let next = if speed > 0.0 && (current - wanted).abs() > speed {
                    if current < wanted {
                        current + speed
                    } else {
                        current - speed
                    }
                } else {
                    wanted
                };

                self.displayed.set(row, col, next);
            }
        }
    }
}

impl Default for HeightAnimator {
    fn default() -> Self {
        Self::new()
    }
}

/// Rotation angles of the bar grid and their per-tick increments.
///
/// Reset to fixed initial values on stream start, advanced every render
/// tick, with an optional user-locked y angle.
#[derive(Debug, Clone, Copy)]
pub struct RotationState {
    pub x_angle: f32,
    pub y_angle: f32,
    pub z_angle: f32,
    x_speed: f32,
    y_speed: f32,
    z_speed: f32,
}

impl RotationState {
    pub fn new() -> Self {
        Self {
            x_angle: 20.0,
            y_angle: 45.0,
            z_angle: 0.0,
            x_speed: 0.0,
            y_speed: 0.5,
            z_speed: 0.0,
        }
    }

    /// Advance all angles one tick, wrapping at 360 degrees. A
    /// non-negative `fixed_y_angle` locks the y angle instead of spinning.
    pub fn advance(&mut self, fixed_y_angle: f32) {
        self.x_angle = (self.x_angle + self.x_speed) % 360.0;

        if fixed_y_angle < 0.0 {
            self.y_angle = (self.y_angle + self.y_speed) % 360.0;
        } else {
            self.y_angle = fixed_y_angle;
        }

        self.z_angle = (self.z_angle + self.z_speed) % 360.0;
    }

    /// Model matrix placing the grid in front of the camera: translate,
    /// then rotate X, Y, Z in that order.
    pub fn model_matrix(&self) -> Mat4 {
        Mat4::from_translation(Vec3::new(0.0, -0.5, -5.0))
            * Mat4::from_rotation_x(self.x_angle.to_radians())
            * Mat4::from_rotation_y(self.y_angle.to_radians())
            * Mat4::from_rotation_z(self.z_angle.to_radians())
    }
}

impl Default for RotationState {
    fn default() -> Self {
        Self::new()
    }
}
