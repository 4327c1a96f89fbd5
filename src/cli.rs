//! Command-line argument parsing.

use clap::Parser;

use crate::params::{AnimationSpeed, HeightScale, RenderMode, VizSettings};

/// Command line arguments
#[derive(Parser, Debug)]
#[command(name = "Barwave")]
#[command(about = "Audio-reactive 3-D spectrum bar grid", long_about = None)]
pub struct Args {
    /// Render mode: solid (default), wireframe, points
    #[arg(long, value_name = "MODE", default_value = "solid")]
    pub mode: String,

    /// Bar height level: 0=small, 1=standard, 2=big, 3=real-big, 4=tiny
    #[arg(long, value_name = "LEVEL", default_value = "1")]
    pub bar_height: u32,

    /// Animation speed level: 0=slowest .. 3=fast, 4=disabled
    #[arg(long, value_name = "LEVEL", default_value = "2")]
    pub speed: u32,

    /// Point size in pixels (points mode)
    #[arg(long, value_name = "PIXELS", default_value = "2")]
    pub point_size: f32,

    /// Lock the y rotation to this angle in degrees (negative = free spin)
    #[arg(long, value_name = "DEGREES", default_value = "-1", allow_hyphen_values = true)]
    pub rotation_angle: f32,

    /// Perlin seed for the synthetic spectrum
    #[arg(long, value_name = "SEED", default_value = "42")]
    pub seed: u32,
}

impl Args {
    /// Parse render mode from command-line arguments
    pub fn parse_render_mode(&self) -> RenderMode {
        match self.mode.to_lowercase().as_str() {
            "solid" => RenderMode::Solid,
            "wireframe" => RenderMode::Wireframe,
            "points" => RenderMode::Points,
            other => {
                eprintln!("Warning: Unknown render mode '{}', using solid", other);
                RenderMode::Solid
            }
        }
    }

    /// Build the full settings surface from the parsed arguments
    pub fn viz_settings(&self) -> VizSettings {
        let mode = self.parse_render_mode();
        VizSettings {
            height_scale: HeightScale::from_level(self.bar_height),
            animation_speed: AnimationSpeed::from_level(self.speed),
            render_mode: mode,
            // Point size only applies in points mode, like the host knob.
            point_size: if mode == RenderMode::Points {
                self.point_size
            } else {
                0.0
            },
            fixed_y_angle: self.rotation_angle,
        }
    }
}
