//! Parameter definitions with documented ranges and semantics.
//!
//! The discrete setting levels (height scale, animation speed, render mode)
//! mirror the knobs a media-center host would expose; out-of-range level
//! indices fall back to the documented default instead of failing.

/// Number of frequency bands, and also the depth of the time-history grid
/// (one row per past audio frame).
pub const NUM_BANDS: usize = 16;

/// Nominal length of an incoming frequency-magnitude frame
/// (dual-channel-merged 256-bin spectrum).
pub const NUM_FREQ_BINS: usize = 256;

/// Vertices emitted per bar: 6 quads * 2 triangles * 3 vertices.
pub const VERTICES_PER_BAR: usize = 36;

/// Bar height scale multiplier, five discrete levels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum HeightScale {
    /// 0.5x (default)
    #[default]
    Small,
    /// 1.0x
    Standard,
    /// 2.0x
    Big,
    /// 3.0x
    RealBig,
    /// 0.33x
    Tiny,
}

impl HeightScale {
    /// Map a host setting index to a level. Unknown indices fall back to
    /// `Small`.
    pub fn from_level(level: u32) -> Self {
        match level {
            1 => Self::Standard,
            2 => Self::Big,
            3 => Self::RealBig,
            4 => Self::Tiny,
            _ => Self::Small,
        }
    }

    /// Multiplier applied to every computed bar height. Values above 1.0
    /// intentionally let bars exceed the nominal unit height.
    pub fn factor(self) -> f32 {
        match self {
            Self::Small => 0.5,
            Self::Standard => 1.0,
            Self::Big => 2.0,
            Self::RealBig => 3.0,
            Self::Tiny => 0.33,
        }
    }
}

/// Animation speed, five discrete levels. The rate is the maximum height
/// change per render tick; `Disabled` snaps displayed heights to target
/// every tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AnimationSpeed {
    /// 0.0125 per tick (default)
    #[default]
    Slowest,
    /// 0.025 per tick
    Slow,
    /// 0.05 per tick
    Medium,
    /// 0.1 per tick
    Fast,
    /// No smoothing, instant snap
    Disabled,
}

impl AnimationSpeed {
    /// Map a host setting index to a level. Unknown indices fall back to
    /// `Slowest`.
    pub fn from_level(level: u32) -> Self {
        match level {
            1 => Self::Slow,
            2 => Self::Medium,
            3 => Self::Fast,
            4 => Self::Disabled,
            _ => Self::Slowest,
        }
    }

    /// Maximum per-tick height change (0.0 disables smoothing).
    pub fn rate(self) -> f32 {
        match self {
            Self::Slowest => 0.0125,
            Self::Slow => 0.025,
            Self::Medium => 0.05,
            Self::Fast => 0.1,
            Self::Disabled => 0.0,
        }
    }
}

/// Primitive interpretation of the bar mesh. All modes share the same
/// vertex stream; only the pipeline topology (and side-face shading)
/// differs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RenderMode {
    /// Filled triangles with fixed side-face shading
    #[default]
    Solid,
    /// Line topology reusing the triangle vertex stream
    Wireframe,
    /// Point cloud reusing the triangle vertex stream
    Points,
}

/// Current visualization settings, read at the start of each tick.
#[derive(Debug, Clone, Copy)]
pub struct VizSettings {
    pub height_scale: HeightScale,
    pub animation_speed: AnimationSpeed,
    pub render_mode: RenderMode,

    /// Point size in pixels, only meaningful in `Points` mode.
    pub point_size: f32,

    /// Fixed y rotation angle in degrees. Negative means free spin.
    pub fixed_y_angle: f32,
}

impl Default for VizSettings {
    fn default() -> Self {
        Self {
            height_scale: HeightScale::default(),
            animation_speed: AnimationSpeed::default(),
            render_mode: RenderMode::default(),
            point_size: 0.0,
            fixed_y_angle: -1.0,
        }
    }
}

/// A single settings change, routed to the component that owns the value.
#[derive(Debug, Clone, Copy)]
pub enum SettingsUpdate {
    HeightScale(HeightScale),
    AnimationSpeed(AnimationSpeed),
    RenderMode(RenderMode),
    PointSize(f32),
    FixedYAngle(f32),
}

/// Rendering configuration
#[derive(Debug, Clone)]
pub struct RenderConfig {
    /// Window width (pixels)
    pub window_width: u32,

    /// Window height (pixels)
    pub window_height: u32,

    /// Field of view (degrees). 67 degrees at aspect 1.0 matches the
    /// classic frustum(-1, 1, -1, 1, 1.5, 10) view of the bar grid.
    pub fov_degrees: f32,

    /// Near clipping plane
    pub near_plane: f32,

    /// Far clipping plane (the grid sits 5 units from the camera)
    pub far_plane: f32,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            window_width: 960,
            window_height: 960,
            fov_degrees: 67.0,
            near_plane: 1.5,
            far_plane: 10.0,
        }
    }
}

impl RenderConfig {
    pub fn aspect_ratio(&self) -> f32 {
        self.window_width as f32 / self.window_height as f32
    }
}

/// Procedural spectrum source configuration
#[derive(Debug, Clone)]
pub struct SourceConfig {
    /// Nominal audio sample rate (Hz), sets the frame cadence
    pub sample_rate_hz: u32,

    /// Samples represented by one magnitude frame
    pub frame_size: usize,

    /// Perlin noise seed (deterministic output for a given seed)
    pub noise_seed: u32,

    /// Beats per minute of the synthetic pulse
    pub beat_bpm: f32,
}

impl Default for SourceConfig {
    fn default() -> Self {
        Self {
            sample_rate_hz: 44100,
            frame_size: 1024,
            noise_seed: 42,
            beat_bpm: 120.0,
        }
    }
}

impl SourceConfig {
    /// Seconds between magnitude frames.
    pub fn frame_interval_s(&self) -> f32 {
        self.frame_size as f32 / self.sample_rate_hz as f32
    }
}
