//! Barwave - an animated 3-D spectrum bar-grid visualizer
//!
//! A 16x16 grid of bars: columns are perceptually-scaled frequency bands,
//! rows scroll back through time, heights pulse with the (synthetic)
//! audio spectrum.

mod animation;
mod bands;
mod cli;
mod geometry;
mod params;
mod rendering;
mod source;
mod spectrum;
mod viz;

use std::sync::Arc;
use std::time::Instant;

use clap::Parser;
use winit::{
    application::ApplicationHandler,
    event::*,
    event_loop::EventLoop,
    keyboard::{KeyCode, PhysicalKey},
    window::{Window, WindowId},
};

use cli::Args;
use params::{RenderConfig, SettingsUpdate, SourceConfig, VizSettings};
use rendering::{RenderSystem, Uniforms};
use source::SpectrumSource;
use viz::VizSystem;

/// Longest audio backlog replayed in one redraw. After a stall (hidden
/// window, suspend) anything older is dropped instead of ground through.
const MAX_AUDIO_BACKLOG_S: f32 = 1.0;

/// Earliest pending audio-frame time still worth replaying at `now_s`.
fn clamp_audio_backlog(next_frame_s: f32, now_s: f32) -> f32 {
    if now_s - next_frame_s > MAX_AUDIO_BACKLOG_S {
        now_s - MAX_AUDIO_BACKLOG_S
    } else {
        next_frame_s
    }
}

/// Main application state
struct App {
    // Window and rendering (absent until startup succeeds; no render
    // tick runs while these are None)
    window: Option<Arc<Window>>,
    render_system: Option<RenderSystem>,

    // Signal pipeline and its stand-in audio source
    viz: VizSystem,
    source: SpectrumSource,

    // Configuration
    render_config: RenderConfig,

    // Time tracking: audio frames are consumed on their own cadence,
    // independent of the display frame rate
    start_time: Instant,
    next_audio_frame_s: f32,
}

impl App {
    fn new(wanted: VizSettings, seed: u32) -> Self {
        let source_config = SourceConfig {
            noise_seed: seed,
            ..SourceConfig::default()
        };
        let render_config = RenderConfig::default();

        // Route the CLI values through the same per-setting update
        // messages a live settings host would send.
        let mut viz = VizSystem::new(VizSettings::default());
        viz.apply(SettingsUpdate::HeightScale(wanted.height_scale));
        viz.apply(SettingsUpdate::AnimationSpeed(wanted.animation_speed));
        viz.apply(SettingsUpdate::RenderMode(wanted.render_mode));
        viz.apply(SettingsUpdate::PointSize(wanted.point_size));
        viz.apply(SettingsUpdate::FixedYAngle(wanted.fixed_y_angle));

        Self {
            window: None,
            render_system: None,
            viz,
            source: SpectrumSource::new(source_config),
            render_config,
            start_time: Instant::now(),
            next_audio_frame_s: 0.0,
        }
    }
}

impl ApplicationHandler for App {
    fn about_to_wait(&mut self, _event_loop: &winit::event_loop::ActiveEventLoop) {
        if let Some(window) = &self.window {
            window.request_redraw();
        }
    }

    fn resumed(&mut self, event_loop: &winit::event_loop::ActiveEventLoop) {
        if self.window.is_some() {
            return; // Already initialized
        }

        let window_attributes = Window::default_attributes()
            .with_title("Barwave - Spectrum Bar Grid")
            .with_inner_size(winit::dpi::LogicalSize::new(
                self.render_config.window_width,
                self.render_config.window_height,
            ));

        let window = match event_loop.create_window(window_attributes) {
            Ok(window) => Arc::new(window),
            Err(e) => {
                eprintln!("Failed to create window: {}", e);
                event_loop.exit();
                return;
            }
        };

        // Stream start: reset heights and rotation before the first frame
        self.viz.start(2, 44100, 16);

        // Build the mesh once so the GPU buffers are created at their
        // fixed final size.
        let initial_mesh = self.viz.update();
        let render_system = match pollster::block_on(RenderSystem::new(
            Arc::clone(&window),
            &self.render_config,
            initial_mesh,
        )) {
            Ok(render_system) => render_system,
            Err(e) => {
                eprintln!("Failed to initialize renderer: {}", e);
                event_loop.exit();
                return;
            }
        };

        self.start_time = Instant::now();
        self.next_audio_frame_s = 0.0;

        println!("\nBarwave is running!");
        println!("Press ESC to quit\n");

        self.window = Some(window);
        self.render_system = Some(render_system);
    }

    fn window_event(
        &mut self,
        event_loop: &winit::event_loop::ActiveEventLoop,
        _window_id: WindowId,
        event: WindowEvent,
    ) {
        match event {
            WindowEvent::CloseRequested => event_loop.exit(),
            WindowEvent::KeyboardInput {
                event:
                    KeyEvent {
                        state: ElementState::Pressed,
                        physical_key: PhysicalKey::Code(KeyCode::Escape),
                        ..
                    },
                ..
            } => event_loop.exit(),
            WindowEvent::Resized(size) => {
                // Track the new size so the projection aspect follows it
                self.render_config.window_width = size.width.max(1);
                self.render_config.window_height = size.height.max(1);
                if let Some(render_system) = &mut self.render_system {
                    render_system.resize(size.width, size.height);
                }
            }
            WindowEvent::RedrawRequested => {
                self.render_frame();
            }
            _ => {}
        }
    }
}

impl App {
    /// Render a single frame
    fn render_frame(&mut self) {
        let Some(ref render_system) = self.render_system else {
            return;
        };

        let time_s = self.start_time.elapsed().as_secs_f32();

        // Catch up on audio frames due since the last redraw
        let interval = self.source.frame_interval_s();
        self.next_audio_frame_s = clamp_audio_backlog(self.next_audio_frame_s, time_s);
        while self.next_audio_frame_s <= time_s {
            let frame = self.source.next_frame(self.next_audio_frame_s);
            self.viz.process_frame(frame);
            self.next_audio_frame_s += interval;
        }

        // Smooth heights, advance rotation, rebuild the mesh
        let point_size = self.viz.settings().point_size;
        let mode = self.viz.settings().render_mode;
        let mesh = self.viz.update();
        render_system.update_mesh(mesh);

        let projection = glam::Mat4::perspective_rh(
            self.render_config.fov_degrees.to_radians(),
            self.render_config.aspect_ratio(),
            self.render_config.near_plane,
            self.render_config.far_plane,
        );
        let uniforms = Uniforms::new(projection, self.viz.rotation().model_matrix(), point_size);
        render_system.update_uniforms(&uniforms);

        if let Err(e) = render_system.render(mode) {
            eprintln!("Render error: {:?}", e);
        }
    }
}

fn main() {
    let args = Args::parse();
    let settings = args.viz_settings();

    println!("Barwave - audio-reactive 3-D spectrum bar grid");
    println!(
        "Mode: {:?}, bar height: {:?}, speed: {:?}",
        settings.render_mode, settings.height_scale, settings.animation_speed,
    );

    let mut app = App::new(settings, args.seed);
    let event_loop = match EventLoop::new() {
        Ok(event_loop) => event_loop,
        Err(e) => {
            eprintln!("Failed to create event loop: {}", e);
            std::process::exit(1);
        }
    };
    let _ = event_loop.run_app(&mut app);
}
