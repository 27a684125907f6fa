//! Charged Particle Simulation
//!
//! Heavy positive and light negative particles interacting through pairwise
//! charge forces, drawn as instanced circles under a pan/zoom camera.

mod input;
mod perf;

use anyhow::Context;
use clap::Parser;
use input::{Command, InputState};
use particle_physics::ParticleInstance;
use particle_renderer::{Camera, Mesh, ParticleRenderer};
use particle_simulation::{
    ParticleStore, PhysicsStep, SimulationConfig, SimulationDriver, StepMode,
};
use perf::FrameCounter;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Instant;
use winit::{
    application::ApplicationHandler,
    event::*,
    event_loop::{ActiveEventLoop, ControlFlow, EventLoop},
    keyboard::PhysicalKey,
    window::{Window, WindowId},
};

const WINDOW_WIDTH: u32 = 1600;
const WINDOW_HEIGHT: u32 = 800;
const MESH_RADIUS: f32 = 0.5;

/// Interactive charged-particle simulation
#[derive(Parser, Debug)]
#[command(version, about)]
struct Args {
    /// TOML configuration file; reference values are used when omitted
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Seed for initialization and thermal jitter
    #[arg(short, long)]
    seed: Option<u64>,

    /// Number of particles
    #[arg(short = 'n', long)]
    count: Option<usize>,

    /// Use the in-place single-threaded physics step
    #[arg(long)]
    serial: bool,

    /// Start with the simulation paused
    #[arg(long)]
    paused: bool,

    /// Rim vertices of the circle mesh
    #[arg(long, default_value_t = 100)]
    segments: u32,

    /// Draw each particle as a single triangle instead of a circle
    #[arg(long)]
    triangle: bool,
}

impl Args {
    fn simulation_config(&self) -> anyhow::Result<SimulationConfig> {
        let mut config = match &self.config {
            Some(path) => SimulationConfig::load(path)
                .with_context(|| format!("failed to load {}", path.display()))?,
            None => SimulationConfig::default(),
        };

        if let Some(seed) = self.seed {
            config.seed = Some(seed);
        }
        if let Some(count) = self.count {
            config.particles.count = count;
        }
        if self.serial {
            config.physics.mode = StepMode::Serial;
        }
        if self.paused {
            config.driver.paused = true;
        }

        config.validate().context("invalid simulation configuration")?;
        Ok(config)
    }

    fn mesh(&self) -> Mesh {
        if self.triangle {
            Mesh::triangle()
        } else {
            Mesh::circle(MESH_RADIUS, self.segments)
        }
    }
}

struct GpuState {
    surface: wgpu::Surface<'static>,
    device: wgpu::Device,
    queue: wgpu::Queue,
    config: wgpu::SurfaceConfiguration,

    renderer: ParticleRenderer,
    camera: Camera,
}

impl GpuState {
    async fn new(window: Arc<Window>, mesh: &Mesh, particle_count: usize) -> anyhow::Result<Self> {
        let size = window.inner_size();

        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            backends: wgpu::Backends::PRIMARY,
            ..Default::default()
        });

        let surface = instance
            .create_surface(window.clone())
            .context("failed to create surface")?;

        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::HighPerformance,
                compatible_surface: Some(&surface),
                force_fallback_adapter: false,
            })
            .await
            .context("no suitable GPU adapter")?;

        log::info!("Using GPU: {}", adapter.get_info().name);

        let (device, queue) = adapter
            .request_device(&wgpu::DeviceDescriptor {
                label: Some("Device"),
                required_features: wgpu::Features::empty(),
                required_limits: wgpu::Limits::default(),
                memory_hints: wgpu::MemoryHints::default(),
                experimental_features: wgpu::ExperimentalFeatures::default(),
                trace: wgpu::Trace::Off,
            })
            .await
            .context("failed to create device")?;

        let surface_caps = surface.get_capabilities(&adapter);
        let surface_format = surface_caps
            .formats
            .iter()
            .find(|f| f.is_srgb())
            .or_else(|| surface_caps.formats.first())
            .copied()
            .context("surface reports no formats")?;
        let alpha_mode = surface_caps
            .alpha_modes
            .first()
            .copied()
            .unwrap_or(wgpu::CompositeAlphaMode::Auto);

        let config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format: surface_format,
            width: size.width.max(1),
            height: size.height.max(1),
            present_mode: wgpu::PresentMode::AutoVsync,
            alpha_mode,
            view_formats: vec![],
            desired_maximum_frame_latency: 2,
        };
        surface.configure(&device, &config);

        let renderer = ParticleRenderer::new(&device, &config, mesh, particle_count);
        log::info!(
            "Renderer initialized ({} vertices, {} indices)",
            mesh.vertices.len(),
            mesh.index_count()
        );

        let camera = Camera::new(config.width, config.height);

        Ok(Self {
            surface,
            device,
            queue,
            config,
            renderer,
            camera,
        })
    }

    fn resize(&mut self, new_size: winit::dpi::PhysicalSize<u32>) {
        if new_size.width > 0 && new_size.height > 0 {
            self.config.width = new_size.width;
            self.config.height = new_size.height;
            self.surface.configure(&self.device, &self.config);
            self.camera.resize(new_size.width, new_size.height);
        }
    }

    fn draw(&mut self, clear: bool) -> Result<(), wgpu::SurfaceError> {
        let output = self.surface.get_current_texture()?;
        let view = output
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());

        self.renderer
            .render(&self.device, &self.queue, &view, &self.camera, clear);

        output.present();
        Ok(())
    }

    fn upload(&mut self, instances: &[ParticleInstance]) {
        self.renderer
            .upload_instances(&self.device, &self.queue, instances);
    }
}

/// CPU-side simulation state; lives independently of the window
struct Simulation {
    store: ParticleStore,
    physics: PhysicsStep,
    driver: SimulationDriver,
    instances: Vec<ParticleInstance>,
}

impl Simulation {
    fn new(config: &SimulationConfig) -> anyhow::Result<Self> {
        let store = ParticleStore::initialize(&config.particles, config.seed)
            .context("failed to initialize particles")?;
        let physics =
            PhysicsStep::new(config.physics).context("invalid physics constants")?;
        let driver = SimulationDriver::new(&config.driver);
        let instances = store.instances();

        let params = physics.params();
        log::info!(
            "Physics: {:?} step, k = {}, pressure = {}, thermal = {}, friction = {} (seed {})",
            physics.mode(),
            params.k,
            params.pressure,
            params.thermal,
            params.friction,
            store.seed()
        );

        Ok(Self {
            store,
            physics,
            driver,
            instances,
        })
    }

    /// Returns whether the particles moved
    fn advance(&mut self, wall_delta: f32) -> bool {
        let Some(stats) = self
            .driver
            .advance(&mut self.physics, &mut self.store, wall_delta)
        else {
            return false;
        };

        log::trace!(
            "step {}: dt {:.5}, {} overlapping pairs",
            self.driver.steps(),
            wall_delta * self.driver.speed(),
            stats.overlapping_pairs
        );
        self.store.write_instances(&mut self.instances);
        true
    }
}

struct App {
    args: Args,
    window: Option<Arc<Window>>,
    gpu_state: Option<GpuState>,
    simulation: Simulation,
    input: InputState,
    frames: FrameCounter,
    startup_error: Option<anyhow::Error>,
}

impl App {
    fn new(args: Args, simulation: Simulation) -> Self {
        Self {
            args,
            window: None,
            gpu_state: None,
            simulation,
            input: InputState::default(),
            frames: FrameCounter::new(Instant::now()),
            startup_error: None,
        }
    }

    fn create_window(&mut self, event_loop: &ActiveEventLoop) -> anyhow::Result<()> {
        let window_attributes = Window::default_attributes()
            .with_title("Charged Particles")
            .with_inner_size(winit::dpi::PhysicalSize::new(WINDOW_WIDTH, WINDOW_HEIGHT));

        let window = Arc::new(
            event_loop
                .create_window(window_attributes)
                .context("failed to create window")?,
        );
        let mut gpu_state = pollster::block_on(GpuState::new(
            window.clone(),
            &self.args.mesh(),
            self.simulation.store.len(),
        ))?;
        gpu_state.upload(&self.simulation.instances);

        self.window = Some(window);
        self.gpu_state = Some(gpu_state);
        Ok(())
    }

    /// Input, draw, present, then step and upload for the next frame
    fn frame(&mut self, event_loop: &ActiveEventLoop) {
        let (Some(window), Some(gpu_state)) = (&self.window, &mut self.gpu_state) else {
            return;
        };
        let simulation = &mut self.simulation;

        self.input.apply_camera(&mut gpu_state.camera);
        self.input.apply_speed(&mut simulation.driver);

        match gpu_state.draw(self.input.clear_screen) {
            Ok(()) => {}
            Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                gpu_state.resize(window.inner_size())
            }
            Err(wgpu::SurfaceError::OutOfMemory) => {
                log::error!("Out of GPU memory, exiting");
                event_loop.exit();
                return;
            }
            Err(e) => log::warn!("Render error: {e:?}"),
        }

        let now = Instant::now();
        if let Some(fps) = self.frames.frame(now) {
            log::info!(
                "{fps:.1} FPS, speed {:.4}, simulated time {:.2}",
                simulation.driver.speed(),
                simulation.driver.simulated_time()
            );
        }

        let wall_delta = self.frames.delta(now).as_secs_f32();
        if simulation.advance(wall_delta) {
            gpu_state.upload(&simulation.instances);
        }
    }
}

impl ApplicationHandler for App {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() {
            return;
        }

        if let Err(err) = self.create_window(event_loop) {
            log::error!("{err:#}");
            self.startup_error = Some(err);
            event_loop.exit();
            return;
        }

        // The first step should not cover window and device setup
        self.frames = FrameCounter::new(Instant::now());
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        _window_id: WindowId,
        event: WindowEvent,
    ) {
        match event {
            WindowEvent::CloseRequested => event_loop.exit(),

            WindowEvent::Resized(physical_size) => {
                if let Some(gpu_state) = &mut self.gpu_state {
                    gpu_state.resize(physical_size);
                }
            }

            WindowEvent::Focused(false) => self.input.release_all(),

            WindowEvent::KeyboardInput {
                event:
                    KeyEvent {
                        physical_key: PhysicalKey::Code(key_code),
                        state,
                        repeat,
                        ..
                    },
                ..
            } => match self.input.handle_key(key_code, state, repeat) {
                Some(Command::Quit) => event_loop.exit(),
                Some(Command::TogglePause) => self.simulation.driver.toggle_pause(),
                None => {}
            },

            WindowEvent::RedrawRequested => self.frame(event_loop),

            _ => {}
        }
    }

    fn about_to_wait(&mut self, _event_loop: &ActiveEventLoop) {
        if let Some(window) = &self.window {
            window.request_redraw();
        }
    }
}

fn main() -> anyhow::Result<()> {
    // Initialize logger (RUST_LOG=debug for verbose output)
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = Args::parse();
    let config = args.simulation_config()?;
    let simulation = Simulation::new(&config)?;

    log::info!("Starting charged particle simulation...");

    let event_loop = EventLoop::new().context("failed to create event loop")?;
    event_loop.set_control_flow(ControlFlow::Poll);

    let mut app = App::new(args, simulation);
    event_loop.run_app(&mut app)?;

    match app.startup_error.take() {
        Some(err) => Err(err),
        None => Ok(()),
    }
}
