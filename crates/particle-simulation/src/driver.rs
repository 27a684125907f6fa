//! Frame driver: turns wall-clock frame time into physics steps

use crate::{DriverParams, ParticleStore, PhysicsStep, StepStats};

/// Bounds for the runtime speed keys
pub const MIN_SPEED: f32 = 1.0e-4;
pub const MAX_SPEED: f32 = 1.0e3;

/// Simulation speed and pause state, owned by the application loop
#[derive(Debug, Clone)]
pub struct SimulationDriver {
    speed: f32,
    speed_step: f32,
    paused: bool,
    steps: u64,
    simulated_time: f64,
}

impl SimulationDriver {
    pub fn new(params: &DriverParams) -> Self {
        Self {
            speed: params.simulation_speed.clamp(MIN_SPEED, MAX_SPEED),
            speed_step: params.speed_step,
            paused: params.paused,
            steps: 0,
            simulated_time: 0.0,
        }
    }

    pub fn speed(&self) -> f32 {
        self.speed
    }

    pub fn is_paused(&self) -> bool {
        self.paused
    }

    pub fn toggle_pause(&mut self) {
        self.paused = !self.paused;
        log::info!("Simulation {}", if self.paused { "paused" } else { "resumed" });
    }

    /// One frame's worth of speed-up while the key is held
    pub fn speed_up(&mut self) {
        self.speed = (self.speed / self.speed_step).min(MAX_SPEED);
    }

    /// One frame's worth of slow-down while the key is held
    pub fn slow_down(&mut self) {
        self.speed = (self.speed * self.speed_step).max(MIN_SPEED);
    }

    /// Steps taken since startup
    pub fn steps(&self) -> u64 {
        self.steps
    }

    /// Total simulated time since startup
    pub fn simulated_time(&self) -> f64 {
        self.simulated_time
    }

    /// Step the simulation by `wall_delta * speed`, unless paused.
    ///
    /// Returns `None` when the frame was skipped.
    pub fn advance(
        &mut self,
        physics: &mut PhysicsStep,
        store: &mut ParticleStore,
        wall_delta: f32,
    ) -> Option<StepStats> {
        if self.paused {
            return None;
        }

        let delta_time = wall_delta * self.speed;
        let stats = physics.step(store, delta_time);

        self.steps += 1;
        self.simulated_time += delta_time as f64;
        Some(stats)
    }
}
