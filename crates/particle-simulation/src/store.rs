//! Particle storage and initialization

use crate::{ConfigError, InitParams};
use glam::Vec2;
use particle_physics::{ChargeClass, Particle, ParticleInstance};
use rand::{rngs::StdRng, Rng, SeedableRng};
use std::time::{SystemTime, UNIX_EPOCH};

/// Fixed-size set of particles plus the random source that drives them
///
/// The same generator fills the initial state and supplies the thermal jitter
/// of every later step, so a fixed seed reproduces a whole run.
pub struct ParticleStore {
    particles: Vec<Particle>,
    rng: StdRng,
    seed: u64,
}

impl ParticleStore {
    /// Fill a new store from `params` using a generator seeded with `seed`,
    /// or with the current clock when no seed is given.
    pub fn initialize(params: &InitParams, seed: Option<u64>) -> Result<Self, ConfigError> {
        params.validate()?;

        let seed = seed.unwrap_or_else(clock_seed);
        let mut rng = StdRng::seed_from_u64(seed);

        let heavy = ChargeClass::from(params.heavy);
        let light = ChargeClass::from(params.light);

        let particles = (0..params.count)
            .map(|_| {
                let position = Vec2::new(
                    params.position_range.sample(&mut rng),
                    params.position_range.sample(&mut rng),
                );
                let velocity = Vec2::new(
                    params.velocity_range.sample(&mut rng),
                    params.velocity_range.sample(&mut rng),
                );
                let class = if rng.random::<f32>() < params.heavy_ratio {
                    heavy
                } else {
                    light
                };
                Particle::new(position, velocity, class)
            })
            .collect::<Vec<_>>();

        let heavy_count = particles.iter().filter(|p| p.charge == heavy.charge).count();
        log::info!(
            "Initialized {} particles ({} heavy, {} light), seed {}",
            particles.len(),
            heavy_count,
            particles.len() - heavy_count,
            seed
        );

        Ok(Self {
            particles,
            rng,
            seed,
        })
    }

    /// Wrap an explicit particle set, e.g. a hand-built test scene
    pub fn from_particles(particles: Vec<Particle>, seed: u64) -> Result<Self, ConfigError> {
        if particles.is_empty() {
            return Err(ConfigError::NonPositiveCount);
        }
        if let Some(p) = particles.iter().find(|p| !(p.radius >= 0.0)) {
            return Err(ConfigError::NegativeRadius {
                what: "particle",
                radius: p.radius,
            });
        }

        Ok(Self {
            particles,
            rng: StdRng::seed_from_u64(seed),
            seed,
        })
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    pub fn len(&self) -> usize {
        self.particles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.particles.is_empty()
    }

    pub fn particles(&self) -> &[Particle] {
        &self.particles
    }

    /// Snapshot in the per-instance layout the renderer uploads
    pub fn instances(&self) -> Vec<ParticleInstance> {
        let mut out = Vec::with_capacity(self.particles.len());
        self.write_instances(&mut out);
        out
    }

    /// Same as [`Self::instances`] but reuses the caller's buffer
    pub fn write_instances(&self, out: &mut Vec<ParticleInstance>) {
        out.clear();
        out.extend(self.particles.iter().map(ParticleInstance::from));
    }

    /// Particle slice and random source, borrowed together by the physics step
    pub(crate) fn split_mut(&mut self) -> (&mut [Particle], &mut StdRng) {
        (&mut self.particles, &mut self.rng)
    }
}

fn clock_seed() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_nanos() as u64)
        .unwrap_or_default()
}
