//! Per-frame physics step
//!
//! One explicit-Euler step over all ordered pairs `(i, j)`, `i != j`:
//!
//! 1. overlapping pairs are pushed apart, each body by half the penetration depth;
//! 2. `velocity[i]` accumulates `dt * normal * (-repulsion/r³ - k·qᵢ·qⱼ/r² + pressure)`;
//! 3. `velocity[i] = velocity[i] * friction + thermal jitter`;
//! 4. once every velocity is updated, `position += velocity * dt`.
//!
//! [`StepMode::Serial`] visits pairs in index order and moves both bodies of an
//! overlapping pair immediately, so later pairs in the same pass see the
//! corrected positions. [`StepMode::Parallel`] evaluates every pair against a
//! snapshot of the pre-step state; each particle only writes its own velocity
//! and its own half of every separation, which leaves nothing shared between
//! rayon workers.

use crate::{ConfigError, ParticleStore, PhysicsParams, StepMode};
use glam::Vec2;
use particle_physics::{
    collision_shift, damp, fallback_axis, pair_geometry, thermal_kick, ForceLaw, Particle,
};
use rand::Rng;
use rayon::prelude::*;
use std::ops::Add;

/// Pair counts gathered during one step (ordered pairs)
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StepStats {
    /// Pairs closer than `min_distance`; they contributed no force
    pub degenerate_pairs: usize,
    /// Pairs that triggered collision separation
    pub overlapping_pairs: usize,
}

impl Add for StepStats {
    type Output = Self;

    fn add(self, other: Self) -> Self {
        Self {
            degenerate_pairs: self.degenerate_pairs + other.degenerate_pairs,
            overlapping_pairs: self.overlapping_pairs + other.overlapping_pairs,
        }
    }
}

/// Physics integrator for a [`ParticleStore`]
pub struct PhysicsStep {
    params: PhysicsParams,
    law: ForceLaw,

    // Scratch buffers reused across frames
    snapshot: Vec<Particle>,
    jitter: Vec<Vec2>,
}

impl PhysicsStep {
    /// Rejects constants that could turn a step non-finite, e.g. a
    /// non-positive `min_distance`.
    pub fn new(params: PhysicsParams) -> Result<Self, ConfigError> {
        params.validate()?;

        Ok(Self {
            law: params.force_law(),
            params,
            snapshot: Vec::new(),
            jitter: Vec::new(),
        })
    }

    pub fn params(&self) -> &PhysicsParams {
        &self.params
    }

    pub fn mode(&self) -> StepMode {
        self.params.mode
    }

    /// Advance every particle in `store` by `delta_time`.
    ///
    /// A negative or non-finite `delta_time` leaves the store untouched.
    pub fn step(&mut self, store: &mut ParticleStore, delta_time: f32) -> StepStats {
        if !(delta_time >= 0.0 && delta_time.is_finite()) {
            log::warn!("Skipping physics step with invalid dt {delta_time}");
            return StepStats::default();
        }

        let (particles, rng) = store.split_mut();

        // Jitter is drawn serially in index order, so both modes consume the
        // generator identically and a fixed seed reproduces the run.
        let thermal = self.params.thermal;
        self.jitter.clear();
        self.jitter.extend((0..particles.len()).map(|_| {
            let samples = [rng.random::<f32>(), rng.random::<f32>()];
            thermal_kick(samples, thermal, delta_time)
        }));

        let stats = match self.params.mode {
            StepMode::Serial => self.accumulate_serial(particles, delta_time),
            StepMode::Parallel => self.accumulate_parallel(particles, delta_time),
        };

        match self.params.mode {
            StepMode::Serial => particles
                .iter_mut()
                .for_each(|p| p.position += p.velocity * delta_time),
            StepMode::Parallel => particles
                .par_iter_mut()
                .for_each(|p| p.position += p.velocity * delta_time),
        }

        if stats.degenerate_pairs > 0 {
            log::trace!(
                "{} degenerate pairs skipped (r < {})",
                stats.degenerate_pairs,
                self.law.min_distance
            );
        }

        stats
    }

    fn accumulate_serial(&self, particles: &mut [Particle], dt: f32) -> StepStats {
        let law = self.law;
        let friction = self.params.friction;
        let mut stats = StepStats::default();

        for i in 0..particles.len() {
            let mut velocity = particles[i].velocity;

            for j in 0..particles.len() {
                if i == j {
                    continue;
                }
                let this = particles[i];
                let other = particles[j];

                let geometry = pair_geometry(
                    this.position,
                    other.position,
                    law.min_distance,
                    fallback_axis(i, j),
                );
                stats.degenerate_pairs += geometry.degenerate as usize;

                if let Some(shift) = collision_shift(geometry.distance, this.radius, other.radius) {
                    particles[i].position -= geometry.normal * shift;
                    particles[j].position += geometry.normal * shift;
                    stats.overlapping_pairs += 1;
                }

                velocity += law.acceleration(&geometry, this.charge, other.charge) * dt;
            }

            particles[i].velocity = damp(velocity, friction, self.jitter[i]);
        }

        stats
    }

    fn accumulate_parallel(&mut self, particles: &mut [Particle], dt: f32) -> StepStats {
        self.snapshot.clear();
        self.snapshot.extend_from_slice(particles);

        let law = self.law;
        let friction = self.params.friction;
        let snapshot = &self.snapshot;

        particles
            .par_iter_mut()
            .zip(self.jitter.par_iter())
            .enumerate()
            .map(|(i, (particle, &jitter))| {
                let this = snapshot[i];
                let mut velocity = this.velocity;
                let mut correction = Vec2::ZERO;
                let mut stats = StepStats::default();

                for (j, other) in snapshot.iter().enumerate() {
                    if i == j {
                        continue;
                    }

                    let geometry = pair_geometry(
                        this.position,
                        other.position,
                        law.min_distance,
                        fallback_axis(i, j),
                    );
                    stats.degenerate_pairs += geometry.degenerate as usize;

                    // Only this body's half; the (j, i) visit moves the other one.
                    if let Some(shift) =
                        collision_shift(geometry.distance, this.radius, other.radius)
                    {
                        correction -= geometry.normal * shift;
                        stats.overlapping_pairs += 1;
                    }

                    velocity += law.acceleration(&geometry, this.charge, other.charge) * dt;
                }

                particle.velocity = damp(velocity, friction, jitter);
                particle.position += correction;
                stats
            })
            .reduce(StepStats::default, |a, b| a + b)
    }
}
