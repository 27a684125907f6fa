//! Reference constants for the charged-particle simulation
//!
//! These reproduce the regime the simulation was tuned in. Every one of them
//! can be overridden at startup through the simulation configuration.

/// Number of particles spawned at startup
pub const PARTICLE_COUNT: usize = 1000;

/// Initial position range, per axis
pub const POSITION_MIN: f32 = -20.0;
pub const POSITION_MAX: f32 = 20.0;

/// Initial velocity range, per axis
pub const VELOCITY_MIN: f32 = -1.0;
pub const VELOCITY_MAX: f32 = 1.0;

/// Probability that a spawned particle belongs to the heavy class
pub const HEAVY_RATIO: f32 = 1.0 / 3.0;

/// Heavy class: large, positively charged
pub const HEAVY_CHARGE: f32 = 4.0;
pub const HEAVY_RADIUS: f32 = 1.0;

/// Light class: small, negatively charged
pub const LIGHT_CHARGE: f32 = -2.0;
pub const LIGHT_RADIUS: f32 = 0.2;

/// Strength of the inverse-cube short-range repulsion
pub const REPULSION: f32 = 1.0;

/// Coulomb-like coupling constant
pub const K_CHARGE: f32 = 100.0;

/// Constant pressure term added to every pair
pub const PRESSURE: f32 = 0.1;

/// Scale of the per-step thermal velocity jitter
pub const THERMAL: f32 = 100.0;

/// Multiplicative velocity damping applied once per step
pub const FRICTION: f32 = 0.95;

/// Pairs closer than this contribute no force (r -> 0 singularity guard)
pub const MIN_DISTANCE: f32 = 1.0e-4;
