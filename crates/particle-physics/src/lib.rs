//! # Particle Physics
//!
//! Particle records and the pairwise force law for a 2D charged-particle
//! simulation: inverse-cube short-range repulsion, a Coulomb-like charge term,
//! a constant pressure term, collision separation and thermal jitter.

pub mod constants;
pub mod forces;
pub mod particle;

pub use constants::*;
pub use forces::*;
pub use particle::*;
