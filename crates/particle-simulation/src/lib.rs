//! # Particle Simulation Engine
//!
//! CPU-side N-body integration for charged particles: the particle store,
//! its configuration, the per-frame physics step and the driver that gates it.

pub mod driver;
pub mod error;
pub mod params;
pub mod simulation;
pub mod store;

pub use driver::*;
pub use error::*;
pub use params::*;
pub use simulation::*;
pub use store::*;
