//! # Particle Renderer
//!
//! Instanced 2D visualization of the particle simulation.

pub mod camera;
pub mod mesh;
pub mod renderer;

pub use camera::*;
pub use mesh::*;
pub use renderer::*;
