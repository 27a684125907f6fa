//! Particle state and the per-instance record handed to the renderer

use bytemuck::{Pod, Zeroable};
use glam::Vec2;

/// Charge/radius pair shared by every particle of one class
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ChargeClass {
    pub charge: f32,
    pub radius: f32,
}

impl ChargeClass {
    /// Large, positively charged bodies
    pub const HEAVY: Self = Self {
        charge: crate::constants::HEAVY_CHARGE,
        radius: crate::constants::HEAVY_RADIUS,
    };

    /// Small, negatively charged bodies
    pub const LIGHT: Self = Self {
        charge: crate::constants::LIGHT_CHARGE,
        radius: crate::constants::LIGHT_RADIUS,
    };
}

/// A simulated body
///
/// `radius` only drives collision separation; force magnitudes depend on
/// distance and charge alone.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Particle {
    pub position: Vec2,
    pub velocity: Vec2,
    pub charge: f32,
    pub radius: f32,
}

impl Particle {
    pub fn new(position: Vec2, velocity: Vec2, class: ChargeClass) -> Self {
        Self {
            position,
            velocity,
            charge: class.charge,
            radius: class.radius,
        }
    }

    /// Particle at rest
    pub fn at_rest(position: Vec2, class: ChargeClass) -> Self {
        Self::new(position, Vec2::ZERO, class)
    }

    pub fn is_finite(&self) -> bool {
        self.position.is_finite() && self.velocity.is_finite()
    }

    pub fn to_instance(&self) -> ParticleInstance {
        ParticleInstance {
            position: self.position.to_array(),
            charge: self.charge,
            radius: self.radius,
        }
    }
}

/// GPU-compatible per-instance record
///
/// Field order is the contract with the vertex shader:
/// `(position.x, position.y, charge, radius)`, 16 bytes, no padding.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Pod, Zeroable)]
pub struct ParticleInstance {
    pub position: [f32; 2],
    pub charge: f32,
    pub radius: f32,
}

impl From<&Particle> for ParticleInstance {
    fn from(particle: &Particle) -> Self {
        particle.to_instance()
    }
}
