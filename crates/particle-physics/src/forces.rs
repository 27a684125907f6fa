//! Pairwise force law
//!
//! Every function here is pure; the simulation crate decides in which order
//! pairs are visited and where the results are written.

use glam::Vec2;

/// Coefficients of the pairwise force law
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ForceLaw {
    /// Strength of the inverse-cube short-range repulsion
    pub repulsion: f32,
    /// Coulomb-like coupling constant
    pub k: f32,
    /// Constant term added along the pair axis
    pub pressure: f32,
    /// Pairs closer than this are degenerate and contribute no force
    pub min_distance: f32,
}

impl Default for ForceLaw {
    fn default() -> Self {
        Self {
            repulsion: crate::constants::REPULSION,
            k: crate::constants::K_CHARGE,
            pressure: crate::constants::PRESSURE,
            min_distance: crate::constants::MIN_DISTANCE,
        }
    }
}

/// Relative placement of `other` as seen from `this`
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PairGeometry {
    /// Euclidean distance between the two centres
    pub distance: f32,
    /// Unit vector from `this` towards `other`
    pub normal: Vec2,
    /// Distance fell below `min_distance`; `normal` is the fallback axis
    pub degenerate: bool,
}

/// Axis used in place of the undefined direction between coincident bodies.
///
/// Points from the lower index to the higher one, so the two ordered visits
/// of a pair see opposite normals and push the bodies apart consistently.
pub fn fallback_axis(this: usize, other: usize) -> Vec2 {
    if this < other {
        Vec2::X
    } else {
        Vec2::NEG_X
    }
}

/// Distance and direction from `this` to `other`
pub fn pair_geometry(this: Vec2, other: Vec2, min_distance: f32, fallback: Vec2) -> PairGeometry {
    let delta = other - this;
    let distance = delta.length();

    if distance < min_distance {
        PairGeometry {
            distance,
            normal: fallback,
            degenerate: true,
        }
    } else {
        PairGeometry {
            distance,
            normal: delta / distance,
            degenerate: false,
        }
    }
}

impl ForceLaw {
    /// Acceleration on `this` due to `other` (not yet scaled by dt)
    ///
    /// `normal * (-repulsion/r³ - k·q₁·q₂/r² + pressure)`. Only the body being updated
    /// receives it; the opposite ordered pair accounts for the other body.
    pub fn acceleration(&self, geometry: &PairGeometry, charge: f32, other_charge: f32) -> Vec2 {
        if geometry.degenerate {
            return Vec2::ZERO;
        }

        let r = geometry.distance;
        let r2 = r * r;
        let magnitude = -self.repulsion / (r2 * r) - self.k * charge * other_charge / r2 + self.pressure;

        geometry.normal * magnitude
    }
}

/// How far each body of an overlapping pair moves along the pair axis.
///
/// Returns half the penetration depth, or `None` if the bodies do not overlap.
pub fn collision_shift(distance: f32, radius: f32, other_radius: f32) -> Option<f32> {
    let contact = radius + other_radius;
    (distance < contact).then(|| 0.5 * (contact - distance))
}

/// Thermal velocity kick from two uniform samples in `[0, 1)`
pub fn thermal_kick(samples: [f32; 2], thermal: f32, delta_time: f32) -> Vec2 {
    Vec2::new(samples[0] - 0.5, samples[1] - 0.5) * thermal * delta_time
}

/// Damping: the jitter is added after friction has scaled the velocity
pub fn damp(velocity: Vec2, friction: f32, jitter: Vec2) -> Vec2 {
    velocity * friction + jitter
}

#[cfg(test)]
mod tests {
    use super::*;

    fn geometry(a: Vec2, b: Vec2) -> PairGeometry {
        pair_geometry(a, b, 1.0e-4, fallback_axis(0, 1))
    }

    #[test]
    fn test_like_charges_repel() {
        let law = ForceLaw {
            pressure: 0.0,
            ..Default::default()
        };
        let g = geometry(Vec2::ZERO, Vec2::new(3.0, 0.0));
        let a = law.acceleration(&g, 4.0, 4.0);

        assert!(a.x < 0.0);
        assert_eq!(a.y, 0.0);
    }

    #[test]
    fn test_opposite_charges_attract() {
        let law = ForceLaw::default();
        let g = geometry(Vec2::ZERO, Vec2::new(0.0, 3.0));
        let a = law.acceleration(&g, 4.0, -2.0);

        assert!(a.y > 0.0);
    }

    #[test]
    fn test_uncharged_pair_matches_closed_form() {
        let law = ForceLaw {
            repulsion: 1.0,
            k: 0.0,
            pressure: 0.1,
            min_distance: 1.0e-4,
        };
        let g = geometry(Vec2::ZERO, Vec2::new(2.0, 0.0));
        let a = law.acceleration(&g, 0.0, 0.0);

        assert!((a.x - (-1.0 / 8.0 + 0.1)).abs() < 1e-6);
    }

    #[test]
    fn test_degenerate_pair_has_no_force() {
        let law = ForceLaw::default();
        let g = geometry(Vec2::ONE, Vec2::ONE);

        assert!(g.degenerate);
        assert_eq!(g.normal, Vec2::X);
        assert_eq!(law.acceleration(&g, 4.0, 4.0), Vec2::ZERO);
    }

    #[test]
    fn test_fallback_axis_is_antisymmetric() {
        assert_eq!(fallback_axis(2, 7), -fallback_axis(7, 2));
    }

    #[test]
    fn test_collision_shift() {
        assert_eq!(collision_shift(2.0, 1.0, 0.2), None);

        let shift = collision_shift(0.2, 1.0, 0.2).unwrap();
        assert!((shift - 0.5).abs() < 1e-6);
    }

    #[test]
    fn test_thermal_kick_is_centred() {
        assert_eq!(thermal_kick([0.5, 0.5], 100.0, 0.1), Vec2::ZERO);
        assert_eq!(thermal_kick([0.9, 0.1], 0.0, 0.1), Vec2::ZERO);

        let kick = thermal_kick([1.0, 0.0], 100.0, 0.01);
        assert!((kick.x - 0.5).abs() < 1e-6);
        assert!((kick.y + 0.5).abs() < 1e-6);
    }

    #[test]
    fn test_damp_adds_jitter_after_friction() {
        let v = damp(Vec2::new(2.0, 0.0), 0.5, Vec2::new(1.0, 1.0));
        assert_eq!(v, Vec2::new(2.0, 1.0));
    }
}
