//! Startup configuration
//!
//! Every field has the reference default, so an empty TOML document (or no
//! file at all) reproduces the regime the simulation was tuned in:
//!
//! ```toml
//! seed = 42
//!
//! [particles]
//! count = 1000
//! position_range = { min = -20.0, max = 20.0 }
//! velocity_range = { min = -1.0, max = 1.0 }
//! heavy_ratio = 0.3333
//! heavy = { charge = 4.0, radius = 1.0 }
//! light = { charge = -2.0, radius = 0.2 }
//!
//! [physics]
//! repulsion = 1.0
//! k = 100.0
//! pressure = 0.1
//! thermal = 100.0
//! friction = 0.95
//! min_distance = 1e-4
//! mode = "parallel"   # or "serial"
//!
//! [driver]
//! simulation_speed = 0.1
//! speed_step = 0.99
//! paused = false
//! ```

use crate::{ConfigError, MAX_SPEED, MIN_SPEED};
use particle_physics::{constants::*, ChargeClass, ForceLaw};
use rand::Rng;
use serde::Deserialize;
use std::path::Path;

/// Closed interval sampled uniformly per axis
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
pub struct ValueRange {
    pub min: f32,
    pub max: f32,
}

impl ValueRange {
    pub const fn new(min: f32, max: f32) -> Self {
        Self { min, max }
    }

    pub fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> f32 {
        self.min + rng.random::<f32>() * (self.max - self.min)
    }

    pub fn contains(&self, value: f32) -> bool {
        (self.min..=self.max).contains(&value)
    }

    fn validate(&self, name: &'static str) -> Result<(), ConfigError> {
        if self.min.is_finite() && self.max.is_finite() && self.min <= self.max {
            Ok(())
        } else {
            Err(ConfigError::InvalidRange {
                name,
                min: self.min,
                max: self.max,
            })
        }
    }
}

/// Charge and radius of one particle class
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
pub struct ClassParams {
    pub charge: f32,
    pub radius: f32,
}

impl From<ClassParams> for ChargeClass {
    fn from(params: ClassParams) -> Self {
        ChargeClass {
            charge: params.charge,
            radius: params.radius,
        }
    }
}

impl From<ChargeClass> for ClassParams {
    fn from(class: ChargeClass) -> Self {
        Self {
            charge: class.charge,
            radius: class.radius,
        }
    }
}

/// How the particle store is populated at startup
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(default)]
pub struct InitParams {
    pub count: usize,
    pub position_range: ValueRange,
    pub velocity_range: ValueRange,
    /// Probability of drawing the heavy class
    pub heavy_ratio: f32,
    pub heavy: ClassParams,
    pub light: ClassParams,
}

impl Default for InitParams {
    fn default() -> Self {
        Self {
            count: PARTICLE_COUNT,
            position_range: ValueRange::new(POSITION_MIN, POSITION_MAX),
            velocity_range: ValueRange::new(VELOCITY_MIN, VELOCITY_MAX),
            heavy_ratio: HEAVY_RATIO,
            heavy: ChargeClass::HEAVY.into(),
            light: ChargeClass::LIGHT.into(),
        }
    }
}

impl InitParams {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.count == 0 {
            return Err(ConfigError::NonPositiveCount);
        }
        self.position_range.validate("position")?;
        self.velocity_range.validate("velocity")?;

        if !(0.0..=1.0).contains(&self.heavy_ratio) {
            return Err(ConfigError::InvalidRatio(self.heavy_ratio));
        }

        for (what, class) in [("heavy class", self.heavy), ("light class", self.light)] {
            if class.radius < 0.0 || class.radius.is_nan() {
                return Err(ConfigError::NegativeRadius {
                    what,
                    radius: class.radius,
                });
            }
            finite("charge", class.charge)?;
        }

        Ok(())
    }
}

/// Pair-visiting strategy of the physics step
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StepMode {
    /// Rayon over particles, every pair evaluated against the pre-step snapshot
    #[default]
    Parallel,
    /// Single thread, ordered pairs, separation applied in place as pairs are visited
    Serial,
}

/// Physics constants for the force law and the integrator
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(default)]
pub struct PhysicsParams {
    /// Coefficient of the inverse-cube term
    pub repulsion: f32,
    /// Coefficient of the charge term
    pub k: f32,
    pub pressure: f32,
    pub thermal: f32,
    pub friction: f32,
    pub min_distance: f32,
    pub mode: StepMode,
}

impl Default for PhysicsParams {
    fn default() -> Self {
        Self {
            repulsion: REPULSION,
            k: K_CHARGE,
            pressure: PRESSURE,
            thermal: THERMAL,
            friction: FRICTION,
            min_distance: MIN_DISTANCE,
            mode: StepMode::Parallel,
        }
    }
}

impl PhysicsParams {
    /// No forces, no jitter, no damping (collision separation still applies)
    pub fn inert() -> Self {
        Self {
            repulsion: 0.0,
            k: 0.0,
            pressure: 0.0,
            thermal: 0.0,
            friction: 1.0,
            ..Self::default()
        }
    }

    pub fn with_mode(self, mode: StepMode) -> Self {
        Self { mode, ..self }
    }

    pub fn force_law(&self) -> ForceLaw {
        ForceLaw {
            repulsion: self.repulsion,
            k: self.k,
            pressure: self.pressure,
            min_distance: self.min_distance,
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        finite("repulsion", self.repulsion)?;
        finite("k", self.k)?;
        finite("pressure", self.pressure)?;

        if !(self.thermal >= 0.0 && self.thermal.is_finite()) {
            return Err(ConfigError::InvalidConstant {
                name: "thermal",
                value: self.thermal,
            });
        }
        if !(0.0..=1.0).contains(&self.friction) {
            return Err(ConfigError::InvalidConstant {
                name: "friction",
                value: self.friction,
            });
        }
        if !(self.min_distance > 0.0 && self.min_distance.is_finite()) {
            return Err(ConfigError::InvalidConstant {
                name: "min_distance",
                value: self.min_distance,
            });
        }

        Ok(())
    }
}

/// Runtime controls: time scaling and pause
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(default)]
pub struct DriverParams {
    /// Multiplier applied to wall-clock frame time
    pub simulation_speed: f32,
    /// Per-frame factor used while the speed keys are held
    pub speed_step: f32,
    pub paused: bool,
}

impl Default for DriverParams {
    fn default() -> Self {
        Self {
            simulation_speed: 0.1,
            speed_step: 0.99,
            paused: false,
        }
    }
}

impl DriverParams {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(MIN_SPEED..=MAX_SPEED).contains(&self.simulation_speed) {
            return Err(ConfigError::InvalidConstant {
                name: "simulation_speed",
                value: self.simulation_speed,
            });
        }
        if !(self.speed_step > 0.0 && self.speed_step <= 1.0) {
            return Err(ConfigError::InvalidConstant {
                name: "speed_step",
                value: self.speed_step,
            });
        }
        Ok(())
    }
}

/// Complete startup configuration
#[derive(Debug, Clone, Copy, PartialEq, Default, Deserialize)]
#[serde(default)]
pub struct SimulationConfig {
    /// Fixed seed for initialization and thermal jitter; clock-seeded when absent
    pub seed: Option<u64>,
    pub particles: InitParams,
    pub physics: PhysicsParams,
    pub driver: DriverParams,
}

impl SimulationConfig {
    pub fn from_toml_str(source: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(source)?;
        config.validate()?;
        Ok(config)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let source = std::fs::read_to_string(path)?;
        let config = Self::from_toml_str(&source)?;
        log::info!("Loaded configuration from {}", path.display());
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        self.particles.validate()?;
        self.physics.validate()?;
        self.driver.validate()
    }
}

fn finite(name: &'static str, value: f32) -> Result<(), ConfigError> {
    if value.is_finite() {
        Ok(())
    } else {
        Err(ConfigError::InvalidConstant { name, value })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_document_gives_reference_regime() {
        let config = SimulationConfig::from_toml_str("").unwrap();

        assert_eq!(config, SimulationConfig::default());
        assert_eq!(config.particles.count, 1000);
        assert_eq!(config.physics.k, 100.0);
        assert_eq!(config.physics.friction, 0.95);
        assert_eq!(config.physics.mode, StepMode::Parallel);
        assert_eq!(config.seed, None);
    }

    #[test]
    fn test_partial_override() {
        let config = SimulationConfig::from_toml_str(
            r#"
            seed = 7

            [particles]
            count = 12
            light = { charge = -1.0, radius = 0.5 }

            [physics]
            thermal = 0.0
            mode = "serial"
            "#,
        )
        .unwrap();

        assert_eq!(config.seed, Some(7));
        assert_eq!(config.particles.count, 12);
        assert_eq!(config.particles.light.radius, 0.5);
        assert_eq!(config.particles.heavy, ClassParams::from(ChargeClass::HEAVY));
        assert_eq!(config.physics.thermal, 0.0);
        assert_eq!(config.physics.k, 100.0);
        assert_eq!(config.physics.mode, StepMode::Serial);
    }

    #[test]
    fn test_rejects_zero_count() {
        let err = SimulationConfig::from_toml_str("[particles]\ncount = 0").unwrap_err();
        assert!(matches!(err, ConfigError::NonPositiveCount));
    }

    #[test]
    fn test_rejects_negative_radius() {
        let err = SimulationConfig::from_toml_str(
            "[particles]\nheavy = { charge = 4.0, radius = -1.0 }",
        )
        .unwrap_err();
        assert!(matches!(err, ConfigError::NegativeRadius { .. }));
    }

    #[test]
    fn test_rejects_inverted_range() {
        let err = SimulationConfig::from_toml_str(
            "[particles]\nvelocity_range = { min = 1.0, max = -1.0 }",
        )
        .unwrap_err();
        assert!(matches!(
            err,
            ConfigError::InvalidRange {
                name: "velocity",
                ..
            }
        ));
    }

    #[test]
    fn test_rejects_bad_constants() {
        let mut physics = PhysicsParams::default();
        physics.friction = 1.5;
        assert!(physics.validate().is_err());

        let mut physics = PhysicsParams::default();
        physics.min_distance = 0.0;
        assert!(physics.validate().is_err());

        let mut physics = PhysicsParams::default();
        physics.thermal = -1.0;
        assert!(physics.validate().is_err());

        let driver = DriverParams {
            simulation_speed: f32::INFINITY,
            ..Default::default()
        };
        assert!(driver.validate().is_err());

        let err = SimulationConfig::from_toml_str("[particles]\nheavy_ratio = 2.0").unwrap_err();
        assert!(matches!(err, ConfigError::InvalidRatio(_)));
    }

    #[test]
    fn test_parse_error_is_reported() {
        let err = SimulationConfig::from_toml_str("[physics]\nk = \"lots\"").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn test_range_sampling_stays_inside() {
        use rand::{rngs::StdRng, SeedableRng};

        let range = ValueRange::new(-20.0, 20.0);
        let mut rng = StdRng::seed_from_u64(3);
        for _ in 0..1000 {
            assert!(range.contains(range.sample(&mut rng)));
        }
    }
}
