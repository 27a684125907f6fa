//! Configuration errors
//!
//! The stepping logic itself cannot fail; everything that can go wrong is
//! caught when the configuration is loaded or the store is built.

use std::fmt;

#[derive(Debug)]
pub enum ConfigError {
    /// Particle count must be at least one
    NonPositiveCount,
    /// A particle class (or an explicitly supplied particle) has radius < 0
    NegativeRadius { what: &'static str, radius: f32 },
    /// `min > max` or a non-finite bound
    InvalidRange { name: &'static str, min: f32, max: f32 },
    /// Heavy-class ratio outside `[0, 1]`
    InvalidRatio(f32),
    /// A physics or driver constant is out of its admissible range
    InvalidConstant { name: &'static str, value: f32 },
    Io(std::io::Error),
    Parse(toml::de::Error),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NonPositiveCount => write!(f, "particle count must be positive"),
            Self::NegativeRadius { what, radius } => {
                write!(f, "{what} has negative radius {radius}")
            }
            Self::InvalidRange { name, min, max } => {
                write!(f, "invalid {name} range [{min}, {max}]")
            }
            Self::InvalidRatio(ratio) => {
                write!(f, "heavy ratio {ratio} is outside [0, 1]")
            }
            Self::InvalidConstant { name, value } => {
                write!(f, "invalid value {value} for `{name}`")
            }
            Self::Io(err) => write!(f, "failed to read configuration: {err}"),
            Self::Parse(err) => write!(f, "failed to parse configuration: {err}"),
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io(err) => Some(err),
            Self::Parse(err) => Some(err),
            _ => None,
        }
    }
}

impl From<std::io::Error> for ConfigError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err)
    }
}

impl From<toml::de::Error> for ConfigError {
    fn from(err: toml::de::Error) -> Self {
        Self::Parse(err)
    }
}
