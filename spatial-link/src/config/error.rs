//! Configuration validation and loading errors.

use crate::core::Axis;

/// A configuration value outside its allowed range.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ConfigError {
    /// Search half-width must be positive and finite.
    #[error("resolution_{axis} must be positive and finite, got {value}")]
    InvalidResolution {
        /// Axis name ("x" or "y").
        axis: &'static str,
        /// Offending value.
        value: f64,
    },

    /// Periodic interval must be finite with `high > low`.
    #[error("periodic interval on {axis:?} is invalid: [{low}, {high})")]
    InvalidPeriod {
        /// Periodic axis.
        axis: Axis,
        /// Lower edge.
        low: f64,
        /// Upper edge.
        high: f64,
    },

    /// Leaf bucket size must be at least one.
    #[error("leaf_size must be at least 1")]
    ZeroLeafSize,

    /// Fraction threshold must lie in `[0, 1]`.
    #[error("min_fraction must lie in [0, 1], got {0}")]
    InvalidFraction(f64),
}

/// Failure to load a configuration file.
#[derive(Debug, thiserror::Error)]
pub enum ConfigLoadError {
    /// I/O error reading the file.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// YAML parsing error.
    #[error("YAML parse error: {0}")]
    Parse(#[from] serde_yaml::Error),

    /// Parsed but failed validation.
    #[error("Config validation error: {0}")]
    Validation(#[from] ConfigError),
}
