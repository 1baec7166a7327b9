//! Main LinkerConfig and YAML loading.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::core::Periodicity;

use super::defaults;
use super::error::{ConfigError, ConfigLoadError};

/// Full linker configuration loaded from YAML.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct LinkerConfig {
    /// Search window settings
    #[serde(default)]
    pub search: SearchConfig,

    /// Wraparound axis. `None` (YAML `null`) disables wrapping.
    #[serde(default = "defaults::periodic")]
    pub periodic: Option<Periodicity>,

    /// KD-tree settings
    #[serde(default)]
    pub index: IndexConfig,

    /// Granule expansion settings
    #[serde(default)]
    pub granules: GranuleConfig,
}

impl Default for LinkerConfig {
    fn default() -> Self {
        Self {
            search: SearchConfig::default(),
            periodic: defaults::periodic(),
            index: IndexConfig::default(),
            granules: GranuleConfig::default(),
        }
    }
}

/// Search window half-widths, one per axis.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SearchConfig {
    /// Half-width along X (η)
    #[serde(default = "defaults::resolution_x")]
    pub resolution_x: f64,

    /// Half-width along Y (φ)
    #[serde(default = "defaults::resolution_y")]
    pub resolution_y: f64,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            resolution_x: defaults::resolution_x(),
            resolution_y: defaults::resolution_y(),
        }
    }
}

impl SearchConfig {
    /// Create with explicit half-widths.
    pub fn new(resolution_x: f64, resolution_y: f64) -> Self {
        Self {
            resolution_x,
            resolution_y,
        }
    }

    /// Check that both half-widths are positive and finite.
    pub fn validate(&self) -> Result<(), ConfigError> {
        for (axis, value) in [("x", self.resolution_x), ("y", self.resolution_y)] {
            if !(value.is_finite() && value > 0.0) {
                return Err(ConfigError::InvalidResolution { axis, value });
            }
        }
        Ok(())
    }
}

/// KD-tree construction settings.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct IndexConfig {
    /// Maximum granules per leaf. With 1 the tree depth is ⌈log2 n⌉.
    #[serde(default = "defaults::leaf_size")]
    pub leaf_size: usize,
}

impl Default for IndexConfig {
    fn default() -> Self {
        Self {
            leaf_size: defaults::leaf_size(),
        }
    }
}

/// Field-to-granule expansion settings.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct GranuleConfig {
    /// Samples with a smaller energy fraction are dropped.
    #[serde(default = "defaults::min_fraction")]
    pub min_fraction: f64,
}

impl Default for GranuleConfig {
    fn default() -> Self {
        Self {
            min_fraction: defaults::min_fraction(),
        }
    }
}

impl LinkerConfig {
    /// Configuration with the given search half-widths and defaults elsewhere.
    pub fn with_resolution(resolution_x: f64, resolution_y: f64) -> Self {
        Self {
            search: SearchConfig::new(resolution_x, resolution_y),
            ..Self::default()
        }
    }

    /// Builder-style setter for the periodic axis.
    pub fn with_periodic(mut self, periodic: Option<Periodicity>) -> Self {
        self.periodic = periodic;
        self
    }

    /// Builder-style setter for the KD leaf size.
    pub fn with_leaf_size(mut self, leaf_size: usize) -> Self {
        self.index.leaf_size = leaf_size;
        self
    }

    /// Builder-style setter for the minimum granule fraction.
    pub fn with_min_fraction(mut self, min_fraction: f64) -> Self {
        self.granules.min_fraction = min_fraction;
        self
    }

    /// Validate every section.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.search.validate()?;

        if let Some(p) = &self.periodic {
            if !p.is_valid() {
                return Err(ConfigError::InvalidPeriod {
                    axis: p.axis,
                    low: p.low,
                    high: p.high,
                });
            }
        }

        if self.index.leaf_size == 0 {
            return Err(ConfigError::ZeroLeafSize);
        }

        let f = self.granules.min_fraction;
        if !(0.0..=1.0).contains(&f) {
            return Err(ConfigError::InvalidFraction(f));
        }

        Ok(())
    }

    /// Load and validate a YAML file.
    pub fn from_yaml_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigLoadError> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_yaml_str(&contents)
    }

    /// Parse and validate a YAML string.
    pub fn from_yaml_str(yaml: &str) -> Result<Self, ConfigLoadError> {
        let config: LinkerConfig = serde_yaml::from_str(yaml)?;
        config.validate()?;
        Ok(config)
    }

    /// Serialize to a YAML string.
    pub fn to_yaml_string(&self) -> Result<String, serde_yaml::Error> {
        serde_yaml::to_string(self)
    }
}
