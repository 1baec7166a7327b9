//! Linker configuration loaded from YAML.
//!
//! ```rust,ignore
//! use spatial_link::config::LinkerConfig;
//!
//! let config = LinkerConfig::from_yaml_file("configs/default.yaml")?;
//! let linker = Linker::<Track, Cluster>::new(config)?;
//! ```
//!
//! ## Example YAML
//!
//! ```yaml
//! search:
//!   resolution_x: 0.1
//!   resolution_y: 0.2
//! periodic:          # null disables wraparound
//!   axis: Y
//!   low: -3.141592653589793
//!   high: 3.141592653589793
//! index:
//!   leaf_size: 1
//! granules:
//!   min_fraction: 0.0001
//! ```

mod defaults;
mod error;
mod linker;

pub use error::{ConfigError, ConfigLoadError};
pub use linker::{GranuleConfig, IndexConfig, LinkerConfig, SearchConfig};
