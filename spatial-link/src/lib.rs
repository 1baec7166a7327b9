//! # spatial-link
//!
//! Per-cycle spatial linking between two collections of detector objects
//! projected onto a 2-D (η, φ) surface.
//!
//! ## Overview
//!
//! One collection (**fields**, e.g. calorimeter clusters) is expanded into
//! weighted sample points called granules and indexed with a balanced
//! KD-tree. Every element of the other collection (**targets**, e.g. tracks
//! extrapolated to the calorimeter surface) is then searched with a box
//! window, and the hits are folded into a deduplicated link table.
//!
//! ```text
//! fields ──▶ GranuleStore ──▶ KdTree ──┐
//!                                       ├──▶ LinkSearch ──▶ aggregate ──▶ LinkTable
//! targets ─▶ GranuleStore ─────────────┘
//! ```
//!
//! Nothing is kept between cycles: `clear` drops the elements, the index
//! and the table.
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use spatial_link::{Linker, LinkerConfig};
//!
//! let mut linker = Linker::<Track, Cluster>::new(LinkerConfig::default())?;
//! let table = linker.run_cycle(tracks, clusters)?;
//!
//! for (track, links) in table.iter() {
//!     println!("{track}: {} clusters", links.len());
//! }
//! ```
//!
//! ## Coordinates
//!
//! - X: pseudorapidity η
//! - Y: azimuth φ, periodic over [-π, π) unless configured otherwise

#![warn(missing_docs)]

// Link deduplication and the link table
pub mod aggregate;

// YAML configuration
pub mod config;

// Points, boxes and the periodic axis
pub mod core;

pub mod error;

// Element traits and per-cycle arenas
pub mod granule;

// KD-tree over granules
pub mod index;

// Cycle state machine
pub mod linker;

// Window construction and index queries per target
pub mod search;

// Re-export commonly used types
pub use aggregate::{FieldLink, LinkTable};
pub use config::{ConfigError, ConfigLoadError, LinkerConfig};
pub use self::core::{Axis, Bounds, Periodicity, Point2D};
pub use error::{LinkError, Result};
pub use granule::{FieldId, Granule, GranuleSample, LinkField, LinkTarget, TargetId};
pub use index::KdTree;
pub use linker::{CycleStats, CyclePhase, Linker};
pub use search::{Candidate, LinkSearch};
