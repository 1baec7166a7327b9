//! Capability traits implemented by the host's detector objects.
//!
//! A new pair of detector subsystems is linked by implementing these two
//! traits; the tree and search code stay the same.
//!
//! # Example
//!
//! ```rust
//! use spatial_link::core::Point2D;
//! use spatial_link::granule::{GranuleSample, LinkField, LinkTarget};
//!
//! struct Track {
//!     impact: Option<Point2D>,
//! }
//!
//! impl LinkTarget for Track {
//!     fn link_position(&self) -> Option<Point2D> {
//!         self.impact
//!     }
//! }
//!
//! struct Cluster {
//!     hits: Vec<(Point2D, f64, f64)>, // position, energy, fraction
//! }
//!
//! impl LinkField for Cluster {
//!     fn samples(&self) -> impl Iterator<Item = GranuleSample> + '_ {
//!         self.hits
//!             .iter()
//!             .map(|&(p, e, f)| GranuleSample::with_fraction(p, e, f))
//!     }
//! }
//! ```

use crate::aggregate::FieldLink;
use crate::core::{Bounds, Point2D};

/// An object whose position drives a proximity search (e.g. a track
/// extrapolated to a calorimeter surface).
pub trait LinkTarget {
    /// Query position on the linking surface.
    ///
    /// `None` means the object does not reach the surface this cycle; it is
    /// kept but never searched.
    fn link_position(&self) -> Option<Point2D>;

    /// Receive this target's links when the cycle is published.
    ///
    /// Called once per target that found at least one partner. The default
    /// ignores the links; read them from the link table instead.
    fn record_links(&mut self, _links: &[FieldLink]) {}
}

/// A coarse object that owns weighted sample points (e.g. a cluster and its
/// rechits).
pub trait LinkField {
    /// Every sample this element declares.
    fn samples(&self) -> impl Iterator<Item = GranuleSample> + '_;

    /// Declared extent. Samples outside it are rejected at insertion.
    fn extent(&self) -> Option<Bounds> {
        None
    }
}

/// One weighted sample declared by a [`LinkField`].
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct GranuleSample {
    /// Sample position.
    pub position: Point2D,
    /// Raw energy (or any non-negative weight).
    pub energy: f64,
    /// Share of the energy attributed to the owning element.
    pub fraction: f64,
}

impl GranuleSample {
    /// Sample fully owned by its element.
    #[inline]
    pub fn new(position: Point2D, weight: f64) -> Self {
        Self::with_fraction(position, weight, 1.0)
    }

    /// Sample shared with other elements by `fraction`.
    #[inline]
    pub fn with_fraction(position: Point2D, energy: f64, fraction: f64) -> Self {
        Self {
            position,
            energy,
            fraction,
        }
    }

    /// Effective weight carried into the index (`energy * fraction`).
    #[inline]
    pub fn weight(&self) -> f64 {
        self.energy * self.fraction
    }
}
