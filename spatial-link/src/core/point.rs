//! Point and axis types for the projected detector surface.

use serde::{Deserialize, Serialize};

/// Axis of the 2-D linking plane.
///
/// `X` is conventionally the pseudorapidity (η) direction and `Y` the
/// azimuth (φ), but nothing in the engine depends on that reading.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Axis {
    /// First coordinate (η).
    X,
    /// Second coordinate (φ).
    Y,
}

impl Axis {
    /// Split axis for a given tree depth (X, Y, X, Y, ...).
    #[inline]
    pub fn for_depth(depth: usize) -> Self {
        if depth % 2 == 0 { Axis::X } else { Axis::Y }
    }
}

/// A position on the linking surface.
#[derive(Clone, Copy, Debug, PartialEq, Default, Serialize, Deserialize)]
pub struct Point2D {
    /// First coordinate (η).
    pub x: f64,
    /// Second coordinate (φ).
    pub y: f64,
}

impl Point2D {
    /// Origin.
    pub const ZERO: Point2D = Point2D { x: 0.0, y: 0.0 };

    /// Create a new point.
    #[inline]
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Coordinate along an axis.
    #[inline]
    pub fn coord(&self, axis: Axis) -> f64 {
        match axis {
            Axis::X => self.x,
            Axis::Y => self.y,
        }
    }

    /// Copy of this point with one coordinate replaced.
    #[inline]
    pub fn with_coord(self, axis: Axis, value: f64) -> Self {
        match axis {
            Axis::X => Self::new(value, self.y),
            Axis::Y => Self::new(self.x, value),
        }
    }

    /// Both coordinates are finite (no NaN, no infinity).
    #[inline]
    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }

    /// Component-wise minimum.
    #[inline]
    pub fn min(self, other: Self) -> Self {
        Self::new(self.x.min(other.x), self.y.min(other.y))
    }

    /// Component-wise maximum.
    #[inline]
    pub fn max(self, other: Self) -> Self {
        Self::new(self.x.max(other.x), self.y.max(other.y))
    }
}
