//! Axis-aligned bounding box on the linking surface.
//!
//! [`Bounds`] is both the KD-tree node box (pruning key) and the search
//! window handed to range queries.
//!
//! ```rust
//! use spatial_link::core::{Bounds, Point2D};
//!
//! let window = Bounds::around(Point2D::new(0.0, 0.0), 0.1, 0.2);
//! assert!(window.contains(Point2D::new(0.05, 0.1)));
//! assert!(!window.contains(Point2D::new(0.5, 0.5)));
//!
//! let mut extent = Bounds::empty();
//! extent.expand_to_include(Point2D::new(1.0, 1.0));
//! extent.expand_to_include(Point2D::new(-2.0, 3.0));
//! assert_eq!(extent.min, Point2D::new(-2.0, 1.0));
//! ```

use serde::{Deserialize, Serialize};

use super::point::{Axis, Point2D};

/// Axis-aligned bounding box, inclusive on all edges.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Bounds {
    /// Minimum corner.
    pub min: Point2D,
    /// Maximum corner.
    pub max: Point2D,
}

impl Default for Bounds {
    fn default() -> Self {
        Self::empty()
    }
}

impl Bounds {
    /// Create a box from its corners.
    #[inline]
    pub const fn new(min: Point2D, max: Point2D) -> Self {
        Self { min, max }
    }

    /// Create a box from explicit extents `(min_x, max_x, min_y, max_y)`.
    #[inline]
    pub const fn from_extents(min_x: f64, max_x: f64, min_y: f64, max_y: f64) -> Self {
        Self {
            min: Point2D::new(min_x, min_y),
            max: Point2D::new(max_x, max_y),
        }
    }

    /// Box centered on `center` with per-axis half-widths.
    #[inline]
    pub fn around(center: Point2D, half_x: f64, half_y: f64) -> Self {
        Self::from_extents(
            center.x - half_x,
            center.x + half_x,
            center.y - half_y,
            center.y + half_y,
        )
    }

    /// Empty (inverted) box that expands to fit the first point added.
    #[inline]
    pub fn empty() -> Self {
        Self {
            min: Point2D::new(f64::INFINITY, f64::INFINITY),
            max: Point2D::new(f64::NEG_INFINITY, f64::NEG_INFINITY),
        }
    }

    /// Degenerate box holding a single point.
    #[inline]
    pub fn from_point(point: Point2D) -> Self {
        Self {
            min: point,
            max: point,
        }
    }

    /// Tight box around a set of points. Empty input gives [`Bounds::empty`].
    pub fn from_points<I: IntoIterator<Item = Point2D>>(points: I) -> Self {
        let mut bounds = Self::empty();
        for p in points {
            bounds.expand_to_include(p);
        }
        bounds
    }

    /// True when min > max on either axis.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.min.x > self.max.x || self.min.y > self.max.y
    }

    /// All four extents are finite.
    #[inline]
    pub fn is_finite(&self) -> bool {
        self.min.is_finite() && self.max.is_finite()
    }

    /// Lower edge on an axis.
    #[inline]
    pub fn lo(&self, axis: Axis) -> f64 {
        self.min.coord(axis)
    }

    /// Upper edge on an axis.
    #[inline]
    pub fn hi(&self, axis: Axis) -> f64 {
        self.max.coord(axis)
    }

    /// Copy with the extent along `axis` replaced by `[lo, hi]`.
    #[inline]
    pub fn with_range(self, axis: Axis, lo: f64, hi: f64) -> Self {
        Self {
            min: self.min.with_coord(axis, lo),
            max: self.max.with_coord(axis, hi),
        }
    }

    /// Center of the box.
    #[inline]
    pub fn center(&self) -> Point2D {
        Point2D::new(
            (self.min.x + self.max.x) * 0.5,
            (self.min.y + self.max.y) * 0.5,
        )
    }

    /// Inclusive point containment.
    #[inline]
    pub fn contains(&self, point: Point2D) -> bool {
        point.x >= self.min.x
            && point.x <= self.max.x
            && point.y >= self.min.y
            && point.y <= self.max.y
    }

    /// `other` lies entirely inside this box.
    #[inline]
    pub fn contains_bounds(&self, other: &Bounds) -> bool {
        other.min.x >= self.min.x
            && other.max.x <= self.max.x
            && other.min.y >= self.min.y
            && other.max.y <= self.max.y
    }

    /// Boxes overlap (touching edges count).
    #[inline]
    pub fn intersects(&self, other: &Bounds) -> bool {
        self.min.x <= other.max.x
            && self.max.x >= other.min.x
            && self.min.y <= other.max.y
            && self.max.y >= other.min.y
    }

    /// Smallest box containing both.
    #[inline]
    pub fn union(&self, other: &Bounds) -> Self {
        if self.is_empty() {
            return *other;
        }
        if other.is_empty() {
            return *self;
        }
        Self {
            min: self.min.min(other.min),
            max: self.max.max(other.max),
        }
    }

    /// Grow to include a point.
    #[inline]
    pub fn expand_to_include(&mut self, point: Point2D) {
        self.min = self.min.min(point);
        self.max = self.max.max(point);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_around() {
        let b = Bounds::around(Point2D::new(1.0, 2.0), 0.5, 0.25);
        assert_eq!(b, Bounds::from_extents(0.5, 1.5, 1.75, 2.25));
        assert_eq!(b.center(), Point2D::new(1.0, 2.0));
    }

    #[test]
    fn test_empty() {
        let b = Bounds::empty();
        assert!(b.is_empty());
        assert!(!b.contains(Point2D::ZERO));
        assert!(!b.intersects(&Bounds::from_extents(-1.0, 1.0, -1.0, 1.0)));
    }

    #[test]
    fn test_contains_is_inclusive() {
        let b = Bounds::from_extents(0.0, 1.0, 0.0, 1.0);
        assert!(b.contains(Point2D::new(0.0, 0.0)));
        assert!(b.contains(Point2D::new(1.0, 1.0)));
        assert!(!b.contains(Point2D::new(1.0 + 1e-12, 0.5)));
    }

    #[test]
    fn test_intersects_touching_edges() {
        let a = Bounds::from_extents(0.0, 1.0, 0.0, 1.0);
        let b = Bounds::from_extents(1.0, 2.0, 0.5, 3.0);
        let c = Bounds::from_extents(1.5, 2.0, 0.0, 1.0);
        assert!(a.intersects(&b));
        assert!(!a.intersects(&c));
    }

    #[test]
    fn test_union_with_empty() {
        let a = Bounds::from_point(Point2D::new(1.0, 1.0));
        assert_eq!(a.union(&Bounds::empty()), a);
        assert_eq!(Bounds::empty().union(&a), a);

        let b = Bounds::from_point(Point2D::new(-1.0, 3.0));
        assert_eq!(a.union(&b), Bounds::from_extents(-1.0, 1.0, 1.0, 3.0));
    }

    #[test]
    fn test_from_points() {
        let b = Bounds::from_points([
            Point2D::new(0.5, -1.0),
            Point2D::new(-0.5, 2.0),
            Point2D::new(0.0, 0.0),
        ]);
        assert_eq!(b, Bounds::from_extents(-0.5, 0.5, -1.0, 2.0));
        assert!(Bounds::from_points(std::iter::empty()).is_empty());
    }

    #[test]
    fn test_with_range_and_contains_bounds() {
        let b = Bounds::from_extents(0.0, 1.0, 0.0, 1.0).with_range(Axis::Y, -1.0, 2.0);
        assert_eq!(b.lo(Axis::Y), -1.0);
        assert_eq!(b.hi(Axis::Y), 2.0);
        assert!(b.contains_bounds(&Bounds::from_extents(0.2, 0.8, -0.5, 1.5)));
        assert!(!b.contains_bounds(&Bounds::from_extents(0.2, 1.8, -0.5, 1.5)));
    }

    #[test]
    fn test_is_finite() {
        assert!(Bounds::from_extents(0.0, 1.0, 0.0, 1.0).is_finite());
        assert!(!Bounds::around(Point2D::new(f64::NAN, 0.0), 0.1, 0.1).is_finite());
    }
}
