//! Periodic (wraparound) axis description.

use std::f64::consts::PI;

use serde::{Deserialize, Serialize};

use super::bounds::Bounds;
use super::math::wrap_into;
use super::point::{Axis, Point2D};

/// One axis of the surface that wraps around, e.g. φ over `[-π, π)`.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Periodicity {
    /// Which axis is periodic.
    pub axis: Axis,
    /// Inclusive lower edge of the canonical interval.
    pub low: f64,
    /// Exclusive upper edge of the canonical interval.
    pub high: f64,
}

impl Default for Periodicity {
    fn default() -> Self {
        Self::azimuth()
    }
}

impl Periodicity {
    /// Azimuth on the Y axis, wrapping at ±π.
    pub const fn azimuth() -> Self {
        Self {
            axis: Axis::Y,
            low: -PI,
            high: PI,
        }
    }

    /// Length of one period.
    #[inline]
    pub fn period(&self) -> f64 {
        self.high - self.low
    }

    /// Interval is finite and non-empty.
    #[inline]
    pub fn is_valid(&self) -> bool {
        self.low.is_finite() && self.high.is_finite() && self.high > self.low
    }

    /// Wrap the periodic coordinate of `point` into `[low, high)`.
    #[inline]
    pub fn wrap(&self, point: Point2D) -> Point2D {
        let v = point.coord(self.axis);
        point.with_coord(self.axis, wrap_into(v, self.low, self.high))
    }

    /// Split a window whose periodic extent may cross the seam.
    ///
    /// Returns one or two disjoint boxes whose periodic ranges lie inside
    /// `[low, high]`. A window at least one period wide collapses to a
    /// single box covering the full interval.
    pub fn split(&self, window: Bounds) -> SplitWindow {
        let axis = self.axis;
        let (lo, hi) = (window.lo(axis), window.hi(axis));

        if hi - lo >= self.period() {
            return SplitWindow::one(window.with_range(axis, self.low, self.high));
        }

        if lo < self.low {
            // spills below the seam: wrap the tail onto the upper end
            SplitWindow::two(
                window.with_range(axis, self.low, hi),
                window.with_range(axis, lo + self.period(), self.high),
            )
        } else if hi > self.high {
            SplitWindow::two(
                window.with_range(axis, lo, self.high),
                window.with_range(axis, self.low, hi - self.period()),
            )
        } else {
            SplitWindow::one(window)
        }
    }

    /// Canonical boxes covering `bounds` at any offset along the period.
    ///
    /// The periodic range is shifted so its lower edge lies in
    /// `[low, high)` and then split like [`Self::split`]. Wrapped points
    /// that fell inside `bounds` before wrapping fall inside the result.
    pub fn cover(&self, bounds: Bounds) -> SplitWindow {
        let axis = self.axis;
        let (lo, hi) = (bounds.lo(axis), bounds.hi(axis));
        if bounds.is_empty() || !lo.is_finite() || !hi.is_finite() {
            return SplitWindow::one(bounds);
        }

        let shifted = wrap_into(lo, self.low, self.high);
        self.split(bounds.with_range(axis, shifted, shifted + (hi - lo)))
    }
}

/// Up to two search boxes produced by [`Periodicity::split`].
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SplitWindow {
    boxes: [Bounds; 2],
    len: usize,
}

impl SplitWindow {
    /// A single box.
    #[inline]
    pub fn one(window: Bounds) -> Self {
        Self {
            boxes: [window, Bounds::empty()],
            len: 1,
        }
    }

    /// Two disjoint boxes.
    #[inline]
    pub fn two(first: Bounds, second: Bounds) -> Self {
        Self {
            boxes: [first, second],
            len: 2,
        }
    }

    /// The boxes as a slice.
    #[inline]
    pub fn as_slice(&self) -> &[Bounds] {
        &self.boxes[..self.len]
    }

    /// Any box contains `point` (inclusive edges).
    #[inline]
    pub fn contains(&self, point: Point2D) -> bool {
        self.as_slice().iter().any(|b| b.contains(point))
    }

    /// Number of boxes (1 or 2).
    #[inline]
    pub fn len(&self) -> usize {
        self.len
    }

    /// Always false; a split window holds at least one box.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }
}
