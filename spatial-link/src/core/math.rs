//! Angle wrapping helpers.
//!
//! Azimuthal coordinates live on a circle; everything the engine stores is
//! kept in a canonical half-open interval `[low, high)`.

use std::f64::consts::PI;

/// Wrap `value` into the half-open interval `[low, high)`.
///
/// Non-finite input is returned unchanged so callers can still reject it.
///
/// ```
/// use spatial_link::core::math::wrap_into;
/// use std::f64::consts::PI;
///
/// let wrapped = wrap_into(3.5 * PI, -PI, PI);
/// assert!((wrapped - (-0.5 * PI)).abs() < 1e-12);
/// ```
#[inline]
pub fn wrap_into(value: f64, low: f64, high: f64) -> f64 {
    if !value.is_finite() {
        return value;
    }
    if value >= low && value < high {
        return value;
    }
    let period = high - low;
    let wrapped = low + (value - low).rem_euclid(period);
    // rem_euclid can land exactly on `high` through rounding
    if wrapped >= high { low } else { wrapped }
}

/// Normalize an azimuth to `[-π, π)`.
///
/// ```
/// use spatial_link::core::math::normalize_phi;
/// use std::f64::consts::PI;
///
/// assert!((normalize_phi(PI) - (-PI)).abs() < 1e-12);
/// assert!((normalize_phi(0.5) - 0.5).abs() < 1e-12);
/// ```
#[inline]
pub fn normalize_phi(phi: f64) -> f64 {
    wrap_into(phi, -PI, PI)
}

/// Shortest signed azimuthal difference from `from` to `to`, in `[-π, π)`.
#[inline]
pub fn delta_phi(from: f64, to: f64) -> f64 {
    normalize_phi(to - from)
}
