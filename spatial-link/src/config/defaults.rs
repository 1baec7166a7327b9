//! Default values for serde deserialization.

use crate::core::Periodicity;

pub fn resolution_x() -> f64 {
    0.1
}

pub fn resolution_y() -> f64 {
    0.2
}

pub fn periodic() -> Option<Periodicity> {
    Some(Periodicity::azimuth())
}

pub fn leaf_size() -> usize {
    1
}

// Samples carrying less than this share of their energy are ignored.
pub fn min_fraction() -> f64 {
    1e-4
}
