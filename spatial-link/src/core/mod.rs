//! Core geometric types shared by every stage of the linker.
//!
//! - [`Point2D`] and [`Axis`]: positions on the projected (η, φ) surface
//! - [`Bounds`]: axis-aligned boxes (KD node boxes and search windows)
//! - [`Periodicity`]: description of a wraparound axis and window splitting
//! - [`math`]: angle wrapping helpers

mod bounds;
pub mod math;
mod periodic;
mod point;

pub use bounds::Bounds;
pub use periodic::{Periodicity, SplitWindow};
pub use point::{Axis, Point2D};
