//! Spatial index over granule positions.
//!
//! A balanced, immutable KD-tree ([`KdTree`]) answering axis-aligned box
//! queries lazily ([`RangeQuery`]). It knows nothing about targets, fields
//! or wraparound; those live in the search stage.

mod kdtree;
mod node;
mod query;

pub use kdtree::KdTree;
pub use node::NodeRef;
pub use query::RangeQuery;
