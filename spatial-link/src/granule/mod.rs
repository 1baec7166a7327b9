//! Granule store and element capability traits.
//!
//! Fields (coarse objects such as calorimeter clusters) are expanded into
//! [`Granule`]s, their weighted sample points, at insertion time. Targets
//! (e.g. extrapolated tracks) contribute a single query position.

mod store;
mod traits;

pub use store::{FieldId, Granule, GranuleStore, TargetId};
pub use traits::{GranuleSample, LinkField, LinkTarget};
