//! Lifecycle controller.
//!
//! ```text
//! Empty ──insert──▶ ElementsInserted ──build──▶ IndexBuilt
//!                                                   │ search
//!                  Published ◀──publish── LinksSearched
//! ```
//!
//! `clear` returns to `Empty` from any phase. Calls out of this order fail
//! with [`LinkError::State`](crate::error::LinkError::State).

mod controller;
mod phase;
mod stats;

pub use controller::Linker;
pub use phase::CyclePhase;
pub use stats::CycleStats;
