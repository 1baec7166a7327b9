//! Cycle phases of the linker.

use std::fmt;

/// Where the linker is in its per-cycle sequence.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
pub enum CyclePhase {
    /// Nothing inserted yet (also after `clear`)
    #[default]
    Empty,

    /// Targets and/or fields inserted, no index yet
    ElementsInserted,

    /// Index built over the granules
    IndexBuilt,

    /// Candidates found and aggregated
    LinksSearched,

    /// Link table handed out
    Published,
}

impl CyclePhase {
    /// Phase name for logging
    pub fn name(&self) -> &'static str {
        match self {
            CyclePhase::Empty => "Empty",
            CyclePhase::ElementsInserted => "ElementsInserted",
            CyclePhase::IndexBuilt => "IndexBuilt",
            CyclePhase::LinksSearched => "LinksSearched",
            CyclePhase::Published => "Published",
        }
    }

    /// Elements may still be inserted.
    pub fn accepts_elements(&self) -> bool {
        matches!(self, CyclePhase::Empty | CyclePhase::ElementsInserted)
    }

    /// An index exists and can be queried.
    pub fn has_index(&self) -> bool {
        matches!(
            self,
            CyclePhase::IndexBuilt | CyclePhase::LinksSearched | CyclePhase::Published
        )
    }
}

impl fmt::Display for CyclePhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_phase_predicates() {
        assert!(CyclePhase::Empty.accepts_elements());
        assert!(CyclePhase::ElementsInserted.accepts_elements());
        assert!(!CyclePhase::IndexBuilt.accepts_elements());

        assert!(!CyclePhase::ElementsInserted.has_index());
        assert!(CyclePhase::Published.has_index());
    }

    #[test]
    fn test_display_matches_name() {
        assert_eq!(CyclePhase::LinksSearched.to_string(), "LinksSearched");
        assert_eq!(CyclePhase::default(), CyclePhase::Empty);
    }
}
