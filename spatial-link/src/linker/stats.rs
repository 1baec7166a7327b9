//! Per-cycle counters and stage timings.

/// Counts and timings of the current cycle.
///
/// Reset by `clear`. Timings are wall-clock microseconds.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct CycleStats {
    /// Targets inserted.
    pub targets: usize,
    /// Targets with a query position.
    pub positioned_targets: usize,
    /// Fields inserted (including rejected ones).
    pub fields: usize,
    /// Fields rejected with no valid granules.
    pub rejected_fields: usize,
    /// Granules in the index.
    pub granules: usize,
    /// Raw candidates before aggregation.
    pub candidates: usize,
    /// Distinct (target, field) links.
    pub links: usize,
    /// Targets with at least one link.
    pub linked_targets: usize,
    /// Time spent building the index (µs).
    pub build_us: u64,
    /// Time spent searching (µs).
    pub search_us: u64,
    /// Time spent aggregating (µs).
    pub aggregate_us: u64,
}

impl CycleStats {
    /// Create zeroed stats.
    pub fn new() -> Self {
        Self::default()
    }

    /// Build + search + aggregate time.
    pub fn total_us(&self) -> u64 {
        self.build_us + self.search_us + self.aggregate_us
    }

    /// Fraction of positioned targets that found a link.
    pub fn link_rate(&self) -> f64 {
        if self.positioned_targets == 0 {
            0.0
        } else {
            self.linked_targets as f64 / self.positioned_targets as f64
        }
    }
}
