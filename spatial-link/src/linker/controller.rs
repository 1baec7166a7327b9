//! Per-cycle linker driving store, index, search and aggregation.

use std::time::Instant;

use log::debug;

use crate::aggregate::{aggregate, LinkTable};
use crate::config::LinkerConfig;
use crate::core::Bounds;
use crate::error::{LinkError, Result};
use crate::granule::{FieldId, GranuleStore, LinkField, LinkTarget, TargetId};
use crate::index::{KdTree, RangeQuery};
use crate::search::LinkSearch;

use super::phase::CyclePhase;
use super::stats::CycleStats;

/// Spatial linker for one pair of element types.
///
/// Each cycle runs `insert_* → build → search → publish`, then `clear`.
/// Nothing survives `clear`; the published table borrows the linker, so it
/// cannot outlive the cycle.
///
/// # Example
/// ```rust
/// use spatial_link::config::LinkerConfig;
/// use spatial_link::core::Point2D;
/// use spatial_link::granule::{FieldId, GranuleSample, LinkField, LinkTarget};
/// use spatial_link::linker::Linker;
///
/// struct Track(Point2D);
/// impl LinkTarget for Track {
///     fn link_position(&self) -> Option<Point2D> {
///         Some(self.0)
///     }
/// }
///
/// struct Cluster(Vec<GranuleSample>);
/// impl LinkField for Cluster {
///     fn samples(&self) -> impl Iterator<Item = GranuleSample> + '_ {
///         self.0.iter().copied()
///     }
/// }
///
/// let mut linker = Linker::new(LinkerConfig::with_resolution(0.1, 0.2)).unwrap();
/// let t = linker.insert_target(Track(Point2D::ZERO)).unwrap();
/// linker
///     .insert_field(Cluster(vec![GranuleSample::new(Point2D::new(0.05, 0.1), 2.0)]))
///     .unwrap();
/// linker
///     .insert_field(Cluster(vec![GranuleSample::new(Point2D::new(0.5, 0.5), 1.0)]))
///     .unwrap();
///
/// linker.build().unwrap();
/// linker.search().unwrap();
/// let table = linker.publish().unwrap();
///
/// assert_eq!(table.fields_of(t).len(), 1);
/// assert_eq!(table.fields_of(t)[0].field, FieldId::new(0));
/// assert_eq!(table.fields_of(t)[0].weight, 2.0);
/// ```
pub struct Linker<T, F> {
    config: LinkerConfig,
    store: GranuleStore<T, F>,
    search: LinkSearch,
    index: KdTree,
    links: LinkTable,
    phase: CyclePhase,
    stats: CycleStats,
}

impl<T: LinkTarget, F: LinkField> Linker<T, F> {
    /// Create a linker after validating `config`.
    pub fn new(config: LinkerConfig) -> Result<Self> {
        config.validate()?;

        Ok(Self {
            store: GranuleStore::new(&config.granules, config.periodic),
            search: LinkSearch::new(&config.search, config.periodic),
            index: KdTree::empty(),
            links: LinkTable::new(),
            phase: CyclePhase::Empty,
            stats: CycleStats::new(),
            config,
        })
    }

    /// Add a target to this cycle.
    pub fn insert_target(&mut self, target: T) -> Result<TargetId> {
        self.require("insert target", self.phase.accepts_elements())?;
        let id = self.store.insert_target(target)?;
        self.phase = CyclePhase::ElementsInserted;
        Ok(id)
    }

    /// Add a field to this cycle.
    ///
    /// On [`LinkError::EmptyElement`] the field is still stored and listed
    /// in [`Self::rejected_fields`]; the cycle may continue.
    pub fn insert_field(&mut self, field: F) -> Result<FieldId> {
        self.require("insert field", self.phase.accepts_elements())?;
        let result = self.store.insert_field(field);
        self.phase = CyclePhase::ElementsInserted;
        result
    }

    /// Build the index over every granule inserted so far.
    ///
    /// Allowed with nothing inserted; the index is then empty.
    pub fn build(&mut self) -> Result<()> {
        self.require("build", self.phase.accepts_elements())?;

        let start = Instant::now();
        self.index = KdTree::build(self.store.granules(), &self.config.index)?;
        self.stats.build_us = start.elapsed().as_micros() as u64;

        self.stats.targets = self.store.target_count();
        self.stats.positioned_targets = self.store.positioned_targets().count();
        self.stats.fields = self.store.field_count();
        self.stats.rejected_fields = self.store.rejected().len();
        self.stats.granules = self.index.len();

        self.phase = CyclePhase::IndexBuilt;
        debug!(
            "[Linker] index built: {} granules from {} fields ({} rejected) in {}µs",
            self.stats.granules, self.stats.fields, self.stats.rejected_fields, self.stats.build_us
        );
        Ok(())
    }

    /// Search every positioned target and aggregate the links.
    ///
    /// On error no links are kept and the phase stays `IndexBuilt`.
    pub fn search(&mut self) -> Result<()> {
        self.require("search", self.phase == CyclePhase::IndexBuilt)?;

        let start = Instant::now();
        let candidates = self
            .search
            .search(&self.index, self.store.positioned_targets())?;
        self.stats.search_us = start.elapsed().as_micros() as u64;
        self.stats.candidates = candidates.len();

        let start = Instant::now();
        self.links = aggregate(candidates);
        self.stats.aggregate_us = start.elapsed().as_micros() as u64;
        self.stats.links = self.links.link_count();
        self.stats.linked_targets = self.links.len();

        self.phase = CyclePhase::LinksSearched;
        debug!(
            "[Linker] searched {} targets: {} candidates, {} links in {}µs",
            self.stats.positioned_targets,
            self.stats.candidates,
            self.stats.links,
            self.stats.search_us + self.stats.aggregate_us
        );
        Ok(())
    }

    /// Hand each linked target its row and expose the table.
    pub fn publish(&mut self) -> Result<&LinkTable> {
        self.require("publish", self.phase == CyclePhase::LinksSearched)?;

        for (id, links) in self.links.iter() {
            if let Some(target) = self.store.target_mut(id) {
                target.record_links(links);
            }
        }

        self.phase = CyclePhase::Published;
        debug!(
            "[Linker] published {} links for {}/{} targets",
            self.stats.links, self.stats.linked_targets, self.stats.targets
        );
        Ok(&self.links)
    }

    /// Run a whole cycle: clear, insert, build, search, publish.
    ///
    /// Fields rejected with [`LinkError::EmptyElement`] are skipped; any
    /// other error aborts the cycle unpublished.
    pub fn run_cycle<IT, IF>(&mut self, targets: IT, fields: IF) -> Result<&LinkTable>
    where
        IT: IntoIterator<Item = T>,
        IF: IntoIterator<Item = F>,
    {
        self.clear();

        for target in targets {
            self.insert_target(target)?;
        }
        for field in fields {
            match self.insert_field(field) {
                Ok(_) => {}
                Err(e) if e.is_recoverable() => {}
                Err(e) => return Err(e),
            }
        }

        self.build()?;
        self.search()?;
        self.publish()
    }

    /// Drop every element, the index and the links.
    pub fn clear(&mut self) {
        self.store.clear();
        self.index = KdTree::empty();
        self.links = LinkTable::new();
        self.stats = CycleStats::new();
        self.phase = CyclePhase::Empty;
    }
}

impl<T, F> Linker<T, F> {
    fn require(&self, operation: &'static str, allowed: bool) -> Result<()> {
        if allowed {
            Ok(())
        } else {
            Err(LinkError::State {
                operation,
                phase: self.phase,
            })
        }
    }

    /// Raw box query against the built index.
    ///
    /// The window is used as given; it is not split at a periodic seam.
    pub fn query(&self, window: &Bounds) -> Result<RangeQuery<'_>> {
        self.require("query", self.phase.has_index())?;
        Ok(self.index.query(window))
    }

    /// The published table.
    pub fn link_table(&self) -> Result<&LinkTable> {
        self.require("read link table", self.phase == CyclePhase::Published)?;
        Ok(&self.links)
    }

    /// Current phase.
    #[inline]
    pub fn phase(&self) -> CyclePhase {
        self.phase
    }

    /// Configuration in use.
    #[inline]
    pub fn config(&self) -> &LinkerConfig {
        &self.config
    }

    /// Counters and timings of the current cycle.
    #[inline]
    pub fn stats(&self) -> &CycleStats {
        &self.stats
    }

    /// Index of the current cycle (empty before `build`).
    #[inline]
    pub fn index(&self) -> &KdTree {
        &self.index
    }

    /// Target by handle.
    #[inline]
    pub fn target(&self, id: TargetId) -> Option<&T> {
        self.store.target(id)
    }

    /// Field by handle.
    #[inline]
    pub fn field(&self, id: FieldId) -> Option<&F> {
        self.store.field(id)
    }

    /// Targets of this cycle.
    pub fn targets(&self) -> impl Iterator<Item = (TargetId, &T)> {
        self.store.targets()
    }

    /// Fields of this cycle.
    pub fn fields(&self) -> impl Iterator<Item = (FieldId, &F)> {
        self.store.fields()
    }

    /// Fields rejected this cycle for having no valid granules.
    #[inline]
    pub fn rejected_fields(&self) -> &[FieldId] {
        self.store.rejected()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::aggregate::FieldLink;
    use crate::core::Point2D;
    use crate::granule::GranuleSample;

    #[derive(Debug, Default)]
    struct Probe {
        at: Option<Point2D>,
        recorded: Vec<FieldLink>,
    }

    impl LinkTarget for Probe {
        fn link_position(&self) -> Option<Point2D> {
            self.at
        }

        fn record_links(&mut self, links: &[FieldLink]) {
            self.recorded = links.to_vec();
        }
    }

    struct Blob(Vec<GranuleSample>);

    impl LinkField for Blob {
        fn samples(&self) -> impl Iterator<Item = GranuleSample> + '_ {
            self.0.iter().copied()
        }
    }

    fn probe(x: f64, y: f64) -> Probe {
        Probe {
            at: Some(Point2D::new(x, y)),
            ..Probe::default()
        }
    }

    fn blob(points: &[(f64, f64, f64)]) -> Blob {
        Blob(
            points
                .iter()
                .map(|&(x, y, w)| GranuleSample::new(Point2D::new(x, y), w))
                .collect(),
        )
    }

    fn linker() -> Linker<Probe, Blob> {
        Linker::new(LinkerConfig::with_resolution(0.1, 0.2)).unwrap()
    }

    fn state_op(err: LinkError) -> (&'static str, CyclePhase) {
        match err {
            LinkError::State { operation, phase } => (operation, phase),
            other => panic!("expected state error, got {other:?}"),
        }
    }

    #[test]
    fn test_invalid_config_rejected() {
        let result = Linker::<Probe, Blob>::new(LinkerConfig::with_resolution(-0.1, 0.2));
        assert!(matches!(result, Err(LinkError::Config(_))));
    }

    #[test]
    fn test_phase_progression() {
        let mut l = linker();
        assert_eq!(l.phase(), CyclePhase::Empty);

        l.insert_target(probe(0.0, 0.0)).unwrap();
        assert_eq!(l.phase(), CyclePhase::ElementsInserted);

        l.build().unwrap();
        assert_eq!(l.phase(), CyclePhase::IndexBuilt);

        l.search().unwrap();
        assert_eq!(l.phase(), CyclePhase::LinksSearched);

        l.publish().unwrap();
        assert_eq!(l.phase(), CyclePhase::Published);

        l.clear();
        assert_eq!(l.phase(), CyclePhase::Empty);
    }

    #[test]
    fn test_out_of_sequence_calls() {
        let mut l = linker();
        assert_eq!(state_op(l.search().unwrap_err()), ("search", CyclePhase::Empty));
        assert_eq!(state_op(l.publish().unwrap_err()), ("publish", CyclePhase::Empty));
        assert!(l.link_table().is_err());
        assert!(l.query(&Bounds::from_extents(0.0, 1.0, 0.0, 1.0)).is_err());

        l.build().unwrap();
        assert_eq!(
            state_op(l.insert_target(probe(0.0, 0.0)).unwrap_err()),
            ("insert target", CyclePhase::IndexBuilt)
        );
        assert_eq!(
            state_op(l.insert_field(blob(&[(0.0, 0.0, 1.0)])).unwrap_err()),
            ("insert field", CyclePhase::IndexBuilt)
        );
        assert_eq!(state_op(l.build().unwrap_err()), ("build", CyclePhase::IndexBuilt));
        assert_eq!(
            state_op(l.publish().unwrap_err()),
            ("publish", CyclePhase::IndexBuilt)
        );

        l.search().unwrap();
        assert_eq!(
            state_op(l.search().unwrap_err()),
            ("search", CyclePhase::LinksSearched)
        );
        assert!(l.link_table().is_err());

        l.publish().unwrap();
        assert_eq!(
            state_op(l.publish().unwrap_err()),
            ("publish", CyclePhase::Published)
        );
        assert!(l.link_table().is_ok());
        assert!(l.query(&Bounds::from_extents(0.0, 1.0, 0.0, 1.0)).is_ok());
    }

    #[test]
    fn test_publish_records_links_on_targets() {
        let mut l = linker();
        let hit = l.insert_target(probe(0.0, 0.0)).unwrap();
        let miss = l.insert_target(probe(5.0, 0.0)).unwrap();
        let f = l.insert_field(blob(&[(0.05, 0.1, 2.0)])).unwrap();

        l.build().unwrap();
        l.search().unwrap();
        l.publish().unwrap();

        let recorded = &l.target(hit).unwrap().recorded;
        assert_eq!(recorded.len(), 1);
        assert_eq!(recorded[0].field, f);
        assert!(l.target(miss).unwrap().recorded.is_empty());
    }

    #[test]
    fn test_target_without_position_is_skipped() {
        let mut l = linker();
        let t = l.insert_target(Probe::default()).unwrap();
        l.insert_field(blob(&[(0.0, 0.0, 1.0)])).unwrap();

        l.build().unwrap();
        l.search().unwrap();
        let table = l.publish().unwrap();
        assert!(table.fields_of(t).is_empty());
        assert_eq!(l.stats().positioned_targets, 0);
    }

    #[test]
    fn test_empty_element_recorded_and_cycle_continues() {
        let mut l = linker();
        l.insert_target(probe(0.0, 0.0)).unwrap();
        let err = l
            .insert_field(blob(&[(f64::NAN, 0.0, 1.0), (0.0, 0.0, -1.0)]))
            .unwrap_err();
        assert!(err.is_recoverable());
        assert_eq!(l.phase(), CyclePhase::ElementsInserted);
        assert_eq!(l.rejected_fields(), &[FieldId::new(0)]);

        l.build().unwrap();
        assert_eq!(l.index().len(), 0);
        assert_eq!(l.stats().rejected_fields, 1);
    }

    #[test]
    fn test_invalid_target_keeps_phase() {
        let mut l = linker();
        let err = l.insert_target(probe(f64::NAN, 0.0)).unwrap_err();
        assert_eq!(err.code(), "INVALID_GEOMETRY");
        assert_eq!(l.phase(), CyclePhase::Empty);
        assert_eq!(l.targets().count(), 0);
    }

    #[test]
    fn test_stats_filled() {
        let mut l = linker();
        l.run_cycle(
            vec![probe(0.0, 0.0), probe(1.0, 1.0), Probe::default()],
            vec![
                blob(&[(0.0, 0.0, 1.0), (0.01, 0.0, 1.0)]),
                blob(&[(1.0, 1.0, 1.0)]),
            ],
        )
        .unwrap();

        let stats = l.stats();
        assert_eq!(stats.targets, 3);
        assert_eq!(stats.positioned_targets, 2);
        assert_eq!(stats.fields, 2);
        assert_eq!(stats.granules, 3);
        assert_eq!(stats.candidates, 3);
        assert_eq!(stats.links, 2);
        assert_eq!(stats.linked_targets, 2);
    }

    #[test]
    fn test_clear_resets_everything() {
        let mut l = linker();
        l.run_cycle(vec![probe(0.0, 0.0)], vec![blob(&[(0.0, 0.0, 1.0)])])
            .unwrap();
        assert_eq!(l.link_table().unwrap().len(), 1);

        l.clear();
        assert!(l.index().is_empty());
        assert_eq!(l.targets().count(), 0);
        assert_eq!(l.fields().count(), 0);
        assert_eq!(l.stats(), &CycleStats::new());
        assert!(l.link_table().is_err());
    }

    #[test]
    fn test_query_through_linker() {
        let mut l = linker();
        l.insert_field(blob(&[(0.0, 0.0, 1.0), (2.0, 2.0, 1.0)]))
            .unwrap();
        l.build().unwrap();

        let hits = l
            .query(&Bounds::from_extents(-0.5, 0.5, -0.5, 0.5))
            .unwrap()
            .count();
        assert_eq!(hits, 1);
    }
}
