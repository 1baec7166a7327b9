//! Per-cycle arenas for targets, fields and their granules.
//!
//! Granules refer to their owner through a [`FieldId`] handle into the
//! field arena, so the index and the element collections can be dropped
//! independently.

use std::fmt;

use log::{trace, warn};

use crate::config::GranuleConfig;
use crate::core::{Bounds, Periodicity, Point2D, SplitWindow};
use crate::error::{LinkError, Result};

use super::traits::{GranuleSample, LinkField, LinkTarget};

/// Handle of a target inserted this cycle.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TargetId(u32);

/// Handle of a field inserted this cycle.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct FieldId(u32);

macro_rules! arena_id {
    ($name:ident, $prefix:literal) => {
        impl $name {
            /// Handle for arena slot `index`.
            #[inline]
            pub fn new(index: usize) -> Self {
                Self(index as u32)
            }

            /// Arena slot.
            #[inline]
            pub fn index(self) -> usize {
                self.0 as usize
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, concat!($prefix, "{}"), self.0)
            }
        }
    };
}

arena_id!(TargetId, "T");
arena_id!(FieldId, "F");

/// Elementary weighted sample in the index.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Granule {
    /// Position on the linking surface (periodic axis already wrapped).
    pub position: Point2D,
    /// Non-negative weight.
    pub weight: f64,
    /// Owning field.
    pub owner: FieldId,
}

impl Granule {
    /// Create a granule.
    #[inline]
    pub fn new(position: Point2D, weight: f64, owner: FieldId) -> Self {
        Self {
            position,
            weight,
            owner,
        }
    }
}

/// Why a declared sample did not become a granule.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Rejection {
    NonFinitePosition,
    BadWeight,
    LowFraction,
    OutsideExtent,
}

/// Owns this cycle's targets, fields and granules.
pub struct GranuleStore<T, F> {
    targets: Vec<T>,
    /// Wrapped query position per target.
    target_positions: Vec<Option<Point2D>>,
    fields: Vec<F>,
    granules: Vec<Granule>,
    /// Fields that declared samples but contributed none.
    rejected: Vec<FieldId>,
    periodic: Option<Periodicity>,
    min_fraction: f64,
}

impl<T: LinkTarget, F: LinkField> GranuleStore<T, F> {
    /// Create an empty store.
    pub fn new(config: &GranuleConfig, periodic: Option<Periodicity>) -> Self {
        Self {
            targets: Vec::new(),
            target_positions: Vec::new(),
            fields: Vec::new(),
            granules: Vec::new(),
            rejected: Vec::new(),
            periodic,
            min_fraction: config.min_fraction,
        }
    }

    /// Store a query object.
    ///
    /// Fails with [`LinkError::InvalidGeometry`] for a non-finite position;
    /// the target is not stored in that case.
    pub fn insert_target(&mut self, target: T) -> Result<TargetId> {
        let slot = self.targets.len();
        let position = match target.link_position() {
            Some(p) if !p.is_finite() => {
                return Err(LinkError::invalid_geometry("target position", slot, p.x, p.y));
            }
            Some(p) => Some(self.wrap(p)),
            None => None,
        };

        self.targets.push(target);
        self.target_positions.push(position);
        Ok(TargetId::new(slot))
    }

    /// Expand a field into granules and store it.
    ///
    /// A field declaring no samples is accepted. A field whose samples are
    /// all invalid keeps its handle, is recorded in [`Self::rejected`], and
    /// the call returns [`LinkError::EmptyElement`].
    pub fn insert_field(&mut self, field: F) -> Result<FieldId> {
        let id = FieldId::new(self.fields.len());
        let extent = field.extent().map(|e| self.extent_boxes(e));
        let mut declared = 0usize;
        let mut accepted = 0usize;

        for sample in field.samples() {
            declared += 1;
            match self.accept(&sample, extent.as_ref()) {
                Ok(position) => {
                    self.granules.push(Granule::new(position, sample.weight(), id));
                    accepted += 1;
                }
                Err(reason) => {
                    trace!(
                        "[GranuleStore] {} dropped sample #{} at ({}, {}): {:?}",
                        id,
                        declared - 1,
                        sample.position.x,
                        sample.position.y,
                        reason
                    );
                }
            }
        }

        self.fields.push(field);

        if declared > 0 && accepted == 0 {
            warn!(
                "[GranuleStore] {} declared {} samples but none are valid; absent from index",
                id, declared
            );
            self.rejected.push(id);
            return Err(LinkError::EmptyElement { field: id, declared });
        }

        Ok(id)
    }

    fn accept(
        &self,
        sample: &GranuleSample,
        extent: Option<&SplitWindow>,
    ) -> std::result::Result<Point2D, Rejection> {
        if !sample.position.is_finite() {
            return Err(Rejection::NonFinitePosition);
        }
        let weight = sample.weight();
        if !weight.is_finite() || weight < 0.0 {
            return Err(Rejection::BadWeight);
        }
        if sample.fraction < self.min_fraction {
            return Err(Rejection::LowFraction);
        }
        let position = self.wrap(sample.position);
        if let Some(e) = extent {
            if !e.contains(position) {
                return Err(Rejection::OutsideExtent);
            }
        }
        Ok(position)
    }

    /// Declared extent in the same wrapped frame as the stored granules.
    fn extent_boxes(&self, extent: Bounds) -> SplitWindow {
        match &self.periodic {
            Some(periodic) => periodic.cover(extent),
            None => SplitWindow::one(extent),
        }
    }

    #[inline]
    fn wrap(&self, p: Point2D) -> Point2D {
        match &self.periodic {
            Some(periodic) => periodic.wrap(p),
            None => p,
        }
    }

    /// Drop everything from this cycle.
    pub fn clear(&mut self) {
        self.targets.clear();
        self.target_positions.clear();
        self.fields.clear();
        self.granules.clear();
        self.rejected.clear();
    }
}

impl<T, F> GranuleStore<T, F> {
    /// All granules in insertion order.
    #[inline]
    pub fn granules(&self) -> &[Granule] {
        &self.granules
    }

    /// Target by handle.
    #[inline]
    pub fn target(&self, id: TargetId) -> Option<&T> {
        self.targets.get(id.index())
    }

    pub(crate) fn target_mut(&mut self, id: TargetId) -> Option<&mut T> {
        self.targets.get_mut(id.index())
    }

    /// Wrapped query position of a target (`None` if it has none).
    #[inline]
    pub fn target_position(&self, id: TargetId) -> Option<Point2D> {
        self.target_positions.get(id.index()).copied().flatten()
    }

    /// Field by handle.
    #[inline]
    pub fn field(&self, id: FieldId) -> Option<&F> {
        self.fields.get(id.index())
    }

    /// Targets with their handles.
    pub fn targets(&self) -> impl Iterator<Item = (TargetId, &T)> {
        self.targets
            .iter()
            .enumerate()
            .map(|(i, t)| (TargetId::new(i), t))
    }

    /// Targets that have a query position, with that position.
    pub fn positioned_targets(&self) -> impl Iterator<Item = (TargetId, Point2D)> + '_ {
        self.target_positions
            .iter()
            .enumerate()
            .filter_map(|(i, p)| p.map(|p| (TargetId::new(i), p)))
    }

    /// Fields with their handles.
    pub fn fields(&self) -> impl Iterator<Item = (FieldId, &F)> {
        self.fields
            .iter()
            .enumerate()
            .map(|(i, f)| (FieldId::new(i), f))
    }

    /// Fields rejected with [`LinkError::EmptyElement`] this cycle.
    #[inline]
    pub fn rejected(&self) -> &[FieldId] {
        &self.rejected
    }

    /// Number of targets.
    #[inline]
    pub fn target_count(&self) -> usize {
        self.targets.len()
    }

    /// Number of fields (including rejected ones).
    #[inline]
    pub fn field_count(&self) -> usize {
        self.fields.len()
    }

    /// Number of granules.
    #[inline]
    pub fn granule_count(&self) -> usize {
        self.granules.len()
    }

    /// No targets, fields or granules.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.targets.is_empty() && self.fields.is_empty()
    }
}
