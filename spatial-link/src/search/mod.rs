//! Proximity search of targets against the granule index.
//!
//! For every positioned target a window is centered on it with the
//! configured half-widths. When a periodic axis is configured the window is
//! split at the seam into at most two disjoint boxes, so the tree itself
//! never has to know about wraparound. Every granule found produces one raw
//! [`Candidate`]; merging them is the aggregator's job.

use log::trace;

use crate::config::SearchConfig;
use crate::core::{Bounds, Periodicity, Point2D, SplitWindow};
use crate::error::{LinkError, Result};
use crate::granule::{FieldId, TargetId};
use crate::index::KdTree;

/// One granule hit for one target, before deduplication.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Candidate {
    /// Target whose window contained the granule.
    pub target: TargetId,
    /// Owner of the granule.
    pub field: FieldId,
    /// Granule weight.
    pub weight: f64,
}

/// Window construction and per-target index queries.
#[derive(Clone, Debug)]
pub struct LinkSearch {
    half_x: f64,
    half_y: f64,
    periodic: Option<Periodicity>,
}

impl LinkSearch {
    /// Create from half-widths and an optional periodic axis.
    pub fn new(config: &SearchConfig, periodic: Option<Periodicity>) -> Self {
        Self {
            half_x: config.resolution_x,
            half_y: config.resolution_y,
            periodic,
        }
    }

    /// Unsplit window centered on `center`.
    #[inline]
    pub fn window(&self, center: Point2D) -> Bounds {
        Bounds::around(center, self.half_x, self.half_y)
    }

    /// Boxes to query for a target at `center`.
    ///
    /// On a periodic axis `center` may lie outside the canonical interval;
    /// it is wrapped first. `index` is the target's slot and only used for
    /// error reporting.
    pub fn windows(&self, index: usize, center: Point2D) -> Result<SplitWindow> {
        let wrapped = match &self.periodic {
            Some(periodic) => periodic.wrap(center),
            None => center,
        };
        let window = self.window(wrapped);
        if !window.is_finite() {
            return Err(LinkError::invalid_geometry(
                "search window",
                index,
                center.x,
                center.y,
            ));
        }

        Ok(match &self.periodic {
            Some(periodic) => periodic.split(window),
            None => SplitWindow::one(window),
        })
    }

    /// Append the candidates of one target to `out`; returns how many.
    pub fn search_target(
        &self,
        tree: &KdTree,
        target: TargetId,
        center: Point2D,
        out: &mut Vec<Candidate>,
    ) -> Result<usize> {
        let before = out.len();
        let boxes = self.windows(target.index(), center)?;

        for window in boxes.as_slice() {
            out.extend(tree.query(window).map(|g| Candidate {
                target,
                field: g.owner,
                weight: g.weight,
            }));
        }

        let found = out.len() - before;
        trace!(
            "[LinkSearch] {} at ({:.4}, {:.4}): {} granules in {} box(es)",
            target,
            center.x,
            center.y,
            found,
            boxes.len()
        );
        Ok(found)
    }

    /// Search every target, in the given order.
    ///
    /// Stops at the first invalid window; nothing is returned in that case.
    pub fn search<I>(&self, tree: &KdTree, targets: I) -> Result<Vec<Candidate>>
    where
        I: IntoIterator<Item = (TargetId, Point2D)>,
    {
        let mut candidates = Vec::new();
        for (target, center) in targets {
            self.search_target(tree, target, center, &mut candidates)?;
        }
        Ok(candidates)
    }
}
