//! Candidate deduplication and link-table construction.
//!
//! Raw candidates from the search stage are grouped by target, then by
//! field. Weights are summed and contributing granules counted, so each
//! (target, field) pair appears once however many granules matched.

mod link_table;

pub use link_table::{FieldLink, LinkTable};

use std::collections::BTreeMap;

use log::debug;

use crate::granule::{FieldId, TargetId};
use crate::search::Candidate;

/// Fold raw candidates into a [`LinkTable`].
///
/// Targets without candidates get no row.
pub fn aggregate<I>(candidates: I) -> LinkTable
where
    I: IntoIterator<Item = Candidate>,
{
    let mut grouped: BTreeMap<TargetId, BTreeMap<FieldId, (f64, usize)>> = BTreeMap::new();
    let mut raw = 0usize;

    for c in candidates {
        raw += 1;
        let entry = grouped
            .entry(c.target)
            .or_default()
            .entry(c.field)
            .or_insert((0.0, 0));
        entry.0 += c.weight;
        entry.1 += 1;
    }

    let rows: BTreeMap<_, _> = grouped
        .into_iter()
        .map(|(target, fields)| {
            let links = fields
                .into_iter()
                .map(|(field, (weight, granules))| FieldLink {
                    field,
                    weight,
                    granules,
                })
                .collect::<Vec<_>>();
            (target, links)
        })
        .collect();

    let table = LinkTable::from_rows(rows);
    debug!(
        "[Aggregator] {} candidates -> {} links over {} targets",
        raw,
        table.link_count(),
        table.len()
    );
    table
}
