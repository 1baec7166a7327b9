//! Final target → field association table.

use std::collections::BTreeMap;

use crate::granule::{FieldId, TargetId};

/// One distinct field linked to a target.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FieldLink {
    /// Linked field.
    pub field: FieldId,
    /// Sum of the weights of the field's granules inside the window.
    pub weight: f64,
    /// Number of those granules.
    pub granules: usize,
}

/// Deduplicated links of one cycle.
///
/// Rows exist only for targets with at least one link; each row lists
/// distinct fields in ascending [`FieldId`] order.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct LinkTable {
    rows: BTreeMap<TargetId, Vec<FieldLink>>,
    /// Field → targets, ascending.
    reverse: BTreeMap<FieldId, Vec<TargetId>>,
    link_count: usize,
}

impl LinkTable {
    /// Table with no links.
    pub fn new() -> Self {
        Self::default()
    }

    /// Build from rows already sorted and deduplicated.
    pub(crate) fn from_rows(rows: BTreeMap<TargetId, Vec<FieldLink>>) -> Self {
        let mut reverse: BTreeMap<FieldId, Vec<TargetId>> = BTreeMap::new();
        let mut link_count = 0;

        for (&target, links) in &rows {
            link_count += links.len();
            for link in links {
                reverse.entry(link.field).or_default().push(target);
            }
        }

        Self {
            rows,
            reverse,
            link_count,
        }
    }

    /// Links of `target`; empty when it has none.
    #[inline]
    pub fn fields_of(&self, target: TargetId) -> &[FieldLink] {
        self.rows.get(&target).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Targets linked to `field`, ascending; empty when none.
    #[inline]
    pub fn targets_of(&self, field: FieldId) -> &[TargetId] {
        self.reverse.get(&field).map(Vec::as_slice).unwrap_or(&[])
    }

    fn find(&self, target: TargetId, field: FieldId) -> Option<&FieldLink> {
        let row = self.rows.get(&target)?;
        row.binary_search_by_key(&field, |l| l.field)
            .ok()
            .map(|i| &row[i])
    }

    /// Whether `target` is linked to `field`.
    #[inline]
    pub fn contains(&self, target: TargetId, field: FieldId) -> bool {
        self.find(target, field).is_some()
    }

    /// Aggregated weight of a link.
    pub fn weight(&self, target: TargetId, field: FieldId) -> Option<f64> {
        self.find(target, field).map(|l| l.weight)
    }

    /// Highest-weight link of `target`. Ties go to the lowest field id.
    pub fn strongest(&self, target: TargetId) -> Option<&FieldLink> {
        self.fields_of(target).iter().fold(None, |best, link| match best {
            Some(b) if b.weight >= link.weight => Some(b),
            _ => Some(link),
        })
    }

    /// Rows in ascending target order.
    pub fn iter(&self) -> impl Iterator<Item = (TargetId, &[FieldLink])> {
        self.rows.iter().map(|(&t, links)| (t, links.as_slice()))
    }

    /// Number of linked targets.
    #[inline]
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Total number of (target, field) links.
    #[inline]
    pub fn link_count(&self) -> usize {
        self.link_count
    }

    /// No links at all.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}
