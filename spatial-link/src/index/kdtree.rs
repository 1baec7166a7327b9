//! Balanced 2-D KD-tree over granule positions.
//!
//! # Algorithm
//!
//! 1. Validate every coordinate (non-finite input is rejected up front)
//! 2. Recursively partition at the median along X at even depths and Y at
//!    odd depths; the left child receives ⌈n/2⌉ granules
//! 3. Median selection is linear (`select_nth_unstable_by`) over the total
//!    order `(coordinate, insertion index)`, so equal coordinates are
//!    ordered by insertion and the tree is reproducible
//! 4. Node boxes are computed bottom-up as the union of the children
//!
//! Nodes live in a flat arena and refer to their children by index. The
//! granules are copied into a payload buffer in depth-first left-to-right
//! leaf order, so every subtree owns one contiguous slice of it.
//!
//! # Performance
//!
//! - Build: O(n log n)
//! - Box query: O(√n + k) for small windows, O(n) when the window covers
//!   most of the extent
//! - Memory: ~2n nodes with leaf size 1

use log::debug;

use crate::config::IndexConfig;
use crate::core::{Axis, Bounds};
use crate::error::{LinkError, Result};
use crate::granule::Granule;

use super::node::{KdNode, NodeKind, NodeRef};
use super::query::RangeQuery;

/// Immutable KD-tree built once per cycle.
///
/// # Example
/// ```rust
/// use spatial_link::config::IndexConfig;
/// use spatial_link::core::{Bounds, Point2D};
/// use spatial_link::granule::{FieldId, Granule};
/// use spatial_link::index::KdTree;
///
/// let granules = vec![
///     Granule::new(Point2D::new(0.05, 0.1), 2.0, FieldId::new(0)),
///     Granule::new(Point2D::new(0.5, 0.5), 1.0, FieldId::new(1)),
/// ];
/// let tree = KdTree::build(&granules, &IndexConfig::default()).unwrap();
///
/// let hits: Vec<_> = tree
///     .query(&Bounds::from_extents(-0.1, 0.1, -0.2, 0.2))
///     .collect();
/// assert_eq!(hits.len(), 1);
/// assert_eq!(hits[0].owner, FieldId::new(0));
/// ```
#[derive(Clone, Debug, PartialEq)]
pub struct KdTree {
    nodes: Vec<KdNode>,
    /// Granules in leaf order.
    granules: Vec<Granule>,
    depth: usize,
    leaf_size: usize,
}

impl KdTree {
    /// Tree with no granules; every query yields nothing.
    pub fn empty() -> Self {
        Self {
            nodes: Vec::new(),
            granules: Vec::new(),
            depth: 0,
            leaf_size: 1,
        }
    }

    /// Build a tree from granules in insertion order.
    ///
    /// # Errors
    /// [`LinkError::InvalidGeometry`] if any position is NaN or infinite.
    pub fn build(granules: &[Granule], config: &IndexConfig) -> Result<Self> {
        if let Some((i, g)) = granules
            .iter()
            .enumerate()
            .find(|(_, g)| !g.position.is_finite())
        {
            return Err(LinkError::invalid_geometry(
                "kd build",
                i,
                g.position.x,
                g.position.y,
            ));
        }

        let leaf_size = config.leaf_size.max(1);
        if granules.is_empty() {
            return Ok(Self {
                leaf_size,
                ..Self::empty()
            });
        }

        let mut order: Vec<u32> = (0..granules.len() as u32).collect();
        let mut builder = Builder {
            source: granules,
            nodes: Vec::with_capacity(2 * granules.len() / leaf_size + 1),
            leaf_size,
            depth: 0,
        };
        builder.build_node(&mut order, 0, 0);

        let Builder { nodes, depth, .. } = builder;
        let payload = order.iter().map(|&i| granules[i as usize]).collect();

        debug!(
            "[KdTree] built {} granules into {} nodes (depth {}, leaf size {})",
            granules.len(),
            nodes.len(),
            depth,
            leaf_size
        );

        Ok(Self {
            nodes,
            granules: payload,
            depth,
            leaf_size,
        })
    }

    /// Lazily iterate the granules inside `window` (inclusive edges).
    ///
    /// Order is depth-first left-to-right, not by distance.
    #[inline]
    pub fn query(&self, window: &Bounds) -> RangeQuery<'_> {
        RangeQuery::new(self, *window)
    }

    /// Root node, `None` for an empty tree.
    #[inline]
    pub fn root(&self) -> Option<NodeRef<'_>> {
        (!self.nodes.is_empty()).then(|| NodeRef::new(self, 0))
    }

    /// Number of granules.
    #[inline]
    pub fn len(&self) -> usize {
        self.granules.len()
    }

    /// True when built from no granules.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.granules.is_empty()
    }

    /// Edges from the root to the deepest leaf.
    #[inline]
    pub fn depth(&self) -> usize {
        self.depth
    }

    /// Number of nodes (internal and leaf).
    #[inline]
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Maximum granules per leaf used at build.
    #[inline]
    pub fn leaf_size(&self) -> usize {
        self.leaf_size
    }

    /// Box of every indexed granule (empty for an empty tree).
    #[inline]
    pub fn bounds(&self) -> Bounds {
        self.nodes.first().map_or_else(Bounds::empty, |n| n.bounds)
    }

    /// Granules in leaf order.
    #[inline]
    pub fn granules(&self) -> &[Granule] {
        &self.granules
    }

    #[inline]
    pub(crate) fn nodes(&self) -> &[KdNode] {
        &self.nodes
    }
}

impl Default for KdTree {
    fn default() -> Self {
        Self::empty()
    }
}

struct Builder<'a> {
    source: &'a [Granule],
    nodes: Vec<KdNode>,
    leaf_size: usize,
    depth: usize,
}

impl Builder<'_> {
    /// Build the subtree over `slice`, whose payload starts at `offset`.
    /// Returns the node's arena index.
    fn build_node(&mut self, slice: &mut [u32], offset: usize, depth: usize) -> u32 {
        let index = self.nodes.len();
        self.nodes.push(KdNode::pending());
        self.depth = self.depth.max(depth);

        let start = offset as u32;
        let end = (offset + slice.len()) as u32;

        if slice.len() <= self.leaf_size {
            let bounds = Bounds::from_points(
                slice
                    .iter()
                    .map(|&i| self.source[i as usize].position),
            );
            self.nodes[index] = KdNode {
                bounds,
                start,
                end,
                kind: NodeKind::Leaf,
            };
            return index as u32;
        }

        let axis = Axis::for_depth(depth);
        let mid = slice.len().div_ceil(2);
        let source = self.source;
        let key = |i: u32| source[i as usize].position.coord(axis);

        slice.select_nth_unstable_by(mid - 1, |&a, &b| {
            key(a).total_cmp(&key(b)).then(a.cmp(&b))
        });
        let split = key(slice[mid - 1]);

        let (lower, upper) = slice.split_at_mut(mid);
        let left = self.build_node(lower, offset, depth + 1);
        let right = self.build_node(upper, offset + mid, depth + 1);

        let bounds = self.nodes[left as usize]
            .bounds
            .union(&self.nodes[right as usize].bounds);
        self.nodes[index] = KdNode {
            bounds,
            start,
            end,
            kind: NodeKind::Internal {
                axis,
                split,
                left,
                right,
            },
        };
        index as u32
    }
}
