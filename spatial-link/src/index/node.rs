//! KD-tree node storage and read-only node views.

use crate::core::{Axis, Bounds};
use crate::granule::Granule;

use super::kdtree::KdTree;

/// Node in the tree's arena.
///
/// Every node covers the contiguous payload range `start..end`; the
/// payload is laid out in depth-first left-to-right leaf order.
#[derive(Clone, Debug, PartialEq)]
pub(crate) struct KdNode {
    /// Exact box of the granules in `start..end`.
    pub bounds: Bounds,
    pub start: u32,
    pub end: u32,
    pub kind: NodeKind,
}

#[derive(Clone, Debug, PartialEq)]
pub(crate) enum NodeKind {
    Internal {
        axis: Axis,
        /// Largest coordinate on `axis` in the left subtree.
        split: f64,
        left: u32,
        right: u32,
    },
    Leaf,
}

impl KdNode {
    /// Placeholder overwritten once the children are built.
    pub fn pending() -> Self {
        Self {
            bounds: Bounds::empty(),
            start: 0,
            end: 0,
            kind: NodeKind::Leaf,
        }
    }

    #[inline]
    pub fn range(&self) -> std::ops::Range<usize> {
        self.start as usize..self.end as usize
    }
}

/// Read-only view of one tree node.
#[derive(Clone, Copy)]
pub struct NodeRef<'a> {
    tree: &'a KdTree,
    index: usize,
}

impl<'a> NodeRef<'a> {
    pub(crate) fn new(tree: &'a KdTree, index: usize) -> Self {
        Self { tree, index }
    }

    #[inline]
    fn node(&self) -> &'a KdNode {
        &self.tree.nodes()[self.index]
    }

    /// Box of every granule below this node.
    #[inline]
    pub fn bounds(&self) -> Bounds {
        self.node().bounds
    }

    /// True for leaves.
    #[inline]
    pub fn is_leaf(&self) -> bool {
        matches!(self.node().kind, NodeKind::Leaf)
    }

    /// Split axis and value of an internal node.
    pub fn split(&self) -> Option<(Axis, f64)> {
        match self.node().kind {
            NodeKind::Internal { axis, split, .. } => Some((axis, split)),
            NodeKind::Leaf => None,
        }
    }

    /// Left and right children of an internal node.
    pub fn children(&self) -> Option<(NodeRef<'a>, NodeRef<'a>)> {
        match self.node().kind {
            NodeKind::Internal { left, right, .. } => Some((
                NodeRef::new(self.tree, left as usize),
                NodeRef::new(self.tree, right as usize),
            )),
            NodeKind::Leaf => None,
        }
    }

    /// Granules in this node's subtree (the payload for a leaf).
    #[inline]
    pub fn granules(&self) -> &'a [Granule] {
        &self.tree.granules()[self.node().range()]
    }
}

impl std::fmt::Debug for NodeRef<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NodeRef")
            .field("index", &self.index)
            .field("bounds", &self.bounds())
            .field("leaf", &self.is_leaf())
            .field("granules", &self.granules().len())
            .finish()
    }
}
