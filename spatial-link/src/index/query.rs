//! Lazy box queries over a [`KdTree`].

use crate::core::Bounds;
use crate::granule::Granule;

use super::kdtree::KdTree;
use super::node::NodeKind;

/// Single-pass iterator over the granules inside a window.
///
/// Nodes whose box misses the window are pruned; a node whose box lies
/// entirely inside the window emits its whole payload slice without
/// further descent. Output order is depth-first left-to-right.
pub struct RangeQuery<'a> {
    tree: &'a KdTree,
    window: Bounds,
    stack: Vec<u32>,
    cursor: Option<Cursor>,
}

/// Position inside a payload slice being emitted.
struct Cursor {
    next: usize,
    end: usize,
    /// Slice box is inside the window; skip per-granule tests.
    inside: bool,
}

impl<'a> RangeQuery<'a> {
    pub(crate) fn new(tree: &'a KdTree, window: Bounds) -> Self {
        let mut stack = Vec::with_capacity(2 * tree.depth() + 2);
        if tree.root().is_some() && !window.is_empty() {
            stack.push(0);
        }
        Self {
            tree,
            window,
            stack,
            cursor: None,
        }
    }

    /// The query window.
    #[inline]
    pub fn window(&self) -> &Bounds {
        &self.window
    }
}

impl<'a> Iterator for RangeQuery<'a> {
    type Item = &'a Granule;

    fn next(&mut self) -> Option<Self::Item> {
        let tree: &'a KdTree = self.tree;
        let granules = tree.granules();
        let nodes = tree.nodes();

        loop {
            if let Some(cursor) = &mut self.cursor {
                while cursor.next < cursor.end {
                    let g = &granules[cursor.next];
                    cursor.next += 1;
                    if cursor.inside || self.window.contains(g.position) {
                        return Some(g);
                    }
                }
                self.cursor = None;
            }

            let node = &nodes[self.stack.pop()? as usize];
            if !self.window.intersects(&node.bounds) {
                continue;
            }

            let inside = self.window.contains_bounds(&node.bounds);
            match node.kind {
                NodeKind::Internal { left, right, .. } if !inside => {
                    self.stack.push(right);
                    self.stack.push(left);
                }
                _ => {
                    let range = node.range();
                    self.cursor = Some(Cursor {
                        next: range.start,
                        end: range.end,
                        inside,
                    });
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::IndexConfig;
    use crate::core::Point2D;
    use crate::granule::FieldId;

    fn tree_of(points: &[(f64, f64)]) -> KdTree {
        let granules: Vec<_> = points
            .iter()
            .enumerate()
            .map(|(i, &(x, y))| Granule::new(Point2D::new(x, y), 1.0, FieldId::new(i)))
            .collect();
        KdTree::build(&granules, &IndexConfig::default()).unwrap()
    }

    fn owners(query: RangeQuery<'_>) -> Vec<usize> {
        let mut v: Vec<_> = query.map(|g| g.owner.index()).collect();
        v.sort_unstable();
        v
    }

    #[test]
    fn test_query_finds_points_in_box() {
        let tree = tree_of(&[(0.0, 0.0), (1.0, 1.0), (2.0, 2.0), (3.0, 3.0), (0.5, 2.5)]);
        let hits = owners(tree.query(&Bounds::from_extents(0.5, 2.0, 0.5, 3.0)));
        assert_eq!(hits, vec![1, 2, 4]);
    }

    #[test]
    fn test_query_edges_inclusive() {
        let tree = tree_of(&[(1.0, 1.0), (2.0, 2.0)]);
        let hits = owners(tree.query(&Bounds::from_extents(1.0, 2.0, 1.0, 2.0)));
        assert_eq!(hits, vec![0, 1]);
    }

    #[test]
    fn test_query_no_results_far_away() {
        let tree = tree_of(&[(0.0, 0.0), (1.0, 0.0)]);
        assert_eq!(tree.query(&Bounds::from_extents(50.0, 51.0, 50.0, 51.0)).count(), 0);
    }

    #[test]
    fn test_query_empty_window() {
        let tree = tree_of(&[(0.0, 0.0)]);
        assert_eq!(tree.query(&Bounds::empty()).count(), 0);
    }

    #[test]
    fn test_query_covering_everything_in_leaf_order() {
        let tree = tree_of(&[(3.0, 3.0), (1.0, 1.0), (2.0, 2.0), (0.0, 0.0)]);
        let all: Vec<_> = tree
            .query(&Bounds::from_extents(-1.0, 4.0, -1.0, 4.0))
            .copied()
            .collect();
        assert_eq!(all, tree.granules());
        let xs: Vec<_> = all.iter().map(|g| g.position.x).collect();
        assert_eq!(xs, vec![0.0, 1.0, 2.0, 3.0]);
    }

    #[test]
    fn test_query_is_lazy() {
        let points: Vec<_> = (0..1000).map(|i| (i as f64, 0.0)).collect();
        let tree = tree_of(&points);
        let mut q = tree.query(&Bounds::from_extents(-1.0, 1000.0, -1.0, 1.0));
        assert_eq!(q.next().map(|g| g.position.x), Some(0.0));
        assert_eq!(q.next().map(|g| g.position.x), Some(1.0));
        assert_eq!(q.window().hi(crate::core::Axis::X), 1000.0);
    }

    #[test]
    fn test_query_matches_brute_force() {
        let points: Vec<_> = (0..400)
            .map(|i| (((i * 7919) % 211) as f64 * 0.1, ((i * 104729) % 199) as f64 * 0.1))
            .collect();
        let tree = tree_of(&points);

        for (x0, y0) in [(0.0, 0.0), (5.0, 5.0), (10.0, 2.0), (19.0, 18.0)] {
            let window = Bounds::from_extents(x0, x0 + 3.3, y0, y0 + 2.1);
            let expected: Vec<_> = points
                .iter()
                .enumerate()
                .filter(|(_, &(x, y))| window.contains(Point2D::new(x, y)))
                .map(|(i, _)| i)
                .collect();
            assert_eq!(owners(tree.query(&window)), expected);
        }
    }
}
