//! k-d tree over flattened joint configurations
//!
//! Built once from the full sample set with median splits cycling through
//! the dimensions. Queries return exactly what [`LinearIndex`] returns,
//! including tie order.
//!
//! [`LinearIndex`]: crate::path_planning::spatial_index::LinearIndex

use std::collections::BinaryHeap;

use nalgebra::DVector;
use ordered_float::OrderedFloat;

use crate::path_planning::spatial_index::{squared_distance, SpatialIndex};

#[derive(Debug, Clone)]
struct KdNode {
    point: usize,
    axis: usize,
    left: Option<usize>,
    right: Option<usize>,
}

pub struct KdTree {
    points: Vec<DVector<f64>>,
    nodes: Vec<KdNode>,
    root: Option<usize>,
}

impl KdTree {
    pub fn new(points: Vec<DVector<f64>>) -> Self {
        let dim = points.first().map_or(0, |p| p.len());
        let mut order: Vec<usize> = (0..points.len()).collect();
        let mut nodes = Vec::with_capacity(points.len());
        let root = if dim == 0 {
            None
        } else {
            build(&points, &mut order, 0, dim, &mut nodes)
        };
        KdTree { points, nodes, root }
    }

    /// Depth of the deepest leaf, 0 for an empty tree
    #[cfg(test)]
    fn depth(&self) -> usize {
        fn walk(nodes: &[KdNode], node: Option<usize>) -> usize {
            match node {
                None => 0,
                Some(n) => 1 + walk(nodes, nodes[n].left).max(walk(nodes, nodes[n].right)),
            }
        }
        walk(&self.nodes, self.root)
    }

    fn radius_search(&self, node: Option<usize>, query: &DVector<f64>, r2: f64, out: &mut Vec<usize>) {
        let Some(n) = node else { return };
        let KdNode { point, axis, left, right } = self.nodes[n];

        if squared_distance(query, &self.points[point]) <= r2 {
            out.push(point);
        }

        let diff = query[axis] - self.points[point][axis];
        let (near, far) = if diff < 0.0 { (left, right) } else { (right, left) };
        self.radius_search(near, query, r2, out);
        if diff * diff <= r2 {
            self.radius_search(far, query, r2, out);
        }
    }

    fn knn_search(
        &self,
        node: Option<usize>,
        query: &DVector<f64>,
        k: usize,
        best: &mut BinaryHeap<(OrderedFloat<f64>, usize)>,
    ) {
        let Some(n) = node else { return };
        let KdNode { point, axis, left, right } = self.nodes[n];

        let candidate = (OrderedFloat(squared_distance(query, &self.points[point])), point);
        if best.len() < k {
            best.push(candidate);
        } else if best.peek().map_or(false, |worst| candidate < *worst) {
            best.pop();
            best.push(candidate);
        }

        let diff = query[axis] - self.points[point][axis];
        let (near, far) = if diff < 0.0 { (left, right) } else { (right, left) };
        self.knn_search(near, query, k, best);

        // `<=` keeps equal-distance points with a lower index reachable
        let worth_visiting = best.len() < k
            || best.peek().map_or(true, |worst| OrderedFloat(diff * diff) <= worst.0);
        if worth_visiting {
            self.knn_search(far, query, k, best);
        }
    }
}

fn build(
    points: &[DVector<f64>],
    order: &mut [usize],
    depth: usize,
    dim: usize,
    nodes: &mut Vec<KdNode>,
) -> Option<usize> {
    if order.is_empty() {
        return None;
    }
    let axis = depth % dim;
    let mid = order.len() / 2;
    order.select_nth_unstable_by(mid, |&a, &b| {
        points[a][axis].total_cmp(&points[b][axis]).then(a.cmp(&b))
    });

    let (lower, rest) = order.split_at_mut(mid);
    let (pivot, upper) = rest.split_first_mut()?;

    let slot = nodes.len();
    nodes.push(KdNode {
        point: *pivot,
        axis,
        left: None,
        right: None,
    });
    let left = build(points, lower, depth + 1, dim, nodes);
    let right = build(points, upper, depth + 1, dim, nodes);
    nodes[slot].left = left;
    nodes[slot].right = right;
    Some(slot)
}

impl SpatialIndex for KdTree {
    fn len(&self) -> usize {
        self.points.len()
    }

    fn within_radius(&self, query: &DVector<f64>, radius: f64) -> Vec<usize> {
        let mut found = Vec::new();
        if radius >= 0.0 {
            self.radius_search(self.root, query, radius * radius, &mut found);
        }
        found.sort_unstable();
        found
    }

    fn nearest(&self, query: &DVector<f64>, k: usize) -> Vec<(usize, f64)> {
        if k == 0 {
            return Vec::new();
        }
        let mut best = BinaryHeap::with_capacity(k.min(self.len()));
        self.knn_search(self.root, query, k, &mut best);
        best.into_sorted_vec()
            .into_iter()
            .map(|(d2, i)| (i, d2.0.sqrt()))
            .collect()
    }
}
