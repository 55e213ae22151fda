//! Nearest-neighbour queries over flattened joint configurations
//!
//! All implementations share one metric: the Euclidean norm over the
//! `3 * robot_count` dimensional flattened vectors.

use nalgebra::DVector;
use ordered_float::OrderedFloat;
use serde::{Deserialize, Serialize};

use crate::path_planning::kd_tree::KdTree;

/// Radius and k-nearest queries over a fixed point set
pub trait SpatialIndex {
    /// Number of indexed points
    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Indices of every point within `radius` of `query` (inclusive), in
    /// increasing index order
    fn within_radius(&self, query: &DVector<f64>, radius: f64) -> Vec<usize>;

    /// The `k` closest points as `(index, distance)`, by increasing distance
    /// and then increasing index
    fn nearest(&self, query: &DVector<f64>, k: usize) -> Vec<(usize, f64)>;
}

/// Which index the roadmap builder should construct
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SpatialIndexKind {
    #[default]
    KdTree,
    Linear,
}

impl SpatialIndexKind {
    pub fn build(self, points: Vec<DVector<f64>>) -> Box<dyn SpatialIndex> {
        match self {
            SpatialIndexKind::KdTree => Box::new(KdTree::new(points)),
            SpatialIndexKind::Linear => Box::new(LinearIndex::new(points)),
        }
    }
}

pub(crate) fn squared_distance(a: &DVector<f64>, b: &DVector<f64>) -> f64 {
    a.iter().zip(b.iter()).map(|(x, y)| (x - y).powi(2)).sum()
}

/// Brute-force scan; exact and fast enough for small roadmaps
pub struct LinearIndex {
    points: Vec<DVector<f64>>,
}

impl LinearIndex {
    pub fn new(points: Vec<DVector<f64>>) -> Self {
        LinearIndex { points }
    }
}

impl SpatialIndex for LinearIndex {
    fn len(&self) -> usize {
        self.points.len()
    }

    fn within_radius(&self, query: &DVector<f64>, radius: f64) -> Vec<usize> {
        if radius < 0.0 {
            return Vec::new();
        }
        let r2 = radius * radius;
        self.points
            .iter()
            .enumerate()
            .filter(|(_, p)| squared_distance(query, p) <= r2)
            .map(|(i, _)| i)
            .collect()
    }

    fn nearest(&self, query: &DVector<f64>, k: usize) -> Vec<(usize, f64)> {
        let mut distances: Vec<(OrderedFloat<f64>, usize)> = self
            .points
            .iter()
            .enumerate()
            .map(|(i, p)| (OrderedFloat(squared_distance(query, p)), i))
            .collect();

        distances.sort();
        distances.truncate(k);
        distances.into_iter().map(|(d2, i)| (i, d2.0.sqrt())).collect()
    }
}
