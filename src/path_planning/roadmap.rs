//! Roadmap graph and its PRM* construction
//!
//! Nodes are sample indices, edges are straight-line motions the
//! environment approved, weighted by joint-space Euclidean distance.

use itertools::Itertools;
use nalgebra::DVector;
use tracing::debug;

use crate::common::{JointConfiguration, PlanningEnvironment, RoboticsResult};
use crate::path_planning::spatial_index::{SpatialIndex, SpatialIndexKind};
use crate::path_planning::time_budget::TimeBudget;

/// Undirected weighted graph stored as adjacency lists
#[derive(Debug, Clone, Default)]
pub struct Roadmap {
    adjacency: Vec<Vec<(usize, f64)>>,
    edge_count: usize,
}

impl Roadmap {
    pub fn new(node_count: usize) -> Self {
        Roadmap {
            adjacency: vec![Vec::new(); node_count],
            edge_count: 0,
        }
    }

    pub fn node_count(&self) -> usize {
        self.adjacency.len()
    }

    pub fn edge_count(&self) -> usize {
        self.edge_count
    }

    /// Insert the undirected edge `a - b`
    pub fn add_edge(&mut self, a: usize, b: usize, weight: f64) {
        debug_assert!(a != b, "self loops are not roadmap edges");
        debug_assert!(weight >= 0.0, "edge weights are distances");
        self.adjacency[a].push((b, weight));
        self.adjacency[b].push((a, weight));
        self.edge_count += 1;
    }

    /// Neighbours of `node` in insertion order
    pub fn neighbors(&self, node: usize) -> &[(usize, f64)] {
        &self.adjacency[node]
    }

    pub fn degree(&self, node: usize) -> usize {
        self.adjacency[node].len()
    }

    pub fn edge_weight(&self, a: usize, b: usize) -> Option<f64> {
        self.adjacency
            .get(a)?
            .iter()
            .find(|(n, _)| *n == b)
            .map(|(_, w)| *w)
    }

    /// Every edge once, as `(low, high, weight)`
    #[cfg(test)]
    fn edges(&self) -> impl Iterator<Item = (usize, usize, f64)> + '_ {
        self.adjacency.iter().enumerate().flat_map(|(a, list)| {
            list.iter()
                .filter(move |(b, _)| a < *b)
                .map(move |&(b, w)| (a, b, w))
        })
    }
}

/// PRM* connection radius `gamma * (ln(n) / n)^(1/d)`
pub fn prm_star_radius(gamma: f64, node_count: usize, dimension: usize) -> f64 {
    if node_count < 2 {
        return 0.0;
    }
    let n = node_count as f64;
    gamma * (n.ln() / n).powf(1.0 / dimension.max(1) as f64)
}

/// What one construction pass produced
#[derive(Debug, Clone)]
pub struct BuildOutcome {
    pub roadmap: Roadmap,
    /// Radius actually used for every node
    pub radius: f64,
    pub nodes_processed: usize,
    pub motion_checks: usize,
    /// True when the time budget stopped the pass early
    pub interrupted: bool,
}

#[derive(Debug, Clone)]
pub struct RoadmapBuilder {
    /// Floor for the search radius
    pub connection_radius: f64,
    /// Scale of the PRM* radius term
    pub gamma: f64,
    /// Degree cap applied when a radius query returns too many candidates
    pub k_neighbors: usize,
    /// Node processing continues while more than this share of the budget remains
    pub stop_fraction: f64,
    pub index_kind: SpatialIndexKind,
}

impl RoadmapBuilder {
    pub fn effective_radius(&self, node_count: usize, dimension: usize) -> f64 {
        self.connection_radius
            .max(prm_star_radius(self.gamma, node_count, dimension))
    }

    /// Candidate neighbours of `node`, the node itself included.
    ///
    /// Falls back to the `k_neighbors + 1` nearest when the radius query is
    /// too crowded.
    pub fn candidates(&self, index: &dyn SpatialIndex, query: &DVector<f64>, radius: f64) -> Vec<usize> {
        let within = index.within_radius(query, radius);
        let cap = self.k_neighbors.saturating_add(1);
        if within.len() > cap {
            index
                .nearest(query, cap)
                .into_iter()
                .map(|(i, _)| i)
                .collect()
        } else {
            within
        }
    }

    /// Connect `samples` through the environment's motion check.
    ///
    /// Each unordered pair is checked at most once, from its lower index.
    /// Running out of budget is not an error: the partial roadmap is
    /// returned with `interrupted` set.
    pub fn build<E: PlanningEnvironment + ?Sized>(
        &self,
        samples: &[JointConfiguration],
        env: &E,
        budget: &TimeBudget,
    ) -> RoboticsResult<BuildOutcome> {
        let flat = samples.iter().map(JointConfiguration::flatten).collect_vec();
        let dimension = flat.first().map_or(0, |v| v.len());
        let radius = self.effective_radius(samples.len(), dimension);
        let index = self.index_kind.build(flat.clone());

        let mut roadmap = Roadmap::new(samples.len());
        let mut nodes_processed = 0;
        let mut motion_checks = 0;
        let mut interrupted = false;

        for (i, query) in flat.iter().enumerate() {
            if !budget.has_more_than(self.stop_fraction) {
                interrupted = true;
                break;
            }
            for j in self.candidates(index.as_ref(), query, radius) {
                if j <= i {
                    continue;
                }
                motion_checks += 1;
                if env.motion_valid(&samples[i], &samples[j])? {
                    roadmap.add_edge(i, j, samples[i].distance(&samples[j]));
                }
            }
            nodes_processed += 1;
        }

        debug!(
            radius,
            nodes_processed,
            motion_checks,
            edges = roadmap.edge_count(),
            interrupted,
            "roadmap construction finished"
        );

        Ok(BuildOutcome {
            roadmap,
            radius,
            nodes_processed,
            motion_checks,
            interrupted,
        })
    }
}
