//! Dijkstra shortest path over a [`Roadmap`]
//!
//! Ties are broken deterministically: the frontier pops the lowest cost
//! first and, among equal costs, the lowest node index. A node's parent is
//! only replaced by a strictly cheaper route, so the first discovery wins.

use std::cmp::Reverse;
use std::collections::BinaryHeap;

use ordered_float::OrderedFloat;

use crate::path_planning::roadmap::Roadmap;

#[derive(Debug, Clone, PartialEq)]
pub struct ShortestPath {
    /// Node indices from source to target
    pub nodes: Vec<usize>,
    pub cost: f64,
}

/// Minimum-weight path from `source` to `target`, `None` when disconnected
pub fn shortest_path(roadmap: &Roadmap, source: usize, target: usize) -> Option<ShortestPath> {
    let n = roadmap.node_count();
    if source >= n || target >= n {
        return None;
    }

    let mut dist = vec![f64::INFINITY; n];
    let mut parent: Vec<Option<usize>> = vec![None; n];
    let mut closed = vec![false; n];
    let mut open_set = BinaryHeap::new();

    dist[source] = 0.0;
    open_set.push(Reverse((OrderedFloat(0.0), source)));

    while let Some(Reverse((OrderedFloat(cost), current))) = open_set.pop() {
        if closed[current] {
            continue;
        }
        closed[current] = true;

        if current == target {
            return Some(ShortestPath {
                nodes: reconstruct(&parent, target),
                cost,
            });
        }

        for &(next, weight) in roadmap.neighbors(current) {
            if closed[next] {
                continue;
            }
            let alt = cost + weight;
            if alt < dist[next] {
                dist[next] = alt;
                parent[next] = Some(current);
                open_set.push(Reverse((OrderedFloat(alt), next)));
            }
        }
    }

    None
}

fn reconstruct(parent: &[Option<usize>], target: usize) -> Vec<usize> {
    let mut nodes = vec![target];
    let mut current = target;
    while let Some(p) = parent[current] {
        nodes.push(p);
        current = p;
    }
    nodes.reverse();
    nodes
}

#[cfg(test)]
mod tests {
    use super::*;

    fn diamond() -> Roadmap {
        // 0 - 1 - 3 costs 2, 0 - 2 - 3 costs 3
        let mut roadmap = Roadmap::new(4);
        roadmap.add_edge(0, 1, 1.0);
        roadmap.add_edge(1, 3, 1.0);
        roadmap.add_edge(0, 2, 1.0);
        roadmap.add_edge(2, 3, 2.0);
        roadmap
    }

    #[test]
    fn test_picks_cheapest_route() {
        let path = shortest_path(&diamond(), 0, 3).unwrap();
        assert_eq!(path.nodes, vec![0, 1, 3]);
        assert_eq!(path.cost, 2.0);
    }

    #[test]
    fn test_prefers_cheap_detour_over_direct_edge() {
        let mut roadmap = diamond();
        roadmap.add_edge(0, 3, 5.0);
        assert_eq!(shortest_path(&roadmap, 0, 3).unwrap().nodes, vec![0, 1, 3]);
    }

    #[test]
    fn test_equal_costs_resolve_to_lowest_index() {
        let mut roadmap = Roadmap::new(4);
        roadmap.add_edge(0, 2, 1.0);
        roadmap.add_edge(0, 1, 1.0);
        roadmap.add_edge(2, 3, 1.0);
        roadmap.add_edge(1, 3, 1.0);
        assert_eq!(shortest_path(&roadmap, 0, 3).unwrap().nodes, vec![0, 1, 3]);
    }

    #[test]
    fn test_disconnected_goal() {
        let mut roadmap = Roadmap::new(4);
        roadmap.add_edge(0, 1, 1.0);
        roadmap.add_edge(1, 2, 1.0);
        assert_eq!(shortest_path(&roadmap, 0, 3), None);
    }

    #[test]
    fn test_source_is_target() {
        let path = shortest_path(&Roadmap::new(1), 0, 0).unwrap();
        assert_eq!(path.nodes, vec![0]);
        assert_eq!(path.cost, 0.0);
    }

    #[test]
    fn test_out_of_range_nodes() {
        assert_eq!(shortest_path(&Roadmap::new(2), 0, 5), None);
    }
}
