//! The greedy spanner of Althöfer et al., a deterministic baseline.
//!
//! Edges are considered in ascending `(u, v)` order and kept only when the
//! spanner built so far cannot already connect their endpoints within the
//! stretch limit. Every edge is checked against a bounded BFS, so this is
//! much slower than clustering, but its output is deterministic and
//! satisfies the stretch bound by construction.

use tracing::debug;

use crate::{
    bfs::Bfs,
    graph::{Graph, GraphBuilder},
};

/// Returns a spanner of `graph` in which every edge of `graph` has stretch
/// at most `2k - 1`.
///
/// With `k == 0` nothing can satisfy the limit and every edge is kept.
pub fn build_greedy_spanner(graph: &Graph, k: u32) -> Graph {
    let nvertices = graph.nvertices();
    let stretch_limit = k.saturating_mul(2).saturating_sub(1);

    let mut spanner = GraphBuilder::new(nvertices);
    let mut bfs = Bfs::new(nvertices);
    for (u, v) in graph.edges() {
        if bfs.distance_limited(&spanner, u, v, stretch_limit).is_none() {
            spanner.add_edge(u, v);
        }
    }

    debug!(
        k,
        stretch_limit,
        nedges = graph.nedges(),
        nselected = spanner.nedges(),
        "greedy spanner"
    );
    spanner.build()
}

#[cfg(test)]
mod tests {
    use itertools::Itertools;

    use super::*;
    use crate::bfs::bfs_distance;
    use crate::erdos_renyi;

    fn complete(n: u32) -> Graph {
        Graph::from_edges(n as usize, (0..n).tuple_combinations()).unwrap()
    }

    #[test]
    fn path_is_its_own_spanner() {
        let g = Graph::from_edges(5, vec![(0, 1), (1, 2), (2, 3), (3, 4)]).unwrap();
        assert_eq!(build_greedy_spanner(&g, 2), g);
    }

    #[test]
    fn isolated_vertices_stay_edgeless() {
        assert_eq!(build_greedy_spanner(&Graph::empty(5), 2), Graph::empty(5));
        assert_eq!(build_greedy_spanner(&Graph::empty(0), 2), Graph::empty(0));
    }

    #[test]
    fn triangle_drops_closing_edge() {
        let g = complete(3);
        let h = build_greedy_spanner(&g, 2);
        assert_eq!(h.edges().collect::<Vec<_>>(), vec![(0, 1), (0, 2)]);
        assert_eq!(build_greedy_spanner(&g, 1), g);
    }

    #[test]
    fn complete_graph_becomes_star() {
        // after the edges at 0, every other pair is two hops apart
        let h = build_greedy_spanner(&complete(8), 2);
        assert_eq!(h.nedges(), 7);
        assert!(h.edges().all(|(u, _)| u == 0));
    }

    #[test]
    fn zero_k_keeps_everything() {
        let g = complete(5);
        assert_eq!(build_greedy_spanner(&g, 0), g);
    }

    #[test]
    fn huge_k_saturates_limit() {
        // the limit caps at u32::MAX instead of overflowing
        let g = complete(3);
        let h = build_greedy_spanner(&g, std::u32::MAX);
        assert_eq!(h.edges().collect::<Vec<_>>(), vec![(0, 1), (0, 2)]);
    }

    #[test]
    fn every_edge_within_stretch() {
        for seed in 0..5 {
            let g = erdos_renyi::generate(150, 0.06, seed).unwrap().graph;
            for k in 1..5 {
                let h = build_greedy_spanner(&g, k);
                assert!(h.is_subgraph_of(&g));
                for (u, v) in g.edges() {
                    let d = bfs_distance(&h, u, v).expect("connected");
                    assert!(d <= 2 * k - 1, "seed {} k {} edge ({}, {}) d {}", seed, k, u, v, d);
                }
            }
        }
    }

    #[test]
    fn only_exact_stretch_keeps_everything() {
        // a dense random graph has triangles, and a greedy spanner with
        // limit 3 or more has none
        let g = erdos_renyi::generate(150, 0.1, 1).unwrap().graph;
        assert_eq!(build_greedy_spanner(&g, 1), g);
        for k in 2..5 {
            assert!(build_greedy_spanner(&g, k).nedges() < g.nedges());
        }
    }
}
