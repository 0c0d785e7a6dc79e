//! Randomized (2k-1)-spanners via the multiphase clustering of
//! Baswana and Sen.
//!
//! Every vertex starts in its own cluster. In each of the phases `1..k`
//! every cluster survives independently with probability `n^(-1/k)`;
//! surviving clusters annex the neighboring vertices of clusters that
//! did not survive, and everything left over becomes a singleton. Edges
//! between distinct clusters go into the spanner after each phase, and a
//! final pass over the last partition picks up whatever cross-cluster
//! edges remain.
//!
//! Each annexed vertex is also joined to its new cluster through the edge
//! it was claimed by, so a cluster formed in phase `i` is connected in the
//! spanner with radius at most `i`. Two endpoints of an edge that end up
//! in the same cluster are then at most `2(k-1)` hops apart.

use rand::Rng;
use tracing::debug;

use crate::{
    graph::{Graph, Vertex},
    seeded_rng,
};

const UNCLUSTERED: u32 = std::u32::MAX;

/// Builds a spanner of `graph` with stretch at most `2k - 1`, using only
/// randomness derived from `seed`.
///
/// Degenerate parameters are not errors: `k == 0` returns the edgeless
/// graph on the same vertices (not a spanner), `k == 1` returns a copy of
/// `graph`.
pub fn build_spanner(graph: &Graph, k: u32, seed: u64) -> Graph {
    let mut rng = seeded_rng(seed);
    build_spanner_with_rng(graph, k, &mut rng)
}

/// [`build_spanner`] drawing from a caller-supplied generator.
pub fn build_spanner_with_rng<R: Rng>(graph: &Graph, k: u32, rng: &mut R) -> Graph {
    let nvertices = graph.nvertices();
    if nvertices == 0 {
        return Graph::empty(0);
    }
    if k == 0 {
        return Graph::empty(nvertices);
    }
    if k == 1 {
        return graph.clone();
    }

    let prob = sampling_probability(nvertices, k);
    let mut selected = vec![false; 2 * graph.nedges()];
    let mut nselected = 0;
    let mut clustering = Clustering::singletons(nvertices);

    for phase in 1..k {
        let sampled = sample_clusters(clustering.nclusters, prob, rng);
        let nsampled = sampled.iter().filter(|&&s| s).count();

        clustering = clustering.grow(graph, &sampled, |u, v| {
            let slot = graph.edge_slot(u, v).expect("annexed along an edge");
            if !selected[slot] {
                selected[slot] = true;
                nselected += 1;
            }
        });
        debug_assert!(clustering.is_partition());

        nselected += select_cross_edges(graph, &clustering, &mut selected);
        debug!(
            phase,
            nsampled,
            nclusters = clustering.nclusters,
            nselected,
            "clustering phase"
        );
    }

    nselected += select_cross_edges(graph, &clustering, &mut selected);
    debug!(k, nselected, nedges = graph.nedges(), "final phase");

    let edges: Vec<(Vertex, Vertex)> = graph
        .slotted_edges()
        .filter(|&(slot, _, _)| selected[slot])
        .map(|(_, u, v)| (u, v))
        .collect();
    Graph::from_sorted_edges(nvertices, &edges)
}

/// Each cluster survives a phase with probability `n^(-1/k)`.
fn sampling_probability(nvertices: usize, k: u32) -> f64 {
    (nvertices as f64).powf(-1.0 / f64::from(k))
}

/// One independent draw per cluster, in ascending id order.
fn sample_clusters<R: Rng>(nclusters: usize, prob: f64, rng: &mut R) -> Vec<bool> {
    (0..nclusters).map(|_| rng.gen::<f64>() < prob).collect()
}

/// Marks every edge whose endpoints lie in different clusters, returning
/// how many were not marked before.
fn select_cross_edges(graph: &Graph, clustering: &Clustering, selected: &mut [bool]) -> usize {
    let mut added = 0;
    for (slot, u, v) in graph.slotted_edges() {
        if clustering.cluster_of(u) != clustering.cluster_of(v) && !selected[slot] {
            selected[slot] = true;
            added += 1;
        }
    }
    added
}

/// A partition of the vertices into clusters with ids in `[0, nclusters)`.
///
/// Ids only mean something within one phase; each phase builds a fresh
/// clustering.
#[derive(Clone, Debug)]
struct Clustering {
    cluster: Vec<u32>,
    nclusters: usize,
}

impl Clustering {
    fn singletons(nvertices: usize) -> Self {
        Self {
            cluster: (0..nvertices as u32).collect(),
            nclusters: nvertices,
        }
    }

    fn cluster_of(&self, v: Vertex) -> u32 {
        self.cluster[v as usize]
    }

    fn is_partition(&self) -> bool {
        let mut used = vec![false; self.nclusters];
        for &c in &self.cluster {
            match used.get_mut(c as usize) {
                Some(u) => *u = true,
                None => return false,
            }
        }
        used.into_iter().all(|u| u)
    }

    /// Returns `(offsets, members)` with the vertices of cluster `c` at
    /// `members[offsets[c]..offsets[c + 1]]`, ascending.
    fn members(&self) -> (Vec<usize>, Vec<Vertex>) {
        let mut offsets = vec![0usize; self.nclusters + 1];
        for &c in &self.cluster {
            offsets[1 + c as usize] += 1;
        }
        let mut cumsum = 0;
        for offset in offsets.iter_mut() {
            cumsum += *offset;
            *offset = cumsum;
        }
        let mut cursor = offsets.clone();
        let mut members = vec![0; self.cluster.len()];
        for (v, &c) in self.cluster.iter().enumerate() {
            members[cursor[c as usize]] = v as Vertex;
            cursor[c as usize] += 1;
        }
        (offsets, members)
    }

    /// The next phase's clustering.
    ///
    /// Sampled clusters, in ascending id order, keep their members and
    /// claim every not-yet-claimed neighbor whose cluster was not sampled;
    /// `attach(u, v)` is called when member `u` claims `v`. Vertices
    /// nobody claimed become singletons.
    fn grow<F>(&self, graph: &Graph, sampled: &[bool], mut attach: F) -> Self
    where
        F: FnMut(Vertex, Vertex),
    {
        debug_assert_eq!(sampled.len(), self.nclusters);
        let (offsets, members) = self.members();
        let mut next = vec![UNCLUSTERED; self.cluster.len()];
        let mut nclusters = 0u32;

        for c in (0..self.nclusters).filter(|&c| sampled[c]) {
            let id = nclusters;
            nclusters += 1;
            let old_members = &members[offsets[c]..offsets[c + 1]];
            for &u in old_members {
                next[u as usize] = id;
            }
            for &u in old_members {
                for &v in graph.neighbors(u) {
                    if next[v as usize] == UNCLUSTERED && !sampled[self.cluster_of(v) as usize] {
                        next[v as usize] = id;
                        attach(u, v);
                    }
                }
            }
        }

        for (v, c) in next.iter_mut().enumerate() {
            if *c == UNCLUSTERED {
                debug_assert!(!sampled[self.cluster[v] as usize]);
                *c = nclusters;
                nclusters += 1;
            }
        }

        Self {
            cluster: next,
            nclusters: nclusters as usize,
        }
    }
}

#[cfg(test)]
mod tests {
    use itertools::Itertools;

    use super::*;
    use crate::bfs::Bfs;
    use crate::erdos_renyi;

    fn max_edge_stretch(g: &Graph, h: &Graph) -> Option<u32> {
        let mut bfs = Bfs::new(h.nvertices());
        g.edges()
            .map(|(u, v)| bfs.distance(h, u, v))
            .try_fold(0, |acc, d| d.map(|d| acc.max(d)))
    }

    fn star(n: u32) -> Graph {
        Graph::from_edges(n as usize, (1..n).map(|v| (0, v))).unwrap()
    }

    #[test]
    fn degenerate_parameters() {
        let g = erdos_renyi::generate(40, 0.2, 3).unwrap().graph;
        let n = g.nvertices();

        let h0 = build_spanner(&g, 0, 1);
        assert_eq!(h0.nvertices(), n);
        assert_eq!(h0.nedges(), 0);

        assert_eq!(build_spanner(&g, 1, 1), g);
        assert_eq!(build_spanner(&Graph::empty(0), 3, 1), Graph::empty(0));
    }

    #[test]
    fn isolated_vertices_stay_edgeless() {
        let h = build_spanner(&Graph::empty(5), 2, 11);
        assert_eq!(h, Graph::empty(5));
    }

    #[test]
    fn same_seed_same_spanner() {
        let g = erdos_renyi::generate(120, 0.1, 5).unwrap().graph;
        for k in 2..5 {
            assert_eq!(build_spanner(&g, k, 42), build_spanner(&g, k, 42));
        }
    }

    #[test]
    fn caller_generator_matches_seed() {
        let g = erdos_renyi::generate(80, 0.1, 9).unwrap().graph;
        let mut rng = seeded_rng(17);
        assert_eq!(build_spanner_with_rng(&g, 3, &mut rng), build_spanner(&g, 3, 17));
    }

    #[test]
    fn subgraph_within_stretch() {
        for seed in 0..20 {
            let g = erdos_renyi::generate(100, 0.08, seed).unwrap().graph;
            for k in 2..5 {
                let h = build_spanner(&g, k, seed + 1000);
                assert!(h.is_subgraph_of(&g));
                let worst = max_edge_stretch(&g, &h).expect("spanner keeps edges connected");
                assert!(worst <= 2 * k - 1, "seed {} k {} stretch {}", seed, k, worst);
            }
        }
    }

    #[test]
    fn star_keeps_connectivity() {
        // whichever vertex survives, the star must stay connected
        let g = star(30);
        for seed in 0..50 {
            let h = build_spanner(&g, 2, seed);
            assert!(h.is_subgraph_of(&g));
            assert!(max_edge_stretch(&g, &h).map_or(false, |d| d <= 3));
        }
    }

    #[test]
    fn phase_one_sample_size_tracks_expectation() {
        // singletons survive with probability n^(-1/k), so about
        // n^(1 - 1/k) of them are sampled in the first phase
        let n = 400;
        for k in 2..5 {
            let prob = sampling_probability(n, k);
            let expected = (n as f64).powf(1.0 - 1.0 / f64::from(k));
            let nseeds = 200;
            let total: usize = (0..nseeds)
                .map(|seed| {
                    let mut rng = seeded_rng(seed);
                    let sampled = sample_clusters(n, prob, &mut rng);
                    sampled.into_iter().filter(|&s| s).count()
                })
                .sum();
            let mean = total as f64 / nseeds as f64;
            assert!(
                (mean - expected).abs() < 0.1 * expected,
                "k {} mean {} expected {}",
                k,
                mean,
                expected
            );
        }
    }

    #[test]
    fn sparsifies_complete_graph() {
        // every unsampled vertex joins the first sampled cluster, so only
        // edges at the other sampled vertices and the attachments survive
        let n = 100;
        let g = Graph::from_edges(n, (0..n as u32).tuple_combinations()).unwrap();
        for k in 2..5 {
            let nseeds = 10;
            let kept: usize = (0..nseeds).map(|seed| build_spanner(&g, k, seed).nedges()).sum();
            let ratio = kept as f64 / (nseeds as f64 * g.nedges() as f64);
            assert!(ratio < 0.75, "k {} kept {:.3} of the edges", k, ratio);
        }
    }

    #[test]
    fn drops_edges_of_dense_random_graph() {
        let g = erdos_renyi::generate(200, 0.3, 8).unwrap().graph;
        for k in 2..5 {
            let h = build_spanner(&g, k, 1008);
            assert!(h.nedges() < g.nedges(), "k {} kept all {} edges", k, g.nedges());
        }
    }

    #[test]
    fn growth_without_sampling_is_all_singletons() {
        let g = star(6);
        let start = Clustering::singletons(6);
        let mut attached = Vec::new();
        let next = start.grow(&g, &[false; 6], |u, v| attached.push((u, v)));
        assert!(attached.is_empty());
        assert_eq!(next.nclusters, 6);
        assert!(next.is_partition());
    }

    #[test]
    fn sampled_center_annexes_leaves() {
        let g = star(5);
        let start = Clustering::singletons(5);
        let mut sampled = [false; 5];
        sampled[0] = true;
        let mut attached = Vec::new();
        let next = start.grow(&g, &sampled, |u, v| attached.push((u, v)));
        assert_eq!(next.nclusters, 1);
        assert!(next.cluster.iter().all(|&c| c == 0));
        assert_eq!(attached, vec![(0, 1), (0, 2), (0, 3), (0, 4)]);
    }

    #[test]
    fn first_sampled_cluster_wins_ties() {
        // 1 is adjacent to both sampled vertices 0 and 2
        let g = Graph::from_edges(4, vec![(0, 1), (1, 2), (2, 3)]).unwrap();
        let start = Clustering::singletons(4);
        let mut attached = Vec::new();
        let next = start.grow(&g, &[true, false, true, false], |u, v| attached.push((u, v)));
        assert_eq!(next.cluster, vec![0, 0, 1, 1]);
        assert_eq!(attached, vec![(0, 1), (2, 3)]);
    }

    #[test]
    fn members_bucket_by_cluster() {
        let clustering = Clustering {
            cluster: vec![1, 0, 1, 2, 0],
            nclusters: 3,
        };
        assert!(clustering.is_partition());
        let (offsets, members) = clustering.members();
        assert_eq!(offsets, vec![0, 2, 4, 5]);
        assert_eq!(members, vec![1, 4, 0, 2, 3]);

        let gap = Clustering {
            cluster: vec![0, 2],
            nclusters: 3,
        };
        assert!(!gap.is_partition());
    }
}
