//! Stretch of a spanner: how much longer distances get compared to the
//! original graph, exactly over every edge or estimated by sampling.
//!
//! A pair connected in the original graph but not in the spanner has
//! infinite stretch. Those are counted, never dropped.

use ordered_float::OrderedFloat;
use rand::seq::index;
use rand::Rng;
use rayon::iter::{IntoParallelIterator, ParallelIterator};
use serde_json::{json, Value};
use tracing::debug;

use crate::{
    bfs::Bfs,
    graph::{Graph, Vertex},
    seeded_rng, SummaryStats,
};

/// Aggregate stretch over a set of edges or vertex pairs.
#[derive(Clone, Debug, PartialEq)]
pub struct StretchStats {
    /// Largest stretch seen; infinite if any item was disconnected.
    pub max_stretch: f64,
    /// Mean over the finite stretches only.
    pub avg_stretch: f64,
    /// Per-item stretch, in evaluation order.
    pub stretches: Vec<f64>,
    pub count: usize,
    pub n_infinite: usize,
}

impl StretchStats {
    /// The result for degenerate inputs: nothing evaluated.
    pub fn empty() -> Self {
        Self {
            max_stretch: 0.0,
            avg_stretch: 0.0,
            stretches: Vec::new(),
            count: 0,
            n_infinite: 0,
        }
    }

    fn from_stretches(stretches: Vec<f64>) -> Self {
        if stretches.is_empty() {
            return Self::empty();
        }
        let max_stretch = stretches
            .iter()
            .copied()
            .map(OrderedFloat)
            .max()
            .map_or(0.0, |m| m.into_inner());
        let (nfinite, finite_sum) = stretches
            .iter()
            .filter(|s| s.is_finite())
            .fold((0usize, 0.0), |(n, sum), s| (n + 1, sum + s));
        let avg_stretch = if nfinite == 0 {
            0.0
        } else {
            finite_sum / nfinite as f64
        };
        Self {
            max_stretch,
            avg_stretch,
            count: stretches.len(),
            n_infinite: stretches.len() - nfinite,
            stretches,
        }
    }

    /// Percentiles over the finite stretches.
    pub fn summary(&self) -> Option<SummaryStats> {
        SummaryStats::from(self.stretches.iter().copied().filter(|s| s.is_finite()))
    }

    /// A compact record for reporting; an infinite max is written as `"inf"`.
    pub fn to_json(&self) -> Value {
        let max_stretch = if self.max_stretch.is_finite() {
            json!(self.max_stretch)
        } else {
            json!("inf")
        };
        json!({
            "max_stretch": max_stretch,
            "avg_stretch": self.avg_stretch,
            "count": self.count,
            "n_infinite": self.n_infinite,
        })
    }
}

fn ratio(spanner_distance: Option<u32>, graph_distance: u32) -> f64 {
    debug_assert!(graph_distance > 0);
    spanner_distance.map_or(std::f64::INFINITY, |d| {
        f64::from(d) / f64::from(graph_distance)
    })
}

fn assert_same_vertices(graph: &Graph, spanner: &Graph) {
    assert_eq!(
        graph.nvertices(),
        spanner.nvertices(),
        "spanner must cover the same vertices"
    );
}

/// Stretch of every edge of `graph`, in ascending `(u, v)` order.
///
/// Runs a full BFS in `spanner` from every vertex with a larger neighbor,
/// so this is only meant for small graphs. Sources run in parallel.
pub fn exact_stretch(graph: &Graph, spanner: &Graph) -> StretchStats {
    assert_same_vertices(graph, spanner);
    let nvertices = graph.nvertices();

    let per_source: Vec<Vec<f64>> = (0..nvertices)
        .into_par_iter()
        .map_init(
            || Bfs::new(nvertices),
            |bfs, u| {
                let u = u as Vertex;
                let larger = graph.neighbors(u).iter().copied().filter(|&v| u < v);
                if larger.clone().next().is_none() {
                    return Vec::new();
                }
                let dist = bfs.distances(spanner, u);
                larger.map(|v| ratio(dist.get(v), 1)).collect()
            },
        )
        .collect();

    let stats = StretchStats::from_stretches(per_source.into_iter().flatten().collect());
    debug!(
        count = stats.count,
        n_infinite = stats.n_infinite,
        "exact edge stretch"
    );
    stats
}

/// Stretch of `nsamples` distinct edges of `graph` drawn uniformly with
/// the generator seeded by `seed` (all edges if there are fewer).
pub fn sampled_edge_stretch(
    graph: &Graph,
    spanner: &Graph,
    nsamples: usize,
    seed: u64,
) -> StretchStats {
    assert_same_vertices(graph, spanner);
    let mut rng = seeded_rng(seed);
    if graph.nvertices() < 2 || graph.nedges() == 0 {
        return StretchStats::empty();
    }

    let edges: Vec<(Vertex, Vertex)> = graph.edges().collect();
    let amount = nsamples.min(edges.len());
    let mut bfs = Bfs::new(graph.nvertices());
    let stretches = index::sample(&mut rng, edges.len(), amount)
        .into_iter()
        .map(|i| {
            let (u, v) = edges[i];
            ratio(bfs.distance(spanner, u, v), 1)
        })
        .collect();

    let stats = StretchStats::from_stretches(stretches);
    debug!(
        nsamples,
        count = stats.count,
        n_infinite = stats.n_infinite,
        "sampled edge stretch"
    );
    stats
}

/// Stretch over `nsamples` vertex pairs drawn uniformly with replacement.
///
/// Draws with `u == v` and pairs disconnected in `graph` are skipped, so
/// fewer than `nsamples` pairs may be reported.
pub fn sampled_pair_stretch(
    graph: &Graph,
    spanner: &Graph,
    nsamples: usize,
    seed: u64,
) -> StretchStats {
    assert_same_vertices(graph, spanner);
    let mut rng = seeded_rng(seed);
    let nvertices = graph.nvertices();
    if nvertices < 2 {
        return StretchStats::empty();
    }

    let mut bfs = Bfs::new(nvertices);
    let mut stretches = Vec::new();
    for _ in 0..nsamples {
        let u: Vertex = rng.gen_range(0..nvertices as Vertex);
        let v: Vertex = rng.gen_range(0..nvertices as Vertex);
        if u == v {
            continue;
        }
        let (u, v) = (u.min(v), u.max(v));
        let graph_distance = match bfs.distance(graph, u, v) {
            Some(d) => d,
            None => continue,
        };
        stretches.push(ratio(bfs.distance(spanner, u, v), graph_distance));
    }

    let stats = StretchStats::from_stretches(stretches);
    debug!(
        nsamples,
        count = stats.count,
        n_infinite = stats.n_infinite,
        "sampled pair stretch"
    );
    stats
}
