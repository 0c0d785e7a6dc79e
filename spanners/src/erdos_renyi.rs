//! Erdős–Rényi G(n, p) input graphs, restricted to their largest
//! connected component.

use std::collections::VecDeque;

use rand::Rng;
use tracing::debug;

use crate::{
    error::{Result, SpannerError},
    graph::{Graph, Vertex},
    seeded_rng,
};

/// A generated graph together with its size before component extraction.
#[derive(Clone, Debug)]
pub struct GeneratedGraph {
    /// The largest connected component, relabelled to `[0, n_connected)`.
    pub graph: Graph,
    pub n_original: usize,
    pub n_connected: usize,
}

/// Samples G(n, p): every pair `i < j` is joined independently with
/// probability `p`, drawing from the generator seeded by `seed`.
pub fn generate(n: usize, p: f64, seed: u64) -> Result<GeneratedGraph> {
    if !(0.0..=1.0).contains(&p) {
        return Err(SpannerError::InvalidProbability(p));
    }
    let mut rng = seeded_rng(seed);

    // pairs come out in ascending order, which is what the CSR build wants
    let mut edges = Vec::new();
    for i in 0..n {
        for j in (i + 1)..n {
            if rng.gen::<f64>() < p {
                edges.push((i as Vertex, j as Vertex));
            }
        }
    }
    let full = Graph::from_sorted_edges(n, &edges);
    let graph = largest_component(&full);
    let n_connected = graph.nvertices();

    debug!(
        n,
        p,
        seed,
        n_connected,
        nedges = graph.nedges(),
        "sampled erdos-renyi graph"
    );
    Ok(GeneratedGraph {
        graph,
        n_original: n,
        n_connected,
    })
}

/// Labels each vertex with its connected component, returning the labels
/// and the size of each component. Components are numbered in order of
/// their smallest vertex.
pub fn components(graph: &Graph) -> (Vec<u32>, Vec<usize>) {
    const UNLABELED: u32 = std::u32::MAX;
    let mut label = vec![UNLABELED; graph.nvertices()];
    let mut sizes = Vec::new();
    let mut queue = VecDeque::new();

    for start in 0..graph.nvertices() {
        if label[start] != UNLABELED {
            continue;
        }
        let id = sizes.len() as u32;
        let mut size = 0;
        label[start] = id;
        queue.push_back(start as Vertex);
        while let Some(u) = queue.pop_front() {
            size += 1;
            for &v in graph.neighbors(u) {
                if label[v as usize] == UNLABELED {
                    label[v as usize] = id;
                    queue.push_back(v);
                }
            }
        }
        sizes.push(size);
    }

    (label, sizes)
}

/// The largest connected component (the one with the smallest vertex on
/// ties), with vertices relabelled in their original order.
pub fn largest_component(graph: &Graph) -> Graph {
    let (label, sizes) = components(graph);
    let largest = match sizes.iter().copied().max() {
        Some(max) => sizes.iter().position(|&s| s == max).unwrap_or(0) as u32,
        None => return Graph::empty(0),
    };

    let mut relabel = vec![std::u32::MAX; graph.nvertices()];
    let mut next = 0;
    for (v, &l) in label.iter().enumerate() {
        if l == largest {
            relabel[v] = next;
            next += 1;
        }
    }

    // relabelling preserves order, so the edge list stays sorted
    let edges: Vec<(Vertex, Vertex)> = graph
        .edges()
        .filter(|&(u, _)| label[u as usize] == largest)
        .map(|(u, v)| (relabel[u as usize], relabel[v as usize]))
        .collect();
    Graph::from_sorted_edges(next as usize, &edges)
}
