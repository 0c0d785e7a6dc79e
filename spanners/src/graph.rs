//! Compact graph data structures.

use itertools::Itertools;
use rayon::iter::IndexedParallelIterator;
use rayon::iter::ParallelIterator;
use rayon::slice::ParallelSlice;

use crate::error::{Result, SpannerError};

pub type Vertex = u32;

/// Neighbor lookup over a dense vertex range `[0, nvertices)`.
///
/// This is all a breadth-first search needs, so both the frozen [`Graph`]
/// and a spanner still under construction can be searched.
pub trait Adjacency {
    fn nvertices(&self) -> usize;

    fn neighbors(&self, v: Vertex) -> &[Vertex];
}

/// A compact adjacency list intended for sparse, simple, undirected graphs.
///
/// The space of vertices is a contiguous range of u32 ints
/// from [0, nvertices). Every edge is stored in both directions and
/// neighbor lists are sorted, so two graphs with the same vertex count
/// and edge set compare equal.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Graph {
    offsets: Vec<usize>,
    neighbors: Vec<Vertex>,
}

impl Graph {
    /// `offsets.len()` should be one greater than the number of vertices
    /// with `neighbors[offsets[i]..offsets[i+1]]` being the edges incident
    /// from `i`, which should be necessarily sorted and bidirectional.
    pub(crate) fn new(offsets: Vec<usize>, neighbors: Vec<Vertex>) -> Self {
        assert!(!offsets.is_empty() && offsets.len() <= (1 << 32));
        debug_assert!(offsets.par_windows(2).enumerate().all(|(i, s)| {
            let i = i as Vertex;
            s[0] <= s[1]
                && neighbors[s[0]..s[1]].windows(2).all(|ss| ss[0] < ss[1])
                && neighbors[s[0]..s[1]].iter().copied().all(|j| {
                    j != i
                        && neighbors[offsets[j as usize]..offsets[1 + j as usize]]
                            .binary_search(&i)
                            .is_ok()
                })
        }));
        Self { offsets, neighbors }
    }

    /// A graph on `nvertices` vertices with no edges.
    pub fn empty(nvertices: usize) -> Self {
        Self::new(vec![0; nvertices + 1], Vec::new())
    }

    /// Builds a graph from undirected edges in any order or orientation.
    /// Repeated edges collapse into one.
    pub fn from_edges<I>(nvertices: usize, edges: I) -> Result<Self>
    where
        I: IntoIterator<Item = (Vertex, Vertex)>,
    {
        let mut normalized = Vec::new();
        for (u, v) in edges {
            if let Some(&vertex) = [u, v].iter().find(|&&w| w as usize >= nvertices) {
                return Err(SpannerError::VertexOutOfRange { vertex, nvertices });
            }
            if u == v {
                return Err(SpannerError::SelfLoop(u));
            }
            normalized.push((u.min(v), u.max(v)));
        }
        let normalized: Vec<_> = normalized.into_iter().sorted().dedup().collect();
        Ok(Self::from_sorted_edges(nvertices, &normalized))
    }

    /// `edges` must be sorted and deduplicated with `u < v` for every `(u, v)`.
    pub(crate) fn from_sorted_edges(nvertices: usize, edges: &[(Vertex, Vertex)]) -> Self {
        debug_assert!(edges.windows(2).all(|e| e[0] < e[1]));
        debug_assert!(edges.iter().all(|&(u, v)| u < v));

        let mut offsets = vec![0usize; nvertices + 1];
        for &(u, v) in edges {
            offsets[1 + u as usize] += 1;
            offsets[1 + v as usize] += 1;
        }
        let mut cumsum = 0;
        for offset in offsets.iter_mut() {
            cumsum += *offset;
            *offset = cumsum;
        }

        // a vertex receives all its smaller neighbors (as the second endpoint)
        // before its larger ones (as the first), so lists come out sorted
        let mut cursor = offsets.clone();
        let mut neighbors = vec![0; cumsum];
        for &(u, v) in edges {
            neighbors[cursor[u as usize]] = v;
            cursor[u as usize] += 1;
            neighbors[cursor[v as usize]] = u;
            cursor[v as usize] += 1;
        }

        Self::new(offsets, neighbors)
    }

    pub fn neighbors(&self, v: Vertex) -> &[Vertex] {
        let v = v as usize;
        let lo = self.offsets[v];
        let hi = self.offsets[v + 1];
        &self.neighbors[lo..hi]
    }

    pub fn degree(&self, v: Vertex) -> usize {
        let v = v as usize;
        let lo = self.offsets[v];
        let hi = self.offsets[v + 1];
        hi - lo
    }

    pub fn max_degree(&self) -> usize {
        (0..self.nvertices())
            .map(|v| self.degree(v as Vertex))
            .max()
            .unwrap_or(0)
    }

    pub fn nvertices(&self) -> usize {
        self.offsets.len() - 1
    }

    pub fn nedges(&self) -> usize {
        self.neighbors.len() / 2
    }

    /// False for out-of-range endpoints.
    pub fn has_edge(&self, u: Vertex, v: Vertex) -> bool {
        let n = self.nvertices();
        (u as usize) < n && (v as usize) < n && self.neighbors(u).binary_search(&v).is_ok()
    }

    /// Every undirected edge once, as `(u, v)` with `u < v`, in ascending order.
    pub fn edges(&self) -> impl Iterator<Item = (Vertex, Vertex)> + '_ {
        (0..self.nvertices()).flat_map(move |u| {
            let u = u as Vertex;
            self.neighbors(u)
                .iter()
                .copied()
                .skip_while(move |&v| v < u)
                .map(move |v| (u, v))
        })
    }

    /// Like [`Graph::edges`], with each edge tagged by a slot in
    /// `[0, 2 * nedges)` that is unique to it, for side tables keyed by edge.
    pub(crate) fn slotted_edges(&self) -> impl Iterator<Item = (usize, Vertex, Vertex)> + '_ {
        (0..self.nvertices()).flat_map(move |u| {
            let lo = self.offsets[u];
            let u = u as Vertex;
            self.neighbors(u)
                .iter()
                .copied()
                .enumerate()
                .skip_while(move |&(_, v)| v < u)
                .map(move |(i, v)| (lo + i, u, v))
        })
    }

    /// The slot [`Graph::slotted_edges`] assigns to edge `(u, v)`.
    pub(crate) fn edge_slot(&self, u: Vertex, v: Vertex) -> Option<usize> {
        let (lo, hi) = (u.min(v), u.max(v));
        self.neighbors(lo)
            .binary_search(&hi)
            .ok()
            .map(|i| self.offsets[lo as usize] + i)
    }

    /// Same vertex set, and every edge here is an edge of `other`.
    pub fn is_subgraph_of(&self, other: &Graph) -> bool {
        self.nvertices() == other.nvertices() && self.edges().all(|(u, v)| other.has_edge(u, v))
    }
}

impl Adjacency for Graph {
    fn nvertices(&self) -> usize {
        Graph::nvertices(self)
    }

    fn neighbors(&self, v: Vertex) -> &[Vertex] {
        Graph::neighbors(self, v)
    }
}

/// Growable adjacency lists for a graph being assembled edge by edge,
/// frozen into a [`Graph`] with [`GraphBuilder::build`].
#[derive(Clone, Debug)]
pub struct GraphBuilder {
    adjacency: Vec<Vec<Vertex>>,
    nedges: usize,
}

impl GraphBuilder {
    pub fn new(nvertices: usize) -> Self {
        assert!(nvertices <= (1 << 32));
        Self {
            adjacency: vec![Vec::new(); nvertices],
            nedges: 0,
        }
    }

    /// Inserts the undirected edge `(u, v)`; returns false if it was
    /// already present.
    pub fn add_edge(&mut self, u: Vertex, v: Vertex) -> bool {
        assert!(u != v, "self-loop at {}", u);
        if self.adjacency[u as usize].contains(&v) {
            return false;
        }
        self.adjacency[u as usize].push(v);
        self.adjacency[v as usize].push(u);
        self.nedges += 1;
        true
    }

    pub fn nedges(&self) -> usize {
        self.nedges
    }

    pub fn build(self) -> Graph {
        let nvertices = self.adjacency.len();
        let mut edges = Vec::with_capacity(self.nedges);
        for (u, nbrs) in self.adjacency.into_iter().enumerate() {
            let u = u as Vertex;
            edges.extend(nbrs.into_iter().filter(|&v| u < v).map(|v| (u, v)));
        }
        edges.sort_unstable();
        Graph::from_sorted_edges(nvertices, &edges)
    }
}

impl Adjacency for GraphBuilder {
    fn nvertices(&self) -> usize {
        self.adjacency.len()
    }

    fn neighbors(&self, v: Vertex) -> &[Vertex] {
        &self.adjacency[v as usize]
    }
}
