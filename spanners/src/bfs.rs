//! Breadth-first hop distances over unweighted graphs.

use std::collections::VecDeque;

use crate::graph::{Adjacency, Vertex};

const UNREACHED: u32 = std::u32::MAX;

/// Hop distances from a single source.
///
/// Behaves like a map from vertex to distance: vertices the search never
/// reached have no entry.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Distances {
    source: Vertex,
    dist: Vec<u32>,
    nreached: usize,
}

impl Distances {
    pub fn source(&self) -> Vertex {
        self.source
    }

    pub fn get(&self, v: Vertex) -> Option<u32> {
        match self.dist.get(v as usize) {
            Some(&d) if d != UNREACHED => Some(d),
            _ => None,
        }
    }

    pub fn contains(&self, v: Vertex) -> bool {
        self.get(v).is_some()
    }

    /// Reachable vertices in ascending order, with their distances.
    pub fn reachable(&self) -> impl Iterator<Item = (Vertex, u32)> + '_ {
        self.dist
            .iter()
            .copied()
            .enumerate()
            .filter(|&(_, d)| d != UNREACHED)
            .map(|(v, d)| (v as Vertex, d))
    }

    /// Number of reachable vertices, the source included.
    pub fn len(&self) -> usize {
        self.nreached
    }

    pub fn is_empty(&self) -> bool {
        self.nreached == 0
    }
}

/// Reusable BFS scratch space.
///
/// Only entries touched by the previous search are reset, so a search that
/// stops early costs time proportional to what it explored, not to the
/// size of the graph.
pub struct Bfs {
    dist: Vec<u32>,
    touched: Vec<Vertex>,
    queue: VecDeque<Vertex>,
}

impl Bfs {
    pub fn new(nvertices: usize) -> Self {
        Self {
            dist: vec![UNREACHED; nvertices],
            touched: Vec::new(),
            queue: VecDeque::new(),
        }
    }

    /// Reverts to all-unreached.
    fn reset(&mut self) {
        for v in self.touched.drain(..) {
            self.dist[v as usize] = UNREACHED;
        }
        self.queue.clear();
    }

    fn ensure_capacity(&mut self, nvertices: usize) {
        if self.dist.len() < nvertices {
            self.dist.resize(nvertices, UNREACHED);
        }
    }

    fn visit(&mut self, v: Vertex, d: u32) {
        self.dist[v as usize] = d;
        self.touched.push(v);
        self.queue.push_back(v);
    }

    /// Distances from `source` to everything reachable from it.
    pub fn distances<G: Adjacency + ?Sized>(&mut self, graph: &G, source: Vertex) -> Distances {
        let nvertices = graph.nvertices();
        assert!((source as usize) < nvertices, "source {} out of range", source);
        self.ensure_capacity(nvertices);
        self.reset();

        self.visit(source, 0);
        while let Some(u) = self.queue.pop_front() {
            let next = self.dist[u as usize] + 1;
            for &v in graph.neighbors(u) {
                if self.dist[v as usize] == UNREACHED {
                    self.visit(v, next);
                }
            }
        }

        let mut dist = vec![UNREACHED; nvertices];
        for &v in &self.touched {
            dist[v as usize] = self.dist[v as usize];
        }
        Distances {
            source,
            dist,
            nreached: self.touched.len(),
        }
    }

    /// Hop distance from `source` to `target` if it is at most `limit`.
    ///
    /// Vertices at distance `limit` or more are never expanded, so the search
    /// stays inside the `limit`-ball around `source`.
    pub fn distance_limited<G: Adjacency + ?Sized>(
        &mut self,
        graph: &G,
        source: Vertex,
        target: Vertex,
        limit: u32,
    ) -> Option<u32> {
        let nvertices = graph.nvertices();
        assert!((source as usize) < nvertices, "source {} out of range", source);
        assert!((target as usize) < nvertices, "target {} out of range", target);
        if source == target {
            return Some(0);
        }
        self.ensure_capacity(nvertices);
        self.reset();

        self.visit(source, 0);
        while let Some(u) = self.queue.pop_front() {
            let d = self.dist[u as usize];
            if d >= limit {
                continue;
            }
            for &v in graph.neighbors(u) {
                if v == target {
                    return Some(d + 1);
                }
                if self.dist[v as usize] == UNREACHED {
                    self.visit(v, d + 1);
                }
            }
        }
        None
    }

    /// Exact hop distance from `source` to `target`, stopping once found.
    pub fn distance<G: Adjacency + ?Sized>(
        &mut self,
        graph: &G,
        source: Vertex,
        target: Vertex,
    ) -> Option<u32> {
        self.distance_limited(graph, source, target, UNREACHED)
    }
}

/// Single-source distances to every vertex reachable from `source`.
pub fn bfs_distances<G: Adjacency + ?Sized>(graph: &G, source: Vertex) -> Distances {
    Bfs::new(graph.nvertices()).distances(graph, source)
}

/// `None` when `target` is farther than `limit` hops from `source`
/// (or not connected to it at all).
pub fn bfs_distance_limited<G: Adjacency + ?Sized>(
    graph: &G,
    source: Vertex,
    target: Vertex,
    limit: u32,
) -> Option<u32> {
    Bfs::new(graph.nvertices()).distance_limited(graph, source, target, limit)
}

pub fn bfs_distance<G: Adjacency + ?Sized>(graph: &G, source: Vertex, target: Vertex) -> Option<u32> {
    Bfs::new(graph.nvertices()).distance(graph, source, target)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::{Graph, GraphBuilder};

    fn path(n: u32) -> Graph {
        Graph::from_edges(n as usize, (1..n).map(|v| (v - 1, v))).unwrap()
    }

    #[test]
    fn distances_on_path() {
        let g = path(5);
        let d = bfs_distances(&g, 0);
        assert_eq!(d.source(), 0);
        assert_eq!(d.len(), 5);
        assert_eq!(
            d.reachable().collect::<Vec<_>>(),
            vec![(0, 0), (1, 1), (2, 2), (3, 3), (4, 4)]
        );
        assert_eq!(bfs_distances(&g, 2).get(4), Some(2));
    }

    #[test]
    fn unreachable_vertices_are_absent() {
        let g = Graph::from_edges(5, vec![(0, 1), (1, 2), (3, 4)]).unwrap();
        let d = bfs_distances(&g, 0);
        assert_eq!(d.len(), 3);
        assert!(d.contains(2));
        assert!(!d.contains(3));
        assert_eq!(d.get(4), None);
        assert!(d.reachable().all(|(v, _)| v < 3));
    }

    #[test]
    fn limited_search_respects_limit() {
        let g = path(6);
        assert_eq!(bfs_distance_limited(&g, 0, 0, 0), Some(0));
        assert_eq!(bfs_distance_limited(&g, 0, 3, 3), Some(3));
        assert_eq!(bfs_distance_limited(&g, 0, 4, 3), None);
        assert_eq!(bfs_distance_limited(&g, 0, 1, 0), None);
        assert_eq!(bfs_distance(&g, 5, 0), Some(5));
    }

    #[test]
    fn limited_search_on_disconnected() {
        let g = Graph::from_edges(4, vec![(0, 1), (2, 3)]).unwrap();
        assert_eq!(bfs_distance_limited(&g, 0, 3, 10), None);
        assert_eq!(bfs_distance(&g, 1, 2), None);
    }

    #[test]
    fn scratch_reuse_gives_fresh_answers() {
        let cycle = Graph::from_edges(6, (0..6).map(|v| (v, (v + 1) % 6))).unwrap();
        let mut bfs = Bfs::new(cycle.nvertices());
        assert_eq!(bfs.distance_limited(&cycle, 0, 3, 2), None);
        assert_eq!(bfs.distance(&cycle, 0, 3), Some(3));
        assert_eq!(bfs.distance(&cycle, 1, 5), Some(2));
        let d = bfs.distances(&cycle, 4);
        assert_eq!(d.get(1), Some(3));
        assert_eq!(d.get(0), Some(2));
        assert_eq!(bfs.distance_limited(&cycle, 2, 0, 2), Some(2));
    }

    #[test]
    fn searches_a_builder_in_progress() {
        let mut b = GraphBuilder::new(4);
        b.add_edge(0, 1);
        assert_eq!(bfs_distance(&b, 0, 2), None);
        b.add_edge(1, 2);
        assert_eq!(bfs_distance(&b, 0, 2), Some(2));
        assert_eq!(bfs_distances(&b, 3).len(), 1);
    }
}
