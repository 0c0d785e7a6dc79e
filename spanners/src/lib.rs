//! # `spanners` - sparse distance-preserving subgraphs
//!
//! Builds (2k-1)-spanners of unweighted, undirected graphs with the
//! randomized Baswana-Sen clustering algorithm and with the deterministic
//! greedy algorithm, and measures the stretch a spanner introduces.
//!
//! Every randomized entry point takes an explicit seed (or generator), so
//! results are reproducible and independent of call order.

use std::collections::HashMap;

use ordered_float::NotNan;
use rand_pcg::Lcg64Xsh32;

pub mod baswana_sen;
pub mod bfs;
pub mod erdos_renyi;
pub mod error;
pub mod graph;
pub mod greedy;
pub mod metrics;
pub mod stretch;

pub use baswana_sen::{build_spanner, build_spanner_with_rng};
pub use error::{Result, SpannerError};
pub use graph::{Adjacency, Graph, GraphBuilder, Vertex};
pub use greedy::build_greedy_spanner;
pub use stretch::{exact_stretch, sampled_edge_stretch, sampled_pair_stretch, StretchStats};

/// The generator behind every seeded call in this crate.
pub fn seeded_rng(seed: u64) -> Lcg64Xsh32 {
    Lcg64Xsh32::new(0xcafef00dd15ea5e5, seed)
}

const NSTAT_PERCENTILES: usize = 11;
const STAT_PERCENTILES: [f64; NSTAT_PERCENTILES] = [
    0.0, 0.01, 0.05, 0.10, 0.25, 0.50, 0.75, 0.90, 0.95, 0.99, 1.0,
];

#[derive(Clone, Debug, PartialEq)]
pub struct SummaryStats {
    mean: f64,
    percentiles: [f64; NSTAT_PERCENTILES],
}

impl SummaryStats {
    /// NaNs are ignored; `None` if nothing is left.
    pub fn from(it: impl Iterator<Item = f64>) -> Option<Self> {
        let mut v: Vec<NotNan<f64>> = it.filter_map(|f| NotNan::new(f).ok()).collect();
        if v.is_empty() {
            return None;
        }
        v.sort_unstable();
        let mut stats = SummaryStats {
            mean: v.iter().map(|f| f.into_inner()).sum::<f64>() / v.len() as f64,
            percentiles: Default::default(),
        };
        STAT_PERCENTILES
            .iter()
            .copied()
            .map(|f| v[((v.len() - 1) as f64 * f) as usize].into_inner())
            .zip(stats.percentiles.iter_mut())
            .for_each(|(val, p)| *p = val);
        Some(stats)
    }

    pub fn mean(&self) -> f64 {
        self.mean
    }

    pub fn min(&self) -> f64 {
        self.percentiles[0]
    }

    pub fn median(&self) -> f64 {
        self.percentiles[5]
    }

    pub fn max(&self) -> f64 {
        self.percentiles[NSTAT_PERCENTILES - 1]
    }

    pub fn to_map(&self) -> HashMap<String, f64> {
        let mut map: HashMap<_, _> = STAT_PERCENTILES
            .iter()
            .map(|f| format!("p{:.3}", f))
            .zip(self.percentiles.iter().copied())
            .collect();
        map.insert("mean".to_string(), self.mean);
        map
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn summary_of_nothing() {
        assert!(SummaryStats::from(std::iter::empty()).is_none());
        assert!(SummaryStats::from(vec![f64::NAN].into_iter()).is_none());
    }

    #[test]
    fn summary_percentiles() {
        let stats = SummaryStats::from((1..=101).rev().map(|x| x as f64)).unwrap();
        assert_eq!(stats.mean(), 51.0);
        assert_eq!(stats.min(), 1.0);
        assert_eq!(stats.median(), 51.0);
        assert_eq!(stats.max(), 101.0);
        let map = stats.to_map();
        assert_eq!(map["p0.900"], 91.0);
        assert_eq!(map["mean"], 51.0);
        assert_eq!(map.len(), NSTAT_PERCENTILES + 1);
    }

    #[test]
    fn seeded_rng_is_reproducible() {
        use rand::Rng;
        let draw = |seed| {
            let mut rng = seeded_rng(seed);
            (0..8).map(|_| rng.gen::<u32>()).collect::<Vec<_>>()
        };
        assert_eq!(draw(7), draw(7));
        assert_ne!(draw(7), draw(8));
    }
}
