//! Size bounds, parameter checks, and per-combination aggregation used
//! when comparing spanners across experiments.

use std::collections::BTreeMap;

use itertools::{Itertools, MinMaxResult};
use ordered_float::OrderedFloat;
use serde_json::{json, Map, Value};

use crate::error::{Result, SpannerError};

/// The `O(k * n^(1 + 1/k))` size bound of a (2k-1)-spanner, constant
/// factor one.
pub fn theoretical_bound(n: usize, k: u32) -> f64 {
    if k == 0 {
        return 0.0;
    }
    let k = f64::from(k);
    k * (n as f64).powf(1.0 + 1.0 / k)
}

/// Spanner edges relative to [`theoretical_bound`]; zero when the bound is.
pub fn size_ratio(spanner_edges: usize, n: usize, k: u32) -> f64 {
    let bound = theoretical_bound(n, k);
    if bound > 0.0 {
        spanner_edges as f64 / bound
    } else {
        0.0
    }
}

/// The largest `k` worth running on `n` vertices, `floor(ln n)`.
pub fn max_k(n: usize) -> u32 {
    if n < 2 {
        return 0;
    }
    (n as f64).ln().floor() as u32
}

/// `k` must be at least 2 and, for `n > 1`, at most `floor(ln n)`.
pub fn validate_k(n: usize, k: u32) -> Result<()> {
    if k < 2 {
        return Err(SpannerError::StretchParameterTooSmall { k, min: 2 });
    }
    if n > 1 && k > max_k(n) {
        return Err(SpannerError::StretchParameterTooLarge {
            k,
            n,
            max: max_k(n),
        });
    }
    Ok(())
}

/// `n` must exceed `min`.
pub fn validate_n(n: usize, min: usize) -> Result<()> {
    if n <= min {
        return Err(SpannerError::TooFewVertices { n, min });
    }
    Ok(())
}

/// Mean, sample standard deviation, and range of a set of values.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Aggregate {
    pub mean: f64,
    /// Zero for a single value.
    pub std: f64,
    pub min: f64,
    pub max: f64,
}

impl Aggregate {
    /// `None` for no values. Infinite values carry through to `mean` and
    /// `max` and leave `std` undefined (NaN).
    pub fn from(it: impl Iterator<Item = f64>) -> Option<Self> {
        let values: Vec<f64> = it.collect();
        let (min, max) = match values.iter().copied().map(OrderedFloat).minmax() {
            MinMaxResult::NoElements => return None,
            MinMaxResult::OneElement(x) => (x, x),
            MinMaxResult::MinMax(lo, hi) => (lo, hi),
        };
        let n = values.len() as f64;
        let mean = values.iter().sum::<f64>() / n;
        let std = if values.len() < 2 {
            0.0
        } else {
            (values.iter().map(|x| (x - mean) * (x - mean)).sum::<f64>() / (n - 1.0)).sqrt()
        };
        Some(Self {
            mean,
            std,
            min: min.into_inner(),
            max: max.into_inner(),
        })
    }
}

/// One repetition of one algorithm on one `(n, p, k)` combination.
/// Times are in seconds.
#[derive(Clone, Debug, PartialEq)]
pub struct ExperimentRecord {
    pub algorithm: &'static str,
    pub n: usize,
    pub p: f64,
    pub k: u32,
    pub spanner_size: usize,
    pub size_ratio: f64,
    pub max_stretch_edges: f64,
    pub avg_stretch_edges: f64,
    pub max_stretch_pairs: f64,
    pub avg_stretch_pairs: f64,
    pub time_gen: f64,
    pub time_spanner: f64,
    pub time_stretch: f64,
}

const NMETRICS: usize = 9;

impl ExperimentRecord {
    fn metrics(&self) -> [(&'static str, f64); NMETRICS] {
        [
            ("spanner_size", self.spanner_size as f64),
            ("spanner_size_ratio", self.size_ratio),
            ("max_stretch_edges", self.max_stretch_edges),
            ("avg_stretch_edges", self.avg_stretch_edges),
            ("max_stretch_pairs", self.max_stretch_pairs),
            ("avg_stretch_pairs", self.avg_stretch_pairs),
            ("time_gen", self.time_gen),
            ("time_spanner", self.time_spanner),
            ("time_stretch", self.time_stretch),
        ]
    }
}

/// Every metric of [`ExperimentRecord`] aggregated over the repetitions of
/// one `(algorithm, n, p, k)` group.
#[derive(Clone, Debug, PartialEq)]
pub struct AggregateRow {
    pub algorithm: &'static str,
    pub n: usize,
    pub p: f64,
    pub k: u32,
    pub count: usize,
    pub metrics: BTreeMap<&'static str, Aggregate>,
}

impl AggregateRow {
    /// Flat record with `<metric>_mean`, `_std`, `_min`, `_max` keys.
    /// Non-finite values come out as `null`.
    pub fn to_json(&self) -> Value {
        let mut map = Map::new();
        map.insert("algorithm".to_string(), json!(self.algorithm));
        map.insert("n".to_string(), json!(self.n));
        map.insert("p".to_string(), json!(self.p));
        map.insert("k".to_string(), json!(self.k));
        map.insert("count".to_string(), json!(self.count));
        for (name, agg) in &self.metrics {
            for &(suffix, value) in &[
                ("mean", agg.mean),
                ("std", agg.std),
                ("min", agg.min),
                ("max", agg.max),
            ] {
                map.insert(format!("{}_{}", name, suffix), json!(value));
            }
        }
        Value::Object(map)
    }
}

/// Groups records by `(algorithm, n, p, k)` and aggregates each metric,
/// returning groups in ascending key order.
pub fn aggregate(records: &[ExperimentRecord]) -> Vec<AggregateRow> {
    let mut groups: BTreeMap<_, Vec<&ExperimentRecord>> = BTreeMap::new();
    for r in records {
        groups
            .entry((r.algorithm, r.n, OrderedFloat(r.p), r.k))
            .or_default()
            .push(r);
    }

    groups
        .into_iter()
        .map(|((algorithm, n, p, k), group)| {
            let metrics = (0..NMETRICS)
                .filter_map(|i| {
                    let name = group[0].metrics()[i].0;
                    Aggregate::from(group.iter().map(|r| r.metrics()[i].1)).map(|agg| (name, agg))
                })
                .collect();
            AggregateRow {
                algorithm,
                n,
                p: p.into_inner(),
                k,
                count: group.len(),
                metrics,
            }
        })
        .collect()
}
