//! Sweeps Baswana-Sen spanner construction over a grid of graph sizes,
//! edge probabilities, and stretch parameters.

use std::time::Instant;

use rayon::iter::{IntoParallelIterator, ParallelIterator};
use serde_json::{json, Value};
use structopt::StructOpt;

use spanners::metrics::{self, ExperimentRecord};
use spanners::{erdos_renyi, SpannerError};

/// Runs every (n, p, k) combination for several repetitions and prints one
/// JSON line per repetition, then one line aggregating the repetitions of
/// the combination (mean, std, min, max of each metric). Repetitions run
/// in parallel; repetition `r` uses seed `seed + r` for the graph, offset
/// by 1000 for the spanner and by 2000 for stretch sampling.
///
/// The spanner also keeps the edge through which each vertex joined its
/// cluster, so `spanner_edges` and `size_ratio` run somewhat higher than
/// for a builder that only keeps edges between clusters.
#[derive(Debug, StructOpt)]
#[structopt(name = "sweep", about = "Sweep spanner experiments.")]
struct Opt {
    /// Vertex counts; each must exceed 100.
    #[structopt(long, default_value = "1000")]
    n: Vec<usize>,

    /// Edge probabilities.
    #[structopt(long, default_value = "0.01")]
    p: Vec<f64>,

    /// Spanner parameters; each must lie in [2, ln n] for every n.
    #[structopt(long, default_value = "2")]
    k: Vec<u32>,

    /// Repetitions per combination.
    #[structopt(long, default_value = "5")]
    reps: u64,

    /// Base random seed.
    #[structopt(long, default_value = "0")]
    seed: u64,

    /// Edges and vertex pairs sampled for stretch estimation.
    #[structopt(long, default_value = "1000")]
    nsamples: usize,
}

const MIN_VERTICES: usize = 100;

fn main() {
    let opt = Opt::from_args();

    if let Err(e) = validate(&opt) {
        eprintln!("{}", e);
        std::process::exit(2);
    }

    let sweep_start = Instant::now();
    let mut nfailed = 0;
    for &n in &opt.n {
        for &p in &opt.p {
            for &k in &opt.k {
                let rows: Vec<Result<(Value, ExperimentRecord), SpannerError>> = (0..opt.reps)
                    .into_par_iter()
                    .map(|rep| run_single(n, p, k, rep, &opt))
                    .collect();
                let mut records = Vec::with_capacity(rows.len());
                for (rep, row) in rows.into_iter().enumerate() {
                    match row {
                        Ok((row, record)) => {
                            println!("{}", row);
                            records.push(record);
                        }
                        Err(e) => {
                            nfailed += 1;
                            println!(
                                "{}",
                                json!({ "n": n, "p": p, "k": k, "rep": rep, "error": e.to_string() })
                            );
                        }
                    }
                }
                for row in metrics::aggregate(&records) {
                    let mut row = row.to_json();
                    row["aggregate"] = json!(true);
                    println!("{}", row);
                }
            }
        }
    }

    println!(
        "{}",
        json!({
            "combinations": opt.n.len() * opt.p.len() * opt.k.len(),
            "reps": opt.reps,
            "failed": nfailed,
            "sweep_duration": format!("{:.0?}", Instant::now().duration_since(sweep_start)),
        })
    );
}

fn validate(opt: &Opt) -> Result<(), SpannerError> {
    for &n in &opt.n {
        metrics::validate_n(n, MIN_VERTICES)?;
        for &k in &opt.k {
            metrics::validate_k(n, k)?;
        }
    }
    Ok(())
}

fn run_single(
    n: usize,
    p: f64,
    k: u32,
    rep: u64,
    opt: &Opt,
) -> Result<(Value, ExperimentRecord), SpannerError> {
    let seed = opt.seed + rep;

    let gen_start = Instant::now();
    let generated = erdos_renyi::generate(n, p, seed)?;
    let gen_time = Instant::now().duration_since(gen_start);
    let graph = &generated.graph;

    let spanner_start = Instant::now();
    let spanner = spanners::build_spanner(graph, k, seed + 1000);
    let spanner_time = Instant::now().duration_since(spanner_start);

    let stretch_start = Instant::now();
    let edges = spanners::sampled_edge_stretch(graph, &spanner, opt.nsamples, seed + 2000);
    let pairs = spanners::sampled_pair_stretch(graph, &spanner, opt.nsamples, seed + 2000);
    let stretch_time = Instant::now().duration_since(stretch_start);

    let record = ExperimentRecord {
        algorithm: "baswana_sen",
        n,
        p,
        k,
        spanner_size: spanner.nedges(),
        size_ratio: metrics::size_ratio(spanner.nedges(), generated.n_connected, k),
        max_stretch_edges: edges.max_stretch,
        avg_stretch_edges: edges.avg_stretch,
        max_stretch_pairs: pairs.max_stretch,
        avg_stretch_pairs: pairs.avg_stretch,
        time_gen: gen_time.as_secs_f64(),
        time_spanner: spanner_time.as_secs_f64(),
        time_stretch: stretch_time.as_secs_f64(),
    };

    let row = json!({
        "n": n,
        "p": p,
        "k": k,
        "rep": rep,
        "seed": seed,
        "n_original": generated.n_original,
        "n_connected": generated.n_connected,
        "nedges": graph.nedges(),
        "spanner_edges": spanner.nedges(),
        "theoretical_bound": metrics::theoretical_bound(generated.n_connected, k),
        "size_ratio": metrics::size_ratio(spanner.nedges(), generated.n_connected, k),
        "edge_stretch": edges.to_json(),
        "pair_stretch": pairs.to_json(),
        "gen_time": format!("{:.0?}", gen_time),
        "spanner_time": format!("{:.0?}", spanner_time),
        "stretch_time": format!("{:.0?}", stretch_time),
    });
    Ok((row, record))
}
