//! Compares Baswana-Sen spanners against the greedy baseline on
//! Erdős–Rényi graphs.

use std::time::Instant;

use serde_json::json;
use structopt::StructOpt;

use spanners::graph::Graph;
use spanners::metrics::{self, ExperimentRecord};
use spanners::{erdos_renyi, StretchStats};

/// For every vertex count and repetition, samples one G(n, p) graph and,
/// for every k, builds both spanners and reports their sizes, timings, and
/// sampled stretch as JSON lines. Repetition `r` uses seed `seed + r`. After
/// all runs, prints one line per (algorithm, n, k) averaging the
/// repetitions.
///
/// The Baswana-Sen builder also keeps the edge through which each vertex
/// joined its cluster, so its `spanner_edges` and `size_ratio` run somewhat
/// higher than for a builder that only keeps edges between clusters.
#[derive(Debug, StructOpt)]
#[structopt(name = "compare", about = "Compare randomized and greedy spanners.")]
struct Opt {
    /// Vertex counts before restricting to the largest component.
    #[structopt(long, default_value = "500")]
    nvertices: Vec<usize>,

    /// Edge probability.
    #[structopt(long, default_value = "0.05")]
    p: f64,

    /// Spanner parameters; each gives stretch 2k - 1.
    #[structopt(long, default_value = "2")]
    k: Vec<u32>,

    /// Repetitions per vertex count.
    #[structopt(long, default_value = "1")]
    reps: u64,

    /// Base random seed.
    #[structopt(long, default_value = "42")]
    seed: u64,

    /// Edges and vertex pairs sampled for stretch estimation.
    #[structopt(long, default_value = "500")]
    nsamples: usize,

    /// Also compute exact edge stretch (one BFS per vertex).
    #[structopt(long)]
    exact: bool,
}

fn main() {
    let opt = Opt::from_args();

    let mut records = Vec::new();
    for &n in &opt.nvertices {
        for rep in 0..opt.reps {
            let seed = opt.seed + rep;
            let gen_start = Instant::now();
            let generated = match erdos_renyi::generate(n, opt.p, seed) {
                Ok(generated) => generated,
                Err(e) => {
                    eprintln!("{}", e);
                    std::process::exit(2);
                }
            };
            let gen_time = Instant::now().duration_since(gen_start);
            let graph = generated.graph;
            println!(
                "{}",
                json!({
                    "n": n,
                    "rep": rep,
                    "n_original": generated.n_original,
                    "n_connected": generated.n_connected,
                    "nedges": graph.nedges(),
                    "max_degree": graph.max_degree(),
                    "gen_duration": format!("{:.0?}", gen_time),
                })
            );

            for &k in &opt.k {
                if let Err(e) = metrics::validate_k(generated.n_connected, k) {
                    println!(
                        "{}",
                        json!({ "n": n, "rep": rep, "k": k, "skipped": e.to_string() })
                    );
                    continue;
                }

                let bs_start = Instant::now();
                let randomized = spanners::build_spanner(&graph, k, seed + 100);
                let bs_time = Instant::now().duration_since(bs_start);

                let greedy_start = Instant::now();
                let greedy = spanners::build_greedy_spanner(&graph, k);
                let greedy_time = Instant::now().duration_since(greedy_start);

                let bound = metrics::theoretical_bound(generated.n_connected, k);
                for (name, spanner, elapsed) in vec![
                    ("baswana_sen", &randomized, bs_time),
                    ("greedy", &greedy, greedy_time),
                ] {
                    assert!(spanner.is_subgraph_of(&graph));
                    let stretch_start = Instant::now();
                    let edges =
                        spanners::sampled_edge_stretch(&graph, spanner, opt.nsamples, seed);
                    let pairs =
                        spanners::sampled_pair_stretch(&graph, spanner, opt.nsamples, seed);
                    let stretch_time = Instant::now().duration_since(stretch_start);
                    let size_ratio =
                        metrics::size_ratio(spanner.nedges(), generated.n_connected, k);

                    println!(
                        "{}",
                        json!({
                            "algorithm": name,
                            "n": n,
                            "rep": rep,
                            "k": k,
                            "stretch_limit": 2 * k - 1,
                            "spanner_edges": spanner.nedges(),
                            "theoretical_bound": bound,
                            "size_ratio": size_ratio,
                            "spanner_duration": format!("{:.0?}", elapsed),
                            "edge_stretch": edges.to_json(),
                            "pair_stretch": pairs.to_json(),
                            "pair_stretch_summary": pairs.summary().map(|s| s.to_map()),
                        })
                    );
                    records.push(ExperimentRecord {
                        algorithm: name,
                        n,
                        p: opt.p,
                        k,
                        spanner_size: spanner.nedges(),
                        size_ratio,
                        max_stretch_edges: edges.max_stretch,
                        avg_stretch_edges: edges.avg_stretch,
                        max_stretch_pairs: pairs.max_stretch,
                        avg_stretch_pairs: pairs.avg_stretch,
                        time_gen: gen_time.as_secs_f64(),
                        time_spanner: elapsed.as_secs_f64(),
                        time_stretch: stretch_time.as_secs_f64(),
                    });
                    if opt.exact {
                        report_exact(name, n, k, &graph, spanner);
                    }
                }
            }
        }
    }

    for row in metrics::aggregate(&records) {
        let mut row = row.to_json();
        row["aggregate"] = json!(true);
        println!("{}", row);
    }
}

fn report_exact(name: &str, n: usize, k: u32, graph: &Graph, spanner: &Graph) {
    let exact_start = Instant::now();
    let stats: StretchStats = spanners::exact_stretch(graph, spanner);
    println!(
        "{}",
        json!({
            "algorithm": name,
            "n": n,
            "k": k,
            "edge_stretch": stats.to_json(),
            "exact_duration": format!("{:.0?}", Instant::now().duration_since(exact_start)),
        })
    );
}
