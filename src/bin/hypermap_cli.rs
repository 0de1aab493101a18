//! HyperMap CLI
//!
//! Embeds an edge list into hyperbolic coordinates and reports a batch
//! of greedy routing queries against it. Not a network service: no
//! sockets, no persisted state, single process, single pass.

use std::fs;
use std::time::Instant;

use hypermap_core::config::{EmbeddingConfig, RouterConfig};
use hypermap_core::edge_parser::Edge;
use hypermap_core::embedding::{self, Embedding};
use hypermap_core::router;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

#[derive(Default)]
struct CliConfig {
    input_path: String,
    generate: Option<usize>,
    route_pairs: Vec<(String, String)>,
    seed: u64,
}

/// Generate a Barabási-Albert scale-free edge list, the same generator
/// idiom as the throughput benchmark, but driven by the CLI's seeded
/// `StdRng` so `--generate` runs are reproducible like embedding itself.
fn generate_ba_edges(n: usize, m: usize, rng: &mut StdRng) -> Vec<Edge> {
    let mut edges = Vec::new();
    let mut degrees = vec![0usize; n];

    for i in 0..m {
        for j in (i + 1)..m {
            edges.push(edge(i, j));
            degrees[i] += 1;
            degrees[j] += 1;
        }
    }

    for i in m..n {
        let total_degree: usize = degrees.iter().sum();
        let mut targets = Vec::new();
        for _ in 0..m {
            let mut r = rng.gen_range(0..total_degree.max(1));
            for (j, &deg) in degrees.iter().enumerate() {
                if r < deg && !targets.contains(&j) && j != i {
                    targets.push(j);
                    break;
                }
                r = r.saturating_sub(deg);
            }
        }
        for &target in &targets {
            edges.push(edge(i, target));
            degrees[i] += 1;
            degrees[target] += 1;
        }
    }

    edges
}

fn edge(i: usize, j: usize) -> Edge {
    Edge {
        source: format!("node_{i}"),
        target: format!("node_{j}"),
    }
}

fn random_route_pairs(n: usize, count: usize, rng: &mut StdRng) -> Vec<(String, String)> {
    (0..count)
        .map(|_| {
            let a = rng.gen_range(0..n);
            let mut b = rng.gen_range(0..n);
            while b == a && n > 1 {
                b = rng.gen_range(0..n);
            }
            (format!("node_{a}"), format!("node_{b}"))
        })
        .collect()
}

struct Report {
    routed: usize,
    succeeded: usize,
    total_stretch: f64,
    elapsed_ms: u128,
}

impl std::fmt::Display for Report {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "=== Routing Report ===")?;
        writeln!(f, "Queries:        {}", self.routed)?;
        writeln!(f, "Succeeded:      {}", self.succeeded)?;
        if self.succeeded > 0 {
            writeln!(f, "Mean stretch:   {:.4}", self.total_stretch / self.succeeded as f64)?;
        }
        writeln!(f, "Elapsed:        {} ms", self.elapsed_ms)?;
        Ok(())
    }
}

fn run_routes(embedding: &Embedding, pairs: &[(String, String)]) -> Report {
    let config = RouterConfig::default();
    let start = Instant::now();
    let mut succeeded = 0;
    let mut total_stretch = 0.0;

    for (a, b) in pairs {
        match router::route(embedding, a, b, &config) {
            Ok(result) if result.success => {
                succeeded += 1;
                total_stretch += result.stretch;
                println!(
                    "  {} -> {}: path_length={} stretch={:.4}",
                    a, b, result.path_length, result.stretch
                );
            }
            Ok(_) => println!("  {} -> {}: no path found", a, b),
            Err(e) => println!("  {} -> {}: error: {e}", a, b, e = e),
        }
    }

    Report {
        routed: pairs.len(),
        succeeded,
        total_stretch,
        elapsed_ms: start.elapsed().as_millis(),
    }
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let args: Vec<String> = std::env::args().collect();
    let mut config = CliConfig::default();

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--input" | "-i" if i + 1 < args.len() => {
                config.input_path = args[i + 1].clone();
                i += 1;
            }
            "--generate" | "-g" if i + 1 < args.len() => {
                config.generate = args[i + 1].parse().ok();
                i += 1;
            }
            "--route" | "-r" if i + 2 < args.len() => {
                config.route_pairs.push((args[i + 1].clone(), args[i + 2].clone()));
                i += 2;
            }
            "--seed" if i + 1 < args.len() => {
                config.seed = args[i + 1].parse().unwrap_or(0);
                i += 1;
            }
            "--help" | "-h" => {
                println!("Usage: hypermap-cli (--input EDGES.csv | --generate N) [--route A B]... [--seed N]");
                println!();
                println!("Options:");
                println!("  -i, --input PATH    Edge-list CSV (header + source,target rows)");
                println!("  -g, --generate N    Generate a Barabasi-Albert graph of N nodes instead");
                println!("  -r, --route A B     Route from A to B (repeatable)");
                println!("      --seed NUM      PRNG seed for embedding and generation (default: 0)");
                println!("  -h, --help          Show this help");
                return;
            }
            _ => {}
        }
        i += 1;
    }

    if config.input_path.is_empty() && config.generate.is_none() {
        eprintln!("error: one of --input or --generate is required (try --help)");
        std::process::exit(1);
    }

    let embedding_config = EmbeddingConfig { seed: config.seed, ..Default::default() };
    let mut gen_rng = StdRng::seed_from_u64(config.seed);

    let embedding = if let Some(n) = config.generate {
        println!("Generating Barabasi-Albert graph: {n} nodes");
        let edges = generate_ba_edges(n, 3, &mut gen_rng);
        let graph = match hypermap_core::graph::build_graph(&edges) {
            Ok(g) => g,
            Err(e) => {
                eprintln!("error: {e}");
                std::process::exit(1);
            }
        };
        print!("Embedding... ");
        let start = Instant::now();
        let embedding = match embedding::embed_graph(graph, &embedding_config) {
            Ok(e) => e,
            Err(e) => {
                println!("failed");
                eprintln!("error: {e}");
                std::process::exit(1);
            }
        };
        println!("done ({} ms)", start.elapsed().as_millis());
        if config.route_pairs.is_empty() {
            config.route_pairs = random_route_pairs(n, 20.min(n), &mut gen_rng);
        }
        embedding
    } else {
        let text = match fs::read_to_string(&config.input_path) {
            Ok(t) => t,
            Err(e) => {
                eprintln!("error: could not read {}: {e}", config.input_path);
                std::process::exit(1);
            }
        };
        print!("Embedding... ");
        let start = Instant::now();
        let embedding = match embedding::embed(&text, &embedding_config) {
            Ok(e) => e,
            Err(e) => {
                println!("failed");
                eprintln!("error: {e}");
                std::process::exit(1);
            }
        };
        println!("done ({} ms)", start.elapsed().as_millis());
        embedding
    };

    println!("Nodes:          {}", embedding.stats.n);
    println!("Mean degree:    {:.3}", embedding.stats.k_bar);
    println!("Gamma:          {:.3}", embedding.stats.gamma);
    println!("Beta:           {:.3}", embedding.stats.beta);
    println!("Clustering:     {:.3}", embedding.stats.clustering);
    println!("Disc radius R:  {:.3}", embedding.stats.r);
    println!();

    if !config.route_pairs.is_empty() {
        let report = run_routes(&embedding, &config.route_pairs);
        println!();
        println!("{report}");
    }
}
