//! Benchmark for the embedding pipeline.
//!
//! Measures embedding throughput on generated Barabási-Albert scale-free
//! graphs of increasing size, and routing latency on a fixed embedding.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use hypermap_core::config::{EmbeddingConfig, RouterConfig};
use hypermap_core::edge_parser::Edge;
use hypermap_core::embedding::{self, Embedding};
use hypermap_core::graph::build_graph;
use hypermap_core::router;
use rand::Rng;

/// Create a Barabási-Albert (BA) scale-free network as an edge list.
fn create_ba_edges(n: usize, m: usize) -> Vec<Edge> {
    let mut edges = Vec::new();
    let mut degrees = vec![0usize; n];

    for i in 0..m {
        for j in (i + 1)..m {
            edges.push(edge(i, j));
            degrees[i] += 1;
            degrees[j] += 1;
        }
    }

    let mut rng = rand::thread_rng();
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

fn embed_ba(n: usize, m: usize) -> Embedding {
    let edges = create_ba_edges(n, m);
    let graph = build_graph(&edges).unwrap();
    embedding::embed_graph(graph, &EmbeddingConfig::default()).unwrap()
}

fn bench_embedding_throughput(c: &mut Criterion) {
    let mut group = c.benchmark_group("embedding_throughput");

    for size in [50, 100, 200, 500].iter() {
        let n = *size;
        let m = 3;
        let edges = create_ba_edges(n, m);

        group.throughput(Throughput::Elements(n as u64));
        group.bench_with_input(BenchmarkId::new("embed", n), &n, |b, &_n| {
            b.iter(|| {
                let graph = build_graph(&edges).unwrap();
                let result = embedding::embed_graph(graph, &EmbeddingConfig::default()).unwrap();
                black_box(&result);
            });
        });
    }

    group.finish();
}

fn bench_routing_latency(c: &mut Criterion) {
    let mut group = c.benchmark_group("routing_latency");
    let n = 200;
    let embedding = embed_ba(n, 3);
    let config = RouterConfig::default();

    group.bench_function("route_pair", |b| {
        b.iter(|| {
            let result = router::route(&embedding, "node_0", &format!("node_{}", n - 1), &config).unwrap();
            black_box(&result);
        });
    });

    group.finish();
}

criterion_group!(benches, bench_embedding_throughput, bench_routing_latency);
criterion_main!(benches);
