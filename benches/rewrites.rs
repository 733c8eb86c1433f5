//! Benchmarks for parsing, candidate search, and rewriting.
//!
//! Two shapes: a wide sheet of many small cuts, and a deep chain of nested
//! cuts that exercises the iterative traversals.

use aegraph::prelude::*;
use criterion::{black_box, criterion_group, criterion_main, Criterion};

/// `(x0, [x0, y0], [[z0]], x1, [x1, y1], [[z1]], ...)`.
fn wide_text(n: usize) -> String {
    let elements: Vec<String> = (0..n)
        .map(|i| format!("x{i}, [x{i}, y{i}], [[z{i}]]"))
        .collect();
    format!("({})", elements.join(", "))
}

/// `([[[ ... p ... ]]])` with `depth` cuts.
fn deep_text(depth: usize) -> String {
    format!("({}p{})", "[".repeat(depth), "]".repeat(depth))
}

/// `([x], [[x], [[x], ... [x, y]]])` with `rungs` nested rungs.
fn ladder(rungs: usize) -> AEGraph {
    let mut inner = AEGraph::cut(["x", "y"], vec![]);
    for _ in 0..rungs {
        inner = AEGraph::cut(Vec::<String>::new(), vec![AEGraph::cut(["x"], vec![]), inner]);
    }
    AEGraph::sheet(Vec::<String>::new(), vec![AEGraph::cut(["x"], vec![]), inner])
}

/// Parse and serialize a wide graph.
fn bench_parse_wide(c: &mut Criterion) {
    let text = wide_text(1_000);
    c.bench_function("parse_wide_1k", |b| {
        b.iter(|| {
            let graph = AEGraph::parse(black_box(&text)).unwrap();
            black_box(graph.repr());
        });
    });
}

/// Parse a 10k-deep chain.
fn bench_parse_deep(c: &mut Criterion) {
    let text = deep_text(10_000);
    c.bench_function("parse_deep_10k", |b| {
        b.iter(|| AEGraph::parse(black_box(&text)).unwrap());
    });
}

/// Candidate search across all rules on a wide graph.
fn bench_candidates_wide(c: &mut Criterion) {
    let graph = AEGraph::parse(&wide_text(200)).unwrap();
    c.bench_function("candidates_wide_200", |b| {
        b.iter(|| candidates(black_box(&graph)));
    });
}

/// A single double-cut removal. Only the spine is copied.
fn bench_double_cut_wide(c: &mut Criterion) {
    let graph = AEGraph::parse(&wide_text(1_000)).unwrap();
    let path = graph.possible_double_cuts()[0].clone();
    c.bench_function("double_cut_wide_1k", |b| {
        b.iter(|| graph.double_cut(black_box(&path)).unwrap());
    });
}

/// Erasure at the bottom of a deep chain.
fn bench_erase_deep(c: &mut Criterion) {
    let depth = 2_000;
    let graph = AEGraph::parse(&format!("(q, {}p, q{})", "[".repeat(depth), "]".repeat(depth))).unwrap();
    let path = graph
        .possible_erasures()
        .into_iter()
        .max_by_key(|p| p.len())
        .unwrap();
    c.bench_function("erase_deep_2k", |b| {
        b.iter(|| graph.erase(black_box(&path)).unwrap());
    });
}

/// Deiteration search where every rung holds a removable copy.
fn bench_deiterations_ladder(c: &mut Criterion) {
    let graph = ladder(1_000);
    c.bench_function("deiterations_ladder_1k", |b| {
        b.iter(|| black_box(&graph).possible_deiterations());
    });
}

/// Parse a chain at the default depth limit.
fn bench_parse_deepest(c: &mut Criterion) {
    let text = deep_text(GrammarConfig::default().max_depth);
    c.bench_function("parse_deep_64k", |b| {
        b.iter(|| AEGraph::parse(black_box(&text)).unwrap());
    });
}

criterion_group!(
    benches,
    bench_parse_deepest,
    bench_deiterations_ladder,
    bench_parse_wide,
    bench_parse_deep,
    bench_candidates_wide,
    bench_double_cut_wide,
    bench_erase_deep
);
criterion_main!(benches);
