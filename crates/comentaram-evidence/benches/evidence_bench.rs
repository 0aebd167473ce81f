//! Benchmarks for the evidence engine
//!
//! Measures performance of:
//! - Topic hashing
//! - Growth simulation (profile draw + wave evaluation)
//! - A full board step over the seed catalog size

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use comentaram_evidence::{
    classify_state, compute_evidence_score, hash32, simulate_growth, step_energy, TopicState,
};

const IDS: [&str; 12] = [
    "flamengo",
    "palmeiras",
    "corinthians",
    "selecao",
    "ufc",
    "mcgregor",
    "futebol-mundial",
    "presidencia",
    "congresso",
    "stf",
    "eleicoes-2026",
    "gastos-publicos",
];

/// Benchmark the rolling hash on ids of different lengths
fn bench_hash(c: &mut Criterion) {
    let mut group = c.benchmark_group("hash32");

    for id in ["", "stf", "futebol-mundial", "uma-pauta-com-um-identificador-bem-longo"] {
        group.throughput(Throughput::Bytes(id.len() as u64));
        group.bench_with_input(BenchmarkId::from_parameter(id.len()), &id, |b, id| {
            b.iter(|| hash32(black_box(id)))
        });
    }
    group.finish();
}

/// Benchmark growth at increasing tick counts
fn bench_growth(c: &mut Criterion) {
    let mut group = c.benchmark_group("simulate_growth");

    for &tick in &[0u64, 1_000, 1_000_000, u64::MAX / 2] {
        group.throughput(Throughput::Elements(1));
        group.bench_with_input(BenchmarkId::from_parameter(tick), &tick, |b, &tick| {
            b.iter(|| simulate_growth(black_box("flamengo"), black_box(tick)))
        });
    }
    group.finish();
}

/// Benchmark one step over every seed topic
fn bench_board_step(c: &mut Criterion) {
    let mut group = c.benchmark_group("board_step");
    group.throughput(Throughput::Elements(IDS.len() as u64));

    group.bench_function("seed_catalog", |b| {
        let mut states = [TopicState::Steady; 12];
        let mut energies = [0.5f64; 12];
        let mut tick = 0u64;
        b.iter(|| {
            for (i, id) in IDS.iter().enumerate() {
                let growth = simulate_growth(id, tick);
                states[i] = classify_state(growth, Some(states[i]));
                energies[i] = step_energy(energies[i], states[i]);
                black_box(compute_evidence_score(energies[i], growth, states[i]));
            }
            tick += 1;
        })
    });
    group.finish();
}

criterion_group!(benches, bench_hash, bench_growth, bench_board_step);
criterion_main!(benches);
