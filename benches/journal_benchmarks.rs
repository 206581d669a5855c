// SPDX-License-Identifier: PMPL-1.0-or-later
//! Performance benchmarks for the VeriSimDB journal

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use rand::rngs::StdRng;
use rand::{RngCore, SeedableRng};
use tempfile::TempDir;

use verisim_journal::{decode, encode, Journal, SyncMode};

const ENTRY_SIZE: usize = 1024;

fn random_entry(rng: &mut StdRng) -> Vec<u8> {
    let mut entry = vec![0u8; ENTRY_SIZE];
    rng.fill_bytes(&mut entry);
    entry
}

// ============================================================================
// Push Benchmarks
// ============================================================================

fn bench_push(c: &mut Criterion) {
    let mut group = c.benchmark_group("push");
    group.throughput(Throughput::Bytes(ENTRY_SIZE as u64));

    for sync_mode in [SyncMode::Async, SyncMode::Fsync] {
        let dir = TempDir::new().unwrap();
        let mut journal = Journal::open(dir.path().join("push.journal"), sync_mode).unwrap();
        let entry = random_entry(&mut StdRng::seed_from_u64(1));

        group.bench_with_input(
            BenchmarkId::new("push_1k", format!("{sync_mode:?}")),
            &entry,
            |b, entry| b.iter(|| journal.push(black_box(entry)).unwrap()),
        );

        journal.close().unwrap();
    }

    group.finish();
}

// ============================================================================
// Pop Benchmarks
// ============================================================================

fn bench_pop(c: &mut Criterion) {
    let mut group = c.benchmark_group("pop");
    group.throughput(Throughput::Bytes(ENTRY_SIZE as u64));

    let dir = TempDir::new().unwrap();
    let mut journal = Journal::open(dir.path().join("pop.journal"), SyncMode::Async).unwrap();
    let mut rng = StdRng::seed_from_u64(2);

    // Keep the journal one entry ahead of the reader on every iteration.
    group.bench_function("push_then_pop_1k", |b| {
        let entry = random_entry(&mut rng);
        let mut buffer = Vec::with_capacity(ENTRY_SIZE);
        b.iter(|| {
            journal.push(&entry).unwrap();
            buffer = journal.pop_into(std::mem::take(&mut buffer)).unwrap().into_buffer();
            black_box(buffer.len())
        });
    });

    group.finish();
    journal.close().unwrap();
}

// ============================================================================
// Codec Benchmarks
// ============================================================================

fn bench_codec(c: &mut Criterion) {
    let mut group = c.benchmark_group("codec");
    group.throughput(Throughput::Elements(1000));

    let mut rng = StdRng::seed_from_u64(3);
    let entries: Vec<Vec<u8>> = (0..1000).map(|_| random_entry(&mut rng)).collect();

    group.bench_function("encode_1000", |b| {
        let mut stream = Vec::with_capacity(1000 * (ENTRY_SIZE + 4));
        b.iter(|| {
            stream.clear();
            for entry in &entries {
                encode(&mut stream, entry, false).unwrap();
            }
            black_box(stream.len())
        });
    });

    let mut stream = Vec::new();
    for entry in &entries {
        encode(&mut stream, entry, false).unwrap();
    }

    group.bench_function("decode_1000_reusing_buffer", |b| {
        b.iter(|| {
            let mut source = &stream[..];
            let mut buffer = Vec::new();
            for _ in 0..1000 {
                buffer = decode(&mut source, buffer).unwrap().into_buffer();
            }
            black_box(buffer.len())
        });
    });

    group.finish();
}

criterion_group!(push_benches, bench_push);

criterion_group!(pop_benches, bench_pop);

criterion_group!(codec_benches, bench_codec);

criterion_main!(push_benches, pop_benches, codec_benches);
