use std::convert::Infallible;

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use merkle_anchor::{MemoryStore, MerkleContract, MerkleTree};
use sha2::Sha256;

pub fn generate_random_leaves(count: usize) -> Vec<String> {
    (0..count)
        .map(|_| hex::encode(rand::random::<[u8; 32]>()))
        .collect()
}

fn bench_build(c: &mut Criterion) {
    let mut group = c.benchmark_group("Merkle Tree Build");

    for size in [100, 1_000, 10_000] {
        let leaves = generate_random_leaves(size);
        group.bench_with_input(BenchmarkId::new("Tree", size), &leaves, |b, leaves| {
            b.iter(|| black_box(MerkleTree::<32, Sha256>::build(leaves.clone())).unwrap())
        });
    }

    // Build plus encode plus store write
    let leaves = generate_random_leaves(1_000);
    group.bench_function("Contract", |b| {
        b.iter(|| {
            let mut contract = MerkleContract::<32, Sha256, Infallible>::new(Box::new(MemoryStore::new()));
            black_box(contract.build(leaves.clone(), 0)).unwrap();
        })
    });

    group.finish();
}

criterion_group!(benches, bench_build);
criterion_main!(benches);
