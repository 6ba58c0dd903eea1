use criterion::{black_box, criterion_group, criterion_main, Criterion};
use merkle_anchor::{verify_merkle_proof, CompressedProof, MerkleTree};
use sha2::Sha256;

pub fn generate_random_leaves(count: usize) -> Vec<String> {
    (0..count)
        .map(|_| hex::encode(rand::random::<[u8; 32]>()))
        .collect()
}

fn setup_tree(num_leaves: usize) -> (MerkleTree<32, Sha256>, Vec<String>) {
    let leaves = generate_random_leaves(num_leaves);
    let tree = MerkleTree::<32, Sha256>::build(leaves.clone()).unwrap();
    (tree, leaves)
}

fn bench_proof_generation(c: &mut Criterion) {
    let mut group = c.benchmark_group("Merkle Proof Generation");

    // Setup a tree with 1000 leaves
    let (tree, leaves) = setup_tree(1_000);

    // Lookup by value scans the leaves
    group.bench_function("By Value", |b| {
        b.iter(|| {
            for leaf in leaves.iter().step_by(10) {
                black_box(tree.proof(leaf)).unwrap();
            }
        })
    });

    group.bench_function("By Index", |b| {
        b.iter(|| {
            for index in (0..leaves.len()).step_by(10) {
                black_box(tree.proof_at(index)).unwrap();
            }
        })
    });

    group.finish();
}

fn bench_proof_verification(c: &mut Criterion) {
    let mut group = c.benchmark_group("Merkle Proof Verification");

    let (tree, leaves) = setup_tree(1_000);
    let root = tree.root();
    let proofs: Vec<_> = leaves.iter().map(|leaf| tree.proof(leaf).unwrap()).collect();
    let encoded: Vec<_> = leaves
        .iter()
        .zip(proofs.iter())
        .map(|(leaf, proof)| proof.compress(leaf).encode())
        .collect();

    group.bench_function("Full Proof", |b| {
        b.iter(|| {
            for (leaf, proof) in leaves.iter().zip(proofs.iter()) {
                assert!(black_box(verify_merkle_proof(leaf, proof, &root)));
            }
        })
    });

    group.bench_function("Compressed Proof", |b| {
        b.iter(|| {
            for (leaf, bytes) in leaves.iter().zip(encoded.iter()) {
                let proof = CompressedProof::<32, Sha256>::decode(bytes)
                    .unwrap()
                    .decompress(leaf)
                    .unwrap();
                assert!(black_box(proof.verify(leaf, &root)));
            }
        })
    });

    group.finish();
}

criterion_group!(benches, bench_proof_generation, bench_proof_verification);
criterion_main!(benches);
