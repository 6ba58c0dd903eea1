//! End-to-end tests for tree construction, proofs and verification

use rand::{distributions::Alphanumeric, Rng};
use sha2::Sha256;

use crate::{hash_leaf, Digest, MerkleProof, MerkleTree};

fn random_leaves(rng: &mut impl Rng, count: usize) -> Vec<String> {
    (0..count)
        .map(|_| {
            let len = rng.gen_range(1..48);
            (0..len)
                .map(|_| char::from(rng.sample(Alphanumeric)))
                .collect()
        })
        .collect()
}

fn flip_bit(digest: &Digest<32>, bit: usize) -> Digest<32> {
    let mut bytes = digest.into_inner();
    bytes[bit / 8] ^= 1 << (bit % 8);
    Digest::from(bytes)
}

#[test]
fn test_every_leaf_verifies() {
    for count in 1..=33 {
        let leaves: Vec<String> = (0..count).map(|i| format!("tx-{count}-{i}")).collect();
        let tree = MerkleTree::<32, Sha256>::build(leaves.clone()).unwrap();
        let root = tree.root();
        for (i, leaf) in leaves.iter().enumerate() {
            let proof = tree.proof(leaf).unwrap();
            assert_eq!(proof.index(), i);
            assert_eq!(proof.len(), tree.depth());
            assert!(proof.verify(leaf, &root), "leaf {i} of {count}");
        }
    }
}

#[test]
fn test_random_batches_verify() {
    let mut rng = rand::thread_rng();
    for _ in 0..20 {
        let count = rng.gen_range(1..200);
        let leaves = random_leaves(&mut rng, count);
        let tree = MerkleTree::<32, Sha256>::build(leaves.clone()).unwrap();
        let root = tree.root();
        let position = rng.gen_range(0..count);
        let proof = tree.proof_at(position).unwrap();
        assert!(proof.verify(&leaves[position], &root));
        // by value lookup lands on the first occurrence of the same text
        let first = tree.position(&leaves[position]).unwrap();
        assert!(tree.proof(&leaves[position]).unwrap().verify(&leaves[first], &root));
    }
}

#[test]
fn test_tampered_leaf_fails() {
    let tree = MerkleTree::<32, Sha256>::build(["a", "b", "c", "d", "e"]).unwrap();
    let proof = tree.proof("c").unwrap();
    let leaf = b"c".to_vec();
    for bit in 0..leaf.len() * 8 {
        let mut tampered = leaf.clone();
        tampered[bit / 8] ^= 1 << (bit % 8);
        assert!(!proof.verify(&tampered, &tree.root()));
    }
}

#[test]
fn test_tampered_sibling_fails() {
    let tree = MerkleTree::<32, Sha256>::build(["a", "b", "c", "d", "e"]).unwrap();
    for leaf in ["a", "c", "e"] {
        let proof = tree.proof(leaf).unwrap();
        for level in 0..proof.len() {
            for bit in [0, 7, 100, 255] {
                let mut siblings = proof.siblings().to_vec();
                siblings[level] = flip_bit(&siblings[level], bit);
                let tampered = MerkleProof::<32, Sha256>::new(proof.index(), siblings);
                assert!(!tampered.verify(leaf, &tree.root()));
            }
        }
    }
}

#[test]
fn test_tampered_index_fails() {
    // a power of two batch has no self-paired nodes, so every index bit counts
    let leaves: Vec<String> = (0..8).map(|i| format!("tx{i}")).collect();
    let tree = MerkleTree::<32, Sha256>::build(leaves.clone()).unwrap();
    for (i, leaf) in leaves.iter().enumerate() {
        let proof = tree.proof(leaf).unwrap();
        for bit in 0..usize::BITS {
            let tampered =
                MerkleProof::<32, Sha256>::new(proof.index() ^ (1 << bit), proof.siblings().to_vec());
            assert!(!tampered.verify(leaf, &tree.root()), "leaf {i} bit {bit}");
        }
    }
}

#[test]
fn test_self_pairing_is_not_distinguished() {
    // [a, b, c] and [a, b, c, c] commit to the same root
    let three = MerkleTree::<32, Sha256>::build(["a", "b", "c"]).unwrap();
    let four = MerkleTree::<32, Sha256>::build(["a", "b", "c", "c"]).unwrap();
    assert_eq!(three.root(), four.root());
}

#[test]
fn test_no_domain_separation() {
    // an internal node verifies as a one-leaf tree of its own preimage
    let tree = MerkleTree::<32, Sha256>::build(["a", "b"]).unwrap();
    let a = hash_leaf::<32, Sha256>(b"a");
    let b = hash_leaf::<32, Sha256>(b"b");
    let preimage = [a.as_bytes().as_slice(), b.as_bytes().as_slice()].concat();
    let proof = MerkleProof::<32, Sha256>::new(0, vec![]);
    assert!(proof.verify(&preimage, &tree.root()));
}

#[test]
fn test_compressed_proofs_all_positions() {
    let leaves: Vec<String> = (0..21).map(|i| format!("tx{i}")).collect();
    let tree = MerkleTree::<32, Sha256>::build(leaves.clone()).unwrap();
    for leaf in &leaves {
        let proof = tree.proof(leaf).unwrap();
        let compressed = proof.compress(leaf);
        assert!(compressed.siblings().len() <= proof.len());
        let restored = compressed.decompress(leaf).unwrap();
        assert_eq!(restored, proof);
        assert!(restored.verify(leaf, &tree.root()));
    }
    // the last leaf of an odd batch pairs with itself at layer 0
    let last = tree.proof("tx20").unwrap().compress("tx20");
    assert!(last.siblings().len() < tree.depth());
}

#[test]
fn test_persisted_tree_serves_same_proofs() {
    let leaves: Vec<String> = (0..9).map(|i| format!("tx{i}")).collect();
    let tree = MerkleTree::<32, Sha256>::build(leaves.clone()).unwrap();
    let restored = MerkleTree::<32, Sha256>::decode(&tree.encode().unwrap()).unwrap();
    for leaf in &leaves {
        assert_eq!(restored.proof(leaf).unwrap(), tree.proof(leaf).unwrap());
    }
}
