//! Example of implementing a custom hasher
//!
//! This example demonstrates:
//! - Creating a custom hasher implementation
//! - Building trees with it
//! - Comparing roots with the default SHA-256 hasher

use merkle_anchor::{Hasher, MerkleTree};
use sha2::{Digest, Sha256};

// Double SHA-256, as used for bitcoin transaction merkle trees
#[derive(Clone)]
struct DoubleSha256;

impl Hasher<32> for DoubleSha256 {
    fn hash(data: &[u8]) -> [u8; 32] {
        let first = Sha256::digest(data);
        Sha256::digest(first).into()
    }
}

fn main() {
    let leaves = ["tx-a", "tx-b", "tx-c"];

    // Build a tree with our custom hasher
    let tree = MerkleTree::<32, DoubleSha256>::build(leaves).unwrap();
    println!("Root with double SHA-256: {}", tree.root());

    // Proofs carry the hasher in their type
    let proof = tree.proof("tx-c").unwrap();
    println!("Proof verification: {}", proof.verify("tx-c", &tree.root()));

    // Compare with standard SHA256
    let standard = MerkleTree::<32, Sha256>::build(leaves).unwrap();
    println!("Root with SHA-256: {}", standard.root());

    println!("\nThe roots differ because every node is hashed twice.");
}
