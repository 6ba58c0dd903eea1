//! Basic example of anchoring a transaction batch
//!
//! This example demonstrates:
//! - Building a tree through the ledger adapter
//! - Reading back the root
//! - Requesting and verifying an inclusion proof

use std::convert::Infallible;

use merkle_anchor::{verify_merkle_proof, MemoryStore, MerkleContract};
use sha2::Sha256;
use tracing_subscriber::EnvFilter;

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    // Trees are kept in memory here, a ledger would supply its own store
    let store = Box::new(MemoryStore::new());
    let mut contract = MerkleContract::<32, Sha256, Infallible>::new(store);

    // Anchor the transactions of block 14
    let txs = r#"["0c62a1","41f90e","77aa13","9e01bc","c3d2f8"]"#;
    let root = contract.build_merkle_tree(txs, 14).unwrap();
    println!("Root of tree_14: {}", root);

    // A second build for the same block is refused
    if let Err(e) = contract.build_merkle_tree(txs, 14) {
        println!("Rebuild refused: {}", e);
    }

    // Get a proof for one transaction
    let proof = contract.get_merkle_proof("77aa13", 14).unwrap();
    println!("Proof index: {}", proof.index());
    for (height, sibling) in proof.siblings().iter().enumerate() {
        println!("  sibling at height {}: {}", height, sibling);
    }

    // Anyone holding the root can check it
    println!(
        "Proof verification: {}",
        verify_merkle_proof("77aa13", &proof, &contract.get_root(14).unwrap())
    );

    // Compact form for transport
    let encoded = proof.compress("77aa13").encode();
    println!("Compressed proof: {} bytes ({})", encoded.len(), hex::encode(&encoded));
}
