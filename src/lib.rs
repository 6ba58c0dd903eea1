//! Build-once, prove-many Merkle trees
//!
//! This crate anchors an ordered batch of transaction identifiers into a single
//! Merkle root and produces inclusion proofs that a third party holding only the
//! root can check.
//!
//! The crate provides:
//! - Deterministic tree construction with self-pairing of odd nodes
//! - Audit path generation by leaf value or by leaf position
//! - Proof verification and compact proof encoding
//! - A ledger adapter persisting trees through the `TreeStore` trait
//!
//! Leaf hashes and node hashes share the same hash function with no domain
//! separation, and a self-paired node is hashed exactly like two equal
//! children. Trees built elsewhere with this scheme stay verifiable, but the
//! scheme does not protect against second-preimage tricks that rely on
//! reinterpreting an internal node as a leaf.

mod codec;
mod contract;
mod db;
mod digest;
mod error;
mod proof;
mod tree;

pub use codec::TreeDocument;
pub use contract::{ContractConfig, MerkleContract};
pub use db::{MemoryStore, ThreadSafe, TreeStore};
pub use digest::{hash_leaf, hash_pair, Digest, DigestError, Hasher};
pub use error::{ErrorKind, ProofError, TreeError};
pub use proof::{verify_merkle_proof, CompressedProof, MerkleProof};
pub use tree::{sibling_index, MerkleTree};

#[cfg(test)]
mod tests;
