//! Persisted form of a [`MerkleTree`].
//!
//! A tree is stored as a JSON document
//!
//! ```json
//! {"leaves": ["tx1", "tx2"], "layers": [["<hex>", "<hex>"], ["<hex>"]]}
//! ```
//!
//! where every digest is lower-case hex. Decoding validates the layered shape
//! and reports any mismatch as [`TreeError::Corrupt`].

use serde::{Deserialize, Serialize};

use crate::{Digest, Hasher, MerkleTree, TreeError};

/// Serialized shape of a tree.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TreeDocument<const HASH_SIZE: usize> {
    pub leaves: Vec<String>,
    pub layers: Vec<Vec<Digest<HASH_SIZE>>>,
}

impl<const HASH_SIZE: usize, H: Hasher<HASH_SIZE> + Clone> From<MerkleTree<HASH_SIZE, H>>
    for TreeDocument<HASH_SIZE>
{
    fn from(tree: MerkleTree<HASH_SIZE, H>) -> Self {
        let (leaves, layers) = tree.into_parts();
        Self { leaves, layers }
    }
}

impl<const HASH_SIZE: usize, H: Hasher<HASH_SIZE> + Clone> TryFrom<TreeDocument<HASH_SIZE>>
    for MerkleTree<HASH_SIZE, H>
{
    type Error = TreeError;

    fn try_from(document: TreeDocument<HASH_SIZE>) -> Result<Self, Self::Error> {
        MerkleTree::from_parts(document.leaves, document.layers)
    }
}

impl<const HASH_SIZE: usize, H: Hasher<HASH_SIZE> + Clone> MerkleTree<HASH_SIZE, H> {
    /// Serializes the tree into its stored JSON form.
    pub fn encode(&self) -> Result<Vec<u8>, TreeError> {
        let document = TreeDocument::from(self.clone());
        serde_json::to_vec(&document)
            .map_err(|e| TreeError::Corrupt(format!("failed to encode tree: {e}")))
    }

    /// Parses a stored JSON document back into a tree.
    pub fn decode(bytes: &[u8]) -> Result<Self, TreeError> {
        let document: TreeDocument<HASH_SIZE> = serde_json::from_slice(bytes)
            .map_err(|e| TreeError::Corrupt(format!("failed to decode tree: {e}")))?;
        Self::try_from(document)
    }
}
