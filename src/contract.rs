//! Ledger-facing adapter over [`MerkleTree`]
//!
//! Exposes the fixed operation set a ledger host calls: build a tree from a
//! JSON array of transaction ids, read its root, produce a proof, and plain
//! key/value `put`/`get`. Trees live in the [`TreeStore`] under
//! `<key_prefix><index>`.

use std::marker::PhantomData;

use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::{db::TreeStore, Digest, Hasher, MerkleProof, MerkleTree, TreeError};

/// Runtime settings of a [`MerkleContract`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ContractConfig {
    /// Prepended to the tree identifier to form the store key.
    pub key_prefix: String,
    /// Largest batch accepted by a single build, unbounded when `None`.
    pub max_leaves: Option<usize>,
}

impl Default for ContractConfig {
    fn default() -> Self {
        Self {
            key_prefix: "tree_".to_string(),
            max_leaves: None,
        }
    }
}

/// Merkle tree contract.
/// * `HASH_SIZE` - size of the hash digest in bytes.
/// * `H` - Hasher that will be used to hash nodes.
/// * `DbError` - error type of the backing store.
pub struct MerkleContract<const HASH_SIZE: usize, H: Hasher<HASH_SIZE> + Clone, DbError> {
    store: Box<dyn TreeStore<DbError = DbError>>,
    config: ContractConfig,
    _phantom: PhantomData<H>,
}

impl<const HASH_SIZE: usize, H: Hasher<HASH_SIZE> + Clone, DbError>
    MerkleContract<HASH_SIZE, H, DbError>
{
    pub fn new(store: Box<dyn TreeStore<DbError = DbError>>) -> Self {
        Self::with_config(store, ContractConfig::default())
    }

    pub fn with_config(store: Box<dyn TreeStore<DbError = DbError>>, config: ContractConfig) -> Self {
        Self {
            store,
            config,
            _phantom: PhantomData,
        }
    }

    pub fn store(&self) -> &dyn TreeStore<DbError = DbError> {
        self.store.as_ref()
    }

    pub fn config(&self) -> &ContractConfig {
        &self.config
    }

    /// Store key of the tree with identifier `index`.
    pub fn tree_key(&self, index: u64) -> String {
        format!("{}{}", self.config.key_prefix, index)
    }

    /// Builds and persists a tree from a JSON array of leaf strings.
    pub fn build_merkle_tree(
        &mut self,
        tx_array: &str,
        index: u64,
    ) -> Result<Digest<HASH_SIZE>, TreeError<DbError>> {
        let leaves: Vec<String> = serde_json::from_str(tx_array)
            .map_err(|e| TreeError::InvalidInput(format!("failed to parse leaf array: {e}")))?;
        self.build(leaves, index)
    }

    /// Builds the tree over `leaves` and stores it under `index`.
    ///
    /// Fails without writing anything if a tree already exists under that
    /// identifier. The existence check is not atomic with the write; the host
    /// must serialize calls per identifier.
    pub fn build(
        &mut self,
        leaves: Vec<String>,
        index: u64,
    ) -> Result<Digest<HASH_SIZE>, TreeError<DbError>> {
        let key = self.tree_key(index);
        if self.exists(&key)? {
            warn!(key = %key, "merkle tree already exists");
            return Err(TreeError::AlreadyExists { key });
        }
        if let Some(max_leaves) = self.config.max_leaves {
            if leaves.len() > max_leaves {
                return Err(TreeError::InvalidInput(format!(
                    "{} leaves exceed the limit of {}",
                    leaves.len(),
                    max_leaves
                )));
            }
        }

        debug!(key = %key, leaves = leaves.len(), "building merkle tree");
        let tree = MerkleTree::<HASH_SIZE, H>::build(leaves).map_err(TreeError::with_store_error)?;
        let root = tree.root();
        let encoded = tree.encode().map_err(TreeError::with_store_error)?;
        self.store.put(&key, encoded)?;
        info!(key = %key, root = %root, depth = tree.depth(), "merkle tree persisted");
        Ok(root)
    }

    /// Loads and decodes the tree stored under `index`.
    pub fn load_tree(&self, index: u64) -> Result<MerkleTree<HASH_SIZE, H>, TreeError<DbError>> {
        let key = self.tree_key(index);
        match self.store.get(&key)? {
            Some(bytes) if !bytes.is_empty() => {
                MerkleTree::decode(&bytes).map_err(TreeError::with_store_error)
            }
            _ => Err(TreeError::TreeNotFound { key }),
        }
    }

    /// Root of the tree stored under `index`.
    pub fn get_root(&self, index: u64) -> Result<Digest<HASH_SIZE>, TreeError<DbError>> {
        Ok(self.load_tree(index)?.root())
    }

    /// Proof for the first leaf equal to `leaf` in the tree stored under `index`.
    pub fn get_merkle_proof(
        &self,
        leaf: &str,
        index: u64,
    ) -> Result<MerkleProof<HASH_SIZE, H>, TreeError<DbError>> {
        let proof = self
            .load_tree(index)?
            .proof(leaf)
            .map_err(TreeError::with_store_error)?;
        debug!(tree = index, position = proof.index(), "merkle proof generated");
        Ok(proof)
    }

    /// Proof for the leaf at `position` in the tree stored under `index`.
    pub fn get_merkle_proof_at(
        &self,
        position: usize,
        index: u64,
    ) -> Result<MerkleProof<HASH_SIZE, H>, TreeError<DbError>> {
        self.load_tree(index)?
            .proof_at(position)
            .map_err(TreeError::with_store_error)
    }

    /// Raw ledger write, independent of any tree.
    pub fn put(&mut self, key: &str, val: &str) -> Result<(), TreeError<DbError>> {
        self.store.put(key, val.as_bytes().to_vec())
    }

    /// Raw ledger read. A missing key reads as the empty string.
    pub fn get(&self, key: &str) -> Result<String, TreeError<DbError>> {
        Ok(self
            .store
            .get(key)?
            .map(|bytes| String::from_utf8_lossy(&bytes).into_owned())
            .unwrap_or_default())
    }

    // the ledger reports missing state as an empty value
    fn exists(&self, key: &str) -> Result<bool, TreeError<DbError>> {
        Ok(self
            .store
            .get(key)?
            .is_some_and(|bytes| !bytes.is_empty()))
    }
}
