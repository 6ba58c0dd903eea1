use std::marker::PhantomData;

use tracing::trace;

use super::MerkleTree;
use crate::{hash_leaf, hash_pair, Digest, Hasher, TreeError};

/// Hashes one layer into its parent layer. The last node of an odd-length
/// layer is paired with itself.
pub(crate) fn next_layer<const HASH_SIZE: usize, H: Hasher<HASH_SIZE>>(
    nodes: &[Digest<HASH_SIZE>],
) -> Vec<Digest<HASH_SIZE>> {
    nodes
        .chunks(2)
        .map(|pair| {
            let left = &pair[0];
            let right = pair.get(1).unwrap_or(left);
            hash_pair::<HASH_SIZE, H>(left, right)
        })
        .collect()
}

impl<const HASH_SIZE: usize, H: Hasher<HASH_SIZE> + Clone> MerkleTree<HASH_SIZE, H> {
    /// Builds the tree over `leaves`, keeping their order.
    ///
    /// Every layer is kept, from the leaf hashes up to the root, so later proof
    /// generation is a pure lookup.
    pub fn build<I, L>(leaves: I) -> Result<Self, TreeError>
    where
        I: IntoIterator<Item = L>,
        L: Into<String>,
    {
        let leaves: Vec<String> = leaves.into_iter().map(Into::into).collect();
        if leaves.is_empty() {
            return Err(TreeError::EmptyInput);
        }

        let mut nodes: Vec<Digest<HASH_SIZE>> = leaves
            .iter()
            .map(|leaf| hash_leaf::<HASH_SIZE, H>(leaf.as_bytes()))
            .collect();
        let mut layers = Vec::new();
        while nodes.len() > 1 {
            let parents = next_layer::<HASH_SIZE, H>(&nodes);
            trace!(
                height = layers.len() + 1,
                nodes = parents.len(),
                "hashed layer"
            );
            layers.push(nodes);
            nodes = parents;
        }
        layers.push(nodes);

        Ok(Self {
            leaves,
            layers,
            _phantom: PhantomData,
        })
    }
}
