use super::MerkleTree;
use crate::{Hasher, MerkleProof, TreeError};

/// Position of the node paired with `index` in a layer of `layer_len` nodes.
///
/// Odd positions pair to the left, even ones to the right, and the last node of
/// an odd-length layer pairs with itself.
pub fn sibling_index(index: usize, layer_len: usize) -> usize {
    if index % 2 == 1 {
        index - 1
    } else if index + 1 == layer_len {
        index
    } else {
        index + 1
    }
}

impl<const HASH_SIZE: usize, H: Hasher<HASH_SIZE> + Clone> MerkleTree<HASH_SIZE, H> {
    /// Audit path for the first leaf equal to `leaf`.
    pub fn proof(&self, leaf: &str) -> Result<MerkleProof<HASH_SIZE, H>, TreeError> {
        let index = self.position(leaf).ok_or(TreeError::LeafNotFound)?;
        self.proof_at(index)
    }

    /// Audit path for the leaf at `index`.
    pub fn proof_at(&self, index: usize) -> Result<MerkleProof<HASH_SIZE, H>, TreeError> {
        if index >= self.leaf_count() {
            return Err(TreeError::IndexOutOfRange {
                index,
                leaf_count: self.leaf_count(),
            });
        }
        let mut siblings = Vec::with_capacity(self.depth());
        let mut position = index;
        // the root layer never contributes a sibling
        for layer in &self.layers[..self.depth()] {
            siblings.push(layer[sibling_index(position, layer.len())]);
            position /= 2;
        }
        Ok(MerkleProof::new(index, siblings))
    }
}
