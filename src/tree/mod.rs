mod build;
mod path;

use std::fmt::Debug;
use std::marker::PhantomData;

pub use path::sibling_index;

use crate::{Digest, Hasher, TreeError};

/// A fully materialised Merkle tree.
///
/// Keeps the original leaves and every layer of digests, layer 0 first and the
/// single-digest root layer last, so proofs can be read off without hashing.
/// * `HASH_SIZE` - size of the hash digest in bytes.
/// * `H` - Hasher used for leaves and internal nodes.
pub struct MerkleTree<const HASH_SIZE: usize, H: Hasher<HASH_SIZE> + Clone> {
    leaves: Vec<String>,
    layers: Vec<Vec<Digest<HASH_SIZE>>>,
    _phantom: PhantomData<H>,
}

impl<const HASH_SIZE: usize, H: Hasher<HASH_SIZE> + Clone> MerkleTree<HASH_SIZE, H> {
    /// Reassembles a tree from previously computed parts.
    ///
    /// Only the shape is checked: layer 0 must match the leaf count, each layer
    /// must halve (rounding up) the previous one and the last layer must hold
    /// exactly one digest. Digests are trusted as given.
    pub fn from_parts(
        leaves: Vec<String>,
        layers: Vec<Vec<Digest<HASH_SIZE>>>,
    ) -> Result<Self, TreeError> {
        if leaves.is_empty() {
            return Err(TreeError::Corrupt("tree has no leaves".to_string()));
        }
        let Some(first) = layers.first() else {
            return Err(TreeError::Corrupt("tree has no layers".to_string()));
        };
        if first.len() != leaves.len() {
            return Err(TreeError::Corrupt(format!(
                "layer 0 holds {} digests for {} leaves",
                first.len(),
                leaves.len()
            )));
        }
        for (height, pair) in layers.windows(2).enumerate() {
            let expected = pair[0].len().div_ceil(2);
            if pair[1].len() != expected {
                return Err(TreeError::Corrupt(format!(
                    "layer {} holds {} digests, expected {}",
                    height + 1,
                    pair[1].len(),
                    expected
                )));
            }
        }
        if layers.last().map(Vec::len) != Some(1) {
            return Err(TreeError::Corrupt(
                "last layer does not hold a single root".to_string(),
            ));
        }
        Ok(Self {
            leaves,
            layers,
            _phantom: PhantomData,
        })
    }

    /// Root digest of the tree.
    pub fn root(&self) -> Digest<HASH_SIZE> {
        // every constructor guarantees a last layer of exactly one digest
        self.layers[self.layers.len() - 1][0]
    }

    pub fn leaves(&self) -> &[String] {
        &self.leaves
    }

    pub fn layers(&self) -> &[Vec<Digest<HASH_SIZE>>] {
        &self.layers
    }

    pub fn leaf_count(&self) -> usize {
        self.leaves.len()
    }

    /// Number of hashing rounds between the leaves and the root, which is also
    /// the number of siblings in every proof of this tree.
    pub fn depth(&self) -> usize {
        self.layers.len() - 1
    }

    /// Position of the first leaf equal to `leaf`.
    pub fn position(&self, leaf: &str) -> Option<usize> {
        self.leaves.iter().position(|candidate| candidate == leaf)
    }

    pub(crate) fn into_parts(self) -> (Vec<String>, Vec<Vec<Digest<HASH_SIZE>>>) {
        (self.leaves, self.layers)
    }
}

impl<const HASH_SIZE: usize, H: Hasher<HASH_SIZE> + Clone> Clone for MerkleTree<HASH_SIZE, H> {
    fn clone(&self) -> Self {
        Self {
            leaves: self.leaves.clone(),
            layers: self.layers.clone(),
            _phantom: PhantomData,
        }
    }
}

impl<const HASH_SIZE: usize, H: Hasher<HASH_SIZE> + Clone> PartialEq for MerkleTree<HASH_SIZE, H> {
    fn eq(&self, other: &Self) -> bool {
        self.leaves == other.leaves && self.layers == other.layers
    }
}

impl<const HASH_SIZE: usize, H: Hasher<HASH_SIZE> + Clone> Eq for MerkleTree<HASH_SIZE, H> {}

impl<const HASH_SIZE: usize, H: Hasher<HASH_SIZE> + Clone> Debug for MerkleTree<HASH_SIZE, H> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "MerkleTree {{ leaves: {}, depth: {}, root: {} }}",
            self.leaf_count(),
            self.depth(),
            self.root()
        )
    }
}

#[cfg(test)]
mod test {
    use sha2::Sha256;

    use super::MerkleTree;
    use crate::{hash_leaf, Digest, TreeError};

    fn leaf(value: &str) -> Digest<32> {
        hash_leaf::<32, Sha256>(value.as_bytes())
    }

    #[test]
    fn test_from_parts_single_leaf() {
        let tree =
            MerkleTree::<32, Sha256>::from_parts(vec!["a".into()], vec![vec![leaf("a")]]).unwrap();
        assert_eq!(tree.root(), leaf("a"));
        assert_eq!(tree.depth(), 0);
        assert_eq!(tree.leaf_count(), 1);
    }

    #[test]
    fn test_from_parts_rejects_bad_shapes() {
        let no_layers = MerkleTree::<32, Sha256>::from_parts(vec!["a".into()], vec![]);
        assert!(matches!(no_layers, Err(TreeError::Corrupt(_))));

        let no_leaves = MerkleTree::<32, Sha256>::from_parts(vec![], vec![vec![leaf("a")]]);
        assert!(matches!(no_leaves, Err(TreeError::Corrupt(_))));

        let short_layer0 = MerkleTree::<32, Sha256>::from_parts(
            vec!["a".into(), "b".into()],
            vec![vec![leaf("a")]],
        );
        assert!(matches!(short_layer0, Err(TreeError::Corrupt(_))));

        // three leaves need two parents, not one
        let skipped_layer = MerkleTree::<32, Sha256>::from_parts(
            vec!["a".into(), "b".into(), "c".into()],
            vec![vec![leaf("a"), leaf("b"), leaf("c")], vec![leaf("x")]],
        );
        assert_eq!(
            skipped_layer.unwrap_err(),
            TreeError::Corrupt("layer 1 holds 1 digests, expected 2".to_string())
        );

        let no_root = MerkleTree::<32, Sha256>::from_parts(
            vec!["a".into(), "b".into()],
            vec![vec![leaf("a"), leaf("b")]],
        );
        assert!(matches!(no_root, Err(TreeError::Corrupt(_))));
    }

    #[test]
    fn test_position_returns_first_match() {
        let tree = MerkleTree::<32, Sha256>::build(["x", "y", "x"]).unwrap();
        assert_eq!(tree.position("x"), Some(0));
        assert_eq!(tree.position("y"), Some(1));
        assert_eq!(tree.position("z"), None);
    }
}
