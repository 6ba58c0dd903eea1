//! Inclusion proofs for a leaf of a [`crate::MerkleTree`].
//!
//! A proof is the leaf position plus one sibling digest per non-root layer,
//! ordered from the leaves upward.
//!
//! A proof can be compressed: siblings that are equal to the running node hash
//! (self-paired nodes at the right edge of odd-length layers) are replaced by a
//! single bit. A compressed proof can only be decompressed with the leaf it was
//! compressed for.
use std::fmt::Debug;
use std::marker::PhantomData;

use bitvec::order::Lsb0;
use bitvec::vec::BitVec;
use serde::{Deserialize, Serialize};

use crate::{hash_leaf, hash_pair, Digest, Hasher, ProofError};

/// Width of the encoded leaf index.
const INDEX_BYTES: usize = 8;
/// Width of the encoded level and sibling counts.
const COUNT_BYTES: usize = 2;

/// A merkle proof for one leaf.
#[derive(Serialize, Deserialize)]
#[serde(bound = "")]
pub struct MerkleProof<const HASH_SIZE: usize, H: Hasher<HASH_SIZE> + Clone> {
    index: usize,
    siblings: Vec<Digest<HASH_SIZE>>,
    #[serde(skip)]
    _phantom: PhantomData<H>,
}

/// Hashes `current` with `sibling`, ordering the pair by the parity of `index`.
fn parent<const HASH_SIZE: usize, H: Hasher<HASH_SIZE>>(
    index: usize,
    current: &Digest<HASH_SIZE>,
    sibling: &Digest<HASH_SIZE>,
) -> Digest<HASH_SIZE> {
    if index % 2 == 0 {
        hash_pair::<HASH_SIZE, H>(current, sibling)
    } else {
        hash_pair::<HASH_SIZE, H>(sibling, current)
    }
}

impl<const HASH_SIZE: usize, H: Hasher<HASH_SIZE> + Clone> MerkleProof<HASH_SIZE, H> {
    pub fn new(index: usize, siblings: Vec<Digest<HASH_SIZE>>) -> Self {
        Self {
            index,
            siblings,
            _phantom: PhantomData,
        }
    }

    /// Position of the proven leaf among the original leaves.
    pub fn index(&self) -> usize {
        self.index
    }

    /// Sibling digests from the leaf layer up to just below the root.
    pub fn siblings(&self) -> &[Digest<HASH_SIZE>] {
        &self.siblings
    }

    pub fn len(&self) -> usize {
        self.siblings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.siblings.is_empty()
    }

    /// Recomputes the root implied by `leaf` and this path.
    pub fn compute_root(&self, leaf: impl AsRef<[u8]>) -> Digest<HASH_SIZE> {
        let mut current = hash_leaf::<HASH_SIZE, H>(leaf.as_ref());
        let mut index = self.index;
        for sibling in &self.siblings {
            current = parent::<HASH_SIZE, H>(index, &current, sibling);
            index /= 2;
        }
        current
    }

    /// Checks that `leaf` sits at `self.index()` in the tree committed to by
    /// `root`.
    ///
    /// An index that needs more levels than the path provides is rejected, so
    /// high index bits cannot be flipped unnoticed.
    pub fn verify(&self, leaf: impl AsRef<[u8]>, root: &Digest<HASH_SIZE>) -> bool {
        let levels = self.siblings.len();
        if levels < usize::BITS as usize && self.index >> levels != 0 {
            return false;
        }
        self.compute_root(leaf) == *root
    }

    /// Compresses the proof for `leaf`. Siblings equal to the running hash are
    /// dropped and flagged in the bitmap.
    pub fn compress(&self, leaf: impl AsRef<[u8]>) -> CompressedProof<HASH_SIZE, H> {
        let mut current = hash_leaf::<HASH_SIZE, H>(leaf.as_ref());
        let mut index = self.index;
        let mut bits = BitVec::with_capacity(self.siblings.len());
        let mut siblings = Vec::new();
        for sibling in &self.siblings {
            if *sibling == current {
                bits.push(true);
            } else {
                bits.push(false);
                siblings.push(*sibling);
            }
            current = parent::<HASH_SIZE, H>(index, &current, sibling);
            index /= 2;
        }
        CompressedProof::new(self.index, siblings, bits)
    }
}

/// Verifies a merkle proof for `leaf` against `root`.
pub fn verify_merkle_proof<const HASH_SIZE: usize, H: Hasher<HASH_SIZE> + Clone>(
    leaf: impl AsRef<[u8]>,
    proof: &MerkleProof<HASH_SIZE, H>,
    root: &Digest<HASH_SIZE>,
) -> bool {
    proof.verify(leaf, root)
}

impl<const HASH_SIZE: usize, H: Hasher<HASH_SIZE> + Clone> Clone for MerkleProof<HASH_SIZE, H> {
    fn clone(&self) -> Self {
        Self::new(self.index, self.siblings.clone())
    }
}

impl<const HASH_SIZE: usize, H: Hasher<HASH_SIZE> + Clone> PartialEq for MerkleProof<HASH_SIZE, H> {
    fn eq(&self, other: &Self) -> bool {
        self.index == other.index && self.siblings == other.siblings
    }
}

impl<const HASH_SIZE: usize, H: Hasher<HASH_SIZE> + Clone> Eq for MerkleProof<HASH_SIZE, H> {}

impl<const HASH_SIZE: usize, H: Hasher<HASH_SIZE> + Clone> Debug for MerkleProof<HASH_SIZE, H> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MerkleProof")
            .field("index", &self.index)
            .field("siblings", &self.siblings)
            .finish()
    }
}

/// A merkle proof without its self-paired siblings.
/// Bit `i` is set when the sibling at level `i` was the running hash itself.
pub struct CompressedProof<const HASH_SIZE: usize, H: Hasher<HASH_SIZE> + Clone> {
    index: usize,
    siblings: Vec<Digest<HASH_SIZE>>,
    bits: BitVec<u8, Lsb0>,
    _phantom: PhantomData<H>,
}

impl<const HASH_SIZE: usize, H: Hasher<HASH_SIZE> + Clone> CompressedProof<HASH_SIZE, H> {
    pub fn new(index: usize, siblings: Vec<Digest<HASH_SIZE>>, bits: BitVec<u8, Lsb0>) -> Self {
        Self {
            index,
            siblings,
            bits,
            _phantom: PhantomData,
        }
    }

    pub fn index(&self) -> usize {
        self.index
    }

    /// Siblings that could not be elided.
    pub fn siblings(&self) -> &[Digest<HASH_SIZE>] {
        &self.siblings
    }

    /// Number of levels of the original proof.
    pub fn levels(&self) -> usize {
        self.bits.len()
    }

    /// Rebuilds the full proof by replaying the path from `leaf`.
    pub fn decompress(&self, leaf: impl AsRef<[u8]>) -> Result<MerkleProof<HASH_SIZE, H>, ProofError> {
        let expected = self.bits.count_zeros();
        if self.siblings.len() != expected {
            return Err(ProofError::SiblingCountMismatch {
                expected,
                found: self.siblings.len(),
            });
        }
        let mut current = hash_leaf::<HASH_SIZE, H>(leaf.as_ref());
        let mut index = self.index;
        let mut kept = self.siblings.iter();
        let mut siblings = Vec::with_capacity(self.bits.len());
        for bit in self.bits.iter() {
            let sibling = if *bit {
                current
            } else {
                // count checked above
                match kept.next() {
                    Some(sibling) => *sibling,
                    None => {
                        return Err(ProofError::SiblingCountMismatch {
                            expected,
                            found: self.siblings.len(),
                        })
                    }
                }
            };
            current = parent::<HASH_SIZE, H>(index, &current, &sibling);
            siblings.push(sibling);
            index /= 2;
        }
        Ok(MerkleProof::new(self.index, siblings))
    }

    /// Encodes the proof as
    /// `index (u64 BE) || levels (u16 BE) || count (u16 BE) || siblings || bitmap`.
    pub fn encode(&self) -> Vec<u8> {
        let mut encoded = Vec::with_capacity(
            INDEX_BYTES + 2 * COUNT_BYTES + self.siblings.len() * HASH_SIZE + self.bits.len() / 8 + 1,
        );
        encoded.extend_from_slice(&(self.index as u64).to_be_bytes());
        encoded.extend_from_slice(&(self.bits.len() as u16).to_be_bytes());
        encoded.extend_from_slice(&(self.siblings.len() as u16).to_be_bytes());
        for sibling in self.siblings.iter() {
            encoded.extend_from_slice(sibling.as_bytes());
        }
        encoded.extend_from_slice(self.bits.as_raw_slice());
        encoded
    }

    /// Decodes a proof produced by [`CompressedProof::encode`].
    pub fn decode(data: &[u8]) -> Result<Self, ProofError> {
        let mut cursor = Cursor { data, offset: 0 };
        let index = u64::from_be_bytes(cursor.take_array::<INDEX_BYTES>()?) as usize;
        let levels = u16::from_be_bytes(cursor.take_array::<COUNT_BYTES>()?) as usize;
        let count = u16::from_be_bytes(cursor.take_array::<COUNT_BYTES>()?) as usize;
        let mut siblings = Vec::with_capacity(count);
        for _ in 0..count {
            siblings.push(Digest::from(cursor.take_array::<HASH_SIZE>()?));
        }
        let mut bits = BitVec::<u8, Lsb0>::from_slice(cursor.take(levels.div_ceil(8))?);
        bits.truncate(levels);
        let remaining = cursor.remaining();
        if remaining != 0 {
            return Err(ProofError::TrailingBytes(remaining));
        }
        if bits.count_zeros() != count {
            return Err(ProofError::SiblingCountMismatch {
                expected: bits.count_zeros(),
                found: count,
            });
        }
        Ok(Self::new(index, siblings, bits))
    }
}

impl<const HASH_SIZE: usize, H: Hasher<HASH_SIZE> + Clone> Debug for CompressedProof<HASH_SIZE, H> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CompressedProof")
            .field("index", &self.index)
            .field("siblings", &self.siblings)
            .field("bits", &self.bits)
            .finish()
    }
}

struct Cursor<'a> {
    data: &'a [u8],
    offset: usize,
}

impl<'a> Cursor<'a> {
    fn take(&mut self, len: usize) -> Result<&'a [u8], ProofError> {
        let available = self.remaining();
        if len > available {
            return Err(ProofError::Truncated {
                needed: len,
                available,
            });
        }
        let slice = &self.data[self.offset..self.offset + len];
        self.offset += len;
        Ok(slice)
    }

    fn take_array<const N: usize>(&mut self) -> Result<[u8; N], ProofError> {
        let mut array = [0u8; N];
        array.copy_from_slice(self.take(N)?);
        Ok(array)
    }

    fn remaining(&self) -> usize {
        self.data.len() - self.offset
    }
}
