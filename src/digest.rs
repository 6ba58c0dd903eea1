use std::fmt::{Debug, Display};

use serde::{de, Deserialize, Deserializer, Serialize, Serializer};
use sha2::{Digest as _, Sha256};
use thiserror::Error;

impl Hasher<32> for Sha256 {
    fn hash(data: &[u8]) -> [u8; 32] {
        let mut hasher = Sha256::new();
        hasher.update(data);
        hasher.finalize().into()
    }
}

/// Simple hash trait used for both leaves and internal nodes
///
/// # Type Parameters
/// * `HASH_SIZE` - The size of the hash digest in bytes
pub trait Hasher<const HASH_SIZE: usize> {
    fn hash(data: &[u8]) -> [u8; HASH_SIZE];
}

/// Errors raised when bytes or text are turned into a [`Digest`]
#[derive(Debug, Error, Clone, PartialEq)]
pub enum DigestError {
    #[error("invalid digest length: expected {expected} bytes, got {got}")]
    InvalidLength { expected: usize, got: usize },
    #[error("invalid hex digest: {0}")]
    InvalidHex(#[from] hex::FromHexError),
}

/// Output of a [`Hasher`]. Always exactly `HASH_SIZE` bytes.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct Digest<const HASH_SIZE: usize>([u8; HASH_SIZE]);

impl<const HASH_SIZE: usize> Digest<HASH_SIZE> {
    pub fn as_bytes(&self) -> &[u8; HASH_SIZE] {
        &self.0
    }

    pub fn into_inner(self) -> [u8; HASH_SIZE] {
        self.0
    }

    /// Lower-case hex, the form digests take in persisted trees.
    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }

    pub fn from_hex(encoded: &str) -> Result<Self, DigestError> {
        let bytes = hex::decode(encoded)?;
        Self::try_from(bytes.as_slice())
    }
}

impl<const HASH_SIZE: usize> From<[u8; HASH_SIZE]> for Digest<HASH_SIZE> {
    fn from(bytes: [u8; HASH_SIZE]) -> Self {
        Self(bytes)
    }
}

impl<const HASH_SIZE: usize> From<Digest<HASH_SIZE>> for [u8; HASH_SIZE] {
    fn from(digest: Digest<HASH_SIZE>) -> Self {
        digest.0
    }
}

impl<const HASH_SIZE: usize> TryFrom<&[u8]> for Digest<HASH_SIZE> {
    type Error = DigestError;

    fn try_from(bytes: &[u8]) -> Result<Self, Self::Error> {
        let array: [u8; HASH_SIZE] = bytes.try_into().map_err(|_| DigestError::InvalidLength {
            expected: HASH_SIZE,
            got: bytes.len(),
        })?;
        Ok(Self(array))
    }
}

impl<const HASH_SIZE: usize> AsRef<[u8]> for Digest<HASH_SIZE> {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

impl<const HASH_SIZE: usize> Display for Digest<HASH_SIZE> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl<const HASH_SIZE: usize> Debug for Digest<HASH_SIZE> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Digest({})", self.to_hex())
    }
}

impl<const HASH_SIZE: usize> Serialize for Digest<HASH_SIZE> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_hex())
    }
}

impl<'de, const HASH_SIZE: usize> Deserialize<'de> for Digest<HASH_SIZE> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let encoded = String::deserialize(deserializer)?;
        Self::from_hex(&encoded).map_err(de::Error::custom)
    }
}

/// Hashes a raw leaf value into its layer 0 digest.
pub fn hash_leaf<const HASH_SIZE: usize, H: Hasher<HASH_SIZE>>(value: &[u8]) -> Digest<HASH_SIZE> {
    Digest(H::hash(value))
}

/// Hashes the concatenation `left || right` into the parent digest.
/// A self-paired node is passed as both `left` and `right`.
pub fn hash_pair<const HASH_SIZE: usize, H: Hasher<HASH_SIZE>>(
    left: &Digest<HASH_SIZE>,
    right: &Digest<HASH_SIZE>,
) -> Digest<HASH_SIZE> {
    Digest(H::hash([left.0.as_slice(), right.0.as_slice()].concat().as_slice()))
}

#[cfg(test)]
mod test {
    use hex_literal::hex;
    use sha2::Sha256;

    use super::{hash_leaf, hash_pair, Digest, DigestError};

    #[test]
    fn test_leaf_hash() {
        assert_eq!(
            hash_leaf::<32, Sha256>(b"a").into_inner(),
            hex!("ca978112ca1bbdcafac231b39a23dc4da786eff8147c4e72b9807785afee48bb")
        );
        assert_eq!(
            hash_leaf::<32, Sha256>(b"").into_inner(),
            hex!("e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855")
        );
    }

    #[test]
    fn test_pair_hash() {
        let a = hash_leaf::<32, Sha256>(b"a");
        let b = hash_leaf::<32, Sha256>(b"b");
        assert_eq!(
            hash_pair::<32, Sha256>(&a, &b).into_inner(),
            hex!("e5a01fee14e0ed5c48714f22180f25ad8365b53f9779f79dc4a3d7e93963f94a")
        );
        assert_ne!(hash_pair::<32, Sha256>(&a, &b), hash_pair::<32, Sha256>(&b, &a));
    }

    #[test]
    fn test_hex_roundtrip() {
        let digest = hash_leaf::<32, Sha256>(b"a");
        assert_eq!(Digest::<32>::from_hex(&digest.to_hex()).unwrap(), digest);
        assert_eq!(
            digest.to_string(),
            "ca978112ca1bbdcafac231b39a23dc4da786eff8147c4e72b9807785afee48bb"
        );
    }

    #[test]
    fn test_invalid_length() {
        assert_eq!(
            Digest::<32>::try_from([0u8; 31].as_slice()).unwrap_err(),
            DigestError::InvalidLength {
                expected: 32,
                got: 31
            }
        );
        assert!(matches!(
            Digest::<32>::from_hex("abcd").unwrap_err(),
            DigestError::InvalidLength { got: 2, .. }
        ));
        assert!(matches!(
            Digest::<32>::from_hex("zz").unwrap_err(),
            DigestError::InvalidHex(_)
        ));
    }

    #[test]
    fn test_debug_format() {
        let digest = Digest::from([0u8; 4]);
        assert_eq!(format!("{:?}", digest), "Digest(00000000)");
    }
}
