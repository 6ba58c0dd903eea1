//! Error types for tree construction, persistence and proofs

use std::convert::Infallible;

use thiserror::Error;

/// Error type for tree operations.
///
/// `DbError` is the error type of the backing [`crate::TreeStore`]. Operations
/// that never touch a store use the default, [`Infallible`].
#[derive(Debug, Error, PartialEq, Eq, Clone)]
pub enum TreeError<DbError = Infallible> {
    /// Build was called without any leaf
    #[error("input leaf array is empty")]
    EmptyInput,
    /// The caller supplied something that is not a leaf batch
    #[error("invalid input: {0}")]
    InvalidInput(String),
    /// A tree is already stored under this key
    #[error("merkle tree already exists under key {key}")]
    AlreadyExists { key: String },
    /// Nothing is stored under this key
    #[error("no merkle tree stored under key {key}")]
    TreeNotFound { key: String },
    /// The requested leaf value is not part of the tree
    #[error("leaf not found in tree")]
    LeafNotFound,
    /// The requested leaf position is past the last leaf
    #[error("leaf index {index} out of range for {leaf_count} leaves")]
    IndexOutOfRange { index: usize, leaf_count: usize },
    /// Stored bytes do not decode into a well-formed tree
    #[error("corrupt tree: {0}")]
    Corrupt(String),
    /// The store reported an error
    #[error("store failure: {0}")]
    StoreFailure(DbError),
}

/// Coarse classification of a [`TreeError`], enough for a caller to decide
/// whether retrying with different input makes sense.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// The request itself is malformed.
    BadInput,
    /// The request conflicts with existing state.
    Conflict,
    /// The tree or the leaf does not exist.
    NotFound,
    /// Storage or decoding fault.
    Internal,
}

impl<DbError> TreeError<DbError> {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::EmptyInput | Self::InvalidInput(_) => ErrorKind::BadInput,
            Self::AlreadyExists { .. } => ErrorKind::Conflict,
            Self::TreeNotFound { .. } | Self::LeafNotFound | Self::IndexOutOfRange { .. } => {
                ErrorKind::NotFound
            }
            Self::Corrupt(_) | Self::StoreFailure(_) => ErrorKind::Internal,
        }
    }
}

impl TreeError<Infallible> {
    /// Lifts a store-independent error into the error type of a given store.
    pub fn with_store_error<DbError>(self) -> TreeError<DbError> {
        match self {
            Self::EmptyInput => TreeError::EmptyInput,
            Self::InvalidInput(msg) => TreeError::InvalidInput(msg),
            Self::AlreadyExists { key } => TreeError::AlreadyExists { key },
            Self::TreeNotFound { key } => TreeError::TreeNotFound { key },
            Self::LeafNotFound => TreeError::LeafNotFound,
            Self::IndexOutOfRange { index, leaf_count } => {
                TreeError::IndexOutOfRange { index, leaf_count }
            }
            Self::Corrupt(msg) => TreeError::Corrupt(msg),
            Self::StoreFailure(never) => match never {},
        }
    }
}

/// Errors raised while decoding or decompressing a proof
#[derive(Debug, Error, PartialEq, Eq, Clone)]
pub enum ProofError {
    #[error("truncated proof encoding: needed {needed} bytes, {available} available")]
    Truncated { needed: usize, available: usize },
    #[error("proof bitmap expects {expected} siblings, found {found}")]
    SiblingCountMismatch { expected: usize, found: usize },
    #[error("{0} trailing bytes after proof encoding")]
    TrailingBytes(usize),
}
