//! Store trait and implementations for persisted trees

mod memory;

pub use memory::MemoryStore;

use crate::TreeError;

/// Thread safety marker trait
#[cfg(feature = "multi-thread")]
pub trait ThreadSafe: Send + Sync {}
#[cfg(feature = "multi-thread")]
impl<T: Send + Sync> ThreadSafe for T {}

#[cfg(not(feature = "multi-thread"))]
pub trait ThreadSafe {}
#[cfg(not(feature = "multi-thread"))]
impl<T> ThreadSafe for T {}

/// Key/value store holding serialized trees
///
/// This is the ledger's view of state: opaque byte values under string keys.
/// Implementations report their own failures as [`TreeError::StoreFailure`].
pub trait TreeStore: ThreadSafe {
    /// The error type for store operations
    type DbError;

    /// Get the value stored under `key`, if any
    fn get(&self, key: &str) -> Result<Option<Vec<u8>>, TreeError<Self::DbError>>;

    /// Store `value` under `key`, replacing any previous value
    fn put(&mut self, key: &str, value: Vec<u8>) -> Result<(), TreeError<Self::DbError>>;
}
