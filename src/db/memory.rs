use std::collections::HashMap;
use std::convert::Infallible;

use crate::{db::TreeStore, TreeError};

/// A simple in-memory store, mostly for tests and demos
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    entries: HashMap<String, Vec<u8>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
    pub fn get_entries(&self) -> &HashMap<String, Vec<u8>> {
        &self.entries
    }
}

impl TreeStore for MemoryStore {
    type DbError = Infallible;

    fn get(&self, key: &str) -> Result<Option<Vec<u8>>, TreeError<Self::DbError>> {
        Ok(self.entries.get(key).cloned())
    }

    fn put(&mut self, key: &str, value: Vec<u8>) -> Result<(), TreeError<Self::DbError>> {
        self.entries.insert(key.to_string(), value);
        Ok(())
    }
}

#[cfg(test)]
mod test {
    use super::MemoryStore;
    use crate::TreeStore;

    #[test]
    fn test_memory_store_new() {
        let store = MemoryStore::new();
        assert!(store.get_entries().is_empty());
        assert_eq!(store.get("tree_0").unwrap(), None);
    }

    #[test]
    fn test_memory_store_put_get() {
        let mut store = MemoryStore::new();
        store.put("tree_1", vec![1, 2, 3]).unwrap();
        assert_eq!(store.get("tree_1").unwrap(), Some(vec![1, 2, 3]));
        assert_eq!(store.get_entries().len(), 1);
    }

    #[test]
    fn test_memory_store_overwrite() {
        let mut store = MemoryStore::new();
        store.put("k", b"old".to_vec()).unwrap();
        store.put("k", b"new".to_vec()).unwrap();
        assert_eq!(store.get("k").unwrap(), Some(b"new".to_vec()));
        assert_eq!(store.get_entries().len(), 1);
    }
}
