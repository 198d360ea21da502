use std::collections::BTreeMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use super::{validate_collection_name, Document, DocumentStore, StoreError};

/// Process-local document store
///
/// Collections live in memory behind a lock, so one instance can be shared by
/// an extender and any number of readers. The store can be switched offline
/// to exercise the retry paths of its callers.
#[derive(Debug, Default)]
pub struct InMemoryDocumentStore {
    collections: RwLock<BTreeMap<String, Vec<Document>>>,
    offline: AtomicBool,
    batch_writes: AtomicUsize,
}

impl InMemoryDocumentStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Simulate a transport outage; every operation fails while offline
    pub fn set_offline(&self, offline: bool) {
        self.offline.store(offline, Ordering::SeqCst);
    }

    /// Number of `insert_many` round-trips served so far
    pub fn batch_writes(&self) -> usize {
        self.batch_writes.load(Ordering::SeqCst)
    }

    /// Number of documents in a collection
    pub fn count(&self, collection: &str) -> Result<usize, StoreError> {
        Ok(self.read()?.get(collection).map_or(0, Vec::len))
    }

    fn check_online(&self) -> Result<(), StoreError> {
        if self.offline.load(Ordering::SeqCst) {
            Err(StoreError::Unavailable("store is offline".to_string()))
        } else {
            Ok(())
        }
    }

    fn read(&self) -> Result<RwLockReadGuard<'_, BTreeMap<String, Vec<Document>>>, StoreError> {
        self.check_online()?;
        self.collections
            .read()
            .map_err(|_| StoreError::Unavailable("store lock poisoned".to_string()))
    }

    fn write(&self) -> Result<RwLockWriteGuard<'_, BTreeMap<String, Vec<Document>>>, StoreError> {
        self.check_online()?;
        self.collections
            .write()
            .map_err(|_| StoreError::Unavailable("store lock poisoned".to_string()))
    }
}

impl DocumentStore for InMemoryDocumentStore {
    fn insert_one(&self, collection: &str, document: Document) -> Result<(), StoreError> {
        validate_collection_name(collection)?;
        self.write()?
            .entry(collection.to_string())
            .or_default()
            .push(document);
        Ok(())
    }

    fn insert_many(&self, collection: &str, documents: Vec<Document>) -> Result<(), StoreError> {
        validate_collection_name(collection)?;
        self.write()?
            .entry(collection.to_string())
            .or_default()
            .extend(documents);
        self.batch_writes.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    fn find_all(&self, collection: &str) -> Result<Vec<Document>, StoreError> {
        Ok(self.read()?.get(collection).cloned().unwrap_or_default())
    }

    fn collection_exists(&self, collection: &str) -> Result<bool, StoreError> {
        Ok(self.read()?.contains_key(collection))
    }

    fn create_collection(&self, collection: &str) -> Result<(), StoreError> {
        validate_collection_name(collection)?;
        self.write()?.entry(collection.to_string()).or_default();
        Ok(())
    }
}
