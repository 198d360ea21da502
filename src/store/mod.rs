//! # Document Store Collaborators
//!
//! The catalog engine does not talk to a database driver directly. It
//! consumes two narrow interfaces:
//!
//! - [`DocumentStore`]: collections of JSON documents with insert and query
//!   primitives, used for the bulk quantity containers
//! - [`MetadataEntityStore`]: the entity framework that keeps the typed
//!   metadata records of a collection
//!
//! plus a [`SessionLocator`] that resolves the entity store of another
//! project for cross-collection reads.
//!
//! Two reference stores are provided: [`InMemoryDocumentStore`] for tests and
//! embedding, and [`JsonDirectoryStore`] which keeps one JSON-lines file per
//! collection. [`DocumentEntityStore`] implements the entity framework on top
//! of any document store.
//!
//! All operations are blocking. Timeouts and cancellation belong to the store
//! implementation.

mod directory;
mod entity;
mod error;
mod memory;
mod session;


pub use directory::JsonDirectoryStore;
pub use entity::{DocumentEntityStore, MetadataEntityStore, DEFAULT_METADATA_SUFFIX};
pub use error::StoreError;
pub use memory::InMemoryDocumentStore;
pub use session::{ProjectRegistry, SessionLocator};

/// A single stored record
pub type Document = serde_json::Map<String, serde_json::Value>;

/// Primitive operations of a document store
pub trait DocumentStore {
    /// Insert one document, creating the collection if needed
    fn insert_one(&self, collection: &str, document: Document) -> Result<(), StoreError>;

    /// Insert a batch of documents in one round-trip, creating the collection if needed
    fn insert_many(&self, collection: &str, documents: Vec<Document>) -> Result<(), StoreError>;

    /// All documents of a collection in insertion order; empty if it does not exist
    fn find_all(&self, collection: &str) -> Result<Vec<Document>, StoreError>;

    /// Whether the collection exists
    fn collection_exists(&self, collection: &str) -> Result<bool, StoreError>;

    /// Create an empty collection; a no-op if it exists
    fn create_collection(&self, collection: &str) -> Result<(), StoreError>;

    /// Documents whose top-level fields equal every field of `filter`
    fn find(&self, collection: &str, filter: &Document) -> Result<Vec<Document>, StoreError> {
        Ok(self
            .find_all(collection)?
            .into_iter()
            .filter(|document| matches_filter(document, filter))
            .collect())
    }
}

/// Equality match of all filter fields against a document
pub fn matches_filter(document: &Document, filter: &Document) -> bool {
    filter
        .iter()
        .all(|(key, expected)| document.get(key) == Some(expected))
}

fn validate_collection_name(collection: &str) -> Result<(), StoreError> {
    let valid = !collection.is_empty()
        && !collection.starts_with('.')
        && collection
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | '-' | '.'));
    if valid {
        Ok(())
    } else {
        Err(StoreError::InvalidCollectionName(collection.to_string()))
    }
}
