use chrono::Utc;
use log::debug;
use serde_json::Value;
use uuid::Uuid;

use super::{Document, DocumentStore, StoreError};

/// Suffix of the companion collection that holds metadata entities
pub const DEFAULT_METADATA_SUFFIX: &str = ".metadata";

/// The entity framework as seen by the catalog
///
/// It only has to hand back every metadata record stored for a collection,
/// in storage order, and accept new records.
pub trait MetadataEntityStore {
    /// All metadata entity documents of a collection, oldest first
    fn load_entities(&self, collection: &str) -> Result<Vec<Document>, StoreError>;

    /// Persist a batch of metadata entity documents
    fn store_entities(&self, collection: &str, entities: Vec<Document>) -> Result<(), StoreError>;
}

/// Entity framework on top of a [`DocumentStore`]
///
/// Entities of collection `X` are kept in collection `X.metadata`. Every stored
/// record is stamped with an `entityId`, a `storedAt` timestamp and the name of
/// the owning service.
pub struct DocumentEntityStore<'a> {
    store: &'a dyn DocumentStore,
    suffix: String,
    owner: String,
}

impl<'a> DocumentEntityStore<'a> {
    /// Wrap a document store using the default suffix
    pub fn new(store: &'a dyn DocumentStore) -> Self {
        Self {
            store,
            suffix: DEFAULT_METADATA_SUFFIX.to_string(),
            owner: env!("CARGO_PKG_NAME").to_string(),
        }
    }

    /// Use a different companion collection suffix
    pub fn with_suffix(mut self, suffix: impl Into<String>) -> Self {
        self.suffix = suffix.into();
        self
    }

    /// Name of the service recorded as owner of new entities
    pub fn with_owner(mut self, owner: impl Into<String>) -> Self {
        self.owner = owner.into();
        self
    }

    /// Collection that holds the entities of `collection`
    pub fn entity_collection(&self, collection: &str) -> String {
        format!("{}{}", collection, self.suffix)
    }
}

impl MetadataEntityStore for DocumentEntityStore<'_> {
    fn load_entities(&self, collection: &str) -> Result<Vec<Document>, StoreError> {
        self.store.find_all(&self.entity_collection(collection))
    }

    fn store_entities(&self, collection: &str, entities: Vec<Document>) -> Result<(), StoreError> {
        if entities.is_empty() {
            return Ok(());
        }
        let stored_at = Utc::now().to_rfc3339();
        let stamped: Vec<Document> = entities
            .into_iter()
            .map(|mut entity| {
                entity.insert("entityId".to_string(), Value::from(Uuid::new_v4().to_string()));
                entity.insert("storedAt".to_string(), Value::from(stored_at.clone()));
                entity.insert("owner".to_string(), Value::from(self.owner.clone()));
                entity
            })
            .collect();
        debug!(
            "Storing {} metadata entities for collection '{}'",
            stamped.len(),
            collection
        );
        self.store
            .insert_many(&self.entity_collection(collection), stamped)
    }
}
