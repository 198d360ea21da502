use crate::metadata::MetadataError;
use crate::store::StoreError;

/// Errors that can occur while loading or querying a result catalog
#[derive(Debug, thiserror::Error)]
pub enum CatalogError {
    /// No metadata exists for the collection, or a looked-up entity is unknown
    #[error("Not found: {0}")]
    NotFound(String),

    /// A stored entity could not be decoded or the campaign is inconsistent
    #[error("Metadata error: {0}")]
    Metadata(#[from] MetadataError),

    /// The backing store failed
    #[error("Store error: {0}")]
    Store(#[from] StoreError),
}
