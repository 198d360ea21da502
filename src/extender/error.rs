use crate::catalog::CatalogError;
use crate::metadata::MetadataError;
use crate::store::StoreError;

/// Errors that can occur while extending a result collection
#[derive(Debug, thiserror::Error)]
pub enum ExtenderError {
    /// Loading the existing campaign failed
    #[error("Catalog error: {0}")]
    Catalog(#[from] CatalogError),

    /// The backing store failed; buffered data is kept for a retry
    #[error("Store error: {0}")]
    Store(#[from] StoreError),

    /// Metadata could not be encoded or violates campaign invariants
    #[error("Metadata error: {0}")]
    Metadata(#[from] MetadataError),

    /// A series with this name already exists in the campaign
    #[error("Series '{0}' already exists")]
    DuplicateSeriesName(String),

    /// A referenced series, parameter or quantity is unknown
    #[error("Not found: {0}")]
    NotFound(String),

    /// Malformed input from a producer
    #[error("Invalid data: {0}")]
    InvalidData(String),
}
