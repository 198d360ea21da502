/// Errors reported by document and entity stores
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// The store could not be reached or refused the operation
    #[error("Document store unavailable: {0}")]
    Unavailable(String),

    /// I/O error in a file-backed store
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),

    /// A stored document is not valid JSON
    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),

    /// Collection name cannot be used by this store
    #[error("Invalid collection name: {0}")]
    InvalidCollectionName(String),

    /// Cross-collection access to a project the locator does not know
    #[error("Unknown project: {0}")]
    UnknownProject(String),
}
