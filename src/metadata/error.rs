use super::Uid;

/// Errors that can occur while encoding, decoding or checking metadata entities
#[derive(Debug, thiserror::Error)]
pub enum MetadataError {
    /// A required field is missing or carries the wrong type
    #[error("Schema error in {entity} document: {source}")]
    Schema {
        /// Entity kind that failed to decode
        entity: &'static str,
        /// Underlying decode error
        #[source]
        source: serde_json::Error,
    },

    /// The entity could not be rendered into a document
    #[error("Failed to encode {entity}: {source}")]
    Encode {
        /// Entity kind that failed to encode
        entity: &'static str,
        /// Underlying encode error
        #[source]
        source: serde_json::Error,
    },

    /// A series references a parameter that is not part of the campaign
    #[error("Series '{series}' references unknown parameter {uid}")]
    DanglingParameter {
        /// Series name
        series: String,
        /// Missing parameter UID
        uid: Uid,
    },

    /// A series references a quantity that is not part of the campaign
    #[error("Series '{series}' references unknown quantity {uid}")]
    DanglingQuantity {
        /// Series name
        series: String,
        /// Missing quantity UID
        uid: Uid,
    },

    /// Campaign invariants do not hold
    #[error("Inconsistent campaign: {0}")]
    Inconsistent(String),
}
