use serde::Deserialize;

use crate::store::DEFAULT_METADATA_SUFFIX;

/// Configuration for the collection extender
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ExtenderConfig {
    /// Samples per quantity container before it is sealed
    pub bucket_size: usize,

    /// Containers held in memory, open or sealed, before a flush is forced
    pub buffer_size: usize,

    /// Suffix of the companion collection holding metadata entities
    pub metadata_suffix: String,

    /// Service name recorded as owner of stored entities
    pub owner: String,
}

impl Default for ExtenderConfig {
    fn default() -> Self {
        Self {
            bucket_size: 1,
            buffer_size: 50,
            metadata_suffix: DEFAULT_METADATA_SUFFIX.to_string(),
            owner: env!("CARGO_PKG_NAME").to_string(),
        }
    }
}

impl ExtenderConfig {
    /// Few, large documents; suited to long sweeps
    pub fn bulk_import() -> Self {
        Self {
            bucket_size: 1024,
            buffer_size: 200,
            ..Self::default()
        }
    }

    /// Write every container as soon as it holds a sample
    pub fn low_latency() -> Self {
        Self {
            buffer_size: 1,
            ..Self::default()
        }
    }

    /// Set the bucket size
    pub fn with_bucket_size(mut self, bucket_size: usize) -> Self {
        self.bucket_size = bucket_size.max(1);
        self
    }

    /// Set the flush threshold
    pub fn with_buffer_size(mut self, buffer_size: usize) -> Self {
        self.buffer_size = buffer_size.max(1);
        self
    }

    /// Set the owner recorded on stored entities
    pub fn with_owner(mut self, owner: impl Into<String>) -> Self {
        self.owner = owner.into();
        self
    }
}
