use std::fmt;

/// Counters of one extender session
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExtenderStats {
    /// Series registered in this session
    pub series_added: usize,
    /// Quantity containers written to the store
    pub containers_written: usize,
    /// Samples contained in the written containers
    pub values_written: usize,
    /// Batch inserts issued for containers
    pub flushes: usize,
    /// Metadata entities handed to the entity store
    pub metadata_entities_written: usize,
}

impl fmt::Display for ExtenderStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Added {} series, wrote {} containers ({} values) in {} flushes and {} metadata entities",
            self.series_added,
            self.containers_written,
            self.values_written,
            self.flushes,
            self.metadata_entities_written
        )
    }
}
