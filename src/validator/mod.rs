//! # Result Collection Validation
//!
//! Integrity checks over a stored result collection, reported as a
//! [`ValidationReport`] rather than as errors so every problem is listed in one
//! run.
//!
//! ## Checks
//!
//! 1. **Metadata**: the campaign loads and its invariants hold (unique
//!    identifiers and labels, no dangling references, sorted series domains,
//!    quantity dependencies within the series)
//! 2. **Bulk data**: every quantity container decodes and references a known
//!    series, value description and parameters of that series
//!
//! A series without any stored container is reported as a warning: metadata
//! is written before bulk data, so an interrupted import leaves exactly this
//! state behind.
//!
//! ## Usage
//!
//! ```rust
//! use result_catalog::store::{DocumentEntityStore, InMemoryDocumentStore};
//! use result_catalog::validator::validate_collection;
//!
//! let documents = InMemoryDocumentStore::new();
//! let entities = DocumentEntityStore::new(&documents);
//! let report = validate_collection("sweeps", &documents, &entities)?;
//! assert!(report.has_failures());
//! println!("{}", report);
//! # Ok::<(), result_catalog::validator::ValidationError>(())
//! ```

mod campaign;
mod containers;
mod report;

pub use report::{CheckStatus, ValidationCheck, ValidationReport};

use log::debug;

use crate::catalog::{CatalogError, ResultCatalog};
use crate::metadata::Campaign;
use crate::store::{DocumentStore, MetadataEntityStore, StoreError};

/// Errors that prevent validation from running at all
#[derive(Debug, thiserror::Error)]
pub enum ValidationError {
    /// The store could not be read
    #[error("Store error: {0}")]
    Store(#[from] StoreError),
}

/// Validate the metadata and bulk documents of a stored collection
pub fn validate_collection(
    collection: &str,
    documents: &dyn DocumentStore,
    entities: &dyn MetadataEntityStore,
) -> Result<ValidationReport, ValidationError> {
    let mut report = ValidationReport::new(collection);

    let catalog = match ResultCatalog::load(collection, entities) {
        Ok(catalog) => catalog,
        Err(CatalogError::Store(e)) => return Err(e.into()),
        Err(e) => {
            report.add_check(ValidationCheck::failed("Campaign metadata loads", e.to_string()));
            return Ok(report);
        }
    };
    report.add_check(ValidationCheck::ok("Campaign metadata loads"));

    campaign::check_campaign(catalog.campaign(), &mut report);
    containers::check_containers(&catalog, documents, &mut report)?;

    debug!(
        "Validated '{}': {} passed, {} warnings, {} failed",
        collection,
        report.success_count(),
        report.warning_count(),
        report.failure_count()
    );
    Ok(report)
}

/// Validate an in-memory campaign without touching any store
pub fn validate_campaign(campaign: &Campaign) -> ValidationReport {
    let mut report = ValidationReport::new(campaign.name());
    campaign::check_campaign(campaign, &mut report);
    report
}

#[cfg(test)]
mod tests;
