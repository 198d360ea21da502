//! # result-catalog - Simulation Result Collections on a Document Store
//!
//! `result_catalog` stores the output of parameter sweeps (simulation or
//! measurement campaigns) in a document store. A collection holds two kinds of
//! documents:
//!
//! - **Metadata entities** describing the campaign, its series and the
//!   parameter/quantity schemas they use, kept in a companion collection
//! - **Quantity containers** holding the samples themselves, bucketed per
//!   series, quantity component and parameter coordinate
//!
//! ## Key Features
//!
//! - **Schema dedup**: structurally equal parameters and quantities are shared
//!   across series; clashing names get `_2`, `_3` label suffixes
//! - **Stable identifiers**: series indices and schema UIDs continue from the
//!   stored state, so several import sessions extend one collection
//! - **Batched writes**: samples are packed into containers and flushed in
//!   batches; a failed flush keeps everything buffered for a retry
//! - **Read path**: lookups by name, label or UID, also across projects
//!
//! ## Quick Start
//!
//! ```rust
//! use result_catalog::prelude::*;
//!
//! let documents = InMemoryDocumentStore::new();
//! let entities = DocumentEntityStore::new(&documents);
//!
//! let mut extender = CollectionExtender::open(
//!     "sweeps",
//!     &documents,
//!     &entities,
//!     ExtenderConfig::default(),
//! )?;
//! let frequencies = vec![Variable::from(1.0e9), Variable::from(2.0e9)];
//! let series = extender.add_series(
//!     NewSeries::new("run-1")
//!         .with_parameter(Parameter::new("Frequency", "Hz", "double").with_values(frequencies.clone()))
//!         .with_quantity(Quantity::scalar("Gain", "dB", "double")),
//! )?;
//! let gain = extender.catalog().find_quantity("Gain").map(|q| q.uid).unwrap_or_default();
//! for (i, frequency) in frequencies.into_iter().enumerate() {
//!     extender.add_quantity_container(series, &["Frequency"], vec![frequency], gain, Variable::from(i as f64))?;
//! }
//! extender.finish()?;
//!
//! let catalog = ResultCatalog::load("sweeps", &entities)?;
//! assert_eq!(catalog.list_series_names(), vec!["run-1"]);
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```
//!
//! ## Storage Layout
//!
//! With the [`store::JsonDirectoryStore`] backend a collection looks like:
//!
//! ```text
//! store/
//! ├── sweeps.jsonl            # quantity containers
//! └── sweeps.metadata.jsonl   # campaign, series, parameter, quantity entities
//! ```

// Documentation lints - enforce complete documentation for publication
#![deny(missing_docs)]
#![deny(rustdoc::missing_crate_level_docs)]

pub mod catalog;
pub mod container;
pub mod extender;
mod identifiers;
pub mod metadata;
pub mod overview;
pub mod store;
pub mod validator;
pub mod variable;

/// Re-export commonly used types for convenience
pub mod prelude {
    pub use crate::catalog::{CatalogError, ResultCatalog};
    pub use crate::container::{ContainerState, QuantityContainer};
    pub use crate::extender::{
        CollectionExtender, DataPoints, ExtenderConfig, ExtenderError, ExtenderStats,
        ParameterSweep,
    };
    pub use crate::metadata::{
        Campaign, MetadataEntry, MetadataError, NewSeries, Parameter, Quantity,
        QuantityValueDescription, Series, Uid,
    };
    pub use crate::overview::OverviewTable;
    pub use crate::store::{
        Document, DocumentEntityStore, DocumentStore, InMemoryDocumentStore, JsonDirectoryStore,
        MetadataEntityStore, ProjectRegistry, SessionLocator, StoreError,
    };
    pub use crate::validator::{validate_collection, ValidationReport};
    pub use crate::variable::Variable;
}
