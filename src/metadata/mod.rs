//! # Result Metadata Entities
//!
//! This module holds the value objects that describe a result collection:
//!
//! - [`Campaign`]: top-level container with global metadata, all series and
//!   the campaign-owned parameter/quantity schema arenas
//! - [`Series`]: one indexed run, referencing schemas by UID
//! - [`Parameter`]: an input axis (e.g. frequency)
//! - [`Quantity`]: an output with one or more [`QuantityValueDescription`]s
//! - [`MetadataEntry`]: free-form annotations (single value, array or object)
//!
//! Every entity renders into a store document and decodes from one without
//! loss. Decoding ignores unknown fields and fails with
//! [`MetadataError::Schema`] on missing or mistyped required fields.
//!
//! ## Structural equality
//!
//! The dedup engine compares schemas with `same_schema`, which ignores
//! identifiers, labels and domain values:
//!
//! | Entity | Compared fields |
//! |--------|-----------------|
//! | Parameter | type name, unit, name |
//! | Quantity | name, dimensions, value descriptions |
//! | QuantityValueDescription | name, unit, data type |
//!
//! The derived `PartialEq` compares every field and is what round-trip tests use.

mod campaign;
mod document;
mod entity;
mod entry;
mod error;
mod parameter;
mod quantity;
mod series;


pub use campaign::Campaign;
pub use entity::{CampaignEntity, MetadataEntity};
pub use entry::MetadataEntry;
pub use error::MetadataError;
pub use parameter::Parameter;
pub use quantity::{Quantity, QuantityValueDescription};
pub use series::{NewSeries, ParameterRef, QuantityRef, Series};

/// Campaign-scoped identifier
pub type Uid = u64;
