//! # Identifier Allocation and Schema Deduplication
//!
//! Repeated imports into one collection must not multiply the schema. Before
//! a candidate [`Parameter`] or [`Quantity`] is registered, the campaign is
//! scanned for a structurally equal schema with the same name; a match is
//! reused, anything else gets a fresh identifier and a unique label.
//!
//! Identifiers are dense: the next one is `max(existing) + 1`, or `0` for an
//! empty campaign. Quantities and their value descriptions share one
//! identifier space, and a new quantity carries the identifier of its first
//! value description.
//!
//! Labels stay unique by suffixing: `Frequency`, `Frequency_2`,
//! `Frequency_3`, ... taking the first free one.

use log::debug;

use crate::metadata::{Campaign, MetadataEntry, MetadataError, Parameter, Quantity, Uid};

/// First of `base`, `base_2`, `base_3`, ... for which `taken` is false
pub(crate) fn first_free_label(base: &str, taken: impl Fn(&str) -> bool) -> String {
    if !taken(base) {
        return base.to_string();
    }
    let mut suffix: u64 = 2;
    loop {
        let candidate = format!("{}_{}", base, suffix);
        if !taken(&candidate) {
            return candidate;
        }
        suffix += 1;
    }
}

fn next_uid(existing: impl Iterator<Item = Uid>) -> Uid {
    existing.max().map_or(0, |max| max + 1)
}

impl Campaign {
    /// Next free series index
    pub fn allocate_next_series_index(&self) -> Uid {
        next_uid(self.series().iter().map(|s| s.index))
    }

    /// Next free parameter UID
    pub fn allocate_next_parameter_index(&self) -> Uid {
        next_uid(self.parameters().map(|p| p.uid))
    }

    /// Next free UID in the space shared by quantities and value descriptions
    pub fn allocate_next_quantity_index(&self) -> Uid {
        next_uid(self.quantities().flat_map(|q| {
            std::iter::once(q.uid).chain(q.value_descriptions.iter().map(|vd| vd.uid))
        }))
    }

    /// Find or register a parameter schema, returning its UID and whether it is new
    ///
    /// The candidate's UID, label and domain values are ignored; domains are
    /// tracked per series.
    pub fn resolve_parameter(&mut self, candidate: &Parameter) -> (Uid, bool) {
        if let Some(existing) = self
            .parameters()
            .find(|p| p.name == candidate.name && p.same_schema(candidate))
        {
            debug!(
                "Reusing parameter '{}' (uid {}) for '{}'",
                existing.label, existing.uid, candidate.name
            );
            return (existing.uid, false);
        }

        let uid = self.allocate_next_parameter_index();
        let label = first_free_label(&candidate.name, |label| {
            self.parameter_by_label(label).is_some()
        });
        debug!("New parameter '{}' with uid {}", label, uid);

        let mut parameter = candidate.clone();
        parameter.uid = uid;
        parameter.label = label;
        parameter.values.clear();
        self.register_parameter(parameter);
        (uid, true)
    }

    /// Find or register a quantity schema, returning its UID and whether it is new
    ///
    /// On a match the existing quantity, with the identifiers and labels of
    /// its value descriptions, is reused as is. A new quantity gets
    /// consecutive fresh UIDs for its value descriptions and takes the first
    /// of them as its own.
    pub fn resolve_quantity(&mut self, candidate: &Quantity) -> Result<(Uid, bool), MetadataError> {
        if candidate.value_descriptions.is_empty() {
            return Err(MetadataError::Inconsistent(format!(
                "quantity '{}' has no value descriptions",
                candidate.name
            )));
        }

        if let Some(existing) = self
            .quantities()
            .find(|q| q.name == candidate.name && q.same_schema(candidate))
        {
            debug!(
                "Reusing quantity '{}' (uid {}) for '{}'",
                existing.label, existing.uid, candidate.name
            );
            return Ok((existing.uid, false));
        }

        let first = self.allocate_next_quantity_index();
        let label = first_free_label(&candidate.name, |label| {
            self.quantity_by_label(label).is_some()
        });
        debug!(
            "New quantity '{}' with uid {} and {} value descriptions",
            label,
            first,
            candidate.value_descriptions.len()
        );

        let mut quantity = candidate.clone();
        quantity.uid = first;
        quantity.label = label;
        quantity.depending_parameter_ids.clear();
        quantity.depending_parameter_labels.clear();
        for (uid, description) in (first..).zip(quantity.value_descriptions.iter_mut()) {
            description.uid = uid;
            if description.label.is_empty() {
                description.label = description.name.clone();
            }
        }
        self.register_quantity(quantity);
        Ok((first, true))
    }

    /// Whether a campaign metadata entry with the same name exists
    pub fn has_metadata_with_same_name(&self, entry: &MetadataEntry) -> bool {
        self.metadata().contains_key(entry.name())
    }

    /// Whether an identical campaign metadata entry exists
    pub fn has_metadata_with_same_value(&self, entry: &MetadataEntry) -> bool {
        self.metadata().get(entry.name()) == Some(entry)
    }
}
