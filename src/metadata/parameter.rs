use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::store::Document;
use crate::variable::Variable;

use super::document::{decode, encode};
use super::{MetadataEntry, MetadataError, Uid};

/// An input axis of a series, e.g. a frequency sweep
///
/// Two parameters describe the same schema when [`Parameter::same_schema`]
/// holds; the identifier, label and domain values do not take part in that
/// comparison.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Parameter {
    /// Campaign-scoped identifier
    pub uid: Uid,

    /// Name as produced by the importer or solver
    pub name: String,

    /// Campaign-unique display label (the name, possibly with a suffix)
    pub label: String,

    /// Physical unit
    pub unit: String,

    /// Type name of the domain values
    #[serde(rename = "type")]
    pub type_name: String,

    /// Domain values
    #[serde(default)]
    pub values: Vec<Variable>,

    /// Free-form annotations
    #[serde(rename = "metaData", default, with = "super::document::entry_list")]
    pub metadata: BTreeMap<String, MetadataEntry>,
}

impl Parameter {
    /// Create a candidate parameter; the label starts out equal to the name
    pub fn new(name: impl Into<String>, unit: impl Into<String>, type_name: impl Into<String>) -> Self {
        let name = name.into();
        Self {
            uid: 0,
            label: name.clone(),
            name,
            unit: unit.into(),
            type_name: type_name.into(),
            values: Vec::new(),
            metadata: BTreeMap::new(),
        }
    }

    /// Set the domain values
    pub fn with_values(mut self, values: impl IntoIterator<Item = Variable>) -> Self {
        self.values = values.into_iter().collect();
        self
    }

    /// Attach a metadata entry, replacing one with the same name
    pub fn with_metadata(mut self, entry: MetadataEntry) -> Self {
        self.metadata.insert(entry.name().to_string(), entry);
        self
    }

    /// Structural equality: type name, unit and name
    pub fn same_schema(&self, other: &Parameter) -> bool {
        self.type_name == other.type_name && self.unit == other.unit && self.name == other.name
    }

    /// Render into a store document
    pub fn to_document(&self) -> Result<Document, MetadataError> {
        encode("Parameter", self)
    }

    /// Decode from a store document
    pub fn from_document(document: &Document) -> Result<Self, MetadataError> {
        decode("Parameter", document)
    }
}
