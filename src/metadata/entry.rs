use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::store::Document;
use crate::variable::Variable;

use super::document::{decode, encode};
use super::MetadataError;

/// Free-form annotation attached to a campaign, series, parameter or quantity
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "shape", rename_all = "lowercase")]
pub enum MetadataEntry {
    /// A single value
    Single {
        /// Entry name
        #[serde(rename = "entryName")]
        name: String,
        /// Stored value
        value: Variable,
    },
    /// An ordered list of values
    Array {
        /// Entry name
        #[serde(rename = "entryName")]
        name: String,
        /// Stored values
        values: Vec<Variable>,
    },
    /// A nested object of further entries, keyed by entry name
    Object {
        /// Entry name
        #[serde(rename = "entryName")]
        name: String,
        /// Child entries
        #[serde(with = "super::document::entry_list")]
        entries: BTreeMap<String, MetadataEntry>,
    },
}

impl MetadataEntry {
    /// Create a single-value entry
    pub fn single(name: impl Into<String>, value: impl Into<Variable>) -> Self {
        MetadataEntry::Single {
            name: name.into(),
            value: value.into(),
        }
    }

    /// Create an array entry
    pub fn array(name: impl Into<String>, values: Vec<Variable>) -> Self {
        MetadataEntry::Array {
            name: name.into(),
            values,
        }
    }

    /// Create an object entry from child entries
    pub fn object(name: impl Into<String>, children: impl IntoIterator<Item = MetadataEntry>) -> Self {
        MetadataEntry::Object {
            name: name.into(),
            entries: children
                .into_iter()
                .map(|child| (child.name().to_string(), child))
                .collect(),
        }
    }

    /// Entry name, used as the key in every metadata map
    pub fn name(&self) -> &str {
        match self {
            MetadataEntry::Single { name, .. }
            | MetadataEntry::Array { name, .. }
            | MetadataEntry::Object { name, .. } => name,
        }
    }

    /// Look up a direct child of an object entry
    pub fn child(&self, name: &str) -> Option<&MetadataEntry> {
        match self {
            MetadataEntry::Object { entries, .. } => entries.get(name),
            _ => None,
        }
    }

    /// Render into a store document
    pub fn to_document(&self) -> Result<Document, MetadataError> {
        encode("MetadataEntry", self)
    }

    /// Decode from a store document
    pub fn from_document(document: &Document) -> Result<Self, MetadataError> {
        decode("MetadataEntry", document)
    }
}
