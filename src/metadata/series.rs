use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::store::Document;
use crate::variable::Variable;

use super::document::{decode, encode};
use super::{MetadataEntry, MetadataError, Parameter, Quantity, Uid};

/// Reference from a series to a campaign-owned parameter schema
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParameterRef {
    /// Parameter UID
    pub uid: Uid,

    /// Domain values this series covers, sorted and de-duplicated
    #[serde(default)]
    pub values: Vec<Variable>,
}

/// Reference from a series to a campaign-owned quantity schema
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuantityRef {
    /// Quantity UID
    pub uid: Uid,

    /// Parameters this quantity is sampled over within the series
    #[serde(rename = "dependingParametersIDs", default)]
    pub depending_parameter_ids: Vec<Uid>,
}

/// A stored run or sweep
///
/// A series never owns parameter or quantity schemas; it references the
/// campaign's arena by UID. Producers describe new runs with [`NewSeries`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Series {
    /// Unique name within the campaign
    pub name: String,

    /// Display label
    pub label: String,

    /// Campaign-unique index
    pub index: Uid,

    /// Referenced parameters, in producer order
    #[serde(default)]
    pub parameters: Vec<ParameterRef>,

    /// Referenced quantities, in producer order
    #[serde(default)]
    pub quantities: Vec<QuantityRef>,

    /// Free-form annotations
    #[serde(rename = "metaData", default, with = "super::document::entry_list")]
    pub metadata: BTreeMap<String, MetadataEntry>,
}

impl Series {
    /// Identifiers of all referenced parameters
    pub fn parameter_ids(&self) -> impl Iterator<Item = Uid> + '_ {
        self.parameters.iter().map(|p| p.uid)
    }

    /// Identifiers of all referenced quantities
    pub fn quantity_ids(&self) -> impl Iterator<Item = Uid> + '_ {
        self.quantities.iter().map(|q| q.uid)
    }

    /// Domain values of one referenced parameter
    pub fn parameter_values(&self, uid: Uid) -> Option<&[Variable]> {
        self.parameters
            .iter()
            .find(|p| p.uid == uid)
            .map(|p| p.values.as_slice())
    }

    /// Render into a store document
    pub fn to_document(&self) -> Result<Document, MetadataError> {
        encode("Series", self)
    }

    /// Decode from a store document
    pub fn from_document(document: &Document) -> Result<Self, MetadataError> {
        decode("Series", document)
    }
}

/// A series as handed in by a producer, owning candidate schemas
///
/// Candidate parameters and quantities carry no meaningful identifiers; the
/// collection extender resolves them against the campaign.
#[derive(Debug, Clone, Default)]
pub struct NewSeries {
    /// Unique name within the campaign
    pub name: String,

    /// Preferred display label; defaults to the name
    pub label: Option<String>,

    /// Candidate parameters
    pub parameters: Vec<Parameter>,

    /// Candidate quantities; `depending_parameter_labels` name parameters of
    /// this series, an empty list means all of them
    pub quantities: Vec<Quantity>,

    /// Free-form annotations
    pub metadata: BTreeMap<String, MetadataEntry>,
}

impl NewSeries {
    /// Start describing a series
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    /// Set a display label
    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    /// Add a candidate parameter
    pub fn with_parameter(mut self, parameter: Parameter) -> Self {
        self.parameters.push(parameter);
        self
    }

    /// Add a candidate quantity
    pub fn with_quantity(mut self, quantity: Quantity) -> Self {
        self.quantities.push(quantity);
        self
    }

    /// Attach a metadata entry, replacing one with the same name
    pub fn with_metadata(mut self, entry: MetadataEntry) -> Self {
        self.metadata.insert(entry.name().to_string(), entry);
        self
    }
}
