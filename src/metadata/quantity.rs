use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::store::Document;

use super::document::{decode, encode};
use super::{MetadataEntry, MetadataError, Uid};

/// One component of a quantity, e.g. the real part of a complex value
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuantityValueDescription {
    /// Identifier; shares the identifier space of quantities
    pub uid: Uid,

    /// Display label
    pub label: String,

    /// Component name
    pub name: String,

    /// Physical unit
    pub unit: String,

    /// Type name of the stored values
    #[serde(rename = "type")]
    pub data_type_name: String,
}

impl QuantityValueDescription {
    /// Create a candidate value description
    pub fn new(name: impl Into<String>, unit: impl Into<String>, data_type_name: impl Into<String>) -> Self {
        let name = name.into();
        Self {
            uid: 0,
            label: name.clone(),
            name,
            unit: unit.into(),
            data_type_name: data_type_name.into(),
        }
    }

    /// Structural equality: name, unit and data type
    pub fn same_schema(&self, other: &QuantityValueDescription) -> bool {
        self.name == other.name && self.unit == other.unit && self.data_type_name == other.data_type_name
    }
}

/// An output of a series, possibly multi-component and multi-dimensional
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Quantity {
    /// Identifier; equal to the identifier of the first value description
    pub uid: Uid,

    /// Name as produced by the importer or solver
    pub name: String,

    /// Campaign-unique display label
    pub label: String,

    /// Shape of a single sample, e.g. `[2, 2]` for a 2-port network
    #[serde(rename = "dimensions", default)]
    pub data_dimensions: Vec<u32>,

    /// Parameters the quantity is sampled over
    #[serde(rename = "dependingParametersIDs", default)]
    pub depending_parameter_ids: Vec<Uid>,

    /// Labels of the parameters the quantity is sampled over
    #[serde(rename = "dependingParametersLabels", default)]
    pub depending_parameter_labels: Vec<String>,

    /// Components of every sample
    #[serde(rename = "valueDescriptions")]
    pub value_descriptions: Vec<QuantityValueDescription>,

    /// Free-form annotations
    #[serde(rename = "metaData", default, with = "super::document::entry_list")]
    pub metadata: BTreeMap<String, MetadataEntry>,
}

impl Quantity {
    /// Create a candidate quantity without value descriptions
    pub fn new(name: impl Into<String>, data_dimensions: Vec<u32>) -> Self {
        let name = name.into();
        Self {
            uid: 0,
            label: name.clone(),
            name,
            data_dimensions,
            depending_parameter_ids: Vec::new(),
            depending_parameter_labels: Vec::new(),
            value_descriptions: Vec::new(),
            metadata: BTreeMap::new(),
        }
    }

    /// Scalar quantity with a single value description of the same name
    pub fn scalar(name: impl Into<String>, unit: impl Into<String>, data_type_name: impl Into<String>) -> Self {
        let name = name.into();
        Self::new(name.clone(), vec![1]).with_value_description(QuantityValueDescription::new(
            name,
            unit,
            data_type_name,
        ))
    }

    /// Append a value description
    pub fn with_value_description(mut self, description: QuantityValueDescription) -> Self {
        self.value_descriptions.push(description);
        self
    }

    /// Restrict the quantity to the named parameters of its series
    pub fn depending_on<I, S>(mut self, parameter_names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.depending_parameter_labels = parameter_names.into_iter().map(Into::into).collect();
        self
    }

    /// Attach a metadata entry, replacing one with the same name
    pub fn with_metadata(mut self, entry: MetadataEntry) -> Self {
        self.metadata.insert(entry.name().to_string(), entry);
        self
    }

    /// Number of scalar entries per sample and component (product of the dimensions)
    pub fn sample_size(&self) -> usize {
        self.data_dimensions.iter().map(|d| *d as usize).product()
    }

    /// Structural equality: name, dimensions and value descriptions element-wise
    pub fn same_schema(&self, other: &Quantity) -> bool {
        self.name == other.name
            && self.data_dimensions == other.data_dimensions
            && self.value_descriptions.len() == other.value_descriptions.len()
            && self
                .value_descriptions
                .iter()
                .zip(&other.value_descriptions)
                .all(|(a, b)| a.same_schema(b))
    }

    /// Find the value description carrying the given identifier
    pub fn value_description(&self, uid: Uid) -> Option<&QuantityValueDescription> {
        self.value_descriptions.iter().find(|vd| vd.uid == uid)
    }

    /// Render into a store document
    pub fn to_document(&self) -> Result<Document, MetadataError> {
        encode("Quantity", self)
    }

    /// Decode from a store document
    pub fn from_document(document: &Document) -> Result<Self, MetadataError> {
        decode("Quantity", document)
    }
}
