//! # Quantity Containers
//!
//! A [`QuantityContainer`] is the unit of bulk storage: the samples of one
//! quantity component at one parameter coordinate of one series. Containers
//! are filled by the bucketing engine and rendered into one store document
//! each:
//!
//! ```json
//! {
//!   "seriesIndex": 0,
//!   "quantityIndex": 4,
//!   "bucket": 0,
//!   "parameterIds": [0],
//!   "parameterValues": [1000000000.0],
//!   "values": [0.1, -0.2, -0.2, 0.1]
//! }
//! ```

use serde::{Deserialize, Serialize};

use crate::metadata::{MetadataError, Uid};
use crate::store::Document;
use crate::variable::Variable;

/// Lifecycle of a container held by the bucketing engine
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContainerState {
    /// Accepting appends
    Open,
    /// Bucket is full; waiting to be flushed
    Sealed,
}

/// Samples of one quantity component at one parameter coordinate
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuantityContainer {
    /// Index of the owning series
    pub series_index: Uid,

    /// UID of the quantity value description the samples belong to
    pub quantity_index: Uid,

    /// Ordinal of this container among those sharing the same coordinate
    #[serde(default)]
    pub bucket: u64,

    /// Parameters spanning the coordinate
    pub parameter_ids: Vec<Uid>,

    /// Coordinate values, positionally matching `parameter_ids`
    pub parameter_values: Vec<Variable>,

    /// Accumulated samples
    pub values: Vec<Variable>,

    #[serde(skip, default = "sealed")]
    state: ContainerState,
}

fn sealed() -> ContainerState {
    ContainerState::Sealed
}

impl QuantityContainer {
    /// Create an empty, open container
    pub fn new(
        series_index: Uid,
        quantity_index: Uid,
        bucket: u64,
        parameter_ids: Vec<Uid>,
        parameter_values: Vec<Variable>,
    ) -> Self {
        Self {
            series_index,
            quantity_index,
            bucket,
            parameter_ids,
            parameter_values,
            values: Vec::new(),
            state: ContainerState::Open,
        }
    }

    /// Current lifecycle state; decoded containers count as sealed
    pub fn state(&self) -> ContainerState {
        self.state
    }

    /// Number of stored samples
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Whether no sample was stored yet
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Append a sample; sealed containers reject further samples
    pub fn push(&mut self, value: Variable) -> Result<(), Variable> {
        match self.state {
            ContainerState::Open => {
                self.values.push(value);
                Ok(())
            }
            ContainerState::Sealed => Err(value),
        }
    }

    /// Append without a state check; the bucketing engine only holds open containers
    pub(crate) fn append_open(&mut self, value: Variable) {
        debug_assert_eq!(self.state, ContainerState::Open);
        self.values.push(value);
    }

    /// Close the container for further appends
    pub fn seal(&mut self) {
        self.state = ContainerState::Sealed;
    }

    /// Render into a store document
    pub fn to_document(&self) -> Result<Document, MetadataError> {
        match serde_json::to_value(self) {
            Ok(serde_json::Value::Object(map)) => Ok(map),
            Ok(_) => Err(MetadataError::Inconsistent(
                "quantity container did not encode to an object".to_string(),
            )),
            Err(source) => Err(MetadataError::Encode {
                entity: "QuantityContainer",
                source,
            }),
        }
    }

    /// Decode a stored container
    pub fn from_document(document: &Document) -> Result<Self, MetadataError> {
        serde_json::from_value(serde_json::Value::Object(document.clone())).map_err(|source| {
            MetadataError::Schema {
                entity: "QuantityContainer",
                source,
            }
        })
    }
}
