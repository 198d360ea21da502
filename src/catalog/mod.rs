//! # Result Catalog (read path)
//!
//! [`ResultCatalog`] loads the metadata of one result collection from the
//! entity framework and answers lookups by label, name and identifier.
//!
//! The store holds point-in-time records (see
//! [`MetadataEntity`](crate::metadata::MetadataEntity)). Loading folds them in
//! storage order, so a later record for the same campaign, series index,
//! parameter UID or quantity UID supersedes an earlier one. After loading, no
//! lookup touches the store again; a catalog is an immutable snapshot that can
//! be shared between reader threads.
//!
//! ## Example
//!
//! ```rust
//! use result_catalog::catalog::{CatalogError, ResultCatalog};
//! use result_catalog::store::{DocumentEntityStore, InMemoryDocumentStore};
//!
//! let documents = InMemoryDocumentStore::new();
//! let entities = DocumentEntityStore::new(&documents);
//!
//! // nothing was written yet
//! let result = ResultCatalog::load("sweeps", &entities);
//! assert!(matches!(result, Err(CatalogError::NotFound(_))));
//! ```

mod error;


pub use error::CatalogError;

use std::collections::BTreeMap;

use log::{debug, info};

use crate::identifiers::first_free_label;
use crate::metadata::{Campaign, MetadataEntity, Parameter, Quantity, Series, Uid};
use crate::store::{MetadataEntityStore, SessionLocator};

/// Loaded metadata of one result collection
#[derive(Debug, Clone)]
pub struct ResultCatalog {
    collection: String,
    campaign: Campaign,
}

impl ResultCatalog {
    /// Load the campaign stored for `collection`
    ///
    /// Fails with [`CatalogError::NotFound`] when no metadata entity exists.
    /// A campaign record without any series is a valid, empty campaign.
    pub fn load(
        collection: &str,
        entities: &dyn MetadataEntityStore,
    ) -> Result<Self, CatalogError> {
        let documents = entities.load_entities(collection)?;
        if documents.is_empty() {
            return Err(CatalogError::NotFound(format!(
                "no metadata stored for collection '{}'",
                collection
            )));
        }
        debug!(
            "Folding {} metadata records of collection '{}'",
            documents.len(),
            collection
        );

        let mut name = None;
        let mut metadata = BTreeMap::new();
        let mut series: Vec<Series> = Vec::new();
        let mut parameters: BTreeMap<Uid, Parameter> = BTreeMap::new();
        let mut quantities: BTreeMap<Uid, Quantity> = BTreeMap::new();

        for document in &documents {
            match MetadataEntity::from_document(document)? {
                MetadataEntity::Campaign(entity) => {
                    name = Some(entity.name);
                    metadata = entity.metadata;
                }
                MetadataEntity::Series(record) => {
                    match series.iter_mut().find(|s| s.index == record.index) {
                        Some(existing) => *existing = record,
                        None => series.push(record),
                    }
                }
                MetadataEntity::Parameter(parameter) => {
                    parameters.insert(parameter.uid, parameter);
                }
                MetadataEntity::Quantity(quantity) => {
                    quantities.insert(quantity.uid, quantity);
                }
            }
        }

        let campaign = Campaign::from_parts(
            name.unwrap_or_else(|| collection.to_string()),
            metadata,
            series,
            parameters.into_values(),
            quantities.into_values(),
        )?;
        info!(
            "Loaded campaign '{}' with {} series from collection '{}'",
            campaign.name(),
            campaign.series().len(),
            collection
        );
        Ok(Self {
            collection: collection.to_string(),
            campaign,
        })
    }

    /// Load a collection that belongs to another project
    pub fn load_cross_collection(
        collection: &str,
        locator: &dyn SessionLocator,
        project: &str,
    ) -> Result<Self, CatalogError> {
        let entities = locator.entity_store_for(project)?;
        debug!(
            "Reading collection '{}' of project '{}'",
            collection, project
        );
        Self::load(collection, entities)
    }

    /// Wrap an in-memory campaign
    pub fn from_campaign(collection: impl Into<String>, campaign: Campaign) -> Self {
        Self {
            collection: collection.into(),
            campaign,
        }
    }

    /// Name of the collection this catalog describes
    pub fn collection(&self) -> &str {
        &self.collection
    }

    /// The loaded campaign
    pub fn campaign(&self) -> &Campaign {
        &self.campaign
    }

    pub(crate) fn campaign_mut(&mut self) -> &mut Campaign {
        &mut self.campaign
    }

    /// Consume the catalog, returning its campaign
    pub fn into_campaign(self) -> Campaign {
        self.campaign
    }

    /// Series by name, falling back to its display label
    pub fn find_series(&self, name: &str) -> Option<&Series> {
        let series = self.campaign.series();
        series
            .iter()
            .find(|s| s.name == name)
            .or_else(|| series.iter().find(|s| s.label == name))
    }

    /// Series by index
    pub fn find_series_by_uid(&self, index: Uid) -> Option<&Series> {
        self.campaign.series().iter().find(|s| s.index == index)
    }

    /// Parameter by label
    pub fn find_parameter(&self, label: &str) -> Option<&Parameter> {
        self.campaign.parameter_by_label(label)
    }

    /// Parameter by UID
    pub fn find_parameter_by_uid(&self, uid: Uid) -> Option<&Parameter> {
        self.campaign.parameter(uid)
    }

    /// Quantity by label
    pub fn find_quantity(&self, label: &str) -> Option<&Quantity> {
        self.campaign.quantity_by_label(label)
    }

    /// Quantity by its own UID or the UID of one of its value descriptions
    pub fn find_quantity_by_uid(&self, uid: Uid) -> Option<&Quantity> {
        self.campaign
            .quantity(uid)
            .or_else(|| self.campaign.quantity_by_value_uid(uid))
    }

    /// All parameters sharing a name, regardless of unit or type
    pub fn find_parameters_with_same_name(&self, name: &str) -> Vec<&Parameter> {
        self.campaign
            .parameters()
            .filter(|p| p.name == name)
            .collect()
    }

    /// All quantities sharing a name, regardless of their layout
    pub fn find_quantities_with_same_name(&self, name: &str) -> Vec<&Quantity> {
        self.campaign
            .quantities()
            .filter(|q| q.name == name)
            .collect()
    }

    /// Series names in insertion order
    pub fn list_series_names(&self) -> Vec<&str> {
        self.campaign
            .series()
            .iter()
            .map(|s| s.name.as_str())
            .collect()
    }

    /// All parameter labels, sorted
    pub fn list_parameter_labels(&self) -> Vec<&str> {
        self.campaign.parameter_labels().collect()
    }

    /// All quantity labels, sorted
    pub fn list_quantity_labels(&self) -> Vec<&str> {
        self.campaign.quantity_labels().collect()
    }

    /// Labels of the parameters one series references, in series order
    pub fn list_series_parameter_labels(&self, series: &str) -> Result<Vec<&str>, CatalogError> {
        let series = self.require_series(series)?;
        Ok(series
            .parameter_ids()
            .filter_map(|uid| self.campaign.parameter(uid))
            .map(|p| p.label.as_str())
            .collect())
    }

    /// Labels of the quantities one series references, in series order
    pub fn list_series_quantity_labels(&self, series: &str) -> Result<Vec<&str>, CatalogError> {
        let series = self.require_series(series)?;
        Ok(series
            .quantity_ids()
            .filter_map(|uid| self.campaign.quantity(uid))
            .map(|q| q.label.as_str())
            .collect())
    }

    /// First of `base`, `base_2`, `base_3`, ... not used as a series name
    pub fn next_free_series_name(&self, base: &str) -> String {
        first_free_label(base, |candidate| {
            self.campaign.series().iter().any(|s| s.name == candidate)
        })
    }

    fn require_series(&self, name: &str) -> Result<&Series, CatalogError> {
        self.find_series(name)
            .ok_or_else(|| CatalogError::NotFound(format!("series '{}'", name)))
    }
}
