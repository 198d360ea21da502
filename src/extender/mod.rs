//! # Collection Extender (write path)
//!
//! [`CollectionExtender`] adds series and their samples to a result
//! collection. It loads the existing campaign (or starts a new one), resolves
//! every candidate schema against it, allocates identifiers and packs samples
//! into [`QuantityContainer`](crate::container::QuantityContainer)s that are
//! written to the document store in batches.
//!
//! ## Container lifecycle
//!
//! ```text
//! Open --(bucket size reached)--> Sealed --(flush)--> Flushed
//! ```
//!
//! Sealed containers are buffered and written in one batch once the open and
//! sealed containers held in memory reach [`ExtenderConfig::buffer_size`], or
//! when the producer calls [`CollectionExtender::flush_quantity_container`].
//! If nothing is sealed at that point, the open containers are sealed early,
//! so at most `buffer_size` containers are ever held. The final
//! [`CollectionExtender::flush_all`] seals and writes the open containers too.
//! If the store fails, nothing is dropped: the same flush can be retried.
//!
//! ## Example
//!
//! ```rust
//! use result_catalog::prelude::*;
//!
//! let documents = InMemoryDocumentStore::new();
//! let entities = DocumentEntityStore::new(&documents);
//! let mut extender = CollectionExtender::open("sweeps", &documents, &entities, ExtenderConfig::default())?;
//!
//! let series = extender.add_series(
//!     NewSeries::new("run-1")
//!         .with_parameter(Parameter::new("Frequency", "Hz", "double").with_values(vec![Variable::from(1.0e9)]))
//!         .with_quantity(Quantity::scalar("Gain", "dB", "double")),
//! )?;
//! let gain = extender.catalog().find_quantity("Gain").map(|q| q.uid).unwrap_or_default();
//! extender.add_quantity_container(series, &["Frequency"], vec![Variable::from(1.0e9)], gain, Variable::from(3.5))?;
//! let stats = extender.finish()?;
//! assert_eq!(stats.containers_written, 1);
//! # Ok::<(), result_catalog::extender::ExtenderError>(())
//! ```

mod buckets;
mod config;
mod data_points;
mod error;
mod stats;

#[cfg(test)]
mod tests;

pub use config::ExtenderConfig;
pub use data_points::{DataPoints, ParameterSweep};
pub use error::ExtenderError;
pub use stats::ExtenderStats;

use std::collections::{BTreeMap, BTreeSet};

use log::{debug, info, warn};

use crate::catalog::{CatalogError, ResultCatalog};
use crate::identifiers::first_free_label;
use crate::metadata::{
    Campaign, CampaignEntity, MetadataEntity, MetadataEntry, NewSeries, ParameterRef, QuantityRef,
    Series, Uid,
};
use crate::store::{Document, DocumentStore, MetadataEntityStore};
use crate::variable::Variable;

use buckets::{BucketKey, QuantityBuckets};

/// Single-writer session that extends one result collection
pub struct CollectionExtender<'a> {
    catalog: ResultCatalog,
    documents: &'a dyn DocumentStore,
    entities: &'a dyn MetadataEntityStore,
    config: ExtenderConfig,
    buckets: QuantityBuckets,
    /// Series added in this session and not stored yet
    pending_series: Vec<Uid>,
    requires_metadata_update: bool,
    stats: ExtenderStats,
}

impl<'a> CollectionExtender<'a> {
    /// Open a session on `collection`, starting a new campaign if none exists
    pub fn open(
        collection: &str,
        documents: &'a dyn DocumentStore,
        entities: &'a dyn MetadataEntityStore,
        config: ExtenderConfig,
    ) -> Result<Self, ExtenderError> {
        let (catalog, is_new) = match ResultCatalog::load(collection, entities) {
            Ok(catalog) => (catalog, false),
            Err(CatalogError::NotFound(_)) => {
                info!("Starting new campaign for collection '{}'", collection);
                (
                    ResultCatalog::from_campaign(collection, Campaign::new(collection)),
                    true,
                )
            }
            Err(e) => return Err(e.into()),
        };

        Ok(Self {
            catalog,
            documents,
            entities,
            buckets: QuantityBuckets::new(config.bucket_size),
            config,
            pending_series: Vec::new(),
            requires_metadata_update: is_new,
            stats: ExtenderStats::default(),
        })
    }

    /// The campaign as extended so far
    pub fn catalog(&self) -> &ResultCatalog {
        &self.catalog
    }

    /// Session configuration
    pub fn config(&self) -> &ExtenderConfig {
        &self.config
    }

    /// Counters of this session
    pub fn stats(&self) -> &ExtenderStats {
        &self.stats
    }

    /// Sealed containers waiting for a flush
    pub fn buffered_containers(&self) -> usize {
        self.buckets.sealed_len()
    }

    /// Containers still accepting samples
    pub fn open_containers(&self) -> usize {
        self.buckets.open_len()
    }

    /// Whether metadata changes are waiting for [`Self::store_campaign_changes`]
    pub fn has_pending_metadata(&self) -> bool {
        self.requires_metadata_update || !self.pending_series.is_empty()
    }

    /// Register a new series and return its index
    ///
    /// Parameters and quantities are matched against the campaign schema and
    /// reused where structurally equal. The series label is made unique with
    /// a numeric suffix; a duplicate series name is rejected.
    pub fn add_series(&mut self, series: NewSeries) -> Result<Uid, ExtenderError> {
        if self.catalog.campaign().series().iter().any(|s| s.name == series.name) {
            return Err(ExtenderError::DuplicateSeriesName(series.name));
        }
        validate_new_series(&series)?;

        let campaign = self.catalog.campaign_mut();

        let mut parameter_uids: BTreeMap<&str, Uid> = BTreeMap::new();
        let mut parameters: Vec<ParameterRef> = Vec::new();
        for candidate in &series.parameters {
            let (uid, _) = campaign.resolve_parameter(candidate);
            parameter_uids.insert(candidate.name.as_str(), uid);
            let position = match parameters.iter().position(|p| p.uid == uid) {
                Some(position) => position,
                None => {
                    parameters.push(ParameterRef {
                        uid,
                        values: Vec::new(),
                    });
                    parameters.len() - 1
                }
            };
            let domain: BTreeSet<Variable> = parameters[position]
                .values
                .drain(..)
                .chain(candidate.values.iter().cloned())
                .collect();
            parameters[position].values = domain.into_iter().collect();
        }
        let all_parameters: Vec<Uid> = parameters.iter().map(|p| p.uid).collect();

        let mut quantities: Vec<QuantityRef> = Vec::new();
        for candidate in &series.quantities {
            let (uid, _) = campaign.resolve_quantity(candidate)?;
            let depending: Vec<Uid> = if candidate.depending_parameter_labels.is_empty() {
                all_parameters.clone()
            } else {
                candidate
                    .depending_parameter_labels
                    .iter()
                    .filter_map(|name| parameter_uids.get(name.as_str()).copied())
                    .collect()
            };
            match quantities.iter_mut().find(|q| q.uid == uid) {
                Some(existing) => {
                    for id in depending {
                        if !existing.depending_parameter_ids.contains(&id) {
                            existing.depending_parameter_ids.push(id);
                        }
                    }
                }
                None => quantities.push(QuantityRef {
                    uid,
                    depending_parameter_ids: depending,
                }),
            }
        }

        let preferred = series.label.clone().unwrap_or_else(|| series.name.clone());
        let label = first_free_label(&preferred, |label| {
            campaign.series().iter().any(|s| s.label == label)
        });
        let index = campaign.allocate_next_series_index();
        info!(
            "Adding series '{}' (index {}, label '{}') with {} parameters and {} quantities",
            series.name,
            index,
            label,
            parameters.len(),
            quantities.len()
        );

        campaign.push_series(Series {
            name: series.name,
            label,
            index,
            parameters,
            quantities,
            metadata: series.metadata,
        });
        self.pending_series.push(index);
        self.stats.series_added += 1;
        Ok(index)
    }

    /// Drop a series added in this session that was not stored yet
    ///
    /// Buffered containers of the series are discarded too. Returns `false`
    /// for unknown or already stored series.
    pub fn remove_series(&mut self, index: Uid) -> bool {
        let Some(position) = self.pending_series.iter().position(|i| *i == index) else {
            return false;
        };
        self.pending_series.remove(position);
        self.buckets.discard_series(index);
        let removed = self.catalog.campaign_mut().remove_series(index).is_some();
        if removed {
            self.stats.series_added = self.stats.series_added.saturating_sub(1);
            debug!("Removed pending series {}", index);
        }
        removed
    }

    /// Number of samples grouped into one container
    pub fn set_bucket_size(&mut self, bucket_size: usize) {
        self.buckets.set_bucket_size(bucket_size);
    }

    /// Current bucket size
    pub fn bucket_size(&self) -> usize {
        self.buckets.bucket_size()
    }

    /// Append one sample, addressing parameters by label
    ///
    /// `quantity_index` is the UID of a quantity value description. May
    /// trigger an automatic flush; if that flush fails the sample stays
    /// buffered.
    pub fn add_quantity_container(
        &mut self,
        series_index: Uid,
        parameter_labels: &[&str],
        parameter_values: Vec<Variable>,
        quantity_index: Uid,
        value: Variable,
    ) -> Result<(), ExtenderError> {
        let parameter_ids = parameter_labels
            .iter()
            .map(|label| {
                self.catalog
                    .find_parameter(label)
                    .map(|p| p.uid)
                    .ok_or_else(|| ExtenderError::NotFound(format!("parameter '{}'", label)))
            })
            .collect::<Result<Vec<Uid>, _>>()?;
        self.add_quantity_value(series_index, parameter_ids, parameter_values, quantity_index, value)
    }

    /// Append one sample, addressing parameters by UID
    pub fn add_quantity_value(
        &mut self,
        series_index: Uid,
        parameter_ids: Vec<Uid>,
        parameter_values: Vec<Variable>,
        quantity_index: Uid,
        value: Variable,
    ) -> Result<(), ExtenderError> {
        if self.catalog.find_series_by_uid(series_index).is_none() {
            return Err(ExtenderError::NotFound(format!("series {}", series_index)));
        }
        if self.catalog.campaign().quantity_by_value_uid(quantity_index).is_none() {
            return Err(ExtenderError::NotFound(format!(
                "quantity value description {}",
                quantity_index
            )));
        }
        if parameter_ids.len() != parameter_values.len() {
            return Err(ExtenderError::InvalidData(format!(
                "{} parameters but {} parameter values",
                parameter_ids.len(),
                parameter_values.len()
            )));
        }

        self.buckets.append(
            BucketKey {
                series_index,
                quantity_index,
                parameter_ids,
                parameter_values,
            },
            value,
        );

        if self.buckets.buffered_len() >= self.config.buffer_size.max(1) {
            debug!(
                "Buffer threshold of {} containers reached",
                self.config.buffer_size
            );
            if self.buckets.sealed_len() == 0 {
                self.buckets.seal_all();
            }
            self.flush_quantity_container()?;
        }
        Ok(())
    }

    /// Write all sealed containers in one batch
    ///
    /// On failure the containers stay buffered for a retry.
    pub fn flush_quantity_container(&mut self) -> Result<(), ExtenderError> {
        if self.buckets.sealed_len() == 0 {
            return Ok(());
        }
        let documents = self
            .buckets
            .sealed()
            .iter()
            .map(|container| container.to_document())
            .collect::<Result<Vec<Document>, _>>()?;
        let values: usize = self.buckets.sealed().iter().map(|c| c.len()).sum();
        let count = documents.len();

        if let Err(e) = self
            .documents
            .insert_many(self.catalog.collection(), documents)
        {
            warn!(
                "Flushing {} containers to '{}' failed: {}",
                count,
                self.catalog.collection(),
                e
            );
            return Err(e.into());
        }

        self.buckets.clear_sealed();
        self.stats.containers_written += count;
        self.stats.values_written += values;
        self.stats.flushes += 1;
        debug!(
            "Flushed {} containers ({} values) to '{}'",
            count,
            values,
            self.catalog.collection()
        );
        Ok(())
    }

    /// Seal every open container and write everything buffered
    pub fn flush_all(&mut self) -> Result<(), ExtenderError> {
        self.buckets.seal_all();
        self.flush_quantity_container()
    }

    /// Store pending metadata, then write all buffered containers
    pub fn finish(&mut self) -> Result<ExtenderStats, ExtenderError> {
        self.store_campaign_changes()?;
        self.flush_all()?;
        info!("{}", self.stats);
        Ok(self.stats.clone())
    }

    /// Persist the campaign record (if changed) and the series added in this session
    ///
    /// Every schema a new series references is stored alongside it, carrying
    /// its current campaign-wide domain.
    pub fn store_campaign_changes(&mut self) -> Result<(), ExtenderError> {
        if !self.has_pending_metadata() {
            return Ok(());
        }
        let campaign = self.catalog.campaign();
        let mut records = Vec::new();
        if self.requires_metadata_update {
            records.push(MetadataEntity::Campaign(CampaignEntity::from(campaign)));
        }

        let mut parameters = BTreeSet::new();
        let mut quantities = BTreeSet::new();
        let mut series_records = Vec::new();
        for index in &self.pending_series {
            let Some(series) = campaign.series().iter().find(|s| s.index == *index) else {
                continue;
            };
            parameters.extend(series.parameter_ids());
            quantities.extend(series.quantity_ids());
            series_records.push(MetadataEntity::Series(series.clone()));
        }
        records.extend(
            parameters
                .into_iter()
                .filter_map(|uid| campaign.parameter(uid).cloned())
                .map(MetadataEntity::Parameter),
        );
        records.extend(
            quantities
                .into_iter()
                .filter_map(|uid| campaign.quantity(uid).cloned())
                .map(MetadataEntity::Quantity),
        );
        records.extend(series_records);

        let documents = records
            .iter()
            .map(MetadataEntity::to_document)
            .collect::<Result<Vec<Document>, _>>()?;
        let count = documents.len();
        self.entities
            .store_entities(self.catalog.collection(), documents)?;

        info!(
            "Stored {} metadata entities for {} new series of '{}'",
            count,
            self.pending_series.len(),
            self.catalog.collection()
        );
        self.pending_series.clear();
        self.requires_metadata_update = false;
        self.stats.metadata_entities_written += count;
        Ok(())
    }

    /// Whether the campaign has a metadata entry with the same name
    pub fn has_metadata_with_same_name(&self, entry: &MetadataEntry) -> bool {
        self.catalog.campaign().has_metadata_with_same_name(entry)
    }

    /// Whether the campaign has an identical metadata entry
    pub fn has_metadata_with_same_value(&self, entry: &MetadataEntry) -> bool {
        self.catalog.campaign().has_metadata_with_same_value(entry)
    }

    /// Insert or overwrite a campaign metadata entry
    pub fn add_campaign_metadata(&mut self, entry: MetadataEntry) {
        self.catalog.campaign_mut().add_metadata(entry);
        self.requires_metadata_update = true;
    }

    /// Append a block of curve, complex-curve or S-parameter samples
    ///
    /// `quantity` is the UID of a quantity whose value descriptions match the
    /// shape of `points`. The bucket size is set to group one parameter point
    /// per container.
    pub fn store_data_points(
        &mut self,
        series_index: Uid,
        sweep: &ParameterSweep,
        quantity: Uid,
        points: &DataPoints,
    ) -> Result<(), ExtenderError> {
        let point_count = sweep.point_count()?;
        points.validate(point_count)?;

        let components: Vec<Uid> = {
            let quantity = self
                .catalog
                .find_quantity_by_uid(quantity)
                .ok_or_else(|| ExtenderError::NotFound(format!("quantity {}", quantity)))?;
            if quantity.value_descriptions.len() != points.component_count() {
                return Err(ExtenderError::InvalidData(format!(
                    "Quantity '{}' has {} value descriptions, the data points need {}",
                    quantity.label,
                    quantity.value_descriptions.len(),
                    points.component_count()
                )));
            }
            quantity.value_descriptions.iter().map(|vd| vd.uid).collect()
        };

        self.set_bucket_size(points.bucket_size());
        let parameter_ids = sweep.parameter_ids();

        for position in 0..point_count {
            let coordinate = sweep.coordinate(position);
            let samples: Vec<(Uid, &[Variable])> = match points {
                DataPoints::Curve(values) => {
                    vec![(components[0], std::slice::from_ref(&values[position]))]
                }
                DataPoints::ComplexCurve { real, imag } => vec![
                    (components[0], std::slice::from_ref(&real[position])),
                    (components[1], std::slice::from_ref(&imag[position])),
                ],
                DataPoints::SParameter { first, second, .. } => vec![
                    (components[0], first[position].as_slice()),
                    (components[1], second[position].as_slice()),
                ],
            };
            for (component, values) in samples {
                for value in values {
                    self.add_quantity_value(
                        series_index,
                        parameter_ids.clone(),
                        coordinate.clone(),
                        component,
                        value.clone(),
                    )?;
                }
            }
        }
        Ok(())
    }
}

/// Check a producer's series description before anything is registered
fn validate_new_series(series: &NewSeries) -> Result<(), ExtenderError> {
    if series.name.is_empty() {
        return Err(ExtenderError::InvalidData(
            "series name must not be empty".to_string(),
        ));
    }
    for quantity in &series.quantities {
        if quantity.value_descriptions.is_empty() {
            return Err(ExtenderError::InvalidData(format!(
                "quantity '{}' has no value descriptions",
                quantity.name
            )));
        }
        for name in &quantity.depending_parameter_labels {
            if !series.parameters.iter().any(|p| &p.name == name) {
                return Err(ExtenderError::InvalidData(format!(
                    "quantity '{}' depends on unknown parameter '{}'",
                    quantity.name, name
                )));
            }
        }
    }
    Ok(())
}
