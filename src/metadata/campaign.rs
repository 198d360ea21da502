use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

use crate::store::Document;
use crate::variable::Variable;

use super::document::{decode, encode};
use super::{MetadataEntry, MetadataError, Parameter, Quantity, Series, Uid};

/// Label and identifier indices derived from the series list and schema arenas
#[derive(Debug, Clone, Default)]
struct Overview {
    parameters_by_label: BTreeMap<String, Uid>,
    quantities_by_label: BTreeMap<String, Uid>,
    /// value description UID -> owning quantity UID
    quantities_by_value_uid: BTreeMap<Uid, Uid>,
}

/// All metadata of one result collection
///
/// Parameter and quantity schemas live in campaign-owned arenas keyed by UID;
/// series reference them. The label indices are rebuilt from the series list
/// by [`Campaign::rebuild_overview`] after every mutation.
#[derive(Debug, Clone, Default)]
pub struct Campaign {
    name: String,
    metadata: BTreeMap<String, MetadataEntry>,
    series: Vec<Series>,
    parameters: BTreeMap<Uid, Parameter>,
    quantities: BTreeMap<Uid, Quantity>,
    overview: Overview,
}

#[derive(Serialize)]
struct CampaignSnapshot<'a> {
    name: &'a str,
    #[serde(rename = "metaData")]
    metadata: Vec<&'a MetadataEntry>,
    series: &'a [Series],
    parameters: Vec<&'a Parameter>,
    quantities: Vec<&'a Quantity>,
}

#[derive(Deserialize)]
struct OwnedCampaignSnapshot {
    name: String,
    #[serde(rename = "metaData", default, with = "super::document::entry_list")]
    metadata: BTreeMap<String, MetadataEntry>,
    #[serde(default)]
    series: Vec<Series>,
    #[serde(default)]
    parameters: Vec<Parameter>,
    #[serde(default)]
    quantities: Vec<Quantity>,
}

impl Campaign {
    /// Create an empty campaign
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    /// Assemble a campaign from stored parts, checking referential integrity
    pub fn from_parts(
        name: impl Into<String>,
        metadata: BTreeMap<String, MetadataEntry>,
        series: Vec<Series>,
        parameters: impl IntoIterator<Item = Parameter>,
        quantities: impl IntoIterator<Item = Quantity>,
    ) -> Result<Self, MetadataError> {
        let mut campaign = Self {
            name: name.into(),
            metadata,
            series,
            parameters: parameters.into_iter().map(|p| (p.uid, p)).collect(),
            quantities: quantities.into_iter().map(|q| (q.uid, q)).collect(),
            overview: Overview::default(),
        };
        campaign.check_references()?;
        campaign.rebuild_overview();
        Ok(campaign)
    }

    /// Campaign name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Campaign-level metadata
    pub fn metadata(&self) -> &BTreeMap<String, MetadataEntry> {
        &self.metadata
    }

    /// Insert or overwrite a campaign-level metadata entry
    pub fn add_metadata(&mut self, entry: MetadataEntry) {
        self.metadata.insert(entry.name().to_string(), entry);
    }

    /// All series in insertion order
    pub fn series(&self) -> &[Series] {
        &self.series
    }

    /// All parameter schemas, ordered by UID
    pub fn parameters(&self) -> impl Iterator<Item = &Parameter> {
        self.parameters.values()
    }

    /// All quantity schemas, ordered by UID
    pub fn quantities(&self) -> impl Iterator<Item = &Quantity> {
        self.quantities.values()
    }

    /// Parameter schema by UID
    pub fn parameter(&self, uid: Uid) -> Option<&Parameter> {
        self.parameters.get(&uid)
    }

    /// Quantity schema by UID
    pub fn quantity(&self, uid: Uid) -> Option<&Quantity> {
        self.quantities.get(&uid)
    }

    /// Parameter schema by label
    pub fn parameter_by_label(&self, label: &str) -> Option<&Parameter> {
        self.overview
            .parameters_by_label
            .get(label)
            .and_then(|uid| self.parameters.get(uid))
    }

    /// Quantity schema by label
    pub fn quantity_by_label(&self, label: &str) -> Option<&Quantity> {
        self.overview
            .quantities_by_label
            .get(label)
            .and_then(|uid| self.quantities.get(uid))
    }

    /// Quantity owning the value description with the given UID
    pub fn quantity_by_value_uid(&self, uid: Uid) -> Option<&Quantity> {
        self.overview
            .quantities_by_value_uid
            .get(&uid)
            .and_then(|owner| self.quantities.get(owner))
    }

    /// Parameter labels in sorted order
    pub fn parameter_labels(&self) -> impl Iterator<Item = &str> {
        self.overview.parameters_by_label.keys().map(String::as_str)
    }

    /// Quantity labels in sorted order
    pub fn quantity_labels(&self) -> impl Iterator<Item = &str> {
        self.overview.quantities_by_label.keys().map(String::as_str)
    }

    pub(crate) fn register_parameter(&mut self, parameter: Parameter) {
        self.overview
            .parameters_by_label
            .insert(parameter.label.clone(), parameter.uid);
        self.parameters.insert(parameter.uid, parameter);
    }

    pub(crate) fn register_quantity(&mut self, quantity: Quantity) {
        self.overview
            .quantities_by_label
            .insert(quantity.label.clone(), quantity.uid);
        for vd in &quantity.value_descriptions {
            self.overview.quantities_by_value_uid.insert(vd.uid, quantity.uid);
        }
        self.quantities.insert(quantity.uid, quantity);
    }

    pub(crate) fn push_series(&mut self, series: Series) {
        self.series.push(series);
        self.rebuild_overview();
    }

    pub(crate) fn remove_series(&mut self, index: Uid) -> Option<Series> {
        let position = self.series.iter().position(|s| s.index == index)?;
        let removed = self.series.remove(position);
        self.rebuild_overview();
        Some(removed)
    }

    /// Recompute the derived parts of the campaign from the series list
    ///
    /// Drops schemas no series references, recomputes every parameter's
    /// domain as the union of the series domains, the depending parameters of
    /// every quantity, and the label indices.
    pub fn rebuild_overview(&mut self) {
        let mut domains: BTreeMap<Uid, BTreeSet<Variable>> = BTreeMap::new();
        let mut depending: BTreeMap<Uid, BTreeSet<Uid>> = BTreeMap::new();
        for series in &self.series {
            for reference in &series.parameters {
                domains
                    .entry(reference.uid)
                    .or_default()
                    .extend(reference.values.iter().cloned());
            }
            for reference in &series.quantities {
                depending
                    .entry(reference.uid)
                    .or_default()
                    .extend(reference.depending_parameter_ids.iter().copied());
            }
        }

        self.parameters.retain(|uid, _| domains.contains_key(uid));
        for (uid, parameter) in self.parameters.iter_mut() {
            if let Some(values) = domains.remove(uid) {
                parameter.values = values.into_iter().collect();
            }
        }

        self.quantities.retain(|uid, _| depending.contains_key(uid));
        for (uid, quantity) in self.quantities.iter_mut() {
            let ids: Vec<Uid> = depending
                .remove(uid)
                .map(|ids| ids.into_iter().collect())
                .unwrap_or_default();
            quantity.depending_parameter_labels = ids
                .iter()
                .filter_map(|id| self.parameters.get(id).map(|p| p.label.clone()))
                .collect();
            quantity.depending_parameter_ids = ids;
        }

        let mut overview = Overview::default();
        for parameter in self.parameters.values() {
            overview
                .parameters_by_label
                .insert(parameter.label.clone(), parameter.uid);
        }
        for quantity in self.quantities.values() {
            overview
                .quantities_by_label
                .insert(quantity.label.clone(), quantity.uid);
            for vd in &quantity.value_descriptions {
                overview.quantities_by_value_uid.insert(vd.uid, quantity.uid);
            }
        }
        self.overview = overview;
    }

    fn check_references(&self) -> Result<(), MetadataError> {
        for series in &self.series {
            for uid in series.parameter_ids() {
                if !self.parameters.contains_key(&uid) {
                    return Err(MetadataError::DanglingParameter {
                        series: series.name.clone(),
                        uid,
                    });
                }
            }
            for uid in series.quantity_ids() {
                if !self.quantities.contains_key(&uid) {
                    return Err(MetadataError::DanglingQuantity {
                        series: series.name.clone(),
                        uid,
                    });
                }
            }
        }
        Ok(())
    }

    /// Verify all campaign invariants
    ///
    /// Every referenced schema exists, series names and indices are unique,
    /// labels are unique, each quantity carries the UID of its first value
    /// description and no value description UID is shared by two quantities.
    pub fn check_consistency(&self) -> Result<(), MetadataError> {
        self.check_references()?;

        let mut names = BTreeSet::new();
        let mut indices = BTreeSet::new();
        for series in &self.series {
            if !names.insert(series.name.as_str()) {
                return Err(MetadataError::Inconsistent(format!(
                    "duplicate series name '{}'",
                    series.name
                )));
            }
            if !indices.insert(series.index) {
                return Err(MetadataError::Inconsistent(format!(
                    "duplicate series index {}",
                    series.index
                )));
            }
        }

        if self.overview.parameters_by_label.len() != self.parameters.len() {
            return Err(MetadataError::Inconsistent(
                "parameter labels are not unique".to_string(),
            ));
        }
        if self.overview.quantities_by_label.len() != self.quantities.len() {
            return Err(MetadataError::Inconsistent(
                "quantity labels are not unique".to_string(),
            ));
        }

        let mut value_uids = BTreeSet::new();
        for quantity in self.quantities.values() {
            match quantity.value_descriptions.first() {
                Some(first) if first.uid == quantity.uid => {}
                _ => {
                    return Err(MetadataError::Inconsistent(format!(
                        "quantity '{}' does not carry the UID of its first value description",
                        quantity.label
                    )))
                }
            }
            for vd in &quantity.value_descriptions {
                if !value_uids.insert(vd.uid) {
                    return Err(MetadataError::Inconsistent(format!(
                        "value description UID {} is used twice",
                        vd.uid
                    )));
                }
            }
        }
        Ok(())
    }

    /// Render the full campaign snapshot into a store document
    pub fn to_document(&self) -> Result<Document, MetadataError> {
        let snapshot = CampaignSnapshot {
            name: &self.name,
            metadata: self.metadata.values().collect(),
            series: &self.series,
            parameters: self.parameters.values().collect(),
            quantities: self.quantities.values().collect(),
        };
        encode("Campaign", &snapshot)
    }

    /// Decode a full campaign snapshot and rebuild its overview
    pub fn from_document(document: &Document) -> Result<Self, MetadataError> {
        let snapshot: OwnedCampaignSnapshot = decode("Campaign", document)?;
        Self::from_parts(
            snapshot.name,
            snapshot.metadata,
            snapshot.series,
            snapshot.parameters,
            snapshot.quantities,
        )
    }
}
