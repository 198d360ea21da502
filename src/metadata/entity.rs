use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::store::Document;

use super::document::{decode, encode};
use super::{Campaign, MetadataEntry, MetadataError, Parameter, Quantity, Series};

/// Campaign-level record: name and global metadata, without series
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CampaignEntity {
    /// Campaign name
    pub name: String,

    /// Campaign-level metadata
    #[serde(rename = "metaData", default, with = "super::document::entry_list")]
    pub metadata: BTreeMap<String, MetadataEntry>,
}

impl From<&Campaign> for CampaignEntity {
    fn from(campaign: &Campaign) -> Self {
        Self {
            name: campaign.name().to_string(),
            metadata: campaign.metadata().clone(),
        }
    }
}

/// A point-in-time metadata record as kept by the entity store
///
/// A campaign is persisted as a set of these records. Later records with the
/// same key (campaign, series index, parameter or quantity UID) supersede
/// earlier ones.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "entityType", rename_all = "lowercase")]
pub enum MetadataEntity {
    /// Campaign record
    Campaign(CampaignEntity),
    /// Series record, referencing schemas by UID
    Series(Series),
    /// Parameter schema record
    Parameter(Parameter),
    /// Quantity schema record
    Quantity(Quantity),
}

impl MetadataEntity {
    /// Short kind name, as written into `entityType`
    pub fn kind(&self) -> &'static str {
        match self {
            MetadataEntity::Campaign(_) => "campaign",
            MetadataEntity::Series(_) => "series",
            MetadataEntity::Parameter(_) => "parameter",
            MetadataEntity::Quantity(_) => "quantity",
        }
    }

    /// Render into a store document
    pub fn to_document(&self) -> Result<Document, MetadataError> {
        encode("MetadataEntity", self)
    }

    /// Decode from a store document
    pub fn from_document(document: &Document) -> Result<Self, MetadataError> {
        decode("MetadataEntity", document)
    }
}
