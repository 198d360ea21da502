use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;

use crate::store::Document;

use super::MetadataError;

/// Render any serializable entity into a store document.
pub(crate) fn encode<T: Serialize>(entity: &'static str, value: &T) -> Result<Document, MetadataError> {
    match serde_json::to_value(value) {
        Ok(Value::Object(map)) => Ok(map),
        Ok(other) => Err(MetadataError::Inconsistent(format!(
            "{} did not encode to an object but to {}",
            entity, other
        ))),
        Err(source) => Err(MetadataError::Encode { entity, source }),
    }
}

/// Decode an entity from a store document; unknown fields are ignored.
pub(crate) fn decode<T: DeserializeOwned>(
    entity: &'static str,
    document: &Document,
) -> Result<T, MetadataError> {
    serde_json::from_value(Value::Object(document.clone()))
        .map_err(|source| MetadataError::Schema { entity, source })
}

/// Serialize a name-keyed map of entries as a plain `metaData` array.
pub(crate) mod entry_list {
    use std::collections::BTreeMap;

    use serde::{Deserialize, Deserializer, Serializer};

    use crate::metadata::MetadataEntry;

    pub fn serialize<S>(map: &BTreeMap<String, MetadataEntry>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.collect_seq(map.values())
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<BTreeMap<String, MetadataEntry>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let entries = Vec::<MetadataEntry>::deserialize(deserializer)?;
        Ok(entries
            .into_iter()
            .map(|entry| (entry.name().to_string(), entry))
            .collect())
    }
}
