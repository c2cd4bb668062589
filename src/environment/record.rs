//! Plant records in the shape CloudKit Web Services uses on the wire.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

use super::model::{Plant, PlantId};

pub const PLANT_RECORD_TYPE: &str = "Plant";

const NAME_FIELD: &str = "name";
const SPECIES_FIELD: &str = "species";
const STRING_TYPE: &str = "STRING";

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Record {
    pub record_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub record_type: Option<String>,
    #[serde(default)]
    pub fields: BTreeMap<String, Field>,
    /// Set instead of the fields when the store rejected this record
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub server_error_code: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Field {
    pub value: Value,
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
}

impl Field {
    fn string(value: &str) -> Self {
        Self {
            value: Value::String(value.to_string()),
            kind: Some(STRING_TYPE.to_string()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RecordError {
    #[error("record type {0:?} is not a plant")]
    WrongType(Option<String>),
    #[error("record name {0:?} is not a plant id")]
    InvalidIdentifier(String),
    #[error("record {0} has no name")]
    MissingName(String),
}

impl Record {
    pub fn error_message(&self) -> Option<String> {
        let code = self.server_error_code.as_ref()?;
        Some(match &self.reason {
            Some(reason) => format!("{code}: {reason}"),
            None => code.clone(),
        })
    }

    fn string_field(&self, key: &str) -> Option<&str> {
        self.fields.get(key)?.value.as_str()
    }
}

impl From<&Plant> for Record {
    fn from(plant: &Plant) -> Self {
        let mut fields = BTreeMap::new();
        fields.insert(NAME_FIELD.to_string(), Field::string(&plant.name));
        if let Some(species) = &plant.species {
            fields.insert(SPECIES_FIELD.to_string(), Field::string(species));
        }
        Self {
            record_name: plant.id.to_string(),
            record_type: Some(PLANT_RECORD_TYPE.to_string()),
            fields,
            server_error_code: None,
            reason: None,
        }
    }
}

impl TryFrom<&Record> for Plant {
    type Error = RecordError;

    fn try_from(record: &Record) -> Result<Self, Self::Error> {
        if record.record_type.as_deref() != Some(PLANT_RECORD_TYPE) {
            return Err(RecordError::WrongType(record.record_type.clone()));
        }
        let id = record
            .record_name
            .parse::<PlantId>()
            .map_err(|_| RecordError::InvalidIdentifier(record.record_name.clone()))?;
        let name = record
            .string_field(NAME_FIELD)
            .filter(|name| !name.is_empty())
            .ok_or_else(|| RecordError::MissingName(record.record_name.clone()))?;
        let species = record.string_field(SPECIES_FIELD).map(str::to_string);
        Ok(Plant::new(id, name, species))
    }
}

/// Decode every record that is a valid plant and skip the rest.
pub fn decode_plants(records: &[Record]) -> Vec<Plant> {
    records
        .iter()
        .filter_map(|record| match Plant::try_from(record) {
            Ok(plant) => Some(plant),
            Err(e) => {
                log::warn!("Skipping plant record: {e}");
                None
            }
        })
        .collect()
}
