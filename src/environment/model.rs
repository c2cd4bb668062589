use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Identity of a plant, also the record name in the remote store.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PlantId(pub Uuid);

impl PlantId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for PlantId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for PlantId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for PlantId {
    type Err = uuid::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Uuid::parse_str(s).map(PlantId)
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Plant {
    pub id: PlantId,
    pub name: String,
    pub species: Option<String>,
}

impl Plant {
    pub fn new(id: PlantId, name: impl Into<String>, species: Option<String>) -> Self {
        Self {
            id,
            name: name.into(),
            species,
        }
    }

    /// Two plants are the same entity when their ids match, whatever
    /// their names say.
    pub fn is_same_entity(&self, other: &Plant) -> bool {
        self.id == other.id
    }

    pub fn mock_list() -> Vec<Plant> {
        ["Monstera Adansonii #1", "Sansevieria #1", "Monstera Adansonii #2"]
            .into_iter()
            .map(|name| Plant::new(PlantId::new(), name, None))
            .collect()
    }
}

/// A plant that is being typed in and has not been saved yet.
///
/// The id is picked when the draft is started so that a resubmission after
/// a failure saves under the same record name.
#[derive(Clone, Debug, PartialEq, Eq, Default)]
pub struct Draft {
    pub id: PlantId,
    pub name: String,
    pub species: Option<String>,
}

impl Draft {
    pub fn set_name(&mut self, name: String) {
        self.name = name;
    }

    /// An empty text clears the species
    pub fn set_species(&mut self, species: String) {
        self.species = (!species.is_empty()).then_some(species);
    }

    /// `None` while the name is blank
    pub fn to_plant(&self) -> Option<Plant> {
        if self.name.trim().is_empty() {
            return None;
        }
        Some(Plant::new(self.id, self.name.clone(), self.species.clone()))
    }
}

impl From<Plant> for Draft {
    fn from(plant: Plant) -> Self {
        Self {
            id: plant.id,
            name: plant.name,
            species: plant.species,
        }
    }
}
