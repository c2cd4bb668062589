use async_trait::async_trait;
use thiserror::Error;

use super::model::Plant;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FetchError {
    #[error("Could not fetch plants: {0}")]
    Unknown(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CreateError {
    /// The store accepted the save but what it sent back is not a plant
    #[error("The saved plant record could not be decoded")]
    DecodingError,
    #[error("Could not save plant: {0}")]
    Unknown(String),
}

/// The two things the app needs from the remote record store. Every call is
/// a single attempt.
#[async_trait]
pub trait PlantGateway: Send + Sync {
    /// All plant records, in the order the store returns them. Records that
    /// don't decode are left out.
    async fn list_plants(&self) -> Result<Vec<Plant>, FetchError>;

    /// Save `plant` under its id and return the plant decoded from the
    /// record the store sent back.
    async fn create_plant(&self, plant: Plant) -> Result<Plant, CreateError>;
}
