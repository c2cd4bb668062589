pub mod cloudkit;
pub mod gateway;
pub mod mock;
pub mod model;
pub mod record;
pub mod repository;
pub mod types;

use std::sync::Arc;

pub use cloudkit::CloudKitGateway;
pub use gateway::{CreateError, FetchError, PlantGateway};
pub use mock::MockGateway;

/// Everything the reducers reach outside of their state for.
#[derive(Clone)]
pub struct Environment {
    pub gateway: Arc<dyn PlantGateway>,
}

impl std::fmt::Debug for Environment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Environment").finish()
    }
}

impl Environment {
    pub fn new(gateway: impl PlantGateway + 'static) -> Self {
        Self::with_gateway(Arc::new(gateway))
    }

    pub fn with_gateway(gateway: Arc<dyn PlantGateway>) -> Self {
        Self { gateway }
    }
}
