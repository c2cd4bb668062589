use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Mutex, MutexGuard, PoisonError};

use async_trait::async_trait;

use super::gateway::{CreateError, FetchError, PlantGateway};
use super::model::Plant;

/// A gateway that never touches the network.
///
/// By default it lists the fixture plants and echoes every created plant
/// back. Use [`MockGateway::in_memory`] to have created plants show up in
/// later listings.
#[derive(Debug)]
pub struct MockGateway {
    list_response: Mutex<Result<Vec<Plant>, FetchError>>,
    create_failure: Mutex<Option<CreateError>>,
    keeps_created: bool,
    created: Mutex<Vec<Plant>>,
    list_calls: AtomicUsize,
    create_calls: AtomicUsize,
}

impl Default for MockGateway {
    fn default() -> Self {
        Self::with_plants(Plant::mock_list())
    }
}

impl MockGateway {
    pub fn with_plants(plants: Vec<Plant>) -> Self {
        Self {
            list_response: Mutex::new(Ok(plants)),
            create_failure: Mutex::new(None),
            keeps_created: false,
            created: Mutex::default(),
            list_calls: AtomicUsize::new(0),
            create_calls: AtomicUsize::new(0),
        }
    }

    pub fn in_memory() -> Self {
        Self {
            keeps_created: true,
            ..Self::default()
        }
    }

    pub fn set_plants(&self, plants: Vec<Plant>) {
        *lock(&self.list_response) = Ok(plants);
    }

    pub fn fail_fetch(&self, error: FetchError) {
        *lock(&self.list_response) = Err(error);
    }

    pub fn fail_create(&self, error: CreateError) {
        *lock(&self.create_failure) = Some(error);
    }

    pub fn list_calls(&self) -> usize {
        self.list_calls.load(Ordering::SeqCst)
    }

    pub fn create_calls(&self) -> usize {
        self.create_calls.load(Ordering::SeqCst)
    }

    /// Every plant that was saved successfully
    pub fn created(&self) -> Vec<Plant> {
        lock(&self.created).clone()
    }
}

#[async_trait]
impl PlantGateway for MockGateway {
    async fn list_plants(&self) -> Result<Vec<Plant>, FetchError> {
        self.list_calls.fetch_add(1, Ordering::SeqCst);
        let mut plants = lock(&self.list_response).clone()?;
        if self.keeps_created {
            for plant in lock(&self.created).iter() {
                match plants.iter_mut().find(|p| p.is_same_entity(plant)) {
                    Some(existing) => *existing = plant.clone(),
                    None => plants.push(plant.clone()),
                }
            }
        }
        Ok(plants)
    }

    async fn create_plant(&self, plant: Plant) -> Result<Plant, CreateError> {
        self.create_calls.fetch_add(1, Ordering::SeqCst);
        if let Some(error) = lock(&self.create_failure).clone() {
            return Err(error);
        }
        lock(&self.created).push(plant.clone());
        Ok(plant)
    }
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}
