use im::Vector;

use crate::components::plant_details::{PlantDetailsAction, PlantDetailsReducer};
use crate::environment::model::{Draft, Plant, PlantId};
use crate::environment::{Environment, FetchError};
use crate::reducer::{reduce_child, Effect, MessageContext};

#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct State {
    /// In the order the store returned them
    pub plants: Vector<Plant>,
    pub selection: Option<PlantId>,
    pub is_detail_presented: bool,
    /// Backs the detail form while it is open
    pub draft: Draft,
}

impl State {
    pub fn new(plants: impl IntoIterator<Item = Plant>) -> Self {
        Self {
            plants: plants.into_iter().collect(),
            ..Self::default()
        }
    }

    pub fn selected_plant(&self) -> Option<&Plant> {
        let id = self.selection?;
        self.plants.iter().find(|plant| plant.id == id)
    }
}

#[derive(Clone, Debug, Eq, PartialEq)]
pub enum PlantsAction {
    AddPlant,
    /// Open the form for the selected plant
    EditSelection,
    DetailDismissed,
    FetchPlants,
    FetchPlantsResponse(Result<Vec<Plant>, FetchError>),
    SetSelection(Option<PlantId>),
    Details(PlantDetailsAction),
    /// The form saved a plant
    PlantCreated(Plant),
}

pub fn reduce(
    _context: &impl MessageContext<()>,
    action: PlantsAction,
    state: &mut State,
    environment: &Environment,
) -> Effect<PlantsAction> {
    log::trace!("{action:?}");
    match action {
        // the form is filled in the same step it opens, before anything
        // queued behind it can edit the draft
        PlantsAction::AddPlant => {
            state.is_detail_presented = true;
            return reduce_child::<super::PlantsReducer, PlantDetailsReducer>(
                PlantDetailsAction::Start,
                state,
                environment,
            );
        }
        PlantsAction::EditSelection => {
            let Some(plant) = state.selected_plant().cloned() else {
                return Effect::NONE;
            };
            state.is_detail_presented = true;
            return reduce_child::<super::PlantsReducer, PlantDetailsReducer>(
                PlantDetailsAction::Load(plant),
                state,
                environment,
            );
        }
        PlantsAction::DetailDismissed => {
            state.is_detail_presented = false;
            state.draft = Draft::default();
        }
        PlantsAction::FetchPlants => {
            let gateway = environment.gateway.clone();
            return Effect::future(
                async move { gateway.list_plants().await },
                PlantsAction::FetchPlantsResponse,
            );
        }
        PlantsAction::FetchPlantsResponse(result) => match result {
            Ok(plants) => {
                state.plants = plants.into_iter().collect();
                if state.selection.is_some() && state.selected_plant().is_none() {
                    log::debug!("Selected plant is gone after refresh");
                    state.selection = None;
                }
            }
            Err(e) => log::error!("{e}"),
        },
        PlantsAction::SetSelection(selection) => state.selection = selection,
        PlantsAction::Details(action) => {
            return reduce_child::<super::PlantsReducer, PlantDetailsReducer>(
                action,
                state,
                environment,
            );
        }
        PlantsAction::PlantCreated(plant) => {
            log::debug!("Created plant {}, refreshing", plant.id);
            return Effect::action(PlantsAction::FetchPlants);
        }
    }
    Effect::NONE
}
