mod reducer;
mod view;

pub use reducer::{reduce, PlantsAction, State};
pub use view::render;

pub struct PlantsReducer;
use crate::components::plant_details::{self, PlantDetailsDelegate, PlantDetailsReducer};
use crate::reducer::{ChildReducer, Effect, MessageContext, Reducer};

impl Reducer for PlantsReducer {
    type DelegateMessage = ();

    type Action = reducer::PlantsAction;

    type State = reducer::State;

    type Environment = crate::environment::Environment;

    fn reduce(
        context: &impl MessageContext<Self::DelegateMessage>,
        action: Self::Action,
        state: &mut Self::State,
        environment: &Self::Environment,
    ) -> Effect<Self::Action> {
        reducer::reduce(context, action, state, environment)
    }
}

/// The detail form works on the draft and the sheet flag of the list.
impl ChildReducer<PlantsReducer> for PlantDetailsReducer {
    fn lift(action: <Self as Reducer>::Action) -> PlantsAction {
        PlantsAction::Details(action)
    }

    fn from_child(message: <Self as Reducer>::DelegateMessage) -> Option<PlantsAction> {
        match message {
            PlantDetailsDelegate::Created(plant) => Some(PlantsAction::PlantCreated(plant)),
        }
    }

    fn child_state(parent: &State) -> plant_details::State {
        plant_details::State {
            draft: parent.draft.clone(),
            is_presented: parent.is_detail_presented,
        }
    }

    fn apply_child_state(parent: &mut State, child: plant_details::State) {
        parent.draft = child.draft;
        parent.is_detail_presented = child.is_presented;
    }
}
