mod reducer;
mod view;

pub use reducer::{reduce, AppAction, AppState};
pub use view::render;

pub struct AppReducer;
use crate::components::plants::{self, PlantsAction, PlantsReducer};
use crate::reducer::{ChildReducer, Effect, MessageContext, Reducer};

impl Reducer for AppReducer {
    type DelegateMessage = ();

    type Action = reducer::AppAction;

    type State = reducer::AppState;

    type Environment = crate::environment::Environment;

    fn reduce(
        context: &impl MessageContext<Self::DelegateMessage>,
        action: Self::Action,
        state: &mut Self::State,
        environment: &Self::Environment,
    ) -> Effect<Self::Action> {
        reducer::reduce(context, action, state, environment)
    }

    fn initial_action() -> Option<Self::Action> {
        Some(AppAction::Launched)
    }
}

impl ChildReducer<AppReducer> for PlantsReducer {
    fn lift(action: PlantsAction) -> AppAction {
        AppAction::Plants(action)
    }

    fn from_child(_message: ()) -> Option<AppAction> {
        None
    }

    fn child_state(parent: &AppState) -> plants::State {
        parent.plants.clone()
    }

    fn apply_child_state(parent: &mut AppState, child: plants::State) {
        parent.plants = child;
    }
}
