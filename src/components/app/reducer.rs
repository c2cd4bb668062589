use crate::components::plants::{self, PlantsAction, PlantsReducer};
use crate::environment::Environment;
use crate::reducer::{reduce_child, Effect, MessageContext};

#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct AppState {
    pub plants: plants::State,
}

#[derive(Clone, Debug, Eq, PartialEq)]
pub enum AppAction {
    Launched,
    Plants(PlantsAction),
}

pub fn reduce(
    _context: &impl MessageContext<()>,
    action: AppAction,
    state: &mut AppState,
    environment: &Environment,
) -> Effect<AppAction> {
    log::trace!("{action:?}");
    match action {
        AppAction::Launched => Effect::action(AppAction::Plants(PlantsAction::FetchPlants)),
        AppAction::Plants(action) => {
            reduce_child::<super::AppReducer, PlantsReducer>(action, state, environment)
        }
    }
}
