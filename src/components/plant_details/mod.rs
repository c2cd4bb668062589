mod reducer;
mod view;

pub use reducer::{reduce, PlantDetailsAction, PlantDetailsDelegate, State};
pub use view::render;

pub struct PlantDetailsReducer;
use crate::reducer::{Effect, MessageContext, Reducer};

impl Reducer for PlantDetailsReducer {
    type DelegateMessage = reducer::PlantDetailsDelegate;

    type Action = reducer::PlantDetailsAction;

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
