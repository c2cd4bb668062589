//! Minimal unidirectional state runtime.
//!
//! A [`Reducer`] turns `(state, action, environment)` into a new state plus an
//! [`Effect`]. Effects run outside of the reducer and come back as actions
//! through the single queue owned by a [`Store`]. Reducers nest through
//! [`ChildReducer`], which describes how a child's state is projected out of
//! its parent's and written back.

mod effect;
mod store;

use std::cell::RefCell;

pub use effect::Effect;
pub use store::{ActionSender, Store};

/// What a reducer may do besides changing state: talk to its parent.
pub trait MessageContext<Delegate> {
    fn send_parent(&self, message: Delegate);
}

pub trait Reducer {
    /// Messages this reducer sends up to whoever embeds it
    type DelegateMessage;

    type Action: Send + 'static;

    type State;

    type Environment;

    fn reduce(
        context: &impl MessageContext<Self::DelegateMessage>,
        action: Self::Action,
        state: &mut Self::State,
        environment: &Self::Environment,
    ) -> Effect<Self::Action>;

    fn initial_action() -> Option<Self::Action> {
        None
    }
}

/// A reducer that runs over a slice of `Parent`'s state and action space.
pub trait ChildReducer<Parent: Reducer>: Reducer<Environment = Parent::Environment> {
    /// Embed one of our actions into the parent's action space
    fn lift(action: Self::Action) -> Parent::Action;

    /// The parent's reaction to one of our delegate messages, if any
    fn from_child(message: Self::DelegateMessage) -> Option<Parent::Action>;

    fn child_state(parent: &Parent::State) -> Self::State;

    fn apply_child_state(parent: &mut Parent::State, child: Self::State);
}

/// Collects the delegate messages a reducer sends while it runs.
pub struct Context<Delegate> {
    delegated: RefCell<Vec<Delegate>>,
}

impl<Delegate> Default for Context<Delegate> {
    fn default() -> Self {
        Self {
            delegated: RefCell::new(Vec::new()),
        }
    }
}

impl<Delegate> Context<Delegate> {
    pub fn into_delegated(self) -> Vec<Delegate> {
        self.delegated.into_inner()
    }
}

impl<Delegate> MessageContext<Delegate> for Context<Delegate> {
    fn send_parent(&self, message: Delegate) {
        self.delegated.borrow_mut().push(message);
    }
}

/// Run `Child` for one of its actions on behalf of `Parent`.
///
/// The child's state is projected out of `state`, reduced, and written back
/// before anything else happens. The returned effect holds the child's own
/// effect first, lifted into the parent's action space, followed by the
/// parent's reactions to whatever the child delegated.
pub fn reduce_child<Parent, Child>(
    action: Child::Action,
    state: &mut Parent::State,
    environment: &Parent::Environment,
) -> Effect<Parent::Action>
where
    Parent: Reducer + 'static,
    Child: ChildReducer<Parent> + 'static,
{
    let context = Context::default();
    let mut child_state = Child::child_state(state);
    let effect = Child::reduce(&context, action, &mut child_state, environment);
    Child::apply_child_state(state, child_state);

    context
        .into_delegated()
        .into_iter()
        .filter_map(Child::from_child)
        .fold(effect.map(Child::lift), |effect, reaction| {
            effect.merge(Effect::action(reaction))
        })
}
