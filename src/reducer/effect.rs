use std::future::Future;

use futures_util::future::BoxFuture;
use futures_util::FutureExt;

/// Work a reducer asks the runtime to perform once it returns. Whatever the
/// work produces re-enters the reducer as a new action.
pub enum Effect<A> {
    None,
    Action(A),
    Future(BoxFuture<'static, A>),
    Multiple(Vec<Effect<A>>),
}

impl<A> Effect<A> {
    pub const NONE: Self = Effect::None;

    pub fn is_none(&self) -> bool {
        match self {
            Effect::None => true,
            Effect::Multiple(effects) => effects.iter().all(Effect::is_none),
            _ => false,
        }
    }

    /// The actions that will be queued immediately, in order
    pub fn actions(&self) -> Vec<&A> {
        match self {
            Effect::None | Effect::Future(_) => Vec::new(),
            Effect::Action(action) => vec![action],
            Effect::Multiple(effects) => effects.iter().flat_map(Effect::actions).collect(),
        }
    }

    /// Number of futures that will be spawned
    pub fn pending_futures(&self) -> usize {
        match self {
            Effect::None | Effect::Action(_) => 0,
            Effect::Future(_) => 1,
            Effect::Multiple(effects) => effects.iter().map(Effect::pending_futures).sum(),
        }
    }

    pub fn merge(self, other: Effect<A>) -> Self {
        match (self, other) {
            (Effect::None, effect) | (effect, Effect::None) => effect,
            (Effect::Multiple(mut left), Effect::Multiple(right)) => {
                left.extend(right);
                Effect::Multiple(left)
            }
            (Effect::Multiple(mut left), effect) => {
                left.push(effect);
                Effect::Multiple(left)
            }
            (effect, Effect::Multiple(mut right)) => {
                right.insert(0, effect);
                Effect::Multiple(right)
            }
            (left, right) => Effect::Multiple(vec![left, right]),
        }
    }

    /// Split into the actions to queue right away and the futures to spawn.
    pub(crate) fn into_parts(self) -> (Vec<A>, Vec<BoxFuture<'static, A>>) {
        let mut actions = Vec::new();
        let mut futures = Vec::new();
        self.collect_parts(&mut actions, &mut futures);
        (actions, futures)
    }

    fn collect_parts(self, actions: &mut Vec<A>, futures: &mut Vec<BoxFuture<'static, A>>) {
        match self {
            Effect::None => (),
            Effect::Action(action) => actions.push(action),
            Effect::Future(future) => futures.push(future),
            Effect::Multiple(effects) => {
                for effect in effects {
                    effect.collect_parts(actions, futures);
                }
            }
        }
    }
}

impl<A: Send + 'static> Effect<A> {
    pub fn action(action: A) -> Self {
        Effect::Action(action)
    }

    /// Run `future` outside of the reducer and feed its output, converted
    /// through `mapper`, back in as an action.
    pub fn future<T, F, M>(future: F, mapper: M) -> Self
    where
        T: Send + 'static,
        F: Future<Output = T> + Send + 'static,
        M: FnOnce(T) -> A + Send + 'static,
    {
        Effect::Future(Box::pin(async move { mapper(future.await) }))
    }

    /// Convert the actions this effect produces, used when a child reducer's
    /// effect is handed up to its parent.
    pub fn map<B, F>(self, f: F) -> Effect<B>
    where
        B: Send + 'static,
        F: Fn(A) -> B + Clone + Send + 'static,
    {
        match self {
            Effect::None => Effect::None,
            Effect::Action(action) => Effect::Action(f(action)),
            Effect::Future(future) => Effect::Future(future.map(f).boxed()),
            Effect::Multiple(effects) => Effect::Multiple(
                effects
                    .into_iter()
                    .map(|effect| effect.map(f.clone()))
                    .collect(),
            ),
        }
    }

    /// Resolve everything in place: immediate actions first, then every
    /// future awaited one after the other. Lets reducer tests look at what
    /// an effect would feed back without a running store.
    pub async fn resolve(self) -> Vec<A> {
        let (mut actions, futures) = self.into_parts();
        for future in futures {
            actions.push(future.await);
        }
        actions
    }
}

impl<A: std::fmt::Debug> std::fmt::Debug for Effect<A> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::None => write!(f, "None"),
            Self::Action(arg0) => f.debug_tuple("Action").field(arg0).finish(),
            Self::Future(_) => write!(f, "Future"),
            Self::Multiple(arg0) => f.debug_tuple("Multiple").field(arg0).finish(),
        }
    }
}
