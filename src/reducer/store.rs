use flume::{Receiver, Sender};

use super::{Context, Effect, Reducer};

/// Queue entries, effect output is told apart so the store knows when
/// every spawned effect has reported back.
enum Queued<A> {
    Action(A),
    EffectOutput(A),
}

/// Hands actions to a [`Store`] from anywhere, e.g. the view layer.
pub struct ActionSender<A> {
    sender: Sender<Queued<A>>,
}

impl<A> Clone for ActionSender<A> {
    fn clone(&self) -> Self {
        Self {
            sender: self.sender.clone(),
        }
    }
}

impl<A> ActionSender<A> {
    /// Queue an action. Returns `false` if the store is gone.
    pub fn send(&self, action: A) -> bool {
        self.sender.send(Queued::Action(action)).is_ok()
    }
}

/// Owns the state of a reducer tree and serializes every action through it.
///
/// Future effects are spawned on the tokio runtime and re-enter the queue in
/// whatever order they complete. Only one action is ever reduced at a time.
pub struct Store<R: Reducer> {
    state: R::State,
    environment: R::Environment,
    sender: Sender<Queued<R::Action>>,
    receiver: Receiver<Queued<R::Action>>,
    in_flight: usize,
    subscribers: Vec<Sender<R::State>>,
}

impl<R> Store<R>
where
    R: Reducer,
    R::State: Clone,
{
    pub fn new(state: R::State, environment: R::Environment) -> Self {
        let (sender, receiver) = flume::unbounded();
        if let Some(action) = R::initial_action() {
            // we hold the receiver, this can't fail
            let _ = sender.send(Queued::Action(action));
        }
        Self {
            state,
            environment,
            sender,
            receiver,
            in_flight: 0,
            subscribers: Vec::new(),
        }
    }

    pub fn state(&self) -> &R::State {
        &self.state
    }

    pub fn environment(&self) -> &R::Environment {
        &self.environment
    }

    pub fn sender(&self) -> ActionSender<R::Action> {
        ActionSender {
            sender: self.sender.clone(),
        }
    }

    pub fn send(&self, action: R::Action) {
        let _ = self.sender.send(Queued::Action(action));
    }

    /// Receive a snapshot of the state after every processed action
    pub fn subscribe(&mut self) -> Receiver<R::State> {
        let (sender, receiver) = flume::unbounded();
        self.subscribers.push(sender);
        receiver
    }

    /// Number of spawned effects that have not reported back yet
    pub fn in_flight(&self) -> usize {
        self.in_flight
    }

    /// Wait for the next queued action and reduce it.
    pub async fn process_next(&mut self) -> bool {
        match self.receiver.recv_async().await {
            Ok(queued) => {
                self.dispatch(queued);
                true
            }
            Err(_) => false,
        }
    }

    /// Process actions until the queue is empty and no effect is in flight.
    pub async fn settle(&mut self) {
        loop {
            if let Ok(queued) = self.receiver.try_recv() {
                self.dispatch(queued);
                continue;
            }
            if self.in_flight == 0 {
                break;
            }
            if !self.process_next().await {
                break;
            }
        }
    }

    pub async fn run(mut self) {
        while self.process_next().await {}
    }

    fn dispatch(&mut self, queued: Queued<R::Action>) {
        let action = match queued {
            Queued::Action(action) => action,
            Queued::EffectOutput(action) => {
                self.in_flight -= 1;
                action
            }
        };
        self.handle(action);
    }

    fn handle(&mut self, action: R::Action) {
        let context = Context::default();
        let effect = R::reduce(&context, action, &mut self.state, &self.environment);
        let delegated = context.into_delegated().len();
        if delegated > 0 {
            log::trace!("store root discarded {delegated} delegate message(s)");
        }
        self.execute(effect);
        self.publish();
    }

    fn execute(&mut self, effect: Effect<R::Action>) {
        let (actions, futures) = effect.into_parts();
        for action in actions {
            let _ = self.sender.send(Queued::Action(action));
        }
        for future in futures {
            let sender = self.sender.clone();
            self.in_flight += 1;
            tokio::spawn(async move {
                let action = future.await;
                if sender.send_async(Queued::EffectOutput(action)).await.is_err() {
                    log::debug!("store dropped before an effect finished");
                }
            });
        }
    }

    fn publish(&mut self) {
        if self.subscribers.is_empty() {
            return;
        }
        let snapshot = self.state.clone();
        self.subscribers
            .retain(|subscriber| subscriber.send(snapshot.clone()).is_ok());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reducer::MessageContext;

    struct CounterReducer;

    #[derive(Clone, Debug, PartialEq, Eq)]
    enum CounterAction {
        Start,
        Increment,
        IncrementLater,
    }

    impl Reducer for CounterReducer {
        type DelegateMessage = ();
        type Action = CounterAction;
        type State = u32;
        type Environment = ();

        fn reduce(
            _context: &impl MessageContext<Self::DelegateMessage>,
            action: Self::Action,
            state: &mut Self::State,
            _environment: &Self::Environment,
        ) -> Effect<Self::Action> {
            match action {
                CounterAction::Start => Effect::action(CounterAction::IncrementLater),
                CounterAction::Increment => {
                    *state += 1;
                    Effect::NONE
                }
                CounterAction::IncrementLater => {
                    Effect::future(async {}, |_| CounterAction::Increment)
                }
            }
        }

        fn initial_action() -> Option<Self::Action> {
            Some(CounterAction::Start)
        }
    }

    #[tokio::test]
    async fn initial_action_and_effects_re_enter() {
        let mut store = Store::<CounterReducer>::new(0, ());
        store.settle().await;
        assert_eq!(*store.state(), 1);
        assert_eq!(store.in_flight(), 0);
    }

    #[tokio::test]
    async fn senders_feed_the_same_queue() {
        let mut store = Store::<CounterReducer>::new(0, ());
        let sender = store.sender();
        assert!(sender.send(CounterAction::Increment));
        store.send(CounterAction::IncrementLater);
        store.settle().await;
        assert_eq!(*store.state(), 3);
    }

    #[tokio::test]
    async fn subscribers_see_every_snapshot() {
        let mut store = Store::<CounterReducer>::new(0, ());
        let snapshots = store.subscribe();
        store.settle().await;
        let seen: Vec<u32> = snapshots.try_iter().collect();
        // Start, IncrementLater, Increment
        assert_eq!(seen, vec![0, 0, 1]);
    }
}
