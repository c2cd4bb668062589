use crate::environment::model::{Draft, Plant};
use crate::environment::{CreateError, Environment};
use crate::reducer::{Effect, MessageContext};

#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct State {
    pub draft: Draft,
    pub is_presented: bool,
}

#[derive(Clone, Debug, Eq, PartialEq)]
pub enum PlantDetailsAction {
    /// Begin a new plant from scratch
    Start,
    /// Begin editing an existing plant
    Load(Plant),
    NameChanged(String),
    SpeciesChanged(String),
    Create,
    CreatePlantResponse(Result<Plant, CreateError>),
}

#[derive(Clone, Debug, Eq, PartialEq)]
pub enum PlantDetailsDelegate {
    Created(Plant),
}

pub fn reduce(
    context: &impl MessageContext<PlantDetailsDelegate>,
    action: PlantDetailsAction,
    state: &mut State,
    environment: &Environment,
) -> Effect<PlantDetailsAction> {
    log::trace!("{action:?}");
    match action {
        PlantDetailsAction::Start => {
            state.draft = Draft::default();
        }
        PlantDetailsAction::Load(plant) => {
            state.draft = Draft::from(plant);
        }
        PlantDetailsAction::NameChanged(name) => state.draft.set_name(name),
        PlantDetailsAction::SpeciesChanged(species) => state.draft.set_species(species),
        PlantDetailsAction::Create => {
            let Some(plant) = state.draft.to_plant() else {
                log::warn!("Not saving a plant without a name");
                return Effect::NONE;
            };
            let gateway = environment.gateway.clone();
            return Effect::future(
                async move { gateway.create_plant(plant).await },
                PlantDetailsAction::CreatePlantResponse,
            );
        }
        PlantDetailsAction::CreatePlantResponse(result) => match result {
            Ok(plant) => {
                state.is_presented = false;
                state.draft = Draft::default();
                context.send_parent(PlantDetailsDelegate::Created(plant));
            }
            // the form stays open with what was typed so it can be resent
            Err(e) => log::error!("{e}"),
        },
    }
    Effect::NONE
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use proptest::prelude::*;

    use super::*;
    use crate::environment::model::PlantId;
    use crate::environment::MockGateway;
    use crate::reducer::Context;

    fn environment(gateway: &Arc<MockGateway>) -> Environment {
        Environment::with_gateway(gateway.clone())
    }

    fn presented(name: &str) -> State {
        State {
            draft: Draft {
                id: PlantId::new(),
                name: name.to_string(),
                species: None,
            },
            is_presented: true,
        }
    }

    fn field_edit() -> impl Strategy<Value = PlantDetailsAction> {
        prop_oneof![
            "[a-z ]{0,12}".prop_map(PlantDetailsAction::NameChanged),
            "[a-z ]{0,12}".prop_map(PlantDetailsAction::SpeciesChanged),
        ]
    }

    proptest! {
        #[test]
        fn draft_keeps_the_last_value_of_each_field(edits in proptest::collection::vec(field_edit(), 0..20)) {
            let env = environment(&Arc::new(MockGateway::default()));
            let mut state = presented("");
            let mut name = String::new();
            let mut species = None;
            for edit in edits.iter().cloned() {
                match &edit {
                    PlantDetailsAction::NameChanged(n) => name = n.clone(),
                    PlantDetailsAction::SpeciesChanged(s) => species = (!s.is_empty()).then(|| s.clone()),
                    _ => unreachable!(),
                }
                let effect = reduce(&Context::default(), edit, &mut state, &env);
                prop_assert!(effect.is_none());
            }
            prop_assert_eq!(&state.draft.name, &name);
            prop_assert_eq!(&state.draft.species, &species);

            // the names alone, then the species alone, land in the same place
            let mut reordered = presented("");
            reordered.draft.id = state.draft.id;
            let (names, others): (Vec<_>, Vec<_>) = edits
                .into_iter()
                .partition(|e| matches!(e, PlantDetailsAction::NameChanged(_)));
            for edit in others.into_iter().chain(names) {
                reduce(&Context::default(), edit, &mut reordered, &env);
            }
            prop_assert_eq!(reordered, state);
        }
    }

    #[test]
    fn start_always_gives_a_fresh_draft() {
        let env = environment(&Arc::new(MockGateway::default()));
        let mut state = presented("Fern");
        state.draft.species = Some("Polypodiopsida".to_string());
        let old_id = state.draft.id;

        let effect = reduce(&Context::default(), PlantDetailsAction::Start, &mut state, &env);

        assert!(effect.is_none());
        assert_ne!(state.draft.id, old_id);
        assert!(state.draft.name.is_empty());
        assert_eq!(state.draft.species, None);
        assert!(state.is_presented);
    }

    #[test]
    fn load_copies_the_plant_into_the_draft() {
        let env = environment(&Arc::new(MockGateway::default()));
        let mut state = State::default();
        let plant = Plant::new(PlantId::new(), "Fern", Some("Nephrolepis".to_string()));

        reduce(
            &Context::default(),
            PlantDetailsAction::Load(plant.clone()),
            &mut state,
            &env,
        );

        assert_eq!(state.draft.to_plant(), Some(plant));
    }

    #[tokio::test]
    async fn create_saves_the_draft() {
        let gateway = Arc::new(MockGateway::default());
        let env = environment(&gateway);
        let mut state = presented("Ivy");
        let before = state.clone();
        let expected = state.draft.to_plant().unwrap();
        let context = Context::default();

        let effect = reduce(&context, PlantDetailsAction::Create, &mut state, &env);

        assert_eq!(state, before);
        assert_eq!(effect.pending_futures(), 1);
        assert_eq!(
            effect.resolve().await,
            vec![PlantDetailsAction::CreatePlantResponse(Ok(expected.clone()))]
        );
        assert_eq!(gateway.created(), vec![expected]);
        assert!(context.into_delegated().is_empty());
    }

    #[test]
    fn create_without_a_name_does_nothing() {
        let gateway = Arc::new(MockGateway::default());
        let env = environment(&gateway);
        let mut state = presented("  ");

        let effect = reduce(&Context::default(), PlantDetailsAction::Create, &mut state, &env);

        assert!(effect.is_none());
        assert_eq!(gateway.create_calls(), 0);
    }

    #[test]
    fn success_closes_and_resets_then_tells_the_parent() {
        let env = environment(&Arc::new(MockGateway::default()));
        let mut state = presented("Ivy");
        let plant = state.draft.to_plant().unwrap();
        let context = Context::default();

        let effect = reduce(
            &context,
            PlantDetailsAction::CreatePlantResponse(Ok(plant.clone())),
            &mut state,
            &env,
        );

        assert!(effect.is_none());
        assert!(!state.is_presented);
        assert_ne!(state.draft.id, plant.id);
        assert!(state.draft.name.is_empty());
        assert_eq!(
            context.into_delegated(),
            vec![PlantDetailsDelegate::Created(plant)]
        );
    }

    #[test]
    fn failure_keeps_the_form_as_it_was() {
        let env = environment(&Arc::new(MockGateway::default()));
        let mut state = presented("Ivy");
        state.draft.species = Some("Hedera".to_string());
        let before = state.clone();
        let context = Context::default();

        for error in [
            CreateError::Unknown("offline".to_string()),
            CreateError::DecodingError,
        ] {
            let effect = reduce(
                &context,
                PlantDetailsAction::CreatePlantResponse(Err(error)),
                &mut state,
                &env,
            );
            assert!(effect.is_none());
        }

        assert_eq!(state, before);
        assert!(context.into_delegated().is_empty());
    }
}
