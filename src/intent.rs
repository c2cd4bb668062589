//! Turns typed lines into the actions a view would send.

use std::str::FromStr;

use thiserror::Error;

use crate::components::app::{AppAction, AppState};
use crate::components::plant_details::PlantDetailsAction;
use crate::components::plants::PlantsAction;
use crate::environment::model::PlantId;

pub const HELP: &str = "\
add               open the add-plant form
name <text>       set the name of the plant in the form
species [<text>]  set or clear its species
create            save the plant in the form
dismiss           close the form
fetch             reload the plants
select [<n|id>]   select a plant by position or id, or clear the selection
edit              open the form for the selected plant
help              show this
quit              leave";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Target {
    Position(usize),
    Id(PlantId),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Intent {
    AddPlant,
    NameChanged(String),
    SpeciesChanged(String),
    Create,
    DetailDismissed,
    FetchPlants,
    Select(Option<Target>),
    Edit,
    Help,
    Quit,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum IntentError {
    #[error("Unknown command {0:?}, try `help`")]
    Unknown(String),
    #[error("`{0}` needs some text")]
    MissingText(&'static str),
    #[error("{0:?} is neither a position nor a plant id")]
    InvalidTarget(String),
}

impl FromStr for Intent {
    type Err = IntentError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let line = s.trim();
        let (command, rest) = match line.split_once(char::is_whitespace) {
            Some((command, rest)) => (command, rest.trim()),
            None => (line, ""),
        };
        Ok(match command {
            "add" => Intent::AddPlant,
            "name" if rest.is_empty() => return Err(IntentError::MissingText("name")),
            "name" => Intent::NameChanged(rest.to_string()),
            "species" => Intent::SpeciesChanged(rest.to_string()),
            "create" | "done" => Intent::Create,
            "dismiss" | "cancel" => Intent::DetailDismissed,
            "fetch" | "reload" => Intent::FetchPlants,
            "select" if rest.is_empty() => Intent::Select(None),
            "select" => Intent::Select(Some(parse_target(rest)?)),
            "edit" => Intent::Edit,
            "help" | "?" => Intent::Help,
            "quit" | "exit" => Intent::Quit,
            _ => return Err(IntentError::Unknown(line.to_string())),
        })
    }
}

fn parse_target(text: &str) -> Result<Target, IntentError> {
    if let Ok(position) = text.parse::<usize>() {
        return Ok(Target::Position(position));
    }
    text.parse::<PlantId>()
        .map(Target::Id)
        .map_err(|_| IntentError::InvalidTarget(text.to_string()))
}

impl Intent {
    /// The action for this intent, given what is on screen. `None` for
    /// intents that don't reach the store, or a position nothing is at.
    pub fn into_action(self, state: &AppState) -> Option<AppAction> {
        let action = match self {
            Intent::AddPlant => PlantsAction::AddPlant,
            Intent::NameChanged(name) => {
                PlantsAction::Details(PlantDetailsAction::NameChanged(name))
            }
            Intent::SpeciesChanged(species) => {
                PlantsAction::Details(PlantDetailsAction::SpeciesChanged(species))
            }
            Intent::Create => PlantsAction::Details(PlantDetailsAction::Create),
            Intent::DetailDismissed => PlantsAction::DetailDismissed,
            Intent::FetchPlants => PlantsAction::FetchPlants,
            Intent::Select(None) => PlantsAction::SetSelection(None),
            Intent::Select(Some(Target::Id(id))) => PlantsAction::SetSelection(Some(id)),
            Intent::Select(Some(Target::Position(position))) => {
                let plant = state.plants.plants.get(position.checked_sub(1)?)?;
                PlantsAction::SetSelection(Some(plant.id))
            }
            Intent::Edit => PlantsAction::EditSelection,
            Intent::Help | Intent::Quit => return None,
        };
        Some(AppAction::Plants(action))
    }
}
