use std::fmt::Write;

use super::{PlantsReducer, State};
use crate::components::plant_details::{self, PlantDetailsReducer};
use crate::loc;
use crate::reducer::ChildReducer;

pub fn render(state: &State) -> String {
    let mut out = format!("== {} ==\n", loc!("Plants"));
    if state.plants.is_empty() {
        let _ = writeln!(out, "  ({})", loc!("no plants yet"));
    }
    for (index, plant) in state.plants.iter().enumerate() {
        let marker = if state.selection == Some(plant.id) { '>' } else { ' ' };
        let _ = write!(out, "{marker} {}. {}", index + 1, plant.name);
        if let Some(species) = &plant.species {
            let _ = write!(out, " ({species})");
        }
        out.push('\n');
    }
    let details = <PlantDetailsReducer as ChildReducer<PlantsReducer>>::child_state(state);
    if let Some(form) = plant_details::render(&details) {
        out.push_str(&form);
        out.push('\n');
    }
    out
}
