use super::AppState;
use crate::components::plants;

pub fn render(state: &AppState) -> String {
    plants::render(&state.plants)
}
