use super::State;
use crate::loc;

/// The add-plant form, or nothing while it is hidden
pub fn render(state: &State) -> Option<String> {
    if !state.is_presented {
        return None;
    }
    let draft = &state.draft;
    Some(format!(
        "-- {} --\n  {}: {}\n  {}: {}\n  [{}]",
        loc!("Add plant"),
        loc!("Name"),
        draft.name,
        loc!("Species"),
        draft.species.as_deref().unwrap_or("-"),
        loc!("Done")
    ))
}
