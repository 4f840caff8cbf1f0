mod goal;
mod task;

pub use goal::{Goal, GoalInput, Intensity, Priority};
pub use task::{Task, TaskInput, TaskPatch, TaskReorder, TaskStatus, TaskView};

/// Lower-cases a label and collapses every run of non-alphanumeric
/// characters into a single `_`, so `Not Started`, `not-started` and
/// `NOT_STARTED` all compare equal.
pub fn canonical_label(raw: &str) -> String {
    let mut cleaned = String::new();
    let mut previous_underscore = false;

    for ch in raw.chars() {
        if ch.is_ascii_alphanumeric() {
            cleaned.push(ch.to_ascii_lowercase());
            previous_underscore = false;
        } else if !previous_underscore && !cleaned.is_empty() {
            cleaned.push('_');
            previous_underscore = true;
        }
    }

    cleaned.trim_matches('_').to_string()
}
