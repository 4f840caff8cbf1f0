use crate::clock;
use crate::error::AppError;
use crate::model::{Goal, GoalInput};
use crate::storage::json_store::{self, StoreState};
use serde::Serialize;
use std::path::Path;
use uuid::Uuid;

pub const MAX_TITLE_CHARS: usize = 200;
pub const MAX_DURATION_WEEKS: u32 = 52;

#[derive(Debug, Clone, Serialize)]
pub struct DeletedGoal {
    pub goal: Goal,
    pub deleted_tasks_count: usize,
}

pub fn create_goal(input: &GoalInput) -> Result<Goal, AppError> {
    let path = json_store::store_path()?;
    create_goal_with_path(&path, input)
}

pub fn list_goals() -> Result<Vec<Goal>, AppError> {
    let path = json_store::store_path()?;
    Ok(json_store::load_state(&path)?.goals)
}

pub fn get_goal(id: &str) -> Result<Goal, AppError> {
    let path = json_store::store_path()?;
    get_goal_with_path(&path, id)
}

pub fn update_goal(id: &str, input: &GoalInput) -> Result<Goal, AppError> {
    let path = json_store::store_path()?;
    update_goal_with_path(&path, id, input)
}

pub fn delete_goal(id: &str) -> Result<DeletedGoal, AppError> {
    let path = json_store::store_path()?;
    delete_goal_with_path(&path, id)
}

pub(crate) fn required_id<'a>(id: &'a str, label: &str) -> Result<&'a str, AppError> {
    let trimmed = id.trim();
    if trimmed.is_empty() {
        return Err(AppError::invalid_input(format!("{label} is required")));
    }
    Ok(trimmed)
}

pub(crate) fn find_goal<'a>(state: &'a StoreState, id: &str) -> Result<&'a Goal, AppError> {
    state
        .goal(id)
        .ok_or_else(|| AppError::not_found("goal not found"))
}

fn validate_goal_input(input: &GoalInput) -> Result<String, AppError> {
    let title = input.title.trim();
    if title.is_empty() {
        return Err(AppError::invalid_input(
            "title cannot be empty or whitespace only",
        ));
    }
    if title.chars().count() > MAX_TITLE_CHARS {
        return Err(AppError::invalid_input(format!(
            "title must be at most {MAX_TITLE_CHARS} characters"
        )));
    }
    if !(1..=MAX_DURATION_WEEKS).contains(&input.duration_weeks) {
        return Err(AppError::invalid_input(format!(
            "duration_weeks must be between 1 and {MAX_DURATION_WEEKS}"
        )));
    }
    Ok(title.to_string())
}

fn create_goal_with_path(path: &Path, input: &GoalInput) -> Result<Goal, AppError> {
    let title = validate_goal_input(input)?;
    let (start_date, end_date) = clock::schedule_window(input.duration_weeks)?;
    let created_at = clock::now_timestamp()?;

    let goal = Goal {
        id: Uuid::new_v4().to_string(),
        title,
        duration_weeks: input.duration_weeks,
        priority: input.priority,
        intensity: input.intensity,
        start_date,
        end_date,
        created_at,
    };

    let mut state = json_store::load_state(path)?;
    state.goals.push(goal.clone());
    json_store::save_state(path, &state)?;

    tracing::info!(goal_id = %goal.id, title = %goal.title, "created goal");
    Ok(goal)
}

fn get_goal_with_path(path: &Path, id: &str) -> Result<Goal, AppError> {
    let id = required_id(id, "goal id")?;
    let state = json_store::load_state(path)?;
    find_goal(&state, id).cloned()
}

fn update_goal_with_path(path: &Path, id: &str, input: &GoalInput) -> Result<Goal, AppError> {
    let id = required_id(id, "goal id")?;
    let title = validate_goal_input(input)?;
    let (start_date, end_date) = clock::schedule_window(input.duration_weeks)?;

    let mut state = json_store::load_state(path)?;
    let goal = state
        .goals
        .iter_mut()
        .find(|goal| goal.id == id)
        .ok_or_else(|| AppError::not_found("goal not found"))?;

    goal.title = title;
    goal.duration_weeks = input.duration_weeks;
    goal.priority = input.priority;
    goal.intensity = input.intensity;
    goal.start_date = start_date;
    goal.end_date = end_date;
    let updated = goal.clone();

    json_store::save_state(path, &state)?;

    tracing::info!(goal_id = %updated.id, "updated goal");
    Ok(updated)
}

fn delete_goal_with_path(path: &Path, id: &str) -> Result<DeletedGoal, AppError> {
    let id = required_id(id, "goal id")?;
    let mut state = json_store::load_state(path)?;
    let index = state
        .goals
        .iter()
        .position(|goal| goal.id == id)
        .ok_or_else(|| AppError::not_found("goal not found"))?;

    let goal = state.goals.remove(index);
    let before = state.tasks.len();
    state.tasks.retain(|task| task.goal_id != goal.id);
    let deleted_tasks_count = before - state.tasks.len();

    json_store::save_state(path, &state)?;

    tracing::info!(goal_id = %goal.id, deleted_tasks_count, "deleted goal");
    Ok(DeletedGoal {
        goal,
        deleted_tasks_count,
    })
}
