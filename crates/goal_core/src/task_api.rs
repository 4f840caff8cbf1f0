use crate::clock;
use crate::error::AppError;
use crate::goal_api::{find_goal, required_id};
use crate::model::{Goal, Task, TaskInput, TaskPatch, TaskReorder, TaskStatus, TaskView};
use crate::planner;
use crate::storage::json_store::{self, StoreState};
use serde::Serialize;
use std::collections::BTreeMap;
use std::path::Path;
use uuid::Uuid;

pub const MAX_DAY_NUMBER: u32 = 7;

#[derive(Debug, Clone, Serialize)]
pub struct GeneratedPlan {
    pub goal: Goal,
    pub tasks: Vec<TaskView>,
}

#[derive(Debug, Clone, Serialize)]
pub struct GoalTasks {
    pub goal_id: String,
    pub tasks: Vec<TaskView>,
    pub weeks: BTreeMap<u32, Vec<TaskView>>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ReorderOutcome {
    pub goal_id: String,
    pub updated_count: usize,
    pub tasks: Vec<TaskView>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GoalProgress {
    pub goal_id: String,
    pub total: usize,
    pub completed: usize,
    pub in_progress: usize,
    pub not_started: usize,
    /// Tasks that are not completed and whose dependencies are all done.
    pub unlocked_pending: usize,
    pub percent_complete: u32,
}

pub fn generate_tasks(goal_id: &str) -> Result<GeneratedPlan, AppError> {
    let path = json_store::store_path()?;
    generate_tasks_with_path(&path, goal_id)
}

pub fn list_tasks(goal_id: &str) -> Result<GoalTasks, AppError> {
    let path = json_store::store_path()?;
    list_tasks_with_path(&path, goal_id)
}

pub fn get_task(id: &str) -> Result<TaskView, AppError> {
    let path = json_store::store_path()?;
    get_task_with_path(&path, id)
}

pub fn create_task(goal_id: &str, input: &TaskInput) -> Result<TaskView, AppError> {
    let path = json_store::store_path()?;
    create_task_with_path(&path, goal_id, input)
}

pub fn update_task(id: &str, patch: &TaskPatch) -> Result<TaskView, AppError> {
    let path = json_store::store_path()?;
    update_task_with_path(&path, id, patch)
}

pub fn set_task_status(id: &str, status: TaskStatus) -> Result<TaskView, AppError> {
    let patch = TaskPatch {
        status: Some(status),
        ..TaskPatch::default()
    };
    update_task(id, &patch)
}

pub fn delete_task(id: &str) -> Result<Task, AppError> {
    let path = json_store::store_path()?;
    delete_task_with_path(&path, id)
}

pub fn reorder_tasks(goal_id: &str, moves: &[TaskReorder]) -> Result<ReorderOutcome, AppError> {
    let path = json_store::store_path()?;
    reorder_tasks_with_path(&path, goal_id, moves)
}

pub fn goal_progress(goal_id: &str) -> Result<GoalProgress, AppError> {
    let path = json_store::store_path()?;
    goal_progress_with_path(&path, goal_id)
}

fn sorted_views(state: &StoreState, goal_id: &str) -> Vec<TaskView> {
    let mut tasks = state.tasks_for_goal(goal_id);
    tasks.sort_by_key(|task| (task.week_number, task.order));
    planner::with_lock_status(&tasks, &tasks)
}

fn view_of(state: &StoreState, task: &Task) -> TaskView {
    let siblings = state.tasks_for_goal(&task.goal_id);
    TaskView {
        task: task.clone(),
        is_locked: !planner::is_unlocked(task, &siblings),
    }
}

fn check_week(week_number: u32) -> Result<(), AppError> {
    if week_number < 1 {
        return Err(AppError::invalid_input("week_number must be at least 1"));
    }
    Ok(())
}

fn check_day(day_number: Option<u32>) -> Result<(), AppError> {
    match day_number {
        Some(day) if !(1..=MAX_DAY_NUMBER).contains(&day) => Err(AppError::invalid_input(
            format!("day_number must be between 1 and {MAX_DAY_NUMBER}"),
        )),
        _ => Ok(()),
    }
}

/// Trims the ids and checks that each one names an existing task of the
/// same goal other than `task_id` itself.
fn checked_dependencies(
    state: &StoreState,
    goal_id: &str,
    task_id: Option<&str>,
    dependencies: &[String],
) -> Result<Vec<String>, AppError> {
    let mut checked = Vec::with_capacity(dependencies.len());

    for raw in dependencies {
        let dep_id = raw.trim();
        if dep_id.is_empty() {
            return Err(AppError::invalid_input("dependency id cannot be blank"));
        }
        if task_id == Some(dep_id) {
            return Err(AppError::invalid_input("a task cannot depend on itself"));
        }

        let dependency = state.task(dep_id).ok_or_else(|| {
            AppError::invalid_input(format!("dependency task {dep_id} not found"))
        })?;
        if dependency.goal_id != goal_id {
            return Err(AppError::invalid_input(format!(
                "dependency task {dep_id} belongs to another goal"
            )));
        }

        checked.push(dep_id.to_string());
    }

    Ok(checked)
}

fn generate_tasks_with_path(path: &Path, goal_id: &str) -> Result<GeneratedPlan, AppError> {
    let goal_id = required_id(goal_id, "goal id")?;
    let mut state = json_store::load_state(path)?;
    let goal = find_goal(&state, goal_id)?.clone();

    let tasks = planner::generate_tasks_for_goal(&goal)?;

    let before = state.tasks.len();
    state.tasks.retain(|task| task.goal_id != goal.id);
    let replaced = before - state.tasks.len();
    state.tasks.extend(tasks.iter().cloned());
    json_store::save_state(path, &state)?;

    tracing::info!(
        goal_id = %goal.id,
        generated = tasks.len(),
        replaced,
        "generated tasks"
    );

    let views = planner::with_lock_status(&tasks, &tasks);
    Ok(GeneratedPlan { goal, tasks: views })
}

fn list_tasks_with_path(path: &Path, goal_id: &str) -> Result<GoalTasks, AppError> {
    let goal_id = required_id(goal_id, "goal id")?;
    let state = json_store::load_state(path)?;
    find_goal(&state, goal_id)?;

    let tasks = sorted_views(&state, goal_id);
    let mut weeks: BTreeMap<u32, Vec<TaskView>> = BTreeMap::new();
    for view in &tasks {
        weeks
            .entry(view.task.week_number)
            .or_default()
            .push(view.clone());
    }

    Ok(GoalTasks {
        goal_id: goal_id.to_string(),
        tasks,
        weeks,
    })
}

fn get_task_with_path(path: &Path, id: &str) -> Result<TaskView, AppError> {
    let id = required_id(id, "task id")?;
    let state = json_store::load_state(path)?;
    let task = state
        .task(id)
        .ok_or_else(|| AppError::not_found("task not found"))?;
    Ok(view_of(&state, task))
}

fn create_task_with_path(
    path: &Path,
    goal_id: &str,
    input: &TaskInput,
) -> Result<TaskView, AppError> {
    let goal_id = required_id(goal_id, "goal id")?;
    let title = input.title.trim();
    if title.is_empty() {
        return Err(AppError::invalid_input("title is required"));
    }
    check_week(input.week_number)?;
    check_day(input.day_number)?;

    let mut state = json_store::load_state(path)?;
    find_goal(&state, goal_id)?;
    let dependencies = checked_dependencies(&state, goal_id, None, &input.dependencies)?;

    let timestamp = clock::now_timestamp()?;
    let task = Task {
        id: Uuid::new_v4().to_string(),
        goal_id: goal_id.to_string(),
        week_number: input.week_number,
        day_number: input.day_number,
        title: title.to_string(),
        description: input.description.clone(),
        status: TaskStatus::NotStarted,
        dependencies,
        order: input.order,
        created_at: timestamp.clone(),
        updated_at: timestamp,
    };

    state.tasks.push(task.clone());
    json_store::save_state(path, &state)?;

    tracing::info!(task_id = %task.id, goal_id, "created task");
    Ok(view_of(&state, &task))
}

fn update_task_with_path(path: &Path, id: &str, patch: &TaskPatch) -> Result<TaskView, AppError> {
    let id = required_id(id, "task id")?;
    let mut state = json_store::load_state(path)?;
    let current = state
        .task(id)
        .ok_or_else(|| AppError::not_found("task not found"))?;
    let goal_id = current.goal_id.clone();

    let title = match patch.title.as_deref() {
        Some(value) => {
            let trimmed = value.trim();
            if trimmed.is_empty() {
                return Err(AppError::invalid_input("title is required"));
            }
            Some(trimmed.to_string())
        }
        None => None,
    };
    if let Some(week_number) = patch.week_number {
        check_week(week_number)?;
    }
    check_day(patch.day_number)?;
    if patch.clear_description && patch.description.is_some() {
        return Err(AppError::invalid_input(
            "description cannot be both set and cleared",
        ));
    }
    if patch.clear_day && patch.day_number.is_some() {
        return Err(AppError::invalid_input("day cannot be both set and cleared"));
    }
    let dependencies = match patch.dependencies.as_deref() {
        Some(requested) => Some(checked_dependencies(&state, &goal_id, Some(id), requested)?),
        None => None,
    };

    let updated_at = clock::now_timestamp()?;
    let task = state
        .tasks
        .iter_mut()
        .find(|task| task.id == id)
        .ok_or_else(|| AppError::not_found("task not found"))?;

    if let Some(title) = title {
        task.title = title;
    }
    if patch.clear_description {
        task.description = None;
    } else if let Some(description) = patch.description.as_ref() {
        task.description = Some(description.clone());
    }
    if let Some(status) = patch.status {
        task.status = status;
    }
    if let Some(dependencies) = dependencies {
        task.dependencies = dependencies;
    }
    if let Some(order) = patch.order {
        task.order = order;
    }
    if let Some(week_number) = patch.week_number {
        task.week_number = week_number;
    }
    if patch.clear_day {
        task.day_number = None;
    } else if let Some(day_number) = patch.day_number {
        task.day_number = Some(day_number);
    }
    task.updated_at = updated_at;
    let updated = task.clone();

    json_store::save_state(path, &state)?;

    tracing::info!(task_id = %updated.id, status = %updated.status, "updated task");
    Ok(view_of(&state, &updated))
}

fn delete_task_with_path(path: &Path, id: &str) -> Result<Task, AppError> {
    let id = required_id(id, "task id")?;
    let mut state = json_store::load_state(path)?;
    let index = state
        .tasks
        .iter()
        .position(|task| task.id == id)
        .ok_or_else(|| AppError::not_found("task not found"))?;

    let dependents = state.dependents_of(id).len();
    if dependents > 0 {
        return Err(AppError::conflict(format!(
            "cannot delete task, {dependents} task(s) depend on it"
        )));
    }

    let removed = state.tasks.remove(index);
    json_store::save_state(path, &state)?;

    tracing::info!(task_id = %removed.id, goal_id = %removed.goal_id, "deleted task");
    Ok(removed)
}

fn reorder_tasks_with_path(
    path: &Path,
    goal_id: &str,
    moves: &[TaskReorder],
) -> Result<ReorderOutcome, AppError> {
    let goal_id = required_id(goal_id, "goal id")?;
    let mut state = json_store::load_state(path)?;
    find_goal(&state, goal_id)?;

    for entry in moves {
        let task = state
            .task(entry.task_id.trim())
            .ok_or_else(|| AppError::not_found(format!("task {} not found", entry.task_id)))?;
        if task.goal_id != goal_id {
            return Err(AppError::conflict(format!(
                "task {} does not belong to goal {}",
                entry.task_id, goal_id
            )));
        }
        if let Some(week_number) = entry.new_week_number {
            check_week(week_number)?;
        }
    }

    let updated_at = clock::now_timestamp()?;
    let mut updated_count = 0;
    for entry in moves {
        if let Some(task) = state
            .tasks
            .iter_mut()
            .find(|task| task.id == entry.task_id.trim())
        {
            task.order = entry.new_order;
            if let Some(week_number) = entry.new_week_number {
                task.week_number = week_number;
            }
            task.updated_at = updated_at.clone();
            updated_count += 1;
        }
    }

    json_store::save_state(path, &state)?;

    tracing::info!(goal_id, updated_count, "reordered tasks");
    Ok(ReorderOutcome {
        goal_id: goal_id.to_string(),
        updated_count,
        tasks: sorted_views(&state, goal_id),
    })
}

fn goal_progress_with_path(path: &Path, goal_id: &str) -> Result<GoalProgress, AppError> {
    let goal_id = required_id(goal_id, "goal id")?;
    let state = json_store::load_state(path)?;
    find_goal(&state, goal_id)?;

    let tasks = state.tasks_for_goal(goal_id);
    let count = |status: TaskStatus| tasks.iter().filter(|task| task.status == status).count();
    let completed = count(TaskStatus::Completed);
    let unlocked_pending = tasks
        .iter()
        .filter(|task| task.status != TaskStatus::Completed && planner::is_unlocked(task, &tasks))
        .count();
    let percent_complete = if tasks.is_empty() {
        0
    } else {
        (completed * 100 / tasks.len()) as u32
    };

    Ok(GoalProgress {
        goal_id: goal_id.to_string(),
        total: tasks.len(),
        completed,
        in_progress: count(TaskStatus::InProgress),
        not_started: count(TaskStatus::NotStarted),
        unlocked_pending,
        percent_complete,
    })
}
