use crate::error::AppError;
use crate::model::{Goal, Task};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::{Path, PathBuf};

pub const SCHEMA_VERSION: u32 = 1;
const STORE_FILE_NAME: &str = "store.json";
const STORE_ENV_VAR: &str = "GOALTRACK_STORE_PATH";

#[derive(Debug, Serialize, Deserialize)]
struct StoredState {
    schema_version: u32,
    #[serde(default)]
    goals: Vec<Goal>,
    #[serde(default)]
    tasks: Vec<Task>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StoreState {
    pub goals: Vec<Goal>,
    pub tasks: Vec<Task>,
}

impl StoreState {
    pub fn goal(&self, id: &str) -> Option<&Goal> {
        self.goals.iter().find(|goal| goal.id == id)
    }

    pub fn task(&self, id: &str) -> Option<&Task> {
        self.tasks.iter().find(|task| task.id == id)
    }

    /// Every task owned by `goal_id`, in storage order.
    pub fn tasks_for_goal(&self, goal_id: &str) -> Vec<Task> {
        self.tasks
            .iter()
            .filter(|task| task.goal_id == goal_id)
            .cloned()
            .collect()
    }

    /// Tasks that list `task_id` among their dependencies.
    pub fn dependents_of(&self, task_id: &str) -> Vec<&Task> {
        self.tasks
            .iter()
            .filter(|task| task.dependencies.iter().any(|dep| dep == task_id))
            .collect()
    }
}

pub fn store_path() -> Result<PathBuf, AppError> {
    if let Ok(path) = std::env::var(STORE_ENV_VAR)
        && !path.trim().is_empty()
    {
        return Ok(PathBuf::from(path));
    }

    if cfg!(windows) {
        let appdata =
            std::env::var("APPDATA").map_err(|_| AppError::invalid_data("APPDATA is not set"))?;
        Ok(PathBuf::from(appdata)
            .join("goaltrack")
            .join(STORE_FILE_NAME))
    } else {
        let home = std::env::var("HOME").map_err(|_| AppError::invalid_data("HOME is not set"))?;
        Ok(PathBuf::from(home)
            .join(".config")
            .join("goaltrack")
            .join(STORE_FILE_NAME))
    }
}

pub fn load_state(path: &Path) -> Result<StoreState, AppError> {
    if !path.exists() {
        return Ok(StoreState::default());
    }

    let content = std::fs::read_to_string(path)?;
    let stored: StoredState = serde_json::from_str(&content)?;

    if stored.schema_version != SCHEMA_VERSION {
        return Err(AppError::invalid_data("schema_version mismatch"));
    }

    let state = StoreState {
        goals: stored.goals,
        tasks: stored.tasks,
    };
    check_references(&state)?;

    Ok(state)
}

fn check_references(state: &StoreState) -> Result<(), AppError> {
    let goal_ids: HashSet<&str> = state.goals.iter().map(|goal| goal.id.as_str()).collect();
    let task_ids: HashSet<&str> = state.tasks.iter().map(|task| task.id.as_str()).collect();

    for task in &state.tasks {
        if !goal_ids.contains(task.goal_id.as_str()) {
            return Err(AppError::invalid_data(format!(
                "task {} references unknown goal {}",
                task.id, task.goal_id
            )));
        }

        if let Some(missing) = task
            .dependencies
            .iter()
            .find(|dep| !task_ids.contains(dep.as_str()))
        {
            return Err(AppError::invalid_data(format!(
                "task {} depends on unknown task {}",
                task.id, missing
            )));
        }
    }

    Ok(())
}

pub fn save_state(path: &Path, state: &StoreState) -> Result<(), AppError> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    let stored = StoredState {
        schema_version: SCHEMA_VERSION,
        goals: state.goals.clone(),
        tasks: state.tasks.clone(),
    };
    let content = serde_json::to_string_pretty(&stored)?;
    std::fs::write(path, content)?;

    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        let permissions = std::fs::Permissions::from_mode(0o600);
        std::fs::set_permissions(path, permissions)?;
    }

    tracing::trace!(path = %path.display(), goals = state.goals.len(), tasks = state.tasks.len(), "saved store");
    Ok(())
}
