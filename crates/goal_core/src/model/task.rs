use super::canonical_label;
use crate::error::AppError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    pub id: String,
    pub goal_id: String,
    pub week_number: u32,
    #[serde(default)]
    pub day_number: Option<u32>,
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub status: TaskStatus,
    /// Ids of tasks that must be completed before this one unlocks.
    #[serde(default)]
    pub dependencies: Vec<String>,
    #[serde(default)]
    pub order: u32,
    pub created_at: String,
    pub updated_at: String,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TaskStatus {
    #[default]
    #[serde(rename = "Not Started")]
    NotStarted,
    #[serde(rename = "In Progress")]
    InProgress,
    Completed,
}

impl TaskStatus {
    pub fn label(self) -> &'static str {
        match self {
            Self::NotStarted => "Not Started",
            Self::InProgress => "In Progress",
            Self::Completed => "Completed",
        }
    }
}

impl fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for TaskStatus {
    type Err = AppError;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        match canonical_label(raw).as_str() {
            "not_started" | "notstarted" | "todo" => Ok(Self::NotStarted),
            "in_progress" | "inprogress" | "started" => Ok(Self::InProgress),
            "completed" | "done" => Ok(Self::Completed),
            _ => Err(AppError::invalid_input("invalid status")),
        }
    }
}

/// A manually created task.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TaskInput {
    pub week_number: u32,
    pub day_number: Option<u32>,
    pub title: String,
    pub description: Option<String>,
    pub dependencies: Vec<String>,
    pub order: u32,
}

/// Partial update; `None` leaves a field untouched. The `clear_*` flags
/// reset an optional field and cannot be combined with a new value for it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TaskPatch {
    pub title: Option<String>,
    pub description: Option<String>,
    pub status: Option<TaskStatus>,
    pub dependencies: Option<Vec<String>>,
    pub order: Option<u32>,
    pub week_number: Option<u32>,
    pub day_number: Option<u32>,
    pub clear_description: bool,
    pub clear_day: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskReorder {
    pub task_id: String,
    pub new_order: u32,
    pub new_week_number: Option<u32>,
}

/// A task paired with its lock status at the time it was read.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TaskView {
    #[serde(flatten)]
    pub task: Task,
    pub is_locked: bool,
}

#[cfg(test)]
mod tests {
    use super::{Task, TaskStatus};

    #[test]
    fn status_uses_display_labels_on_the_wire() {
        let json = serde_json::to_string(&TaskStatus::NotStarted).unwrap();
        assert_eq!(json, "\"Not Started\"");
        let parsed: TaskStatus = serde_json::from_str("\"In Progress\"").unwrap();
        assert_eq!(parsed, TaskStatus::InProgress);
    }

    #[test]
    fn status_parses_loose_spellings() {
        assert_eq!("not-started".parse::<TaskStatus>().unwrap(), TaskStatus::NotStarted);
        assert_eq!("In Progress".parse::<TaskStatus>().unwrap(), TaskStatus::InProgress);
        assert_eq!("done".parse::<TaskStatus>().unwrap(), TaskStatus::Completed);
        assert!("finished?".parse::<TaskStatus>().is_err());
    }

    #[test]
    fn task_defaults_optional_fields() {
        let json = serde_json::json!({
            "id": "task-1",
            "goal_id": "goal-1",
            "week_number": 1,
            "title": "Props",
            "created_at": "2025-12-20T00:00:00Z",
            "updated_at": "2025-12-20T00:00:00Z"
        });

        let task: Task = serde_json::from_value(json).unwrap();
        assert_eq!(task.status, TaskStatus::NotStarted);
        assert_eq!(task.day_number, None);
        assert_eq!(task.description, None);
        assert!(task.dependencies.is_empty());
        assert_eq!(task.order, 0);
    }
}
