mod clock;
pub mod config;
pub mod error;
pub mod goal_api;
pub mod model;
pub mod planner;
pub mod storage;
pub mod task_api;

pub use planner::{detect_topic, generate_tasks_for_goal, is_unlocked};

#[cfg(test)]
mod tests {
    use crate::error::AppError;
    use crate::model::{Task, TaskStatus};

    #[test]
    fn task_defaults_to_not_started_and_unlocked() {
        let task = Task {
            id: "task-1".to_string(),
            goal_id: "goal-1".to_string(),
            week_number: 1,
            day_number: None,
            title: "JSX Syntax".to_string(),
            description: None,
            status: TaskStatus::default(),
            dependencies: Vec::new(),
            order: 0,
            created_at: "2025-12-20T00:00:00Z".to_string(),
            updated_at: "2025-12-20T00:00:00Z".to_string(),
        };

        assert_eq!(task.status, TaskStatus::NotStarted);
        assert!(crate::is_unlocked(&task, std::slice::from_ref(&task)));
        assert_eq!(crate::detect_topic("Master React Hooks"), "react");
    }

    #[test]
    fn app_error_exposes_code() {
        let err = AppError::invalid_input("missing title");
        assert_eq!(err.code(), "invalid_input");
        assert_eq!(err.to_string(), "invalid_input - missing title");
    }
}
