use crate::model::{Task, TaskStatus, TaskView};
use std::collections::HashMap;

/// Returns true when every dependency of `task` is present in
/// `sibling_tasks` and completed.
///
/// `sibling_tasks` must hold every task of the task's goal. A dependency id
/// that cannot be found keeps the task locked.
pub fn is_unlocked(task: &Task, sibling_tasks: &[Task]) -> bool {
    if task.dependencies.is_empty() {
        return true;
    }

    let by_id: HashMap<&str, &Task> = sibling_tasks
        .iter()
        .map(|sibling| (sibling.id.as_str(), sibling))
        .collect();

    task.dependencies.iter().all(|dependency| {
        by_id
            .get(dependency.as_str())
            .is_some_and(|found| found.status == TaskStatus::Completed)
    })
}

/// Pairs each task with its lock status, evaluated against `siblings`.
pub fn with_lock_status(tasks: &[Task], siblings: &[Task]) -> Vec<TaskView> {
    tasks
        .iter()
        .map(|task| TaskView {
            task: task.clone(),
            is_locked: !is_unlocked(task, siblings),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::{is_unlocked, with_lock_status};
    use crate::model::{Task, TaskStatus};

    fn task(id: &str, dependencies: &[&str], status: TaskStatus) -> Task {
        Task {
            id: id.to_string(),
            goal_id: "goal-1".to_string(),
            week_number: 1,
            day_number: None,
            title: id.to_string(),
            description: None,
            status,
            dependencies: dependencies.iter().map(|dep| dep.to_string()).collect(),
            order: 0,
            created_at: "2025-12-01T00:00:00Z".to_string(),
            updated_at: "2025-12-01T00:00:00Z".to_string(),
        }
    }

    #[test]
    fn no_dependencies_is_unlocked() {
        let first = task("a", &[], TaskStatus::NotStarted);
        assert!(is_unlocked(&first, &[]));
    }

    #[test]
    fn incomplete_dependency_locks() {
        let first = task("a", &[], TaskStatus::InProgress);
        let second = task("b", &["a"], TaskStatus::NotStarted);
        let siblings = vec![first, second.clone()];

        assert!(!is_unlocked(&second, &siblings));
    }

    #[test]
    fn completed_dependency_unlocks() {
        let first = task("a", &[], TaskStatus::Completed);
        let second = task("b", &["a"], TaskStatus::NotStarted);
        let siblings = vec![first, second.clone()];

        assert!(is_unlocked(&second, &siblings));
    }

    #[test]
    fn missing_dependency_stays_locked() {
        let orphan = task("b", &["gone"], TaskStatus::NotStarted);
        let siblings = vec![task("a", &[], TaskStatus::Completed), orphan.clone()];

        assert!(!is_unlocked(&orphan, &siblings));
    }

    #[test]
    fn every_dependency_must_be_completed() {
        let a = task("a", &[], TaskStatus::Completed);
        let b = task("b", &[], TaskStatus::NotStarted);
        let c = task("c", &["a", "b"], TaskStatus::NotStarted);
        let siblings = vec![a, b, c.clone()];

        assert!(!is_unlocked(&c, &siblings));
    }

    #[test]
    fn lock_status_is_reported_per_task() {
        let tasks = vec![
            task("a", &[], TaskStatus::Completed),
            task("b", &["a"], TaskStatus::NotStarted),
            task("c", &["b"], TaskStatus::NotStarted),
        ];

        let locked: Vec<bool> = with_lock_status(&tasks, &tasks)
            .iter()
            .map(|view| view.is_locked)
            .collect();
        assert_eq!(locked, [false, false, true]);
    }
}
