use crate::model::{Goal, Task, TaskStatus};
use std::collections::HashMap;
use uuid::Uuid;

/// Turns per-week titles into tasks chained one after another.
///
/// Each task depends on the task before it in the same week; the first task
/// of a week depends on the last task of the previous week. Tasks come back
/// week-major, position-minor, which is also the order ids are assigned in.
pub fn materialize(weekly_titles: &[Vec<String>], goal: &Goal, timestamp: &str) -> Vec<Task> {
    materialize_with_ids(weekly_titles, goal, timestamp, || Uuid::new_v4().to_string())
}

pub(crate) fn materialize_with_ids<F>(
    weekly_titles: &[Vec<String>],
    goal: &Goal,
    timestamp: &str,
    mut next_id: F,
) -> Vec<Task>
where
    F: FnMut() -> String,
{
    let capacity = weekly_titles.iter().map(Vec::len).sum();
    let mut tasks = Vec::with_capacity(capacity);
    let mut ids: HashMap<(u32, u32), String> = HashMap::with_capacity(capacity);

    for (week_index, titles) in weekly_titles.iter().enumerate() {
        let week_number = week_index as u32 + 1;

        for (position, title) in titles.iter().enumerate() {
            let order = position as u32;
            let predecessor = if order > 0 {
                Some((week_number, order - 1))
            } else if week_index > 0 {
                weekly_titles[week_index - 1]
                    .len()
                    .checked_sub(1)
                    .map(|last| (week_number - 1, last as u32))
            } else {
                None
            };

            let dependencies: Vec<String> = predecessor
                .and_then(|key| ids.get(&key).cloned())
                .into_iter()
                .collect();

            let id = next_id();
            ids.insert((week_number, order), id.clone());

            tasks.push(Task {
                id,
                goal_id: goal.id.clone(),
                week_number,
                day_number: None,
                title: title.clone(),
                description: Some(format!("Complete {} for {}", title, goal.title)),
                status: TaskStatus::NotStarted,
                dependencies,
                order,
                created_at: timestamp.to_string(),
                updated_at: timestamp.to_string(),
            });
        }
    }

    tasks
}

#[cfg(test)]
mod tests {
    use super::{materialize, materialize_with_ids};
    use crate::model::{Goal, Intensity, Priority, TaskStatus};

    fn goal() -> Goal {
        Goal {
            id: "goal-1".to_string(),
            title: "Learn React".to_string(),
            duration_weeks: 2,
            priority: Priority::Medium,
            intensity: Intensity::Light,
            start_date: "2025-12-01T00:00:00Z".to_string(),
            end_date: "2025-12-15T00:00:00Z".to_string(),
            created_at: "2025-12-01T00:00:00Z".to_string(),
        }
    }

    fn weeks(layout: &[&[&str]]) -> Vec<Vec<String>> {
        layout
            .iter()
            .map(|week| week.iter().map(|title| title.to_string()).collect())
            .collect()
    }

    fn counter() -> impl FnMut() -> String {
        let mut next = 0;
        move || {
            next += 1;
            format!("task-{next}")
        }
    }

    #[test]
    fn chains_within_and_across_weeks() {
        let layout = weeks(&[&["a", "b"], &["c", "d"]]);
        let tasks = materialize_with_ids(&layout, &goal(), "2025-12-01T00:00:00Z", counter());

        let ids: Vec<&str> = tasks.iter().map(|task| task.id.as_str()).collect();
        assert_eq!(ids, ["task-1", "task-2", "task-3", "task-4"]);
        assert!(tasks[0].dependencies.is_empty());
        assert_eq!(tasks[1].dependencies, ["task-1"]);
        assert_eq!(tasks[2].dependencies, ["task-2"]);
        assert_eq!(tasks[3].dependencies, ["task-3"]);
    }

    #[test]
    fn fills_week_and_order_fields() {
        let layout = weeks(&[&["a", "b"], &["c", "d"]]);
        let tasks = materialize(&layout, &goal(), "2025-12-01T00:00:00Z");

        let positions: Vec<(u32, u32)> = tasks
            .iter()
            .map(|task| (task.week_number, task.order))
            .collect();
        assert_eq!(positions, [(1, 0), (1, 1), (2, 0), (2, 1)]);

        let first = &tasks[0];
        assert_eq!(first.goal_id, "goal-1");
        assert_eq!(first.day_number, None);
        assert_eq!(first.status, TaskStatus::NotStarted);
        assert_eq!(
            first.description.as_deref(),
            Some("Complete a for Learn React")
        );
        assert_eq!(first.created_at, "2025-12-01T00:00:00Z");
        assert_eq!(first.updated_at, first.created_at);
    }

    #[test]
    fn empty_previous_week_leaves_no_dependency() {
        let layout = weeks(&[&[], &["a", "b"]]);
        let tasks = materialize_with_ids(&layout, &goal(), "2025-12-01T00:00:00Z", counter());

        assert_eq!(tasks.len(), 2);
        assert_eq!(tasks[0].week_number, 2);
        assert!(tasks[0].dependencies.is_empty());
        assert_eq!(tasks[1].dependencies, ["task-1"]);
    }

    #[test]
    fn uses_fresh_ids() {
        let layout = weeks(&[&["a", "b", "c"]]);
        let tasks = materialize(&layout, &goal(), "2025-12-01T00:00:00Z");

        assert_ne!(tasks[0].id, tasks[1].id);
        assert_ne!(tasks[1].id, tasks[2].id);
        assert_eq!(tasks[2].dependencies, [tasks[1].id.clone()]);
    }
}
