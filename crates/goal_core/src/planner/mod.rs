//! Goal decomposition engine.
//!
//! A goal title picks a topic template, the template is laid out over the
//! goal's weeks at the pace its intensity allows, and the resulting tasks
//! are chained so that each one unlocks only after its predecessor is done.

pub mod catalog;
pub mod lock;
pub mod materializer;
pub mod sequencer;
pub mod topic;

pub use lock::{is_unlocked, with_lock_status};
pub use topic::detect_topic;

use crate::clock;
use crate::error::AppError;
use crate::model::{Goal, Task};

/// Weekly load used for intensity labels that are not recognized.
pub const DEFAULT_TASKS_PER_WEEK: u32 = 3;

/// Weekly load for an intensity label. Labels match exactly, so `"light"`
/// is unrecognized and gets the default.
pub fn tasks_per_week(intensity_label: &str) -> u32 {
    match intensity_label {
        "Light" | "Relaxed" => 2,
        "Normal" => 3,
        "Aggressive" | "Intense" => 4,
        _ => DEFAULT_TASKS_PER_WEEK,
    }
}

/// Breaks a goal into its full chained task list.
pub fn generate_tasks_for_goal(goal: &Goal) -> Result<Vec<Task>, AppError> {
    let topic = detect_topic(&goal.title);
    let template = catalog::template(topic);
    let per_week = tasks_per_week(goal.intensity.label());
    let weekly = sequencer::distribute_tasks(template, goal.duration_weeks, per_week)?;
    let timestamp = clock::now_timestamp()?;
    let tasks = materializer::materialize(&weekly, goal, &timestamp);

    tracing::debug!(
        goal_id = %goal.id,
        topic,
        weeks = goal.duration_weeks,
        per_week,
        tasks = tasks.len(),
        "decomposed goal"
    );

    Ok(tasks)
}

#[cfg(test)]
mod tests {
    use super::{generate_tasks_for_goal, is_unlocked, tasks_per_week};
    use crate::model::{Goal, Intensity, Priority, Task, TaskStatus};
    use proptest::prelude::*;

    fn goal(title: &str, duration_weeks: u32, intensity: Intensity) -> Goal {
        Goal {
            id: "goal-1".to_string(),
            title: title.to_string(),
            duration_weeks,
            priority: Priority::High,
            intensity,
            start_date: "2025-12-01T00:00:00Z".to_string(),
            end_date: "2025-12-08T00:00:00Z".to_string(),
            created_at: "2025-12-01T00:00:00Z".to_string(),
        }
    }

    fn shape(tasks: &[Task]) -> Vec<(String, u32, u32, Vec<usize>)> {
        tasks
            .iter()
            .map(|task| {
                let dependency_positions = task
                    .dependencies
                    .iter()
                    .filter_map(|dep| tasks.iter().position(|other| &other.id == dep))
                    .collect();
                (
                    task.title.clone(),
                    task.week_number,
                    task.order,
                    dependency_positions,
                )
            })
            .collect()
    }

    #[test]
    fn label_lookup_defaults_to_three() {
        assert_eq!(tasks_per_week("Light"), 2);
        assert_eq!(tasks_per_week("Relaxed"), 2);
        assert_eq!(tasks_per_week("Normal"), 3);
        assert_eq!(tasks_per_week("Aggressive"), 4);
        assert_eq!(tasks_per_week("Intense"), 4);
        assert_eq!(tasks_per_week("Leisurely"), 3);
        assert_eq!(tasks_per_week(""), 3);
    }

    #[test]
    fn label_lookup_is_exact() {
        assert_eq!(tasks_per_week("light"), 3);
        assert_eq!(tasks_per_week("LIGHT"), 3);
        assert_eq!(tasks_per_week("Light!"), 3);
        assert_eq!(tasks_per_week(" Intense"), 3);
    }

    #[test]
    fn every_intensity_label_is_in_the_table() {
        assert_eq!(tasks_per_week(Intensity::Light.label()), 2);
        assert_eq!(tasks_per_week(Intensity::Relaxed.label()), 2);
        assert_eq!(tasks_per_week(Intensity::Normal.label()), 3);
        assert_eq!(tasks_per_week(Intensity::Aggressive.label()), 4);
        assert_eq!(tasks_per_week(Intensity::Intense.label()), 4);
    }

    #[test]
    fn react_goal_uses_react_template() {
        let tasks = generate_tasks_for_goal(&goal("Learn React Basics", 1, Intensity::Normal)).unwrap();
        let titles: Vec<&str> = tasks.iter().map(|task| task.title.as_str()).collect();
        assert_eq!(titles, ["JSX Syntax", "Components Basics", "Props"]);
    }

    #[test]
    fn long_goals_end_with_review() {
        let tasks = generate_tasks_for_goal(&goal("Random Hobby", 4, Intensity::Normal)).unwrap();
        assert_eq!(tasks.len(), 12);
        assert_eq!(tasks[9].title, "Capstone Project");
        assert_eq!(tasks[10].title, "Practice & Review");
        assert_eq!(tasks[11].title, "Final Review");
    }

    #[test]
    fn zero_week_goal_is_rejected() {
        let err = generate_tasks_for_goal(&goal("Python", 0, Intensity::Normal)).unwrap_err();
        assert_eq!(err.code(), "invalid_input");
    }

    #[test]
    fn generation_is_structurally_deterministic() {
        let goal = goal("Intro to Python", 3, Intensity::Aggressive);
        let first = generate_tasks_for_goal(&goal).unwrap();
        let second = generate_tasks_for_goal(&goal).unwrap();

        assert_eq!(shape(&first), shape(&second));
        assert_ne!(first[0].id, second[0].id);
    }

    #[test]
    fn completing_tasks_unlocks_the_chain_in_order() {
        let mut tasks = generate_tasks_for_goal(&goal("Anything", 1, Intensity::Normal)).unwrap();
        assert_eq!(tasks.len(), 3);

        assert!(is_unlocked(&tasks[0], &tasks));
        assert!(!is_unlocked(&tasks[1], &tasks));
        assert!(!is_unlocked(&tasks[2], &tasks));

        tasks[0].status = TaskStatus::Completed;
        assert!(is_unlocked(&tasks[1], &tasks));
        assert!(!is_unlocked(&tasks[2], &tasks));

        tasks[1].status = TaskStatus::Completed;
        assert!(is_unlocked(&tasks[2], &tasks));
    }

    fn intensity() -> impl Strategy<Value = Intensity> {
        prop_oneof![
            Just(Intensity::Light),
            Just(Intensity::Normal),
            Just(Intensity::Aggressive),
            Just(Intensity::Relaxed),
            Just(Intensity::Intense),
        ]
    }

    proptest! {
        #[test]
        fn schedule_fills_the_grid(
            weeks in 1u32..=52,
            intensity in intensity(),
            title in "[a-zA-Z_ ]{0,24}",
        ) {
            let per_week = tasks_per_week(intensity.label());
            let tasks = generate_tasks_for_goal(&goal(&title, weeks, intensity)).unwrap();

            prop_assert_eq!(tasks.len(), (weeks * per_week) as usize);
            for (index, task) in tasks.iter().enumerate() {
                let index = index as u32;
                prop_assert_eq!(task.week_number, index / per_week + 1);
                prop_assert_eq!(task.order, index % per_week);
            }
        }

        #[test]
        fn every_task_but_the_first_depends_on_its_predecessor(
            weeks in 1u32..=52,
            intensity in intensity(),
        ) {
            let tasks = generate_tasks_for_goal(&goal("data_structures", weeks, intensity)).unwrap();

            prop_assert!(tasks[0].dependencies.is_empty());
            for pair in tasks.windows(2) {
                prop_assert_eq!(&pair[1].dependencies, &vec![pair[0].id.clone()]);
            }
        }
    }
}
