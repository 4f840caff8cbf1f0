use super::catalog::{Category, TopicTemplate};
use crate::error::AppError;

pub const PRACTICE_TITLE: &str = "Practice & Review";
pub const FINAL_TITLE: &str = "Final Review";

/// Concatenates the template's categories in schedule order.
pub fn flatten(template: &TopicTemplate) -> Vec<String> {
    Category::ORDER
        .iter()
        .flat_map(|category| template.titles(*category))
        .map(|title| title.to_string())
        .collect()
}

/// Pads with review slots or truncates from the end so that exactly `total`
/// titles remain. The last padded slot is always the final review.
pub fn fit_to_grid(mut titles: Vec<String>, total: usize) -> Vec<String> {
    if titles.len() < total {
        let missing = total - titles.len();
        titles.extend(std::iter::repeat_n(PRACTICE_TITLE.to_string(), missing - 1));
        titles.push(FINAL_TITLE.to_string());
    } else {
        titles.truncate(total);
    }
    titles
}

/// Lays the template out over `duration_weeks` weeks of `tasks_per_week`
/// titles each. Week 1 is index 0 of the result.
pub fn distribute_tasks(
    template: &TopicTemplate,
    duration_weeks: u32,
    tasks_per_week: u32,
) -> Result<Vec<Vec<String>>, AppError> {
    if duration_weeks < 1 {
        return Err(AppError::invalid_input("duration_weeks must be at least 1"));
    }
    if tasks_per_week < 1 {
        return Err(AppError::invalid_input("tasks_per_week must be at least 1"));
    }

    let per_week = tasks_per_week as usize;
    let total = duration_weeks as usize * per_week;
    let all_tasks = flatten(template);
    let available = all_tasks.len();

    if available < total {
        tracing::debug!(
            template = template.key,
            available,
            total,
            "padding schedule with review slots"
        );
    } else if available > total {
        tracing::debug!(
            template = template.key,
            available,
            total,
            "truncating schedule"
        );
    }

    let fitted = fit_to_grid(all_tasks, total);
    Ok(fitted.chunks(per_week).map(<[String]>::to_vec).collect())
}
