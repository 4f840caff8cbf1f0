use super::catalog::{CATALOG, DEFAULT_TOPIC};

/// Maps a goal title to a catalog key.
///
/// Matching is a case-insensitive substring test against each catalog key in
/// declaration order; the first hit wins.
pub fn detect_topic(goal_title: &str) -> &'static str {
    let title = goal_title.to_lowercase();

    CATALOG
        .iter()
        .map(|template| template.key)
        .find(|key| title.contains(key))
        .unwrap_or(DEFAULT_TOPIC)
}
