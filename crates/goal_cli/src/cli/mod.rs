use clap::{Args, Parser, Subcommand};
use goal_core::model::{TaskReorder, canonical_label};

pub const DEFAULT_GOAL_WEEKS: u32 = 4;

#[derive(Parser, Debug)]
#[command(name = "goaltrack", author, version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Output JSON
    #[arg(long, global = true)]
    pub json: bool,

    /// Log engine decisions to stderr
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Override configuration values (format KEY=VALUE)
    #[arg(long = "config-override", value_name = "KEY=VALUE", global = true)]
    pub config_override: Vec<String>,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Manage goals
    #[command(subcommand)]
    Goal(GoalCommand),
    /// Manage the tasks of a goal
    #[command(subcommand)]
    Task(TaskCommand),
    /// Show which topic template a goal title maps to
    ///
    /// Example: goaltrack topic "Learn React in a month"
    Topic { title: String },
}

#[derive(Subcommand, Debug)]
pub enum GoalCommand {
    /// Create a goal
    ///
    /// Example: goaltrack goal add "Learn Python" --weeks 6 --intensity aggressive
    Add {
        title: String,
        #[command(flatten)]
        settings: GoalSettings,
    },
    /// List all goals
    List,
    /// Show a goal
    Show { id: String },
    /// Replace a goal's title and settings
    ///
    /// Example: goaltrack goal update <id> "Learn Rust" --weeks 8
    Update {
        id: String,
        title: String,
        #[command(flatten)]
        settings: GoalSettings,
    },
    /// Delete a goal and all of its tasks
    Delete { id: String },
    /// Break a goal into weekly chained tasks, replacing any existing ones
    ///
    /// Example: goaltrack goal plan <id>
    Plan { id: String },
    /// Summarize task progress for a goal
    Progress { id: String },
}

#[derive(Args, Debug, Clone)]
pub struct GoalSettings {
    /// Duration in weeks
    #[arg(long, default_value_t = DEFAULT_GOAL_WEEKS)]
    pub weeks: u32,
    /// Low, Medium or High (defaults to the configured priority)
    #[arg(long)]
    pub priority: Option<String>,
    /// Light, Normal, Aggressive, Relaxed or Intense (defaults to the configured intensity)
    #[arg(long)]
    pub intensity: Option<String>,
}

#[derive(Subcommand, Debug)]
pub enum TaskCommand {
    /// List a goal's tasks with their lock status
    ///
    /// Example: goaltrack task list <goal-id> --week 2
    List {
        goal_id: String,
        #[arg(long)]
        week: Option<u32>,
    },
    /// Show a task
    Show { id: String },
    /// Add a custom task to a goal
    ///
    /// Example: goaltrack task add <goal-id> "Build a CLI" --week 3 --depends-on <task-id>
    Add {
        goal_id: String,
        title: String,
        #[arg(long)]
        week: u32,
        #[arg(long)]
        day: Option<u32>,
        #[arg(long)]
        description: Option<String>,
        #[arg(long = "depends-on", value_name = "TASK_ID")]
        depends_on: Vec<String>,
        #[arg(long, default_value_t = 0)]
        order: u32,
    },
    /// Update fields of a task
    ///
    /// Example: goaltrack task update <id> --status "in progress"
    Update {
        id: String,
        #[arg(long)]
        title: Option<String>,
        #[arg(long, conflicts_with = "clear_description")]
        description: Option<String>,
        /// Remove the description
        #[arg(long)]
        clear_description: bool,
        #[arg(long)]
        status: Option<String>,
        #[arg(long = "depends-on", value_name = "TASK_ID", conflicts_with = "clear_dependencies")]
        depends_on: Vec<String>,
        /// Remove every dependency
        #[arg(long)]
        clear_dependencies: bool,
        #[arg(long)]
        order: Option<u32>,
        #[arg(long)]
        week: Option<u32>,
        #[arg(long, conflicts_with = "clear_day")]
        day: Option<u32>,
        /// Remove the day within the week
        #[arg(long)]
        clear_day: bool,
    },
    /// Delete a task nothing depends on
    Delete { id: String },
    /// Mark a task as completed
    Done { id: String },
    /// Mark a task as in progress
    Start { id: String },
    /// Move a task back to not started
    Reset { id: String },
    /// Move tasks within a goal
    ///
    /// Example: goaltrack task reorder <goal-id> <task-id>:2 <task-id>:0:3
    Reorder {
        goal_id: String,
        #[arg(value_name = "TASK_ID:ORDER[:WEEK]", required = true, value_parser = parse_reorder_entry)]
        moves: Vec<TaskReorder>,
    },
}

/// Parse `TASK_ID:ORDER` or `TASK_ID:ORDER:WEEK`.
pub fn parse_reorder_entry(raw: &str) -> Result<TaskReorder, String> {
    let mut parts = raw.trim().split(':');
    let task_id = parts
        .next()
        .map(str::trim)
        .filter(|id| !id.is_empty())
        .ok_or_else(|| "reorder entry requires a task id".to_string())?;
    let new_order = parts
        .next()
        .ok_or_else(|| format!("'{raw}' must be TASK_ID:ORDER[:WEEK]"))?
        .trim()
        .parse::<u32>()
        .map_err(|_| format!("invalid order in '{raw}'"))?;
    let new_week_number = match parts.next() {
        Some(week) => Some(
            week.trim()
                .parse::<u32>()
                .map_err(|_| format!("invalid week in '{raw}'"))?,
        ),
        None => None,
    };
    if parts.next().is_some() {
        return Err(format!("'{raw}' must be TASK_ID:ORDER[:WEEK]"));
    }

    Ok(TaskReorder {
        task_id: task_id.to_string(),
        new_order,
        new_week_number,
    })
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigOverrideTarget {
    Theme,
    DefaultPriority,
    DefaultIntensity,
    LogLevel,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedConfigOverride {
    pub target: ConfigOverrideTarget,
    pub value: String,
}

/// Parse a raw `KEY=VALUE` override string into a structured target.
pub fn parse_config_override(raw: &str) -> Result<ParsedConfigOverride, String> {
    let trimmed = raw.trim();
    let (key_raw, value_raw) = trimmed
        .split_once('=')
        .ok_or_else(|| "override must be in KEY=VALUE format".to_string())?;

    let value = value_raw.trim().to_string();
    let field = canonical_label(key_raw);
    if field.is_empty() {
        return Err("override key cannot be empty".to_string());
    }

    let target = match field.as_str() {
        "theme" => ConfigOverrideTarget::Theme,
        "default_priority" | "priority" => ConfigOverrideTarget::DefaultPriority,
        "default_intensity" | "intensity" => ConfigOverrideTarget::DefaultIntensity,
        "log_level" | "log" => ConfigOverrideTarget::LogLevel,
        other => return Err(format!("unknown config field '{other}'")),
    };

    if value.is_empty() {
        return Err(format!("override for '{field}' needs a value"));
    }

    Ok(ParsedConfigOverride { target, value })
}
