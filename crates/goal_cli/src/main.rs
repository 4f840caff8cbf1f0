mod cli;

use clap::error::ErrorKind;
use clap::{CommandFactory, Parser};
use cli::{Cli, Command, ConfigOverrideTarget, GoalCommand, GoalSettings, TaskCommand};
use goal_core::config::{self, Config, ConfigLoad, ConfigOverrides, Palette};
use goal_core::error::AppError;
use goal_core::model::{Goal, GoalInput, TaskInput, TaskPatch, TaskStatus, TaskView};
use goal_core::{goal_api, task_api};
use serde::Serialize;
use std::io::{self, BufRead};
use tabled::settings::Style;
use tabled::{Table, Tabled};
use tracing_subscriber::EnvFilter;

const LOG_ENV_VAR: &str = "GOALTRACK_LOG";
const DEFAULT_LOG_LEVEL: &str = "warn";

#[derive(Tabled)]
struct GoalRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Title")]
    title: String,
    #[tabled(rename = "Weeks")]
    weeks: u32,
    #[tabled(rename = "Priority")]
    priority: String,
    #[tabled(rename = "Intensity")]
    intensity: String,
    #[tabled(rename = "Ends")]
    end_date: String,
}

#[derive(Tabled)]
struct TaskRow {
    #[tabled(rename = "Week")]
    week: u32,
    #[tabled(rename = "Day")]
    day: String,
    #[tabled(rename = "#")]
    order: u32,
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Title")]
    title: String,
    #[tabled(rename = "Status")]
    status: String,
    #[tabled(rename = "Lock")]
    lock: String,
}

fn print_json<T: Serialize>(value: &T) -> Result<(), AppError> {
    println!("{}", serde_json::to_string(value)?);
    Ok(())
}

fn print_table<T: Tabled>(rows: Vec<T>) {
    let mut table = Table::new(rows);
    table.with(Style::psql());
    println!("{table}");
}

fn goal_rows(goals: &[Goal], palette: &Palette) -> Vec<GoalRow> {
    goals
        .iter()
        .map(|goal| GoalRow {
            id: goal.id.clone(),
            title: palette.accentize(&goal.title),
            weeks: goal.duration_weeks,
            priority: goal.priority.to_string(),
            intensity: goal.intensity.to_string(),
            end_date: goal.end_date.clone(),
        })
        .collect()
}

fn task_rows(views: &[TaskView], palette: &Palette) -> Vec<TaskRow> {
    views
        .iter()
        .map(|view| {
            let task = &view.task;
            let shade = |text: &str| {
                if view.is_locked {
                    palette.mutedize(text)
                } else {
                    text.to_string()
                }
            };
            TaskRow {
                week: task.week_number,
                day: task
                    .day_number
                    .map(|day| day.to_string())
                    .unwrap_or_else(|| "-".to_string()),
                order: task.order,
                id: shade(&task.id),
                title: shade(&task.title),
                status: shade(task.status.label()),
                lock: shade(lock_label(view)),
            }
        })
        .collect()
}

fn lock_label(view: &TaskView) -> &'static str {
    if view.is_locked { "locked" } else { "open" }
}

fn print_tasks(views: &[TaskView], palette: &Palette) {
    if views.is_empty() {
        println!("No tasks.");
    } else {
        print_table(task_rows(views, palette));
    }
}

fn print_goal_plain(goal: &Goal, palette: &Palette) {
    println!("{}", palette.accentize(&goal.title));
    println!("  id:        {}", goal.id);
    println!("  weeks:     {}", goal.duration_weeks);
    println!("  priority:  {}", goal.priority);
    println!("  intensity: {}", goal.intensity);
    println!("  starts:    {}", goal.start_date);
    println!("  ends:      {}", goal.end_date);
}

fn print_task_plain(view: &TaskView) {
    let task = &view.task;
    println!("{} ({})", task.title, task.id);
    println!("  goal:    {}", task.goal_id);
    match task.day_number {
        Some(day) => println!("  week:    {} day {}", task.week_number, day),
        None => println!("  week:    {}", task.week_number),
    }
    println!("  order:   {}", task.order);
    println!("  status:  {} ({})", task.status, lock_label(view));
    if let Some(description) = task.description.as_deref() {
        println!("  about:   {description}");
    }
    if !task.dependencies.is_empty() {
        println!("  after:   {}", task.dependencies.join(", "));
    }
}

fn goal_input(title: String, settings: &GoalSettings, config: &Config) -> Result<GoalInput, AppError> {
    let priority = match settings.priority.as_deref() {
        Some(raw) => raw.parse()?,
        None => config.priority(),
    };
    let intensity = match settings.intensity.as_deref() {
        Some(raw) => raw.parse()?,
        None => config.intensity(),
    };
    Ok(GoalInput {
        title,
        duration_weeks: settings.weeks,
        priority,
        intensity,
    })
}

fn resolve_config(base: &Config, raw_overrides: &[String]) -> Result<Config, AppError> {
    let mut overrides = ConfigOverrides::default();
    for raw in raw_overrides {
        let parsed = cli::parse_config_override(raw).map_err(AppError::invalid_input)?;
        match parsed.target {
            ConfigOverrideTarget::Theme => overrides.theme = Some(parsed.value),
            ConfigOverrideTarget::DefaultPriority => {
                overrides.default_priority = Some(parsed.value.parse()?)
            }
            ConfigOverrideTarget::DefaultIntensity => {
                overrides.default_intensity = Some(parsed.value.parse()?)
            }
            ConfigOverrideTarget::LogLevel => overrides.log_level = Some(parsed.value),
        }
    }
    Ok(config::merge_overrides(base, &overrides))
}

/// Logging is configured once at startup, so a shell line cannot change it.
fn check_shell_flags(cli: &Cli) -> Result<(), AppError> {
    if cli.verbose {
        return Err(AppError::invalid_input(
            "--verbose only applies when starting goaltrack",
        ));
    }
    let sets_log_level = cli.config_override.iter().any(|raw| {
        cli::parse_config_override(raw)
            .is_ok_and(|parsed| parsed.target == ConfigOverrideTarget::LogLevel)
    });
    if sets_log_level {
        return Err(AppError::invalid_input(
            "log_level only applies when starting goaltrack",
        ));
    }
    Ok(())
}

fn init_tracing(verbose: bool, log_level: Option<&str>) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_env(LOG_ENV_VAR)
            .or_else(|_| EnvFilter::try_new(log_level.unwrap_or(DEFAULT_LOG_LEVEL)))
            .unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_LEVEL))
    };

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_writer(io::stderr)
        .try_init();
}

fn report_config_error(loaded: &ConfigLoad) {
    if let Some(err) = loaded.error.as_ref() {
        tracing::warn!(error = %err, "ignoring unreadable config, using defaults");
    }
}

fn normalize_parse_error(err: clap::Error) -> AppError {
    let rendered = err.to_string();
    let first_line = rendered.lines().next().unwrap_or("invalid command").trim();
    let message = first_line
        .strip_prefix("error: ")
        .unwrap_or(first_line)
        .to_string();
    AppError::invalid_input(message)
}

fn is_informational(err: &clap::Error) -> bool {
    matches!(err.kind(), ErrorKind::DisplayHelp | ErrorKind::DisplayVersion)
}

fn split_command_line(line: &str) -> Result<Vec<String>, AppError> {
    let mut args = Vec::new();
    let mut current = String::new();
    let mut in_quotes = false;
    let mut escape = false;

    for ch in line.chars() {
        if escape {
            if ch != '"' && ch != '\\' {
                current.push('\\');
            }
            current.push(ch);
            escape = false;
            continue;
        }

        if in_quotes && ch == '\\' {
            escape = true;
            continue;
        }

        if ch == '"' {
            in_quotes = !in_quotes;
            continue;
        }

        if ch.is_whitespace() && !in_quotes {
            if !current.is_empty() {
                args.push(std::mem::take(&mut current));
            }
            continue;
        }

        current.push(ch);
    }

    if in_quotes {
        return Err(AppError::invalid_input("unterminated quote in command"));
    }

    if !current.is_empty() {
        args.push(current);
    }

    Ok(args)
}

fn print_help() {
    let mut cmd = Cli::command();
    let help = cmd.render_help();
    println!("{help}");
}

fn run_goal_command(command: GoalCommand, json: bool, config: &Config) -> Result<(), AppError> {
    let palette = config::palette_for_theme(config.theme.as_deref());

    match command {
        GoalCommand::Add { title, settings } => {
            let goal = goal_api::create_goal(&goal_input(title, &settings, config)?)?;
            if json {
                print_json(&goal)?;
            } else {
                println!("Created goal: {} ({})", palette.accentize(&goal.title), goal.id);
            }
        }
        GoalCommand::List => {
            let goals = goal_api::list_goals()?;
            if json {
                print_json(&goals)?;
            } else if goals.is_empty() {
                println!("No goals yet.");
            } else {
                print_table(goal_rows(&goals, &palette));
            }
        }
        GoalCommand::Show { id } => {
            let goal = goal_api::get_goal(&id)?;
            if json {
                print_json(&goal)?;
            } else {
                print_goal_plain(&goal, &palette);
            }
        }
        GoalCommand::Update {
            id,
            title,
            settings,
        } => {
            let goal = goal_api::update_goal(&id, &goal_input(title, &settings, config)?)?;
            if json {
                print_json(&goal)?;
            } else {
                println!("Updated goal: {} ({})", palette.accentize(&goal.title), goal.id);
            }
        }
        GoalCommand::Delete { id } => {
            let deleted = goal_api::delete_goal(&id)?;
            if json {
                print_json(&deleted)?;
            } else {
                println!(
                    "Deleted goal: {} ({}) and {} task(s)",
                    deleted.goal.title, deleted.goal.id, deleted.deleted_tasks_count
                );
            }
        }
        GoalCommand::Plan { id } => {
            let plan = task_api::generate_tasks(&id)?;
            if json {
                print_json(&plan)?;
            } else {
                println!(
                    "Planned {} task(s) for {} [{}]",
                    plan.tasks.len(),
                    palette.accentize(&plan.goal.title),
                    goal_core::detect_topic(&plan.goal.title)
                );
                print_tasks(&plan.tasks, &palette);
            }
        }
        GoalCommand::Progress { id } => {
            let progress = task_api::goal_progress(&id)?;
            if json {
                print_json(&progress)?;
            } else {
                println!(
                    "{}/{} completed ({}%), {} in progress, {} ready to start",
                    progress.completed,
                    progress.total,
                    progress.percent_complete,
                    progress.in_progress,
                    progress.unlocked_pending
                );
            }
        }
    }

    Ok(())
}

fn print_task_change(verb: &str, view: &TaskView, json: bool) -> Result<(), AppError> {
    if json {
        print_json(view)?;
    } else {
        println!(
            "{verb} task: {} ({}) [{}, {}]",
            view.task.title,
            view.task.id,
            view.task.status,
            lock_label(view)
        );
    }
    Ok(())
}

fn run_task_command(command: TaskCommand, json: bool, config: &Config) -> Result<(), AppError> {
    let palette = config::palette_for_theme(config.theme.as_deref());

    match command {
        TaskCommand::List { goal_id, week } => {
            let listed = task_api::list_tasks(&goal_id)?;
            match week {
                Some(week) => {
                    let views = listed.weeks.get(&week).cloned().unwrap_or_default();
                    if json {
                        print_json(&views)?;
                    } else {
                        print_tasks(&views, &palette);
                    }
                }
                None => {
                    if json {
                        print_json(&listed)?;
                    } else {
                        print_tasks(&listed.tasks, &palette);
                    }
                }
            }
        }
        TaskCommand::Show { id } => {
            let view = task_api::get_task(&id)?;
            if json {
                print_json(&view)?;
            } else {
                print_task_plain(&view);
            }
        }
        TaskCommand::Add {
            goal_id,
            title,
            week,
            day,
            description,
            depends_on,
            order,
        } => {
            let input = TaskInput {
                week_number: week,
                day_number: day,
                title,
                description,
                dependencies: depends_on,
                order,
            };
            let view = task_api::create_task(&goal_id, &input)?;
            print_task_change("Added", &view, json)?;
        }
        TaskCommand::Update {
            id,
            title,
            description,
            clear_description,
            status,
            depends_on,
            clear_dependencies,
            order,
            week,
            day,
            clear_day,
        } => {
            let dependencies = if clear_dependencies {
                Some(Vec::new())
            } else if depends_on.is_empty() {
                None
            } else {
                Some(depends_on)
            };
            let patch = TaskPatch {
                title,
                description,
                status: status.as_deref().map(str::parse::<TaskStatus>).transpose()?,
                dependencies,
                order,
                week_number: week,
                day_number: day,
                clear_description,
                clear_day,
            };
            let view = task_api::update_task(&id, &patch)?;
            print_task_change("Updated", &view, json)?;
        }
        TaskCommand::Delete { id } => {
            let task = task_api::delete_task(&id)?;
            if json {
                print_json(&task)?;
            } else {
                println!("Deleted task: {} ({})", task.title, task.id);
            }
        }
        TaskCommand::Done { id } => {
            let view = task_api::set_task_status(&id, TaskStatus::Completed)?;
            print_task_change("Completed", &view, json)?;
        }
        TaskCommand::Start { id } => {
            let view = task_api::set_task_status(&id, TaskStatus::InProgress)?;
            print_task_change("Started", &view, json)?;
        }
        TaskCommand::Reset { id } => {
            let view = task_api::set_task_status(&id, TaskStatus::NotStarted)?;
            print_task_change("Reset", &view, json)?;
        }
        TaskCommand::Reorder { goal_id, moves } => {
            let outcome = task_api::reorder_tasks(&goal_id, &moves)?;
            if json {
                print_json(&outcome)?;
            } else {
                println!("Reordered {} task(s)", outcome.updated_count);
                print_tasks(&outcome.tasks, &palette);
            }
        }
    }

    Ok(())
}

fn run_command(cli: Cli, base: &Config) -> Result<(), AppError> {
    let config = resolve_config(base, &cli.config_override)?;

    match cli.command {
        Command::Goal(command) => run_goal_command(command, cli.json, &config)?,
        Command::Task(command) => run_task_command(command, cli.json, &config)?,
        Command::Topic { title } => {
            let topic = goal_core::detect_topic(&title);
            if cli.json {
                print_json(&serde_json::json!({ "title": title, "topic": topic }))?;
            } else {
                println!("{topic}");
            }
        }
    }

    Ok(())
}

fn run_interactive(config: &Config) -> Result<(), AppError> {
    let mut input = String::new();
    let stdin = io::stdin();
    let mut stdin_lock = stdin.lock();

    loop {
        input.clear();
        let bytes = stdin_lock
            .read_line(&mut input)
            .map_err(|err| AppError::io(err.to_string()))?;

        if bytes == 0 {
            break;
        }

        let line = input.trim();
        if line.is_empty() {
            continue;
        }

        if line.eq_ignore_ascii_case("exit") || line.eq_ignore_ascii_case("quit") {
            break;
        }

        if line == "help" || line == "?" {
            print_help();
            continue;
        }

        let args = match split_command_line(line) {
            Ok(args) => args,
            Err(err) => {
                eprintln!("ERROR: {}", err);
                continue;
            }
        };

        if args.is_empty() {
            continue;
        }

        let mut argv = Vec::with_capacity(args.len() + 1);
        argv.push("goaltrack".to_string());
        argv.extend(args);

        let cli = match Cli::try_parse_from(argv) {
            Ok(cli) => cli,
            Err(err) if is_informational(&err) => {
                println!("{err}");
                continue;
            }
            Err(err) => {
                eprintln!("ERROR: {}", normalize_parse_error(err));
                continue;
            }
        };

        if let Err(err) = check_shell_flags(&cli).and_then(|()| run_command(cli, config)) {
            eprintln!("ERROR: {}", err);
        }
    }

    Ok(())
}

fn main() {
    let loaded = config::load_config_with_fallback();

    let mut args = std::env::args_os();
    args.next();
    if args.next().is_none() {
        init_tracing(false, loaded.config.log_level.as_deref());
        report_config_error(&loaded);
        if let Err(err) = run_interactive(&loaded.config) {
            eprintln!("ERROR: {}", err);
            std::process::exit(1);
        }
        return;
    }

    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(err) if is_informational(&err) => err.exit(),
        Err(err) => {
            eprintln!("ERROR: {}", normalize_parse_error(err));
            std::process::exit(1);
        }
    };

    let log_level = resolve_config(&loaded.config, &cli.config_override)
        .ok()
        .and_then(|config| config.log_level);
    init_tracing(cli.verbose, log_level.as_deref());
    report_config_error(&loaded);

    if let Err(err) = run_command(cli, &loaded.config) {
        eprintln!("ERROR: {}", err);
        std::process::exit(1);
    }
}
