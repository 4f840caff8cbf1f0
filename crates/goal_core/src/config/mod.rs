use crate::error::AppError;
use crate::model::{Intensity, Priority, canonical_label};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

const CONFIG_FILE_NAME: &str = "config.json";
const CONFIG_ENV_VAR: &str = "GOALTRACK_CONFIG_PATH";

#[derive(Debug, Clone)]
pub struct Palette {
    pub accent: &'static str,
    pub muted: &'static str,
    pub reset: &'static str,
}

impl Palette {
    pub fn accentize(&self, text: &str) -> String {
        if self.accent.is_empty() {
            text.to_string()
        } else {
            format!("{}{}{}", self.accent, text, self.reset)
        }
    }

    pub fn mutedize(&self, text: &str) -> String {
        if self.muted.is_empty() {
            text.to_string()
        } else {
            format!("{}{}{}", self.muted, text, self.reset)
        }
    }
}

pub fn palette_for_theme(theme: Option<&str>) -> Palette {
    match theme.map(canonical_theme_name).as_deref() {
        Some("noir") => Palette {
            accent: "\x1b[38;5;208m",
            muted: "\x1b[38;5;244m",
            reset: "\x1b[0m",
        },
        Some("solarized") => Palette {
            accent: "\x1b[38;5;108m",
            muted: "\x1b[38;5;246m",
            reset: "\x1b[0m",
        },
        _ => Palette {
            accent: "",
            muted: "",
            reset: "",
        },
    }
}

pub fn canonical_theme_name(raw: &str) -> String {
    match canonical_label(raw).as_str() {
        "" | "vanilla" | "light" => "default".to_string(),
        "dark" | "dark_mode" | "darkmode" => "noir".to_string(),
        other => other.to_string(),
    }
}

#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub theme: Option<String>,
    #[serde(default)]
    pub default_priority: Option<Priority>,
    #[serde(default)]
    pub default_intensity: Option<Intensity>,
    /// Tracing filter directive, e.g. `info` or `goal_core=debug`.
    #[serde(default)]
    pub log_level: Option<String>,
}

impl Config {
    pub fn priority(&self) -> Priority {
        self.default_priority.unwrap_or_default()
    }

    pub fn intensity(&self) -> Intensity {
        self.default_intensity.unwrap_or_default()
    }
}

#[derive(Debug, Clone)]
pub struct ConfigLoad {
    pub config: Config,
    pub error: Option<AppError>,
}

#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ConfigOverrides {
    pub theme: Option<String>,
    pub default_priority: Option<Priority>,
    pub default_intensity: Option<Intensity>,
    pub log_level: Option<String>,
}

pub fn config_path() -> Result<PathBuf, AppError> {
    if let Ok(path) = std::env::var(CONFIG_ENV_VAR)
        && !path.trim().is_empty()
    {
        return Ok(PathBuf::from(path));
    }

    if cfg!(windows) {
        let appdata =
            std::env::var("APPDATA").map_err(|_| AppError::invalid_data("APPDATA is not set"))?;
        Ok(PathBuf::from(appdata)
            .join("goaltrack")
            .join(CONFIG_FILE_NAME))
    } else {
        let home = std::env::var("HOME").map_err(|_| AppError::invalid_data("HOME is not set"))?;
        Ok(PathBuf::from(home)
            .join(".config")
            .join("goaltrack")
            .join(CONFIG_FILE_NAME))
    }
}

pub fn load_config() -> Result<Config, AppError> {
    let path = config_path()?;
    load_config_from_path(&path)
}

/// Loads the config file, falling back to defaults when it is missing or
/// unreadable. A broken file is reported through `ConfigLoad::error`.
pub fn load_config_with_fallback() -> ConfigLoad {
    match config_path() {
        Ok(path) => load_config_with_fallback_from_path(&path),
        Err(err) => ConfigLoad {
            config: Config::default(),
            error: Some(err),
        },
    }
}

fn load_config_with_fallback_from_path(path: &Path) -> ConfigLoad {
    if !path.exists() {
        return ConfigLoad {
            config: Config::default(),
            error: None,
        };
    }

    match load_config_from_path(path) {
        Ok(config) => ConfigLoad {
            config,
            error: None,
        },
        Err(err) => ConfigLoad {
            config: Config::default(),
            error: Some(err),
        },
    }
}

fn load_config_from_path(path: &Path) -> Result<Config, AppError> {
    let content = std::fs::read_to_string(path)
        .map_err(|err| AppError::io(format!("{}: {}", path.display(), err)))?;
    let mut config: Config = serde_json::from_str(&content).map_err(|err| {
        AppError::invalid_data(format!("invalid JSON in {}: {}", path.display(), err))
    })?;
    config.theme = config.theme.map(|name| canonical_theme_name(&name));
    Ok(config)
}

pub fn merge_overrides(base: &Config, overrides: &ConfigOverrides) -> Config {
    let mut merged = base.clone();
    if let Some(theme) = overrides.theme.as_ref() {
        merged.theme = Some(canonical_theme_name(theme));
    }
    if let Some(priority) = overrides.default_priority {
        merged.default_priority = Some(priority);
    }
    if let Some(intensity) = overrides.default_intensity {
        merged.default_intensity = Some(intensity);
    }
    if let Some(level) = overrides.log_level.as_ref() {
        merged.log_level = Some(level.clone());
    }
    merged
}

#[cfg(test)]
mod tests {
    use super::{
        Config, ConfigOverrides, canonical_theme_name, load_config_from_path,
        load_config_with_fallback_from_path, merge_overrides, palette_for_theme,
    };
    use crate::model::{Intensity, Priority};
    use std::fs;

    #[test]
    fn load_config_missing_returns_defaults_without_error() {
        let dir = tempfile::tempdir().unwrap();
        let result = load_config_with_fallback_from_path(&dir.path().join("missing.json"));

        assert_eq!(result.config, Config::default());
        assert!(result.error.is_none());
    }

    #[test]
    fn load_config_invalid_returns_defaults_and_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("invalid.json");
        fs::write(&path, "{ invalid json ").unwrap();

        let result = load_config_with_fallback_from_path(&path);

        assert_eq!(result.config, Config::default());
        assert_eq!(result.error.map(|err| err.code()), Some("invalid_data"));
    }

    #[test]
    fn load_config_reads_valid_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        let content = serde_json::json!({
            "theme": "Dark Mode",
            "default_priority": "High",
            "default_intensity": "Aggressive",
            "log_level": "debug"
        });
        fs::write(&path, serde_json::to_string(&content).unwrap()).unwrap();

        let loaded = load_config_from_path(&path).unwrap();

        assert_eq!(loaded.theme.as_deref(), Some("noir"));
        assert_eq!(loaded.priority(), Priority::High);
        assert_eq!(loaded.intensity(), Intensity::Aggressive);
        assert_eq!(loaded.log_level.as_deref(), Some("debug"));
    }

    #[test]
    fn defaults_are_medium_and_normal() {
        let config = Config::default();
        assert_eq!(config.priority(), Priority::Medium);
        assert_eq!(config.intensity(), Intensity::Normal);
    }

    #[test]
    fn merge_overrides_replaces_only_given_fields() {
        let base = Config {
            theme: Some("default".into()),
            default_priority: Some(Priority::Low),
            default_intensity: Some(Intensity::Light),
            log_level: Some("warn".into()),
        };
        let overrides = ConfigOverrides {
            theme: Some("Solarized".into()),
            default_intensity: Some(Intensity::Intense),
            ..ConfigOverrides::default()
        };

        let merged = merge_overrides(&base, &overrides);

        assert_eq!(merged.theme.as_deref(), Some("solarized"));
        assert_eq!(merged.default_priority, Some(Priority::Low));
        assert_eq!(merged.default_intensity, Some(Intensity::Intense));
        assert_eq!(merged.log_level.as_deref(), Some("warn"));
        assert_eq!(base.theme.as_deref(), Some("default"));
    }

    #[test]
    fn merge_overrides_with_empty_overrides_returns_clone() {
        let base = Config {
            theme: Some("noir".into()),
            ..Config::default()
        };

        assert_eq!(merge_overrides(&base, &ConfigOverrides::default()), base);
    }

    #[test]
    fn canonical_theme_name_maps_variants() {
        assert_eq!(canonical_theme_name("Vanilla"), "default");
        assert_eq!(canonical_theme_name("Noir"), "noir");
        assert_eq!(canonical_theme_name("dark-mode"), "noir");
        assert_eq!(canonical_theme_name("  "), "default");
    }

    #[test]
    fn palette_for_theme_returns_palette() {
        let plain = palette_for_theme(Some("vanilla"));
        assert!(plain.accent.is_empty());
        assert_eq!(plain.mutedize("locked"), "locked");

        let noir = palette_for_theme(Some("noir"));
        assert_eq!(noir.accent, "\x1b[38;5;208m");
        assert_eq!(noir.accentize("goal"), "\x1b[38;5;208mgoal\x1b[0m");

        assert!(palette_for_theme(Some("oceanic")).accent.is_empty());
        assert!(palette_for_theme(None).muted.is_empty());
    }
}
