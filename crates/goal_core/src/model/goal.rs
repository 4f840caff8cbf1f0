use super::canonical_label;
use crate::error::AppError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Goal {
    pub id: String,
    pub title: String,
    pub duration_weeks: u32,
    pub priority: Priority,
    pub intensity: Intensity,
    pub start_date: String,
    pub end_date: String,
    pub created_at: String,
}

/// Fields a caller supplies when creating or fully replacing a goal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GoalInput {
    pub title: String,
    pub duration_weeks: u32,
    pub priority: Priority,
    pub intensity: Intensity,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Priority {
    Low,
    #[default]
    Medium,
    High,
}

impl Priority {
    pub fn label(self) -> &'static str {
        match self {
            Self::Low => "Low",
            Self::Medium => "Medium",
            Self::High => "High",
        }
    }
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for Priority {
    type Err = AppError;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        match canonical_label(raw).as_str() {
            "low" => Ok(Self::Low),
            "medium" => Ok(Self::Medium),
            "high" => Ok(Self::High),
            _ => Err(AppError::invalid_input(format!(
                "unknown priority '{}' (expected Low, Medium or High)",
                raw.trim()
            ))),
        }
    }
}

/// How hard a goal is pursued. `Relaxed` and `Intense` pace like `Light`
/// and `Aggressive`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Intensity {
    Light,
    #[default]
    Normal,
    Aggressive,
    Relaxed,
    Intense,
}

impl Intensity {
    pub fn label(self) -> &'static str {
        match self {
            Self::Light => "Light",
            Self::Normal => "Normal",
            Self::Aggressive => "Aggressive",
            Self::Relaxed => "Relaxed",
            Self::Intense => "Intense",
        }
    }
}

impl fmt::Display for Intensity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for Intensity {
    type Err = AppError;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        match canonical_label(raw).as_str() {
            "light" => Ok(Self::Light),
            "normal" => Ok(Self::Normal),
            "aggressive" => Ok(Self::Aggressive),
            "relaxed" => Ok(Self::Relaxed),
            "intense" => Ok(Self::Intense),
            _ => Err(AppError::invalid_input(format!(
                "unknown intensity '{}' (expected Light, Normal or Aggressive)",
                raw.trim()
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{Intensity, Priority};

    #[test]
    fn intensity_labels_round_trip_through_display() {
        assert_eq!(Intensity::Relaxed.to_string(), "Relaxed");
        assert_eq!(Intensity::default(), Intensity::Normal);
    }

    #[test]
    fn intensity_parses_case_insensitively() {
        assert_eq!("aggressive".parse::<Intensity>().unwrap(), Intensity::Aggressive);
        assert_eq!(" RELAXED ".parse::<Intensity>().unwrap(), Intensity::Relaxed);
        assert_eq!("turbo".parse::<Intensity>().unwrap_err().code(), "invalid_input");
    }

    #[test]
    fn priority_serializes_as_label() {
        let json = serde_json::to_string(&Priority::High).unwrap();
        assert_eq!(json, "\"High\"");
        assert_eq!("low".parse::<Priority>().unwrap(), Priority::Low);
    }
}
