use std::env;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use tracing::warn;

/// How a schedule's weekly pattern is laid onto calendar dates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SlotExpansion {
    /// Every session lands on the schedule's start date.
    #[default]
    AnchorToStartDate,
    /// Sessions repeat on every date in the span whose weekday matches the day schedule.
    RepeatWeekly,
}

impl fmt::Display for SlotExpansion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SlotExpansion::AnchorToStartDate => write!(f, "anchored"),
            SlotExpansion::RepeatWeekly => write!(f, "weekly"),
        }
    }
}

impl FromStr for SlotExpansion {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "anchored" | "anchor" | "start_date" => Ok(SlotExpansion::AnchorToStartDate),
            "weekly" | "repeat_weekly" => Ok(SlotExpansion::RepeatWeekly),
            other => Err(format!("unknown slot expansion mode: {}", other)),
        }
    }
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub slot_expansion: SlotExpansion,
    pub log_filter: String,
    pub seed_file: Option<String>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            slot_expansion: SlotExpansion::default(),
            log_filter: "info".to_string(),
            seed_file: None,
        }
    }
}

impl AppConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds the config from an arbitrary variable source. Missing or
    /// malformed values fall back to defaults with a warning.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();

        let slot_expansion = match lookup("SLOT_EXPANSION") {
            Some(raw) => raw.parse().unwrap_or_else(|e: String| {
                warn!("{}, using {}", e, defaults.slot_expansion);
                defaults.slot_expansion
            }),
            None => {
                warn!("SLOT_EXPANSION not set, using {}", defaults.slot_expansion);
                defaults.slot_expansion
            }
        };

        // RUST_LOG overrides LOG_FILTER.
        let log_filter = ["RUST_LOG", "LOG_FILTER"]
            .iter()
            .filter_map(|key| lookup(key))
            .find(|value| !value.trim().is_empty())
            .unwrap_or_else(|| defaults.log_filter.clone());

        let seed_file = lookup("CLINIC_SEED_FILE").filter(|value| !value.trim().is_empty());

        Self {
            slot_expansion,
            log_filter,
            seed_file,
        }
    }

    pub fn with_slot_expansion(mut self, slot_expansion: SlotExpansion) -> Self {
        self.slot_expansion = slot_expansion;
        self
    }

    pub fn has_seed_file(&self) -> bool {
        self.seed_file.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| vars.get(key).cloned()
    }

    #[test]
    fn test_defaults_when_nothing_is_set() {
        let config = AppConfig::from_lookup(lookup_from(&[]));

        assert_eq!(config.slot_expansion, SlotExpansion::AnchorToStartDate);
        assert_eq!(config.log_filter, "info");
        assert!(!config.has_seed_file());
    }

    #[test]
    fn test_weekly_expansion_is_parsed() {
        let config = AppConfig::from_lookup(lookup_from(&[
            ("SLOT_EXPANSION", "Weekly"),
            ("LOG_FILTER", "debug"),
            ("CLINIC_SEED_FILE", "/tmp/seed.json"),
        ]));

        assert_eq!(config.slot_expansion, SlotExpansion::RepeatWeekly);
        assert_eq!(config.log_filter, "debug");
        assert_eq!(config.seed_file.as_deref(), Some("/tmp/seed.json"));
    }

    #[test]
    fn test_unknown_expansion_falls_back() {
        let config = AppConfig::from_lookup(lookup_from(&[("SLOT_EXPANSION", "monthly")]));
        assert_eq!(config.slot_expansion, SlotExpansion::AnchorToStartDate);
    }

    #[test]
    fn test_rust_log_takes_precedence_over_log_filter() {
        let config = AppConfig::from_lookup(lookup_from(&[
            ("RUST_LOG", "warn,doctor_cell=trace"),
            ("LOG_FILTER", "debug"),
        ]));
        assert_eq!(config.log_filter, "warn,doctor_cell=trace");

        let config = AppConfig::from_lookup(lookup_from(&[("RUST_LOG", " "), ("LOG_FILTER", "debug")]));
        assert_eq!(config.log_filter, "debug");
    }
}
