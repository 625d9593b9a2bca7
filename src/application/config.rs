use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::domain::rules::{AnomalyRule, RuleError, RuleSet};
use crate::domain::value_objects::sensor::SensorKind;

/// Top-level application configuration loaded from TOML.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub general: GeneralConfig,
    #[serde(default)]
    pub rules: RulesConfig,
    #[serde(default)]
    pub notifications: NotificationConfig,
}

/// Feed settings: default CSV file and replay pacing.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeneralConfig {
    #[serde(default)]
    pub csv_path: Option<String>,
    #[serde(default = "default_replay_interval")]
    pub replay_interval_ms: u64,
    /// Forward empty CSV cells as missing readings instead of dropping them.
    #[serde(default)]
    pub keep_gaps: bool,
    #[serde(default = "default_queue_capacity")]
    pub queue_capacity: usize,
}

/// Window rule parameters, one block per sensor kind.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RulesConfig {
    #[serde(default = "default_smoker_rule")]
    pub smoker: RuleConfig,
    #[serde(default = "default_food_rule")]
    pub food: RuleConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RuleConfig {
    pub window_capacity: usize,
    pub delta_threshold: f64,
    pub max_elapsed_minutes: f64,
}

/// Notification channels: terminal, desktop, log file, webhook, SMS.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NotificationConfig {
    #[serde(default = "default_true")]
    pub terminal: bool,
    #[serde(default)]
    pub desktop: bool,
    #[serde(default)]
    pub log_file: Option<String>,
    #[serde(default)]
    pub webhook_url: Option<String>,
    #[serde(default)]
    pub sms: Option<SmsConfig>,
}

/// Twilio-style text message credentials.
#[derive(Clone, Serialize, Deserialize)]
pub struct SmsConfig {
    pub account_sid: String,
    pub auth_token: String,
    pub from_number: String,
    pub to_number: String,
    #[serde(default)]
    pub api_base: Option<String>,
}

// Keeps the auth token out of debug logs.
impl std::fmt::Debug for SmsConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SmsConfig")
            .field("account_sid", &self.account_sid)
            .field("auth_token", &"***")
            .field("from_number", &self.from_number)
            .field("to_number", &self.to_number)
            .field("api_base", &self.api_base)
            .finish()
    }
}

// --- Defaults ---

const fn default_replay_interval() -> u64 {
    1000
}

const fn default_queue_capacity() -> usize {
    64
}

const fn default_true() -> bool {
    true
}

fn default_smoker_rule() -> RuleConfig {
    RuleConfig::from(&AnomalyRule::smoker())
}

fn default_food_rule() -> RuleConfig {
    RuleConfig::from(&AnomalyRule::food())
}

// --- Default impls ---

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            csv_path: None,
            replay_interval_ms: default_replay_interval(),
            keep_gaps: false,
            queue_capacity: default_queue_capacity(),
        }
    }
}

impl Default for RulesConfig {
    fn default() -> Self {
        Self {
            smoker: default_smoker_rule(),
            food: default_food_rule(),
        }
    }
}

impl Default for NotificationConfig {
    fn default() -> Self {
        Self {
            terminal: default_true(),
            desktop: false,
            log_file: None,
            webhook_url: None,
            sms: None,
        }
    }
}

// --- AppConfig methods ---

impl AppConfig {
    /// Load config from default path or create default config file
    ///
    /// # Errors
    ///
    /// Returns an error if the config directory cannot be determined,
    /// the file cannot be read, or the TOML content is invalid.
    pub fn load() -> Result<Self> {
        let path = Self::config_path()?;
        Self::load_or_create(&path)
    }

    /// Load from a specific path, or create a default config file if missing
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read, the TOML content is invalid,
    /// or the default config file cannot be written.
    pub fn load_or_create(path: &Path) -> Result<Self> {
        if path.exists() {
            Self::load_from(path)
        } else {
            let config = Self::default();
            config.save_to(path)?;
            Ok(config)
        }
    }

    /// Load from a specific path
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or the TOML content is invalid.
    pub fn load_from(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).context("Failed to read config file")?;
        toml::from_str(&content).context("Failed to parse config file")
    }

    /// Save config to a specific path, creating parent directories if needed
    ///
    /// # Errors
    ///
    /// Returns an error if the directory cannot be created,
    /// serialization fails, or the file cannot be written.
    pub fn save_to(&self, path: &Path) -> Result<()> {
        let parent = path.parent().unwrap_or_else(|| Path::new("."));
        std::fs::create_dir_all(parent).context("Failed to create config directory")?;
        let content = toml::to_string_pretty(self).context("Failed to serialize config")?;
        std::fs::write(path, content).context("Failed to write config file")?;
        Ok(())
    }

    /// Build the validated rule set from the `[rules]` section.
    ///
    /// # Errors
    ///
    /// Returns `RuleError` if any rule block is out of range.
    pub fn rule_set(&self) -> Result<RuleSet, RuleError> {
        RuleSet::try_from(&self.rules)
    }

    fn config_path() -> Result<PathBuf> {
        let config_dir = dirs::config_dir().context("Could not determine config directory")?;
        Ok(config_dir.join("pitwatch").join("config.toml"))
    }
}

impl RuleConfig {
    fn to_rule(&self, name: &str, kind: SensorKind) -> Result<AnomalyRule, RuleError> {
        AnomalyRule::new(
            name,
            kind,
            self.window_capacity,
            self.delta_threshold,
            self.max_elapsed_minutes,
        )
    }
}

impl From<&AnomalyRule> for RuleConfig {
    fn from(rule: &AnomalyRule) -> Self {
        Self {
            window_capacity: rule.window_capacity(),
            delta_threshold: rule.delta_threshold(),
            max_elapsed_minutes: rule.max_elapsed_minutes(),
        }
    }
}

impl TryFrom<&RulesConfig> for RuleSet {
    type Error = RuleError;

    fn try_from(config: &RulesConfig) -> Result<Self, Self::Error> {
        Ok(Self::new(
            config.smoker.to_rule("smoker", SensorKind::Smoker)?,
            config.food.to_rule("food", SensorKind::Food)?,
        ))
    }
}
