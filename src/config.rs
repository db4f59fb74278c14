use anyhow::{Context, Result};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;

/// Canonical default reminder offset in minutes. The surrounding app
/// historically used both 10 and 15 in different places; 10 is the value
/// the natural-language path uses everywhere.
pub const DEFAULT_REMINDER_MINUTES: u32 = 10;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub parser: ParserConfig,
    #[serde(default)]
    pub language_model: LanguageModelConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ParserConfig {
    /// Reminder offset applied when the message does not specify one.
    pub default_reminder_minutes: u32,
}

impl Default for ParserConfig {
    fn default() -> Self {
        Self { default_reminder_minutes: DEFAULT_REMINDER_MINUTES }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "lowercase")]
pub enum Provider {
    HuggingFace,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LanguageModelConfig {
    /// `None` disables enrichment entirely; the rule-based parser runs alone.
    pub provider: Option<Provider>,
    /// Hosted text-generation model id used for enrichment.
    pub model: String,
    /// Upper bound for a single enrichment request; on expiry the
    /// rule-based result is returned instead.
    pub request_timeout_secs: u64,
}

impl Default for LanguageModelConfig {
    fn default() -> Self {
        Self {
            provider: None,
            model: "mistralai/Mistral-7B-Instruct-v0.2".to_string(),
            request_timeout_secs: 10,
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self { parser: ParserConfig::default(), language_model: LanguageModelConfig::default() }
    }
}

impl Config {
    pub fn load() -> Result<Self> {
        let config_path = get_config_path()?;

        // If config doesn't exist, create default
        if !config_path.exists() {
            let default_config = Config::default();
            default_config.save()?;
            return Ok(default_config);
        }

        let content = fs::read_to_string(&config_path).context("Failed to read config file")?;
        toml::from_str(&content).context("Failed to parse config file")
    }

    pub fn save(&self) -> Result<()> {
        let config_path = get_config_path()?;

        if let Some(parent) = config_path.parent() {
            fs::create_dir_all(parent)?;
        }

        let content = toml::to_string_pretty(self)?;
        fs::write(&config_path, content).context("Failed to write config file")?;

        Ok(())
    }
}

fn get_config_path() -> Result<PathBuf> {
    let proj_dirs = ProjectDirs::from("com", "taskdraft", "taskdraft")
        .context("Failed to determine config directory")?;

    Ok(proj_dirs.config_dir().join("config.toml"))
}
