// File: ./src/config.rs
// Handles configuration loading, saving, and defaults.
use crate::context::AppContext;
use crate::history::DEFAULT_HISTORY_PAIRS;
use crate::model::merge::CalendarOptions;
use crate::model::recognizer::ScanLimits;
use anyhow::{Context, Error, Result};
use serde::{Deserialize, Serialize};
use std::fs;

pub const DEFAULT_API_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";

fn default_model() -> String {
    "gemini-2.5-flash".to_string()
}
fn default_api_base_url() -> String {
    DEFAULT_API_BASE_URL.to_string()
}
fn default_api_key_env() -> String {
    "GOOGLE_API_KEY".to_string()
}

fn default_temperature() -> f32 {
    0.7
}
fn default_request_timeout() -> u64 {
    120
}

fn default_history_pairs() -> usize {
    DEFAULT_HISTORY_PAIRS
}

fn default_title_limit() -> usize {
    150
}
fn default_description_limit() -> usize {
    100
}
fn default_event_limit() -> usize {
    80
}

fn default_log_level() -> String {
    "info".to_string()
}

#[derive(Deserialize, Serialize, Clone, Debug, PartialEq)]
pub struct Config {
    #[serde(default = "default_model")]
    pub model: String,
    #[serde(default = "default_api_base_url")]
    pub api_base_url: String,
    /// Environment variable consulted when `api_key` is not set inline.
    #[serde(default = "default_api_key_env")]
    pub api_key_env: String,
    #[serde(default)]
    pub api_key: Option<String>,
    #[serde(default = "default_temperature")]
    pub temperature: f32,
    #[serde(default = "default_request_timeout")]
    pub request_timeout_secs: u64,

    #[serde(default = "default_history_pairs")]
    pub history_pairs: usize,
    #[serde(default)]
    pub dedupe_todos: bool,
    #[serde(default)]
    pub include_timestamp_placeholders: bool,

    #[serde(default = "default_title_limit")]
    pub title_limit: usize,
    #[serde(default = "default_description_limit")]
    pub description_limit: usize,
    #[serde(default = "default_event_limit")]
    pub event_limit: usize,

    #[serde(default = "default_log_level")]
    pub log_level: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            model: default_model(),
            api_base_url: default_api_base_url(),
            api_key_env: default_api_key_env(),
            api_key: None,
            temperature: default_temperature(),
            request_timeout_secs: default_request_timeout(),
            history_pairs: default_history_pairs(),
            dedupe_todos: false,
            include_timestamp_placeholders: false,
            title_limit: default_title_limit(),
            description_limit: default_description_limit(),
            event_limit: default_event_limit(),
            log_level: default_log_level(),
        }
    }
}

impl Config {
    /// Load the configuration from disk using an explicit context.
    pub fn load(ctx: &dyn AppContext) -> Result<Self> {
        let path = ctx.get_config_file_path()?;

        if !path.exists() {
            return Err(anyhow::anyhow!("Config file not found"));
        }

        let contents = fs::read_to_string(&path).map_err(|e| {
            anyhow::anyhow!("Failed to read config file '{}': {}", path.display(), e)
        })?;

        let config: Config = toml::from_str(&contents).map_err(|e| {
            anyhow::anyhow!("Failed to parse config file '{}': {}", path.display(), e)
        })?;

        Ok(config)
    }

    /// Like `load`, but a missing file yields the defaults. Parse errors still propagate.
    pub fn load_or_default(ctx: &dyn AppContext) -> Result<Self> {
        match Self::load(ctx) {
            Ok(cfg) => Ok(cfg),
            Err(e) if Self::is_missing_config_error(&e) => {
                log::debug!("No config file, using defaults");
                Ok(Self::default())
            }
            Err(e) => Err(e),
        }
    }

    /// Detects whether an error means the config file was missing, either through
    /// the explicit message or an io NotFound anywhere in the chain.
    pub fn is_missing_config_error(err: &Error) -> bool {
        if err.to_string().contains("Config file not found") {
            return true;
        }

        for cause in err.chain() {
            if let Some(io_err) = cause.downcast_ref::<std::io::Error>()
                && io_err.kind() == std::io::ErrorKind::NotFound
            {
                return true;
            }
        }

        false
    }

    /// Save configuration using an explicit context. Writes to a sibling temp
    /// file first and renames it into place.
    pub fn save(&self, ctx: &dyn AppContext) -> Result<()> {
        let path = ctx.get_config_file_path()?;
        let toml_str = toml::to_string_pretty(self)?;
        let tmp = path.with_extension("toml.tmp");
        fs::write(&tmp, toml_str)
            .with_context(|| format!("Failed to write config file '{}'", tmp.display()))?;
        fs::rename(&tmp, &path)
            .with_context(|| format!("Failed to replace config file '{}'", path.display()))?;
        Ok(())
    }

    /// Inline key first, then the configured environment variable.
    pub fn resolve_api_key(&self) -> Result<String> {
        if let Some(key) = self.api_key.as_deref()
            && !key.trim().is_empty()
        {
            return Ok(key.trim().to_string());
        }
        match std::env::var(&self.api_key_env) {
            Ok(key) if !key.trim().is_empty() => Ok(key.trim().to_string()),
            _ => anyhow::bail!("{} environment variable not set", self.api_key_env),
        }
    }

    pub fn scan_limits(&self) -> ScanLimits {
        ScanLimits {
            description: self.description_limit,
            event: self.event_limit,
        }
    }

    pub fn calendar_options(&self) -> CalendarOptions {
        CalendarOptions {
            title_limit: self.title_limit,
            include_placeholders: self.include_timestamp_placeholders,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::TestContext;

    #[test]
    fn test_partial_file_fills_defaults() {
        let cfg: Config = toml::from_str("model = \"gemini-pro\"\ndedupe_todos = true\n").unwrap();
        assert_eq!(cfg.model, "gemini-pro");
        assert!(cfg.dedupe_todos);
        assert_eq!(cfg.history_pairs, 10);
        assert_eq!(cfg.title_limit, 150);
        assert_eq!(cfg.api_key_env, "GOOGLE_API_KEY");
    }

    #[test]
    fn test_missing_file_is_detected() {
        let ctx = TestContext::new();
        let err = Config::load(&ctx).unwrap_err();
        assert!(Config::is_missing_config_error(&err));
        assert_eq!(Config::load_or_default(&ctx).unwrap(), Config::default());
    }

    #[test]
    fn test_save_then_load() {
        let ctx = TestContext::new();
        let cfg = Config {
            temperature: 0.2,
            include_timestamp_placeholders: true,
            ..Config::default()
        };
        cfg.save(&ctx).unwrap();
        assert_eq!(Config::load(&ctx).unwrap(), cfg);
    }

    #[test]
    fn test_bad_toml_is_not_a_missing_file() {
        let ctx = TestContext::new();
        let path = ctx.get_config_file_path().unwrap();
        fs::write(&path, "model = [").unwrap();
        let err = Config::load_or_default(&ctx).unwrap_err();
        assert!(!Config::is_missing_config_error(&err));
    }

    #[test]
    fn test_inline_key_wins() {
        let cfg = Config {
            api_key: Some(" abc ".into()),
            api_key_env: "TEAMSYNC_UNUSED_KEY_VAR".into(),
            ..Config::default()
        };
        assert_eq!(cfg.resolve_api_key().unwrap(), "abc");
    }
}
