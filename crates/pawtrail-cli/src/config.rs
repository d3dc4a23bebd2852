//! Configuration management for the CLI.

use crate::error::{CliError, Result};
use pawtrail_chat::DEFAULT_TIMEOUT_SECS;
use pawtrail_scanner::ScannerConfig;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Directory under the home directory holding config, history and feedback
const APP_DIR: &str = ".pawtrail";

/// CLI configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// Scanner settings
    #[serde(default)]
    pub scanner: ScannerConfig,

    /// Chat client settings
    #[serde(default)]
    pub chat: ChatSettings,

    /// Global settings
    #[serde(default)]
    pub settings: Settings,
}

/// Chat client settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ChatSettings {
    /// Base URL of the chat API
    pub api_url: String,

    /// Model requested for answers
    pub model: String,

    /// File that receives submitted feedback
    pub feedback_file: PathBuf,

    /// Maximum time for one chat request (seconds)
    pub request_timeout_secs: u64,
}

/// Global CLI settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Settings {
    /// Enable colored output
    #[serde(default = "default_true")]
    pub color: bool,
}

impl Config {
    /// Get the default configuration file path.
    pub fn path() -> Result<PathBuf> {
        Ok(app_dir()?.join("config.toml"))
    }

    /// Load configuration from the default path, or defaults when it does not exist.
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::path()?)
    }

    /// Load configuration from `path`, or defaults when it does not exist.
    pub fn load_from(path: &Path) -> Result<Self> {
        if path.exists() {
            let contents = fs::read_to_string(path)?;
            let config: Config = toml::from_str(&contents)?;
            Ok(config)
        } else {
            Ok(Self::default())
        }
    }

    /// Save configuration to `path`.
    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }

        fs::write(path, self.to_toml()?)?;
        Ok(())
    }

    /// Render as TOML.
    pub fn to_toml(&self) -> Result<String> {
        toml::to_string_pretty(self)
            .map_err(|e| CliError::Config(format!("Failed to serialize config: {}", e)))
    }
}

impl ChatSettings {
    /// Chat request timeout as a Duration
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}

impl Default for ChatSettings {
    fn default() -> Self {
        let feedback_file = app_dir()
            .map(|dir| dir.join("feedback.jsonl"))
            .unwrap_or_else(|_| PathBuf::from("feedback.jsonl"));

        Self {
            api_url: "http://localhost:8000".to_string(),
            model: "gpt-4o-mini".to_string(),
            feedback_file,
            request_timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }
}

impl Default for Settings {
    fn default() -> Self {
        Self { color: true }
    }
}

/// `~/.pawtrail`
pub fn app_dir() -> Result<PathBuf> {
    let home = dirs::home_dir()
        .ok_or_else(|| CliError::Config("Could not find home directory".into()))?;
    Ok(home.join(APP_DIR))
}

fn default_true() -> bool {
    true
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert!(config.settings.color);
        assert_eq!(config.scanner.model, "deepseek-r1:1.5b");
        assert_eq!(config.chat.api_url, "http://localhost:8000");
        assert_eq!(config.chat.request_timeout(), Duration::from_secs(60));
    }

    #[test]
    fn test_missing_file_gives_defaults() {
        let dir = TempDir::new().unwrap();
        let config = Config::load_from(&dir.path().join("absent.toml")).unwrap();
        assert_eq!(config, Config::default());
    }

    #[test]
    fn test_partial_file_keeps_defaults() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(
            &path,
            "[scanner]\ninput_dir = \"posts\"\n\n[settings]\ncolor = false\n",
        )
        .unwrap();

        let config = Config::load_from(&path).unwrap();
        assert_eq!(config.scanner.input_dir, PathBuf::from("posts"));
        assert_eq!(config.scanner.result_file, PathBuf::from("analysis_results.txt"));
        assert!(!config.settings.color);
        assert_eq!(config.chat, ChatSettings::default());
    }

    #[test]
    fn test_save_and_reload() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("nested").join("config.toml");

        let mut config = Config::default();
        config.chat.model = "llama3".to_string();
        config.scanner.max_retries = 3;
        config.save_to(&path).unwrap();

        assert_eq!(Config::load_from(&path).unwrap(), config);
    }

    #[test]
    fn test_invalid_toml() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "[scanner\n").unwrap();

        assert!(matches!(Config::load_from(&path), Err(CliError::Toml(_))));
    }
}
