//! Configuration for the Scanner

use pawtrail_llm::ollama::{DEFAULT_ENDPOINT, DEFAULT_MAX_RETRIES, DEFAULT_MODEL, DEFAULT_TIMEOUT_SECS};
use pawtrail_llm::OllamaSettings;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Configuration for the Scanner
///
/// Relative `result_file`, `state_file` and `log_file` paths are resolved
/// against `input_dir`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScannerConfig {
    /// Directory whose `.txt` files are scanned
    pub input_dir: PathBuf,

    /// Append-only result file
    pub result_file: PathBuf,

    /// Per-file cursor state (JSON)
    pub state_file: PathBuf,

    /// Diagnostic log, truncated at the start of each run
    pub log_file: PathBuf,

    /// Ollama API endpoint
    pub endpoint: String,

    /// Model used for extraction
    pub model: String,

    /// Sampling temperature
    pub temperature: f32,

    /// Maximum tokens generated per line
    pub num_predict: u32,

    /// Maximum time for a single model call (seconds)
    pub request_timeout_secs: u64,

    /// Attempts per model call
    pub max_retries: u32,

    /// Characters of the source line kept in failure logs
    pub content_preview_chars: usize,

    /// Characters of the raw model answer kept in failure logs
    pub response_preview_chars: usize,
}

impl Default for ScannerConfig {
    fn default() -> Self {
        Self {
            input_dir: PathBuf::from("."),
            result_file: PathBuf::from("analysis_results.txt"),
            state_file: PathBuf::from("processing_state.json"),
            log_file: PathBuf::from("debug.log"),
            endpoint: DEFAULT_ENDPOINT.to_string(),
            model: DEFAULT_MODEL.to_string(),
            temperature: 0.1,
            num_predict: 512,
            request_timeout_secs: DEFAULT_TIMEOUT_SECS,
            max_retries: DEFAULT_MAX_RETRIES,
            content_preview_chars: 50,
            response_preview_chars: 200,
        }
    }
}

impl ScannerConfig {
    /// Create a configuration scanning `input_dir` with default file names
    pub fn for_dir(input_dir: impl Into<PathBuf>) -> Self {
        Self {
            input_dir: input_dir.into(),
            ..Self::default()
        }
    }

    /// Get the model request timeout as a Duration
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    /// Resolved path of the result file
    pub fn result_path(&self) -> PathBuf {
        self.resolve(&self.result_file)
    }

    /// Resolved path of the state file
    pub fn state_path(&self) -> PathBuf {
        self.resolve(&self.state_file)
    }

    /// Resolved path of the log file
    pub fn log_path(&self) -> PathBuf {
        self.resolve(&self.log_file)
    }

    fn resolve(&self, path: &Path) -> PathBuf {
        // join() keeps absolute paths as they are
        self.input_dir.join(path)
    }

    /// Settings for the Ollama provider described by this configuration
    pub fn ollama_settings(&self) -> OllamaSettings {
        OllamaSettings {
            endpoint: self.endpoint.clone(),
            model: self.model.clone(),
            timeout: self.request_timeout(),
            max_retries: self.max_retries,
            temperature: Some(self.temperature),
            num_predict: Some(self.num_predict),
        }
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), String> {
        if self.model.trim().is_empty() {
            return Err("model must not be empty".to_string());
        }
        if self.endpoint.trim().is_empty() {
            return Err("endpoint must not be empty".to_string());
        }
        if self.request_timeout_secs == 0 {
            return Err("request_timeout_secs must be greater than 0".to_string());
        }
        if self.max_retries == 0 {
            return Err("max_retries must be at least 1".to_string());
        }
        if self.num_predict == 0 {
            return Err("num_predict must be greater than 0".to_string());
        }
        if !(0.0..=2.0).contains(&self.temperature) {
            return Err(format!("temperature {} out of range [0.0, 2.0]", self.temperature));
        }
        let names = [&self.result_file, &self.state_file, &self.log_file];
        for (i, a) in names.iter().enumerate() {
            if a.as_os_str().is_empty() {
                return Err("result, state and log file paths must be set".to_string());
            }
            if names[i + 1..].contains(a) {
                return Err(format!("{} is used for more than one output", a.display()));
            }
        }
        Ok(())
    }

    /// Load configuration from TOML string
    pub fn from_toml(toml_str: &str) -> Result<Self, String> {
        toml::from_str(toml_str).map_err(|e| format!("Failed to parse TOML: {}", e))
    }

    /// Serialize configuration to TOML string
    pub fn to_toml(&self) -> Result<String, String> {
        toml::to_string_pretty(self).map_err(|e| format!("Failed to serialize to TOML: {}", e))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        let config = ScannerConfig::default();
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_paths_resolve_against_input_dir() {
        let config = ScannerConfig::for_dir("/data/posts");
        assert_eq!(config.result_path(), PathBuf::from("/data/posts/analysis_results.txt"));
        assert_eq!(config.state_path(), PathBuf::from("/data/posts/processing_state.json"));
        assert_eq!(config.log_path(), PathBuf::from("/data/posts/debug.log"));
    }

    #[test]
    fn test_absolute_paths_are_kept() {
        let mut config = ScannerConfig::for_dir("/data/posts");
        config.state_file = PathBuf::from("/var/lib/pawtrail/state.json");
        assert_eq!(config.state_path(), PathBuf::from("/var/lib/pawtrail/state.json"));
    }

    #[test]
    fn test_invalid_timeout() {
        let mut config = ScannerConfig::default();
        config.request_timeout_secs = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_invalid_zero_retries() {
        let mut config = ScannerConfig::default();
        config.max_retries = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_shared_output_paths_rejected() {
        let mut config = ScannerConfig::default();
        config.log_file = config.result_file.clone();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_ollama_settings_follow_config() {
        let mut config = ScannerConfig::default();
        config.model = "mistral".to_string();
        config.request_timeout_secs = 5;

        let settings = config.ollama_settings();
        assert_eq!(settings.model, "mistral");
        assert_eq!(settings.timeout, Duration::from_secs(5));
        assert_eq!(settings.num_predict, Some(512));
    }

    #[test]
    fn test_partial_toml_uses_defaults() {
        let config = ScannerConfig::from_toml("model = \"llama3\"\ninput_dir = \"inbox\"").unwrap();
        assert_eq!(config.model, "llama3");
        assert_eq!(config.input_dir, PathBuf::from("inbox"));
        assert_eq!(config.result_file, PathBuf::from("analysis_results.txt"));
    }

    #[test]
    fn test_toml_round_trip() {
        let config = ScannerConfig::default();
        let toml_str = config.to_toml().unwrap();
        let parsed = ScannerConfig::from_toml(&toml_str).unwrap();

        assert_eq!(config, parsed);
    }
}
