//! Configuration management for sentim
//!
//! Loads the TOML config file, applies profile and environment overrides, and
//! validates the result before anything talks to the network.

use crate::error::{Result, SentimError};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::time::Duration;

mod validator;

pub use validator::ConfigValidator;

/// Main configuration structure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    #[serde(rename = "_meta")]
    pub meta: MetaConfig,
    pub youtube: YouTubeConfig,
    pub backend: BackendConfig,
    pub http: HttpConfig,
    pub output: OutputConfig,
    #[serde(default)]
    pub profiles: HashMap<String, ProfileOverrides>,
}

/// Metadata about the configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MetaConfig {
    pub schema_version: String,
    #[serde(default = "current_timestamp")]
    pub created_at: String,
    #[serde(default = "current_timestamp")]
    pub last_modified: String,
}

fn current_timestamp() -> String {
    chrono::Utc::now().to_rfc3339()
}

/// Upstream comment-listing API settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct YouTubeConfig {
    pub api_base: String,
    /// Name of the environment variable holding the API key. The key itself
    /// never lives in the config file.
    pub api_key_env: String,
    pub page_size: u32,
}

/// Classification and chart rendering service
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BackendConfig {
    pub base_url: String,
}

/// Shared HTTP client settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HttpConfig {
    /// Per-request timeout, e.g. "30s", "500ms", "2m"
    pub timeout: String,
}

/// Where chart images are written
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutputConfig {
    pub chart_dir: PathBuf,
}

/// Profile-specific configuration overrides
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProfileOverrides {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub backend_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timeout: Option<String>,
}

impl Config {
    /// Load configuration from a file
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Err(SentimError::ConfigNotFound {
                path: path.to_path_buf(),
            });
        }

        let content = std::fs::read_to_string(path).map_err(|e| SentimError::Io {
            source: e,
            context: format!("Failed to read config file: {:?}", path),
        })?;
        let mut config: Config = toml::from_str(&content)?;

        config.apply_env_overrides();

        ConfigValidator::validate(&config)?;

        Ok(config)
    }

    /// Save configuration to a file
    pub fn save(&self, path: &Path) -> Result<()> {
        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content).map_err(|e| SentimError::Io {
            source: e,
            context: format!("Failed to write config file: {:?}", path),
        })?;
        Ok(())
    }

    /// Load configuration with a specific profile applied
    pub fn load_with_profile(path: &Path, profile: &str) -> Result<Self> {
        let mut config = Self::load(path)?;
        config.apply_profile(profile)?;
        ConfigValidator::validate(&config)?;
        Ok(config)
    }

    /// Apply a profile's overrides to the configuration
    pub fn apply_profile(&mut self, profile: &str) -> Result<()> {
        let overrides = self.profiles.get(profile).cloned().ok_or_else(|| {
            SentimError::Config(format!("Unknown profile: {}", profile))
        })?;

        if let Some(url) = overrides.backend_url {
            self.backend.base_url = url;
        }
        if let Some(timeout) = overrides.timeout {
            self.http.timeout = timeout;
        }
        tracing::debug!("Applied profile {}", profile);
        Ok(())
    }

    /// Apply environment variable overrides
    /// Environment variables in format: SENTIM_SECTION__KEY=value
    pub fn apply_env_overrides(&mut self) {
        for (key, value) in std::env::vars() {
            if let Some(config_key) = key.strip_prefix("SENTIM_") {
                if let Err(e) = self.set_value_from_env(config_key, &value) {
                    tracing::warn!("Failed to apply env override {}: {}", key, e);
                }
            }
        }
    }

    fn set_value_from_env(&mut self, path: &str, value: &str) -> Result<()> {
        match path {
            "BACKEND__BASE_URL" => {
                self.backend.base_url = value.to_string();
            }
            "YOUTUBE__API_BASE" => {
                self.youtube.api_base = value.to_string();
            }
            "YOUTUBE__PAGE_SIZE" => {
                self.youtube.page_size =
                    value.parse().map_err(|_| SentimError::InvalidConfigValue {
                        path: path.to_string(),
                        message: format!("Cannot parse '{}' as page size", value),
                    })?;
            }
            "HTTP__TIMEOUT" => {
                self.http.timeout = value.to_string();
            }
            _ => {
                tracing::debug!("Unknown env config key: {}", path);
            }
        }
        Ok(())
    }

    /// Per-request timeout as a `Duration`
    pub fn request_timeout(&self) -> Result<Duration> {
        parse_duration(&self.http.timeout).ok_or_else(|| SentimError::InvalidConfigValue {
            path: "http.timeout".to_string(),
            message: format!("Invalid duration format: {}", self.http.timeout),
        })
    }

    /// Read the comment API key from the configured environment variable
    pub fn api_key(&self) -> Result<String> {
        match std::env::var(&self.youtube.api_key_env) {
            Ok(key) if !key.trim().is_empty() => Ok(key),
            _ => Err(SentimError::MissingCredential {
                env: self.youtube.api_key_env.clone(),
            }),
        }
    }

    /// Get the default configuration file path
    pub fn default_path() -> Result<PathBuf> {
        let config_dir = dirs::config_dir()
            .ok_or_else(|| SentimError::Config("Cannot determine config directory".to_string()))?;

        Ok(config_dir.join("sentim").join("config.toml"))
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            meta: MetaConfig {
                schema_version: "1.0.0".to_string(),
                created_at: current_timestamp(),
                last_modified: current_timestamp(),
            },
            youtube: YouTubeConfig {
                api_base: "https://www.googleapis.com/youtube/v3".to_string(),
                api_key_env: "YOUTUBE_API_KEY".to_string(),
                page_size: 100,
            },
            backend: BackendConfig {
                base_url: "http://127.0.0.1:5000".to_string(),
            },
            http: HttpConfig {
                timeout: "30s".to_string(),
            },
            output: OutputConfig {
                chart_dir: PathBuf::from("charts"),
            },
            profiles: HashMap::new(),
        }
    }
}

/// Parse duration strings like "30s", "500ms", "2m", "1h" or bare seconds
pub fn parse_duration(s: &str) -> Option<Duration> {
    let s = s.trim();

    // "ms" before "s" because "ms" ends with "s"
    if let Some(ms) = s.strip_suffix("ms") {
        ms.trim().parse().ok().map(Duration::from_millis)
    } else if let Some(secs) = s.strip_suffix('s') {
        secs.trim().parse().ok().map(Duration::from_secs)
    } else if let Some(mins) = s.strip_suffix('m') {
        mins.trim()
            .parse::<u64>()
            .ok()
            .map(|m| Duration::from_secs(m * 60))
    } else if let Some(hours) = s.strip_suffix('h') {
        hours
            .trim()
            .parse::<u64>()
            .ok()
            .map(|h| Duration::from_secs(h * 3600))
    } else {
        s.parse().ok().map(Duration::from_secs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_parse_duration() {
        assert_eq!(parse_duration("5s"), Some(Duration::from_secs(5)));
        assert_eq!(parse_duration("1500ms"), Some(Duration::from_millis(1500)));
        assert_eq!(parse_duration("2m"), Some(Duration::from_secs(120)));
        assert_eq!(parse_duration("1h"), Some(Duration::from_secs(3600)));
        assert_eq!(parse_duration("7"), Some(Duration::from_secs(7)));
        assert_eq!(parse_duration("soon"), None);
    }

    #[test]
    fn test_save_and_load_roundtrip() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("config.toml");

        let mut config = Config::default();
        config.backend.base_url = "http://analysis.internal:8080".to_string();
        config.save(&path).unwrap();

        let loaded = Config::load(&path).unwrap();
        assert_eq!(loaded.backend.base_url, "http://analysis.internal:8080");
        assert_eq!(loaded.youtube.page_size, 100);
    }

    #[test]
    fn test_missing_file() {
        let temp_dir = TempDir::new().unwrap();
        let err = Config::load(&temp_dir.path().join("nope.toml")).unwrap_err();
        assert!(matches!(err, SentimError::ConfigNotFound { .. }));
    }

    #[test]
    fn test_profile_overrides() {
        let mut config = Config::default();
        config.profiles.insert(
            "staging".to_string(),
            ProfileOverrides {
                backend_url: Some("https://staging.example.com".to_string()),
                timeout: Some("5s".to_string()),
            },
        );

        config.apply_profile("staging").unwrap();
        assert_eq!(config.backend.base_url, "https://staging.example.com");
        assert_eq!(config.request_timeout().unwrap(), Duration::from_secs(5));

        assert!(config.apply_profile("missing").is_err());
    }

    #[test]
    fn test_missing_credential() {
        let mut config = Config::default();
        config.youtube.api_key_env = "SENTIM_TEST_KEY_THAT_IS_NEVER_SET".to_string();
        assert!(matches!(
            config.api_key(),
            Err(SentimError::MissingCredential { .. })
        ));
    }
}
