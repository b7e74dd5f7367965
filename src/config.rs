//! Configuration file parser for ~/.config/spacenews/config.toml.
//!
//! The file is optional; a missing or blank file yields `Config::default()`.
//! Unknown keys are accepted but logged, since they are usually typos.
use crate::api::{Category, DEFAULT_BASE_URL, DEFAULT_PAGE_LIMIT, DEFAULT_TIMEOUT};
use serde::Deserialize;
use std::collections::HashMap;
use std::path::Path;
use std::time::Duration;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid TOML in config file: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Config file too large: {0}")]
    TooLarge(String),
}

const KNOWN_KEYS: [&str; 6] = [
    "theme",
    "default_category",
    "api_base_url",
    "page_limit",
    "request_timeout_secs",
    "keybindings",
];

/// Top-level application configuration.
///
/// Every field has a default, so any subset of keys may be given.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Theme variant name, "light" or "dark".
    pub theme: String,

    /// Category slug shown at startup.
    pub default_category: String,

    /// Base URL of the article API. Must be HTTPS outside of localhost.
    pub api_base_url: String,

    /// Articles requested per list or search call.
    pub page_limit: u32,

    /// Per-request timeout in seconds. 0 falls back to the built-in default.
    pub request_timeout_secs: u64,

    /// Keybinding overrides: action name to key string (e.g. `quit = "Ctrl+q"`).
    pub keybindings: HashMap<String, String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            theme: "light".to_string(),
            default_category: Category::default().slug().to_string(),
            api_base_url: DEFAULT_BASE_URL.to_string(),
            page_limit: DEFAULT_PAGE_LIMIT,
            request_timeout_secs: DEFAULT_TIMEOUT.as_secs(),
            keybindings: HashMap::new(),
        }
    }
}

impl Config {
    const MAX_FILE_SIZE: u64 = 1_048_576;

    /// Load configuration from a TOML file.
    ///
    /// - Missing or empty file → `Ok(Config::default())`
    /// - Larger than 1 MB → `Err(ConfigError::TooLarge)`
    /// - Invalid TOML or wrong value types → `Err(ConfigError::Parse)`
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        match std::fs::metadata(path) {
            Ok(meta) if meta.len() > Self::MAX_FILE_SIZE => {
                return Err(ConfigError::TooLarge(format!(
                    "Config file is {} bytes (max {} bytes)",
                    meta.len(),
                    Self::MAX_FILE_SIZE
                )));
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::debug!(path = %path.display(), "No config file found, using defaults");
                return Ok(Self::default());
            }
            Err(e) => return Err(ConfigError::Io(e)),
            Ok(_) => {}
        }

        let content = match std::fs::read_to_string(path) {
            Ok(c) => c,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::debug!(path = %path.display(), "Config file disappeared, using defaults");
                return Ok(Self::default());
            }
            Err(e) => return Err(ConfigError::Io(e)),
        };

        Self::parse(&content)
    }

    /// Parse configuration text. Blank input gives the defaults.
    pub fn parse(content: &str) -> Result<Self, ConfigError> {
        if content.trim().is_empty() {
            return Ok(Self::default());
        }

        if let Ok(raw) = content.parse::<toml::Table>() {
            for key in raw.keys().filter(|k| !KNOWN_KEYS.contains(&k.as_str())) {
                tracing::warn!(key = %key, "Unknown key in config file, ignoring");
            }
        }

        let config: Config = toml::from_str(content)?;
        tracing::info!(
            theme = %config.theme,
            category = %config.default_category,
            base_url = %config.api_base_url,
            "Loaded configuration"
        );
        Ok(config)
    }

    /// The configured startup category, falling back to the default on an
    /// unrecognised slug.
    pub fn category(&self) -> Category {
        Category::from_slug(&self.default_category).unwrap_or_else(|| {
            tracing::warn!(
                category = %self.default_category,
                "Unknown default_category in config, using default"
            );
            Category::default()
        })
    }

    pub fn request_timeout(&self) -> Duration {
        if self.request_timeout_secs == 0 {
            DEFAULT_TIMEOUT
        } else {
            Duration::from_secs(self.request_timeout_secs)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn write_config(name: &str, content: &str) -> std::path::PathBuf {
        let dir = std::env::temp_dir().join(format!("spacenews_config_test_{name}"));
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("config.toml");
        std::fs::write(&path, content).unwrap();
        path
    }

    fn cleanup(path: &Path) {
        if let Some(dir) = path.parent() {
            std::fs::remove_dir_all(dir).ok();
        }
    }

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.theme, "light");
        assert_eq!(config.default_category, "articles");
        assert_eq!(config.api_base_url, DEFAULT_BASE_URL);
        assert_eq!(config.page_limit, 24);
        assert_eq!(config.request_timeout_secs, 20);
        assert!(config.keybindings.is_empty());
        assert_eq!(config.category(), Category::Articles);
    }

    #[test]
    fn test_missing_file_returns_default() {
        let path = Path::new("/tmp/spacenews_test_nonexistent_config.toml");
        let config = Config::load(path).unwrap();
        assert_eq!(config.theme, "light");
    }

    #[test]
    fn test_empty_and_whitespace_files_return_default() {
        let path = write_config("empty", "");
        assert_eq!(Config::load(&path).unwrap().theme, "light");
        cleanup(&path);

        let path = write_config("whitespace", "   \n  \n  ");
        assert_eq!(Config::load(&path).unwrap().page_limit, 24);
        cleanup(&path);
    }

    #[test]
    fn test_partial_config_uses_defaults_for_missing() {
        let path = write_config("partial", "theme = \"dark\"\n");
        let config = Config::load(&path).unwrap();
        assert_eq!(config.theme, "dark");
        assert_eq!(config.default_category, "articles");
        assert_eq!(config.request_timeout_secs, 20);
        cleanup(&path);
    }

    #[test]
    fn test_full_config() {
        let path = write_config(
            "full",
            r#"
theme = "dark"
default_category = "launches"
api_base_url = "https://mirror.example.com/v4"
page_limit = 50
request_timeout_secs = 5

[keybindings]
quit = "Ctrl+q"
refresh = "F5"
"#,
        );
        let config = Config::load(&path).unwrap();
        assert_eq!(config.theme, "dark");
        assert_eq!(config.category(), Category::Launches);
        assert_eq!(config.api_base_url, "https://mirror.example.com/v4");
        assert_eq!(config.page_limit, 50);
        assert_eq!(config.request_timeout(), Duration::from_secs(5));
        assert_eq!(
            config.keybindings.get("quit").map(String::as_str),
            Some("Ctrl+q")
        );
        assert_eq!(
            config.keybindings.get("refresh").map(String::as_str),
            Some("F5")
        );
        cleanup(&path);
    }

    #[test]
    fn test_invalid_toml_returns_error() {
        let path = write_config("invalid", "this is not [valid toml");
        let err = Config::load(&path).unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
        assert!(err.to_string().contains("Invalid TOML"));
        cleanup(&path);
    }

    #[test]
    fn test_wrong_type_returns_error() {
        assert!(matches!(
            Config::parse("page_limit = \"many\"\n"),
            Err(ConfigError::Parse(_))
        ));
    }

    #[test]
    fn test_unknown_keys_accepted() {
        let config = Config::parse("theme = \"dark\"\nrefresh_interval = 30\n").unwrap();
        assert_eq!(config.theme, "dark");
    }

    #[test]
    fn test_unknown_category_falls_back() {
        let config = Config::parse("default_category = \"gossip\"\n").unwrap();
        assert_eq!(config.category(), Category::Articles);
    }

    #[test]
    fn test_zero_timeout_uses_default() {
        let config = Config::parse("request_timeout_secs = 0\n").unwrap();
        assert_eq!(config.request_timeout(), DEFAULT_TIMEOUT);
    }

    #[test]
    fn test_too_large_file_rejected() {
        let path = write_config("too_large", &"a".repeat(1_048_577));
        let err = Config::load(&path).unwrap_err();
        assert!(matches!(err, ConfigError::TooLarge(_)));
        assert!(err.to_string().contains("too large"));
        cleanup(&path);
    }

    #[test]
    fn test_file_at_size_limit_accepted() {
        let mut content = "theme = \"dark\"\n".to_string();
        while content.len() < 1_048_576 - 20 {
            content.push_str("# padding comment\n");
        }
        content.truncate(1_048_576);
        let path = write_config("at_limit", &content);
        assert!(Config::load(&path).is_ok());
        cleanup(&path);
    }
}
