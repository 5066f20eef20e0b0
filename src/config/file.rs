//! Optional TOML configuration file (`~/.toolwright/config.toml`).

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::error::ToolwrightError;

/// On-disk configuration. Every field is optional; environment variables and
/// explicit setters take precedence.
///
/// ```toml
/// model = "ollama:llama3.2"
/// validation_policy = "enforcing"
/// cache = true
///
/// [api_keys]
/// polygon = "..."
///
/// [base_urls]
/// ollama = "http://gpu-box:11434"
///
/// [timeouts]
/// tool = 15
///
/// [max_attempts]
/// planning = 3
/// ```
#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
#[serde(default)]
pub struct FileConfig {
    pub model: Option<String>,
    pub validation_policy: Option<String>,
    pub debug: Option<bool>,
    pub cache: Option<bool>,
    pub api_keys: HashMap<String, String>,
    pub base_urls: HashMap<String, String>,
    /// Per call type (`planning`, `presence`, `tool`, `answer`), in seconds.
    pub timeouts: HashMap<String, u64>,
    /// Per call type, attempts including the first.
    pub max_attempts: HashMap<String, u32>,
}

impl FileConfig {
    /// Parse a config document.
    pub fn parse(raw: &str) -> Result<Self, ToolwrightError> {
        toml::from_str(raw)
            .map_err(|e| ToolwrightError::Configuration(format!("invalid config file: {e}")))
    }

    /// Load from `path`; a missing file is not an error.
    pub fn load(path: &Path) -> Result<Option<Self>, ToolwrightError> {
        let raw = match std::fs::read_to_string(path) {
            Ok(raw) => raw,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(err) => return Err(err.into()),
        };
        Self::parse(&raw).map(Some)
    }

    /// `~/.toolwright/config.toml`, or `TOOLWRIGHT_CONFIG` when set.
    pub fn default_path() -> PathBuf {
        if let Ok(path) = std::env::var("TOOLWRIGHT_CONFIG") {
            return PathBuf::from(path);
        }
        directories::UserDirs::new()
            .map(|dirs| dirs.home_dir().join(".toolwright"))
            .unwrap_or_else(|| PathBuf::from(".toolwright"))
            .join("config.toml")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_all_sections() {
        let config = FileConfig::parse(
            r#"
            model = "openai:gpt-4o-mini"
            validation_policy = "enforcing"
            cache = true

            [api_keys]
            polygon = "pk"

            [base_urls]
            ollama = "http://gpu:11434"

            [timeouts]
            tool = 5

            [max_attempts]
            planning = 3
            "#,
        )
        .unwrap();

        assert_eq!(config.model.as_deref(), Some("openai:gpt-4o-mini"));
        assert_eq!(config.cache, Some(true));
        assert_eq!(config.debug, None);
        assert_eq!(config.api_keys["polygon"], "pk");
        assert_eq!(config.base_urls["ollama"], "http://gpu:11434");
        assert_eq!(config.timeouts["tool"], 5);
        assert_eq!(config.max_attempts["planning"], 3);
    }

    #[test]
    fn rejects_malformed_documents() {
        let err = FileConfig::parse("model = [").unwrap_err();
        assert!(matches!(err, ToolwrightError::Configuration(_)));
    }

    #[test]
    fn missing_file_loads_as_none() {
        let dir = tempfile::TempDir::new().unwrap();
        let loaded = FileConfig::load(&dir.path().join("absent.toml")).unwrap();
        assert!(loaded.is_none());
    }
}
