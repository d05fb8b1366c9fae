use serde::Deserialize;
use std::{path::Path, time::Duration};
use thiserror::Error;

use crate::providers::{self, OPENAI_BASE_URL};

pub const API_KEY_ENV_VAR: &str = "OPENAI_API_KEY";
pub const EMBED_MODEL_ENV_VAR: &str = "EMBED_MODEL";
pub const CHAT_MODEL_ENV_VAR: &str = "CHAT_MODEL";
pub const EMBED_DIMENSIONS_ENV_VAR: &str = "EMBED_DIMENSIONS";
pub const TIMEOUT_ENV_VAR: &str = "PROVIDER_TIMEOUT_SECS";
pub const BASE_URL_ENV_VAR: &str = "OPENAI_BASE_URL";
pub const CORS_ORIGINS_ENV_VAR: &str = "CORS_ORIGINS";

const DEFAULT_EMBED_DIMENSIONS: usize = 1536;
const DEFAULT_TIMEOUT_SECS: u64 = 30;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),
    #[error("Failed to deserialize json config: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("Invalid value `{value}` for `{key}`")]
    InvalidValue { key: &'static str, value: String },
}

/// Runtime settings for the knowledge hub
#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    /// `None` leaves the hub unconfigured, ingest and query get refused.
    pub api_key: Option<String>,
    pub base_url: String,
    pub embed_model: String,
    pub chat_model: String,
    /// Length every returned embedding must have.
    pub embedding_dimensions: usize,
    /// Upper bound on each embedding or completion call.
    pub provider_timeout: Duration,
    /// Allowed CORS origins, empty means any.
    pub cors_origins: Vec<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: OPENAI_BASE_URL.to_string(),
            embed_model: providers::embeddings::openai::DEFAULT_MODEL.to_string(),
            chat_model: providers::completions::openai::DEFAULT_MODEL.to_string(),
            embedding_dimensions: DEFAULT_EMBED_DIMENSIONS,
            provider_timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            cors_origins: Vec::new(),
        }
    }
}

/// Optional overrides read from a json file
#[derive(Deserialize, Debug, Default)]
#[serde(deny_unknown_fields)]
struct FileConfig {
    api_key_var: Option<String>,
    base_url: Option<String>,
    embed_model: Option<String>,
    chat_model: Option<String>,
    embedding_dimensions: Option<usize>,
    provider_timeout_secs: Option<u64>,
    cors_origins: Option<Vec<String>>,
}

impl Config {
    /// Build the config from the process environment
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build the config from `lookup`, falling back to defaults for unset keys
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let mut config = Self::default();
        let non_empty = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        config.api_key = non_empty(API_KEY_ENV_VAR);
        if let Some(url) = non_empty(BASE_URL_ENV_VAR) {
            config.base_url = url;
        }
        if let Some(model) = non_empty(EMBED_MODEL_ENV_VAR) {
            config.embed_model = model;
        }
        if let Some(model) = non_empty(CHAT_MODEL_ENV_VAR) {
            config.chat_model = model;
        }
        if let Some(value) = non_empty(EMBED_DIMENSIONS_ENV_VAR) {
            config.embedding_dimensions = parse_positive(EMBED_DIMENSIONS_ENV_VAR, &value)?;
        }
        if let Some(value) = non_empty(TIMEOUT_ENV_VAR) {
            config.provider_timeout =
                Duration::from_secs(parse_positive(TIMEOUT_ENV_VAR, &value)? as u64);
        }
        if let Some(origins) = non_empty(CORS_ORIGINS_ENV_VAR) {
            config.cors_origins = origins
                .split(',')
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(String::from)
                .collect();
        }
        Ok(config)
    }

    /// Overlay the settings from a json file.
    ///
    /// The api key itself never lives in the file, `api_key_var` names the
    /// environment variable to read it from.
    pub fn merge_file(self, path: &Path) -> Result<Self, ConfigError> {
        let json = std::fs::read_to_string(path)?;
        self.merge_json(&json, |key| std::env::var(key).ok())
    }

    fn merge_json(
        mut self,
        json: &str,
        lookup: impl Fn(&str) -> Option<String>,
    ) -> Result<Self, ConfigError> {
        let file: FileConfig = serde_json::from_str(json)?;
        if let Some(var) = file.api_key_var {
            self.api_key = lookup(&var).filter(|v| !v.trim().is_empty());
        }
        if let Some(url) = file.base_url {
            self.base_url = url;
        }
        if let Some(model) = file.embed_model {
            self.embed_model = model;
        }
        if let Some(model) = file.chat_model {
            self.chat_model = model;
        }
        if let Some(dimensions) = file.embedding_dimensions {
            if dimensions == 0 {
                return Err(ConfigError::InvalidValue {
                    key: "embedding_dimensions",
                    value: dimensions.to_string(),
                });
            }
            self.embedding_dimensions = dimensions;
        }
        if let Some(secs) = file.provider_timeout_secs {
            if secs == 0 {
                return Err(ConfigError::InvalidValue {
                    key: "provider_timeout_secs",
                    value: secs.to_string(),
                });
            }
            self.provider_timeout = Duration::from_secs(secs);
        }
        if let Some(origins) = file.cors_origins {
            self.cors_origins = origins;
        }
        Ok(self)
    }

    #[must_use]
    pub fn is_configured(&self) -> bool {
        self.api_key.is_some()
    }
}

fn parse_positive(key: &'static str, value: &str) -> Result<usize, ConfigError> {
    match value.trim().parse::<usize>() {
        Ok(n) if n > 0 => Ok(n),
        _ => Err(ConfigError::InvalidValue {
            key,
            value: value.to_string(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::io::Write;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| vars.get(key).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = Config::from_lookup(lookup(&[])).unwrap();
        assert_eq!(config, Config::default());
        assert!(!config.is_configured());
        assert_eq!(config.embed_model, "text-embedding-3-small");
        assert_eq!(config.chat_model, "gpt-4o-mini");
        assert_eq!(config.embedding_dimensions, 1536);
        assert_eq!(config.provider_timeout, Duration::from_secs(30));
    }

    #[test]
    fn test_env_overrides() {
        let config = Config::from_lookup(lookup(&[
            ("OPENAI_API_KEY", "sk-test"),
            ("EMBED_MODEL", "text-embedding-3-large"),
            ("CHAT_MODEL", "gpt-4o"),
            ("EMBED_DIMENSIONS", "3072"),
            ("PROVIDER_TIMEOUT_SECS", "5"),
            ("CORS_ORIGINS", "http://localhost:3000, https://hub.example.com"),
        ]))
        .unwrap();

        assert_eq!(config.api_key.as_deref(), Some("sk-test"));
        assert_eq!(config.embed_model, "text-embedding-3-large");
        assert_eq!(config.chat_model, "gpt-4o");
        assert_eq!(config.embedding_dimensions, 3072);
        assert_eq!(config.provider_timeout, Duration::from_secs(5));
        assert_eq!(
            config.cors_origins,
            vec!["http://localhost:3000", "https://hub.example.com"]
        );
    }

    #[test]
    fn test_blank_api_key_is_unconfigured() {
        let config = Config::from_lookup(lookup(&[("OPENAI_API_KEY", "  ")])).unwrap();
        assert!(!config.is_configured());
    }

    #[test]
    fn test_invalid_dimensions() {
        let result = Config::from_lookup(lookup(&[("EMBED_DIMENSIONS", "zero")]));
        assert!(matches!(
            result,
            Err(ConfigError::InvalidValue { key: "EMBED_DIMENSIONS", .. })
        ));
        let result = Config::from_lookup(lookup(&[("EMBED_DIMENSIONS", "0")]));
        assert!(result.is_err());
    }

    #[test]
    fn test_merge_json() {
        let json = r#"{
            "api_key_var": "HUB_KEY",
            "chat_model": "gpt-4.1-mini",
            "embedding_dimensions": 512,
            "provider_timeout_secs": 10
        }"#;
        let config = Config::default()
            .merge_json(json, lookup(&[("HUB_KEY", "sk-file")]))
            .unwrap();
        assert_eq!(config.api_key.as_deref(), Some("sk-file"));
        assert_eq!(config.chat_model, "gpt-4.1-mini");
        assert_eq!(config.embedding_dimensions, 512);
        assert_eq!(config.provider_timeout, Duration::from_secs(10));
        assert_eq!(config.embed_model, "text-embedding-3-small");
    }

    #[test]
    fn test_merge_json_rejects_unknown_fields() {
        let result = Config::default().merge_json(r#"{"api_key": "sk-inline"}"#, lookup(&[]));
        assert!(matches!(result, Err(ConfigError::Parse(_))));
    }

    #[test]
    fn test_merge_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{"base_url": "http://localhost:8080/v1", "cors_origins": ["*"]}}"#)
            .unwrap();

        let config = Config::default().merge_file(file.path()).unwrap();
        assert_eq!(config.base_url, "http://localhost:8080/v1");
        assert_eq!(config.cors_origins, vec!["*"]);

        let missing = Config::default().merge_file(Path::new("/nonexistent/hub.json"));
        assert!(matches!(missing, Err(ConfigError::Io(_))));
    }
}
