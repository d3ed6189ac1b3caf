use anyhow::{Context, Result};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::{fs, path::PathBuf};
use tracing::debug;

pub const API_KEY_ENV: &str = "ALPHAVANTAGE_API_KEY";

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct AlphaVantageConfig {
    pub base_url: String,
    pub api_key: String,
}

impl Default for AlphaVantageConfig {
    fn default() -> Self {
        AlphaVantageConfig {
            base_url: "https://www.alphavantage.co".to_string(),
            api_key: "demo".to_string(),
        }
    }
}

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct ImageProviderConfig {
    pub base_url: String,
}

impl Default for ImageProviderConfig {
    fn default() -> Self {
        ImageProviderConfig {
            base_url: "https://financialmodelingprep.com".to_string(),
        }
    }
}

#[derive(Debug, Deserialize, Serialize, Clone, Default, PartialEq)]
pub struct ProvidersConfig {
    #[serde(default)]
    pub alphavantage: AlphaVantageConfig,
    #[serde(default)]
    pub images: ImageProviderConfig,
}

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct SearchConfig {
    #[serde(default = "SearchConfig::default_debounce_ms")]
    pub debounce_ms: u64,
    #[serde(default = "SearchConfig::default_min_query_len")]
    pub min_query_len: usize,
}

impl SearchConfig {
    fn default_debounce_ms() -> u64 {
        400
    }

    fn default_min_query_len() -> usize {
        2
    }
}

impl Default for SearchConfig {
    fn default() -> Self {
        SearchConfig {
            debounce_ms: Self::default_debounce_ms(),
            min_query_len: Self::default_min_query_len(),
        }
    }
}

#[derive(Debug, Deserialize, Serialize, Clone, Default, PartialEq)]
pub struct AppConfig {
    #[serde(default)]
    pub providers: ProvidersConfig,
    #[serde(default)]
    pub search: SearchConfig,
    pub data_path: Option<String>,
}

impl AppConfig {
    pub fn load() -> Result<Self> {
        debug!("Loading default config");
        let config_path = Self::default_config_path()?;
        Self::load_from_path(&config_path)
    }

    pub fn default_config_path() -> Result<PathBuf> {
        let proj_dirs = ProjectDirs::from("dev", "stockwatch", "stockwatch")
            .context("Could not determine project directories")?;
        Ok(proj_dirs.config_dir().join("config.yaml"))
    }

    pub fn default_data_path(&self) -> Result<PathBuf> {
        if let Some(custom_path) = &self.data_path {
            return Ok(PathBuf::from(custom_path));
        }
        let proj_dirs = ProjectDirs::from("dev", "stockwatch", "stockwatch")
            .context("Could not determine project directories")?;
        Ok(proj_dirs.data_dir().to_path_buf())
    }

    pub fn load_from_path<P: AsRef<std::path::Path>>(path: P) -> Result<Self> {
        let config_str = fs::read_to_string(path.as_ref())
            .with_context(|| format!("Failed to read config file: {}", path.as_ref().display()))?;

        let mut config: Self = serde_yaml::from_str(&config_str)
            .with_context(|| format!("Failed to parse config file: {}", path.as_ref().display()))?;
        config.apply_env_overrides(std::env::var(API_KEY_ENV).ok());
        debug!("Successfully loaded config");
        Ok(config)
    }

    fn apply_env_overrides(&mut self, api_key: Option<String>) {
        if let Some(key) = api_key.filter(|k| !k.trim().is_empty()) {
            debug!("Using API key from {}", API_KEY_ENV);
            self.providers.alphavantage.api_key = key;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_deserialization() {
        let yaml_str = r#"
providers:
  alphavantage:
    base_url: "http://example.com/av"
    api_key: "SECRET"
  images:
    base_url: "http://example.com/img"
search:
  debounce_ms: 250
data_path: "/tmp/stockwatch"
"#;

        let config: AppConfig = serde_yaml::from_str(yaml_str).expect("Failed to deserialize");
        assert_eq!(
            config.providers.alphavantage.base_url,
            "http://example.com/av"
        );
        assert_eq!(config.providers.alphavantage.api_key, "SECRET");
        assert_eq!(config.providers.images.base_url, "http://example.com/img");
        assert_eq!(config.search.debounce_ms, 250);
        assert_eq!(config.search.min_query_len, 2);
        assert_eq!(
            config.default_data_path().unwrap(),
            PathBuf::from("/tmp/stockwatch")
        );
    }

    #[test]
    fn test_empty_config_uses_defaults() {
        let config: AppConfig = serde_yaml::from_str("{}").expect("Failed to deserialize");
        assert_eq!(config, AppConfig::default());
        assert_eq!(
            config.providers.alphavantage.base_url,
            "https://www.alphavantage.co"
        );
        assert_eq!(
            config.providers.images.base_url,
            "https://financialmodelingprep.com"
        );
        assert_eq!(config.search.debounce_ms, 400);
        assert!(config.data_path.is_none());
    }

    #[test]
    fn test_env_api_key_override() {
        let mut config = AppConfig::default();
        config.apply_env_overrides(Some("  ".to_string()));
        assert_eq!(config.providers.alphavantage.api_key, "demo");

        config.apply_env_overrides(Some("FROM_ENV".to_string()));
        assert_eq!(config.providers.alphavantage.api_key, "FROM_ENV");
    }

    #[test]
    fn test_load_from_missing_path_fails() {
        let result = AppConfig::load_from_path("/definitely/not/here.yaml");
        assert!(result.is_err());
        assert!(
            result
                .unwrap_err()
                .to_string()
                .contains("Failed to read config file")
        );
    }
}
