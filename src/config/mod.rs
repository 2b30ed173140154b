use anyhow::{bail, Context};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

pub const DEFAULT_BASE_URL: &str = "http://www.omdbapi.com/";

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Configuration {
    #[serde(default)]
    pub omdb: OmdbConfig,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct OmdbConfig {
    #[serde(rename = "baseUrl", default = "default_base_url")]
    pub base_url: String,
    #[serde(rename = "apikey", default)]
    pub api_key: String,
    #[serde(rename = "timeoutSeconds")]
    pub timeout_seconds: Option<u64>,
    #[serde(rename = "userAgent")]
    pub user_agent: Option<String>,
}

impl Default for OmdbConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            api_key: String::new(),
            timeout_seconds: None,
            user_agent: None,
        }
    }
}

fn default_base_url() -> String {
    DEFAULT_BASE_URL.to_string()
}

impl Configuration {
    pub fn from_file(path: &str) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read configuration file {path}"))?;
        Self::from_yaml(&content)
    }

    pub fn from_yaml(content: &str) -> anyhow::Result<Self> {
        let config: Configuration = serde_yaml::from_str(content)?;
        Ok(config)
    }

    /// Loads the file if it exists. A missing file is only acceptable when the
    /// API key comes from the command line.
    pub fn load(path: &str, api_key: Option<&str>) -> anyhow::Result<Self> {
        let mut config = if Path::new(path).exists() {
            Self::from_file(path)?
        } else if api_key.is_some() {
            Self::default()
        } else {
            bail!("configuration file {path} not found and no --api-key given");
        };

        if let Some(key) = api_key {
            config.omdb.api_key = key.to_string();
        }

        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> anyhow::Result<()> {
        if self.omdb.api_key.trim().is_empty() {
            bail!("omdb.apikey must not be empty");
        }
        url::Url::parse(&self.omdb.base_url)
            .with_context(|| format!("invalid omdb.baseUrl: {}", self.omdb.base_url))?;
        Ok(())
    }

    /// `None` means requests never time out on the client side.
    pub fn request_timeout(&self) -> Option<Duration> {
        self.omdb.timeout_seconds.map(Duration::from_secs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_full_omdb_section() {
        let config = Configuration::from_yaml(
            "omdb:\n  baseUrl: https://example.test/\n  apikey: abc123\n  timeoutSeconds: 5\n",
        )
        .unwrap();

        assert_eq!(config.omdb.base_url, "https://example.test/");
        assert_eq!(config.omdb.api_key, "abc123");
        assert_eq!(config.request_timeout(), Some(Duration::from_secs(5)));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn defaults_base_url_and_has_no_timeout() {
        let config = Configuration::from_yaml("omdb:\n  apikey: abc123\n").unwrap();

        assert_eq!(config.omdb.base_url, DEFAULT_BASE_URL);
        assert_eq!(config.request_timeout(), None);
    }

    #[test]
    fn rejects_missing_api_key() {
        let config = Configuration::from_yaml("omdb:\n  baseUrl: https://example.test/\n").unwrap();
        assert!(config.validate().is_err());
    }

    #[test]
    fn rejects_bad_base_url() {
        let config =
            Configuration::from_yaml("omdb:\n  baseUrl: not a url\n  apikey: abc123\n").unwrap();
        assert!(config.validate().is_err());
    }

    #[test]
    fn command_line_key_works_without_file() {
        let config = Configuration::load("/nonexistent/popcorn.yaml", Some("cli-key")).unwrap();
        assert_eq!(config.omdb.api_key, "cli-key");
        assert_eq!(config.omdb.base_url, DEFAULT_BASE_URL);
    }

    #[test]
    fn missing_file_without_key_is_an_error() {
        assert!(Configuration::load("/nonexistent/popcorn.yaml", None).is_err());
    }
}
