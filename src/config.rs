use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};
use std::{path::Path, time::Duration};

use crate::metadata::{fetch::MAX_BODY_BYTES, headers::ACCEPT_LANGUAGE_DEFAULT};

const DEFAULT_LISTEN_ADDR: &str = "0.0.0.0:8080";
const DEFAULT_PROXY_BASE: &str = "https://r.jina.ai/";
/// Bounds a single HTTP call
const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 10;
/// Bounds direct fetch and proxy fetch combined
const DEFAULT_OVERALL_TIMEOUT_SECS: u64 = 15;

/// Settings for the metadata extraction engine
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct MetadataConfig {
    /// Rendering proxy; the target URL is appended verbatim
    #[serde(default = "default_proxy_base")]
    pub proxy_base: String,

    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,

    #[serde(default = "default_overall_timeout_secs")]
    pub overall_timeout_secs: u64,

    /// Response bytes kept per fetch, the rest is discarded
    #[serde(default = "default_max_body_bytes")]
    pub max_body_bytes: usize,

    #[serde(default = "default_accept_language")]
    pub accept_language: String,
}

impl Default for MetadataConfig {
    fn default() -> Self {
        Self {
            proxy_base: default_proxy_base(),
            request_timeout_secs: DEFAULT_REQUEST_TIMEOUT_SECS,
            overall_timeout_secs: DEFAULT_OVERALL_TIMEOUT_SECS,
            max_body_bytes: MAX_BODY_BYTES,
            accept_language: default_accept_language(),
        }
    }
}

impl MetadataConfig {
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    pub fn overall_timeout(&self) -> Duration {
        Duration::from_secs(self.overall_timeout_secs)
    }
}

fn default_proxy_base() -> String {
    DEFAULT_PROXY_BASE.to_string()
}

fn default_request_timeout_secs() -> u64 {
    DEFAULT_REQUEST_TIMEOUT_SECS
}

fn default_overall_timeout_secs() -> u64 {
    DEFAULT_OVERALL_TIMEOUT_SECS
}

fn default_max_body_bytes() -> usize {
    MAX_BODY_BYTES
}

fn default_accept_language() -> String {
    ACCEPT_LANGUAGE_DEFAULT.to_string()
}

fn default_listen_addr() -> String {
    DEFAULT_LISTEN_ADDR.to_string()
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default = "default_listen_addr")]
    pub listen_addr: String,

    #[serde(default)]
    pub metadata: MetadataConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            listen_addr: default_listen_addr(),
            metadata: MetadataConfig::default(),
        }
    }
}

impl Config {
    fn validate(&self) -> Result<()> {
        let meta = &self.metadata;

        if meta.request_timeout_secs == 0 {
            bail!("metadata.request_timeout_secs must be greater than 0");
        }
        if meta.overall_timeout_secs < meta.request_timeout_secs {
            bail!(
                "metadata.overall_timeout_secs ({}) must not be shorter than metadata.request_timeout_secs ({})",
                meta.overall_timeout_secs,
                meta.request_timeout_secs
            );
        }
        if meta.max_body_bytes == 0 {
            bail!("metadata.max_body_bytes must be greater than 0");
        }

        match url::Url::parse(&meta.proxy_base) {
            Ok(u) if matches!(u.scheme(), "http" | "https") => {}
            _ => bail!(
                "metadata.proxy_base must be an absolute http(s) url, got {:?}",
                meta.proxy_base
            ),
        }

        Ok(())
    }

    /// Apply `PORT` and `METADATA_PROXY_BASE` from the given lookup.
    fn apply_env(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(port) = lookup("PORT").filter(|p| !p.trim().is_empty()) {
            self.listen_addr = format!("0.0.0.0:{}", port.trim());
        }
        if let Some(base) = lookup("METADATA_PROXY_BASE").filter(|b| !b.trim().is_empty()) {
            self.metadata.proxy_base = base.trim().to_string();
        }
    }

    fn from_yaml(config_str: &str) -> Result<Self> {
        if config_str.trim().is_empty() {
            return Ok(Self::default());
        }
        serde_yml::from_str(config_str).context("config is malformed")
    }

    /// Load from a YAML file (defaults when it does not exist), then apply
    /// environment overrides and validate.
    pub fn load_with(path: Option<&Path>) -> Result<Self> {
        let mut config = match path {
            Some(path) if path.exists() => {
                let config_str = std::fs::read_to_string(path)
                    .with_context(|| format!("failed to read {}", path.display()))?;
                Self::from_yaml(&config_str)?
            }
            Some(path) => {
                log::warn!("{} not found, using defaults", path.display());
                Self::default()
            }
            None => Self::default(),
        };

        config.apply_env(|key| std::env::var(key).ok());
        config.validate()?;

        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::io::Write;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.listen_addr, "0.0.0.0:8080");
        assert_eq!(config.metadata.proxy_base, "https://r.jina.ai/");
        assert_eq!(config.metadata.request_timeout(), Duration::from_secs(10));
        assert_eq!(config.metadata.overall_timeout(), Duration::from_secs(15));
        assert_eq!(config.metadata.max_body_bytes, 2 * 1024 * 1024);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_yaml_fills_defaults() {
        let config = Config::from_yaml("metadata:\n  request_timeout_secs: 5\n").unwrap();
        assert_eq!(config.metadata.request_timeout_secs, 5);
        assert_eq!(config.metadata.overall_timeout_secs, 15);
        assert_eq!(config.listen_addr, "0.0.0.0:8080");

        assert_eq!(Config::from_yaml("  \n").unwrap(), Config::default());
        assert!(Config::from_yaml("metadata: [").is_err());
    }

    #[test]
    fn test_validate_rejects_bad_values() {
        let mut config = Config::default();
        config.metadata.request_timeout_secs = 0;
        assert!(config.validate().is_err());

        let mut config = Config::default();
        config.metadata.overall_timeout_secs = 5;
        assert!(config.validate().is_err());

        let mut config = Config::default();
        config.metadata.max_body_bytes = 0;
        assert!(config.validate().is_err());

        let mut config = Config::default();
        config.metadata.proxy_base = "ftp://proxy.example.com/".into();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_env_overrides() {
        let env: HashMap<&str, &str> = [
            ("PORT", "9000"),
            ("METADATA_PROXY_BASE", " http://127.0.0.1:3000/proxy/ "),
        ]
        .into_iter()
        .collect();

        let mut config = Config::default();
        config.apply_env(|key| env.get(key).map(|v| v.to_string()));
        assert_eq!(config.listen_addr, "0.0.0.0:9000");
        assert_eq!(config.metadata.proxy_base, "http://127.0.0.1:3000/proxy/");

        let mut config = Config::default();
        config.apply_env(|_| Some(String::new()));
        assert_eq!(config, Config::default());
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "metadata:").unwrap();
        writeln!(file, "  accept_language: en-US").unwrap();
        writeln!(file, "  request_timeout_secs: 3").unwrap();

        let config = Config::load_with(Some(file.path())).unwrap();
        assert_eq!(config.metadata.accept_language, "en-US");
        assert_eq!(config.metadata.request_timeout_secs, 3);
    }

    #[test]
    fn test_load_missing_file_uses_defaults() {
        let tmp = tempfile::tempdir().unwrap();
        let config = Config::load_with(Some(&tmp.path().join("config.yaml"))).unwrap();
        assert_eq!(config.metadata.request_timeout_secs, 10);
        assert_eq!(config.metadata.max_body_bytes, MAX_BODY_BYTES);
    }

    #[test]
    fn test_load_rejects_invalid_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "metadata:").unwrap();
        writeln!(file, "  max_body_bytes: 0").unwrap();
        assert!(Config::load_with(Some(file.path())).is_err());
    }
}
