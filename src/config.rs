// SPDX-License-Identifier: PMPL-1.0-or-later

//! Application configuration and endpoint resolution.
//!
//! The config file names the embedded application's addresses and the
//! detection timings. The active locale table may override both addresses
//! under `config.streamlitUrl` / `config.embedUrl`, so each language can
//! point at its own deployment.

use crate::controller::{DetectionSettings, DEFAULT_SETTLE_DELAY};
use crate::i18n::{Catalog, Lang};
use anyhow::{anyhow, Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use std::time::Duration;

const BUILTIN_CONFIG: &str = include_str!("../app.config.json");

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AppConfig {
    #[serde(default)]
    pub app: AppSection,
    pub streamlit: EmbedSection,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AppSection {
    #[serde(default = "default_name")]
    pub name: String,
    #[serde(default)]
    pub default_language: Lang,
}

impl Default for AppSection {
    fn default() -> Self {
        Self {
            name: default_name(),
            default_language: Lang::En,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EmbedSection {
    pub url: String,
    pub embed_url: String,
    /// Milliseconds before the timeout guard gives up.
    #[serde(default = "default_load_timeout")]
    pub load_timeout: u64,
    /// Milliseconds before the zero-size check runs.
    #[serde(default = "default_detection_timeout")]
    pub detection_timeout: u64,
    /// Milliseconds to wait after a load event before trusting it.
    #[serde(default = "default_settle_delay")]
    pub settle_delay: u64,
}

fn default_name() -> String {
    "Embedded App".to_string()
}

fn default_load_timeout() -> u64 {
    5000
}

fn default_detection_timeout() -> u64 {
    2000
}

fn default_settle_delay() -> u64 {
    DEFAULT_SETTLE_DELAY.as_millis() as u64
}

impl AppConfig {
    /// Config compiled into the binary.
    pub fn builtin() -> Result<Self> {
        Self::from_json_str(BUILTIN_CONFIG).context("parsing built-in app config")
    }

    pub fn from_json_str(content: &str) -> Result<Self> {
        let config: AppConfig = serde_json::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Load JSON, or YAML when the extension says so.
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("reading config {}", path.display()))?;
        let config: AppConfig = match path.extension().and_then(|s| s.to_str()) {
            Some("yaml") | Some("yml") => serde_yaml::from_str(&content)
                .with_context(|| format!("parsing yaml config {}", path.display()))?,
            _ => serde_json::from_str(&content)
                .with_context(|| format!("parsing json config {}", path.display()))?,
        };
        config
            .validate()
            .with_context(|| format!("validating config {}", path.display()))?;
        Ok(config)
    }

    /// `path` if given, otherwise the built-in config.
    pub fn load_or_builtin(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(path) => Self::load(path),
            None => Self::builtin(),
        }
    }

    pub fn validate(&self) -> Result<()> {
        check_url("streamlit.url", &self.streamlit.url)?;
        check_url("streamlit.embedUrl", &self.streamlit.embed_url)?;
        if self.streamlit.load_timeout == 0 {
            return Err(anyhow!("streamlit.loadTimeout must be greater than zero"));
        }
        if self.streamlit.detection_timeout > self.streamlit.load_timeout {
            return Err(anyhow!(
                "streamlit.detectionTimeout ({}ms) exceeds loadTimeout ({}ms)",
                self.streamlit.detection_timeout,
                self.streamlit.load_timeout
            ));
        }
        Ok(())
    }

    pub fn detection_settings(&self) -> DetectionSettings {
        DetectionSettings {
            settle_delay: Duration::from_millis(self.streamlit.settle_delay),
            load_timeout: Duration::from_millis(self.streamlit.load_timeout),
            detection_delay: Duration::from_millis(self.streamlit.detection_timeout),
        }
    }
}

fn check_url(field: &str, value: &str) -> Result<()> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(anyhow!("{} is empty", field));
    }
    let rest = trimmed
        .strip_prefix("https://")
        .or_else(|| trimmed.strip_prefix("http://"))
        .ok_or_else(|| anyhow!("{} must be an http(s) address: {}", field, value))?;
    if rest.is_empty() || rest.starts_with('/') {
        return Err(anyhow!("{} has no host: {}", field, value));
    }
    Ok(())
}

/// Addresses and timings for one language selection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Endpoints {
    pub embed_url: String,
    pub direct_url: String,
    pub load_timeout_ms: u64,
    pub detection_timeout_ms: u64,
}

impl Endpoints {
    /// Locale overrides first, then the app config.
    pub fn resolve(config: &AppConfig, catalog: &Catalog, lang: Lang) -> Self {
        let pick = |key: &str, fallback: &str| {
            catalog
                .lookup(lang, key)
                .filter(|value| !value.trim().is_empty())
                .unwrap_or(fallback)
                .to_string()
        };
        Self {
            embed_url: pick("config.embedUrl", &config.streamlit.embed_url),
            direct_url: pick("config.streamlitUrl", &config.streamlit.url),
            load_timeout_ms: config.streamlit.load_timeout,
            detection_timeout_ms: config.streamlit.detection_timeout,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn config_json(load_timeout: u64, detection_timeout: u64) -> String {
        json!({
            "app": { "name": "Test", "defaultLanguage": "zh" },
            "streamlit": {
                "url": "http://localhost:8501/",
                "embedUrl": "http://localhost:8501/?embed=true",
                "loadTimeout": load_timeout,
                "detectionTimeout": detection_timeout
            }
        })
        .to_string()
    }

    #[test]
    fn builtin_config_is_valid() {
        let config = AppConfig::builtin().unwrap();
        assert_eq!(config.app.default_language, Lang::En);
        assert!(config.streamlit.embed_url.contains("embed=true"));
    }

    #[test]
    fn missing_timings_take_defaults() {
        let config = AppConfig::from_json_str(
            r#"{"streamlit": {"url": "https://a.example/", "embedUrl": "https://a.example/?embed=true"}}"#,
        )
        .unwrap();
        let settings = config.detection_settings();
        assert_eq!(settings.load_timeout, Duration::from_millis(5000));
        assert_eq!(settings.detection_delay, Duration::from_millis(2000));
        assert_eq!(settings.settle_delay, DEFAULT_SETTLE_DELAY);
        assert_eq!(config.app.default_language, Lang::En);
    }

    #[test]
    fn rejects_detection_longer_than_timeout() {
        assert!(AppConfig::from_json_str(&config_json(1000, 2000)).is_err());
        assert!(AppConfig::from_json_str(&config_json(0, 0)).is_err());
        assert!(AppConfig::from_json_str(&config_json(3000, 2000)).is_ok());
    }

    #[test]
    fn rejects_non_http_urls() {
        assert!(check_url("u", "ftp://example.org").is_err());
        assert!(check_url("u", "https:///path").is_err());
        assert!(check_url("u", "").is_err());
        assert!(check_url("u", "https://example.org").is_ok());
    }

    #[test]
    fn locale_overrides_win() {
        let config = AppConfig::from_json_str(&config_json(5000, 2000)).unwrap();
        let catalog = Catalog::from_tables(
            json!({}),
            json!({"config": {"embedUrl": "https://zh.example/?embed=true"}}),
        )
        .unwrap();

        let en = Endpoints::resolve(&config, &catalog, Lang::En);
        assert_eq!(en.embed_url, "http://localhost:8501/?embed=true");
        assert_eq!(en.direct_url, "http://localhost:8501/");

        let zh = Endpoints::resolve(&config, &catalog, Lang::Zh);
        assert_eq!(zh.embed_url, "https://zh.example/?embed=true");
        assert_eq!(zh.direct_url, "http://localhost:8501/");
        assert_eq!(zh.load_timeout_ms, 5000);
    }
}
