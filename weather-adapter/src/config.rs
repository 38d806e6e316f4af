use anyhow::{Context, Result, anyhow};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::{
    collections::BTreeMap,
    fs,
    path::{Path, PathBuf},
};

use crate::provider::{ProviderId, openweather::DEFAULT_BASE_URL};

/// Environment variable holding the provider credential.
pub const API_KEY_ENV: &str = "WEATHER_API_KEY";

/// Optional environment override for the provider base URL.
pub const BASE_URL_ENV: &str = "WEATHER_API_BASE_URL";

/// Values the adapter is built from. Nothing is read from the process
/// environment after construction.
#[derive(Clone, PartialEq, Eq)]
pub struct AdapterConfig {
    pub api_key: Option<String>,
    pub base_url: String,
}

impl AdapterConfig {
    pub fn new(api_key: Option<String>, base_url: impl Into<String>) -> Self {
        Self {
            api_key: non_empty(api_key),
            base_url: base_url.into(),
        }
    }

    /// Read [`API_KEY_ENV`] and [`BASE_URL_ENV`] from the process environment.
    pub fn from_env() -> Self {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Build from any variable source. Empty values count as unset.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let base_url =
            non_empty(lookup(BASE_URL_ENV)).unwrap_or_else(|| DEFAULT_BASE_URL.to_string());
        Self::new(lookup(API_KEY_ENV), base_url)
    }

    pub fn has_api_key(&self) -> bool {
        self.api_key.is_some()
    }
}

impl Default for AdapterConfig {
    fn default() -> Self {
        Self::new(None, DEFAULT_BASE_URL)
    }
}

// Manual impl so the key never ends up in logs.
impl std::fmt::Debug for AdapterConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AdapterConfig")
            .field("api_key", &self.api_key.as_ref().map(|_| "<redacted>"))
            .field("base_url", &self.base_url)
            .finish()
    }
}

/// Configuration for a single provider (e.g., API key).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProviderConfig {
    pub api_key: String,

    /// Overrides the provider's public endpoint, e.g. for a proxy.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub base_url: Option<String>,
}

/// CLI configuration stored on disk.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq, Eq)]
pub struct Config {
    /// Example TOML:
    /// [providers.openweather]
    /// api_key = "..."
    #[serde(default)]
    pub providers: BTreeMap<String, ProviderConfig>,
}

impl Config {
    pub fn provider_config(&self, id: ProviderId) -> Option<&ProviderConfig> {
        self.providers.get(id.as_str())
    }

    /// Load config from disk, or return an empty default if it doesn't exist yet.
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::config_file_path()?)
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            // First run: no config file, return empty.
            return Ok(Self::default());
        }

        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        Self::from_toml_str(&contents)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))
    }

    pub fn from_toml_str(contents: &str) -> Result<Self> {
        Ok(toml::from_str(contents)?)
    }

    /// Save config to disk, creating parent directories as needed.
    pub fn save(&self) -> Result<PathBuf> {
        let path = Self::config_file_path()?;
        self.save_to(&path)?;
        Ok(path)
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).with_context(|| {
                format!("Failed to create config directory: {}", parent.display())
            })?;
        }

        let toml =
            toml::to_string_pretty(self).context("Failed to serialize configuration to TOML")?;

        fs::write(path, toml)
            .with_context(|| format!("Failed to write config file: {}", path.display()))?;

        Ok(())
    }

    /// Path to the config file.
    pub fn config_file_path() -> Result<PathBuf> {
        let dirs = ProjectDirs::from("dev", "weather-adapter", "weather-cli")
            .ok_or_else(|| anyhow!("Could not determine platform config directory"))?;

        Ok(dirs.config_dir().join("config.toml"))
    }

    /// Set or replace a provider API key, keeping any base URL override.
    pub fn upsert_provider_api_key(&mut self, provider_id: ProviderId, api_key: String) {
        match self.providers.get_mut(provider_id.as_str()) {
            Some(existing) => existing.api_key = api_key,
            None => {
                self.providers.insert(
                    provider_id.as_str().to_string(),
                    ProviderConfig {
                        api_key,
                        base_url: None,
                    },
                );
            }
        }
    }

    /// Returns API key for a provider, if present and non-empty.
    pub fn provider_api_key(&self, provider_id: ProviderId) -> Option<&str> {
        self.provider_config(provider_id)
            .map(|cfg| cfg.api_key.as_str())
            .filter(|key| !key.is_empty())
    }

    pub fn is_provider_configured(&self, provider_id: ProviderId) -> bool {
        self.provider_api_key(provider_id).is_some()
    }

    /// Merge stored values under the environment: variables from `lookup`
    /// win, the file fills the gaps, then built-in defaults.
    pub fn adapter_config(
        &self,
        provider_id: ProviderId,
        lookup: impl Fn(&str) -> Option<String>,
    ) -> AdapterConfig {
        let stored = self.provider_config(provider_id);

        let api_key = non_empty(lookup(API_KEY_ENV))
            .or_else(|| self.provider_api_key(provider_id).map(str::to_owned));

        let base_url = non_empty(lookup(BASE_URL_ENV))
            .or_else(|| stored.and_then(|cfg| non_empty(cfg.base_url.clone())))
            .unwrap_or_else(|| DEFAULT_BASE_URL.to_string());

        AdapterConfig::new(api_key, base_url)
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn vars(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |name: &str| map.get(name).cloned()
    }

    #[test]
    fn from_lookup_reads_key_and_defaults_base_url() {
        let cfg = AdapterConfig::from_lookup(vars(&[(API_KEY_ENV, "SECRET")]));

        assert_eq!(cfg.api_key.as_deref(), Some("SECRET"));
        assert_eq!(cfg.base_url, DEFAULT_BASE_URL);
    }

    #[test]
    fn empty_api_key_counts_as_missing() {
        let cfg = AdapterConfig::from_lookup(vars(&[(API_KEY_ENV, "")]));
        assert!(!cfg.has_api_key());

        let cfg = AdapterConfig::new(Some(String::new()), DEFAULT_BASE_URL);
        assert!(!cfg.has_api_key());
    }

    #[test]
    fn base_url_override_is_honoured() {
        let cfg = AdapterConfig::from_lookup(vars(&[(BASE_URL_ENV, "http://localhost:1234")]));
        assert_eq!(cfg.base_url, "http://localhost:1234");
        assert!(!cfg.has_api_key());
    }

    #[test]
    fn debug_output_redacts_api_key() {
        let cfg = AdapterConfig::new(Some("SECRET".into()), DEFAULT_BASE_URL);
        let rendered = format!("{cfg:?}");

        assert!(!rendered.contains("SECRET"));
        assert!(rendered.contains("<redacted>"));
    }

    #[test]
    fn upsert_sets_and_replaces_api_key() {
        let mut cfg = Config::default();

        cfg.upsert_provider_api_key(ProviderId::OpenWeather, "OPEN_KEY".into());
        assert_eq!(cfg.provider_api_key(ProviderId::OpenWeather), Some("OPEN_KEY"));
        assert!(cfg.is_provider_configured(ProviderId::OpenWeather));

        cfg.upsert_provider_api_key(ProviderId::OpenWeather, "NEW_KEY".into());
        assert_eq!(cfg.provider_api_key(ProviderId::OpenWeather), Some("NEW_KEY"));
    }

    #[test]
    fn upsert_keeps_base_url_override() {
        let mut cfg = Config::from_toml_str(
            r#"
            [providers.openweather]
            api_key = "OLD"
            base_url = "http://proxy.local"
            "#,
        )
        .expect("toml should parse");

        cfg.upsert_provider_api_key(ProviderId::OpenWeather, "NEW".into());

        let stored = cfg.provider_config(ProviderId::OpenWeather).unwrap();
        assert_eq!(stored.api_key, "NEW");
        assert_eq!(stored.base_url.as_deref(), Some("http://proxy.local"));
    }

    #[test]
    fn empty_file_parses_to_default() {
        let cfg = Config::from_toml_str("").expect("empty toml is valid");
        assert_eq!(cfg, Config::default());
        assert!(!cfg.is_provider_configured(ProviderId::OpenWeather));
    }

    #[test]
    fn toml_roundtrip_preserves_providers() {
        let mut cfg = Config::default();
        cfg.upsert_provider_api_key(ProviderId::OpenWeather, "OPEN_KEY".into());

        let rendered = toml::to_string_pretty(&cfg).unwrap();
        assert!(rendered.contains("[providers.openweather]"));
        assert_eq!(Config::from_toml_str(&rendered).unwrap(), cfg);
    }

    #[test]
    fn environment_wins_over_file() {
        let mut cfg = Config::default();
        cfg.upsert_provider_api_key(ProviderId::OpenWeather, "FILE_KEY".into());

        let merged = cfg.adapter_config(ProviderId::OpenWeather, vars(&[(API_KEY_ENV, "ENV_KEY")]));
        assert_eq!(merged.api_key.as_deref(), Some("ENV_KEY"));

        let merged = cfg.adapter_config(ProviderId::OpenWeather, vars(&[]));
        assert_eq!(merged.api_key.as_deref(), Some("FILE_KEY"));
        assert_eq!(merged.base_url, DEFAULT_BASE_URL);
    }

    #[test]
    fn unconfigured_everywhere_yields_no_key() {
        let merged = Config::default().adapter_config(ProviderId::OpenWeather, vars(&[]));
        assert!(!merged.has_api_key());
    }
}
