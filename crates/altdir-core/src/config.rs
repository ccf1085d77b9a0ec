use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

pub const ENV_API_URL: &str = "ALTDIR_API_URL";
pub const ENV_API_KEY: &str = "ALTDIR_API_KEY";

/// Main configuration structure
///
/// Loaded from the config file, then environment overrides on top.
/// CLI flags get the last word (the binary applies those).
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct Config {
    #[serde(default)]
    pub remote: RemoteConfig,
    #[serde(default)]
    pub search: SearchConfig,
    #[serde(default)]
    pub pagination: PaginationConfig,
    #[serde(default)]
    pub storage: StorageConfig,
}

impl Config {
    /// Load config from the default location, falling back to defaults
    pub fn load() -> crate::Result<Self> {
        let mut config = Self::load_from(&Self::config_path()?)?;
        config.apply_env();
        Ok(config)
    }

    pub fn load_from(path: &Path) -> crate::Result<Self> {
        if path.exists() {
            let contents = std::fs::read_to_string(path)?;
            toml::from_str(&contents)
                .map_err(|e| crate::Error::ConfigError(format!("Failed to parse config: {}", e)))
        } else {
            Ok(Self::default())
        }
    }

    pub fn to_toml(&self) -> crate::Result<String> {
        toml::to_string_pretty(self)
            .map_err(|e| crate::Error::ConfigError(format!("Failed to serialize config: {}", e)))
    }

    /// Write config to `path`, creating parent directories as needed
    pub fn save_to(&self, path: &Path) -> crate::Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        std::fs::write(path, self.to_toml()?)?;
        Ok(())
    }

    /// `ALTDIR_API_URL` / `ALTDIR_API_KEY` beat whatever the file said
    pub fn apply_env(&mut self) {
        self.apply_overrides(
            std::env::var(ENV_API_URL).ok(),
            std::env::var(ENV_API_KEY).ok(),
        );
    }

    fn apply_overrides(&mut self, url: Option<String>, key: Option<String>) {
        if let Some(url) = url.filter(|u| !u.trim().is_empty()) {
            self.remote.base_url = Some(url);
        }
        if let Some(key) = key.filter(|k| !k.trim().is_empty()) {
            self.remote.api_key = Some(key);
        }
    }

    /// `<config_dir>/altdir/config.toml`
    pub fn config_path() -> crate::Result<PathBuf> {
        Ok(dirs::config_dir()
            .ok_or_else(|| crate::Error::ConfigError("Could not find config directory".into()))?
            .join("altdir")
            .join("config.toml"))
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RemoteConfig {
    /// Backend root, e.g. https://xyz.supabase.co. No URL means offline.
    #[serde(default)]
    pub base_url: Option<String>,

    /// Public (anon) key sent as `apikey` and bearer token
    #[serde(default)]
    pub api_key: Option<String>,

    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    #[serde(default = "default_retries")]
    pub retries: u32,
}

fn default_timeout_secs() -> u64 {
    10
}

fn default_retries() -> u32 {
    2
}

impl Default for RemoteConfig {
    fn default() -> Self {
        Self {
            base_url: None,
            api_key: None,
            timeout_secs: default_timeout_secs(),
            retries: default_retries(),
        }
    }
}

impl RemoteConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs.max(1))
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SearchConfig {
    /// Quiet period before a keystroke search fires
    #[serde(default = "default_debounce_ms")]
    pub debounce_ms: u64,

    /// Re-order results by fuzzy score instead of source order
    #[serde(default)]
    pub ranked: bool,
}

fn default_debounce_ms() -> u64 {
    300
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            debounce_ms: default_debounce_ms(),
            ranked: false,
        }
    }
}

impl SearchConfig {
    pub fn debounce(&self) -> Duration {
        Duration::from_millis(self.debounce_ms)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PaginationConfig {
    #[serde(default = "default_page_size")]
    pub page_size: u32,
}

fn default_page_size() -> u32 {
    crate::providers::sample::DEFAULT_PAGE_SIZE
}

impl Default for PaginationConfig {
    fn default() -> Self {
        Self {
            page_size: default_page_size(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct StorageConfig {
    /// SQLite file for presets and pincode; defaults under the data dir
    #[serde(default)]
    pub path: Option<PathBuf>,
}

impl StorageConfig {
    /// `<data_dir>/altdir/store.db` unless configured otherwise
    pub fn resolved_path(&self) -> crate::Result<PathBuf> {
        if let Some(path) = &self.path {
            return Ok(path.clone());
        }
        Ok(dirs::data_dir()
            .ok_or_else(|| crate::Error::ConfigError("Could not find data directory".into()))?
            .join("altdir")
            .join("store.db"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.search.debounce_ms, 300);
        assert_eq!(config.pagination.page_size, 12);
        assert_eq!(config.remote.timeout_secs, 10);
        assert!(config.remote.base_url.is_none());
    }

    #[test]
    fn test_partial_file_fills_defaults() {
        let config: Config = toml::from_str(
            r#"
            [remote]
            base_url = "https://db.example.com"

            [search]
            ranked = true
            "#,
        )
        .unwrap();

        assert_eq!(config.remote.base_url.as_deref(), Some("https://db.example.com"));
        assert_eq!(config.remote.retries, 2);
        assert!(config.search.ranked);
        assert_eq!(config.search.debounce(), Duration::from_millis(300));
        assert_eq!(config.pagination.page_size, 12);
    }

    #[test]
    fn test_overrides_skip_blank_values() {
        let mut config = Config::default();
        config.apply_overrides(Some("https://env.example.com".into()), Some("  ".into()));
        assert_eq!(config.remote.base_url.as_deref(), Some("https://env.example.com"));
        assert!(config.remote.api_key.is_none());
    }

    #[test]
    fn test_save_and_reload() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("altdir").join("config.toml");

        let mut config = Config::default();
        config.pagination.page_size = 24;
        config.save_to(&path).unwrap();

        let loaded = Config::load_from(&path).unwrap();
        assert_eq!(loaded, config);
    }

    #[test]
    fn test_toml_carries_defaults() {
        let text = Config::default().to_toml().unwrap();
        for section in ["[remote]", "[search]", "[pagination]", "debounce_ms = 300"] {
            assert!(text.contains(section), "missing {} in:\n{}", section, text);
        }
    }
}
