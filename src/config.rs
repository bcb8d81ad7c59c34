//! Browser configuration.
//!
//! Settings are read from a TOML file. Every key is optional; anything missing
//! falls back to the defaults below.

use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result};
use serde::Deserialize;

pub const CONFIG_ENV_VAR: &str = "LIBRARY_BROWSER_CONFIG";
const DEFAULT_CONFIG_FILE: &str = "library-browser.toml";

#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct BrowserConfig {
    pub backend: BackendConfig,
    pub search: SearchConfig,
    pub pagination: PaginationConfig,
    pub scroll: ScrollConfig,
    pub selection: SelectionConfig,
    pub logging: LoggingConfig,
}

#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default)]
pub struct BackendConfig {
    pub base_url: String,
}

impl Default for BackendConfig {
    fn default() -> Self {
        Self {
            base_url: "http://127.0.0.1:8080/api".to_string(),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default)]
pub struct SearchConfig {
    pub debounce_ms: u64,
    /// Queries shorter than this (in characters, after trimming) never hit the backend
    pub min_query_chars: usize,
    /// Results kept per resource kind
    pub per_kind_cap: usize,
    /// How many rows each provider asks the backend for before filtering
    pub fetch_limit: usize,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            debounce_ms: 300,
            min_query_chars: 2,
            per_kind_cap: 5,
            fetch_limit: 50,
        }
    }
}

impl SearchConfig {
    pub fn debounce(&self) -> Duration {
        Duration::from_millis(self.debounce_ms)
    }
}

#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default)]
pub struct PaginationConfig {
    pub page_size: usize,
}

impl Default for PaginationConfig {
    fn default() -> Self {
        Self { page_size: 20 }
    }
}

#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default)]
pub struct ScrollConfig {
    /// Fraction of the sentinel that must be visible
    pub threshold: f64,
    /// Layout units the viewport is grown by before intersecting
    pub root_margin: f64,
    pub cooldown_ms: u64,
}

impl Default for ScrollConfig {
    fn default() -> Self {
        Self {
            threshold: 0.1,
            root_margin: 100.0,
            cooldown_ms: 500,
        }
    }
}

impl ScrollConfig {
    pub fn cooldown(&self) -> Duration {
        Duration::from_millis(self.cooldown_ms)
    }
}

#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct SelectionConfig {
    pub prune_on_filter_change: bool,
}

#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub dir: PathBuf,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            dir: PathBuf::from(".logs"),
        }
    }
}

impl BrowserConfig {
    pub fn from_toml(content: &str) -> Result<Self> {
        toml::from_str(content).context("invalid configuration")
    }

    /// Load from `path`, else `$LIBRARY_BROWSER_CONFIG`, else
    /// `library-browser.toml`. A missing default file yields the defaults; an
    /// explicitly named file must exist.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let explicit = path
            .map(Path::to_path_buf)
            .or_else(|| std::env::var_os(CONFIG_ENV_VAR).map(PathBuf::from));

        let path = match explicit {
            Some(path) => path,
            None => {
                let default = PathBuf::from(DEFAULT_CONFIG_FILE);
                if !default.exists() {
                    return Ok(Self::default());
                }
                default
            }
        };

        let content = std::fs::read_to_string(&path)
            .with_context(|| format!("reading config {}", path.display()))?;
        Self::from_toml(&content).with_context(|| format!("parsing config {}", path.display()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_file_yields_defaults() {
        let config = BrowserConfig::from_toml("").unwrap();
        assert_eq!(config, BrowserConfig::default());
        assert_eq!(config.search.debounce(), Duration::from_millis(300));
        assert_eq!(config.scroll.cooldown(), Duration::from_millis(500));
        assert!(!config.selection.prune_on_filter_change);
    }

    #[test]
    fn partial_sections_keep_remaining_defaults() {
        let config = BrowserConfig::from_toml(
            r#"
            [search]
            per_kind_cap = 3

            [selection]
            prune_on_filter_change = true
            "#,
        )
        .unwrap();
        assert_eq!(config.search.per_kind_cap, 3);
        assert_eq!(config.search.min_query_chars, 2);
        assert!(config.selection.prune_on_filter_change);
        assert_eq!(config.pagination.page_size, 20);
    }

    #[test]
    fn unknown_types_are_rejected() {
        assert!(BrowserConfig::from_toml("[search]\ndebounce_ms = \"soon\"").is_err());
    }
}
