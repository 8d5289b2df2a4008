//! Engine configuration.
//!
//! Configuration can be built from a flat string map (as handed over by a host
//! application) or loaded from a TOML file:
//!
//! ```toml
//! base_url = "https://pokeapi.co/api/v2"
//! list_path = "pokemon-species"
//! names_path = "pokemon-species"
//! language = "ko"
//! page_size = 20
//! bulk_batch_size = 100
//! bulk_max_total = 1025
//! trace_level = "debug"
//! trace_file = "~/.local/share/scrolldex/scrolldex-otlp.json"
//! ```

use std::collections::BTreeMap;
use std::path::Path;

use serde::Deserialize;

use crate::domain::error::{CatalogError, Result};

const DEFAULT_BASE_URL: &str = "https://pokeapi.co/api/v2";
const DEFAULT_RESOURCE_PATH: &str = "pokemon-species";
const DEFAULT_LANGUAGE: &str = "ko";
const DEFAULT_PAGE_SIZE: usize = 20;
const DEFAULT_BULK_BATCH_SIZE: usize = 100;
const DEFAULT_BULK_MAX_TOTAL: usize = 1025;

/// Engine configuration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// Root URL of the catalog REST API.
    pub base_url: String,

    /// Path of the paged listing endpoint, relative to `base_url`.
    pub list_path: String,

    /// Path of the name-decoration endpoint, relative to `base_url`.
    pub names_path: String,

    /// Language code whose localized name decorates each entry.
    pub language: String,

    /// Entries per infinite-scroll page. Default: 20
    pub page_size: usize,

    /// Entries per background bulk batch. Default: 100
    pub bulk_batch_size: usize,

    /// Upper bound on the bulk dataset, whatever size the source reports.
    /// Default: 1025
    pub bulk_max_total: usize,

    /// Tracing filter directive (`trace`, `debug`, `info`, ...). Default: `"info"`
    pub trace_level: Option<String>,

    /// Trace export file. Defaults to a file in the data directory.
    pub trace_file: Option<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            list_path: DEFAULT_RESOURCE_PATH.to_string(),
            names_path: DEFAULT_RESOURCE_PATH.to_string(),
            language: DEFAULT_LANGUAGE.to_string(),
            page_size: DEFAULT_PAGE_SIZE,
            bulk_batch_size: DEFAULT_BULK_BATCH_SIZE,
            bulk_max_total: DEFAULT_BULK_MAX_TOTAL,
            trace_level: None,
            trace_file: None,
        }
    }
}

impl Config {
    /// Builds configuration from a string map, falling back to defaults.
    ///
    /// Unparsable numbers are ignored rather than rejected, so a host can pass
    /// its raw key/value configuration straight through.
    ///
    /// # Example
    ///
    /// ```rust
    /// use std::collections::BTreeMap;
    /// use scrolldex::Config;
    ///
    /// let mut map = BTreeMap::new();
    /// map.insert("page_size".to_string(), "30".to_string());
    /// map.insert("language".to_string(), "ja".to_string());
    ///
    /// let config = Config::from_map(&map);
    /// assert_eq!(config.page_size, 30);
    /// assert_eq!(config.language, "ja");
    /// assert_eq!(config.bulk_batch_size, 100);
    /// ```
    #[must_use]
    pub fn from_map(map: &BTreeMap<String, String>) -> Self {
        let defaults = Self::default();
        let text = |key: &str, fallback: String| {
            map.get(key)
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty())
                .unwrap_or(fallback)
        };
        let number = |key: &str, fallback: usize| {
            map.get(key)
                .and_then(|s| s.trim().parse::<usize>().ok())
                .unwrap_or(fallback)
        };

        Self {
            base_url: text("base_url", defaults.base_url),
            list_path: text("list_path", defaults.list_path),
            names_path: text("names_path", defaults.names_path),
            language: text("language", defaults.language),
            page_size: number("page_size", defaults.page_size),
            bulk_batch_size: number("bulk_batch_size", defaults.bulk_batch_size),
            bulk_max_total: number("bulk_max_total", defaults.bulk_max_total),
            trace_level: map.get("trace_level").cloned(),
            trace_file: map.get("trace_file").cloned(),
        }
        .normalized()
    }

    /// Loads configuration from a TOML file. Missing keys take their defaults.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError::Config`] if the file cannot be read or parsed.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path).map_err(|e| {
            CatalogError::Config(format!("failed to read {}: {e}", path.display()))
        })?;

        let config: Self = toml::from_str(&contents)
            .map_err(|e| CatalogError::Config(format!("failed to parse {}: {e}", path.display())))?;

        tracing::debug!(path = %path.display(), "configuration loaded");
        Ok(config.normalized())
    }

    /// Clamps sizes so that every fetch requests at least one entry.
    #[must_use]
    pub fn normalized(mut self) -> Self {
        self.page_size = self.page_size.max(1);
        self.bulk_batch_size = self.bulk_batch_size.max(1);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn map_falls_back_on_bad_numbers() {
        let mut map = BTreeMap::new();
        map.insert("page_size".to_string(), "lots".to_string());
        map.insert("bulk_max_total".to_string(), " 151 ".to_string());
        map.insert("base_url".to_string(), "   ".to_string());

        let config = Config::from_map(&map);
        assert_eq!(config.page_size, DEFAULT_PAGE_SIZE);
        assert_eq!(config.bulk_max_total, 151);
        assert_eq!(config.base_url, DEFAULT_BASE_URL);
    }

    #[test]
    fn zero_sizes_are_normalized() {
        let mut map = BTreeMap::new();
        map.insert("page_size".to_string(), "0".to_string());
        map.insert("bulk_batch_size".to_string(), "0".to_string());

        let config = Config::from_map(&map);
        assert_eq!(config.page_size, 1);
        assert_eq!(config.bulk_batch_size, 1);
    }

    #[test]
    fn loads_partial_toml_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "language = \"en\"\nbulk_max_total = 151").unwrap();

        let config = Config::from_file(file.path()).unwrap();
        assert_eq!(config.language, "en");
        assert_eq!(config.bulk_max_total, 151);
        assert_eq!(config.page_size, DEFAULT_PAGE_SIZE);
    }

    #[test]
    fn rejects_unknown_keys() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "pagesize = 3").unwrap();

        assert!(matches!(
            Config::from_file(file.path()),
            Err(CatalogError::Config(_))
        ));
    }

    #[test]
    fn missing_file_is_config_error() {
        let dir = tempfile::tempdir().unwrap();
        assert!(matches!(
            Config::from_file(dir.path().join("absent.toml")),
            Err(CatalogError::Config(_))
        ));
    }
}
