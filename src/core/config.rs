//! Configuration management with layered hierarchy

use serde::Deserialize;
use std::path::{Path, PathBuf};

use crate::core::import::DEFAULT_BUNDLE_COLUMN;

/// File name of the per-directory config
pub const LOCAL_CONFIG_FILE: &str = ".inwall.yaml";

/// inwall configuration with layered hierarchy
#[derive(Debug, Default, Clone, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Default output format
    pub default_format: Option<String>,

    /// Log filter used when RUST_LOG is unset
    pub log_level: Option<String>,

    /// Default category filter for `inwall bom`
    pub categories: Option<Vec<String>>,

    /// CSV header that carries the bundle name
    pub bundle_column: Option<String>,
}

impl Config {
    /// Load configuration from all sources, merging in priority order
    pub fn load() -> Self {
        let mut config = Config::default();

        // 1. Built-in defaults (already in Default impl)

        // 2. Global user config (~/.config/inwall/config.yaml)
        if let Some(global_path) = Self::global_config_path() {
            if let Some(global) = Self::read_file(&global_path) {
                config.merge(global);
            }
        }

        // 3. Working directory config (.inwall.yaml)
        if let Some(local) = Self::read_file(Path::new(LOCAL_CONFIG_FILE)) {
            config.merge(local);
        }

        // 4. Environment variables
        if let Ok(format) = std::env::var("INWALL_FORMAT") {
            config.default_format = Some(format);
        }
        if let Ok(level) = std::env::var("INWALL_LOG") {
            config.log_level = Some(level);
        }

        config
    }

    /// Parse a config file; unreadable or malformed files are ignored
    fn read_file(path: &Path) -> Option<Config> {
        if !path.exists() {
            return None;
        }
        let contents = std::fs::read_to_string(path).ok()?;
        Self::from_yaml(&contents)
    }

    fn from_yaml(contents: &str) -> Option<Config> {
        serde_yml::from_str::<Config>(contents).ok()
    }

    /// Get the path to the global config file
    fn global_config_path() -> Option<PathBuf> {
        directories::ProjectDirs::from("", "", "inwall")
            .map(|dirs| dirs.config_dir().join("config.yaml"))
    }

    /// Merge another config into this one (other takes precedence)
    fn merge(&mut self, other: Config) {
        if other.default_format.is_some() {
            self.default_format = other.default_format;
        }
        if other.log_level.is_some() {
            self.log_level = other.log_level;
        }
        if other.categories.is_some() {
            self.categories = other.categories;
        }
        if other.bundle_column.is_some() {
            self.bundle_column = other.bundle_column;
        }
    }

    /// Bundle column header, falling back to `Bundle`
    pub fn bundle_column(&self) -> &str {
        self.bundle_column
            .as_deref()
            .filter(|c| !c.trim().is_empty())
            .unwrap_or(DEFAULT_BUNDLE_COLUMN)
    }

    /// Log filter, falling back to `warn`
    pub fn log_level(&self) -> &str {
        self.log_level.as_deref().unwrap_or("warn")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.bundle_column(), "Bundle");
        assert_eq!(config.log_level(), "warn");
        assert!(config.default_format.is_none());
    }

    #[test]
    fn test_parse_yaml() {
        let config = Config::from_yaml(
            "default_format: json\nlog_level: debug\ncategories: [box, clip]\nbundle_column: Run\n",
        )
        .unwrap();

        assert_eq!(config.default_format.as_deref(), Some("json"));
        assert_eq!(config.log_level(), "debug");
        assert_eq!(
            config.categories,
            Some(vec!["box".to_string(), "clip".to_string()])
        );
        assert_eq!(config.bundle_column(), "Run");
    }

    #[test]
    fn test_merge_other_takes_precedence() {
        let mut base = Config::from_yaml("default_format: csv\nlog_level: info\n").unwrap();
        let other = Config::from_yaml("default_format: json\n").unwrap();
        base.merge(other);

        assert_eq!(base.default_format.as_deref(), Some("json"));
        assert_eq!(base.log_level(), "info");
    }

    #[test]
    fn test_blank_bundle_column_falls_back() {
        let config = Config::from_yaml("bundle_column: '  '\n").unwrap();
        assert_eq!(config.bundle_column(), "Bundle");
    }

    #[test]
    fn test_read_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        assert!(Config::read_file(&dir.path().join("nope.yaml")).is_none());
    }

    #[test]
    fn test_read_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(LOCAL_CONFIG_FILE);
        std::fs::write(&path, "bundle_column: Area\n").unwrap();
        let config = Config::read_file(&path).unwrap();
        assert_eq!(config.bundle_column(), "Area");
    }
}
