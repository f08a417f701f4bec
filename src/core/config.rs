//! Configuration management with layered hierarchy

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::core::workspace::Workspace;
use crate::ingest::validate::{DuplicateReporting, ValidationPolicy, DEFAULT_POLICY};

/// Seconds before extraction is abandoned when nothing is configured
pub const DEFAULT_EXTRACTION_TIMEOUT_SECS: u64 = 120;

/// sbench configuration with layered hierarchy
#[derive(Debug, Default, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Name recorded on created records
    pub user: Option<String>,

    /// Default output format
    pub default_format: Option<String>,

    /// Whether duplicate indicator IDs block confirmation
    pub duplicates_are_blocking: Option<bool>,

    /// Per-row or aggregate duplicate reporting
    pub duplicate_reporting: Option<DuplicateReporting>,

    /// Extraction deadline in seconds
    pub extraction_timeout_secs: Option<u64>,
}

impl Config {
    /// Load configuration from all sources, merging in priority order
    pub fn load() -> Self {
        Self::load_for(Workspace::discover().ok().as_ref())
    }

    /// Load configuration with an already located workspace
    pub fn load_for(workspace: Option<&Workspace>) -> Self {
        let mut config = Config::default();

        // 1. Built-in defaults (already in Default impl)

        // 2. Global user config (~/.config/sbench/config.yaml)
        if let Some(global_path) = Self::global_config_path() {
            if let Some(global) = Self::read_file(&global_path) {
                config.merge(global);
            }
        }

        // 3. Workspace config (.sbench/config.yaml)
        if let Some(ws) = workspace {
            if let Some(local) = Self::read_file(&ws.config_path()) {
                config.merge(local);
            }
        }

        // 4. Environment variables
        config.merge(Self::from_env());
        config
    }

    fn read_file(path: &Path) -> Option<Config> {
        let contents = std::fs::read_to_string(path).ok()?;
        match serde_yml::from_str::<Option<Config>>(&contents) {
            Ok(parsed) => parsed,
            Err(e) => {
                tracing::warn!(path = %path.display(), error = %e, "ignoring unreadable config file");
                None
            }
        }
    }

    fn from_env() -> Config {
        let mut config = Config::default();
        if let Ok(user) = std::env::var("SBENCH_USER") {
            config.user = Some(user);
        }
        if let Ok(v) = std::env::var("SBENCH_DUPLICATES_BLOCKING") {
            match v.trim().to_lowercase().as_str() {
                "1" | "true" | "yes" | "on" => config.duplicates_are_blocking = Some(true),
                "0" | "false" | "no" | "off" => config.duplicates_are_blocking = Some(false),
                _ => tracing::warn!(value = %v, "ignoring invalid SBENCH_DUPLICATES_BLOCKING"),
            }
        }
        if let Ok(v) = std::env::var("SBENCH_DUPLICATE_REPORTING") {
            match v.parse() {
                Ok(mode) => config.duplicate_reporting = Some(mode),
                Err(e) => tracing::warn!(error = %e, "ignoring invalid SBENCH_DUPLICATE_REPORTING"),
            }
        }
        if let Ok(v) = std::env::var("SBENCH_EXTRACTION_TIMEOUT") {
            match v.trim().parse() {
                Ok(secs) => config.extraction_timeout_secs = Some(secs),
                Err(_) => tracing::warn!(value = %v, "ignoring invalid SBENCH_EXTRACTION_TIMEOUT"),
            }
        }
        config
    }

    /// Get the path to the global config file
    pub fn global_config_path() -> Option<PathBuf> {
        directories::ProjectDirs::from("", "", "sbench")
            .map(|dirs| dirs.config_dir().join("config.yaml"))
    }

    /// Merge another config into this one (other takes precedence)
    fn merge(&mut self, other: Config) {
        if other.user.is_some() {
            self.user = other.user;
        }
        if other.default_format.is_some() {
            self.default_format = other.default_format;
        }
        if other.duplicates_are_blocking.is_some() {
            self.duplicates_are_blocking = other.duplicates_are_blocking;
        }
        if other.duplicate_reporting.is_some() {
            self.duplicate_reporting = other.duplicate_reporting;
        }
        if other.extraction_timeout_secs.is_some() {
            self.extraction_timeout_secs = other.extraction_timeout_secs;
        }
    }

    /// Validation policy with configured overrides applied
    pub fn validation_policy(&self) -> ValidationPolicy {
        let mut policy = DEFAULT_POLICY;
        if let Some(blocking) = self.duplicates_are_blocking {
            policy = policy.with_duplicates_blocking(blocking);
        }
        if let Some(reporting) = self.duplicate_reporting {
            policy = policy.with_duplicate_reporting(reporting);
        }
        policy
    }

    pub fn extraction_timeout(&self) -> Duration {
        Duration::from_secs(
            self.extraction_timeout_secs
                .unwrap_or(DEFAULT_EXTRACTION_TIMEOUT_SECS),
        )
    }

    /// Value of a key as displayed by `config show`
    pub fn get(&self, key: &str) -> Option<String> {
        match key {
            "user" => self.user.clone(),
            "default_format" => self.default_format.clone(),
            "duplicates_are_blocking" => self.duplicates_are_blocking.map(|b| b.to_string()),
            "duplicate_reporting" => self.duplicate_reporting.map(|r| r.to_string()),
            "extraction_timeout_secs" => self.extraction_timeout_secs.map(|s| s.to_string()),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_merge_prefers_other() {
        let mut base = Config {
            user: Some("base".into()),
            duplicates_are_blocking: Some(true),
            ..Default::default()
        };
        base.merge(Config {
            duplicates_are_blocking: Some(false),
            ..Default::default()
        });
        assert_eq!(base.user.as_deref(), Some("base"));
        assert_eq!(base.duplicates_are_blocking, Some(false));
    }

    #[test]
    fn test_validation_policy_defaults() {
        assert_eq!(Config::default().validation_policy(), DEFAULT_POLICY);
        assert_eq!(
            Config::default().extraction_timeout(),
            Duration::from_secs(DEFAULT_EXTRACTION_TIMEOUT_SECS)
        );
    }

    #[test]
    fn test_validation_policy_overrides() {
        let config = Config {
            duplicates_are_blocking: Some(false),
            duplicate_reporting: Some(DuplicateReporting::Aggregate),
            ..Default::default()
        };
        let policy = config.validation_policy();
        assert!(!policy.duplicates_are_blocking);
        assert_eq!(policy.duplicate_reporting, DuplicateReporting::Aggregate);
    }

    #[test]
    fn test_parse_yaml_file() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("config.yaml");
        std::fs::write(
            &path,
            "user: ana\nduplicate_reporting: aggregate\nextraction_timeout_secs: 5\n",
        )
        .unwrap();
        let config = Config::read_file(&path).unwrap();
        assert_eq!(config.user.as_deref(), Some("ana"));
        assert_eq!(config.duplicate_reporting, Some(DuplicateReporting::Aggregate));
        assert_eq!(config.extraction_timeout_secs, Some(5));
    }

    #[test]
    fn test_commented_default_file_is_empty() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("config.yaml");
        std::fs::write(&path, "# only comments\n").unwrap();
        assert!(Config::read_file(&path).is_none());
    }
}
