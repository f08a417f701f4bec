//! Acting user resolution

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::core::config::Config;

/// The user every created record is attributed to
///
/// Resolved once at command entry and passed explicitly to anything that
/// tags or stores records.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CurrentUser(String);

impl CurrentUser {
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    /// Configured user, then git `user.name`, then the login name
    pub fn resolve(config: &Config) -> Self {
        if let Some(user) = config.user.as_deref().map(str::trim).filter(|u| !u.is_empty()) {
            return Self::new(user);
        }

        if let Ok(output) = std::process::Command::new("git")
            .args(["config", "user.name"])
            .output()
        {
            if output.status.success() {
                let name = String::from_utf8_lossy(&output.stdout).trim().to_string();
                if !name.is_empty() {
                    return Self(name);
                }
            }
        }

        Self(
            std::env::var("USER")
                .or_else(|_| std::env::var("USERNAME"))
                .unwrap_or_else(|_| "unknown".to_string()),
        )
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Form safe for use as an object-key path segment
    pub fn key_segment(&self) -> String {
        let cleaned: String = self
            .0
            .chars()
            .map(|c| if c.is_ascii_alphanumeric() || c == '-' { c } else { '_' })
            .collect();
        if cleaned.is_empty() {
            "_".to_string()
        } else {
            cleaned
        }
    }
}

impl fmt::Display for CurrentUser {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
