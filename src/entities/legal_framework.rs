//! Legal frameworks a project can be analyzed against

use rust_embed::Embed;
use serde::{Deserialize, Serialize};

use super::EntityError;

#[derive(Embed)]
#[folder = "catalog/"]
struct Catalog;

const CATALOG_FILE: &str = "legal_frameworks.yaml";

/// A regulation or reporting standard
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LegalFramework {
    /// Stable slug, e.g. `eu-csrd`
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub category: String,
    #[serde(default)]
    pub jurisdiction: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub effective_date: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
    #[serde(default = "default_active")]
    pub is_active: bool,
}

fn default_active() -> bool {
    true
}

/// Frameworks shipped with the binary, used to seed a new workspace
pub fn builtin_catalog() -> Result<Vec<LegalFramework>, EntityError> {
    let file = Catalog::get(CATALOG_FILE).ok_or_else(|| EntityError::Catalog {
        message: format!("embedded {} is missing", CATALOG_FILE),
    })?;
    let text = std::str::from_utf8(file.data.as_ref()).map_err(|e| EntityError::Catalog {
        message: e.to_string(),
    })?;
    serde_yml::from_str(text).map_err(|e| EntityError::Catalog {
        message: e.to_string(),
    })
}
