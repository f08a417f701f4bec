//! Indicator entity type - one row of an ingested sustainability framework

use serde::{Deserialize, Serialize};

/// A single sustainability indicator
///
/// `id` is user-supplied and never generated. Optional metadata defaults to
/// an empty string rather than being absent.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Indicator {
    /// User-supplied identifier, unique within a set
    #[serde(alias = "indicator_id")]
    pub id: String,

    /// Descriptive statement
    #[serde(alias = "indicator_text")]
    pub text: String,

    #[serde(default)]
    pub category: String,

    #[serde(default)]
    pub subcategory: String,

    #[serde(default)]
    pub source: String,

    #[serde(default)]
    pub notes: String,
}

impl Indicator {
    pub fn new(id: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            text: text.into(),
            ..Default::default()
        }
    }

    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = category.into();
        self
    }

    pub fn with_subcategory(mut self, subcategory: impl Into<String>) -> Self {
        self.subcategory = subcategory.into();
        self
    }

    pub fn with_source(mut self, source: impl Into<String>) -> Self {
        self.source = source.into();
        self
    }

    pub fn with_notes(mut self, notes: impl Into<String>) -> Self {
        self.notes = notes.into();
        self
    }

    /// Read a field by its semantic name
    pub fn field(&self, field: SemanticField) -> &str {
        match field {
            SemanticField::Id => &self.id,
            SemanticField::Text => &self.text,
            SemanticField::Category => &self.category,
            SemanticField::Subcategory => &self.subcategory,
            SemanticField::Source => &self.source,
            SemanticField::Notes => &self.notes,
        }
    }

    /// Replace a single field by its semantic name
    pub fn set_field(&mut self, field: SemanticField, value: String) {
        match field {
            SemanticField::Id => self.id = value,
            SemanticField::Text => self.text = value,
            SemanticField::Category => self.category = value,
            SemanticField::Subcategory => self.subcategory = value,
            SemanticField::Source => self.source = value,
            SemanticField::Notes => self.notes = value,
        }
    }
}

/// Semantic indicator fields that spreadsheet columns can be mapped to
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SemanticField {
    Id,
    Text,
    Category,
    Subcategory,
    Source,
    Notes,
}

impl SemanticField {
    /// All fields in export column order
    pub fn all() -> &'static [SemanticField] {
        &[
            SemanticField::Id,
            SemanticField::Text,
            SemanticField::Category,
            SemanticField::Subcategory,
            SemanticField::Source,
            SemanticField::Notes,
        ]
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            SemanticField::Id => "id",
            SemanticField::Text => "text",
            SemanticField::Category => "category",
            SemanticField::Subcategory => "subcategory",
            SemanticField::Source => "source",
            SemanticField::Notes => "notes",
        }
    }

    /// Fields that must be mapped before rows can be parsed
    pub fn is_required(&self) -> bool {
        matches!(self, SemanticField::Id | SemanticField::Text)
    }

    /// Header written on export and used when relabeling a manual mapping
    pub fn canonical_header(&self) -> &'static str {
        match self {
            SemanticField::Id => "ID",
            SemanticField::Text => "Indicator text",
            SemanticField::Category => "Category",
            SemanticField::Subcategory => "Subcategory",
            SemanticField::Source => "Source",
            SemanticField::Notes => "Notes",
        }
    }
}

impl std::fmt::Display for SemanticField {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for SemanticField {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "id" | "indicator_id" => Ok(SemanticField::Id),
            "text" | "indicator_text" => Ok(SemanticField::Text),
            "category" => Ok(SemanticField::Category),
            "subcategory" | "sub-category" => Ok(SemanticField::Subcategory),
            "source" => Ok(SemanticField::Source),
            "notes" | "note" => Ok(SemanticField::Notes),
            _ => Err(format!(
                "Unknown indicator field: '{}'. Use id, text, category, subcategory, source, or notes",
                s
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_field_roundtrip() {
        let mut ind = Indicator::new("E1", "Emissions");
        for field in SemanticField::all() {
            ind.set_field(*field, format!("v-{}", field));
            assert_eq!(ind.field(*field), format!("v-{}", field));
        }
    }

    #[test]
    fn test_field_parsing() {
        assert_eq!("ID".parse::<SemanticField>().unwrap(), SemanticField::Id);
        assert_eq!(
            "indicator_text".parse::<SemanticField>().unwrap(),
            SemanticField::Text
        );
        assert!("title".parse::<SemanticField>().is_err());
    }

    #[test]
    fn test_wire_aliases() {
        let json = r#"{"indicator_id":"E1.1","indicator_text":"Scope 1 emissions"}"#;
        let ind: Indicator = serde_json::from_str(json).unwrap();
        assert_eq!(ind.id, "E1.1");
        assert_eq!(ind.text, "Scope 1 emissions");
        assert_eq!(ind.category, "");
    }
}
