//! Column resolution - mapping spreadsheet headers to indicator fields
//!
//! Required fields (`id`, `text`) resolve only on exact normalized matches.
//! Optional fields resolve on substring matches. A column is bound to at
//! most one field and each field to at most one column.

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

use super::error::IngestError;
use super::normalize::normalize;

pub use crate::entities::indicator::SemanticField;

/// Order in which fields claim columns during automatic resolution
const RESOLUTION_ORDER: [SemanticField; 6] = [
    SemanticField::Id,
    SemanticField::Text,
    SemanticField::Subcategory,
    SemanticField::Category,
    SemanticField::Source,
    SemanticField::Notes,
];

/// A column in the header row: its position and its literal header text
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnRef {
    pub index: usize,
    pub header: String,
}

/// Resolved association from semantic fields to header columns
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct HeaderMapping {
    columns: BTreeMap<SemanticField, ColumnRef>,
}

impl HeaderMapping {
    pub fn new() -> Self {
        Self::default()
    }

    /// Bind a field to a column
    ///
    /// Fails if the field is already bound or the column already belongs to
    /// another field.
    pub fn bind(&mut self, field: SemanticField, column: ColumnRef) -> Result<(), IngestError> {
        if let Some(existing) = self.columns.get(&field) {
            return Err(IngestError::InvalidMapping {
                reason: format!(
                    "field '{}' is already mapped to column '{}'",
                    field, existing.header
                ),
            });
        }
        if let Some((other, _)) = self.columns.iter().find(|(_, c)| c.index == column.index) {
            return Err(IngestError::InvalidMapping {
                reason: format!(
                    "column '{}' is already mapped to field '{}'",
                    column.header, other
                ),
            });
        }
        self.columns.insert(field, column);
        Ok(())
    }

    pub fn get(&self, field: SemanticField) -> Option<&ColumnRef> {
        self.columns.get(&field)
    }

    pub fn column_index(&self, field: SemanticField) -> Option<usize> {
        self.columns.get(&field).map(|c| c.index)
    }

    pub fn contains(&self, field: SemanticField) -> bool {
        self.columns.contains_key(&field)
    }

    fn is_claimed(&self, index: usize) -> bool {
        self.columns.values().any(|c| c.index == index)
    }

    /// Iterate bound fields in field order
    pub fn iter(&self) -> impl Iterator<Item = (SemanticField, &ColumnRef)> {
        self.columns.iter().map(|(f, c)| (*f, c))
    }

    /// Required fields with no bound column
    pub fn missing_required(&self) -> BTreeSet<SemanticField> {
        SemanticField::all()
            .iter()
            .copied()
            .filter(|f| f.is_required() && !self.contains(*f))
            .collect()
    }
}

/// Outcome of automatic column resolution
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnResolution {
    pub mapping: HeaderMapping,
    pub missing_required: BTreeSet<SemanticField>,
}

impl ColumnResolution {
    pub fn is_complete(&self) -> bool {
        self.missing_required.is_empty()
    }
}

/// Whether a normalized header matches a field
fn matches_field(field: SemanticField, normalized: &str) -> bool {
    match field {
        SemanticField::Id => normalized == "id" || normalized == "indicator id",
        SemanticField::Text => normalized == "indicator text",
        SemanticField::Subcategory => {
            normalized.contains("subcategory")
                || normalized.contains("sub-category")
                || normalized.contains("sub category")
        }
        SemanticField::Category => normalized.contains("category") && !normalized.contains("sub"),
        SemanticField::Source => normalized.contains("source"),
        SemanticField::Notes => {
            normalized.contains("note")
                || normalized.contains("comment")
                || normalized.contains("remark")
        }
    }
}

/// Resolve header cells to semantic fields
///
/// Deterministic: the leftmost unclaimed matching column wins for each field.
pub fn resolve(headers: &[String]) -> ColumnResolution {
    let normalized: Vec<String> = headers.iter().map(|h| normalize(h)).collect();
    let mut mapping = HeaderMapping::new();

    for field in RESOLUTION_ORDER {
        let found = normalized.iter().enumerate().find(|(idx, norm)| {
            !norm.is_empty() && !mapping.is_claimed(*idx) && matches_field(field, norm)
        });
        if let Some((index, _)) = found {
            mapping.columns.insert(
                field,
                ColumnRef {
                    index,
                    header: headers[index].clone(),
                },
            );
        }
    }

    let missing_required = mapping.missing_required();
    ColumnResolution {
        mapping,
        missing_required,
    }
}

/// A user's explicit choice of header columns for the required fields
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ManualMapping {
    pub id_header: String,
    pub text_header: String,
    /// Zero-based row to treat as the header row (default: first row)
    pub header_row: Option<usize>,
}

impl ManualMapping {
    pub fn new(id_header: impl Into<String>, text_header: impl Into<String>) -> Self {
        Self {
            id_header: id_header.into(),
            text_header: text_header.into(),
            header_row: None,
        }
    }

    pub fn with_header_row(mut self, row: usize) -> Self {
        self.header_row = Some(row);
        self
    }
}

/// Find a header cell by exact text, falling back to a normalized match
fn find_header(headers: &[String], wanted: &str) -> Option<usize> {
    headers.iter().position(|h| h == wanted).or_else(|| {
        let target = normalize(wanted);
        headers.iter().position(|h| normalize(h) == target)
    })
}

/// Relabel the chosen header cells to their canonical names
///
/// Destructive: the header row is rewritten in place so the following
/// [`resolve`] finds both required fields by exact match.
pub fn apply_manual_mapping(headers: &mut [String], manual: &ManualMapping) -> Result<(), IngestError> {
    let id_idx = find_header(headers, &manual.id_header).ok_or_else(|| IngestError::InvalidMapping {
        reason: format!("no column named '{}' in the header row", manual.id_header),
    })?;
    let text_idx =
        find_header(headers, &manual.text_header).ok_or_else(|| IngestError::InvalidMapping {
            reason: format!("no column named '{}' in the header row", manual.text_header),
        })?;

    if id_idx == text_idx {
        return Err(IngestError::InvalidMapping {
            reason: format!(
                "column '{}' cannot be used for both ID and Indicator text",
                headers[id_idx]
            ),
        });
    }

    // Another column already carrying a canonical name would shadow the choice
    for (idx, header) in headers.iter_mut().enumerate() {
        if idx == id_idx || idx == text_idx {
            continue;
        }
        let norm = normalize(header);
        if matches_field(SemanticField::Id, &norm) || matches_field(SemanticField::Text, &norm) {
            header.push_str(" (unmapped)");
        }
    }

    headers[id_idx] = SemanticField::Id.canonical_header().to_string();
    headers[text_idx] = SemanticField::Text.canonical_header().to_string();
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn headers(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_resolve_required_exact() {
        let res = resolve(&headers(&["ID", "Indicator text"]));
        assert!(res.is_complete());
        assert_eq!(res.mapping.column_index(SemanticField::Id), Some(0));
        assert_eq!(res.mapping.column_index(SemanticField::Text), Some(1));
    }

    #[test]
    fn test_resolve_indicator_id_variant() {
        let res = resolve(&headers(&["  Indicator   ID ", "INDICATOR TEXT"]));
        assert!(res.is_complete());
        assert_eq!(res.mapping.get(SemanticField::Id).unwrap().header, "  Indicator   ID ");
    }

    #[test]
    fn test_resolve_missing_required() {
        let res = resolve(&headers(&["Code", "Description"]));
        assert_eq!(
            res.missing_required,
            [SemanticField::Id, SemanticField::Text].into_iter().collect()
        );
    }

    #[test]
    fn test_resolve_text_is_not_substring() {
        let res = resolve(&headers(&["ID", "Indicator text (EN)"]));
        assert!(res.missing_required.contains(&SemanticField::Text));
    }

    #[test]
    fn test_resolve_leftmost_wins() {
        let res = resolve(&headers(&["ID", "id", "Indicator text"]));
        assert_eq!(res.mapping.column_index(SemanticField::Id), Some(0));
    }

    #[test]
    fn test_resolve_optional_fields() {
        let res = resolve(&headers(&[
            "Sub-Category",
            "ID",
            "Main Category",
            "Indicator text",
            "Data Source",
            "Comments",
        ]));
        assert_eq!(res.mapping.column_index(SemanticField::Subcategory), Some(0));
        assert_eq!(res.mapping.column_index(SemanticField::Category), Some(2));
        assert_eq!(res.mapping.column_index(SemanticField::Source), Some(4));
        assert_eq!(res.mapping.column_index(SemanticField::Notes), Some(5));
    }

    #[test]
    fn test_resolve_subcategory_never_maps_to_category() {
        let res = resolve(&headers(&["ID", "Indicator text", "Subcategory"]));
        assert_eq!(res.mapping.column_index(SemanticField::Subcategory), Some(2));
        assert!(!res.mapping.contains(SemanticField::Category));
    }

    #[test]
    fn test_resolve_blank_headers_ignored() {
        let res = resolve(&headers(&["", "ID", "Indicator text"]));
        assert_eq!(res.mapping.column_index(SemanticField::Id), Some(1));
    }

    #[test]
    fn test_bind_rejects_aliasing() {
        let mut mapping = HeaderMapping::new();
        let col = ColumnRef {
            index: 0,
            header: "Code".into(),
        };
        mapping.bind(SemanticField::Id, col.clone()).unwrap();
        assert!(mapping.bind(SemanticField::Text, col).is_err());
    }

    #[test]
    fn test_manual_mapping_relabels() {
        let mut hs = headers(&["Code", "Description", "Theme"]);
        apply_manual_mapping(&mut hs, &ManualMapping::new("Code", "Description")).unwrap();
        assert_eq!(hs, headers(&["ID", "Indicator text", "Theme"]));
        assert!(resolve(&hs).is_complete());
    }

    #[test]
    fn test_manual_mapping_same_column_rejected() {
        let mut hs = headers(&["Code", "Description"]);
        let err = apply_manual_mapping(&mut hs, &ManualMapping::new("Code", "Code")).unwrap_err();
        assert!(matches!(err, IngestError::InvalidMapping { .. }));
    }

    #[test]
    fn test_manual_mapping_unknown_header() {
        let mut hs = headers(&["Code", "Description"]);
        assert!(apply_manual_mapping(&mut hs, &ManualMapping::new("Nope", "Description")).is_err());
    }

    #[test]
    fn test_manual_mapping_shadowing_column_renamed() {
        let mut hs = headers(&["ID", "Ref", "Statement"]);
        apply_manual_mapping(&mut hs, &ManualMapping::new("Ref", "Statement")).unwrap();
        let res = resolve(&hs);
        assert_eq!(res.mapping.column_index(SemanticField::Id), Some(1));
        assert_eq!(res.mapping.column_index(SemanticField::Text), Some(2));
    }
}
