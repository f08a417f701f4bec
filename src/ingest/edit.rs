//! Copy-on-write edits to an indicator set

use crate::entities::indicator::{Indicator, SemanticField};

use super::error::IngestError;

/// Persistent indicator collection; clones share structure
pub type IndicatorSet = im::Vector<Indicator>;

/// Return a new set with one field of one indicator replaced
///
/// The value is trimmed the same way parsed cells are. The input set is
/// left untouched, so a renderer holding it never observes
/// a partially updated indicator. Callers must revalidate the returned set.
pub fn apply_edit(
    indicators: &IndicatorSet,
    index: usize,
    field: SemanticField,
    value: impl Into<String>,
) -> Result<IndicatorSet, IngestError> {
    let current = indicators.get(index).ok_or(IngestError::RowOutOfRange {
        index,
        len: indicators.len(),
    })?;

    let mut updated = current.clone();
    updated.set_field(field, value.into().trim().to_string());

    Ok(indicators.update(index, updated))
}
