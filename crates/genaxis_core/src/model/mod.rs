//! Record schema for species, genes and CRISPR edits.
//!
//! # Responsibility
//! - Define the canonical records persisted by the repositories.
//! - Validate field-level constraints before any write.
//!
//! # Invariants
//! - Every record is identified by a stable UUID v4.
//! - `CrisprEdit::edited_sequence` is derived, never caller-supplied.

pub mod crispr_edit;
pub mod gene;
pub mod species;

/// Field-level validation failure for any record.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("{field} cannot be empty")]
    EmptyField { field: &'static str },
    #[error("{field} exceeds {max} characters (got {actual})")]
    TooLong {
        field: &'static str,
        max: usize,
        actual: usize,
    },
    #[error("{field} must be non-negative (got {value})")]
    Negative { field: &'static str, value: i64 },
    #[error("{end_field} ({end}) must not be earlier than {start_field} ({start})")]
    ReversedRange {
        start_field: &'static str,
        end_field: &'static str,
        start: i64,
        end: i64,
    },
}

pub(crate) fn require_non_empty(field: &'static str, value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(ValidationError::EmptyField { field });
    }
    Ok(())
}

pub(crate) fn require_max_chars(
    field: &'static str,
    value: &str,
    max: usize,
) -> Result<(), ValidationError> {
    let actual = value.chars().count();
    if actual > max {
        return Err(ValidationError::TooLong { field, max, actual });
    }
    Ok(())
}
