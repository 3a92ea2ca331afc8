//! CRISPR edit simulation record.
//!
//! # Invariants
//! - `edited_sequence` is a snapshot of `apply_edit(gene.sequence, target,
//!   replacement)` taken at save time. Later gene sequence changes do not
//!   refresh it; saving the edit again does.

use super::gene::GeneId;
use super::{require_max_chars, require_non_empty, ValidationError};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

pub type EditId = Uuid;

pub const EDIT_SEQUENCE_MAX_CHARS: usize = 100;

/// A simulated substitution of `target_sequence` by `replacement_sequence`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CrisprEdit {
    pub id: EditId,
    pub gene_id: GeneId,
    pub target_sequence: String,
    /// May be empty to model a deletion.
    pub replacement_sequence: String,
    /// Derived by the repository write path.
    pub edited_sequence: String,
    pub created_at: i64,
    pub updated_at: i64,
}

impl CrisprEdit {
    pub fn new(
        gene_id: GeneId,
        target_sequence: impl Into<String>,
        replacement_sequence: impl Into<String>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            gene_id,
            target_sequence: target_sequence.into(),
            replacement_sequence: replacement_sequence.into(),
            edited_sequence: String::new(),
            created_at: 0,
            updated_at: 0,
        }
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        require_non_empty("target_sequence", &self.target_sequence)?;
        require_max_chars(
            "target_sequence",
            &self.target_sequence,
            EDIT_SEQUENCE_MAX_CHARS,
        )?;
        require_max_chars(
            "replacement_sequence",
            &self.replacement_sequence,
            EDIT_SEQUENCE_MAX_CHARS,
        )?;
        Ok(())
    }
}

/// Replaces the first occurrence of `target` in `sequence` by `replacement`.
///
/// Returns `sequence` unchanged when `target` does not occur. Never fails.
pub fn apply_edit(sequence: &str, target: &str, replacement: &str) -> String {
    sequence.replacen(target, replacement, 1)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn replaces_only_the_first_occurrence() {
        assert_eq!(apply_edit("AAGTTAAGT", "AGT", "C"), "ACTAAGT");
    }

    #[test]
    fn missing_target_leaves_sequence_unchanged() {
        assert_eq!(apply_edit("ACGTACGT", "TTT", "G"), "ACGTACGT");
        assert_eq!(apply_edit("", "A", "G"), "");
    }

    #[test]
    fn empty_replacement_deletes_target() {
        assert_eq!(apply_edit("GATTACA", "TTA", ""), "GACA");
    }

    #[test]
    fn first_occurrence_property_holds_for_many_inputs() {
        let sequences = ["ACGT", "AAAA", "GATTACAGATTACA", "", "TTTTGGGG"];
        let targets = ["A", "AA", "GATT", "CAG", "TG", "Z"];
        for sequence in sequences {
            for target in targets {
                let edited = apply_edit(sequence, target, "xx");
                match sequence.find(target) {
                    Some(pos) => {
                        let expected = format!(
                            "{}xx{}",
                            &sequence[..pos],
                            &sequence[pos + target.len()..]
                        );
                        assert_eq!(edited, expected, "{sequence} / {target}");
                    }
                    None => assert_eq!(edited, sequence),
                }
            }
        }
    }

    #[test]
    fn empty_target_is_rejected_by_validation() {
        let edit = CrisprEdit::new(Uuid::new_v4(), "", "A");
        assert_eq!(
            edit.validate().unwrap_err(),
            ValidationError::EmptyField {
                field: "target_sequence"
            }
        );
    }

    #[test]
    fn overlong_replacement_is_rejected() {
        let edit = CrisprEdit::new(Uuid::new_v4(), "ACG", "T".repeat(101));
        assert!(matches!(
            edit.validate().unwrap_err(),
            ValidationError::TooLong {
                field: "replacement_sequence",
                ..
            }
        ));
    }
}
