//! Species record.

use super::{require_max_chars, require_non_empty, ValidationError};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

pub type SpeciesId = Uuid;

pub const SPECIES_NAME_MAX_CHARS: usize = 100;
pub const SPECIES_LABEL_MAX_CHARS: usize = 150;

/// An organism, e.g. `Homo sapiens`. `name` is unique across all species.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Species {
    pub id: SpeciesId,
    pub name: String,
    /// Blank when unknown.
    pub scientific_name: String,
    /// Blank when unknown.
    pub common_name: String,
    /// Unix epoch milliseconds, set by storage.
    pub created_at: i64,
    /// Unix epoch milliseconds, set by storage.
    pub updated_at: i64,
}

impl Species {
    /// Creates an unsaved species with a generated id and blank labels.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            scientific_name: String::new(),
            common_name: String::new(),
            created_at: 0,
            updated_at: 0,
        }
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        // Storage keeps the trimmed name, so its limit applies to the trimmed text.
        require_non_empty("name", &self.name)?;
        require_max_chars("name", self.name.trim(), SPECIES_NAME_MAX_CHARS)?;
        require_max_chars(
            "scientific_name",
            &self.scientific_name,
            SPECIES_LABEL_MAX_CHARS,
        )?;
        require_max_chars("common_name", &self.common_name, SPECIES_LABEL_MAX_CHARS)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_species_has_blank_labels_and_validates() {
        let species = Species::new("Homo sapiens");
        assert!(species.scientific_name.is_empty());
        assert!(species.common_name.is_empty());
        species.validate().unwrap();
    }

    #[test]
    fn blank_name_is_rejected() {
        let err = Species::new("   ").validate().unwrap_err();
        assert_eq!(err, ValidationError::EmptyField { field: "name" });
    }

    #[test]
    fn overlong_name_is_rejected() {
        let err = Species::new("x".repeat(101)).validate().unwrap_err();
        assert!(matches!(
            err,
            ValidationError::TooLong {
                field: "name",
                max: 100,
                actual: 101
            }
        ));
    }

    #[test]
    fn name_limit_counts_trimmed_characters() {
        Species::new(format!(" {} ", "x".repeat(100)))
            .validate()
            .unwrap();
    }
}
