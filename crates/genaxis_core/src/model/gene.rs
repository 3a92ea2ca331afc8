//! Gene record and its genomic coordinate attributes.
//!
//! # Invariants
//! - A gene belongs to exactly one species.
//! - `name` is unique per species only through the import upsert key.
//! - Exon positions and frames are stored as comma-delimited text.

use super::species::SpeciesId;
use super::{require_max_chars, require_non_empty, ValidationError};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

pub type GeneId = Uuid;

pub const CHROM_MAX_CHARS: usize = 255;
pub const STRAND_MAX_CHARS: usize = 1;

/// Coordinate and annotation fields as published by UCSC gene tracks.
///
/// Serialized with the UCSC column names (`txStart`, `exonCount`, ...).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GeneAttributes {
    /// Secondary gene symbol (UCSC `name2`).
    #[serde(default)]
    pub name2: Option<String>,
    /// UCSC binning index.
    #[serde(default)]
    pub bin: Option<i64>,
    /// Chromosome or scaffold.
    #[serde(default)]
    pub chrom: Option<String>,
    /// `+`, `-`, or `?` when unknown.
    #[serde(default)]
    pub strand: Option<String>,
    #[serde(default, rename = "txStart")]
    pub tx_start: Option<i64>,
    #[serde(default, rename = "txEnd")]
    pub tx_end: Option<i64>,
    #[serde(default, rename = "cdsStart")]
    pub cds_start: Option<i64>,
    #[serde(default, rename = "cdsEnd")]
    pub cds_end: Option<i64>,
    #[serde(default, rename = "exonCount")]
    pub exon_count: Option<i64>,
    #[serde(default, rename = "exonStarts")]
    pub exon_starts: Option<String>,
    #[serde(default, rename = "exonEnds")]
    pub exon_ends: Option<String>,
    #[serde(default)]
    pub score: Option<i64>,
    #[serde(default, rename = "exonFrames")]
    pub exon_frames: Option<String>,
    #[serde(default, rename = "cdsStartStat")]
    pub cds_start_stat: Option<String>,
    #[serde(default, rename = "cdsEndStat")]
    pub cds_end_stat: Option<String>,
}

impl GeneAttributes {
    pub fn validate(&self) -> Result<(), ValidationError> {
        if let Some(chrom) = self.chrom.as_deref() {
            require_max_chars("chrom", chrom, CHROM_MAX_CHARS)?;
        }
        // `+`, `-` and `?` are the usual markers; other single characters are kept.
        if let Some(strand) = self.strand.as_deref() {
            require_max_chars("strand", strand, STRAND_MAX_CHARS)?;
        }

        for (field, value) in [
            ("bin", self.bin),
            ("txStart", self.tx_start),
            ("txEnd", self.tx_end),
            ("cdsStart", self.cds_start),
            ("cdsEnd", self.cds_end),
            ("exonCount", self.exon_count),
        ] {
            if let Some(value) = value {
                if value < 0 {
                    return Err(ValidationError::Negative { field, value });
                }
            }
        }

        check_range("txStart", self.tx_start, "txEnd", self.tx_end)?;
        check_range("cdsStart", self.cds_start, "cdsEnd", self.cds_end)?;
        Ok(())
    }
}

fn check_range(
    start_field: &'static str,
    start: Option<i64>,
    end_field: &'static str,
    end: Option<i64>,
) -> Result<(), ValidationError> {
    if let (Some(start), Some(end)) = (start, end) {
        if end < start {
            return Err(ValidationError::ReversedRange {
                start_field,
                end_field,
                start,
                end,
            });
        }
    }
    Ok(())
}

/// A gene annotation belonging to one species.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Gene {
    pub id: GeneId,
    /// Owning species id, serialized as `species`.
    #[serde(rename = "species")]
    pub species_id: SpeciesId,
    pub name: String,
    /// Full gene sequence, when known.
    pub sequence: Option<String>,
    #[serde(flatten)]
    pub attributes: GeneAttributes,
    pub created_at: i64,
    pub updated_at: i64,
}

impl Gene {
    /// Creates an unsaved gene with a generated id and empty attributes.
    pub fn new(species_id: SpeciesId, name: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            species_id,
            name: name.into(),
            sequence: None,
            attributes: GeneAttributes::default(),
            created_at: 0,
            updated_at: 0,
        }
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        require_non_empty("name", &self.name)?;
        self.attributes.validate()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn gene() -> Gene {
        Gene::new(Uuid::new_v4(), "unc-54")
    }

    #[test]
    fn reversed_transcription_range_is_rejected() {
        let mut gene = gene();
        gene.attributes.tx_start = Some(500);
        gene.attributes.tx_end = Some(100);
        let err = gene.validate().unwrap_err();
        assert!(matches!(
            err,
            ValidationError::ReversedRange {
                start_field: "txStart",
                ..
            }
        ));
    }

    #[test]
    fn single_character_strands_are_accepted_but_words_are_not() {
        let mut gene = gene();
        for strand in ["+", "-", "?", "."] {
            gene.attributes.strand = Some(strand.to_string());
            gene.validate().unwrap();
        }

        gene.attributes.strand = Some("plus".to_string());
        assert_eq!(
            gene.validate().unwrap_err(),
            ValidationError::TooLong {
                field: "strand",
                max: 1,
                actual: 4
            }
        );
    }

    #[test]
    fn negative_exon_count_is_rejected() {
        let mut gene = gene();
        gene.attributes.exon_count = Some(-1);
        assert!(matches!(
            gene.validate().unwrap_err(),
            ValidationError::Negative {
                field: "exonCount",
                value: -1
            }
        ));
    }

    #[test]
    fn serializes_with_ucsc_column_names() {
        let mut gene = gene();
        gene.attributes.tx_start = Some(10);
        gene.attributes.exon_starts = Some("10,20".to_string());
        let json = serde_json::to_value(&gene).unwrap();
        assert_eq!(json["txStart"], 10);
        assert_eq!(json["exonStarts"], "10,20");
        assert_eq!(json["species"], gene.species_id.to_string());
        assert!(json.get("attributes").is_none());
    }
}
