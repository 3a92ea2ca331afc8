//! Mapping of UCSC track rows onto gene attributes.
//!
//! UCSC returns `{"columnTypes": [{"name": ..}, ..], "<track>": {"chrI": [[..], ..]}}`
//! when `jsonOutputArrays=1`. Rows are positional and only meaningful against
//! the server-declared column list.

use crate::model::gene::GeneAttributes;
use log::warn;
use serde_json::{Map, Value};

/// One track row keyed by column name.
pub type GeneRow = Map<String, Value>;

pub const UNKNOWN_GENE_NAME: &str = "unknown";

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RowError {
    #[error("row has no `{0}` value")]
    MissingField(&'static str),
    #[error("`{field}` is not an integer: {value}")]
    InvalidInteger { field: &'static str, value: String },
}

/// Zips `row` against `columns`; extra values or extra columns are dropped.
pub fn map_row_to_dict(row: &[Value], columns: &[String]) -> GeneRow {
    columns
        .iter()
        .cloned()
        .zip(row.iter().cloned())
        .collect()
}

/// Flattens the payload of `track` into rows.
///
/// Returns `None` when `track` is absent from `data`. The payload may be keyed
/// by chromosome or be a bare row array. Array rows are zipped against
/// `columnTypes`; object rows are taken as they are.
pub fn track_rows(data: &Value, track: &str) -> Option<Vec<GeneRow>> {
    let track_data = data.get(track)?;
    let columns = column_names(data);

    let groups: Vec<&Vec<Value>> = match track_data {
        Value::Object(by_chrom) => by_chrom.values().filter_map(Value::as_array).collect(),
        Value::Array(rows) => vec![rows],
        _ => Vec::new(),
    };

    let mut rows = Vec::new();
    for group in groups {
        for raw in group {
            match raw {
                Value::Array(values) => rows.push(map_row_to_dict(values, &columns)),
                Value::Object(map) => rows.push(map.clone()),
                other => warn!(
                    "event=ucsc_row_skip module=ucsc status=invalid_row track={track} kind={}",
                    json_kind(other)
                ),
            }
        }
    }
    Some(rows)
}

/// Names declared in `columnTypes`, in order.
pub fn column_names(data: &Value) -> Vec<String> {
    data.get("columnTypes")
        .and_then(Value::as_array)
        .map(|columns| {
            columns
                .iter()
                .filter_map(|column| column.get("name").and_then(Value::as_str))
                .map(str::to_string)
                .collect()
        })
        .unwrap_or_default()
}

/// Integer `1` is `+`, any other integer `-`, strings pass through, and
/// everything else (missing, null, float, bool, array, object) is `?`.
pub fn normalize_strand(value: Option<&Value>) -> String {
    match value {
        Some(Value::Number(number)) if number.is_i64() || number.is_u64() => {
            if number.as_i64() == Some(1) {
                "+".to_string()
            } else {
                "-".to_string()
            }
        }
        Some(Value::String(text)) => text.clone(),
        _ => "?".to_string(),
    }
}

/// Arrays become comma-joined text; strings pass through; missing or null is "".
pub fn flatten_list_field(value: Option<&Value>) -> String {
    match value {
        Some(Value::Array(items)) => items.iter().map(value_text).collect::<Vec<_>>().join(","),
        Some(other) => value_text(other),
        None => String::new(),
    }
}

/// Prefers a non-empty `name2`, then a non-empty `name`, then `"unknown"`.
pub fn resolve_gene_name(row: &GeneRow) -> String {
    non_empty_text(row.get("name2"))
        .or_else(|| non_empty_text(row.get("name")))
        .unwrap_or_else(|| UNKNOWN_GENE_NAME.to_string())
}

/// Converts a track row into gene attributes.
///
/// Integer columns accept JSON integers or numeric strings. List columns are
/// flattened and the strand is normalized.
pub fn attributes_from_row(row: &GeneRow) -> Result<GeneAttributes, RowError> {
    Ok(GeneAttributes {
        name2: text_field(row, "name2"),
        bin: int_field(row, "bin")?,
        chrom: text_field(row, "chrom"),
        strand: Some(normalize_strand(row.get("strand"))),
        tx_start: int_field(row, "txStart")?,
        tx_end: int_field(row, "txEnd")?,
        cds_start: int_field(row, "cdsStart")?,
        cds_end: int_field(row, "cdsEnd")?,
        exon_count: int_field(row, "exonCount")?,
        exon_starts: Some(flatten_list_field(row.get("exonStarts"))),
        exon_ends: Some(flatten_list_field(row.get("exonEnds"))),
        score: int_field(row, "score")?,
        exon_frames: Some(flatten_list_field(row.get("exonFrames"))),
        cds_start_stat: text_field(row, "cdsStartStat"),
        cds_end_stat: text_field(row, "cdsEndStat"),
    })
}

/// Returns the non-empty text of `field`, or `MissingField`.
pub fn required_text(row: &GeneRow, field: &'static str) -> Result<String, RowError> {
    non_empty_text(row.get(field)).ok_or(RowError::MissingField(field))
}

fn text_field(row: &GeneRow, field: &str) -> Option<String> {
    match row.get(field) {
        None | Some(Value::Null) => None,
        Some(value) => Some(value_text(value)),
    }
}

fn int_field(row: &GeneRow, field: &'static str) -> Result<Option<i64>, RowError> {
    let invalid = |value: &Value| RowError::InvalidInteger {
        field,
        value: value.to_string(),
    };

    match row.get(field) {
        None | Some(Value::Null) => Ok(None),
        Some(value @ Value::Number(number)) => number
            .as_i64()
            .or_else(|| {
                number
                    .as_f64()
                    .filter(|float| float.fract() == 0.0)
                    .map(|float| float as i64)
            })
            .map(Some)
            .ok_or_else(|| invalid(value)),
        Some(Value::String(text)) if text.trim().is_empty() => Ok(None),
        Some(value @ Value::String(text)) => text
            .trim()
            .parse::<i64>()
            .map(Some)
            .map_err(|_| invalid(value)),
        Some(other) => Err(invalid(other)),
    }
}

fn non_empty_text(value: Option<&Value>) -> Option<String> {
    match value? {
        Value::Null => None,
        Value::String(text) if text.is_empty() => None,
        other => Some(value_text(other)),
    }
}

fn value_text(value: &Value) -> String {
    match value {
        Value::String(text) => text.clone(),
        Value::Null => String::new(),
        other => other.to_string(),
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn columns(names: &[&str]) -> Vec<String> {
        names.iter().map(|name| name.to_string()).collect()
    }

    #[test]
    fn strand_mapping_covers_all_value_kinds() {
        assert_eq!(normalize_strand(Some(&json!(1))), "+");
        assert_eq!(normalize_strand(Some(&json!(-1))), "-");
        assert_eq!(normalize_strand(Some(&json!(0))), "-");
        assert_eq!(normalize_strand(Some(&json!(2))), "-");
        assert_eq!(normalize_strand(Some(&json!("+"))), "+");
        assert_eq!(normalize_strand(Some(&json!("-"))), "-");
        assert_eq!(normalize_strand(Some(&json!("weird"))), "weird");
        assert_eq!(normalize_strand(Some(&json!(1.0))), "?");
        assert_eq!(normalize_strand(Some(&json!(true))), "?");
        assert_eq!(normalize_strand(Some(&json!(null))), "?");
        assert_eq!(normalize_strand(Some(&json!([1]))), "?");
        assert_eq!(normalize_strand(None), "?");
    }

    #[test]
    fn map_row_to_dict_truncates_to_shorter_side() {
        let short_row = map_row_to_dict(&[json!(585), json!("NR_1")], &columns(&["bin", "name", "chrom"]));
        assert_eq!(short_row.len(), 2);
        assert_eq!(short_row["bin"], json!(585));
        assert!(!short_row.contains_key("chrom"));

        let long_row = map_row_to_dict(&[json!(1), json!(2), json!(3)], &columns(&["a"]));
        assert_eq!(long_row.len(), 1);
        assert_eq!(long_row["a"], json!(1));
    }

    #[test]
    fn flatten_list_field_joins_arrays_and_passes_strings() {
        assert_eq!(flatten_list_field(Some(&json!([10, 20, 30]))), "10,20,30");
        assert_eq!(flatten_list_field(Some(&json!(["0", "-1"]))), "0,-1");
        assert_eq!(flatten_list_field(Some(&json!("5,6,"))), "5,6,");
        assert_eq!(flatten_list_field(Some(&json!(null))), "");
        assert_eq!(flatten_list_field(None), "");
    }

    #[test]
    fn resolve_gene_name_prefers_symbol() {
        let mut row = GeneRow::new();
        assert_eq!(resolve_gene_name(&row), "unknown");

        row.insert("name".into(), json!("NM_001"));
        assert_eq!(resolve_gene_name(&row), "NM_001");

        row.insert("name2".into(), json!(""));
        assert_eq!(resolve_gene_name(&row), "NM_001");

        row.insert("name2".into(), json!("unc-54"));
        assert_eq!(resolve_gene_name(&row), "unc-54");
    }

    #[test]
    fn attributes_accept_numeric_strings_and_reject_garbage() {
        let mut row = GeneRow::new();
        row.insert("txStart".into(), json!("100"));
        row.insert("txEnd".into(), json!(250));
        row.insert("exonStarts".into(), json!([100, 200]));
        row.insert("strand".into(), json!(1));

        let attrs = attributes_from_row(&row).unwrap();
        assert_eq!(attrs.tx_start, Some(100));
        assert_eq!(attrs.tx_end, Some(250));
        assert_eq!(attrs.exon_starts.as_deref(), Some("100,200"));
        assert_eq!(attrs.exon_ends.as_deref(), Some(""));
        assert_eq!(attrs.strand.as_deref(), Some("+"));
        assert_eq!(attrs.bin, None);

        row.insert("cdsStart".into(), json!("abc"));
        assert!(matches!(
            attributes_from_row(&row).unwrap_err(),
            RowError::InvalidInteger {
                field: "cdsStart",
                ..
            }
        ));
    }

    #[test]
    fn track_rows_flattens_chromosome_groups() {
        let data = json!({
            "columnTypes": [{"name": "name"}, {"name": "chrom"}],
            "refGene": {
                "chrI": [["g1", "chrI"], ["g2", "chrI"]],
                "chrII": [["g3", "chrII"]]
            }
        });
        let rows = track_rows(&data, "refGene").unwrap();
        assert_eq!(rows.len(), 3);
        assert!(rows.iter().any(|row| row["name"] == json!("g3")));
        assert!(track_rows(&data, "knownGene").is_none());
    }

    #[test]
    fn track_rows_accepts_bare_arrays_and_object_rows() {
        let data = json!({
            "refGene": [{"name": "g1", "chrom": "chrX"}]
        });
        let rows = track_rows(&data, "refGene").unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0]["chrom"], json!("chrX"));
    }
}
