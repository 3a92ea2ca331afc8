//! CRISPR edit repository contract and SQLite implementation.
//!
//! # Invariants
//! - Create and update derive `edited_sequence` from the gene's stored
//!   sequence at write time; caller-supplied values are ignored.
//! - An edit referencing a missing gene is rejected with `NotFound`.

use super::{parse_uuid, push_pagination, ListQuery, RepoError, RepoResult};
use crate::model::crispr_edit::{apply_edit, CrisprEdit, EditId};
use crate::model::gene::GeneId;
use log::debug;
use rusqlite::types::Value;
use rusqlite::{params, params_from_iter, Connection, OptionalExtension, Row};

const EDIT_SELECT_SQL: &str = "SELECT
    id,
    gene_id,
    target_sequence,
    replacement_sequence,
    edited_sequence,
    created_at,
    updated_at
FROM crispr_edits";

/// Repository interface for CRISPR edit CRUD operations.
pub trait CrisprEditRepository {
    fn create_edit(&self, edit: &CrisprEdit) -> RepoResult<EditId>;
    fn update_edit(&self, edit: &CrisprEdit) -> RepoResult<()>;
    fn get_edit(&self, id: EditId) -> RepoResult<Option<CrisprEdit>>;
    fn list_edits(&self, query: &ListQuery) -> RepoResult<Vec<CrisprEdit>>;
    fn delete_edit(&self, id: EditId) -> RepoResult<()>;
}

/// SQLite-backed edit repository.
pub struct SqliteCrisprEditRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteCrisprEditRepository<'conn> {
    pub fn new(conn: &'conn Connection) -> Self {
        Self { conn }
    }

    fn derive_edited_sequence(&self, edit: &CrisprEdit) -> RepoResult<String> {
        let sequence = self
            .conn
            .query_row(
                "SELECT sequence FROM genes WHERE id = ?1;",
                [edit.gene_id.to_string()],
                |row| row.get::<_, Option<String>>(0),
            )
            .optional()?
            .ok_or(RepoError::NotFound {
                entity: "gene",
                id: edit.gene_id,
            })?
            .unwrap_or_default();

        let edited = apply_edit(
            &sequence,
            &edit.target_sequence,
            &edit.replacement_sequence,
        );
        debug!(
            "event=edit_derive module=repo status=ok edit_id={} gene_id={} target_found={}",
            edit.id,
            edit.gene_id,
            sequence.contains(edit.target_sequence.as_str())
        );
        Ok(edited)
    }
}

impl CrisprEditRepository for SqliteCrisprEditRepository<'_> {
    fn create_edit(&self, edit: &CrisprEdit) -> RepoResult<EditId> {
        edit.validate()?;
        let edited_sequence = self.derive_edited_sequence(edit)?;

        self.conn.execute(
            "INSERT INTO crispr_edits (
                id,
                gene_id,
                target_sequence,
                replacement_sequence,
                edited_sequence
            ) VALUES (?1, ?2, ?3, ?4, ?5);",
            params![
                edit.id.to_string(),
                edit.gene_id.to_string(),
                edit.target_sequence.as_str(),
                edit.replacement_sequence.as_str(),
                edited_sequence,
            ],
        )?;

        Ok(edit.id)
    }

    fn update_edit(&self, edit: &CrisprEdit) -> RepoResult<()> {
        edit.validate()?;
        let edited_sequence = self.derive_edited_sequence(edit)?;

        let changed = self.conn.execute(
            "UPDATE crispr_edits
             SET
                gene_id = ?1,
                target_sequence = ?2,
                replacement_sequence = ?3,
                edited_sequence = ?4,
                updated_at = (strftime('%s', 'now') * 1000)
             WHERE id = ?5;",
            params![
                edit.gene_id.to_string(),
                edit.target_sequence.as_str(),
                edit.replacement_sequence.as_str(),
                edited_sequence,
                edit.id.to_string(),
            ],
        )?;

        if changed == 0 {
            return Err(RepoError::NotFound {
                entity: "edit",
                id: edit.id,
            });
        }
        Ok(())
    }

    fn get_edit(&self, id: EditId) -> RepoResult<Option<CrisprEdit>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{EDIT_SELECT_SQL} WHERE id = ?1;"))?;
        let mut rows = stmt.query([id.to_string()])?;
        if let Some(row) = rows.next()? {
            return Ok(Some(parse_edit_row(row)?));
        }
        Ok(None)
    }

    fn list_edits(&self, query: &ListQuery) -> RepoResult<Vec<CrisprEdit>> {
        let mut sql = format!("{EDIT_SELECT_SQL} ORDER BY created_at ASC, rowid ASC");
        let mut bind_values: Vec<Value> = Vec::new();
        push_pagination(&mut sql, &mut bind_values, query);

        let mut stmt = self.conn.prepare(&sql)?;
        let mut rows = stmt.query(params_from_iter(bind_values))?;
        let mut edits = Vec::new();
        while let Some(row) = rows.next()? {
            edits.push(parse_edit_row(row)?);
        }
        Ok(edits)
    }

    fn delete_edit(&self, id: EditId) -> RepoResult<()> {
        let changed = self
            .conn
            .execute("DELETE FROM crispr_edits WHERE id = ?1;", [id.to_string()])?;
        if changed == 0 {
            return Err(RepoError::NotFound { entity: "edit", id });
        }
        Ok(())
    }
}

fn parse_edit_row(row: &Row<'_>) -> RepoResult<CrisprEdit> {
    let id_text: String = row.get("id")?;
    let gene_text: String = row.get("gene_id")?;
    let gene_id: GeneId = parse_uuid(&gene_text, "crispr_edits.gene_id")?;

    let edit = CrisprEdit {
        id: parse_uuid(&id_text, "crispr_edits.id")?,
        gene_id,
        target_sequence: row.get("target_sequence")?,
        replacement_sequence: row.get("replacement_sequence")?,
        edited_sequence: row.get("edited_sequence")?,
        created_at: row.get("created_at")?,
        updated_at: row.get("updated_at")?,
    };
    edit.validate()?;
    Ok(edit)
}
