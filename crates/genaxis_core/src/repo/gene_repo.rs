//! Gene repository contract and SQLite implementation.
//!
//! # Invariants
//! - Every gene references an existing species (foreign key).
//! - `upsert_gene` keys on `(species_id, name)` and never touches `sequence`.
//! - When several genes share a key, the earliest inserted one is updated.

use super::{parse_uuid, push_pagination, ListQuery, RepoError, RepoResult};
use crate::model::gene::{Gene, GeneAttributes, GeneId};
use crate::model::species::SpeciesId;
use rusqlite::types::Value;
use rusqlite::{params, params_from_iter, Connection, Row};

const GENE_SELECT_SQL: &str = "SELECT
    id,
    species_id,
    name,
    name2,
    sequence,
    bin,
    chrom,
    strand,
    tx_start,
    tx_end,
    cds_start,
    cds_end,
    exon_count,
    exon_starts,
    exon_ends,
    score,
    exon_frames,
    cds_start_stat,
    cds_end_stat,
    created_at,
    updated_at
FROM genes";

/// Query options for listing genes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct GeneListQuery {
    /// Restricts results to one species.
    pub species_id: Option<SpeciesId>,
    pub page: ListQuery,
}

/// Repository interface for gene CRUD and import upserts.
pub trait GeneRepository {
    fn create_gene(&self, gene: &Gene) -> RepoResult<GeneId>;
    fn update_gene(&self, gene: &Gene) -> RepoResult<()>;
    fn get_gene(&self, id: GeneId) -> RepoResult<Option<Gene>>;
    fn find_gene_by_name(&self, species_id: SpeciesId, name: &str) -> RepoResult<Option<Gene>>;
    /// Updates the attributes of the gene keyed by `(species_id, name)`, or
    /// creates it. The flag is `true` when a row was created.
    fn upsert_gene(
        &self,
        species_id: SpeciesId,
        name: &str,
        attributes: &GeneAttributes,
    ) -> RepoResult<(Gene, bool)>;
    fn list_genes(&self, query: &GeneListQuery) -> RepoResult<Vec<Gene>>;
    fn delete_gene(&self, id: GeneId) -> RepoResult<()>;
}

/// SQLite-backed gene repository.
pub struct SqliteGeneRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteGeneRepository<'conn> {
    pub fn new(conn: &'conn Connection) -> Self {
        Self { conn }
    }

    fn require(&self, id: GeneId) -> RepoResult<Gene> {
        self.get_gene(id)?
            .ok_or(RepoError::NotFound { entity: "gene", id })
    }
}

impl GeneRepository for SqliteGeneRepository<'_> {
    fn create_gene(&self, gene: &Gene) -> RepoResult<GeneId> {
        gene.validate()?;
        let attrs = &gene.attributes;

        self.conn.execute(
            "INSERT INTO genes (
                id,
                species_id,
                name,
                name2,
                sequence,
                bin,
                chrom,
                strand,
                tx_start,
                tx_end,
                cds_start,
                cds_end,
                exon_count,
                exon_starts,
                exon_ends,
                score,
                exon_frames,
                cds_start_stat,
                cds_end_stat
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14, ?15, ?16, ?17, ?18, ?19);",
            params![
                gene.id.to_string(),
                gene.species_id.to_string(),
                gene.name.as_str(),
                attrs.name2.as_deref(),
                gene.sequence.as_deref(),
                attrs.bin,
                attrs.chrom.as_deref(),
                attrs.strand.as_deref(),
                attrs.tx_start,
                attrs.tx_end,
                attrs.cds_start,
                attrs.cds_end,
                attrs.exon_count,
                attrs.exon_starts.as_deref(),
                attrs.exon_ends.as_deref(),
                attrs.score,
                attrs.exon_frames.as_deref(),
                attrs.cds_start_stat.as_deref(),
                attrs.cds_end_stat.as_deref(),
            ],
        )?;

        Ok(gene.id)
    }

    fn update_gene(&self, gene: &Gene) -> RepoResult<()> {
        gene.validate()?;
        let tx = self.conn.unchecked_transaction()?;

        let changed = tx.execute(
            "UPDATE genes
             SET
                species_id = ?2,
                name = ?3,
                sequence = ?4,
                updated_at = (strftime('%s', 'now') * 1000)
             WHERE id = ?1;",
            params![
                gene.id.to_string(),
                gene.species_id.to_string(),
                gene.name.as_str(),
                gene.sequence.as_deref(),
            ],
        )?;
        if changed == 0 {
            return Err(RepoError::NotFound {
                entity: "gene",
                id: gene.id,
            });
        }

        write_attributes(&tx, gene.id, &gene.attributes)?;
        tx.commit()?;
        Ok(())
    }

    fn get_gene(&self, id: GeneId) -> RepoResult<Option<Gene>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{GENE_SELECT_SQL} WHERE id = ?1;"))?;
        let mut rows = stmt.query([id.to_string()])?;
        if let Some(row) = rows.next()? {
            return Ok(Some(parse_gene_row(row)?));
        }
        Ok(None)
    }

    fn find_gene_by_name(&self, species_id: SpeciesId, name: &str) -> RepoResult<Option<Gene>> {
        let mut stmt = self.conn.prepare(&format!(
            "{GENE_SELECT_SQL}
             WHERE species_id = ?1 AND name = ?2
             ORDER BY rowid ASC
             LIMIT 1;"
        ))?;
        let mut rows = stmt.query(params![species_id.to_string(), name])?;
        if let Some(row) = rows.next()? {
            return Ok(Some(parse_gene_row(row)?));
        }
        Ok(None)
    }

    fn upsert_gene(
        &self,
        species_id: SpeciesId,
        name: &str,
        attributes: &GeneAttributes,
    ) -> RepoResult<(Gene, bool)> {
        attributes.validate()?;
        let tx = self.conn.unchecked_transaction()?;

        let (id, created) = match self.find_gene_by_name(species_id, name)? {
            Some(existing) => {
                write_attributes(&tx, existing.id, attributes)?;
                (existing.id, false)
            }
            None => {
                let mut gene = Gene::new(species_id, name);
                gene.attributes = attributes.clone();
                (self.create_gene(&gene)?, true)
            }
        };

        tx.commit()?;
        Ok((self.require(id)?, created))
    }

    fn list_genes(&self, query: &GeneListQuery) -> RepoResult<Vec<Gene>> {
        let mut sql = format!("{GENE_SELECT_SQL} WHERE 1 = 1");
        let mut bind_values: Vec<Value> = Vec::new();

        if let Some(species_id) = query.species_id {
            sql.push_str(" AND species_id = ?");
            bind_values.push(Value::Text(species_id.to_string()));
        }

        sql.push_str(" ORDER BY created_at ASC, rowid ASC");
        push_pagination(&mut sql, &mut bind_values, &query.page);

        let mut stmt = self.conn.prepare(&sql)?;
        let mut rows = stmt.query(params_from_iter(bind_values))?;
        let mut genes = Vec::new();
        while let Some(row) = rows.next()? {
            genes.push(parse_gene_row(row)?);
        }
        Ok(genes)
    }

    fn delete_gene(&self, id: GeneId) -> RepoResult<()> {
        let changed = self
            .conn
            .execute("DELETE FROM genes WHERE id = ?1;", [id.to_string()])?;
        if changed == 0 {
            return Err(RepoError::NotFound { entity: "gene", id });
        }
        Ok(())
    }
}

fn write_attributes(conn: &Connection, id: GeneId, attrs: &GeneAttributes) -> RepoResult<()> {
    conn.execute(
        "UPDATE genes
         SET
            name2 = ?2,
            bin = ?3,
            chrom = ?4,
            strand = ?5,
            tx_start = ?6,
            tx_end = ?7,
            cds_start = ?8,
            cds_end = ?9,
            exon_count = ?10,
            exon_starts = ?11,
            exon_ends = ?12,
            score = ?13,
            exon_frames = ?14,
            cds_start_stat = ?15,
            cds_end_stat = ?16,
            updated_at = (strftime('%s', 'now') * 1000)
         WHERE id = ?1;",
        params![
            id.to_string(),
            attrs.name2.as_deref(),
            attrs.bin,
            attrs.chrom.as_deref(),
            attrs.strand.as_deref(),
            attrs.tx_start,
            attrs.tx_end,
            attrs.cds_start,
            attrs.cds_end,
            attrs.exon_count,
            attrs.exon_starts.as_deref(),
            attrs.exon_ends.as_deref(),
            attrs.score,
            attrs.exon_frames.as_deref(),
            attrs.cds_start_stat.as_deref(),
            attrs.cds_end_stat.as_deref(),
        ],
    )?;
    Ok(())
}

fn parse_gene_row(row: &Row<'_>) -> RepoResult<Gene> {
    let id_text: String = row.get("id")?;
    let species_text: String = row.get("species_id")?;

    let gene = Gene {
        id: parse_uuid(&id_text, "genes.id")?,
        species_id: parse_uuid(&species_text, "genes.species_id")?,
        name: row.get("name")?,
        sequence: row.get("sequence")?,
        attributes: GeneAttributes {
            name2: row.get("name2")?,
            bin: row.get("bin")?,
            chrom: row.get("chrom")?,
            strand: row.get("strand")?,
            tx_start: row.get("tx_start")?,
            tx_end: row.get("tx_end")?,
            cds_start: row.get("cds_start")?,
            cds_end: row.get("cds_end")?,
            exon_count: row.get("exon_count")?,
            exon_starts: row.get("exon_starts")?,
            exon_ends: row.get("exon_ends")?,
            score: row.get("score")?,
            exon_frames: row.get("exon_frames")?,
            cds_start_stat: row.get("cds_start_stat")?,
            cds_end_stat: row.get("cds_end_stat")?,
        },
        created_at: row.get("created_at")?,
        updated_at: row.get("updated_at")?,
    };
    gene.validate()?;
    Ok(gene)
}
