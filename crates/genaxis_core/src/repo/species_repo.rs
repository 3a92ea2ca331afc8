//! Species repository contract and SQLite implementation.
//!
//! # Invariants
//! - `name` is unique; duplicates surface as `RepoError::Constraint`.
//! - `get_or_create_species` never creates a second row for an existing name.

use super::{parse_uuid, push_pagination, ListQuery, RepoError, RepoResult};
use crate::model::species::{Species, SpeciesId};
use log::info;
use rusqlite::types::Value;
use rusqlite::{params, params_from_iter, Connection, Row};

const SPECIES_SELECT_SQL: &str = "SELECT
    id,
    name,
    scientific_name,
    common_name,
    created_at,
    updated_at
FROM species";

/// Repository interface for species CRUD operations.
pub trait SpeciesRepository {
    fn create_species(&self, species: &Species) -> RepoResult<SpeciesId>;
    fn update_species(&self, species: &Species) -> RepoResult<()>;
    fn get_species(&self, id: SpeciesId) -> RepoResult<Option<Species>>;
    fn find_species_by_name(&self, name: &str) -> RepoResult<Option<Species>>;
    /// Returns the species named `name`, creating it when missing.
    /// The flag is `true` when a row was created.
    fn get_or_create_species(&self, name: &str) -> RepoResult<(Species, bool)>;
    fn list_species(&self, query: &ListQuery) -> RepoResult<Vec<Species>>;
    fn delete_species(&self, id: SpeciesId) -> RepoResult<()>;
}

/// SQLite-backed species repository.
pub struct SqliteSpeciesRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteSpeciesRepository<'conn> {
    pub fn new(conn: &'conn Connection) -> Self {
        Self { conn }
    }

    fn require(&self, id: SpeciesId) -> RepoResult<Species> {
        self.get_species(id)?.ok_or(RepoError::NotFound {
            entity: "species",
            id,
        })
    }
}

impl SpeciesRepository for SqliteSpeciesRepository<'_> {
    fn create_species(&self, species: &Species) -> RepoResult<SpeciesId> {
        species.validate()?;

        self.conn.execute(
            "INSERT INTO species (id, name, scientific_name, common_name)
             VALUES (?1, ?2, ?3, ?4);",
            params![
                species.id.to_string(),
                species.name.trim(),
                species.scientific_name.as_str(),
                species.common_name.as_str(),
            ],
        )?;

        Ok(species.id)
    }

    fn update_species(&self, species: &Species) -> RepoResult<()> {
        species.validate()?;

        let changed = self.conn.execute(
            "UPDATE species
             SET
                name = ?1,
                scientific_name = ?2,
                common_name = ?3,
                updated_at = (strftime('%s', 'now') * 1000)
             WHERE id = ?4;",
            params![
                species.name.trim(),
                species.scientific_name.as_str(),
                species.common_name.as_str(),
                species.id.to_string(),
            ],
        )?;

        if changed == 0 {
            return Err(RepoError::NotFound {
                entity: "species",
                id: species.id,
            });
        }

        Ok(())
    }

    fn get_species(&self, id: SpeciesId) -> RepoResult<Option<Species>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{SPECIES_SELECT_SQL} WHERE id = ?1;"))?;
        let mut rows = stmt.query([id.to_string()])?;
        if let Some(row) = rows.next()? {
            return Ok(Some(parse_species_row(row)?));
        }
        Ok(None)
    }

    fn find_species_by_name(&self, name: &str) -> RepoResult<Option<Species>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{SPECIES_SELECT_SQL} WHERE name = ?1;"))?;
        let mut rows = stmt.query([name.trim()])?;
        if let Some(row) = rows.next()? {
            return Ok(Some(parse_species_row(row)?));
        }
        Ok(None)
    }

    fn get_or_create_species(&self, name: &str) -> RepoResult<(Species, bool)> {
        if let Some(existing) = self.find_species_by_name(name)? {
            return Ok((existing, false));
        }

        let species = Species::new(name.trim());
        let id = self.create_species(&species)?;
        info!(
            "event=species_create module=repo status=ok species_id={} name={}",
            id, species.name
        );
        Ok((self.require(id)?, true))
    }

    fn list_species(&self, query: &ListQuery) -> RepoResult<Vec<Species>> {
        let mut sql = format!("{SPECIES_SELECT_SQL} ORDER BY created_at ASC, rowid ASC");
        let mut bind_values: Vec<Value> = Vec::new();
        push_pagination(&mut sql, &mut bind_values, query);

        let mut stmt = self.conn.prepare(&sql)?;
        let mut rows = stmt.query(params_from_iter(bind_values))?;
        let mut items = Vec::new();
        while let Some(row) = rows.next()? {
            items.push(parse_species_row(row)?);
        }
        Ok(items)
    }

    fn delete_species(&self, id: SpeciesId) -> RepoResult<()> {
        let changed = self
            .conn
            .execute("DELETE FROM species WHERE id = ?1;", [id.to_string()])?;
        if changed == 0 {
            return Err(RepoError::NotFound {
                entity: "species",
                id,
            });
        }
        Ok(())
    }
}

fn parse_species_row(row: &Row<'_>) -> RepoResult<Species> {
    let id_text: String = row.get("id")?;
    let species = Species {
        id: parse_uuid(&id_text, "species.id")?,
        name: row.get("name")?,
        scientific_name: row.get("scientific_name")?,
        common_name: row.get("common_name")?,
        created_at: row.get("created_at")?,
        updated_at: row.get("updated_at")?,
    };
    species.validate()?;
    Ok(species)
}
