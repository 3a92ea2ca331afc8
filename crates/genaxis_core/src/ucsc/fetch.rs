//! Gene track fetch with direct persistence.

use super::client::UcscClient;
use super::rows::{attributes_from_row, required_text, track_rows, GeneRow, RowError};
use super::transport::HttpTransport;
use super::{DEFAULT_SPECIES_NAME, DEFAULT_TRACK};
use crate::model::gene::Gene;
use crate::model::species::Species;
use crate::repo::gene_repo::{GeneRepository, SqliteGeneRepository};
use crate::repo::species_repo::{SpeciesRepository, SqliteSpeciesRepository};
use crate::repo::RepoError;
use crate::service::import_service::ImportError;
use log::{error, info, warn};
use rusqlite::Connection;

/// Parameters of [`fetch_genes_for_species`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchGenesRequest {
    pub genome: String,
    pub track: String,
    pub max_items: Option<u32>,
    /// Target species; `None` selects [`DEFAULT_SPECIES_NAME`].
    pub species_name: Option<String>,
}

impl FetchGenesRequest {
    pub fn new(genome: impl Into<String>) -> Self {
        Self {
            genome: genome.into(),
            track: DEFAULT_TRACK.to_string(),
            max_items: None,
            species_name: None,
        }
    }

    pub fn species_name(&self) -> &str {
        self.species_name.as_deref().unwrap_or(DEFAULT_SPECIES_NAME)
    }
}

#[derive(Debug, thiserror::Error)]
enum RowFailure {
    #[error(transparent)]
    Row(#[from] RowError),
    #[error(transparent)]
    Repo(#[from] RepoError),
}

/// Fetches a gene track and creates one gene per row.
///
/// Rows are created, not upserted: running twice duplicates genes. Rows that
/// fail conversion or persistence are logged and skipped. The species is
/// created whenever the response carries the track, even with no rows.
///
/// Returns the number of genes persisted.
///
/// # Errors
/// - UCSC transport/HTTP/decode failures.
/// - Failure to get or create the target species.
pub fn fetch_genes_for_species<T: HttpTransport>(
    client: &UcscClient<T>,
    conn: &Connection,
    request: &FetchGenesRequest,
) -> Result<usize, ImportError> {
    let data = client.fetch_track_data(&request.genome, &request.track, request.max_items)?;
    let Some(rows) = track_rows(&data, &request.track) else {
        warn!(
            "event=ucsc_fetch_genes module=ucsc status=missing_track genome={} track={}",
            request.genome, request.track
        );
        return Ok(0);
    };

    let species_repo = SqliteSpeciesRepository::new(conn);
    let gene_repo = SqliteGeneRepository::new(conn);
    let (species, _) = species_repo.get_or_create_species(request.species_name())?;

    let mut imported = 0;
    for row in &rows {
        match create_gene_from_row(&gene_repo, &species, row) {
            Ok(_) => imported += 1,
            Err(err) => error!(
                "event=ucsc_gene_create module=ucsc status=error species={} error={} row={}",
                species.name,
                err,
                serde_json::Value::Object(row.clone())
            ),
        }
    }

    info!(
        "event=ucsc_fetch_genes module=ucsc status=ok species={} genome={} track={} received={} imported={}",
        species.name,
        request.genome,
        request.track,
        rows.len(),
        imported
    );
    Ok(imported)
}

fn create_gene_from_row(
    repo: &impl GeneRepository,
    species: &Species,
    row: &GeneRow,
) -> Result<Gene, RowFailure> {
    let name = required_text(row, "name")?;
    required_text(row, "chrom")?;

    let mut gene = Gene::new(species.id, name);
    gene.attributes = attributes_from_row(row)?;
    repo.create_gene(&gene)?;
    Ok(gene)
}
