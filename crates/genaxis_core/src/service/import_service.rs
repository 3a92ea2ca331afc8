//! Gene import use-case.
//!
//! # Responsibility
//! - Get or create the target species by name.
//! - Upsert one gene per UCSC row keyed by `(species, resolved name)`.
//! - Report progress and per-row failures without aborting the batch.
//!
//! # Invariants
//! - Re-importing the same rows updates genes instead of duplicating them.
//! - The gene list is fetched exactly once per import.

use crate::model::species::Species;
use crate::repo::gene_repo::GeneRepository;
use crate::repo::species_repo::SpeciesRepository;
use crate::repo::RepoError;
use crate::ucsc::rows::{attributes_from_row, resolve_gene_name, GeneRow};
use crate::ucsc::{HttpTransport, UcscClient, UcscError};
use log::{info, warn};

/// Rows between two progress events.
pub const PROGRESS_EVERY: usize = 100;

#[derive(Debug, thiserror::Error)]
pub enum ImportError {
    #[error(transparent)]
    Ucsc(#[from] UcscError),
    #[error(transparent)]
    Repo(#[from] RepoError),
}

/// Observable steps of an import run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ImportEvent {
    SpeciesCreated { name: String },
    RowsReceived { total: usize },
    /// Emitted after every [`PROGRESS_EVERY`]th and after the last row.
    Progress { processed: usize, total: usize },
    RowFailed(RowFailure),
}

/// A row that could not be imported.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RowFailure {
    /// 1-based row position.
    pub index: usize,
    /// UCSC `name` of the row, or `unknown`.
    pub gene_name: String,
    pub reason: String,
}

/// Outcome of one import run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImportReport {
    pub species: Species,
    pub species_created: bool,
    pub received: usize,
    pub created: usize,
    pub updated: usize,
    pub failures: Vec<RowFailure>,
}

impl ImportReport {
    pub fn imported(&self) -> usize {
        self.created + self.updated
    }
}

/// Import service over species and gene repositories.
pub struct ImportService<S: SpeciesRepository, G: GeneRepository> {
    species_repo: S,
    gene_repo: G,
}

impl<S: SpeciesRepository, G: GeneRepository> ImportService<S, G> {
    pub fn new(species_repo: S, gene_repo: G) -> Self {
        Self {
            species_repo,
            gene_repo,
        }
    }

    /// Fetches `track` of `genome` once and imports it into `species_name`.
    pub fn import_from_ucsc<T: HttpTransport>(
        &self,
        client: &UcscClient<T>,
        species_name: &str,
        genome: &str,
        track: &str,
        max_items: Option<u32>,
        mut on_event: impl FnMut(&ImportEvent),
    ) -> Result<ImportReport, ImportError> {
        let (species, species_created) = self.species_repo.get_or_create_species(species_name)?;
        if species_created {
            on_event(&ImportEvent::SpeciesCreated {
                name: species.name.clone(),
            });
        }

        let rows = client.fetch_gene_rows(genome, track, max_items)?;
        Ok(self.import_into(species, species_created, &rows, on_event))
    }

    /// Imports already fetched rows into `species_name`.
    ///
    /// # Errors
    /// - Only when the species cannot be read or created; row failures are
    ///   reported in the returned [`ImportReport`].
    pub fn import_rows(
        &self,
        species_name: &str,
        rows: &[GeneRow],
        mut on_event: impl FnMut(&ImportEvent),
    ) -> Result<ImportReport, ImportError> {
        let (species, species_created) = self.species_repo.get_or_create_species(species_name)?;
        if species_created {
            on_event(&ImportEvent::SpeciesCreated {
                name: species.name.clone(),
            });
        }
        Ok(self.import_into(species, species_created, rows, on_event))
    }

    fn import_into(
        &self,
        species: Species,
        species_created: bool,
        rows: &[GeneRow],
        mut on_event: impl FnMut(&ImportEvent),
    ) -> ImportReport {
        let total = rows.len();
        on_event(&ImportEvent::RowsReceived { total });

        let mut report = ImportReport {
            species,
            species_created,
            received: total,
            created: 0,
            updated: 0,
            failures: Vec::new(),
        };

        for (offset, row) in rows.iter().enumerate() {
            let index = offset + 1;
            match self.upsert_row(&report.species, row) {
                Ok(true) => report.created += 1,
                Ok(false) => report.updated += 1,
                Err(reason) => {
                    let failure = RowFailure {
                        index,
                        gene_name: row
                            .get("name")
                            .and_then(|value| value.as_str())
                            .unwrap_or("unknown")
                            .to_string(),
                        reason,
                    };
                    warn!(
                        "event=gene_import module=service status=error index={} gene={} error={}",
                        failure.index, failure.gene_name, failure.reason
                    );
                    on_event(&ImportEvent::RowFailed(failure.clone()));
                    report.failures.push(failure);
                    continue;
                }
            }

            if index % PROGRESS_EVERY == 0 || index == total {
                on_event(&ImportEvent::Progress {
                    processed: index,
                    total,
                });
            }
        }

        info!(
            "event=gene_import module=service status=ok species={} received={} created={} updated={} failed={}",
            report.species.name,
            report.received,
            report.created,
            report.updated,
            report.failures.len()
        );
        report
    }

    fn upsert_row(&self, species: &Species, row: &GeneRow) -> Result<bool, String> {
        let attributes = attributes_from_row(row).map_err(|err| err.to_string())?;
        let name = resolve_gene_name(row);
        let (_, created) = self
            .gene_repo
            .upsert_gene(species.id, &name, &attributes)
            .map_err(|err| err.to_string())?;
        Ok(created)
    }
}
