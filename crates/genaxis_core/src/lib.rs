//! Core domain logic for genaxis.
//! This crate owns the record schema, storage, and the UCSC import flow.

pub mod config;
pub mod db;
pub mod logging;
pub mod model;
pub mod repo;
pub mod service;
pub mod ucsc;

pub use config::AppConfig;
pub use logging::{default_log_level, init_logging, logging_status, LogTarget, LoggingError};
pub use model::crispr_edit::{apply_edit, CrisprEdit, EditId};
pub use model::gene::{Gene, GeneAttributes, GeneId};
pub use model::species::{Species, SpeciesId};
pub use model::ValidationError;
pub use repo::edit_repo::{CrisprEditRepository, SqliteCrisprEditRepository};
pub use repo::gene_repo::{GeneListQuery, GeneRepository, SqliteGeneRepository};
pub use repo::species_repo::{SpeciesRepository, SqliteSpeciesRepository};
pub use repo::{ListQuery, RepoError, RepoResult};
pub use service::import_service::{ImportError, ImportEvent, ImportReport, ImportService};
pub use ucsc::{
    fetch_genes_for_species, FetchGenesRequest, HttpTransport, ReqwestTransport, UcscClient,
    UcscError, DEFAULT_SPECIES_NAME, DEFAULT_TRACK, UCSC_BASE_URL,
};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[cfg(test)]
mod tests {
    use super::core_version;

    #[test]
    fn version_is_not_empty() {
        assert!(!core_version().is_empty());
    }
}
