//! UCSC Genome Browser REST client.
//!
//! # Responsibility
//! - Build semicolon-delimited query URLs against the UCSC API host.
//! - Issue blocking GETs and return parsed JSON, failing fast on transport or
//!   HTTP errors (logged, then propagated).
//! - Flatten gene track payloads into row mappings and persist them.
//!
//! # Invariants
//! - No retry, no backoff, no pagination beyond `maxItemsOutput`.
//! - Per-row persistence failures are logged and skipped, never fatal.

mod client;
mod fetch;
pub mod rows;
mod transport;

pub use client::{build_url, UcscClient};
pub use fetch::{fetch_genes_for_species, FetchGenesRequest};
pub use rows::{GeneRow, RowError};
pub use transport::{HttpTransport, ReqwestTransport, TransportResponse};

pub const UCSC_BASE_URL: &str = "https://api.genome.ucsc.edu";
pub const DEFAULT_TRACK: &str = "refGene";
pub const DEFAULT_SPECIES_NAME: &str = "Caenorhabditis elegans";

pub type UcscResult<T> = Result<T, UcscError>;

#[derive(Debug, thiserror::Error)]
pub enum UcscError {
    #[error("failed to build HTTP client: {0}")]
    Client(#[source] reqwest::Error),
    #[error("request to {url} failed: {source}")]
    Transport {
        url: String,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },
    #[error("request to {url} returned HTTP {status}: {body}")]
    Status {
        url: String,
        status: u16,
        body: String,
    },
    #[error("response from {url} is not valid JSON: {source}")]
    Decode {
        url: String,
        #[source]
        source: serde_json::Error,
    },
}
