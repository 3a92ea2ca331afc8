//! UCSC endpoint wrappers.

use super::rows::{track_rows, GeneRow};
use super::transport::{HttpTransport, ReqwestTransport};
use super::{UcscError, UcscResult};
use crate::config::AppConfig;
use log::{debug, error, info, warn};
use serde_json::Value;

/// Builds `{base}/{endpoint}?k=v;k=v`, keeping parameter order.
///
/// Values are inserted verbatim; the UCSC API expects `;` separators rather
/// than `&`.
pub fn build_url(base_url: &str, endpoint: &str, params: &[(&str, String)]) -> String {
    let base = base_url.trim_end_matches('/');
    let url = if params.is_empty() {
        format!("{base}/{endpoint}")
    } else {
        let query = params
            .iter()
            .map(|(key, value)| format!("{key}={value}"))
            .collect::<Vec<_>>()
            .join(";");
        format!("{base}/{endpoint}?{query}")
    };
    debug!("event=ucsc_build_url module=ucsc status=ok url={url}");
    url
}

/// Stateless client over a blocking transport.
pub struct UcscClient<T: HttpTransport> {
    transport: T,
    base_url: String,
}

impl UcscClient<ReqwestTransport> {
    /// Builds a reqwest-backed client from process configuration.
    pub fn from_config(config: &AppConfig) -> UcscResult<Self> {
        let transport = ReqwestTransport::new(config.ucsc_timeout)?;
        Ok(Self::with_transport(transport, config.ucsc_base_url.clone()))
    }
}

impl<T: HttpTransport> UcscClient<T> {
    pub fn with_transport(transport: T, base_url: impl Into<String>) -> Self {
        Self {
            transport,
            base_url: base_url.into(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Lists genome assemblies known to UCSC (`list/ucscGenomes`).
    pub fn list_ucsc_genomes(&self) -> UcscResult<Value> {
        let url = build_url(&self.base_url, "list/ucscGenomes", &[]);
        info!("event=ucsc_list_genomes module=ucsc status=start url={url}");
        self.get_json(&url, "list_genomes")
    }

    /// Lists tracks of one assembly (`list/tracks`).
    pub fn list_tracks(&self, genome: &str) -> UcscResult<Value> {
        let url = build_url(
            &self.base_url,
            "list/tracks",
            &[("genome", genome.to_string())],
        );
        info!("event=ucsc_list_tracks module=ucsc status=start genome={genome} url={url}");
        self.get_json(&url, "list_tracks")
    }

    /// Fetches raw track data with array rows (`getData/track`).
    pub fn fetch_track_data(
        &self,
        genome: &str,
        track: &str,
        max_items: Option<u32>,
    ) -> UcscResult<Value> {
        let mut params = vec![
            ("genome", genome.to_string()),
            ("track", track.to_string()),
            ("jsonOutputArrays", "1".to_string()),
        ];
        if let Some(max_items) = max_items {
            params.push(("maxItemsOutput", max_items.to_string()));
        }

        let url = build_url(&self.base_url, "getData/track", &params);
        info!(
            "event=ucsc_fetch_track module=ucsc status=start genome={genome} track={track} url={url}"
        );
        self.get_json(&url, "fetch_track")
    }

    /// Fetches a gene track and flattens it into row mappings.
    ///
    /// Returns no rows (with a warning) when the response lacks `track`.
    pub fn fetch_gene_rows(
        &self,
        genome: &str,
        track: &str,
        max_items: Option<u32>,
    ) -> UcscResult<Vec<GeneRow>> {
        let data = self.fetch_track_data(genome, track, max_items)?;
        match track_rows(&data, track) {
            Some(rows) => {
                info!(
                    "event=ucsc_fetch_track module=ucsc status=ok genome={genome} track={track} rows={}",
                    rows.len()
                );
                Ok(rows)
            }
            None => {
                warn!(
                    "event=ucsc_fetch_track module=ucsc status=missing_track genome={genome} track={track}"
                );
                Ok(Vec::new())
            }
        }
    }

    /// Fetches the DNA of `chrom:start-end` (`getData/sequence`).
    pub fn fetch_sequence_for_region(
        &self,
        genome: &str,
        chrom: &str,
        start: u64,
        end: u64,
        rev_comp: bool,
    ) -> UcscResult<Value> {
        let mut params = vec![
            ("genome", genome.to_string()),
            ("chrom", chrom.to_string()),
            ("start", start.to_string()),
            ("end", end.to_string()),
        ];
        if rev_comp {
            params.push(("revComp", "1".to_string()));
        }

        let url = build_url(&self.base_url, "getData/sequence", &params);
        info!(
            "event=ucsc_fetch_sequence module=ucsc status=start genome={genome} region={chrom}:{start}-{end} url={url}"
        );
        self.get_json(&url, "fetch_sequence")
    }

    /// Full-text search within one assembly (`search`).
    pub fn search_ucsc(
        &self,
        term: &str,
        genome: &str,
        categories: Option<&str>,
    ) -> UcscResult<Value> {
        let mut params = vec![("search", term.to_string()), ("genome", genome.to_string())];
        if let Some(categories) = categories.filter(|value| !value.is_empty()) {
            params.push(("categories", categories.to_string()));
        }

        let url = build_url(&self.base_url, "search", &params);
        info!("event=ucsc_search module=ucsc status=start genome={genome} url={url}");
        self.get_json(&url, "search")
    }

    fn get_json(&self, url: &str, operation: &str) -> UcscResult<Value> {
        let response = match self.transport.get(url) {
            Ok(response) => response,
            Err(err) => {
                error!("event=ucsc_{operation} module=ucsc status=error url={url} error={err}");
                return Err(err);
            }
        };

        if !response.is_success() {
            error!(
                "event=ucsc_{operation} module=ucsc status=error url={url} http_status={}",
                response.status
            );
            return Err(UcscError::Status {
                url: url.to_string(),
                status: response.status,
                body: response.body,
            });
        }
        info!(
            "event=ucsc_{operation} module=ucsc status=ok http_status={}",
            response.status
        );

        serde_json::from_str(&response.body).map_err(|source| {
            error!("event=ucsc_{operation} module=ucsc status=error url={url} error={source}");
            UcscError::Decode {
                url: url.to_string(),
                source,
            }
        })
    }
}
