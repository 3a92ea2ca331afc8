//! Subcommand bodies, written against generic output streams.

use anyhow::{Context, Result};
use genaxis_core::{
    core_version, fetch_genes_for_species, FetchGenesRequest, HttpTransport, ImportEvent,
    ImportService, SqliteGeneRepository, SqliteSpeciesRepository, UcscClient,
};
use rusqlite::Connection;
use serde_json::Value;
use std::io::{self, Write};

/// Arguments of `import-ucsc-genes`.
pub struct ImportRequest<'a> {
    pub species_name: &'a str,
    pub genome: &'a str,
    pub track: &'a str,
    pub max_items: Option<u32>,
}

/// Upserts one UCSC track into a species, reporting progress on `out` and
/// per-row failures on `err`.
pub fn import_ucsc_genes<T: HttpTransport>(
    client: &UcscClient<T>,
    conn: &Connection,
    request: &ImportRequest<'_>,
    out: &mut impl Write,
    err: &mut impl Write,
) -> Result<()> {
    let service = ImportService::new(
        SqliteSpeciesRepository::new(conn),
        SqliteGeneRepository::new(conn),
    );

    let mut write_failure: Option<io::Error> = None;
    let report = service
        .import_from_ucsc(
            client,
            request.species_name,
            request.genome,
            request.track,
            request.max_items,
            |event| {
                if write_failure.is_none() {
                    if let Err(io_err) = write_event(event, &mut *out, &mut *err) {
                        write_failure = Some(io_err);
                    }
                }
            },
        )
        .with_context(|| {
            format!(
                "import of {}/{} into '{}' failed",
                request.genome, request.track, request.species_name
            )
        })?;
    if let Some(io_err) = write_failure {
        return Err(io_err.into());
    }

    writeln!(
        out,
        "Import finished: {} genes imported for species '{}' (received {}, created {}, updated {}, failed {})",
        report.imported(),
        report.species.name,
        report.received,
        report.created,
        report.updated,
        report.failures.len()
    )?;
    Ok(())
}

fn write_event(event: &ImportEvent, out: &mut impl Write, err: &mut impl Write) -> io::Result<()> {
    match event {
        ImportEvent::SpeciesCreated { name } => writeln!(out, "Species '{name}' created."),
        ImportEvent::RowsReceived { total } => writeln!(out, "Total genes received: {total}"),
        ImportEvent::Progress { processed, .. } => writeln!(out, "{processed} genes imported..."),
        ImportEvent::RowFailed(failure) => writeln!(
            err,
            "Error importing gene {}: {}",
            failure.gene_name, failure.reason
        ),
    }
}

/// Creates one gene per track row and prints the persisted count.
pub fn fetch_genes<T: HttpTransport>(
    client: &UcscClient<T>,
    conn: &Connection,
    request: &FetchGenesRequest,
    out: &mut impl Write,
) -> Result<()> {
    let count = fetch_genes_for_species(client, conn, request)
        .with_context(|| format!("fetching {}/{} failed", request.genome, request.track))?;
    writeln!(
        out,
        "{count} genes saved for species '{}'",
        request.species_name()
    )?;
    Ok(())
}

pub fn print_json(value: &Value, out: &mut impl Write) -> Result<()> {
    serde_json::to_writer_pretty(&mut *out, value)?;
    writeln!(out)?;
    Ok(())
}

pub fn print_version(out: &mut impl Write) -> Result<()> {
    writeln!(out, "genaxis_core version={}", core_version())?;
    Ok(())
}
