//! Management CLI for genaxis.
//!
//! # Responsibility
//! - Import UCSC gene tracks into the local database.
//! - Pass UCSC queries through and print their JSON.

mod commands;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use genaxis_core::db::open_db;
use genaxis_core::{init_logging, AppConfig, UcscClient, DEFAULT_TRACK};
use log::debug;
use std::io;
use std::path::PathBuf;
use std::process::ExitCode;

#[derive(Parser)]
#[command(name = "genaxis", version, about = "genaxis management commands")]
struct Cli {
    /// SQLite database file (defaults to GENAXIS_DB_PATH or genaxis.sqlite3)
    #[arg(long, global = true)]
    db: Option<PathBuf>,

    /// trace|debug|info|warn|error
    #[arg(long, global = true)]
    log_level: Option<String>,

    /// write rolling log files here instead of stderr
    #[arg(long, global = true)]
    log_dir: Option<PathBuf>,

    /// UCSC API base URL (defaults to GENAXIS_UCSC_BASE_URL)
    #[arg(long, global = true)]
    ucsc_base_url: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Import genes of a UCSC track into a species, updating existing ones
    ImportUcscGenes {
        /// species name, e.g. "Homo sapiens"
        species_name: String,

        /// UCSC genome assembly, e.g. hg38
        genome: String,

        #[arg(long, default_value = DEFAULT_TRACK)]
        track: String,

        /// limit on rows returned by UCSC
        #[arg(long)]
        max_items: Option<u32>,
    },
    /// Fetch a UCSC gene track and create one gene per row
    FetchGenes {
        /// UCSC genome assembly, e.g. ce11
        genome: String,

        /// target species (defaults to Caenorhabditis elegans)
        #[arg(long)]
        species: Option<String>,

        #[arg(long, default_value = DEFAULT_TRACK)]
        track: String,

        #[arg(long)]
        max_items: Option<u32>,
    },
    /// Query the UCSC API and print the JSON response
    #[command(subcommand)]
    Ucsc(UcscCommand),
    /// Print the core version
    Version,
}

#[derive(Subcommand)]
enum UcscCommand {
    /// List genome assemblies
    Genomes,
    /// List tracks of an assembly
    Tracks { genome: String },
    /// Fetch the DNA of a region
    Sequence {
        genome: String,
        chrom: String,
        start: u64,
        end: u64,

        /// return the reverse complement
        #[arg(long)]
        rev_comp: bool,
    },
    /// Search an assembly
    Search {
        term: String,
        genome: String,

        #[arg(long)]
        categories: Option<String>,
    },
}

fn main() -> ExitCode {
    match run(Cli::parse()) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("error: {err:#}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<()> {
    let config = resolve_config(&cli);
    let stdout = io::stdout();
    let mut out = stdout.lock();

    if let Commands::Version = cli.command {
        return commands::print_version(&mut out);
    }

    init_logging(&config.log_level, config.log_dir.as_deref())
        .context("failed to initialize logging")?;
    let client = UcscClient::from_config(&config).context("failed to build UCSC client")?;
    debug!(
        "event=cli_start module=cli status=ok db_path={} ucsc_base_url={}",
        config.db_path.display(),
        client.base_url()
    );

    match cli.command {
        Commands::ImportUcscGenes {
            species_name,
            genome,
            track,
            max_items,
        } => {
            let conn = open_db(&config.db_path).with_context(|| {
                format!("failed to open database {}", config.db_path.display())
            })?;
            let request = commands::ImportRequest {
                species_name: &species_name,
                genome: &genome,
                track: &track,
                max_items,
            };
            commands::import_ucsc_genes(&client, &conn, &request, &mut out, &mut io::stderr())
        }
        Commands::FetchGenes {
            genome,
            species,
            track,
            max_items,
        } => {
            let conn = open_db(&config.db_path).with_context(|| {
                format!("failed to open database {}", config.db_path.display())
            })?;
            let mut request = genaxis_core::FetchGenesRequest::new(genome);
            request.species_name = species;
            request.track = track;
            request.max_items = max_items;
            commands::fetch_genes(&client, &conn, &request, &mut out)
        }
        Commands::Ucsc(query) => {
            let response = match query {
                UcscCommand::Genomes => client.list_ucsc_genomes(),
                UcscCommand::Tracks { genome } => client.list_tracks(&genome),
                UcscCommand::Sequence {
                    genome,
                    chrom,
                    start,
                    end,
                    rev_comp,
                } => client.fetch_sequence_for_region(&genome, &chrom, start, end, rev_comp),
                UcscCommand::Search {
                    term,
                    genome,
                    categories,
                } => client.search_ucsc(&term, &genome, categories.as_deref()),
            }
            .context("UCSC request failed")?;
            commands::print_json(&response, &mut out)
        }
        Commands::Version => commands::print_version(&mut out),
    }
}

fn resolve_config(cli: &Cli) -> AppConfig {
    let mut config = AppConfig::from_env();
    if let Some(db) = &cli.db {
        config.db_path = db.clone();
    }
    if let Some(level) = &cli.log_level {
        config.log_level = level.clone();
    }
    if let Some(dir) = &cli.log_dir {
        config.log_dir = Some(dir.clone());
    }
    if let Some(url) = &cli.ucsc_base_url {
        config.ucsc_base_url = url.trim_end_matches('/').to_string();
    }
    config
}
