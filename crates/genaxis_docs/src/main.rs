//! `generate-guide`: builds the project documentation PDF from `sketch.md` files.

use anyhow::{Context, Result};
use clap::Parser;
use flexi_logger::Logger;
use genaxis_docs::{generate_guide, GuideOptions, DEFAULT_OUTPUT, DEFAULT_SUBTITLE, DEFAULT_TITLE};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "generate-guide", version)]
struct Cli {
    /// directory whose subdirectories hold sketch.md files
    #[arg(long, default_value = ".")]
    source_dir: PathBuf,

    #[arg(long, default_value = DEFAULT_OUTPUT)]
    output: PathBuf,

    #[arg(long, default_value = DEFAULT_TITLE)]
    title: String,

    #[arg(long, default_value = DEFAULT_SUBTITLE)]
    subtitle: String,

    /// also write the final document as HTML
    #[arg(long)]
    html: Option<PathBuf>,

    /// trace|debug|info|warn|error
    #[arg(long, default_value = "warn")]
    log_level: String,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let _logger = Logger::try_with_str(&cli.log_level)
        .with_context(|| format!("invalid log level `{}`", cli.log_level))?
        .log_to_stderr()
        .start()
        .context("failed to start logger")?;

    let options = GuideOptions {
        source_dir: cli.source_dir,
        output: cli.output,
        title: cli.title,
        subtitle: cli.subtitle,
        html_output: cli.html,
    };
    let outcome = generate_guide(&options).context("guide generation failed")?;

    let detected: Vec<String> = outcome
        .titles
        .iter()
        .map(|title| match outcome.pages.get(title) {
            Some(page) => format!("{title}: {page}"),
            None => format!("{title}: -"),
        })
        .collect();
    println!("Detected pages: {{{}}}", detected.join(", "));
    println!("final pdf ready: {}", outcome.output.display());
    Ok(())
}
