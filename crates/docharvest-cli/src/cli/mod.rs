//! CLI for DocHarvest.

mod commands;

use anyhow::Result;
use clap::{Parser, Subcommand};
use docharvest_core::config;
use std::path::PathBuf;

use commands::{run_harvest, run_resolve, HarvestArgs};

/// Top-level CLI for DocHarvest.
#[derive(Debug, Parser)]
#[command(name = "docharvest")]
#[command(
    about = "DocHarvest: collect the documents embedded in web pages into one zip",
    long_about = None
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: CliCommand,
}

#[derive(Debug, Subcommand)]
pub enum CliCommand {
    /// Resolve every page link and bundle the embedded documents into a zip.
    Run {
        /// Text, CSV, or TSV file with page links; `-` reads stdin.
        input: Option<PathBuf>,

        /// Additional page link (repeatable).
        #[arg(long = "url", value_name = "URL")]
        urls: Vec<String>,

        /// Table column holding the links (default: first known column found).
        #[arg(long, value_name = "NAME")]
        column: Option<String>,

        /// Where to write the zip (default: ./downloads.zip).
        #[arg(short, long, value_name = "PATH")]
        output: Option<PathBuf>,

        /// Pages processed concurrently (overrides config).
        #[arg(long, value_name = "N")]
        jobs: Option<usize>,

        /// Write a JSON report of every item's outcome.
        #[arg(long, value_name = "PATH")]
        report: Option<PathBuf>,

        /// Write the zip even when no document was downloaded.
        #[arg(long)]
        keep_empty: bool,
    },

    /// Resolve one page and print the embedded document's URL.
    Resolve {
        /// Page URL.
        url: String,
    },
}

impl CliCommand {
    pub async fn run_from_args() -> Result<()> {
        let cli = Cli::parse();
        let cfg = config::load_or_default()?;
        tracing::debug!("loaded config: {:?}", cfg);

        match cli.command {
            CliCommand::Run {
                input,
                urls,
                column,
                output,
                jobs,
                report,
                keep_empty,
            } => {
                let args = HarvestArgs {
                    input,
                    urls,
                    column,
                    output,
                    jobs,
                    report,
                    keep_empty,
                };
                run_harvest(&cfg, args).await?;
            }
            CliCommand::Resolve { url } => run_resolve(&cfg, &url).await?,
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests;
