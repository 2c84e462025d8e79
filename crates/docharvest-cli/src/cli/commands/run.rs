//! `docharvest run` – resolve page links and write the zip and report.

use anyhow::{Context, Result};
use docharvest_core::config::HarvestConfig;
use docharvest_core::http::CurlTransport;
use docharvest_core::input::{extract_raw_inputs, normalize_inputs, RawInputs};
use docharvest_core::report::RunReport;
use docharvest_core::resolver::MarkerFrameLocator;
use docharvest_core::{run_batch, RunControl, RunOptions, RunProgress, RunResult};
use std::io::Read;
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Options of `docharvest run`, as parsed from the command line.
#[derive(Debug, Clone, Default)]
pub struct HarvestArgs {
    pub input: Option<PathBuf>,
    pub urls: Vec<String>,
    pub column: Option<String>,
    pub output: Option<PathBuf>,
    pub jobs: Option<usize>,
    pub report: Option<PathBuf>,
    pub keep_empty: bool,
}

fn read_input(path: &Path) -> Result<String> {
    if path == Path::new("-") {
        let mut text = String::new();
        std::io::stdin()
            .read_to_string(&mut text)
            .context("read links from stdin")?;
        return Ok(text);
    }
    let bytes = std::fs::read(path).with_context(|| format!("read {}", path.display()))?;
    Ok(String::from_utf8_lossy(&bytes).into_owned())
}

/// Collects raw link strings from the input file (if any) plus `--url` values.
pub(crate) fn collect_raw(cfg: &HarvestConfig, args: &HarvestArgs) -> Result<Vec<String>> {
    let mut raw = Vec::new();
    if let Some(path) = &args.input {
        let text = read_input(path)?;
        match extract_raw_inputs(&text, &cfg.input_columns, args.column.as_deref())? {
            RawInputs::Column { name, values } => {
                println!("Using column [{}] ({} value(s)).", name, values.len());
                raw.extend(values);
            }
            RawInputs::Lines(lines) => raw.extend(lines),
        }
    } else if args.column.is_some() {
        anyhow::bail!("--column requires an input file");
    }
    raw.extend(args.urls.iter().cloned());
    Ok(raw)
}

fn print_progress(p: &RunProgress) {
    println!(
        "  ({}/{}) {:>5.1}%  {}",
        p.completed,
        p.total,
        p.fraction() * 100.0,
        p.current_url
    );
}

fn print_summary(result: &RunResult) {
    println!();
    println!("Succeeded: {}", result.success_count);
    println!("Failed:    {}", result.failure_count);
    if result.cancelled {
        println!("Run was cancelled; items not started are listed as failed.");
    }
    if result.failure_count > 0 {
        println!();
        println!("{:<6} {:<20} {}", "ITEM", "KIND", "URL / REASON");
        for outcome in &result.outcomes {
            if let Err(e) = &outcome.result {
                println!(
                    "{:<6} {:<20} {}",
                    outcome.item.position(),
                    format!("{:?}", e.kind()),
                    outcome.item.url
                );
                println!("{:<27} {}", "", e);
            }
        }
    }
}

pub async fn run_harvest(cfg: &HarvestConfig, args: HarvestArgs) -> Result<()> {
    let raw = collect_raw(cfg, &args)?;
    let items = normalize_inputs(&raw);
    if items.is_empty() {
        println!("No valid links found (links must start with http:// or https://).");
        return Ok(());
    }
    println!("Resolving documents from {} page(s)...", items.len());

    let mut options = RunOptions::from_config(cfg);
    if let Some(jobs) = args.jobs {
        options.max_concurrent = jobs;
    }
    let transport = Arc::new(CurlTransport::new(cfg));
    let locator = Arc::new(MarkerFrameLocator::from_config(&cfg.marker)?);

    let control = RunControl::new();
    let signal_control = control.clone();
    let signal_handle = tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            eprintln!("Interrupted: finishing in-flight pages, not starting new ones.");
            signal_control.request_abort();
        }
    });

    let (progress_tx, mut progress_rx) = tokio::sync::mpsc::channel::<RunProgress>(16);
    let progress_handle = tokio::spawn(async move {
        while let Some(p) = progress_rx.recv().await {
            print_progress(&p);
        }
    });

    let result = run_batch(
        items,
        transport,
        locator,
        &options,
        Some(progress_tx),
        Some(control),
    )
    .await?;
    let _ = progress_handle.await;
    signal_handle.abort();

    print_summary(&result);

    let output = args
        .output
        .clone()
        .unwrap_or_else(|| PathBuf::from(&result.archive.suggested_filename));
    if !result.archive.is_empty() || args.keep_empty {
        std::fs::write(&output, &result.archive.bytes)
            .with_context(|| format!("write archive {}", output.display()))?;
        println!(
            "Saved {} document(s) to {} ({}).",
            result.archive.entry_count(),
            output.display(),
            result.archive.mime_type()
        );
    } else {
        println!("No documents were downloaded; no archive written.");
    }

    if let Some(path) = &args.report {
        let json = RunReport::from_result(&result).to_json_pretty()?;
        std::fs::write(path, json).with_context(|| format!("write report {}", path.display()))?;
        println!("Report written to {}.", path.display());
    }

    tracing::info!(
        succeeded = result.success_count,
        failed = result.failure_count,
        "run command finished"
    );
    Ok(())
}
