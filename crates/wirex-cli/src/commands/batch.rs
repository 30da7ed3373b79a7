//! Batch processing command for multiple advices.
//!
//! Each file gets its own extraction run on a blocking worker; the compiled
//! field catalog is shared read-only between them.

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Instant;

use clap::Args;
use console::style;
use glob::glob;
use indicatif::{ProgressBar, ProgressStyle};
use tokio::sync::Semaphore;
use tokio::task::JoinSet;
use tracing::{debug, error, warn};

use wirex_core::models::config::WirexConfig;
use wirex_core::{AdviceParser, FieldValue, WireParser, WireRecord};

use super::{
    build_parser, format_record, is_supported_input, load_config, read_document_text,
    OutputFormat,
};

/// Arguments for the batch command.
#[derive(Args)]
pub struct BatchArgs {
    /// Input files or glob pattern
    #[arg(required = true)]
    input: String,

    /// Output directory
    #[arg(short, long)]
    output_dir: Option<PathBuf>,

    /// Output format for each file (default: from config)
    #[arg(short, long, value_enum)]
    format: Option<OutputFormat>,

    /// Also generate a summary CSV
    #[arg(long)]
    summary: bool,

    /// Number of parallel workers
    #[arg(short = 'j', long, default_value = "4")]
    jobs: usize,

    /// Continue on error
    #[arg(long)]
    continue_on_error: bool,

    /// Extract even if a document is not recognised as a wire advice
    #[arg(long)]
    force: bool,
}

/// Result of processing a single file.
struct ProcessResult {
    path: PathBuf,
    record: Option<WireRecord>,
    error: Option<String>,
    processing_time_ms: u64,
}

pub async fn run(args: BatchArgs, config_path: Option<&str>) -> anyhow::Result<()> {
    let start = Instant::now();
    let config = Arc::new(load_config(config_path)?);
    let format = OutputFormat::resolve(args.format, &config)?;

    let mut files: Vec<PathBuf> = glob(&args.input)?
        .filter_map(|r| r.ok())
        .filter(|p| is_supported_input(p))
        .collect();
    files.sort();

    if files.is_empty() {
        anyhow::bail!("No matching files found for pattern: {}", args.input);
    }

    println!(
        "{} Found {} files to process",
        style("ℹ").blue(),
        files.len()
    );

    if let Some(ref output_dir) = args.output_dir {
        fs::create_dir_all(output_dir)?;
    }

    let overall_pb = ProgressBar::new(files.len() as u64);
    overall_pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} files")
            .unwrap()
            .progress_chars("=>-"),
    );

    let parser = Arc::new(build_parser(&config, args.force));
    let permits = Arc::new(Semaphore::new(args.jobs.max(1)));
    let mut tasks = JoinSet::new();

    for (index, path) in files.into_iter().enumerate() {
        let parser = Arc::clone(&parser);
        let config = Arc::clone(&config);
        let permit = Arc::clone(&permits).acquire_owned().await?;

        tasks.spawn_blocking(move || {
            let file_start = Instant::now();
            let outcome = process_single_file(&path, &parser, &config);
            drop(permit);

            let processing_time_ms = file_start.elapsed().as_millis() as u64;
            let result = match outcome {
                Ok(record) => ProcessResult {
                    path,
                    record: Some(record),
                    error: None,
                    processing_time_ms,
                },
                Err(e) => ProcessResult {
                    path,
                    record: None,
                    error: Some(e.to_string()),
                    processing_time_ms,
                },
            };
            (index, result)
        });
    }

    let mut indexed = Vec::with_capacity(tasks.len());
    while let Some(joined) = tasks.join_next().await {
        indexed.push(joined?);
        overall_pb.inc(1);
    }
    overall_pb.finish_and_clear();

    indexed.sort_by_key(|(index, _)| *index);
    let results: Vec<ProcessResult> = indexed.into_iter().map(|(_, r)| r).collect();

    if !args.continue_on_error {
        if let Some(failed) = results.iter().find(|r| r.error.is_some()) {
            let error_msg = failed.error.as_deref().unwrap_or("unknown error");
            error!("Failed to process {}: {}", failed.path.display(), error_msg);
            anyhow::bail!("Processing failed: {}", error_msg);
        }
    }

    let successful: Vec<_> = results.iter().filter(|r| r.record.is_some()).collect();
    let failed: Vec<_> = results.iter().filter(|r| r.error.is_some()).collect();

    for result in &failed {
        warn!(
            "Failed to process {}: {}",
            result.path.display(),
            result.error.as_deref().unwrap_or("unknown error")
        );
    }

    if let Some(output_dir) = &args.output_dir {
        let paths: Vec<&Path> = successful.iter().map(|r| r.path.as_path()).collect();
        let names = output_names(&paths);

        for (result, output_name) in successful.iter().zip(&names) {
            if let Some(record) = &result.record {
                let output_path =
                    output_dir.join(format!("{}.{}", output_name, format.extension()));

                let content = format_record(record, format, config.output.pretty_json)?;
                fs::write(&output_path, content)?;
                debug!("Wrote output to {}", output_path.display());
            }
        }
    }

    if args.summary {
        let summary_path = args
            .output_dir
            .as_ref()
            .map(|d| d.join("summary.csv"))
            .unwrap_or_else(|| PathBuf::from("summary.csv"));

        write_summary(&summary_path, &results)?;
        println!(
            "{} Summary written to {}",
            style("✓").green(),
            summary_path.display()
        );
    }

    println!();
    println!(
        "{} Processed {} files in {:?}",
        style("✓").green(),
        results.len(),
        start.elapsed()
    );
    println!(
        "   {} successful, {} failed",
        style(successful.len()).green(),
        style(failed.len()).red()
    );

    if !failed.is_empty() {
        println!();
        println!("{}", style("Failed files:").red());
        for result in &failed {
            println!(
                "  - {}: {}",
                result.path.display(),
                result.error.as_deref().unwrap_or("unknown error")
            );
        }
    }

    Ok(())
}

/// Output base names for a batch: the file stem, or the full file name when
/// two inputs share a stem (`a.pdf` and `a.txt` become `a.pdf` and `a.txt`).
fn output_names(paths: &[&Path]) -> Vec<String> {
    let stem = |p: &Path| {
        p.file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or("advice")
            .to_string()
    };

    let mut counts: HashMap<String, usize> = HashMap::new();
    for path in paths {
        *counts.entry(stem(*path)).or_default() += 1;
    }

    paths
        .iter()
        .map(|path| {
            let name = stem(*path);
            if counts[&name] > 1 {
                let full = path
                    .file_name()
                    .and_then(|s| s.to_str())
                    .unwrap_or("advice")
                    .to_string();
                warn!(
                    "Output name {} is shared by several inputs, using {}",
                    name, full
                );
                full
            } else {
                name
            }
        })
        .collect()
}

fn process_single_file(
    path: &Path,
    parser: &AdviceParser,
    config: &WirexConfig,
) -> anyhow::Result<WireRecord> {
    let text = read_document_text(path, config)?;
    let result = parser.parse(&text)?;
    Ok(result.record)
}

fn write_summary(path: &Path, results: &[ProcessResult]) -> anyhow::Result<()> {
    let mut wtr = csv::Writer::from_path(path)?;

    wtr.write_record([
        "filename",
        "status",
        "imad",
        "omad",
        "amount",
        "sender_aba",
        "receiver_aba",
        "originator_name",
        "beneficiary_name",
        "processing_time_ms",
        "error",
    ])?;

    for result in results {
        let filename = result
            .path
            .file_name()
            .and_then(|s| s.to_str())
            .unwrap_or("");

        if let Some(record) = &result.record {
            let cell = |key: &str| {
                record
                    .get(key)
                    .as_ref()
                    .map(FieldValue::to_string)
                    .unwrap_or_default()
            };
            wtr.write_record([
                filename,
                "success",
                &cell("imad"),
                &cell("omad"),
                &cell("amount"),
                &cell("sender_aba"),
                &cell("receiver_aba"),
                &cell("originator_name"),
                &cell("beneficiary_name"),
                &result.processing_time_ms.to_string(),
                "",
            ])?;
        } else {
            wtr.write_record([
                filename,
                "error",
                "",
                "",
                "",
                "",
                "",
                "",
                "",
                &result.processing_time_ms.to_string(),
                result.error.as_deref().unwrap_or(""),
            ])?;
        }
    }

    wtr.flush()?;
    Ok(())
}
