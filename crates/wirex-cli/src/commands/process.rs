//! Process command - extract a record from a single advice.

use std::fs;
use std::path::PathBuf;
use std::time::{Duration, Instant};

use clap::Args;
use console::style;
use indicatif::{ProgressBar, ProgressStyle};
use tracing::{debug, info, warn};

use wirex_core::WireParser;

use super::{build_parser, format_record, load_config, read_document_text, OutputFormat};

/// Arguments for the process command.
#[derive(Args)]
pub struct ProcessArgs {
    /// Input file (PDF or rendered text)
    #[arg(required = true)]
    input: PathBuf,

    /// Output file (default: stdout)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Output format (default: from config)
    #[arg(short, long, value_enum)]
    format: Option<OutputFormat>,

    /// Extract even if the document is not recognised as a wire advice
    #[arg(long)]
    force: bool,

    /// Show extraction statistics and warnings
    #[arg(long)]
    show_stats: bool,
}

pub async fn run(args: ProcessArgs, config_path: Option<&str>) -> anyhow::Result<()> {
    let start = Instant::now();
    let config = load_config(config_path)?;
    let format = OutputFormat::resolve(args.format, &config)?;

    if !args.input.exists() {
        anyhow::bail!("Input file not found: {}", args.input.display());
    }

    info!("Processing file: {}", args.input.display());

    let pb = ProgressBar::new_spinner();
    pb.set_style(
        ProgressStyle::default_spinner()
            .template("{spinner:.green} [{elapsed_precise}] {msg}")
            .unwrap(),
    );
    pb.enable_steady_tick(Duration::from_millis(100));

    pb.set_message("Reading document...");
    let text = read_document_text(&args.input, &config)?;

    pb.set_message("Extracting wire record...");
    let parser = build_parser(&config, args.force);
    let result = parser.parse(&text)?;

    pb.finish_and_clear();

    for warning in &result.warnings {
        warn!("{}: {}", args.input.display(), warning);
    }

    let output = format_record(&result.record, format, config.output.pretty_json)?;

    if let Some(output_path) = &args.output {
        fs::write(output_path, &output)?;
        println!(
            "{} Output written to {}",
            style("✓").green(),
            output_path.display()
        );
    } else {
        println!("{}", output);
    }

    if args.show_stats {
        eprintln!();
        eprintln!(
            "{} Document type: {}",
            style("ℹ").blue(),
            result.kind
        );
        eprintln!(
            "{} {} lines, {} section markers, {} general / {} party matches",
            style("ℹ").blue(),
            result.stats.lines,
            result.stats.marker_lines,
            result.stats.general_hits,
            result.stats.context_hits
        );
        if !result.missing_fields.is_empty() {
            eprintln!(
                "{} Missing: {}",
                style("ℹ").yellow(),
                result.missing_fields.join(", ")
            );
        }
        for warning in &result.warnings {
            eprintln!("{} {}", style("⚠").yellow(), warning);
        }
        eprintln!(
            "{} Processing time: {}ms",
            style("ℹ").blue(),
            result.processing_time_ms
        );
    }

    debug!("Total processing time: {:?}", start.elapsed());

    Ok(())
}
