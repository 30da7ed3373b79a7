//! Subcommands and the document plumbing they share.

pub mod batch;
pub mod config;
pub mod process;

use std::fs;
use std::path::{Path, PathBuf};

use clap::ValueEnum;
use tracing::debug;

use wirex_core::models::config::WirexConfig;
use wirex_core::wire::{ContextField, GeneralField};
use wirex_core::{AdviceParser, PdfExtractor, PdfProcessor, WireRecord};

/// Output format for extracted records.
#[derive(Clone, Copy, Debug, ValueEnum)]
pub enum OutputFormat {
    /// JSON output
    Json,
    /// CSV output
    Csv,
    /// Plain text summary
    Text,
}

impl OutputFormat {
    /// Resolve the format from the command line or the configured default.
    pub fn resolve(explicit: Option<Self>, config: &WirexConfig) -> anyhow::Result<Self> {
        match explicit {
            Some(format) => Ok(format),
            None => Self::from_str(&config.output.default_format, true).map_err(|e| {
                anyhow::anyhow!(
                    "Invalid output.default_format {:?}: {}",
                    config.output.default_format,
                    e
                )
            }),
        }
    }

    pub fn extension(self) -> &'static str {
        match self {
            OutputFormat::Json => "json",
            OutputFormat::Csv => "csv",
            OutputFormat::Text => "txt",
        }
    }
}

/// Default location of the configuration file.
pub fn default_config_path() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("wirex")
        .join("config.json")
}

/// Load configuration from an explicit path, or fall back to defaults.
pub fn load_config(config_path: Option<&str>) -> anyhow::Result<WirexConfig> {
    match config_path {
        Some(path) => Ok(WirexConfig::from_file(Path::new(path))?),
        None => Ok(WirexConfig::default()),
    }
}

/// Whether a path looks like an input this tool can read.
pub fn is_supported_input(path: &Path) -> bool {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_lowercase();
    matches!(ext.as_str(), "pdf" | "txt")
}

/// Read the rendered text of a document: PDFs go through the text layer,
/// `.txt` files are taken as already rendered.
pub fn read_document_text(path: &Path, config: &WirexConfig) -> anyhow::Result<String> {
    let extension = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_lowercase();

    let text = match extension.as_str() {
        "pdf" => {
            let data = fs::read(path)?;
            let mut extractor = PdfExtractor::new();
            extractor.load(&data)?;

            let pages = extractor.page_count();
            debug!("PDF has {} pages", pages);
            if config.pdf.max_pages > 0 && pages > config.pdf.max_pages {
                anyhow::bail!(
                    "PDF has {} pages, more than the configured limit of {}",
                    pages,
                    config.pdf.max_pages
                );
            }

            let text = extractor.extract_text()?;
            if text.trim().len() < config.pdf.min_text_length {
                anyhow::bail!("No usable text could be extracted from the PDF");
            }
            text
        }
        "txt" => fs::read_to_string(path)?,
        _ => anyhow::bail!("Unsupported file format: {}", extension),
    };

    Ok(text)
}

/// Build a parser from configuration; `force` skips document classification.
pub fn build_parser(config: &WirexConfig, force: bool) -> AdviceParser {
    AdviceParser::new()
        .with_classification(config.extraction.require_classification && !force)
        .with_fail_on_missing(config.extraction.fail_on_missing)
}

/// All output keys in a stable order: general fields, then contextual ones.
pub fn record_columns() -> Vec<&'static str> {
    GeneralField::ALL
        .iter()
        .map(|f| f.name())
        .chain(ContextField::ALL.iter().map(|f| f.name()))
        .collect()
}

pub fn format_record(
    record: &WireRecord,
    format: OutputFormat,
    pretty: bool,
) -> anyhow::Result<String> {
    match format {
        OutputFormat::Json if pretty => Ok(serde_json::to_string_pretty(record)?),
        OutputFormat::Json => Ok(serde_json::to_string(record)?),
        OutputFormat::Csv => format_csv(record),
        OutputFormat::Text => Ok(format_text(record)),
    }
}

fn format_csv(record: &WireRecord) -> anyhow::Result<String> {
    let mut wtr = csv::Writer::from_writer(vec![]);
    let columns = record_columns();

    wtr.write_record(&columns)?;
    wtr.write_record(columns.iter().map(|key| {
        record
            .get(key)
            .map(|value| value.to_string())
            .unwrap_or_default()
    }))?;

    let data = String::from_utf8(wtr.into_inner()?)?;
    Ok(data)
}

fn format_text(record: &WireRecord) -> String {
    let mut output = String::new();

    output.push_str("Wire advice:\n");
    for field in GeneralField::ALL {
        let value = record
            .general(field)
            .map(|v| v.to_string())
            .unwrap_or_else(|| "-".to_string());
        output.push_str(&format!("  {:<26} {}\n", field.name(), value));
    }

    let context = record.context_fields();
    if !context.is_empty() {
        output.push_str("\nParties:\n");
        for (name, value) in context {
            output.push_str(&format!("  {:<43} {}\n", name, value));
        }
    }

    output
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_columns_cover_all_keys() {
        let columns = record_columns();
        assert_eq!(columns.len(), 31);
        assert_eq!(columns[0], "environment");
        assert_eq!(columns[30], "beneficiary_information_text");
    }

    #[test]
    fn test_format_csv_keeps_amount_precision() {
        let record = wirex_core::extract("Amount {2000}: 1234.567\nTest/Prod: PROD").unwrap();
        let csv = format_record(&record, OutputFormat::Csv, false).unwrap();
        let mut lines = csv.lines();

        assert!(lines.next().unwrap().contains("test/prod"));
        let row = lines.next().unwrap();
        assert!(row.contains(",1234.567,"));
        assert!(!row.contains("1234.57,"));
        assert!(row.contains("PROD"));
    }

    #[test]
    fn test_format_text_lists_parties_only_when_present() {
        let empty = format_record(&WireRecord::new(), OutputFormat::Text, false).unwrap();
        assert!(!empty.contains("Parties:"));

        let record = wirex_core::extract("Beneficiary {4200}\nName: JANE ROE").unwrap();
        let text = format_record(&record, OutputFormat::Text, false).unwrap();
        assert!(text.contains("Parties:"));
        assert!(text.contains("JANE ROE"));
    }

    #[test]
    fn test_resolve_format_from_config() {
        let mut config = WirexConfig::default();
        config.output.default_format = "csv".to_string();
        assert!(matches!(
            OutputFormat::resolve(None, &config).unwrap(),
            OutputFormat::Csv
        ));

        config.output.default_format = "xml".to_string();
        assert!(OutputFormat::resolve(None, &config).is_err());
        assert!(matches!(
            OutputFormat::resolve(Some(OutputFormat::Text), &config).unwrap(),
            OutputFormat::Text
        ));
    }

    #[test]
    fn test_supported_inputs() {
        assert!(is_supported_input(Path::new("advice.PDF")));
        assert!(is_supported_input(Path::new("advice.txt")));
        assert!(!is_supported_input(Path::new("advice.png")));
    }
}
