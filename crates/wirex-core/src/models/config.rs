//! Configuration structures for the wirex pipeline.
//!
//! The field catalog itself is compiled in; these settings only govern how
//! documents are loaded and how results are reported.

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::error::{Result, WirexError};

/// Main configuration for the wirex pipeline.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct WirexConfig {
    /// PDF processing configuration.
    pub pdf: PdfConfig,

    /// Extraction behaviour around the engine.
    pub extraction: ExtractionConfig,

    /// Output configuration.
    pub output: OutputConfig,
}

/// PDF processing configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PdfConfig {
    /// Refuse documents with more pages than this (0 = unlimited).
    pub max_pages: u32,

    /// Minimum text length to consider the PDF readable.
    pub min_text_length: usize,
}

impl Default for PdfConfig {
    fn default() -> Self {
        Self {
            max_pages: 20,
            min_text_length: 20,
        }
    }
}

/// Extraction configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ExtractionConfig {
    /// Reject documents that are not classified as outgoing wire advices.
    pub require_classification: bool,

    /// Treat a record with null general fields as a failure.
    pub fail_on_missing: bool,
}

impl Default for ExtractionConfig {
    fn default() -> Self {
        Self {
            require_classification: true,
            fail_on_missing: false,
        }
    }
}

/// Output configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Pretty-print JSON output.
    pub pretty_json: bool,

    /// Format used when none is given on the command line.
    pub default_format: String,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            pretty_json: true,
            default_format: "json".to_string(),
        }
    }
}

impl WirexConfig {
    /// Load configuration from a JSON file.
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        serde_json::from_str(&content).map_err(|e| WirexError::Config(e.to_string()))
    }

    /// Save configuration to a JSON file.
    pub fn save(&self, path: &Path) -> Result<()> {
        let content =
            serde_json::to_string_pretty(self).map_err(|e| WirexError::Config(e.to_string()))?;
        std::fs::write(path, content)?;
        Ok(())
    }
}
