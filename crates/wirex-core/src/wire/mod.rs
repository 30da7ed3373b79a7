//! Wire-transfer advice field extraction.

pub mod classify;
pub mod lines;
pub mod patterns;
mod reducer;
pub mod section;

pub use classify::{classify, DocumentKind};
pub use lines::line_sequence;
pub use patterns::{match_field, ContextField, FieldRule, GeneralField, PatternCatalog};
pub use reducer::{LineReducer, Reduction, ReductionStats};
pub use section::{Section, SectionTracker};

use std::time::Instant;

use serde::Serialize;
use tracing::{debug, info};

use crate::error::ExtractionError;
use crate::models::record::WireRecord;

/// Result type for extraction operations.
pub type Result<T> = std::result::Result<T, ExtractionError>;

/// Extract a wire record from a document's rendered text.
///
/// Pure: no I/O, no shared mutable state. Every general field is present in
/// the result (possibly `None`). Fails only when a numeric field holds a value
/// that is not a number.
pub fn extract(text: &str) -> Result<WireRecord> {
    LineReducer::new(PatternCatalog::standard())
        .reduce(line_sequence(text))
        .map(|reduction| reduction.record)
}

/// Result of parsing one advice, with diagnostics.
#[derive(Debug, Clone, Serialize)]
pub struct ExtractionResult {
    /// Extracted record.
    pub record: WireRecord,
    /// Detected document kind.
    pub kind: DocumentKind,
    /// General fields left null.
    pub missing_fields: Vec<&'static str>,
    /// Extraction warnings.
    pub warnings: Vec<String>,
    /// Reduction counters.
    pub stats: ReductionStats,
    /// Processing time in milliseconds.
    pub processing_time_ms: u64,
}

/// Trait for wire advice parsing.
pub trait WireParser {
    /// Parse an advice from rendered text.
    fn parse(&self, text: &str) -> Result<ExtractionResult>;
}

/// Parser for outgoing wire advices.
pub struct AdviceParser {
    /// Reject text that is not classified as a wire advice.
    require_classification: bool,
    /// Fail when any general field is left null.
    fail_on_missing: bool,
}

impl AdviceParser {
    /// Create a parser with default settings.
    pub fn new() -> Self {
        Self {
            require_classification: true,
            fail_on_missing: false,
        }
    }

    /// Set document classification check.
    pub fn with_classification(mut self, require: bool) -> Self {
        self.require_classification = require;
        self
    }

    /// Set strict completeness check.
    pub fn with_fail_on_missing(mut self, fail: bool) -> Self {
        self.fail_on_missing = fail;
        self
    }
}

impl Default for AdviceParser {
    fn default() -> Self {
        Self::new()
    }
}

impl WireParser for AdviceParser {
    fn parse(&self, text: &str) -> Result<ExtractionResult> {
        let start = Instant::now();

        info!("Parsing wire advice from {} characters of text", text.len());

        let kind = classify(text);
        if self.require_classification && kind != DocumentKind::WireOutgoing {
            return Err(ExtractionError::UnsupportedDocument(kind.to_string()));
        }

        let reduction = LineReducer::new(PatternCatalog::standard()).reduce(line_sequence(text))?;
        let record = reduction.record;
        let missing_fields = record.missing_general_fields();

        if self.fail_on_missing {
            if let Some(first) = missing_fields.first() {
                return Err(ExtractionError::MissingField(first.to_string()));
            }
        }

        let mut warnings = Vec::new();
        if reduction.stats.marker_lines == 0 {
            warnings.push("No originator or beneficiary section found".to_string());
        }
        if record.amount.is_none() {
            warnings.push("Could not extract amount".to_string());
        }
        if record.imad.is_none() || record.omad.is_none() {
            warnings.push("Could not extract IMAD/OMAD".to_string());
        }

        debug!(
            "Extracted wire record with {} missing general fields",
            missing_fields.len()
        );

        Ok(ExtractionResult {
            record,
            kind,
            missing_fields,
            warnings,
            stats: reduction.stats,
            processing_time_ms: start.elapsed().as_millis() as u64,
        })
    }
}
