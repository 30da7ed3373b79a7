//! Error types for the wirex-core library.

use thiserror::Error;

/// Main error type for the wirex library.
#[derive(Error, Debug)]
pub enum WirexError {
    /// PDF processing error.
    #[error("PDF error: {0}")]
    Pdf(#[from] PdfError),

    /// Wire advice extraction error.
    #[error("extraction error: {0}")]
    Extraction(#[from] ExtractionError),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration error.
    #[error("configuration error: {0}")]
    Config(String),
}

/// Errors related to PDF processing.
#[derive(Error, Debug)]
pub enum PdfError {
    /// Failed to open/parse the PDF file.
    #[error("failed to parse PDF: {0}")]
    Parse(String),

    /// Failed to extract text from PDF.
    #[error("failed to extract text: {0}")]
    TextExtraction(String),

    /// The PDF is encrypted and cannot be processed.
    #[error("PDF is encrypted")]
    Encrypted,

    /// The PDF is empty or has no pages.
    #[error("PDF has no pages")]
    NoPages,
}

/// Errors related to wire advice field extraction.
///
/// A label that never appears is not an error for the engine; only values
/// that are present but cannot be coerced to their declared type fail
/// extraction. The remaining variants are raised by stricter callers.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ExtractionError {
    /// A captured value could not be converted to the field's type.
    #[error("failed to parse {field}: {value:?}")]
    Parse { field: String, value: String },

    /// A general field was left null in strict mode.
    #[error("missing required field: {0}")]
    MissingField(String),

    /// The text does not look like a wire advice.
    #[error("unsupported document type: {0}")]
    UnsupportedDocument(String),
}

/// Result type for the wirex library.
pub type Result<T> = std::result::Result<T, WirexError>;
