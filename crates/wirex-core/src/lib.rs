//! Core library for wire-transfer advice extraction.
//!
//! This crate provides:
//! - A fixed catalog of label-anchored field patterns
//! - Originator/beneficiary section tracking over the document's lines
//! - A line reducer that folds matches into a typed [`WireRecord`]
//! - Optional PDF text extraction (feature `pdf`)

pub mod error;
pub mod models;
#[cfg(feature = "pdf")]
pub mod pdf;
pub mod wire;

pub use error::{ExtractionError, Result, WirexError};
pub use models::record::{FieldValue, WireRecord};
#[cfg(feature = "pdf")]
pub use pdf::{PdfExtractor, PdfProcessor};
pub use wire::{
    classify, extract, AdviceParser, DocumentKind, ExtractionResult, LineReducer, PatternCatalog,
    Section, WireParser,
};
