//! Document type detection.
//!
//! Runs before extraction; the engine itself never rejects a document.

use std::fmt;

use serde::Serialize;

/// Kind of document recognised from its rendered text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DocumentKind {
    /// Outgoing wire-transfer advice.
    WireOutgoing,
    /// Anything else.
    Unknown,
}

impl fmt::Display for DocumentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DocumentKind::WireOutgoing => f.write_str("WIRE OUTGOING"),
            DocumentKind::Unknown => f.write_str("UNKNOWN"),
        }
    }
}

/// Classify rendered text. Outgoing advices carry both message accountability
/// numbers (IMAD and OMAD).
pub fn classify(text: &str) -> DocumentKind {
    if text.contains("IMAD") && text.contains("OMAD") {
        DocumentKind::WireOutgoing
    } else {
        DocumentKind::Unknown
    }
}
