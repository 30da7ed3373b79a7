//! Originator/beneficiary section tracking.
//!
//! Advices carry no explicit end-of-section marker, so a section stays open
//! until the opposite marker appears. There is no way back to [`Section::None`].

use tracing::trace;

const ORIGINATOR_MARKERS: [&str; 2] = [
    "Originator {5000}",
    "Originator to Beneficiary Information {6000}",
];

const BENEFICIARY_MARKERS: [&str; 2] = ["Beneficiary {4200}", "Beneficiary Information {6400}"];

/// Which contextual table is active.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Section {
    /// No marker seen yet.
    #[default]
    None,
    Originator,
    Beneficiary,
}

impl Section {
    /// Section a marker line switches to, or `None` for ordinary lines.
    pub fn from_marker(line: &str) -> Option<Section> {
        if ORIGINATOR_MARKERS.iter().any(|m| line.contains(m)) {
            Some(Section::Originator)
        } else if BENEFICIARY_MARKERS.iter().any(|m| line.contains(m)) {
            Some(Section::Beneficiary)
        } else {
            None
        }
    }
}

/// Section state for a single extraction run.
#[derive(Debug, Default)]
pub struct SectionTracker {
    current: Section,
    transitions: usize,
}

impl SectionTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Currently active section.
    pub fn current(&self) -> Section {
        self.current
    }

    /// Number of marker lines consumed so far.
    pub fn transitions(&self) -> usize {
        self.transitions
    }

    /// Feed a line. Returns `true` when it was a marker; marker lines carry no
    /// field data and must not be matched further.
    pub fn observe(&mut self, line: &str) -> bool {
        match Section::from_marker(line) {
            Some(next) => {
                trace!("section {:?} -> {:?}", self.current, next);
                self.current = next;
                self.transitions += 1;
                true
            }
            None => false,
        }
    }
}
