//! Line reducer: folds a line sequence into a [`WireRecord`].

use serde::Serialize;
use tracing::{debug, trace};

use crate::models::record::WireRecord;

use super::patterns::{match_field, ContextField, FieldRule, PatternCatalog};
use super::section::{Section, SectionTracker};
use super::Result;

/// Counters collected during one reduction pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ReductionStats {
    /// Lines consumed, including blank and marker lines.
    pub lines: usize,
    /// Section marker lines.
    pub marker_lines: usize,
    /// General field matches (repeats included).
    pub general_hits: usize,
    /// Originator/beneficiary field matches.
    pub context_hits: usize,
}

/// Output of [`LineReducer::reduce`].
#[derive(Debug, Clone)]
pub struct Reduction {
    pub record: WireRecord,
    pub stats: ReductionStats,
}

/// Applies the field catalog to each line and merges matches.
///
/// General fields: every rule is tried on every line and a later match
/// replaces an earlier one. Originator/beneficiary fields: only the table of
/// the active section is tried, in declaration order, and the first rule that
/// matches is the only one written for that line.
#[derive(Debug, Clone, Copy)]
pub struct LineReducer<'c> {
    catalog: &'c PatternCatalog,
}

impl<'c> LineReducer<'c> {
    pub fn new(catalog: &'c PatternCatalog) -> Self {
        Self { catalog }
    }

    /// Reduce lines in order. Fails only when a numeric capture cannot be
    /// coerced; no partial record is returned in that case.
    pub fn reduce<'l, I>(&self, lines: I) -> Result<Reduction>
    where
        I: IntoIterator<Item = &'l str>,
    {
        let mut record = WireRecord::new();
        let mut tracker = SectionTracker::new();
        let mut stats = ReductionStats::default();

        for raw in lines {
            let line = raw.trim();
            stats.lines += 1;

            if tracker.observe(line) {
                stats.marker_lines += 1;
                continue;
            }
            if line.is_empty() {
                continue;
            }

            for rule in &self.catalog.general {
                if let Some(value) = match_field(rule, line) {
                    trace!("line {}: {} = {:?}", stats.lines, rule.field.name(), value);
                    record.set_general(rule.field, value).inspect_err(|e| {
                        debug!("line {}: {}", stats.lines, e);
                    })?;
                    stats.general_hits += 1;
                }
            }

            if let Some(table) = self.context_table(tracker.current()) {
                if let Some((field, value)) = first_match(table, line) {
                    trace!("line {}: {} = {:?}", stats.lines, field.name(), value);
                    record.set_context(field, value);
                    stats.context_hits += 1;
                }
            }
        }

        debug!(
            "reduced {} lines ({} markers, {} general, {} contextual matches)",
            stats.lines, stats.marker_lines, stats.general_hits, stats.context_hits
        );

        Ok(Reduction { record, stats })
    }

    fn context_table(&self, section: Section) -> Option<&'c [FieldRule<ContextField>]> {
        match section {
            Section::None => None,
            Section::Originator => Some(self.catalog.originator.as_slice()),
            Section::Beneficiary => Some(self.catalog.beneficiary.as_slice()),
        }
    }
}

fn first_match<'a>(
    table: &[FieldRule<ContextField>],
    line: &'a str,
) -> Option<(ContextField, &'a str)> {
    table
        .iter()
        .find_map(|rule| match_field(rule, line).map(|value| (rule.field, value)))
}
