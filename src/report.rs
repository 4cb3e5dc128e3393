//! Result encoding shared by the batch reconciler and the query API.

use serde::Serialize;

/// Which verdicts a batch report includes.
///
/// This is the single decision point for the three report modes. The
/// reconciler asks `wants` and `row` per hash and never branches on the
/// mode itself, so adding a mode touches only this enum.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReportFormat {
    /// Only hashes present in the corpus.
    Identified,
    /// Only hashes absent from the corpus.
    Unidentified,
    /// Every input hash, with a FOUND / NOT FOUND status column.
    All,
}

impl ReportFormat {
    /// Column header row for this format.
    pub fn header(&self) -> &'static str {
        match self {
            ReportFormat::All => "Hash,Status",
            ReportFormat::Identified | ReportFormat::Unidentified => "Hash",
        }
    }

    /// Whether a hash with the given membership verdict appears in the
    /// report at all.
    pub fn wants(&self, exists: bool) -> bool {
        match self {
            ReportFormat::Identified => exists,
            ReportFormat::Unidentified => !exists,
            ReportFormat::All => true,
        }
    }

    /// Encode one report row for a hash that `wants` accepted.
    pub fn row(&self, hash: &str, exists: bool) -> String {
        match self {
            ReportFormat::All => {
                let status = if exists { "FOUND" } else { "NOT FOUND" };
                format!("{},{}", hash, status)
            }
            ReportFormat::Identified | ReportFormat::Unidentified => hash.to_string(),
        }
    }
}

/// One lookup outcome as returned by the query API.
///
/// The hash echoes the caller's input verbatim; only the lookup itself
/// was case-normalized.
#[derive(Debug, Clone, Serialize)]
pub struct LookupResult {
    pub hash: String,
    pub exists: bool,
}
