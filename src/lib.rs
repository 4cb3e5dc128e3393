//! hashcorpus: reference corpus hash membership service.
//!
//! Builds an ordered, case-normalized membership index from a bulk hash
//! source, then answers "is this hash in the corpus?" two ways: a
//! one-shot batch reconciliation between files, or a long-running HTTP
//! API serving single and bulk lookups. The index is immutable once
//! built, which is what makes the concurrent server path lock-free.

pub mod api;
pub mod config;
pub mod error;
pub mod import;
pub mod index;
pub mod logging;
pub mod reconcile;
pub mod report;

pub use config::Config;
pub use error::{CorpusError, Result};
pub use import::{import_data_file, ImportConfig, ImportStats};
pub use index::{CorpusIndex, NormalizedHash};
pub use reconcile::{reconcile, reconcile_files, ReconcileStats};
pub use report::{LookupResult, ReportFormat};
