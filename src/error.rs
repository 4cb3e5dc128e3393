//! Error types shared across the corpus index and its consumer paths.

use std::path::PathBuf;

use thiserror::Error;

/// Crate-wide result alias.
pub type Result<T> = std::result::Result<T, CorpusError>;

/// Fatal conditions surfaced during startup, import, or reconciliation.
///
/// Membership misses are never errors; they are ordinary lookup outcomes
/// carried in reports and response bodies.
#[derive(Error, Debug)]
pub enum CorpusError {
    /// Stream fault while reading a bulk source or writing a report.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Config file is missing a required value or could not be read.
    #[error("Config error: {0}")]
    Config(String),

    /// Config file exists but is not valid YAML.
    #[error("Config parse error: {0}")]
    ConfigParse(#[from] serde_yaml::Error),

    /// Bulk data file does not exist at the given path.
    #[error("Data file does not exist: {}", .0.display())]
    DataFileMissing(PathBuf),

    /// Log directory failed the startup pre-flight check.
    #[error("Log directory not usable: {0}")]
    LogDir(String),
}
