//! Log sink setup and the log-directory pre-flight check.
//!
//! Two sinks carry every record: the console, and an append-only file
//! under the fixed log directory. The directory is probed before any
//! other startup work so a broken log destination stops the process
//! while it is still trivial to diagnose.

use std::fs::OpenOptions;
use std::path::Path;
use std::sync::Mutex;

use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

use crate::error::{CorpusError, Result};

/// Fixed directory both log sinks live under.
pub const LOG_DIR: &str = "/var/log/hashcorpus";

/// Name of the persistent log file inside the log directory.
pub const LOG_FILE: &str = "log.txt";

/// Verify the log directory exists and is writable by creating and
/// removing a probe file. Runs before the subscriber is installed.
pub fn check_log_dir(dir: &Path) -> Result<()> {
    if !dir.is_dir() {
        return Err(CorpusError::LogDir(format!(
            "{} does not exist",
            dir.display()
        )));
    }

    let probe = dir.join(".write_probe");
    std::fs::File::create(&probe).map_err(|e| {
        CorpusError::LogDir(format!("{} is not writable: {}", dir.display(), e))
    })?;
    let _ = std::fs::remove_file(&probe);

    Ok(())
}

/// Install the global subscriber: a console layer and an ANSI-free file
/// layer appending to `LOG_FILE`, both timestamped. `RUST_LOG` overrides
/// the default `info` level.
pub fn init(dir: &Path) -> Result<()> {
    let log_file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(dir.join(LOG_FILE))?;

    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stdout))
        .with(
            tracing_subscriber::fmt::layer()
                .with_ansi(false)
                .with_writer(Mutex::new(log_file)),
        )
        .init();

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_check_accepts_writable_directory() {
        let dir = TempDir::new().unwrap();
        assert!(check_log_dir(dir.path()).is_ok());
    }

    #[test]
    fn test_check_rejects_missing_directory() {
        let err = check_log_dir(Path::new("/nonexistent/log/dir")).unwrap_err();
        assert!(matches!(err, CorpusError::LogDir(_)));
        assert!(err.to_string().contains("does not exist"));
    }

    #[test]
    fn test_check_removes_its_probe_file() {
        let dir = TempDir::new().unwrap();
        check_log_dir(dir.path()).unwrap();
        assert!(!dir.path().join(".write_probe").exists());
    }
}
