//! Bulk-source import: streams the reference corpus into the index.
//!
//! The loader reads one record per line, extracts the hash token per the
//! import configuration, normalizes it, and inserts it. It runs to
//! completion before any consumer path starts, so a partially built
//! index is never observable.

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;
use std::time::Instant;

use tracing::{info, warn};

use crate::error::{CorpusError, Result};
use crate::index::{CorpusIndex, NormalizedHash};

/// How hash tokens are extracted from each record of the bulk source.
#[derive(Debug, Clone)]
pub struct ImportConfig {
    /// Zero-based field to take from a delimited record. `None` means
    /// the whole line is the token.
    pub field_index: Option<usize>,
    /// Field delimiter used when `field_index` is set.
    pub delimiter: String,
    /// Remove one leading and one trailing character from each token
    /// (quoted CSV columns). Tokens shorter than two characters are
    /// left untouched.
    pub strip_quotes: bool,
}

impl Default for ImportConfig {
    fn default() -> Self {
        Self {
            field_index: None,
            delimiter: ",".to_string(),
            strip_quotes: false,
        }
    }
}

/// Counters reported when an import completes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ImportStats {
    /// Records whose token reached the index.
    pub records: u64,
    /// Records skipped because the field index was out of range.
    pub skipped: u64,
}

/// Extract the token from one record. `None` means the configured field
/// index is out of range for this record.
fn extract_token<'a>(line: &'a str, config: &ImportConfig) -> Option<&'a str> {
    let token = match config.field_index {
        Some(idx) => line.split(config.delimiter.as_str()).nth(idx)?,
        None => line,
    };
    if config.strip_quotes {
        Some(strip_outer_chars(token))
    } else {
        Some(token)
    }
}

/// Drop exactly one leading and one trailing character. Tokens with
/// fewer than two characters come back unchanged.
fn strip_outer_chars(token: &str) -> &str {
    let mut chars = token.chars();
    if chars.next().is_some() && chars.next_back().is_some() {
        chars.as_str()
    } else {
        token
    }
}

/// Stream `reader` into `index`, one record per line.
///
/// An out-of-range field index skips that record with a warning and the
/// import continues. A read fault aborts the whole import: the index is
/// all-or-nothing, so the partial result must never reach a consumer.
pub fn load_corpus<R: BufRead>(
    reader: R,
    config: &ImportConfig,
    index: &mut CorpusIndex,
) -> Result<ImportStats> {
    let mut stats = ImportStats::default();

    for line in reader.lines() {
        let line = line?;
        match extract_token(&line, config) {
            Some(token) => {
                index.insert(NormalizedHash::new(token));
                stats.records += 1;
            }
            None => {
                warn!(record = %line, "field index out of range, record skipped");
                stats.skipped += 1;
            }
        }
    }

    Ok(stats)
}

/// Build the corpus index from the bulk data file.
pub fn import_data_file(path: &Path, config: &ImportConfig) -> Result<CorpusIndex> {
    if !path.is_file() {
        return Err(CorpusError::DataFileMissing(path.to_path_buf()));
    }

    info!(path = %path.display(), "importing bulk data");
    let started = Instant::now();

    let file = File::open(path)?;
    let mut index = CorpusIndex::new();
    let stats = load_corpus(BufReader::new(file), config, &mut index)?;

    info!(
        keys = index.len(),
        records = stats.records,
        skipped = stats.skipped,
        elapsed_ms = started.elapsed().as_millis() as u64,
        "import complete"
    );

    Ok(index)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::{self, Read, Write};
    use tempfile::NamedTempFile;

    /// Yields its data normally, then fails instead of reporting EOF.
    struct FaultyReader {
        data: io::Cursor<Vec<u8>>,
    }

    impl FaultyReader {
        fn new(data: &str) -> Self {
            Self {
                data: io::Cursor::new(data.as_bytes().to_vec()),
            }
        }
    }

    impl Read for FaultyReader {
        fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
            let n = self.data.read(buf)?;
            if n == 0 {
                return Err(io::Error::new(
                    io::ErrorKind::ConnectionAborted,
                    "read fault",
                ));
            }
            Ok(n)
        }
    }

    fn load(data: &str, config: &ImportConfig) -> (CorpusIndex, ImportStats) {
        let mut index = CorpusIndex::new();
        let stats = load_corpus(data.as_bytes(), config, &mut index).unwrap();
        (index, stats)
    }

    #[test]
    fn test_whole_line_mode_uppercases_tokens() {
        let (index, stats) = load("deadbeef\ncafebabe\n", &ImportConfig::default());

        assert_eq!(stats.records, 2);
        assert_eq!(stats.skipped, 0);
        assert!(index.lookup("DEADBEEF"));
        assert!(index.lookup("cafebabe"));
    }

    #[test]
    fn test_field_extraction_takes_configured_column() {
        let config = ImportConfig {
            field_index: Some(2),
            ..ImportConfig::default()
        };
        let (index, stats) = load("x,y,deadbeef,z\nx,y,cafebabe,z\n", &config);

        assert_eq!(stats.records, 2);
        assert!(index.lookup("DEADBEEF"));
        assert!(index.lookup("CAFEBABE"));
        assert!(!index.lookup("X"));
    }

    #[test]
    fn test_quote_stripping_removes_outer_pair() {
        let config = ImportConfig {
            field_index: Some(0),
            strip_quotes: true,
            ..ImportConfig::default()
        };
        let (index, _) = load("\"deadbeef\",label\n", &config);

        assert!(index.lookup("DEADBEEF"));
        assert!(!index.lookup("\"DEADBEEF\""));
    }

    #[test]
    fn test_quote_stripping_takes_one_char_from_each_end() {
        assert_eq!(strip_outer_chars("\"x\""), "x");
        assert_eq!(strip_outer_chars("ab"), "");
    }

    #[test]
    fn test_quote_stripping_leaves_short_tokens_alone() {
        assert_eq!(strip_outer_chars("a"), "a");
        assert_eq!(strip_outer_chars(""), "");
    }

    #[test]
    fn test_out_of_range_field_skips_record_and_continues() {
        // Second record has two fields, so index 2 does not exist there.
        let config = ImportConfig {
            field_index: Some(2),
            ..ImportConfig::default()
        };
        let (index, stats) = load("a,b,cccc\nshort,row\nd,e,ffff\n", &config);

        assert_eq!(stats.records, 2);
        assert_eq!(stats.skipped, 1);
        assert!(index.lookup("CCCC"));
        assert!(index.lookup("FFFF"));
        assert_eq!(index.len(), 2);
    }

    #[test]
    fn test_custom_delimiter() {
        let config = ImportConfig {
            field_index: Some(1),
            delimiter: ";".to_string(),
            ..ImportConfig::default()
        };
        let (index, _) = load("left;abcd;right\n", &config);

        assert!(index.lookup("ABCD"));
    }

    #[test]
    fn test_duplicate_source_records_collapse() {
        let (index, stats) = load("AAAA\naaaa\nAaAa\n", &ImportConfig::default());

        assert_eq!(stats.records, 3);
        assert_eq!(index.len(), 1);
    }

    #[test]
    fn test_mid_stream_fault_aborts_the_import() {
        let mut index = CorpusIndex::new();
        let reader = BufReader::new(FaultyReader::new("aaaa\nbbbb\n"));

        let result = load_corpus(reader, &ImportConfig::default(), &mut index);

        assert!(matches!(result.unwrap_err(), CorpusError::Io(_)));
    }

    #[test]
    fn test_import_data_file_requires_existing_path() {
        let missing = Path::new("/nonexistent/corpus.txt");
        let err = import_data_file(missing, &ImportConfig::default()).unwrap_err();
        assert!(matches!(err, CorpusError::DataFileMissing(_)));
    }

    #[test]
    fn test_import_data_file_reads_from_disk() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "0123abcd").unwrap();
        writeln!(file, "4567ef01").unwrap();
        file.flush().unwrap();

        let index = import_data_file(file.path(), &ImportConfig::default()).unwrap();
        assert_eq!(index.len(), 2);
        assert!(index.lookup("0123ABCD"));
    }
}
