//! Batch reconciliation: classify a candidate hash stream against the
//! corpus and write the verdict report.

use std::fs::File;
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::Path;

use tracing::info;

use crate::error::Result;
use crate::index::{CorpusIndex, NormalizedHash};
use crate::report::ReportFormat;

/// Row counters for a completed reconciliation run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ReconcileStats {
    /// Candidate hashes read from the input.
    pub read: u64,
    /// Report rows written after the header.
    pub written: u64,
}

/// Classify every line of `input` against `index` and write the rows
/// accepted by `format` to `output`, in input order.
///
/// Single-pass and strictly sequential: emitted rows must keep the
/// relative order of the input, so there is no fan-out here. A stream
/// fault aborts the run; rows already flushed stay in place.
pub fn reconcile<R: BufRead, W: Write>(
    input: R,
    output: &mut W,
    index: &CorpusIndex,
    format: ReportFormat,
) -> Result<ReconcileStats> {
    let mut stats = ReconcileStats::default();

    writeln!(output, "{}", format.header())?;

    for line in input.lines() {
        let line = line?;
        stats.read += 1;

        let key = NormalizedHash::from(line);
        let exists = index.contains(&key);
        if format.wants(exists) {
            writeln!(output, "{}", format.row(key.as_str(), exists))?;
            stats.written += 1;
        }
    }

    Ok(stats)
}

/// File-to-file reconciliation, the batch mode entry point.
pub fn reconcile_files(
    input_path: &Path,
    output_path: &Path,
    index: &CorpusIndex,
    format: ReportFormat,
) -> Result<ReconcileStats> {
    info!(
        input = %input_path.display(),
        output = %output_path.display(),
        "reconciling input against corpus"
    );

    let input = BufReader::new(File::open(input_path)?);
    let mut output = BufWriter::new(File::create(output_path)?);
    let stats = reconcile(input, &mut output, index, format)?;
    output.flush()?;

    info!(
        read = stats.read,
        written = stats.written,
        "reconciliation complete"
    );
    Ok(stats)
}
