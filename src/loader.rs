//! CSV transport boundary. Reads raw rows off disk; everything downstream
//! of here works on in-memory data and cannot fail.

use crate::types::RawRow;
use csv::ReaderBuilder;
use std::path::Path;
use thiserror::Error;
use tracing::{info, warn};

#[derive(Debug, Error)]
pub enum LoadError {
    #[error("failed to read dataset: {0}")]
    Csv(#[from] csv::Error),
    #[error("failed to open dataset: {0}")]
    Io(#[from] std::io::Error),
}

/// What happened during a load, for diagnostics. Row-level deserialize
/// failures are counted and skipped, never fatal.
#[derive(Debug, Clone, Default)]
pub struct LoadReport {
    pub total_rows: usize,
    pub parse_errors: usize,
}

pub fn read_raw_rows<P: AsRef<Path>>(path: P) -> Result<(Vec<RawRow>, LoadReport), LoadError> {
    let mut rdr = ReaderBuilder::new().flexible(true).from_path(path.as_ref())?;
    let mut report = LoadReport::default();
    let mut rows = Vec::new();

    for result in rdr.deserialize::<RawRow>() {
        report.total_rows += 1;
        match result {
            Ok(row) => rows.push(row),
            Err(_) => report.parse_errors += 1,
        }
    }

    if report.parse_errors > 0 {
        warn!(
            skipped = report.parse_errors,
            "some rows failed to deserialize and were skipped"
        );
    }
    info!(
        path = %path.as_ref().display(),
        rows = rows.len(),
        "dataset load complete"
    );
    Ok((rows, report))
}
