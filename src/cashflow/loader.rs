//! Load cash entries from CSV tables with `amount` and `time` columns

use super::CashEntry;
use crate::error::{ValuationError, ValuationResult};
use csv::{ReaderBuilder, Trim};
use log::debug;
use std::fs::File;
use std::io::Read;
use std::path::Path;

/// Raw CSV row; extra columns are ignored
#[derive(Debug, serde::Deserialize)]
struct CsvRow {
    amount: f64,
    time: i64,
}

impl CsvRow {
    fn to_entry(self) -> ValuationResult<CashEntry> {
        CashEntry::try_new(self.amount, self.time)
    }
}

/// Load all cash entries from a CSV file
pub fn load_entries<P: AsRef<Path>>(path: P) -> ValuationResult<Vec<CashEntry>> {
    let path = path.as_ref();
    let file = File::open(path)?;
    let entries = load_entries_from_reader(file)?;
    debug!("Loaded {} cash entries from {}", entries.len(), path.display());
    Ok(entries)
}

/// Load cash entries from any reader (e.g. string buffer, stdin)
///
/// A single bad row fails the whole load; the error names the 1-based data row.
pub fn load_entries_from_reader<R: Read>(reader: R) -> ValuationResult<Vec<CashEntry>> {
    let mut csv_reader = ReaderBuilder::new().trim(Trim::All).from_reader(reader);
    let mut entries = Vec::new();

    for (index, result) in csv_reader.deserialize::<CsvRow>().enumerate() {
        let row_number = index + 1;
        let row = result.map_err(|e| {
            ValuationError::malformed(format!("row {}: {}", row_number, e))
        })?;
        let entry = row.to_entry().map_err(|e| match e {
            ValuationError::MalformedInput { reason } => {
                ValuationError::malformed(format!("row {}: {}", row_number, reason))
            }
            other => other,
        })?;
        entries.push(entry);
    }

    Ok(entries)
}
