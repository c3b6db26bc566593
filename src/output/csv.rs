//! CSV report writer.
//!
//! One row per duplicate file: `hash,name,size`. Paths containing commas or
//! quotes are quoted by the csv writer.

use std::io;

use serde::Serialize;

use super::OutputError;
use crate::report::DuplicateReport;

/// A single row in the CSV output.
#[derive(Debug, Serialize)]
struct CsvRow<'a> {
    /// Full-content digest shared by the group (hex)
    hash: &'a str,
    /// File path
    name: String,
    /// File size in bytes
    size: u64,
}

/// CSV report writer.
pub struct CsvOutput<'a> {
    report: &'a DuplicateReport,
}

impl<'a> CsvOutput<'a> {
    /// Create a CSV writer over a report.
    #[must_use]
    pub fn new(report: &'a DuplicateReport) -> Self {
        Self { report }
    }

    /// Write the CSV rows to `writer`.
    pub fn write_to<W: io::Write>(&self, writer: W) -> Result<(), OutputError> {
        let mut csv_writer = csv::Writer::from_writer(writer);
        for group in &self.report.groups {
            for path in &group.files {
                csv_writer.serialize(CsvRow {
                    hash: &group.hash,
                    name: path.to_string_lossy().into_owned(),
                    size: group.size,
                })?;
            }
        }
        csv_writer.flush()?;
        Ok(())
    }
}
