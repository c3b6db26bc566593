//! Plain-text report writer, also the stdout default.

use std::io;

use bytesize::ByteSize;

use super::OutputError;
use crate::report::DuplicateReport;

/// Plain-text report writer.
pub struct TextOutput<'a> {
    report: &'a DuplicateReport,
}

impl<'a> TextOutput<'a> {
    /// Create a text writer over a report.
    #[must_use]
    pub fn new(report: &'a DuplicateReport) -> Self {
        Self { report }
    }

    /// Write the report as plain text to `writer`.
    pub fn write_to<W: io::Write>(&self, mut writer: W) -> Result<(), OutputError> {
        writeln!(writer, "{}", self.report.title)?;
        writeln!(writer, "{}", "=".repeat(self.report.title.len()))?;
        writeln!(writer)?;

        if self.report.is_empty() {
            writeln!(writer, "No duplicate files found.")?;
            return Ok(());
        }

        for group in &self.report.groups {
            writeln!(
                writer,
                "{} files, {} each, {} [{}]",
                group.len(),
                ByteSize::b(group.size),
                group.size,
                group.hash
            )?;
            for path in &group.files {
                writeln!(writer, "  {}", path.display())?;
            }
            writeln!(writer)?;
        }
        writeln!(
            writer,
            "{} duplicate files in {} groups, {} reclaimable",
            self.report.file_count(),
            self.report.groups.len(),
            ByteSize::b(self.report.wasted_bytes())
        )?;
        Ok(())
    }
}
