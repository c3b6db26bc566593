//! HTML report writer using the askama template engine.
//!
//! The page is self-contained (embedded CSS, no external assets) so it can
//! be mailed around or archived next to the scanned tree.

use std::io::Write;

use askama::Template;
use bytesize::ByteSize;
use chrono::Local;

use super::OutputError;
use crate::report::DuplicateReport;

/// Template context for the HTML report.
#[derive(Template)]
#[template(path = "report.html")]
pub struct HtmlOutput {
    /// Report title
    pub title: String,
    /// Generation timestamp
    pub timestamp: String,
    /// Application version
    pub version: String,
    /// Total duplicate file count
    pub file_count: usize,
    /// Human-readable reclaimable space
    pub reclaimable: String,
    /// Groups formatted for presentation
    pub groups: Vec<HtmlGroup>,
}

/// A duplicate group formatted for the template.
pub struct HtmlGroup {
    /// Shared digest (hex)
    pub hash: String,
    /// Human-readable member size
    pub size_formatted: String,
    /// Exact member size in bytes
    pub size: u64,
    /// Member paths as display strings
    pub files: Vec<String>,
}

impl HtmlOutput {
    /// Build the template context from a report.
    #[must_use]
    pub fn new(report: &DuplicateReport) -> Self {
        Self {
            title: report.title.clone(),
            timestamp: Local::now().format("%Y-%m-%d %H:%M:%S").to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
            file_count: report.file_count(),
            reclaimable: ByteSize::b(report.wasted_bytes()).to_string(),
            groups: report
                .groups
                .iter()
                .map(|group| HtmlGroup {
                    hash: group.hash.clone(),
                    size_formatted: ByteSize::b(group.size).to_string(),
                    size: group.size,
                    files: group
                        .files
                        .iter()
                        .map(|p| p.display().to_string())
                        .collect(),
                })
                .collect(),
        }
    }

    /// Render the page and write it to `writer`.
    pub fn write_to<W: Write>(&self, mut writer: W) -> Result<(), OutputError> {
        let html = self.render()?;
        writer.write_all(html.as_bytes())?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::report::DuplicateGroup;
    use std::path::PathBuf;

    #[test]
    fn test_html_contains_groups_and_paths() {
        let report = DuplicateReport::new(vec![DuplicateGroup::new(
            5,
            "cafe".to_string(),
            vec![PathBuf::from("/d/one"), PathBuf::from("/d/two")],
        )]);

        let mut buf = Vec::new();
        HtmlOutput::new(&report).write_to(&mut buf).unwrap();
        let html = String::from_utf8(buf).unwrap();

        assert!(html.contains("<html"));
        assert!(html.contains("cafe"));
        assert!(html.contains("/d/one"));
        assert!(html.contains("/d/two"));
    }

    #[test]
    fn test_html_escapes_paths() {
        let report = DuplicateReport::new(vec![DuplicateGroup::new(
            1,
            "aa".to_string(),
            vec![
                PathBuf::from("/d/<script>"),
                PathBuf::from("/d/other"),
            ],
        )]);

        let mut buf = Vec::new();
        HtmlOutput::new(&report).write_to(&mut buf).unwrap();
        let html = String::from_utf8(buf).unwrap();
        assert!(!html.contains("<script>"));
        assert!(html.contains("&lt;script&gt;"));
    }
}
