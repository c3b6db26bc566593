//! Report writers.
//!
//! The engine hands the final [`DuplicateReport`] to [`write_report`],
//! which picks a format from the output file's extension: `.csv` gets
//! `hash,name,size` rows, `.html`/`.htm` a self-contained page, anything
//! else (including stdout) plain text.

pub mod csv;
pub mod html;
pub mod text;

use std::fs::File;
use std::io;
use std::path::{Path, PathBuf};

use crate::report::DuplicateReport;

pub use csv::CsvOutput;
pub use html::HtmlOutput;
pub use text::TextOutput;

/// Errors that can occur while rendering a report.
#[derive(Debug, thiserror::Error)]
pub enum OutputError {
    /// The report file exists and overwriting was not requested.
    #[error("report file {} already exists (pass --overwrite to replace it)", .0.display())]
    AlreadyExists(PathBuf),

    /// The report file could not be created.
    #[error("cannot create report file {}: {source}", path.display())]
    Create {
        /// Report path
        path: PathBuf,
        /// The underlying I/O error
        #[source]
        source: io::Error,
    },

    /// I/O error during writing.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// Error during CSV serialization.
    #[error("CSV error: {0}")]
    Csv(#[from] ::csv::Error),

    /// Error rendering the HTML template.
    #[error("template error: {0}")]
    Template(#[from] askama::Error),
}

/// Write the report to `path`, or as text to stdout when `path` is `None`.
pub fn write_report(
    report: &DuplicateReport,
    path: Option<&Path>,
    overwrite: bool,
) -> Result<(), OutputError> {
    let Some(path) = path else {
        return TextOutput::new(report).write_to(io::stdout().lock());
    };

    if path.exists() && !overwrite {
        return Err(OutputError::AlreadyExists(path.to_path_buf()));
    }
    let file = File::create(path).map_err(|source| OutputError::Create {
        path: path.to_path_buf(),
        source,
    })?;

    let extension = path
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_ascii_lowercase)
        .unwrap_or_default();
    match extension.as_str() {
        "csv" => CsvOutput::new(report).write_to(file),
        "html" | "htm" => HtmlOutput::new(report).write_to(file),
        _ => TextOutput::new(report).write_to(file),
    }
}
