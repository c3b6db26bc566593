//! Final duplicate-group report data model.
//!
//! Built fresh per run, immutable once constructed, and consumed by the
//! report writers in [`crate::output`]. Groups are kept sorted by file size
//! ascending (digest as tie-break) so identical input trees produce
//! identical reports.

use serde::Serialize;
use std::path::PathBuf;

/// A set of two or more files proven identical by size and full digest.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct DuplicateGroup {
    /// Shared size of every member, in bytes.
    pub size: u64,
    /// Shared full-content digest (lowercase hex).
    pub hash: String,
    /// Member file paths, sorted for deterministic output.
    pub files: Vec<PathBuf>,
}

impl DuplicateGroup {
    /// Create a group; member paths are sorted on construction.
    #[must_use]
    pub fn new(size: u64, hash: String, mut files: Vec<PathBuf>) -> Self {
        files.sort();
        Self { size, hash, files }
    }

    /// Number of members.
    #[must_use]
    pub fn len(&self) -> usize {
        self.files.len()
    }

    /// True when the group has no members (never the case after resolution).
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }

    /// Bytes that deleting all copies but one would reclaim.
    #[must_use]
    pub fn wasted_bytes(&self) -> u64 {
        self.size * (self.files.len() as u64).saturating_sub(1)
    }
}

/// The report handed to the rendering collaborator.
#[derive(Debug, Clone, Serialize)]
pub struct DuplicateReport {
    /// Report title.
    pub title: String,
    /// Duplicate groups, sorted by size ascending then digest.
    pub groups: Vec<DuplicateGroup>,
}

impl DuplicateReport {
    /// Build a report, normalizing group order.
    #[must_use]
    pub fn new(mut groups: Vec<DuplicateGroup>) -> Self {
        groups.sort_by(|a, b| a.size.cmp(&b.size).then_with(|| a.hash.cmp(&b.hash)));
        Self {
            title: "Duplicate Files".to_string(),
            groups,
        }
    }

    /// True when no duplicates were found.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    /// Total number of files across all groups.
    #[must_use]
    pub fn file_count(&self) -> usize {
        self.groups.iter().map(DuplicateGroup::len).sum()
    }

    /// Total reclaimable bytes across all groups.
    #[must_use]
    pub fn wasted_bytes(&self) -> u64 {
        self.groups.iter().map(DuplicateGroup::wasted_bytes).sum()
    }
}
