//! Scan orchestration.
//!
//! Owns the per-run state (metrics, status) and sequences the phases:
//! `Scan Files -> Merge Scans -> Hash Candidates -> Group Duplicates ->
//! Render Report -> Close`. Phases are strictly sequential and a run is not
//! restartable; a fatal error at any phase aborts the run and no partial
//! report is written.

use std::collections::BTreeSet;
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::Context;

use crate::index::SizeIndex;
use crate::metrics::ScanMetrics;
use crate::output;
use crate::report::DuplicateReport;
use crate::resolve::{resolve_duplicates, ResolveOptions};
use crate::scanner::{walk_roots, HashAlgorithm, WalkShard};
use crate::status::ScanStatus;

/// Parameters for one duplicate scan run.
#[derive(Debug, Clone)]
pub struct ScanParams {
    /// Root directories to scan.
    pub roots: Vec<PathBuf>,
    /// Minimum file size to consider, in bytes. Files smaller than this are
    /// skipped; files of exactly this size are included. Zero-byte files
    /// are never considered, so the effective floor is 1.
    pub min_size: u64,
    /// Hash algorithm name, resolved against the registry before any I/O.
    pub hash_algorithm: String,
    /// Enable the coarse pre-filter for large same-size buckets.
    pub coarse_hashing: bool,
    /// Throttle interval for status updates.
    pub status_interval: Duration,
    /// Report file; `None` writes a text report to stdout.
    pub report_file: Option<PathBuf>,
    /// Overwrite an existing report file.
    pub overwrite: bool,
    /// Dump per-bucket and per-group detail while scanning.
    pub verbose: bool,
    /// Suppress the progress spinner.
    pub quiet: bool,
}

impl Default for ScanParams {
    fn default() -> Self {
        Self {
            roots: Vec::new(),
            min_size: 1,
            hash_algorithm: "xxh64".to_string(),
            coarse_hashing: true,
            status_interval: Duration::from_secs(5),
            report_file: None,
            overwrite: true,
            verbose: false,
            quiet: false,
        }
    }
}

/// Per-root walker shard: a size index plus the shared run counters.
struct IndexShard<'run> {
    index: SizeIndex,
    min_size: u64,
    metrics: &'run ScanMetrics,
    status: &'run ScanStatus,
}

impl<'run> IndexShard<'run> {
    fn new(min_size: u64, metrics: &'run ScanMetrics, status: &'run ScanStatus) -> Self {
        Self {
            index: SizeIndex::new(),
            min_size,
            metrics,
            status,
        }
    }
}

impl WalkShard for IndexShard<'_> {
    fn accept(&mut self, path: PathBuf, size: u64) {
        self.metrics.files_seen.inc();
        self.metrics.bytes_seen.add(size);
        self.status.detail(|| {
            format!(
                "{} files, {}",
                self.metrics.files_seen.value(),
                bytesize::ByteSize::b(self.metrics.bytes_seen.value())
            )
        });
        if size < self.min_size {
            return;
        }
        self.index.accept(path, size);
    }
}

/// Run the scan phases and return the duplicate report without rendering.
///
/// This is the engine entry point used by tests and by [`run`]; it covers
/// `Scan Files` through `Group Duplicates`.
pub fn run_scan(params: &ScanParams) -> anyhow::Result<DuplicateReport> {
    // Configuration errors fail before any I/O.
    let algorithm = HashAlgorithm::parse(&params.hash_algorithm)?;
    let roots = dedup_roots(&params.roots);

    let metrics = ScanMetrics::new();
    let status = ScanStatus::new(params.status_interval, params.quiet);
    let outcome = scan_phases(params, algorithm, &roots, &metrics, &status);
    status.close();
    outcome
}

/// Run a full scan and render the report per `params.report_file`.
pub fn run(params: &ScanParams) -> anyhow::Result<DuplicateReport> {
    let report = run_scan(params)?;

    log::info!("Render Report");
    output::write_report(&report, params.report_file.as_deref(), params.overwrite)?;
    Ok(report)
}

fn scan_phases(
    params: &ScanParams,
    algorithm: HashAlgorithm,
    roots: &[PathBuf],
    metrics: &ScanMetrics,
    status: &ScanStatus,
) -> anyhow::Result<DuplicateReport> {
    let min_size = params.min_size.max(1);

    status.set_phase("Scan Files");
    let shards = walk_roots(roots, || IndexShard::new(min_size, metrics, status))
        .context("cannot scan files for uniqueness")?;
    metrics.log_snapshot();

    status.set_phase("Merge Scans");
    let mut index = SizeIndex::new();
    for shard in shards {
        index.merge_from(shard.index);
    }
    let prune = index.prune();
    log::debug!(
        "pruned {} singleton buckets, {} candidate files in {} buckets",
        prune.dropped_buckets,
        prune.candidate_files,
        prune.candidate_buckets
    );

    status.set_phase("Hash Candidates");
    let options = ResolveOptions {
        algorithm,
        coarse_hashing: params.coarse_hashing,
    };
    let groups = resolve_duplicates(&index, options, metrics, status);

    status.set_phase("Group Duplicates");
    let report = DuplicateReport::new(groups);
    if params.verbose {
        for group in &report.groups {
            log::debug!("{} {} {:?}", group.hash, group.size, group.files);
        }
        for (_, records) in index.buckets() {
            for record in records {
                if let Some(err) = record.cached_hash_error() {
                    log::debug!("not hashed: {err}");
                }
            }
        }
    }
    metrics.log_snapshot();
    Ok(report)
}

/// Drop empty and duplicate root entries, preserving a stable order.
fn dedup_roots(roots: &[PathBuf]) -> Vec<PathBuf> {
    let mut seen = BTreeSet::new();
    roots
        .iter()
        .filter(|root| *root != Path::new(""))
        .filter(|root| seen.insert((*root).clone()))
        .cloned()
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dedup_roots_removes_empty_and_duplicates() {
        let roots = vec![
            PathBuf::from("/a"),
            PathBuf::from(""),
            PathBuf::from("/b"),
            PathBuf::from("/a"),
        ];
        assert_eq!(
            dedup_roots(&roots),
            vec![PathBuf::from("/a"), PathBuf::from("/b")]
        );
    }

    #[test]
    fn test_unsupported_algorithm_fails_before_io() {
        let params = ScanParams {
            // A root that does not exist: the algorithm check must fire first.
            roots: vec![PathBuf::from("/definitely/not/here")],
            hash_algorithm: "rot13".to_string(),
            quiet: true,
            ..ScanParams::default()
        };
        let err = run_scan(&params).unwrap_err();
        assert!(err.to_string().contains("not supported"));
    }

    #[test]
    fn test_missing_root_fails() {
        let params = ScanParams {
            roots: vec![PathBuf::from("/definitely/not/here")],
            quiet: true,
            ..ScanParams::default()
        };
        assert!(run_scan(&params).is_err());
    }
}
