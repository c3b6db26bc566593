//! Duplicate resolution pipeline.
//!
//! Reduces each multi-member size bucket to confirmed duplicate groups in
//! two hashing passes:
//!
//! 1. **Coarse pass** (optional): for buckets whose file size is at or
//!    above [`COARSE_MIN_FILE_SIZE`], members are grouped by a digest over
//!    the leading [`COARSE_CHUNK_SIZE`] bytes. Singleton coarse groups are
//!    provably non-duplicates and are dropped. Members whose coarse hash
//!    failed are conservatively kept - a hashing failure must never erase a
//!    potential duplicate from consideration.
//! 2. **Full pass**: the surviving candidates are full-hashed in parallel,
//!    one rayon task per file, and grouped by digest. Singleton groups are
//!    dropped; a per-file hash error removes only that file and never
//!    aborts its bucket.

use std::collections::HashMap;
use std::path::PathBuf;

use rayon::prelude::*;

use crate::index::{FileRecord, SizeIndex};
use crate::metrics::ScanMetrics;
use crate::report::DuplicateGroup;
use crate::scanner::HashAlgorithm;
use crate::status::ScanStatus;

/// Smallest file size that benefits from the coarse pre-filter; the
/// boundary is inclusive, a file of exactly this size is pre-filtered.
/// Below this, reading the whole file costs about as much as the chunk.
pub const COARSE_MIN_FILE_SIZE: u64 = 10 * 1024 * 1024;

/// Leading-chunk size for the coarse digest.
pub const COARSE_CHUNK_SIZE: usize = 64 * 1024;

/// Options for the resolution pipeline.
#[derive(Debug, Clone, Copy)]
pub struct ResolveOptions {
    /// Digest algorithm for both passes.
    pub algorithm: HashAlgorithm,
    /// Enable the coarse pre-filter for large buckets.
    pub coarse_hashing: bool,
}

/// Resolve every bucket of `index` into duplicate groups.
///
/// The returned groups are unsorted; [`crate::report::DuplicateReport::new`]
/// normalizes their order.
pub fn resolve_duplicates(
    index: &SizeIndex,
    options: ResolveOptions,
    metrics: &ScanMetrics,
    status: &ScanStatus,
) -> Vec<DuplicateGroup> {
    for (size, records) in index.buckets() {
        metrics.files_to_hash.add(records.len() as u64);
        metrics.bytes_to_hash.add(records.len() as u64 * size);
    }
    metrics.log_snapshot();

    let mut groups = Vec::new();
    for (size, records) in index.buckets() {
        resolve_bucket(size, records, options, metrics, status, &mut groups);
    }
    groups
}

fn resolve_bucket(
    size: u64,
    records: &[FileRecord],
    options: ResolveOptions,
    metrics: &ScanMetrics,
    status: &ScanStatus,
    groups: &mut Vec<DuplicateGroup>,
) {
    let candidates: Vec<&FileRecord> =
        if options.coarse_hashing && size >= COARSE_MIN_FILE_SIZE {
            coarse_filter(records, options.algorithm)
        } else {
            records.iter().collect()
        };

    // Full pass: one task per candidate file.
    let hashed: Vec<(&FileRecord, Option<String>)> = candidates
        .par_iter()
        .map(|record| {
            let digest = match record.full_hash(options.algorithm) {
                Ok(digest) => Some(digest.to_string()),
                Err(err) => {
                    log::warn!("excluding file from duplicate consideration: {err}");
                    None
                }
            };
            metrics.files_hashed.inc();
            metrics.bytes_hashed.add(size);
            status.detail(|| {
                format!(
                    "{}/{} files, {}/{}",
                    metrics.files_hashed.value(),
                    metrics.files_to_hash.value(),
                    bytesize::ByteSize::b(metrics.bytes_hashed.value()),
                    bytesize::ByteSize::b(metrics.bytes_to_hash.value()),
                )
            });
            (*record, digest)
        })
        .collect();

    let mut by_hash: HashMap<String, Vec<PathBuf>> = HashMap::new();
    for (record, digest) in hashed {
        if let Some(digest) = digest {
            by_hash
                .entry(digest)
                .or_default()
                .push(record.path().to_path_buf());
        }
    }

    for (hash, files) in by_hash {
        if files.len() >= 2 {
            groups.push(DuplicateGroup::new(size, hash, files));
        }
    }
}

/// Coarse pass over one bucket: prune members that provably differ in their
/// leading bytes, keep everything else for the full pass.
fn coarse_filter(records: &[FileRecord], algorithm: HashAlgorithm) -> Vec<&FileRecord> {
    let coarse: Vec<(&FileRecord, Option<String>)> = records
        .par_iter()
        .map(|record| {
            (
                record,
                record
                    .coarse_hash(algorithm, COARSE_CHUNK_SIZE)
                    .map(str::to_owned),
            )
        })
        .collect();

    let mut by_coarse: HashMap<String, Vec<&FileRecord>> = HashMap::new();
    let mut keep: Vec<&FileRecord> = Vec::new();
    for (record, digest) in coarse {
        match digest {
            Some(digest) => by_coarse.entry(digest).or_default().push(record),
            // Failed coarse hash: stays in the running.
            None => keep.push(record),
        }
    }
    for (_, members) in by_coarse {
        if members.len() >= 2 {
            keep.extend(members);
        }
    }
    keep
}
