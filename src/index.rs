//! Size-bucket index and per-file hash caching.
//!
//! Files are bucketed by exact byte size during the walk; a bucket with a
//! single member can never hold a duplicate and is pruned before hashing.
//! Each walker worker fills its own [`SizeIndex`] shard, and the shards are
//! merged into one index - an ownership move, not a copy - once the walk
//! finishes.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;

use crate::scanner::{coarse_hash_file, hash_file, HashAlgorithm, HashError};

/// One regular file discovered during the walk.
///
/// Hashes are computed lazily and exactly once: the coarse and full digest
/// slots are `OnceLock`s, so a digest (or the error that prevented it) is
/// memoized after the first computation and shared by later callers.
#[derive(Debug)]
pub struct FileRecord {
    path: PathBuf,
    size: u64,
    coarse: OnceLock<Option<String>>,
    full: OnceLock<Result<String, HashError>>,
}

impl FileRecord {
    /// Create a record for a discovered file.
    #[must_use]
    pub fn new(path: PathBuf, size: u64) -> Self {
        Self {
            path,
            size,
            coarse: OnceLock::new(),
            full: OnceLock::new(),
        }
    }

    /// Path of the file.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Size of the file in bytes.
    #[must_use]
    pub fn size(&self) -> u64 {
        self.size
    }

    /// Coarse digest over the leading `chunk_size` bytes, computed once.
    ///
    /// Returns `None` when the digest could not be computed (short file or
    /// I/O failure). A `None` must keep the file in consideration for full
    /// hashing - a failed coarse hash never proves anything.
    pub fn coarse_hash(&self, algorithm: HashAlgorithm, chunk_size: usize) -> Option<&str> {
        self.coarse
            .get_or_init(|| match coarse_hash_file(&self.path, algorithm, chunk_size) {
                Ok(digest) => Some(digest),
                Err(err) => {
                    log::warn!("coarse hash unavailable, keeping for full pass: {err}");
                    None
                }
            })
            .as_deref()
    }

    /// The memoized failure from a full-hash attempt, if there was one.
    ///
    /// Returns `None` when the hash succeeded or was never attempted.
    #[must_use]
    pub fn cached_hash_error(&self) -> Option<&HashError> {
        match self.full.get() {
            Some(Err(err)) => Some(err),
            _ => None,
        }
    }

    /// Full-content digest, computed once.
    ///
    /// A failure is memoized as the record's terminal state; the file is
    /// excluded from duplicate consideration but the error never escalates
    /// past this record.
    pub fn full_hash(&self, algorithm: HashAlgorithm) -> Result<&str, &HashError> {
        self.full
            .get_or_init(|| hash_file(&self.path, algorithm))
            .as_deref()
    }
}

/// Counts produced by [`SizeIndex::prune`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PruneStats {
    /// Buckets dropped because they had a single member.
    pub dropped_buckets: usize,
    /// Buckets surviving with 2 or more members.
    pub candidate_buckets: usize,
    /// Files remaining in surviving buckets.
    pub candidate_files: usize,
}

/// Files grouped by exact byte size.
///
/// Used both as a per-worker shard during the walk (single-writer, no
/// locking needed) and, after [`SizeIndex::merge_from`], as the single
/// unsharded index the hashing phase consumes.
#[derive(Debug, Default)]
pub struct SizeIndex {
    buckets: HashMap<u64, Vec<FileRecord>>,
}

impl SizeIndex {
    /// Create an empty index.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a file into the bucket for its size, creating it if absent.
    pub fn accept(&mut self, path: PathBuf, size: u64) {
        self.buckets
            .entry(size)
            .or_default()
            .push(FileRecord::new(path, size));
    }

    /// Move another shard's buckets into this index.
    ///
    /// Called once per shard, single-threaded, after all walkers finish;
    /// the source shard is consumed.
    pub fn merge_from(&mut self, other: SizeIndex) {
        for (size, mut records) in other.buckets {
            self.buckets.entry(size).or_default().append(&mut records);
        }
    }

    /// Drop every bucket with fewer than two members.
    pub fn prune(&mut self) -> PruneStats {
        let before = self.buckets.len();
        self.buckets.retain(|_, records| records.len() >= 2);
        PruneStats {
            dropped_buckets: before - self.buckets.len(),
            candidate_buckets: self.buckets.len(),
            candidate_files: self.buckets.values().map(Vec::len).sum(),
        }
    }

    /// Iterate over buckets as `(size, members)`.
    pub fn buckets(&self) -> impl Iterator<Item = (u64, &[FileRecord])> {
        self.buckets
            .iter()
            .map(|(size, records)| (*size, records.as_slice()))
    }

    /// Number of buckets.
    #[must_use]
    pub fn len(&self) -> usize {
        self.buckets.len()
    }

    /// True when the index holds no buckets.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.buckets.is_empty()
    }

    /// Total number of files across all buckets.
    #[must_use]
    pub fn file_count(&self) -> usize {
        self.buckets.values().map(Vec::len).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn test_accept_buckets_by_size() {
        let mut index = SizeIndex::new();
        index.accept(PathBuf::from("/a"), 10);
        index.accept(PathBuf::from("/b"), 10);
        index.accept(PathBuf::from("/c"), 20);

        assert_eq!(index.len(), 2);
        assert_eq!(index.file_count(), 3);
    }

    #[test]
    fn test_prune_drops_singleton_buckets() {
        let mut index = SizeIndex::new();
        index.accept(PathBuf::from("/a"), 10);
        index.accept(PathBuf::from("/b"), 10);
        index.accept(PathBuf::from("/c"), 20);

        let stats = index.prune();
        assert_eq!(stats.dropped_buckets, 1);
        assert_eq!(stats.candidate_buckets, 1);
        assert_eq!(stats.candidate_files, 2);
        assert_eq!(index.len(), 1);
    }

    #[test]
    fn test_merge_from_concatenates_buckets() {
        let mut left = SizeIndex::new();
        left.accept(PathBuf::from("/a"), 10);
        let mut right = SizeIndex::new();
        right.accept(PathBuf::from("/b"), 10);
        right.accept(PathBuf::from("/c"), 30);

        left.merge_from(right);
        assert_eq!(left.len(), 2);
        assert_eq!(left.file_count(), 3);

        let ten: Vec<_> = left
            .buckets()
            .find(|(size, _)| *size == 10)
            .map(|(_, records)| records.iter().map(|r| r.path().to_path_buf()).collect())
            .unwrap();
        assert_eq!(ten.len(), 2);
    }

    #[test]
    fn test_full_hash_is_memoized() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("f");
        fs::write(&path, b"stable").unwrap();

        let record = FileRecord::new(path.clone(), 6);
        let first = record.full_hash(HashAlgorithm::Xx64).unwrap().to_string();

        // Changing the file after the first hash must not change the cached digest.
        fs::write(&path, b"mutated contents").unwrap();
        let second = record.full_hash(HashAlgorithm::Xx64).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_full_hash_error_is_terminal() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("ghost");

        let record = FileRecord::new(path.clone(), 4);
        assert!(record.full_hash(HashAlgorithm::Xx64).is_err());

        // Creating the file later does not resurrect the record within a run.
        fs::write(&path, b"late").unwrap();
        assert!(record.full_hash(HashAlgorithm::Xx64).is_err());
    }

    #[test]
    fn test_cached_hash_error_tracks_full_hash_outcome() {
        let dir = tempdir().unwrap();
        let ok_path = dir.path().join("present");
        fs::write(&ok_path, b"data").unwrap();

        let ok = FileRecord::new(ok_path, 4);
        let missing = FileRecord::new(dir.path().join("ghost"), 4);

        // No attempt yet on either record.
        assert!(ok.cached_hash_error().is_none());
        assert!(missing.cached_hash_error().is_none());

        ok.full_hash(HashAlgorithm::Xx64).unwrap();
        missing.full_hash(HashAlgorithm::Xx64).unwrap_err();

        assert!(ok.cached_hash_error().is_none());
        assert!(matches!(
            missing.cached_hash_error(),
            Some(HashError::Io { .. })
        ));
    }

    #[test]
    fn test_coarse_hash_failure_yields_none() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("short");
        fs::write(&path, b"ab").unwrap();

        let record = FileRecord::new(path, 2);
        assert!(record.coarse_hash(HashAlgorithm::Xx64, 1024).is_none());
    }
}
