//! Concurrent multi-root directory walker.
//!
//! Each root path gets its own OS thread, and each thread owns an
//! independent accumulator ("shard") produced by a per-root factory, so
//! workers never contend on shared state while walking. The orchestrator
//! merges the shards once every worker has finished.
//!
//! Error policy: a walk failure does not abort the worker; the first error
//! is captured through a capacity-1 relay channel and returned after all
//! workers complete. When the relay buffer is already full the producer
//! logs the error and drops it rather than blocking, so a run with
//! simultaneous failures in several roots surfaces only one of them.

use std::io;
use std::path::{Path, PathBuf};

use crossbeam_channel::Sender;
use walkdir::WalkDir;

use super::ScanError;

/// A worker-local accumulator for discovered files.
///
/// One shard is created per root; it is exclusively owned and mutated by
/// that root's worker for the duration of the walk.
pub trait WalkShard: Send {
    /// Called once per regular file found under the shard's root.
    fn accept(&mut self, path: PathBuf, size: u64);
}

/// Walk every root in parallel, one worker per root.
///
/// `new_shard` is invoked once per root to create that worker's shard; the
/// shards are returned in root order once all workers have joined.
///
/// Fails fast with [`ScanError::NotADirectory`] before spawning any worker
/// if a root does not exist or is not a directory. Otherwise the first
/// captured walk error is returned after the walk completes; the shards of
/// a failed walk are discarded by the caller.
pub fn walk_roots<S, F>(roots: &[PathBuf], mut new_shard: F) -> Result<Vec<S>, ScanError>
where
    S: WalkShard,
    F: FnMut() -> S,
{
    for root in roots {
        if !root.is_dir() {
            return Err(ScanError::NotADirectory(root.clone()));
        }
    }

    let (err_tx, err_rx) = crossbeam_channel::bounded::<ScanError>(1);

    let mut shards = Vec::with_capacity(roots.len());
    std::thread::scope(|scope| {
        let mut workers = Vec::with_capacity(roots.len());
        for root in roots {
            let mut shard = new_shard();
            let err_tx = err_tx.clone();
            workers.push(scope.spawn(move || {
                walk_one_root(root, &mut shard, &err_tx);
                shard
            }));
        }
        for worker in workers {
            match worker.join() {
                Ok(shard) => shards.push(shard),
                Err(payload) => std::panic::resume_unwind(payload),
            }
        }
    });
    drop(err_tx);

    match err_rx.try_recv() {
        Ok(err) => Err(err),
        Err(_) => Ok(shards),
    }
}

/// Walk a single root, feeding regular files into `shard`.
///
/// Directories and non-regular entries (symlinks, devices) are filtered out
/// before the shard sees them. Errors are relayed and the walk continues,
/// so one unreadable subtree does not hide the rest of the root.
fn walk_one_root<S: WalkShard>(root: &Path, shard: &mut S, errors: &Sender<ScanError>) {
    for entry in WalkDir::new(root).follow_links(false) {
        match entry {
            Ok(entry) => {
                if !entry.file_type().is_file() {
                    continue;
                }
                match entry.metadata() {
                    Ok(meta) => shard.accept(entry.into_path(), meta.len()),
                    Err(e) => relay(errors, into_scan_error(e)),
                }
            }
            Err(e) => relay(errors, into_scan_error(e)),
        }
    }
}

/// Non-blocking error relay: first error wins, extras are logged and lost.
fn relay(errors: &Sender<ScanError>, err: ScanError) {
    if let Err(send_err) = errors.try_send(err) {
        log::warn!(
            "error relay is full, dropping walk error: {}",
            send_err.into_inner()
        );
    }
}

fn into_scan_error(err: walkdir::Error) -> ScanError {
    let path = err.path().map(Path::to_path_buf).unwrap_or_default();
    let source = err
        .into_io_error()
        .unwrap_or_else(|| io::Error::new(io::ErrorKind::Other, "file system loop"));
    ScanError::Walk { path, source }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;
    use std::fs;
    use tempfile::tempdir;

    #[derive(Debug, Default)]
    struct CollectShard {
        files: BTreeMap<PathBuf, u64>,
    }

    impl WalkShard for CollectShard {
        fn accept(&mut self, path: PathBuf, size: u64) {
            self.files.insert(path, size);
        }
    }

    #[test]
    fn test_walk_single_root_finds_regular_files() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join("a.txt"), b"aaa").unwrap();
        fs::create_dir(dir.path().join("sub")).unwrap();
        fs::write(dir.path().join("sub/b.txt"), b"bb").unwrap();

        let roots = vec![dir.path().to_path_buf()];
        let shards = walk_roots(&roots, CollectShard::default).unwrap();

        assert_eq!(shards.len(), 1);
        let files = &shards[0].files;
        assert_eq!(files.len(), 2);
        assert_eq!(files[&dir.path().join("a.txt")], 3);
        assert_eq!(files[&dir.path().join("sub/b.txt")], 2);
    }

    #[test]
    fn test_walk_one_shard_per_root() {
        let one = tempdir().unwrap();
        let two = tempdir().unwrap();
        fs::write(one.path().join("x"), b"x").unwrap();
        fs::write(two.path().join("y"), b"yy").unwrap();
        fs::write(two.path().join("z"), b"zzz").unwrap();

        let roots = vec![one.path().to_path_buf(), two.path().to_path_buf()];
        let shards = walk_roots(&roots, CollectShard::default).unwrap();

        assert_eq!(shards.len(), 2);
        let total: usize = shards.iter().map(|s| s.files.len()).sum();
        assert_eq!(total, 3);
    }

    #[test]
    fn test_walk_rejects_missing_root_before_spawning() {
        let dir = tempdir().unwrap();
        let missing = dir.path().join("missing");
        let roots = vec![missing.clone()];

        let err = walk_roots(&roots, CollectShard::default).unwrap_err();
        assert!(matches!(err, ScanError::NotADirectory(p) if p == missing));
    }

    #[test]
    fn test_walk_rejects_file_as_root() {
        let dir = tempdir().unwrap();
        let file = dir.path().join("plain");
        fs::write(&file, b"not a dir").unwrap();

        let err = walk_roots(&[file], CollectShard::default).unwrap_err();
        assert!(matches!(err, ScanError::NotADirectory(_)));
    }

    #[cfg(unix)]
    #[test]
    fn test_walk_error_captured_but_walk_completes() {
        use std::os::unix::fs::PermissionsExt;

        let dir = tempdir().unwrap();
        fs::write(dir.path().join("readable"), b"ok").unwrap();
        let locked = dir.path().join("locked");
        fs::create_dir(&locked).unwrap();
        fs::write(locked.join("hidden"), b"nope").unwrap();
        fs::set_permissions(&locked, fs::Permissions::from_mode(0o000)).unwrap();

        let roots = vec![dir.path().to_path_buf()];
        let result = walk_roots(&roots, CollectShard::default);
        fs::set_permissions(&locked, fs::Permissions::from_mode(0o755)).unwrap();

        // The unreadable directory surfaces as the run's walk error.
        assert!(matches!(result, Err(ScanError::Walk { .. })));
    }

    #[cfg(unix)]
    #[test]
    fn test_simultaneous_walk_errors_yield_single_error() {
        use std::os::unix::fs::PermissionsExt;

        let one = tempdir().unwrap();
        let two = tempdir().unwrap();
        let mut locked = Vec::new();
        for root in [one.path(), two.path()] {
            fs::write(root.join("readable"), b"ok").unwrap();
            let dir = root.join("locked");
            fs::create_dir(&dir).unwrap();
            fs::write(dir.join("hidden"), b"nope").unwrap();
            fs::set_permissions(&dir, fs::Permissions::from_mode(0o000)).unwrap();
            locked.push(dir);
        }

        // Both workers fail. The capacity-1 relay keeps the first error and
        // drops the other; the losing worker must not block on the send, so
        // the call returns instead of hanging.
        let roots = vec![one.path().to_path_buf(), two.path().to_path_buf()];
        let result = walk_roots(&roots, CollectShard::default);
        for dir in &locked {
            fs::set_permissions(dir, fs::Permissions::from_mode(0o755)).unwrap();
        }
        assert!(matches!(result, Err(ScanError::Walk { .. })));
    }

    #[test]
    fn test_symlinks_are_not_reported() {
        #[cfg(unix)]
        {
            let dir = tempdir().unwrap();
            fs::write(dir.path().join("target"), b"data").unwrap();
            std::os::unix::fs::symlink(dir.path().join("target"), dir.path().join("link"))
                .unwrap();

            let roots = vec![dir.path().to_path_buf()];
            let shards = walk_roots(&roots, CollectShard::default).unwrap();
            assert_eq!(shards[0].files.len(), 1);
            assert!(shards[0].files.contains_key(&dir.path().join("target")));
        }
    }
}
