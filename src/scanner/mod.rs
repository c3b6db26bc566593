//! Scanner module for directory traversal and file hashing.
//!
//! The scanner is divided into submodules:
//! - [`walker`]: concurrent multi-root directory traversal
//! - [`hasher`]: streaming content hashing (full-file and coarse)

pub mod hasher;
pub mod walker;

use std::io;
use std::path::PathBuf;

pub use hasher::{coarse_hash_file, hash_file, HashAlgorithm};
pub use walker::{walk_roots, WalkShard};

/// Errors that can occur during directory scanning.
///
/// Root validation failures abort the run before any worker is spawned;
/// walk failures inside a root are captured first-one-wins and surfaced
/// after every worker has finished.
#[derive(thiserror::Error, Debug)]
pub enum ScanError {
    /// The supplied root does not exist or is not a directory.
    #[error("{} is not a directory", .0.display())]
    NotADirectory(PathBuf),

    /// A traversal failure inside one root.
    #[error("walk failed at {}: {source}", path.display())]
    Walk {
        /// Path where the traversal failed
        path: PathBuf,
        /// The underlying I/O error
        #[source]
        source: io::Error,
    },
}

/// Errors that can occur during file hashing.
#[derive(thiserror::Error, Debug)]
pub enum HashError {
    /// The requested algorithm name is not in the registry.
    /// Raised before any I/O happens.
    #[error("hash algorithm {0:?} is not supported")]
    UnsupportedAlgorithm(String),

    /// The file holds fewer bytes than the requested coarse chunk.
    /// Such a file should go directly to full hashing.
    #[error("{}: file is shorter than the {chunk_size} byte coarse chunk", path.display())]
    TooSmallForCoarse {
        /// Path of the file that was too small
        path: PathBuf,
        /// Requested leading-chunk size in bytes
        chunk_size: usize,
    },

    /// An I/O error occurred while opening or reading the file.
    /// Terminal for that file; never retried within a run.
    #[error("cannot hash {}: {source}", path.display())]
    Io {
        /// Path where the error occurred
        path: PathBuf,
        /// The underlying I/O error
        #[source]
        source: io::Error,
    },
}
