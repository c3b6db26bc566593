//! Streaming file hashing with a pluggable algorithm registry.
//!
//! Algorithm names are matched case-insensitively with hyphens ignored, so
//! `SHA-256` and `sha256` select the same digest. The registry offers one
//! fast non-cryptographic checksum (`xxh64`, the default) and several
//! cryptographic digests (`blake3`, `sha224`, `sha256`, `sha384`, `sha512`).
//!
//! Files are read exactly once, streamed through the digest in fixed-size
//! chunks; the whole content is never held in a single buffer. All digests
//! are emitted as lowercase hex.

use std::fmt::Write as _;
use std::fs::File;
use std::hash::Hasher as _;
use std::io::{ErrorKind, Read};
use std::path::Path;

use sha2::{Digest, Sha224, Sha256, Sha384, Sha512};
use twox_hash::XxHash64;

use super::HashError;

/// Buffer size for streaming reads.
pub const STREAM_CHUNK_SIZE: usize = 64 * 1024;

/// A content hash algorithm from the registry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HashAlgorithm {
    /// XxHash64 - fast non-cryptographic checksum, the default.
    Xx64,
    /// BLAKE3 cryptographic hash.
    Blake3,
    /// SHA-224.
    Sha224,
    /// SHA-256.
    Sha256,
    /// SHA-384.
    Sha384,
    /// SHA-512.
    Sha512,
}

impl HashAlgorithm {
    /// Look up an algorithm by name.
    ///
    /// Matching is case-insensitive and ignores hyphens. An unrecognized
    /// name fails with [`HashError::UnsupportedAlgorithm`] before any I/O
    /// occurs.
    pub fn parse(name: &str) -> Result<Self, HashError> {
        match name.to_ascii_lowercase().replace('-', "").as_str() {
            "xxh64" | "xx64" | "xxhash64" => Ok(Self::Xx64),
            "blake3" => Ok(Self::Blake3),
            "sha224" => Ok(Self::Sha224),
            "sha256" => Ok(Self::Sha256),
            "sha384" => Ok(Self::Sha384),
            "sha512" => Ok(Self::Sha512),
            _ => Err(HashError::UnsupportedAlgorithm(name.to_string())),
        }
    }

    /// Canonical name of the algorithm.
    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            Self::Xx64 => "xxh64",
            Self::Blake3 => "blake3",
            Self::Sha224 => "sha224",
            Self::Sha256 => "sha256",
            Self::Sha384 => "sha384",
            Self::Sha512 => "sha512",
        }
    }
}

impl Default for HashAlgorithm {
    fn default() -> Self {
        Self::Xx64
    }
}

impl std::fmt::Display for HashAlgorithm {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// In-progress digest state for one file.
enum DigestState {
    Xx64(XxHash64),
    Blake3(Box<blake3::Hasher>),
    Sha224(Sha224),
    Sha256(Sha256),
    Sha384(Sha384),
    Sha512(Sha512),
}

impl DigestState {
    fn new(algorithm: HashAlgorithm) -> Self {
        match algorithm {
            HashAlgorithm::Xx64 => Self::Xx64(XxHash64::with_seed(0)),
            HashAlgorithm::Blake3 => Self::Blake3(Box::new(blake3::Hasher::new())),
            HashAlgorithm::Sha224 => Self::Sha224(Sha224::new()),
            HashAlgorithm::Sha256 => Self::Sha256(Sha256::new()),
            HashAlgorithm::Sha384 => Self::Sha384(Sha384::new()),
            HashAlgorithm::Sha512 => Self::Sha512(Sha512::new()),
        }
    }

    fn update(&mut self, data: &[u8]) {
        match self {
            Self::Xx64(h) => h.write(data),
            Self::Blake3(h) => {
                h.update(data);
            }
            Self::Sha224(h) => h.update(data),
            Self::Sha256(h) => h.update(data),
            Self::Sha384(h) => h.update(data),
            Self::Sha512(h) => h.update(data),
        }
    }

    fn finalize(self) -> String {
        match self {
            Self::Xx64(h) => format!("{:016x}", h.finish()),
            Self::Blake3(h) => h.finalize().to_hex().to_string(),
            Self::Sha224(h) => to_hex(&h.finalize()),
            Self::Sha256(h) => to_hex(&h.finalize()),
            Self::Sha384(h) => to_hex(&h.finalize()),
            Self::Sha512(h) => to_hex(&h.finalize()),
        }
    }
}

/// Lowercase hex rendering of a digest.
fn to_hex(bytes: &[u8]) -> String {
    let mut out = String::with_capacity(bytes.len() * 2);
    for b in bytes {
        // Writing to a String cannot fail.
        let _ = write!(out, "{b:02x}");
    }
    out
}

/// Compute the full-content digest of a file.
///
/// Streams the file once through the hash function. Open/read failures wrap
/// the path in [`HashError::Io`]; they are a per-file terminal condition
/// and are never retried.
pub fn hash_file(path: &Path, algorithm: HashAlgorithm) -> Result<String, HashError> {
    let mut file = open(path)?;
    let mut state = DigestState::new(algorithm);
    let mut buf = vec![0u8; STREAM_CHUNK_SIZE];
    loop {
        let n = file.read(&mut buf).map_err(|source| HashError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        if n == 0 {
            break;
        }
        state.update(&buf[..n]);
    }
    Ok(state.finalize())
}

/// Compute a coarse digest over the first `chunk_size` bytes of a file.
///
/// Fails with [`HashError::TooSmallForCoarse`] if the file holds fewer
/// bytes than requested; such a file gains nothing from coarse filtering
/// and should be full-hashed instead.
///
/// This is an inequality prover only: two files with different coarse
/// digests are guaranteed to differ within their first `chunk_size` bytes
/// and therefore cannot be full duplicates. It never proves equality.
pub fn coarse_hash_file(
    path: &Path,
    algorithm: HashAlgorithm,
    chunk_size: usize,
) -> Result<String, HashError> {
    let mut file = open(path)?;
    let mut buf = vec![0u8; chunk_size];
    match file.read_exact(&mut buf) {
        Ok(()) => {}
        Err(e) if e.kind() == ErrorKind::UnexpectedEof => {
            return Err(HashError::TooSmallForCoarse {
                path: path.to_path_buf(),
                chunk_size,
            });
        }
        Err(source) => {
            return Err(HashError::Io {
                path: path.to_path_buf(),
                source,
            });
        }
    }
    let mut state = DigestState::new(algorithm);
    state.update(&buf);
    Ok(state.finalize())
}

fn open(path: &Path) -> Result<File, HashError> {
    File::open(path).map_err(|source| HashError::Io {
        path: path.to_path_buf(),
        source,
    })
}
