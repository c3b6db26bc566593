//! Command-line interface definitions.
//!
//! ```bash
//! # Scan two trees and print a text report
//! dupescan /data/photos /backup/photos
//!
//! # CSV report, files of 1 MiB and larger, cryptographic digest
//! dupescan --min-size 1MiB --hash sha256 --output dupes.csv /data
//!
//! # Disable the coarse pre-filter for large files
//! dupescan --coarse-hash false /data
//! ```

use std::path::PathBuf;
use std::time::Duration;

use clap::Parser;

use crate::engine::ScanParams;

/// Find duplicate files in one or more directory trees.
///
/// Files are bucketed by exact size, large candidates are pre-filtered with
/// a cheap leading-chunk hash, and duplicates are confirmed with a full
/// content hash.
#[derive(Debug, Parser)]
#[command(name = "dupescan")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Directories to scan for duplicate files
    #[arg(value_name = "PATH", required = true)]
    pub paths: Vec<PathBuf>,

    /// Minimum file size to consider (e.g. 4KiB, 1MB)
    ///
    /// Supports suffixes: B, KB, KiB, MB, MiB, GB, GiB, TB, TiB.
    /// Files of exactly this size are included; zero-byte files never are.
    #[arg(long, value_name = "SIZE", value_parser = parse_size, default_value = "1")]
    pub min_size: u64,

    /// Hash algorithm used to compare candidate files
    ///
    /// One of: xxh64, blake3, sha224, sha256, sha384, sha512.
    #[arg(long, value_name = "NAME", default_value = "xxh64")]
    pub hash: String,

    /// Pre-filter large same-size files with a cheap leading-chunk hash
    #[arg(
        long,
        value_name = "BOOL",
        default_value_t = true,
        action = clap::ArgAction::Set
    )]
    pub coarse_hash: bool,

    /// Report file; format chosen by extension (.csv, .html, else text).
    /// Omit to print a text report to stdout.
    #[arg(short, long, value_name = "FILE")]
    pub output: Option<PathBuf>,

    /// Overwrite the report file if it already exists
    #[arg(
        long,
        value_name = "BOOL",
        default_value_t = true,
        action = clap::ArgAction::Set
    )]
    pub overwrite: bool,

    /// Seconds between status line updates
    #[arg(long, value_name = "SECONDS", default_value_t = 5)]
    pub status_interval: u64,

    /// Increase verbosity (-v for debug, -vv for trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Suppress progress output and all logging except errors
    #[arg(short, long, conflicts_with = "verbose")]
    pub quiet: bool,
}

impl Cli {
    /// Convert parsed flags into engine parameters.
    #[must_use]
    pub fn to_params(&self) -> ScanParams {
        ScanParams {
            roots: self.paths.clone(),
            min_size: self.min_size,
            hash_algorithm: self.hash.clone(),
            coarse_hashing: self.coarse_hash,
            status_interval: Duration::from_secs(self.status_interval),
            report_file: self.output.clone(),
            overwrite: self.overwrite,
            verbose: self.verbose > 0,
            quiet: self.quiet,
        }
    }
}

/// Parse a human-readable size string into bytes.
pub fn parse_size(s: &str) -> Result<u64, String> {
    let s = s.trim();
    if s.is_empty() {
        return Err("size cannot be empty".to_string());
    }

    let (num_str, suffix) = match s.find(|c: char| !c.is_ascii_digit() && c != '.') {
        Some(idx) => (&s[..idx], s[idx..].trim().to_uppercase()),
        None => (s, String::new()),
    };

    let num: f64 = num_str
        .parse()
        .map_err(|_| format!("invalid number: {num_str:?}"))?;
    if num < 0.0 {
        return Err("size cannot be negative".to_string());
    }

    let multiplier: u64 = match suffix.as_str() {
        "" | "B" => 1,
        "KB" | "K" => 1_000,
        "KIB" => 1_024,
        "MB" | "M" => 1_000_000,
        "MIB" => 1_048_576,
        "GB" | "G" => 1_000_000_000,
        "GIB" => 1_073_741_824,
        "TB" | "T" => 1_000_000_000_000,
        "TIB" => 1_099_511_627_776,
        _ => return Err(format!("unknown size suffix: {suffix:?}")),
    };

    Ok((num * multiplier as f64) as u64)
}
