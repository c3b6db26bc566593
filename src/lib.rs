//! dupescan - concurrent duplicate file scanner.
//!
//! Locates duplicate files across one or more directory trees by bucketing
//! files on exact size, optionally pre-filtering large candidates with a
//! cheap leading-chunk hash, and confirming duplicates with a full content
//! hash. The final report groups files by `(size, hash)` and can be rendered
//! as plain text, CSV, or HTML.

pub mod cli;
pub mod engine;
pub mod error;
pub mod index;
pub mod logging;
pub mod metrics;
pub mod output;
pub mod report;
pub mod resolve;
pub mod scanner;
pub mod status;
