//! Process exit codes.

/// Exit codes for the dupescan binary.
///
/// - 0: scan completed and duplicates were found
/// - 1: the run failed with an error
/// - 2: scan completed and no duplicates were found
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExitCode {
    /// Scan completed, duplicates found.
    Success = 0,
    /// The run failed.
    GeneralError = 1,
    /// Scan completed, no duplicates found.
    NoDuplicates = 2,
}

impl ExitCode {
    /// Numeric exit code.
    #[must_use]
    pub fn as_i32(self) -> i32 {
        self as i32
    }
}
