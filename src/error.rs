//! Exit codes.

/// Exit codes for the dupsweep application.
///
/// - 0: Success (scan completed, whether or not duplicates were found)
/// - 1: General error (fatal traversal, hashing or configuration failure)
/// - 2: Usage error (reported by clap before anything runs)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExitCode {
    /// Success: Scan completed.
    Success = 0,
    /// General error: The run was aborted.
    GeneralError = 1,
    /// Usage: Invalid or missing command-line arguments.
    Usage = 2,
}

impl ExitCode {
    /// Get the numeric exit code.
    #[must_use]
    pub fn as_i32(self) -> i32 {
        self as i32
    }

    /// Get the machine-readable code prefix.
    #[must_use]
    pub fn code_prefix(self) -> &'static str {
        match self {
            Self::Success => "DS000",
            Self::GeneralError => "DS001",
            Self::Usage => "DS002",
        }
    }
}
