// ============================================================================
// encodehls-cli/src/error.rs
// ============================================================================
//
// CLI ERROR HANDLING: Result type and process exit codes
//
// The CLI reuses the core error type; anything that reaches main is printed
// as a single `Error:` line and mapped to a non-zero exit status.

// ---- Internal crate imports ----
use encodehls_core::CoreResult;

/// Type alias for CLI results using CoreError.
pub type CliResult<T> = CoreResult<T>;

/// Every input produced a master playlist with at least one variant.
pub const EXIT_SUCCESS: i32 = 0;

/// A fatal error, or at least one input without a usable master playlist.
pub const EXIT_FAILURE: i32 = 1;

/// The run was interrupted by SIGINT or SIGTERM.
pub const EXIT_CANCELLED: i32 = 130;

