// ============================================================================
// encodehls-cli/src/logging.rs
// ============================================================================
//
// LOGGING UTILITIES: Run log naming and logger installation
//
// Every encode run writes its own log file named after the start time. The
// console shows warnings and errors (debug with --verbose); the file gets
// everything, including per-event records.

use encodehls_core::CoreError;
use encodehls_core::logging::setup_logging;

use log::LevelFilter;

use std::path::{Path, PathBuf};

/// Returns the current local timestamp formatted as "YYYYMMDD_HHMMSS".
pub fn get_timestamp() -> String {
    chrono::Local::now().format("%Y%m%d_%H%M%S").to_string()
}

/// Path of a new run log inside `log_dir`.
pub fn run_log_path(log_dir: &Path) -> PathBuf {
    log_dir.join(format!("encodehls_run_{}.log", get_timestamp()))
}

/// Console level for the requested verbosity.
pub fn console_level(verbose: bool) -> LevelFilter {
    if verbose {
        LevelFilter::Debug
    } else {
        LevelFilter::Warn
    }
}

/// Installs the global logger, optionally with a run log file.
pub fn init_logging(verbose: bool, log_file: Option<&Path>) -> Result<(), CoreError> {
    setup_logging(console_level(verbose), log_file)
        .map_err(|e| CoreError::Config(format!("Failed to set up logging: {e:#}")))
}
