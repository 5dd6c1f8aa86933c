// encodehls-cli/src/lib.rs
//
// Library portion of the encodehls CLI application.
// Contains argument definitions and command logic.

pub mod cli;
pub mod commands;
pub mod config;
pub mod error;
pub mod logging;
pub mod signals;
pub mod terminal;

// Re-export items needed by the binary or integration tests
pub use cli::{Cli, Commands, EncodeArgs};
pub use commands::encode::run_encode;
pub use commands::profiles::run_profiles;
pub use error::{CliResult, EXIT_CANCELLED, EXIT_FAILURE, EXIT_SUCCESS};
