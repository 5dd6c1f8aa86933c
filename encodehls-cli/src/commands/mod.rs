//! Command implementations for the CLI.
//!
//! Each submodule contains the implementation of a specific command.

/// The `encode` command: runs the profile ladder over every input.
pub mod encode;

/// The `profiles` command: prints the configured ladder.
pub mod profiles;
