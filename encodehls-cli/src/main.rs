// encodehls-cli/src/main.rs
//
// Entry point for the encodehls binary: parses arguments, dispatches to the
// command implementations and turns their result into a process exit code.

use clap::Parser;
use encodehls_cli::terminal::print_error;
use encodehls_cli::{Cli, Commands, EXIT_FAILURE, EXIT_SUCCESS, run_encode, run_profiles};

use std::process;

fn main() {
    let cli = Cli::parse();
    let config = cli.config.as_deref();

    let result = match cli.command {
        Commands::Encode(args) => run_encode(args, config, cli.verbose),
        Commands::Profiles => run_profiles(config).map(|()| EXIT_SUCCESS),
    };

    let code = match result {
        Ok(code) => code,
        Err(e) => {
            log::error!("{e}");
            print_error(&format!("Error: {e}"));
            EXIT_FAILURE
        }
    };
    process::exit(code);
}
