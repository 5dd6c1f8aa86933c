//! Implementation of the 'encode' subcommand.
//!
//! Validates the inputs, builds the run configuration, sets up the output and
//! log directories, then hands the inputs to the encodehls-core orchestrator
//! with the requested progress output attached.

use crate::cli::EncodeArgs;
use crate::config::{ConfigOverrides, load_config};
use crate::error::{CliResult, EXIT_CANCELLED, EXIT_FAILURE, EXIT_SUCCESS};
use crate::logging::{init_logging, run_log_path};
use crate::signals::spawn_signal_listener;
use crate::terminal::{TerminalEventHandler, print_error, print_status, print_subsection};

use encodehls_core::events::json_handler::JsonProgressHandler;
use encodehls_core::events::log_handler::LogEventHandler;
use encodehls_core::{
    CancellationToken, ConcurrencyMode, CoreError, EncodeRequest, EventDispatcher, InputStatus,
    InputSummary, OutputLayout, SidecarInvoker, check_dependency, encode_inputs,
    resolve_ffmpeg_executable,
};

use log::{debug, info, warn};

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Fails on the first input that is not an existing file.
pub fn validate_inputs(inputs: &[PathBuf]) -> CliResult<()> {
    match inputs.iter().find(|input| !input.is_file()) {
        Some(missing) => Err(CoreError::InputNotFound(missing.clone())),
        None => Ok(()),
    }
}

/// Maps the command-line flags onto config overrides.
pub fn overrides_from_args(args: &EncodeArgs) -> ConfigOverrides {
    ConfigOverrides {
        ffmpeg_path: args.ffmpeg_path.clone(),
        video_encoder: args.video_encoder.clone(),
        concurrency: args.sequential.then_some(ConcurrencyMode::Sequential),
        max_parallel_jobs: args.jobs.map(usize::from),
    }
}

/// Layout requested by the flags for this many inputs.
pub fn layout_for(args: &EncodeArgs) -> OutputLayout {
    if args.per_input_dirs {
        OutputLayout::PerInput
    } else {
        OutputLayout::for_input_count(args.inputs.len())
    }
}

fn create_dir(path: &Path, what: &str) -> CliResult<()> {
    fs::create_dir_all(path).map_err(|e| {
        CoreError::PathError(format!(
            "Failed to create {} directory '{}': {}",
            what,
            path.display(),
            e
        ))
    })
}

/// Process exit code for a finished run.
pub fn exit_code_for(summaries: &[InputSummary], cancelled: bool) -> i32 {
    if cancelled {
        EXIT_CANCELLED
    } else if summaries.iter().all(InputSummary::is_success) {
        EXIT_SUCCESS
    } else {
        EXIT_FAILURE
    }
}

/// Runs the encode command and returns the process exit code.
pub fn run_encode(args: EncodeArgs, config_path: Option<&Path>, verbose: bool) -> CliResult<i32> {
    validate_inputs(&args.inputs)?;

    let config = load_config(config_path, &overrides_from_args(&args))?;

    let log_dir = args
        .log_dir
        .clone()
        .unwrap_or_else(|| args.output_dir.join("logs"));
    create_dir(&args.output_dir, "output")?;
    create_dir(&log_dir, "log")?;

    let log_file = run_log_path(&log_dir);
    init_logging(verbose, Some(&log_file))?;
    info!("Run log: {}", log_file.display());

    let ffmpeg = resolve_ffmpeg_executable(config.ffmpeg_path.as_deref());
    check_dependency(&ffmpeg)?;

    let cancel = CancellationToken::new();
    if let Err(e) = spawn_signal_listener(cancel.clone()) {
        warn!("Signal handling unavailable: {}", e);
    }

    let mut events = EventDispatcher::new();
    if args.json_progress {
        events.add_handler(Arc::new(JsonProgressHandler::new()));
    } else {
        events.add_handler(Arc::new(TerminalEventHandler::new()));
    }
    events.add_handler(Arc::new(LogEventHandler::new()));

    let request = EncodeRequest::new(args.inputs.clone(), args.output_dir.clone())
        .with_layout(layout_for(&args));
    debug!("Encode request: {:?}", request);

    let invoker = SidecarInvoker::from_config(&config).with_cancellation(cancel.clone());
    let summaries = encode_inputs(&invoker, &config, &request, &events, &cancel)?;

    for summary in &summaries {
        match &summary.status {
            InputStatus::Completed { master_playlist } => info!(
                "{}: {} ({} variant(s), {} failed)",
                summary.input.display(),
                master_playlist.display(),
                summary.succeeded_variants(),
                summary.failed_variants()
            ),
            InputStatus::Failed(reason) => {
                warn!("{}: {}", summary.input.display(), reason);
            }
            InputStatus::Cancelled => warn!("{}: cancelled", summary.input.display()),
        }
    }
    if !args.json_progress {
        print_input_summaries(&summaries);
    }

    Ok(exit_code_for(&summaries, cancel.is_cancelled()))
}

/// Per-input result lines shown after the run summary.
fn print_input_summaries(summaries: &[InputSummary]) {
    for summary in summaries {
        print_subsection(&summary.input.display().to_string());
        print_status("Output", &summary.output_root.display().to_string());
        match &summary.status {
            InputStatus::Completed { master_playlist } => {
                print_status("Master playlist", &master_playlist.display().to_string());
                print_status(
                    "Variants",
                    &format!(
                        "{} succeeded, {} failed",
                        summary.succeeded_variants(),
                        summary.failed_variants()
                    ),
                );
            }
            InputStatus::Failed(reason) => print_error(reason),
            InputStatus::Cancelled => print_error("cancelled"),
        }
    }
}
