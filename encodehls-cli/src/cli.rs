// encodehls-cli/src/cli.rs
//
// Defines the command-line argument structures using clap.

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

// --- CLI Argument Definition ---

#[derive(Parser, Debug)]
#[command(
    author,
    version, // Reads from Cargo.toml via "cargo" feature in clap
    about = "encodehls: multi-bitrate HLS encoder",
    long_about = "Encodes source videos into an HLS bitrate ladder with ffmpeg and writes a master playlist per input."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Settings file (defaults: $ENCODEHLS_CONFIG, ./appsettings.json, next to the executable)
    #[arg(short, long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Show debug output on the console
    #[arg(short, long, global = true, default_value_t = false)]
    pub verbose: bool,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Encodes input videos into every configured profile
    Encode(EncodeArgs),
    /// Lists the configured encoding profiles
    Profiles,
}

#[derive(Args, Debug)]
pub struct EncodeArgs {
    /// Source video files
    #[arg(required = true, value_name = "INPUT")]
    pub inputs: Vec<PathBuf>,

    /// Directory where HLS output is written
    #[arg(short, long = "output", value_name = "OUTPUT_DIR", default_value = "hls_output")]
    pub output_dir: PathBuf,

    /// Optional: Directory for log files (defaults to OUTPUT_DIR/logs)
    #[arg(short, long, value_name = "LOG_DIR")]
    pub log_dir: Option<PathBuf>,

    /// Nest output under each input's base name even for a single input
    #[arg(long, default_value_t = false)]
    pub per_input_dirs: bool,

    /// Encode profiles one at a time instead of concurrently
    #[arg(long, default_value_t = false)]
    pub sequential: bool,

    /// Maximum number of profiles encoded at once
    #[arg(short, long, value_name = "N", value_parser = clap::value_parser!(u16).range(1..))]
    pub jobs: Option<u16>,

    /// Override the ffmpeg location (directory or binary)
    #[arg(long, value_name = "PATH")]
    pub ffmpeg_path: Option<PathBuf>,

    /// Override the ffmpeg video encoder (e.g. libx264, h264_nvenc)
    #[arg(long, value_name = "CODEC")]
    pub video_encoder: Option<String>,

    /// Print one JSON object per event instead of terminal output
    #[arg(long, default_value_t = false)]
    pub json_progress: bool,
}
