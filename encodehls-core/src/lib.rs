//! Core library for adaptive-bitrate HLS encoding.
//!
//! Takes one or more source videos and a ladder of encoding profiles, runs an
//! external encoder once per (input, profile) pair, and writes a master
//! playlist per input that references every rendition that succeeded.
//!
//! ## Usage Example
//!
//! ```rust,no_run
//! use encodehls_core::config::AppSettings;
//! use encodehls_core::{
//!     CancellationToken, EncodeRequest, EventDispatcher, SidecarInvoker, encode_inputs,
//! };
//! use std::path::{Path, PathBuf};
//!
//! let config = AppSettings::from_file(Path::new("appsettings.json"))
//!     .unwrap()
//!     .into_builder()
//!     .build()
//!     .unwrap();
//!
//! let cancel = CancellationToken::new();
//! let invoker = SidecarInvoker::from_config(&config).with_cancellation(cancel.clone());
//! let request = EncodeRequest::new(vec![PathBuf::from("movie.mp4")], "hls_output");
//!
//! let summaries =
//!     encode_inputs(&invoker, &config, &request, &EventDispatcher::new(), &cancel).unwrap();
//! for summary in &summaries {
//!     println!("{}: {:?}", summary.input.display(), summary.master_playlist());
//! }
//! ```

pub mod cancellation;
pub mod config;
pub mod encoding;
pub mod error;
pub mod events;
pub mod external;
pub mod logging;
pub mod playlist;
pub mod profile;
pub mod utils;

// Re-exports for public API
pub use cancellation::CancellationToken;
pub use config::{ConcurrencyMode, CoreConfig, CoreConfigBuilder, OutputLayout};
pub use encoding::{
    EncodeRequest, InputStatus, InputSummary, JobOutcome, JobStatus, encode_inputs,
};
pub use error::{CoreError, CoreResult};
pub use events::{Event, EventDispatcher, EventHandler};
pub use external::{
    ProgressUpdate, SidecarInvoker, TranscodeInvoker, TranscodeRequest, check_dependency,
    resolve_ffmpeg_executable,
};
pub use playlist::{MASTER_PLAYLIST_NAME, assemble_master_playlist, write_master_playlist};
pub use profile::{EncodingProfile, ProfileCatalog};
pub use utils::{format_bitrate, format_duration, format_elapsed_secs, parse_ffmpeg_time};
