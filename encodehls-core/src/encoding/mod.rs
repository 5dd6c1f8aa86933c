//! Encoding orchestration for encodehls
//!
//! `layout` fixes where every file of a run is written, `job` runs a single
//! (input, profile) pair, and `orchestrator` fans jobs out per input and
//! writes each input's master playlist.

pub mod job;
pub mod layout;
pub mod orchestrator;

pub use job::{JobOutcome, JobStatus, run_profile_job};
pub use orchestrator::{EncodeRequest, InputStatus, InputSummary, encode_inputs};
