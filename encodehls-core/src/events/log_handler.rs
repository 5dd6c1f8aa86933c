//! Event handler that records a run in the log.
//!
//! Every event becomes one record under the `encodehls::events` target, which
//! the logging setup routes to the run log file only. Progress is logged at
//! 10% steps per job.

use super::{Event, EventHandler};
use crate::utils::{format_bitrate, format_duration, format_elapsed_secs};

use log::{error, info, warn};

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

/// Log target for event records.
pub const EVENT_LOG_TARGET: &str = "encodehls::events";

#[derive(Default)]
pub struct LogEventHandler {
    last_logged_step: Mutex<HashMap<(PathBuf, String), u8>>,
}

impl LogEventHandler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether this progress value crosses a new 10% step for its job.
    fn crosses_step(&self, input: &Path, profile: &str, percent: u8) -> bool {
        let step = (percent / 10) * 10;
        let Ok(mut steps) = self.last_logged_step.lock() else {
            return false;
        };
        let key = (input.to_path_buf(), profile.to_string());
        match steps.get(&key) {
            Some(&last) if last >= step => false,
            _ => {
                steps.insert(key, step);
                true
            }
        }
    }
}

impl EventHandler for LogEventHandler {
    fn handle(&self, event: &Event) {
        match event {
            Event::RunStarted {
                inputs,
                profiles,
                concurrency,
                output_dir,
            } => info!(
                target: EVENT_LOG_TARGET,
                "Run started: {inputs} input(s), {profiles} profile(s), {concurrency} jobs, output {}",
                output_dir.display()
            ),
            Event::InputStarted {
                input,
                index,
                total,
                output_root,
            } => info!(
                target: EVENT_LOG_TARGET,
                "Input {index}/{total}: {} -> {}",
                input.display(),
                output_root.display()
            ),
            Event::JobStarted {
                input,
                profile,
                bitrate,
                resolution,
            } => info!(
                target: EVENT_LOG_TARGET,
                "Starting {profile} ({} @ {}) for {}",
                resolution.as_deref().unwrap_or("source size"),
                format_bitrate(*bitrate),
                input.display()
            ),
            Event::JobProgress {
                input,
                profile,
                processed,
                total,
                percent,
            } => {
                if self.crosses_step(input, profile, *percent) {
                    info!(
                        target: EVENT_LOG_TARGET,
                        "{profile}: {percent}% complete ({} / {})",
                        format_duration(*processed),
                        format_duration(*total)
                    );
                }
            }
            Event::JobFinished {
                profile, elapsed, ..
            } => info!(
                target: EVENT_LOG_TARGET,
                "Finished {profile} in {} seconds",
                format_elapsed_secs(*elapsed)
            ),
            Event::JobFailed {
                profile,
                reason,
                elapsed,
                ..
            } => error!(
                target: EVENT_LOG_TARGET,
                "Profile {profile} failed after {} seconds: {reason}",
                format_elapsed_secs(*elapsed)
            ),
            Event::MasterPlaylistWritten { path, variants, .. } => info!(
                target: EVENT_LOG_TARGET,
                "Master playlist written with {variants} variant(s): {}",
                path.display()
            ),
            Event::InputFailed { input, reason } => error!(
                target: EVENT_LOG_TARGET,
                "Input {} failed: {reason}",
                input.display()
            ),
            Event::InputFinished {
                input,
                succeeded,
                failed,
                ..
            } => {
                if *failed > 0 {
                    warn!(
                        target: EVENT_LOG_TARGET,
                        "Input {} finished: {succeeded} succeeded, {failed} failed",
                        input.display()
                    );
                } else {
                    info!(
                        target: EVENT_LOG_TARGET,
                        "Input {} finished: {succeeded} succeeded",
                        input.display()
                    );
                }
            }
            Event::RunComplete {
                inputs,
                succeeded_inputs,
                cancelled,
                total_time,
            } => info!(
                target: EVENT_LOG_TARGET,
                "Run complete{}: {succeeded_inputs}/{inputs} input(s) succeeded in {}",
                if *cancelled { " (cancelled)" } else { "" },
                format_duration(*total_time)
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_progress_steps_are_logged_once() {
        let handler = LogEventHandler::new();
        let input = PathBuf::from("movie.mp4");

        assert!(handler.crosses_step(&input, "480p", 0));
        assert!(!handler.crosses_step(&input, "480p", 4));
        assert!(handler.crosses_step(&input, "480p", 12));
        assert!(!handler.crosses_step(&input, "480p", 19));
        assert!(handler.crosses_step(&input, "480p", 100));

        // Jobs are tracked independently
        assert!(handler.crosses_step(&input, "720p", 5));
        assert!(handler.crosses_step(Path::new("other.mp4"), "480p", 5));
    }
}
