//! ffmpeg event handling for one rendition
//!
//! Translates the event stream of a running ffmpeg process into
//! [`ProgressUpdate`]s, routes ffmpeg's own log lines to the `ffmpeg_log`
//! target, and keeps the error output needed to explain a failed run.

use super::ProgressUpdate;
use crate::utils::parse_ffmpeg_time;

use ffmpeg_sidecar::event::{FfmpegEvent, FfmpegProgress, LogLevel as FfmpegLogLevel};

use std::collections::VecDeque;
use std::time::Duration;

/// Error lines retained for a failure report.
const STDERR_TAIL_LINES: usize = 20;

/// Handler for the events of one ffmpeg invocation
pub struct FfmpegProgressHandler {
    variant: String,
    total: Option<Duration>,
    stderr_tail: VecDeque<String>,
}

impl FfmpegProgressHandler {
    /// Creates a handler for the rendition named `variant`.
    #[must_use]
    pub fn new(variant: impl Into<String>) -> Self {
        Self {
            variant: variant.into(),
            total: None,
            stderr_tail: VecDeque::with_capacity(STDERR_TAIL_LINES),
        }
    }

    /// Handles one event, returning a progress update when the event carries one.
    ///
    /// Updates are only produced once the input duration is known; before
    /// that a percentage cannot be computed.
    pub fn handle_event(&mut self, event: &FfmpegEvent) -> Option<ProgressUpdate> {
        match event {
            FfmpegEvent::ParsedDuration(parsed) if parsed.input_index == 0 => {
                self.total = Duration::try_from_secs_f64(parsed.duration).ok();
                log::debug!(
                    target: "ffmpeg_log",
                    "[{}] input duration: {:.2}s",
                    self.variant,
                    parsed.duration
                );
                None
            }
            FfmpegEvent::Progress(progress) => self.handle_progress(progress),
            FfmpegEvent::Log(level, message) => {
                self.handle_log(level, message);
                None
            }
            FfmpegEvent::Error(error) => {
                self.handle_error(error);
                None
            }
            _ => None,
        }
    }

    /// Total input duration, once ffmpeg has reported it.
    #[must_use]
    pub fn total_duration(&self) -> Option<Duration> {
        self.total
    }

    /// The retained error output, oldest line first.
    #[must_use]
    pub fn stderr_summary(&self) -> String {
        self.stderr_tail
            .iter()
            .map(String::as_str)
            .collect::<Vec<_>>()
            .join("\n")
    }

    fn handle_progress(&mut self, progress: &FfmpegProgress) -> Option<ProgressUpdate> {
        let total = self.total.filter(|t| !t.is_zero())?;
        let processed = parse_ffmpeg_time(&progress.time)?;
        Some(ProgressUpdate::new(processed.min(total), total))
    }

    fn handle_log(&mut self, level: &FfmpegLogLevel, message: &str) {
        let log_level = map_ffmpeg_log_level(level);
        match log_level {
            log::Level::Error => {
                log::debug!(target: "ffmpeg_log", "[{}] {message}", self.variant);
                self.remember(message);
            }
            log::Level::Info => log::trace!(target: "ffmpeg_log", "[{}] {message}", self.variant),
            _ => log::debug!(target: "ffmpeg_log", "[{}] {message}", self.variant),
        }
    }

    fn handle_error(&mut self, error: &str) {
        if is_non_critical_ffmpeg_error(error) {
            log::debug!(target: "ffmpeg_log", "[{}] ffmpeg non-critical message: {error}", self.variant);
            return;
        }
        log::debug!(target: "ffmpeg_log", "[{}] ffmpeg error: {error}", self.variant);
        self.remember(error);
    }

    fn remember(&mut self, line: &str) {
        let line = line.trim();
        if line.is_empty() {
            return;
        }
        if self.stderr_tail.len() == STDERR_TAIL_LINES {
            self.stderr_tail.pop_front();
        }
        self.stderr_tail.push_back(line.to_string());
    }
}

/// Maps ffmpeg's log level onto the `log` crate's levels
fn map_ffmpeg_log_level(level: &FfmpegLogLevel) -> log::Level {
    match level {
        FfmpegLogLevel::Fatal | FfmpegLogLevel::Error => log::Level::Error,
        FfmpegLogLevel::Warning => log::Level::Warn,
        FfmpegLogLevel::Info => log::Level::Info,
        _ => log::Level::Trace,
    }
}

/// Messages ffmpeg reports on stderr that do not indicate a failed encode.
fn is_non_critical_ffmpeg_error(error: &str) -> bool {
    error.contains("deprecated pixel format")
        || error.contains("No accelerated colorspace conversion")
        || error.contains("automatically inserted filter")
        || error.contains("Timestamps are unset")
        || error.contains("Queue input is backward")
        || error.contains("first frame is no keyframe")
}

#[cfg(test)]
mod tests {
    use super::*;
    use ffmpeg_sidecar::event::FfmpegDuration;

    fn duration_event(secs: f64) -> FfmpegEvent {
        FfmpegEvent::ParsedDuration(FfmpegDuration {
            input_index: 0,
            duration: secs,
            raw_log_message: String::new(),
        })
    }

    fn progress_event(time: &str) -> FfmpegEvent {
        FfmpegEvent::Progress(FfmpegProgress {
            frame: 100,
            fps: 25.0,
            q: 23.0,
            size_kb: 512,
            time: time.to_string(),
            bitrate_kbps: 800.0,
            speed: 2.0,
            raw_log_message: String::new(),
        })
    }

    #[test]
    fn test_progress_waits_for_duration() {
        let mut handler = FfmpegProgressHandler::new("480p");
        assert_eq!(handler.handle_event(&progress_event("00:00:05.00")), None);

        assert_eq!(handler.handle_event(&duration_event(20.0)), None);
        let update = handler.handle_event(&progress_event("00:00:05.00")).unwrap();
        assert_eq!(update.processed, Duration::from_secs(5));
        assert_eq!(update.total, Duration::from_secs(20));
        assert_eq!(update.percent(), 25);
    }

    #[test]
    fn test_progress_clamps_to_total() {
        let mut handler = FfmpegProgressHandler::new("480p");
        handler.handle_event(&duration_event(10.0));
        let update = handler.handle_event(&progress_event("00:00:10.04")).unwrap();
        assert_eq!(update.processed, Duration::from_secs(10));
        assert_eq!(update.percent(), 100);
    }

    #[test]
    fn test_unparseable_time_is_skipped() {
        let mut handler = FfmpegProgressHandler::new("480p");
        handler.handle_event(&duration_event(10.0));
        assert_eq!(handler.handle_event(&progress_event("N/A")), None);
    }

    #[test]
    fn test_secondary_input_duration_is_ignored() {
        let mut handler = FfmpegProgressHandler::new("480p");
        handler.handle_event(&FfmpegEvent::ParsedDuration(FfmpegDuration {
            input_index: 1,
            duration: 99.0,
            raw_log_message: String::new(),
        }));
        assert_eq!(handler.total_duration(), None);
    }

    #[test]
    fn test_stderr_summary_keeps_errors_only() {
        let mut handler = FfmpegProgressHandler::new("720p");
        handler.handle_event(&FfmpegEvent::Log(
            FfmpegLogLevel::Info,
            "Stream #0:0: Video: h264".to_string(),
        ));
        handler.handle_event(&FfmpegEvent::Error(
            "Timestamps are unset in a packet".to_string(),
        ));
        handler.handle_event(&FfmpegEvent::Log(
            FfmpegLogLevel::Error,
            "Unknown encoder 'libx999'".to_string(),
        ));

        assert_eq!(handler.stderr_summary(), "Unknown encoder 'libx999'");
    }

    #[test]
    fn test_stderr_summary_is_bounded() {
        let mut handler = FfmpegProgressHandler::new("720p");
        for i in 0..(STDERR_TAIL_LINES + 5) {
            handler.handle_event(&FfmpegEvent::Error(format!("error {i}")));
        }
        let summary = handler.stderr_summary();
        assert_eq!(summary.lines().count(), STDERR_TAIL_LINES);
        assert!(summary.starts_with("error 5"));
    }
}
