// ============================================================================
// encodehls-core/src/encoding/job.rs
// ============================================================================
//
// PROFILE JOB RUNNER: One Input, One Rendition
//
// Runs a single (input, profile) pair to a terminal JobOutcome. The runner
// creates the variant directory, materializes the full transcode parameter
// set, times the invocation, forwards progress as events and contains every
// invocation error. Nothing a job does can abort its sibling jobs; the worst
// outcome is a Failed status carrying the reason.

// ---- Internal crate imports ----
use super::layout::{segment_pattern, variant_dir, variant_playlist_path};
use crate::config::{AUDIO_BITRATE, AUDIO_CODEC, CoreConfig, HLS_PLAYLIST_SIZE, HLS_SEGMENT_DURATION_SECS};
use crate::error::CoreError;
use crate::events::{Event, EventDispatcher};
use crate::external::{ProgressUpdate, TranscodeInvoker, TranscodeRequest};
use crate::profile::EncodingProfile;

// ---- Standard library imports ----
use std::path::Path;
use std::time::{Duration, Instant};

/// Failure reason recorded for jobs stopped or skipped by cancellation.
pub const CANCELLED_REASON: &str = "cancelled";

/// Terminal state of a profile job.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum JobStatus {
    Succeeded,
    Failed(String),
}

/// Result of one profile job. Created once per (input, profile) pair.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JobOutcome {
    pub profile: EncodingProfile,
    pub status: JobStatus,
    /// Wall-clock time from just before invocation to completion
    pub elapsed: Duration,
}

impl JobOutcome {
    #[must_use]
    pub fn succeeded(profile: EncodingProfile, elapsed: Duration) -> Self {
        Self {
            profile,
            status: JobStatus::Succeeded,
            elapsed,
        }
    }

    #[must_use]
    pub fn failed(profile: EncodingProfile, reason: impl Into<String>, elapsed: Duration) -> Self {
        Self {
            profile,
            status: JobStatus::Failed(reason.into()),
            elapsed,
        }
    }

    #[must_use]
    pub fn is_success(&self) -> bool {
        self.status == JobStatus::Succeeded
    }

    #[must_use]
    pub fn failure_reason(&self) -> Option<&str> {
        match &self.status {
            JobStatus::Succeeded => None,
            JobStatus::Failed(reason) => Some(reason),
        }
    }
}

/// Builds the encoder parameters for one input and profile.
#[must_use]
pub fn build_transcode_request(
    config: &CoreConfig,
    input: &Path,
    profile: &EncodingProfile,
    output_root: &Path,
) -> TranscodeRequest {
    TranscodeRequest {
        variant: profile.name.clone(),
        input_path: input.to_path_buf(),
        playlist_path: variant_playlist_path(output_root, profile),
        segment_pattern: segment_pattern(output_root, profile),
        video_bitrate: profile.bitrate,
        audio_bitrate: AUDIO_BITRATE,
        dimensions: profile.dimensions(),
        video_codec: config.video_encoder.clone(),
        audio_codec: AUDIO_CODEC.to_string(),
        segment_duration_secs: HLS_SEGMENT_DURATION_SECS,
        playlist_size: HLS_PLAYLIST_SIZE,
    }
}

/// Runs one profile job for `input`, writing under `output_root`.
///
/// Progress events are emitted only when the processed duration advances
/// and the whole-number percentage changes, so every job's progress stream
/// is strictly increasing.
pub fn run_profile_job<I>(
    invoker: &I,
    config: &CoreConfig,
    input: &Path,
    profile: &EncodingProfile,
    output_root: &Path,
    events: &EventDispatcher,
) -> JobOutcome
where
    I: TranscodeInvoker + ?Sized,
{
    events.emit(Event::JobStarted {
        input: input.to_path_buf(),
        profile: profile.name.clone(),
        bitrate: profile.bitrate,
        resolution: profile.resolution(),
    });

    let fail = |reason: String, elapsed: Duration| {
        events.emit(Event::JobFailed {
            input: input.to_path_buf(),
            profile: profile.name.clone(),
            reason: reason.clone(),
            elapsed,
        });
        JobOutcome::failed(profile.clone(), reason, elapsed)
    };

    let dir = variant_dir(output_root, profile);
    if let Err(e) = std::fs::create_dir_all(&dir) {
        return fail(
            format!("Failed to create output directory {}: {}", dir.display(), e),
            Duration::ZERO,
        );
    }

    let request = build_transcode_request(config, input, profile, output_root);
    log::debug!("[{}] transcoding {} -> {}", profile.name, input.display(), request.playlist_path.display());

    let mut last_processed: Option<Duration> = None;
    let mut last_percent: Option<u8> = None;
    let mut on_progress = |update: ProgressUpdate| {
        if last_processed.is_some_and(|last| update.processed <= last) {
            return;
        }
        last_processed = Some(update.processed);
        let percent = update.percent();
        if last_percent == Some(percent) {
            return;
        }
        last_percent = Some(percent);
        events.emit(Event::JobProgress {
            input: input.to_path_buf(),
            profile: profile.name.clone(),
            processed: update.processed,
            total: update.total,
            percent,
        });
    };

    let started = Instant::now();
    match invoker.invoke(&request, &mut on_progress) {
        Ok(_) => {
            let elapsed = started.elapsed();
            events.emit(Event::JobFinished {
                input: input.to_path_buf(),
                profile: profile.name.clone(),
                elapsed,
            });
            JobOutcome::succeeded(profile.clone(), elapsed)
        }
        Err(CoreError::Cancelled) => fail(CANCELLED_REASON.to_string(), started.elapsed()),
        Err(e) => fail(e.to_string(), started.elapsed()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::CoreConfigBuilder;
    use crate::events::RecordingHandler;
    use crate::external::mocks::ScriptedInvoker;
    use std::sync::Arc;

    fn create_test_config() -> CoreConfig {
        CoreConfigBuilder::new()
            .profile(EncodingProfile::new("480p", 800_000, 854, 480))
            .video_encoder("libx265")
            .build()
            .unwrap()
    }

    fn recording_dispatcher() -> (EventDispatcher, Arc<RecordingHandler>) {
        let recorder = Arc::new(RecordingHandler::new());
        let mut dispatcher = EventDispatcher::new();
        dispatcher.add_handler(recorder.clone());
        (dispatcher, recorder)
    }

    fn progress_values(events: &[Event]) -> Vec<(u64, u8)> {
        events
            .iter()
            .filter_map(|e| match e {
                Event::JobProgress {
                    processed, percent, ..
                } => Some((processed.as_secs(), *percent)),
                _ => None,
            })
            .collect()
    }

    #[test]
    fn test_request_is_fully_materialized() {
        let config = create_test_config();
        let profile = config.profiles.profiles()[0].clone();
        let request = build_transcode_request(
            &config,
            Path::new("/media/movie.mp4"),
            &profile,
            Path::new("/srv/hls"),
        );

        assert_eq!(request.variant, "480p");
        assert_eq!(request.video_bitrate, 800_000);
        assert_eq!(request.audio_bitrate, 128_000);
        assert_eq!(request.dimensions, Some((854, 480)));
        assert_eq!(request.video_codec, "libx265");
        assert_eq!(request.audio_codec, "aac");
        assert_eq!(request.segment_duration_secs, 10);
        assert_eq!(request.playlist_size, 0);
        assert_eq!(
            request.segment_pattern,
            Path::new("/srv/hls/480p/segment%03d.ts")
        );
    }

    #[test]
    fn test_success_creates_variant_dir_before_invoking() {
        let dir = tempfile::tempdir().unwrap();
        let config = create_test_config();
        let profile = config.profiles.profiles()[0].clone();
        let invoker = ScriptedInvoker::new();
        let (events, recorder) = recording_dispatcher();

        let outcome = run_profile_job(&invoker, &config, Path::new("in.mp4"), &profile, dir.path(), &events);

        assert!(outcome.is_success());
        let calls = invoker.calls();
        assert_eq!(calls.len(), 1);
        assert!(calls[0].variant_dir_existed);
        assert!(dir.path().join("480p/playlist.m3u8").is_file());

        let recorded = recorder.events();
        assert!(matches!(recorded.first(), Some(Event::JobStarted { profile, .. }) if profile == "480p"));
        assert!(matches!(recorded.last(), Some(Event::JobFinished { profile, .. }) if profile == "480p"));
    }

    #[test]
    fn test_invocation_error_becomes_failed_outcome() {
        let dir = tempfile::tempdir().unwrap();
        let config = create_test_config();
        let profile = config.profiles.profiles()[0].clone();
        let invoker = ScriptedInvoker::new().fail("480p", "Unknown encoder 'libx265'");
        let (events, recorder) = recording_dispatcher();

        let outcome = run_profile_job(&invoker, &config, Path::new("in.mp4"), &profile, dir.path(), &events);

        let reason = outcome.failure_reason().unwrap();
        assert!(reason.contains("Unknown encoder 'libx265'"), "{reason}");
        assert!(recorder.events().iter().any(|e| matches!(
            e,
            Event::JobFailed { profile, reason, .. } if profile == "480p" && reason.contains("libx265")
        )));
    }

    #[test]
    fn test_uncreatable_variant_dir_fails_without_invoking() {
        let dir = tempfile::tempdir().unwrap();
        let blocker = dir.path().join("not-a-dir");
        std::fs::write(&blocker, "file").unwrap();
        let config = create_test_config();
        let profile = config.profiles.profiles()[0].clone();
        let invoker = ScriptedInvoker::new();

        let outcome = run_profile_job(
            &invoker,
            &config,
            Path::new("in.mp4"),
            &profile,
            &blocker,
            &EventDispatcher::new(),
        );

        assert!(!outcome.is_success());
        assert!(invoker.calls().is_empty());
        // The clock starts at invocation, which never happened.
        assert_eq!(outcome.elapsed, Duration::ZERO);
    }

    #[test]
    fn test_elapsed_covers_the_invocation() {
        let dir = tempfile::tempdir().unwrap();
        let config = create_test_config();
        let profile = config.profiles.profiles()[0].clone();
        let invoker = ScriptedInvoker::new().delay("480p", Duration::from_millis(40));
        let (events, recorder) = recording_dispatcher();

        let outcome = run_profile_job(&invoker, &config, Path::new("in.mp4"), &profile, dir.path(), &events);

        assert!(outcome.is_success());
        assert!(outcome.elapsed >= Duration::from_millis(40));
        assert!(recorder.events().iter().any(|e| matches!(
            e,
            Event::JobFinished { elapsed, .. } if *elapsed == outcome.elapsed
        )));
    }

    #[test]
    fn test_progress_is_strictly_increasing() {
        let dir = tempfile::tempdir().unwrap();
        let config = create_test_config();
        let profile = config.profiles.profiles()[0].clone();
        let invoker = ScriptedInvoker::new().progress(
            "480p",
            &[(10, 200), (10, 200), (5, 200), (11, 200), (50, 200), (200, 200)],
        );
        let (events, recorder) = recording_dispatcher();

        run_profile_job(&invoker, &config, Path::new("in.mp4"), &profile, dir.path(), &events);

        assert_eq!(
            progress_values(&recorder.events()),
            vec![(10, 5), (50, 25), (200, 100)]
        );
    }

    #[test]
    fn test_cancelled_invocation_reports_cancelled() {
        let dir = tempfile::tempdir().unwrap();
        let config = create_test_config();
        let profile = config.profiles.profiles()[0].clone();
        let token = crate::cancellation::CancellationToken::new();
        token.cancel();
        let invoker = ScriptedInvoker::new().with_cancellation(token);

        let outcome = run_profile_job(
            &invoker,
            &config,
            Path::new("in.mp4"),
            &profile,
            dir.path(),
            &EventDispatcher::new(),
        );

        assert_eq!(outcome.failure_reason(), Some(CANCELLED_REASON));
    }
}
