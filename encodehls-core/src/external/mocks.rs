// encodehls-core/src/external/mocks.rs

// --- Mocking Infrastructure (for testing) ---

// Compiled for unit tests and behind the "test-mocks" feature.

use super::{ProgressUpdate, TranscodeInvoker, TranscodeRequest};
use crate::cancellation::CancellationToken;
use crate::error::{CoreError, CoreResult, command_start_error};

use std::collections::HashMap;
use std::io;
use std::sync::Mutex;
use std::thread;
use std::time::{Duration, Instant};

/// Scripted behaviour for one variant.
#[derive(Debug, Clone, Default)]
struct Script {
    failure: Option<String>,
    progress: Vec<ProgressUpdate>,
    delay: Duration,
    cancel_after: Option<CancellationToken>,
}

/// One request the invoker received.
#[derive(Debug, Clone)]
pub struct RecordedCall {
    pub request: TranscodeRequest,
    /// Whether the variant's output directory existed when the call arrived.
    pub variant_dir_existed: bool,
}

/// In-memory transcode invoker with per-variant scripted outcomes.
///
/// Unscripted variants succeed immediately. Successful calls write a stub
/// variant playlist unless disabled with [`ScriptedInvoker::without_playlists`].
#[derive(Debug, Default)]
pub struct ScriptedInvoker {
    scripts: HashMap<String, Script>,
    calls: Mutex<Vec<RecordedCall>>,
    write_playlists: bool,
    cancel: Option<CancellationToken>,
}

impl ScriptedInvoker {
    pub fn new() -> Self {
        Self {
            write_playlists: true,
            ..Default::default()
        }
    }

    /// Makes `variant` fail with `message`.
    pub fn fail(mut self, variant: &str, message: &str) -> Self {
        self.script(variant).failure = Some(message.to_string());
        self
    }

    /// Reports `(processed_secs, total_secs)` pairs, in order, before finishing `variant`.
    pub fn progress(mut self, variant: &str, points: &[(u64, u64)]) -> Self {
        self.script(variant).progress = points
            .iter()
            .map(|&(processed, total)| {
                ProgressUpdate::new(Duration::from_secs(processed), Duration::from_secs(total))
            })
            .collect();
        self
    }

    /// Sleeps for `delay` before finishing `variant`.
    pub fn delay(mut self, variant: &str, delay: Duration) -> Self {
        self.script(variant).delay = delay;
        self
    }

    /// Cancels `token` once `variant` has finished.
    pub fn cancel_after(mut self, variant: &str, token: CancellationToken) -> Self {
        self.script(variant).cancel_after = Some(token);
        self
    }

    /// Refuses to run while `token` is cancelled, like a real encoder would be killed.
    pub fn with_cancellation(mut self, token: CancellationToken) -> Self {
        self.cancel = Some(token);
        self
    }

    /// Leaves the variant directories empty.
    pub fn without_playlists(mut self) -> Self {
        self.write_playlists = false;
        self
    }

    /// Every call received so far, in arrival order.
    pub fn calls(&self) -> Vec<RecordedCall> {
        self.calls.lock().map(|c| c.clone()).unwrap_or_default()
    }

    /// Variant names of every call received so far, in arrival order.
    pub fn requested_variants(&self) -> Vec<String> {
        self.calls()
            .into_iter()
            .map(|call| call.request.variant)
            .collect()
    }

    fn script(&mut self, variant: &str) -> &mut Script {
        self.scripts.entry(variant.to_string()).or_default()
    }
}

impl TranscodeInvoker for ScriptedInvoker {
    fn invoke(
        &self,
        request: &TranscodeRequest,
        on_progress: &mut dyn FnMut(ProgressUpdate),
    ) -> CoreResult<Duration> {
        let started = Instant::now();
        let variant_dir_existed = request
            .playlist_path
            .parent()
            .is_some_and(|dir| dir.is_dir());
        if let Ok(mut calls) = self.calls.lock() {
            calls.push(RecordedCall {
                request: request.clone(),
                variant_dir_existed,
            });
        }

        if self.cancel.as_ref().is_some_and(CancellationToken::is_cancelled) {
            return Err(CoreError::Cancelled);
        }

        let script = self.scripts.get(&request.variant).cloned().unwrap_or_default();
        for update in script.progress {
            on_progress(update);
        }
        if !script.delay.is_zero() {
            thread::sleep(script.delay);
        }
        if let Some(token) = script.cancel_after {
            token.cancel();
        }

        if let Some(message) = script.failure {
            return Err(command_start_error("ffmpeg", io::Error::other(message)));
        }

        if self.write_playlists {
            std::fs::write(&request.playlist_path, "#EXTM3U\n#EXT-X-ENDLIST\n")?;
        }
        Ok(started.elapsed())
    }
}
