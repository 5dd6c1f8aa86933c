//! Orchestration events and their dispatch to handlers
//!
//! The orchestrator and job runner describe what happens during a run as
//! [`Event`]s. Presentation lives entirely in [`EventHandler`]s: the CLI's
//! terminal renderer, [`log_handler::LogEventHandler`] for the run log, and
//! [`json_handler::JsonProgressHandler`] for machine-readable output. Events
//! from concurrently running jobs arrive from worker threads, so handlers
//! must be `Send + Sync`.

use crate::config::ConcurrencyMode;

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

pub mod json_handler;
pub mod log_handler;

#[derive(Debug, Clone, PartialEq)]
pub enum Event {
    // Run lifecycle
    RunStarted {
        inputs: usize,
        profiles: usize,
        concurrency: ConcurrencyMode,
        output_dir: PathBuf,
    },

    RunComplete {
        inputs: usize,
        succeeded_inputs: usize,
        cancelled: bool,
        total_time: Duration,
    },

    // Input lifecycle
    InputStarted {
        input: PathBuf,
        index: usize,
        total: usize,
        output_root: PathBuf,
    },

    MasterPlaylistWritten {
        input: PathBuf,
        path: PathBuf,
        variants: usize,
    },

    InputFailed {
        input: PathBuf,
        reason: String,
    },

    InputFinished {
        input: PathBuf,
        output_root: PathBuf,
        succeeded: usize,
        failed: usize,
    },

    // Profile jobs
    JobStarted {
        input: PathBuf,
        profile: String,
        bitrate: u64,
        resolution: Option<String>,
    },

    JobProgress {
        input: PathBuf,
        profile: String,
        processed: Duration,
        total: Duration,
        percent: u8,
    },

    JobFinished {
        input: PathBuf,
        profile: String,
        elapsed: Duration,
    },

    JobFailed {
        input: PathBuf,
        profile: String,
        reason: String,
        elapsed: Duration,
    },
}

pub trait EventHandler: Send + Sync {
    fn handle(&self, event: &Event);
}

#[derive(Clone)]
pub struct EventDispatcher {
    handlers: Vec<Arc<dyn EventHandler>>,
}

impl EventDispatcher {
    pub fn new() -> Self {
        Self {
            handlers: Vec::new(),
        }
    }

    pub fn add_handler(&mut self, handler: Arc<dyn EventHandler>) {
        self.handlers.push(handler);
    }

    pub fn emit(&self, event: Event) {
        for handler in &self.handlers {
            handler.handle(&event);
        }
    }

    #[must_use]
    pub fn handler_count(&self) -> usize {
        self.handlers.len()
    }
}

impl Default for EventDispatcher {
    fn default() -> Self {
        Self::new()
    }
}

/// Handler that keeps every event it receives, for assertions in tests.
#[cfg(any(test, feature = "test-mocks"))]
#[derive(Default)]
pub struct RecordingHandler {
    events: std::sync::Mutex<Vec<Event>>,
}

#[cfg(any(test, feature = "test-mocks"))]
impl RecordingHandler {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn events(&self) -> Vec<Event> {
        self.events.lock().map(|e| e.clone()).unwrap_or_default()
    }
}

#[cfg(any(test, feature = "test-mocks"))]
impl EventHandler for RecordingHandler {
    fn handle(&self, event: &Event) {
        if let Ok(mut events) = self.events.lock() {
            events.push(event.clone());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dispatcher_delivers_to_every_handler() {
        let first = Arc::new(RecordingHandler::new());
        let second = Arc::new(RecordingHandler::new());
        let mut dispatcher = EventDispatcher::new();
        dispatcher.add_handler(first.clone());
        dispatcher.add_handler(second.clone());
        assert_eq!(dispatcher.handler_count(), 2);

        let event = Event::InputFailed {
            input: PathBuf::from("missing.mp4"),
            reason: "Input file not found: missing.mp4".to_string(),
        };
        dispatcher.emit(event.clone());

        assert_eq!(first.events(), vec![event.clone()]);
        assert_eq!(second.events(), vec![event]);
    }
}
