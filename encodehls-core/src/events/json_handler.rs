//! JSON progress handler for structured progress output
//!
//! Writes one JSON object per event to stdout (or any writer) so that wrapper
//! scripts and job runners can follow a run without parsing terminal output.
//! Every object carries a `type` and an RFC 3339 `timestamp`.

use super::{Event, EventHandler};

use chrono::{SecondsFormat, Utc};
use serde_json::{Value, json};

use std::io::{self, Write};
use std::sync::Mutex;

/// Event handler that outputs events as newline-delimited JSON
pub struct JsonProgressHandler {
    output: Mutex<Box<dyn Write + Send>>,
}

impl JsonProgressHandler {
    /// Create a new JSON progress handler that writes to stdout
    pub fn new() -> Self {
        Self::with_writer(Box::new(io::stdout()))
    }

    /// Create a new JSON progress handler with a custom writer
    pub fn with_writer(writer: Box<dyn Write + Send>) -> Self {
        Self {
            output: Mutex::new(writer),
        }
    }

    fn write_json(&self, mut value: Value) {
        if let Value::Object(map) = &mut value {
            map.insert(
                "timestamp".to_string(),
                Value::String(Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true)),
            );
        }
        if let Ok(mut output) = self.output.lock() {
            if let Ok(json_str) = serde_json::to_string(&value) {
                let _ = writeln!(output, "{json_str}");
                let _ = output.flush();
            }
        }
    }
}

/// The JSON body of an event, without the timestamp.
fn event_to_json(event: &Event) -> Option<Value> {
    let value = match event {
        Event::RunStarted {
            inputs,
            profiles,
            concurrency,
            output_dir,
        } => json!({
            "type": "run_started",
            "inputs": inputs,
            "profiles": profiles,
            "concurrency": concurrency.to_string(),
            "output_dir": output_dir.display().to_string(),
        }),

        Event::InputStarted {
            input,
            index,
            total,
            output_root,
        } => json!({
            "type": "input_started",
            "input": input.display().to_string(),
            "index": index,
            "total": total,
            "output_root": output_root.display().to_string(),
        }),

        Event::JobStarted {
            input,
            profile,
            bitrate,
            resolution,
        } => json!({
            "type": "job_started",
            "input": input.display().to_string(),
            "profile": profile,
            "bitrate": bitrate,
            "resolution": resolution,
        }),

        Event::JobProgress {
            input,
            profile,
            processed,
            total,
            percent,
        } => {
            // Keep the stream readable: every 5% plus completion.
            if percent % 5 != 0 && *percent < 99 {
                return None;
            }
            json!({
                "type": "job_progress",
                "input": input.display().to_string(),
                "profile": profile,
                "percent": percent,
                "processed_seconds": processed.as_secs_f64(),
                "total_seconds": total.as_secs_f64(),
            })
        }

        Event::JobFinished {
            input,
            profile,
            elapsed,
        } => json!({
            "type": "job_finished",
            "input": input.display().to_string(),
            "profile": profile,
            "elapsed_seconds": elapsed.as_secs_f64(),
        }),

        Event::JobFailed {
            input,
            profile,
            reason,
            elapsed,
        } => json!({
            "type": "job_failed",
            "input": input.display().to_string(),
            "profile": profile,
            "reason": reason,
            "elapsed_seconds": elapsed.as_secs_f64(),
        }),

        Event::MasterPlaylistWritten {
            input,
            path,
            variants,
        } => json!({
            "type": "master_playlist_written",
            "input": input.display().to_string(),
            "path": path.display().to_string(),
            "variants": variants,
        }),

        Event::InputFailed { input, reason } => json!({
            "type": "input_failed",
            "input": input.display().to_string(),
            "reason": reason,
        }),

        Event::InputFinished {
            input,
            output_root,
            succeeded,
            failed,
        } => json!({
            "type": "input_finished",
            "input": input.display().to_string(),
            "output_root": output_root.display().to_string(),
            "succeeded": succeeded,
            "failed": failed,
        }),

        Event::RunComplete {
            inputs,
            succeeded_inputs,
            cancelled,
            total_time,
        } => json!({
            "type": "run_complete",
            "inputs": inputs,
            "succeeded_inputs": succeeded_inputs,
            "cancelled": cancelled,
            "duration_seconds": total_time.as_secs_f64(),
        }),
    };
    Some(value)
}

impl EventHandler for JsonProgressHandler {
    fn handle(&self, event: &Event) {
        if let Some(value) = event_to_json(event) {
            self.write_json(value);
        }
    }
}

impl Default for JsonProgressHandler {
    fn default() -> Self {
        Self::new()
    }
}
