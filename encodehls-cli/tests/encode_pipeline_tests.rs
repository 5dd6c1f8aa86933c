//! End-to-end runs of the encode pipeline with the CLI's renderers attached.
//!
//! A scripted invoker stands in for ffmpeg, so these exercise scheduling,
//! event delivery to the terminal/JSON/log handlers, playlist output and exit
//! code mapping without any external binary.

use encodehls_cli::commands::encode::exit_code_for;
use encodehls_cli::terminal::TerminalEventHandler;
use encodehls_cli::{EXIT_FAILURE, EXIT_SUCCESS};
use encodehls_core::events::json_handler::JsonProgressHandler;
use encodehls_core::events::log_handler::LogEventHandler;
use encodehls_core::external::mocks::ScriptedInvoker;
use encodehls_core::{
    CancellationToken, CoreConfigBuilder, EncodeRequest, EncodingProfile, EventDispatcher,
    MASTER_PLAYLIST_NAME, encode_inputs,
};
use serde_json::Value;
use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use tempfile::tempdir;

#[derive(Clone, Default)]
struct SharedBuffer(Arc<Mutex<Vec<u8>>>);

impl Write for SharedBuffer {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl SharedBuffer {
    fn json_lines(&self) -> Vec<Value> {
        let bytes = self.0.lock().unwrap().clone();
        String::from_utf8(bytes)
            .unwrap()
            .lines()
            .map(|line| serde_json::from_str(line).unwrap())
            .collect()
    }
}

fn ladder() -> Vec<EncodingProfile> {
    vec![
        EncodingProfile::new("480p", 800_000, 854, 480),
        EncodingProfile::new("720p", 2_500_000, 1280, 720),
        EncodingProfile::new("1080p", 5_000_000, 1920, 1080),
    ]
}

fn dummy_input(dir: &Path, name: &str) -> PathBuf {
    let path = dir.join(name);
    fs::write(&path, b"dummy content").unwrap();
    path
}

fn dispatcher(json: &SharedBuffer) -> EventDispatcher {
    let mut events = EventDispatcher::new();
    events.add_handler(Arc::new(JsonProgressHandler::with_writer(Box::new(json.clone()))));
    events.add_handler(Arc::new(TerminalEventHandler::new()));
    events.add_handler(Arc::new(LogEventHandler::new()));
    events
}

fn types(lines: &[Value]) -> Vec<&str> {
    lines.iter().filter_map(|v| v["type"].as_str()).collect()
}

#[test]
fn test_two_inputs_with_one_failing_profile() -> Result<(), Box<dyn std::error::Error>> {
    let sources = tempdir()?;
    let out = tempdir()?;
    let inputs = vec![
        dummy_input(sources.path(), "a.mp4"),
        dummy_input(sources.path(), "b.mkv"),
    ];

    let config = CoreConfigBuilder::new().profiles(ladder()).build()?;
    let invoker = ScriptedInvoker::new()
        .fail("720p", "ffmpeg exited with status 1")
        .progress("480p", &[(5, 10), (10, 10)]);
    let json = SharedBuffer::default();
    let cancel = CancellationToken::new();
    let request = EncodeRequest::new(inputs, out.path());

    let summaries = encode_inputs(&invoker, &config, &request, &dispatcher(&json), &cancel)?;

    assert_eq!(summaries.len(), 2);
    for (summary, stem) in summaries.iter().zip(["a", "b"]) {
        assert_eq!(summary.output_root, out.path().join(stem));
        assert_eq!(summary.succeeded_variants(), 2);
        assert_eq!(summary.failed_variants(), 1);

        let master = fs::read_to_string(summary.output_root.join(MASTER_PLAYLIST_NAME))?;
        assert!(master.starts_with("#EXTM3U\n#EXT-X-VERSION:3\n"));
        assert!(master.contains("480p/playlist.m3u8"));
        assert!(master.contains("1080p/playlist.m3u8"));
        assert!(!master.contains("720p"));
        assert!(master.find("480p").unwrap() < master.find("1080p").unwrap());
    }
    assert_eq!(exit_code_for(&summaries, cancel.is_cancelled()), EXIT_SUCCESS);

    let lines = json.json_lines();
    let kinds = types(&lines);
    assert_eq!(kinds.first(), Some(&"run_started"));
    assert_eq!(kinds.last(), Some(&"run_complete"));
    assert_eq!(kinds.iter().filter(|k| **k == "job_failed").count(), 2);
    assert_eq!(kinds.iter().filter(|k| **k == "job_finished").count(), 4);
    assert_eq!(
        kinds.iter().filter(|k| **k == "master_playlist_written").count(),
        2
    );
    assert!(
        lines
            .iter()
            .any(|v| v["type"] == "job_progress" && v["profile"] == "480p" && v["percent"] == 50)
    );
    assert!(lines.iter().all(|v| v["timestamp"].is_string()));
    Ok(())
}

#[test]
fn test_all_profiles_failing_is_a_failed_run() -> Result<(), Box<dyn std::error::Error>> {
    let sources = tempdir()?;
    let out = tempdir()?;
    let input = dummy_input(sources.path(), "movie.mp4");

    let config = CoreConfigBuilder::new().profiles(ladder()).build()?;
    let invoker = ScriptedInvoker::new()
        .fail("480p", "boom")
        .fail("720p", "boom")
        .fail("1080p", "boom");
    let json = SharedBuffer::default();
    let cancel = CancellationToken::new();
    let request = EncodeRequest::new(vec![input], out.path());

    let summaries = encode_inputs(&invoker, &config, &request, &dispatcher(&json), &cancel)?;

    // Single input: flat layout, playlist directly in the output directory.
    let master = fs::read_to_string(out.path().join(MASTER_PLAYLIST_NAME))?;
    assert_eq!(master, "#EXTM3U\n#EXT-X-VERSION:3\n");
    assert_eq!(exit_code_for(&summaries, false), EXIT_FAILURE);

    let lines = json.json_lines();
    let complete = lines.last().unwrap();
    assert_eq!(complete["type"], "run_complete");
    assert_eq!(complete["succeeded_inputs"], 0);
    Ok(())
}
