// ============================================================================
// encodehls-cli/src/terminal.rs
// ============================================================================
//
// TERMINAL OUTPUT: Status lines and per-profile progress bars
//
// Section headers, status lines and the event handler that renders a run in
// the terminal. Each running profile job gets its own bar inside a
// MultiProgress; start/finish/failure lines are printed above the bars so
// they interleave cleanly while several jobs run at once.
//
// Everything goes to stderr. Bars are hidden when stderr is not a terminal.

// ---- External crate imports ----
use console::style;
use encodehls_core::events::{Event, EventHandler};
use encodehls_core::{format_bitrate, format_duration, format_elapsed_secs};
use indicatif::{MultiProgress, ProgressBar, ProgressDrawTarget, ProgressStyle};

// ---- Standard library imports ----
use std::collections::HashMap;
use std::io::IsTerminal;
use std::path::Path;
use std::sync::Mutex;
use std::time::Duration;

/// Symbols used in status lines
pub mod styling {
    pub const SUCCESS_SYMBOL: &str = "✓";
    pub const ERROR_SYMBOL: &str = "✗";
    pub const PROCESSING_SYMBOL: &str = "»";
    pub const SECTION_PREFIX: &str = "===== ";
    pub const SECTION_SUFFIX: &str = " =====";
    pub const STATUS_INDENT: &str = "  ";
}

// ============================================================================
// STATUS LINES
// ============================================================================

pub fn print_section(title: &str) {
    eprintln!();
    eprintln!(
        "{}",
        style(format!(
            "{}{}{}",
            styling::SECTION_PREFIX,
            title.to_uppercase(),
            styling::SECTION_SUFFIX
        ))
        .cyan()
        .bold()
    );
}

/// Prints an aligned "label: value" line.
pub fn print_status(label: &str, value: &str) {
    eprintln!("{}{:<16} {}", styling::STATUS_INDENT, format!("{label}:"), value);
}

pub fn print_subsection(title: &str) {
    eprintln!();
    eprintln!("{} {}", styling::PROCESSING_SYMBOL, style(title).bold());
}

pub fn print_success(message: &str) {
    eprintln!("{} {}", style(styling::SUCCESS_SYMBOL).green().bold(), message);
}

pub fn print_error(message: &str) {
    eprintln!("{} {}", style(styling::ERROR_SYMBOL).red().bold(), message);
}

// ============================================================================
// EVENT RENDERING
// ============================================================================

/// Renders orchestration events as terminal lines and progress bars.
pub struct TerminalEventHandler {
    multi: MultiProgress,
    bars: Mutex<HashMap<String, ProgressBar>>,
}

impl Default for TerminalEventHandler {
    fn default() -> Self {
        Self::new()
    }
}

impl TerminalEventHandler {
    pub fn new() -> Self {
        let target = if std::io::stderr().is_terminal() {
            ProgressDrawTarget::stderr()
        } else {
            ProgressDrawTarget::hidden()
        };
        Self {
            multi: MultiProgress::with_draw_target(target),
            bars: Mutex::new(HashMap::new()),
        }
    }

    /// Prints a line above the bars. Works with a hidden draw target too.
    fn line(&self, text: String) {
        self.multi.suspend(|| eprintln!("{text}"));
    }

    fn bar_style() -> ProgressStyle {
        ProgressStyle::default_bar()
            .template("  {prefix:>8} {percent:>3}% [{bar:30}] {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .progress_chars("##.")
    }

    fn start_bar(&self, input: &Path, profile: &str) {
        let bar = self.multi.add(ProgressBar::new(100));
        bar.set_style(Self::bar_style());
        bar.set_prefix(profile.to_string());
        bar.enable_steady_tick(Duration::from_millis(200));
        if let Ok(mut bars) = self.bars.lock() {
            bars.insert(bar_key(input, profile), bar);
        }
    }

    fn finish_bar(&self, input: &Path, profile: &str) {
        let bar = match self.bars.lock() {
            Ok(mut bars) => bars.remove(&bar_key(input, profile)),
            Err(_) => None,
        };
        if let Some(bar) = bar {
            bar.finish_and_clear();
            self.multi.remove(&bar);
        }
    }

    fn update_bar(&self, input: &Path, profile: &str, percent: u8, processed: Duration, total: Duration) {
        if let Ok(bars) = self.bars.lock() {
            if let Some(bar) = bars.get(&bar_key(input, profile)) {
                bar.set_position(u64::from(percent));
                bar.set_message(format!(
                    "{} / {}",
                    format_duration(processed),
                    format_duration(total)
                ));
            }
        }
    }
}

fn bar_key(input: &Path, profile: &str) -> String {
    format!("{}::{}", input.display(), profile)
}

/// "Starting 720p (1280x720 @ 2500kbps)", or without a resolution for
/// source-sized profiles.
pub fn job_start_line(profile: &str, bitrate: u64, resolution: Option<&str>) -> String {
    match resolution {
        Some(res) => format!("Starting {} ({} @ {})", profile, res, format_bitrate(bitrate)),
        None => format!("Starting {} ({})", profile, format_bitrate(bitrate)),
    }
}

/// "[2/3] movie.mp4"; `index` is 1-based.
pub fn input_header_line(index: usize, total: usize, input: &Path) -> String {
    format!("[{}/{}] {}", index, total, input.display())
}

impl EventHandler for TerminalEventHandler {
    fn handle(&self, event: &Event) {
        match event {
            Event::RunStarted {
                inputs,
                profiles,
                concurrency,
                output_dir,
            } => {
                self.multi.suspend(|| {
                    print_section("Encoding");
                    print_status("Inputs", &inputs.to_string());
                    print_status("Profiles", &profiles.to_string());
                    print_status("Scheduling", &concurrency.to_string());
                    print_status("Output", &output_dir.display().to_string());
                });
            }
            Event::InputStarted {
                input,
                index,
                total,
                output_root,
            } => {
                self.multi.suspend(|| {
                    print_subsection(&input_header_line(*index, *total, input));
                    print_status("Output root", &output_root.display().to_string());
                });
            }
            Event::JobStarted {
                input,
                profile,
                bitrate,
                resolution,
            } => {
                self.line(format!(
                    "{}{}",
                    styling::STATUS_INDENT,
                    job_start_line(profile, *bitrate, resolution.as_deref())
                ));
                self.start_bar(input, profile);
            }
            Event::JobProgress {
                input,
                profile,
                processed,
                total,
                percent,
            } => self.update_bar(input, profile, *percent, *processed, *total),
            Event::JobFinished {
                input,
                profile,
                elapsed,
            } => {
                self.finish_bar(input, profile);
                self.line(format!(
                    "{}{} Finished {} in {} seconds",
                    styling::STATUS_INDENT,
                    style(styling::SUCCESS_SYMBOL).green(),
                    profile,
                    format_elapsed_secs(*elapsed)
                ));
            }
            Event::JobFailed {
                input,
                profile,
                reason,
                elapsed,
            } => {
                self.finish_bar(input, profile);
                self.line(format!(
                    "{}{} {} failed after {} seconds: {}",
                    styling::STATUS_INDENT,
                    style(styling::ERROR_SYMBOL).red(),
                    profile,
                    format_elapsed_secs(*elapsed),
                    reason
                ));
            }
            Event::MasterPlaylistWritten { path, variants, .. } => {
                self.multi.suspend(|| {
                    print_success(&format!(
                        "Master playlist {} ({} variant{})",
                        path.display(),
                        variants,
                        if *variants == 1 { "" } else { "s" }
                    ));
                });
            }
            Event::InputFailed { input, reason } => {
                self.multi
                    .suspend(|| print_error(&format!("{}: {}", input.display(), reason)));
            }
            Event::InputFinished {
                succeeded, failed, ..
            } => {
                self.line(format!(
                    "{}{} succeeded, {} failed",
                    styling::STATUS_INDENT,
                    succeeded,
                    failed
                ));
            }
            Event::RunComplete {
                inputs,
                succeeded_inputs,
                cancelled,
                total_time,
            } => {
                self.multi.suspend(|| {
                    print_section("Summary");
                    print_status(
                        "Inputs",
                        &format!("{succeeded_inputs} of {inputs} encoded"),
                    );
                    print_status("Total time", &format_duration(*total_time));
                    if *cancelled {
                        print_error("Run cancelled");
                    }
                });
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_job_start_line() {
        assert_eq!(
            job_start_line("720p", 2_500_000, Some("1280x720")),
            "Starting 720p (1280x720 @ 2500kbps)"
        );
        assert_eq!(
            job_start_line("source", 5_000_000, None),
            "Starting source (5000kbps)"
        );
    }

    #[test]
    fn test_input_header_line_uses_event_index() {
        assert_eq!(input_header_line(1, 1, Path::new("movie.mp4")), "[1/1] movie.mp4");
        assert_eq!(input_header_line(2, 2, Path::new("b.mkv")), "[2/2] b.mkv");
    }

    #[test]
    fn test_bars_are_tracked_per_input_and_profile() {
        let handler = TerminalEventHandler {
            multi: MultiProgress::with_draw_target(ProgressDrawTarget::hidden()),
            bars: Mutex::new(HashMap::new()),
        };
        let a = Path::new("a.mp4");
        let b = Path::new("b.mp4");

        handler.start_bar(a, "720p");
        handler.start_bar(b, "720p");
        assert_eq!(handler.bars.lock().unwrap().len(), 2);

        handler.update_bar(a, "720p", 40, Duration::from_secs(4), Duration::from_secs(10));
        assert_eq!(
            handler.bars.lock().unwrap()[&bar_key(a, "720p")].position(),
            40
        );

        handler.finish_bar(a, "720p");
        let bars = handler.bars.lock().unwrap();
        assert_eq!(bars.len(), 1);
        assert!(bars.contains_key(&bar_key(b, "720p")));
    }
}
