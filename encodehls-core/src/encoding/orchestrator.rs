// ============================================================================
// encodehls-core/src/encoding/orchestrator.rs
// ============================================================================
//
// ENCODING ORCHESTRATOR: Inputs x Profiles -> Master Playlists
//
// Drives a whole run. Inputs are processed one after another; for each input
// every profile in the catalog becomes a profile job, run either on a rayon
// pool (parallel) or one at a time (sequential). All of an input's jobs are
// joined before its master playlist is assembled, and outcomes are collected
// by index so the playlist follows catalog order regardless of completion
// order.
//
// FAILURE POLICY:
// - Configuration problems are returned as Err before any job starts
// - A missing input or an unwritable master playlist fails only that input
// - A failed job only drops its variant from the master playlist
//
// CANCELLATION:
// Once the token is cancelled, jobs that have not started are recorded as
// failed, the current input's master playlist is still written from the
// confirmed successes, and remaining inputs are reported as cancelled.

// ---- Internal crate imports ----
use super::job::{CANCELLED_REASON, JobOutcome, run_profile_job};
use super::layout::output_roots;
use crate::cancellation::CancellationToken;
use crate::config::{ConcurrencyMode, CoreConfig, OutputLayout};
use crate::error::{CoreError, CoreResult};
use crate::events::{Event, EventDispatcher};
use crate::external::TranscodeInvoker;
use crate::playlist::write_master_playlist;
use crate::profile::EncodingProfile;

// ---- External crate imports ----
use rayon::prelude::*;
use rayon::{ThreadPool, ThreadPoolBuilder};

// ---- Standard library imports ----
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

// ============================================================================
// REQUEST AND SUMMARY TYPES
// ============================================================================

/// The inputs to encode and where their output goes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EncodeRequest {
    pub inputs: Vec<PathBuf>,
    pub output_dir: PathBuf,
    pub layout: OutputLayout,
}

impl EncodeRequest {
    /// Creates a request using the default layout for the number of inputs.
    #[must_use]
    pub fn new(inputs: Vec<PathBuf>, output_dir: impl Into<PathBuf>) -> Self {
        let layout = OutputLayout::for_input_count(inputs.len());
        Self {
            inputs,
            output_dir: output_dir.into(),
            layout,
        }
    }

    #[must_use]
    pub fn with_layout(mut self, layout: OutputLayout) -> Self {
        self.layout = layout;
        self
    }

    fn validate(&self) -> CoreResult<()> {
        if self.inputs.is_empty() {
            return Err(CoreError::Config("no input files given".to_string()));
        }
        if self.layout == OutputLayout::Flat && self.inputs.len() > 1 {
            return Err(CoreError::Config(format!(
                "flat output layout holds a single input, got {}",
                self.inputs.len()
            )));
        }
        Ok(())
    }

    /// Output root of every input, in input order. Inputs never share a root
    /// in the per-input layout.
    pub fn output_roots(&self) -> CoreResult<Vec<PathBuf>> {
        output_roots(&self.output_dir, &self.inputs, self.layout)
            .map_err(|e| CoreError::Config(format!("cannot derive output directories: {e}")))
    }
}

/// How an input ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InputStatus {
    /// Every job resolved and the master playlist was written.
    Completed { master_playlist: PathBuf },
    /// The input could not be processed or its master playlist not written.
    Failed(String),
    /// The run was cancelled before this input started.
    Cancelled,
}

/// Per-input result of a run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InputSummary {
    pub input: PathBuf,
    pub output_root: PathBuf,
    pub status: InputStatus,
    /// One outcome per profile, in catalog order. Empty if no job ran.
    pub outcomes: Vec<JobOutcome>,
}

impl InputSummary {
    #[must_use]
    pub fn master_playlist(&self) -> Option<&Path> {
        match &self.status {
            InputStatus::Completed { master_playlist } => Some(master_playlist),
            _ => None,
        }
    }

    #[must_use]
    pub fn succeeded_variants(&self) -> usize {
        self.outcomes.iter().filter(|o| o.is_success()).count()
    }

    #[must_use]
    pub fn failed_variants(&self) -> usize {
        self.outcomes.len() - self.succeeded_variants()
    }

    /// A master playlist was written and lists at least one variant.
    #[must_use]
    pub fn is_success(&self) -> bool {
        self.master_playlist().is_some() && self.succeeded_variants() > 0
    }
}

// ============================================================================
// SCHEDULING
// ============================================================================

enum Scheduler {
    Sequential,
    Parallel(ThreadPool),
}

impl Scheduler {
    fn for_config(config: &CoreConfig) -> CoreResult<Self> {
        match config.concurrency {
            ConcurrencyMode::Sequential => Ok(Scheduler::Sequential),
            ConcurrencyMode::Parallel => ThreadPoolBuilder::new()
                .num_threads(config.worker_count())
                .thread_name(|i| format!("encodehls-job-{i}"))
                .build()
                .map(Scheduler::Parallel)
                .map_err(|e| CoreError::Config(format!("failed to start job workers: {e}"))),
        }
    }

    /// Runs `job` for every profile and returns the outcomes in profile order.
    fn run_all<F>(&self, profiles: &[EncodingProfile], job: F) -> Vec<JobOutcome>
    where
        F: Fn(&EncodingProfile) -> JobOutcome + Send + Sync,
    {
        match self {
            Scheduler::Sequential => profiles.iter().map(job).collect(),
            // Indexed collect: slot i always holds profile i's outcome.
            Scheduler::Parallel(pool) => pool.install(|| profiles.par_iter().map(job).collect()),
        }
    }
}

// ============================================================================
// ORCHESTRATION
// ============================================================================

/// Encodes every input of `request` into every profile of `config`.
///
/// # Arguments
///
/// * `invoker` - Runs the external encoder
/// * `config` - Validated run configuration
/// * `request` - Inputs, output directory and layout
/// * `events` - Receives progress and lifecycle events as they happen
/// * `cancel` - Stops dispatching new work once cancelled
///
/// # Returns
///
/// * `Ok(Vec<InputSummary>)` - One summary per input, in request order
/// * `Err(CoreError)` - A configuration error; no job was started
pub fn encode_inputs<I>(
    invoker: &I,
    config: &CoreConfig,
    request: &EncodeRequest,
    events: &EventDispatcher,
    cancel: &CancellationToken,
) -> CoreResult<Vec<InputSummary>>
where
    I: TranscodeInvoker + ?Sized,
{
    config.validate()?;
    request.validate()?;
    let roots = request.output_roots()?;
    let scheduler = Scheduler::for_config(config)?;

    let run_started = Instant::now();
    log::info!(
        "Encoding {} input(s) into {} profile(s) ({} jobs, {} worker(s))",
        request.inputs.len(),
        config.profiles.len(),
        config.concurrency,
        config.worker_count()
    );
    events.emit(Event::RunStarted {
        inputs: request.inputs.len(),
        profiles: config.profiles.len(),
        concurrency: config.concurrency,
        output_dir: request.output_dir.clone(),
    });

    let total = request.inputs.len();
    let mut summaries = Vec::with_capacity(total);
    for (index, (input, output_root)) in request.inputs.iter().zip(roots).enumerate() {
        let summary = if cancel.is_cancelled() {
            cancelled_input(input, output_root, events)
        } else {
            encode_single_input(invoker, config, input, output_root, index + 1, total, &scheduler, events, cancel)
        };
        summaries.push(summary);
    }

    let succeeded_inputs = summaries.iter().filter(|s| s.is_success()).count();
    events.emit(Event::RunComplete {
        inputs: total,
        succeeded_inputs,
        cancelled: cancel.is_cancelled(),
        total_time: run_started.elapsed(),
    });

    Ok(summaries)
}

fn cancelled_input(input: &Path, output_root: PathBuf, events: &EventDispatcher) -> InputSummary {
    events.emit(Event::InputFailed {
        input: input.to_path_buf(),
        reason: CANCELLED_REASON.to_string(),
    });
    InputSummary {
        input: input.to_path_buf(),
        output_root,
        status: InputStatus::Cancelled,
        outcomes: Vec::new(),
    }
}

#[allow(clippy::too_many_arguments)]
fn encode_single_input<I>(
    invoker: &I,
    config: &CoreConfig,
    input: &Path,
    output_root: PathBuf,
    index: usize,
    total: usize,
    scheduler: &Scheduler,
    events: &EventDispatcher,
    cancel: &CancellationToken,
) -> InputSummary
where
    I: TranscodeInvoker + ?Sized,
{
    let failed = |output_root: PathBuf, reason: String, outcomes: Vec<JobOutcome>| {
        events.emit(Event::InputFailed {
            input: input.to_path_buf(),
            reason: reason.clone(),
        });
        InputSummary {
            input: input.to_path_buf(),
            output_root,
            status: InputStatus::Failed(reason),
            outcomes,
        }
    };

    events.emit(Event::InputStarted {
        input: input.to_path_buf(),
        index,
        total,
        output_root: output_root.clone(),
    });

    if !input.is_file() {
        let reason = CoreError::InputNotFound(input.to_path_buf()).to_string();
        return failed(output_root, reason, Vec::new());
    }
    if let Err(e) = std::fs::create_dir_all(&output_root) {
        let reason = format!("Failed to create {}: {}", output_root.display(), e);
        return failed(output_root, reason, Vec::new());
    }

    let outcomes = scheduler.run_all(config.profiles.profiles(), |profile| {
        if cancel.is_cancelled() {
            return skipped_job(input, profile, events);
        }
        run_profile_job(invoker, config, input, profile, &output_root, events)
    });

    let succeeded = outcomes.iter().filter(|o| o.is_success()).count();
    let failed_jobs = outcomes.len() - succeeded;

    let status = match write_master_playlist(&output_root, &outcomes) {
        Ok(path) => {
            events.emit(Event::MasterPlaylistWritten {
                input: input.to_path_buf(),
                path: path.clone(),
                variants: succeeded,
            });
            InputStatus::Completed {
                master_playlist: path,
            }
        }
        Err(e) => return failed(output_root, e.to_string(), outcomes),
    };

    events.emit(Event::InputFinished {
        input: input.to_path_buf(),
        output_root: output_root.clone(),
        succeeded,
        failed: failed_jobs,
    });

    InputSummary {
        input: input.to_path_buf(),
        output_root,
        status,
        outcomes,
    }
}

fn skipped_job(input: &Path, profile: &EncodingProfile, events: &EventDispatcher) -> JobOutcome {
    events.emit(Event::JobFailed {
        input: input.to_path_buf(),
        profile: profile.name.clone(),
        reason: CANCELLED_REASON.to_string(),
        elapsed: Duration::ZERO,
    });
    JobOutcome::failed(profile.clone(), CANCELLED_REASON, Duration::ZERO)
}
