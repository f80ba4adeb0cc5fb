// autocommit-rs: Scheduled mutate-and-commit loop
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! The repeat-mutate-commit loop.
//!
//! ```text
//! CommitCycle::run(total, token)
//!   for i in 1..=total:
//!     token cancelled? --> stop (cancelled)
//!     append_change(i) --> MutationFailed
//!     stage_all + commit("Auto-commit #i - ts") --> CommitFailed
//!     [immediate] push --> PushFailed
//!     completed += 1 (only if all succeeded)
//!     emit Progress{i, completed, total} + Log
//!     failure && strict --> stop (aborted)
//!     sleep(delay) | token cancelled   (not after the last)
//!   [batched && completed > 0] push once --> PushOutcome
//!   --> CycleSummary --> RunStatus --> exit code
//! ```
//!
//! Cancellation is only observed before an iteration and during the delay;
//! an iteration that has started always runs to the end.

pub mod lock;


use bon::Builder;
use chrono::Local;
use serde::Serialize;
use std::num::NonZeroU32;
use std::sync::Arc;
use std::time::Duration;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

use crate::config::types::{CycleConfig, PushMode};
use crate::git::VersionControl;
use crate::git::cmd::commit_message;
use crate::mutate::Mutator;

/// Per-run behaviour of a [`CommitCycle`].
#[derive(Debug, Clone, Builder)]
pub struct CycleOptions {
    #[builder(default)]
    push_mode: PushMode,
    /// Keep going after a failed iteration.
    #[builder(default = true)]
    continue_on_error: bool,
    /// Pause between iterations.
    #[builder(default = Duration::from_secs(2))]
    delay: Duration,
}

impl Default for CycleOptions {
    fn default() -> Self {
        Self::builder().build()
    }
}

impl CycleOptions {
    #[must_use]
    pub fn from_config(config: &CycleConfig) -> Self {
        Self::builder()
            .push_mode(config.push_mode)
            .continue_on_error(config.continue_on_error)
            .delay(config.delay())
            .build()
    }

    #[must_use]
    pub const fn push_mode(&self) -> PushMode {
        self.push_mode
    }

    #[must_use]
    pub const fn continue_on_error(&self) -> bool {
        self.continue_on_error
    }

    #[must_use]
    pub const fn delay(&self) -> Duration {
        self.delay
    }
}

/// Progress notifications for a presentation layer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CycleEvent {
    /// Iteration `current` of `total` has finished, successfully or not;
    /// `completed` of them succeeded so far.
    Progress {
        current: u32,
        completed: u32,
        total: u32,
    },
    /// Human-readable status line.
    Log(String),
}

/// Result of one iteration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum IterationOutcome {
    Committed { sequence: u32 },
    MutationFailed { sequence: u32, message: String },
    CommitFailed { sequence: u32, message: String },
    PushFailed { sequence: u32, message: String },
}

impl IterationOutcome {
    #[must_use]
    pub const fn sequence(&self) -> u32 {
        match self {
            Self::Committed { sequence }
            | Self::MutationFailed { sequence, .. }
            | Self::CommitFailed { sequence, .. }
            | Self::PushFailed { sequence, .. } => *sequence,
        }
    }

    #[must_use]
    pub const fn is_success(&self) -> bool {
        matches!(self, Self::Committed { .. })
    }
}

/// What happened to publishing at the end of the run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "push", rename_all = "snake_case")]
pub enum PushOutcome {
    /// Push mode is `off`.
    Disabled,
    /// Push mode is `immediate`; see the per-iteration outcomes.
    PerCommit,
    /// Batched mode with no successful commit.
    NothingToPush,
    /// Batched push succeeded.
    Pushed,
    /// Batched push failed; the commits exist only locally.
    Failed { message: String },
}

/// Overall verdict of a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RunStatus {
    /// Every requested iteration committed (and published if required).
    Success,
    /// Some iterations failed.
    Partial,
    /// No iteration succeeded.
    Failed,
    /// Commits were made but the batched push failed.
    Unpublished,
    /// Stopped before all iterations ran.
    Cancelled,
}

impl RunStatus {
    /// Process exit code for the non-interactive binary.
    #[must_use]
    pub const fn exit_code(self) -> u8 {
        match self {
            Self::Success => 0,
            Self::Partial | Self::Failed => 2,
            Self::Unpublished => 3,
            Self::Cancelled => 130,
        }
    }
}

impl std::fmt::Display for RunStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Success => write!(f, "success"),
            Self::Partial => write!(f, "partial"),
            Self::Failed => write!(f, "failed"),
            Self::Unpublished => write!(f, "unpublished"),
            Self::Cancelled => write!(f, "cancelled"),
        }
    }
}

/// Mutable progress of a running cycle.
#[derive(Debug, Clone)]
pub struct CycleState {
    requested: u32,
    completed: u32,
    running: bool,
    outcomes: Vec<IterationOutcome>,
}

impl CycleState {
    fn start(requested: NonZeroU32) -> Self {
        Self {
            requested: requested.get(),
            completed: 0,
            running: true,
            outcomes: Vec::with_capacity(requested.get() as usize),
        }
    }

    fn record(&mut self, outcome: IterationOutcome) {
        if outcome.is_success() {
            self.completed += 1;
        }
        self.outcomes.push(outcome);
    }

    #[must_use]
    pub const fn requested(&self) -> u32 {
        self.requested
    }

    #[must_use]
    pub const fn completed(&self) -> u32 {
        self.completed
    }

    #[must_use]
    pub const fn is_running(&self) -> bool {
        self.running
    }

    fn finish(mut self, cancelled: bool, aborted: bool, push: PushOutcome) -> CycleSummary {
        self.running = false;
        CycleSummary {
            requested: self.requested,
            attempted: u32::try_from(self.outcomes.len()).unwrap_or(u32::MAX),
            succeeded: self.completed,
            cancelled,
            aborted,
            outcomes: self.outcomes,
            push,
        }
    }
}

/// Final report of a cycle.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CycleSummary {
    pub requested: u32,
    /// Iterations started (each appended at most one line).
    pub attempted: u32,
    pub succeeded: u32,
    /// Stopped by the cancellation token.
    pub cancelled: bool,
    /// Stopped by a failure in strict mode.
    pub aborted: bool,
    pub outcomes: Vec<IterationOutcome>,
    pub push: PushOutcome,
}

impl CycleSummary {
    #[must_use]
    pub const fn status(&self) -> RunStatus {
        if matches!(self.push, PushOutcome::Failed { .. }) {
            RunStatus::Unpublished
        } else if self.cancelled {
            RunStatus::Cancelled
        } else if self.succeeded == self.requested {
            RunStatus::Success
        } else if self.succeeded == 0 {
            RunStatus::Failed
        } else {
            RunStatus::Partial
        }
    }

    /// One-line summary, e.g. `succeeded=3/3 status=success`.
    #[must_use]
    pub fn headline(&self) -> String {
        format!(
            "succeeded={}/{} status={}",
            self.succeeded,
            self.requested,
            self.status()
        )
    }
}

/// Receives [`CycleEvent`]s as the cycle runs.
pub type EventSink = Box<dyn Fn(CycleEvent) + Send + Sync>;

/// Runs N iterations of mutate → stage → commit → [push].
pub struct CommitCycle {
    mutator: Arc<dyn Mutator>,
    vcs: Arc<dyn VersionControl>,
    options: CycleOptions,
    sink: Option<EventSink>,
}

impl CommitCycle {
    #[must_use]
    pub fn new(
        mutator: Arc<dyn Mutator>,
        vcs: Arc<dyn VersionControl>,
        options: CycleOptions,
    ) -> Self {
        Self {
            mutator,
            vcs,
            options,
            sink: None,
        }
    }

    /// Also send [`CycleEvent`]s to `tx`.
    #[must_use]
    pub fn with_events(self, tx: flume::Sender<CycleEvent>) -> Self {
        // A dropped receiver only means nobody is watching.
        self.with_event_sink(move |event| {
            let _ = tx.send(event);
        })
    }

    /// Call `sink` with every [`CycleEvent`].
    #[must_use]
    pub fn with_event_sink(mut self, sink: impl Fn(CycleEvent) + Send + Sync + 'static) -> Self {
        self.sink = Some(Box::new(sink));
        self
    }

    #[must_use]
    pub const fn options(&self) -> &CycleOptions {
        &self.options
    }

    fn emit(&self, event: CycleEvent) {
        if let Some(sink) = &self.sink {
            sink(event);
        }
    }

    fn log(&self, line: String) {
        self.emit(CycleEvent::Log(line));
    }

    /// Run `total` iterations, stopping early if `token` is cancelled.
    ///
    /// Failures never escape as errors; they are recorded in the summary.
    pub async fn run(&self, total: NonZeroU32, token: CancellationToken) -> CycleSummary {
        let total_n = total.get();
        let mut state = CycleState::start(total);
        let mut cancelled = false;
        let mut aborted = false;

        info!(
            total = total_n,
            push_mode = %self.options.push_mode,
            continue_on_error = self.options.continue_on_error,
            "starting commit cycle"
        );
        self.log(format!("Starting commit cycle ({total_n} commits)"));

        for sequence in 1..=total_n {
            if token.is_cancelled() {
                cancelled = true;
                break;
            }

            let outcome = self.iteration(sequence, total_n).await;
            let failed = !outcome.is_success();
            state.record(outcome);
            self.emit(CycleEvent::Progress {
                current: sequence,
                completed: state.completed(),
                total: total_n,
            });

            if failed && !self.options.continue_on_error {
                aborted = true;
                warn!(sequence, "stopping after failed iteration");
                self.log(format!("Stopping after failed commit #{sequence}"));
                break;
            }

            if sequence < total_n && !self.options.delay.is_zero() {
                tokio::select! {
                    () = token.cancelled() => {}
                    () = tokio::time::sleep(self.options.delay) => {}
                }
            }
        }

        if cancelled {
            info!(completed = state.completed(), "commit cycle cancelled");
            self.log(format!(
                "Stopped by request after {} commits",
                state.completed()
            ));
        }

        let push = self.finish_push(state.completed()).await;
        let summary = state.finish(cancelled, aborted, push);

        info!(
            requested = summary.requested,
            attempted = summary.attempted,
            succeeded = summary.succeeded,
            status = %summary.status(),
            "commit cycle finished"
        );
        self.log(format!(
            "Commit cycle finished: {}/{} commits completed",
            summary.succeeded, summary.requested
        ));
        summary
    }

    async fn iteration(&self, sequence: u32, total: u32) -> IterationOutcome {
        if let Err(e) = self.mutator.append_change(sequence) {
            warn!(sequence, error = %e, "failed to modify target");
            self.log(format!("Commit #{sequence}: failed to modify target: {e}"));
            return IterationOutcome::MutationFailed {
                sequence,
                message: e.to_string(),
            };
        }

        let message = commit_message(sequence, &Local::now());
        let committed = match self.vcs.stage_all().await {
            Ok(()) => self.vcs.commit(&message).await,
            Err(e) => Err(e),
        };
        if let Err(e) = committed {
            warn!(sequence, error = %e, "commit failed");
            self.log(format!("Commit #{sequence}: {e}"));
            return IterationOutcome::CommitFailed {
                sequence,
                message: e.to_string(),
            };
        }

        if self.options.push_mode == PushMode::Immediate
            && let Err(e) = self.vcs.push().await
        {
            warn!(sequence, error = %e, "push failed");
            self.log(format!("Commit #{sequence}: push failed: {e}"));
            return IterationOutcome::PushFailed {
                sequence,
                message: e.to_string(),
            };
        }

        info!(sequence, total, "committed");
        self.log(format!("Commit #{sequence}/{total} completed"));
        IterationOutcome::Committed { sequence }
    }

    /// The single batched push; also runs after a cancelled or aborted loop.
    async fn finish_push(&self, completed: u32) -> PushOutcome {
        match self.options.push_mode {
            PushMode::Off => PushOutcome::Disabled,
            PushMode::Immediate => PushOutcome::PerCommit,
            PushMode::Batched if completed == 0 => PushOutcome::NothingToPush,
            PushMode::Batched => {
                info!(commits = completed, "pushing batched commits");
                self.log(format!("Pushing {completed} commits"));
                match self.vcs.push().await {
                    Ok(()) => {
                        self.log("Push completed".to_string());
                        PushOutcome::Pushed
                    }
                    Err(e) => {
                        warn!(error = %e, "batched push failed; commits remain local");
                        self.log(format!("Push failed: {e}"));
                        PushOutcome::Failed {
                            message: e.to_string(),
                        }
                    }
                }
            }
        }
    }
}
