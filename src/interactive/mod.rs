// autocommit-rs: Scheduled mutate-and-commit loop
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Interactive runs with a user-chosen repetition count.
//!
//! ```text
//! CountChoice::{Preset(n), Custom(text)}
//!        |
//!        v  parse_count (rejects before any side effect)
//! InteractiveController::start
//!        |  [CycleLock]  tokio::spawn(cycle.run(n, token))
//!        v
//!    RunHandle ---- events() --> flume::Receiver<UiEvent>
//!        |          stop()   --> token.cancel()
//!        |          wait()   --> CycleSummary
//!        v
//!  presentation loop drains UiEvent into a Panel
//! ```

pub mod panel;


use anyhow::Context;
use std::num::NonZeroU32;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::info;

use crate::cycle::lock::CycleLock;
use crate::cycle::{CommitCycle, CycleEvent, CycleOptions, CycleSummary};
use crate::error::{AutoCommitResult, InvalidInputError, Result};
use crate::git::VersionControl;
use crate::mutate::Mutator;

/// Counts offered as one-click choices.
pub const PRESETS: [u32; 3] = [10, 20, 30];

/// Initial value of the free-form count.
pub const DEFAULT_CUSTOM_COUNT: u32 = 50;

/// Parse a free-form repetition count.
///
/// # Errors
///
/// Returns `InvalidInputError` for empty, non-numeric, zero or negative input.
pub fn parse_count(input: &str) -> std::result::Result<NonZeroU32, InvalidInputError> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return Err(InvalidInputError::Empty);
    }
    let value: i64 = trimmed
        .parse()
        .map_err(|_| InvalidInputError::NotANumber(trimmed.to_string()))?;
    if value <= 0 {
        return Err(InvalidInputError::NotPositive(value));
    }
    u32::try_from(value)
        .ok()
        .and_then(NonZeroU32::new)
        .ok_or_else(|| InvalidInputError::NotANumber(trimmed.to_string()))
}

/// The user's selection in the count selector.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CountChoice {
    Preset(u32),
    Custom(String),
}

impl CountChoice {
    /// The validated repetition count.
    ///
    /// # Errors
    ///
    /// Returns `InvalidInputError` if the count is not a positive integer.
    pub fn resolve(&self) -> std::result::Result<NonZeroU32, InvalidInputError> {
        match self {
            Self::Preset(n) => NonZeroU32::new(*n).ok_or(InvalidInputError::NotPositive(0)),
            Self::Custom(text) => parse_count(text),
        }
    }
}

impl Default for CountChoice {
    fn default() -> Self {
        Self::Preset(PRESETS[0])
    }
}

/// Messages from a running cycle to the presentation loop.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UiEvent {
    Progress {
        current: u32,
        completed: u32,
        total: u32,
    },
    Log(String),
    /// Always the last event of a run.
    Finished(CycleSummary),
}

impl From<CycleEvent> for UiEvent {
    fn from(event: CycleEvent) -> Self {
        match event {
            CycleEvent::Progress {
                current,
                completed,
                total,
            } => Self::Progress {
                current,
                completed,
                total,
            },
            CycleEvent::Log(line) => Self::Log(line),
        }
    }
}

/// Starts cycles on a background task for an interactive surface.
pub struct InteractiveController {
    mutator: Arc<dyn Mutator>,
    vcs: Arc<dyn VersionControl>,
    options: CycleOptions,
    lock_dir: Option<PathBuf>,
}

impl InteractiveController {
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
            lock_dir: None,
        }
    }

    /// Hold a [`CycleLock`] in `git_dir` while each run is active.
    #[must_use]
    pub fn with_lock_dir(mut self, git_dir: impl AsRef<Path>) -> Self {
        self.lock_dir = Some(git_dir.as_ref().to_path_buf());
        self
    }

    /// Validate `choice` and start a cycle on a new tokio task.
    ///
    /// Must be called from within a tokio runtime.
    ///
    /// # Errors
    ///
    /// Returns `AutoCommitError::InvalidInput` for a bad count (nothing is
    /// started or modified), or `AutoCommitError::Cycle` if another cycle
    /// holds the repository lock.
    pub fn start(&self, choice: &CountChoice) -> AutoCommitResult<RunHandle> {
        let total = choice.resolve()?;
        let lock = self
            .lock_dir
            .as_deref()
            .map(CycleLock::acquire)
            .transpose()?;

        let (tx, rx) = flume::unbounded();
        let token = CancellationToken::new();

        let sink_tx = tx.clone();
        let cycle = CommitCycle::new(
            Arc::clone(&self.mutator),
            Arc::clone(&self.vcs),
            self.options.clone(),
        )
        .with_event_sink(move |event| {
            let _ = sink_tx.send(UiEvent::from(event));
        });

        info!(total = total.get(), "starting interactive run");
        let run_token = token.clone();
        let task = tokio::spawn(async move {
            let summary = cycle.run(total, run_token).await;
            drop(lock);
            let _ = tx.send(UiEvent::Finished(summary.clone()));
            summary
        });

        Ok(RunHandle {
            total,
            events: rx,
            token,
            task,
        })
    }
}

/// Control surface of one running cycle.
pub struct RunHandle {
    total: NonZeroU32,
    events: flume::Receiver<UiEvent>,
    token: CancellationToken,
    task: JoinHandle<CycleSummary>,
}

impl RunHandle {
    /// Iterations requested for this run.
    #[must_use]
    pub const fn total(&self) -> NonZeroU32 {
        self.total
    }

    /// Events in emission order; ends with [`UiEvent::Finished`].
    #[must_use]
    pub const fn events(&self) -> &flume::Receiver<UiEvent> {
        &self.events
    }

    /// Ask the cycle to stop at the next iteration boundary.
    pub fn stop(&self) {
        self.token.cancel();
    }

    #[must_use]
    pub fn is_stopping(&self) -> bool {
        self.token.is_cancelled()
    }

    /// Wait for the cycle to end.
    ///
    /// # Errors
    ///
    /// Returns an error if the cycle task panicked.
    pub async fn wait(self) -> Result<CycleSummary> {
        self.task.await.context("commit cycle task failed")
    }
}
