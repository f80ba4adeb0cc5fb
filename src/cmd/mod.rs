// autocommit-rs: Scheduled mutate-and-commit loop
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Command implementations.
//!
//! ```text
//! CLI args --> settings::load_config --> Workspace::open
//!                                            |
//!                      +---------------------+--------------------+
//!                      v                     v                    v
//!               run::run_now       schedule::run_schedule   interactive::run
//!                      |                     |                    |
//!                      +------ interrupt_token (Ctrl+C/SIGTERM) --+
//! ```

pub mod interactive;
pub mod run;
pub mod schedule;
pub mod settings;


use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

use crate::config::Config;
use crate::cycle::lock::CycleLock;
use crate::cycle::{CommitCycle, CycleOptions};
use crate::error::{CycleError, Result};
use crate::git::{GitClient, GitQuery, GixBackend, VersionControl};
use crate::mutate::{Mutator, TargetFile};

/// A repository opened for committing, with its target file.
pub struct Workspace {
    client: Arc<GitClient>,
    target: Arc<TargetFile>,
    git_dir: PathBuf,
}

impl Workspace {
    /// Open the repository named by `config.git` and resolve the target.
    ///
    /// Warns when the work tree already has changes: the first commit of a
    /// cycle stages everything.
    ///
    /// # Errors
    ///
    /// Returns an error if the repository or the git executable cannot be
    /// found.
    pub fn open(config: &Config) -> Result<Self> {
        let client = GitClient::open(&config.git)?;
        let git_dir = GixBackend::git_dir(client.work_tree())?;
        let target = TargetFile::from_config(client.work_tree(), &config.target);

        match GixBackend::has_uncommitted_changes(client.work_tree()) {
            Ok(true) => warn!(
                repo = %client.work_tree().display(),
                "work tree has uncommitted changes; they will be included in the first commit"
            ),
            Ok(false) => {}
            Err(e) => debug!(error = %e, "could not check work tree status"),
        }
        debug!(
            repo = %client.work_tree().display(),
            target = %target.path().display(),
            "workspace ready"
        );

        Ok(Self {
            client: Arc::new(client),
            target: Arc::new(target),
            git_dir,
        })
    }

    #[must_use]
    pub fn work_tree(&self) -> &Path {
        self.client.work_tree()
    }

    #[must_use]
    pub fn git_dir(&self) -> &Path {
        &self.git_dir
    }

    #[must_use]
    pub fn target(&self) -> &TargetFile {
        &self.target
    }

    #[must_use]
    pub fn mutator(&self) -> Arc<dyn Mutator> {
        self.target.clone()
    }

    #[must_use]
    pub fn vcs(&self) -> Arc<dyn VersionControl> {
        self.client.clone()
    }

    /// Take the single-run lock for this repository.
    ///
    /// # Errors
    ///
    /// Returns `CycleError::AlreadyRunning` if another cycle holds it.
    pub fn lock(&self) -> std::result::Result<CycleLock, CycleError> {
        CycleLock::acquire(&self.git_dir)
    }

    /// A cycle over this workspace with the configured options.
    #[must_use]
    pub fn cycle(&self, config: &Config) -> CommitCycle {
        CommitCycle::new(
            self.mutator(),
            self.vcs(),
            CycleOptions::from_config(&config.cycle),
        )
    }
}

/// A token cancelled on the first Ctrl+C (or SIGTERM on unix).
///
/// Must be called from within a tokio runtime.
#[must_use]
pub fn interrupt_token() -> CancellationToken {
    let token = CancellationToken::new();
    let watcher = token.clone();
    tokio::spawn(async move {
        if interrupted().await {
            warn!("Received interrupt, stopping after the current commit...");
            watcher.cancel();
        }
    });
    token
}

#[cfg(unix)]
async fn interrupted() -> bool {
    use tokio::signal::unix::{SignalKind, signal};

    let Ok(mut terminate) = signal(SignalKind::terminate()) else {
        return tokio::signal::ctrl_c().await.is_ok();
    };
    tokio::select! {
        result = tokio::signal::ctrl_c() => result.is_ok(),
        _ = terminate.recv() => true,
    }
}

#[cfg(not(unix))]
async fn interrupted() -> bool {
    tokio::signal::ctrl_c().await.is_ok()
}
