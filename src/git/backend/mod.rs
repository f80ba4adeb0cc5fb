// autocommit-rs: Scheduled mutate-and-commit loop
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Git backend abstraction layer.
//!
//! ```text
//! GitQuery (read)        --> GixBackend (pure Rust gix)
//! VersionControl (write) --> GitClient  (git CLI, async)
//! ```

use futures_util::future::BoxFuture;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::{debug, warn};

use super::cmd;
use crate::config::types::GitConfig;
use crate::core::process::builder::{ProcessBuilder, ProcessFlags};
use crate::error::{GitError, GitResult, ProcessError};

// --- Query Trait (Read-only operations) ---

/// Read-only git query operations.
pub trait GitQuery {
    /// Check if path is inside a git work tree.
    fn is_git_repo(path: &Path) -> bool;

    /// Absolute root of the work tree containing `path`.
    ///
    /// # Errors
    ///
    /// Returns `GitError::RepoNotFound` if `path` is not inside a non-bare
    /// repository.
    fn work_tree(path: &Path) -> GitResult<PathBuf>;

    /// Absolute path of the `.git` directory for the repository at `path`.
    ///
    /// # Errors
    ///
    /// Returns `GitError::RepoNotFound` if no repository is found.
    fn git_dir(path: &Path) -> GitResult<PathBuf>;

    /// Get current branch name (None if HEAD is detached).
    ///
    /// # Errors
    ///
    /// Returns a `GitError` if repository discovery or head resolution fails.
    fn current_branch(path: &Path) -> GitResult<Option<String>>;

    /// Check for uncommitted changes (staged, unstaged, or untracked files).
    ///
    /// # Errors
    ///
    /// Returns a `GitError` if repository discovery or status check fails.
    fn has_uncommitted_changes(path: &Path) -> GitResult<bool>;
}

// --- VersionControl Trait (Write operations) ---

/// The three repository operations a cycle needs.
///
/// Methods return `BoxFuture` so implementations can be shared as
/// `Arc<dyn VersionControl>` across spawned tasks.
pub trait VersionControl: Send + Sync {
    /// Stage every change in the work tree.
    fn stage_all(&self) -> BoxFuture<'_, GitResult<()>>;

    /// Record the staged changes; fails if nothing is staged.
    fn commit<'a>(&'a self, message: &'a str) -> BoxFuture<'a, GitResult<()>>;

    /// Publish local commits to the remote.
    fn push(&self) -> BoxFuture<'_, GitResult<()>>;
}

// --- GixBackend Implementation (Pure Rust) ---

/// Pure Rust git backend using gix.
pub struct GixBackend;

impl GixBackend {
    fn discover(path: &Path) -> GitResult<gix::Repository> {
        let not_found = || GitError::RepoNotFound {
            path: path.display().to_string(),
        };
        let canonical = std::fs::canonicalize(path).map_err(|_| not_found())?;
        gix::discover(canonical).map_err(|_| not_found())
    }
}

impl GitQuery for GixBackend {
    fn is_git_repo(path: &Path) -> bool {
        Self::work_tree(path).is_ok()
    }

    fn work_tree(path: &Path) -> GitResult<PathBuf> {
        let repo = Self::discover(path)?;
        repo.workdir()
            .map(Path::to_path_buf)
            .ok_or_else(|| GitError::RepoNotFound {
                path: format!("{} (bare repository)", path.display()),
            })
    }

    fn git_dir(path: &Path) -> GitResult<PathBuf> {
        Ok(Self::discover(path)?.git_dir().to_path_buf())
    }

    fn current_branch(path: &Path) -> GitResult<Option<String>> {
        let repo = Self::discover(path)?;
        let head = repo.head_name().map_err(|e| GitError::CommandFailed {
            command: "resolve HEAD".to_string(),
            message: e.to_string(),
        })?;
        Ok(head.map(|name| name.shorten().to_string()))
    }

    fn has_uncommitted_changes(path: &Path) -> GitResult<bool> {
        use gix::status::UntrackedFiles;

        let status_failed = |message: &str| GitError::CommandFailed {
            command: "status".to_string(),
            message: message.to_string(),
        };

        let has_changes = Self::discover(path)?
            .status(gix::progress::Discard)
            .map_err(|_| status_failed("failed to prepare status check"))?
            .untracked_files(UntrackedFiles::Files)
            .into_iter(None)
            .map_err(|_| status_failed("failed to check repository status"))?
            .next()
            .is_some();

        Ok(has_changes)
    }
}

// --- GitClient Implementation (Git CLI) ---

/// Git CLI client bound to one work tree.
///
/// Every call runs `git` with the work tree root as its working directory,
/// `GCM_INTERACTIVE=never`, `GIT_TERMINAL_PROMPT=0`, captured output and a
/// timeout. A timed-out call is retried up to `retries` times.
#[derive(Debug, Clone)]
pub struct GitClient {
    program: PathBuf,
    work_tree: PathBuf,
    remote: Option<String>,
    branch: Option<String>,
    timeout: Duration,
    retries: u32,
}

impl GitClient {
    /// Bind a client to the repository containing `config.repo_dir`.
    ///
    /// # Errors
    ///
    /// Returns:
    /// - `GitError::RepoNotFound` if `repo_dir` is not inside a work tree.
    /// - `GitError::ExecutableNotFound` if `config.program` cannot be resolved.
    pub fn open(config: &GitConfig) -> GitResult<Self> {
        let work_tree = GixBackend::work_tree(&config.repo_dir)?;
        let program =
            ProcessBuilder::find(&config.program).ok_or_else(|| GitError::ExecutableNotFound {
                program: config.program.clone(),
            })?;

        match GixBackend::current_branch(&work_tree) {
            Ok(Some(branch)) => debug!(repo = %work_tree.display(), %branch, "opened repository"),
            Ok(None) => debug!(repo = %work_tree.display(), "opened repository (detached HEAD)"),
            Err(e) => debug!(repo = %work_tree.display(), error = %e, "opened repository"),
        }

        Ok(Self {
            program,
            work_tree,
            remote: config.remote.clone(),
            branch: config.branch.clone(),
            timeout: config.timeout(),
            retries: config.retries,
        })
    }

    /// Root of the work tree every command runs in.
    #[must_use]
    pub fn work_tree(&self) -> &Path {
        &self.work_tree
    }

    /// Run `git <args>`, retrying timeouts, and return trimmed stdout.
    ///
    /// # Errors
    ///
    /// Returns the last `GitError` once retries are exhausted, or the first
    /// non-retryable one.
    pub async fn git(&self, args: Vec<String>) -> GitResult<String> {
        let mut attempt = 0;
        loop {
            match self.git_once(&args).await {
                Err(e) if e.is_retryable() && attempt < self.retries => {
                    attempt += 1;
                    warn!(error = %e, attempt, retries = self.retries, "retrying git command");
                }
                result => return result,
            }
        }
    }

    async fn git_once(&self, args: &[String]) -> GitResult<String> {
        let command = cmd::display(args);
        let mut builder = ProcessBuilder::new(&self.program)
            .name("git")
            .args(args)
            .cwd(&self.work_tree)
            .flag(ProcessFlags::ALLOW_FAILURE)
            .capture_output()
            .timeout(self.timeout);
        for (key, value) in cmd::NON_INTERACTIVE_ENV {
            builder = builder.env(key, value);
        }

        let output = builder.run().await.map_err(|e| match e {
            ProcessError::Timeout { timeout_secs, .. } => GitError::Timeout {
                command: command.clone(),
                timeout_secs,
            },
            other => GitError::CommandFailed {
                command: command.clone(),
                message: other.to_string(),
            },
        })?;

        if !output.success() {
            // `git commit` reports "nothing to commit" on stdout
            let message = if output.stderr().trim().is_empty() {
                output.stdout().trim()
            } else {
                output.stderr().trim()
            };
            return Err(GitError::CommandFailed {
                command,
                message: if message.is_empty() {
                    format!("exited with code {}", output.exit_code())
                } else {
                    message.to_string()
                },
            });
        }
        Ok(output.stdout().trim().to_string())
    }
}

impl VersionControl for GitClient {
    fn stage_all(&self) -> BoxFuture<'_, GitResult<()>> {
        Box::pin(async move {
            self.git(cmd::stage_all_args()).await?;
            Ok(())
        })
    }

    fn commit<'a>(&'a self, message: &'a str) -> BoxFuture<'a, GitResult<()>> {
        Box::pin(async move {
            self.git(cmd::commit_args(message)).await?;
            Ok(())
        })
    }

    fn push(&self) -> BoxFuture<'_, GitResult<()>> {
        Box::pin(async move {
            let args = cmd::push_args(self.remote.as_deref(), self.branch.as_deref());
            self.git(args).await?;
            Ok(())
        })
    }
}
