// autocommit-rs: Scheduled mutate-and-commit loop
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Error handling module.
//!
//! ```text
//!           AutoCommitError (~24 bytes)
//!                     |
//!   +------+------+---+---+------+------+------+
//!   |      |      |       |      |      |      |
//!   v      v      v       v      v      v      v
//! Mutate  Git   Input   Config Process Cycle  Io/Other
//!  Box    Box    Box     Box    Box    Box    Box
//!
//! Sub-errors (unboxed internally):
//!   Mutation  Read, Write, Persist, InvalidUtf8
//!   Git       CommandFailed, Timeout, RepoNotFound, ExecutableNotFound
//!   Input     Empty, NotANumber, NotPositive
//!   Config    ParseError, InvalidValue
//!   Process   SpawnFailed, NonZeroExit, Timeout
//!   Cycle     AlreadyRunning, Lock
//! ```
//!
//! Iteration-scoped failures ([`MutationError`], [`GitError`]) never leave
//! the cycle as errors; they are recorded as outcomes of the iteration.

use std::path::PathBuf;

use thiserror::Error;

/// Convenience alias for `anyhow::Result`.
pub type Result<T> = anyhow::Result<T>;

/// Result type using [`AutoCommitError`].
pub type AutoCommitResult<T> = std::result::Result<T, AutoCommitError>;

/// Result type for version-control operations.
pub type GitResult<T> = std::result::Result<T, GitError>;

/// Top-level application error type.
///
/// All sub-errors are boxed to keep this enum at ~24 bytes on the stack.
#[derive(Debug, Error)]
pub enum AutoCommitError {
    /// Target file mutation failed.
    #[error("mutation error: {0}")]
    Mutation(#[from] Box<MutationError>),

    /// Git operation failed.
    #[error("git error: {0}")]
    Git(#[from] Box<GitError>),

    /// User input was rejected.
    #[error("invalid input: {0}")]
    InvalidInput(#[from] Box<InvalidInputError>),

    /// Configuration error.
    #[error("config error: {0}")]
    Config(#[from] Box<ConfigError>),

    /// Process execution error.
    #[error("process error: {0}")]
    Process(#[from] Box<ProcessError>),

    /// Cycle could not be started.
    #[error("cycle error: {0}")]
    Cycle(#[from] Box<CycleError>),

    /// I/O error.
    #[error("io error: {0}")]
    Io(Box<std::io::Error>),

    /// Generic error with message.
    #[error("{0}")]
    Other(Box<str>),
}

// --- From implementations for boxing ---

/// Macro to generate `From` implementations that box the source error.
macro_rules! impl_from_boxed {
    ($($error:ty => $variant:ident),+ $(,)?) => {
        $(
            impl From<$error> for AutoCommitError {
                fn from(err: $error) -> Self {
                    AutoCommitError::$variant(Box::new(err))
                }
            }
        )+
    };
}

impl_from_boxed! {
    MutationError => Mutation,
    GitError => Git,
    InvalidInputError => InvalidInput,
    ConfigError => Config,
    ProcessError => Process,
    CycleError => Cycle,
    std::io::Error => Io,
}

// --- Mutation Errors ---

/// Target file mutation errors (the FileIOError of a cycle iteration).
#[derive(Debug, Error)]
pub enum MutationError {
    /// Existing target could not be read.
    #[error("failed to read '{}': {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Existing target is not UTF-8 text.
    #[error("'{}' is not valid UTF-8 text", .path.display())]
    InvalidUtf8 { path: PathBuf },

    /// Writing the replacement content failed.
    #[error("failed to write '{}': {source}", .path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Renaming the replacement over the target failed.
    #[error("failed to replace '{}': {source}", .path.display())]
    Persist {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

// --- Git Errors ---

/// Git operation errors (the VcsError of a cycle iteration or run).
#[derive(Debug, Error)]
pub enum GitError {
    /// Path is not inside a git work tree.
    #[error("repository not found: {path}")]
    RepoNotFound { path: String },

    /// The git executable could not be located.
    #[error("git executable not found: '{program}'")]
    ExecutableNotFound { program: String },

    /// Git command exited unsuccessfully.
    #[error("git command failed: {command} - {message}")]
    CommandFailed { command: String, message: String },

    /// Git command did not finish in time.
    #[error("git command timed out after {timeout_secs}s: {command}")]
    Timeout { command: String, timeout_secs: u64 },
}

impl GitError {
    /// Whether repeating the same call may succeed.
    #[must_use]
    pub const fn is_retryable(&self) -> bool {
        matches!(self, Self::Timeout { .. })
    }
}

// --- Input Errors ---

/// Rejected repetition count from the interactive surface.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InvalidInputError {
    /// Nothing was entered.
    #[error("please enter a number of commits")]
    Empty,

    /// Input is not an integer.
    #[error("'{0}' is not a valid number of commits")]
    NotANumber(String),

    /// Input is zero or negative.
    #[error("number of commits must be greater than 0, got {0}")]
    NotPositive(i64),
}

// --- Config Errors ---

/// Configuration-related errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Failed to parse configuration sources.
    #[error("failed to parse config: {message}")]
    ParseError { message: String },

    /// Invalid configuration value.
    #[error("invalid value for '{key}' in section '[{section}]': {message}")]
    InvalidValue {
        section: String,
        key: String,
        message: String,
    },
}

// --- Process Errors ---

/// Process execution errors.
#[derive(Debug, Error)]
pub enum ProcessError {
    /// Executable not found in PATH.
    #[error("executable not found: '{name}' (not in PATH)")]
    ExecutableNotFound { name: String },

    /// Failed to spawn process.
    #[error("failed to spawn process '{command}': {source}")]
    SpawnFailed {
        command: String,
        #[source]
        source: std::io::Error,
    },

    /// Process exited with non-zero status.
    #[error("process '{command}' exited with code {code}")]
    NonZeroExit { command: String, code: i32 },

    /// Process timed out.
    #[error("process '{command}' timed out after {timeout_secs} seconds")]
    Timeout { command: String, timeout_secs: u64 },

    /// Failed while waiting on or talking to the process.
    #[error("failed to read output from process '{command}': {message}")]
    OutputError { command: String, message: String },
}

// --- Cycle Errors ---

/// Errors that prevent a cycle from starting.
#[derive(Debug, Error)]
pub enum CycleError {
    /// Another cycle holds the repository lock.
    #[error(
        "another cycle is already running; delete '{}' if no autocommit process is active",
        .path.display()
    )]
    AlreadyRunning { path: PathBuf },

    /// Lock file could not be created.
    #[error("failed to create lock file '{}': {source}", .path.display())]
    Lock {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

#[cfg(test)]
mod tests;
