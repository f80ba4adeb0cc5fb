// autocommit-rs: Scheduled mutate-and-commit loop
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Configuration section types.
//!
//! ```text
//! Config: GlobalConfig, TargetConfig, CycleConfig, GitConfig, ScheduleConfig
//!
//! TargetKind: DataFile (default, changes.txt) | SelfFile (src/main.rs)
//! PushMode:   Immediate | Batched (default) | Off
//! ```

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::error::ConfigError;
use crate::logging::LogLevel;

/// Which file the cycle mutates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TargetKind {
    /// A dedicated data file that only ever receives change lines.
    #[default]
    DataFile,
    /// The tool's own source file; change lines are written as comments.
    SelfFile,
}

impl TargetKind {
    /// Path used when `target.path` is not configured.
    #[must_use]
    pub fn default_path(self) -> &'static Path {
        match self {
            Self::DataFile => Path::new("changes.txt"),
            Self::SelfFile => Path::new("src/main.rs"),
        }
    }
}

impl std::fmt::Display for TargetKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::DataFile => write!(f, "data-file"),
            Self::SelfFile => write!(f, "self-file"),
        }
    }
}

impl std::str::FromStr for TargetKind {
    type Err = ConfigError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "data-file" | "data" => Ok(Self::DataFile),
            "self-file" | "self" => Ok(Self::SelfFile),
            _ => Err(ConfigError::InvalidValue {
                section: "target".to_string(),
                key: "kind".to_string(),
                message: format!("expected 'data-file' or 'self-file', got '{s}'"),
            }),
        }
    }
}

/// When commits are published to the remote.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PushMode {
    /// Push after every successful commit.
    Immediate,
    /// Push once after the loop when at least one commit succeeded.
    #[default]
    Batched,
    /// Never push; commits stay local.
    Off,
}

impl std::fmt::Display for PushMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Immediate => write!(f, "immediate"),
            Self::Batched => write!(f, "batched"),
            Self::Off => write!(f, "off"),
        }
    }
}

impl std::str::FromStr for PushMode {
    type Err = ConfigError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "immediate" => Ok(Self::Immediate),
            "batched" => Ok(Self::Batched),
            "off" | "none" => Ok(Self::Off),
            _ => Err(ConfigError::InvalidValue {
                section: "cycle".to_string(),
                key: "push_mode".to_string(),
                message: format!("expected 'immediate', 'batched', or 'off', got '{s}'"),
            }),
        }
    }
}

/// Global options.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct GlobalConfig {
    /// Log level for console output (0-6).
    pub output_log_level: LogLevel,
    /// Log level for file output (0-6).
    pub file_log_level: LogLevel,
    /// Optional log file; file logging is off when unset.
    pub log_file: Option<PathBuf>,
}

impl Default for GlobalConfig {
    fn default() -> Self {
        Self {
            output_log_level: LogLevel::INFO,
            file_log_level: LogLevel::TRACE,
            log_file: None,
        }
    }
}

/// The file mutated by each iteration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct TargetConfig {
    pub kind: TargetKind,
    /// Path relative to the repository root; defaults per [`TargetKind`].
    pub path: Option<PathBuf>,
    /// First line written when the target does not exist yet.
    pub default_line: String,
    /// Prefix for change lines in self-file mode.
    pub comment_prefix: String,
}

impl Default for TargetConfig {
    fn default() -> Self {
        Self {
            kind: TargetKind::DataFile,
            path: None,
            default_line: "change me multiple times.".to_string(),
            comment_prefix: "//".to_string(),
        }
    }
}

impl TargetConfig {
    /// Target path relative to the repository root.
    #[must_use]
    pub fn relative_path(&self) -> &Path {
        self.path
            .as_deref()
            .unwrap_or_else(|| self.kind.default_path())
    }
}

/// Repeat-mutate-commit loop options.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CycleConfig {
    /// Iterations per non-interactive run.
    pub count: u32,
    pub push_mode: PushMode,
    /// Keep going after a failed iteration instead of stopping.
    pub continue_on_error: bool,
    /// Pause between iterations, in milliseconds.
    pub delay_ms: u64,
}

impl Default for CycleConfig {
    fn default() -> Self {
        Self {
            count: 100,
            push_mode: PushMode::Batched,
            continue_on_error: true,
            delay_ms: 2000,
        }
    }
}

impl CycleConfig {
    #[must_use]
    pub const fn delay(&self) -> Duration {
        Duration::from_millis(self.delay_ms)
    }
}

/// Git executable and repository options.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct GitConfig {
    /// Executable name or path.
    pub program: String,
    /// Directory inside the repository to operate on.
    pub repo_dir: PathBuf,
    /// Remote to push to; plain `git push` when unset.
    pub remote: Option<String>,
    /// Branch to push; `HEAD` when unset.
    pub branch: Option<String>,
    /// Per-command timeout in seconds.
    pub timeout_secs: u64,
    /// Extra attempts for a timed-out command.
    pub retries: u32,
}

impl Default for GitConfig {
    fn default() -> Self {
        Self {
            program: "git".to_string(),
            repo_dir: PathBuf::from("."),
            remote: None,
            branch: None,
            timeout_secs: 120,
            retries: 1,
        }
    }
}

impl GitConfig {
    #[must_use]
    pub const fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

/// Daily trigger options.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ScheduleConfig {
    /// Local wall-clock trigger time, `HH:MM`.
    pub at: String,
    /// Seconds between clock checks.
    pub poll_secs: u64,
}

impl Default for ScheduleConfig {
    fn default() -> Self {
        Self {
            at: "06:00".to_string(),
            poll_secs: 60,
        }
    }
}

impl ScheduleConfig {
    #[must_use]
    pub const fn poll_interval(&self) -> Duration {
        Duration::from_secs(self.poll_secs)
    }
}
