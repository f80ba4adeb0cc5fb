// autocommit-rs: Scheduled mutate-and-commit loop
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Configuration management for autocommit-rs.
//!
//! # Configuration Hierarchy
//!
//! ```text
//! Priority (low → high)
//! 1. defaults
//! 2. autocommit.toml (cwd, optional)
//! 3. --ini files
//! 4. AUTOCOMMIT_* env vars
//! 5. --set KEY=VALUE
//! 6. dedicated CLI flags
//! ```
//!
//! # Environment Variable Mapping
//!
//! ```text
//! AUTOCOMMIT_CYCLE__COUNT=3          → cycle.count = 3
//! AUTOCOMMIT_CYCLE__PUSH_MODE=off    → cycle.push_mode = "off"
//! AUTOCOMMIT_GIT__REMOTE=origin      → git.remote = "origin"
//! ```

pub mod loader;
pub mod types;


use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::num::NonZeroU32;
use std::path::Path;

use crate::error::{ConfigError, Result};
use crate::schedule::DailyTrigger;

use loader::ConfigLoader;
use types::{CycleConfig, GitConfig, GlobalConfig, ScheduleConfig, TargetConfig};

/// Name of the configuration file picked up from the working directory.
pub const LOCAL_CONFIG_FILE: &str = "autocommit.toml";

/// Prefix of configuration environment variables.
pub const ENV_PREFIX: &str = "AUTOCOMMIT";

/// Complete application configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Logging options.
    pub global: GlobalConfig,
    /// Mutated file.
    pub target: TargetConfig,
    /// Loop options.
    pub cycle: CycleConfig,
    /// Git options.
    pub git: GitConfig,
    /// Daily trigger options.
    pub schedule: ScheduleConfig,
}

impl Config {
    /// Create a new configuration builder.
    ///
    /// # Example
    ///
    /// ```no_run
    /// use autocommit_rs::config::Config;
    ///
    /// let config = Config::builder()
    ///     .add_toml_file_optional("autocommit.toml")
    ///     .with_env_prefix("AUTOCOMMIT")
    ///     .build()?;
    /// # Ok::<(), anyhow::Error>(())
    /// ```
    #[must_use]
    pub fn builder() -> ConfigLoader {
        ConfigLoader::new()
    }

    /// Load configuration from a single TOML file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read, contains invalid TOML, or
    /// fails validation.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        Self::builder().add_toml_file(path).build()
    }

    /// Load configuration from a TOML string.
    ///
    /// # Errors
    ///
    /// Returns an error if the content is not valid TOML or fails validation.
    pub fn parse(content: &str) -> Result<Self> {
        Self::builder().add_toml_str(content).build()
    }

    /// Check cross-field constraints that serde cannot express.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidValue` naming the first offending key.
    pub fn validate(&self) -> std::result::Result<(), ConfigError> {
        if self.cycle.count == 0 {
            return Err(invalid("cycle", "count", "must be at least 1"));
        }
        if self.schedule.poll_secs == 0 {
            return Err(invalid("schedule", "poll_secs", "must be at least 1"));
        }
        if self.git.timeout_secs == 0 {
            return Err(invalid("git", "timeout_secs", "must be at least 1"));
        }
        if self.git.program.trim().is_empty() {
            return Err(invalid("git", "program", "must not be empty"));
        }
        self.schedule.at.parse::<DailyTrigger>()?;
        Ok(())
    }

    /// Iterations per non-interactive run.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidValue` if `cycle.count` is zero.
    pub fn count(&self) -> std::result::Result<NonZeroU32, ConfigError> {
        NonZeroU32::new(self.cycle.count).ok_or_else(|| invalid("cycle", "count", "must be at least 1"))
    }

    /// Parsed daily trigger.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidValue` if `schedule.at` is not `HH:MM`.
    pub fn trigger(&self) -> std::result::Result<DailyTrigger, ConfigError> {
        self.schedule.at.parse()
    }

    /// Format configuration options for display, one `key = value` per line.
    ///
    /// Output is deterministically ordered using `BTreeMap`.
    #[must_use]
    pub fn format_options(&self) -> Vec<String> {
        let mut options = BTreeMap::new();
        let opt = |value: Option<String>| value.unwrap_or_default();

        options.insert(
            "global.output_log_level",
            self.global.output_log_level.as_u8().to_string(),
        );
        options.insert(
            "global.file_log_level",
            self.global.file_log_level.as_u8().to_string(),
        );
        options.insert(
            "global.log_file",
            opt(self.global.log_file.as_ref().map(|p| p.display().to_string())),
        );

        options.insert("target.kind", self.target.kind.to_string());
        options.insert(
            "target.path",
            self.target.relative_path().display().to_string(),
        );
        options.insert("target.default_line", self.target.default_line.clone());
        options.insert("target.comment_prefix", self.target.comment_prefix.clone());

        options.insert("cycle.count", self.cycle.count.to_string());
        options.insert("cycle.push_mode", self.cycle.push_mode.to_string());
        options.insert(
            "cycle.continue_on_error",
            self.cycle.continue_on_error.to_string(),
        );
        options.insert("cycle.delay_ms", self.cycle.delay_ms.to_string());

        options.insert("git.program", self.git.program.clone());
        options.insert("git.repo_dir", self.git.repo_dir.display().to_string());
        options.insert("git.remote", opt(self.git.remote.clone()));
        options.insert("git.branch", opt(self.git.branch.clone()));
        options.insert("git.timeout_secs", self.git.timeout_secs.to_string());
        options.insert("git.retries", self.git.retries.to_string());

        options.insert("schedule.at", self.schedule.at.clone());
        options.insert("schedule.poll_secs", self.schedule.poll_secs.to_string());

        let max_key_len = options.keys().map(|k| k.len()).max().unwrap_or(0);

        options
            .into_iter()
            .map(|(key, value)| format!("{key:<max_key_len$} = {value}"))
            .collect()
    }
}

fn invalid(section: &str, key: &str, message: &str) -> ConfigError {
    ConfigError::InvalidValue {
        section: section.to_string(),
        key: key.to_string(),
        message: message.to_string(),
    }
}
