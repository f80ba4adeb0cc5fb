// autocommit-rs: Scheduled mutate-and-commit loop
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Target file mutation.
//!
//! ```text
//! append_change(n)
//!   read target (or default line) --> trim trailing whitespace
//!   ChangeRecord { n, Local::now(), rand 1000..=9999 }
//!   render line:
//!     data-file  "Change #{n}: {ts} - Random: {tag}"
//!     self-file  "{prefix} Auto-generated comment {n}: {ts} - Random: {tag}"
//!   NamedTempFile::new_in(dir) <- content + "\n" + line
//!   persist (rename over target)
//! ```
//!
//! The target is never truncated in place: a failed write leaves the
//! previous content untouched.

use anyhow::Context;
use chrono::{DateTime, Local, NaiveDateTime};
use rand::Rng;
use regex::Regex;
use serde::Serialize;
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};

use crate::config::types::{TargetConfig, TargetKind};
use crate::error::{MutationError, Result};
use crate::git::cmd::TIMESTAMP_FORMAT;

/// Inclusive range of the random tag on every change line.
pub const TAG_RANGE: std::ops::RangeInclusive<u16> = 1000..=9999;

/// One appended change line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ChangeRecord {
    pub sequence: u32,
    /// Local wall-clock time, `%Y-%m-%d %H:%M:%S`.
    pub timestamp: String,
    pub tag: u16,
}

impl ChangeRecord {
    #[must_use]
    pub fn new(sequence: u32, at: &DateTime<Local>, tag: u16) -> Self {
        Self {
            sequence,
            timestamp: at.format(TIMESTAMP_FORMAT).to_string(),
            tag,
        }
    }

    /// Record for `sequence` stamped now with a random tag.
    #[must_use]
    pub fn generate(sequence: u32) -> Self {
        let tag = rand::thread_rng().gen_range(TAG_RANGE);
        Self::new(sequence, &Local::now(), tag)
    }

    /// The line written to a target of `kind`.
    #[must_use]
    pub fn render(&self, kind: TargetKind, comment_prefix: &str) -> String {
        match kind {
            TargetKind::DataFile => format!(
                "Change #{}: {} - Random: {}",
                self.sequence, self.timestamp, self.tag
            ),
            TargetKind::SelfFile => format!(
                "{comment_prefix} Auto-generated comment {}: {} - Random: {}",
                self.sequence, self.timestamp, self.tag
            ),
        }
    }
}

/// Appends one change line per call.
pub trait Mutator: Send + Sync {
    /// Append the line for `sequence` and return what was written.
    ///
    /// # Errors
    ///
    /// Returns a `MutationError` if the target cannot be read, is not UTF-8, or
    /// cannot be replaced.
    fn append_change(&self, sequence: u32) -> std::result::Result<ChangeRecord, MutationError>;
}

/// A text file that receives one change line per iteration.
#[derive(Debug, Clone)]
pub struct TargetFile {
    path: PathBuf,
    kind: TargetKind,
    default_line: String,
    comment_prefix: String,
}

impl TargetFile {
    /// Data-file target at `path` with the default first line.
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        let defaults = TargetConfig::default();
        Self {
            path: path.into(),
            kind: TargetKind::DataFile,
            default_line: defaults.default_line,
            comment_prefix: defaults.comment_prefix,
        }
    }

    /// Target described by `config`, resolved against the work tree root.
    #[must_use]
    pub fn from_config(work_tree: &Path, config: &TargetConfig) -> Self {
        Self {
            path: work_tree.join(config.relative_path()),
            kind: config.kind,
            default_line: config.default_line.clone(),
            comment_prefix: config.comment_prefix.clone(),
        }
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    #[must_use]
    pub const fn kind(&self) -> TargetKind {
        self.kind
    }

    /// Current content with trailing whitespace removed, or the default line
    /// when the file does not exist.
    fn current_content(&self) -> std::result::Result<String, MutationError> {
        match std::fs::read(&self.path) {
            Ok(bytes) => {
                let text = String::from_utf8(bytes).map_err(|_| MutationError::InvalidUtf8 {
                    path: self.path.clone(),
                })?;
                Ok(text.trim_end().to_string())
            }
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(self.default_line.clone()),
            Err(source) => Err(MutationError::Read {
                path: self.path.clone(),
                source,
            }),
        }
    }

    /// Replace the target with `contents` through a sibling temp file.
    fn write_atomic(&self, contents: &str) -> std::result::Result<(), MutationError> {
        let write_err = |source| MutationError::Write {
            path: self.path.clone(),
            source,
        };

        let dir = match self.path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };
        std::fs::create_dir_all(dir).map_err(write_err)?;

        let mut tmp = tempfile::NamedTempFile::new_in(dir).map_err(write_err)?;
        tmp.write_all(contents.as_bytes()).map_err(write_err)?;
        tmp.as_file().sync_all().map_err(write_err)?;

        // Temp files are created 0600; keep the target's own mode.
        if let Ok(metadata) = std::fs::metadata(&self.path) {
            std::fs::set_permissions(tmp.path(), metadata.permissions()).map_err(write_err)?;
        }

        tmp.persist(&self.path).map_err(|e| MutationError::Persist {
            path: self.path.clone(),
            source: e.error,
        })?;
        Ok(())
    }

    /// Every change record currently in the file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read.
    pub fn read_records(&self) -> Result<Vec<ChangeRecord>> {
        let content = std::fs::read_to_string(&self.path)
            .with_context(|| format!("failed to read {}", self.path.display()))?;
        parse_records(&content)
    }
}

impl Mutator for TargetFile {
    fn append_change(&self, sequence: u32) -> std::result::Result<ChangeRecord, MutationError> {
        let content = self.current_content()?;
        let record = ChangeRecord::generate(sequence);
        let line = record.render(self.kind, &self.comment_prefix);
        self.write_atomic(&format!("{content}\n{line}"))?;
        Ok(record)
    }
}

/// Parse every change line in `content`, in file order.
///
/// Both data-file and self-file lines are recognised; other lines are
/// skipped.
///
/// # Errors
///
/// Returns an error if the line pattern fails to compile.
pub fn parse_records(content: &str) -> Result<Vec<ChangeRecord>> {
    let regex = Regex::new(
        r"(?:Change #|Auto-generated comment )(\d+): (\d{4}-\d{2}-\d{2} \d{2}:\d{2}:\d{2}) - Random: (\d{4})\s*$",
    )
    .with_context(|| "failed to compile change line regex")?;

    let records = content
        .lines()
        .filter_map(|line| regex.captures(line))
        .filter_map(|caps| {
            let sequence = caps.get(1)?.as_str().parse().ok()?;
            let timestamp = caps.get(2)?.as_str();
            NaiveDateTime::parse_from_str(timestamp, TIMESTAMP_FORMAT).ok()?;
            let tag = caps.get(3)?.as_str().parse().ok()?;
            Some(ChangeRecord {
                sequence,
                timestamp: timestamp.to_string(),
                tag,
            })
        })
        .collect();
    Ok(records)
}

#[cfg(test)]
mod tests;
