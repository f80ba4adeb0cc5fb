// autocommit-rs: Scheduled mutate-and-commit loop
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Git command lines issued by [`GitClient`](super::GitClient).
//!
//! ```text
//! stage_all  -> git add --all
//! commit     -> git commit --quiet -m <message>
//! push       -> git push [<remote> <branch|HEAD>]
//! ```

use chrono::{DateTime, Local};

/// Timestamp format shared by commit messages and change lines.
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Environment applied to every git invocation so a missing credential
/// fails instead of waiting for input.
pub const NON_INTERACTIVE_ENV: [(&str, &str); 2] =
    [("GCM_INTERACTIVE", "never"), ("GIT_TERMINAL_PROMPT", "0")];

#[must_use]
pub fn stage_all_args() -> Vec<String> {
    vec!["add".to_string(), "--all".to_string()]
}

#[must_use]
pub fn commit_args(message: &str) -> Vec<String> {
    vec![
        "commit".to_string(),
        "--quiet".to_string(),
        "-m".to_string(),
        message.to_string(),
    ]
}

/// `git push`, or `git push <remote> <branch>` when a remote is set.
///
/// Without an explicit branch the current `HEAD` is pushed, so the upstream
/// does not need to be configured.
#[must_use]
pub fn push_args(remote: Option<&str>, branch: Option<&str>) -> Vec<String> {
    let mut args = vec!["push".to_string()];
    if let Some(remote) = remote {
        args.push(remote.to_string());
        args.push(branch.unwrap_or("HEAD").to_string());
    }
    args
}

/// Commit message for iteration `sequence`: `Auto-commit #{n} - {timestamp}`.
#[must_use]
pub fn commit_message(sequence: u32, at: &DateTime<Local>) -> String {
    format!("Auto-commit #{sequence} - {}", at.format(TIMESTAMP_FORMAT))
}

/// `git <args>` as shown in logs and errors.
#[must_use]
pub fn display(args: &[String]) -> String {
    format!("git {}", args.join(" "))
}
