// autocommit-rs: Scheduled mutate-and-commit loop
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Git operations module.
//!
//! ```text
//!          cycle / cmd
//!            |      |
//!            v      v
//!   VersionControl  GitQuery
//!     (async write)  (read)
//!            |        |
//!            v        v
//!       GitClient   GixBackend
//!       .stage_all  .is_git_repo
//!       .commit     .work_tree / .git_dir
//!       .push       .current_branch
//!            |      .has_uncommitted_changes
//!            v
//!    cmd.rs argument vectors
//!            |
//!            v
//!    ProcessBuilder("git") + timeout + retry
//! ```
//!
//! **`GixBackend`**: pure Rust, no subprocess, read-only.
//! **`GitClient`**: git CLI for everything that writes, so hooks, signing and
//! credential helpers behave exactly as they do for a user at the terminal.

pub mod backend;
pub mod cmd;

pub use backend::{GitClient, GitQuery, GixBackend, VersionControl};

#[cfg(test)]
mod tests;
