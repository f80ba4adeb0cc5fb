// autocommit-rs: Scheduled mutate-and-commit loop
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Async process spawning.
//!
//! ```text
//! ProcessBuilder::new("git")
//!   .args() .cwd() .env() .capture_output() .timeout()
//!   .run()
//!       --> tokio::process::Command (no shell, kill_on_drop)
//!           stream stdout/stderr (trace! per line)
//!           select! { wait, sleep(timeout) }
//!       --> ProcessOutput { exit_code, stdout, stderr }
//! ```
//!
//! A running process is never interrupted by cancellation; only the
//! timeout kills it.

pub mod builder;
mod io;
mod runner;
