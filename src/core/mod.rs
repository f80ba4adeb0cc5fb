// autocommit-rs: Scheduled mutate-and-commit loop
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Core runtime helpers.
//!
//! ```text
//!      core
//!       |
//!       v
//!    process
//!       |
//!   Builder -> tokio::process::Command
//!   Output { exit_code, stdout, stderr }
//! ```

pub mod process;
