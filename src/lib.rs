// autocommit-rs: Scheduled mutate-and-commit loop
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Library root.
//!
//! # Crate Architecture
//!
//! ```text
//!            main.rs                 bin/autocommit_ui.rs
//!               |                            |
//!        +------+------+                     |
//!        v             v                     v
//!     cli (clap)   cmd (handlers) <---- cmd::interactive
//!                      |                     |
//!      ,---------------+-------------,       v
//!      |            config           |  interactive
//!      |   TOML, env, layered        |  controller, panel
//!      '--+--------+----------+------'       |
//!         |        |          |              |
//!         v        v          v              |
//!     schedule   cycle  <-----+--------------'
//!     daily     N x mutate/commit/push
//!     trigger      |          |
//!                  v          v
//!               mutate       git
//!             atomic file   gix query,
//!               append      git CLI
//!
//!   +-----------------------------------------+
//!   |  core     async process runner          |
//!   +-----------------------------------------+
//!   |  foundation   error, logging            |
//!   +-----------------------------------------+
//! ```

pub mod cli;
pub mod cmd;
pub mod config;
pub mod core;
pub mod cycle;
pub mod error;
pub mod git;
pub mod interactive;
pub mod logging;
pub mod mutate;
pub mod schedule;
