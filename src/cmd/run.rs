// autocommit-rs: Scheduled mutate-and-commit loop
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! `--run-now`: one full cycle, then exit.

use tracing::info;

use super::{Workspace, interrupt_token};
use crate::config::Config;
use crate::cycle::RunStatus;
use crate::error::Result;

/// Run one cycle of `cycle.count` iterations and print its summary line.
///
/// # Errors
///
/// Returns an error if the repository cannot be opened or another cycle is
/// already running. Iteration failures are reported through the returned
/// [`RunStatus`] instead.
pub async fn run_now_command(config: &Config) -> Result<RunStatus> {
    let total = config.count()?;
    let workspace = Workspace::open(config)?;
    let lock = workspace.lock()?;
    info!(lock = %lock.path().display(), "acquired cycle lock");

    let summary = workspace.cycle(config).run(total, interrupt_token()).await;
    drop(lock);

    println!("{}", summary.headline());
    Ok(summary.status())
}
