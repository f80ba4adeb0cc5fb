// autocommit-rs: Scheduled mutate-and-commit loop
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! `--schedule`: one cycle per day at `schedule.at` until interrupted.

use std::cell::Cell;
use tracing::{error, info};

use super::{Workspace, interrupt_token};
use crate::config::Config;
use crate::cycle::RunStatus;
use crate::error::Result;
use crate::schedule::Scheduler;

/// Run the daily scheduler until interrupted.
///
/// Returns [`RunStatus::Cancelled`] if the interrupt arrived during a cycle
/// and [`RunStatus::Success`] if it arrived while waiting.
///
/// # Errors
///
/// Returns an error if the trigger is invalid or the repository cannot be
/// opened.
pub async fn run_schedule_command(config: &Config) -> Result<RunStatus> {
    let trigger = config.trigger()?;
    let total = config.count()?;
    let workspace = Workspace::open(config)?;
    let cycle = workspace.cycle(config);
    let last_status = Cell::new(None);
    let scheduler = Scheduler::system(config.schedule.poll_interval());

    let (workspace, cycle, last) = (&workspace, &cycle, &last_status);
    let fired = scheduler
        .run_forever(
            trigger,
            move |token| async move {
                // Held per cycle so a manual run can happen between triggers.
                let _lock = match workspace.lock() {
                    Ok(lock) => lock,
                    Err(e) => {
                        error!(error = %e, "skipping scheduled cycle");
                        return;
                    }
                };
                let summary = cycle.run(total, token).await;
                info!("{}", summary.headline());
                last.set(Some(summary.status()));
            },
            interrupt_token(),
        )
        .await;

    info!(cycles = fired, "Scheduler stopped");
    Ok(match last_status.get() {
        Some(RunStatus::Cancelled) => RunStatus::Cancelled,
        _ => RunStatus::Success,
    })
}
