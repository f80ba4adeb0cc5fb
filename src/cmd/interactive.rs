// autocommit-rs: Scheduled mutate-and-commit loop
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Terminal front-end for interactive runs.
//!
//! ```text
//! inquire Select [10, 20, 30, Custom...] --> CountChoice
//!        |
//!        v  controller.start (bad count: message, ask again)
//! indicatif ProgressBar <-- UiEvent --- RunHandle
//!   Log lines printed above the bar
//!   Ctrl+C --> handle.stop()
//!        |
//!        v
//! Finished --> summary line --> "Start another run?"
//! ```

use anyhow::Context;
use indicatif::{ProgressBar, ProgressStyle};
use inquire::{Confirm, InquireError, Select, Text};
use std::sync::OnceLock;

use super::Workspace;
use crate::config::Config;
use crate::cycle::{CycleOptions, CycleSummary, RunStatus};
use crate::error::{AutoCommitError, Result};
use crate::interactive::panel::Panel;
use crate::interactive::{
    CountChoice, DEFAULT_CUSTOM_COUNT, InteractiveController, PRESETS, RunHandle, UiEvent,
};

const CUSTOM_OPTION: &str = "Custom...";

fn bar_style() -> ProgressStyle {
    static STYLE: OnceLock<ProgressStyle> = OnceLock::new();
    STYLE
        .get_or_init(|| {
            ProgressStyle::with_template("[{elapsed_precise}] [{wide_bar:.cyan/blue}] {msg}")
                .unwrap_or_else(|_| ProgressStyle::default_bar())
                .progress_chars("#>-")
        })
        .clone()
}

/// Prompt for counts and run cycles until the user quits.
///
/// Returns the status of the last run, or `None` if nothing was run.
///
/// # Errors
///
/// Returns an error if the repository cannot be opened, the terminal
/// cannot be prompted, or a run cannot be started for a reason other than
/// a bad count.
pub async fn run_interactive_command(config: &Config) -> Result<Option<RunStatus>> {
    let workspace = Workspace::open(config)?;
    let controller = InteractiveController::new(
        workspace.mutator(),
        workspace.vcs(),
        CycleOptions::from_config(&config.cycle),
    )
    .with_lock_dir(workspace.git_dir());

    println!("Auto-Committer: {}", workspace.target().path().display());
    let mut panel = Panel::new();
    let mut last = None;

    loop {
        let Some(choice) = prompt_blocking(prompt_choice).await? else {
            break;
        };
        let handle = match controller.start(&choice) {
            Ok(handle) => handle,
            Err(AutoCommitError::InvalidInput(e)) => {
                eprintln!("Error: {e}");
                continue;
            }
            Err(e) => return Err(e.into()),
        };

        panel.begin(handle.total().get());
        let summary = present(handle, &mut panel).await?;
        println!("{}", summary.headline());
        last = Some(summary.status());

        if !prompt_blocking(prompt_again).await? {
            break;
        }
    }
    Ok(last)
}

/// Drain `handle`'s events into `panel` and the progress bar.
async fn present(handle: RunHandle, panel: &mut Panel) -> Result<CycleSummary> {
    let pb = ProgressBar::new(u64::from(handle.total().get()));
    pb.set_style(bar_style());
    pb.set_message(panel.label().to_string());

    let events = handle.events().clone();
    loop {
        tokio::select! {
            event = events.recv_async() => {
                let Ok(event) = event else { break };
                panel.apply(&event);
                match event {
                    UiEvent::Progress { current, .. } => {
                        pb.set_position(u64::from(current));
                        pb.set_message(panel.label().to_string());
                    }
                    UiEvent::Log(line) => pb.println(line),
                    UiEvent::Finished(_) => break,
                }
            }
            result = tokio::signal::ctrl_c(), if panel.stop_enabled() => {
                if result.is_ok() && panel.request_stop() {
                    handle.stop();
                    if let Some(line) = panel.log().last() {
                        pb.println(line);
                    }
                }
            }
        }
    }

    pb.finish_with_message(panel.label().to_string());
    handle.wait().await
}

async fn prompt_blocking<T, F>(prompt: F) -> Result<T>
where
    T: Send + 'static,
    F: FnOnce() -> Result<T> + Send + 'static,
{
    tokio::task::spawn_blocking(prompt)
        .await
        .context("prompt task failed")?
}

/// `None` when the user cancels the prompt.
fn prompt_choice() -> Result<Option<CountChoice>> {
    let mut options: Vec<String> = PRESETS.iter().map(u32::to_string).collect();
    options.push(CUSTOM_OPTION.to_string());

    let selected = match Select::new("Number of commits:", options).prompt() {
        Ok(selected) => selected,
        Err(InquireError::OperationCanceled | InquireError::OperationInterrupted) => {
            return Ok(None);
        }
        Err(e) => return Err(e).context("failed to read selection"),
    };

    if let Some(&preset) = PRESETS.iter().find(|n| n.to_string() == selected) {
        return Ok(Some(CountChoice::Preset(preset)));
    }

    let default = DEFAULT_CUSTOM_COUNT.to_string();
    match Text::new("Custom number of commits:")
        .with_default(&default)
        .prompt()
    {
        Ok(text) => Ok(Some(CountChoice::Custom(text))),
        Err(InquireError::OperationCanceled | InquireError::OperationInterrupted) => Ok(None),
        Err(e) => Err(e).context("failed to read custom count"),
    }
}

fn prompt_again() -> Result<bool> {
    match Confirm::new("Start another run?").with_default(false).prompt() {
        Ok(again) => Ok(again),
        Err(InquireError::OperationCanceled | InquireError::OperationInterrupted) => Ok(false),
        Err(e) => Err(e).context("failed to read answer"),
    }
}
