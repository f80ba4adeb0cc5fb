// autocommit-rs: Scheduled mutate-and-commit loop
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! CLI module for autocommit-rs using clap derive.
//!
//! # Command Structure
//!
//! ```text
//! autocommit [global options] [mode]
//!   --run-now    one full cycle, then exit
//!   --schedule   daily trigger until interrupted
//!   --options    print the merged configuration
//!   --inis       print the configuration files in use
//!   (none)       print usage, exit 0
//! ```

pub mod global;

#[cfg(test)]
mod tests;

use crate::cli::global::GlobalOptions;
use clap::{Args, CommandFactory, Parser};

/// Scheduled mutate-and-commit loop.
#[derive(Debug, Parser)]
#[command(
    name = "autocommit",
    author,
    version,
    about = "Scheduled mutate-and-commit loop",
    long_about = "autocommit-rs Copyright (C) 2026 Romeo Ahmed\n\
                  This program comes with ABSOLUTELY NO WARRANTY\n\
                  This is free software, and you are welcome to redistribute it\n\
                  under certain conditions; see LICENSE for details.\n\n\
                  Appends a line to a target file, stages and commits it, and\n\
                  repeats N times, pushing to the remote as configured.\n\n\
                  `autocommit --run-now` runs one cycle immediately.\n\
                  `autocommit --schedule` runs one cycle every day at the\n\
                  configured time until interrupted with Ctrl+C.",
    after_help = "CONFIGURATION:\n\n\
                  autocommit reads `autocommit.toml` from the current directory\n\
                  if present. Additional files given with --ini are loaded after\n\
                  it, in order. Environment variables such as\n\
                  AUTOCOMMIT_CYCLE__COUNT=3 override files, --set overrides\n\
                  environment variables, and dedicated flags override --set.\n\n\
                  EXIT CODES:\n\n\
                  0 success, 1 setup error, 2 some commits failed,\n\
                  3 commits not pushed, 130 interrupted."
)]
pub struct Cli {
    /// Global options shared by all modes
    #[command(flatten)]
    pub global: GlobalOptions,

    /// What to do
    #[command(flatten)]
    pub mode: ModeArgs,
}

/// Mutually exclusive mode flags.
#[derive(Debug, Clone, Default, Args)]
#[group(id = "mode", multiple = false)]
pub struct ModeArgs {
    /// Runs one full commit cycle now, then exits.
    #[arg(long = "run-now")]
    pub run_now: bool,

    /// Runs one commit cycle every day at `schedule.at` until interrupted.
    #[arg(long)]
    pub schedule: bool,

    /// Lists all options and their values.
    #[arg(long = "options")]
    pub list_options: bool,

    /// Lists the configuration files in use.
    #[arg(long = "inis")]
    pub list_inis: bool,
}

/// Interactive front-end: choose a count, watch progress, stop with Ctrl+C.
#[derive(Debug, Parser)]
#[command(
    name = "autocommit-ui",
    author,
    version,
    about = "Interactive front-end for autocommit"
)]
pub struct UiCli {
    /// Global options shared with `autocommit`
    #[command(flatten)]
    pub global: GlobalOptions,
}

/// The selected mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    RunNow,
    Schedule,
    Options,
    Inis,
}

impl Cli {
    /// The selected mode, or `None` when no mode flag was given.
    #[must_use]
    pub const fn mode(&self) -> Option<Mode> {
        let m = &self.mode;
        if m.run_now {
            Some(Mode::RunNow)
        } else if m.schedule {
            Some(Mode::Schedule)
        } else if m.list_options {
            Some(Mode::Options)
        } else if m.list_inis {
            Some(Mode::Inis)
        } else {
            None
        }
    }
}

/// Parses command-line arguments.
#[must_use]
pub fn parse() -> Cli {
    Cli::parse()
}

/// Parses command-line arguments from an iterator.
pub fn parse_from<I, T>(iter: I) -> Cli
where
    I: IntoIterator<Item = T>,
    T: Into<std::ffi::OsString> + Clone,
{
    Cli::parse_from(iter)
}

/// Tries to parse command-line arguments, returning an error on failure.
///
/// # Errors
///
/// Returns a `clap::Error` if the arguments are invalid or if help/version information
/// was requested.
pub fn try_parse() -> Result<Cli, clap::Error> {
    Cli::try_parse()
}

/// Full help text, as printed when no mode is given.
#[must_use]
pub fn usage() -> String {
    Cli::command().render_help().to_string()
}
