// autocommit-rs: Scheduled mutate-and-commit loop
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Process execution.
//!
//! ```text
//! run()
//!   |
//!   v
//! build_command()  args, cwd, env, stdio
//!   |
//!   v
//! spawn() --> run_child()  (timeout → kill)
//!   |
//!   v
//! validate exit_code (skip if ALLOW_FAILURE)
//!   |
//!   v
//! ProcessOutput
//! ```

use std::fmt::Write as _;
use std::process::Stdio;
use tokio::process::Command;
use tracing::{debug, trace};

use super::builder::{ProcessBuilder, ProcessFlags, ProcessOutput};
use crate::error::ProcessError;

impl ProcessBuilder {
    /// Name used in log fields: the override, else the program's file stem.
    pub(super) fn display_name(&self) -> String {
        self.name_override().map_or_else(
            || {
                self.program().file_stem().map_or_else(
                    || "process".to_string(),
                    |s| s.to_string_lossy().into_owned(),
                )
            },
            String::from,
        )
    }

    /// The full command line as a string, for logs and error messages.
    #[must_use]
    pub fn command_line(&self) -> String {
        let mut cmd = self.program().display().to_string();
        for arg in self.args_slice() {
            if arg.contains(char::is_whitespace) || arg.is_empty() {
                let _ = write!(cmd, " \"{arg}\"");
            } else {
                let _ = write!(cmd, " {arg}");
            }
        }
        cmd
    }

    /// Spawns the process and waits for it to exit.
    ///
    /// # Errors
    ///
    /// Returns:
    /// - `ProcessError::SpawnFailed` if the child cannot be started.
    /// - `ProcessError::Timeout` if it outlives the configured timeout.
    /// - `ProcessError::NonZeroExit` on a non-zero exit without `ALLOW_FAILURE`.
    /// - `ProcessError::OutputError` if waiting on the child fails.
    pub async fn run(self) -> Result<ProcessOutput, ProcessError> {
        let name = self.display_name();
        let cmd_line = self.command_line();

        if let Some(cwd) = self.working_dir() {
            debug!(cwd = %cwd.display(), "cd");
        }
        debug!(cmd = %cmd_line, "exec");

        let mut child = self
            .build_command()
            .spawn()
            .map_err(|source| ProcessError::SpawnFailed {
                command: cmd_line.clone(),
                source,
            })?;

        trace!(process = %name, pid = ?child.id(), "spawned");

        let output = self.run_child(&name, &cmd_line, &mut child).await?;

        if !self.process_flags().contains(ProcessFlags::ALLOW_FAILURE) && !output.success() {
            return Err(ProcessError::NonZeroExit {
                command: cmd_line,
                code: output.exit_code(),
            });
        }

        trace!(process = %name, exit_code = output.exit_code(), "completed");
        Ok(output)
    }

    fn build_command(&self) -> Command {
        let mut command = Command::new(self.program());
        command.args(self.args_slice());

        if let Some(cwd) = self.working_dir() {
            command.current_dir(cwd);
        }
        command.envs(self.env_vars());

        command
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true);

        command
    }
}
