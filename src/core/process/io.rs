// autocommit-rs: Scheduled mutate-and-commit loop
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Output streaming for running processes.
//!
//! ```text
//! run_child()
//!   stdout/stderr reader tasks --> JoinHandle<String>
//!   select! { child.wait(), sleep(timeout) → kill }
//!   join readers
//!   --> ProcessOutput { exit_code, stdout, stderr }
//! ```

use tokio::io::{AsyncBufReadExt, AsyncRead, BufReader};
use tokio::process::Child;
use tokio::task::JoinHandle;
use tracing::{trace, warn};

use super::builder::{ProcessBuilder, ProcessOutput, StreamFlags};
use crate::error::ProcessError;

impl ProcessBuilder {
    /// Streams output while waiting for `child`, enforcing the timeout.
    pub(super) async fn run_child(
        &self,
        name: &str,
        cmd_line: &str,
        child: &mut Child,
    ) -> Result<ProcessOutput, ProcessError> {
        let stdout_handle = spawn_reader(child.stdout.take(), self.stdout_flags(), name, "stdout");
        let stderr_handle = spawn_reader(child.stderr.take(), self.stderr_flags(), name, "stderr");

        let wait_error = |e: std::io::Error| ProcessError::OutputError {
            command: cmd_line.to_string(),
            message: e.to_string(),
        };

        let status = match self.timeout_duration() {
            Some(limit) => {
                tokio::select! {
                    status = child.wait() => status.map_err(wait_error)?,
                    () = tokio::time::sleep(limit) => {
                        warn!(process = %name, timeout = ?limit, "process timed out");
                        child.kill().await.map_err(wait_error)?;
                        return Err(ProcessError::Timeout {
                            command: cmd_line.to_string(),
                            timeout_secs: limit.as_secs(),
                        });
                    }
                }
            }
            None => child.wait().await.map_err(wait_error)?,
        };

        Ok(ProcessOutput::new(
            status.code().unwrap_or(-1),
            join_reader(stdout_handle).await,
            join_reader(stderr_handle).await,
        ))
    }
}

/// Spawns a task draining `stream`; `None` when the stream was not piped.
fn spawn_reader<R>(
    stream: Option<R>,
    flags: StreamFlags,
    process_name: &str,
    stream_name: &'static str,
) -> Option<JoinHandle<String>>
where
    R: AsyncRead + Unpin + Send + 'static,
{
    let process_name = process_name.to_string();
    stream.map(|stream| {
        tokio::spawn(async move { read_stream(stream, flags, &process_name, stream_name).await })
    })
}

async fn join_reader(handle: Option<JoinHandle<String>>) -> String {
    match handle {
        Some(handle) => handle.await.unwrap_or_default(),
        None => String::new(),
    }
}

/// Reads `reader` line by line until EOF.
async fn read_stream<R>(
    reader: R,
    flags: StreamFlags,
    process_name: &str,
    stream_name: &str,
) -> String
where
    R: AsyncRead + Unpin,
{
    let keep = flags.contains(StreamFlags::KEEP_IN_STRING);
    let forward = flags.contains(StreamFlags::FORWARD_TO_LOG);
    let mut output = String::new();
    let mut lines = BufReader::new(reader).lines();

    loop {
        match lines.next_line().await {
            Ok(Some(line)) => {
                if forward {
                    trace!(process = %process_name, stream = %stream_name, line = %line, "output");
                }
                if keep {
                    if !output.is_empty() {
                        output.push('\n');
                    }
                    output.push_str(&line);
                }
            }
            Ok(None) => break,
            Err(e) => {
                warn!(process = %process_name, stream = %stream_name, error = %e, "error reading stream");
                break;
            }
        }
    }
    output
}
