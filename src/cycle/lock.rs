// autocommit-rs: Scheduled mutate-and-commit loop
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! One cycle per repository at a time.
//!
//! ```text
//! CycleLock::acquire(<git-dir>)
//!   create_new(<git-dir>/autocommit.lock) <- pid
//!   exists, owner pid dead --> remove, create again (warn)
//!   exists, owner alive/unknown --> CycleError::AlreadyRunning
//!   drop   --> remove lock file
//! ```

use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

use crate::error::CycleError;

/// Lock file name inside the `.git` directory.
pub const LOCK_FILE_NAME: &str = "autocommit.lock";

/// Held for the duration of a cycle; removes its lock file on drop.
#[derive(Debug)]
pub struct CycleLock {
    path: PathBuf,
}

impl CycleLock {
    /// Create the lock file in `git_dir`.
    ///
    /// A lock file whose recorded owner is no longer running is left over
    /// from a crash; it is removed and the lock taken.
    ///
    /// # Errors
    ///
    /// Returns `CycleError::AlreadyRunning` if the lock is held by a live
    /// process (or its owner cannot be determined), or `CycleError::Lock` if
    /// the file cannot be created or a stale one cannot be removed.
    pub fn acquire(git_dir: &Path) -> Result<Self, CycleError> {
        let path = git_dir.join(LOCK_FILE_NAME);
        let held = match Self::create(&path) {
            Err(held @ CycleError::AlreadyRunning { .. }) => held,
            result => return result,
        };
        let Some(pid) = stale_owner(&path) else {
            return Err(held);
        };

        warn!(
            path = %path.display(),
            pid,
            "removing stale cycle lock; its owner is no longer running"
        );
        match std::fs::remove_file(&path) {
            Ok(()) => {}
            Err(e) if e.kind() == ErrorKind::NotFound => {}
            Err(source) => return Err(CycleError::Lock { path, source }),
        }
        Self::create(&path)
    }

    fn create(path: &Path) -> Result<Self, CycleError> {
        let mut file = std::fs::OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(path)
            .map_err(|source| {
                if source.kind() == ErrorKind::AlreadyExists {
                    CycleError::AlreadyRunning {
                        path: path.to_path_buf(),
                    }
                } else {
                    CycleError::Lock {
                        path: path.to_path_buf(),
                        source,
                    }
                }
            })?;

        if let Err(e) = writeln!(file, "{}", std::process::id()) {
            debug!(path = %path.display(), error = %e, "could not record lock owner");
        }
        debug!(path = %path.display(), "acquired cycle lock");
        Ok(Self {
            path: path.to_path_buf(),
        })
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Drop for CycleLock {
    fn drop(&mut self) {
        let _ = std::fs::remove_file(&self.path);
        debug!(path = %self.path.display(), "released cycle lock");
    }
}

/// PID recorded in the lock file at `path`.
#[must_use]
pub fn lock_owner(path: &Path) -> Option<u32> {
    std::fs::read_to_string(path).ok()?.trim().parse().ok()
}

/// The recorded owner, if it is known and no longer running.
fn stale_owner(path: &Path) -> Option<u32> {
    lock_owner(path).filter(|&pid| !is_pid_alive(pid))
}

/// Whether a process with `pid` exists.
#[cfg(unix)]
fn is_pid_alive(pid: u32) -> bool {
    if pid == 0 {
        return false;
    }
    // Larger values cannot name a process.
    let Ok(pid) = libc::pid_t::try_from(pid) else {
        return false;
    };
    // SAFETY: signal 0 performs the existence and permission checks only.
    let result = unsafe { libc::kill(pid, 0) };
    if result == 0 {
        return true;
    }
    // EPERM: the process exists but belongs to someone else.
    std::io::Error::last_os_error().raw_os_error() == Some(libc::EPERM)
}

/// Owners cannot be checked here, so every lock counts as live.
#[cfg(not(unix))]
fn is_pid_alive(_pid: u32) -> bool {
    true
}
