// autocommit-rs: Scheduled mutate-and-commit loop
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Integration tests for the `autocommit` binary.
//!
//! Runs the built executable against temporary repositories. Every run
//! uses a scratch working directory so no `autocommit.toml` is picked up.

use std::path::{Path, PathBuf};
use std::process::{Command, Output};
use tempfile::TempDir;

const BIN: &str = env!("CARGO_BIN_EXE_autocommit");

fn temp_dir() -> TempDir {
    tempfile::tempdir().expect("failed to create temp dir")
}

fn git(dir: &Path, args: &[&str]) -> String {
    let output = Command::new("git")
        .args(args)
        .current_dir(dir)
        .output()
        .expect("failed to run git");
    assert!(output.status.success(), "git {args:?} failed: {output:?}");
    String::from_utf8_lossy(&output.stdout).trim().to_string()
}

fn init_repo(dir: &Path) {
    git(dir, &["init", "--quiet", "--initial-branch=main"]);
    git(dir, &["config", "user.name", "Test User"]);
    git(dir, &["config", "user.email", "test@example.com"]);
    git(dir, &["config", "commit.gpgsign", "false"]);
}

fn repo_with_remote(temp: &TempDir) -> (PathBuf, PathBuf) {
    let work = temp.path().join("work");
    let remote = temp.path().join("remote.git");
    std::fs::create_dir_all(&work).unwrap();
    std::fs::create_dir_all(&remote).unwrap();
    git(&remote, &["init", "--quiet", "--bare", "--initial-branch=main"]);
    init_repo(&work);
    git(&work, &["remote", "add", "origin", remote.to_str().unwrap()]);
    (work, remote)
}

/// `autocommit` started in `cwd` with no inherited `AUTOCOMMIT_*` variables.
fn autocommit(cwd: &Path) -> Command {
    let mut cmd = Command::new(BIN);
    cmd.current_dir(cwd);
    for (key, _) in std::env::vars() {
        if key.starts_with("AUTOCOMMIT_") {
            cmd.env_remove(key);
        }
    }
    cmd
}

fn run(cmd: &mut Command) -> Output {
    cmd.output().expect("failed to run autocommit")
}

fn stdout(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).into_owned()
}

fn commit_count(dir: &Path, rev: &str) -> u32 {
    git(dir, &["rev-list", "--count", rev]).parse().unwrap()
}

// =============================================================================
// Usage and informational modes
// =============================================================================

#[test]
fn cli_no_mode_prints_usage() {
    let temp = temp_dir();
    let output = run(&mut autocommit(temp.path()));

    assert_eq!(output.status.code(), Some(0));
    let text = stdout(&output);
    assert!(text.contains("--run-now"), "{text}");
    assert!(text.contains("--schedule"), "{text}");
}

#[test]
fn cli_conflicting_modes_fail() {
    let temp = temp_dir();
    let output = run(autocommit(temp.path()).args(["--run-now", "--schedule"]));
    assert_eq!(output.status.code(), Some(2));
}

#[test]
fn cli_options_reflect_every_layer() {
    let temp = temp_dir();
    std::fs::write(
        temp.path().join("autocommit.toml"),
        "[cycle]\ncount = 5\npush_mode = \"off\"\n\n[schedule]\nat = \"07:15\"\n",
    )
    .unwrap();
    let extra = temp.path().join("extra.toml");
    std::fs::write(&extra, "[cycle]\ncount = 6\ndelay_ms = 10\n").unwrap();

    let output = run(autocommit(temp.path())
        .env("AUTOCOMMIT_CYCLE__DELAY_MS", "20")
        .env("AUTOCOMMIT_GIT__RETRIES", "4")
        .args(["--ini", extra.to_str().unwrap()])
        .args(["-s", "git.retries=5", "-n", "7", "--options"]));

    assert_eq!(output.status.code(), Some(0), "{output:?}");
    let text = stdout(&output);
    let value = |key: &str| {
        text.lines()
            .find(|line| line.split_whitespace().next() == Some(key))
            .and_then(|line| line.split_once(" = "))
            .map(|(_, v)| v.to_string())
            .unwrap_or_else(|| panic!("{key} missing from:\n{text}"))
    };
    assert_eq!(value("cycle.push_mode"), "off");
    assert_eq!(value("schedule.at"), "07:15");
    assert_eq!(value("cycle.delay_ms"), "20");
    assert_eq!(value("git.retries"), "5");
    assert_eq!(value("cycle.count"), "7");
}

#[test]
fn cli_inis_lists_loaded_files() {
    let temp = temp_dir();
    std::fs::write(temp.path().join("autocommit.toml"), "").unwrap();

    let output = run(autocommit(temp.path()).arg("--inis"));

    assert_eq!(output.status.code(), Some(0));
    insta::assert_snapshot!(stdout(&output).trim(), @"1. [optional] autocommit.toml");
}

#[test]
fn cli_invalid_config_is_a_setup_error() {
    let temp = temp_dir();
    let output = run(autocommit(temp.path()).args(["-s", "schedule.at=25:00", "--options"]));
    assert_eq!(output.status.code(), Some(1));
}

#[test]
fn cli_run_outside_repository_is_a_setup_error() {
    let temp = temp_dir();
    let output = run(autocommit(temp.path()).args(["-n", "1", "--run-now"]));
    assert_eq!(output.status.code(), Some(1));
}

// =============================================================================
// --run-now
// =============================================================================

#[test]
fn cli_run_now_three_commits() {
    let temp = temp_dir();
    let (work, remote) = repo_with_remote(&temp);

    let output = run(autocommit(temp.path())
        .args(["-C", work.to_str().unwrap()])
        .args(["-n", "3", "-s", "cycle.delay_ms=0", "-s", "git.remote=origin"])
        .arg("--run-now"));

    assert_eq!(output.status.code(), Some(0), "{output:?}");
    assert!(stdout(&output).contains("succeeded=3/3"), "{output:?}");

    let content = std::fs::read_to_string(work.join("changes.txt")).unwrap();
    let changes: Vec<&str> = content
        .lines()
        .filter(|line| line.starts_with("Change #"))
        .map(|line| line.split(':').next().unwrap())
        .collect();
    assert_eq!(changes, ["Change #1", "Change #2", "Change #3"]);
    assert_eq!(commit_count(&work, "HEAD"), 3);
    assert_eq!(commit_count(&remote, "main"), 3);
    assert!(!work.join(".git").join("autocommit.lock").exists());
}

#[test]
fn cli_run_now_unpublished_exit_code() {
    let temp = temp_dir();
    let (work, remote) = repo_with_remote(&temp);
    std::fs::remove_dir_all(&remote).unwrap();

    let output = run(autocommit(temp.path())
        .args(["-C", work.to_str().unwrap()])
        .args(["-n", "2", "-s", "cycle.delay_ms=0", "-s", "git.remote=origin"])
        .arg("--run-now"));

    assert_eq!(output.status.code(), Some(3), "{output:?}");
    assert!(stdout(&output).contains("status=unpublished"));
    assert_eq!(commit_count(&work, "HEAD"), 2);
}

#[test]
fn cli_run_now_strict_failure_exit_code() {
    let temp = temp_dir();
    let (work, _remote) = repo_with_remote(&temp);
    std::fs::create_dir_all(work.join("changes.txt")).unwrap();

    let output = run(autocommit(temp.path())
        .args(["-C", work.to_str().unwrap()])
        .args(["-n", "3", "-s", "cycle.delay_ms=0"])
        .args(["-s", "cycle.continue_on_error=false", "-s", "cycle.push_mode=off"])
        .arg("--run-now"));

    assert_eq!(output.status.code(), Some(2), "{output:?}");
    assert!(stdout(&output).contains("succeeded=0/3 status=failed"));
}

#[test]
fn cli_run_now_refuses_concurrent_run() {
    let temp = temp_dir();
    let (work, _remote) = repo_with_remote(&temp);
    let lock = work.join(".git").join("autocommit.lock");
    // Owned by this (live) test process.
    std::fs::write(&lock, format!("{}\n", std::process::id())).unwrap();

    let output = run(autocommit(temp.path())
        .args(["-C", work.to_str().unwrap()])
        .args(["-n", "1", "--run-now"]));

    assert_eq!(output.status.code(), Some(1));
    assert!(!work.join("changes.txt").exists());
    assert!(lock.exists());
}

#[cfg(unix)]
#[test]
fn cli_run_now_reclaims_lock_left_by_dead_process() {
    let temp = temp_dir();
    let (work, _remote) = repo_with_remote(&temp);
    let lock = work.join(".git").join("autocommit.lock");
    // Above any pid_t, so never a running process.
    std::fs::write(&lock, "4194304999\n").unwrap();

    let output = run(autocommit(temp.path())
        .args(["-C", work.to_str().unwrap()])
        .args(["-n", "1", "-s", "cycle.delay_ms=0", "-s", "cycle.push_mode=off"])
        .arg("--run-now"));

    assert_eq!(output.status.code(), Some(0), "{output:?}");
    assert_eq!(commit_count(&work, "HEAD"), 1);
    assert!(!lock.exists());
}

#[cfg(unix)]
#[test]
fn cli_run_now_interrupt_stops_at_iteration_boundary() {
    use std::time::{Duration, Instant};

    let temp = temp_dir();
    let (work, _remote) = repo_with_remote(&temp);

    let child = autocommit(temp.path())
        .args(["-C", work.to_str().unwrap()])
        .args(["-n", "5", "-s", "cycle.delay_ms=60000", "-s", "cycle.push_mode=off"])
        .arg("--run-now")
        .stdout(std::process::Stdio::piped())
        .stderr(std::process::Stdio::piped())
        .spawn()
        .unwrap();

    let deadline = Instant::now() + Duration::from_secs(30);
    while commit_count_or_zero(&work) < 1 {
        assert!(Instant::now() < deadline, "first commit never happened");
        std::thread::sleep(Duration::from_millis(50));
    }

    let status = Command::new("kill")
        .args(["-INT", &child.id().to_string()])
        .status()
        .unwrap();
    assert!(status.success());

    let output = child.wait_with_output().unwrap();
    assert_eq!(output.status.code(), Some(130), "{output:?}");
    assert!(stdout(&output).contains("succeeded=1/5 status=cancelled"));
    assert_eq!(commit_count(&work, "HEAD"), 1);
}

#[cfg(unix)]
fn commit_count_or_zero(dir: &Path) -> u32 {
    Command::new("git")
        .args(["rev-list", "--count", "HEAD"])
        .current_dir(dir)
        .output()
        .ok()
        .filter(|o| o.status.success())
        .and_then(|o| String::from_utf8_lossy(&o.stdout).trim().parse().ok())
        .unwrap_or(0)
}
