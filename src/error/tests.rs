// autocommit-rs: Scheduled mutate-and-commit loop
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

use super::{AutoCommitError, AutoCommitResult, ConfigError, GitError, InvalidInputError};

#[test]
fn test_config_error_display() {
    let err = ConfigError::InvalidValue {
        section: "cycle".to_string(),
        key: "count".to_string(),
        message: "must be at least 1".to_string(),
    };
    insta::assert_snapshot!(
        err.to_string(),
        @"invalid value for 'count' in section '[cycle]': must be at least 1"
    );
}

#[test]
fn test_git_error_display() {
    let err = GitError::CommandFailed {
        command: "git commit --quiet -m msg".to_string(),
        message: "nothing to commit, working tree clean".to_string(),
    };
    insta::assert_snapshot!(
        err.to_string(),
        @"git command failed: git commit --quiet -m msg - nothing to commit, working tree clean"
    );
}

#[test]
fn test_only_timeouts_are_retryable() {
    let timeout = GitError::Timeout {
        command: "git push".to_string(),
        timeout_secs: 5,
    };
    let failed = GitError::CommandFailed {
        command: "git push".to_string(),
        message: "rejected".to_string(),
    };
    assert!(timeout.is_retryable());
    assert!(!failed.is_retryable());
}

#[test]
fn test_invalid_input_boxes_into_top_level() {
    let err: AutoCommitError = InvalidInputError::NotPositive(-3).into();
    assert!(matches!(err, AutoCommitError::InvalidInput(_)));
    insta::assert_snapshot!(
        err.to_string(),
        @"invalid input: number of commits must be greater than 0, got -3"
    );
}

#[test]
fn test_error_size() {
    // Box<str> variants are 16 bytes (fat pointer); with discriminant = 24 bytes
    let size = std::mem::size_of::<AutoCommitError>();
    assert!(size <= 24, "AutoCommitError is {size} bytes, expected <= 24");
}

#[test]
fn test_result_size() {
    let size = std::mem::size_of::<AutoCommitResult<()>>();
    assert!(size <= 24, "AutoCommitResult<()> is {size} bytes, expected <= 24");
}
