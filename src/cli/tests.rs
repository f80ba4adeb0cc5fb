// autocommit-rs: Scheduled mutate-and-commit loop
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

use crate::cli::{Cli, Mode, UiCli};
use clap::{CommandFactory, Parser};
use std::path::PathBuf;

#[test]
fn test_command_definitions_are_consistent() {
    Cli::command().debug_assert();
    UiCli::command().debug_assert();
}

#[test]
fn test_mode_flags_do_not_shadow_global_options() {
    let cli = Cli::try_parse_from([
        "autocommit",
        "--ini",
        "extra.toml",
        "-s",
        "cycle.count=2",
        "--inis",
    ])
    .unwrap();
    assert_eq!(cli.mode(), Some(Mode::Inis));
    assert_eq!(cli.global.inis, vec![PathBuf::from("extra.toml")]);
    assert_eq!(cli.global.options, vec!["cycle.count=2".to_string()]);

    let cli = Cli::try_parse_from(["autocommit", "--options"]).unwrap();
    assert_eq!(cli.mode(), Some(Mode::Options));
    assert!(cli.global.inis.is_empty());
    assert!(cli.global.options.is_empty());
}

#[test]
fn test_no_mode_is_accepted() {
    let cli = Cli::try_parse_from(["autocommit"]).unwrap();
    assert_eq!(cli.mode(), None);
    assert!(cli.global.to_config_overrides().is_empty());
}

#[test]
fn test_parse_modes() {
    let mode = |flag: &str| Cli::try_parse_from(["autocommit", flag]).unwrap().mode();
    assert_eq!(mode("--run-now"), Some(Mode::RunNow));
    assert_eq!(mode("--schedule"), Some(Mode::Schedule));
    assert_eq!(mode("--options"), Some(Mode::Options));
    assert_eq!(mode("--inis"), Some(Mode::Inis));
}

#[test]
fn test_modes_are_exclusive() {
    let err = Cli::try_parse_from(["autocommit", "--run-now", "--schedule"]).unwrap_err();
    assert_eq!(err.kind(), clap::error::ErrorKind::ArgumentConflict);
}

#[test]
fn test_parse_global_options() {
    let cli = Cli::try_parse_from([
        "autocommit",
        "-l",
        "5",
        "-C",
        "/tmp/repo",
        "-i",
        "a.toml",
        "--ini",
        "b.toml",
        "--run-now",
    ])
    .unwrap();
    assert_eq!(cli.global.log_level, Some(5));
    assert_eq!(cli.global.repo, Some(PathBuf::from("/tmp/repo")));
    assert_eq!(
        cli.global.inis,
        vec![PathBuf::from("a.toml"), PathBuf::from("b.toml")]
    );
}

#[test]
fn test_out_of_range_values_are_rejected() {
    assert!(Cli::try_parse_from(["autocommit", "-l", "7"]).is_err());
    assert!(Cli::try_parse_from(["autocommit", "-n", "0"]).is_err());
}

#[test]
fn test_overrides_order() {
    let cli = Cli::try_parse_from([
        "autocommit",
        "-s",
        "cycle.push_mode=off",
        "--set",
        "cycle.count=9",
        "-n",
        "3",
        "-l",
        "4",
        "--log-file",
        "run.log",
    ])
    .unwrap();
    insta::assert_debug_snapshot!(cli.global.to_config_overrides(), @r#"
    [
        "cycle.push_mode=off",
        "cycle.count=9",
        "global.output_log_level=4",
        "global.file_log_level=4",
        "global.log_file=run.log",
        "cycle.count=3",
    ]
    "#);
}

#[test]
fn test_file_log_level_overrides_log_level() {
    let cli =
        Cli::try_parse_from(["autocommit", "-l", "2", "--file-log-level", "5"]).unwrap();
    let overrides = cli.global.to_config_overrides();
    assert!(overrides.contains(&"global.output_log_level=2".to_string()));
    assert!(overrides.contains(&"global.file_log_level=5".to_string()));
}

#[test]
fn test_usage_mentions_modes() {
    let usage = super::usage();
    assert!(usage.contains("--run-now"));
    assert!(usage.contains("--schedule"));
}
