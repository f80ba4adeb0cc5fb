// autocommit-rs: Scheduled mutate-and-commit loop
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

use chrono::{Local, TimeZone};

use super::cmd::{commit_args, commit_message, display, push_args, stage_all_args};

#[test]
fn test_stage_all_args() {
    assert_eq!(display(&stage_all_args()), "git add --all");
}

#[test]
fn test_commit_args_keep_message_as_one_argument() {
    let args = commit_args("Auto-commit #3 - 2026-05-01 06:00:02");
    assert_eq!(args.len(), 4);
    assert_eq!(args[3], "Auto-commit #3 - 2026-05-01 06:00:02");
}

#[test]
fn test_push_args() {
    let cases = [
        display(&push_args(None, None)),
        display(&push_args(None, Some("main"))),
        display(&push_args(Some("origin"), None)),
        display(&push_args(Some("origin"), Some("main"))),
    ];
    insta::assert_debug_snapshot!(cases, @r#"
    [
        "git push",
        "git push",
        "git push origin HEAD",
        "git push origin main",
    ]
    "#);
}

#[test]
fn test_commit_message_format() {
    let at = Local.with_ymd_and_hms(2026, 3, 4, 6, 0, 9).unwrap();
    insta::assert_snapshot!(commit_message(7, &at), @"Auto-commit #7 - 2026-03-04 06:00:09");
}
