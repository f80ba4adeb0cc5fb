// autocommit-rs: Scheduled mutate-and-commit loop
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

use chrono::{Local, TimeZone};

use super::{ChangeRecord, Mutator, TAG_RANGE, TargetFile, parse_records};
use crate::config::types::{TargetConfig, TargetKind};
use crate::error::MutationError;

#[test]
fn test_render_lines() {
    let at = Local.with_ymd_and_hms(2026, 1, 2, 6, 0, 1).unwrap();
    let record = ChangeRecord::new(12, &at, 4321);

    insta::assert_snapshot!(
        record.render(TargetKind::DataFile, "//"),
        @"Change #12: 2026-01-02 06:00:01 - Random: 4321"
    );
    insta::assert_snapshot!(
        record.render(TargetKind::SelfFile, "//"),
        @"// Auto-generated comment 12: 2026-01-02 06:00:01 - Random: 4321"
    );
}

#[test]
fn test_first_append_creates_file_with_default_line() {
    let dir = tempfile::tempdir().unwrap();
    let target = TargetFile::new(dir.path().join("changes.txt"));

    let record = target.append_change(1).unwrap();

    let content = std::fs::read_to_string(target.path()).unwrap();
    let lines: Vec<_> = content.lines().collect();
    assert_eq!(lines.len(), 2);
    assert_eq!(lines[0], "change me multiple times.");
    assert_eq!(lines[1], record.render(TargetKind::DataFile, "//"));
    assert!(TAG_RANGE.contains(&record.tag));
}

#[test]
fn test_appends_one_line_per_call_in_order() {
    let dir = tempfile::tempdir().unwrap();
    let target = TargetFile::new(dir.path().join("changes.txt"));

    for sequence in 1..=5 {
        target.append_change(sequence).unwrap();
    }

    let sequences: Vec<_> = target
        .read_records()
        .unwrap()
        .into_iter()
        .map(|r| r.sequence)
        .collect();
    assert_eq!(sequences, vec![1, 2, 3, 4, 5]);
}

#[test]
fn test_existing_trailing_whitespace_is_trimmed() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("changes.txt");
    std::fs::write(&path, "first line\n\n\n  ").unwrap();

    TargetFile::new(&path).append_change(1).unwrap();

    let content = std::fs::read_to_string(&path).unwrap();
    assert!(content.starts_with("first line\nChange #1: "));
    assert_eq!(content.lines().count(), 2);
}

#[test]
fn test_self_file_keeps_source_and_appends_comment() {
    let dir = tempfile::tempdir().unwrap();
    let source = "fn main() {\n    println!(\"hi\");\n}\n";
    std::fs::create_dir_all(dir.path().join("src")).unwrap();
    std::fs::write(dir.path().join("src/main.rs"), source).unwrap();

    let config = TargetConfig {
        kind: TargetKind::SelfFile,
        ..TargetConfig::default()
    };
    let target = TargetFile::from_config(dir.path(), &config);
    target.append_change(1).unwrap();
    target.append_change(2).unwrap();

    let content = std::fs::read_to_string(dir.path().join("src/main.rs")).unwrap();
    assert!(content.starts_with(source.trim_end()));
    let comments: Vec<_> = content
        .lines()
        .filter(|l| l.starts_with("// Auto-generated comment "))
        .collect();
    assert_eq!(comments.len(), 2);
    assert_eq!(target.read_records().unwrap().len(), 2);
}

#[test]
fn test_invalid_utf8_is_rejected_without_touching_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("changes.txt");
    let original = [0x66, 0x6f, 0xff, 0xfe, 0x0a];
    std::fs::write(&path, original).unwrap();

    let err = TargetFile::new(&path).append_change(1).unwrap_err();

    assert!(matches!(err, MutationError::InvalidUtf8 { .. }));
    assert_eq!(std::fs::read(&path).unwrap(), original);
}

#[test]
fn test_directory_target_is_read_error() {
    let dir = tempfile::tempdir().unwrap();
    let err = TargetFile::new(dir.path()).append_change(1).unwrap_err();
    assert!(matches!(err, MutationError::Read { .. }));
}

#[cfg(unix)]
#[test]
fn test_write_replaces_file_instead_of_truncating() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("changes.txt");
    std::fs::write(&path, "change me multiple times.").unwrap();

    // A hard link keeps pointing at the old inode; an in-place rewrite would
    // change what it sees.
    let witness = dir.path().join("witness.txt");
    std::fs::hard_link(&path, &witness).unwrap();

    TargetFile::new(&path).append_change(1).unwrap();

    assert_eq!(
        std::fs::read_to_string(&witness).unwrap(),
        "change me multiple times."
    );
    assert_eq!(std::fs::read_to_string(&path).unwrap().lines().count(), 2);

    // no temp files left behind
    let mut names: Vec<_> = std::fs::read_dir(dir.path())
        .unwrap()
        .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
        .collect();
    names.sort();
    assert_eq!(names, vec!["changes.txt", "witness.txt"]);
}

#[cfg(unix)]
#[test]
fn test_write_keeps_file_mode() {
    use std::os::unix::fs::PermissionsExt;

    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("changes.txt");
    std::fs::write(&path, "x").unwrap();
    std::fs::set_permissions(&path, std::fs::Permissions::from_mode(0o644)).unwrap();

    TargetFile::new(&path).append_change(1).unwrap();

    let mode = std::fs::metadata(&path).unwrap().permissions().mode() & 0o777;
    assert_eq!(mode, 0o644);
}

#[cfg(unix)]
#[test]
fn test_failed_write_leaves_file_untouched() {
    use std::os::unix::fs::PermissionsExt;

    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("changes.txt");
    std::fs::write(&path, "change me multiple times.\n").unwrap();
    let original = std::fs::read(&path).unwrap();

    let set_mode = |mode| {
        std::fs::set_permissions(dir.path(), std::fs::Permissions::from_mode(mode)).unwrap();
    };
    set_mode(0o555);

    // Permission bits do not bind a privileged user.
    if std::fs::write(dir.path().join("canary"), "").is_ok() {
        set_mode(0o755);
        return;
    }

    let result = TargetFile::new(&path).append_change(1);
    set_mode(0o755);

    assert!(matches!(
        result,
        Err(MutationError::Write { .. } | MutationError::Persist { .. })
    ));
    assert_eq!(std::fs::read(&path).unwrap(), original);
    let names: Vec<_> = std::fs::read_dir(dir.path())
        .unwrap()
        .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
        .collect();
    assert_eq!(names, vec!["changes.txt"]);
}

#[test]
fn test_parse_records_skips_other_lines() {
    let content = "\
change me multiple times.
Change #1: 2026-01-02 06:00:01 - Random: 1000
not a record
# Auto-generated comment 2: 2026-01-02 06:00:03 - Random: 9999
Change #3: 2026-13-40 06:00:05 - Random: 1234
Change #4: 2026-01-02 06:00:07 - Random: 12345
";
    let records = parse_records(content).unwrap();
    insta::assert_yaml_snapshot!(records, @r#"
    - sequence: 1
      timestamp: "2026-01-02 06:00:01"
      tag: 1000
    - sequence: 2
      timestamp: "2026-01-02 06:00:03"
      tag: 9999
    "#);
}
