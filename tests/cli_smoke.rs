use assert_cmd::prelude::*;
use std::fs::{self, File};
use std::io::Write;
use std::path::Path;
use std::process::Command;
use tempfile::tempdir;

const WORKDAY: [&str; 5] = ["09:00", "09:30", "11:00", "11:10", "15:00"];

fn has_git() -> bool {
    Command::new("git").arg("--version").output().is_ok()
}

fn git(dir: &Path, args: &[&str]) {
    assert!(Command::new("git")
        .args(args)
        .current_dir(dir)
        .status()
        .unwrap()
        .success());
}

fn init_git_repo(dir: &Path) {
    // init and basic identity
    git(dir, &["init"]);
    git(dir, &["config", "core.autocrlf", "false"]);
    git(dir, &["config", "user.email", "you@example.com"]);
    git(dir, &["config", "user.name", "Your Name"]);
}

fn commit_at(dir: &Path, name: &str, hhmm: &str, author: &str) {
    let path = dir.join(name);
    let mut f = File::create(&path).unwrap();
    f.write_all(format!("{name} at {hhmm}\n").as_bytes()).unwrap();
    f.sync_all().unwrap();

    let date = format!("2024-03-04T{hhmm}:00+00:00");
    git(dir, &["add", "."]);
    assert!(Command::new("git")
        .args(["commit", "-m", &format!("add {name}")])
        .env("GIT_AUTHOR_DATE", &date)
        .env("GIT_COMMITTER_DATE", &date)
        .env("GIT_AUTHOR_NAME", author)
        .current_dir(dir)
        .status()
        .unwrap()
        .success());
}

fn workday_repo(dir: &Path) {
    init_git_repo(dir);
    for (i, hhmm) in WORKDAY.iter().enumerate() {
        commit_at(dir, &format!("file{i}.txt"), hhmm, "Ada");
    }
}

fn run_json(dir: &Path, extra: &[&str]) -> serde_json::Value {
    let mut cmd = Command::cargo_bin("git-hours").unwrap();
    cmd.current_dir(dir)
        .arg("--repo")
        .arg(dir)
        .args(["--since", "2024-03-01", "--before", "2024-03-31", "--json"])
        .args(extra);
    let out = cmd.assert().success().get_output().stdout.clone();
    serde_json::from_slice(&out).unwrap()
}

#[test]
fn json_reports_workday_total() {
    let dir = tempdir().unwrap();
    if !has_git() {
        return;
    }
    workday_repo(dir.path());

    let v = run_json(dir.path(), &[]);
    assert_eq!(v["total_secs"], 11400);
    assert_eq!(v["commit_count"], 5);
    assert_eq!(v["skipped_count"], 0);
    assert!(v["periods"].as_array().map(|p| p.is_empty()).unwrap_or(false));
}

#[test]
fn periods_flag_lists_active_periods() {
    let dir = tempdir().unwrap();
    if !has_git() {
        return;
    }
    workday_repo(dir.path());

    let v = run_json(dir.path(), &["--periods"]);
    let periods = v["periods"].as_array().unwrap();
    assert_eq!(periods.len(), 2);
    assert_eq!(periods[0]["duration_secs"], 7800);
    assert_eq!(periods[1]["duration_secs"], 0);
}

#[test]
fn debug_flag_traces_every_commit() {
    let dir = tempdir().unwrap();
    if !has_git() {
        return;
    }
    workday_repo(dir.path());

    let v = run_json(dir.path(), &["--debug"]);
    let trace = v["trace"].as_array().unwrap();
    assert_eq!(trace.len(), 5);
    assert!(trace[0]["elapsed_secs"].is_null());
    assert_eq!(trace[4]["contribution_secs"], 3600);
}

#[test]
fn all_and_reflog_do_not_double_count() {
    let dir = tempdir().unwrap();
    if !has_git() {
        return;
    }
    workday_repo(dir.path());

    let v = run_json(dir.path(), &["--all", "--reflog"]);
    assert_eq!(v["total_secs"], 11400);
    assert_eq!(v["commit_count"], 5);
}

#[test]
fn author_filter_excludes_other_authors() {
    let dir = tempdir().unwrap();
    if !has_git() {
        return;
    }
    init_git_repo(dir.path());
    commit_at(dir.path(), "a.txt", "09:00", "Ada");
    commit_at(dir.path(), "b.txt", "09:20", "Bob");
    commit_at(dir.path(), "c.txt", "09:45", "Ada");

    let ada = run_json(dir.path(), &["--author", "Ada"]);
    assert_eq!(ada["commit_count"], 2);
    assert_eq!(ada["total_secs"], 45 * 60);

    let both = run_json(dir.path(), &["--author", "Ada,Bob"]);
    assert_eq!(both["commit_count"], 3);
}

#[test]
fn custom_duration_changes_the_cap() {
    let dir = tempdir().unwrap();
    if !has_git() {
        return;
    }
    workday_repo(dir.path());

    // 30m cap: 30m gap and 90m gap are both >= 1h and get capped
    let v = run_json(dir.path(), &["--duration", "30m"]);
    assert_eq!(v["session_gap_secs"], 1800);
    assert_eq!(v["total_secs"], (30 + 30 + 10 + 30) * 60);
}

#[test]
fn empty_range_is_zero() {
    let dir = tempdir().unwrap();
    if !has_git() {
        return;
    }
    workday_repo(dir.path());

    let mut cmd = Command::cargo_bin("git-hours").unwrap();
    cmd.arg("--repo")
        .arg(dir.path())
        .args(["--since", "2020-01-01", "--before", "2020-01-31", "--json"]);
    let out = cmd.assert().success().get_output().stdout.clone();
    let v: serde_json::Value = serde_json::from_slice(&out).unwrap();
    assert_eq!(v["total_secs"], 0);
    assert_eq!(v["commit_count"], 0);
}

#[test]
fn text_output_ends_with_total() {
    let dir = tempdir().unwrap();
    if !has_git() {
        return;
    }
    workday_repo(dir.path());

    let mut cmd = Command::cargo_bin("git-hours").unwrap();
    cmd.env("NO_COLOR", "1")
        .arg("--repo")
        .arg(dir.path())
        .args(["--since", "2024-03-01", "--before", "2024-03-31"]);
    let out = cmd.assert().success().get_output().stdout.clone();
    let text = String::from_utf8(out).unwrap();
    let last = text.lines().last().unwrap();
    assert!(last.starts_with("From \"2024-03-01 00:00:00"), "{last}");
    assert!(last.ends_with(": 3h 10m"), "{last}");
}

#[test]
fn inverted_range_fails() {
    let dir = tempdir().unwrap();
    if !has_git() {
        return;
    }
    workday_repo(dir.path());

    let mut cmd = Command::cargo_bin("git-hours").unwrap();
    cmd.arg("--repo")
        .arg(dir.path())
        .args(["--since", "2024-03-31", "--before", "2024-03-01"]);
    cmd.assert().failure();
}

#[test]
fn outside_a_repository_fails() {
    let dir = tempdir().unwrap();
    fs::create_dir_all(dir.path().join("plain")).unwrap();

    let mut cmd = Command::cargo_bin("git-hours").unwrap();
    cmd.arg("--repo")
        .arg(dir.path().join("plain"));
    cmd.assert().failure();
}
