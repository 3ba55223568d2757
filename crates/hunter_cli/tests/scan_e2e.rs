//! End-to-end tests for scanning real repositories.

#![expect(clippy::unwrap_used, reason = "tests use unwrap for clearer failure messages")]
#![expect(clippy::expect_used, reason = "tests use expect for clearer failure messages")]

use std::fs;
use std::path::Path;
use std::process::Command as StdCommand;

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

const PATTERNS: &str = r#"{
    "Simples": [
        {"Pattern": "oops", "Description": "Accidental commit", "Comment": "Check what was undone"},
        {"Pattern": "password", "Description": "Password mention"}
    ],
    "Patterns": [
        {"Pattern": "(?i)[vw]ulnerability", "Description": "Vulnerability mention"}
    ]
}"#;

fn hunter() -> Command {
    Command::new(env!("CARGO_BIN_EXE_git-hunter"))
}

fn git(dir: &Path, args: &[&str]) {
    let output = StdCommand::new("git")
        .args(args)
        .current_dir(dir)
        .output()
        .expect("failed to run git");
    assert!(output.status.success(), "git {args:?} failed: {output:?}");
}

fn init_git_repo(dir: &TempDir) {
    git(dir.path(), &["init", "--quiet"]);
    git(dir.path(), &["config", "user.email", "test@test.com"]);
    git(dir.path(), &["config", "user.name", "Test User"]);
    git(dir.path(), &["config", "commit.gpgsign", "false"]);
}

fn commit(dir: &TempDir, file: &str, content: &str, msg: &str) {
    let path = dir.path().join(file);
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).expect("create dir failed");
    }
    fs::write(path, content).expect("write failed");

    git(dir.path(), &["add", file]);
    git(dir.path(), &["commit", "--quiet", "-m", msg]);
}

/// Writes the signature file outside the repository and returns its path.
fn patterns(content: &str, name: &str) -> (TempDir, std::path::PathBuf) {
    let dir = TempDir::new().expect("tempdir");
    let path = dir.path().join(name);
    fs::write(&path, content).expect("write patterns failed");
    (dir, path)
}

fn scan(repo: &TempDir, patterns: &Path) -> Command {
    let mut cmd = hunter();
    cmd.arg("--gitdir").arg(repo.path()).arg("--patterns").arg(patterns).arg("--no-colour");
    cmd
}

#[test]
fn comment_match_is_reported_with_exit_code_one() {
    let repo = TempDir::new().unwrap();
    init_git_repo(&repo);
    commit(&repo, "app.txt", "hello", "Fix oops in the release script");
    let (_keep, patterns) = patterns(PATTERNS, "patterns.json");

    scan(&repo, &patterns)
        .assert()
        .code(1)
        .stdout(predicate::str::contains("Commit Match"))
        .stdout(predicate::str::contains("Description: Accidental commit"))
        .stdout(predicate::str::contains("Comment: Check what was undone"))
        .stdout(predicate::str::contains("Comments: Fix oops in the release script"));
}

#[test]
fn regex_signature_matches_case_insensitively() {
    let repo = TempDir::new().unwrap();
    init_git_repo(&repo);
    commit(&repo, "app.txt", "hello", "Vulnerability found in parser");
    let (_keep, patterns) = patterns(PATTERNS, "patterns.json");

    scan(&repo, &patterns)
        .assert()
        .code(1)
        .stdout(predicate::str::contains("Description: Vulnerability mention"));
}

#[test]
fn sensitive_file_is_reported() {
    let repo = TempDir::new().unwrap();
    init_git_repo(&repo);
    commit(&repo, ".ssh/id_rsa", "not really a key", "Add deployment files");
    let (_keep, patterns) = patterns(PATTERNS, "patterns.json");

    scan(&repo, &patterns)
        .assert()
        .code(1)
        .stdout(predicate::str::contains("File Match"))
        .stdout(predicate::str::contains("Description: Private SSH key"))
        .stdout(predicate::str::contains("Matched File: .ssh/id_rsa"));
}

#[test]
fn non_ascii_and_commit_prefixed_paths_are_matched() {
    let repo = TempDir::new().unwrap();
    init_git_repo(&repo);
    commit(&repo, "keys/clé.pem", "not really a key", "Add certificates");
    commit(&repo, "commit notes.txt", "notes", "Add notes");
    commit(&repo, "deploy_rsa", "not really a key", "Add deploy key");
    let (_keep, patterns) = patterns(PATTERNS, "patterns.json");

    let output = scan(&repo, &patterns)
        .args(["--format", "json"])
        .output()
        .expect("run git-hunter");

    assert_eq!(output.status.code(), Some(1));
    let stdout = String::from_utf8(output.stdout).expect("utf8");
    let hits: Vec<serde_json::Value> = stdout
        .lines()
        .map(|line| serde_json::from_str(line).expect("json line"))
        .collect();

    assert!(hits.iter().all(|hit| hit["kind"] == "file"));
    let texts: Vec<&str> = hits.iter().filter_map(|hit| hit["text"].as_str()).collect();
    assert_eq!(texts.len(), 2);
    assert!(texts.iter().any(|text| text.contains("Matched File: keys/clé.pem\n")));
    assert!(texts.iter().any(|text| text.contains("Matched File: deploy_rsa\n")));
}

#[test]
fn clean_history_reports_nothing_found() {
    let repo = TempDir::new().unwrap();
    init_git_repo(&repo);
    commit(&repo, "README.md", "docs", "Initial commit");
    let (_keep, patterns) = patterns(PATTERNS, "patterns.json");

    scan(&repo, &patterns)
        .assert()
        .success()
        .stdout(predicate::str::contains("Sorry, no interesting information found"));
}

#[test]
fn exit_zero_suppresses_findings_exit_code() {
    let repo = TempDir::new().unwrap();
    init_git_repo(&repo);
    commit(&repo, "app.txt", "hello", "oops");
    let (_keep, patterns) = patterns(PATTERNS, "patterns.json");

    scan(&repo, &patterns)
        .arg("--exit-zero")
        .assert()
        .success()
        .stdout(predicate::str::contains("Commit Match"));
}

#[test]
fn grep_finds_deleted_content() {
    let repo = TempDir::new().unwrap();
    init_git_repo(&repo);
    commit(&repo, "notes.txt", "db_password=hunter2\n", "Add notes");
    commit(&repo, "notes.txt", "nothing to see\n", "Tidy notes");
    let (_keep, patterns) = patterns(PATTERNS, "patterns.json");

    scan(&repo, &patterns)
        .arg("--grep")
        .assert()
        .code(1)
        .stdout(predicate::str::contains("Content Match"))
        .stdout(predicate::str::contains("Matched File: notes.txt"))
        .stdout(predicate::str::contains("Matched Line: db_password=hunter2"));
}

#[test]
fn grep_with_small_batches_and_parallel_jobs() {
    let repo = TempDir::new().unwrap();
    init_git_repo(&repo);
    commit(&repo, "a.txt", "password one\n", "First");
    commit(&repo, "b.txt", "nothing\n", "Second");
    commit(&repo, "c.txt", "nothing\n", "Third");
    let (_keep, patterns) = patterns(PATTERNS, "patterns.json");

    let output = scan(&repo, &patterns)
        .args(["--grep", "--batch-size", "1", "--content-jobs", "2", "--format", "json"])
        .output()
        .expect("run git-hunter");

    assert_eq!(output.status.code(), Some(1));
    let stdout = String::from_utf8(output.stdout).expect("utf8");
    let content_hits = stdout
        .lines()
        .map(|line| serde_json::from_str::<serde_json::Value>(line).expect("json line"))
        .filter(|hit| hit["kind"] == "content")
        .count();
    // a.txt is present in all three revisions.
    assert_eq!(content_hits, 3);
}

#[test]
fn without_grep_content_is_not_searched() {
    let repo = TempDir::new().unwrap();
    init_git_repo(&repo);
    commit(&repo, "notes.txt", "db_password=hunter2\n", "Add notes");
    let (_keep, patterns) = patterns(PATTERNS, "patterns.json");

    scan(&repo, &patterns)
        .assert()
        .success()
        .stdout(predicate::str::contains("Content Match").not());
}

#[test]
fn json_output_is_one_object_per_hit() {
    let repo = TempDir::new().unwrap();
    init_git_repo(&repo);
    commit(&repo, "app.txt", "hello", "oops, vulnerability");
    let (_keep, patterns) = patterns(PATTERNS, "patterns.json");

    let output = scan(&repo, &patterns)
        .args(["--format", "json"])
        .output()
        .expect("run git-hunter");

    assert_eq!(output.status.code(), Some(1));
    let stdout = String::from_utf8(output.stdout).expect("utf8");
    let hits: Vec<serde_json::Value> = stdout
        .lines()
        .map(|line| serde_json::from_str(line).expect("json line"))
        .collect();
    assert_eq!(hits.len(), 2);
    assert!(hits.iter().all(|hit| hit["kind"] == "comment"));
}

#[test]
fn output_flag_writes_hits_to_file() {
    let repo = TempDir::new().unwrap();
    init_git_repo(&repo);
    commit(&repo, "app.txt", "hello", "oops");
    let (keep, patterns) = patterns(PATTERNS, "patterns.json");
    let out = keep.path().join("hits.txt");

    scan(&repo, &patterns)
        .arg("--output")
        .arg(&out)
        .assert()
        .code(1)
        .stdout(predicate::str::contains("Commit Match").not());

    let written = fs::read_to_string(&out).expect("read output");
    assert!(written.starts_with("Commit Match\nDescription: Accidental commit\n"));
}

#[test]
fn toml_signature_file_with_custom_file_signature() {
    let repo = TempDir::new().unwrap();
    init_git_repo(&repo);
    commit(&repo, "vault/passwords.kdbx", "binary-ish", "Add vault");
    let (_keep, patterns) = patterns(
        r#"
builtin_file_signatures = false

[[files]]
part = "path"
pattern = "^vault/"
regex = true
description = "Vault directory"
"#,
        "hunter.toml",
    );

    scan(&repo, &patterns)
        .assert()
        .code(1)
        .stdout(predicate::str::contains("Description: Vault directory"))
        .stdout(predicate::str::contains("KeePass").not());
}

#[test]
fn missing_patterns_file_is_an_error() {
    let repo = TempDir::new().unwrap();
    init_git_repo(&repo);
    commit(&repo, "app.txt", "hello", "Initial commit");

    hunter()
        .arg("--gitdir")
        .arg(repo.path())
        .args(["--patterns", "/nonexistent/patterns.json"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("/nonexistent/patterns.json"));
}

#[test]
fn invalid_regex_is_an_error() {
    let repo = TempDir::new().unwrap();
    init_git_repo(&repo);
    commit(&repo, "app.txt", "hello", "Initial commit");
    let (_keep, patterns) = patterns(
        r#"{"Patterns": [{"Pattern": "[unclosed", "Description": "Broken"}]}"#,
        "patterns.json",
    );

    scan(&repo, &patterns)
        .assert()
        .code(2)
        .stderr(predicate::str::contains("Broken"));
}

#[test]
fn dump_numbers_commits_newest_first() {
    let repo = TempDir::new().unwrap();
    init_git_repo(&repo);
    commit(&repo, "a.txt", "a", "First commit");
    commit(&repo, "b.txt", "b", "Second commit");
    commit(&repo, "c.txt", "c", "Third commit");

    let output = hunter()
        .arg("--gitdir")
        .arg(repo.path())
        .arg("--dump")
        .output()
        .expect("run git-hunter");

    assert!(output.status.success());
    let stdout = String::from_utf8(output.stdout).expect("utf8");
    let numbers: Vec<_> = stdout
        .lines()
        .filter_map(|line| line.strip_prefix("Commit Number: "))
        .collect();
    assert_eq!(numbers, ["3", "2", "1"]);

    let third = stdout.find("Comments: Third commit").expect("third commit listed");
    let first = stdout.find("Comments: First commit").expect("first commit listed");
    assert!(third < first);
    assert!(stdout.contains("  * a.txt"));
}

#[test]
fn zero_batch_size_is_an_error() {
    let repo = TempDir::new().unwrap();
    init_git_repo(&repo);
    commit(&repo, "app.txt", "hello", "Initial commit");
    let (_keep, patterns) = patterns(PATTERNS, "patterns.json");

    scan(&repo, &patterns)
        .args(["--grep", "--batch-size", "0"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("batch size"));
}
