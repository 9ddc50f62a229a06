//! CLI integration tests using assert_cmd.
//!
//! Generation-backed commands (create, regenerate) need a live backend,
//! so these tests cover everything that runs offline.

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

fn quizgen() -> Command {
    #[allow(deprecated)]
    Command::cargo_bin("quizgen").unwrap()
}

#[test]
fn help_output() {
    quizgen()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("AI quiz and course generator"));
}

#[test]
fn version_output() {
    quizgen()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("quizgen"));
}

#[test]
fn init_creates_config() {
    let dir = TempDir::new().unwrap();

    quizgen()
        .current_dir(dir.path())
        .arg("init")
        .assert()
        .success()
        .stdout(predicate::str::contains("Created quizgen.toml"));

    assert!(dir.path().join("quizgen.toml").exists());
}

#[test]
fn edited_starter_config_settings_take_effect() {
    let dir = TempDir::new().unwrap();

    quizgen()
        .current_dir(dir.path())
        .arg("init")
        .assert()
        .success();

    // Edit top-level settings the way a user would.
    let path = dir.path().join("quizgen.toml");
    let edited = std::fs::read_to_string(&path)
        .unwrap()
        .replace("default_provider = \"gemini\"", "default_provider = \"openai\"")
        .replace("question_count = 10", "question_count = 15");
    std::fs::write(&path, edited).unwrap();

    let config = quizgen_providers::config::load_config_from(Some(&path)).unwrap();
    assert_eq!(config.default_provider, "openai");
    assert_eq!(config.question_count, 15);
    assert_eq!(config.providers.len(), 2);
}

#[test]
fn init_skips_existing() {
    let dir = TempDir::new().unwrap();

    quizgen()
        .current_dir(dir.path())
        .arg("init")
        .assert()
        .success();

    quizgen()
        .current_dir(dir.path())
        .arg("init")
        .assert()
        .success()
        .stdout(predicate::str::contains("already exists"));
}

#[test]
fn list_empty() {
    let dir = TempDir::new().unwrap();

    quizgen()
        .current_dir(dir.path())
        .arg("list")
        .assert()
        .success()
        .stdout(predicate::str::contains("No courses yet"));
}

#[test]
fn user_add_and_list() {
    let dir = TempDir::new().unwrap();

    quizgen()
        .current_dir(dir.path())
        .args(["user", "add", "Ana"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Registered Ana"));

    quizgen()
        .current_dir(dir.path())
        .args(["user", "list"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Ana"));
}

#[test]
fn duplicate_user_fails() {
    let dir = TempDir::new().unwrap();

    quizgen()
        .current_dir(dir.path())
        .args(["user", "add", "Ana"])
        .assert()
        .success();

    quizgen()
        .current_dir(dir.path())
        .args(["user", "add", " ana "])
        .assert()
        .failure()
        .stderr(predicate::str::contains("already exists"));
}

#[test]
fn create_with_missing_file_fails() {
    let dir = TempDir::new().unwrap();

    quizgen()
        .current_dir(dir.path())
        .args(["create", "--name", "c", "--file", "no_such_file.txt"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Error"));
}

#[test]
fn show_unknown_course_fails() {
    let dir = TempDir::new().unwrap();

    quizgen()
        .current_dir(dir.path())
        .args([
            "show",
            "--course",
            "00000000-0000-0000-0000-000000000001",
        ])
        .assert()
        .failure()
        .stderr(predicate::str::contains("not found"));
}

#[test]
fn quiz_requires_a_target() {
    let dir = TempDir::new().unwrap();

    quizgen()
        .current_dir(dir.path())
        .arg("quiz")
        .assert()
        .failure()
        .stderr(predicate::str::contains("--course or --lesson"));
}

#[test]
fn grade_with_missing_answers_file_fails() {
    let dir = TempDir::new().unwrap();

    quizgen()
        .current_dir(dir.path())
        .args([
            "grade",
            "--user",
            "00000000-0000-0000-0000-000000000001",
            "--answers",
            "missing.json",
        ])
        .assert()
        .failure()
        .stderr(predicate::str::contains("failed to read"));
}

#[test]
fn grade_with_malformed_answers_fails() {
    let dir = TempDir::new().unwrap();
    let answers = dir.path().join("answers.json");
    std::fs::write(&answers, "{not an array").unwrap();

    quizgen()
        .current_dir(dir.path())
        .args([
            "grade",
            "--user",
            "00000000-0000-0000-0000-000000000001",
            "--answers",
        ])
        .arg(&answers)
        .assert()
        .failure()
        .stderr(predicate::str::contains("invalid answers file"));
}

#[test]
fn corrupt_data_file_is_reported() {
    let dir = TempDir::new().unwrap();
    std::fs::write(dir.path().join("quizgen-data.json"), "{broken").unwrap();

    quizgen()
        .current_dir(dir.path())
        .arg("list")
        .assert()
        .failure()
        .stderr(predicate::str::contains("corrupt"));
}
