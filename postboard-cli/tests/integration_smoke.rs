//! Smoke tests to verify command module wiring

use assert_cmd::Command;
use predicates::prelude::*;

fn postboard() -> Command {
    Command::cargo_bin("postboard").unwrap()
}

// === Top Level ===

#[test]
fn test_help_lists_commands() {
    postboard()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("serve"))
        .stdout(predicate::str::contains("migrate"))
        .stdout(predicate::str::contains("users"))
        .stdout(predicate::str::contains("posts"));
}

// === Serve / Migrate ===

#[test]
fn test_serve_help() {
    postboard()
        .args(["serve", "--help"])
        .assert()
        .success()
        .stdout(predicate::str::contains("--database-url"))
        .stdout(predicate::str::contains("--memory"))
        .stdout(predicate::str::contains("--skip-migrations"));
}

#[test]
fn test_migrate_requires_database_url() {
    postboard()
        .arg("migrate")
        .env("DATABASE_URL", "")
        .assert()
        .failure()
        .stderr(predicate::str::contains("DATABASE_URL not set"));
}

// === Client Commands ===

#[test]
fn test_users_help() {
    postboard()
        .args(["users", "--help"])
        .assert()
        .success()
        .stdout(predicate::str::contains("list"))
        .stdout(predicate::str::contains("create"))
        .stdout(predicate::str::contains("--endpoint"));
}

#[test]
fn test_users_create_requires_email() {
    postboard()
        .args(["users", "create", "--name", "Ada"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("--email"));
}

#[test]
fn test_posts_update_help() {
    postboard()
        .args(["posts", "update", "--help"])
        .assert()
        .success()
        .stdout(predicate::str::contains("--published"));
}

#[test]
fn test_posts_get_rejects_non_numeric_id() {
    postboard()
        .args(["posts", "get", "abc"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("invalid value"));
}

#[test]
fn test_client_reports_unreachable_server() {
    postboard()
        .args(["users", "list", "--endpoint", "http://127.0.0.1:9"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Failed to connect to postboard API"));
}
