//! End-to-end tests of the `schemaloader` binary

use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use tempfile::TempDir;

const MODELS: &str = r#"[
    {
        "name": "User",
        "columns": [
            {"name": "id", "type": "bigint", "primary_key": true, "auto_increment": true},
            {"name": "name", "type": {"varchar": 255}}
        ]
    },
    {
        "name": "Story",
        "columns": [
            {"name": "id", "type": "bigint", "primary_key": true, "auto_increment": true},
            {"name": "title", "type": {"varchar": 255}},
            {"name": "author_id", "type": "bigint"}
        ],
        "relations": [
            {"name": "author", "kind": "belongs_to", "target": "User", "columns": ["author_id"]}
        ]
    }
]"#;

fn models_dir() -> TempDir {
    let dir = TempDir::new().unwrap();
    fs::write(dir.path().join("models.json"), MODELS).unwrap();
    dir
}

fn schemaloader() -> Command {
    let mut cmd = Command::cargo_bin("schemaloader").unwrap();
    cmd.env_remove("SCHEMALOADER_DIALECT").env_remove("RUST_LOG");
    cmd
}

#[test]
fn test_prints_postgres_script() {
    let dir = models_dir();
    schemaloader()
        .arg(dir.path())
        .assert()
        .success()
        .stdout(
            "CREATE TABLE \"users\" (\"id\" BIGSERIAL NOT NULL, \"name\" VARCHAR(255) NOT NULL, PRIMARY KEY (\"id\"));\n\
             CREATE TABLE \"stories\" (\"id\" BIGSERIAL NOT NULL, \"title\" VARCHAR(255) NOT NULL, \"author_id\" BIGINT NOT NULL, PRIMARY KEY (\"id\"), FOREIGN KEY (\"author_id\") REFERENCES \"users\" (\"id\"));\n",
        );
}

#[test]
fn test_dialect_from_environment() {
    let dir = models_dir();
    schemaloader()
        .env("SCHEMALOADER_DIALECT", "mysql")
        .arg(dir.path())
        .assert()
        .success()
        .stdout(predicate::str::starts_with(
            "CREATE TABLE `users` (`id` BIGINT NOT NULL AUTO_INCREMENT",
        ));
}

#[test]
fn test_flag_beats_environment() {
    let dir = models_dir();
    schemaloader()
        .env("SCHEMALOADER_DIALECT", "mysql")
        .args(["--dialect", "mssql", "--delimiter", "\nGO"])
        .arg(dir.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("PRIMARY KEY ([id]))\nGO\n"));
}

#[test]
fn test_output_file() {
    let dir = models_dir();
    let output = dir.path().join("schema.sql");

    schemaloader()
        .args(["--dialect", "sqlite", "--output"])
        .arg(&output)
        .arg(dir.path().join("models.json"))
        .assert()
        .success()
        .stdout(predicate::str::is_empty());

    let sql = fs::read_to_string(&output).unwrap();
    assert!(sql.starts_with(
        "CREATE TABLE \"users\" (\"id\" INTEGER NOT NULL PRIMARY KEY AUTOINCREMENT"
    ));
}

#[test]
fn test_config_file() {
    let dir = models_dir();
    let config = dir.path().join("schemaloader.toml");
    fs::write(&config, "dialect = \"oracle\"\nquote_identifiers = false\n").unwrap();

    schemaloader()
        .arg("--config")
        .arg(&config)
        .arg(dir.path().join("models.json"))
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "CREATE TABLE users (id NUMBER(19) GENERATED BY DEFAULT AS IDENTITY NOT NULL",
        ));
}

#[test]
fn test_unresolved_relationship_fails() {
    let dir = TempDir::new().unwrap();
    let story_only = MODELS.replacen("\"User\"", "\"Person\"", 1);
    fs::write(dir.path().join("models.json"), story_only).unwrap();

    schemaloader()
        .arg(dir.path())
        .assert()
        .failure()
        .code(1)
        .stdout(predicate::str::is_empty())
        .stderr(predicate::str::contains(
            "Unresolved relationship from 'Story' to 'User'",
        ));
}

#[test]
fn test_unknown_dialect() {
    let dir = models_dir();
    schemaloader()
        .args(["--dialect", "db2"])
        .arg(dir.path())
        .assert()
        .failure()
        .stderr(predicate::str::contains("Unsupported dialect: 'db2'"));
}
