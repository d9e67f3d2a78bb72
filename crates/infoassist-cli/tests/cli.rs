//! End-to-end tests for the `infoassist` binary.

use std::fs;
use std::path::Path;

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

fn project() -> TempDir {
    let dir = tempfile::tempdir().unwrap();
    let config_dir = dir.path().join(".infoassist");
    fs::create_dir_all(&config_dir).unwrap();
    fs::write(
        config_dir.join("config.yaml"),
        "i18n:\n  default_locale: en\n  supported_locales: [en, es]\n",
    )
    .unwrap();
    dir
}

fn infoassist(dir: &Path) -> Command {
    let mut cmd = Command::cargo_bin("infoassist").unwrap();
    cmd.current_dir(dir)
        .env("INFOASSIST_LOCALE", "en")
        .env_remove("INFOASSIST_CONFIG")
        .env_remove("INFOASSIST_LOG_LEVEL")
        .env_remove("RUST_LOG");
    cmd
}

#[test]
fn test_translates_builtin_key() {
    let dir = project();
    infoassist(dir.path())
        .args(["translate", "common.appTitle"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Information Assistant"));
}

#[test]
fn test_unknown_key_is_echoed() {
    let dir = project();
    infoassist(dir.path())
        .args(["t", "no.such.key"])
        .assert()
        .success()
        .stdout("no.such.key\n");
}

#[test]
fn test_use_persists_across_runs() {
    let dir = project();
    infoassist(dir.path())
        .args(["use", "es"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Español"));

    assert!(dir.path().join(".infoassist/state.json").exists());

    infoassist(dir.path())
        .args(["translate", "chat.clearChat"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Limpiar"));
}

#[test]
fn test_session_locale_is_not_persisted() {
    let dir = project();
    infoassist(dir.path())
        .args(["--locale", "es", "locales"])
        .assert()
        .success()
        .stdout(predicate::str::contains("* es"));

    assert!(!dir.path().join(".infoassist/state.json").exists());
}

#[test]
fn test_unsupported_locale_is_a_validation_error() {
    let dir = project();
    infoassist(dir.path())
        .args(["use", "fr"])
        .assert()
        .code(5)
        .stderr(predicate::str::contains("unsupported locale 'fr'"))
        .stderr(predicate::str::contains("supported locales: en, es"));
}

#[test]
fn test_locales_as_json() {
    let dir = project();
    let output = infoassist(dir.path())
        .args(["locales", "--format", "json"])
        .output()
        .unwrap();
    assert!(output.status.success());

    let rows: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    let rows = rows.as_array().unwrap();
    assert_eq!(rows.len(), 2);
    assert_eq!(rows[0]["key"], "en");
    assert_eq!(rows[0]["current"], true);
    assert_eq!(rows[1]["label"], "Español");
}

#[test]
fn test_formats_number_in_spanish() {
    let dir = project();
    infoassist(dir.path())
        .args(["-l", "es", "format", "number", "1234.5"])
        .assert()
        .success()
        .stdout("1234,5\n");

    infoassist(dir.path())
        .args(["-l", "es", "format", "number", "12345.5"])
        .assert()
        .success()
        .stdout("12.345,5\n");
}

#[test]
fn test_missing_config_file_is_a_config_error() {
    let dir = project();
    infoassist(dir.path())
        .args(["--config", "missing.yaml", "locales"])
        .assert()
        .code(2);
}

#[test]
fn test_strict_coverage_passes_for_builtin_catalogs() {
    let dir = project();
    infoassist(dir.path())
        .args(["coverage", "--strict"])
        .assert()
        .success()
        .stdout(predicate::str::contains("es: 0 missing"));
}
