//! Integration tests for the generated command line surface

mod common;

use common::serverctl;
use predicates::prelude::*;
use tempfile::TempDir;

#[test]
fn test_help_lists_commands() {
    let home = TempDir::new().unwrap();
    serverctl(&home)
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("start-dev"))
        .stdout(predicate::str::contains("show-config"))
        .stdout(predicate::str::contains("--verbose"));
}

#[test]
fn test_no_command_prints_help() {
    let home = TempDir::new().unwrap();
    serverctl(&home)
        .assert()
        .success()
        .stdout(predicate::str::contains("Usage: serverctl"));
}

#[test]
fn test_start_help_shows_runtime_options() {
    let home = TempDir::new().unwrap();
    serverctl(&home)
        .args(["start", "--help"])
        .assert()
        .success()
        .stdout(predicate::str::contains("--db-url <value>"))
        .stdout(predicate::str::contains("--https-certificate-key-file <value>"))
        .stdout(predicate::str::contains("--db-driver").not())
        .stdout(predicate::str::contains("--features").not());
}

#[test]
fn test_config_help_shows_features() {
    let home = TempDir::new().unwrap();
    serverctl(&home)
        .args(["config", "--help"])
        .assert()
        .success()
        .stdout(predicate::str::contains("--db <value>"))
        .stdout(predicate::str::contains("--features-token_exchange <value>"))
        .stdout(predicate::str::contains(
            "Enables a group of features. Possible values are: default,preview",
        ));
}

#[test]
fn test_unknown_option_is_usage_error() {
    let home = TempDir::new().unwrap();
    serverctl(&home)
        .args(["start", "--no-such-option", "x"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("--no-such-option"));
}

#[test]
fn test_build_time_option_rejected_on_start() {
    let home = TempDir::new().unwrap();
    serverctl(&home)
        .args(["start", "--db", "postgres"])
        .assert()
        .code(2);
}

#[test]
fn test_start_succeeds() {
    let home = TempDir::new().unwrap();
    serverctl(&home)
        .args(["start", "--http-port", "8080", "--hostname", "auth.example.com"])
        .assert()
        .success()
        .stdout("Server started using profile (prod).\n");
}

#[test]
fn test_start_dev_uses_dev_profile() {
    let home = TempDir::new().unwrap();
    serverctl(&home)
        .arg("start-dev")
        .assert()
        .success()
        .stdout("Server started using profile (dev).\n");
}

#[test]
fn test_provider_options_are_filtered() {
    let home = TempDir::new().unwrap();
    serverctl(&home)
        .args(["show-config", "--spi-events-listener=jboss", "--profile", "test"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Current Configuration: (test)"))
        .stdout(predicate::str::contains("kc.config.args = --profile"))
        .stdout(predicate::str::contains("spi").not());
}

#[test]
fn test_show_config_reads_file_and_masks_passwords() {
    let home = TempDir::new().unwrap();
    let (_dir, path) = common::create_test_config("db.password: secret\nhttp.port: 9090\n");

    serverctl(&home)
        .arg("show-config")
        .arg("--config-file")
        .arg(&path)
        .assert()
        .success()
        .stdout(predicate::str::contains("kc.http.port = 9090"))
        .stdout(predicate::str::contains("kc.db.password = *******"))
        .stdout(predicate::str::contains("secret").not());
}

#[test]
fn test_config_updates_build_options() {
    let home = TempDir::new().unwrap();
    serverctl(&home)
        .args(["config", "--db", "postgres", "--features-docker", "enabled"])
        .assert()
        .success()
        .stdout(predicate::str::contains("kc.db = postgres"))
        .stdout(predicate::str::contains("kc.features.docker = enabled"))
        .stdout(predicate::str::contains("Server configuration updated."));
}

#[test]
fn test_feature_toggle_rejects_other_values() {
    let home = TempDir::new().unwrap();
    serverctl(&home)
        .args(["config", "--features-docker", "on"])
        .assert()
        .code(2);
}
