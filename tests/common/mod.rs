//! Common test utilities

use assert_cmd::Command;
use std::fs;
use tempfile::TempDir;

/// Create a temporary directory with a serverctl.yml file
pub fn create_test_config(content: &str) -> (TempDir, std::path::PathBuf) {
    let temp_dir = TempDir::new().unwrap();
    let config_path = temp_dir.path().join("serverctl.yml");
    fs::write(&config_path, content).unwrap();
    (temp_dir, config_path)
}

/// The binary, isolated from any configuration of the current user
pub fn serverctl(home: &TempDir) -> Command {
    let mut cmd = Command::cargo_bin("serverctl").unwrap();
    cmd.env("XDG_CONFIG_HOME", home.path())
        .env("HOME", home.path())
        .env("NO_COLOR", "1")
        .env_remove("RUST_LOG");
    cmd
}
