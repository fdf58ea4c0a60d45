//! Common test utilities for CLI integration tests.
//!
//! Every test runs the binary against its own temporary root and an empty
//! configuration directory, with `METATREE_*` variables cleared.

use assert_cmd::Command;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// Test environment with an isolated root and configuration directory.
pub struct TestEnv {
    #[allow(dead_code)]
    temp_dir: TempDir,
    /// Directory whose metadata the commands address.
    pub root: PathBuf,
    /// User configuration directory.
    pub config_dir: PathBuf,
}

#[allow(dead_code)]
impl TestEnv {
    /// Create a new test environment.
    pub fn new() -> Self {
        let temp_dir = tempfile::tempdir().expect("Failed to create temp dir");
        let root = temp_dir.path().join("root");
        let config_dir = temp_dir.path().join("config");
        std::fs::create_dir_all(&root).expect("Failed to create root");
        std::fs::create_dir_all(&config_dir).expect("Failed to create config dir");

        Self {
            temp_dir,
            root,
            config_dir,
        }
    }

    /// A command with only the binary and a clean environment.
    pub fn command_bare(&self) -> Command {
        let mut cmd = Command::cargo_bin("metatree").expect("Failed to find metatree binary");
        for var in [
            "METATREE_ROOT",
            "METATREE_CONFIG_DIR",
            "METATREE_USER",
            "METATREE_IGNORE_CASE",
            "METATREE_TRACK_HISTORY",
            "METATREE_CODEC",
            "METATREE_LOG_MODE",
        ] {
            cmd.env_remove(var);
        }
        cmd.env("METATREE_USER", "tester");
        cmd
    }

    /// A command with `--root` and `--config-dir` pre-configured.
    pub fn command(&self) -> Command {
        let mut cmd = self.command_bare();
        cmd.arg("--root")
            .arg(&self.root)
            .arg("--config-dir")
            .arg(&self.config_dir);
        cmd
    }

    /// Create a subdirectory of the root.
    pub fn create_dir(&self, name: &str) -> PathBuf {
        let path = self.root.join(name);
        std::fs::create_dir_all(&path).expect("Failed to create test directory");
        path
    }

    /// Run `write` and assert success.
    pub fn write(&self, metapath: &str, value: &str) {
        self.command()
            .args(["write", metapath, "--value", value])
            .assert()
            .success();
    }

    /// Run `read` and return trimmed stdout, asserting success.
    pub fn read(&self, metapath: &str) -> String {
        let output = self
            .command()
            .args(["read", metapath])
            .output()
            .expect("Failed to run read command");
        assert!(
            output.status.success(),
            "read failed: {}",
            String::from_utf8_lossy(&output.stderr)
        );
        String::from_utf8(output.stdout)
            .expect("Invalid UTF-8 in output")
            .trim_end()
            .to_string()
    }

    /// Path below the root.
    pub fn path(&self, relative: &str) -> PathBuf {
        self.root.join(relative)
    }

    pub fn root(&self) -> &Path {
        &self.root
    }
}
