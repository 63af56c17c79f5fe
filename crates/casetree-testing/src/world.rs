//! TestWorld pattern for CLI integration tests.

use anyhow::Result;
use assert_cmd::Command;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// Isolated directory holding payload files and an optional config.
///
/// # Example
/// ```no_run
/// use casetree_testing::{TestWorld, fixtures};
///
/// let world = TestWorld::new();
/// let payload = world.write_payload("cases.json", &fixtures::sample_payload()).unwrap();
/// ```
pub struct TestWorld {
    temp_dir: TempDir,
    config_path: PathBuf,
}

impl Default for TestWorld {
    fn default() -> Self {
        Self::new()
    }
}

impl TestWorld {
    pub fn new() -> Self {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let config_path = temp_dir.path().join("casetree.toml");
        Self {
            temp_dir,
            config_path,
        }
    }

    pub fn temp_dir(&self) -> &Path {
        self.temp_dir.path()
    }

    /// Path passed as `--config`; the file only exists after `with_config`.
    pub fn config_path(&self) -> &Path {
        &self.config_path
    }

    /// Write `casetree.toml` with the given contents.
    pub fn with_config(self, contents: &str) -> Self {
        std::fs::write(&self.config_path, contents).expect("Failed to write config");
        self
    }

    /// Write a payload file and return its path.
    pub fn write_payload(&self, name: &str, contents: &str) -> Result<PathBuf> {
        let path = self.temp_dir.path().join(name);
        std::fs::write(&path, contents)?;
        Ok(path)
    }

    /// Point a CLI command at this world's config and working directory.
    ///
    /// The caller provides the base command (e.g. `cargo_bin_cmd!("casetree")`).
    pub fn configure_command<'a>(&self, cmd: &'a mut Command) -> &'a mut Command {
        cmd.arg("--config")
            .arg(&self.config_path)
            .current_dir(self.temp_dir.path())
            .env("NO_COLOR", "1")
    }
}
