//! Test helpers shared across xsearch-config unit tests.

use std::{
    fs,
    path::{Path, PathBuf},
};

use tempfile::TempDir;

use crate::discovery::CONFIG_FILENAME;

/// Temporary directory utility for tests.
pub struct TestDir {
    /// The temporary root, removed on drop.
    root: TempDir,
}

impl TestDir {
    /// Creates a new temporary directory tree.
    pub fn new() -> Self {
        Self {
            root: tempfile::tempdir().unwrap(),
        }
    }

    /// Returns the path to the root.
    pub fn path(&self) -> &Path {
        self.root.path()
    }

    /// Creates a directory relative to the root.
    pub fn create_dir(&self, rel_path: &str) -> PathBuf {
        let path = self.root.path().join(rel_path);
        fs::create_dir_all(&path).unwrap();
        path
    }

    /// Writes an `.xsearch.toml` with a single field in the given subdirectory.
    pub fn create_config(&self, rel_path: &str) -> PathBuf {
        self.create_config_with_content(rel_path, "[[field]]\nname = \"all\"\n")
    }

    /// Writes an `.xsearch.toml` at the root.
    pub fn create_config_at_root(&self) -> PathBuf {
        self.create_config_with_content("", "# root config\n")
    }

    /// Writes an `.xsearch.toml` with custom contents in the given subdirectory.
    pub fn create_config_with_content(&self, rel_path: &str, content: &str) -> PathBuf {
        let dir = self.create_dir(rel_path);
        let config = dir.join(CONFIG_FILENAME);
        fs::write(&config, content).unwrap();
        config
    }

    /// Writes a `root = true` config in the given subdirectory.
    pub fn create_root_config(&self, rel_path: &str) -> PathBuf {
        self.create_config_with_content(rel_path, "root = true\n")
    }
}
