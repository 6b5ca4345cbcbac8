//! Test utilities for creating temporary directory trees.
//!
//! This module is only compiled for tests and benchmarks.

use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// A temporary directory tree for testing.
///
/// The tree is automatically cleaned up when dropped.
pub struct TestTree {
    dir: TempDir,
}

impl TestTree {
    /// Create a new empty temporary directory.
    pub fn new() -> Self {
        let dir = TempDir::new().expect("Failed to create temp dir");
        Self { dir }
    }

    /// Create the small root-filesystem-like tree used across the test suite:
    ///
    /// ```text
    /// dev/random
    /// etc/certs/ca.crt
    /// etc/hostname
    /// lib/dynalib.so
    /// proc/1/exe
    /// proc/stat
    /// usr/bin/cp
    /// usr/bin/mv -> /usr/bin/cp   (unix only)
    /// ```
    pub fn rootfs() -> Self {
        let tree = Self::new();
        tree.add_file("dev/random", "random");
        tree.add_file("etc/certs/ca.crt", "-----BEGIN CERTIFICATE-----");
        tree.add_file("etc/hostname", "localhost");
        tree.add_file("lib/dynalib.so", "ELF");
        tree.add_file("proc/1/exe", "ELF");
        tree.add_file("proc/stat", "cpu 0 0 0");
        tree.add_file("usr/bin/cp", "ELF");
        #[cfg(unix)]
        tree.add_symlink("usr/bin/mv", "/usr/bin/cp");
        #[cfg(not(unix))]
        tree.add_file("usr/bin/mv", "ELF");
        tree
    }

    /// Get the path to the temporary directory.
    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    /// Add a file, creating parent directories as needed.
    pub fn add_file(&self, path: &str, content: &str) -> PathBuf {
        let full_path = self.dir.path().join(path);
        if let Some(parent) = full_path.parent() {
            fs::create_dir_all(parent).expect("Failed to create parent dirs");
        }
        fs::write(&full_path, content).expect("Failed to write file");
        full_path
    }

    /// Add a directory and any missing parents.
    pub fn add_dir(&self, path: &str) -> PathBuf {
        let full_path = self.dir.path().join(path);
        fs::create_dir_all(&full_path).expect("Failed to create dirs");
        full_path
    }

    /// Add a symlink at `path` pointing at `target` (stored verbatim).
    #[cfg(unix)]
    pub fn add_symlink(&self, path: &str, target: &str) -> PathBuf {
        let full_path = self.dir.path().join(path);
        if let Some(parent) = full_path.parent() {
            fs::create_dir_all(parent).expect("Failed to create parent dirs");
        }
        std::os::unix::fs::symlink(target, &full_path).expect("Failed to create symlink");
        full_path
    }

    /// Add `count` files spread over `dirs` directories nested `depth` levels deep.
    pub fn populate(&self, dirs: usize, depth: usize, count: usize) {
        for d in 0..dirs {
            let mut dir = format!("d{:03}", d);
            for level in 1..depth {
                dir = format!("{}/l{}", dir, level);
            }
            for f in 0..count {
                self.add_file(&format!("{}/f{:04}", dir, f), "");
            }
        }
    }
}

impl Default for TestTree {
    fn default() -> Self {
        Self::new()
    }
}
