//! Test helper functions and utilities
//!
//! This module provides common helper functions for preparing directories and
//! canned git output in tests.

#![allow(dead_code)]

use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// Helper functions for file system operations in tests
pub struct FileSystemHelper;

impl FileSystemHelper {
    /// Create a file, including its parent directories
    pub fn create_file(base: &Path, relative: &str, content: &str) -> PathBuf {
        let file_path = base.join(relative);
        if let Some(parent) = file_path.parent() {
            std::fs::create_dir_all(parent).expect("Failed to create parent directory");
        }
        std::fs::write(&file_path, content).expect("Failed to write file");
        file_path
    }

    /// Lay out something that looks like a cloned data repository
    pub fn create_working_copy(temp_dir: &TempDir, relative: &str) -> PathBuf {
        let root = temp_dir.path().join(relative);
        Self::create_file(&root, ".git/HEAD", "ref: refs/heads/master\n");
        Self::create_file(&root, "ddf--concepts.csv", "concept,concept_type\ngeo,entity_domain\n");
        Self::create_file(
            &root,
            "ddf--entities--geo.csv",
            "geo,name\nnld,Netherlands\nukr,Ukraine\nswe,Sweden\n",
        );
        Self::create_file(&root, "lang/nl-nl/ddf--concepts.csv", "concept,name\n");
        root
    }

    /// Count direct entries of a directory
    pub fn count_entries(dir: &Path) -> usize {
        std::fs::read_dir(dir)
            .map(|entries| entries.count())
            .unwrap_or(0)
    }
}

/// Canned git output
pub struct GitOutput;

impl GitOutput {
    pub const DESTINATION_EXISTS: &'static str =
        "fatal: destination path 'master' already exists and is not an empty directory.\n";

    pub fn log_entry(hash: &str, unix_time: i64, date: &str, subject: &str) -> String {
        format!("{}\n{}\n{}\n{}\n\n", hash, unix_time, date, subject)
    }

    pub fn path_absent(file: &str, commit: &str) -> String {
        format!("fatal: Path '{}' does not exist in '{}'\n", file, commit)
    }
}
