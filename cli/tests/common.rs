//! # Modpack CLI Integration Test Common Helpers
//!
//! File: cli/tests/common.rs
//! Author: Christi Mahu
//!
//! ## Overview
//!
//! Shared helpers for the integration tests in `cli/tests/`. Each test file
//! declares `mod common;` and uses `modpack_cmd()` to run the compiled binary.
//!

// Different test files use different helpers.
#![allow(dead_code)]

pub use assert_cmd::Command;
use std::fs;
use std::path::{Path, PathBuf};

/// # Get Modpack Command (`modpack_cmd`)
///
/// Creates an `assert_cmd::Command` for the compiled `modpack` binary.
/// The user configuration is pointed at a path that does not exist so the
/// developer's own `config.toml` never leaks into test runs.
///
/// ## Panics
/// Panics if the `modpack` binary cannot be found via `Command::cargo_bin`.
pub fn modpack_cmd() -> Command {
    let mut cmd = Command::cargo_bin("modpack").expect("Failed to find modpack binary for testing");
    cmd.env("MODPACK_CONFIG", "/nonexistent/modpack/config.toml");
    cmd.env_remove("RUST_LOG");
    cmd
}

/// Writes `content` to `root/rel`, creating parent directories.
pub fn write_file(root: &Path, rel: &str, content: &str) -> PathBuf {
    let path = root.join(rel);
    fs::create_dir_all(path.parent().expect("relative path has a parent")).expect("create parents");
    fs::write(&path, content).expect("write test file");
    path
}

/// Creates a minimal module with `metadata.json` and one manifest.
pub fn sample_module(root: &Path, name: &str, version: &str) {
    write_file(
        root,
        "metadata.json",
        &format!(r#"{{"name": "{}", "version": "{}"}}"#, name, version),
    );
    write_file(root, "manifests/init.pp", "class sample {}\n");
}

/// Lists entry paths of a `.tar.gz`, trailing slashes removed.
pub fn archive_entries(path: &Path) -> Vec<String> {
    let file = fs::File::open(path).expect("open archive");
    let mut archive = tar::Archive::new(flate2::read::GzDecoder::new(file));
    archive
        .entries()
        .expect("read entries")
        .map(|e| {
            let entry = e.expect("entry");
            entry
                .path()
                .expect("entry path")
                .to_string_lossy()
                .trim_end_matches('/')
                .to_string()
        })
        .collect()
}
