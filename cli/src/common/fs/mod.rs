//! # Modpack Filesystem Utilities (`common::fs`)
//!
//! File: cli/src/common/fs/mod.rs
//! Author: Christi Mahu
//!
//! ## Overview
//!
//! Filesystem helpers used by the staging pass. Functionality is delegated to
//! specialized submodules:
//!
//! - **`copy`**: Copies a single file into the staging directory, preserving its permission bits.
//! - **`io`**: Directory preparation and removal, text file reads, portable permission bits.
//! - **`links`**: Describes symbolic links relative to the module root for skip warnings.
//!
//! Callers import the specific submodule they need, e.g.
//! `use crate::common::fs::io::ensure_dir_exists;`.
//!

/// Copies files while preserving permission bits (`copy_file_preserving_mode`).
pub mod copy;
/// Basic I/O operations (`ensure_dir_exists`, `remove_dir_if_exists`, `permission_bits`, ...).
pub mod io;
/// Symbolic link inspection (`describe_symlink`).
pub mod links;
