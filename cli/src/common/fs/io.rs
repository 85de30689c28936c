//! # Modpack Filesystem I/O Operations
//!
//! File: cli/src/common/fs/io.rs
//! Author: Christi Mahu
//!
//! ## Overview
//!
//! This module centralizes the small filesystem operations used by the
//! packaging pipeline: preparing a fresh directory, creating a directory with
//! the same permission bits as its source, reading text files, and extracting
//! permission bits from metadata in a portable way.
//!
//! All failures are reported as `ModpackError::Io` carrying the path that
//! failed, so a build error always tells the user which file was involved.
//!
use crate::core::error::{ModpackError, Result};
use std::fs;
use std::path::Path;
use tracing::{debug, info};

/// Ensures that a directory exists at the specified path, creating parents as needed.
///
/// # Errors
///
/// Returns an `Err` if the path exists but is not a directory, or if creating
/// the directory fails.
pub fn ensure_dir_exists(path: &Path) -> Result<()> {
    if !path.exists() {
        fs::create_dir_all(path).map_err(|e| {
            ModpackError::io(format!("Failed to create directory {}", path.display()), e)
        })?;
        info!("Created directory: {}", path.display());
    } else if !path.is_dir() {
        anyhow::bail!(ModpackError::Config(format!(
            "Path exists but is not a directory: {}",
            path.display()
        )));
    } else {
        debug!("Directory already exists: {}", path.display());
    }
    Ok(())
}

/// Removes `path` and everything below it when it exists. A missing path is not an error.
pub fn remove_dir_if_exists(path: &Path) -> Result<()> {
    match fs::symlink_metadata(path) {
        Ok(meta) if meta.is_dir() => {
            fs::remove_dir_all(path).map_err(|e| {
                ModpackError::io(format!("Failed to remove directory {}", path.display()), e)
            })?;
            debug!("Removed directory: {}", path.display());
        }
        Ok(_) => {
            fs::remove_file(path).map_err(|e| {
                ModpackError::io(format!("Failed to remove {}", path.display()), e)
            })?;
        }
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
        Err(e) => {
            return Err(ModpackError::io(format!("Failed to inspect {}", path.display()), e).into())
        }
    }
    Ok(())
}

/// Removes a file when it exists. A missing file is not an error.
pub fn remove_file_if_exists(path: &Path) -> Result<()> {
    match fs::remove_file(path) {
        Ok(()) => {
            debug!("Removed file: {}", path.display());
            Ok(())
        }
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
        Err(e) => Err(ModpackError::io(format!("Failed to remove {}", path.display()), e).into()),
    }
}

/// Creates a single directory (parent must exist) with the permissions of `source_meta`.
pub fn create_dir_like(path: &Path, source_meta: &fs::Metadata) -> Result<()> {
    fs::create_dir(path).map_err(|e| {
        ModpackError::io(format!("Failed to create directory {}", path.display()), e)
    })?;
    fs::set_permissions(path, source_meta.permissions()).map_err(|e| {
        ModpackError::io(
            format!("Failed to set permissions on {}", path.display()),
            e,
        )
    })?;
    Ok(())
}

/// Reads the entire content of a file into a string.
pub fn read_file_to_string(path: &Path) -> Result<String> {
    fs::read_to_string(path)
        .map_err(|e| ModpackError::io(format!("Failed to read file {}", path.display()), e).into())
}

/// Returns the permission bits (`0o7777` range) recorded in `meta`.
#[cfg(unix)]
pub fn permission_bits(meta: &fs::Metadata) -> u32 {
    use std::os::unix::fs::PermissionsExt;
    meta.permissions().mode() & 0o7777
}

/// Returns the permission bits (`0o7777` range) recorded in `meta`.
///
/// Non-Unix filesystems only expose a read-only flag, so conventional
/// directory/file modes are synthesised from it.
#[cfg(not(unix))]
pub fn permission_bits(meta: &fs::Metadata) -> u32 {
    let base = if meta.is_dir() { 0o755 } else { 0o644 };
    if meta.permissions().readonly() {
        base & !0o222
    } else {
        base
    }
}
