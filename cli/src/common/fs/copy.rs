//! # Modpack Filesystem Copy Operations
//!
//! File: cli/src/common/fs/copy.rs
//! Author: Christi Mahu
//!
//! ## Overview
//!
//! Copies a single regular file into the staging directory while keeping its
//! permission bits exactly. `std::fs::copy` already carries permissions on
//! most platforms; the explicit `set_permissions` afterwards makes the result
//! independent of the process umask and of platform quirks.
//!
use crate::core::error::{ModpackError, Result};
use std::fs;
use std::path::Path;
use tracing::debug;

/// Copies `source` to `target`, then applies the permissions of `source_meta`.
///
/// # Errors
///
/// Returns `ModpackError::Io` when the copy or the permission update fails.
pub fn copy_file_preserving_mode(
    source: &Path,
    target: &Path,
    source_meta: &fs::Metadata,
) -> Result<u64> {
    let bytes = fs::copy(source, target).map_err(|e| {
        ModpackError::io(
            format!(
                "Failed to copy file {} to {}",
                source.display(),
                target.display()
            ),
            e,
        )
    })?;
    fs::set_permissions(target, source_meta.permissions()).map_err(|e| {
        ModpackError::io(
            format!("Failed to set permissions on {}", target.display()),
            e,
        )
    })?;
    debug!(
        "Copied {} bytes from {} to {}",
        bytes,
        source.display(),
        target.display()
    );
    Ok(bytes)
}
