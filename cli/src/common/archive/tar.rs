//! # Modpack TAR Archive Operations (`common::archive::tar`)
//!
//! File: cli/src/common/archive/tar.rs
//! Author: Christi Mahu
//!
//! ## Overview
//!
//! This module writes the release artifact: a gzipped tarball containing the
//! staging directory under a single top-level directory named after the
//! release (`<name>-<version>/...`).
//!
//! ## Architecture
//!
//! The module leverages the `tar` crate for building the archive structure and
//! the `flate2` crate for Gzip compression.
//!
//! - Every header is built explicitly with `Header::new_ustar()`. Long paths
//!   are stored through the USTAR prefix/name split; GNU long-name records and
//!   pax extensions are never emitted, so any installer that understands plain
//!   USTAR can unpack the result.
//! - Mode bits, size and modification time come from the staged copies.
//!   Ownership is normalised to uid/gid 0.
//! - Directory listings are sorted by file name so repeated runs on the same
//!   machine enumerate entries in the same order.
//! - Symlinks and special files cannot appear in a staging directory built by
//!   the stager; if one does, it is skipped with a warning.
//!
use crate::common::fs::io::permission_bits;
use crate::core::error::{ModpackError, Result};
use anyhow::anyhow;
use flate2::{write::GzEncoder, Compression};
use std::ffi::OsStr;
use std::fs::{self, File};
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};
use std::time::UNIX_EPOCH;
use tar::{EntryType, Header};
use tracing::{debug, info, warn};
use walkdir::WalkDir;

/// # Write Gzipped USTAR Package (`write_package`)
///
/// Archives `build_dir` (itself included as the top-level entry) into a
/// gzip-compressed tar file at `archive_path`, overwriting any existing file.
///
/// The archive is written next to `archive_path` under a `.partial` name and
/// renamed into place only once complete. On failure the partial file is
/// removed, so `archive_path` never holds a truncated archive.
///
/// ## Returns
///
/// * `Result<usize>` - The number of entries written (directories and files).
///
/// ## Errors
///
/// Returns `ModpackError::Io` if the archive cannot be created or written, or a
/// staged file cannot be read. Returns `ModpackError::Config` if `build_dir`
/// has no final path component to root the archive entries under.
pub fn write_package(build_dir: &Path, archive_path: &Path) -> Result<usize> {
    let root_name = build_dir.file_name().ok_or_else(|| {
        anyhow!(ModpackError::Config(format!(
            "Build directory '{}' has no name to root archive entries under",
            build_dir.display()
        )))
    })?;
    info!(
        "Writing archive {} from {}",
        archive_path.display(),
        build_dir.display()
    );

    let partial = partial_path(archive_path);
    let written = match write_entries(build_dir, root_name, &partial) {
        Ok(written) => written,
        Err(e) => {
            if let Err(cleanup) = fs::remove_file(&partial) {
                debug!("Could not remove {}: {}", partial.display(), cleanup);
            }
            return Err(e);
        }
    };
    fs::rename(&partial, archive_path).map_err(|e| {
        ModpackError::io(
            format!("Failed to move archive into place at {}", archive_path.display()),
            e,
        )
    })?;

    info!("Archive written with {} entries", written);
    Ok(written)
}

/// `<archive_path>.partial`, in the same directory so the final rename stays on one filesystem.
fn partial_path(archive_path: &Path) -> PathBuf {
    let mut name = archive_path.as_os_str().to_os_string();
    name.push(".partial");
    PathBuf::from(name)
}

fn write_entries(build_dir: &Path, root_name: &OsStr, archive_path: &Path) -> Result<usize> {
    let archive_err =
        |e: io::Error| ModpackError::io(format!("Failed to write archive {}", archive_path.display()), e);

    let file = File::create(archive_path).map_err(archive_err)?;
    let encoder = GzEncoder::new(BufWriter::new(file), Compression::default());
    let mut tar_builder = tar::Builder::new(encoder);

    let mut written = 0usize;
    for entry_result in WalkDir::new(build_dir).follow_links(false).sort_by_file_name() {
        let entry = entry_result.map_err(|e| {
            ModpackError::io(
                format!("Failed to walk build directory {}", build_dir.display()),
                e.into(),
            )
        })?;
        let relative = entry.path().strip_prefix(build_dir).map_err(|_| {
            anyhow!(ModpackError::Config(format!(
                "Entry '{}' escaped build directory '{}'",
                entry.path().display(),
                build_dir.display()
            )))
        })?;
        let archive_name: PathBuf = if relative.as_os_str().is_empty() {
            PathBuf::from(root_name)
        } else {
            Path::new(root_name).join(relative)
        };
        let meta = entry.metadata().map_err(|e| {
            ModpackError::io(format!("Failed to stat {}", entry.path().display()), e.into())
        })?;

        let file_type = entry.file_type();
        if file_type.is_dir() {
            let header = ustar_header(&archive_name, &meta, EntryType::Directory, 0)?;
            tar_builder.append(&header, io::empty()).map_err(archive_err)?;
        } else if file_type.is_file() {
            let header = ustar_header(&archive_name, &meta, EntryType::Regular, meta.len())?;
            let data = File::open(entry.path()).map_err(|e| {
                ModpackError::io(format!("Failed to open {}", entry.path().display()), e)
            })?;
            tar_builder.append(&header, data).map_err(archive_err)?;
        } else {
            warn!(
                "Skipping unsupported entry in build directory: {}",
                entry.path().display()
            );
            continue;
        }
        debug!("Archived {}", archive_name.display());
        written += 1;
    }

    let encoder = tar_builder.into_inner().map_err(archive_err)?;
    let mut writer = encoder.finish().map_err(archive_err)?;
    writer.flush().map_err(archive_err)?;
    Ok(written)
}

/// Builds a USTAR header for one entry. Fails if the name cannot be split into the
/// prefix/name fields, which the stager normally rules out beforehand.
fn ustar_header(name: &Path, meta: &fs::Metadata, kind: EntryType, size: u64) -> Result<Header> {
    let mut header = Header::new_ustar();
    header.set_path(name).map_err(|e| {
        ModpackError::io(format!("Cannot store '{}' in a USTAR header", name.display()), e)
    })?;
    header.set_entry_type(kind);
    header.set_size(size);
    header.set_mode(permission_bits(meta));
    header.set_uid(0);
    header.set_gid(0);
    let mtime = meta
        .modified()
        .ok()
        .and_then(|t| t.duration_since(UNIX_EPOCH).ok())
        .map(|d| d.as_secs())
        .unwrap_or(0);
    header.set_mtime(mtime);
    header.set_cksum();
    Ok(header)
}
