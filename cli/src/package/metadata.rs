//! # Modpack Module Metadata (`package::metadata`)
//!
//! File: cli/src/package/metadata.rs
//! Author: Christi Mahu
//!
//! ## Overview
//!
//! Reads `metadata.json` from the module root and extracts the two fields the
//! packager needs: `name` and `version`. Everything else in the document is
//! carried into the package untouched (the file itself is staged like any
//! other) but not interpreted here.
//!
//! The release name is `<name>-<version>`. Forge-style names written as
//! `author/module` are normalised to `author-module` so the release name is
//! always a single path component.
//!
use crate::core::error::{ModpackError, Result};
use anyhow::anyhow;
use serde::Deserialize;
use std::fs;
use std::path::Path;
use tracing::debug;

/// File name of the metadata document at the module root.
pub const METADATA_FILENAME: &str = "metadata.json";

/// The parts of `metadata.json` the packager relies on.
#[derive(Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct Metadata {
    pub name: String,
    pub version: String,
}

impl Metadata {
    /// `<name>-<version>`, used for both the staging directory and the archive.
    pub fn release_name(&self) -> String {
        format!("{}-{}", self.name.replace('/', "-"), self.version)
    }
}

/// Reads and validates `<module_root>/metadata.json`.
///
/// # Errors
///
/// Returns `ModpackError::Metadata` when the document is missing, unreadable,
/// not a JSON object, or lacks non-empty string `name` and `version` fields.
pub fn read_metadata(module_root: &Path) -> Result<Metadata> {
    let path = module_root.join(METADATA_FILENAME);
    let content = fs::read_to_string(&path).map_err(|e| {
        anyhow!(ModpackError::Metadata(format!(
            "Unable to read {}: {}",
            path.display(),
            e
        )))
    })?;
    let metadata = parse_metadata(&content).map_err(|reason| {
        anyhow!(ModpackError::Metadata(format!(
            "Invalid {}: {}",
            path.display(),
            reason
        )))
    })?;
    debug!("Loaded metadata for {}", metadata.release_name());
    Ok(metadata)
}

fn parse_metadata(content: &str) -> std::result::Result<Metadata, String> {
    let value: serde_json::Value = serde_json::from_str(content).map_err(|e| e.to_string())?;
    if !value.is_object() {
        return Err("expected a JSON object".to_string());
    }
    let metadata: Metadata = serde_json::from_value(value).map_err(|e| e.to_string())?;
    for (field, text) in [("name", &metadata.name), ("version", &metadata.version)] {
        if text.trim().is_empty() {
            return Err(format!("field '{}' must not be empty", field));
        }
    }
    Ok(metadata)
}
