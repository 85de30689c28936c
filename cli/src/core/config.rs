//! # Modpack Configuration System
//!
//! File: cli/src/core/config.rs
//! Author: Christi Mahu
//!
//! ## Overview
//!
//! This module loads, merges and validates the optional TOML configuration that
//! tunes a packaging run. Nothing here is required: with no configuration files
//! present, modpack writes to `<module>/pkg` and uses only the module's own
//! ignore file plus the built-in output exclusion.
//!
//! ## Architecture
//!
//! Configuration sources (in order of precedence):
//! 1. Module-local `.modpack.toml` at the module root
//! 2. User-specific `config.toml` in the platform config directory
//!    (`~/.config/modpack/config.toml` on Linux), or the file named by
//!    `MODPACK_CONFIG` when that variable is set
//! 3. Default values defined in the code
//!
//! Scalar settings from the module file win over the user file. Extra ignore
//! patterns are concatenated (user first, module second) since both lists
//! only ever add exclusions.
//!
//! ## Examples
//!
//! ```toml
//! [build]
//! destination = "~/releases"
//! keep_build_dir = true
//!
//! [ignore]
//! patterns = ["/fixtures/", "*.orig"]
//! ```
//!
use crate::common::fs::io as fsio;
use crate::core::error::{ModpackError, Result};
use anyhow::anyhow;
use directories::ProjectDirs;
use serde::Deserialize;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Represents the main configuration structure, loaded from TOML files.
#[derive(Deserialize, Debug, Default, Clone, PartialEq, Eq)]
#[serde(deny_unknown_fields)] // Error if unknown fields are in TOML
pub struct Config {
    #[serde(default)]
    pub build: BuildConfig,
    #[serde(default)]
    pub ignore: IgnoreConfig,
}

/// Settings for the output side of a build.
#[derive(Deserialize, Debug, Default, Clone, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct BuildConfig {
    /// Directory receiving the staging directory and archive (can use ~).
    /// Relative paths are resolved against the module root.
    pub destination: Option<String>,
    /// Keep `<destination>/<release>` after the archive is written.
    pub keep_build_dir: Option<bool>,
}

/// Additional ignore rules applied on top of the module's ignore file.
#[derive(Deserialize, Debug, Default, Clone, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct IgnoreConfig {
    #[serde(default)]
    pub patterns: Vec<String>,
}

/// File name of the module-local configuration.
pub const PROJECT_CONFIG_FILENAME: &str = ".modpack.toml";
/// Environment variable overriding the user configuration path.
pub const CONFIG_ENV_VAR: &str = "MODPACK_CONFIG";

/// Loads the merged, expanded and validated configuration for `module_dir`.
pub fn load_config(module_dir: &Path) -> Result<Config> {
    let user_config = match user_config_path() {
        Some(path) => load_optional(&path)?,
        None => None,
    };
    let project_config = load_optional(&module_dir.join(PROJECT_CONFIG_FILENAME))?;
    let mut merged = merge_configs(user_config.unwrap_or_default(), project_config);
    expand_config_paths(&mut merged);
    validate_config(&merged)?;
    debug!("Final loaded configuration: {:?}", merged);
    Ok(merged)
}

fn user_config_path() -> Option<PathBuf> {
    if let Some(explicit) = std::env::var_os(CONFIG_ENV_VAR) {
        return Some(PathBuf::from(explicit));
    }
    ProjectDirs::from("com", "Modpack", "modpack").map(|dirs| dirs.config_dir().join("config.toml"))
}

fn load_optional(path: &Path) -> Result<Option<Config>> {
    if path.is_file() {
        info!("Loading configuration from: {}", path.display());
        load_config_from_path(path).map(Some)
    } else {
        debug!("Configuration file not found at {}", path.display());
        Ok(None)
    }
}

fn load_config_from_path(path: &Path) -> Result<Config> {
    let content = fsio::read_file_to_string(path)?;
    toml::from_str(&content).map_err(|e| {
        anyhow!(ModpackError::Config(format!(
            "Failed to parse TOML from file {}: {}",
            path.display(),
            e
        )))
    })
}

fn merge_configs(user: Config, project: Option<Config>) -> Config {
    let project_cfg = match project {
        Some(p) => p,
        None => return user,
    };
    let mut patterns = user.ignore.patterns;
    patterns.extend(project_cfg.ignore.patterns);
    Config {
        build: BuildConfig {
            destination: project_cfg.build.destination.or(user.build.destination),
            keep_build_dir: project_cfg.build.keep_build_dir.or(user.build.keep_build_dir),
        },
        ignore: IgnoreConfig { patterns },
    }
}

fn expand_config_paths(config: &mut Config) {
    if let Some(destination) = config.build.destination.as_mut() {
        *destination = shellexpand::tilde(destination.as_str()).into_owned();
        debug!("Expanded destination: {}", destination);
    }
}

fn validate_config(config: &Config) -> Result<()> {
    if let Some(destination) = &config.build.destination {
        if destination.trim().is_empty() {
            return Err(anyhow!(ModpackError::Config(
                "build.destination cannot be an empty path.".to_string()
            )));
        }
    }
    if config.ignore.patterns.iter().any(|p| p.trim().is_empty()) {
        return Err(anyhow!(ModpackError::Config(
            "ignore.patterns cannot contain empty patterns.".to_string()
        )));
    }
    Ok(())
}

impl Config {
    /// Resolves the configured destination against the module root, if one is set.
    pub fn destination_for(&self, module_root: &Path) -> Option<PathBuf> {
        self.build
            .destination
            .as_ref()
            .map(|d| module_root.join(d)) // `join` keeps absolute paths as-is
    }
}
