//! # Modpack Error Types
//!
//! File: cli/src/core/error.rs
//! Author: Christi Mahu
//!
//! ## Overview
//!
//! This module defines the error taxonomy used throughout modpack. Every error
//! listed here is fatal to the build that raised it; the only recoverable
//! condition during packaging (a symlink in the module tree) is reported as a
//! warning and never reaches this type.
//!
//! ## Architecture
//!
//! The error system consists of two main components:
//! - `ModpackError`: A custom error enum using `thiserror` for the specific failure classes
//! - `Result<T>`: A type alias for `anyhow::Result<T>` for flexible error handling
//!
//! The error classes are:
//! - Configuration errors (bad module path, bad config file, bad ignore pattern)
//! - Metadata errors (`metadata.json` missing or malformed)
//! - Encoding errors (non-ASCII path names)
//! - Path length errors (paths the USTAR header cannot represent)
//! - I/O errors (copying, directory creation, archive writing)
//!
//! ## Examples
//!
//! ```rust
//! // Return a specific error type
//! if !path.is_dir() {
//!     anyhow::bail!(ModpackError::Config(format!("Not a directory: {}", path.display())));
//! }
//!
//! // Recover the typed error from an anyhow chain
//! match builder.build() {
//!     Err(e) if matches!(e.downcast_ref::<ModpackError>(), Some(ModpackError::Encoding { .. })) => {
//!         eprintln!("Rename the offending file to plain ASCII.");
//!     }
//!     other => other?,
//! }
//! ```
//!
use std::fmt;
use thiserror::Error;

/// Remediation hint appended to every path length failure.
pub const RENAME_OR_EXCLUDE_HINT: &str = "rename the file or exclude it from the package";

/// Which USTAR limit a path violated.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PathTooLongReason {
    /// More than 256 bytes; no split can ever fit.
    ExceedsMaximum,
    /// Over 100 bytes and no separator yields a <=155 / <=100 split.
    Unsplittable,
}

impl fmt::Display for PathTooLongReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PathTooLongReason::ExceedsMaximum => f.write_str("path longer than 256 characters"),
            PathTooLongReason::Unsplittable => {
                f.write_str("path could not be split to fit the archive format")
            }
        }
    }
}

/// Custom error type for modpack.
#[derive(Error, Debug)]
pub enum ModpackError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Metadata error: {0}")]
    Metadata(String),

    #[error("Invalid path '{path}': path may only contain ASCII characters")]
    Encoding { path: String },

    #[error("Invalid path '{path}': {reason}; {hint}", hint = RENAME_OR_EXCLUDE_HINT)]
    PathTooLong {
        path: String,
        reason: PathTooLongReason,
    },

    #[error("Invalid ignore pattern '{pattern}' at {origin}:{line}")]
    IgnorePattern {
        origin: String,
        line: usize,
        pattern: String,
    },

    #[error("I/O error: {context}: {source}")]
    Io {
        context: String,
        #[source]
        source: std::io::Error,
    },
}

impl ModpackError {
    /// Wraps an `io::Error` with a description of the operation that failed.
    pub fn io(context: impl Into<String>, source: std::io::Error) -> Self {
        ModpackError::Io {
            context: context.into(),
            source,
        }
    }
}

/// Type alias for Result using anyhow::Error for broad compatibility.
/// Typed `ModpackError` values travel inside it and can be recovered with `downcast_ref`.
pub type Result<T> = anyhow::Result<T>;
