//! # Modpack Common Utilities (`common`)
//!
//! File: cli/src/common/mod.rs
//! Author: Christi Mahu
//!
//! ## Overview
//!
//! Domain-neutral helpers used by the packaging engine.
//!
//! - **`archive`**: writing gzipped USTAR tarballs from a staged directory.
//! - **`fs`**: directory creation and removal, mode-preserving copies, and
//!   symlink inspection. Includes `io`, `copy`, `links`.
//!
//! ```rust
//! use crate::common::{archive, fs};
//!
//! fs::io::ensure_dir_exists(target)?;
//! archive::tar::write_package(build_dir, &package_file)?;
//! ```
//!

/// Tarball writing.
pub mod archive;
/// Filesystem operations (copying, I/O, links).
pub mod fs;
