//! # Modpack Archive Utilities Module (`common::archive`)
//!
//! File: cli/src/common/archive/mod.rs
//! Author: Christi Mahu
//!
//! ## Overview
//!
//! Archive writing for release artifacts. The only format modpack produces is
//! a gzipped USTAR tarball, implemented in the `tar` submodule.
//!
//! ```rust
//! use crate::common::archive;
//! # fn run(build_dir: &std::path::Path, out: &std::path::Path) -> crate::core::error::Result<()> {
//! let entries = archive::tar::write_package(build_dir, out)?;
//! # Ok(())
//! # }
//! ```
//!

pub mod tar;
