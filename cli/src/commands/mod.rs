//! # Modpack Command Modules
//!
//! File: cli/src/commands/mod.rs
//! Author: Christi Mahu
//!
//! ## Overview
//!
//! Command handlers reachable from `main.rs`. Each handler owns its clap
//! argument struct and a `handle_*` function.
//!
//! - `build`: stage a module and write its release archive.
//!

/// Builds a release package from a module directory.
pub mod build;
