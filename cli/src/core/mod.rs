//! # Modpack Core Infrastructure
//!
//! File: cli/src/core/mod.rs
//! Author: Christi Mahu
//!
//! ## Overview
//!
//! Infrastructure shared by the command handlers and the packaging engine:
//! - `config`: configuration loading, merging, and validation
//! - `error`: the `ModpackError` taxonomy and the crate-wide `Result` alias
//!
//! ```rust
//! use crate::core::config;
//! use crate::core::error::{ModpackError, Result};
//! ```
//!
pub mod config;
pub mod error;
