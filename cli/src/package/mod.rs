//! # Modpack Packaging Engine (`package`)
//!
//! File: cli/src/package/mod.rs
//! Author: Christi Mahu
//!
//! ## Overview
//!
//! The staging-and-validation engine that turns a module source tree into a
//! release archive. Components, leaves first:
//!
//! - **`metadata`**: reads `name`/`version` from `metadata.json`.
//! - **`ignore`**: locates the ignore file and evaluates gitignore-style rules.
//! - **`validate`**: ASCII and USTAR path-length checks (pure functions).
//! - **`stager`**: walks the module, prunes ignored subtrees, copies survivors.
//! - **`sink`**: where warnings (skipped symlinks) are reported.
//! - **`builder`**: runs the steps in order and returns the archive path.
//!
//! Archive writing itself lives in `common::archive`.
//!

pub mod builder;
pub mod ignore;
pub mod metadata;
pub mod sink;
pub mod stager;
pub mod validate;

pub use builder::Builder;
