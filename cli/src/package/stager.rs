//! # Modpack Staging Pass (`package::stager`)
//!
//! File: cli/src/package/stager.rs
//! Author: Christi Mahu
//!
//! ## Overview
//!
//! Walks the module tree depth-first and mirrors every entry that survives
//! the ignore rules and path validation into the build directory.
//!
//! ## Architecture
//!
//! The walk is driven by `walkdir` without following links. Each entry is
//! handed to `Stager::visit`, which returns a `StageOutcome`:
//!
//! - `Staged` - a directory was created or a file copied, permissions kept.
//! - `Pruned` - an ignored directory; the walker is told not to descend, so
//!   nothing below it is ever looked at.
//! - `Skipped` - an ignored file, a symlink (reported through the log sink
//!   with its module-relative target) or an unsupported special file.
//! - `Failed` - a validation or I/O error; the run stops immediately.
//!
//! A failed run leaves the build directory partially populated. Cleaning it
//! up is the caller's business.
//!
use crate::common::fs::{copy, io, links};
use crate::core::error::{ModpackError, Result};
use crate::package::ignore::IgnoreRuleSet;
use crate::package::sink::LogSink;
use crate::package::validate::{validate_encoding, validate_ustar_path};
use anyhow::anyhow;
use std::path::{Component, Path};
use tracing::{debug, info};
use walkdir::{DirEntry, WalkDir};

/// What a staged entry was.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryKind {
    File,
    Directory,
}

/// Why an entry was left out without failing the build.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SkipReason {
    Ignored,
    Symlink(links::SymlinkDescription),
    Unsupported,
}

/// Result of visiting one entry of the module tree.
#[derive(Debug)]
pub enum StageOutcome {
    Staged(EntryKind),
    Pruned,
    Skipped(SkipReason),
    Failed(anyhow::Error),
}

/// Counts of what a staging run did.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct StageReport {
    pub files: usize,
    pub directories: usize,
    pub pruned: usize,
    pub ignored: usize,
    pub symlinks: usize,
    pub unsupported: usize,
}

/// One staging pass from a module root into a build directory.
pub struct Stager<'a> {
    root: &'a Path,
    build_dir: &'a Path,
    release_name: &'a str,
    rules: &'a IgnoreRuleSet,
    sink: &'a dyn LogSink,
}

impl<'a> Stager<'a> {
    /// `root` must be canonical and `build_dir` must already exist.
    pub fn new(
        root: &'a Path,
        build_dir: &'a Path,
        release_name: &'a str,
        rules: &'a IgnoreRuleSet,
        sink: &'a dyn LogSink,
    ) -> Self {
        Stager {
            root,
            build_dir,
            release_name,
            rules,
            sink,
        }
    }

    /// Stages the whole tree, stopping at the first failure.
    pub fn run(&self) -> Result<StageReport> {
        info!(
            "Staging {} into {}",
            self.root.display(),
            self.build_dir.display()
        );
        let mut report = StageReport::default();
        // min_depth(1): the root itself has no relative path and is never staged.
        let mut walker = WalkDir::new(self.root)
            .min_depth(1)
            .follow_links(false)
            .into_iter();

        while let Some(entry_result) = walker.next() {
            let entry = entry_result.map_err(|e| {
                ModpackError::io(
                    format!("Failed to walk module directory {}", self.root.display()),
                    e.into(),
                )
            })?;
            match self.visit(&entry) {
                StageOutcome::Staged(EntryKind::File) => report.files += 1,
                StageOutcome::Staged(EntryKind::Directory) => report.directories += 1,
                StageOutcome::Pruned => {
                    walker.skip_current_dir();
                    report.pruned += 1;
                }
                StageOutcome::Skipped(SkipReason::Ignored) => report.ignored += 1,
                StageOutcome::Skipped(SkipReason::Symlink(link)) => {
                    debug!("Skipped symlink {}", link.link.display());
                    report.symlinks += 1;
                }
                StageOutcome::Skipped(SkipReason::Unsupported) => report.unsupported += 1,
                StageOutcome::Failed(err) => return Err(err),
            }
        }

        debug!("Staging finished: {:?}", report);
        Ok(report)
    }

    /// Decides and performs the action for a single entry.
    pub fn visit(&self, entry: &DirEntry) -> StageOutcome {
        let relative = match entry.path().strip_prefix(self.root) {
            Ok(p) => p,
            Err(_) => {
                return StageOutcome::Failed(anyhow!(ModpackError::Config(format!(
                    "Entry '{}' is outside module root '{}'",
                    entry.path().display(),
                    self.root.display()
                ))))
            }
        };
        let file_type = entry.file_type();

        if self.rules.is_ignored(relative, file_type.is_dir()) {
            return if file_type.is_dir() {
                debug!("Pruning ignored directory {}", relative.display());
                StageOutcome::Pruned
            } else {
                debug!("Skipping ignored path {}", relative.display());
                StageOutcome::Skipped(SkipReason::Ignored)
            };
        }

        if let Err(e) = validate_encoding(relative) {
            return StageOutcome::Failed(e.into());
        }

        let result = if file_type.is_dir() {
            self.stage_directory(entry, relative)
                .map(|()| StageOutcome::Staged(EntryKind::Directory))
        } else if file_type.is_symlink() {
            self.skip_symlink(entry)
        } else if file_type.is_file() {
            self.stage_file(entry, relative)
                .map(|()| StageOutcome::Staged(EntryKind::File))
        } else {
            self.sink.warn(&format!(
                "Skipping unsupported file system entry '{}'.",
                relative.display()
            ));
            Ok(StageOutcome::Skipped(SkipReason::Unsupported))
        };
        result.unwrap_or_else(StageOutcome::Failed)
    }

    fn stage_directory(&self, entry: &DirEntry, relative: &Path) -> Result<()> {
        self.check_archive_path(relative)?;
        let meta = entry_metadata(entry)?;
        io::create_dir_like(&self.build_dir.join(relative), &meta)?;
        debug!("Staged directory {}", relative.display());
        Ok(())
    }

    fn skip_symlink(&self, entry: &DirEntry) -> Result<StageOutcome> {
        let description = links::describe_symlink(entry.path(), self.root)?;
        self.sink.warn(&description.warning());
        Ok(StageOutcome::Skipped(SkipReason::Symlink(description)))
    }

    fn stage_file(&self, entry: &DirEntry, relative: &Path) -> Result<()> {
        self.check_archive_path(relative)?;
        let meta = entry_metadata(entry)?;
        copy::copy_file_preserving_mode(entry.path(), &self.build_dir.join(relative), &meta)?;
        Ok(())
    }

    /// Fails with `PathTooLong` unless the entry's archive path fits a USTAR header.
    fn check_archive_path(&self, relative: &Path) -> Result<()> {
        let archive_path = self.archive_path(relative);
        let split = validate_ustar_path(&archive_path)?;
        if !split.prefix.is_empty() {
            debug!(
                "{} stored as prefix '{}' + name '{}'",
                relative.display(),
                split.prefix,
                split.name
            );
        }
        Ok(())
    }

    /// `<release>/<relative>` with `/` separators, as stored in the archive.
    fn archive_path(&self, relative: &Path) -> String {
        let mut path = self.release_name.to_string();
        for component in relative.components() {
            if let Component::Normal(part) = component {
                path.push('/');
                path.push_str(&part.to_string_lossy());
            }
        }
        path
    }
}

fn entry_metadata(entry: &DirEntry) -> Result<std::fs::Metadata> {
    entry.metadata().map_err(|e| {
        ModpackError::io(format!("Failed to stat {}", entry.path().display()), e.into()).into()
    })
}
