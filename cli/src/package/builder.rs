//! # Modpack Build Orchestration (`package::builder`)
//!
//! File: cli/src/package/builder.rs
//! Author: Christi Mahu
//!
//! ## Overview
//!
//! `Builder` runs one packaging build from start to finish:
//!
//! 1. Read `metadata.json` and derive the release name `<name>-<version>`.
//! 2. Compute `<target>/<release>` (build directory) and
//!    `<target>/<release>.tar.gz` (package file).
//! 3. Build the ignore rule set (ignore file + built-in output exclusions).
//! 4. Recreate the build directory and run the `Stager` over the module.
//! 5. Write the gzipped USTAR archive from the build directory.
//!
//! Each step only starts once the previous one succeeded; the first error
//! ends the build. The build directory is left in place afterwards, whether
//! the build succeeded or not.
//!
//! ## Examples
//!
//! ```rust
//! let builder = Builder::new(Path::new("./my-module"), None)?;
//! let archive = builder.build()?;
//! println!("{}", archive.display());
//! ```
//!
use crate::common::archive;
use crate::common::fs::io;
use crate::core::error::{ModpackError, Result};
use crate::package::ignore::build_rule_set;
use crate::package::metadata::{read_metadata, Metadata};
use crate::package::sink::{LogSink, TracingSink};
use crate::package::stager::Stager;
use crate::package::validate::validate_encoding;
use anyhow::{anyhow, Context};
use std::fs;
use std::path::{Component, Path, PathBuf};
use tracing::{debug, info};

/// Name of the default destination directory inside the module.
pub const DEFAULT_TARGET_DIR: &str = "pkg";

/// Packages one module source directory.
pub struct Builder {
    module_dir: PathBuf,
    target_dir: PathBuf,
    extra_ignore: Vec<String>,
    sink: Box<dyn LogSink>,
}

impl std::fmt::Debug for Builder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Builder")
            .field("module_dir", &self.module_dir)
            .field("target_dir", &self.target_dir)
            .field("extra_ignore", &self.extra_ignore)
            .finish_non_exhaustive()
    }
}

impl Builder {
    /// Creates a builder for `module_dir`, writing into `target_dir`
    /// (default `<module_dir>/pkg`).
    ///
    /// # Errors
    ///
    /// Returns `ModpackError::Config` if `module_dir` does not exist or is not a
    /// directory, or if the current directory is needed and unavailable.
    pub fn new(module_dir: &Path, target_dir: Option<&Path>) -> Result<Self> {
        if !module_dir.is_dir() {
            anyhow::bail!(ModpackError::Config(format!(
                "Module directory '{}' does not exist or is not a directory",
                module_dir.display()
            )));
        }
        let module_dir = module_dir.canonicalize().map_err(|e| {
            anyhow!(ModpackError::Config(format!(
                "Unable to resolve module directory '{}': {}",
                module_dir.display(),
                e
            )))
        })?;
        let target_dir = match target_dir {
            Some(dir) if dir.is_absolute() => dir.to_path_buf(),
            Some(dir) => std::env::current_dir()
                .context("Failed to get current directory")?
                .join(dir),
            None => module_dir.join(DEFAULT_TARGET_DIR),
        };
        debug!(
            "Builder for {} targeting {}",
            module_dir.display(),
            target_dir.display()
        );
        Ok(Builder {
            module_dir,
            target_dir,
            extra_ignore: Vec::new(),
            sink: Box::new(TracingSink),
        })
    }

    /// Replaces the default `TracingSink`.
    pub fn with_log_sink(mut self, sink: Box<dyn LogSink>) -> Self {
        self.sink = sink;
        self
    }

    /// Adds ignore patterns applied after the module's ignore file.
    pub fn with_extra_ignore_patterns(mut self, patterns: Vec<String>) -> Self {
        self.extra_ignore.extend(patterns);
        self
    }

    /// The canonical module directory.
    pub fn module_dir(&self) -> &Path {
        &self.module_dir
    }

    pub fn target_dir(&self) -> &Path {
        &self.target_dir
    }

    /// Reads the module metadata.
    pub fn metadata(&self) -> Result<Metadata> {
        read_metadata(&self.module_dir)
    }

    /// `<target>/<name>-<version>.tar.gz`.
    pub fn package_file(&self) -> Result<PathBuf> {
        Ok(self.package_file_for(&self.metadata()?.release_name()))
    }

    /// `<target>/<name>-<version>`.
    pub fn build_dir(&self) -> Result<PathBuf> {
        Ok(self.build_dir_for(&self.metadata()?.release_name()))
    }

    /// Whether a package for the current metadata already exists.
    pub fn package_already_exists(&self) -> Result<bool> {
        Ok(self.package_file()?.exists())
    }

    fn package_file_for(&self, release: &str) -> PathBuf {
        self.target_dir.join(format!("{}.tar.gz", release))
    }

    fn build_dir_for(&self, release: &str) -> PathBuf {
        self.target_dir.join(release)
    }

    /// Runs the build and returns the absolute path of the written archive.
    pub fn build(&self) -> Result<PathBuf> {
        let metadata = self.metadata()?;
        let release = metadata.release_name();
        validate_encoding(Path::new(&release))?;
        info!("Building {} from {}", release, self.module_dir.display());

        io::ensure_dir_exists(&self.target_dir)?;
        let target_dir = self.target_dir.canonicalize().map_err(|e| {
            ModpackError::io(
                format!("Failed to resolve target directory {}", self.target_dir.display()),
                e,
            )
        })?;
        let build_dir = target_dir.join(&release);
        let package_file = target_dir.join(format!("{}.tar.gz", release));
        if self.module_dir.starts_with(&build_dir) {
            anyhow::bail!(ModpackError::Config(format!(
                "Build directory '{}' would replace the module source '{}'; choose another target directory",
                build_dir.display(),
                self.module_dir.display()
            )));
        }

        let mut builtins = output_exclusions(&self.module_dir, &target_dir, &release);
        builtins.extend(self.extra_ignore.iter().cloned());
        let rules = build_rule_set(&self.module_dir, builtins.as_slice())?;
        match rules.source() {
            Some(file) => debug!("Ignore rules from {}", file.display()),
            None => debug!("No ignore file, built-in rules only"),
        }

        io::remove_dir_if_exists(&build_dir)?;
        let root_meta = fs::metadata(&self.module_dir).map_err(|e| {
            ModpackError::io(format!("Failed to stat {}", self.module_dir.display()), e)
        })?;
        io::create_dir_like(&build_dir, &root_meta)?;

        let report = Stager::new(
            &self.module_dir,
            &build_dir,
            &release,
            &rules,
            self.sink.as_ref(),
        )
        .run()?;
        info!(
            "Staged {} files and {} directories; pruned {} directories, ignored {} files, skipped {} symlinks and {} special entries",
            report.files,
            report.directories,
            report.pruned,
            report.ignored,
            report.symlinks,
            report.unsupported
        );

        io::remove_file_if_exists(&package_file)?;
        archive::tar::write_package(&build_dir, &package_file)?;
        info!("Package written to {}", package_file.display());
        Ok(package_file)
    }
}

/// Ignore patterns that keep this build's own output out of the package when the
/// target directory lives inside the module.
fn output_exclusions(module_dir: &Path, target_dir: &Path, release: &str) -> Vec<String> {
    let relative = match target_dir.strip_prefix(module_dir) {
        Ok(rel) => rel,
        Err(_) => return Vec::new(),
    };
    let parts: Vec<String> = relative
        .components()
        .filter_map(|c| match c {
            Component::Normal(part) => Some(escape_glob(&part.to_string_lossy())),
            _ => None,
        })
        .collect();
    if parts.is_empty() {
        // Target is the module root itself.
        let release = escape_glob(release);
        return vec![format!("/{}/", release), format!("/{}.tar.gz", release)];
    }
    let joined = parts.join("/");
    if joined == DEFAULT_TARGET_DIR {
        return Vec::new(); // covered by the built-in /pkg/ rule
    }
    vec![format!("/{}/", joined)]
}

fn escape_glob(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for ch in text.chars() {
        if matches!(ch, '*' | '?' | '[' | ']' | '\\' | '{' | '}' | '!' | '#') {
            escaped.push('\\');
        }
        escaped.push(ch);
    }
    escaped
}
