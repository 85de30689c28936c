//! # Modpack Build Command Handler
//!
//! File: cli/src/commands/build.rs
//! Author: Christi Mahu
//!
//! ## Overview
//!
//! Implements `modpack build`. The handler is a thin layer over
//! `package::Builder`:
//!
//! 1. Load the merged configuration for the module (`core::config`).
//! 2. Resolve the destination: `--target-dir`, then `build.destination`,
//!    then the builder's default `<module>/pkg`.
//! 3. Refuse to overwrite an existing package unless `--force` is given.
//! 4. Run the build and print the absolute archive path to stdout.
//! 5. Remove the staging directory unless it should be kept.
//!
//! ## Examples
//!
//! ```bash
//! modpack build ./my-module
//! modpack build --target-dir /tmp/releases --keep-build-dir
//! modpack -vv build --force
//! ```
//!
use crate::common::fs::io;
use crate::core::config::{self, Config};
use crate::core::error::{ModpackError, Result};
use crate::package::sink::TracingSink;
use crate::package::Builder;
use clap::Parser;
use std::path::PathBuf;
use tracing::{debug, info};

/// # Build Arguments (`BuildArgs`)
///
/// Arguments accepted by `modpack build`.
#[derive(Parser, Debug, Clone)]
pub struct BuildArgs {
    /// Module source directory (must contain `metadata.json`).
    #[arg(default_value = ".")]
    pub module_dir: PathBuf,

    /// Directory receiving `<name>-<version>/` and `<name>-<version>.tar.gz`.
    /// Defaults to `build.destination` from the configuration, or `<MODULE_DIR>/pkg`.
    #[arg(short, long)]
    pub target_dir: Option<PathBuf>,

    /// Overwrite an existing package file.
    #[arg(short, long)]
    pub force: bool,

    /// Leave the staging directory in place after the archive is written.
    #[arg(long)]
    pub keep_build_dir: bool,
}

/// # Handle Build Command (`handle_build`)
///
/// Loads configuration, builds the package and prints its path.
///
/// ## Returns
///
/// * `Result<()>`: `Ok(())` once the archive is written. Configuration,
///   metadata, validation and I/O failures are propagated unchanged so that
///   `main` can print them.
pub fn handle_build(args: BuildArgs) -> Result<()> {
    info!("Handling build command...");
    debug!("Build args: {:?}", args);

    let cfg = config::load_config(&args.module_dir)?;
    let package = run_build(&args, &cfg)?;
    println!("{}", package.display());
    Ok(())
}

/// Runs the build described by `args` and `cfg`, returning the archive path.
fn run_build(args: &BuildArgs, cfg: &Config) -> Result<PathBuf> {
    let target = args
        .target_dir
        .clone()
        .or_else(|| cfg.destination_for(&args.module_dir));
    let builder = Builder::new(&args.module_dir, target.as_deref())?
        .with_log_sink(Box::new(TracingSink))
        .with_extra_ignore_patterns(cfg.ignore.patterns.clone());
    debug!(
        "Packaging {} into {}",
        builder.module_dir().display(),
        builder.target_dir().display()
    );

    if !args.force && builder.package_already_exists()? {
        anyhow::bail!(ModpackError::Config(format!(
            "Package '{}' already exists; use --force to overwrite it",
            builder.package_file()?.display()
        )));
    }

    let package = builder.build()?;

    let keep = args.keep_build_dir || cfg.build.keep_build_dir.unwrap_or(false);
    if keep {
        info!("Keeping build directory {}", builder.build_dir()?.display());
    } else {
        io::remove_dir_if_exists(&builder.build_dir()?)?;
    }
    Ok(package)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::config::BuildConfig;
    use std::fs;
    use std::path::Path;
    use tempfile::tempdir;

    fn module(root: &Path) {
        fs::write(
            root.join("metadata.json"),
            r#"{"name": "demo", "version": "2.0.0"}"#,
        )
        .unwrap();
        fs::create_dir(root.join("manifests")).unwrap();
        fs::write(root.join("manifests/init.pp"), "class demo {}").unwrap();
    }

    fn args(module_dir: &Path, target: &Path) -> BuildArgs {
        BuildArgs {
            module_dir: module_dir.to_path_buf(),
            target_dir: Some(target.to_path_buf()),
            force: false,
            keep_build_dir: false,
        }
    }

    #[test]
    fn test_parse_defaults() {
        let parsed = BuildArgs::try_parse_from(["build"]).unwrap();
        assert_eq!(parsed.module_dir, PathBuf::from("."));
        assert!(parsed.target_dir.is_none());
        assert!(!parsed.force);
        assert!(!parsed.keep_build_dir);
    }

    #[test]
    fn test_parse_all_flags() {
        let parsed = BuildArgs::try_parse_from([
            "build",
            "mods/demo",
            "--target-dir",
            "/tmp/out",
            "--force",
            "--keep-build-dir",
        ])
        .unwrap();
        assert_eq!(parsed.module_dir, PathBuf::from("mods/demo"));
        assert_eq!(parsed.target_dir, Some(PathBuf::from("/tmp/out")));
        assert!(parsed.force);
        assert!(parsed.keep_build_dir);
    }

    #[test]
    fn test_build_removes_build_dir_by_default() -> Result<()> {
        let src = tempdir()?;
        let out = tempdir()?;
        module(src.path());
        let package = run_build(&args(src.path(), out.path()), &Config::default())?;
        assert!(package.is_file());
        assert!(!out.path().join("demo-2.0.0").exists());
        Ok(())
    }

    #[test]
    fn test_keep_build_dir_from_flag_or_config() -> Result<()> {
        let src = tempdir()?;
        let out = tempdir()?;
        module(src.path());
        let mut a = args(src.path(), out.path());
        a.keep_build_dir = true;
        run_build(&a, &Config::default())?;
        assert!(out.path().join("demo-2.0.0/manifests/init.pp").is_file());

        let cfg = Config {
            build: BuildConfig {
                keep_build_dir: Some(true),
                ..Default::default()
            },
            ..Default::default()
        };
        let mut b = args(src.path(), out.path());
        b.force = true;
        run_build(&b, &cfg)?;
        assert!(out.path().join("demo-2.0.0").is_dir());
        Ok(())
    }

    #[test]
    fn test_existing_package_requires_force() -> Result<()> {
        let src = tempdir()?;
        let out = tempdir()?;
        module(src.path());
        fs::write(out.path().join("demo-2.0.0.tar.gz"), "old")?;

        let err = run_build(&args(src.path(), out.path()), &Config::default()).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<ModpackError>(),
            Some(ModpackError::Config(_))
        ));
        assert_eq!(fs::read(out.path().join("demo-2.0.0.tar.gz"))?, b"old");

        let mut forced = args(src.path(), out.path());
        forced.force = true;
        let package = run_build(&forced, &Config::default())?;
        assert_ne!(fs::read(package)?, b"old");
        Ok(())
    }

    #[test]
    fn test_destination_from_config_relative_to_module() -> Result<()> {
        let src = tempdir()?;
        module(src.path());
        let cfg = Config {
            build: BuildConfig {
                destination: Some("releases".into()),
                ..Default::default()
            },
            ..Default::default()
        };
        let a = BuildArgs {
            module_dir: src.path().to_path_buf(),
            target_dir: None,
            force: false,
            keep_build_dir: false,
        };
        let package = run_build(&a, &cfg)?;
        assert_eq!(
            package,
            src.path().canonicalize()?.join("releases/demo-2.0.0.tar.gz")
        );
        Ok(())
    }
}
