//! # Modpack Filesystem Link Operations
//!
//! File: cli/src/common/fs/links.rs
//! Author: Christi Mahu
//!
//! ## Overview
//!
//! Symbolic links are never copied into a package: a link inside a release
//! archive would either dangle on the installing machine or point outside the
//! module. This module inspects a link found in the module tree and describes
//! it relative to the module root so the user can see what was left out.
//!
//! ## Architecture
//!
//! `describe_symlink` reads the link target without following it further than
//! necessary:
//! - Relative targets are resolved against the directory holding the link.
//! - The resolved target is canonicalized when it exists; dangling links keep
//!   the lexically joined path.
//! - Both the link and the target are expressed relative to the module root
//!   with `pathdiff`, so targets outside the module show up as `../...`.
//!
use crate::core::error::{ModpackError, Result};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

/// A symbolic link found in the module tree, expressed relative to the module root.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SymlinkDescription {
    /// Location of the link itself.
    pub link: PathBuf,
    /// Where the link resolves to.
    pub target: PathBuf,
}

impl SymlinkDescription {
    /// The warning text reported for a skipped link.
    pub fn warning(&self) -> String {
        format!(
            "Symlinks in modules are not supported and will not be included in the package. \
             Please investigate symlink {} -> {}.",
            self.link.display(),
            self.target.display()
        )
    }
}

/// Describes the symlink at `link_path` relative to `root`.
///
/// `root` must already be canonical so that targets inside the module
/// produce clean relative paths.
///
/// # Errors
///
/// Returns `ModpackError::Io` if the link cannot be read.
pub fn describe_symlink(link_path: &Path, root: &Path) -> Result<SymlinkDescription> {
    let raw_target = fs::read_link(link_path).map_err(|e| {
        ModpackError::io(format!("Failed to read symlink {}", link_path.display()), e)
    })?;
    let link_dir = link_path.parent().unwrap_or(root);
    let joined = link_dir.join(&raw_target);
    let resolved = joined.canonicalize().unwrap_or(joined);
    debug!(
        "Symlink {} points to {} (resolved {})",
        link_path.display(),
        raw_target.display(),
        resolved.display()
    );

    let link = pathdiff::diff_paths(link_path, root).unwrap_or_else(|| link_path.to_path_buf());
    let target = pathdiff::diff_paths(&resolved, root).unwrap_or(resolved);
    Ok(SymlinkDescription { link, target })
}

// --- Unit Tests ---
#[cfg(all(test, unix))]
mod tests {
    use super::*;
    use std::os::unix::fs::symlink;
    use tempfile::tempdir;

    #[test]
    fn test_describe_symlink_inside_module() -> Result<()> {
        let dir = tempdir()?;
        let root = dir.path().canonicalize()?;
        fs::create_dir(root.join("files"))?;
        fs::write(root.join("files/real.conf"), "x")?;
        symlink("real.conf", root.join("files/alias.conf"))?;

        let description = describe_symlink(&root.join("files/alias.conf"), &root)?;
        assert_eq!(description.link, PathBuf::from("files/alias.conf"));
        assert_eq!(description.target, PathBuf::from("files/real.conf"));
        assert!(description
            .warning()
            .contains("files/alias.conf -> files/real.conf"));
        Ok(())
    }

    #[test]
    fn test_describe_symlink_outside_module() -> Result<()> {
        let outer = tempdir()?;
        let outer_root = outer.path().canonicalize()?;
        let root = outer_root.join("module");
        fs::create_dir(&root)?;
        fs::write(outer_root.join("secret.txt"), "x")?;
        symlink(outer_root.join("secret.txt"), root.join("leak"))?;

        let description = describe_symlink(&root.join("leak"), &root)?;
        assert_eq!(description.link, PathBuf::from("leak"));
        assert_eq!(description.target, PathBuf::from("../secret.txt"));
        Ok(())
    }

    #[test]
    fn test_describe_dangling_symlink() -> Result<()> {
        let dir = tempdir()?;
        let root = dir.path().canonicalize()?;
        symlink("missing/target", root.join("broken"))?;

        let description = describe_symlink(&root.join("broken"), &root)?;
        assert_eq!(description.target, PathBuf::from("missing/target"));
        Ok(())
    }
}
