//! # Modpack Path Validation (`package::validate`)
//!
//! File: cli/src/package/validate.rs
//! Author: Christi Mahu
//!
//! ## Overview
//!
//! Two pure checks run against every staged path before it is copied:
//!
//! - **Encoding**: archive member names must be plain ASCII.
//! - **USTAR length**: the legacy tar header stores a path in two fixed
//!   fields, a `prefix` of at most 155 bytes and a `name` of at most 100
//!   bytes, joined by one implied `/`. A path up to 100 bytes fits in `name`
//!   alone. Longer paths must be split at a separator such that both halves
//!   fit. Anything over 256 bytes can never fit.
//!
//! Neither check touches the filesystem, so the boundary behaviour is tested
//! directly on synthetic strings.
//!
use crate::core::error::{ModpackError, PathTooLongReason};
use std::path::Path;

/// Maximum bytes in the USTAR `name` field.
pub const USTAR_NAME_MAX: usize = 100;
/// Maximum bytes in the USTAR `prefix` field.
pub const USTAR_PREFIX_MAX: usize = 155;
/// Longest path a USTAR header can ever hold (`prefix` + `/` + `name`).
pub const USTAR_PATH_MAX: usize = USTAR_PREFIX_MAX + 1 + USTAR_NAME_MAX;

/// How a path is laid out across the USTAR `prefix` and `name` fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UstarSplit<'a> {
    /// Empty when the whole path fits in `name`.
    pub prefix: &'a str,
    pub name: &'a str,
}

/// Fails unless every byte of `path` is ASCII.
///
/// On Unix the raw `OsStr` bytes are inspected, so names that are not even
/// valid UTF-8 are rejected rather than lossily converted.
pub fn validate_encoding(path: &Path) -> Result<(), ModpackError> {
    if path_is_ascii(path) {
        Ok(())
    } else {
        Err(ModpackError::Encoding {
            path: path.to_string_lossy().into_owned(),
        })
    }
}

#[cfg(unix)]
fn path_is_ascii(path: &Path) -> bool {
    use std::os::unix::ffi::OsStrExt;
    path.as_os_str().as_bytes().is_ascii()
}

#[cfg(not(unix))]
fn path_is_ascii(path: &Path) -> bool {
    path.to_str().map_or(false, str::is_ascii)
}

/// Splits `path` into USTAR `prefix`/`name` fields or explains why it cannot be stored.
///
/// When several separators give a valid split, the one with the longest
/// prefix is returned (the same choice the `tar` crate makes when writing
/// the header). Callers should only rely on a split existing.
pub fn validate_ustar_path(path: &str) -> Result<UstarSplit<'_>, ModpackError> {
    let too_long = |reason| ModpackError::PathTooLong {
        path: path.to_string(),
        reason,
    };

    if path.len() > USTAR_PATH_MAX {
        return Err(too_long(PathTooLongReason::ExceedsMaximum));
    }
    if path.len() <= USTAR_NAME_MAX {
        return Ok(UstarSplit {
            prefix: "",
            name: path,
        });
    }

    // '/' is ASCII, so every index found here is a char boundary.
    path.match_indices('/')
        .map(|(idx, _)| idx)
        .filter(|&idx| idx > 0 && idx + 1 < path.len())
        .filter(|&idx| idx <= USTAR_PREFIX_MAX && path.len() - idx - 1 <= USTAR_NAME_MAX)
        .last()
        .map(|idx| UstarSplit {
            prefix: &path[..idx],
            name: &path[idx + 1..],
        })
        .ok_or_else(|| too_long(PathTooLongReason::Unsplittable))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn segments(lengths: &[usize]) -> String {
        lengths
            .iter()
            .map(|&n| "a".repeat(n))
            .collect::<Vec<_>>()
            .join("/")
    }

    fn reason_of(result: Result<UstarSplit<'_>, ModpackError>) -> Option<PathTooLongReason> {
        match result {
            Err(ModpackError::PathTooLong { reason, .. }) => Some(reason),
            _ => None,
        }
    }

    #[test]
    fn test_short_paths_always_fit() {
        for len in 1..=USTAR_NAME_MAX {
            let path = "x".repeat(len);
            let split = validate_ustar_path(&path).expect("short path must fit");
            assert_eq!(split.prefix, "");
            assert_eq!(split.name, path);
        }
        // Content does not matter below the limit, even without any separator.
        assert!(validate_ustar_path(&"/".repeat(100)).is_ok());
    }

    #[test]
    fn test_over_256_always_fails_with_maximum() {
        for len in 257..300 {
            // 150 + '/' + rest: a split would exist if the total were allowed.
            let path = format!("{}/{}", "p".repeat(150), "n".repeat(len - 151));
            assert_eq!(
                reason_of(validate_ustar_path(&path)),
                Some(PathTooLongReason::ExceedsMaximum),
                "len {}",
                len
            );
        }
    }

    #[test]
    fn test_mid_range_succeeds_iff_split_exists() {
        // Single separator at every position, for every total length in (100, 256].
        for total in (USTAR_NAME_MAX + 1)..=USTAR_PATH_MAX {
            for sep in 1..total - 1 {
                let path = format!("{}/{}", "p".repeat(sep), "n".repeat(total - sep - 1));
                let expected = sep <= USTAR_PREFIX_MAX && total - sep - 1 <= USTAR_NAME_MAX;
                let result = validate_ustar_path(&path);
                assert_eq!(result.is_ok(), expected, "total {} sep {}", total, sep);
                if let Ok(split) = result {
                    assert!(split.prefix.len() <= USTAR_PREFIX_MAX);
                    assert!(split.name.len() <= USTAR_NAME_MAX);
                    assert_eq!(format!("{}/{}", split.prefix, split.name), path);
                }
            }
        }
    }

    #[test]
    fn test_mid_range_without_separator_fails() {
        let path = "z".repeat(101);
        assert_eq!(
            reason_of(validate_ustar_path(&path)),
            Some(PathTooLongReason::Unsplittable)
        );
    }

    #[test]
    fn test_scenario_258_bytes() {
        let path = segments(&[152, 11, 93]);
        assert_eq!(path.len(), 258);
        let err = validate_ustar_path(&path).unwrap_err();
        assert!(err.to_string().contains("longer than 256"));
    }

    #[test]
    fn test_scenario_256_bytes_unsplittable() {
        let path = segments(&[152, 10, 92]);
        assert_eq!(path.len(), 256);
        let err = validate_ustar_path(&path).unwrap_err();
        assert!(err.to_string().contains("could not be split"));
    }

    #[test]
    fn test_scenario_155_and_100() {
        let path = segments(&[155, 100]);
        assert_eq!(path.len(), 256);
        let split = validate_ustar_path(&path).expect("exact fit");
        assert_eq!(split.prefix.len(), 155);
        assert_eq!(split.name.len(), 100);
    }

    #[test]
    fn test_prefers_longest_prefix() {
        let path = segments(&[40, 40, 40]);
        let split = validate_ustar_path(&path).unwrap();
        assert_eq!(split.prefix.len(), 81);
        assert_eq!(split.name.len(), 40);
    }

    #[test]
    fn test_error_carries_remediation_hint() {
        let err = validate_ustar_path(&"q".repeat(300)).unwrap_err();
        assert!(err
            .to_string()
            .contains("rename the file or exclude it from the package"));
    }

    #[test]
    fn test_validate_encoding_ascii() {
        assert!(validate_encoding(Path::new("manifests/init.pp")).is_ok());
        let long_ascii: PathBuf = ["a"; 500].iter().collect();
        assert!(validate_encoding(&long_ascii).is_ok());
        // Every ASCII byte except NUL and '/' is legal in a file name.
        let all_ascii: String = (1u8..128).filter(|&b| b != b'/').map(char::from).collect();
        assert!(validate_encoding(Path::new(&all_ascii)).is_ok());
    }

    #[test]
    fn test_validate_encoding_rejects_non_ascii() {
        let err = validate_encoding(Path::new("files/café.txt")).unwrap_err();
        assert!(matches!(err, ModpackError::Encoding { .. }));
        assert!(err
            .to_string()
            .contains("path may only contain ASCII characters"));
        assert!(validate_encoding(Path::new("日本")).is_err());
    }

    #[cfg(unix)]
    #[test]
    fn test_validate_encoding_rejects_invalid_utf8() {
        use std::ffi::OsStr;
        use std::os::unix::ffi::OsStrExt;
        let path = Path::new(OsStr::from_bytes(b"bad\xffname"));
        assert!(validate_encoding(path).is_err());
    }
}
