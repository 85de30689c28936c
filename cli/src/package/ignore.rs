//! # Modpack Ignore Rules (`package::ignore`)
//!
//! File: cli/src/package/ignore.rs
//! Author: Christi Mahu
//!
//! ## Overview
//!
//! Decides which paths of a module are left out of the package. Rules come
//! from exactly one ignore file, picked in priority order:
//!
//! 1. `.pdkignore`
//! 2. `.pmtignore`
//! 3. `.gitignore`
//!
//! followed by built-in patterns that keep the build output (`/pkg/` and any
//! custom destination inside the module) out of the package. Built-ins are
//! appended *after* the file's rules, so a `!pkg/` line in an ignore file
//! cannot pull previous build output back in.
//!
//! ## Pattern semantics
//!
//! Patterns follow `.gitignore` rules:
//! - Blank lines and lines starting with `#` are skipped; `\#` and `\!`
//!   escape a literal leading `#` or `!`.
//! - Trailing spaces are trimmed unless escaped with `\`.
//! - `!` negates: a later negated match re-includes the path.
//! - A trailing `/` restricts the rule to directories.
//! - A `/` at the start or in the middle anchors the pattern to the module
//!   root; otherwise it matches a name at any depth.
//! - `*`, `?` and `[...]` never cross `/`; `**` spans directories.
//! - Once a directory is excluded nothing below it can be re-included.
//!
//! Each rule is compiled once into a `globset::GlobMatcher`; evaluation is
//! a pure function of the rule list and the relative path.
//!
use crate::core::error::{ModpackError, Result};
use globset::{GlobBuilder, GlobMatcher};
use std::fs;
use std::path::{Component, Path, PathBuf};
use tracing::{debug, info};

/// Ignore files consulted, highest priority first.
pub const IGNORE_FILES: [&str; 3] = [".pdkignore", ".pmtignore", ".gitignore"];

/// Built-in rule keeping the default build destination out of the package.
pub const DEFAULT_OUTPUT_PATTERN: &str = "/pkg/";

/// Origin label used in errors for patterns that did not come from a file.
const BUILTIN_ORIGIN: &str = "<built-in>";

/// One parsed ignore pattern.
#[derive(Debug, Clone)]
pub struct IgnoreRule {
    /// The pattern text as written, before any parsing.
    pub raw: String,
    pub negated: bool,
    pub dir_only: bool,
    pub anchored: bool,
    matcher: GlobMatcher,
}

impl IgnoreRule {
    /// Parses one ignore-file line. Returns `Ok(None)` for blank and comment
    /// lines, and for lines ending in an unescaped `\\`, which never match.
    pub fn parse(line: &str) -> std::result::Result<Option<Self>, globset::Error> {
        let line = line.strip_suffix('\r').unwrap_or(line);
        if line.trim().is_empty() || line.starts_with('#') {
            return Ok(None);
        }

        let mut body = trim_unescaped_trailing_spaces(line);
        if trailing_backslashes(body) % 2 == 1 {
            return Ok(None);
        }
        let mut negated = false;
        if let Some(rest) = body.strip_prefix('!') {
            negated = true;
            body = rest;
        } else if body.starts_with("\\!") || body.starts_with("\\#") {
            body = &body[1..];
        }

        let dir_only = body.ends_with('/');
        let body = body.trim_end_matches('/');
        if body.is_empty() {
            return Ok(None);
        }

        let anchored = body.contains('/');
        let body = body.trim_start_matches('/');
        if body.is_empty() {
            return Ok(None);
        }

        // Gitignore has no brace alternation; keep braces literal.
        let escaped = body.replace('{', "\\{").replace('}', "\\}");
        let glob = if anchored {
            escaped
        } else {
            format!("**/{}", escaped)
        };
        let matcher = GlobBuilder::new(&glob)
            .literal_separator(true)
            .backslash_escape(true)
            .build()?
            .compile_matcher();

        Ok(Some(IgnoreRule {
            raw: line.to_string(),
            negated,
            dir_only,
            anchored,
            matcher,
        }))
    }

    /// Whether this rule's pattern matches `path` (a `/`-joined relative path).
    pub fn matches(&self, path: &str, is_dir: bool) -> bool {
        if self.dir_only && !is_dir {
            return false;
        }
        self.matcher.is_match(path)
    }
}

fn trim_unescaped_trailing_spaces(line: &str) -> &str {
    let mut end = line.len();
    while end > 0 && line.as_bytes()[end - 1] == b' ' {
        // An odd run of backslashes escapes the space.
        if trailing_backslashes(&line[..end - 1]) % 2 == 1 {
            break;
        }
        end -= 1;
    }
    &line[..end]
}

fn trailing_backslashes(text: &str) -> usize {
    text.bytes().rev().take_while(|&b| b == b'\\').count()
}

/// An ordered, immutable list of ignore rules.
#[derive(Debug, Clone, Default)]
pub struct IgnoreRuleSet {
    rules: Vec<IgnoreRule>,
    source: Option<PathBuf>,
}

impl IgnoreRuleSet {
    /// Parses newline-delimited patterns. `origin` only labels errors.
    pub fn parse(text: &str, origin: &str) -> Result<Self> {
        let mut set = IgnoreRuleSet::default();
        for (idx, line) in text.lines().enumerate() {
            set.push_line(line, origin, idx + 1)?;
        }
        Ok(set)
    }

    fn push_line(&mut self, line: &str, origin: &str, line_no: usize) -> Result<()> {
        match IgnoreRule::parse(line) {
            Ok(Some(rule)) => {
                debug!(
                    "Rule '{}' from {} (negated: {}, dir-only: {}, anchored: {})",
                    rule.raw, origin, rule.negated, rule.dir_only, rule.anchored
                );
                self.rules.push(rule)
            }
            Ok(None) => {}
            Err(e) => {
                debug!("Rejected ignore pattern '{}': {}", line, e);
                anyhow::bail!(ModpackError::IgnorePattern {
                    origin: origin.to_string(),
                    line: line_no,
                    pattern: line.to_string(),
                });
            }
        }
        Ok(())
    }

    /// Appends built-in patterns after any file rules.
    pub fn with_builtins<S: AsRef<str>>(mut self, patterns: &[S]) -> Result<Self> {
        for (idx, pattern) in patterns.iter().enumerate() {
            self.push_line(pattern.as_ref(), BUILTIN_ORIGIN, idx + 1)?;
        }
        Ok(self)
    }

    /// The rules in evaluation order.
    pub fn rules(&self) -> &[IgnoreRule] {
        &self.rules
    }

    /// The ignore file the rules were read from, if any.
    pub fn source(&self) -> Option<&Path> {
        self.source.as_deref()
    }

    /// Whether `relative` (relative to the module root) is excluded.
    ///
    /// Ancestors are checked first as directories: an excluded parent
    /// excludes everything below it regardless of later negations.
    pub fn is_ignored(&self, relative: &Path, is_dir: bool) -> bool {
        let parts: Vec<String> = relative
            .components()
            .filter_map(|c| match c {
                Component::Normal(part) => Some(part.to_string_lossy().into_owned()),
                _ => None,
            })
            .collect();
        if parts.is_empty() {
            return false;
        }

        let mut prefix = String::new();
        for part in &parts[..parts.len() - 1] {
            if !prefix.is_empty() {
                prefix.push('/');
            }
            prefix.push_str(part);
            if self.last_match_ignores(&prefix, true) {
                return true;
            }
        }
        self.last_match_ignores(&parts.join("/"), is_dir)
    }

    fn last_match_ignores(&self, path: &str, is_dir: bool) -> bool {
        self.rules
            .iter()
            .rev()
            .find(|rule| rule.matches(path, is_dir))
            .map_or(false, |rule| !rule.negated)
    }
}

/// Returns the highest-priority ignore file present and readable in `source`.
pub fn locate_ignore_file(source: &Path) -> Option<PathBuf> {
    IGNORE_FILES
        .iter()
        .map(|name| source.join(name))
        .find(|candidate| candidate.is_file() && fs::File::open(candidate).is_ok())
}

/// Builds the rule set for a module: the located ignore file (if any) followed
/// by `/pkg/` and `extra_builtins`.
pub fn build_rule_set<S: AsRef<str>>(source: &Path, extra_builtins: &[S]) -> Result<IgnoreRuleSet> {
    let mut set = match locate_ignore_file(source) {
        Some(path) => {
            info!("Using ignore file {}", path.display());
            let bytes = fs::read(&path).map_err(|e| {
                ModpackError::io(format!("Failed to read ignore file {}", path.display()), e)
            })?;
            let text = String::from_utf8_lossy(&bytes);
            let mut set = IgnoreRuleSet::parse(&text, &path.display().to_string())?;
            set.source = Some(path);
            set
        }
        None => {
            debug!("No ignore file found in {}", source.display());
            IgnoreRuleSet::default()
        }
    };
    set = set.with_builtins(&[DEFAULT_OUTPUT_PATTERN])?;
    set = set.with_builtins(extra_builtins)?;
    debug!("Ignore rule set has {} rules", set.rules().len());
    Ok(set)
}
