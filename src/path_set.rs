//! # Path Set Module
//!
//! This module expands glob include/exclude patterns from the configuration
//! into concrete sets of absolute file paths.
//!
//! Patterns support `*`, `?`, `[...]` and the recursive `**` component.
//! Relative patterns are resolved against a base directory (the directory of
//! the configuration file), never against the process working directory.
//! Every path that leaves this module is lexically normalized so that lookups
//! done later with [`absolutize_path`] and [`normalize_path`] hit the same
//! keys.

use std::collections::{HashMap, HashSet};
use std::path::{Component, Path, PathBuf};

use tracing::{debug, warn};

/// Error type for path resolution.
#[derive(Debug, thiserror::Error)]
pub enum PathResolutionError {
  /// A pattern is not a valid glob.
  #[error("Invalid glob pattern '{pattern}': {source}")]
  InvalidPattern {
    pattern: String,
    source: glob::PatternError,
  },

  /// A path cannot be turned into a glob pattern.
  #[error("Path is not valid UTF-8: {path}")]
  NonUtf8Path { path: PathBuf },

  /// The working directory needed to absolutize a path is unavailable.
  #[error("Failed to get current directory: {source}")]
  CurrentDir { source: std::io::Error },
}

/// Resolves patterns into the set of matching files.
///
/// Duplicates produced by overlapping patterns collapse.
pub fn resolve(patterns: &[String], base_dir: &Path) -> Result<HashSet<PathBuf>, PathResolutionError> {
  Ok(resolve_with_specificity(patterns, base_dir)?.into_keys().collect())
}

/// Resolves patterns into matching files, keeping for each file the length
/// of the longest pattern string (as written) that matched it.
pub fn resolve_with_specificity(
  patterns: &[String],
  base_dir: &Path,
) -> Result<HashMap<PathBuf, usize>, PathResolutionError> {
  let mut files: HashMap<PathBuf, usize> = HashMap::new();

  for pattern in patterns {
    let glob_source = anchor_pattern(pattern, base_dir)?;
    let entries = glob::glob(&glob_source).map_err(|source| PathResolutionError::InvalidPattern {
      pattern: pattern.clone(),
      source,
    })?;

    let mut matched = 0usize;
    for entry in entries {
      match entry {
        Ok(path) => {
          if !path.is_file() {
            continue;
          }
          matched += 1;
          let specificity = files.entry(normalize_path(&path)).or_insert(0);
          *specificity = (*specificity).max(pattern.len());
        }
        Err(e) => warn!("Skipping unreadable path while expanding '{}': {}", pattern, e),
      }
    }

    debug!("Pattern '{}' matched {} files", pattern, matched);
  }

  Ok(files)
}

/// Turns a configured pattern into an absolute, normalized glob string.
///
/// The base directory is escaped so glob metacharacters in it stay literal.
fn anchor_pattern(pattern: &str, base_dir: &Path) -> Result<String, PathResolutionError> {
  let pattern_path = Path::new(pattern);
  if pattern_path.is_absolute() {
    let normalized = normalize_path(pattern_path);
    return path_to_str(&normalized).map(str::to_string);
  }

  let base = normalize_path(base_dir);
  let escaped_base = glob::Pattern::escape(path_to_str(&base)?);
  let joined = PathBuf::from(escaped_base).join(pattern_path);
  path_to_str(&normalize_path(&joined)).map(str::to_string)
}

fn path_to_str(path: &Path) -> Result<&str, PathResolutionError> {
  path.to_str().ok_or_else(|| PathResolutionError::NonUtf8Path {
    path: path.to_path_buf(),
  })
}

/// Lexically normalizes a path: drops `.` components and folds `..` into
/// their parent. The filesystem is never consulted, so symlinks are kept
/// as written.
pub fn normalize_path(path: &Path) -> PathBuf {
  let mut normalized = PathBuf::new();
  for component in path.components() {
    match component {
      Component::CurDir => {}
      Component::ParentDir => {
        let can_pop = matches!(
          normalized.components().next_back(),
          Some(Component::Normal(_))
        );
        if can_pop {
          normalized.pop();
        } else if !normalized.has_root() {
          normalized.push("..");
        }
      }
      other => normalized.push(other.as_os_str()),
    }
  }

  if normalized.as_os_str().is_empty() {
    normalized.push(".");
  }
  normalized
}

/// Converts a potentially relative path to an absolute, normalized path
/// using the process working directory.
pub fn absolutize_path(path: &Path) -> Result<PathBuf, PathResolutionError> {
  if path.is_absolute() {
    return Ok(normalize_path(path));
  }
  let current_dir = std::env::current_dir().map_err(|source| PathResolutionError::CurrentDir { source })?;
  Ok(normalize_path(&current_dir.join(path)))
}
