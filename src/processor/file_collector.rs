//! # File Collector Module
//!
//! This module expands directory inputs into the source files they contain.
//!
//! Which files count as sources is a [`DiscoveryPolicy`]: a list of
//! extensions plus file-name patterns for generated code (protobuf output,
//! mocks) that never carries a hand-written header.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use tracing::{debug, trace, warn};
use walkdir::WalkDir;

/// Extensions collected from directories when the configuration is silent.
pub const DEFAULT_EXTENSIONS: &[&str] = &["go"];

/// Generated-file name patterns skipped when the configuration is silent.
pub const DEFAULT_SKIP_PATTERNS: &[&str] = &["*.pb.go", "mock_*.go"];

/// Policy deciding which files a directory expands to.
#[derive(Debug, Clone)]
pub struct DiscoveryPolicy {
  /// Extensions without the leading dot, compared case-insensitively. An
  /// empty list accepts every extension.
  extensions: Vec<String>,
  /// Patterns matched against the file name only
  skip_patterns: Vec<glob::Pattern>,
}

impl Default for DiscoveryPolicy {
  fn default() -> Self {
    Self {
      extensions: DEFAULT_EXTENSIONS.iter().map(|e| e.to_string()).collect(),
      skip_patterns: DEFAULT_SKIP_PATTERNS
        .iter()
        .filter_map(|p| glob::Pattern::new(p).ok())
        .collect(),
    }
  }
}

impl DiscoveryPolicy {
  /// Builds a policy from configured extensions and skip patterns.
  ///
  /// # Errors
  ///
  /// Returns an error if any skip pattern is not a valid glob.
  pub fn new(extensions: Vec<String>, skip_patterns: &[String]) -> Result<Self> {
    let skip_patterns = skip_patterns
      .iter()
      .map(|p| glob::Pattern::new(p).with_context(|| format!("Invalid skip pattern: {}", p)))
      .collect::<Result<Vec<_>>>()?;

    Ok(Self {
      extensions: extensions
        .into_iter()
        .map(|e| e.trim_start_matches('.').to_lowercase())
        .collect(),
      skip_patterns,
    })
  }

  /// Returns `true` if a file found while walking a directory should be
  /// verified.
  pub fn accepts(&self, path: &Path) -> bool {
    let Some(file_name) = path.file_name().and_then(|n| n.to_str()) else {
      return false;
    };

    if self.skip_patterns.iter().any(|p| p.matches(file_name)) {
      trace!("Skipping: {} (generated file)", path.display());
      return false;
    }

    if self.extensions.is_empty() {
      return true;
    }

    path
      .extension()
      .and_then(|ext| ext.to_str())
      .is_some_and(|ext| self.extensions.iter().any(|e| e.eq_ignore_ascii_case(ext)))
  }
}

/// File collector for directory traversal.
pub struct FileCollector {
  policy: DiscoveryPolicy,
}

impl FileCollector {
  pub const fn new(policy: DiscoveryPolicy) -> Self {
    Self { policy }
  }

  /// Traverses a directory recursively and collects the source files the
  /// policy accepts, in file-name order.
  ///
  /// # Errors
  ///
  /// Returns an error if the directory itself cannot be read. Unreadable
  /// entries below it are logged and skipped.
  pub fn traverse_directory(&self, dir: &Path) -> Result<Vec<PathBuf>> {
    debug!("Scanning directory: {}", dir.display());
    let start_time = std::time::Instant::now();

    let mut files = Vec::new();
    for entry in WalkDir::new(dir).sort_by_file_name() {
      let entry = match entry {
        Ok(entry) => entry,
        Err(e) if e.depth() == 0 => {
          return Err(e).with_context(|| format!("Failed to read directory: {}", dir.display()));
        }
        Err(e) => {
          warn!("Skipping unreadable entry under {}: {}", dir.display(), e);
          continue;
        }
      };

      if entry.file_type().is_file() && self.policy.accepts(entry.path()) {
        files.push(entry.into_path());
      }
    }

    debug!(
      "Found {} files in {}ms",
      files.len(),
      start_time.elapsed().as_millis()
    );

    Ok(files)
  }
}
