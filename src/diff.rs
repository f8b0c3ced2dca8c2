//! # Diff Module
//!
//! This module renders diffs between a file's current content and the
//! content a header update would produce. It is used by `update --dry-run`
//! to preview repairs without writing them.

use std::fs::OpenOptions;
use std::io::Write;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use similar::{ChangeTag, TextDiff};

/// Manages diff creation and rendering for header updates.
///
/// This struct handles:
/// - Generating diffs between original and updated content
/// - Displaying diffs to stderr
/// - Appending diffs to a file
#[derive(Debug, Clone, Default)]
pub struct DiffManager {
  /// Whether to print diffs to stderr
  pub show_diff: bool,

  /// File that diffs are appended to
  pub save_diff_path: Option<PathBuf>,
}

impl DiffManager {
  pub const fn new(show_diff: bool, save_diff_path: Option<PathBuf>) -> Self {
    Self {
      show_diff,
      save_diff_path,
    }
  }

  /// Returns `true` if diffs are displayed or saved.
  pub const fn is_active(&self) -> bool {
    self.show_diff || self.save_diff_path.is_some()
  }

  /// Truncates the diff file so a run starts from an empty file.
  pub fn init(&self) -> Result<()> {
    if let Some(ref diff_path) = self.save_diff_path {
      std::fs::write(diff_path, "")
        .with_context(|| format!("Failed to initialize diff file: {}", diff_path.display()))?;
    }
    Ok(())
  }

  /// Renders the diff between `original` and `updated` as text.
  ///
  /// Non UTF-8 bytes are shown with replacement characters; the diff is for
  /// display only.
  pub fn render(path: &Path, original: &[u8], updated: &[u8]) -> String {
    let original = String::from_utf8_lossy(original);
    let updated = String::from_utf8_lossy(updated);
    let diff = TextDiff::from_lines(original.as_ref(), updated.as_ref());

    let mut diff_content = format!("Diff for {}:\n", path.display());
    for change in diff.iter_all_changes() {
      let sign = match change.tag() {
        ChangeTag::Delete => "-",
        ChangeTag::Insert => "+",
        ChangeTag::Equal => " ",
      };
      diff_content.push_str(&format!("{}{}", sign, change));
    }
    diff_content
  }

  /// Displays and/or saves the diff for one file.
  pub fn display_diff(&self, path: &Path, original: &[u8], updated: &[u8]) -> Result<()> {
    let diff_content = Self::render(path, original, updated);

    if self.show_diff {
      eprintln!("{}", diff_content);
    }

    if let Some(ref diff_path) = self.save_diff_path {
      let mut file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(diff_path)
        .with_context(|| format!("Failed to open diff file: {}", diff_path.display()))?;
      writeln!(file, "{}", diff_content)
        .with_context(|| format!("Failed to write diff file: {}", diff_path.display()))?;
    }

    Ok(())
  }
}
