//! # File I/O Module
//!
//! This module provides file reading and writing utilities for the processor.
//! Writes go through a temporary file in the target's directory that is
//! renamed over the original, so a failed write never leaves a truncated
//! file behind.

use std::fs;
use std::io::Write as _;
use std::path::Path;

use anyhow::{Context, Result};
use tempfile::NamedTempFile;

/// File I/O operations for the processor.
pub struct FileIO;

impl FileIO {
  /// Read full file content as raw bytes.
  pub fn read_content(path: &Path) -> Result<Vec<u8>> {
    fs::read(path).with_context(|| format!("Failed to read file: {}", path.display()))
  }

  /// Atomically replace the content of an existing file.
  ///
  /// Symlinks are followed: the replacement is written next to the file the
  /// link points to and renamed over it, so the link itself survives. The
  /// original permissions are copied onto the replacement before the rename.
  /// Any failure before the rename leaves the original file untouched.
  ///
  /// # Parameters
  ///
  /// * `path` - Path to the file to overwrite
  /// * `content` - Complete new content of the file
  pub fn write_atomic(path: &Path, content: &[u8]) -> Result<()> {
    let target = fs::canonicalize(path).with_context(|| format!("Failed to resolve file: {}", path.display()))?;
    let permissions = fs::metadata(&target)
      .with_context(|| format!("Failed to stat file: {}", target.display()))?
      .permissions();

    let parent = target
      .parent()
      .with_context(|| format!("{} has no parent directory", target.display()))?;

    let mut temp_file = NamedTempFile::new_in(parent)
      .with_context(|| format!("Failed to create temp file in {}", parent.display()))?;

    temp_file
      .write_all(content)
      .with_context(|| format!("Failed to write temp file for {}", path.display()))?;
    temp_file
      .as_file()
      .sync_all()
      .with_context(|| format!("Failed to sync temp file for {}", path.display()))?;
    temp_file
      .as_file()
      .set_permissions(permissions)
      .with_context(|| format!("Failed to set permissions for {}", path.display()))?;

    temp_file
      .persist(&target)
      .with_context(|| format!("Failed to write file: {}", path.display()))?;

    Ok(())
  }
}
