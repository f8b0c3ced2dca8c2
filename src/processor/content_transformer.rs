//! # Content Transformer Module
//!
//! This module computes the new content of a file whose header is stamped
//! with the previous year. The transformation is a pure in-memory splice so
//! nothing touches the disk until the full replacement is known.

/// Content transformation utilities for header repair.
pub struct ContentTransformer;

impl ContentTransformer {
  /// Replaces the leading `stale` header in `content` with `current`.
  ///
  /// Only the occurrence at the very start of the content is replaced. Later
  /// occurrences of the same text (for example the same year in a string
  /// literal) are left untouched, as is every byte after the header.
  ///
  /// # Returns
  ///
  /// The rewritten content, or `None` if `content` does not start with
  /// `stale`.
  pub fn replace_header(content: &[u8], stale: &str, current: &str) -> Option<Vec<u8>> {
    let rest = content.strip_prefix(stale.as_bytes())?;

    let mut updated = Vec::with_capacity(current.len() + rest.len());
    updated.extend_from_slice(current.as_bytes());
    updated.extend_from_slice(rest);
    Some(updated)
  }
}
