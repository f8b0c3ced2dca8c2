//! # Report Module
//!
//! This module defines the results of a check or update run: one
//! [`WrongLicenseHeader`] per file that could not be verified or repaired, and
//! the aggregate [`LicenseReport`].
//!
//! Reports can be written as JSON for consumption by other tooling.

use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::Serialize;

use crate::matcher::VerifyMode;

/// Why a file failed verification or could not be repaired.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FailureReason {
  /// The input path does not exist
  NotFound,
  /// The file exists but could not be read
  Unreadable(String),
  /// A directory input could not be expanded into files
  PathResolution(String),
  /// None of the default headers matched
  NoMatchingDefaultHeader,
  /// The custom header owning the file did not match
  NoMatchingCustomHeader(String),
  /// A stale header was found but the rewrite failed
  WriteFailed(String),
}

impl FailureReason {
  /// Stable machine-readable code for the reason.
  pub const fn code(&self) -> &'static str {
    match self {
      FailureReason::NotFound => "not-found",
      FailureReason::Unreadable(_) => "unreadable",
      FailureReason::PathResolution(_) => "path-resolution-error",
      FailureReason::NoMatchingDefaultHeader => "no-matching-default-header",
      FailureReason::NoMatchingCustomHeader(_) => "no-matching-custom-header",
      FailureReason::WriteFailed(_) => "write-failed",
    }
  }
}

impl fmt::Display for FailureReason {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      FailureReason::NotFound => write!(f, "File doesn't exist"),
      FailureReason::Unreadable(e) => write!(f, "Cannot read file: {e}"),
      FailureReason::PathResolution(e) => write!(f, "Cannot find source files under this directory: {e}"),
      FailureReason::NoMatchingDefaultHeader => write!(
        f,
        "no default header matched: file doesn't start with any of the default headers defined in the configuration file"
      ),
      FailureReason::NoMatchingCustomHeader(name) => write!(
        f,
        "no matching custom header: file doesn't start with the header of custom rule '{name}'"
      ),
      FailureReason::WriteFailed(e) => write!(f, "Cannot update header: {e}"),
    }
  }
}

/// A file whose header is missing, wrong or could not be repaired.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WrongLicenseHeader {
  /// The path as it was given or discovered
  pub file: PathBuf,
  pub reason: FailureReason,
}

impl WrongLicenseHeader {
  pub fn new(file: impl Into<PathBuf>, reason: FailureReason) -> Self {
    Self {
      file: file.into(),
      reason,
    }
  }
}

/// Aggregate failure signal for a run.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum HeaderError {
  #[error("Some files have wrong License Headers ({count})")]
  WrongHeaders { count: usize },

  #[error("Some License Headers could not be updated ({count})")]
  NotUpdated { count: usize },
}

/// Results of one check or update run.
#[derive(Debug, Clone)]
pub struct LicenseReport {
  pub mode: VerifyMode,
  /// Failing files, in input order
  pub failures: Vec<WrongLicenseHeader>,
  /// Files whose header was rewritten (or would be, in a dry run)
  pub updated: Vec<PathBuf>,
  /// Files whose header was verified
  pub checked: usize,
  /// Files skipped by global exclusion
  pub skipped: usize,
}

impl LicenseReport {
  pub const fn new(mode: VerifyMode) -> Self {
    Self {
      mode,
      failures: Vec::new(),
      updated: Vec::new(),
      checked: 0,
      skipped: 0,
    }
  }

  pub fn has_failures(&self) -> bool {
    !self.failures.is_empty()
  }

  /// Converts the report into the overall pass/fail signal.
  pub fn status(&self) -> Result<(), HeaderError> {
    if self.failures.is_empty() {
      return Ok(());
    }
    let count = self.failures.len();
    match self.mode {
      VerifyMode::Check => Err(HeaderError::WrongHeaders { count }),
      VerifyMode::Update => Err(HeaderError::NotUpdated { count }),
    }
  }

  /// Writes the report as pretty-printed JSON.
  pub fn write_json(&self, output_path: &Path) -> Result<()> {
    let json = serde_json::to_string_pretty(&JsonReport::from(self)).context("Failed to serialize JSON report")?;
    fs::write(output_path, json)
      .with_context(|| format!("Failed to write JSON report to {}", output_path.display()))
  }
}

#[derive(Serialize)]
struct JsonReport {
  mode: &'static str,
  checked: usize,
  skipped: usize,
  updated: Vec<String>,
  failures: Vec<JsonFailure>,
}

#[derive(Serialize)]
struct JsonFailure {
  file: String,
  code: &'static str,
  reason: String,
}

impl From<&LicenseReport> for JsonReport {
  fn from(report: &LicenseReport) -> Self {
    Self {
      mode: match report.mode {
        VerifyMode::Check => "check",
        VerifyMode::Update => "update",
      },
      checked: report.checked,
      skipped: report.skipped,
      updated: report.updated.iter().map(|p| p.to_string_lossy().into_owned()).collect(),
      failures: report
        .failures
        .iter()
        .map(|f| JsonFailure {
          file: f.file.to_string_lossy().into_owned(),
          code: f.reason.code(),
          reason: f.reason.to_string(),
        })
        .collect(),
    }
  }
}
