//! # Output Module
//!
//! This module centralizes all user-facing output for headerguard.
//! It provides consistent formatting, colors, and symbols for terminal output.
//!
//! Results go to stdout. With `-q` only the failing paths are printed, one
//! per line, so the output can be piped into other tools.

use std::path::{Path, PathBuf};

use owo_colors::{OwoColorize, Stream};

use crate::logging::{is_quiet, is_verbose};
use crate::report::{LicenseReport, WrongLicenseHeader};

/// Symbols used in output
pub mod symbols {
  /// Header OK
  pub const SUCCESS: &str = "\u{2713}"; // ✓
  /// Wrong header
  pub const FAILURE: &str = "\u{2717}"; // ✗
  /// Year updated
  pub const UPDATED: &str = "\u{21bb}"; // ↻
}

/// Maximum number of updated files to show before truncating
const DEFAULT_FILE_LIST_LIMIT: usize = 20;

/// Print the initial "Checking N paths..." or "Updating N paths..." message.
pub fn print_start_message(path_count: usize, update_mode: bool) {
  if is_quiet() {
    return;
  }

  let verb = if update_mode { "Updating" } else { "Checking" };
  let paths_word = if path_count == 1 { "path" } else { "paths" };

  println!("{} {} {}...", verb, path_count, paths_word);
}

/// Print a blank line for visual separation (respects quiet mode).
pub fn print_blank_line() {
  if !is_quiet() {
    println!();
  }
}

/// Print every file with a wrong header together with its reason, in the
/// order the files were checked.
///
/// Every failure is listed: the list is what the user has to fix.
pub fn print_wrong_headers(failures: &[WrongLicenseHeader], root: Option<&Path>) {
  if failures.is_empty() {
    return;
  }

  if is_quiet() {
    for failure in failures {
      println!("{}", make_relative_path(&failure.file, root));
    }
    return;
  }

  println!(
    "{} {}",
    symbols::FAILURE.if_supports_color(Stream::Stdout, |s| s.red()),
    wrong_headers_title(failures.len())
  );

  for failure in failures {
    println!(
      "  {}  - Reason: {}",
      make_relative_path(&failure.file, root),
      failure.reason.if_supports_color(Stream::Stdout, |s| s.dimmed())
    );
  }
}

fn wrong_headers_title(count: usize) -> String {
  if count == 1 {
    "1 file has wrong License Headers:".to_string()
  } else {
    format!("{} files have wrong License Headers:", count)
  }
}

/// Print the list of files whose header year was updated.
pub fn print_updated_files(files: &[PathBuf], root: Option<&Path>, dry_run: bool) {
  if is_quiet() || files.is_empty() {
    return;
  }

  let count = files.len();
  let verb = if dry_run { "Would update" } else { "Updated" };
  println!(
    "{} {} License Headers in {} {}:",
    symbols::UPDATED.if_supports_color(Stream::Stdout, |s| s.yellow()),
    verb,
    count,
    if count == 1 { "file" } else { "files" }
  );

  let show_all = is_verbose();
  let limit = if show_all { count } else { DEFAULT_FILE_LIST_LIMIT };

  for file in files.iter().take(limit) {
    println!("  {}", make_relative_path(file, root));
  }

  if !show_all && count > limit {
    println!(
      "  {}",
      format!("... and {} more (use -v to see all)", count - limit).if_supports_color(Stream::Stdout, |s| s.dimmed())
    );
  }
}

/// Print the success message of a check.
pub fn print_check_ok() {
  if is_quiet() {
    return;
  }

  println!(
    "{} Check has finished successfully. All files have correct License Headers.",
    symbols::SUCCESS.if_supports_color(Stream::Stdout, |s| s.green())
  );
}

/// Print the success message of an update.
pub fn print_update_ok() {
  if is_quiet() {
    return;
  }

  println!(
    "{} All License Headers have been updated successfully",
    symbols::SUCCESS.if_supports_color(Stream::Stdout, |s| s.green())
  );
}

/// Print the run summary.
///
/// Format: "Summary: X checked, Y updated, Z failed, W excluded"
pub fn print_summary(report: &LicenseReport) {
  if is_quiet() {
    return;
  }

  let failed = report.failures.len();
  let failed_str = if failed > 0 {
    failed.if_supports_color(Stream::Stdout, |s| s.red()).to_string()
  } else {
    failed.if_supports_color(Stream::Stdout, |s| s.cyan()).to_string()
  };

  println!(
    "Summary: {} checked, {} updated, {} failed, {} excluded",
    report.checked.if_supports_color(Stream::Stdout, |s| s.cyan()),
    report.updated.len().if_supports_color(Stream::Stdout, |s| s.cyan()),
    failed_str,
    report.skipped.if_supports_color(Stream::Stdout, |s| s.dimmed())
  );
}

/// Print a hint for the user about what to do next.
pub fn print_hint(message: &str) {
  if is_quiet() {
    return;
  }

  println!("{}", message.if_supports_color(Stream::Stdout, |s| s.yellow()));
}

/// Make a path relative to `root` for display.
///
/// Paths outside `root` are shown with `..` components when a relative form
/// exists, otherwise as given.
fn make_relative_path(path: &Path, root: Option<&Path>) -> String {
  let Some(root) = root else {
    return path.to_string_lossy().to_string();
  };

  if path.is_relative() {
    return path.to_string_lossy().to_string();
  }

  pathdiff::diff_paths(path, root)
    .map(|p| p.to_string_lossy().to_string())
    .unwrap_or_else(|| path.to_string_lossy().to_string())
}
