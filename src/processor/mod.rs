//! # Processor Module
//!
//! This module contains the license engine: it walks the input paths,
//! resolves the header template owning each file, verifies the file against
//! it and, in update mode, repairs headers that carry last year's date.
//!
//! The module is organized into several submodules:
//! - [`file_io`] - File reading and atomic writing
//! - [`content_transformer`] - Replacement of the leading header bytes
//! - [`file_collector`] - Directory expansion and the generated-file policy
//!
//! The [`LicenseEngine`] struct is the main entry point, orchestrating the
//! submodules, the [`HeaderRegistry`] and the [`HeaderMatcher`].

mod content_transformer;
mod file_collector;
mod file_io;

use std::collections::HashSet;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
pub use content_transformer::ContentTransformer;
pub use file_collector::{DEFAULT_EXTENSIONS, DEFAULT_SKIP_PATTERNS, DiscoveryPolicy, FileCollector};
pub use file_io::FileIO;
use tracing::{debug, trace, warn};

use crate::diff::DiffManager;
use crate::matcher::{HeaderMatcher, MatchOutcome, VerifyMode};
use crate::path_set::absolutize_path;
use crate::registry::{HeaderRegistry, Resolution};
use crate::report::{FailureReason, LicenseReport, WrongLicenseHeader};
use crate::templates::HeaderYear;
use crate::verbose_log;

/// Configuration for creating a [`LicenseEngine`].
pub struct EngineConfig {
  pub registry: HeaderRegistry,
  pub year: HeaderYear,

  /// Which files directories expand to
  pub discovery: DiscoveryPolicy,

  /// Compute repairs without writing them
  pub dry_run: bool,
  pub diff_manager: Option<DiffManager>,
}

impl EngineConfig {
  /// Creates a new EngineConfig with required fields and sensible defaults.
  ///
  /// Use struct update syntax to override specific fields:
  /// ```ignore
  /// EngineConfig {
  ///     dry_run: true,
  ///     ..EngineConfig::new(registry, HeaderYear::current())
  /// }
  /// ```
  pub fn new(registry: HeaderRegistry, year: HeaderYear) -> Self {
    Self {
      registry,
      year,
      discovery: DiscoveryPolicy::default(),
      dry_run: false,
      diff_manager: None,
    }
  }
}

/// Engine verifying and repairing license headers.
///
/// The `LicenseEngine` is responsible for:
/// - Expanding directory inputs into source files
/// - Resolving the template that applies to each file
/// - Checking headers against the current year
/// - Rewriting previous-year headers in update mode
/// - Collecting one failure per non-compliant file, in input order
pub struct LicenseEngine {
  registry: HeaderRegistry,
  matcher: HeaderMatcher,
  file_collector: FileCollector,
  dry_run: bool,
  diff_manager: DiffManager,
}

impl LicenseEngine {
  pub fn new(config: EngineConfig) -> Self {
    Self {
      registry: config.registry,
      matcher: HeaderMatcher::new(config.year),
      file_collector: FileCollector::new(config.discovery),
      dry_run: config.dry_run,
      diff_manager: config.diff_manager.unwrap_or_default(),
    }
  }

  pub const fn year(&self) -> HeaderYear {
    self.matcher.year()
  }

  /// Verifies that every file under `paths` starts with its current-year
  /// header. Never writes to any file.
  pub fn check_license<P: AsRef<Path>>(&self, paths: &[P]) -> LicenseReport {
    self.run(paths, VerifyMode::Check)
  }

  /// Verifies every file under `paths`, rewriting headers that still carry
  /// the previous year. Files with no recognizable header are reported, not
  /// repaired.
  pub fn update_license<P: AsRef<Path>>(&self, paths: &[P]) -> LicenseReport {
    self.run(paths, VerifyMode::Update)
  }

  fn run<P: AsRef<Path>>(&self, paths: &[P], mode: VerifyMode) -> LicenseReport {
    let start_time = std::time::Instant::now();
    let mut report = LicenseReport::new(mode);
    let mut seen = HashSet::new();

    for input in paths {
      let input = input.as_ref();

      let metadata = match fs::metadata(input) {
        Ok(metadata) => metadata,
        Err(e) => {
          let reason = if e.kind() == io::ErrorKind::NotFound {
            FailureReason::NotFound
          } else {
            FailureReason::Unreadable(e.to_string())
          };
          report.failures.push(WrongLicenseHeader::new(input, reason));
          continue;
        }
      };

      if metadata.is_dir() {
        match self.file_collector.traverse_directory(input) {
          Ok(files) => {
            for file in files {
              if seen.insert(lookup_key(&file)) {
                self.process_file(&file, &mut report);
              }
            }
          }
          Err(e) => {
            report.failures.push(WrongLicenseHeader::new(
              input,
              FailureReason::PathResolution(format!("{:#}", e)),
            ));
          }
        }
      } else if seen.insert(lookup_key(input)) {
        self.process_file(input, &mut report);
      } else {
        trace!("Skipping duplicate input: {}", input.display());
      }
    }

    debug!(
      "Verified {} files ({} skipped, {} updated, {} failed) in {}ms",
      report.checked,
      report.skipped,
      report.updated.len(),
      report.failures.len(),
      start_time.elapsed().as_millis()
    );

    report
  }

  fn process_file(&self, file: &Path, report: &mut LicenseReport) {
    let key = lookup_key(file);
    let resolution = self.registry.resolve(&key);
    if matches!(resolution, Resolution::Excluded) {
      verbose_log!("Skipping: {} (excluded)", file.display());
      report.skipped += 1;
      return;
    }

    let content = match FileIO::read_content(file) {
      Ok(content) => content,
      Err(e) => {
        report.failures.push(WrongLicenseHeader::new(
          file,
          FailureReason::Unreadable(e.root_cause().to_string()),
        ));
        return;
      }
    };
    report.checked += 1;

    let (outcome, custom_rule) = match resolution {
      Resolution::Custom(rule) => {
        trace!("{} is owned by custom header '{}'", file.display(), rule.name());
        (
          self.matcher.verify(&content, &rule.template, report.mode),
          Some(rule.name()),
        )
      }
      Resolution::Default(templates) => (self.matcher.verify_any(&content, templates, report.mode), None),
      Resolution::Excluded => return,
    };

    match outcome {
      MatchOutcome::Matched => trace!("Header OK: {}", file.display()),
      MatchOutcome::NeedsRewrite { stale, current } => match self.rewrite(file, &content, &stale, &current) {
        Ok(()) => {
          verbose_log!("Updated header: {}", file.display());
          report.updated.push(file.to_path_buf());
        }
        Err(e) => {
          report.failures.push(WrongLicenseHeader::new(
            file,
            FailureReason::WriteFailed(format!("{:#}", e)),
          ));
        }
      },
      MatchOutcome::NoMatch => {
        let reason = match custom_rule {
          Some(name) => FailureReason::NoMatchingCustomHeader(name.to_string()),
          None => FailureReason::NoMatchingDefaultHeader,
        };
        debug!("{}: {}", file.display(), reason);
        report.failures.push(WrongLicenseHeader::new(file, reason));
      }
    }
  }

  /// Replaces the leading `stale` header of `file` with `current`.
  ///
  /// Only the header bytes change; the rest of the content is written back
  /// unchanged.
  fn rewrite(&self, file: &Path, content: &[u8], stale: &str, current: &str) -> Result<()> {
    let updated = ContentTransformer::replace_header(content, stale, current)
      .with_context(|| format!("{} does not start with the expected header", file.display()))?;

    // A lost diff never blocks the repair itself.
    if self.diff_manager.is_active()
      && let Err(e) = self.diff_manager.display_diff(file, content, &updated)
    {
      warn!("Failed to record diff for {}: {:#}", file.display(), e);
    }

    if self.dry_run {
      debug!("Dry run, not writing {}", file.display());
      return Ok(());
    }

    FileIO::write_atomic(file, &updated)
  }
}

/// Key used for registry lookups and input deduplication.
fn lookup_key(path: &Path) -> PathBuf {
  absolutize_path(path).unwrap_or_else(|_| path.to_path_buf())
}
