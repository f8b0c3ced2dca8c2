//! # Registry Module
//!
//! The [`HeaderRegistry`] holds every template the configuration defines,
//! together with the file sets resolved for them at load time, and decides
//! which template applies to a file.
//!
//! Resolution is an explicit precedence chain:
//! 1. globally excluded files are skipped
//! 2. the custom rule whose include pattern is longest wins (earliest declared
//!    rule on ties)
//! 3. everything else falls back to the ordered default headers

use std::collections::{HashMap, HashSet};
use std::path::{Path, PathBuf};

use tracing::trace;

use crate::path_set::{self, PathResolutionError};
use crate::templates::HeaderTemplate;

/// A header template scoped to a subset of files.
#[derive(Debug, Clone)]
pub struct CustomHeaderRule {
  pub template: HeaderTemplate,
  /// Patterns as written in the configuration
  pub include_patterns: Vec<String>,
  pub exclude_patterns: Vec<String>,
  /// Included files mapped to the length of the longest include pattern that
  /// matched them
  included: HashMap<PathBuf, usize>,
  excluded: HashSet<PathBuf>,
}

impl CustomHeaderRule {
  /// Creates a rule, expanding its patterns against `base_dir`.
  pub fn resolve(
    template: HeaderTemplate,
    include_patterns: Vec<String>,
    exclude_patterns: Vec<String>,
    base_dir: &Path,
  ) -> Result<Self, PathResolutionError> {
    let included = path_set::resolve_with_specificity(&include_patterns, base_dir)?;
    let excluded = path_set::resolve(&exclude_patterns, base_dir)?;

    let rule = Self {
      template,
      include_patterns,
      exclude_patterns,
      included,
      excluded,
    };
    trace!(
      "Custom header '{}' covers {} files from [{}] ({} excluded by [{}])",
      rule.name(),
      rule.included.len(),
      rule.include_patterns.join(", "),
      rule.excluded.len(),
      rule.exclude_patterns.join(", ")
    );

    Ok(rule)
  }

  pub fn name(&self) -> &str {
    &self.template.name
  }

  /// Returns the include-pattern length that put `file` under this rule, or
  /// `None` when the rule does not apply.
  ///
  /// `file` must already be absolute and normalized.
  pub fn specificity(&self, file: &Path) -> Option<usize> {
    if self.excluded.contains(file) {
      return None;
    }
    self.included.get(file).copied()
  }
}

/// The template that applies to a file.
#[derive(Debug, Clone, Copy)]
pub enum Resolution<'a> {
  /// The file is exempt from all checking
  Excluded,
  /// A custom rule owns the file
  Custom(&'a CustomHeaderRule),
  /// Any of the default headers may satisfy the file
  Default(&'a [HeaderTemplate]),
}

/// Immutable set of templates and resolved path sets for one run.
#[derive(Debug, Clone, Default)]
pub struct HeaderRegistry {
  default_headers: Vec<HeaderTemplate>,
  custom_rules: Vec<CustomHeaderRule>,
  excluded_files: HashSet<PathBuf>,
}

impl HeaderRegistry {
  pub const fn new(
    default_headers: Vec<HeaderTemplate>,
    custom_rules: Vec<CustomHeaderRule>,
    excluded_files: HashSet<PathBuf>,
  ) -> Self {
    Self {
      default_headers,
      custom_rules,
      excluded_files,
    }
  }

  pub fn default_headers(&self) -> &[HeaderTemplate] {
    &self.default_headers
  }

  pub fn custom_rules(&self) -> &[CustomHeaderRule] {
    &self.custom_rules
  }

  pub fn is_excluded(&self, file: &Path) -> bool {
    self.excluded_files.contains(file)
  }

  /// Resolves the template for `file`.
  ///
  /// `file` must already be absolute and normalized (see
  /// [`path_set::absolutize_path`]).
  pub fn resolve(&self, file: &Path) -> Resolution<'_> {
    if self.is_excluded(file) {
      trace!("{} is globally excluded", file.display());
      return Resolution::Excluded;
    }

    let mut best: Option<(usize, &CustomHeaderRule)> = None;
    for rule in &self.custom_rules {
      let Some(specificity) = rule.specificity(file) else {
        continue;
      };
      // Strictly greater keeps the earliest declared rule on ties.
      if best.is_none_or(|(current, _)| specificity > current) {
        best = Some((specificity, rule));
      }
    }

    match best {
      Some((_, rule)) => {
        trace!("{} resolved to custom header '{}'", file.display(), rule.name());
        Resolution::Custom(rule)
      }
      None => Resolution::Default(&self.default_headers),
    }
  }
}
