//! # Matcher Module
//!
//! Decides whether the head of a file satisfies a header template.
//!
//! Matching is an exact byte prefix comparison against the template rendered
//! for the current year. In [`VerifyMode::Update`] a header rendered for the
//! previous year is also recognized, so the caller can repair it.

use crate::templates::{HeaderTemplate, HeaderYear};

/// How strictly a header is verified.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VerifyMode {
  /// Only the current-year header is accepted
  Check,
  /// A previous-year header is reported as rewritable
  Update,
}

/// Result of matching content against one or more templates.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MatchOutcome {
  /// The content starts with the current-year header
  Matched,
  /// The content starts with `stale`, which should be replaced by `current`
  NeedsRewrite { stale: String, current: String },
  /// No acceptable header was found
  NoMatch,
}

/// Header matcher bound to the year of the run.
#[derive(Debug, Clone, Copy)]
pub struct HeaderMatcher {
  year: HeaderYear,
}

impl HeaderMatcher {
  pub const fn new(year: HeaderYear) -> Self {
    Self { year }
  }

  pub const fn year(&self) -> HeaderYear {
    self.year
  }

  /// Verifies `content` against a single template.
  pub fn verify(&self, content: &[u8], template: &HeaderTemplate, mode: VerifyMode) -> MatchOutcome {
    if self.matches_current(content, template) {
      return MatchOutcome::Matched;
    }

    if mode == VerifyMode::Update
      && let Some(stale) = self.matching_previous(content, template)
    {
      return MatchOutcome::NeedsRewrite {
        stale,
        current: template.render(self.year),
      };
    }

    MatchOutcome::NoMatch
  }

  /// Verifies `content` against an ordered list of templates, any of which
  /// may satisfy it.
  ///
  /// A current-year match on any template wins before previous-year headers
  /// are considered, so a compliant file is never rewritten to another
  /// template.
  pub fn verify_any(&self, content: &[u8], templates: &[HeaderTemplate], mode: VerifyMode) -> MatchOutcome {
    if templates.iter().any(|t| self.matches_current(content, t)) {
      return MatchOutcome::Matched;
    }

    if mode == VerifyMode::Update {
      for template in templates {
        if let Some(stale) = self.matching_previous(content, template) {
          return MatchOutcome::NeedsRewrite {
            stale,
            current: template.render(self.year),
          };
        }
      }
    }

    MatchOutcome::NoMatch
  }

  fn matches_current(&self, content: &[u8], template: &HeaderTemplate) -> bool {
    content.starts_with(template.render(self.year).as_bytes())
  }

  fn matching_previous(&self, content: &[u8], template: &HeaderTemplate) -> Option<String> {
    // Without a placeholder both renderings are identical.
    if !template.has_placeholder() {
      return None;
    }
    let previous = template.render(self.year.previous());
    content.starts_with(previous.as_bytes()).then_some(previous)
  }
}
