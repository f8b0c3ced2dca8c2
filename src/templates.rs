//! # Templates Module
//!
//! This module provides the header templates that files are verified against
//! and the year they are rendered for.
//!
//! The module includes:
//! - [`HeaderTemplate`] for a named, literal header text with an optional
//!   `{YEAR}` placeholder
//! - [`HeaderYear`] for the year used to fill the placeholder
//!
//! ## Example
//!
//! ```rust
//! use headerguard::templates::{HeaderTemplate, HeaderYear};
//!
//! let template = HeaderTemplate::new("acme", "// Copyright 2022-{YEAR} Acme\n");
//! let year = HeaderYear::new(2024);
//!
//! assert_eq!(template.render(year), "// Copyright 2022-2024 Acme\n");
//! assert_eq!(template.render(year.previous()), "// Copyright 2022-2023 Acme\n");
//! ```

use std::fmt;

use chrono::Datelike;

/// The only substitution token recognized in header bodies.
pub const YEAR_PLACEHOLDER: &str = "{YEAR}";

/// The year a header is rendered for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct HeaderYear(i32);

impl HeaderYear {
  pub const fn new(year: i32) -> Self {
    Self(year)
  }

  /// The current calendar year from the local system clock.
  pub fn current() -> Self {
    Self(chrono::Local::now().year())
  }

  /// The year before this one, used for rollover repair.
  pub const fn previous(self) -> Self {
    Self(self.0 - 1)
  }
}

impl fmt::Display for HeaderYear {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "{:04}", self.0)
  }
}

/// One acceptable header text.
///
/// The body is compared as a literal prefix of the file content. Whitespace
/// and line breaks are significant.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HeaderTemplate {
  /// Identifier used in failure reasons, unique within its kind
  pub name: String,
  /// Literal header text, with zero or one `{YEAR}` placeholder
  pub body: String,
}

impl HeaderTemplate {
  pub fn new(name: impl Into<String>, body: impl Into<String>) -> Self {
    Self {
      name: name.into(),
      body: body.into(),
    }
  }

  /// Returns `true` if the body contains the year placeholder.
  pub fn has_placeholder(&self) -> bool {
    self.body.contains(YEAR_PLACEHOLDER)
  }

  /// Renders the header text for the given year.
  ///
  /// Bodies without a placeholder are returned unchanged.
  pub fn render(&self, year: HeaderYear) -> String {
    self.body.replacen(YEAR_PLACEHOLDER, &year.to_string(), 1)
  }
}
