//! # headerguard
//!
//! Verifies and repairs copyright license headers in source files against
//! templates declared in a YAML configuration.
//!
//! A header template is a literal text block that may contain one `{YEAR}`
//! placeholder. Every file must start with the header that applies to it:
//!
//! * files matched by `headers-excluded-paths` are never checked
//! * files covered by a custom header must start with that header; when
//!   several custom headers cover a file, the one with the longest matching
//!   include pattern wins
//! * every other file must start with one of the default headers
//!
//! `check` only accepts headers rendered for the current year. `update`
//! additionally rewrites headers rendered for the previous year, replacing
//! the header bytes and nothing else.
//!
//! ## Usage as a Library
//!
//! ```rust,no_run
//! use std::path::Path;
//!
//! use headerguard::config::load_config;
//! use headerguard::processor::{EngineConfig, LicenseEngine};
//! use headerguard::templates::HeaderYear;
//!
//! fn main() -> anyhow::Result<()> {
//!     let config = load_config(Some(Path::new(".headerguard.yaml")), Path::new("."))?;
//!
//!     let engine = LicenseEngine::new(EngineConfig {
//!         discovery: config.discovery,
//!         ..EngineConfig::new(config.registry, HeaderYear::current())
//!     });
//!
//!     let report = engine.check_license(&["pkg", "cmd/main.go"]);
//!     for failure in &report.failures {
//!         println!("{}  - Reason: {}", failure.file.display(), failure.reason);
//!     }
//!
//!     Ok(())
//! }
//! ```
//!
//! ## Modules
//!
//! * [`config`] - Configuration discovery, parsing and validation
//! * [`path_set`] - Glob patterns resolved into file sets
//! * [`registry`] - Template selection for a file
//! * [`matcher`] - Header verification against a year
//! * [`processor`] - The license engine and file operations
//! * [`report`] - Per-file failures and run results
//! * [`logging`] - Logging utilities for verbose output

pub mod config;
pub mod diff;
pub mod logging;
pub mod matcher;
pub mod output;
pub mod path_set;
pub mod processor;
pub mod registry;
pub mod report;
pub mod templates;
