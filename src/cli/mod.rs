//! # CLI Module
//!
//! This module contains the command-line interface implementation.
//! It uses clap for argument parsing with one subcommand per engine mode.

mod check;
mod update;

use std::path::PathBuf;

use anyhow::{Context, Result};
pub use check::{CheckArgs, run_check};
use clap::builder::styling::{AnsiColor, Color, Style, Styles};
use clap::{Args, Parser, Subcommand};
use headerguard::config::{LoadedConfig, load_config};
use headerguard::info_log;
use headerguard::logging::{ColorMode, init_tracing, set_quiet, set_verbose};
use headerguard::report::LicenseReport;
use headerguard::templates::HeaderYear;
pub use update::{UpdateArgs, run_update};

const CUSTOM_STYLES: Styles = Styles::styled()
  .header(Style::new().fg_color(Some(Color::Ansi(AnsiColor::Green))).bold())
  .usage(Style::new().fg_color(Some(Color::Ansi(AnsiColor::Green))).bold())
  .literal(Style::new().fg_color(Some(Color::Ansi(AnsiColor::Blue))).bold())
  .placeholder(Style::new().fg_color(Some(Color::Ansi(AnsiColor::Cyan))))
  .error(Style::new().fg_color(Some(Color::Ansi(AnsiColor::Red))).bold())
  .valid(Style::new().fg_color(Some(Color::Ansi(AnsiColor::Green))))
  .invalid(Style::new().fg_color(Some(Color::Ansi(AnsiColor::Yellow))));

const LONG_VERSION: &str = concat!(env!("CARGO_PKG_VERSION"), " (", env!("HEADERGUARD_BUILD"), ")");

/// Top-level CLI arguments
#[derive(Parser, Debug)]
#[command(
  author,
  version,
  long_version = LONG_VERSION,
  about,
  styles = CUSTOM_STYLES,
  after_help = "Examples:
  # Check license headers using .headerguard.yaml from the current directory
  headerguard check pkg/ cmd/main.go

  # Check with an explicit configuration file
  headerguard check -c config.yaml .

  # Roll last year's headers over to the current year
  headerguard update -c config.yaml .

  # Preview the update without writing any file
  headerguard update --dry-run --show-diff .

  # Write a JSON report for CI tooling
  headerguard check --report-json headers.json .
",
  help_template = "{before-help}{name} v{version}
{about-section}
{usage-heading} {usage}

{all-args}{after-help}
"
)]
pub struct Cli {
  #[command(subcommand)]
  pub command: Command,
}

/// Available subcommands
#[derive(Subcommand, Debug)]
pub enum Command {
  /// Check that files start with their current-year license header
  Check(CheckArgs),
  /// Update license headers from the previous year to the current year
  Update(UpdateArgs),
}

impl Cli {
  /// Parse CLI arguments and return the Cli struct
  pub fn parse_args() -> Self {
    Self::parse()
  }
}

/// Arguments shared by every subcommand
#[derive(Args, Debug)]
pub struct CommonArgs {
  /// Files or directories to verify. Directories are processed recursively.
  #[arg(required = true, value_name = "PATHS")]
  pub paths: Vec<PathBuf>,

  /// Path to the configuration file (default: $HEADERGUARD_CONFIG, then
  /// .headerguard.yaml in the current directory)
  #[arg(long, short = 'c', value_name = "FILE")]
  pub config: Option<PathBuf>,

  /// Four-digit year the headers must carry (default: the current year)
  #[arg(long, value_name = "YEAR", value_parser = clap::value_parser!(i32).range(1000..=9999))]
  pub year: Option<i32>,

  /// Write a JSON report of the run to the specified path
  #[arg(long, value_name = "OUTPUT")]
  pub report_json: Option<PathBuf>,

  /// Increase verbosity (-v info, -vv debug, -vvv trace)
  #[arg(short, long, action = clap::ArgAction::Count)]
  pub verbose: u8,

  /// Suppress all output except errors and failing paths
  #[arg(short, long, conflicts_with = "verbose")]
  pub quiet: bool,

  /// Control when to use colored output (auto, never, always)
  #[arg(
    long,
    value_name = "WHEN",
    num_args = 0..=1,
    default_value_t = ColorMode::Auto,
    default_missing_value = "always",
    value_enum
  )]
  pub colors: ColorMode,
}

impl CommonArgs {
  /// Initializes tracing, the output mode and colors.
  fn init_output(&self) {
    init_tracing(self.quiet, self.verbose);

    if self.verbose > 0 {
      set_verbose();
    } else if self.quiet {
      set_quiet();
    }
    self.colors.apply();
  }

  fn header_year(&self) -> HeaderYear {
    self.year.map(HeaderYear::new).unwrap_or_else(HeaderYear::current)
  }

  fn load_config(&self) -> Result<LoadedConfig> {
    let current_dir = std::env::current_dir().context("Failed to get current directory")?;
    load_config(self.config.as_deref(), &current_dir)
  }

  /// Writes the JSON report if one was requested. A failed report is
  /// printed but does not change the outcome of the run.
  fn write_report(&self, report: &LicenseReport) {
    let Some(ref output_path) = self.report_json else {
      return;
    };

    if let Err(e) = report.write_json(output_path) {
      eprintln!("Error generating JSON report: {:#}", e);
    } else {
      info_log!("Generated JSON report at {}", output_path.display());
    }
  }
}
