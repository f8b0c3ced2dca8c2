//! # Check Command
//!
//! This module implements the `check` command: every file must start with
//! the header that applies to it, rendered for the current year. No file is
//! ever written.

use std::process;

use anyhow::Result;
use clap::Args;
use headerguard::output::{print_blank_line, print_check_ok, print_start_message, print_summary, print_wrong_headers};
use headerguard::processor::{EngineConfig, LicenseEngine};
use tracing::debug;

use super::CommonArgs;

/// Arguments for the check command
#[derive(Args, Debug)]
pub struct CheckArgs {
  #[command(flatten)]
  pub common: CommonArgs,
}

/// Run the check command with the given arguments
pub fn run_check(args: CheckArgs) -> Result<()> {
  let common = args.common;
  common.init_output();

  let config = common.load_config()?;
  debug!("Loaded configuration from {}", config.path.display());

  let engine = LicenseEngine::new(EngineConfig {
    discovery: config.discovery,
    ..EngineConfig::new(config.registry, common.header_year())
  });

  print_start_message(common.paths.len(), false);
  debug!("Verifying headers for year {}", engine.year());
  let report = engine.check_license(&common.paths);

  let root = std::env::current_dir().ok();
  print_blank_line();
  if report.has_failures() {
    print_wrong_headers(&report.failures, root.as_deref());
  } else {
    print_check_ok();
  }

  print_blank_line();
  print_summary(&report);

  common.write_report(&report);

  if let Err(e) = report.status() {
    debug!("{}", e);
    process::exit(1);
  }

  Ok(())
}
