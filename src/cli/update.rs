//! # Update Command
//!
//! This module implements the `update` command: headers rendered for the
//! previous year are rewritten to the current year. Files without a
//! recognizable header are reported, never modified.

use std::path::PathBuf;
use std::process;

use anyhow::Result;
use clap::Args;
use headerguard::diff::DiffManager;
use headerguard::output::{
  print_blank_line, print_hint, print_start_message, print_summary, print_update_ok, print_updated_files,
  print_wrong_headers,
};
use headerguard::processor::{EngineConfig, LicenseEngine};
use tracing::debug;

use super::CommonArgs;

/// Arguments for the update command
#[derive(Args, Debug)]
pub struct UpdateArgs {
  #[command(flatten)]
  pub common: CommonArgs,

  /// Compute the updates without writing any file
  #[arg(long)]
  pub dry_run: bool,

  /// Show the diff of every header update
  #[arg(long)]
  pub show_diff: bool,

  /// Save the diff of every header update to a file
  #[arg(long, short = 'o', value_name = "FILE")]
  pub save_diff: Option<PathBuf>,
}

/// Run the update command with the given arguments
pub fn run_update(args: UpdateArgs) -> Result<()> {
  let common = args.common;
  common.init_output();

  let config = common.load_config()?;
  debug!("Loaded configuration from {}", config.path.display());

  // A dry run without any diff output would be silent about what changes.
  let show_diff = args.show_diff || (args.dry_run && args.save_diff.is_none());
  let diff_manager = DiffManager::new(show_diff, args.save_diff);
  diff_manager.init()?;

  let engine = LicenseEngine::new(EngineConfig {
    discovery: config.discovery,
    dry_run: args.dry_run,
    diff_manager: Some(diff_manager),
    ..EngineConfig::new(config.registry, common.header_year())
  });

  print_start_message(common.paths.len(), true);
  debug!("Verifying headers for year {}", engine.year());
  let report = engine.update_license(&common.paths);

  let root = std::env::current_dir().ok();
  print_blank_line();
  print_updated_files(&report.updated, root.as_deref(), args.dry_run);

  if report.has_failures() {
    if !report.updated.is_empty() {
      print_blank_line();
    }
    print_wrong_headers(&report.failures, root.as_deref());
    print_blank_line();
    print_hint("These headers cannot be updated automatically. Run `headerguard check` first and fix them by hand.");
  } else if !args.dry_run {
    print_update_ok();
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
