//! # headerguard
//!
//! Verifies and repairs copyright license headers in source files.

mod cli;

use anyhow::Result;

use crate::cli::{Cli, Command, run_check, run_update};

fn main() -> Result<()> {
  let cli = Cli::parse_args();

  match cli.command {
    Command::Check(args) => run_check(args),
    Command::Update(args) => run_update(args),
  }
}
