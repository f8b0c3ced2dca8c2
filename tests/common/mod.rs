#![allow(dead_code)]

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use headerguard::config::load_config;
use headerguard::processor::{EngineConfig, LicenseEngine};
use headerguard::templates::HeaderYear;

/// Default header used across the integration tests.
pub const ACME_HEADER: &str = "// Copyright 2022-{YEAR} Acme\n";

/// Configuration with the Acme default header and a literal `vendor` rule.
pub const ACME_CONFIG: &str = concat!(
  "default-headers:\n",
  "  - name: acme\n",
  "    header: \"// Copyright 2022-{YEAR} Acme\\n\"\n",
  "custom-headers:\n",
  "  - name: vendor\n",
  "    header: \"// Vendored code, do not edit\\n\"\n",
  "    include-paths: [\"vendor/**/*.go\"]\n",
);

/// Renders the Acme header for `year`.
pub fn acme(year: i32) -> String {
  ACME_HEADER.replace("{YEAR}", &year.to_string())
}

/// Writes `content` to `rel` under `root`, creating parent directories.
pub fn write_file(root: &Path, rel: &str, content: &str) -> Result<PathBuf> {
  let path = root.join(rel);
  if let Some(parent) = path.parent() {
    fs::create_dir_all(parent).with_context(|| format!("Failed to create {}", parent.display()))?;
  }
  fs::write(&path, content).with_context(|| format!("Failed to write {}", path.display()))?;
  Ok(path)
}

/// Writes `.headerguard.yaml` into `root`.
pub fn write_config(root: &Path, yaml: &str) -> Result<PathBuf> {
  write_file(root, ".headerguard.yaml", yaml)
}

/// Builds an engine from the configuration file at `config_path`.
pub fn engine_for(config_path: &Path, year: i32) -> Result<LicenseEngine> {
  let search_dir = config_path.parent().context("config has a parent")?;
  let config = load_config(Some(config_path), search_dir)?;
  Ok(LicenseEngine::new(EngineConfig {
    discovery: config.discovery,
    ..EngineConfig::new(config.registry, HeaderYear::new(year))
  }))
}

/// Builds a dry-run engine from the configuration file at `config_path`.
pub fn dry_run_engine_for(config_path: &Path, year: i32) -> Result<LicenseEngine> {
  let search_dir = config_path.parent().context("config has a parent")?;
  let config = load_config(Some(config_path), search_dir)?;
  Ok(LicenseEngine::new(EngineConfig {
    discovery: config.discovery,
    dry_run: true,
    ..EngineConfig::new(config.registry, HeaderYear::new(year))
  }))
}
