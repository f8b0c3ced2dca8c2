mod common;

use std::fs;
use std::path::PathBuf;

use anyhow::Result;
use common::{ACME_CONFIG, acme, dry_run_engine_for, engine_for, write_config, write_file};
use headerguard::config::load_config;
use headerguard::diff::DiffManager;
use headerguard::matcher::VerifyMode;
use headerguard::processor::{EngineConfig, LicenseEngine};
use headerguard::report::FailureReason;
use headerguard::templates::HeaderYear;
use tempfile::tempdir;

#[test]
fn test_current_year_header_is_compliant() -> Result<()> {
  let temp_dir = tempdir()?;
  let config = write_config(temp_dir.path(), ACME_CONFIG)?;
  let file = write_file(temp_dir.path(), "a.go", &format!("{}\npackage a", acme(2024)))?;

  let report = engine_for(&config, 2024)?.check_license(&[&file]);

  assert!(report.failures.is_empty(), "unexpected failures: {:?}", report.failures);
  assert_eq!(report.checked, 1);
  assert!(report.status().is_ok());
  Ok(())
}

#[test]
fn test_previous_year_header_fails_check() -> Result<()> {
  let temp_dir = tempdir()?;
  let config = write_config(temp_dir.path(), ACME_CONFIG)?;
  let original = format!("{}\npackage a", acme(2023));
  let file = write_file(temp_dir.path(), "a.go", &original)?;

  let report = engine_for(&config, 2024)?.check_license(&[&file]);

  assert_eq!(report.mode, VerifyMode::Check);
  assert_eq!(report.failures.len(), 1);
  assert_eq!(report.failures[0].file, file);
  assert_eq!(report.failures[0].reason, FailureReason::NoMatchingDefaultHeader);
  assert!(report.failures[0].reason.to_string().contains("no default header matched"));

  // Check never writes
  assert_eq!(fs::read_to_string(&file)?, original);
  Ok(())
}

#[test]
fn test_update_rewrites_previous_year_header() -> Result<()> {
  let temp_dir = tempdir()?;
  let config = write_config(temp_dir.path(), ACME_CONFIG)?;
  let file = write_file(temp_dir.path(), "a.go", "// Copyright 2022-2023 Acme\n\npackage a")?;

  let report = engine_for(&config, 2024)?.update_license(&[&file]);

  assert!(report.failures.is_empty(), "unexpected failures: {:?}", report.failures);
  assert_eq!(report.updated, vec![file.clone()]);
  assert_eq!(fs::read_to_string(&file)?, "// Copyright 2022-2024 Acme\n\npackage a");
  Ok(())
}

#[test]
fn test_update_is_idempotent() -> Result<()> {
  let temp_dir = tempdir()?;
  let config = write_config(temp_dir.path(), ACME_CONFIG)?;
  let file = write_file(temp_dir.path(), "a.go", &format!("{}\npackage a\n", acme(2023)))?;
  let engine = engine_for(&config, 2024)?;

  let first = engine.update_license(&[&file]);
  let after_first = fs::read(&file)?;
  let second = engine.update_license(&[&file]);

  assert_eq!(first.updated.len(), 1);
  assert!(second.updated.is_empty());
  assert!(second.failures.is_empty());
  assert_eq!(fs::read(&file)?, after_first);
  assert!(engine.check_license(&[&file]).failures.is_empty());
  Ok(())
}

#[test]
fn test_rollover_changes_only_header_bytes() -> Result<()> {
  let temp_dir = tempdir()?;
  let config = write_config(temp_dir.path(), ACME_CONFIG)?;
  let rest = "\n// Released in 2023.\n// Copyright 2022-2023 Acme\npackage a\r\n\tfunc main() {}\n";
  let file = write_file(temp_dir.path(), "a.go", &format!("{}{}", acme(2023), rest))?;

  engine_for(&config, 2024)?.update_license(&[&file]);

  assert_eq!(fs::read_to_string(&file)?, format!("{}{}", acme(2024), rest));
  Ok(())
}

#[test]
fn test_update_reports_unrecognized_headers() -> Result<()> {
  let temp_dir = tempdir()?;
  let config = write_config(temp_dir.path(), ACME_CONFIG)?;
  let missing = write_file(temp_dir.path(), "missing.go", "package a\n")?;
  let too_old = write_file(temp_dir.path(), "old.go", &format!("{}package a\n", acme(2022)))?;

  let report = engine_for(&config, 2024)?.update_license(&[&missing, &too_old]);

  assert!(report.updated.is_empty());
  let failed: Vec<_> = report.failures.iter().map(|f| f.file.clone()).collect();
  assert_eq!(failed, vec![missing.clone(), too_old.clone()]);
  assert!(report.status().is_err());
  assert_eq!(fs::read_to_string(&missing)?, "package a\n");
  assert_eq!(fs::read_to_string(&too_old)?, format!("{}package a\n", acme(2022)));
  Ok(())
}

#[test]
fn test_literal_custom_header_ignores_year() -> Result<()> {
  let temp_dir = tempdir()?;
  let config = write_config(temp_dir.path(), ACME_CONFIG)?;
  let file = write_file(
    temp_dir.path(),
    "vendor/lib/x.go",
    "// Vendored code, do not edit\npackage x\n",
  )?;

  for year in [2024, 2031] {
    let report = engine_for(&config, year)?.check_license(&[&file]);
    assert!(report.failures.is_empty(), "year {}: {:?}", year, report.failures);
  }
  Ok(())
}

#[test]
fn test_custom_rule_wins_over_default_content() -> Result<()> {
  let temp_dir = tempdir()?;
  let config = write_config(temp_dir.path(), ACME_CONFIG)?;
  let file = write_file(temp_dir.path(), "vendor/lib/x.go", &format!("{}package x\n", acme(2024)))?;

  let report = engine_for(&config, 2024)?.check_license(&[&file]);

  assert_eq!(report.failures.len(), 1);
  assert_eq!(
    report.failures[0].reason,
    FailureReason::NoMatchingCustomHeader("vendor".to_string())
  );
  assert!(report.failures[0].reason.to_string().contains("vendor"));
  Ok(())
}

#[test]
fn test_literal_custom_header_is_never_rewritten() -> Result<()> {
  let temp_dir = tempdir()?;
  let config = write_config(temp_dir.path(), ACME_CONFIG)?;
  let file = write_file(temp_dir.path(), "vendor/x.go", "// Vendored code\npackage x\n")?;

  let report = engine_for(&config, 2024)?.update_license(&[&file]);

  assert!(report.updated.is_empty());
  assert_eq!(report.failures.len(), 1);
  assert_eq!(fs::read_to_string(&file)?, "// Vendored code\npackage x\n");
  Ok(())
}

#[test]
fn test_global_exclusion_always_wins() -> Result<()> {
  let temp_dir = tempdir()?;
  let config = write_config(
    temp_dir.path(),
    &format!("{}headers-excluded-paths: [\"generated/**/*.go\", \"vendor/skip/*.go\"]\n", ACME_CONFIG),
  )?;
  let generated = write_file(temp_dir.path(), "generated/api/x.go", "no header at all")?;
  let vendored = write_file(temp_dir.path(), "vendor/skip/y.go", "no header either")?;

  let engine = engine_for(&config, 2024)?;
  let report = engine.check_license(&[&generated, &vendored]);

  assert!(report.failures.is_empty(), "unexpected failures: {:?}", report.failures);
  assert_eq!(report.skipped, 2);
  assert_eq!(report.checked, 0);

  let report = engine.update_license(&[&generated]);
  assert!(report.updated.is_empty());
  assert_eq!(fs::read_to_string(&generated)?, "no header at all");
  Ok(())
}

#[test]
fn test_custom_exclude_paths_fall_back_to_defaults() -> Result<()> {
  let temp_dir = tempdir()?;
  let config = write_config(
    temp_dir.path(),
    concat!(
      "default-headers:\n",
      "  - name: acme\n",
      "    header: \"// Copyright 2022-{YEAR} Acme\\n\"\n",
      "custom-headers:\n",
      "  - name: camino\n",
      "    header: \"// Camino {YEAR}\\n\"\n",
      "    include-paths: [\"./**/camino*.go\"]\n",
      "    exclude-paths: [\"./**/camino_*exclude.go\"]\n",
    ),
  )?;
  let covered = write_file(temp_dir.path(), "pkg/camino_node.go", "// Camino 2024\npackage pkg\n")?;
  let excluded = write_file(
    temp_dir.path(),
    "pkg/camino_exclude.go",
    &format!("{}package pkg\n", acme(2024)),
  )?;

  let report = engine_for(&config, 2024)?.check_license(&[&covered, &excluded]);

  assert!(report.failures.is_empty(), "unexpected failures: {:?}", report.failures);
  assert_eq!(report.checked, 2);
  Ok(())
}

#[test]
fn test_longest_include_pattern_wins() -> Result<()> {
  let rules = [
    ("short", "pkg/**/*.go", "// short\n"),
    ("long", "pkg/api/**/*.go", "// long\n"),
  ];

  // The winner must not depend on declaration order.
  for reversed in [false, true] {
    let temp_dir = tempdir()?;
    let mut ordered: Vec<_> = rules.to_vec();
    if reversed {
      ordered.reverse();
    }

    let mut yaml = String::from("custom-headers:\n");
    for (name, include, header) in &ordered {
      yaml.push_str(&format!(
        "  - name: {}\n    header: {:?}\n    include-paths: [\"{}\"]\n",
        name, header, include
      ));
    }
    let config = write_config(temp_dir.path(), &yaml)?;
    let long_ok = write_file(temp_dir.path(), "pkg/api/v1/x.go", "// long\npackage v1\n")?;
    let long_bad = write_file(temp_dir.path(), "pkg/api/v1/y.go", "// short\npackage v1\n")?;
    let short_ok = write_file(temp_dir.path(), "pkg/util/z.go", "// short\npackage util\n")?;

    let engine = engine_for(&config, 2024)?;
    for _ in 0..3 {
      let report = engine.check_license(&[&long_ok, &long_bad, &short_ok]);
      assert_eq!(report.failures.len(), 1, "reversed={}: {:?}", reversed, report.failures);
      assert_eq!(report.failures[0].file, long_bad);
      assert_eq!(
        report.failures[0].reason,
        FailureReason::NoMatchingCustomHeader("long".to_string())
      );
    }
  }
  Ok(())
}

#[test]
fn test_custom_header_with_placeholder_rolls_over() -> Result<()> {
  let temp_dir = tempdir()?;
  let config = write_config(
    temp_dir.path(),
    concat!(
      "custom-headers:\n",
      "  - name: tools\n",
      "    header: \"// Tools (C) {YEAR}\\n\"\n",
      "    include-paths: [\"tools/*.go\"]\n",
    ),
  )?;
  let file = write_file(temp_dir.path(), "tools/gen.go", "// Tools (C) 2023\npackage tools\n")?;

  let report = engine_for(&config, 2024)?.update_license(&[&file]);

  assert_eq!(report.updated, vec![file.clone()]);
  assert_eq!(fs::read_to_string(&file)?, "// Tools (C) 2024\npackage tools\n");
  Ok(())
}

#[test]
fn test_any_default_header_may_match() -> Result<()> {
  let temp_dir = tempdir()?;
  let config = write_config(
    temp_dir.path(),
    concat!(
      "default-headers:\n",
      "  - name: l1\n",
      "    header: \"// Copyright (C) 2022-{YEAR}, Chain4Travel AG. All rights reserved.\\n// L1\\n\"\n",
      "  - name: l2\n",
      "    header: \"// Copyright (C) 2022-{YEAR}, Chain4Travel AG. All rights reserved.\\n// L2\\n\"\n",
    ),
  )?;
  let current = write_file(
    temp_dir.path(),
    "current.go",
    "// Copyright (C) 2022-2024, Chain4Travel AG. All rights reserved.\n// L2\npackage a\n",
  )?;
  let stale = write_file(
    temp_dir.path(),
    "stale.go",
    "// Copyright (C) 2022-2023, Chain4Travel AG. All rights reserved.\n// L2\npackage a\n",
  )?;
  let engine = engine_for(&config, 2024)?;

  let report = engine.check_license(&[&current, &stale]);
  assert_eq!(report.failures.len(), 1);
  assert_eq!(report.failures[0].file, stale);

  let report = engine.update_license(&[&current, &stale]);
  assert_eq!(report.updated, vec![stale.clone()]);
  assert_eq!(
    fs::read_to_string(&stale)?,
    "// Copyright (C) 2022-2024, Chain4Travel AG. All rights reserved.\n// L2\npackage a\n"
  );
  Ok(())
}

#[test]
fn test_directory_input_skips_generated_files() -> Result<()> {
  let temp_dir = tempdir()?;
  let config = write_config(temp_dir.path(), ACME_CONFIG)?;
  let src = temp_dir.path().join("src");
  write_file(&src, "foo.go", &format!("{}package src\n", acme(2024)))?;
  write_file(&src, "foo.pb.go", "// Code generated by protoc-gen-go. DO NOT EDIT.\n")?;
  write_file(&src, "mock_foo.go", "// Code generated by MockGen. DO NOT EDIT.\n")?;
  write_file(&src, "README.md", "# src\n")?;

  let report = engine_for(&config, 2024)?.check_license(&[&src]);

  assert!(report.failures.is_empty(), "unexpected failures: {:?}", report.failures);
  assert_eq!(report.checked, 1);
  Ok(())
}

#[test]
fn test_explicit_file_bypasses_discovery_policy() -> Result<()> {
  let temp_dir = tempdir()?;
  let config = write_config(temp_dir.path(), ACME_CONFIG)?;
  let generated = write_file(temp_dir.path(), "foo.pb.go", "// Code generated. DO NOT EDIT.\n")?;

  let report = engine_for(&config, 2024)?.check_license(&[&generated]);

  assert_eq!(report.failures.len(), 1);
  assert_eq!(report.failures[0].file, generated);
  Ok(())
}

#[test]
fn test_discovery_policy_from_config() -> Result<()> {
  let temp_dir = tempdir()?;
  let config = write_config(
    temp_dir.path(),
    concat!(
      "default-headers:\n",
      "  - name: acme\n",
      "    header: \"// Copyright 2022-{YEAR} Acme\\n\"\n",
      "discovery:\n",
      "  extensions: [rs]\n",
      "  skip-patterns: [\"*_generated.rs\"]\n",
    ),
  )?;
  let src = temp_dir.path().join("src");
  write_file(&src, "lib.rs", "fn missing_header() {}\n")?;
  write_file(&src, "schema_generated.rs", "fn generated() {}\n")?;
  write_file(&src, "main.go", "package main\n")?;

  let report = engine_for(&config, 2024)?.check_license(&[&src]);

  let failed: Vec<_> = report.failures.iter().map(|f| f.file.clone()).collect();
  assert_eq!(failed, vec![src.join("lib.rs")]);
  Ok(())
}

#[test]
fn test_missing_path_does_not_abort_batch() -> Result<()> {
  let temp_dir = tempdir()?;
  let config = write_config(temp_dir.path(), ACME_CONFIG)?;
  let missing = temp_dir.path().join("missing.go");
  let bad = write_file(temp_dir.path(), "bad.go", "package a\n")?;
  let good = write_file(temp_dir.path(), "good.go", &format!("{}package a\n", acme(2024)))?;

  let report = engine_for(&config, 2024)?.check_license(&[&missing, &bad, &good]);

  assert_eq!(report.failures.len(), 2);
  assert_eq!(report.failures[0].file, missing);
  assert_eq!(report.failures[0].reason, FailureReason::NotFound);
  assert_eq!(report.failures[0].reason.to_string(), "File doesn't exist");
  assert_eq!(report.failures[1].file, bad);
  assert_eq!(report.checked, 2);
  Ok(())
}

#[test]
fn test_failures_follow_input_order() -> Result<()> {
  let temp_dir = tempdir()?;
  let config = write_config(temp_dir.path(), ACME_CONFIG)?;
  let dir = temp_dir.path().join("pkg");
  for name in ["c.go", "a.go", "b.go"] {
    write_file(&dir, name, "package pkg\n")?;
  }
  let first = write_file(temp_dir.path(), "z.go", "package z\n")?;

  let report = engine_for(&config, 2024)?.check_license(&[first.clone(), dir.clone()]);

  let failed: Vec<PathBuf> = report.failures.iter().map(|f| f.file.clone()).collect();
  assert_eq!(
    failed,
    vec![first, dir.join("a.go"), dir.join("b.go"), dir.join("c.go")]
  );
  Ok(())
}

#[test]
fn test_overlapping_inputs_are_checked_once() -> Result<()> {
  let temp_dir = tempdir()?;
  let config = write_config(temp_dir.path(), ACME_CONFIG)?;
  let dir = temp_dir.path().join("pkg");
  let file = write_file(&dir, "a.go", "package pkg\n")?;

  let report = engine_for(&config, 2024)?.check_license(&[dir.clone(), file.clone(), dir]);

  assert_eq!(report.checked, 1);
  assert_eq!(report.failures.len(), 1);
  Ok(())
}

#[test]
fn test_dry_run_does_not_write() -> Result<()> {
  let temp_dir = tempdir()?;
  let config = write_config(temp_dir.path(), ACME_CONFIG)?;
  let original = format!("{}package a\n", acme(2023));
  let file = write_file(temp_dir.path(), "a.go", &original)?;

  let report = dry_run_engine_for(&config, 2024)?.update_license(&[&file]);

  assert_eq!(report.updated, vec![file.clone()]);
  assert!(report.failures.is_empty());
  assert_eq!(fs::read_to_string(&file)?, original);
  Ok(())
}

#[test]
fn test_patterns_resolve_relative_to_config_dir() -> Result<()> {
  let temp_dir = tempdir()?;
  let config_dir = temp_dir.path().join("conf");
  let config = write_file(&config_dir, "headers.yaml", ACME_CONFIG)?;
  // `vendor/**` is anchored at conf/, so this file falls back to defaults.
  let outside = write_file(temp_dir.path(), "vendor/x.go", &format!("{}package x\n", acme(2024)))?;
  let inside = write_file(&config_dir, "vendor/y.go", &format!("{}package y\n", acme(2024)))?;

  let report = engine_for(&config, 2024)?.check_license(&[&outside, &inside]);

  assert_eq!(report.failures.len(), 1);
  assert_eq!(report.failures[0].file, inside);
  Ok(())
}

#[cfg(unix)]
#[test]
fn test_update_through_symlink_rewrites_target() -> Result<()> {
  let temp_dir = tempdir()?;
  let config = write_config(temp_dir.path(), ACME_CONFIG)?;
  let target = write_file(temp_dir.path(), "real/a.go", &format!("{}package a\n", acme(2023)))?;
  let link = temp_dir.path().join("a.go");
  std::os::unix::fs::symlink(&target, &link)?;

  let report = engine_for(&config, 2024)?.update_license(&[&link]);

  assert!(report.failures.is_empty(), "unexpected failures: {:?}", report.failures);
  assert_eq!(report.updated, vec![link.clone()]);
  assert!(fs::symlink_metadata(&link)?.file_type().is_symlink());
  assert_eq!(fs::read_to_string(&target)?, format!("{}package a\n", acme(2024)));
  Ok(())
}

/// Builds a directory whose path is so close to `PATH_MAX` that a file named
/// `a.go` fits in it but a temp file name does not.
#[cfg(target_os = "linux")]
fn near_path_max_dir(root: &std::path::Path) -> Result<PathBuf> {
  let mut dir = fs::canonicalize(root)?;
  while dir.as_os_str().len() < 4085 {
    let segment = (4088 - dir.as_os_str().len() - 1).min(200);
    dir.push("d".repeat(segment));
  }
  fs::create_dir_all(&dir)?;
  Ok(dir)
}

#[cfg(target_os = "linux")]
#[test]
fn test_write_failure_does_not_abort_batch() -> Result<()> {
  let temp_dir = tempdir()?;
  let config = write_config(temp_dir.path(), ACME_CONFIG)?;
  let stale = format!("{}package a\n", acme(2023));
  let unwritable = write_file(&near_path_max_dir(temp_dir.path())?, "a.go", &stale)?;
  let writable = write_file(temp_dir.path(), "b.go", &stale)?;

  let report = engine_for(&config, 2024)?.update_license(&[&unwritable, &writable]);

  assert_eq!(report.failures.len(), 1);
  assert_eq!(report.failures[0].file, unwritable);
  assert!(
    matches!(report.failures[0].reason, FailureReason::WriteFailed(_)),
    "unexpected reason: {:?}",
    report.failures[0].reason
  );
  assert_eq!(report.updated, vec![writable.clone()]);
  assert!(report.status().is_err());

  assert_eq!(fs::read_to_string(&unwritable)?, stale);
  assert_eq!(fs::read_to_string(&writable)?, format!("{}package a\n", acme(2024)));
  Ok(())
}

#[test]
fn test_unwritable_diff_file_does_not_block_update() -> Result<()> {
  let temp_dir = tempdir()?;
  let config_path = write_config(temp_dir.path(), ACME_CONFIG)?;
  let file = write_file(temp_dir.path(), "a.go", &format!("{}package a\n", acme(2023)))?;
  let config = load_config(Some(config_path.as_path()), temp_dir.path())?;

  // Appending to a directory always fails
  let engine = LicenseEngine::new(EngineConfig {
    discovery: config.discovery,
    diff_manager: Some(DiffManager::new(false, Some(temp_dir.path().to_path_buf()))),
    ..EngineConfig::new(config.registry, HeaderYear::new(2024))
  });
  let report = engine.update_license(&[&file]);

  assert!(report.failures.is_empty(), "unexpected failures: {:?}", report.failures);
  assert_eq!(report.updated, vec![file.clone()]);
  assert_eq!(fs::read_to_string(&file)?, format!("{}package a\n", acme(2024)));
  Ok(())
}
