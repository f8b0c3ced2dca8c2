//! # Configuration Module
//!
//! This module loads the header configuration: the default headers, the
//! custom headers scoped by include/exclude paths, the globally excluded
//! paths and the directory discovery policy.
//!
//! Configuration is a YAML document (TOML is accepted for `.toml` files):
//!
//! ```yaml
//! default-headers:
//!   - name: acme
//!     header: "// Copyright 2022-{YEAR} Acme\n"
//! custom-headers:
//!   - name: vendor
//!     header: "// Vendored code\n"
//!     include-paths: ["vendor/**/*.go"]
//!     exclude-paths: []
//! headers-excluded-paths: ["generated/**/*.go"]
//! discovery:
//!   extensions: ["go"]
//!   skip-patterns: ["*.pb.go", "mock_*.go"]
//! ```
//!
//! All paths are resolved relative to the directory of the configuration
//! file, once, when the configuration is loaded.

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::Deserialize;

use crate::path_set::{self, PathResolutionError};
use crate::processor::{DEFAULT_EXTENSIONS, DEFAULT_SKIP_PATTERNS, DiscoveryPolicy};
use crate::registry::{CustomHeaderRule, HeaderRegistry};
use crate::templates::{HeaderTemplate, YEAR_PLACEHOLDER};
use crate::verbose_log;

/// Config file names looked up in the working directory, in order.
pub const DEFAULT_CONFIG_FILENAMES: &[&str] = &[".headerguard.yaml", ".headerguard.yml", ".headerguard.toml"];

/// Environment variable for specifying config file path.
pub const CONFIG_ENV_VAR: &str = "HEADERGUARD_CONFIG";

/// A default header entry.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct DefaultHeaderConfig {
  pub name: String,
  pub header: String,
}

/// A custom header entry scoped by path patterns.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct CustomHeaderConfig {
  pub name: String,
  pub header: String,
  #[serde(default, rename = "include-paths")]
  pub include_paths: Vec<String>,
  #[serde(default, rename = "exclude-paths")]
  pub exclude_paths: Vec<String>,
}

/// Directory discovery settings.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct DiscoveryConfig {
  /// Extensions collected from directories, without the leading dot
  #[serde(default = "default_extensions")]
  pub extensions: Vec<String>,

  /// File-name patterns of generated files that are never collected
  #[serde(default = "default_skip_patterns", rename = "skip-patterns")]
  pub skip_patterns: Vec<String>,
}

impl Default for DiscoveryConfig {
  fn default() -> Self {
    Self {
      extensions: default_extensions(),
      skip_patterns: default_skip_patterns(),
    }
  }
}

fn default_extensions() -> Vec<String> {
  DEFAULT_EXTENSIONS.iter().map(|s| s.to_string()).collect()
}

fn default_skip_patterns() -> Vec<String> {
  DEFAULT_SKIP_PATTERNS.iter().map(|s| s.to_string()).collect()
}

/// The configuration file as written, before any path is resolved.
#[derive(Debug, Clone, Default, Deserialize, PartialEq, Eq)]
pub struct RawHeadersConfig {
  #[serde(default, rename = "default-headers")]
  pub default_headers: Vec<DefaultHeaderConfig>,

  #[serde(default, rename = "custom-headers")]
  pub custom_headers: Vec<CustomHeaderConfig>,

  /// Paths exempt from all checking
  #[serde(default, rename = "headers-excluded-paths")]
  pub excluded_paths: Vec<String>,

  #[serde(default)]
  pub discovery: DiscoveryConfig,
}

/// Error type for configuration operations.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
  /// The config file could not be read.
  #[error("Failed to read config file '{path}': {source}")]
  ReadError { path: PathBuf, source: std::io::Error },

  /// The config file contains invalid YAML.
  #[error("Failed to parse config file '{path}': {source}")]
  ParseError {
    path: PathBuf,
    source: serde_yaml_ng::Error,
  },

  /// The config file contains invalid TOML.
  #[error("Failed to parse config file '{path}': {source}")]
  TomlParseError { path: PathBuf, source: toml::de::Error },

  /// A header entry is invalid.
  #[error("Invalid header '{name}': {message}")]
  InvalidHeader { name: String, message: String },

  /// The discovery settings are invalid.
  #[error("Invalid discovery settings: {message}")]
  InvalidDiscovery { message: String },

  /// A path pattern could not be resolved.
  #[error("Cannot resolve paths of '{owner}': {source}")]
  PathResolution {
    owner: String,
    source: PathResolutionError,
  },
}

impl RawHeadersConfig {
  /// Load configuration from a file.
  ///
  /// Files ending in `.toml` are parsed as TOML, everything else as YAML.
  pub fn load(path: &Path) -> Result<Self, ConfigError> {
    verbose_log!("Loading config from: {}", path.display());

    let content = std::fs::read_to_string(path).map_err(|e| ConfigError::ReadError {
      path: path.to_path_buf(),
      source: e,
    })?;

    let is_toml = path
      .extension()
      .and_then(|ext| ext.to_str())
      .is_some_and(|ext| ext.eq_ignore_ascii_case("toml"));

    let config = if is_toml {
      Self::from_toml_str(&content).map_err(|e| ConfigError::TomlParseError {
        path: path.to_path_buf(),
        source: e,
      })?
    } else {
      Self::from_yaml_str(&content).map_err(|e| ConfigError::ParseError {
        path: path.to_path_buf(),
        source: e,
      })?
    };

    config.validate()?;

    verbose_log!(
      "Loaded {} default headers and {} custom headers",
      config.default_headers.len(),
      config.custom_headers.len()
    );

    Ok(config)
  }

  /// Parses a YAML document. An empty document is an empty configuration.
  pub fn from_yaml_str(content: &str) -> Result<Self, serde_yaml_ng::Error> {
    if content.trim().is_empty() {
      return Ok(Self::default());
    }
    serde_yaml_ng::from_str(content)
  }

  pub fn from_toml_str(content: &str) -> Result<Self, toml::de::Error> {
    toml::from_str(content)
  }

  /// Validate the configuration.
  ///
  /// Checks that:
  /// - Header names are non-empty and unique within their kind
  /// - Header bodies are non-empty
  /// - Header bodies contain at most one `{YEAR}` placeholder
  /// - Skip patterns are valid globs
  pub fn validate(&self) -> Result<(), ConfigError> {
    let defaults = self.default_headers.iter().map(|h| (h.name.as_str(), h.header.as_str()));
    validate_headers(defaults)?;

    let customs = self.custom_headers.iter().map(|h| (h.name.as_str(), h.header.as_str()));
    validate_headers(customs)?;

    for pattern in &self.discovery.skip_patterns {
      if let Err(e) = glob::Pattern::new(pattern) {
        return Err(ConfigError::InvalidDiscovery {
          message: format!("invalid skip pattern '{}': {}", pattern, e),
        });
      }
    }

    Ok(())
  }

  /// Builds the directory discovery policy.
  pub fn discovery_policy(&self) -> Result<DiscoveryPolicy, ConfigError> {
    DiscoveryPolicy::new(self.discovery.extensions.clone(), &self.discovery.skip_patterns).map_err(|e| {
      ConfigError::InvalidDiscovery {
        message: format!("{e:#}"),
      }
    })
  }
}

impl HeaderRegistry {
  /// Resolves every path pattern against `base_dir` and builds the registry.
  ///
  /// # Errors
  ///
  /// Any invalid pattern is fatal: a registry built from partially resolved
  /// patterns cannot be trusted.
  pub fn from_raw(raw: RawHeadersConfig, base_dir: &Path) -> Result<Self, ConfigError> {
    let default_headers = raw
      .default_headers
      .into_iter()
      .map(|h| HeaderTemplate::new(h.name, h.header))
      .collect();

    let mut custom_rules = Vec::with_capacity(raw.custom_headers.len());
    for custom in raw.custom_headers {
      let owner = custom.name.clone();
      let rule = CustomHeaderRule::resolve(
        HeaderTemplate::new(custom.name, custom.header),
        custom.include_paths,
        custom.exclude_paths,
        base_dir,
      )
      .map_err(|source| ConfigError::PathResolution { owner, source })?;
      custom_rules.push(rule);
    }

    let excluded_files: HashSet<PathBuf> =
      path_set::resolve(&raw.excluded_paths, base_dir).map_err(|source| ConfigError::PathResolution {
        owner: "headers-excluded-paths".to_string(),
        source,
      })?;
    verbose_log!("{} files are excluded from header checks", excluded_files.len());

    Ok(Self::new(default_headers, custom_rules, excluded_files))
  }
}

fn validate_headers<'a>(headers: impl Iterator<Item = (&'a str, &'a str)>) -> Result<(), ConfigError> {
  let mut seen = HashSet::new();
  for (name, body) in headers {
    let invalid = |message: &str| ConfigError::InvalidHeader {
      name: name.to_string(),
      message: message.to_string(),
    };

    if name.trim().is_empty() {
      return Err(invalid("name cannot be empty"));
    }
    if !seen.insert(name) {
      return Err(invalid("name is declared more than once"));
    }
    if body.is_empty() {
      return Err(invalid("header cannot be empty"));
    }
    if body.matches(YEAR_PLACEHOLDER).count() > 1 {
      return Err(invalid("header may contain at most one {YEAR} placeholder"));
    }
  }
  Ok(())
}

/// A configuration ready for a run.
#[derive(Debug)]
pub struct LoadedConfig {
  /// The file the configuration was read from
  pub path: PathBuf,
  pub registry: HeaderRegistry,
  pub discovery: DiscoveryPolicy,
}

/// Discover the configuration file path.
///
/// The configuration file is discovered in the following order:
/// 1. Path specified via `--config` flag (passed as `explicit_path`)
/// 2. Path specified via `HEADERGUARD_CONFIG` environment variable
/// 3. `.headerguard.yaml`, `.headerguard.yml` or `.headerguard.toml` in
///    `search_dir`
///
/// An explicit path is returned even if it does not exist, so that loading
/// reports it.
pub fn discover_config_path(explicit_path: Option<&Path>, search_dir: &Path) -> Option<PathBuf> {
  let env_path = std::env::var_os(CONFIG_ENV_VAR).map(PathBuf::from);
  discover_config_path_from(explicit_path, env_path, search_dir)
}

/// Discovery with the value of [`CONFIG_ENV_VAR`] passed in.
fn discover_config_path_from(
  explicit_path: Option<&Path>,
  env_path: Option<PathBuf>,
  search_dir: &Path,
) -> Option<PathBuf> {
  if let Some(path) = explicit_path {
    verbose_log!("Using explicit config path: {}", path.display());
    return Some(path.to_path_buf());
  }

  if let Some(path) = env_path {
    if path.exists() {
      verbose_log!("Using config from {}: {}", CONFIG_ENV_VAR, path.display());
      return Some(path);
    }
    verbose_log!("{} path does not exist: {}", CONFIG_ENV_VAR, path.display());
  }

  for name in DEFAULT_CONFIG_FILENAMES {
    let candidate = search_dir.join(name);
    if candidate.exists() {
      verbose_log!("Using config: {}", candidate.display());
      return Some(candidate);
    }
  }

  verbose_log!("No config file found");
  None
}

/// Discover, load and resolve the configuration.
///
/// Relative patterns are anchored at the directory containing the
/// configuration file, whatever the working directory is.
pub fn load_config(explicit_path: Option<&Path>, search_dir: &Path) -> Result<LoadedConfig> {
  let path = discover_config_path(explicit_path, search_dir).with_context(|| {
    format!(
      "No configuration file found (pass --config, set {} or create {} in {})",
      CONFIG_ENV_VAR,
      DEFAULT_CONFIG_FILENAMES[0],
      search_dir.display()
    )
  })?;

  let raw = RawHeadersConfig::load(&path).with_context(|| format!("Failed to load config from {}", path.display()))?;

  let absolute = path_set::absolutize_path(&path)?;
  let base_dir = absolute.parent().map(Path::to_path_buf).unwrap_or_else(|| PathBuf::from("/"));

  let discovery = raw.discovery_policy()?;
  let registry = HeaderRegistry::from_raw(raw, &base_dir)?;

  Ok(LoadedConfig {
    path,
    registry,
    discovery,
  })
}
