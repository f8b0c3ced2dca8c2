use std::sync::atomic::{AtomicU8, Ordering};

use clap::ValueEnum;
use tracing_subscriber::EnvFilter;

/// Global output mode shared by the [`verbose_log!`] and [`info_log!`]
/// macros.
///
/// This is initialized to `0` (Normal) by default.
static OUTPUT_MODE: AtomicU8 = AtomicU8::new(0);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum OutputMode {
  Normal = 0,
  Quiet = 1,
  Verbose = 2,
}

impl OutputMode {
  /// Convert from u8 to OutputMode
  const fn from_u8(value: u8) -> Self {
    match value {
      1 => OutputMode::Quiet,
      2 => OutputMode::Verbose,
      _ => OutputMode::Normal,
    }
  }
}

/// Enum representing the color mode options.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ColorMode {
  /// Automatically determine whether to use colors based on TTY detection
  Auto,
  /// Never use colors
  Never,
  /// Always use colors
  Always,
}

impl ColorMode {
  /// Applies the mode to every colored message printed afterwards.
  pub fn apply(self) {
    match self {
      ColorMode::Auto => owo_colors::unset_override(),
      ColorMode::Never => owo_colors::set_override(false),
      ColorMode::Always => owo_colors::set_override(true),
    }
  }
}

/// Sets the global verbose logging flag.
///
/// When verbose logging is enabled, the [`verbose_log!`] macro will output
/// messages to stderr. When disabled, verbose log messages are suppressed.
pub fn set_verbose() {
  OUTPUT_MODE.store(OutputMode::Verbose as u8, Ordering::SeqCst);
}

/// Suppresses [`info_log!`] output.
pub fn set_quiet() {
  OUTPUT_MODE.store(OutputMode::Quiet as u8, Ordering::SeqCst);
}

/// Checks if verbose logging is currently enabled.
pub fn is_verbose() -> bool {
  matches!(
    OutputMode::from_u8(OUTPUT_MODE.load(Ordering::SeqCst)),
    OutputMode::Verbose
  )
}

/// Checks if quiet mode is currently enabled.
pub fn is_quiet() -> bool {
  matches!(OutputMode::from_u8(OUTPUT_MODE.load(Ordering::SeqCst)), OutputMode::Quiet)
}

/// Default tracing directive for the given flags.
fn default_directive(quiet: bool, verbose: u8) -> &'static str {
  if quiet {
    return "error";
  }
  match verbose {
    0 => "warn",
    1 => "info",
    2 => "debug",
    _ => "trace",
  }
}

/// Initializes the tracing subscriber writing to stderr.
///
/// `RUST_LOG` takes precedence; otherwise the level follows the `-q` / `-v`
/// flags. Calling this more than once is harmless.
pub fn init_tracing(quiet: bool, verbose: u8) {
  let filter =
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_directive(quiet, verbose)));

  let _ = tracing_subscriber::fmt()
    .with_env_filter(filter)
    .with_writer(std::io::stderr)
    .with_target(false)
    .try_init();
}
