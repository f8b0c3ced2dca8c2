//! # Logging Module
//!
//! headerguard writes to three channels:
//!
//! - `tracing` diagnostics on stderr, filtered by `RUST_LOG` or by the
//!   `-q` / `-v` flags ([`init_tracing`])
//! - per-file progress on stderr, only with `-v` ([`verbose_log!`])
//! - notices on stdout next to the check results ([`info_log!`])
//!
//! With `-q` stdout carries nothing but the paths of the files with wrong
//! headers, one per line, so the output can be piped into other tools.
//! [`info_log!`] is silent in that mode.
//!
//! ```rust
//! use headerguard::logging::{ColorMode, set_verbose};
//! use headerguard::{info_log, verbose_log};
//!
//! set_verbose();
//! ColorMode::Never.apply();
//!
//! verbose_log!("Updated header: {}", "cmd/main.go");
//! info_log!("Generated JSON report at {}", "headers.json");
//! ```

mod modes;

pub use modes::{ColorMode, init_tracing, is_quiet, is_verbose, set_quiet, set_verbose};
use owo_colors::{OwoColorize, Stream};

/// Prints a per-file progress line to stderr when `-v` was given.
#[macro_export]
macro_rules! verbose_log {
    ($($arg:tt)*) => {
        if $crate::logging::is_verbose() {
            eprintln!($($arg)*);
        }
    };
}

/// Prints a notice to stdout unless `-q` restricted stdout to failing paths.
#[macro_export]
macro_rules! info_log {
    ($($arg:tt)*) => {
        if !$crate::logging::is_quiet() {
            $crate::logging::print_info_log(&format!($($arg)*));
        }
    };
}

/// Backs [`info_log!`]: notices are yellow when colors are enabled.
pub fn print_info_log(message: &str) {
  println!("{}", message.if_supports_color(Stream::Stdout, |m| m.yellow()));
}
