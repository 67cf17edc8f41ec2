//! Diagnostic output for the command-line tools.
//!
//! Verbosity flags map to a `tracing` level filter; diagnostics go to
//! standard output and, optionally, to an append-only log file. The log
//! file is best effort: failing to open it never aborts a run.

use std::path::Path;

use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Verbosity {
    /// Warnings and errors only.
    #[default]
    Quiet,
    /// Progress diagnostics (`--verbose`).
    Verbose,
    /// Full debug output including wire payloads (`--debug`).
    Debug,
}

impl Verbosity {
    /// Combine the `--verbose`/`--debug` flags; debug wins.
    pub fn from_flags(verbose: bool, debug: bool) -> Self {
        if debug {
            Self::Debug
        } else if verbose {
            Self::Verbose
        } else {
            Self::Quiet
        }
    }

    fn directive(self) -> &'static str {
        match self {
            Self::Quiet => "warn",
            Self::Verbose => "info",
            Self::Debug => "debug",
        }
    }
}

/// Read a boolean flag from the environment, the way the tools' historical
/// wrappers did: first character `1` or `t`/`T` means true.
pub fn env_flag(name: &str) -> bool {
    std::env::var(name)
        .map(|value| matches!(value.chars().next(), Some('1' | 't' | 'T')))
        .unwrap_or(false)
}

/// Install the global tracing subscriber.
///
/// `RUST_LOG` overrides the flag-derived level when set. The returned guard
/// must be held for the process lifetime so buffered file output is flushed.
pub fn init(
    verbosity: Verbosity,
    log_file: Option<&Path>,
) -> Option<tracing_appender::non_blocking::WorkerGuard> {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(verbosity.directive()));

    // Failure to open the log file is swallowed, not propagated.
    let (file_layer, guard) = match log_file.and_then(open_append) {
        Some(file) => {
            let (writer, guard) = tracing_appender::non_blocking(file);
            let layer = fmt::layer()
                .with_target(false)
                .with_ansi(false)
                .with_writer(writer);
            (Some(layer), Some(guard))
        }
        None => (None, None),
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_target(false))
        .with(file_layer)
        .init();

    guard
}

fn open_append(path: &Path) -> Option<std::fs::File> {
    std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .ok()
}
