//! tracing setup. Output goes to stderr; stdout carries command output and
//! the `serve` handshake line.

use std::io::IsTerminal;

use tracing_subscriber::{fmt, prelude::*, EnvFilter};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verbosity {
    Quiet,
    Normal,
    Verbose,
    /// Also surfaces axum's own events.
    Trace,
}

impl Verbosity {
    /// `-q` wins over any number of `-v`.
    #[must_use]
    pub fn from_flags(quiet: bool, verbose: u8) -> Self {
        match (quiet, verbose) {
            (true, _) => Self::Quiet,
            (false, 0) => Self::Normal,
            (false, 1) => Self::Verbose,
            (false, _) => Self::Trace,
        }
    }

    /// Filter used when `RUST_LOG` is unset.
    #[must_use]
    pub fn directives(self) -> &'static str {
        match self {
            Self::Quiet => "rosterd=error",
            Self::Normal => "rosterd=info",
            Self::Verbose => "rosterd=debug",
            Self::Trace => "rosterd=trace,axum=debug",
        }
    }
}

pub fn init_logging(verbosity: Verbosity) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(verbosity.directives()));
    let stderr = std::io::stderr();
    let layer = fmt::layer()
        .compact()
        .with_ansi(stderr.is_terminal())
        .with_target(verbosity == Verbosity::Trace)
        .with_writer(std::io::stderr);

    // Repeat calls (tests) keep whichever subscriber came first.
    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(layer)
        .try_init();
}
