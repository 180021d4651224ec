//! Diagnostics go to stderr through `tracing`.

use std::io::IsTerminal;

use tracing_subscriber::EnvFilter;

/// Level used when `RUST_LOG` is unset: `warn`, `-v` debug, `-vv` trace.
pub fn default_directive(verbosity: u8) -> &'static str {
    match verbosity {
        0 => "warn",
        1 => "debug",
        _ => "trace",
    }
}

pub fn init(verbosity: u8) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directive(verbosity)));
    let use_ansi = std::env::var_os("NO_COLOR").is_none() && std::io::stderr().is_terminal();

    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_ansi(use_ansi)
        .with_writer(std::io::stderr)
        .with_target(false)
        .compact()
        .finish();
    // Ignored when a subscriber is already installed.
    let _ = tracing::subscriber::set_global_default(subscriber);
}
