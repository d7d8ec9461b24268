// SPDX-License-Identifier: MPL-2.0
//! Logging setup.
//!
//! Call [`init`] once at the start of `main()`. Output goes to stderr so
//! command results on stdout stay clean.

use tracing_subscriber::EnvFilter;

/// Filter used when `RUST_LOG` is not set.
const DEFAULT_FILTER: &str = "info";

/// Filter used with `--verbose` when `RUST_LOG` is not set.
const VERBOSE_FILTER: &str = "debug,hyper_util=info,reqwest=info";

/// Installs the global `tracing` subscriber.
///
/// `RUST_LOG` always wins; otherwise `verbose` selects between the default
/// and the debug filter. Calling it twice is harmless: the second call
/// keeps the first subscriber.
pub fn init(verbose: bool) {
    let filter = match std::env::var("RUST_LOG") {
        Ok(value) if !value.is_empty() => EnvFilter::new(value),
        _ => EnvFilter::new(default_filter(verbose)),
    };

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(verbose)
        .try_init();
}

fn default_filter(verbose: bool) -> &'static str {
    if verbose {
        VERBOSE_FILTER
    } else {
        DEFAULT_FILTER
    }
}
