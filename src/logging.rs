//! Tracing subscriber setup for binaries and demos

use tracing_subscriber::EnvFilter;

/// Install a formatting subscriber.
///
/// `RUST_LOG` takes precedence; otherwise the crate logs at `info` when
/// `verbose` is set and `warn` when it is not. Calling this more than once is
/// harmless.
pub fn init_tracing(verbose: bool) {
    let default_level = if verbose { "info" } else { "warn" };
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("doubling_experiment={default_level}")));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .try_init();
}
