//! Diagnostic logging.
//!
//! Output goes to stderr so listings on stdout stay clean. `RUST_LOG` wins when set;
//! otherwise the level is `warn`, or `debug` for greengrow itself with `--verbose`.

use tracing_subscriber::EnvFilter;

/// Install the global subscriber. Later calls are no-ops.
pub fn init(verbose: bool) {
    let default = if verbose { "warn,greengrow=debug" } else { "warn" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .without_time()
        .try_init();
}
