//! Log output for the `checkpointer` binary.

use tracing_subscriber::EnvFilter;

/// Install a stderr subscriber.
///
/// `RUST_LOG` takes precedence; otherwise `verbose` selects `debug` for this
/// crate and the default is `info`.
pub fn init_logging(verbose: bool) {
    let default_directive = if verbose {
        "checkpointer=debug"
    } else {
        "checkpointer=info"
    };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_directive));

    // A second init (e.g. from tests) keeps the first subscriber.
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}
