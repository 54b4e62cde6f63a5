//! Tracing subscriber setup for the binary.

use tracing_subscriber::EnvFilter;

/// Default filter when `RUST_LOG` is unset.
const DEFAULT_FILTER: &str = "food_expiry=info";

/// Install a stderr `fmt` subscriber.
///
/// `RUST_LOG` wins over `verbose`. Calling this twice is harmless; the second
/// call keeps the first subscriber.
pub fn init(verbose: bool) {
    let fallback = if verbose {
        "food_expiry=debug"
    } else {
        DEFAULT_FILTER
    };
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(fallback)),
        )
        .with_writer(std::io::stderr)
        .try_init();
}
