//! Tracing setup for the `lemmatch` binary.
//!
//! Events go to stderr so that match output on stdout stays clean for
//! piping. `RUST_LOG` overrides the default filter.

use tracing_subscriber::EnvFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

/// Filter used when `RUST_LOG` is unset
pub fn default_filter(verbose: bool) -> &'static str {
    if verbose { "lemmatch=debug" } else { "lemmatch=info" }
}

/// Install the global subscriber.
///
/// Returns false if a subscriber was already installed, which happens when
/// the library is embedded in a host that sets up its own.
pub fn init(verbose: bool) -> bool {
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter(verbose)));

    let subscriber = tracing_subscriber::registry().with(env_filter).with(
        tracing_subscriber::fmt::layer()
            .with_writer(std::io::stderr)
            .with_target(true)
            .compact(),
    );

    if subscriber.try_init().is_err() {
        return false;
    }

    std::panic::set_hook(Box::new(|panic_info| {
        tracing::error!(panic = %panic_info, "panic");
    }));
    true
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_filter() {
        assert_eq!(default_filter(false), "lemmatch=info");
        assert_eq!(default_filter(true), "lemmatch=debug");
    }
}
