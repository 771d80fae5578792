//! Tracing setup and span constructors.

use tracing_subscriber::EnvFilter;

/// Install a fmt subscriber filtered by `RUST_LOG` (default `info`).
///
/// Returns `false` if a global subscriber was already set.
pub fn init_tracing() -> bool {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_target(true)
        .try_init()
        .is_ok()
}

/// Standardized span constructors for client observability.
pub mod spans {
    use tracing::{Span, info_span};

    use crate::network::RemoteAddress;

    /// Span for one session's read loop.
    pub fn session(address: &RemoteAddress, generation: u64) -> Span {
        info_span!("session", address = %address, secure = address.secure, generation)
    }

    /// Span for one plugin's init.
    pub fn plugin(name: &str) -> Span {
        info_span!("plugin", name = %name)
    }
}
