use tracing_subscriber::{fmt, EnvFilter};

/// Default filter when `RUST_LOG` is unset
pub const DEFAULT_DIRECTIVE: &str = "todoboard_core=info";

/// Installs a formatted tracing subscriber for hosts that have none.
///
/// `RUST_LOG` takes precedence over `directive`. Returns `false` when a global
/// subscriber was already installed, which is not treated as an error.
pub fn init(directive: &str) -> bool {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(directive));

    fmt().with_env_filter(filter).with_target(true).try_init().is_ok()
}
