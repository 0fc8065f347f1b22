//! Tracing subscriber setup for hosts and tests.
//!
//! # Environment Variables
//!
//! - `RUST_LOG` - Filter directives (default: `storecart=info`)
//! - `CART_LOG_JSON` - Set to `1` or `true` for JSON output

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

const DEFAULT_FILTER: &str = "storecart=info";

/// Install the global subscriber.
///
/// Returns `false` if a subscriber was already installed, which makes the
/// call safe to repeat from tests.
pub fn init_tracing() -> bool {
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| DEFAULT_FILTER.into());
    let json = json_output(std::env::var("CART_LOG_JSON").ok().as_deref());

    let installed = tracing_subscriber::registry()
        .with(env_filter)
        .with(json.then(|| tracing_subscriber::fmt::layer().json()))
        .with((!json).then(tracing_subscriber::fmt::layer))
        .try_init()
        .is_ok();

    if installed {
        tracing::debug!(json, "Tracing initialized");
    }
    installed
}

fn json_output(value: Option<&str>) -> bool {
    matches!(
        value.map(str::trim).map(str::to_ascii_lowercase).as_deref(),
        Some("1" | "true" | "yes")
    )
}
