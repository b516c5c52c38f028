//! Log subscriber setup for binaries and display layers embedding the crate.

use tracing_subscriber::EnvFilter;

/// Libraries whose debug output drowns out pipeline events.
pub const NOISY_MODULES: &[&str] = &["calamine", "polars"];

/// `RUST_LOG` when set, otherwise `default_directive` with noisy modules
/// capped at `warn`.
pub fn build_filter(default_directive: &str) -> EnvFilter {
    if let Ok(filter) = EnvFilter::try_from_default_env() {
        return filter;
    }
    let mut directives = String::from(default_directive);
    for module in NOISY_MODULES {
        directives.push_str(&format!(",{module}=warn"));
    }
    EnvFilter::new(directives)
}

/// Install a global fmt subscriber writing to stderr.
///
/// Returns `false` when a global subscriber is already installed.
pub fn init_tracing(default_directive: &str) -> bool {
    tracing_subscriber::fmt()
        .with_env_filter(build_filter(default_directive))
        .with_target(true)
        .with_writer(std::io::stderr)
        .try_init()
        .is_ok()
}
