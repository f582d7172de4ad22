//! Logging utilities and structured logging support

pub use log::{debug, info, warn, error, trace};

/// Initialize the logging system from `RUST_LOG`
pub fn init() {
    env_logger::init();
}

/// Initialize the logging system with a fallback filter
///
/// `RUST_LOG` still wins when it is set; `level` is only used as the default
/// filter string (e.g. `"info"` or `"raycast_queue=debug"`).
pub fn init_with_level(level: &str) {
    let env = env_logger::Env::default().default_filter_or(level);
    // A second init (e.g. from tests) is harmless
    let _ = env_logger::Builder::from_env(env).try_init();
}
