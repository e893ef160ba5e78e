use env_logger::{Builder, Env};

/// Installs env_logger. `RUST_LOG` wins over `default_filter`; calling this
/// twice keeps the first logger.
pub fn init(default_filter: &str) {
    let env = Env::default().default_filter_or(default_filter);
    if Builder::from_env(env).try_init().is_err() {
        log::debug!("logger already initialised");
    }
}
