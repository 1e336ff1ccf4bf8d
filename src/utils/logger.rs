use env_logger::Env;

/// Info by default, `RUST_LOG` overrides.
pub fn setup_logger() {
    env_logger::Builder::from_env(Env::default().default_filter_or("info"))
        .format_timestamp_millis()
        .init();
}
