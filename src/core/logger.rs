/// Info by default; `RUST_LOG` takes precedence when set.
pub fn setup_logging() {
    env_logger::Builder::new()
        .filter_level(log::LevelFilter::Info)
        .parse_default_env()
        .format_timestamp_millis()
        .init();
}
