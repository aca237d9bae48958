use tracing_subscriber::{EnvFilter, fmt};
use tracing::info;

fn main() -> anyhow::Result<()> {
    // Init logging
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new("info"))
        .unwrap();
    fmt().with_env_filter(filter).init();

    // Startup banner at info level so something always prints at default verbosity
    let rust_log = std::env::var("RUST_LOG").unwrap_or_else(|_| "<unset>".to_string());
    let data_dir = std::env::var("CITYALERT_DATA_DIR").unwrap_or_else(|_| ".cityalert".to_string());
    info!(
        target: "cityalert",
        "cityalert starting: RUST_LOG='{}', data_dir='{}'",
        rust_log, data_dir
    );

    cityalert::cli::run(&data_dir)
}
