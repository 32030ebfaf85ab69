use tracing_subscriber::fmt;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Registry};

/// `RUST_LOG` wins over the directive derived from flags and config.
fn env_filter(verbose: bool, level: Option<&str>) -> EnvFilter {
    EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directive(verbose, level)))
}

fn default_directive(verbose: bool, level: Option<&str>) -> String {
    match (verbose, level) {
        (true, _) => "companion_cart=debug,info".to_string(),
        (false, Some(level)) => format!("companion_cart={}", level),
        (false, None) => "companion_cart=info".to_string(),
    }
}

fn fmt_layer() -> fmt::Layer<Registry> {
    fmt::layer()
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .with_line_number(false)
}

pub fn init_cli_logger(verbose: bool) {
    tracing_subscriber::registry()
        .with(fmt_layer().compact())
        .with(env_filter(verbose, None))
        .init();
}

/// JSON 格式輸出，方便集中式日誌收集
pub fn init_json_logger(verbose: bool, level: Option<&str>) {
    tracing_subscriber::registry()
        .with(fmt_layer().json())
        .with(env_filter(verbose, level))
        .init();
}
