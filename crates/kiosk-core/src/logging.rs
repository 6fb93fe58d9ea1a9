use once_cell::sync::OnceCell;
use tracing_subscriber::{
    fmt,
    layer::{Layer, SubscriberExt},
    util::SubscriberInitExt,
    EnvFilter,
};

/// Directory for an optional rolling log file next to the stderr output.
pub const LOG_DIR_ENV: &str = "KIOSK_LOG_DIR";

static FILE_GUARD: OnceCell<tracing_appender::non_blocking::WorkerGuard> = OnceCell::new();

/// Install the process-wide subscriber. Console output goes to stderr so it
/// never lands between a prompt and its answer on stdout. `RUST_LOG`
/// overrides the default `warn` filter. Calling twice is harmless.
pub fn init(app: &str) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    let console_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_filter(filter);
    let registry = tracing_subscriber::registry().with(console_layer);

    match std::env::var(LOG_DIR_ENV) {
        Ok(dir) if !dir.trim().is_empty() => {
            if std::fs::create_dir_all(&dir).is_err() {
                eprintln!("failed to create log directory {dir}");
            }
            let writer = tracing_appender::rolling::daily(&dir, app);
            let (nb, guard) = tracing_appender::non_blocking(writer);
            let _ = FILE_GUARD.set(guard);
            let file_filter =
                EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
            let file_layer = fmt::layer()
                .with_ansi(false)
                .with_writer(nb)
                .with_filter(file_filter);
            let _ = registry.with(file_layer).try_init();
        }
        _ => {
            let _ = registry.try_init();
        }
    }
}
