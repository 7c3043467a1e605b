use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Initialise logging. In debug builds the default level is `debug`, in
/// release builds `info`; `RUST_LOG` may override the level only when
/// debug logging is enabled. Log lines go to stderr and, when a user log
/// directory is available, to a non-blocking file writer whose guard the
/// caller must keep alive.
pub fn init(debug: bool) -> Option<tracing_appender::non_blocking::WorkerGuard> {
    let level = if debug { "debug" } else { "info" };
    let filter = if debug {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level))
    } else {
        EnvFilter::new(level)
    };

    let file_writer = log_dir().map(|dir| {
        let appender = tracing_appender::rolling::never(dir, "glasspen.log");
        tracing_appender::non_blocking(appender)
    });

    match file_writer {
        Some((non_blocking, guard)) => {
            let _ = tracing_subscriber::registry()
                .with(filter)
                .with(fmt::layer().with_writer(std::io::stderr))
                .with(
                    fmt::layer()
                        .with_writer(non_blocking)
                        .with_ansi(false),
                )
                .try_init();
            Some(guard)
        }
        None => {
            let _ = tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_writer(std::io::stderr)
                .try_init();
            None
        }
    }
}

fn log_dir() -> Option<std::path::PathBuf> {
    let dir = dirs_next::data_local_dir()?.join("glasspen").join("logs");
    std::fs::create_dir_all(&dir).ok()?;
    Some(dir)
}
