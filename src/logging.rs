use std::io;
use std::path::{Path, PathBuf};

use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::fmt::MakeWriter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

pub const DEFAULT_FILTER: &str = "xide=info";
const LOG_FILE_PREFIX: &str = "xide.log";

pub struct LoggingGuard {
    _guard: WorkerGuard,
    log_dir: PathBuf,
}

impl LoggingGuard {
    pub fn log_dir(&self) -> &Path {
        &self.log_dir
    }
}

fn resolve_log_dir() -> Option<PathBuf> {
    xide::kernel::services::adapters::paths::ensure_log_dir()
        .or_else(|_| -> io::Result<PathBuf> {
            let dir = std::env::temp_dir().join("xide").join("logs");
            std::fs::create_dir_all(&dir)?;
            Ok(dir)
        })
        .ok()
}

/// File layer always; a plain stderr-style layer on top when `echo` is set.
fn subscriber<F, E>(
    filter: EnvFilter,
    file: F,
    echo: Option<E>,
) -> impl tracing::Subscriber + Send + Sync + 'static
where
    F: for<'a> MakeWriter<'a> + Send + Sync + 'static,
    E: for<'a> MakeWriter<'a> + Send + Sync + 'static,
{
    let file_layer = tracing_subscriber::fmt::layer()
        .with_writer(file)
        .with_ansi(false)
        .with_target(true)
        .with_file(true)
        .with_line_number(true);
    let echo_layer = echo.map(|writer| {
        tracing_subscriber::fmt::layer()
            .with_writer(writer)
            .with_ansi(false)
            .with_target(false)
            .without_time()
    });

    tracing_subscriber::registry()
        .with(filter)
        .with(file_layer)
        .with(echo_layer)
}

/// Installs the global subscriber. `None` when no log directory is usable or a
/// subscriber is already set.
pub fn init(echo_to_stderr: bool) -> Option<LoggingGuard> {
    let log_dir = resolve_log_dir()?;

    let file_appender = tracing_appender::rolling::daily(&log_dir, LOG_FILE_PREFIX);
    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));
    let echo = echo_to_stderr.then_some(io::stderr as fn() -> io::Stderr);

    if subscriber(env_filter, non_blocking, echo).try_init().is_err() {
        return None;
    }

    std::panic::set_hook(Box::new(|panic_info| {
        tracing::error!(panic = %panic_info, "panic");
    }));

    tracing::info!(log_dir = %log_dir.display(), "tracing initialized");

    Some(LoggingGuard {
        _guard: guard,
        log_dir,
    })
}
