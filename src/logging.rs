use std::path::Path;

use tracing_appender::non_blocking::WorkerGuard;
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::Config;

/// Flushes the file writer on drop; hold it for the life of the process.
pub struct FileLogGuard {
    _guard: WorkerGuard,
}

/// Daily rolling appender writing `dir/file_name.<date>`, creating `dir`.
pub fn rolling_appender(dir: &Path, file_name: &str) -> std::io::Result<RollingFileAppender> {
    std::fs::create_dir_all(dir)?;
    Ok(RollingFileAppender::new(Rotation::DAILY, dir, file_name))
}

/// Logs go to stderr so they never interleave with the practice prompts.
pub fn init_tracing(config: &Config) -> Option<FileLogGuard> {
    let env_filter =
        EnvFilter::try_new(&config.log_level).unwrap_or_else(|_| EnvFilter::new("info"));

    let (file_layer, guard) = match file_appender(config) {
        Some(appender) => {
            let (writer, guard) = tracing_appender::non_blocking(appender);
            let layer = fmt::layer()
                .with_writer(writer)
                .with_ansi(false)
                .with_target(true);
            (Some(layer), Some(FileLogGuard { _guard: guard }))
        }
        None => (None, None),
    };

    tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt::layer().with_writer(std::io::stderr).with_target(true))
        .with(file_layer)
        .init();

    guard
}

fn file_appender(config: &Config) -> Option<RollingFileAppender> {
    if !config.file_logs {
        return None;
    }
    match rolling_appender(&config.log_dir, &config.log_file) {
        Ok(appender) => Some(appender),
        Err(err) => {
            eprintln!(
                "file logging disabled, cannot create {}: {err}",
                config.log_dir.display()
            );
            None
        }
    }
}
