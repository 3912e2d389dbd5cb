//! Console and file logging, plus a small timer for pipeline stages.

use anyhow::Result;
use std::path::Path;
use std::time::Instant;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

pub const LOG_FILE_NAME: &str = "app.log";

/// Installs the global subscriber. Lines go to stdout and to
/// `<log_dir>/app.log`; the returned guard flushes the file on drop and must
/// outlive every log call.
pub fn init(log_dir: &Path, default_level: &str) -> Result<WorkerGuard> {
    std::fs::create_dir_all(log_dir)?;
    let file_appender = tracing_appender::rolling::never(log_dir, LOG_FILE_NAME);
    let (file_writer, guard) = tracing_appender::non_blocking(file_appender);

    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(default_level))
        .unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer())
        .with(fmt::layer().with_ansi(false).with_writer(file_writer))
        .try_init()
        .map_err(|e| anyhow::anyhow!("failed to install logger: {}", e))?;

    Ok(guard)
}

/// Logs when an operation starts and how it ended.
#[derive(Debug)]
pub struct OpTimer {
    operation: &'static str,
    start: Instant,
}

impl OpTimer {
    #[must_use]
    pub fn new(operation: &'static str) -> Self {
        tracing::info!(stage = operation, "Stage started");
        Self {
            operation,
            start: Instant::now(),
        }
    }

    pub fn finish_with_result<T, E>(self, result: std::result::Result<&T, &E>)
    where
        T: std::fmt::Debug,
        E: std::fmt::Display,
    {
        let duration_ms = self.start.elapsed().as_millis() as u64;

        match result {
            Ok(value) => {
                tracing::info!(
                    stage = self.operation,
                    duration_ms,
                    result = ?value,
                    "Stage completed"
                );
            }
            Err(e) => {
                tracing::error!(
                    stage = self.operation,
                    duration_ms,
                    error = %e,
                    "Stage failed"
                );
            }
        }
    }
}
