use std::path::Path;

use tracing_appender::non_blocking::WorkerGuard;
use tracing_appender::rolling::RollingFileAppender;
use tracing_appender::rolling::Rotation;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::Layer;
use tracing_subscriber::Registry;
use tracing_subscriber::fmt::MakeWriter;
use tracing_subscriber::prelude::*;

use super::filter::DebugOnlyFilter;
use super::filter::ErrorWarnFilter;
#[cfg(feature = "dev")]
use super::filter::InfoOnlyFilter;
use super::format::AddressGraphFormat;
use crate::Result;
use crate::config::LoggingConfig;
use crate::err_with_loc;

type BoxedLayer = Box<dyn Layer<Registry> + Send + Sync>;

/// Keeps the non-blocking file writers alive; drop it only on shutdown.
#[must_use]
pub struct TracingGuard {
    _guards: Vec<WorkerGuard>,
}

// Production terminal output is one JSON object per event for log shippers
#[cfg(all(feature = "prod", not(feature = "dev")))]
fn terminal_layer<W>(
    _format: AddressGraphFormat,
    filter: EnvFilter,
    writer: W,
) -> BoxedLayer
where
    W: for<'writer> MakeWriter<'writer> + Send + Sync + 'static,
{
    tracing_subscriber::fmt::layer()
        .json()
        .with_file(true)
        .with_line_number(true)
        .with_writer(writer)
        .with_filter(filter)
        .boxed()
}

#[cfg(not(all(feature = "prod", not(feature = "dev"))))]
fn terminal_layer<W>(
    format: AddressGraphFormat,
    filter: EnvFilter,
    writer: W,
) -> BoxedLayer
where
    W: for<'writer> MakeWriter<'writer> + Send + Sync + 'static,
{
    tracing_subscriber::fmt::layer()
        .with_ansi(true)
        .with_writer(writer)
        .event_format(format)
        .with_filter(filter)
        .boxed()
}

/// Terminal output filtered by `RUST_LOG` (default `info`), plus daily rolling
/// files under `logging.directory` when it is set.
pub fn setup_tracing(
    engine_name: &str,
    logging: &LoggingConfig,
) -> Result<TracingGuard> {
    let format = AddressGraphFormat::new(engine_name);
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    let mut layers: Vec<BoxedLayer> = vec![terminal_layer(format.clone(), env_filter, std::io::stdout)];
    let mut guards = Vec::new();

    if let Some(directory) = logging.directory.as_deref() {
        let base_logs_dir = Path::new(directory);
        for dir in [base_logs_dir.to_path_buf(), base_logs_dir.join("debug"), base_logs_dir.join("error")] {
            std::fs::create_dir_all(&dir)
                .map_err(|e| err_with_loc!(format!("failed to create logs directory {}: {}", dir.display(), e)))?;
        }

        let file_name = format!("{}.log", engine_name);

        let debug_appender = RollingFileAppender::new(Rotation::DAILY, base_logs_dir.join("debug"), &file_name);
        let (non_blocking_debug, debug_guard) = tracing_appender::non_blocking(debug_appender);
        layers.push(
            tracing_subscriber::fmt::layer()
                .with_ansi(false)
                .with_writer(non_blocking_debug)
                .event_format(format.clone())
                .with_filter(DebugOnlyFilter)
                .boxed(),
        );
        guards.push(debug_guard);

        let error_appender = RollingFileAppender::new(Rotation::DAILY, base_logs_dir.join("error"), &file_name);
        let (non_blocking_error, error_guard) = tracing_appender::non_blocking(error_appender);
        layers.push(
            tracing_subscriber::fmt::layer()
                .with_ansi(false)
                .with_writer(non_blocking_error)
                .event_format(format.clone())
                .with_filter(ErrorWarnFilter)
                .boxed(),
        );
        guards.push(error_guard);

        #[cfg(feature = "dev")]
        {
            let info_appender = RollingFileAppender::new(Rotation::DAILY, base_logs_dir, &file_name);
            let (non_blocking_info, info_guard) = tracing_appender::non_blocking(info_appender);
            layers.push(
                tracing_subscriber::fmt::layer()
                    .with_ansi(false)
                    .with_writer(non_blocking_info)
                    .event_format(format.clone())
                    .with_filter(InfoOnlyFilter)
                    .boxed(),
            );
            guards.push(info_guard);
        }
    }

    tracing_subscriber::registry()
        .with(layers)
        .try_init()
        .map_err(|e| err_with_loc!(format!("failed to install tracing subscriber: {}", e)))?;

    match logging.directory.as_deref() {
        Some(directory) => {
            tracing::info!("{}_logging_started::directory::{}", engine_name, directory);
        },
        None => tracing::info!("{}_logging_started::terminal_only", engine_name),
    }

    Ok(TracingGuard { _guards: guards })
}
