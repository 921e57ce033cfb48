//! Logging setup for hosts of the coretypes binding
//!
//! Everything in this crate and in the native core logs through `tracing`.
//! Hosts that already install a subscriber need nothing from this module;
//! the rest can describe what they want with a `LogConfig`.

use std::path::Path;

use once_cell::sync::{Lazy, OnceCell};
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use tracing::Level;
use tracing_appender::non_blocking::{NonBlocking, WorkerGuard};
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::{
    fmt::{self, format::FmtSpan},
    layer::SubscriberExt,
    util::SubscriberInitExt,
    EnvFilter, Layer, Registry,
};

/// Log output format
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    /// Multi-line, human-readable
    Pretty,
    #[default]
    Compact,
    /// One JSON object per event
    Json,
}

/// Log output destination
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LogOutput {
    Stdout,
    Stderr,
    /// Daily rolling file `<directory>/<prefix>.<date>`
    File { directory: String, prefix: String },
}

/// Logging configuration
#[derive(Debug, Clone)]
pub struct LogConfig {
    pub level: Level,
    pub format: LogFormat,
    pub output: LogOutput,
    /// Emit span open/close events
    pub span_events: bool,
    /// Extra filter directives, e.g. "coretypes=debug,objects=trace"
    pub filter: Option<String>,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: Level::INFO,
            format: LogFormat::Compact,
            output: LogOutput::Stderr,
            span_events: false,
            filter: None,
        }
    }
}

impl LogConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_level(mut self, level: Level) -> Self {
        self.level = level;
        self
    }

    pub fn with_format(mut self, format: LogFormat) -> Self {
        self.format = format;
        self
    }

    pub fn with_output(mut self, output: LogOutput) -> Self {
        self.output = output;
        self
    }

    pub fn with_span_events(mut self, enabled: bool) -> Self {
        self.span_events = enabled;
        self
    }

    pub fn with_filter(mut self, filter: impl Into<String>) -> Self {
        self.filter = Some(filter.into());
        self
    }
}

static INSTALLED: OnceCell<LogFormat> = OnceCell::new();

static GLOBAL_GUARD: Lazy<Mutex<Option<WorkerGuard>>> = Lazy::new(|| Mutex::new(None));

/// Install the global subscriber described by `config`
///
/// Returns the guard of the background writer; keep it alive until the
/// program exits so buffered events are flushed. Only the first call
/// installs anything: later calls, and calls made after another subscriber
/// was set, return `None`.
pub fn init_logging(config: LogConfig) -> Option<WorkerGuard> {
    if INSTALLED.get().is_some() {
        return None;
    }

    let (writer, guard) = make_writer(&config.output);
    let span_events = span_events_config(config.span_events);
    let layer: Box<dyn Layer<Registry> + Send + Sync> = match config.format {
        LogFormat::Pretty => fmt::layer()
            .with_writer(writer)
            .pretty()
            .with_span_events(span_events)
            .boxed(),
        LogFormat::Compact => fmt::layer()
            .with_writer(writer)
            .compact()
            .with_span_events(span_events)
            .boxed(),
        LogFormat::Json => fmt::layer()
            .with_writer(writer)
            .json()
            .with_span_events(span_events)
            .boxed(),
    };

    let filter = build_filter(&config);
    tracing_subscriber::registry()
        .with(layer.with_filter(filter))
        .try_init()
        .ok()?;

    let _ = INSTALLED.set(config.format);
    tracing::debug!(format = ?config.format, "logging initialized");
    Some(guard)
}

/// Like `init_logging`, but keeps the guard in a process-wide slot
///
/// Returns whether a subscriber was installed. Call `flush_logging` before
/// exiting to drain the writer.
pub fn init_global_logging(config: LogConfig) -> bool {
    match init_logging(config) {
        Some(guard) => {
            *GLOBAL_GUARD.lock() = Some(guard);
            true
        }
        None => false,
    }
}

/// Drop the guard kept by `init_global_logging`, flushing pending events
pub fn flush_logging() {
    drop(GLOBAL_GUARD.lock().take());
}

/// Whether this module installed the global subscriber
pub fn is_initialized() -> bool {
    INSTALLED.get().is_some()
}

fn make_writer(output: &LogOutput) -> (NonBlocking, WorkerGuard) {
    match output {
        LogOutput::Stdout => tracing_appender::non_blocking(std::io::stdout()),
        LogOutput::Stderr => tracing_appender::non_blocking(std::io::stderr()),
        LogOutput::File { directory, prefix } => {
            let appender = RollingFileAppender::builder()
                .rotation(Rotation::DAILY)
                .filename_prefix(prefix)
                .build(directory);
            match appender {
                Ok(appender) => tracing_appender::non_blocking(appender),
                Err(err) => {
                    eprintln!("coretypes: cannot open log directory {}: {}", directory, err);
                    tracing_appender::non_blocking(std::io::stderr())
                }
            }
        }
    }
}

fn build_filter(config: &LogConfig) -> EnvFilter {
    let base = EnvFilter::builder()
        .with_default_directive(config.level.into())
        .from_env_lossy();

    match &config.filter {
        Some(directives) => directives
            .split(',')
            .map(str::trim)
            .filter(|d| !d.is_empty())
            .fold(base, |filter, directive| match directive.parse() {
                Ok(directive) => filter.add_directive(directive),
                Err(_) => {
                    eprintln!("coretypes: ignoring invalid filter directive '{}'", directive);
                    filter
                }
            }),
        None => base,
    }
}

fn span_events_config(enabled: bool) -> FmtSpan {
    if enabled {
        FmtSpan::NEW | FmtSpan::CLOSE
    } else {
        FmtSpan::NONE
    }
}

/// Verbose stderr logging for development
pub fn init_dev_logging() -> Option<WorkerGuard> {
    init_logging(
        LogConfig::new()
            .with_level(Level::DEBUG)
            .with_format(LogFormat::Pretty)
            .with_span_events(true)
            .with_filter("coretypes=debug,coretypes_runtime=debug"),
    )
}

/// JSON logging to daily files under `log_dir`
pub fn init_prod_logging(log_dir: impl AsRef<Path>) -> Option<WorkerGuard> {
    init_logging(
        LogConfig::new()
            .with_format(LogFormat::Json)
            .with_output(LogOutput::File {
                directory: log_dir.as_ref().to_string_lossy().into_owned(),
                prefix: "coretypes".to_string(),
            }),
    )
}
