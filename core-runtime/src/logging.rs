//! # Logging
//!
//! `tracing` subscriber setup for hosts embedding the SDK.
//!
//! The SDK only emits `tracing` events; nothing is printed until the host
//! calls [`init_logging`]. Output goes to stderr so that stdout stays with the
//! host application. When a [`LoggerSink`] is configured, every event that
//! passes the filter is also mirrored to it as a [`LogEntry`], with sensitive
//! field values masked unless redaction is turned off.
//!
//! ```ignore
//! use core_runtime::logging::{init_logging, LogFormat, LoggingConfig};
//! use bridge_traits::time::ConsoleLogger;
//! use std::sync::Arc;
//!
//! let logging = LoggingConfig::for_sdk(&sdk_config)
//!     .with_format(LogFormat::Compact)
//!     .with_logger_sink(Arc::new(ConsoleLogger::default()));
//! init_logging(logging)?;
//! ```
//!
//! ## Filtering
//!
//! Without an explicit filter the `TUNE_SDK_LOG` environment variable is
//! consulted, then the configured level is applied to the SDK crates while
//! `hyper`, `h2` and `reqwest` stay at `warn`.

use crate::config::SdkConfig;
use crate::error::{Error, Result};

use bridge_traits::time::{LogEntry, LogLevel, LoggerSink};
use core_async::runtime;

use std::collections::BTreeMap;
use std::fmt;
use std::io;
use std::sync::Arc;

use tracing::field::{Field, Visit};
use tracing::{Event, Level, Subscriber};
use tracing_subscriber::fmt::format::FmtSpan;
use tracing_subscriber::{
    filter::EnvFilter,
    layer::{Context, SubscriberExt},
    registry::LookupSpan,
    util::SubscriberInitExt,
    Layer,
};

/// Environment variable holding an `EnvFilter` directive string.
pub const LOG_ENV_VAR: &str = "TUNE_SDK_LOG";

const REDACTED: &str = "[REDACTED]";

/// Crates whose events follow the configured base level.
const SDK_TARGETS: &[&str] = &[
    "tune_sdk",
    "core_runtime",
    "core_ads",
    "core_tracking",
    "bridge_desktop",
];

const NOISY_DEPENDENCIES: &[&str] = &["h2", "hyper", "hyper_util", "reqwest", "rustls"];

/// Field names whose values never reach a sink unmasked.
const SENSITIVE_FIELDS: &[&str] = &[
    "token",
    "password",
    "secret",
    "api_key",
    "conversion_key",
    "authorization",
    "phone",
    "birth_date",
    "latitude",
    "longitude",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    /// Multi-line, human-readable
    Pretty,
    /// One JSON object per event
    Json,
    /// Single line per event
    Compact,
}

impl Default for LogFormat {
    fn default() -> Self {
        if cfg!(debug_assertions) {
            Self::Pretty
        } else {
            Self::Json
        }
    }
}

#[derive(Clone)]
pub struct LoggingConfig {
    pub format: LogFormat,
    /// Base level for the SDK crates
    pub level: LogLevel,
    /// Mask sensitive field values forwarded to the logger sink
    pub redact_pii: bool,
    /// `EnvFilter` directives, e.g. `core_ads=trace,bridge_desktop=debug`
    pub filter: Option<String>,
    pub logger_sink: Option<Arc<dyn LoggerSink>>,
    /// Log span open/close in the pretty format, include spans in JSON
    pub enable_spans: bool,
    pub display_target: bool,
    pub display_thread_info: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            format: LogFormat::default(),
            level: LogLevel::Info,
            redact_pii: true,
            filter: None,
            logger_sink: None,
            enable_spans: true,
            display_target: true,
            display_thread_info: false,
        }
    }
}

impl LoggingConfig {
    /// Defaults matched to an SDK configuration: debug mode lowers the base
    /// level to `Debug`.
    pub fn for_sdk(config: &SdkConfig) -> Self {
        let level = if config.debug_mode {
            LogLevel::Debug
        } else {
            LogLevel::Info
        };
        Self::default().with_level(level)
    }

    pub fn with_format(mut self, format: LogFormat) -> Self {
        self.format = format;
        self
    }

    pub fn with_level(mut self, level: LogLevel) -> Self {
        self.level = level;
        self
    }

    pub fn with_pii_redaction(mut self, redact: bool) -> Self {
        self.redact_pii = redact;
        self
    }

    pub fn with_filter(mut self, filter: impl Into<String>) -> Self {
        self.filter = Some(filter.into());
        self
    }

    pub fn with_logger_sink(mut self, sink: Arc<dyn LoggerSink>) -> Self {
        self.logger_sink = Some(sink);
        self
    }

    pub fn with_spans(mut self, enable: bool) -> Self {
        self.enable_spans = enable;
        self
    }

    pub fn with_target(mut self, display: bool) -> Self {
        self.display_target = display;
        self
    }

    pub fn with_thread_info(mut self, display: bool) -> Self {
        self.display_thread_info = display;
        self
    }
}

impl fmt::Debug for LoggingConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LoggingConfig")
            .field("format", &self.format)
            .field("level", &self.level)
            .field("redact_pii", &self.redact_pii)
            .field("filter", &self.filter)
            .field("has_logger_sink", &self.logger_sink.is_some())
            .finish()
    }
}

/// Installs the global subscriber.
///
/// # Errors
///
/// [`Error::Config`] when the filter does not parse or a global subscriber is
/// already installed.
pub fn init_logging(config: LoggingConfig) -> Result<()> {
    let filter = build_filter(&config)?;
    let sink_layer = config
        .logger_sink
        .clone()
        .map(|sink| LoggerSinkLayer::new(sink, config.redact_pii));

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt_layer(&config))
        .with(sink_layer)
        .try_init()
        .map_err(|e| Error::Config(format!("Failed to initialize logging: {}", e)))
}

fn fmt_layer<S>(config: &LoggingConfig) -> Box<dyn Layer<S> + Send + Sync>
where
    S: Subscriber + for<'a> LookupSpan<'a>,
{
    let base = tracing_subscriber::fmt::layer()
        .with_target(config.display_target)
        .with_thread_ids(config.display_thread_info)
        .with_thread_names(config.display_thread_info)
        .with_writer(io::stderr);

    match config.format {
        LogFormat::Pretty => {
            let spans = if config.enable_spans {
                FmtSpan::NEW | FmtSpan::CLOSE
            } else {
                FmtSpan::NONE
            };
            base.pretty().with_span_events(spans).boxed()
        }
        LogFormat::Json => base
            .json()
            .flatten_event(true)
            .with_current_span(config.enable_spans)
            .with_span_list(config.enable_spans)
            .boxed(),
        LogFormat::Compact => base.compact().boxed(),
    }
}

fn build_filter(config: &LoggingConfig) -> Result<EnvFilter> {
    let directives = match &config.filter {
        Some(custom) => custom.clone(),
        None => match std::env::var(LOG_ENV_VAR) {
            Ok(from_env) if !from_env.trim().is_empty() => from_env,
            _ => default_directives(config.level),
        },
    };

    EnvFilter::try_new(&directives)
        .map_err(|e| Error::Config(format!("Invalid log filter '{}': {}", directives, e)))
}

fn default_directives(level: LogLevel) -> String {
    SDK_TARGETS
        .iter()
        .map(|target| format!("{}={}", target, level))
        .chain(NOISY_DEPENDENCIES.iter().map(|dep| format!("{}=warn", dep)))
        .collect::<Vec<_>>()
        .join(",")
}

/// Mirrors events into a host [`LoggerSink`].
struct LoggerSinkLayer {
    sink: Arc<dyn LoggerSink>,
    redact_pii: bool,
}

impl LoggerSinkLayer {
    fn new(sink: Arc<dyn LoggerSink>, redact_pii: bool) -> Self {
        Self { sink, redact_pii }
    }

    fn entry_for<S>(&self, event: &Event<'_>, ctx: &Context<'_, S>) -> Option<LogEntry>
    where
        S: Subscriber + for<'a> LookupSpan<'a>,
    {
        let metadata = event.metadata();
        let level = log_level_of(metadata.level());
        if level < self.sink.min_level() {
            return None;
        }

        let mut visitor = SinkVisitor::default();
        event.record(&mut visitor);

        let mut entry = LogEntry::new(
            level,
            metadata.target(),
            visitor.message.unwrap_or_else(|| metadata.name().to_string()),
        );
        entry.fields = if self.redact_pii {
            visitor
                .fields
                .into_iter()
                .map(|(key, value)| {
                    let value = redact_if_sensitive(&key, &value);
                    (key, value)
                })
                .collect()
        } else {
            visitor.fields
        };
        entry.span = ctx.lookup_current().map(|span| span.name().to_string());
        Some(entry)
    }
}

impl<S> Layer<S> for LoggerSinkLayer
where
    S: Subscriber + for<'a> LookupSpan<'a>,
{
    fn on_event(&self, event: &Event<'_>, ctx: Context<'_, S>) {
        let Some(entry) = self.entry_for(event, &ctx) else {
            return;
        };
        let sink = Arc::clone(&self.sink);

        // Inside a runtime the sink runs as a task; elsewhere it is driven inline.
        if let Ok(handle) = runtime::Handle::try_current() {
            handle.spawn(async move {
                if let Err(err) = sink.log(entry).await {
                    eprintln!("LoggerSink error: {}", err);
                }
            });
            return;
        }

        match runtime::block_on(async move { sink.log(entry).await }) {
            Ok(Ok(())) => {}
            Ok(Err(err)) => eprintln!("LoggerSink error: {}", err),
            Err(err) => eprintln!("LoggerSink runtime error: {}", err),
        }
    }
}

#[derive(Default)]
struct SinkVisitor {
    message: Option<String>,
    fields: BTreeMap<String, String>,
}

impl SinkVisitor {
    fn record_value(&mut self, field: &Field, value: String) {
        match field.name() {
            "message" => self.message = Some(value),
            name => {
                self.fields.insert(name.to_string(), value);
            }
        }
    }
}

impl Visit for SinkVisitor {
    fn record_str(&mut self, field: &Field, value: &str) {
        self.record_value(field, value.to_string());
    }

    fn record_debug(&mut self, field: &Field, value: &dyn fmt::Debug) {
        self.record_value(field, format!("{:?}", value));
    }
}

fn log_level_of(level: &Level) -> LogLevel {
    match *level {
        Level::TRACE => LogLevel::Trace,
        Level::DEBUG => LogLevel::Debug,
        Level::INFO => LogLevel::Info,
        Level::WARN => LogLevel::Warn,
        Level::ERROR => LogLevel::Error,
    }
}

/// Masks a field value when its name or content looks personal.
///
/// Names containing a sensitive fragment (`conversion_key`, `birth_date`,
/// `latitude`, ...) are fully masked. Email-like values keep their first
/// character only.
///
/// ```ignore
/// use core_runtime::logging::redact_if_sensitive;
///
/// tracing::debug!(conversion_key = %redact_if_sensitive("conversion_key", key), "Configured");
/// ```
pub fn redact_if_sensitive(field_name: &str, value: &str) -> String {
    let name = field_name.to_lowercase();
    if SENSITIVE_FIELDS.iter().any(|fragment| name.contains(fragment)) {
        return REDACTED.to_string();
    }

    match value.find('@') {
        Some(at) if value[at..].contains('.') => {
            let first: String = value.chars().take(1.min(at)).collect();
            format!("{}***@{}", first, REDACTED)
        }
        _ => value.to_string(),
    }
}

/// Shortens a payload for log output, keeping at most `max_chars` characters.
///
/// ```ignore
/// use core_runtime::logging::truncate_for_log;
///
/// tracing::debug!(body = %truncate_for_log(&body, 512), "Ad request body");
/// ```
pub fn truncate_for_log(value: &str, max_chars: usize) -> String {
    match value.char_indices().nth(max_chars) {
        Some((cut, _)) => format!("{}... ({} bytes)", &value[..cut], value.len()),
        None => value.to_string(),
    }
}
