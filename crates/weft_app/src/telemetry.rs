//! Tracing subscriber bootstrap.
//!
//! Applications embedding weft usually bring their own subscriber; the demo
//! binary and standalone deployments call [`TelemetryConfig::init`] once at
//! startup.

use tracing::Level;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::fmt::format::FmtSpan;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

/// Telemetry output format.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum TelemetryFormat {
    /// Human-readable colored output (default).
    #[default]
    Pretty,
    /// Compact single-line output.
    Compact,
    /// JSON structured output for log aggregation.
    Json,
}

/// Subscriber configuration.
///
/// # Example
///
/// ```
/// use tracing::Level;
/// use weft_app::telemetry::{TelemetryConfig, TelemetryFormat};
///
/// TelemetryConfig::new()
///     .with_level(Level::DEBUG)
///     .with_format(TelemetryFormat::Compact)
///     .init();
/// ```
#[derive(Debug, Clone)]
pub struct TelemetryConfig {
    level: Level,
    format: TelemetryFormat,
    env_filter: Option<String>,
    span_events: bool,
}

impl Default for TelemetryConfig {
    fn default() -> Self {
        Self {
            level: Level::INFO,
            format: TelemetryFormat::Pretty,
            env_filter: None,
            span_events: false,
        }
    }
}

impl TelemetryConfig {
    /// Default settings: INFO level, pretty format.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the maximum log level.
    #[must_use]
    pub fn with_level(mut self, level: Level) -> Self {
        self.level = level;
        self
    }

    /// Sets the output format.
    #[must_use]
    pub fn with_format(mut self, format: TelemetryFormat) -> Self {
        self.format = format;
        self
    }

    /// Sets a target-specific filter string, e.g. `"weft=debug,hyper=warn"`.
    /// An unparsable filter falls back to the configured level.
    #[must_use]
    pub fn with_env_filter(mut self, filter: impl Into<String>) -> Self {
        self.env_filter = Some(filter.into());
        self
    }

    /// Enables span enter/exit events in output.
    #[must_use]
    pub fn with_span_events(mut self, enabled: bool) -> Self {
        self.span_events = enabled;
        self
    }

    /// Installs the global subscriber. A subscriber installed earlier wins;
    /// the call is then a no-op.
    pub fn init(&self) {
        let env_filter = match &self.env_filter {
            Some(filter) => {
                EnvFilter::try_new(filter).unwrap_or_else(|_| EnvFilter::new(self.level.as_str()))
            }
            None => EnvFilter::new(self.level.as_str()),
        };
        let span_events = if self.span_events {
            FmtSpan::ENTER | FmtSpan::EXIT
        } else {
            FmtSpan::NONE
        };

        match self.format {
            TelemetryFormat::Pretty => {
                tracing_subscriber::registry()
                    .with(env_filter)
                    .with(
                        tracing_subscriber::fmt::layer()
                            .pretty()
                            .with_span_events(span_events),
                    )
                    .try_init()
                    .ok();
            }
            TelemetryFormat::Compact => {
                tracing_subscriber::registry()
                    .with(env_filter)
                    .with(
                        tracing_subscriber::fmt::layer()
                            .compact()
                            .with_span_events(span_events),
                    )
                    .try_init()
                    .ok();
            }
            TelemetryFormat::Json => {
                tracing_subscriber::registry()
                    .with(env_filter)
                    .with(
                        tracing_subscriber::fmt::layer()
                            .json()
                            .with_span_events(span_events),
                    )
                    .try_init()
                    .ok();
            }
        }

        tracing::debug!(level = %self.level, format = ?self.format, "telemetry initialized");
    }
}
