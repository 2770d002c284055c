//! Logging initialization
//!
//! Builds the tracing subscriber from configuration: env-filter level,
//! pretty or JSON output, and an optional message include-filter. When an
//! include pattern is configured, only events whose rendered message
//! matches the pattern reach the sink; everything else is dropped. A
//! deployment can set a Japanese-script character class here to keep only
//! the localized audit lines.

use regex::Regex;
use tracing::{Event, Metadata, Subscriber};
use tracing_subscriber::{
    fmt::{self, format::FmtSpan},
    layer::{Context, Filter, SubscriberExt},
    util::SubscriberInitExt,
    EnvFilter, Layer,
};

use crate::config::{LogFormat, LoggingConfig};
use crate::domain::DomainError;

/// Per-layer filter retaining only events whose message matches a pattern
pub struct MessageFilter {
    pattern: Regex,
}

impl MessageFilter {
    pub fn new(pattern: Regex) -> Self {
        Self { pattern }
    }

    /// Compile the pattern from configuration
    pub fn from_pattern(pattern: &str) -> Result<Self, DomainError> {
        let pattern = Regex::new(pattern).map_err(|e| {
            DomainError::configuration(format!("Invalid logging include pattern: {}", e))
        })?;

        Ok(Self { pattern })
    }

    fn matches(&self, message: &str) -> bool {
        self.pattern.is_match(message)
    }
}

impl<S: Subscriber> Filter<S> for MessageFilter {
    fn enabled(&self, _meta: &Metadata<'_>, _cx: &Context<'_, S>) -> bool {
        // Span enablement is unaffected; only events are filtered
        true
    }

    fn event_enabled(&self, event: &Event<'_>, _cx: &Context<'_, S>) -> bool {
        let mut visitor = MessageVisitor::default();
        event.record(&mut visitor);

        match visitor.message {
            Some(message) => self.matches(&message),
            None => false,
        }
    }
}

/// Field visitor capturing the event's message field
#[derive(Default)]
struct MessageVisitor {
    message: Option<String>,
}

impl tracing::field::Visit for MessageVisitor {
    fn record_str(&mut self, field: &tracing::field::Field, value: &str) {
        if field.name() == "message" {
            self.message = Some(value.to_string());
        }
    }

    fn record_debug(&mut self, field: &tracing::field::Field, value: &dyn std::fmt::Debug) {
        if field.name() == "message" {
            self.message = Some(format!("{:?}", value));
        }
    }
}

/// Initialize the global tracing subscriber
pub fn init_logging(config: &LoggingConfig) -> Result<(), DomainError> {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.level));

    let include = config
        .include_pattern
        .as_deref()
        .map(MessageFilter::from_pattern)
        .transpose()?;

    let registry = tracing_subscriber::registry().with(filter);

    match (&config.format, include) {
        (LogFormat::Json, Some(include)) => {
            registry
                .with(
                    fmt::layer()
                        .json()
                        .with_span_events(FmtSpan::CLOSE)
                        .with_filter(include),
                )
                .init();
        }
        (LogFormat::Json, None) => {
            registry
                .with(fmt::layer().json().with_span_events(FmtSpan::CLOSE))
                .init();
        }
        (LogFormat::Pretty, Some(include)) => {
            registry
                .with(
                    fmt::layer()
                        .pretty()
                        .with_target(true)
                        .with_span_events(FmtSpan::CLOSE)
                        .with_filter(include),
                )
                .init();
        }
        (LogFormat::Pretty, None) => {
            registry
                .with(
                    fmt::layer()
                        .pretty()
                        .with_target(true)
                        .with_span_events(FmtSpan::CLOSE),
                )
                .init();
        }
    }

    tracing::info!("Logging initialized with level: {}", config.level);
    Ok(())
}
