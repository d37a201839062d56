//! Tracing subscriber initialization with structured logging and optional
//! OpenTelemetry trace export.
//!
//! # Usage
//!
//! ```no_run
//! use tutorhub_types::config::LoggingConfig;
//!
//! // Pretty logs at the configured level
//! tutorhub_observe::tracing_setup::init_tracing(&LoggingConfig::default(), 0, false).unwrap();
//! ```

use opentelemetry::trace::TracerProvider as _;
use opentelemetry_sdk::trace::SdkTracerProvider;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::Layer;
use tracing_subscriber::fmt::format::FmtSpan;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tutorhub_types::config::{LogFormat, LoggingConfig};

use std::sync::OnceLock;

/// Stores the OTel tracer provider so it can be shut down cleanly on exit.
static TRACER_PROVIDER: OnceLock<SdkTracerProvider> = OnceLock::new();

/// Filter directive used when `RUST_LOG` is not set.
///
/// Each `-v` raises the level one step above the configured default.
pub fn filter_directive(level: &str, verbosity: u8, quiet: bool) -> String {
    match verbosity {
        0 if quiet => "error".to_string(),
        0 => level.to_string(),
        1 => "info,tutorhub=debug,tower_http=debug".to_string(),
        _ => "trace".to_string(),
    }
}

/// Initialize the global tracing subscriber.
///
/// - Installs a `fmt` layer, human-readable or one JSON object per line
///   depending on `config.format`.
/// - `RUST_LOG` wins over the configured level and `-v` flags.
/// - When `config.otel` is set, spans are also bridged to OpenTelemetry
///   with a stdout exporter.
///
/// # Errors
///
/// Returns an error if the global subscriber has already been set.
pub fn init_tracing(
    config: &LoggingConfig,
    verbosity: u8,
    quiet: bool,
) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(filter_directive(&config.level, verbosity, quiet)));

    let fmt_layer = match config.format {
        LogFormat::Json => tracing_subscriber::fmt::layer()
            .json()
            .with_target(true)
            .with_span_events(FmtSpan::CLOSE)
            .boxed(),
        LogFormat::Pretty => tracing_subscriber::fmt::layer()
            .with_target(false)
            .boxed(),
    };

    let otel_layer = config.otel.then(|| {
        let provider = SdkTracerProvider::builder()
            .with_simple_exporter(opentelemetry_stdout::SpanExporter::default())
            .build();
        let tracer = provider.tracer("tutorhub");

        let _ = TRACER_PROVIDER.set(provider.clone());
        opentelemetry::global::set_tracer_provider(provider);

        tracing_opentelemetry::layer().with_tracer(tracer)
    });

    tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt_layer)
        .with(otel_layer)
        .try_init()?;

    Ok(())
}

/// Flush pending traces and shut down the OpenTelemetry tracer provider.
///
/// Safe to call even when OTel was not enabled (no-op in that case).
pub fn shutdown_tracing() {
    if let Some(provider) = TRACER_PROVIDER.get() {
        if let Err(e) = provider.shutdown() {
            eprintln!("Warning: OTel tracer provider shutdown error: {e}");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_filter_directive_follows_verbosity() {
        assert_eq!(filter_directive("warn", 0, false), "warn");
        assert_eq!(filter_directive("warn", 0, true), "error");
        assert!(filter_directive("warn", 1, false).contains("tutorhub=debug"));
        assert_eq!(filter_directive("warn", 3, true), "trace");
    }

    #[test]
    fn test_shutdown_without_otel_is_noop() {
        shutdown_tracing();
    }
}
