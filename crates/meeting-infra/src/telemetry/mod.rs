//! Tracing initialization
//!
//! The filter comes from `RUST_LOG` when set, otherwise from the configured
//! default directives.

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

const DEFAULT_FILTER: &str = "info,meeting_api=debug,meeting_storage=debug,tower_http=debug";

#[derive(Clone, Debug)]
pub struct TelemetryConfig {
    pub service_name: String,
    pub environment: String,
    /// Emit JSON lines instead of human-readable text
    pub json: bool,
    pub default_filter: String,
}

impl TelemetryConfig {
    pub fn new(service_name: impl Into<String>, environment: impl Into<String>, json: bool) -> Self {
        Self {
            service_name: service_name.into(),
            environment: environment.into(),
            json,
            default_filter: DEFAULT_FILTER.to_string(),
        }
    }
}

/// Install the global tracing subscriber
pub fn init_telemetry(config: &TelemetryConfig) -> Result<(), Box<dyn std::error::Error>> {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.default_filter));

    let registry = tracing_subscriber::registry().with(filter);

    if config.json {
        registry
            .with(tracing_subscriber::fmt::layer().json().with_current_span(true))
            .try_init()?;
    } else {
        registry.with(tracing_subscriber::fmt::layer()).try_init()?;
    }

    tracing::info!(
        service = %config.service_name,
        environment = %config.environment,
        json = config.json,
        "Tracing initialized"
    );
    Ok(())
}

pub async fn shutdown_telemetry() {
    tracing::debug!("Telemetry shutdown");
}
