use std::env;
use std::net::SocketAddr;
use thiserror::Error;

/// Connection string for the PostgreSQL database holding the `todo` table
pub const DB_URL: &str = "PG_URI";
/// Socket address the HTTP server binds to. Defaults to [DEFAULT_LISTEN_ADDRESS].
pub const LISTEN_ADDRESS: &str = "LISTEN_ADDRESS";
/// Log level configuration for the application. For formatting info, see [tracing_subscriber's EnvFilter documentation](https://docs.rs/tracing-subscriber/latest/tracing_subscriber/filter/struct.EnvFilter.html)
pub const LOG_LEVEL: &str = "LOG_LEVEL";

/// OpenTelemetry span export URL. Should be http://localhost:4317 by default, as the service should
/// have an OpenTelemetry collector sidecar which directs metrics to the correct place
pub const OTEL_SPAN_EXPORT_URL: &str = "OTEL_SPAN_EXPORT_URL";
/// OpenTelemetry metrics export URL. Should be http://localhost:4317 by default, as the service should
/// have an OpenTelemetry collector sidecar which directs metrics to the correct place
pub const OTEL_METRIC_EXPORT_URL: &str = "OTEL_METRIC_EXPORT_URL";

pub const DEFAULT_LISTEN_ADDRESS: &str = "0.0.0.0:3420";

#[derive(Error, Debug, PartialEq, Eq)]
pub enum ConfigError {
    #[error("the {0} environment variable must be set")]
    Missing(&'static str),
    #[error("the {name} environment variable was invalid: {reason}")]
    Invalid { name: &'static str, reason: String },
}

/// Where to send OpenTelemetry data
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OtelEndpoints {
    pub span_url: String,
    pub metric_url: String,
}

/// Process-wide settings, resolved once at startup
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub db_url: String,
    pub listen_address: SocketAddr,
    pub otel: Option<OtelEndpoints>,
}

impl AppConfig {
    /// Reads the configuration from the process environment. Call [dotenv::dotenv] first
    /// if a `.env` file should be honored.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Builds the configuration from an arbitrary variable source
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let db_url = lookup(DB_URL)
            .filter(|url| !url.trim().is_empty())
            .ok_or(ConfigError::Missing(DB_URL))?;

        let raw_address = lookup(LISTEN_ADDRESS).unwrap_or_else(|| DEFAULT_LISTEN_ADDRESS.to_owned());
        let listen_address =
            raw_address
                .parse::<SocketAddr>()
                .map_err(|err| ConfigError::Invalid {
                    name: LISTEN_ADDRESS,
                    reason: format!("{raw_address:?} is not a socket address ({err})"),
                })?;

        let otel = match (lookup(OTEL_SPAN_EXPORT_URL), lookup(OTEL_METRIC_EXPORT_URL)) {
            (Some(span_url), Some(metric_url)) => Some(OtelEndpoints {
                span_url,
                metric_url,
            }),
            _ => None,
        };

        Ok(AppConfig {
            db_url,
            listen_address,
            otel,
        })
    }
}
