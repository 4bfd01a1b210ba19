#![allow(clippy::must_use_candidate)]

mod env;
pub mod health;
mod loader;
pub mod models;
pub mod server;
pub mod telemetry;
pub mod upstream;

use serde::Deserialize;

pub use health::*;
pub use models::*;
pub use server::*;
pub use telemetry::{LogFormat, LogsConfig, TelemetryConfig};
pub use upstream::*;

/// Top-level bridge configuration
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    /// Log request bodies and per-event detail
    #[serde(default)]
    pub debug: bool,
    /// Server configuration
    #[serde(default)]
    pub server: ServerConfig,
    /// Generation backend the bridge drives
    #[serde(default)]
    pub upstream: UpstreamConfig,
    /// Static model listing served at `GET /models`
    #[serde(default = "models::default_models")]
    pub models: Vec<ModelEntry>,
    /// Telemetry configuration
    #[serde(default)]
    pub telemetry: Option<TelemetryConfig>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            debug: false,
            server: ServerConfig::default(),
            upstream: UpstreamConfig::default(),
            models: models::default_models(),
            telemetry: None,
        }
    }
}
