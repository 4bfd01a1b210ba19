//! Programmatic configuration builder for integration tests

use std::net::SocketAddr;

use bridge_config::{Config, HealthConfig, ModelEntry, ServerConfig, UpstreamConfig};
use secrecy::SecretString;

/// Builder for constructing test configurations
pub struct ConfigBuilder {
    config: Config,
}

impl ConfigBuilder {
    /// Create a new builder pointed at a mock backend
    pub fn new(upstream_base_url: &str) -> Self {
        Self {
            config: Config {
                server: ServerConfig {
                    listen_address: Some(SocketAddr::from(([127, 0, 0, 1], 0))),
                    health: HealthConfig::default(),
                },
                upstream: UpstreamConfig {
                    base_url: upstream_base_url.parse().expect("valid URL"),
                    api_key: Some(SecretString::from("test-key")),
                    request_timeout: Some("10s".to_owned()),
                },
                ..Config::default()
            },
        }
    }

    /// Replace the advertised model listing
    pub fn with_models(mut self, ids: &[&str]) -> Self {
        self.config.models = ids.iter().map(|id| ModelEntry::new(*id)).collect();
        self
    }

    /// Disable health endpoint
    pub fn without_health(mut self) -> Self {
        self.config.server.health.enabled = false;
        self
    }

    /// Build the final config
    pub fn build(self) -> Config {
        self.config
    }
}
