use std::time::Duration;

use secrecy::SecretString;
use serde::Deserialize;
use url::Url;

/// Default Generative Language API base URL
pub const DEFAULT_UPSTREAM_URL: &str = "https://generativelanguage.googleapis.com/v1beta";

/// Generation backend configuration
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct UpstreamConfig {
    /// Base URL of the backend API
    #[serde(default = "default_base_url")]
    pub base_url: Url,
    /// API key sent with every upstream request
    #[serde(default)]
    pub api_key: Option<SecretString>,
    /// Overall timeout for one upstream request (e.g. "5m")
    #[serde(default)]
    pub request_timeout: Option<String>,
}

impl Default for UpstreamConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            api_key: None,
            request_timeout: None,
        }
    }
}

impl UpstreamConfig {
    /// Parse the configured request timeout
    ///
    /// # Errors
    ///
    /// Returns an error if the value is not a valid duration string
    pub fn request_timeout(&self) -> anyhow::Result<Option<Duration>> {
        self.request_timeout
            .as_deref()
            .map(|raw| {
                duration_str::parse(raw)
                    .map_err(|e| anyhow::anyhow!("invalid upstream.request_timeout '{raw}': {e}"))
            })
            .transpose()
    }
}

fn default_base_url() -> Url {
    Url::parse(DEFAULT_UPSTREAM_URL).expect("valid default URL")
}
