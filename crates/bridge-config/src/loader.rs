use std::collections::HashSet;
use std::path::Path;

use crate::Config;

impl Config {
    /// Load configuration from a TOML file
    ///
    /// Reads the file, expands `{{ env.VAR }}` placeholders, then
    /// deserializes and validates the result.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read, environment variable
    /// expansion fails, TOML parsing fails, or validation fails
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let raw = std::fs::read_to_string(path)
            .map_err(|e| anyhow::anyhow!("failed to read config file {}: {e}", path.display()))?;

        Self::from_toml(&raw)
    }

    /// Parse and validate configuration from TOML text
    ///
    /// # Errors
    ///
    /// Returns an error if expansion, parsing, or validation fails
    pub fn from_toml(raw: &str) -> anyhow::Result<Self> {
        let expanded =
            crate::env::expand_env(raw).map_err(|e| anyhow::anyhow!("config variable expansion failed: {e}"))?;

        let config: Self = toml::from_str(&expanded).map_err(|e| anyhow::anyhow!("failed to parse config: {e}"))?;

        config.validate()?;

        Ok(config)
    }

    /// Validate that the configuration is internally consistent
    ///
    /// # Errors
    ///
    /// Returns an error if the upstream or model listing is unusable
    pub fn validate(&self) -> anyhow::Result<()> {
        self.validate_upstream()?;
        self.validate_models()?;
        Ok(())
    }

    fn validate_upstream(&self) -> anyhow::Result<()> {
        let scheme = self.upstream.base_url.scheme();
        if scheme != "http" && scheme != "https" {
            anyhow::bail!("upstream.base_url must use http or https, got '{scheme}'");
        }

        self.upstream.request_timeout()?;

        Ok(())
    }

    fn validate_models(&self) -> anyhow::Result<()> {
        let mut seen = HashSet::new();

        for model in &self.models {
            if model.id.trim().is_empty() {
                anyhow::bail!("model ids must not be empty");
            }
            if !seen.insert(model.id.as_str()) {
                anyhow::bail!("model '{}' is listed more than once", model.id);
            }
        }

        Ok(())
    }
}
