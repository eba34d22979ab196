use std::path::Path;

use secrecy::ExposeSecret;

use crate::Config;
use crate::telemetry::metrics::DEFAULT_METRICS_NAMESPACE;

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
    /// Returns an error describing the first invalid setting
    pub fn validate(&self) -> anyhow::Result<()> {
        self.validate_server()?;
        self.validate_telemetry()?;
        Ok(())
    }

    /// Metric name prefix for handler telemetry
    pub fn metrics_namespace(&self) -> &str {
        self.telemetry
            .as_ref()
            .map_or(DEFAULT_METRICS_NAMESPACE, |t| t.metrics.namespace.as_str())
    }

    fn validate_server(&self) -> anyhow::Result<()> {
        let server = &self.server;

        if server.shutdown_timeout()?.is_zero() {
            anyhow::bail!("server.shutdown_timeout must be greater than 0");
        }

        if server.max_body_size == 0 {
            anyhow::bail!("server.max_body_size must be greater than 0");
        }

        if let Some(ref password) = server.admin_password
            && password.expose_secret().is_empty()
        {
            anyhow::bail!("server.admin_password must not be empty when set");
        }

        if !server.health.path.starts_with('/') {
            anyhow::bail!("server.health.path must start with '/': {}", server.health.path);
        }

        if server.health.enabled {
            if server.health.path.contains(['{', '}', '*']) {
                anyhow::bail!("server.health.path must be a literal path: {}", server.health.path);
            }

            if server.static_assets.serves(&server.health.path) {
                anyhow::bail!("server.health.path is taken by static assets: {}", server.health.path);
            }
        }

        Ok(())
    }

    fn validate_telemetry(&self) -> anyhow::Result<()> {
        let Some(ref telemetry) = self.telemetry else {
            return Ok(());
        };

        if telemetry.metrics.namespace.trim().is_empty() {
            anyhow::bail!("telemetry.metrics.namespace must not be empty");
        }

        if let Some(ref tracing) = telemetry.tracing
            && !(0.0..=1.0).contains(&tracing.sampling_rate)
        {
            anyhow::bail!(
                "telemetry.tracing.sampling_rate must be between 0.0 and 1.0, got {}",
                tracing.sampling_rate
            );
        }

        Ok(())
    }
}
