use serde::Deserialize;

use super::exporters::ExporterConfig;

/// Prefix of every admin metric name unless configured otherwise
pub const DEFAULT_METRICS_NAMESPACE: &str = "conduit.admin";

/// Metrics configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct MetricsConfig {
    /// Prefix prepended to every handler metric (`<namespace>.<handler>.requests`)
    #[serde(default = "default_namespace")]
    pub namespace: String,
    /// Override the default exporter for metrics
    #[serde(default)]
    pub exporter: Option<ExporterConfig>,
}

impl Default for MetricsConfig {
    fn default() -> Self {
        Self {
            namespace: default_namespace(),
            exporter: None,
        }
    }
}

fn default_namespace() -> String {
    DEFAULT_METRICS_NAMESPACE.to_string()
}
