use serde::Deserialize;

/// Log output configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LogConfig {
    /// `EnvFilter` directive (e.g. `info`, `conduit_admin=debug`)
    #[serde(default = "default_filter")]
    pub filter: String,
    #[serde(default)]
    pub format: LogFormat,
    #[serde(default)]
    pub redaction: RedactionPolicy,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            filter: default_filter(),
            format: LogFormat::default(),
            redaction: RedactionPolicy::default(),
        }
    }
}

/// Structure of emitted log lines
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LogFormat {
    /// Human-readable single line per event
    #[default]
    Text,
    /// One JSON object per event
    Json,
}

/// What error detail reaches the logs
///
/// Only affects log output; response bodies always carry the full detail.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RedactionPolicy {
    /// Log error detail verbatim
    #[default]
    None,
    /// Replace error detail with a placeholder
    Detail,
}

fn default_filter() -> String {
    "info".to_string()
}
