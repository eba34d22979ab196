use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// One attempt in a route's fallback chain
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Step {
    pub provider: String,
    pub model: String,
    pub retries: u32,
    pub params: BTreeMap<String, serde_json::Value>,
    /// Duration string (e.g. `30s`)
    pub timeout: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CacheConfig {
    pub enabled: bool,
    /// Duration string (e.g. `1h`)
    pub ttl: String,
}

/// Custom route exposed by the data plane
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Route {
    pub id: String,
    pub created_at: i64,
    pub updated_at: i64,
    pub name: String,
    pub path: String,
    pub steps: Vec<Step>,
    pub key_ids: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cache_config: Option<CacheConfig>,
}
