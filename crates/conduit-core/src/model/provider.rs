use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Credentials and options for a built-in provider
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Setting {
    pub id: String,
    pub created_at: i64,
    pub updated_at: i64,
    /// Provider identifier (e.g. `openai`, `anthropic`)
    pub provider: String,
    pub name: String,
    /// Provider-specific values such as `apikey` or `resourceName`
    pub setting: BTreeMap<String, String>,
    pub allowed_models: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct UpdateSetting {
    pub name: Option<String>,
    pub setting: Option<BTreeMap<String, String>>,
    pub allowed_models: Option<Vec<String>>,
}

/// How to proxy one path of a custom provider
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RouteConfig {
    pub path: String,
    pub target_url: String,
    /// JSON path of the model name in the request body
    pub model_location: String,
    pub prompt_location: String,
    pub completion_location: String,
    pub stream_location: String,
}

/// Admin-defined upstream that is not one of the built-in providers
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CustomProvider {
    pub id: String,
    pub created_at: i64,
    pub updated_at: i64,
    pub provider: String,
    pub route_configs: Vec<RouteConfig>,
    pub authentication_param: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct UpdateCustomProvider {
    pub route_configs: Option<Vec<RouteConfig>>,
    pub authentication_param: Option<String>,
}
