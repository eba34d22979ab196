use serde::{Deserialize, Serialize};

/// Window unit for rate and cost limits
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TimeUnit {
    #[serde(rename = "m")]
    Minute,
    #[serde(rename = "h")]
    Hour,
    #[serde(rename = "d")]
    Day,
    #[serde(rename = "mo")]
    Month,
}

/// Spend and request limits shared by keys and users
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct KeyLimits {
    pub cost_limit_in_usd: f64,
    pub cost_limit_in_usd_over_time: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cost_limit_in_usd_unit: Option<TimeUnit>,
    pub rate_limit_over_time: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rate_limit_unit: Option<TimeUnit>,
    /// Lifetime of the key as a duration string (e.g. `30d`); empty means no expiry
    pub ttl: String,
}

/// Path and method a key is allowed to call
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PathConfig {
    pub path: String,
    pub method: String,
}

/// Body of a key creation request
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RequestKey {
    pub name: String,
    pub key: String,
    pub tags: Vec<String>,
    pub setting_ids: Vec<String>,
    pub allowed_paths: Vec<PathConfig>,
    pub policy_id: String,
    pub should_log_request: bool,
    pub should_log_response: bool,
    pub rotation_enabled: bool,
    #[serde(flatten)]
    pub limits: KeyLimits,
}

/// Key as returned to admin clients; never contains the secret
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ResponseKey {
    pub key_id: String,
    pub name: String,
    pub created_at: i64,
    pub updated_at: i64,
    pub tags: Vec<String>,
    pub revoked: bool,
    pub revoked_reason: String,
    pub setting_ids: Vec<String>,
    pub allowed_paths: Vec<PathConfig>,
    pub policy_id: String,
    pub should_log_request: bool,
    pub should_log_response: bool,
    pub rotation_enabled: bool,
    #[serde(flatten)]
    pub limits: KeyLimits,
}

/// Partial key update; absent fields are left unchanged
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct UpdateKey {
    pub name: Option<String>,
    pub tags: Option<Vec<String>>,
    pub revoked: Option<bool>,
    pub revoked_reason: Option<String>,
    pub setting_ids: Option<Vec<String>>,
    pub allowed_paths: Option<Vec<PathConfig>>,
    pub policy_id: Option<String>,
    pub should_log_request: Option<bool>,
    pub should_log_response: Option<bool>,
    pub rotation_enabled: Option<bool>,
    pub cost_limit_in_usd: Option<f64>,
    pub cost_limit_in_usd_over_time: Option<f64>,
    pub cost_limit_in_usd_unit: Option<TimeUnit>,
    pub rate_limit_over_time: Option<i64>,
    pub rate_limit_unit: Option<TimeUnit>,
}

/// Structured key listing filter
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct KeyRequest {
    pub tags: Vec<String>,
    pub key_ids: Vec<String>,
    pub revoked: Option<bool>,
    pub limit: i64,
    pub offset: i64,
    pub name: String,
    /// `asc` or `desc` by creation time
    pub order: String,
    pub return_count: bool,
}

/// Page of keys with an optional total
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct GetKeysResponse {
    pub keys: Vec<ResponseKey>,
    pub count: i64,
}

/// Accumulated spend of a single key
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct KeyReporting {
    pub id: String,
    pub cost_in_micro_dollars: i64,
}
