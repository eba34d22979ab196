use serde::{Deserialize, Serialize};

use super::key::{KeyLimits, PathConfig};

/// End user of the gateway, grouping keys under shared limits
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct User {
    pub id: String,
    pub created_at: i64,
    pub updated_at: i64,
    pub name: String,
    pub user_id: String,
    pub tags: Vec<String>,
    pub key_ids: Vec<String>,
    pub revoked: bool,
    pub revoked_reason: String,
    pub allowed_paths: Vec<PathConfig>,
    pub allowed_models: Vec<String>,
    #[serde(flatten)]
    pub limits: KeyLimits,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct UpdateUser {
    pub name: Option<String>,
    pub tags: Option<Vec<String>>,
    pub key_ids: Option<Vec<String>>,
    pub revoked: Option<bool>,
    pub revoked_reason: Option<String>,
    pub allowed_paths: Option<Vec<PathConfig>>,
    pub allowed_models: Option<Vec<String>>,
    pub cost_limit_in_usd: Option<f64>,
    pub rate_limit_over_time: Option<i64>,
}

/// Update addressed by external user id and tags instead of internal id
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct UpdateUserViaTags {
    pub tags: Vec<String>,
    pub user_id: String,
    #[serde(flatten)]
    pub update: UpdateUser,
}

/// Filters for listing users
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UserQuery {
    pub tags: Vec<String>,
    pub key_ids: Vec<String>,
    pub user_ids: Vec<String>,
    pub offset: i64,
    pub limit: i64,
}
