use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// What the data plane does when a policy rule matches
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Action {
    #[default]
    Allow,
    Block,
    AllowButWarn,
    AllowButRedact,
}

/// Actions keyed by detected entity (e.g. `email`, `phone`, `ssn`)
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PolicyConfig {
    pub entities: BTreeMap<String, Action>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RegexRule {
    pub definition: String,
    pub action: Action,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CustomRule {
    pub definition: String,
    pub action: Action,
}

/// Access policy applied to keys carrying matching tags
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Policy {
    pub id: String,
    pub created_at: i64,
    pub updated_at: i64,
    pub name: String,
    pub tags: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub config: Option<PolicyConfig>,
    pub regex_rules: Vec<RegexRule>,
    pub custom_rules: Vec<CustomRule>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct UpdatePolicy {
    pub name: Option<String>,
    pub tags: Option<Vec<String>>,
    pub config: Option<PolicyConfig>,
    pub regex_rules: Option<Vec<RegexRule>>,
    pub custom_rules: Option<Vec<CustomRule>>,
}
