use async_trait::async_trait;
use conduit_core::model::{Policy, UpdatePolicy};
use conduit_core::{ManagerError, PoliciesManager};
use dashmap::DashMap;

use crate::{new_id, now, shares_tag};

/// Policies held in memory
#[derive(Default)]
pub struct MemoryPolicies {
    policies: DashMap<String, Policy>,
}

fn validate(policy: &Policy) -> Result<(), ManagerError> {
    if policy.name.is_empty() {
        return Err(ManagerError::validation("policy name is empty"));
    }

    let mut rules = policy
        .regex_rules
        .iter()
        .map(|rule| &rule.definition)
        .chain(policy.custom_rules.iter().map(|rule| &rule.definition));
    if rules.any(String::is_empty) {
        return Err(ManagerError::validation("rule definition is empty"));
    }

    Ok(())
}

#[async_trait]
impl PoliciesManager for MemoryPolicies {
    async fn create_policy(&self, mut policy: Policy) -> Result<Policy, ManagerError> {
        validate(&policy)?;

        policy.id = new_id();
        policy.created_at = now();
        policy.updated_at = policy.created_at;
        self.policies.insert(policy.id.clone(), policy.clone());

        Ok(policy)
    }

    async fn update_policy(&self, id: &str, update: UpdatePolicy) -> Result<Policy, ManagerError> {
        let mut stored = self
            .policies
            .get_mut(id)
            .ok_or_else(|| ManagerError::not_found(format!("policy {id} is not found")))?;

        let mut policy = stored.clone();
        if let Some(name) = update.name {
            policy.name = name;
        }
        if let Some(tags) = update.tags {
            policy.tags = tags;
        }
        if let Some(config) = update.config {
            policy.config = Some(config);
        }
        if let Some(rules) = update.regex_rules {
            policy.regex_rules = rules;
        }
        if let Some(rules) = update.custom_rules {
            policy.custom_rules = rules;
        }
        validate(&policy)?;

        policy.updated_at = now();
        *stored = policy.clone();
        Ok(policy)
    }

    async fn get_policies_by_tags(&self, tags: Vec<String>) -> Result<Vec<Policy>, ManagerError> {
        let mut policies: Vec<Policy> = self
            .policies
            .iter()
            .filter(|entry| shares_tag(&entry.tags, &tags))
            .map(|entry| entry.value().clone())
            .collect();
        policies.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(policies)
    }
}
