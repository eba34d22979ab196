use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use async_trait::async_trait;
use conduit_core::model::{GetKeysResponse, KeyLimits, KeyRequest, RequestKey, ResponseKey, UpdateKey};
use conduit_core::{KeyManager, ManagerError};
use dashmap::DashMap;
use dashmap::mapref::entry::Entry;

use crate::provider_settings::MemoryProviderSettings;
use crate::{new_id, now, page, shares_tag};

struct StoredKey {
    seq: u64,
    secret: String,
    key: ResponseKey,
}

/// API keys held in memory
///
/// The provider filter of the key listing is resolved through the setting
/// ids each key carries. Secrets are indexed so that a secret is claimed
/// by exactly one key.
#[derive(Default)]
pub struct MemoryKeys {
    keys: DashMap<String, StoredKey>,
    secrets: DashMap<String, String>,
    next_seq: AtomicU64,
    settings: Arc<MemoryProviderSettings>,
}

impl MemoryKeys {
    pub fn new(settings: Arc<MemoryProviderSettings>) -> Self {
        Self {
            keys: DashMap::new(),
            secrets: DashMap::new(),
            next_seq: AtomicU64::new(0),
            settings,
        }
    }

    fn check_settings(&self, setting_ids: &[String]) -> Result<(), ManagerError> {
        match setting_ids.iter().find(|id| self.settings.provider_of(id).is_none()) {
            Some(id) => Err(ManagerError::validation(format!("provider setting {id} does not exist"))),
            None => Ok(()),
        }
    }

    fn uses_provider(&self, key: &ResponseKey, provider: &str) -> bool {
        key.setting_ids
            .iter()
            .any(|id| self.settings.provider_of(id).as_deref() == Some(provider))
    }

    /// Keys in creation order
    fn ordered(&self) -> Vec<ResponseKey> {
        let mut keys: Vec<(u64, ResponseKey)> = self
            .keys
            .iter()
            .map(|entry| (entry.seq, entry.key.clone()))
            .collect();
        keys.sort_by_key(|(seq, _)| *seq);
        keys.into_iter().map(|(_, key)| key).collect()
    }
}

/// Reject negative spend and rate limits
pub(crate) fn validate_limits(limits: &KeyLimits) -> Result<(), ManagerError> {
    if limits.cost_limit_in_usd < 0.0 || limits.cost_limit_in_usd_over_time < 0.0 {
        return Err(ManagerError::validation("cost limit can not be negative"));
    }
    if limits.rate_limit_over_time < 0 {
        return Err(ManagerError::validation("rate limit can not be negative"));
    }
    if limits.cost_limit_in_usd_over_time > 0.0 && limits.cost_limit_in_usd_unit.is_none() {
        return Err(ManagerError::validation("cost limit over time requires a unit"));
    }
    if limits.rate_limit_over_time > 0 && limits.rate_limit_unit.is_none() {
        return Err(ManagerError::validation("rate limit over time requires a unit"));
    }
    Ok(())
}

#[async_trait]
impl KeyManager for MemoryKeys {
    async fn get_keys(
        &self,
        tags: Vec<String>,
        key_ids: Vec<String>,
        provider: Option<String>,
    ) -> Result<Vec<ResponseKey>, ManagerError> {
        Ok(self
            .ordered()
            .into_iter()
            .filter(|key| {
                shares_tag(&key.tags, &tags)
                    || key_ids.contains(&key.key_id)
                    || provider.as_deref().is_some_and(|p| self.uses_provider(key, p))
            })
            .collect())
    }

    async fn get_keys_v2(&self, request: KeyRequest) -> Result<GetKeysResponse, ManagerError> {
        if request.limit < 0 || request.offset < 0 {
            return Err(ManagerError::validation("limit and offset can not be negative"));
        }

        let mut keys: Vec<ResponseKey> = self
            .ordered()
            .into_iter()
            .filter(|key| request.tags.is_empty() || shares_tag(&key.tags, &request.tags))
            .filter(|key| request.key_ids.is_empty() || request.key_ids.contains(&key.key_id))
            .filter(|key| request.revoked.is_none_or(|revoked| key.revoked == revoked))
            .filter(|key| request.name.is_empty() || key.name.contains(&request.name))
            .collect();

        if request.order.eq_ignore_ascii_case("desc") {
            keys.reverse();
        }

        let count = if request.return_count {
            i64::try_from(keys.len()).unwrap_or(i64::MAX)
        } else {
            0
        };

        Ok(GetKeysResponse {
            keys: page(keys, request.offset, request.limit),
            count,
        })
    }

    async fn create_key(&self, request: RequestKey) -> Result<ResponseKey, ManagerError> {
        if request.name.is_empty() {
            return Err(ManagerError::validation("key name is empty"));
        }
        if request.key.is_empty() {
            return Err(ManagerError::validation("key secret is empty"));
        }
        validate_limits(&request.limits)?;

        self.check_settings(&request.setting_ids)?;

        let key_id = new_id();
        match self.secrets.entry(request.key.clone()) {
            Entry::Occupied(_) => return Err(ManagerError::validation("key secret is already in use")),
            Entry::Vacant(slot) => {
                slot.insert(key_id.clone());
            }
        }

        let created_at = now();
        let key = ResponseKey {
            key_id,
            name: request.name,
            created_at,
            updated_at: created_at,
            tags: request.tags,
            revoked: false,
            revoked_reason: String::new(),
            setting_ids: request.setting_ids,
            allowed_paths: request.allowed_paths,
            policy_id: request.policy_id,
            should_log_request: request.should_log_request,
            should_log_response: request.should_log_response,
            rotation_enabled: request.rotation_enabled,
            limits: request.limits,
        };

        let seq = self.next_seq.fetch_add(1, Ordering::Relaxed);
        self.keys.insert(
            key.key_id.clone(),
            StoredKey {
                seq,
                secret: request.key,
                key: key.clone(),
            },
        );

        tracing::debug!(key_id = %key.key_id, "key created");
        Ok(key)
    }

    async fn update_key(&self, id: &str, update: UpdateKey) -> Result<ResponseKey, ManagerError> {
        let mut stored = self
            .keys
            .get_mut(id)
            .ok_or_else(|| ManagerError::not_found(format!("key {id} is not found")))?;

        let mut key = stored.key.clone();
        if let Some(name) = update.name {
            if name.is_empty() {
                return Err(ManagerError::validation("key name is empty"));
            }
            key.name = name;
        }
        if let Some(tags) = update.tags {
            key.tags = tags;
        }
        if let Some(revoked) = update.revoked {
            key.revoked = revoked;
        }
        if let Some(reason) = update.revoked_reason {
            key.revoked_reason = reason;
        }
        if let Some(setting_ids) = update.setting_ids {
            self.check_settings(&setting_ids)?;
            key.setting_ids = setting_ids;
        }
        if let Some(paths) = update.allowed_paths {
            key.allowed_paths = paths;
        }
        if let Some(policy_id) = update.policy_id {
            key.policy_id = policy_id;
        }
        if let Some(flag) = update.should_log_request {
            key.should_log_request = flag;
        }
        if let Some(flag) = update.should_log_response {
            key.should_log_response = flag;
        }
        if let Some(flag) = update.rotation_enabled {
            key.rotation_enabled = flag;
        }
        if let Some(limit) = update.cost_limit_in_usd {
            key.limits.cost_limit_in_usd = limit;
        }
        if let Some(limit) = update.cost_limit_in_usd_over_time {
            key.limits.cost_limit_in_usd_over_time = limit;
        }
        if let Some(unit) = update.cost_limit_in_usd_unit {
            key.limits.cost_limit_in_usd_unit = Some(unit);
        }
        if let Some(limit) = update.rate_limit_over_time {
            key.limits.rate_limit_over_time = limit;
        }
        if let Some(unit) = update.rate_limit_unit {
            key.limits.rate_limit_unit = Some(unit);
        }
        validate_limits(&key.limits)?;

        key.updated_at = now();
        stored.key = key.clone();
        Ok(key)
    }

    async fn delete_key(&self, id: &str) -> Result<(), ManagerError> {
        let (_, stored) = self
            .keys
            .remove(id)
            .ok_or_else(|| ManagerError::not_found(format!("key {id} is not found")))?;
        self.secrets.remove(&stored.secret);

        tracing::debug!(key_id = id, "key deleted");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use conduit_core::ErrorKind;
    use conduit_core::ProviderSettingsManager;
    use conduit_core::model::{Setting, TimeUnit};

    use super::*;

    fn request(name: &str, secret: &str, tags: &[&str]) -> RequestKey {
        RequestKey {
            name: name.to_owned(),
            key: secret.to_owned(),
            tags: tags.iter().map(|t| (*t).to_owned()).collect(),
            ..RequestKey::default()
        }
    }

    #[tokio::test]
    async fn created_key_hides_secret_and_is_listed_by_tag() {
        let keys = MemoryKeys::default();
        let created = keys.create_key(request("ci", "sk-1", &["team-a"])).await.unwrap();

        assert!(!created.key_id.is_empty());
        assert_eq!(created.created_at, created.updated_at);

        let listed = keys.get_keys(vec!["team-a".to_owned()], vec![], None).await.unwrap();
        assert_eq!(listed, [created]);
        assert!(keys.get_keys(vec!["team-b".to_owned()], vec![], None).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn invalid_keys_are_validation_errors() {
        let keys = MemoryKeys::default();

        for bad in [request("", "sk-1", &[]), request("ci", "", &[])] {
            let err = keys.create_key(bad).await.unwrap_err();
            assert_eq!(err.kind(), ErrorKind::Validation);
        }

        let mut negative = request("ci", "sk-1", &[]);
        negative.limits.cost_limit_in_usd = -1.0;
        assert_eq!(keys.create_key(negative).await.unwrap_err().kind(), ErrorKind::Validation);

        let mut no_unit = request("ci", "sk-1", &[]);
        no_unit.limits.rate_limit_over_time = 10;
        assert_eq!(keys.create_key(no_unit).await.unwrap_err().kind(), ErrorKind::Validation);

        keys.create_key(request("ci", "sk-1", &[])).await.unwrap();
        let duplicate = keys.create_key(request("other", "sk-1", &[])).await.unwrap_err();
        assert_eq!(duplicate.message(), "key secret is already in use");
    }

    #[tokio::test]
    async fn absent_keys_are_not_found() {
        let keys = MemoryKeys::default();

        let err = keys.update_key("missing", UpdateKey::default()).await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::NotFound);
        assert_eq!(keys.delete_key("missing").await.unwrap_err().kind(), ErrorKind::NotFound);
    }

    #[tokio::test]
    async fn update_changes_only_present_fields() {
        let keys = MemoryKeys::default();
        let created = keys.create_key(request("ci", "sk-1", &["a"])).await.unwrap();

        let updated = keys
            .update_key(
                &created.key_id,
                UpdateKey {
                    revoked: Some(true),
                    rate_limit_over_time: Some(5),
                    rate_limit_unit: Some(TimeUnit::Minute),
                    ..UpdateKey::default()
                },
            )
            .await
            .unwrap();

        assert!(updated.revoked);
        assert_eq!(updated.name, "ci");
        assert_eq!(updated.tags, ["a"]);
        assert_eq!(updated.limits.rate_limit_over_time, 5);
    }

    #[tokio::test]
    async fn delete_removes_key() {
        let keys = MemoryKeys::default();
        let created = keys.create_key(request("ci", "sk-1", &["a"])).await.unwrap();

        keys.delete_key(&created.key_id).await.unwrap();
        assert!(keys.get_keys(vec![], vec![created.key_id], None).await.unwrap().is_empty());

        keys.create_key(request("ci", "sk-1", &["a"])).await.unwrap();
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn concurrent_creates_claim_a_secret_once() {
        let keys = Arc::new(MemoryKeys::default());

        let tasks: Vec<_> = (0..16)
            .map(|i| {
                let keys = Arc::clone(&keys);
                tokio::spawn(async move { keys.create_key(request(&format!("key-{i}"), "sk-shared", &["a"])).await })
            })
            .collect();

        let mut created = 0;
        for task in tasks {
            match task.await.unwrap() {
                Ok(_) => created += 1,
                Err(err) => assert_eq!(err.message(), "key secret is already in use"),
            }
        }

        assert_eq!(created, 1);
        assert_eq!(keys.get_keys(vec!["a".to_owned()], vec![], None).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn v2_listing_filters_orders_and_pages() {
        let keys = MemoryKeys::default();
        for i in 0..5 {
            keys.create_key(request(&format!("key-{i}"), &format!("sk-{i}"), &["a"])).await.unwrap();
        }

        let response = keys
            .get_keys_v2(KeyRequest {
                tags: vec!["a".to_owned()],
                order: "desc".to_owned(),
                limit: 2,
                offset: 1,
                return_count: true,
                ..KeyRequest::default()
            })
            .await
            .unwrap();

        assert_eq!(response.count, 5);
        let names: Vec<_> = response.keys.iter().map(|k| k.name.as_str()).collect();
        assert_eq!(names, ["key-3", "key-2"]);

        let err = keys
            .get_keys_v2(KeyRequest {
                limit: -1,
                ..KeyRequest::default()
            })
            .await
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Validation);
    }

    #[tokio::test]
    async fn provider_filter_follows_setting_ids() {
        let settings = Arc::new(MemoryProviderSettings::default());
        let setting = settings
            .create_setting(Setting {
                provider: "openai".to_owned(),
                setting: BTreeMap::from([("apikey".to_owned(), "sk-up".to_owned())]),
                ..Setting::default()
            })
            .await
            .unwrap();

        let keys = MemoryKeys::new(settings);
        let mut with_setting = request("ci", "sk-1", &[]);
        with_setting.setting_ids = vec![setting.id.clone()];
        let created = keys.create_key(with_setting).await.unwrap();
        keys.create_key(request("other", "sk-2", &[])).await.unwrap();

        let listed = keys.get_keys(vec![], vec![], Some("openai".to_owned())).await.unwrap();
        assert_eq!(listed, [created]);

        let mut unknown = request("bad", "sk-3", &[]);
        unknown.setting_ids = vec!["nope".to_owned()];
        assert_eq!(keys.create_key(unknown).await.unwrap_err().kind(), ErrorKind::Validation);
    }

    #[tokio::test]
    async fn update_rejects_unknown_setting_ids() {
        let keys = MemoryKeys::default();
        let created = keys.create_key(request("ci", "sk-1", &[])).await.unwrap();

        let err = keys
            .update_key(
                &created.key_id,
                UpdateKey {
                    setting_ids: Some(vec!["nope".to_owned()]),
                    ..UpdateKey::default()
                },
            )
            .await
            .unwrap_err();
        assert_eq!(err.message(), "provider setting nope does not exist");

        let unchanged = keys.get_keys(vec![], vec![created.key_id.clone()], None).await.unwrap();
        assert_eq!(unchanged, [created]);
    }
}
