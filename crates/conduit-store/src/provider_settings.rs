use async_trait::async_trait;
use conduit_core::model::{Setting, UpdateSetting};
use conduit_core::{ManagerError, ProviderSettingsManager};
use dashmap::DashMap;

use crate::{new_id, now};

/// Built-in providers and the setting values each one requires
pub const KNOWN_PROVIDERS: &[(&str, &[&str])] = &[
    ("openai", &["apikey"]),
    ("anthropic", &["apikey"]),
    ("azure", &["resourceName", "apikey"]),
    ("vllm", &["url"]),
    ("deepinfra", &["apikey"]),
    ("bedrock", &["awsAccessKeyId", "awsSecretAccessKey", "awsRegion"]),
];

/// Provider settings held in memory
#[derive(Default)]
pub struct MemoryProviderSettings {
    settings: DashMap<String, Setting>,
}

impl MemoryProviderSettings {
    /// Provider name of a stored setting
    pub fn provider_of(&self, id: &str) -> Option<String> {
        self.settings.get(id).map(|setting| setting.provider.clone())
    }
}

fn validate(setting: &Setting) -> Result<(), ManagerError> {
    let Some((_, required)) = KNOWN_PROVIDERS.iter().find(|(name, _)| *name == setting.provider) else {
        return Err(ManagerError::validation(format!(
            "provider `{}` is not supported",
            setting.provider
        )));
    };

    for field in *required {
        if setting.setting.get(*field).is_none_or(String::is_empty) {
            return Err(ManagerError::validation(format!(
                "{field} is required for provider {}",
                setting.provider
            )));
        }
    }

    Ok(())
}

#[async_trait]
impl ProviderSettingsManager for MemoryProviderSettings {
    async fn create_setting(&self, mut setting: Setting) -> Result<Setting, ManagerError> {
        validate(&setting)?;

        setting.id = new_id();
        setting.created_at = now();
        setting.updated_at = setting.created_at;
        self.settings.insert(setting.id.clone(), setting.clone());

        Ok(setting)
    }

    async fn update_setting(&self, id: &str, update: UpdateSetting) -> Result<Setting, ManagerError> {
        let mut stored = self
            .settings
            .get_mut(id)
            .ok_or_else(|| ManagerError::not_found(format!("provider setting {id} is not found")))?;

        let mut setting = stored.clone();
        if let Some(name) = update.name {
            setting.name = name;
        }
        if let Some(values) = update.setting {
            setting.setting.extend(values);
        }
        if let Some(models) = update.allowed_models {
            setting.allowed_models = models;
        }
        validate(&setting)?;

        setting.updated_at = now();
        *stored = setting.clone();
        Ok(setting)
    }

    async fn get_settings(&self, ids: Vec<String>) -> Result<Vec<Setting>, ManagerError> {
        let mut settings: Vec<Setting> = self
            .settings
            .iter()
            .filter(|entry| ids.is_empty() || ids.contains(entry.key()))
            .map(|entry| entry.value().clone())
            .collect();
        settings.sort_by(|a, b| a.created_at.cmp(&b.created_at).then_with(|| a.id.cmp(&b.id)));

        Ok(settings)
    }
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use conduit_core::ErrorKind;

    use super::*;

    fn openai(key: &str) -> Setting {
        Setting {
            provider: "openai".to_owned(),
            name: "primary".to_owned(),
            setting: BTreeMap::from([("apikey".to_owned(), key.to_owned())]),
            ..Setting::default()
        }
    }

    #[tokio::test]
    async fn unknown_provider_is_rejected() {
        let settings = MemoryProviderSettings::default();
        let err = settings
            .create_setting(Setting {
                provider: "acme".to_owned(),
                ..Setting::default()
            })
            .await
            .unwrap_err();

        assert_eq!(err.kind(), ErrorKind::Validation);
        assert_eq!(err.message(), "provider `acme` is not supported");
    }

    #[tokio::test]
    async fn required_values_must_be_present() {
        let settings = MemoryProviderSettings::default();
        let err = settings.create_setting(openai("")).await.unwrap_err();
        assert_eq!(err.message(), "apikey is required for provider openai");
    }

    #[tokio::test]
    async fn create_update_and_list() {
        let settings = MemoryProviderSettings::default();
        let created = settings.create_setting(openai("sk-1")).await.unwrap();
        settings.create_setting(openai("sk-2")).await.unwrap();

        let updated = settings
            .update_setting(
                &created.id,
                UpdateSetting {
                    allowed_models: Some(vec!["gpt-4o".to_owned()]),
                    ..UpdateSetting::default()
                },
            )
            .await
            .unwrap();
        assert_eq!(updated.allowed_models, ["gpt-4o"]);
        assert_eq!(updated.setting["apikey"], "sk-1");

        assert_eq!(settings.get_settings(vec![]).await.unwrap().len(), 2);
        let only = settings.get_settings(vec![created.id.clone()]).await.unwrap();
        assert_eq!(only, [updated]);
        assert_eq!(settings.provider_of(&created.id).as_deref(), Some("openai"));
    }

    #[tokio::test]
    async fn updating_absent_setting_is_not_found() {
        let settings = MemoryProviderSettings::default();
        let err = settings
            .update_setting("missing", UpdateSetting::default())
            .await
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::NotFound);
    }
}
