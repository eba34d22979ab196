use async_trait::async_trait;
use conduit_core::model::{CustomProvider, RouteConfig, UpdateCustomProvider};
use conduit_core::{CustomProvidersManager, ManagerError};
use dashmap::DashMap;

use crate::provider_settings::KNOWN_PROVIDERS;
use crate::{new_id, now};

/// Custom providers held in memory
#[derive(Default)]
pub struct MemoryCustomProviders {
    providers: DashMap<String, CustomProvider>,
}

fn validate_route_configs(configs: &[RouteConfig]) -> Result<(), ManagerError> {
    if configs.is_empty() {
        return Err(ManagerError::validation("at least one route config is required"));
    }

    for config in configs {
        if !config.path.starts_with('/') {
            return Err(ManagerError::validation(format!(
                "route config path `{}` must start with /",
                config.path
            )));
        }
        if config.target_url.is_empty() {
            return Err(ManagerError::validation(format!(
                "target url is required for {}",
                config.path
            )));
        }
    }

    Ok(())
}

#[async_trait]
impl CustomProvidersManager for MemoryCustomProviders {
    async fn create_custom_provider(&self, mut provider: CustomProvider) -> Result<CustomProvider, ManagerError> {
        if provider.provider.is_empty() {
            return Err(ManagerError::validation("provider name is empty"));
        }
        if KNOWN_PROVIDERS.iter().any(|(name, _)| *name == provider.provider) {
            return Err(ManagerError::validation(format!(
                "`{}` is a built-in provider",
                provider.provider
            )));
        }
        if self.providers.iter().any(|entry| entry.provider == provider.provider) {
            return Err(ManagerError::validation(format!(
                "provider `{}` already exists",
                provider.provider
            )));
        }
        validate_route_configs(&provider.route_configs)?;

        provider.id = new_id();
        provider.created_at = now();
        provider.updated_at = provider.created_at;
        self.providers.insert(provider.id.clone(), provider.clone());

        Ok(provider)
    }

    async fn get_custom_providers(&self) -> Result<Vec<CustomProvider>, ManagerError> {
        let mut providers: Vec<CustomProvider> = self.providers.iter().map(|entry| entry.value().clone()).collect();
        providers.sort_by(|a, b| a.provider.cmp(&b.provider));
        Ok(providers)
    }

    async fn update_custom_provider(
        &self,
        id: &str,
        update: UpdateCustomProvider,
    ) -> Result<CustomProvider, ManagerError> {
        let mut stored = self
            .providers
            .get_mut(id)
            .ok_or_else(|| ManagerError::not_found(format!("custom provider {id} is not found")))?;

        if let Some(ref configs) = update.route_configs {
            validate_route_configs(configs)?;
        }

        if let Some(configs) = update.route_configs {
            stored.route_configs = configs;
        }
        if let Some(param) = update.authentication_param {
            stored.authentication_param = param;
        }
        stored.updated_at = now();

        Ok(stored.clone())
    }
}
