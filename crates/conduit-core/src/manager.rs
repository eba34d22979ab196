//! Interfaces of the resource managers behind the admin API
//!
//! Managers own validation, persistence, and business rules for one
//! resource family. They must be safe to call concurrently; the admin
//! server never serializes access to them.

use std::sync::Arc;

use async_trait::async_trait;

use crate::error::ManagerError;
use crate::model::{
    CustomProvider, DailyReportingResponse, Event, EventQuery, EventRequest, EventResponse, GetKeysResponse,
    KeyReporting, KeyReportingRequest, KeyReportingResponse, KeyRequest, Policy, ReportingRequest, ReportingResponse,
    RequestKey, ResponseKey, Route, Setting, UpdateCustomProvider, UpdateKey, UpdatePolicy, UpdateSetting, UpdateUser,
    UpdateUserViaTags, User, UserQuery,
};

/// API key lifecycle
#[async_trait]
pub trait KeyManager: Send + Sync {
    /// Keys matching any of the tags, any of the ids, or the provider
    async fn get_keys(
        &self,
        tags: Vec<String>,
        key_ids: Vec<String>,
        provider: Option<String>,
    ) -> Result<Vec<ResponseKey>, ManagerError>;

    async fn get_keys_v2(&self, request: KeyRequest) -> Result<GetKeysResponse, ManagerError>;

    async fn create_key(&self, key: RequestKey) -> Result<ResponseKey, ManagerError>;

    async fn update_key(&self, id: &str, update: UpdateKey) -> Result<ResponseKey, ManagerError>;

    async fn delete_key(&self, id: &str) -> Result<(), ManagerError>;
}

/// Usage queries over recorded events
#[async_trait]
pub trait KeyReportingManager: Send + Sync {
    async fn get_key_reporting(&self, key_id: &str) -> Result<KeyReporting, ManagerError>;

    async fn get_top_key_reporting(&self, request: KeyReportingRequest) -> Result<KeyReportingResponse, ManagerError>;

    async fn get_events(&self, query: EventQuery) -> Result<Vec<Event>, ManagerError>;

    async fn get_events_v2(&self, request: EventRequest) -> Result<EventResponse, ManagerError>;

    async fn get_event_reporting(&self, request: ReportingRequest) -> Result<ReportingResponse, ManagerError>;

    async fn get_aggregated_event_by_day_reporting(
        &self,
        request: ReportingRequest,
    ) -> Result<DailyReportingResponse, ManagerError>;

    async fn get_user_ids(&self, key_id: &str) -> Result<Vec<String>, ManagerError>;

    async fn get_custom_ids(&self, key_id: &str) -> Result<Vec<String>, ManagerError>;
}

/// Credentials for built-in providers
#[async_trait]
pub trait ProviderSettingsManager: Send + Sync {
    async fn create_setting(&self, setting: Setting) -> Result<Setting, ManagerError>;

    async fn update_setting(&self, id: &str, update: UpdateSetting) -> Result<Setting, ManagerError>;

    /// Settings with the given ids, or all settings when `ids` is empty
    async fn get_settings(&self, ids: Vec<String>) -> Result<Vec<Setting>, ManagerError>;
}

/// Admin-defined upstream providers
#[async_trait]
pub trait CustomProvidersManager: Send + Sync {
    async fn create_custom_provider(&self, provider: CustomProvider) -> Result<CustomProvider, ManagerError>;

    async fn get_custom_providers(&self) -> Result<Vec<CustomProvider>, ManagerError>;

    async fn update_custom_provider(
        &self,
        id: &str,
        update: UpdateCustomProvider,
    ) -> Result<CustomProvider, ManagerError>;
}

/// Custom routes with fallback chains
#[async_trait]
pub trait RouteManager: Send + Sync {
    async fn create_route(&self, route: Route) -> Result<Route, ManagerError>;

    async fn get_route(&self, id: &str) -> Result<Route, ManagerError>;

    async fn get_routes(&self) -> Result<Vec<Route>, ManagerError>;

    async fn delete_route(&self, id: &str) -> Result<(), ManagerError>;
}

/// Access policies
#[async_trait]
pub trait PoliciesManager: Send + Sync {
    async fn create_policy(&self, policy: Policy) -> Result<Policy, ManagerError>;

    async fn update_policy(&self, id: &str, update: UpdatePolicy) -> Result<Policy, ManagerError>;

    async fn get_policies_by_tags(&self, tags: Vec<String>) -> Result<Vec<Policy>, ManagerError>;
}

/// Gateway users
#[async_trait]
pub trait UserManager: Send + Sync {
    async fn create_user(&self, user: User) -> Result<User, ManagerError>;

    async fn update_user(&self, id: &str, update: UpdateUser) -> Result<User, ManagerError>;

    async fn update_user_via_tags_and_user_id(&self, update: UpdateUserViaTags) -> Result<User, ManagerError>;

    async fn get_users(&self, query: UserQuery) -> Result<Vec<User>, ManagerError>;
}

/// Process-wide set of managers, built once at startup
#[derive(Clone)]
pub struct Managers {
    pub keys: Arc<dyn KeyManager>,
    pub key_reporting: Arc<dyn KeyReportingManager>,
    pub provider_settings: Arc<dyn ProviderSettingsManager>,
    pub custom_providers: Arc<dyn CustomProvidersManager>,
    pub routes: Arc<dyn RouteManager>,
    pub policies: Arc<dyn PoliciesManager>,
    pub users: Arc<dyn UserManager>,
}
