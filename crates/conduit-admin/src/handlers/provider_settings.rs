use async_trait::async_trait;
use axum::extract::{Request, State};
use axum::response::Response;
use conduit_core::model::{Setting, UpdateSetting};

use crate::decode::{Decode, DecodeError, Input, JsonBody, PathIdWithBody};
use crate::endpoint::Endpoint;
use crate::problem::ProblemTable;
use crate::state::AdminState;

const PROVIDER_SETTINGS_MANAGER: &str = "/errors/provider-settings-manager";

pub static CREATE_PROVIDER_SETTING: Endpoint = Endpoint {
    handler: "create_provider_setting_handler",
    operation: "create_setting",
    instance: "/api/provider-settings",
    purpose: "creating a provider setting",
    problems: ProblemTable::new(
        PROVIDER_SETTINGS_MANAGER,
        "provider setting creation failed",
        "provider setting validation failed",
        "provider setting is not found",
    ),
};

pub static GET_PROVIDER_SETTINGS: Endpoint = Endpoint {
    handler: "get_provider_settings_handler",
    operation: "get_settings",
    instance: "/api/provider-settings",
    purpose: "retrieving provider settings",
    problems: ProblemTable::new(
        PROVIDER_SETTINGS_MANAGER,
        "get provider settings failed",
        "provider setting validation failed",
        "provider setting is not found",
    ),
};

pub static UPDATE_PROVIDER_SETTING: Endpoint = Endpoint {
    handler: "update_provider_setting_handler",
    operation: "update_setting",
    instance: "/api/provider-settings/:id",
    purpose: "updating a provider setting",
    problems: ProblemTable::new(
        PROVIDER_SETTINGS_MANAGER,
        "provider setting update failed",
        "provider setting validation failed",
        "provider setting is not found",
    ),
};

/// Optional `ids` filter; no ids lists every setting
pub struct SettingIds(pub Vec<String>);

#[async_trait]
impl Decode for SettingIds {
    async fn decode(input: Input) -> Result<Self, DecodeError> {
        Ok(Self(input.query().all("ids")))
    }
}

pub async fn create_provider_setting_handler(State(state): State<AdminState>, request: Request) -> Response {
    let settings = state.managers.provider_settings.clone();
    CREATE_PROVIDER_SETTING
        .respond_json(&state, request, |JsonBody(setting): JsonBody<Setting>| async move {
            settings.create_setting(setting).await
        })
        .await
}

pub async fn get_provider_settings_handler(State(state): State<AdminState>, request: Request) -> Response {
    let settings = state.managers.provider_settings.clone();
    GET_PROVIDER_SETTINGS
        .respond_json(&state, request, |SettingIds(ids): SettingIds| async move {
            settings.get_settings(ids).await
        })
        .await
}

pub async fn update_provider_setting_handler(State(state): State<AdminState>, request: Request) -> Response {
    let settings = state.managers.provider_settings.clone();
    UPDATE_PROVIDER_SETTING
        .respond_json(
            &state,
            request,
            |PathIdWithBody(id, update): PathIdWithBody<UpdateSetting>| async move {
                settings.update_setting(&id, update).await
            },
        )
        .await
}
