use axum::extract::{Request, State};
use axum::response::Response;
use conduit_core::model::{CustomProvider, UpdateCustomProvider};

use crate::decode::{JsonBody, PathIdWithBody};
use crate::endpoint::Endpoint;
use crate::problem::ProblemTable;
use crate::state::AdminState;

const CUSTOM_PROVIDER_MANAGER: &str = "/errors/custom-provider-manager";

pub static CREATE_CUSTOM_PROVIDER: Endpoint = Endpoint {
    handler: "create_custom_provider_handler",
    operation: "create_custom_provider",
    instance: "/api/custom/providers",
    purpose: "creating a custom provider",
    problems: ProblemTable::new(
        CUSTOM_PROVIDER_MANAGER,
        "creating a custom provider error",
        "custom provider validation failed",
        "custom provider is not found",
    ),
};

pub static GET_CUSTOM_PROVIDERS: Endpoint = Endpoint {
    handler: "get_custom_providers_handler",
    operation: "get_custom_providers",
    instance: "/api/custom/providers",
    purpose: "retrieving custom providers",
    problems: ProblemTable::new(
        CUSTOM_PROVIDER_MANAGER,
        "getting custom providers error",
        "custom provider validation failed",
        "custom provider is not found",
    ),
};

pub static UPDATE_CUSTOM_PROVIDER: Endpoint = Endpoint {
    handler: "update_custom_provider_handler",
    operation: "update_custom_provider",
    instance: "/api/custom/providers/:id",
    purpose: "updating a custom provider",
    problems: ProblemTable::new(
        CUSTOM_PROVIDER_MANAGER,
        "updating a custom provider error",
        "custom provider validation failed",
        "custom provider is not found",
    ),
};

pub async fn create_custom_provider_handler(State(state): State<AdminState>, request: Request) -> Response {
    let providers = state.managers.custom_providers.clone();
    CREATE_CUSTOM_PROVIDER
        .respond_json(&state, request, |JsonBody(provider): JsonBody<CustomProvider>| async move {
            providers.create_custom_provider(provider).await
        })
        .await
}

pub async fn get_custom_providers_handler(State(state): State<AdminState>, request: Request) -> Response {
    let providers = state.managers.custom_providers.clone();
    GET_CUSTOM_PROVIDERS
        .respond_json(&state, request, |(): ()| async move { providers.get_custom_providers().await })
        .await
}

pub async fn update_custom_provider_handler(State(state): State<AdminState>, request: Request) -> Response {
    let providers = state.managers.custom_providers.clone();
    UPDATE_CUSTOM_PROVIDER
        .respond_json(
            &state,
            request,
            |PathIdWithBody(id, update): PathIdWithBody<UpdateCustomProvider>| async move {
                providers.update_custom_provider(&id, update).await
            },
        )
        .await
}
