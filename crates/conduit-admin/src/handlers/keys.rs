use async_trait::async_trait;
use axum::extract::{Request, State};
use axum::response::Response;
use conduit_core::model::{KeyRequest, RequestKey, UpdateKey};

use crate::decode::{Decode, DecodeError, Input, JsonBody, PathId, PathIdWithBody};
use crate::endpoint::Endpoint;
use crate::problem::ProblemTable;
use crate::state::AdminState;

const KEY_MANAGER: &str = "/errors/key-manager";

pub static GET_KEYS: Endpoint = Endpoint {
    handler: "get_keys_handler",
    operation: "get_keys",
    instance: "/api/key-management/keys",
    purpose: "retrieving keys",
    problems: ProblemTable::new(
        KEY_MANAGER,
        "getting keys errored out",
        "get keys request validation failed",
        "keys are not found",
    ),
};

pub static GET_KEYS_V2: Endpoint = Endpoint {
    handler: "get_keys_v2_handler",
    operation: "get_keys_v2",
    instance: "/api/v2/key-management/keys",
    purpose: "retrieving keys",
    problems: ProblemTable::new(
        KEY_MANAGER,
        "getting keys errored out",
        "get keys request validation failed",
        "keys are not found",
    ),
};

pub static CREATE_KEY: Endpoint = Endpoint {
    handler: "create_key_handler",
    operation: "create_key",
    instance: "/api/key-management/keys",
    purpose: "creating a key",
    problems: ProblemTable::new(KEY_MANAGER, "key creation error", "key validation failed", "key is not found"),
};

pub static UPDATE_KEY: Endpoint = Endpoint {
    handler: "update_key_handler",
    operation: "update_key",
    instance: "/api/key-management/keys/:id",
    purpose: "updating a key",
    problems: ProblemTable::new(KEY_MANAGER, "update key error", "key validation failed", "update key failed"),
};

pub static DELETE_KEY: Endpoint = Endpoint {
    handler: "delete_key_handler",
    operation: "delete_key",
    instance: "/api/key-management/keys/:id",
    purpose: "deleting a key",
    problems: ProblemTable::new(KEY_MANAGER, "key deletion error", "key validation failed", "key is not found"),
};

/// Query filters of the key listing
///
/// `tag` and `tags` are merged into one tag list with `tag` first and
/// repeats of it dropped. At least one filter must be present.
#[derive(Debug, PartialEq, Eq)]
pub struct KeyFilters {
    pub tags: Vec<String>,
    pub key_ids: Vec<String>,
    pub provider: Option<String>,
}

#[async_trait]
impl Decode for KeyFilters {
    async fn decode(input: Input) -> Result<Self, DecodeError> {
        let query = input.query();
        let tag = query.first("tag");
        let tags = query.all("tags");
        let key_ids = query.all("keyIds");
        let provider = query.first("provider");

        if tag.is_none() && tags.is_empty() && key_ids.is_empty() && provider.is_none() {
            return Err(DecodeError::MissingFilters);
        }

        let mut selected: Vec<String> = tag.iter().cloned().collect();
        selected.extend(tags.into_iter().filter(|t| Some(t) != tag.as_ref()));

        Ok(Self {
            tags: selected,
            key_ids,
            provider,
        })
    }
}

pub async fn get_keys_handler(State(state): State<AdminState>, request: Request) -> Response {
    let keys = state.managers.keys.clone();
    GET_KEYS
        .respond_json(&state, request, |filters: KeyFilters| async move {
            keys.get_keys(filters.tags, filters.key_ids, filters.provider).await
        })
        .await
}

pub async fn get_keys_v2_handler(State(state): State<AdminState>, request: Request) -> Response {
    let keys = state.managers.keys.clone();
    GET_KEYS_V2
        .respond_json(&state, request, |JsonBody(query): JsonBody<KeyRequest>| async move {
            keys.get_keys_v2(query).await
        })
        .await
}

pub async fn create_key_handler(State(state): State<AdminState>, request: Request) -> Response {
    let keys = state.managers.keys.clone();
    CREATE_KEY
        .respond_json(&state, request, |JsonBody(key): JsonBody<RequestKey>| async move {
            keys.create_key(key).await
        })
        .await
}

pub async fn update_key_handler(State(state): State<AdminState>, request: Request) -> Response {
    let keys = state.managers.keys.clone();
    UPDATE_KEY
        .respond_json(&state, request, |PathIdWithBody(id, update): PathIdWithBody<UpdateKey>| async move {
            keys.update_key(&id, update).await
        })
        .await
}

pub async fn delete_key_handler(State(state): State<AdminState>, request: Request) -> Response {
    let keys = state.managers.keys.clone();
    DELETE_KEY
        .respond_empty(&state, request, |PathId(id): PathId| async move { keys.delete_key(&id).await })
        .await
}

#[cfg(test)]
mod tests {
    use axum::body::Body;

    use super::*;

    async fn filters(uri: &str) -> Result<KeyFilters, DecodeError> {
        let (parts, body) = http::Request::builder().uri(uri).body(Body::empty()).unwrap().into_parts();
        KeyFilters::decode(Input::new(parts, body, 1024)).await
    }

    #[tokio::test]
    async fn no_filters_is_rejected() {
        assert!(matches!(filters("/api/key-management/keys").await, Err(DecodeError::MissingFilters)));
        assert!(matches!(filters("/api/key-management/keys?tag=").await, Err(DecodeError::MissingFilters)));
    }

    #[tokio::test]
    async fn single_tag_becomes_tag_list() {
        let filters = filters("/api/key-management/keys?tag=foo").await.unwrap();
        assert_eq!(filters.tags, ["foo"]);
        assert!(filters.key_ids.is_empty());
        assert!(filters.provider.is_none());
    }

    #[tokio::test]
    async fn tag_and_tags_are_merged_without_repeating_tag() {
        let filters = filters("/api/key-management/keys?tag=a&tags=a&tags=b&keyIds=k1&provider=openai")
            .await
            .unwrap();
        assert_eq!(filters.tags, ["a", "b"]);
        assert_eq!(filters.key_ids, ["k1"]);
        assert_eq!(filters.provider.as_deref(), Some("openai"));
    }
}
