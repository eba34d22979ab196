use async_trait::async_trait;
use axum::extract::{Request, State};
use axum::response::Response;
use conduit_core::model::{UpdateUser, UpdateUserViaTags, User, UserQuery};

use crate::decode::{Decode, DecodeError, Input, JsonBody, PathIdWithBody};
use crate::endpoint::Endpoint;
use crate::problem::ProblemTable;
use crate::state::AdminState;

const USER_MANAGER: &str = "/errors/user-manager";

pub static CREATE_USER: Endpoint = Endpoint {
    handler: "create_user_handler",
    operation: "create_user",
    instance: "/api/users",
    purpose: "creating a user",
    problems: ProblemTable::new(
        USER_MANAGER,
        "creating a user error",
        "user validation failed",
        "user is not found",
    ),
};

pub static UPDATE_USER: Endpoint = Endpoint {
    handler: "update_user_handler",
    operation: "update_user",
    instance: "/api/users/:id",
    purpose: "updating a user",
    problems: ProblemTable::new(
        USER_MANAGER,
        "updating a user error",
        "user validation failed",
        "user is not found",
    ),
};

pub static UPDATE_USER_VIA_TAGS: Endpoint = Endpoint {
    handler: "update_user_via_tags_handler",
    operation: "update_user_via_tags_and_user_id",
    instance: "/api/users",
    purpose: "updating a user",
    problems: ProblemTable::new(
        USER_MANAGER,
        "updating a user error",
        "user validation failed",
        "user is not found",
    ),
};

pub static GET_USERS: Endpoint = Endpoint {
    handler: "get_users_handler",
    operation: "get_users",
    instance: "/api/users",
    purpose: "retrieving users",
    problems: ProblemTable::new(
        USER_MANAGER,
        "getting users error",
        "get users request validation failed",
        "users are not found",
    ),
};

/// User listing filters; one of `tags`, `keyIds` or `userIds` is required
#[async_trait]
impl Decode for UserQuery {
    async fn decode(input: Input) -> Result<Self, DecodeError> {
        let query = input.query();

        let filters = Self {
            tags: query.all("tags"),
            key_ids: query.all("keyIds"),
            user_ids: query.all("userIds"),
            offset: query.parse_as("offset")?.unwrap_or_default(),
            limit: query.parse_as("limit")?.unwrap_or_default(),
        };

        if filters.tags.is_empty() && filters.key_ids.is_empty() && filters.user_ids.is_empty() {
            return Err(DecodeError::MissingFilters);
        }

        Ok(filters)
    }
}

pub async fn create_user_handler(State(state): State<AdminState>, request: Request) -> Response {
    let users = state.managers.users.clone();
    CREATE_USER
        .respond_json(&state, request, |JsonBody(user): JsonBody<User>| async move {
            users.create_user(user).await
        })
        .await
}

pub async fn update_user_handler(State(state): State<AdminState>, request: Request) -> Response {
    let users = state.managers.users.clone();
    UPDATE_USER
        .respond_json(
            &state,
            request,
            |PathIdWithBody(id, update): PathIdWithBody<UpdateUser>| async move {
                users.update_user(&id, update).await
            },
        )
        .await
}

pub async fn update_user_via_tags_handler(State(state): State<AdminState>, request: Request) -> Response {
    let users = state.managers.users.clone();
    UPDATE_USER_VIA_TAGS
        .respond_json(&state, request, |JsonBody(update): JsonBody<UpdateUserViaTags>| async move {
            users.update_user_via_tags_and_user_id(update).await
        })
        .await
}

pub async fn get_users_handler(State(state): State<AdminState>, request: Request) -> Response {
    let users = state.managers.users.clone();
    GET_USERS
        .respond_json(&state, request, |query: UserQuery| async move { users.get_users(query).await })
        .await
}

#[cfg(test)]
mod tests {
    use axum::body::Body;

    use super::*;

    async fn decode(uri: &str) -> Result<UserQuery, DecodeError> {
        let (parts, body) = http::Request::builder().uri(uri).body(Body::empty()).unwrap().into_parts();
        UserQuery::decode(Input::new(parts, body, 1024)).await
    }

    #[tokio::test]
    async fn paging_without_filters_is_rejected() {
        let result = decode("/api/users?offset=0&limit=10").await;
        assert!(matches!(result, Err(DecodeError::MissingFilters)));
    }

    #[tokio::test]
    async fn filters_and_paging_are_decoded() {
        let query = decode("/api/users?userIds=u1&tags%5B%5D=org&offset=5&limit=20").await.unwrap();
        assert_eq!(query.user_ids, ["u1"]);
        assert_eq!(query.tags, ["org"]);
        assert_eq!(query.offset, 5);
        assert_eq!(query.limit, 20);
    }

    #[tokio::test]
    async fn bad_limit_is_invalid_param() {
        let result = decode("/api/users?tags=org&limit=lots").await;
        assert!(matches!(result, Err(DecodeError::InvalidParam { name: "limit", .. })));
    }
}
