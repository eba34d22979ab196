use async_trait::async_trait;
use axum::extract::{Request, State};
use axum::response::Response;
use conduit_core::model::{Policy, UpdatePolicy};

use crate::decode::{Decode, DecodeError, Input, JsonBody, PathIdWithBody};
use crate::endpoint::Endpoint;
use crate::problem::ProblemTable;
use crate::state::AdminState;

const POLICY_MANAGER: &str = "/errors/policy-manager";

pub static CREATE_POLICY: Endpoint = Endpoint {
    handler: "create_policy_handler",
    operation: "create_policy",
    instance: "/api/policies",
    purpose: "creating a policy",
    problems: ProblemTable::new(
        POLICY_MANAGER,
        "creating a policy error",
        "policy validation failed",
        "policy is not found",
    ),
};

pub static UPDATE_POLICY: Endpoint = Endpoint {
    handler: "update_policy_handler",
    operation: "update_policy",
    instance: "/api/policies/:id",
    purpose: "updating a policy",
    problems: ProblemTable::new(
        POLICY_MANAGER,
        "updating a policy error",
        "policy validation failed",
        "policy is not found",
    ),
};

pub static GET_POLICIES: Endpoint = Endpoint {
    handler: "get_policies_handler",
    operation: "get_policies_by_tags",
    instance: "/api/policies",
    purpose: "retrieving policies",
    problems: ProblemTable::new(
        POLICY_MANAGER,
        "getting policies error",
        "policy validation failed",
        "policies are not found",
    ),
};

/// The `tags` filter; at least one tag is required
pub struct PolicyTags(pub Vec<String>);

#[async_trait]
impl Decode for PolicyTags {
    async fn decode(input: Input) -> Result<Self, DecodeError> {
        let tags = input.query().all("tags");
        if tags.is_empty() {
            return Err(DecodeError::MissingFilters);
        }
        Ok(Self(tags))
    }
}

pub async fn create_policy_handler(State(state): State<AdminState>, request: Request) -> Response {
    let policies = state.managers.policies.clone();
    CREATE_POLICY
        .respond_json(&state, request, |JsonBody(policy): JsonBody<Policy>| async move {
            policies.create_policy(policy).await
        })
        .await
}

pub async fn update_policy_handler(State(state): State<AdminState>, request: Request) -> Response {
    let policies = state.managers.policies.clone();
    UPDATE_POLICY
        .respond_json(
            &state,
            request,
            |PathIdWithBody(id, update): PathIdWithBody<UpdatePolicy>| async move {
                policies.update_policy(&id, update).await
            },
        )
        .await
}

pub async fn get_policies_handler(State(state): State<AdminState>, request: Request) -> Response {
    let policies = state.managers.policies.clone();
    GET_POLICIES
        .respond_json(&state, request, |PolicyTags(tags): PolicyTags| async move {
            policies.get_policies_by_tags(tags).await
        })
        .await
}
