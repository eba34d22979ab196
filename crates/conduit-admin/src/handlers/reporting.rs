use async_trait::async_trait;
use axum::extract::{Request, State};
use axum::response::Response;
use conduit_core::model::{EventQuery, EventRequest, KeyReportingRequest, ReportingRequest};

use crate::decode::{Decode, DecodeError, Input, JsonBody, PathId};
use crate::endpoint::Endpoint;
use crate::problem::{ProblemEntry, ProblemTable};
use crate::state::AdminState;

const KEY_REPORTING_MANAGER: &str = "/errors/key-reporting-manager";
const EVENT_MANAGER: &str = "/errors/event-manager";

pub static GET_KEY_REPORTING: Endpoint = Endpoint {
    handler: "get_key_reporting_handler",
    operation: "get_key_reporting",
    instance: "/api/reporting/keys/:id",
    purpose: "retrieving api key reporting",
    problems: ProblemTable::new(
        KEY_REPORTING_MANAGER,
        "key reporting error",
        "key reporting validation failed",
        "key not found error",
    )
    .with_not_found(ProblemEntry::new("/errors/key-not-found", "key not found error")),
};

pub static GET_EVENT_METRICS: Endpoint = Endpoint {
    handler: "get_event_metrics_handler",
    operation: "get_event_reporting",
    instance: "/api/reporting/events",
    purpose: "retrieving event metrics",
    problems: ProblemTable::new(
        EVENT_MANAGER,
        "event reporting error",
        "event reporting request validation failed",
        "events are not found",
    ),
};

pub static GET_EVENT_METRICS_BY_DAY: Endpoint = Endpoint {
    handler: "get_event_metrics_by_day_handler",
    operation: "get_aggregated_event_by_day_reporting",
    instance: "/api/reporting/events-by-day",
    purpose: "retrieving daily event metrics",
    problems: ProblemTable::new(
        EVENT_MANAGER,
        "event reporting error",
        "event reporting request validation failed",
        "events are not found",
    ),
};

pub static GET_EVENTS: Endpoint = Endpoint {
    handler: "get_events_handler",
    operation: "get_events",
    instance: "/api/events",
    purpose: "retrieving events",
    problems: ProblemTable::new(
        EVENT_MANAGER,
        "getting events error",
        "get events request validation failed",
        "events are not found",
    ),
};

pub static GET_EVENTS_V2: Endpoint = Endpoint {
    handler: "get_events_v2_handler",
    operation: "get_events_v2",
    instance: "/api/v2/events",
    purpose: "retrieving events",
    problems: ProblemTable::new(
        EVENT_MANAGER,
        "getting events error",
        "get events request validation failed",
        "events are not found",
    ),
};

pub static GET_USER_IDS: Endpoint = Endpoint {
    handler: "get_user_ids_handler",
    operation: "get_user_ids",
    instance: "/api/reporting/user-ids",
    purpose: "retrieving user ids",
    problems: ProblemTable::new(
        EVENT_MANAGER,
        "getting user ids error",
        "get user ids request validation failed",
        "key is not found",
    ),
};

pub static GET_TOP_KEYS: Endpoint = Endpoint {
    handler: "get_top_keys_handler",
    operation: "get_top_key_reporting",
    instance: "/api/reporting/top-keys",
    purpose: "retrieving top keys",
    problems: ProblemTable::new(
        KEY_REPORTING_MANAGER,
        "getting top keys error",
        "top keys request validation failed",
        "keys are not found",
    ),
};

pub static GET_CUSTOM_IDS: Endpoint = Endpoint {
    handler: "get_custom_ids_handler",
    operation: "get_custom_ids",
    instance: "/api/reporting/custom-ids",
    purpose: "retrieving custom ids",
    problems: ProblemTable::new(
        EVENT_MANAGER,
        "getting custom ids error",
        "get custom ids request validation failed",
        "key is not found",
    ),
};

/// Event listing filters; one of `userId`, `customId` or `keyIds` is required
#[async_trait]
impl Decode for EventQuery {
    async fn decode(input: Input) -> Result<Self, DecodeError> {
        let query = input.query();

        let filters = Self {
            user_id: query.first("userId"),
            custom_id: query.first("customId"),
            key_ids: query.all("keyIds"),
            start: query.parse_as("start")?,
            end: query.parse_as("end")?,
        };

        if filters.user_id.is_none() && filters.custom_id.is_none() && filters.key_ids.is_empty() {
            return Err(DecodeError::MissingFilters);
        }

        Ok(filters)
    }
}

/// The required `keyId` query parameter
pub struct KeyIdParam(pub String);

#[async_trait]
impl Decode for KeyIdParam {
    async fn decode(input: Input) -> Result<Self, DecodeError> {
        input.query().required("keyId").map(Self)
    }
}

pub async fn get_key_reporting_handler(State(state): State<AdminState>, request: Request) -> Response {
    let reporting = state.managers.key_reporting.clone();
    GET_KEY_REPORTING
        .respond_json(&state, request, |PathId(id): PathId| async move {
            reporting.get_key_reporting(&id).await
        })
        .await
}

pub async fn get_event_metrics_handler(State(state): State<AdminState>, request: Request) -> Response {
    let reporting = state.managers.key_reporting.clone();
    GET_EVENT_METRICS
        .respond_json(&state, request, |JsonBody(query): JsonBody<ReportingRequest>| async move {
            reporting.get_event_reporting(query).await
        })
        .await
}

pub async fn get_event_metrics_by_day_handler(State(state): State<AdminState>, request: Request) -> Response {
    let reporting = state.managers.key_reporting.clone();
    GET_EVENT_METRICS_BY_DAY
        .respond_json(&state, request, |JsonBody(query): JsonBody<ReportingRequest>| async move {
            reporting.get_aggregated_event_by_day_reporting(query).await
        })
        .await
}

pub async fn get_events_handler(State(state): State<AdminState>, request: Request) -> Response {
    let reporting = state.managers.key_reporting.clone();
    GET_EVENTS
        .respond_json(&state, request, |query: EventQuery| async move {
            reporting.get_events(query).await
        })
        .await
}

pub async fn get_events_v2_handler(State(state): State<AdminState>, request: Request) -> Response {
    let reporting = state.managers.key_reporting.clone();
    GET_EVENTS_V2
        .respond_json(&state, request, |JsonBody(query): JsonBody<EventRequest>| async move {
            reporting.get_events_v2(query).await
        })
        .await
}

pub async fn get_user_ids_handler(State(state): State<AdminState>, request: Request) -> Response {
    let reporting = state.managers.key_reporting.clone();
    GET_USER_IDS
        .respond_json(&state, request, |KeyIdParam(key_id): KeyIdParam| async move {
            reporting.get_user_ids(&key_id).await
        })
        .await
}

pub async fn get_top_keys_handler(State(state): State<AdminState>, request: Request) -> Response {
    let reporting = state.managers.key_reporting.clone();
    GET_TOP_KEYS
        .respond_json(&state, request, |JsonBody(query): JsonBody<KeyReportingRequest>| async move {
            reporting.get_top_key_reporting(query).await
        })
        .await
}

pub async fn get_custom_ids_handler(State(state): State<AdminState>, request: Request) -> Response {
    let reporting = state.managers.key_reporting.clone();
    GET_CUSTOM_IDS
        .respond_json(&state, request, |KeyIdParam(key_id): KeyIdParam| async move {
            reporting.get_custom_ids(&key_id).await
        })
        .await
}
