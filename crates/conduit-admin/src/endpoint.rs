//! The generic admin endpoint
//!
//! Every admin operation runs the same sequence: check the request context,
//! decode, call one manager operation, then write either the result or a
//! classified problem. Telemetry is recorded on every path. A concrete
//! endpoint only supplies its decode type, its manager call, and its
//! [`ProblemTable`].

use std::future::Future;

use axum::Json;
use axum::extract::Request;
use axum::response::{IntoResponse, Response};
use conduit_core::{ManagerError, RequestContext};
use conduit_telemetry::{RequestTimer, redact};
use http::StatusCode;
use serde::Serialize;

use crate::classify::{self, Failure};
use crate::decode::{Decode, Input};
use crate::problem::ProblemTable;
use crate::state::AdminState;

/// Static description of one admin operation
#[derive(Debug)]
pub struct Endpoint {
    /// Telemetry name, e.g. `delete_key_handler`
    pub handler: &'static str,
    /// Manager operation, used for the `<operation>_error` counter
    pub operation: &'static str,
    /// Route template reported as the problem `instance`
    pub instance: &'static str,
    /// What the endpoint is for, e.g. `deleting a key`
    pub purpose: &'static str,
    pub problems: ProblemTable,
}

impl Endpoint {
    /// Run the endpoint and write the manager's result as JSON
    pub async fn respond_json<D, T, F, Fut>(&self, state: &AdminState, request: Request, invoke: F) -> Response
    where
        D: Decode,
        T: Serialize,
        F: FnOnce(D) -> Fut + Send,
        Fut: Future<Output = Result<T, ManagerError>> + Send,
    {
        self.run(state, request, invoke, |value| Json(value).into_response())
            .await
    }

    /// Run the endpoint and write an empty 200 on success
    pub async fn respond_empty<D, F, Fut>(&self, state: &AdminState, request: Request, invoke: F) -> Response
    where
        D: Decode,
        F: FnOnce(D) -> Fut + Send,
        Fut: Future<Output = Result<(), ManagerError>> + Send,
    {
        self.run(state, request, invoke, |()| StatusCode::OK.into_response())
            .await
    }

    async fn run<D, T, F, Fut, E>(&self, state: &AdminState, request: Request, invoke: F, encode: E) -> Response
    where
        D: Decode,
        F: FnOnce(D) -> Fut + Send,
        Fut: Future<Output = Result<T, ManagerError>> + Send,
        E: FnOnce(T) -> Response + Send,
    {
        let timer = state.recorder.start(self.handler);
        let (parts, body) = request.into_parts();

        let Some(request_id) = parts
            .extensions
            .get::<RequestContext>()
            .map(|context| context.request_id.clone())
        else {
            return self.fail(state, timer, None, classify::empty_context(self.instance));
        };

        let decoded = match D::decode(Input::new(parts, body, state.body_limit)).await {
            Ok(decoded) => decoded,
            Err(e) => {
                let failure = classify::decode_failure(&e, self.purpose, self.instance);
                return self.fail(state, timer, Some(&request_id), failure);
            }
        };

        match invoke(decoded).await {
            Ok(value) => {
                let response = encode(value);
                timer.success();
                response
            }
            Err(e) => {
                let failure = classify::classify(&e, &self.problems, self.instance);
                self.fail(state, timer, Some(&request_id), failure)
            }
        }
    }

    fn fail(&self, state: &AdminState, timer: RequestTimer, request_id: Option<&str>, failure: Failure) -> Response {
        tracing::debug!(
            handler = self.handler,
            operation = self.operation,
            category = failure.category.as_str(),
            request_id = request_id.unwrap_or("-"),
            detail = %redact(state.redaction, &failure.problem.detail),
            "admin request failed"
        );

        let category = failure.category;
        let response = failure.problem.into_response();
        timer.failure(self.operation, category.as_str());
        response
    }
}
