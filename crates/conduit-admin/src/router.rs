//! Declarative admin route table and router assembly

use std::collections::HashSet;
use std::sync::Arc;

use axum::Router;
use axum::response::IntoResponse;
use axum::routing::{MethodFilter, MethodRouter, get};
use conduit_config::ServerConfig;
use http::{Method, StatusCode, Uri};
use secrecy::SecretString;
use tower_http::trace::TraceLayer;

use crate::endpoint::Endpoint;
use crate::error::ServerError;
use crate::handlers::{custom_providers, keys, policies, provider_settings, reporting, routes, users};
use crate::problem::ProblemResponse;
use crate::state::AdminState;
use crate::{auth, health, request_context, static_assets};

/// One admin operation bound to a method and route template
pub struct RouteEntry {
    pub method: Method,
    pub endpoint: &'static Endpoint,
    handler: MethodRouter<AdminState>,
}

impl RouteEntry {
    /// Route template in axum syntax (`:id` becomes `{id}`)
    pub fn path(&self) -> String {
        axum_path(self.endpoint.instance)
    }
}

macro_rules! route {
    ($method:ident, $endpoint:expr, $handler:expr) => {
        RouteEntry {
            method: Method::$method,
            endpoint: &$endpoint,
            handler: axum::routing::on(MethodFilter::$method, $handler),
        }
    };
}

/// Every admin API operation
pub fn route_table() -> Vec<RouteEntry> {
    vec![
        route!(GET, keys::GET_KEYS, keys::get_keys_handler),
        route!(POST, keys::GET_KEYS_V2, keys::get_keys_v2_handler),
        route!(PUT, keys::CREATE_KEY, keys::create_key_handler),
        route!(PATCH, keys::UPDATE_KEY, keys::update_key_handler),
        route!(DELETE, keys::DELETE_KEY, keys::delete_key_handler),
        route!(GET, reporting::GET_KEY_REPORTING, reporting::get_key_reporting_handler),
        route!(POST, reporting::GET_EVENT_METRICS, reporting::get_event_metrics_handler),
        route!(POST, reporting::GET_EVENT_METRICS_BY_DAY, reporting::get_event_metrics_by_day_handler),
        route!(GET, reporting::GET_EVENTS, reporting::get_events_handler),
        route!(POST, reporting::GET_EVENTS_V2, reporting::get_events_v2_handler),
        route!(GET, reporting::GET_USER_IDS, reporting::get_user_ids_handler),
        route!(POST, reporting::GET_TOP_KEYS, reporting::get_top_keys_handler),
        route!(GET, reporting::GET_CUSTOM_IDS, reporting::get_custom_ids_handler),
        route!(PUT, provider_settings::CREATE_PROVIDER_SETTING, provider_settings::create_provider_setting_handler),
        route!(GET, provider_settings::GET_PROVIDER_SETTINGS, provider_settings::get_provider_settings_handler),
        route!(PATCH, provider_settings::UPDATE_PROVIDER_SETTING, provider_settings::update_provider_setting_handler),
        route!(POST, custom_providers::CREATE_CUSTOM_PROVIDER, custom_providers::create_custom_provider_handler),
        route!(GET, custom_providers::GET_CUSTOM_PROVIDERS, custom_providers::get_custom_providers_handler),
        route!(PATCH, custom_providers::UPDATE_CUSTOM_PROVIDER, custom_providers::update_custom_provider_handler),
        route!(POST, routes::CREATE_ROUTE, routes::create_route_handler),
        route!(GET, routes::GET_ROUTE, routes::get_route_handler),
        route!(GET, routes::GET_ROUTES, routes::get_routes_handler),
        route!(DELETE, routes::DELETE_ROUTE, routes::delete_route_handler),
        route!(POST, policies::CREATE_POLICY, policies::create_policy_handler),
        route!(PATCH, policies::UPDATE_POLICY, policies::update_policy_handler),
        route!(GET, policies::GET_POLICIES, policies::get_policies_handler),
        route!(POST, users::CREATE_USER, users::create_user_handler),
        route!(PATCH, users::UPDATE_USER, users::update_user_handler),
        route!(PATCH, users::UPDATE_USER_VIA_TAGS, users::update_user_via_tags_handler),
        route!(GET, users::GET_USERS, users::get_users_handler),
    ]
}

/// Build the full admin router: API table, health, static assets,
/// fallbacks and middleware
///
/// # Errors
///
/// Returns an error if the health path is already taken by an admin route
pub fn build_router(state: AdminState, server: &ServerConfig) -> Result<Router, ServerError> {
    let mut api = Router::new();
    let mut taken = HashSet::new();

    for entry in route_table() {
        let path = entry.path();

        tracing::info!(
            method = %entry.method,
            path = entry.endpoint.instance,
            "admin route set up for {}",
            entry.endpoint.purpose
        );

        // `/keys/` reaches the handler without an id
        if let Some(bare) = path.strip_suffix("{id}") {
            api = api.route(bare, entry.handler.clone());
            taken.insert(bare.to_owned());
        }

        api = api.route(&path, entry.handler);
        taken.insert(path);
    }

    if server.health.enabled {
        if taken.contains(&server.health.path) {
            return Err(ServerError::RouteConflict(server.health.path.clone()));
        }

        api = api.route(&server.health.path, get(health::health_handler));
    }

    let mut app = api.with_state(state);

    if server.static_assets.enabled {
        app = app.merge(static_assets::static_router(&server.static_assets));
    }

    app = app
        .fallback(route_not_found)
        .method_not_allowed_fallback(method_not_allowed);

    if let Some(ref password) = server.admin_password {
        let password: SecretString = password.clone();
        let public_paths: Arc<[String]> = if server.health.enabled {
            Arc::from([server.health.path.clone()])
        } else {
            Arc::from([])
        };

        app = app.layer(axum::middleware::from_fn(move |req, next| {
            let password = password.clone();
            let public_paths = Arc::clone(&public_paths);
            async move { auth::admin_auth_middleware(password, public_paths, req, next).await }
        }));
    }

    Ok(app
        .layer(axum::middleware::from_fn(request_context::request_context_middleware))
        .layer(TraceLayer::new_for_http()))
}

/// Convert a `:name` route template to axum's `{name}` syntax
pub fn axum_path(template: &str) -> String {
    template
        .split('/')
        .map(|segment| match segment.strip_prefix(':') {
            Some(name) => format!("{{{name}}}"),
            None => segment.to_owned(),
        })
        .collect::<Vec<_>>()
        .join("/")
}

pub fn route_not_found_problem(path: &str) -> ProblemResponse {
    ProblemResponse::new(
        StatusCode::NOT_FOUND,
        "/errors/route-not-found",
        "route is not found",
        format!("no admin route matches {path}"),
        path,
    )
}

pub fn method_not_allowed_problem(method: &Method, path: &str) -> ProblemResponse {
    ProblemResponse::new(
        StatusCode::METHOD_NOT_ALLOWED,
        "/errors/method-not-allowed",
        "method is not allowed",
        format!("{method} is not supported for {path}"),
        path,
    )
}

async fn route_not_found(uri: Uri) -> impl IntoResponse {
    route_not_found_problem(uri.path())
}

async fn method_not_allowed(method: Method, uri: Uri) -> impl IntoResponse {
    method_not_allowed_problem(&method, uri.path())
}
