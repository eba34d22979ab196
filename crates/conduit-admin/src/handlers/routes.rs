use axum::extract::{Request, State};
use axum::response::Response;
use conduit_core::model::Route;

use crate::decode::{JsonBody, PathId};
use crate::endpoint::Endpoint;
use crate::problem::ProblemTable;
use crate::state::AdminState;

const ROUTE_MANAGER: &str = "/errors/route-manager";

pub static CREATE_ROUTE: Endpoint = Endpoint {
    handler: "create_route_handler",
    operation: "create_route",
    instance: "/api/routes",
    purpose: "creating a route",
    problems: ProblemTable::new(
        ROUTE_MANAGER,
        "creating a route error",
        "route validation failed",
        "route is not found",
    ),
};

pub static GET_ROUTE: Endpoint = Endpoint {
    handler: "get_route_handler",
    operation: "get_route",
    instance: "/api/routes/:id",
    purpose: "retrieving a route",
    problems: ProblemTable::new(
        ROUTE_MANAGER,
        "getting a route error",
        "route validation failed",
        "route is not found",
    ),
};

pub static GET_ROUTES: Endpoint = Endpoint {
    handler: "get_routes_handler",
    operation: "get_routes",
    instance: "/api/routes",
    purpose: "retrieving routes",
    problems: ProblemTable::new(
        ROUTE_MANAGER,
        "getting routes error",
        "route validation failed",
        "routes are not found",
    ),
};

pub static DELETE_ROUTE: Endpoint = Endpoint {
    handler: "delete_route_handler",
    operation: "delete_route",
    instance: "/api/routes/:id",
    purpose: "deleting a route",
    problems: ProblemTable::new(
        ROUTE_MANAGER,
        "deleting a route error",
        "route validation failed",
        "route is not found",
    ),
};

pub async fn create_route_handler(State(state): State<AdminState>, request: Request) -> Response {
    let routes = state.managers.routes.clone();
    CREATE_ROUTE
        .respond_json(&state, request, |JsonBody(route): JsonBody<Route>| async move {
            routes.create_route(route).await
        })
        .await
}

pub async fn get_route_handler(State(state): State<AdminState>, request: Request) -> Response {
    let routes = state.managers.routes.clone();
    GET_ROUTE
        .respond_json(&state, request, |PathId(id): PathId| async move { routes.get_route(&id).await })
        .await
}

pub async fn get_routes_handler(State(state): State<AdminState>, request: Request) -> Response {
    let routes = state.managers.routes.clone();
    GET_ROUTES
        .respond_json(&state, request, |(): ()| async move { routes.get_routes().await })
        .await
}

pub async fn delete_route_handler(State(state): State<AdminState>, request: Request) -> Response {
    let routes = state.managers.routes.clone();
    DELETE_ROUTE
        .respond_empty(&state, request, |PathId(id): PathId| async move { routes.delete_route(&id).await })
        .await
}
