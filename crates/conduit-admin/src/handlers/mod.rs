//! Admin API endpoints, one module per resource family
//!
//! Each endpoint is a static [`Endpoint`](crate::endpoint::Endpoint)
//! descriptor plus a thin axum handler that names the manager call.

pub mod custom_providers;
pub mod keys;
pub mod policies;
pub mod provider_settings;
pub mod reporting;
pub mod routes;
pub mod users;
