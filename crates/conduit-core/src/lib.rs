//! Shared types for the conduit control plane
//!
//! Holds the manager traits the admin server dispatches to, the value
//! objects they exchange, and the closed error kind every manager failure
//! carries.

#![allow(clippy::must_use_candidate, clippy::missing_errors_doc)]

mod context;
mod error;
pub mod manager;
pub mod model;

pub use context::RequestContext;
pub use error::{ErrorKind, ManagerError};
pub use manager::{
    CustomProvidersManager, KeyManager, KeyReportingManager, Managers, PoliciesManager, ProviderSettingsManager,
    RouteManager, UserManager,
};
