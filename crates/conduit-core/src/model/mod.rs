//! Value objects exchanged between the admin server and the managers
//!
//! Field names serialize in camelCase to keep the admin API's JSON
//! contract stable.

pub mod key;
pub mod policy;
pub mod provider;
pub mod reporting;
pub mod route;
pub mod user;

pub use key::{GetKeysResponse, KeyLimits, KeyReporting, KeyRequest, PathConfig, RequestKey, ResponseKey, TimeUnit, UpdateKey};
pub use policy::{Action, CustomRule, Policy, PolicyConfig, RegexRule, UpdatePolicy};
pub use provider::{CustomProvider, RouteConfig, Setting, UpdateCustomProvider, UpdateSetting};
pub use reporting::{
    DataPoint, DailyReportingResponse, Event, EventQuery, EventRequest, EventResponse, KeyCost, KeyReportingRequest,
    KeyReportingResponse, ReportingRequest, ReportingResponse,
};
pub use route::{CacheConfig, Route, Step};
pub use user::{UpdateUser, UpdateUserViaTags, User, UserQuery};
