//! In-memory managers
//!
//! Every manager trait has a `DashMap`-backed implementation here so the
//! admin server can run standalone. Nothing is persisted across restarts.

#![allow(clippy::must_use_candidate, clippy::missing_errors_doc)]

mod custom_providers;
mod keys;
mod policies;
mod provider_settings;
mod reporting;
mod routes;
mod users;

use std::sync::Arc;

use conduit_core::Managers;

pub use custom_providers::MemoryCustomProviders;
pub use keys::MemoryKeys;
pub use policies::MemoryPolicies;
pub use provider_settings::{KNOWN_PROVIDERS, MemoryProviderSettings};
pub use reporting::MemoryReporting;
pub use routes::MemoryRoutes;
pub use users::MemoryUsers;

/// Every manager backed by memory, plus the event log for seeding reports
pub struct InMemory {
    pub managers: Managers,
    pub reporting: Arc<MemoryReporting>,
}

impl InMemory {
    pub fn new() -> Self {
        let reporting = Arc::new(MemoryReporting::default());
        let settings = Arc::new(MemoryProviderSettings::default());

        let managers = Managers {
            keys: Arc::new(MemoryKeys::new(settings.clone())),
            key_reporting: reporting.clone(),
            provider_settings: settings,
            custom_providers: Arc::new(MemoryCustomProviders::default()),
            routes: Arc::new(MemoryRoutes::default()),
            policies: Arc::new(MemoryPolicies::default()),
            users: Arc::new(MemoryUsers::default()),
        };

        Self { managers, reporting }
    }
}

impl Default for InMemory {
    fn default() -> Self {
        Self::new()
    }
}

/// Current time in unix seconds
fn now() -> i64 {
    jiff::Timestamp::now().as_second()
}

fn new_id() -> String {
    uuid::Uuid::new_v4().to_string()
}

/// True when the two tag lists share at least one tag
fn shares_tag(tags: &[String], wanted: &[String]) -> bool {
    wanted.iter().any(|tag| tags.contains(tag))
}

/// Apply `offset` then `limit` (non-positive limit means no limit)
fn page<T>(items: Vec<T>, offset: i64, limit: i64) -> Vec<T> {
    let offset = usize::try_from(offset).unwrap_or(0);
    let iter = items.into_iter().skip(offset);

    match usize::try_from(limit) {
        Ok(limit) if limit > 0 => iter.take(limit).collect(),
        _ => iter.collect(),
    }
}
