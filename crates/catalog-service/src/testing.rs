//! Shared fixtures for service tests.

use std::sync::Arc;

use chrono::{DateTime, TimeZone, Utc};

use catalog_core::config::CatalogConfig;
use catalog_core::traits::clock::FixedClock;
use catalog_core::types::actor::ActorContext;
use catalog_core::types::id::PluginId;
use catalog_database::{CatalogStore, LogFilter, MemoryCatalogStore};
use catalog_entity::log::LogEntry;

use crate::audit::{AuditLedger, LogService};
use crate::plugin::{CreatePluginRequest, PluginService};
use crate::project::ProjectService;
use crate::team::TeamService;
use crate::user::UserService;

pub(crate) fn start() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 3, 1, 9, 0, 0).unwrap()
}

pub(crate) fn clock_at(at: DateTime<Utc>) -> Arc<FixedClock> {
    Arc::new(FixedClock::new(at))
}

pub(crate) fn actor() -> ActorContext {
    ActorContext::new(None, "admin@example.com")
}

/// Services wired to one in-memory store and a frozen clock.
pub(crate) struct Harness {
    pub store: Arc<MemoryCatalogStore>,
    pub clock: Arc<FixedClock>,
    pub ledger: Arc<AuditLedger>,
    pub limits: CatalogConfig,
}

impl Harness {
    pub fn new() -> Self {
        let clock = clock_at(start());
        Self {
            store: Arc::new(MemoryCatalogStore::new()),
            ledger: Arc::new(AuditLedger::new(clock.clone())),
            clock,
            limits: CatalogConfig::default(),
        }
    }

    pub fn projects(&self) -> ProjectService<MemoryCatalogStore> {
        ProjectService::new(self.store.clone(), self.ledger.clone(), self.limits.clone())
    }

    pub fn teams(&self) -> TeamService<MemoryCatalogStore> {
        TeamService::new(self.store.clone(), self.ledger.clone(), self.limits.clone())
    }

    pub fn plugins(&self) -> PluginService<MemoryCatalogStore> {
        PluginService::new(self.store.clone(), self.ledger.clone(), self.limits.clone())
    }

    pub fn users(&self) -> UserService<MemoryCatalogStore> {
        UserService::new(self.store.clone(), self.ledger.clone(), self.limits.clone())
    }

    pub fn logs(&self) -> LogService<MemoryCatalogStore> {
        LogService::new(self.store.clone())
    }

    /// Register a global plugin and return its id.
    pub async fn plugin(&self, name: &str) -> PluginId {
        self.plugins()
            .create(
                &actor(),
                CreatePluginRequest {
                    name: name.into(),
                    description: None,
                },
            )
            .await
            .unwrap()
            .id
    }

    /// Every committed entry in append order.
    pub async fn entries_oldest_first(&self) -> Vec<LogEntry> {
        let mut entries = self.store.query_logs(&LogFilter::default()).await.unwrap();
        entries.reverse();
        entries
    }
}
