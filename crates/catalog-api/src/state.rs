//! Application state shared across all handlers.

use std::sync::Arc;

use catalog_core::config::CatalogConfig;
use catalog_core::traits::clock::Clock;
use catalog_database::CatalogStore;
use catalog_service::{
    AuditLedger, LogService, PluginService, ProjectService, TeamService, UserService,
};

/// Services handed to every handler via `State<AppState<S>>`.
///
/// All services share one store and one ledger, so every command's log
/// entries carry the same clock as its record timestamps.
#[derive(Debug)]
pub struct AppState<S: CatalogStore> {
    /// Store used for health checks.
    pub store: Arc<S>,
    /// Project commands.
    pub projects: ProjectService<S>,
    /// Team commands.
    pub teams: TeamService<S>,
    /// Global plugin commands.
    pub plugins: PluginService<S>,
    /// User commands.
    pub users: UserService<S>,
    /// Audit log queries.
    pub logs: LogService<S>,
}

impl<S: CatalogStore> Clone for AppState<S> {
    fn clone(&self) -> Self {
        Self {
            store: Arc::clone(&self.store),
            projects: self.projects.clone(),
            teams: self.teams.clone(),
            plugins: self.plugins.clone(),
            users: self.users.clone(),
            logs: self.logs.clone(),
        }
    }
}

impl<S: CatalogStore> AppState<S> {
    /// Wire every service to `store`, stamping log entries with `clock`.
    pub fn new(store: Arc<S>, clock: Arc<dyn Clock>, limits: CatalogConfig) -> Self {
        let ledger = Arc::new(AuditLedger::new(clock));
        Self {
            projects: ProjectService::new(Arc::clone(&store), Arc::clone(&ledger), limits.clone()),
            teams: TeamService::new(Arc::clone(&store), Arc::clone(&ledger), limits.clone()),
            plugins: PluginService::new(Arc::clone(&store), Arc::clone(&ledger), limits.clone()),
            users: UserService::new(Arc::clone(&store), ledger, limits),
            logs: LogService::new(Arc::clone(&store)),
            store,
        }
    }
}
