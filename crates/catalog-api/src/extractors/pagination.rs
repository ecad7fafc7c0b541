//! Query parameters for the audit log endpoint.

use serde::{Deserialize, Serialize};

use catalog_core::error::AppError;
use catalog_core::types::id::{PluginId, ProjectId, TeamId, UserId};
use catalog_core::types::pagination::{DEFAULT_PAGE_SIZE, PageRequest};
use catalog_database::LogFilter;
use catalog_entity::log::EventKind;
use catalog_service::LogQuery;

/// `GET /api/logs` query string.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LogParams {
    /// Only entries about this project.
    pub project_id: Option<ProjectId>,
    /// Only entries about this team.
    pub team_id: Option<TeamId>,
    /// Only entries about this plugin.
    pub plugin_id: Option<PluginId>,
    /// Only entries about this user.
    pub user_id: Option<UserId>,
    /// Only entries of this kind, e.g. `updated_project`.
    pub kind: Option<String>,
    /// Substring of the rendered message.
    pub search: Option<String>,
    /// Page number (1-based, default: 1).
    pub page: Option<u64>,
    /// Items per page (default: 25, max: 100).
    pub per_page: Option<u64>,
}

impl LogParams {
    /// Split into the service query and the page request.
    pub fn into_query(self) -> Result<(LogQuery, PageRequest), AppError> {
        let event_kind = self
            .kind
            .as_deref()
            .filter(|k| !k.is_empty())
            .map(str::parse::<EventKind>)
            .transpose()?;

        let query = LogQuery {
            filter: LogFilter {
                project_id: self.project_id,
                team_id: self.team_id,
                plugin_id: self.plugin_id,
                user_id: self.user_id,
                event_kind,
            },
            search: self.search,
        };
        let page = PageRequest::new(
            self.page.unwrap_or(1),
            self.per_page.unwrap_or(DEFAULT_PAGE_SIZE),
        );
        Ok((query, page))
    }
}
