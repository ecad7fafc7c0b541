//! Reading the audit log.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::debug;

use catalog_audit::render;
use catalog_core::result::AppResult;
use catalog_core::types::id::{LogId, UserId};
use catalog_core::types::pagination::{PageRequest, PageResponse};
use catalog_database::{CatalogStore, LogFilter};
use catalog_entity::log::{EventKind, FieldChange, LogEntry, LogSubject};

/// Filters accepted by [`LogService::query`].
#[derive(Debug, Clone, Default)]
pub struct LogQuery {
    /// Structured filters pushed down to the store.
    pub filter: LogFilter,
    /// Case-insensitive substring matched against the rendered message.
    pub search: Option<String>,
}

/// A log entry together with its rendered message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RenderedLogEntry {
    /// Entry id.
    pub id: LogId,
    /// When the entry was appended.
    pub timestamp: DateTime<Utc>,
    /// Acting user, while that user still exists.
    pub actor_id: Option<UserId>,
    /// Actor display snapshot.
    pub actor_display: String,
    /// What the entry is about.
    pub subject: LogSubject,
    /// Event tag.
    pub event_kind: EventKind,
    /// Human-readable line.
    pub message: String,
    /// Field-level changes.
    pub changes: Vec<FieldChange>,
}

impl From<LogEntry> for RenderedLogEntry {
    fn from(entry: LogEntry) -> Self {
        let message = render(&entry);
        Self {
            id: entry.id,
            timestamp: entry.timestamp,
            actor_id: entry.actor_id,
            actor_display: entry.actor_display,
            subject: entry.subject,
            event_kind: entry.event_kind,
            message,
            changes: entry.changes,
        }
    }
}

/// Read side of the audit log.
#[derive(Debug)]
pub struct LogService<S: CatalogStore> {
    store: Arc<S>,
}

impl<S: CatalogStore> Clone for LogService<S> {
    fn clone(&self) -> Self {
        Self {
            store: Arc::clone(&self.store),
        }
    }
}

impl<S: CatalogStore> LogService<S> {
    /// Creates a new log service.
    pub fn new(store: Arc<S>) -> Self {
        Self { store }
    }

    /// Rendered entries matching `query`, newest first.
    ///
    /// Without a search term only the requested page is read from the
    /// store. The search term is applied after rendering, so it matches the
    /// template text as well as recorded values.
    pub async fn query(
        &self,
        query: &LogQuery,
        page: PageRequest,
    ) -> AppResult<PageResponse<RenderedLogEntry>> {
        let needle = query
            .search
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_lowercase);

        let Some(needle) = needle else {
            let entries = self.store.page_logs(&query.filter, &page).await?;
            debug!(total = entries.total_items, page = page.page, "Log query");
            return Ok(entries.map(RenderedLogEntry::from));
        };

        let rendered: Vec<RenderedLogEntry> = self
            .store
            .query_logs(&query.filter)
            .await?
            .into_iter()
            .map(RenderedLogEntry::from)
            .filter(|entry| entry.message.to_lowercase().contains(&needle))
            .collect();

        debug!(matched = rendered.len(), page = page.page, "Log search");
        Ok(PageResponse::from_all(rendered, &page))
    }
}
