//! Audit log repository.
//!
//! Entries live in `logs`; their ordered field changes live in
//! `log_changes` keyed by `(log_id, position)`. Rows are only ever
//! inserted.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use sqlx::{FromRow, PgConnection, PgPool};

use catalog_core::error::{AppError, ErrorKind};
use catalog_core::result::AppResult;
use catalog_core::types::id::{LogId, PluginId, ProjectId, TeamId, UserId};
use catalog_core::types::pagination::{PageRequest, PageResponse};
use catalog_entity::log::{
    EntityKind, EventKind, FieldChange, LogEntry, LogSubject, NewLogEntry, SubjectRef,
};

use crate::store::LogFilter;

/// One `logs` row.
#[derive(Debug, Clone, FromRow)]
struct LogRow {
    id: LogId,
    timestamp: DateTime<Utc>,
    actor_id: Option<UserId>,
    actor_display: String,
    event_kind: EventKind,
    project_id: Option<ProjectId>,
    team_id: Option<TeamId>,
    plugin_id: Option<PluginId>,
    user_id: Option<UserId>,
    subject_name: String,
}

impl LogRow {
    fn into_entry(self, changes: Vec<FieldChange>) -> LogEntry {
        let name = self.subject_name;
        let subject = match self.event_kind.entity() {
            EntityKind::Project | EntityKind::ProjectPlugin => LogSubject::Project(SubjectRef {
                id: self.project_id,
                name,
            }),
            EntityKind::Team => LogSubject::Team(SubjectRef {
                id: self.team_id,
                name,
            }),
            EntityKind::GlobalPlugin => LogSubject::Plugin(SubjectRef {
                id: self.plugin_id,
                name,
            }),
            EntityKind::User => LogSubject::User(SubjectRef {
                id: self.user_id,
                name,
            }),
        };
        LogEntry {
            id: self.id,
            timestamp: self.timestamp,
            actor_id: self.actor_id,
            actor_display: self.actor_display,
            subject,
            event_kind: self.event_kind,
            changes,
        }
    }
}

#[derive(Debug, Clone, FromRow)]
struct ChangeRow {
    log_id: LogId,
    property: String,
    old_value: String,
    new_value: String,
}

/// Subject foreign keys split out into their columns.
#[derive(Debug, Default)]
struct SubjectColumns {
    project_id: Option<ProjectId>,
    team_id: Option<TeamId>,
    plugin_id: Option<PluginId>,
    user_id: Option<UserId>,
}

impl From<&LogSubject> for SubjectColumns {
    fn from(subject: &LogSubject) -> Self {
        match subject {
            LogSubject::Project(r) => Self {
                project_id: r.id,
                ..Self::default()
            },
            LogSubject::Team(r) => Self {
                team_id: r.id,
                ..Self::default()
            },
            LogSubject::Plugin(r) => Self {
                plugin_id: r.id,
                ..Self::default()
            },
            LogSubject::User(r) => Self {
                user_id: r.id,
                ..Self::default()
            },
        }
    }
}

/// SQL for the `logs` and `log_changes` tables.
#[derive(Debug, Clone, Copy, Default)]
pub struct LogRepository;

impl LogRepository {
    /// Append an entry and its changes.
    pub async fn create(conn: &mut PgConnection, entry: &NewLogEntry) -> AppResult<LogId> {
        let columns = SubjectColumns::from(&entry.subject);

        let id: LogId = sqlx::query_scalar(
            "INSERT INTO logs (\"timestamp\", actor_id, actor_display, event_kind, \
             project_id, team_id, plugin_id, user_id, subject_name) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9) RETURNING id",
        )
        .bind(entry.timestamp)
        .bind(entry.actor_id)
        .bind(&entry.actor_display)
        .bind(entry.event_kind)
        .bind(columns.project_id)
        .bind(columns.team_id)
        .bind(columns.plugin_id)
        .bind(columns.user_id)
        .bind(entry.subject.name())
        .fetch_one(&mut *conn)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to append log entry", e))?;

        for (position, change) in entry.changes.iter().enumerate() {
            let position = i32::try_from(position)
                .map_err(|_| AppError::internal("Too many changes in one log entry"))?;
            sqlx::query(
                "INSERT INTO log_changes (log_id, position, property, old_value, new_value) \
                 VALUES ($1, $2, $3, $4, $5)",
            )
            .bind(id)
            .bind(position)
            .bind(&change.property)
            .bind(&change.old_value)
            .bind(&change.new_value)
            .execute(&mut *conn)
            .await
            .map_err(|e| {
                AppError::with_source(ErrorKind::Database, "Failed to append log change", e)
            })?;
        }

        Ok(id)
    }

    /// Every entry matching `filter`, newest first, with its changes.
    pub async fn search(pool: &PgPool, filter: &LogFilter) -> AppResult<Vec<LogEntry>> {
        let (where_clause, _) = where_clause(filter);
        let select_sql = format!("{SELECT_LOGS} {where_clause} {ORDER_NEWEST}");

        let mut query = sqlx::query_as::<_, LogRow>(&select_sql);
        if let Some(id) = filter.project_id {
            query = query.bind(id);
        }
        if let Some(id) = filter.team_id {
            query = query.bind(id);
        }
        if let Some(id) = filter.plugin_id {
            query = query.bind(id);
        }
        if let Some(id) = filter.user_id {
            query = query.bind(id);
        }
        if let Some(kind) = filter.event_kind {
            query = query.bind(kind);
        }

        let rows = query
            .fetch_all(pool)
            .await
            .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to search logs", e))?;

        with_changes(pool, rows).await
    }

    /// One page of entries matching `filter`, newest first.
    ///
    /// Only the rows on the page and their changes are read.
    pub async fn search_page(
        pool: &PgPool,
        filter: &LogFilter,
        page: &PageRequest,
    ) -> AppResult<PageResponse<LogEntry>> {
        let (where_clause, param_idx) = where_clause(filter);
        let count_sql = format!("SELECT COUNT(*) FROM logs {where_clause}");
        let select_sql = format!(
            "{SELECT_LOGS} {where_clause} {ORDER_NEWEST} LIMIT ${param_idx} OFFSET ${}",
            param_idx + 1
        );

        let mut count_query = sqlx::query_scalar::<_, i64>(&count_sql);
        let mut select_query = sqlx::query_as::<_, LogRow>(&select_sql);

        if let Some(id) = filter.project_id {
            count_query = count_query.bind(id);
            select_query = select_query.bind(id);
        }
        if let Some(id) = filter.team_id {
            count_query = count_query.bind(id);
            select_query = select_query.bind(id);
        }
        if let Some(id) = filter.plugin_id {
            count_query = count_query.bind(id);
            select_query = select_query.bind(id);
        }
        if let Some(id) = filter.user_id {
            count_query = count_query.bind(id);
            select_query = select_query.bind(id);
        }
        if let Some(kind) = filter.event_kind {
            count_query = count_query.bind(kind);
            select_query = select_query.bind(kind);
        }

        let total = count_query.fetch_one(pool).await.map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to count log entries", e)
        })?;

        let rows = select_query
            .bind(i64::try_from(page.limit()).unwrap_or(i64::MAX))
            .bind(i64::try_from(page.offset()).unwrap_or(i64::MAX))
            .fetch_all(pool)
            .await
            .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to search logs", e))?;

        let entries = with_changes(pool, rows).await?;
        Ok(PageResponse::new(
            entries,
            page.page,
            page.page_size,
            u64::try_from(total).unwrap_or(0),
        ))
    }
}

const SELECT_LOGS: &str = "SELECT id, \"timestamp\", actor_id, actor_display, event_kind, \
                           project_id, team_id, plugin_id, user_id, subject_name FROM logs";
const ORDER_NEWEST: &str = "ORDER BY \"timestamp\" DESC, id DESC";

/// `WHERE` clause for the filters that are set, and the next free
/// parameter index.
fn where_clause(filter: &LogFilter) -> (String, u32) {
    let mut conditions = Vec::new();
    let mut param_idx = 1u32;

    for (column, set) in [
        ("project_id", filter.project_id.is_some()),
        ("team_id", filter.team_id.is_some()),
        ("plugin_id", filter.plugin_id.is_some()),
        ("user_id", filter.user_id.is_some()),
        ("event_kind", filter.event_kind.is_some()),
    ] {
        if set {
            conditions.push(format!("{column} = ${param_idx}"));
            param_idx += 1;
        }
    }

    let clause = if conditions.is_empty() {
        String::new()
    } else {
        format!("WHERE {}", conditions.join(" AND "))
    };
    (clause, param_idx)
}

/// Load the changes of `rows` and assemble entries in row order.
async fn with_changes(pool: &PgPool, rows: Vec<LogRow>) -> AppResult<Vec<LogEntry>> {
    if rows.is_empty() {
        return Ok(Vec::new());
    }

    let ids: Vec<i64> = rows.iter().map(|row| row.id.get()).collect();
    let change_rows = sqlx::query_as::<_, ChangeRow>(
        "SELECT log_id, property, old_value, new_value FROM log_changes \
         WHERE log_id = ANY($1) ORDER BY log_id, position",
    )
    .bind(ids)
    .fetch_all(pool)
    .await
    .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to load log changes", e))?;

    let mut changes: HashMap<LogId, Vec<FieldChange>> = HashMap::new();
    for row in change_rows {
        changes.entry(row.log_id).or_default().push(FieldChange {
            property: row.property,
            old_value: row.old_value,
            new_value: row.new_value,
        });
    }

    Ok(rows
        .into_iter()
        .map(|row| {
            let entry_changes = changes.remove(&row.id).unwrap_or_default();
            row.into_entry(entry_changes)
        })
        .collect())
}
