//! Appends log entries inside the caller's transaction.

use std::sync::Arc;

use tracing::{debug, warn};

use catalog_audit::LogDraft;
use catalog_core::result::AppResult;
use catalog_core::traits::clock::Clock;
use catalog_core::types::actor::ActorContext;
use catalog_core::types::id::LogId;
use catalog_database::CatalogTransaction;

/// The append side of the audit log.
///
/// Entries are written through the same transaction as the mutation they
/// describe. Any failure is returned unchanged so the caller drops the
/// transaction and the mutation never becomes visible without its history.
#[derive(Clone)]
pub struct AuditLedger {
    clock: Arc<dyn Clock>,
}

impl std::fmt::Debug for AuditLedger {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuditLedger").finish_non_exhaustive()
    }
}

impl AuditLedger {
    /// Creates a ledger stamping entries with `clock`.
    pub fn new(clock: Arc<dyn Clock>) -> Self {
        Self { clock }
    }

    /// The ledger's time source, shared with the services so record
    /// timestamps and log timestamps agree.
    pub fn clock(&self) -> &dyn Clock {
        self.clock.as_ref()
    }

    /// Stamp and persist `drafts` in order.
    ///
    /// All drafts of one call share a timestamp. An actor id that no longer
    /// resolves to a user is recorded as absent; the display value is kept.
    /// A known actor without a display value is shown by the user's email.
    pub async fn append<T: CatalogTransaction>(
        &self,
        tx: &mut T,
        actor: &ActorContext,
        drafts: Vec<LogDraft>,
    ) -> AppResult<Vec<LogId>> {
        if drafts.is_empty() {
            return Ok(Vec::new());
        }

        let actor = match actor.current_actor_id() {
            Some(id) => match tx.find_user(id).await? {
                None => {
                    warn!(actor_id = %id, "Actor is not a known user, recording display only");
                    ActorContext::new(None, actor.current_actor_display())
                }
                Some(user) if actor.current_actor_display().trim().is_empty() => {
                    ActorContext::new(Some(id), user.email)
                }
                Some(_) => actor.clone(),
            },
            None => actor.clone(),
        };

        let timestamp = self.clock.utc_now();
        let mut ids = Vec::with_capacity(drafts.len());
        for draft in drafts {
            let entry = draft.into_new_entry(&actor, timestamp);
            let id = tx.insert_log(&entry).await?;
            debug!(log_id = %id, kind = %entry.event_kind, subject = %entry.subject.name(), "Audit entry staged");
            ids.push(id);
        }
        Ok(ids)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{actor, clock_at, start};
    use catalog_core::types::id::{TeamId, UserId};
    use catalog_database::{CatalogStore, LogFilter, MemoryCatalogStore};
    use catalog_entity::log::{FieldChange, LogSubject};
    use catalog_entity::user::{CreateUser, UserRole};

    fn draft(name: &str) -> LogDraft {
        LogDraft {
            subject: LogSubject::team(TeamId(1), name),
            event_kind: catalog_entity::log::EventKind::AddedTeam,
            changes: vec![FieldChange::new("TeamName", "", name)],
        }
    }

    #[tokio::test]
    async fn test_append_stamps_time_and_actor() {
        let store = MemoryCatalogStore::new();
        let ledger = AuditLedger::new(clock_at(start()));

        let mut tx = store.begin().await.unwrap();
        let user = tx
            .insert_user(
                &CreateUser {
                    email: "admin@example.com".into(),
                    full_name: "Admin".into(),
                    role: UserRole::Admin,
                    password_hash: None,
                },
                start(),
            )
            .await
            .unwrap();
        let who = ActorContext::new(Some(user.id), "admin@example.com");
        let ids = ledger
            .append(&mut tx, &who, vec![draft("Core"), draft("Edge")])
            .await
            .unwrap();
        tx.commit().await.unwrap();

        assert_eq!(ids.len(), 2);
        let logs = store.query_logs(&LogFilter::default()).await.unwrap();
        assert!(logs.iter().all(|e| e.timestamp == start()));
        assert!(logs.iter().all(|e| e.actor_id == Some(user.id)));
        assert!(logs.iter().all(|e| e.actor_display == "admin@example.com"));
    }

    #[tokio::test]
    async fn test_id_only_actor_is_shown_by_email() {
        let store = MemoryCatalogStore::new();
        let ledger = AuditLedger::new(clock_at(start()));

        let mut tx = store.begin().await.unwrap();
        let user = tx
            .insert_user(
                &CreateUser {
                    email: "ada@example.com".into(),
                    full_name: "Ada".into(),
                    role: UserRole::Member,
                    password_hash: None,
                },
                start(),
            )
            .await
            .unwrap();
        let who = ActorContext::new(Some(user.id), "");
        ledger.append(&mut tx, &who, vec![draft("Core")]).await.unwrap();
        tx.commit().await.unwrap();

        let logs = store.query_logs(&LogFilter::default()).await.unwrap();
        assert_eq!(logs[0].actor_id, Some(user.id));
        assert_eq!(logs[0].actor_display, "ada@example.com");
    }

    #[tokio::test]
    async fn test_unknown_actor_id_is_dropped() {
        let store = MemoryCatalogStore::new();
        let ledger = AuditLedger::new(clock_at(start()));

        let mut tx = store.begin().await.unwrap();
        let who = ActorContext::new(Some(UserId(404)), "ghost@example.com");
        ledger.append(&mut tx, &who, vec![draft("Core")]).await.unwrap();
        tx.commit().await.unwrap();

        let logs = store.query_logs(&LogFilter::default()).await.unwrap();
        assert_eq!(logs[0].actor_id, None);
        assert_eq!(logs[0].actor_display, "ghost@example.com");
    }

    #[tokio::test]
    async fn test_append_failure_propagates() {
        let store = MemoryCatalogStore::new();
        store.fail_log_writes(true);
        let ledger = AuditLedger::new(clock_at(start()));

        let mut tx = store.begin().await.unwrap();
        let result = ledger.append(&mut tx, &actor(), vec![draft("Core")]).await;
        assert!(result.is_err());
    }
}
