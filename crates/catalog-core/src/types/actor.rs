//! The identity credited with a mutation.

use serde::{Deserialize, Serialize};

use crate::types::id::UserId;

/// Display name recorded when no human actor is attached to a command.
pub const SYSTEM_ACTOR: &str = "System";

/// Who is performing the current command.
///
/// Built by the request pipeline and passed explicitly into every command
/// handler and into the audit ledger. The display value is snapshotted into
/// each log entry at write time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActorContext {
    actor_id: Option<UserId>,
    display: String,
}

impl ActorContext {
    /// Creates an actor context for a known user.
    pub fn new(actor_id: Option<UserId>, display: impl Into<String>) -> Self {
        Self {
            actor_id,
            display: display.into(),
        }
    }

    /// Actor used for commands triggered by the system itself.
    pub fn system() -> Self {
        Self::new(None, SYSTEM_ACTOR)
    }

    /// The acting user's id, if the actor is a catalog user.
    pub fn current_actor_id(&self) -> Option<UserId> {
        self.actor_id
    }

    /// The acting user's display value, typically an email address.
    pub fn current_actor_display(&self) -> &str {
        &self.display
    }
}
