//! Writing and reading the audit log.

pub mod ledger;
pub mod query;

pub use ledger::AuditLedger;
pub use query::{LogQuery, LogService, RenderedLogEntry};
