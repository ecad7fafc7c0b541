//! # catalog-audit
//!
//! The change-tracking engine behind the catalog's audit log.
//!
//! Everything here is synchronous and free of I/O: the service layer loads
//! records, asks this crate what changed and how to classify it, and hands
//! the resulting [`LogDraft`]s to the ledger inside its transaction.
//!
//! - [`format`]: canonical text form of a field value, used for both
//!   equality and display.
//! - [`changeset`]: ordered field-level diffs and creation/removal snapshots.
//! - [`reconcile`]: keyed matching of a stored collection against a proposed
//!   one.
//! - [`classify`]: turns a diff into an [`EventKind`](catalog_entity::log::EventKind),
//!   special-casing archive flag flips.
//! - [`render`]: the human-readable line shown for an entry.

pub mod changeset;
pub mod classify;
pub mod draft;
pub mod format;
pub mod reconcile;
pub mod render;
pub mod tracked;

pub use changeset::{build_scalar_diff, creation_snapshot, removal_snapshot};
pub use classify::{ChangeShape, FlagTransition, classify, compute_and_classify};
pub use draft::LogDraft;
pub use format::{FieldValue, format_value};
pub use reconcile::{MatchedPair, Reconciliation, reconcile};
pub use render::{render, render_message};
pub use tracked::{AttachmentSnapshot, Audited, ProjectAuditView, Property};
