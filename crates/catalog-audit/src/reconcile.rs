//! Keyed reconciliation of a stored collection against a proposed one.
//!
//! Items are matched by identity key, never by position: reordering a list
//! is not a change, and an item whose key changes is one removal plus one
//! addition.

use std::collections::HashMap;
use std::hash::Hash;

use catalog_entity::log::FieldChange;

use crate::changeset::build_scalar_diff;
use crate::tracked::Audited;

/// A stored item paired with the proposed item carrying the same key.
#[derive(Debug, Clone, PartialEq)]
pub struct MatchedPair<T> {
    /// The stored item.
    pub existing: T,
    /// The proposed item.
    pub incoming: T,
    /// Tracked differences between the two; empty if unchanged.
    pub changes: Vec<FieldChange>,
}

impl<T> MatchedPair<T> {
    /// Whether the proposed item edits the stored one.
    pub fn is_changed(&self) -> bool {
        !self.changes.is_empty()
    }
}

/// Outcome of [`reconcile`].
#[derive(Debug, Clone, PartialEq)]
pub struct Reconciliation<T> {
    /// Pairs present on both sides, in incoming order.
    pub matched: Vec<MatchedPair<T>>,
    /// Proposed items with no stored counterpart, in incoming order.
    pub added: Vec<T>,
    /// Stored items with no proposed counterpart, in existing order.
    pub removed: Vec<T>,
}

impl<T> Reconciliation<T> {
    /// Matched pairs whose tracked properties differ.
    pub fn updated(&self) -> impl Iterator<Item = &MatchedPair<T>> {
        self.matched.iter().filter(|pair| pair.is_changed())
    }

    /// Whether applying the proposal would change nothing.
    pub fn is_noop(&self) -> bool {
        self.added.is_empty() && self.removed.is_empty() && self.updated().next().is_none()
    }
}

/// Match `incoming` against `existing` by `key_fn`.
///
/// Each stored key can be matched once; a second proposed item with an
/// already consumed key counts as an addition. When the stored side holds
/// duplicate keys, the first occurrence is the one matched.
pub fn reconcile<T, K, F>(existing: Vec<T>, incoming: Vec<T>, key_fn: F) -> Reconciliation<T>
where
    T: Audited,
    K: Eq + Hash,
    F: Fn(&T) -> K,
{
    let mut slots: Vec<Option<T>> = existing.into_iter().map(Some).collect();
    let mut lookup: HashMap<K, usize> = HashMap::with_capacity(slots.len());
    for (index, slot) in slots.iter().enumerate() {
        if let Some(item) = slot {
            lookup.entry(key_fn(item)).or_insert(index);
        }
    }

    let mut matched = Vec::new();
    let mut added = Vec::new();

    for item in incoming {
        let hit = lookup
            .remove(&key_fn(&item))
            .and_then(|index| slots[index].take());
        match hit {
            Some(existing) => {
                let changes = build_scalar_diff(&existing, &item);
                matched.push(MatchedPair {
                    existing,
                    incoming: item,
                    changes,
                });
            }
            None => added.push(item),
        }
    }

    let removed = slots.into_iter().flatten().collect();

    Reconciliation {
        matched,
        added,
        removed,
    }
}
