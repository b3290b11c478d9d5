//! Central player inventory.
//!
//! The inventory is the single source of truth for what the player carries: a
//! mapping from item kind to a positive count. UI slot layouts are views over it
//! and learn about mutations through the change list drained after each frame.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use voxelwild_core::ItemKind;

/// One mutation of the inventory, reported to observers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct InventoryChange {
    /// Kind whose count changed.
    pub kind: ItemKind,
    /// Count after the change (0 means the kind is gone).
    pub count: u32,
}

/// Kind → count mapping with change notification.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Inventory {
    items: BTreeMap<ItemKind, u32>,
    #[serde(skip)]
    changes: Vec<InventoryChange>,
}

impl Inventory {
    /// Create an empty inventory.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add `amount` of `kind`. Adding zero is a no-op and reports nothing.
    pub fn add(&mut self, kind: ItemKind, amount: u32) {
        if amount == 0 {
            return;
        }
        let count = self.items.entry(kind).or_insert(0);
        *count = count.saturating_add(amount);
        let count = *count;
        self.changes.push(InventoryChange { kind, count });
    }

    /// Remove `amount` of `kind`.
    ///
    /// Returns `false` and leaves the inventory untouched when fewer than
    /// `amount` are held. Kinds that reach zero are removed from the mapping.
    pub fn consume(&mut self, kind: ItemKind, amount: u32) -> bool {
        let held = self.count(kind);
        if amount > held {
            return false;
        }
        if amount == 0 {
            return true;
        }

        let remaining = held - amount;
        if remaining == 0 {
            self.items.remove(&kind);
        } else {
            self.items.insert(kind, remaining);
        }
        self.changes.push(InventoryChange {
            kind,
            count: remaining,
        });
        true
    }

    /// Count held of `kind`.
    pub fn count(&self, kind: ItemKind) -> u32 {
        self.items.get(&kind).copied().unwrap_or(0)
    }

    /// Check if the inventory holds at least `amount` of `kind`.
    pub fn has(&self, kind: ItemKind, amount: u32) -> bool {
        self.count(kind) >= amount
    }

    /// Every held kind with its count, in kind order.
    pub fn iter(&self) -> impl Iterator<Item = (ItemKind, u32)> + '_ {
        self.items.iter().map(|(kind, count)| (*kind, *count))
    }

    /// Number of distinct kinds held.
    pub fn kinds(&self) -> usize {
        self.items.len()
    }

    /// Check if the inventory is completely empty.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Whether mutations are waiting to be observed.
    pub fn has_changes(&self) -> bool {
        !self.changes.is_empty()
    }

    /// Take the pending change notifications.
    pub fn drain_changes(&mut self) -> Vec<InventoryChange> {
        std::mem::take(&mut self.changes)
    }
}
