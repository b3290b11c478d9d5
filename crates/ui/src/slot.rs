//! Slot addressing, display stacks and transfer results.

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;
use voxelwild_core::{ArmorSlot, ItemKind};
use voxelwild_world::GRID_CELLS;

/// Outer (always visible) mirrored slots.
pub const HOTBAR_SLOTS: usize = 8;

/// Inner mirrored slots shown with the panel open.
pub const BACKPACK_SLOTS: usize = 24;

/// All slots that mirror the inventory.
pub const MIRRORED_SLOTS: usize = HOTBAR_SLOTS + BACKPACK_SLOTS;

/// Crafting input cells.
pub const CRAFT_SLOTS: usize = GRID_CELLS;

/// Address of one slot on the inventory screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SlotRef {
    /// Hotbar slot `0..HOTBAR_SLOTS`.
    Hotbar(usize),
    /// Backpack slot `0..BACKPACK_SLOTS`.
    Backpack(usize),
    /// Crafting input cell `0..CRAFT_SLOTS`, row-major.
    Craft(usize),
    /// Pending crafting result.
    CraftResult,
    /// Worn armor piece.
    Armor(ArmorSlot),
}

impl SlotRef {
    /// Whether the address names a slot that exists.
    pub fn is_valid(self) -> bool {
        match self {
            SlotRef::Hotbar(i) => i < HOTBAR_SLOTS,
            SlotRef::Backpack(i) => i < BACKPACK_SLOTS,
            SlotRef::Craft(i) => i < CRAFT_SLOTS,
            SlotRef::CraftResult | SlotRef::Armor(_) => true,
        }
    }

    /// Index into the combined mirrored array, for hotbar and backpack slots.
    pub fn mirrored_index(self) -> Option<usize> {
        match self {
            SlotRef::Hotbar(i) if i < HOTBAR_SLOTS => Some(i),
            SlotRef::Backpack(i) if i < BACKPACK_SLOTS => Some(HOTBAR_SLOTS + i),
            _ => None,
        }
    }

    /// Slot at a combined mirrored index.
    pub fn from_mirrored_index(index: usize) -> Option<Self> {
        if index < HOTBAR_SLOTS {
            Some(SlotRef::Hotbar(index))
        } else if index < MIRRORED_SLOTS {
            Some(SlotRef::Backpack(index - HOTBAR_SLOTS))
        } else {
            None
        }
    }

    /// Whether items shown in this slot are counted by the inventory.
    ///
    /// A claimed crafting result is granted before it is placed, so items
    /// dragged out of the result slot are counted too.
    pub fn counted_by_inventory(self) -> bool {
        matches!(
            self,
            SlotRef::Hotbar(_) | SlotRef::Backpack(_) | SlotRef::CraftResult
        )
    }
}

impl fmt::Display for SlotRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SlotRef::Hotbar(i) => write!(f, "hotbar[{i}]"),
            SlotRef::Backpack(i) => write!(f, "backpack[{i}]"),
            SlotRef::Craft(i) => write!(f, "craft[{i}]"),
            SlotRef::CraftResult => f.write_str("craft_result"),
            SlotRef::Armor(slot) => write!(f, "armor[{}]", slot.as_str()),
        }
    }
}

/// Items shown in one slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SlotStack {
    /// Item kind.
    pub kind: ItemKind,
    /// Units shown (always at least one).
    pub count: u32,
}

impl SlotStack {
    /// Create a stack.
    pub fn new(kind: ItemKind, count: u32) -> Self {
        Self { kind, count }
    }

    /// Check if this stack can merge with another stack.
    pub fn can_merge(&self, other: &SlotStack) -> bool {
        self.kind == other.kind
    }
}

/// Pointer button semantics for a drop.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TransferMode {
    /// Left button: move the whole held stack.
    All,
    /// Right button: move a single unit.
    One,
}

impl TransferMode {
    /// Units this mode moves out of a held stack of `held` units.
    pub fn amount(self, held: u32) -> u32 {
        match self {
            TransferMode::All => held,
            TransferMode::One => held.min(1),
        }
    }
}

/// Why a pointer event was refused.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum TransferError {
    /// The slot is empty or no drag is in progress.
    #[error("nothing to pick up or drop")]
    NothingHeld,
    /// A drag is already in progress.
    #[error("a drag is already in progress")]
    DragInProgress,
    /// Pointer events are ignored while the panel is closed.
    #[error("inventory panel is closed")]
    PanelClosed,
    /// The slot does not take this item.
    #[error("{slot} does not accept {}", .kind.as_str())]
    RejectedBySlot {
        /// Slot that refused.
        slot: SlotRef,
        /// Kind offered.
        kind: ItemKind,
    },
    /// A single unit cannot be swapped with a different kind.
    #[error("cannot drop one unit onto a different item")]
    IllegalPartialSwap,
    /// The inventory no longer holds the items being placed.
    #[error("need {needed} {} but inventory holds {held}", .kind.as_str())]
    InsufficientInventory {
        /// Kind required.
        kind: ItemKind,
        /// Units required.
        needed: u32,
        /// Units held.
        held: u32,
    },
    /// Nothing can be dropped onto the crafting result.
    #[error("crafting result slot is read-only")]
    ResultSlotIsReadOnly,
}

/// What a drop did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DropOutcome {
    /// Units landed on the target. A non-zero `held` keeps the drag going.
    Placed {
        /// Units moved onto the target.
        moved: u32,
        /// Units still in the drag buffer.
        held: u32,
    },
    /// The held stack and the target stack traded places.
    Swapped,
    /// Dropped on nothing or on the origin; the stack went back.
    Returned,
    /// The drop was refused and the stack went back.
    Rejected(TransferError),
}

impl DropOutcome {
    /// Whether the drag ended with this drop.
    pub fn ends_drag(&self) -> bool {
        !matches!(self, DropOutcome::Placed { held, .. } if *held > 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mirrored_indices_cover_hotbar_then_backpack() {
        assert_eq!(SlotRef::Hotbar(3).mirrored_index(), Some(3));
        assert_eq!(SlotRef::Backpack(0).mirrored_index(), Some(HOTBAR_SLOTS));
        assert_eq!(SlotRef::Backpack(24).mirrored_index(), None);
        assert_eq!(SlotRef::Craft(0).mirrored_index(), None);
        for i in 0..MIRRORED_SLOTS {
            let slot = SlotRef::from_mirrored_index(i).expect("in range");
            assert_eq!(slot.mirrored_index(), Some(i));
        }
        assert_eq!(SlotRef::from_mirrored_index(MIRRORED_SLOTS), None);
    }

    #[test]
    fn errors_name_slot_and_kind() {
        let err = TransferError::RejectedBySlot {
            slot: SlotRef::Armor(ArmorSlot::Boots),
            kind: ItemKind::Dirt,
        };
        assert_eq!(err.to_string(), "armor[boots] does not accept dirt");
    }

    #[test]
    fn one_mode_moves_a_single_unit() {
        assert_eq!(TransferMode::One.amount(5), 1);
        assert_eq!(TransferMode::All.amount(5), 5);
        assert!(!DropOutcome::Placed { moved: 1, held: 4 }.ends_drag());
        assert!(DropOutcome::Placed { moved: 5, held: 0 }.ends_drag());
        assert!(DropOutcome::Returned.ends_drag());
    }
}
