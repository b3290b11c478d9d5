//! Worn armor and the derived armor stat.

use serde::{Deserialize, Serialize};
use thiserror::Error;
use voxelwild_core::{ArmorSlot, ItemCatalog, ItemKind};

/// Why an armor piece could not be worn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum EquipError {
    /// The kind is not armor for this slot.
    #[error("{} does not fit the {} slot", .kind.as_str(), .slot.as_str())]
    WrongSlot {
        /// Slot targeted.
        slot: ArmorSlot,
        /// Kind offered.
        kind: ItemKind,
    },
    /// The slot already holds a piece.
    #[error("{} slot already holds {}", .slot.as_str(), .held.as_str())]
    Occupied {
        /// Slot targeted.
        slot: ArmorSlot,
        /// Piece already worn.
        held: ItemKind,
    },
}

/// Player's worn armor, one piece per slot.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Equipment {
    slots: [Option<ItemKind>; 4],
}

impl Equipment {
    /// Create empty armor slots
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether `slot` accepts `kind` at all.
    pub fn accepts(slot: ArmorSlot, kind: ItemKind, catalog: &ItemCatalog) -> bool {
        catalog.armor_slot(kind) == Some(slot)
    }

    /// Wear `kind` in `slot`. The slot must be empty.
    pub fn equip(
        &mut self,
        slot: ArmorSlot,
        kind: ItemKind,
        catalog: &ItemCatalog,
    ) -> Result<(), EquipError> {
        if !Self::accepts(slot, kind, catalog) {
            return Err(EquipError::WrongSlot { slot, kind });
        }
        if let Some(held) = self.slots[slot.index()] {
            return Err(EquipError::Occupied { slot, held });
        }
        self.slots[slot.index()] = Some(kind);
        Ok(())
    }

    /// Take off whatever `slot` holds.
    pub fn unequip(&mut self, slot: ArmorSlot) -> Option<ItemKind> {
        self.slots[slot.index()].take()
    }

    /// Piece worn in `slot`.
    pub fn get(&self, slot: ArmorSlot) -> Option<ItemKind> {
        self.slots[slot.index()]
    }

    /// Worn pieces in slot order.
    pub fn iter(&self) -> impl Iterator<Item = (ArmorSlot, ItemKind)> + '_ {
        ArmorSlot::ALL
            .into_iter()
            .filter_map(|slot| self.get(slot).map(|kind| (slot, kind)))
    }

    /// Sum of the armor values of every worn piece.
    pub fn armor_total(&self, catalog: &ItemCatalog) -> f32 {
        self.iter().map(|(_, kind)| catalog.armor_value(kind)).sum()
    }
}
