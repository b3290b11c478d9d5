#![warn(missing_docs)]
//! Inventory screen state: mirrored slots, drag and drop, crafting grid,
//! armor slots and hotbar selection.
//!
//! Nothing here draws. A host feeds pointer events in and reads slot
//! contents back out; derived stats are pushed to an injected
//! [`StatDisplay`].

mod screen;
mod slot;
mod stats;

pub use screen::{DragState, InventoryScreen};
pub use slot::{
    DropOutcome, SlotRef, SlotStack, TransferError, TransferMode, BACKPACK_SLOTS, CRAFT_SLOTS,
    HOTBAR_SLOTS, MIRRORED_SLOTS,
};
pub use stats::{StatDisplay, StatPanel};
