//! Inventory screen state machine.
//!
//! Hotbar and backpack slots mirror the central [`Inventory`] by count: they
//! are adjusted in place rather than rebuilt, so stacks keep their positions.
//! Crafting inputs and armor slots hold items outside the inventory; moving
//! items into them consumes from the inventory and moving items out adds
//! back. A drag keeps its stack in a buffer and commits nothing until the
//! drop resolves.

use crate::slot::{
    DropOutcome, SlotRef, SlotStack, TransferError, TransferMode, CRAFT_SLOTS, HOTBAR_SLOTS,
    MIRRORED_SLOTS,
};
use crate::stats::StatDisplay;
use std::collections::BTreeSet;
use std::sync::Arc;
use tracing::{debug, info, warn};
use voxelwild_core::{ArmorSlot, ItemCatalog, ItemKind};
use voxelwild_world::{Equipment, GridPattern, Inventory, RecipeBook};

/// A stack picked up and not yet dropped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DragState {
    /// Slot the stack came from.
    pub origin: SlotRef,
    /// Units held.
    pub stack: SlotStack,
}

/// Inventory panel, hotbar, crafting grid and armor slots.
pub struct InventoryScreen<D: StatDisplay> {
    catalog: Arc<ItemCatalog>,
    recipes: Arc<RecipeBook>,
    display: D,
    mirrored: [Option<SlotStack>; MIRRORED_SLOTS],
    craft: [Option<SlotStack>; CRAFT_SLOTS],
    result: Option<SlotStack>,
    equipment: Equipment,
    drag: Option<DragState>,
    selected: Option<usize>,
    panel_open: bool,
    crafted: usize,
}

impl<D: StatDisplay> InventoryScreen<D> {
    /// Create an empty screen with the panel closed.
    pub fn new(catalog: Arc<ItemCatalog>, recipes: Arc<RecipeBook>, display: D) -> Self {
        Self {
            catalog,
            recipes,
            display,
            mirrored: [None; MIRRORED_SLOTS],
            craft: [None; CRAFT_SLOTS],
            result: None,
            equipment: Equipment::new(),
            drag: None,
            selected: None,
            panel_open: false,
            crafted: 0,
        }
    }

    /// Contents of `slot`. The origin of an active drag reads as empty.
    pub fn slot(&self, slot: SlotRef) -> Option<SlotStack> {
        match slot {
            SlotRef::Hotbar(_) | SlotRef::Backpack(_) => {
                slot.mirrored_index().and_then(|i| self.mirrored[i])
            }
            SlotRef::Craft(i) => self.craft.get(i).copied().flatten(),
            SlotRef::CraftResult => self.result,
            SlotRef::Armor(armor) => self.equipment.get(armor).map(|kind| SlotStack::new(kind, 1)),
        }
    }

    /// Active drag, if any.
    pub fn drag(&self) -> Option<&DragState> {
        self.drag.as_ref()
    }

    /// Whether a drag is in progress.
    pub fn is_dragging(&self) -> bool {
        self.drag.is_some()
    }

    /// Pending crafting result.
    pub fn pending_result(&self) -> Option<SlotStack> {
        self.result
    }

    /// Worn armor.
    pub fn equipment(&self) -> &Equipment {
        &self.equipment
    }

    /// Sum of worn armor values.
    pub fn armor_total(&self) -> f32 {
        self.equipment.armor_total(&self.catalog)
    }

    /// Injected stat display.
    pub fn display(&self) -> &D {
        &self.display
    }

    /// Mutable access to the stat display.
    pub fn display_mut(&mut self) -> &mut D {
        &mut self.display
    }

    /// Number of crafting results claimed.
    pub fn crafted(&self) -> usize {
        self.crafted
    }

    /// Whether the panel is open.
    pub fn is_panel_open(&self) -> bool {
        self.panel_open
    }

    /// Open or close the panel. Closing cancels any drag.
    pub fn toggle_panel(&mut self, inventory: &mut Inventory) -> bool {
        if self.panel_open {
            self.cancel_drag(inventory);
        }
        self.panel_open = !self.panel_open;
        debug!(open = self.panel_open, "Inventory panel toggled");
        self.panel_open
    }

    /// Units of `kind` shown across the mirrored slots.
    pub fn shown(&self, kind: ItemKind) -> u32 {
        self.mirrored
            .iter()
            .flatten()
            .filter(|stack| stack.kind == kind)
            .map(|stack| stack.count)
            .sum()
    }

    /// Bring the mirrored slots in line with `inventory`.
    ///
    /// Returns `false` without touching anything while a drag is in progress;
    /// the drop resyncs when it ends.
    pub fn sync(&mut self, inventory: &Inventory) -> bool {
        if self.drag.is_some() {
            return false;
        }

        let kinds: BTreeSet<ItemKind> = inventory
            .iter()
            .map(|(kind, _)| kind)
            .chain(self.mirrored.iter().flatten().map(|stack| stack.kind))
            .collect();

        for kind in kinds {
            let target = inventory.count(kind);
            let shown = self.shown(kind);
            if target > shown {
                self.show_more(kind, target - shown);
            } else if shown > target {
                self.show_less(kind, shown - target);
            }
        }

        if self
            .selected
            .is_some_and(|i| self.mirrored[i].is_none())
        {
            debug!("Selected hotbar slot emptied; clearing selection");
            self.selected = None;
        }
        true
    }

    fn show_more(&mut self, kind: ItemKind, amount: u32) {
        if let Some(stack) = self.mirrored.iter_mut().flatten().find(|s| s.kind == kind) {
            stack.count += amount;
            return;
        }
        match self.mirrored.iter_mut().find(|slot| slot.is_none()) {
            Some(slot) => *slot = Some(SlotStack::new(kind, amount)),
            None => warn!(kind = kind.as_str(), amount, "No free slot to show item"),
        }
    }

    fn show_less(&mut self, kind: ItemKind, mut amount: u32) {
        for slot in self.mirrored.iter_mut().rev() {
            if amount == 0 {
                break;
            }
            let Some(stack) = slot.as_mut().filter(|s| s.kind == kind) else {
                continue;
            };
            let taken = amount.min(stack.count);
            stack.count -= taken;
            amount -= taken;
            if stack.count == 0 {
                *slot = None;
            }
        }
    }

    /// Pick up the stack in `slot`, or claim the crafting result.
    pub fn pointer_down(
        &mut self,
        slot: SlotRef,
        inventory: &mut Inventory,
    ) -> Result<(), TransferError> {
        if !self.panel_open {
            return Err(TransferError::PanelClosed);
        }
        if self.drag.is_some() {
            return Err(TransferError::DragInProgress);
        }
        if slot == SlotRef::CraftResult {
            return self.claim(inventory);
        }

        let stack = self.take(slot).ok_or(TransferError::NothingHeld)?;
        debug!(%slot, kind = stack.kind.as_str(), count = stack.count, "Drag started");
        self.drag = Some(DragState {
            origin: slot,
            stack,
        });
        Ok(())
    }

    /// Claim the pending result: use one unit of every input, grant the
    /// result to the inventory and start dragging it.
    fn claim(&mut self, inventory: &mut Inventory) -> Result<(), TransferError> {
        let result = self.result.take().ok_or(TransferError::NothingHeld)?;

        for cell in self.craft.iter_mut() {
            if let Some(stack) = cell {
                stack.count -= 1;
                if stack.count == 0 {
                    *cell = None;
                }
            }
        }
        inventory.add(result.kind, result.count);
        self.crafted += 1;
        info!(kind = result.kind.as_str(), count = result.count, "Crafted item");

        self.drag = Some(DragState {
            origin: SlotRef::CraftResult,
            stack: result,
        });
        self.push_stats();
        Ok(())
    }

    /// Drop the held stack onto `target` (`None` for empty space).
    pub fn pointer_up(
        &mut self,
        target: Option<SlotRef>,
        mode: TransferMode,
        inventory: &mut Inventory,
    ) -> DropOutcome {
        let Some(drag) = self.drag else {
            return DropOutcome::Rejected(TransferError::NothingHeld);
        };

        let target = match target {
            Some(target) if target != drag.origin && target.is_valid() => target,
            _ => {
                self.cancel_drag(inventory);
                return DropOutcome::Returned;
            }
        };

        match self.resolve_drop(drag, target, mode, inventory) {
            Ok(outcome) => {
                debug!(%target, ?outcome, "Drop resolved");
                if outcome.ends_drag() {
                    self.finish_drag(inventory);
                }
                outcome
            }
            Err(err) => {
                debug!(%target, %err, "Drop refused; returning stack");
                self.cancel_drag(inventory);
                DropOutcome::Rejected(err)
            }
        }
    }

    /// Put whatever is held back where it came from.
    pub fn cancel_drag(&mut self, inventory: &mut Inventory) -> bool {
        let Some(drag) = self.drag.take() else {
            return false;
        };
        self.restore(drag.origin, drag.stack, inventory);
        self.finish_drag(inventory);
        true
    }

    fn resolve_drop(
        &mut self,
        drag: DragState,
        target: SlotRef,
        mode: TransferMode,
        inventory: &mut Inventory,
    ) -> Result<DropOutcome, TransferError> {
        let held = drag.stack;
        match target {
            SlotRef::CraftResult => Err(TransferError::ResultSlotIsReadOnly),
            SlotRef::Armor(armor) => self.drop_on_armor(drag, armor, inventory),
            _ => match self.slot(target) {
                Some(existing) if !existing.can_merge(&held) => {
                    if mode == TransferMode::One {
                        return Err(TransferError::IllegalPartialSwap);
                    }
                    self.swap(drag, target, existing, inventory)?;
                    Ok(DropOutcome::Swapped)
                }
                existing => {
                    let amount = mode.amount(held.count);
                    Self::account(drag.origin, target, held.kind, amount, inventory)?;
                    let count = existing.map_or(0, |stack| stack.count) + amount;
                    self.put(target, SlotStack::new(held.kind, count));

                    let remaining = held.count - amount;
                    self.drag = (remaining > 0).then_some(DragState {
                        origin: drag.origin,
                        stack: SlotStack::new(held.kind, remaining),
                    });
                    Ok(DropOutcome::Placed {
                        moved: amount,
                        held: remaining,
                    })
                }
            },
        }
    }

    /// Armor slots take one accepted unit into an empty slot. Any remainder
    /// goes back to the origin.
    fn drop_on_armor(
        &mut self,
        drag: DragState,
        armor: ArmorSlot,
        inventory: &mut Inventory,
    ) -> Result<DropOutcome, TransferError> {
        let held = drag.stack;
        let target = SlotRef::Armor(armor);
        let rejected = TransferError::RejectedBySlot {
            slot: target,
            kind: held.kind,
        };
        if !Equipment::accepts(armor, held.kind, &self.catalog)
            || self.equipment.get(armor).is_some()
        {
            return Err(rejected);
        }

        self.equipment
            .equip(armor, held.kind, &self.catalog)
            .map_err(|_| rejected)?;
        if let Err(err) = Self::account(drag.origin, target, held.kind, 1, inventory) {
            self.equipment.unequip(armor);
            return Err(err);
        }

        self.drag = None;
        if held.count > 1 {
            self.restore(
                drag.origin,
                SlotStack::new(held.kind, held.count - 1),
                inventory,
            );
        }
        Ok(DropOutcome::Placed { moved: 1, held: 0 })
    }

    fn swap(
        &mut self,
        drag: DragState,
        target: SlotRef,
        existing: SlotStack,
        inventory: &mut Inventory,
    ) -> Result<(), TransferError> {
        let held = drag.stack;
        match drag.origin {
            SlotRef::CraftResult => return Err(TransferError::ResultSlotIsReadOnly),
            SlotRef::Armor(armor) => {
                if existing.count != 1 || !Equipment::accepts(armor, existing.kind, &self.catalog) {
                    return Err(TransferError::RejectedBySlot {
                        slot: drag.origin,
                        kind: existing.kind,
                    });
                }
            }
            _ => {}
        }

        // Take before give so a shortfall leaves the inventory untouched.
        let outgoing_counted = drag.origin.counted_by_inventory();
        if outgoing_counted != target.counted_by_inventory() {
            let (leaving, entering) = if outgoing_counted {
                (held, existing)
            } else {
                (existing, held)
            };
            Self::consume(inventory, leaving.kind, leaving.count)?;
            inventory.add(entering.kind, entering.count);
        }

        self.put(target, held);
        self.drag = None;
        self.restore(drag.origin, existing, inventory);
        Ok(())
    }

    /// Commit `amount` units of `kind` moving from `from` to `to` against the inventory.
    fn account(
        from: SlotRef,
        to: SlotRef,
        kind: ItemKind,
        amount: u32,
        inventory: &mut Inventory,
    ) -> Result<(), TransferError> {
        match (from.counted_by_inventory(), to.counted_by_inventory()) {
            (true, false) => Self::consume(inventory, kind, amount),
            (false, true) => {
                inventory.add(kind, amount);
                Ok(())
            }
            _ => Ok(()),
        }
    }

    fn consume(inventory: &mut Inventory, kind: ItemKind, amount: u32) -> Result<(), TransferError> {
        if inventory.consume(kind, amount) {
            Ok(())
        } else {
            Err(TransferError::InsufficientInventory {
                kind,
                needed: amount,
                held: inventory.count(kind),
            })
        }
    }

    fn take(&mut self, slot: SlotRef) -> Option<SlotStack> {
        match slot {
            SlotRef::Hotbar(_) | SlotRef::Backpack(_) => {
                slot.mirrored_index().and_then(|i| self.mirrored[i].take())
            }
            SlotRef::Craft(i) => self.craft.get_mut(i).and_then(Option::take),
            SlotRef::CraftResult => self.result.take(),
            SlotRef::Armor(armor) => self
                .equipment
                .unequip(armor)
                .map(|kind| SlotStack::new(kind, 1)),
        }
    }

    /// Overwrite a mirrored or crafting slot.
    fn put(&mut self, slot: SlotRef, stack: SlotStack) {
        match slot {
            SlotRef::Hotbar(_) | SlotRef::Backpack(_) => {
                if let Some(i) = slot.mirrored_index() {
                    self.mirrored[i] = Some(stack);
                }
            }
            SlotRef::Craft(i) => {
                if let Some(cell) = self.craft.get_mut(i) {
                    *cell = Some(stack);
                }
            }
            SlotRef::CraftResult | SlotRef::Armor(_) => {}
        }
    }

    /// Return `stack` to its origin slot.
    fn restore(&mut self, origin: SlotRef, stack: SlotStack, inventory: &mut Inventory) {
        match origin {
            // Already granted on claim; the next sync shows it.
            SlotRef::CraftResult => {}
            SlotRef::Armor(armor) => {
                if let Err(err) = self.equipment.equip(armor, stack.kind, &self.catalog) {
                    warn!(%err, "Could not return armor piece; moving it to the inventory");
                    inventory.add(stack.kind, stack.count);
                }
            }
            _ => {
                let count = self
                    .slot(origin)
                    .filter(|existing| existing.can_merge(&stack))
                    .map_or(0, |existing| existing.count);
                self.put(origin, SlotStack::new(stack.kind, count + stack.count));
            }
        }
    }

    fn finish_drag(&mut self, inventory: &Inventory) {
        self.drag = None;
        self.sync(inventory);
        self.evaluate_crafting();
        self.push_stats();
    }

    /// Match the crafting grid against the recipe book and set the pending result.
    pub fn evaluate_crafting(&mut self) {
        if self.drag.is_some() {
            return;
        }
        let pattern: GridPattern = self.craft.map(|cell| cell.map(|stack| stack.kind));
        let result = self
            .recipes
            .find_match(&pattern)
            .map(|recipe| SlotStack::new(recipe.result, recipe.result_count));
        if result != self.result {
            debug!(?result, "Crafting result changed");
        }
        self.result = result;
    }

    fn push_stats(&mut self) {
        let total = self.equipment.armor_total(&self.catalog);
        self.display.show_armor(total);
    }

    /// Select hotbar slot `index`, or clear the selection if it is already selected.
    ///
    /// Empty slots cannot be selected. Returns whether a slot is selected afterwards.
    pub fn toggle_select(&mut self, index: usize) -> bool {
        if index >= HOTBAR_SLOTS {
            return self.selected.is_some();
        }
        if self.selected == Some(index) {
            self.selected = None;
        } else if self.mirrored[index].is_some() {
            self.selected = Some(index);
        }
        self.selected.is_some()
    }

    /// Clear the hotbar selection.
    pub fn deselect(&mut self) {
        self.selected = None;
    }

    /// Selected hotbar index.
    pub fn selected(&self) -> Option<usize> {
        self.selected
    }

    /// Kind in the selected hotbar slot.
    pub fn selected_kind(&self) -> Option<ItemKind> {
        self.selected_stack().map(|stack| stack.kind)
    }

    /// Units in the selected hotbar slot.
    pub fn selected_count(&self) -> u32 {
        self.selected_stack().map_or(0, |stack| stack.count)
    }

    fn selected_stack(&self) -> Option<SlotStack> {
        self.selected.and_then(|i| self.mirrored[i])
    }

    /// Use one unit of the selected kind from the inventory.
    ///
    /// Refused while dragging so the displayed slot cannot go stale.
    pub fn consume_one_from_selected(&mut self, inventory: &mut Inventory) -> Option<ItemKind> {
        if self.drag.is_some() {
            return None;
        }
        let kind = self.selected_kind()?;
        if !inventory.consume(kind, 1) {
            return None;
        }
        self.sync(inventory);
        Some(kind)
    }
}
