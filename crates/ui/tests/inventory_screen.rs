//! End-to-end inventory screen flows: crafting claims, partial drops and
//! conservation of items across random pointer sequences.

use proptest::prelude::*;
use std::collections::BTreeMap;
use std::sync::Arc;
use voxelwild_core::{ArmorSlot, ItemCatalog, ItemKind};
use voxelwild_ui::{
    DropOutcome, InventoryScreen, SlotRef, SlotStack, StatPanel, TransferMode, CRAFT_SLOTS,
};
use voxelwild_world::{Inventory, RecipeBook};

fn open_screen(inventory: &mut Inventory) -> InventoryScreen<StatPanel> {
    let mut screen = InventoryScreen::new(
        Arc::new(ItemCatalog::with_defaults()),
        Arc::new(RecipeBook::with_defaults()),
        StatPanel::new(),
    );
    screen.toggle_panel(inventory);
    screen.sync(inventory);
    screen
}

#[test]
fn three_dirt_craft_and_claim() {
    let mut inventory = Inventory::new();
    inventory.add(ItemKind::Dirt, 3);
    let mut screen = open_screen(&mut inventory);

    screen
        .pointer_down(SlotRef::Hotbar(0), &mut inventory)
        .expect("dirt in hotbar");
    for cell in 0..3 {
        screen.pointer_up(Some(SlotRef::Craft(cell)), TransferMode::One, &mut inventory);
    }
    assert!(!screen.is_dragging());
    assert_eq!(inventory.count(ItemKind::Dirt), 0);
    assert_eq!(
        screen.pending_result(),
        Some(SlotStack::new(ItemKind::Stone, 1))
    );

    screen
        .pointer_down(SlotRef::CraftResult, &mut inventory)
        .expect("claim pending result");
    for cell in 0..3 {
        assert_eq!(screen.slot(SlotRef::Craft(cell)), None);
    }
    let drag = screen.drag().expect("claim starts a drag");
    assert_eq!(drag.origin, SlotRef::CraftResult);
    assert_eq!(drag.stack, SlotStack::new(ItemKind::Stone, 1));
    assert_eq!(inventory.count(ItemKind::Stone), 1);
    assert_eq!(screen.crafted(), 1);

    let outcome = screen.pointer_up(Some(SlotRef::Hotbar(4)), TransferMode::All, &mut inventory);
    assert_eq!(outcome, DropOutcome::Placed { moved: 1, held: 0 });
    assert_eq!(inventory.count(ItemKind::Stone), 1);
    assert_eq!(screen.shown(ItemKind::Stone), 1);
    assert_eq!(
        screen.slot(SlotRef::Hotbar(4)),
        Some(SlotStack::new(ItemKind::Stone, 1))
    );
    assert_eq!(screen.pending_result(), None);
}

#[test]
fn extra_units_in_a_cell_still_match_and_survive_the_claim() {
    let mut inventory = Inventory::new();
    inventory.add(ItemKind::Dirt, 4);
    let mut screen = open_screen(&mut inventory);

    screen.pointer_down(SlotRef::Hotbar(0), &mut inventory).unwrap();
    screen.pointer_up(Some(SlotRef::Craft(0)), TransferMode::One, &mut inventory);
    screen.pointer_up(Some(SlotRef::Craft(0)), TransferMode::One, &mut inventory);
    screen.pointer_up(Some(SlotRef::Craft(1)), TransferMode::One, &mut inventory);
    screen.pointer_up(Some(SlotRef::Craft(2)), TransferMode::One, &mut inventory);
    assert_eq!(
        screen.slot(SlotRef::Craft(0)),
        Some(SlotStack::new(ItemKind::Dirt, 2))
    );
    assert!(screen.pending_result().is_some());

    screen.pointer_down(SlotRef::CraftResult, &mut inventory).unwrap();
    assert_eq!(
        screen.slot(SlotRef::Craft(0)),
        Some(SlotStack::new(ItemKind::Dirt, 1))
    );
    assert_eq!(screen.slot(SlotRef::Craft(1)), None);

    // Dropping the claimed stack on nothing still leaves it in the inventory.
    assert_eq!(
        screen.pointer_up(None, TransferMode::All, &mut inventory),
        DropOutcome::Returned
    );
    assert_eq!(screen.shown(ItemKind::Stone), 1);
    assert_eq!(screen.pending_result(), None);
}

#[test]
fn right_click_drop_moves_one_of_five() {
    let mut inventory = Inventory::new();
    inventory.add(ItemKind::Wood, 5);
    let mut screen = open_screen(&mut inventory);

    screen.pointer_down(SlotRef::Hotbar(0), &mut inventory).unwrap();
    let outcome = screen.pointer_up(Some(SlotRef::Backpack(0)), TransferMode::One, &mut inventory);

    assert_eq!(outcome, DropOutcome::Placed { moved: 1, held: 4 });
    assert_eq!(
        screen.slot(SlotRef::Backpack(0)),
        Some(SlotStack::new(ItemKind::Wood, 1))
    );
    assert_eq!(screen.drag().map(|d| d.stack.count), Some(4));
    assert_eq!(screen.slot(SlotRef::Hotbar(0)), None);
    assert_eq!(inventory.count(ItemKind::Wood), 5);
}

#[derive(Debug, Clone)]
enum Pointer {
    Down(SlotRef),
    Up(Option<SlotRef>, TransferMode),
    Cancel,
}

fn slot() -> impl Strategy<Value = SlotRef> {
    prop_oneof![
        (0usize..3).prop_map(SlotRef::Hotbar),
        (0usize..2).prop_map(SlotRef::Backpack),
        (0usize..CRAFT_SLOTS).prop_map(SlotRef::Craft),
        Just(SlotRef::CraftResult),
        Just(SlotRef::Armor(ArmorSlot::Boots)),
        Just(SlotRef::Armor(ArmorSlot::Helmet)),
    ]
}

fn pointer() -> impl Strategy<Value = Pointer> {
    let mode = prop_oneof![Just(TransferMode::All), Just(TransferMode::One)];
    prop_oneof![
        slot().prop_map(Pointer::Down),
        (prop::option::of(slot()), mode).prop_map(|(s, m)| Pointer::Up(s, m)),
        Just(Pointer::Cancel),
    ]
}

const STOCK: [(ItemKind, u32); 4] = [
    (ItemKind::Dirt, 5),
    (ItemKind::Wood, 3),
    (ItemKind::Stone, 2),
    (ItemKind::DiamondBoots, 2),
];

proptest! {
    /// Property: items only move between the inventory, the crafting grid and
    /// the armor slots, except that a claim trades one unit of every occupied
    /// input for the result. The mirrored slots always show exactly what the
    /// inventory holds.
    #[test]
    fn pointer_sequences_conserve_items(ops in prop::collection::vec(pointer(), 1..48)) {
        let mut inventory = Inventory::new();
        let mut expected: BTreeMap<ItemKind, i64> = BTreeMap::new();
        for (kind, count) in STOCK {
            inventory.add(kind, count);
            expected.insert(kind, i64::from(count));
        }
        let mut screen = open_screen(&mut inventory);

        for op in ops {
            match op {
                Pointer::Down(SlotRef::CraftResult) => {
                    let inputs: Vec<ItemKind> = (0..CRAFT_SLOTS)
                        .filter_map(|i| screen.slot(SlotRef::Craft(i)))
                        .map(|stack| stack.kind)
                        .collect();
                    let pending = screen.pending_result();
                    if screen.pointer_down(SlotRef::CraftResult, &mut inventory).is_ok() {
                        let result = pending.expect("a claim needs a pending result");
                        for kind in inputs {
                            *expected.entry(kind).or_default() -= 1;
                        }
                        *expected.entry(result.kind).or_default() += i64::from(result.count);
                    }
                }
                Pointer::Down(slot) => {
                    let _ = screen.pointer_down(slot, &mut inventory);
                }
                Pointer::Up(target, mode) => {
                    screen.pointer_up(target, mode, &mut inventory);
                }
                Pointer::Cancel => {
                    screen.cancel_drag(&mut inventory);
                }
            }
            if !screen.is_dragging() {
                screen.sync(&inventory);
                for kind in ItemKind::ALL {
                    prop_assert_eq!(screen.shown(kind), inventory.count(kind));
                }
            }
        }
        screen.cancel_drag(&mut inventory);

        for kind in ItemKind::ALL {
            let crafting: u32 = (0..CRAFT_SLOTS)
                .filter_map(|i| screen.slot(SlotRef::Craft(i)))
                .filter(|stack| stack.kind == kind)
                .map(|stack| stack.count)
                .sum();
            let worn = screen.equipment().iter().filter(|(_, k)| *k == kind).count() as u32;
            let held = i64::from(inventory.count(kind) + crafting + worn);
            prop_assert_eq!(held, expected.get(&kind).copied().unwrap_or(0), "{:?}", kind);
            prop_assert_eq!(screen.shown(kind), inventory.count(kind));
        }
    }
}
