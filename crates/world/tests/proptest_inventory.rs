//! Property-based tests for the central inventory
//!
//! Validates:
//! - Consuming more than held fails and leaves the inventory untouched
//! - Counts always equal adds minus successful consumes
//! - The last change reported for a kind matches its final count

use proptest::prelude::*;
use std::collections::BTreeMap;
use voxelwild_core::ItemKind;
use voxelwild_world::Inventory;

#[derive(Debug, Clone)]
enum Op {
    Add(ItemKind, u32),
    Consume(ItemKind, u32),
}

fn kind() -> impl Strategy<Value = ItemKind> {
    prop_oneof![
        Just(ItemKind::Dirt),
        Just(ItemKind::Stone),
        Just(ItemKind::Wood),
        Just(ItemKind::Diamond),
    ]
}

fn op() -> impl Strategy<Value = Op> {
    prop_oneof![
        (kind(), 0u32..20).prop_map(|(k, n)| Op::Add(k, n)),
        (kind(), 0u32..20).prop_map(|(k, n)| Op::Consume(k, n)),
    ]
}

proptest! {
    /// Property: the inventory behaves like a saturating-free ledger
    #[test]
    fn counts_follow_successful_operations(ops in prop::collection::vec(op(), 1..64)) {
        let mut inventory = Inventory::new();
        let mut expected: BTreeMap<ItemKind, u32> = BTreeMap::new();

        for op in ops {
            match op {
                Op::Add(kind, amount) => {
                    inventory.add(kind, amount);
                    *expected.entry(kind).or_default() += amount;
                }
                Op::Consume(kind, amount) => {
                    let held = expected.get(&kind).copied().unwrap_or(0);
                    let before: Vec<_> = inventory.iter().collect();
                    let ok = inventory.consume(kind, amount);
                    prop_assert_eq!(ok, amount <= held);
                    if ok {
                        expected.insert(kind, held - amount);
                    } else {
                        let after: Vec<_> = inventory.iter().collect();
                        prop_assert_eq!(before, after);
                    }
                }
            }
            expected.retain(|_, count| *count > 0);
        }

        let actual: BTreeMap<_, _> = inventory.iter().collect();
        prop_assert_eq!(&actual, &expected);
        prop_assert!(actual.values().all(|count| *count > 0));

        let mut last_reported: BTreeMap<ItemKind, u32> = BTreeMap::new();
        for change in inventory.drain_changes() {
            last_reported.insert(change.kind, change.count);
        }
        for (kind, count) in last_reported {
            prop_assert_eq!(inventory.count(kind), count);
        }
        prop_assert!(!inventory.has_changes());
    }
}
