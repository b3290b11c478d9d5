//! Property-based tests for creature motion
//!
//! Validates:
//! - Knockback decays to zero within magnitude / decay seconds
//! - Knockback components never flip sign while decaying
//! - A creature that always idles never drifts horizontally

use glam::{IVec3, Vec3};
use proptest::prelude::*;
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::sync::Arc;
use voxelwild_physics::{BlockGrid, Cell};
use voxelwild_world::{BehaviorProfile, Creature, CreatureId, LocomotionTuning};

const DT: f32 = 0.05;

fn floor() -> BlockGrid {
    let mut grid = BlockGrid::new();
    for x in -64..64 {
        for z in -64..64 {
            grid.set(IVec3::new(x, 0, z), Cell::Solid);
        }
    }
    grid
}

fn creature(tuning: LocomotionTuning) -> Creature {
    Creature::new(
        CreatureId(7),
        Some(Arc::new(BehaviorProfile {
            max_hp: 1_000,
            ..BehaviorProfile::default()
        })),
        tuning,
        None,
        Vec3::new(0.5, 1.0, 0.5),
        0.0,
    )
}

fn same_sign_or_zero(before: f32, after: f32) -> bool {
    after == 0.0 || before.signum() == after.signum()
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(48))]

    /// Property: knockback decays monotonically to zero without reversing
    #[test]
    fn knockback_decays_without_reversing(
        dx in -5.0f32..5.0,
        dz in -5.0f32..5.0,
        seed in any::<u64>(),
    ) {
        prop_assume!(dx.abs() > 0.01 || dz.abs() > 0.01);
        let grid = floor();
        let tuning = LocomotionTuning::default();
        let mut rng = StdRng::seed_from_u64(seed);
        let mut mob = creature(tuning);

        let attacker = mob.position() + Vec3::new(dx, 0.0, dz);
        let outcome = mob.take_damage(1, attacker, 0.0, &mut rng);
        prop_assert!(outcome.applied);

        let initial = mob.knockback();
        prop_assert!(initial.length() > 0.0);
        let budget = (initial.length() / (tuning.knockback_decay * DT)).ceil() as usize + 1;

        let mut previous = initial;
        for step in 0..budget {
            mob.tick(&grid, None, step as f32 * DT, DT, &mut rng);
            let current = mob.knockback();
            prop_assert!(current.length() <= previous.length() + 1e-5);
            prop_assert!(same_sign_or_zero(previous.x, current.x));
            prop_assert!(same_sign_or_zero(previous.y, current.y));
            prop_assert!(same_sign_or_zero(previous.z, current.z));
            previous = current;
        }
        prop_assert_eq!(mob.knockback(), Vec3::ZERO);
    }

    /// Property: with an idle chance of one the creature never picks a heading
    #[test]
    fn always_idle_creature_stays_put(seed in any::<u64>(), ticks in 20usize..200) {
        let grid = floor();
        let tuning = LocomotionTuning {
            idle_chance: 1.0,
            ..LocomotionTuning::default()
        };
        let mut rng = StdRng::seed_from_u64(seed);
        let mut mob = creature(tuning);
        let start = mob.position();

        for step in 0..ticks {
            mob.tick(&grid, None, step as f32 * DT, DT, &mut rng);
            prop_assert_eq!(mob.wander_direction(), Vec3::ZERO);
            prop_assert_eq!(mob.planar_velocity(), Vec3::ZERO);
        }
        prop_assert!((mob.position().x - start.x).abs() < 1e-5);
        prop_assert!((mob.position().z - start.z).abs() < 1e-5);
        prop_assert!(mob.is_grounded());
    }
}
