use glam::{IVec3, Vec3};
use voxelwild::{GameConfig, Session, SessionError, SessionEvent};
use voxelwild_core::ItemKind;
use voxelwild_physics::BlockGrid;
use voxelwild_world::{
    BehaviorProfile, DropTable, EatError, EngageSpec, LocomotionTuning, Species, TerrainConfig,
};

/// Small flat-ish world with no random spawns and a target dummy species.
fn quiet() -> GameConfig {
    let mut config = GameConfig::default();
    config.world.terrain = TerrainConfig {
        width: 8,
        depth: 8,
        max_height: 6,
        water_level: 0,
        tree_chance: 0.0,
        diamond_count: 0,
        ..TerrainConfig::default()
    };
    config.animal_spawner.spawn_chance = 0.0;
    config.monster_spawner.spawn_chance = 0.0;
    config.species.push(Species {
        profile: BehaviorProfile {
            name: "dummy".to_string(),
            max_hp: 3,
            walk_speed: 0.0,
            flee_when_attacked: false,
            drop: Some(DropTable {
                kind: ItemKind::Beef,
                min: 2,
                max: 2,
                chance: 1.0,
            }),
            ..BehaviorProfile::default()
        },
        engage: EngageSpec::Passive,
        tuning: LocomotionTuning {
            idle_chance: 1.0,
            knockback_horizontal_force: 0.0,
            knockback_up_force: 0.0,
            ..LocomotionTuning::default()
        },
    });
    config
}

#[test]
fn killing_a_creature_loots_once_and_removes_it() {
    let mut config = quiet();
    config.session.attack_cooldown = 0.0;
    let mut session = Session::new(config).expect("session");
    let at = session.player().position + Vec3::new(2.0, 0.0, 0.0);
    let id = session.summon("dummy", at).expect("dummy configured");

    for _ in 0..2 {
        let outcome = session.attack_creature(id).expect("in reach");
        assert!(outcome.applied && !outcome.killed);
    }
    let outcome = session.attack_creature(id).expect("in reach");
    assert!(outcome.killed);
    assert_eq!(session.inventory().count(ItemKind::Beef), 2);
    assert_eq!(session.screen().shown(ItemKind::Beef), 2);
    assert_eq!(
        session.attack_creature(id),
        Err(SessionError::NoSuchCreature(id))
    );

    session.tick(0.05);
    assert!(session.creature(id).is_none());
    assert_eq!(session.stats().killed.get("dummy"), Some(&1));

    let events = session.drain_events();
    let killed = events
        .iter()
        .filter(|e| matches!(e, SessionEvent::CreatureKilled { .. }))
        .count();
    let removed = events
        .iter()
        .filter(|e| matches!(e, SessionEvent::CreatureRemoved { id: gone, source: None } if *gone == id.0))
        .count();
    assert_eq!((killed, removed), (1, 1));

    session.tick(0.05);
    assert!(!session
        .drain_events()
        .iter()
        .any(|e| matches!(e, SessionEvent::CreatureRemoved { .. })));
}

#[test]
fn attacks_respect_cooldown_and_reach() {
    let mut session = Session::new(quiet()).expect("session");
    let feet = session.player().position;
    let near = session
        .summon("dummy", feet + Vec3::new(2.0, 0.0, 0.0))
        .expect("dummy");
    let far = session
        .summon("dummy", feet + Vec3::new(0.0, 0.0, 12.0))
        .expect("dummy");
    assert_eq!(
        session.summon("dragon", feet),
        Err(SessionError::UnknownSpecies("dragon".to_string()))
    );

    session.attack_creature(near).expect("first swing");
    assert!(matches!(
        session.attack_creature(near),
        Err(SessionError::OnCooldown { .. })
    ));

    for _ in 0..11 {
        session.tick(0.05);
    }
    assert!(matches!(
        session.attack_creature(far),
        Err(SessionError::OutOfReach { .. })
    ));
}

#[test]
fn placing_uses_one_unit_of_the_selection() {
    let mut session = Session::new(quiet()).expect("session");
    assert!(session.select_hotbar(0));
    assert_eq!(session.screen().selected_kind(), Some(ItemKind::Dirt));

    let cell = BlockGrid::cell_of(session.player().position) + IVec3::new(0, 2, 0);
    assert_eq!(session.place_selected_block(cell), Ok(ItemKind::Dirt));
    assert_eq!(session.inventory().count(ItemKind::Dirt), 2);
    assert_eq!(session.screen().selected_count(), 2);
    assert!(session.grid().is_solid(cell));
    assert_eq!(session.terrain().get(cell), Some(ItemKind::Dirt));
    assert_eq!(
        session.place_selected_block(cell),
        Err(SessionError::Occupied(cell))
    );

    assert!(session.select_hotbar(1));
    assert_eq!(session.screen().selected_kind(), Some(ItemKind::Wood));
    assert!(session
        .place_selected_block(cell + IVec3::Y)
        .is_ok());
    assert_eq!(session.inventory().count(ItemKind::Wood), 1);
}

#[test]
fn eating_takes_food_immediately_and_finishes_later() {
    let mut config = quiet();
    config
        .session
        .starting_items
        .insert("beef".to_string(), 1);
    let mut session = Session::new(config).expect("session");

    assert_eq!(
        session.eat(ItemKind::Dirt),
        Err(SessionError::Eat(EatError::NotFood(ItemKind::Dirt)))
    );
    // Hotbar: dirt, wood, beef.
    assert!(session.select_hotbar(2));
    assert_eq!(session.screen().selected_kind(), Some(ItemKind::Beef));
    session.eat(ItemKind::Beef).expect("beef is food");
    assert!(session.player().is_eating());
    assert_eq!(session.inventory().count(ItemKind::Beef), 0);
    assert_eq!(session.screen().shown(ItemKind::Beef), 0);
    assert_eq!(session.screen().selected_kind(), None);
    assert!(session
        .drain_events()
        .contains(&SessionEvent::InventoryChanged {
            item: ItemKind::Beef,
            count: 0
        }));

    let at = session.player().position + Vec3::new(2.0, 0.0, 0.0);
    let id = session.summon("dummy", at).expect("dummy configured");
    assert_eq!(session.attack_creature(id), Err(SessionError::Eating));

    for _ in 0..60 {
        session.tick(0.05);
    }
    assert!(!session.player().is_eating());
    assert_eq!(
        session.eat(ItemKind::Beef),
        Err(SessionError::Eat(EatError::NoneLeft(ItemKind::Beef)))
    );
}

#[test]
fn harvesting_adds_up_hits_until_the_block_breaks() {
    let mut config = quiet();
    config.session.attack_cooldown = 0.0;
    config
        .session
        .starting_items
        .insert("stone_pickaxe".to_string(), 1);
    let mut session = Session::new(config).expect("session");
    let feet = BlockGrid::cell_of(session.player().position);
    let above = feet + IVec3::new(0, 2, 0);

    // Hotbar: dirt, wood, stone pickaxe. Wood in hand hits like a bare fist.
    assert!(session.select_hotbar(1));
    assert_eq!(session.place_selected_block(above), Ok(ItemKind::Wood));
    assert_eq!(session.harvest_block(above), Ok(None));
    assert_eq!(session.harvest_block(above), Ok(None));
    assert!(session.grid().is_solid(above));
    assert_eq!(session.harvest_block(above), Ok(Some(ItemKind::Wood)));
    assert!(!session.grid().is_solid(above));
    assert_eq!(session.terrain().get(above), None);
    assert_eq!(session.inventory().count(ItemKind::Wood), 2);
    assert_eq!(session.screen().shown(ItemKind::Wood), 2);

    assert!(session.place_selected_block(above).is_ok());
    assert!(session.select_hotbar(2));
    assert_eq!(session.screen().selected_kind(), Some(ItemKind::StonePickaxe));
    assert_eq!(session.harvest_block(above), Ok(Some(ItemKind::Wood)));

    let under = feet - IVec3::Y;
    assert_eq!(session.terrain().get(under), Some(ItemKind::Grass));
    assert_eq!(session.harvest_block(under), Ok(Some(ItemKind::Dirt)));
    assert_eq!(session.inventory().count(ItemKind::Dirt), 4);
    assert_eq!(session.screen().shown(ItemKind::Dirt), 4);
    assert_eq!(session.stats().blocks_harvested, 3);

    assert_eq!(
        session.harvest_block(IVec3::ZERO),
        Err(SessionError::Unbreakable(ItemKind::Bedrock, IVec3::ZERO))
    );
    assert_eq!(
        session.harvest_block(feet + IVec3::new(0, 4, 0)),
        Err(SessionError::NoBlock(feet + IVec3::new(0, 4, 0)))
    );
    assert!(matches!(
        session.harvest_block(IVec3::new(7, 1, 7)),
        Err(SessionError::OutOfReach { .. })
    ));

    let harvested = session
        .drain_events()
        .into_iter()
        .filter(|e| matches!(e, SessionEvent::BlockHarvested { .. }))
        .count();
    assert_eq!(harvested, 3);
}

#[test]
fn harvesting_shares_the_swing_cooldown_and_waits_for_meals() {
    let mut config = quiet();
    config
        .session
        .starting_items
        .insert("pork".to_string(), 1);
    let mut session = Session::new(config).expect("session");
    let under = BlockGrid::cell_of(session.player().position) - IVec3::Y;
    let at = session.player().position + Vec3::new(2.0, 0.0, 0.0);
    let id = session.summon("dummy", at).expect("dummy configured");

    assert_eq!(session.harvest_block(under), Ok(None));
    assert!(matches!(
        session.attack_creature(id),
        Err(SessionError::OnCooldown { .. })
    ));

    session.eat(ItemKind::Pork).expect("pork is food");
    for _ in 0..11 {
        session.tick(0.05);
    }
    assert_eq!(session.harvest_block(under), Err(SessionError::Eating));
    for _ in 0..30 {
        session.tick(0.05);
    }
    assert!(!session.player().is_eating());
    assert_eq!(session.harvest_block(under), Ok(Some(ItemKind::Dirt)));
}
