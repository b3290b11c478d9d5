//! One running game: terrain, player, creatures and the inventory screen stepped together.

use crate::config::GameConfig;
use anyhow::{Context, Result};
use glam::{IVec3, Vec3};
use rand::rngs::StdRng;
use serde::Serialize;
use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, info};
use voxelwild_core::{scoped_rng, ItemCatalog, ItemKind, SimTick};
use voxelwild_physics::{Aabb, BlockGrid};
use voxelwild_ui::{
    DropOutcome, InventoryScreen, SlotRef, StatDisplay, StatPanel, TransferError, TransferMode,
};
use voxelwild_world::{
    Arrow, ArrowStep, CombatAction, Creature, CreatureId, DamageOutcome, DayNightCycle, EatError,
    Inventory, ItemDrop, Phase, PlayerState, RecipeBook, SpawnRequest, Spawner, TerrainMap,
};

/// RNG domain for everything the session rolls at runtime.
const SESSION_DOMAIN: u64 = 0x5E55_10;

/// Which spawner a creature came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SpawnerRole {
    /// Daytime animal spawner.
    Animals,
    /// Night-time monster spawner.
    Monsters,
}

impl SpawnerRole {
    /// Both roles, in tick order.
    pub const ALL: [SpawnerRole; 2] = [SpawnerRole::Animals, SpawnerRole::Monsters];

    /// Canonical lowercase string key for logging.
    pub const fn as_str(self) -> &'static str {
        match self {
            SpawnerRole::Animals => "animals",
            SpawnerRole::Monsters => "monsters",
        }
    }
}

/// Something observable that happened during a session.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum SessionEvent {
    /// The day/night cycle entered a new phase.
    PhaseChanged {
        /// Phase entered.
        phase: Phase,
    },
    /// A spawner produced a creature.
    CreatureSpawned {
        /// Creature id.
        id: u64,
        /// Species name.
        species: String,
        /// Spawner it came from; `None` when summoned.
        source: Option<SpawnerRole>,
        /// Feet position.
        position: Vec3,
    },
    /// A creature was killed by the player.
    CreatureKilled {
        /// Creature id.
        id: u64,
        /// Species name.
        species: String,
        /// Loot granted to the inventory.
        drop: Option<ItemDrop>,
    },
    /// A dead creature left the world.
    CreatureRemoved {
        /// Creature id.
        id: u64,
        /// Spawner notified, if any.
        source: Option<SpawnerRole>,
    },
    /// The player lost hit points.
    PlayerDamaged {
        /// Hit points actually lost.
        amount: u32,
        /// Hit points left.
        hp: u32,
    },
    /// A finished meal restored hit points.
    PlayerHealed {
        /// Hit points restored.
        amount: u32,
        /// Hit points after healing.
        hp: u32,
    },
    /// The player's hit points reached zero.
    PlayerDied,
    /// A ranged creature released an arrow.
    ArrowFired {
        /// Shooter id.
        by: u64,
        /// Launch position.
        from: Vec3,
    },
    /// The inventory count of a kind changed.
    InventoryChanged {
        /// Kind affected.
        item: ItemKind,
        /// Count after the change.
        count: u32,
    },
    /// A block from the hotbar selection was placed.
    BlockPlaced {
        /// Cell filled.
        cell: IVec3,
        /// Kind placed.
        item: ItemKind,
    },
    /// A world block broke and its drop went to the inventory.
    BlockHarvested {
        /// Cell emptied.
        cell: IVec3,
        /// Kind that stood there.
        block: ItemKind,
        /// Kind added to the inventory.
        item: ItemKind,
    },
}

impl SessionEvent {
    /// Short label for logs and event streams.
    pub fn label(&self) -> &'static str {
        match self {
            SessionEvent::PhaseChanged { .. } => "phase_changed",
            SessionEvent::CreatureSpawned { .. } => "creature_spawned",
            SessionEvent::CreatureKilled { .. } => "creature_killed",
            SessionEvent::CreatureRemoved { .. } => "creature_removed",
            SessionEvent::PlayerDamaged { .. } => "player_damaged",
            SessionEvent::PlayerHealed { .. } => "player_healed",
            SessionEvent::PlayerDied => "player_died",
            SessionEvent::ArrowFired { .. } => "arrow_fired",
            SessionEvent::InventoryChanged { .. } => "inventory_changed",
            SessionEvent::BlockPlaced { .. } => "block_placed",
            SessionEvent::BlockHarvested { .. } => "block_harvested",
        }
    }
}

/// Why a player action was refused.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SessionError {
    /// The player is dead.
    #[error("player is dead")]
    PlayerDead,
    /// Swings wait until the current meal is finished.
    #[error("player is eating")]
    Eating,
    /// No live creature has this id.
    #[error("no live creature {0}")]
    NoSuchCreature(CreatureId),
    /// The previous swing has not recovered yet.
    #[error("attack on cooldown for {remaining:.2}s")]
    OnCooldown {
        /// Seconds until the next swing.
        remaining: f32,
    },
    /// The target is farther than the action allows.
    #[error("target {distance:.2} away, reach is {reach:.2}")]
    OutOfReach {
        /// Distance to the target.
        distance: f32,
        /// Allowed distance.
        reach: f32,
    },
    /// No hotbar slot is selected.
    #[error("no hotbar slot selected")]
    NothingSelected,
    /// The selected kind cannot be placed.
    #[error("{} cannot be placed", .0.as_str())]
    NotPlaceable(ItemKind),
    /// Nothing stands in the target cell.
    #[error("cell {0} is empty")]
    NoBlock(IVec3),
    /// The block in the target cell cannot be broken.
    #[error("{} at {1} cannot be broken", .0.as_str())]
    Unbreakable(ItemKind, IVec3),
    /// The target cell already holds a solid block.
    #[error("cell {0} is occupied")]
    Occupied(IVec3),
    /// A body stands in the target cell.
    #[error("cell {0} is obstructed")]
    Obstructed(IVec3),
    /// The inventory screen is holding a drag.
    #[error("a drag is in progress")]
    DragInProgress,
    /// No species with this name is configured.
    #[error("unknown species {0:?}")]
    UnknownSpecies(String),
    /// Eating could not start.
    #[error(transparent)]
    Eat(#[from] EatError),
}

/// Running totals kept for reports.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SessionStats {
    /// Creatures spawned per species.
    pub spawned: BTreeMap<String, usize>,
    /// Creatures killed per species.
    pub killed: BTreeMap<String, usize>,
    /// Arrows released.
    pub arrows_fired: usize,
    /// Hit points the player lost in total.
    pub damage_taken: u32,
    /// Blocks placed.
    pub blocks_placed: usize,
    /// Blocks broken and collected.
    pub blocks_harvested: usize,
}

#[derive(Debug)]
struct Tracked {
    creature: Creature,
    source: Option<SpawnerRole>,
}

/// A running game.
pub struct Session {
    config: GameConfig,
    catalog: Arc<ItemCatalog>,
    recipes: Arc<RecipeBook>,
    terrain: TerrainMap,
    grid: BlockGrid,
    player: PlayerState,
    inventory: Inventory,
    screen: InventoryScreen<StatPanel>,
    creatures: Vec<Tracked>,
    arrows: Vec<Arrow>,
    animals: Spawner,
    monsters: Spawner,
    cycle: DayNightCycle,
    rng: StdRng,
    clock: f32,
    tick: SimTick,
    next_id: u64,
    next_attack_at: f32,
    block_hits: HashMap<IVec3, u32>,
    events: Vec<SessionEvent>,
    stats: SessionStats,
}

impl Session {
    /// Generate the world and spawn the player at the centre column.
    pub fn new(config: GameConfig) -> Result<Self> {
        let catalog = Arc::new(ItemCatalog::with_defaults());
        let recipes = match &config.session.recipes {
            Some(path) => RecipeBook::load_from_file(path)
                .with_context(|| format!("failed to load recipes from {}", path.display()))?,
            None => RecipeBook::with_defaults(),
        };
        let recipes = Arc::new(recipes);

        let seed = config.world.seed;
        let terrain = TerrainMap::generate(&config.world.terrain, seed);
        let grid = terrain.to_grid();

        let (cx, cz) = (config.world.terrain.width / 2, config.world.terrain.depth / 2);
        let (surface, _) = grid
            .surface_at(cx, cz)
            .with_context(|| format!("no terrain under spawn column ({cx}, {cz})"))?;
        let spawn = Vec3::new(cx as f32 + 0.5, (surface.y + 1) as f32, cz as f32 + 0.5);
        let player = PlayerState::new(spawn, config.player);

        let mut inventory = Inventory::new();
        for (kind, count) in config.starting_items() {
            inventory.add(kind, count);
        }

        let mut screen =
            InventoryScreen::new(Arc::clone(&catalog), Arc::clone(&recipes), StatPanel::new());
        screen.sync(&inventory);

        let animals = Spawner::new(
            config.animal_spawner.clone(),
            config.roster_for(&config.animal_spawner),
        );
        let monsters = Spawner::new(
            config.monster_spawner.clone(),
            config.roster_for(&config.monster_spawner),
        );
        let cycle = DayNightCycle::new(config.day_night);

        info!(
            seed,
            blocks = terrain.len(),
            trees = terrain.trees().len(),
            x = spawn.x,
            y = spawn.y,
            z = spawn.z,
            "Session ready"
        );

        let mut session = Self {
            rng: scoped_rng(seed, SESSION_DOMAIN, SimTick::ZERO),
            config,
            catalog,
            recipes,
            terrain,
            grid,
            player,
            inventory,
            screen,
            creatures: Vec::new(),
            arrows: Vec::new(),
            animals,
            monsters,
            cycle,
            clock: 0.0,
            tick: SimTick::ZERO,
            next_id: 1,
            next_attack_at: 0.0,
            block_hits: HashMap::new(),
            events: Vec::new(),
            stats: SessionStats::default(),
        };
        let phase = session.cycle.phase();
        session.apply_phase(phase);
        session.deliver_inventory_changes();
        Ok(session)
    }

    /// Configuration the session was built from.
    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    /// Item capabilities.
    pub fn catalog(&self) -> &ItemCatalog {
        &self.catalog
    }

    /// Recipes the crafting grid matches against.
    pub fn recipes(&self) -> &RecipeBook {
        &self.recipes
    }

    /// Placed blocks.
    pub fn terrain(&self) -> &TerrainMap {
        &self.terrain
    }

    /// Collision grid.
    pub fn grid(&self) -> &BlockGrid {
        &self.grid
    }

    /// Player state.
    pub fn player(&self) -> &PlayerState {
        &self.player
    }

    /// Player inventory.
    pub fn inventory(&self) -> &Inventory {
        &self.inventory
    }

    /// Inventory screen.
    pub fn screen(&self) -> &InventoryScreen<StatPanel> {
        &self.screen
    }

    /// Live creatures.
    pub fn creatures(&self) -> impl Iterator<Item = &Creature> + '_ {
        self.creatures.iter().map(|tracked| &tracked.creature)
    }

    /// Creature by id.
    pub fn creature(&self, id: CreatureId) -> Option<&Creature> {
        self.creatures().find(|creature| creature.id() == id)
    }

    /// Arrows in flight.
    pub fn arrows(&self) -> &[Arrow] {
        &self.arrows
    }

    /// Spawner for `role`.
    pub fn spawner(&self, role: SpawnerRole) -> &Spawner {
        match role {
            SpawnerRole::Animals => &self.animals,
            SpawnerRole::Monsters => &self.monsters,
        }
    }

    fn spawner_mut(&mut self, role: SpawnerRole) -> &mut Spawner {
        match role {
            SpawnerRole::Animals => &mut self.animals,
            SpawnerRole::Monsters => &mut self.monsters,
        }
    }

    /// Day/night state.
    pub fn cycle(&self) -> &DayNightCycle {
        &self.cycle
    }

    /// Simulated seconds elapsed.
    pub fn clock(&self) -> f32 {
        self.clock
    }

    /// Steps taken.
    pub fn tick_count(&self) -> SimTick {
        self.tick
    }

    /// Running totals.
    pub fn stats(&self) -> &SessionStats {
        &self.stats
    }

    /// Take the events recorded since the last call.
    pub fn drain_events(&mut self) -> Vec<SessionEvent> {
        std::mem::take(&mut self.events)
    }

    /// Advance the whole world by `dt` seconds.
    pub fn tick(&mut self, dt: f32) {
        self.clock += dt;
        self.tick = self.tick.advance(1);

        if let Some(phase) = self.cycle.advance(dt) {
            info!(phase = phase.as_str(), "Phase changed");
            self.apply_phase(phase);
            self.events.push(SessionEvent::PhaseChanged { phase });
        }

        self.run_spawners(dt);
        self.run_creatures(dt);
        self.run_arrows(dt);

        let healed = self.player.tick(&self.grid, dt);
        if healed > 0 {
            self.events.push(SessionEvent::PlayerHealed {
                amount: healed,
                hp: self.player.hp(),
            });
        }

        self.remove_dead();
        self.deliver_inventory_changes();
    }

    fn apply_phase(&mut self, phase: Phase) {
        self.animals.set_enabled(phase.animals_spawn());
        self.monsters.set_enabled(phase.monsters_spawn());
    }

    fn run_spawners(&mut self, dt: f32) {
        for role in SpawnerRole::ALL {
            let spawner = match role {
                SpawnerRole::Animals => &mut self.animals,
                SpawnerRole::Monsters => &mut self.monsters,
            };
            if let Some(request) = spawner.tick(&self.grid, dt, &mut self.rng) {
                self.spawn(request, Some(role));
            }
        }
    }

    /// Create a creature of the configured species `name` at `position`.
    ///
    /// Summoned creatures count toward no spawner's cap.
    pub fn summon(&mut self, name: &str, position: Vec3) -> Result<CreatureId, SessionError> {
        let species = self
            .config
            .species
            .iter()
            .find(|species| species.profile.name == name)
            .cloned()
            .ok_or_else(|| SessionError::UnknownSpecies(name.to_string()))?;
        let id = self.spawn(
            SpawnRequest {
                species: Arc::new(species),
                position,
                yaw: 0.0,
            },
            None,
        );
        info!(creature = %id, species = name, "Summoned creature");
        Ok(id)
    }

    fn spawn(&mut self, request: SpawnRequest, source: Option<SpawnerRole>) -> CreatureId {
        let id = CreatureId(self.next_id);
        self.next_id += 1;

        let species = request.species;
        let creature = Creature::new(
            id,
            Some(Arc::new(species.profile.clone())),
            species.tuning,
            species.engage.build(),
            request.position,
            request.yaw,
        );
        *self
            .stats
            .spawned
            .entry(species.profile.name.clone())
            .or_default() += 1;
        self.events.push(SessionEvent::CreatureSpawned {
            id: id.0,
            species: species.profile.name.clone(),
            source,
            position: request.position,
        });
        self.creatures.push(Tracked { creature, source });
        id
    }

    fn run_creatures(&mut self, dt: f32) {
        let player = (!self.player.is_dead()).then_some(self.player.position);
        let mut actions = Vec::new();
        for tracked in &mut self.creatures {
            let creature = &mut tracked.creature;
            if let Some(action) = creature.tick(&self.grid, player, self.clock, dt, &mut self.rng) {
                actions.push((creature.id(), creature.position(), action));
            }
        }

        for (id, from, action) in actions {
            match action {
                CombatAction::Strike { damage, knockback } => {
                    debug!(creature = %id, damage, "Creature struck player");
                    self.damage_player(damage, from, Some(knockback));
                }
                CombatAction::Shoot(arrow) => {
                    self.stats.arrows_fired += 1;
                    self.events.push(SessionEvent::ArrowFired {
                        by: id.0,
                        from: arrow.position,
                    });
                    self.arrows.push(arrow);
                }
            }
        }
    }

    fn run_arrows(&mut self, dt: f32) {
        let body = (!self.player.is_dead()).then(|| self.player.body());
        let mut hits = Vec::new();
        for arrow in &mut self.arrows {
            if let ArrowStep::HitPlayer { damage, at } = arrow.tick(&self.grid, body.as_ref(), dt) {
                hits.push((damage, at));
            }
        }
        self.arrows.retain(|arrow| !arrow.is_spent());

        for (damage, at) in hits {
            self.damage_player(damage, at, None);
        }
    }

    fn damage_player(&mut self, amount: u32, from: Vec3, force: Option<f32>) {
        if self.player.is_dead() {
            return;
        }
        let before = self.player.hp();
        let killed = self.player.take_damage(amount, from, force);
        let lost = before - self.player.hp();
        self.stats.damage_taken += lost;
        self.events.push(SessionEvent::PlayerDamaged {
            amount: lost,
            hp: self.player.hp(),
        });
        if killed {
            self.events.push(SessionEvent::PlayerDied);
        }
    }

    fn remove_dead(&mut self) {
        let tracked = std::mem::take(&mut self.creatures);
        let (dead, alive): (Vec<_>, Vec<_>) =
            tracked.into_iter().partition(|t| t.creature.is_removed());
        self.creatures = alive;

        for t in dead {
            if let Some(role) = t.source {
                self.spawner_mut(role).notify_death();
            }
            debug!(
                creature = %t.creature.id(),
                source = t.source.map_or("summoned", SpawnerRole::as_str),
                "Creature removed"
            );
            self.events.push(SessionEvent::CreatureRemoved {
                id: t.creature.id().0,
                source: t.source,
            });
        }
    }

    fn deliver_inventory_changes(&mut self) {
        for change in self.inventory.drain_changes() {
            self.events.push(SessionEvent::InventoryChanged {
                item: change.kind,
                count: change.count,
            });
        }
        self.screen.sync(&self.inventory);
        let (hp, max_hp) = (self.player.hp(), self.player.max_hp());
        self.screen.display_mut().show_health(hp, max_hp);
    }

    fn ready_to_swing(&self) -> Result<(), SessionError> {
        if self.player.is_dead() {
            return Err(SessionError::PlayerDead);
        }
        if self.player.is_eating() {
            return Err(SessionError::Eating);
        }
        if self.clock < self.next_attack_at {
            return Err(SessionError::OnCooldown {
                remaining: self.next_attack_at - self.clock,
            });
        }
        Ok(())
    }

    /// Hit creature `id` with whatever the hotbar selection holds.
    ///
    /// Loot from a kill goes straight into the inventory. The swing cooldown
    /// starts only when the creature actually took the damage.
    pub fn attack_creature(&mut self, id: CreatureId) -> Result<DamageOutcome, SessionError> {
        self.ready_to_swing()?;

        let origin = self.player.position;
        let reach = self.config.session.attack_reach;
        let damage = self
            .player
            .attack_damage(self.screen.selected_kind(), &self.catalog);

        let tracked = self
            .creatures
            .iter_mut()
            .find(|t| t.creature.id() == id && !t.creature.is_removed())
            .ok_or(SessionError::NoSuchCreature(id))?;
        let distance = tracked.creature.position().distance(origin);
        if distance > reach {
            return Err(SessionError::OutOfReach { distance, reach });
        }

        let outcome = tracked
            .creature
            .take_damage(damage, origin, self.clock, &mut self.rng);
        let species = tracked.creature.species().to_string();
        if outcome.applied {
            self.next_attack_at = self.clock + self.config.session.attack_cooldown;
        }
        debug!(creature = %id, damage, applied = outcome.applied, "Player attacked");

        if outcome.killed {
            *self.stats.killed.entry(species.clone()).or_default() += 1;
            if let Some(drop) = outcome.drop {
                self.inventory.add(drop.kind, drop.count);
            }
            info!(creature = %id, species = %species, "Creature killed");
            self.events.push(SessionEvent::CreatureKilled {
                id: id.0,
                species,
                drop: outcome.drop,
            });
        }
        self.deliver_inventory_changes();
        Ok(outcome)
    }

    /// Hit the world block in `cell` with whatever the hotbar selection holds.
    ///
    /// Damage accumulates per cell until it reaches the block's hardness; the
    /// block then leaves the world and its drop goes into the inventory.
    /// Shares the swing cooldown with [`Session::attack_creature`].
    pub fn harvest_block(&mut self, cell: IVec3) -> Result<Option<ItemKind>, SessionError> {
        self.ready_to_swing()?;
        let block = self.terrain.get(cell).ok_or(SessionError::NoBlock(cell))?;
        let hardness = block
            .hardness()
            .ok_or(SessionError::Unbreakable(block, cell))?;

        let reach = self.config.session.attack_reach;
        let distance = (cell.as_vec3() + Vec3::splat(0.5)).distance(self.player.position);
        if distance > reach {
            return Err(SessionError::OutOfReach { distance, reach });
        }

        let damage = self.catalog.block_damage(self.screen.selected_kind());
        self.next_attack_at = self.clock + self.config.session.attack_cooldown;
        let dealt = self.block_hits.entry(cell).or_default();
        *dealt += damage;
        debug!(block = block.as_str(), damage, dealt = *dealt, hardness, "Block hit");
        if *dealt < hardness {
            return Ok(None);
        }

        self.block_hits.remove(&cell);
        self.terrain.remove(cell);
        self.grid.clear(cell);
        let item = block.harvest_drop();
        self.inventory.add(item, 1);
        self.stats.blocks_harvested += 1;
        debug!(block = block.as_str(), x = cell.x, y = cell.y, z = cell.z, "Block harvested");
        self.events.push(SessionEvent::BlockHarvested { cell, block, item });
        self.deliver_inventory_changes();
        Ok(Some(item))
    }

    /// Live creature closest to the player, with its distance.
    pub fn nearest_creature(&self) -> Option<(CreatureId, f32)> {
        self.creatures()
            .filter(|creature| !creature.is_removed())
            .map(|creature| (creature.id(), creature.position().distance(self.player.position)))
            .min_by(|a, b| a.1.total_cmp(&b.1))
    }

    /// Put one unit of the selected hotbar kind into `cell`.
    pub fn place_selected_block(&mut self, cell: IVec3) -> Result<ItemKind, SessionError> {
        if self.player.is_dead() {
            return Err(SessionError::PlayerDead);
        }
        if self.screen.is_dragging() {
            return Err(SessionError::DragInProgress);
        }
        let kind = self
            .screen
            .selected_kind()
            .ok_or(SessionError::NothingSelected)?;
        if !self.catalog.is_placeable(kind) {
            return Err(SessionError::NotPlaceable(kind));
        }
        if self.grid.is_solid(cell) {
            return Err(SessionError::Occupied(cell));
        }

        let reach = self.config.session.place_reach;
        let distance = (cell.as_vec3() + Vec3::splat(0.5)).distance(self.player.position);
        if distance > reach {
            return Err(SessionError::OutOfReach { distance, reach });
        }

        let bounds = Aabb::unit_cell(cell);
        let blocked = bounds.intersects(&self.player.body().aabb())
            || self
                .creatures()
                .any(|creature| bounds.intersects(&creature.body().aabb()));
        if blocked {
            return Err(SessionError::Obstructed(cell));
        }

        let kind = self
            .screen
            .consume_one_from_selected(&mut self.inventory)
            .ok_or(SessionError::NothingSelected)?;
        self.grid.set(cell, TerrainMap::cell_kind(kind));
        self.terrain.set(cell, kind);
        self.block_hits.remove(&cell);
        self.stats.blocks_placed += 1;
        debug!(kind = kind.as_str(), x = cell.x, y = cell.y, z = cell.z, "Block placed");
        self.events.push(SessionEvent::BlockPlaced { cell, item: kind });
        self.deliver_inventory_changes();
        Ok(kind)
    }

    /// Start eating one unit of `kind`.
    pub fn eat(&mut self, kind: ItemKind) -> Result<(), SessionError> {
        if self.player.is_dead() {
            return Err(SessionError::PlayerDead);
        }
        self.player
            .start_eating(kind, &mut self.inventory, &self.catalog)?;
        self.deliver_inventory_changes();
        Ok(())
    }

    /// Walk toward `direction` on the horizontal plane; `Vec3::ZERO` stops.
    pub fn walk_player(&mut self, direction: Vec3) {
        self.player.set_walk(direction);
    }

    /// Open or close the inventory panel.
    pub fn toggle_panel(&mut self) -> bool {
        let open = self.screen.toggle_panel(&mut self.inventory);
        self.deliver_inventory_changes();
        open
    }

    /// Press on an inventory slot.
    pub fn pointer_down(&mut self, slot: SlotRef) -> Result<(), TransferError> {
        let pressed = self.screen.pointer_down(slot, &mut self.inventory);
        self.deliver_inventory_changes();
        pressed
    }

    /// Release the held stack over `target`.
    pub fn pointer_up(&mut self, target: Option<SlotRef>, mode: TransferMode) -> DropOutcome {
        let outcome = self.screen.pointer_up(target, mode, &mut self.inventory);
        self.deliver_inventory_changes();
        outcome
    }

    /// Select or deselect hotbar slot `index`.
    pub fn select_hotbar(&mut self, index: usize) -> bool {
        self.screen.toggle_select(index)
    }
}
