//! Player vitals: hit points, knockback, eating.

use crate::inventory::Inventory;
use crate::timer::Continuations;
use glam::Vec3;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use voxelwild_core::{ItemCatalog, ItemKind};
use voxelwild_physics::{Body, Locomotion};

/// Player constants.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlayerTuning {
    /// Hit points at spawn.
    pub max_hp: u32,
    /// Seconds knockback overrides movement.
    pub knockback_duration: f32,
    /// Knockback force when the attacker does not specify one.
    pub default_knockback: f32,
    /// Walking speed on land.
    pub walk_speed: f32,
    /// Walking speed while overlapping water.
    pub water_walk_speed: f32,
    /// Movement multiplier while eating.
    pub eating_speed_factor: f32,
    /// Vertical acceleration.
    pub gravity: f32,
    /// Body half width.
    pub body_radius: f32,
    /// Body height.
    pub body_height: f32,
}

impl Default for PlayerTuning {
    fn default() -> Self {
        Self {
            max_hp: 20,
            knockback_duration: 0.2,
            default_knockback: 4.0,
            walk_speed: 5.0,
            water_walk_speed: 2.0,
            eating_speed_factor: 0.4,
            gravity: -9.81,
            body_radius: 0.3,
            body_height: 1.8,
        }
    }
}

/// Why eating could not start.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum EatError {
    /// Another meal is still in progress.
    #[error("already eating")]
    AlreadyEating,
    /// The kind is not food.
    #[error("{} is not edible", .0.as_str())]
    NotFood(ItemKind),
    /// The inventory has none of the kind.
    #[error("no {} left to eat", .0.as_str())]
    NoneLeft(ItemKind),
}

/// The player's simulated state.
#[derive(Debug, Clone)]
pub struct PlayerState {
    /// Feet position.
    pub position: Vec3,
    tuning: PlayerTuning,
    hp: u32,
    vertical_velocity: f32,
    knockback_velocity: Vec3,
    knockback_timer: f32,
    walk_direction: Vec3,
    in_water: bool,
    meals: Continuations<u32>,
    dead: bool,
}

impl PlayerState {
    /// Spawn a player at full health.
    pub fn new(position: Vec3, tuning: PlayerTuning) -> Self {
        Self {
            position,
            tuning,
            hp: tuning.max_hp,
            vertical_velocity: 0.0,
            knockback_velocity: Vec3::ZERO,
            knockback_timer: 0.0,
            walk_direction: Vec3::ZERO,
            in_water: false,
            meals: Continuations::new(),
            dead: false,
        }
    }

    /// Remaining hit points.
    pub fn hp(&self) -> u32 {
        self.hp
    }

    /// Maximum hit points.
    pub fn max_hp(&self) -> u32 {
        self.tuning.max_hp
    }

    /// Whether hit points reached zero.
    pub fn is_dead(&self) -> bool {
        self.dead
    }

    /// Whether a meal is in progress.
    pub fn is_eating(&self) -> bool {
        !self.meals.is_empty()
    }

    /// Knockback velocity currently applied.
    pub fn knockback_velocity(&self) -> Vec3 {
        self.knockback_velocity
    }

    /// Whether knockback currently overrides movement.
    pub fn is_knocked_back(&self) -> bool {
        self.knockback_timer > 0.0
    }

    /// Multiplier applied to voluntary movement.
    pub fn move_speed_factor(&self) -> f32 {
        if self.is_eating() {
            self.tuning.eating_speed_factor
        } else {
            1.0
        }
    }

    /// Set the planar direction the player walks in. `Vec3::ZERO` stands still.
    pub fn set_walk(&mut self, direction: Vec3) {
        self.walk_direction = Vec3::new(direction.x, 0.0, direction.z).normalize_or_zero();
    }

    /// Current planar walk direction (unit length or zero).
    pub fn walk_direction(&self) -> Vec3 {
        self.walk_direction
    }

    /// Walking speed after the water and eating modifiers.
    pub fn walk_speed(&self) -> f32 {
        let base = if self.in_water {
            self.tuning.water_walk_speed
        } else {
            self.tuning.walk_speed
        };
        base * self.move_speed_factor()
    }

    /// Collision body at the current position.
    pub fn body(&self) -> Body {
        Body::new(self.position, self.tuning.body_radius, self.tuning.body_height)
    }

    /// Damage the player holding `held` deals to creatures.
    pub fn attack_damage(&self, held: Option<ItemKind>, catalog: &ItemCatalog) -> u32 {
        catalog.entity_damage(held)
    }

    /// Apply damage from an attacker at `attacker`. Returns `true` if this hit killed.
    ///
    /// `force` defaults to the tuned knockback when `None`.
    pub fn take_damage(&mut self, amount: u32, attacker: Vec3, force: Option<f32>) -> bool {
        if self.dead {
            return false;
        }
        self.hp = self.hp.saturating_sub(amount);

        let mut dir = self.position - attacker;
        dir.y = 0.3;
        let force = force.unwrap_or(self.tuning.default_knockback);
        self.knockback_velocity = dir.normalize_or_zero() * force;
        self.knockback_timer = self.tuning.knockback_duration;

        tracing::debug!(amount, hp = self.hp, "Player damaged");

        if self.hp == 0 {
            self.dead = true;
            tracing::info!("Player died");
            return true;
        }
        false
    }

    /// Eat one unit of `kind` from `inventory`.
    ///
    /// The meal always finishes after the catalog duration, even if the player
    /// is hit or the item runs out in the meantime.
    pub fn start_eating(
        &mut self,
        kind: ItemKind,
        inventory: &mut Inventory,
        catalog: &ItemCatalog,
    ) -> Result<(), EatError> {
        if self.is_eating() {
            return Err(EatError::AlreadyEating);
        }
        let (seconds, nourishment) = catalog.consumable(kind).ok_or(EatError::NotFood(kind))?;
        if !inventory.consume(kind, 1) {
            return Err(EatError::NoneLeft(kind));
        }
        self.meals.start(seconds, nourishment);
        tracing::debug!(kind = kind.as_str(), seconds, "Player started eating");
        Ok(())
    }

    /// Advance one frame. Returns the hit points restored by finished meals.
    pub fn tick<L: Locomotion>(&mut self, world: &L, dt: f32) -> u32 {
        let mut healed = 0;
        for nourishment in self.meals.tick(dt) {
            if self.dead {
                continue;
            }
            let before = self.hp;
            self.hp = (self.hp + nourishment).min(self.tuning.max_hp);
            healed += self.hp - before;
        }

        if self.dead {
            return healed;
        }

        if self.knockback_timer > 0.0 {
            let outcome = world.move_body(&self.body(), self.knockback_velocity * dt);
            self.position = outcome.position;
            self.knockback_timer -= dt;
            if self.knockback_timer <= 0.0 {
                self.knockback_velocity = Vec3::ZERO;
            }
            return healed;
        }

        self.vertical_velocity += self.tuning.gravity * dt;
        let step = self.walk_direction * (self.walk_speed() * dt)
            + Vec3::Y * (self.vertical_velocity * dt);
        let outcome = world.move_body(&self.body(), step);
        self.position = outcome.position;
        self.in_water = outcome.in_water;
        if outcome.grounded && self.vertical_velocity < 0.0 {
            self.vertical_velocity = -2.0;
        }
        healed
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::IVec3;
    use voxelwild_physics::{BlockGrid, Cell};

    fn floor() -> BlockGrid {
        let mut grid = BlockGrid::new();
        for x in -4..4 {
            for z in -4..4 {
                grid.set(IVec3::new(x, 0, z), Cell::Solid);
            }
        }
        grid
    }

    #[test]
    fn damage_clamps_and_kills() {
        let mut player = PlayerState::new(Vec3::new(0.5, 1.0, 0.5), PlayerTuning::default());
        assert!(!player.take_damage(15, Vec3::new(2.5, 1.0, 0.5), Some(4.0)));
        assert_eq!(player.hp(), 5);
        assert!(player.take_damage(15, Vec3::ZERO, None));
        assert_eq!(player.hp(), 0);
        assert!(player.is_dead());
        assert!(!player.take_damage(1, Vec3::ZERO, None));
    }

    #[test]
    fn knockback_points_away_with_lift() {
        let mut player = PlayerState::new(Vec3::new(0.5, 1.0, 0.5), PlayerTuning::default());
        player.take_damage(1, Vec3::new(1.5, 1.0, 0.5), Some(4.0));
        let kb = player.knockback_velocity();
        assert!(kb.x < 0.0 && kb.y > 0.0);
        assert!((kb.length() - 4.0).abs() < 1e-4);
        assert!(player.is_knocked_back());

        let grid = floor();
        for _ in 0..5 {
            player.tick(&grid, 0.05);
        }
        assert!(!player.is_knocked_back());
        assert!(player.position.x < 0.5);
    }

    #[test]
    fn eating_consumes_one_and_always_finishes() {
        let catalog = ItemCatalog::with_defaults();
        let mut inventory = Inventory::new();
        inventory.add(ItemKind::Beef, 1);
        let mut player = PlayerState::new(Vec3::new(0.5, 1.0, 0.5), PlayerTuning::default());
        player.take_damage(6, Vec3::new(0.5, 1.0, -0.5), None);

        assert_eq!(
            player.start_eating(ItemKind::Stone, &mut inventory, &catalog),
            Err(EatError::NotFood(ItemKind::Stone))
        );
        player
            .start_eating(ItemKind::Beef, &mut inventory, &catalog)
            .expect("beef is edible");
        assert_eq!(inventory.count(ItemKind::Beef), 0);
        assert_eq!(player.move_speed_factor(), 0.4);
        assert_eq!(
            player.start_eating(ItemKind::Beef, &mut inventory, &catalog),
            Err(EatError::AlreadyEating)
        );

        let grid = floor();
        let mut healed = 0;
        for _ in 0..40 {
            healed += player.tick(&grid, 0.05);
        }
        assert!(!player.is_eating());
        assert_eq!(healed, 4);
        assert_eq!(player.hp(), 18);
        assert_eq!(
            player.start_eating(ItemKind::Beef, &mut inventory, &catalog),
            Err(EatError::NoneLeft(ItemKind::Beef))
        );
    }

    #[test]
    fn eating_slows_walking() {
        let mut grid = BlockGrid::new();
        for x in -2..16 {
            for z in -2..2 {
                grid.set(IVec3::new(x, 0, z), Cell::Solid);
            }
        }
        let walk_one_second = |player: &mut PlayerState| {
            let start = player.position.x;
            for _ in 0..20 {
                player.tick(&grid, 0.05);
            }
            player.position.x - start
        };

        let mut player = PlayerState::new(Vec3::new(0.5, 1.0, 0.5), PlayerTuning::default());
        player.set_walk(Vec3::new(3.0, 1.0, 0.0));
        assert_eq!(player.walk_direction(), Vec3::X);
        let normal = walk_one_second(&mut player);
        assert!((normal - 5.0).abs() < 1e-3, "walked {normal}");

        let catalog = ItemCatalog::with_defaults();
        let mut inventory = Inventory::new();
        inventory.add(ItemKind::Pork, 1);
        player
            .start_eating(ItemKind::Pork, &mut inventory, &catalog)
            .expect("pork is edible");
        let eating = walk_one_second(&mut player);
        assert!((eating - normal * 0.4).abs() < 1e-3, "walked {eating}");
        assert!((player.position.y - 1.0).abs() < 1e-3);
    }

    #[test]
    fn bare_hand_and_sword_damage() {
        let catalog = ItemCatalog::with_defaults();
        let player = PlayerState::new(Vec3::ZERO, PlayerTuning::default());
        assert_eq!(player.attack_damage(None, &catalog), 1);
        assert_eq!(player.attack_damage(Some(ItemKind::DiamondSword), &catalog), 8);
    }
}
