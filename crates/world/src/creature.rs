//! Creature behavior controller.
//!
//! Every creature shares the same locomotion: wander or flee, filter the desired
//! velocity through forward probes, integrate gravity and knockback, and resolve
//! the displacement through a [`Locomotion`] collaborator. Species differences
//! live in an optional [`Engage`] strategy that gets the first say each tick.

use crate::engage::{CombatAction, Engage, EngageView};
use crate::timer::Continuations;
use glam::Vec3;
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::f32::consts::{PI, TAU};
use std::fmt;
use std::sync::Arc;
use voxelwild_core::ItemKind;
use voxelwild_physics::{Body, Locomotion, SpatialQuery};

/// Below this squared length a velocity counts as "not moving".
const MOVE_EPSILON_SQ: f32 = 1e-4;

/// Below this squared length a wander direction counts as idle.
const WANDER_EPSILON_SQ: f32 = 1e-3;

/// Stable creature identifier assigned by the session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct CreatureId(pub u64);

impl fmt::Display for CreatureId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Probabilistic item drop rolled on death.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DropTable {
    /// Item dropped.
    pub kind: ItemKind,
    /// Minimum amount (inclusive).
    pub min: u32,
    /// Maximum amount (inclusive).
    pub max: u32,
    /// Probability in `[0, 1]` that anything drops.
    pub chance: f32,
}

impl Default for DropTable {
    fn default() -> Self {
        Self {
            kind: ItemKind::Dirt,
            min: 0,
            max: 2,
            chance: 0.75,
        }
    }
}

impl DropTable {
    /// Roll the table. A roll that lands on zero items yields nothing.
    pub fn roll<R: Rng + ?Sized>(&self, rng: &mut R) -> Option<ItemDrop> {
        if rng.gen::<f32>() > self.chance {
            return None;
        }
        let (lo, hi) = (self.min.min(self.max), self.min.max(self.max));
        let count = rng.gen_range(lo..=hi);
        (count > 0).then_some(ItemDrop {
            kind: self.kind,
            count,
        })
    }
}

/// Items produced by a death.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemDrop {
    /// Item kind.
    pub kind: ItemKind,
    /// Amount.
    pub count: u32,
}

/// Per-species data bundle: speeds, flee thresholds and drops.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BehaviorProfile {
    /// Species name used in logs and config.
    pub name: String,
    /// Hit points at spawn.
    pub max_hp: u32,
    /// Wandering speed.
    pub walk_speed: f32,
    /// Fleeing (and chasing) speed.
    pub flee_speed: f32,
    /// Enter the scared state after taking damage.
    pub flee_when_attacked: bool,
    /// Flee whenever the player is within `flee_distance`.
    pub flee_when_player_near: bool,
    /// Proximity flee radius.
    pub flee_distance: f32,
    /// Spawn facing a random direction.
    pub use_random_rotation: bool,
    /// Death drop, if any.
    pub drop: Option<DropTable>,
}

impl Default for BehaviorProfile {
    fn default() -> Self {
        Self {
            name: "creature".to_string(),
            max_hp: 5,
            walk_speed: 2.0,
            flee_speed: 4.0,
            flee_when_attacked: true,
            flee_when_player_near: false,
            flee_distance: 6.0,
            use_random_rotation: true,
            drop: Some(DropTable::default()),
        }
    }
}

/// Locomotion constants shared by a species.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LocomotionTuning {
    /// Shortest wander leg in seconds.
    pub min_wander_time: f32,
    /// Longest wander leg in seconds.
    pub max_wander_time: f32,
    /// Probability that a new wander leg is spent standing still.
    pub idle_chance: f32,
    /// Jump height factor.
    pub jump_power: f32,
    /// Forward probe length.
    pub obstacle_check_distance: f32,
    /// Tallest obstacle (relative to the feet) the creature will jump.
    pub obstacle_max_height: f32,
    /// Probe sphere radius.
    pub obstacle_cast_radius: f32,
    /// Height above the feet the probes start from.
    pub probe_height: f32,
    /// Yaw easing rate.
    pub rotation_speed: f32,
    /// Vertical acceleration.
    pub gravity: f32,
    /// Seconds the scared state lasts.
    pub scared_duration: f32,
    /// Knockback magnitude lost per second.
    pub knockback_decay: f32,
    /// Horizontal knockback applied on damage.
    pub knockback_horizontal_force: f32,
    /// Vertical knockback applied on damage.
    pub knockback_up_force: f32,
    /// Body half width.
    pub body_radius: f32,
    /// Body height.
    pub body_height: f32,
    /// Seconds the damage tint stays on.
    pub damage_flash: f32,
    /// Vertical speed approached while in water.
    pub water_buoyancy: f32,
    /// Rate at which vertical speed approaches buoyancy.
    pub water_lerp_rate: f32,
    /// Planar speed multiplier in water.
    pub water_speed_factor: f32,
    /// Vertical speed held while grounded.
    pub grounded_settle_velocity: f32,
}

impl Default for LocomotionTuning {
    fn default() -> Self {
        Self {
            min_wander_time: 1.5,
            max_wander_time: 4.0,
            idle_chance: 0.3,
            jump_power: 5.0,
            obstacle_check_distance: 0.7,
            obstacle_max_height: 1.0,
            obstacle_cast_radius: 0.25,
            probe_height: 0.5,
            rotation_speed: 10.0,
            gravity: -9.81,
            scared_duration: 10.0,
            knockback_decay: 6.0,
            knockback_horizontal_force: 4.0,
            knockback_up_force: 1.2,
            body_radius: 0.4,
            body_height: 1.0,
            damage_flash: 0.15,
            water_buoyancy: 1.5,
            water_lerp_rate: 3.0,
            water_speed_factor: 0.5,
            grounded_settle_velocity: -2.0,
        }
    }
}

/// Render tint state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Tint {
    /// Untinted.
    Normal,
    /// Flashing after damage.
    Damaged,
}

/// Result of [`Creature::take_damage`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DamageOutcome {
    /// Whether the damage was applied at all.
    pub applied: bool,
    /// Whether this hit removed the creature.
    pub killed: bool,
    /// Items dropped by the death.
    pub drop: Option<ItemDrop>,
}

/// Move `current` toward `target` by at most `max_delta`, landing exactly on it.
pub fn move_towards(current: Vec3, target: Vec3, max_delta: f32) -> Vec3 {
    let delta = target - current;
    let distance = delta.length();
    if distance <= max_delta || distance == 0.0 {
        target
    } else {
        current + delta / distance * max_delta
    }
}

fn yaw_of(dir: Vec3) -> f32 {
    dir.x.atan2(dir.z)
}

fn wrap_angle(angle: f32) -> f32 {
    (angle + PI).rem_euclid(TAU) - PI
}

fn sample_range<R: Rng + ?Sized>(rng: &mut R, min: f32, max: f32) -> f32 {
    if max > min {
        rng.gen_range(min..max)
    } else {
        min
    }
}

/// A single creature.
pub struct Creature {
    id: CreatureId,
    profile: Option<Arc<BehaviorProfile>>,
    tuning: LocomotionTuning,
    engage: Option<Box<dyn Engage>>,
    position: Vec3,
    yaw: f32,
    target_yaw: f32,
    hp: u32,
    planar_velocity: Vec3,
    vertical_velocity: f32,
    knockback: Vec3,
    wander_dir: Vec3,
    wander_timer: f32,
    scared_until: Option<f32>,
    in_water: bool,
    grounded: bool,
    tint: Tint,
    flashes: Continuations<Tint>,
    removed: bool,
    disabled: bool,
}

impl fmt::Debug for Creature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Creature")
            .field("id", &self.id)
            .field("species", &self.species())
            .field("position", &self.position)
            .field("hp", &self.hp)
            .field("engage", &self.engage.as_ref().map(|e| e.name()))
            .field("removed", &self.removed)
            .finish()
    }
}

impl Creature {
    /// Create a creature at `position` facing `yaw` radians.
    ///
    /// A creature without a profile is inert: its first tick logs and disables it.
    pub fn new(
        id: CreatureId,
        profile: Option<Arc<BehaviorProfile>>,
        tuning: LocomotionTuning,
        engage: Option<Box<dyn Engage>>,
        position: Vec3,
        yaw: f32,
    ) -> Self {
        let hp = profile.as_ref().map(|p| p.max_hp).unwrap_or(0);
        Self {
            id,
            profile,
            tuning,
            engage,
            position,
            yaw,
            target_yaw: yaw,
            hp,
            planar_velocity: Vec3::ZERO,
            vertical_velocity: 0.0,
            knockback: Vec3::ZERO,
            wander_dir: Vec3::ZERO,
            wander_timer: 0.0,
            scared_until: None,
            in_water: false,
            grounded: false,
            tint: Tint::Normal,
            flashes: Continuations::new(),
            removed: false,
            disabled: false,
        }
    }

    /// Identifier.
    pub fn id(&self) -> CreatureId {
        self.id
    }

    /// Species name, or `"unconfigured"` without a profile.
    pub fn species(&self) -> &str {
        self.profile
            .as_ref()
            .map(|p| p.name.as_str())
            .unwrap_or("unconfigured")
    }

    /// Behavior profile, if any.
    pub fn profile(&self) -> Option<&BehaviorProfile> {
        self.profile.as_deref()
    }

    /// Feet position.
    pub fn position(&self) -> Vec3 {
        self.position
    }

    /// Heading in radians (0 faces +Z).
    pub fn yaw(&self) -> f32 {
        self.yaw
    }

    /// Remaining hit points.
    pub fn hp(&self) -> u32 {
        self.hp
    }

    /// Current knockback velocity.
    pub fn knockback(&self) -> Vec3 {
        self.knockback
    }

    /// Current wander direction (zero while idling).
    pub fn wander_direction(&self) -> Vec3 {
        self.wander_dir
    }

    /// Planar velocity chosen on the last tick.
    pub fn planar_velocity(&self) -> Vec3 {
        self.planar_velocity
    }

    /// Vertical velocity.
    pub fn vertical_velocity(&self) -> f32 {
        self.vertical_velocity
    }

    /// Whether the last move ended on the ground.
    pub fn is_grounded(&self) -> bool {
        self.grounded
    }

    /// Whether the creature overlaps water.
    pub fn is_in_water(&self) -> bool {
        self.in_water
    }

    /// Whether the creature is in its scared state.
    pub fn is_scared(&self) -> bool {
        self.scared_until.is_some()
    }

    /// Current render tint.
    pub fn tint(&self) -> Tint {
        self.tint
    }

    /// Whether hit points reached zero.
    pub fn is_removed(&self) -> bool {
        self.removed
    }

    /// Whether the controller shut itself off for lack of a profile.
    pub fn is_disabled(&self) -> bool {
        self.disabled
    }

    /// Whether the creature attacks the player.
    pub fn is_hostile(&self) -> bool {
        self.engage.is_some()
    }

    /// Whether a ranged creature shows a nocked arrow.
    pub fn arrow_nocked(&self) -> bool {
        self.engage.as_ref().is_some_and(|e| e.arrow_nocked())
    }

    /// Collision body at the current position.
    pub fn body(&self) -> Body {
        Body::new(self.position, self.tuning.body_radius, self.tuning.body_height)
    }

    fn right(&self) -> Vec3 {
        Vec3::new(self.yaw.cos(), 0.0, -self.yaw.sin())
    }

    /// Advance one frame. Returns the attack the engage strategy chose, if any.
    pub fn tick<W, R>(
        &mut self,
        world: &W,
        player: Option<Vec3>,
        now: f32,
        dt: f32,
        rng: &mut R,
    ) -> Option<CombatAction>
    where
        W: SpatialQuery + Locomotion,
        R: Rng + ?Sized,
    {
        if self.disabled || self.removed {
            return None;
        }
        let Some(profile) = self.profile.clone() else {
            tracing::error!(creature = %self.id, "Creature has no behavior profile; disabling");
            self.disabled = true;
            return None;
        };

        if self.scared_until.is_some_and(|until| now >= until) {
            self.scared_until = None;
        }

        let action = self.handle_behavior(world, &profile, player, now, dt, rng);
        self.apply_rotation(dt);
        self.apply_gravity(dt);

        let planar = self.planar_velocity + Vec3::new(self.knockback.x, 0.0, self.knockback.z);
        let vertical = self.vertical_velocity + self.knockback.y;
        let displacement = planar * dt + Vec3::Y * (vertical * dt);

        let outcome = world.move_body(&self.body(), displacement);
        self.position = outcome.position;
        self.grounded = outcome.grounded;
        self.in_water = outcome.in_water;

        self.knockback = move_towards(
            self.knockback,
            Vec3::ZERO,
            self.tuning.knockback_decay * dt,
        );

        if self.grounded && self.vertical_velocity < 0.0 {
            self.vertical_velocity = self.tuning.grounded_settle_velocity;
        }

        for tint in self.flashes.tick(dt) {
            self.tint = tint;
        }

        action
    }

    fn handle_behavior<W, R>(
        &mut self,
        world: &W,
        profile: &BehaviorProfile,
        player: Option<Vec3>,
        now: f32,
        dt: f32,
        rng: &mut R,
    ) -> Option<CombatAction>
    where
        W: SpatialQuery,
        R: Rng + ?Sized,
    {
        let view = EngageView {
            position: self.position,
            player,
            now,
            chase_speed: profile.flee_speed,
        };
        let decision = match (self.engage.as_mut(), player) {
            (Some(engage), Some(_)) => engage.engage(&view),
            _ => None,
        };
        if let Some(decision) = decision {
            self.set_planar_velocity(world, decision.desired_velocity);
            if let Some(face) = decision.face {
                self.face(face);
            }
            if let Some(action) = &decision.action {
                tracing::debug!(creature = %self.id, ?action, "Creature attacks");
            }
            return decision.action;
        }

        if let Some(player) = player {
            let fleeing = self.is_scared()
                || (profile.flee_when_player_near
                    && self.position.distance(player) <= profile.flee_distance);
            if fleeing {
                let mut away = self.position - player;
                away.y = 0.0;
                let away = away.normalize_or_zero();
                self.set_planar_velocity(world, away * profile.flee_speed);
                self.face(away);
                return None;
            }
        }

        self.wander_timer -= dt;
        if self.wander_timer <= 0.0 {
            self.pick_wander(rng);
        }

        let desired = if self.wander_dir.length_squared() > WANDER_EPSILON_SQ {
            self.wander_dir * profile.walk_speed
        } else {
            Vec3::ZERO
        };
        self.set_planar_velocity(world, desired);
        if self.wander_dir != Vec3::ZERO {
            self.face(self.wander_dir);
        }
        None
    }

    fn pick_wander<R: Rng + ?Sized>(&mut self, rng: &mut R) {
        self.wander_timer = sample_range(
            rng,
            self.tuning.min_wander_time,
            self.tuning.max_wander_time,
        );
        if rng.gen::<f32>() < self.tuning.idle_chance {
            self.wander_dir = Vec3::ZERO;
            return;
        }
        let angle = rng.gen_range(0.0..TAU);
        self.wander_dir = Vec3::new(angle.cos(), 0.0, angle.sin());
    }

    /// Filter `desired` through the forward probes and store it as the planar velocity.
    fn set_planar_velocity<W: SpatialQuery>(&mut self, world: &W, mut desired: Vec3) {
        if desired.length_squared() > MOVE_EPSILON_SQ {
            let dir = desired.normalize();
            let origin = self.position + Vec3::Y * self.tuning.probe_height;
            let radius = self.tuning.obstacle_cast_radius;
            let distance = self.tuning.obstacle_check_distance;

            let side = self.right() * (self.tuning.body_radius * 0.8).clamp(0.1, 0.5);
            let hit = [origin, origin + side, origin - side]
                .into_iter()
                .find_map(|probe| world.sphere_cast(probe, radius, dir, distance));

            if let Some(hit) = hit {
                let step = hit.top_y - self.position.y;
                if step <= self.tuning.obstacle_max_height && self.grounded {
                    self.vertical_velocity =
                        (self.tuning.jump_power * -2.0 * self.tuning.gravity).sqrt();
                    tracing::debug!(creature = %self.id, step, "Creature jumps obstacle");
                } else {
                    desired = Vec3::ZERO;
                }
            }
        }

        if self.in_water {
            desired *= self.tuning.water_speed_factor;
        }
        self.planar_velocity = desired;
    }

    fn face(&mut self, dir: Vec3) {
        if dir.length_squared() < MOVE_EPSILON_SQ {
            return;
        }
        self.target_yaw = yaw_of(dir);
    }

    fn apply_rotation(&mut self, dt: f32) {
        let t = (self.tuning.rotation_speed * dt).clamp(0.0, 1.0);
        self.yaw = wrap_angle(self.yaw + wrap_angle(self.target_yaw - self.yaw) * t);
    }

    fn apply_gravity(&mut self, dt: f32) {
        if self.in_water {
            let t = (dt * self.tuning.water_lerp_rate).clamp(0.0, 1.0);
            self.vertical_velocity += (self.tuning.water_buoyancy - self.vertical_velocity) * t;
            return;
        }
        self.vertical_velocity += self.tuning.gravity * dt;
    }

    /// Apply `amount` damage from an attacker at `attacker`.
    ///
    /// Zero damage, damage to a removed creature and damage to an unconfigured
    /// creature are ignored.
    pub fn take_damage<R: Rng + ?Sized>(
        &mut self,
        amount: u32,
        attacker: Vec3,
        now: f32,
        rng: &mut R,
    ) -> DamageOutcome {
        if amount == 0 || self.removed {
            return DamageOutcome::default();
        }
        let Some(profile) = self.profile.clone() else {
            return DamageOutcome::default();
        };

        self.hp = self.hp.saturating_sub(amount);

        self.tint = Tint::Damaged;
        self.flashes.start(self.tuning.damage_flash, Tint::Normal);

        let mut away = self.position - attacker;
        away.y = 0.0;
        let away = away.normalize_or_zero();
        self.knockback = Vec3::new(
            away.x * self.tuning.knockback_horizontal_force,
            self.tuning.knockback_up_force,
            away.z * self.tuning.knockback_horizontal_force,
        );

        if profile.flee_when_attacked {
            self.scared_until = Some(now + self.tuning.scared_duration);
        }

        tracing::debug!(creature = %self.id, amount, hp = self.hp, "Creature damaged");

        if self.hp > 0 {
            return DamageOutcome {
                applied: true,
                killed: false,
                drop: None,
            };
        }

        self.removed = true;
        let drop = profile.drop.and_then(|table| table.roll(rng));
        tracing::info!(
            creature = %self.id,
            species = %profile.name,
            ?drop,
            "Creature died"
        );
        DamageOutcome {
            applied: true,
            killed: true,
            drop,
        }
    }
}
