//! Species-specific engage strategies composed into creatures.
//!
//! A creature asks its strategy for a decision each tick. A strategy that
//! returns `None` hands control back to the shared wander/flee behavior.

use crate::projectile::{Arrow, ArrowTuning};
use glam::Vec3;
use serde::{Deserialize, Serialize};
use std::fmt;

/// What a strategy sees of its creature and surroundings.
#[derive(Debug, Clone, Copy)]
pub struct EngageView {
    /// Creature feet position.
    pub position: Vec3,
    /// Player feet position, if a player is alive.
    pub player: Option<Vec3>,
    /// Session clock in seconds.
    pub now: f32,
    /// Speed the creature's profile uses for chasing and fleeing.
    pub chase_speed: f32,
}

impl EngageView {
    fn player_in(&self, range: f32) -> Option<(Vec3, f32)> {
        let player = self.player?;
        let distance = self.position.distance(player);
        (distance <= range).then_some((player, distance))
    }
}

/// Attack emitted by a strategy for the session to resolve.
#[derive(Debug, Clone, PartialEq)]
pub enum CombatAction {
    /// Direct hit on the player.
    Strike {
        /// Damage dealt.
        damage: u32,
        /// Knockback force applied to the player.
        knockback: f32,
    },
    /// Arrow released toward the player.
    Shoot(Arrow),
}

/// One tick's decision from a strategy.
#[derive(Debug, Clone, PartialEq)]
pub struct EngageDecision {
    /// Planar velocity before obstacle filtering.
    pub desired_velocity: Vec3,
    /// Direction to turn toward.
    pub face: Option<Vec3>,
    /// Attack to resolve this tick.
    pub action: Option<CombatAction>,
}

/// Species behavior layered over shared locomotion.
pub trait Engage: fmt::Debug + Send + Sync {
    /// Short label used in logs.
    fn name(&self) -> &'static str;

    /// Decide this tick's movement and attack, or `None` to fall back to wander/flee.
    fn engage(&mut self, view: &EngageView) -> Option<EngageDecision>;

    /// Whether an arrow is visibly nocked.
    fn arrow_nocked(&self) -> bool {
        false
    }
}

fn planar_towards(from: Vec3, to: Vec3) -> Vec3 {
    let mut dir = to - from;
    dir.y = 0.0;
    dir.normalize_or_zero()
}

/// Chase the player and strike at close range.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MeleeEngage {
    /// Distance within which the player is noticed.
    pub detect_range: f32,
    /// Distance at which the creature stops and attacks.
    pub stop_distance: f32,
    /// Damage per strike.
    pub attack_damage: u32,
    /// Seconds between strikes.
    pub attack_cooldown: f32,
    /// Knockback force applied to the player.
    pub knockback_power: f32,
    #[serde(skip)]
    next_attack_at: f32,
}

impl Default for MeleeEngage {
    fn default() -> Self {
        Self {
            detect_range: 10.0,
            stop_distance: 1.8,
            attack_damage: 3,
            attack_cooldown: 1.0,
            knockback_power: 4.0,
            next_attack_at: 0.0,
        }
    }
}

impl Engage for MeleeEngage {
    fn name(&self) -> &'static str {
        "melee"
    }

    fn engage(&mut self, view: &EngageView) -> Option<EngageDecision> {
        let (player, distance) = view.player_in(self.detect_range)?;
        let dir = planar_towards(view.position, player);

        if distance > self.stop_distance {
            return Some(EngageDecision {
                desired_velocity: dir * view.chase_speed,
                face: Some(dir),
                action: None,
            });
        }

        let mut action = None;
        if view.now >= self.next_attack_at {
            self.next_attack_at = view.now + self.attack_cooldown;
            action = Some(CombatAction::Strike {
                damage: self.attack_damage,
                knockback: self.knockback_power,
            });
        }

        Some(EngageDecision {
            desired_velocity: Vec3::ZERO,
            face: Some(dir),
            action,
        })
    }
}

/// Hold position and shoot arrows on a cooldown.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RangedEngage {
    /// Distance within which the player is noticed.
    pub detect_range: f32,
    /// Height above the player's feet that arrows aim at.
    pub aim_height_offset: f32,
    /// Height above the creature's feet that arrows leave from.
    pub fire_height: f32,
    /// Seconds between shots.
    pub attack_cooldown: f32,
    /// Seconds before the next shot at which the arrow shows as nocked.
    pub nock_lead: f32,
    /// Arrow flight parameters.
    pub arrow: ArrowTuning,
    #[serde(skip)]
    next_attack_at: f32,
    #[serde(skip)]
    nocked: bool,
}

impl Default for RangedEngage {
    fn default() -> Self {
        Self {
            detect_range: 15.0,
            aim_height_offset: 1.2,
            fire_height: 1.5,
            attack_cooldown: 3.0,
            nock_lead: 2.0,
            arrow: ArrowTuning::default(),
            next_attack_at: 0.0,
            nocked: false,
        }
    }
}

impl Engage for RangedEngage {
    fn name(&self) -> &'static str {
        "ranged"
    }

    fn engage(&mut self, view: &EngageView) -> Option<EngageDecision> {
        let (player, _) = view.player_in(self.detect_range)?;
        let dir = planar_towards(view.position, player);

        let mut action = None;
        if view.now >= self.next_attack_at {
            self.next_attack_at = view.now + self.attack_cooldown;
            self.nocked = false;

            let origin = view.position + Vec3::Y * self.fire_height;
            let target = player + Vec3::Y * self.aim_height_offset;
            action = Some(CombatAction::Shoot(Arrow::launch(origin, target, self.arrow)));
        } else if self.next_attack_at - view.now <= self.nock_lead {
            self.nocked = true;
        }

        Some(EngageDecision {
            desired_velocity: Vec3::ZERO,
            face: Some(dir),
            action,
        })
    }

    fn arrow_nocked(&self) -> bool {
        self.nocked
    }
}

/// Configured engage strategy for a species.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum EngageSpec {
    /// Wander and flee only.
    #[default]
    Passive,
    /// Melee chaser.
    Melee(MeleeEngage),
    /// Archer.
    Ranged(RangedEngage),
}

impl EngageSpec {
    /// Build a fresh strategy instance for one creature.
    pub fn build(&self) -> Option<Box<dyn Engage>> {
        match self {
            EngageSpec::Passive => None,
            EngageSpec::Melee(melee) => Some(Box::new(melee.clone())),
            EngageSpec::Ranged(ranged) => Some(Box::new(ranged.clone())),
        }
    }

    /// Whether creatures of this species attack the player.
    pub fn is_hostile(&self) -> bool {
        !matches!(self, EngageSpec::Passive)
    }
}
