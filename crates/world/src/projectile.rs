//! Ballistic arrows fired by ranged creatures.

use glam::Vec3;
use serde::{Deserialize, Serialize};
use voxelwild_physics::{Body, SpatialQuery};

/// Flight parameters shared by every arrow a shooter fires.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ArrowTuning {
    /// Launch speed in blocks per second.
    pub speed: f32,
    /// Vertical acceleration (negative pulls down).
    pub gravity: f32,
    /// Damage dealt to the player on contact.
    pub damage: u32,
    /// Seconds before the arrow despawns on its own.
    pub lifetime: f32,
    /// Contact radius.
    pub radius: f32,
}

impl Default for ArrowTuning {
    fn default() -> Self {
        Self {
            speed: 20.0,
            gravity: -20.0,
            damage: 6,
            lifetime: 6.0,
            radius: 0.1,
        }
    }
}

/// What happened to an arrow during one step.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ArrowStep {
    /// Still in flight.
    Flying,
    /// Struck the player; the arrow is spent.
    HitPlayer {
        /// Damage to apply.
        damage: u32,
        /// Arrow position at contact, used as the knockback origin.
        at: Vec3,
    },
    /// Struck a solid block; the arrow is spent.
    HitBlock,
    /// Lifetime ran out.
    Expired,
}

impl ArrowStep {
    /// Whether the arrow should be removed after this step.
    pub fn is_terminal(&self) -> bool {
        !matches!(self, ArrowStep::Flying)
    }
}

/// A single arrow in flight.
#[derive(Debug, Clone, PartialEq)]
pub struct Arrow {
    /// Current position.
    pub position: Vec3,
    /// Current velocity.
    pub velocity: Vec3,
    tuning: ArrowTuning,
    age: f32,
    spent: bool,
}

impl Arrow {
    /// Launch an arrow from `origin` toward `target`.
    pub fn launch(origin: Vec3, target: Vec3, tuning: ArrowTuning) -> Self {
        let direction = (target - origin).normalize_or_zero();
        Self {
            position: origin,
            velocity: direction * tuning.speed,
            tuning,
            age: 0.0,
            spent: false,
        }
    }

    /// Seconds since launch.
    pub fn age(&self) -> f32 {
        self.age
    }

    /// Whether the arrow has already hit something or expired.
    pub fn is_spent(&self) -> bool {
        self.spent
    }

    /// Damage this arrow deals on contact.
    pub fn damage(&self) -> u32 {
        self.tuning.damage
    }

    /// Integrate one step and resolve contacts: player first, then blocks, then lifetime.
    pub fn tick<Q: SpatialQuery>(&mut self, world: &Q, player: Option<&Body>, dt: f32) -> ArrowStep {
        if self.spent {
            return ArrowStep::Expired;
        }

        self.velocity.y += self.tuning.gravity * dt;
        self.position += self.velocity * dt;
        self.age += dt;

        let step = if player
            .map(|body| body.aabb().overlaps_sphere(self.position, self.tuning.radius))
            .unwrap_or(false)
        {
            ArrowStep::HitPlayer {
                damage: self.tuning.damage,
                at: self.position,
            }
        } else if world.is_solid_at(self.position) {
            ArrowStep::HitBlock
        } else if self.age >= self.tuning.lifetime {
            ArrowStep::Expired
        } else {
            ArrowStep::Flying
        };

        self.spent = step.is_terminal();
        step
    }
}
