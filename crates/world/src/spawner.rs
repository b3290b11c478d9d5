//! Interval-driven creature spawning over a bounded area.
//!
//! Each spawner waits a random interval, rolls its spawn chance, then drops one
//! creature of a random species on top of a random column inside its bounds.

use crate::creature::{BehaviorProfile, LocomotionTuning};
use crate::engage::EngageSpec;
use crate::timer::Countdown;
use glam::{IVec3, Vec3};
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::f32::consts::TAU;
use std::sync::Arc;
use voxelwild_physics::{BlockGrid, Cell};

/// Everything needed to build creatures of one species.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Species {
    /// Stats, flee thresholds and drops.
    #[serde(flatten)]
    pub profile: BehaviorProfile,
    /// Attack behavior.
    #[serde(default)]
    pub engage: EngageSpec,
    /// Locomotion constants.
    #[serde(default)]
    pub tuning: LocomotionTuning,
}

impl Species {
    /// Stock species roster: cow, pig, zombie and skeleton.
    pub fn defaults() -> Vec<Species> {
        use crate::creature::DropTable;
        use voxelwild_core::ItemKind;

        let animal = |name: &str, drop: ItemKind| Species {
            profile: BehaviorProfile {
                name: name.to_string(),
                drop: Some(DropTable {
                    kind: drop,
                    ..DropTable::default()
                }),
                ..BehaviorProfile::default()
            },
            engage: EngageSpec::Passive,
            tuning: LocomotionTuning::default(),
        };
        let monster = |name: &str, engage: EngageSpec| Species {
            profile: BehaviorProfile {
                name: name.to_string(),
                max_hp: 20,
                walk_speed: 1.5,
                flee_speed: 3.0,
                flee_when_attacked: false,
                drop: None,
                ..BehaviorProfile::default()
            },
            engage,
            tuning: LocomotionTuning {
                body_height: 1.8,
                ..LocomotionTuning::default()
            },
        };

        vec![
            animal("cow", ItemKind::Beef),
            animal("pig", ItemKind::Pork),
            monster("zombie", EngageSpec::Melee(Default::default())),
            monster("skeleton", EngageSpec::Ranged(Default::default())),
        ]
    }
}

/// Spawner parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SpawnerConfig {
    /// Label used in logs.
    pub name: String,
    /// Shortest wait between attempts, in seconds.
    pub interval_min: f32,
    /// Longest wait between attempts, in seconds.
    pub interval_max: f32,
    /// Probability that an attempt proceeds.
    pub spawn_chance: f32,
    /// Inclusive minimum column `[x, z]`.
    pub bounds_min: [i32; 2],
    /// Exclusive maximum column `[x, z]`.
    pub bounds_max: [i32; 2],
    /// Skip columns whose surface is water.
    pub reject_water: bool,
    /// Cap on creatures this spawner keeps alive at once.
    pub max_alive: u32,
    /// Species names this spawner draws from.
    pub species: Vec<String>,
}

impl Default for SpawnerConfig {
    fn default() -> Self {
        Self {
            name: "spawner".to_string(),
            interval_min: 3.0,
            interval_max: 8.0,
            spawn_chance: 0.8,
            bounds_min: [0, 0],
            bounds_max: [32, 32],
            reject_water: false,
            max_alive: 16,
            species: Vec::new(),
        }
    }
}

/// A creature the session should create.
#[derive(Debug, Clone)]
pub struct SpawnRequest {
    /// Species to build.
    pub species: Arc<Species>,
    /// Feet position.
    pub position: Vec3,
    /// Initial heading in radians.
    pub yaw: f32,
}

/// Spawn loop state.
#[derive(Debug, Clone)]
pub struct Spawner {
    config: SpawnerConfig,
    species: Vec<Arc<Species>>,
    countdown: Option<Countdown>,
    alive: u32,
    enabled: bool,
}

impl Spawner {
    /// Create a spawner drawing from `species`.
    pub fn new(config: SpawnerConfig, species: Vec<Arc<Species>>) -> Self {
        if species.is_empty() {
            tracing::warn!(spawner = %config.name, "Spawner has no species configured");
        }
        Self {
            config,
            species,
            countdown: None,
            alive: 0,
            enabled: true,
        }
    }

    /// Configuration.
    pub fn config(&self) -> &SpawnerConfig {
        &self.config
    }

    /// Creatures spawned by this spawner still alive.
    pub fn alive(&self) -> u32 {
        self.alive
    }

    /// Whether the spawn loop runs.
    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Turn the spawn loop on or off. A pending interval resumes where it left off.
    pub fn set_enabled(&mut self, enabled: bool) {
        if self.enabled != enabled {
            tracing::debug!(spawner = %self.config.name, enabled, "Spawner toggled");
        }
        self.enabled = enabled;
    }

    /// Record that one of this spawner's creatures died.
    pub fn notify_death(&mut self) {
        self.alive = self.alive.saturating_sub(1);
    }

    fn next_interval<R: Rng + ?Sized>(&self, rng: &mut R) -> Countdown {
        let (lo, hi) = (self.config.interval_min, self.config.interval_max);
        let wait = if hi > lo { rng.gen_range(lo..hi) } else { lo };
        Countdown::new(wait)
    }

    /// Advance the spawn loop. Returns a creature to create when an attempt succeeds.
    pub fn tick<R: Rng + ?Sized>(
        &mut self,
        grid: &BlockGrid,
        dt: f32,
        rng: &mut R,
    ) -> Option<SpawnRequest> {
        if !self.enabled {
            return None;
        }

        if self.countdown.is_none() {
            self.countdown = Some(self.next_interval(rng));
        }
        let due = self
            .countdown
            .as_mut()
            .is_some_and(|countdown| countdown.tick(dt));
        if !due {
            return None;
        }
        self.countdown = None;

        let roll = rng.gen::<f32>();
        if roll > self.config.spawn_chance {
            tracing::debug!(spawner = %self.config.name, roll, "Spawn roll failed");
            return None;
        }

        self.try_spawn_one(grid, rng)
    }

    fn try_spawn_one<R: Rng + ?Sized>(
        &mut self,
        grid: &BlockGrid,
        rng: &mut R,
    ) -> Option<SpawnRequest> {
        if self.species.is_empty() {
            tracing::warn!(spawner = %self.config.name, "No species to spawn");
            return None;
        }
        if self.alive >= self.config.max_alive {
            tracing::debug!(spawner = %self.config.name, alive = self.alive, "Spawn cap reached");
            return None;
        }

        let [min_x, min_z] = self.config.bounds_min;
        let [max_x, max_z] = self.config.bounds_max;
        if max_x <= min_x || max_z <= min_z {
            tracing::warn!(spawner = %self.config.name, "Spawner bounds are empty");
            return None;
        }
        let x = rng.gen_range(min_x..max_x);
        let z = rng.gen_range(min_z..max_z);

        let Some((surface, kind)) = grid.surface_at(x, z) else {
            tracing::debug!(spawner = %self.config.name, x, z, "No terrain under spawn column");
            return None;
        };
        if kind == Cell::Water && self.config.reject_water {
            tracing::debug!(spawner = %self.config.name, x, z, "Spawn column is water");
            return None;
        }

        let species = Arc::clone(&self.species[rng.gen_range(0..self.species.len())]);
        let yaw = if species.profile.use_random_rotation {
            rng.gen_range(0.0..TAU)
        } else {
            0.0
        };
        let feet = surface + IVec3::Y;
        let position = Vec3::new(x as f32 + 0.5, feet.y as f32, z as f32 + 0.5);

        self.alive += 1;
        tracing::info!(
            spawner = %self.config.name,
            species = %species.profile.name,
            x,
            y = feet.y,
            z,
            "Spawned creature"
        );
        Some(SpawnRequest {
            species,
            position,
            yaw,
        })
    }
}
