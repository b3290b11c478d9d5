#![warn(missing_docs)]
//! Simulation state for the voxel sandbox: creatures, player, items and the world around them.

mod crafting;
mod creature;
mod engage;
mod equipment;
mod inventory;
mod player;
mod projectile;
mod spawner;
mod terrain;
mod time;
mod timer;

pub use crafting::{CraftRecipe, GridPattern, RecipeBook, GRID_CELLS};
pub use creature::{
    move_towards, BehaviorProfile, Creature, CreatureId, DamageOutcome, DropTable, ItemDrop,
    LocomotionTuning, Tint,
};
pub use engage::{
    CombatAction, Engage, EngageDecision, EngageSpec, EngageView, MeleeEngage, RangedEngage,
};
pub use equipment::{EquipError, Equipment};
pub use inventory::{Inventory, InventoryChange};
pub use player::{EatError, PlayerState, PlayerTuning};
pub use projectile::{Arrow, ArrowStep, ArrowTuning};
pub use spawner::{SpawnRequest, Spawner, SpawnerConfig, Species};
pub use terrain::{TerrainConfig, TerrainMap};
pub use time::{DayNightConfig, DayNightCycle, LightingState, Phase};
pub use timer::{Continuations, Countdown};
