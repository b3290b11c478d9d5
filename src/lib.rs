//! voxelwild: a headless voxel sandbox with creature AI and an inventory/crafting screen.

pub mod config;
pub mod headless;
pub mod session;

pub use config::{GameConfig, SessionConfig, WorldConfig, DEFAULT_CONFIG_PATH};
pub use headless::{run, HeadlessConfig};
pub use session::{Session, SessionError, SessionEvent, SessionStats, SpawnerRole};
