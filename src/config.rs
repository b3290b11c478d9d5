//! Game configuration loaded from TOML.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::warn;
use voxelwild_core::ItemKind;
use voxelwild_world::{DayNightConfig, PlayerTuning, SpawnerConfig, Species, TerrainConfig};

/// Path used when `--config` is not given.
pub const DEFAULT_CONFIG_PATH: &str = "config/voxelwild.toml";

/// Everything a session needs, one section per subsystem.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct GameConfig {
    /// Seed and terrain shape.
    pub world: WorldConfig,
    /// Day/night timing and lighting.
    pub day_night: DayNightConfig,
    /// Daytime spawner.
    pub animal_spawner: SpawnerConfig,
    /// Night-time spawner.
    pub monster_spawner: SpawnerConfig,
    /// Species roster, referenced by name from the spawners.
    pub species: Vec<Species>,
    /// Player constants.
    pub player: PlayerTuning,
    /// Frame loop and interaction settings.
    pub session: SessionConfig,
}

/// `[world]` section.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct WorldConfig {
    /// World seed.
    pub seed: u64,
    /// Terrain generation parameters.
    #[serde(flatten)]
    pub terrain: TerrainConfig,
}

impl Default for WorldConfig {
    fn default() -> Self {
        Self {
            seed: 0x5EED_CAFE,
            terrain: TerrainConfig::default(),
        }
    }
}

/// `[session]` section.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct SessionConfig {
    /// Fixed steps per simulated second.
    pub tick_rate: f32,
    /// Simulated seconds a headless run lasts.
    pub seconds: f32,
    /// Optional JSON recipe book replacing the built-in one.
    pub recipes: Option<PathBuf>,
    /// Seconds between player attacks.
    pub attack_cooldown: f32,
    /// Farthest a creature can be and still be hit.
    pub attack_reach: f32,
    /// Farthest a block can be placed from the player's feet.
    pub place_reach: f32,
    /// Items in the inventory at start, keyed by item name.
    pub starting_items: BTreeMap<String, u32>,
    /// Let the headless runner fight, eat and craft on its own.
    pub autopilot: bool,
}

impl Default for SessionConfig {
    fn default() -> Self {
        let mut starting_items = BTreeMap::new();
        starting_items.insert(ItemKind::Wood.as_str().to_string(), 2);
        starting_items.insert(ItemKind::Dirt.as_str().to_string(), 3);
        Self {
            tick_rate: 20.0,
            seconds: 60.0,
            recipes: None,
            attack_cooldown: 0.5,
            attack_reach: 4.0,
            place_reach: 5.0,
            starting_items,
            autopilot: true,
        }
    }
}

impl Default for GameConfig {
    fn default() -> Self {
        let terrain = TerrainConfig::default();
        let bounds_max = [terrain.width, terrain.depth];
        Self {
            world: WorldConfig {
                terrain,
                ..WorldConfig::default()
            },
            day_night: DayNightConfig::default(),
            animal_spawner: SpawnerConfig {
                name: "animals".to_string(),
                bounds_max,
                reject_water: true,
                max_alive: 12,
                species: vec!["cow".to_string(), "pig".to_string()],
                ..SpawnerConfig::default()
            },
            monster_spawner: SpawnerConfig {
                name: "monsters".to_string(),
                interval_min: 5.0,
                interval_max: 10.0,
                bounds_max,
                reject_water: true,
                max_alive: 8,
                species: vec!["zombie".to_string(), "skeleton".to_string()],
                ..SpawnerConfig::default()
            },
            species: Species::defaults(),
            player: PlayerTuning::default(),
            session: SessionConfig::default(),
        }
    }
}

impl GameConfig {
    /// Load configuration from the default path.
    pub fn load() -> Self {
        Self::load_from_path(Path::new(DEFAULT_CONFIG_PATH))
    }

    /// Load configuration from an explicit path, falling back to defaults on errors.
    pub fn load_from_path(path: &Path) -> Self {
        match fs::read_to_string(path) {
            Ok(contents) => match toml::from_str::<GameConfig>(&contents) {
                Ok(cfg) => cfg,
                Err(err) => {
                    warn!("Failed to parse {}: {err}. Using defaults", path.display());
                    GameConfig::default()
                }
            },
            Err(err) => {
                if path != Path::new(DEFAULT_CONFIG_PATH)
                    || err.kind() != std::io::ErrorKind::NotFound
                {
                    warn!("Failed to read {}: {err}. Using defaults", path.display());
                } else {
                    warn!("Game config not found at {}. Using defaults", path.display());
                }
                GameConfig::default()
            }
        }
    }

    /// Species named by `spawner`, in roster order. Unknown names are logged and skipped.
    pub fn roster_for(&self, spawner: &SpawnerConfig) -> Vec<Arc<Species>> {
        spawner
            .species
            .iter()
            .filter_map(|name| {
                let found = self.species.iter().find(|s| &s.profile.name == name);
                if found.is_none() {
                    warn!(spawner = %spawner.name, species = %name, "Unknown species in spawner");
                }
                found.cloned().map(Arc::new)
            })
            .collect()
    }

    /// Starting items with known names. Unknown names are logged and skipped.
    pub fn starting_items(&self) -> Vec<(ItemKind, u32)> {
        self.session
            .starting_items
            .iter()
            .filter_map(|(name, count)| match ItemKind::parse(name) {
                Some(kind) => Some((kind, *count)),
                None => {
                    warn!(item = %name, "Unknown starting item");
                    None
                }
            })
            .collect()
    }

    /// Fixed step length in seconds.
    pub fn step(&self) -> f32 {
        1.0 / self.session.tick_rate.max(1.0)
    }
}
