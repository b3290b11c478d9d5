//! Heightmap terrain with water, trees and buried diamonds.
//!
//! One Perlin sample per column picks the surface height. Columns are filled
//! bedrock, stone, dirt, grass from the bottom up, and flooded up to the water
//! level. Trees grow on dry grass and diamonds replace random stone.

use glam::{IVec2, IVec3};
use noise::{NoiseFn, Perlin};
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use tracing::{debug, instrument};
use voxelwild_core::{scoped_rng, ItemKind, SimTick};
use voxelwild_physics::{BlockGrid, Cell};

/// RNG domain for terrain placement.
const TERRAIN_DOMAIN: u64 = 0x7E44_A1;

/// Terrain generation parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TerrainConfig {
    /// Columns along X.
    pub width: i32,
    /// Columns along Z.
    pub depth: i32,
    /// Height reached by a noise sample of 1.0.
    pub max_height: i32,
    /// Highest water cell.
    pub water_level: i32,
    /// Noise wavelength in blocks.
    pub noise_scale: f64,
    /// Per-column tree probability on dry grass.
    pub tree_chance: f32,
    /// Minimum distance between trunks.
    pub tree_spacing: f32,
    /// Stone cells turned into diamond.
    pub diamond_count: usize,
}

impl Default for TerrainConfig {
    fn default() -> Self {
        Self {
            width: 20,
            depth: 20,
            max_height: 16,
            water_level: 4,
            noise_scale: 20.0,
            tree_chance: 0.015,
            tree_spacing: 5.0,
            diamond_count: 50,
        }
    }
}

/// Placed blocks by cell.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TerrainMap {
    blocks: HashMap<IVec3, ItemKind>,
    heights: HashMap<IVec2, i32>,
    trees: Vec<IVec2>,
}

impl TerrainMap {
    /// Generate terrain for `config` from `seed`.
    #[instrument(skip(config), fields(width = config.width, depth = config.depth))]
    pub fn generate(config: &TerrainConfig, seed: u64) -> Self {
        debug!("Starting terrain generation");
        let mut rng = scoped_rng(seed, TERRAIN_DOMAIN, SimTick::ZERO);
        let perlin = Perlin::new(seed as u32);
        let offset_x = rng.gen_range(-9999.0..9999.0);
        let offset_z = rng.gen_range(-9999.0..9999.0);

        let mut map = Self::default();
        let mut stone = Vec::new();

        for x in 0..config.width {
            for z in 0..config.depth {
                map.set(IVec3::new(x, 0, z), ItemKind::Bedrock);

                let nx = (x as f64 + offset_x) / config.noise_scale;
                let nz = (z as f64 + offset_z) / config.noise_scale;
                let sample = ((perlin.get([nx, nz]) + 1.0) * 0.5).clamp(0.0, 1.0);
                let h = ((sample * config.max_height as f64).floor() as i32).max(1);
                map.heights.insert(IVec2::new(x, z), h);

                for y in 1..h {
                    let cell = IVec3::new(x, y, z);
                    if y <= h - 2 {
                        stone.push(cell);
                        map.set(cell, ItemKind::Stone);
                    } else {
                        map.set(cell, ItemKind::Dirt);
                    }
                }
                map.set(IVec3::new(x, h, z), ItemKind::Grass);

                for y in h + 1..=config.water_level {
                    map.set(IVec3::new(x, y, z), ItemKind::Water);
                }

                map.try_grow_tree(config, IVec3::new(x, h + 1, z), &mut rng);
            }
        }

        for _ in 0..config.diamond_count {
            if stone.is_empty() {
                break;
            }
            let cell = stone.swap_remove(rng.gen_range(0..stone.len()));
            map.set(cell, ItemKind::Diamond);
        }

        debug!(
            blocks = map.len(),
            trees = map.trees.len(),
            "Terrain generation complete"
        );
        map
    }

    fn try_grow_tree<R: Rng + ?Sized>(&mut self, config: &TerrainConfig, base: IVec3, rng: &mut R) {
        if base.y - 1 <= config.water_level {
            return;
        }
        if self.get(base - IVec3::Y) != Some(ItemKind::Grass) {
            return;
        }
        if rng.gen::<f32>() > config.tree_chance {
            return;
        }
        let column = IVec2::new(base.x, base.z);
        if self
            .trees
            .iter()
            .any(|other| other.as_vec2().distance(column.as_vec2()) < config.tree_spacing)
        {
            return;
        }

        let height = rng.gen_range(3..5);
        for i in 0..height {
            self.grow(base + IVec3::Y * i, ItemKind::Wood);
        }
        for i in height - 2..height {
            for dx in -1..=1 {
                for dz in -1..=1 {
                    if dx == 0 && dz == 0 && i != height - 1 {
                        continue;
                    }
                    self.grow(base + IVec3::new(dx, i, dz), ItemKind::Leaves);
                }
            }
        }
        self.trees.push(column);
    }

    /// Place a tree block without displacing existing terrain.
    fn grow(&mut self, cell: IVec3, kind: ItemKind) {
        self.blocks.entry(cell).or_insert(kind);
    }

    /// Block at `cell`.
    pub fn get(&self, cell: IVec3) -> Option<ItemKind> {
        self.blocks.get(&cell).copied()
    }

    /// Place `kind` at `cell`, replacing what was there.
    pub fn set(&mut self, cell: IVec3, kind: ItemKind) {
        self.blocks.insert(cell, kind);
    }

    /// Remove the block at `cell`.
    pub fn remove(&mut self, cell: IVec3) -> Option<ItemKind> {
        self.blocks.remove(&cell)
    }

    /// Surface (grass) height of column `(x, z)` as generated.
    pub fn height_at(&self, x: i32, z: i32) -> Option<i32> {
        self.heights.get(&IVec2::new(x, z)).copied()
    }

    /// Trunk columns.
    pub fn trees(&self) -> &[IVec2] {
        &self.trees
    }

    /// Number of placed blocks.
    pub fn len(&self) -> usize {
        self.blocks.len()
    }

    /// Whether nothing is placed.
    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }

    /// Number of blocks of `kind`.
    pub fn count(&self, kind: ItemKind) -> usize {
        self.blocks.values().filter(|k| **k == kind).count()
    }

    /// Collision class of a placed block.
    pub fn cell_kind(kind: ItemKind) -> Cell {
        match kind {
            ItemKind::Water => Cell::Water,
            _ => Cell::Solid,
        }
    }

    /// Build the collision grid for these blocks.
    pub fn to_grid(&self) -> BlockGrid {
        let mut grid = BlockGrid::new();
        for (cell, kind) in &self.blocks {
            grid.set(*cell, Self::cell_kind(*kind));
        }
        grid
    }
}
