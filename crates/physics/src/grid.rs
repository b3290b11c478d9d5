//! Sparse voxel grid implementing the sweep and locomotion queries.
//!
//! Cell `(x, y, z)` occupies `[x, x+1) x [y, y+1) x [z, z+1)`.

use crate::{Aabb, Body, Locomotion, MoveOutcome, SpatialQuery, SweepHit};
use glam::{IVec3, Vec3};
use std::collections::{HashMap, HashSet};

/// Gap kept between a resolved body and the surface it stopped against.
const SKIN: f32 = 1e-4;

/// How far below the feet we look for ground contact.
const GROUND_PROBE: f32 = 0.05;

/// Bisection steps used to refine a sweep contact.
const SWEEP_REFINE_STEPS: usize = 8;

/// Collision class of an occupied cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Cell {
    /// Blocks movement and sweeps.
    Solid,
    /// Passable; bodies inside are buoyant.
    Water,
}

/// Sparse voxel grid.
#[derive(Debug, Clone, Default)]
pub struct BlockGrid {
    cells: HashMap<IVec3, Cell>,
    min_y: i32,
    max_y: i32,
}

impl BlockGrid {
    /// Create an empty grid.
    pub fn new() -> Self {
        Self::default()
    }

    /// Occupy `cell`.
    pub fn set(&mut self, cell: IVec3, kind: Cell) {
        if self.cells.is_empty() {
            self.min_y = cell.y;
            self.max_y = cell.y;
        } else {
            self.min_y = self.min_y.min(cell.y);
            self.max_y = self.max_y.max(cell.y);
        }
        self.cells.insert(cell, kind);
    }

    /// Empty `cell`, returning what was there.
    pub fn clear(&mut self, cell: IVec3) -> Option<Cell> {
        self.cells.remove(&cell)
    }

    /// What occupies `cell`.
    pub fn get(&self, cell: IVec3) -> Option<Cell> {
        self.cells.get(&cell).copied()
    }

    /// Whether `cell` is solid.
    pub fn is_solid(&self, cell: IVec3) -> bool {
        self.get(cell) == Some(Cell::Solid)
    }

    /// Whether `cell` holds water.
    pub fn is_water(&self, cell: IVec3) -> bool {
        self.get(cell) == Some(Cell::Water)
    }

    /// Number of occupied cells.
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    /// Whether the grid has no occupied cells.
    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// Cell containing `point`.
    pub fn cell_of(point: Vec3) -> IVec3 {
        point.floor().as_ivec3()
    }

    /// Highest occupied cell of column `(x, z)`, scanning down from the top of the grid.
    pub fn surface_at(&self, x: i32, z: i32) -> Option<(IVec3, Cell)> {
        if self.cells.is_empty() {
            return None;
        }
        (self.min_y..=self.max_y).rev().find_map(|y| {
            let cell = IVec3::new(x, y, z);
            self.get(cell).map(|kind| (cell, kind))
        })
    }

    /// Top of the contiguous solid stack that contains `cell`.
    pub fn column_top(&self, cell: IVec3) -> f32 {
        let mut y = cell.y;
        while self.is_solid(IVec3::new(cell.x, y + 1, cell.z)) {
            y += 1;
        }
        (y + 1) as f32
    }

    fn cells_overlapping(aabb: &Aabb) -> impl Iterator<Item = IVec3> {
        let lo = aabb.min.floor().as_ivec3();
        let hi = aabb.max.ceil().as_ivec3() - IVec3::ONE;
        (lo.x..=hi.x).flat_map(move |x| {
            (lo.y..=hi.y).flat_map(move |y| (lo.z..=hi.z).map(move |z| IVec3::new(x, y, z)))
        })
    }

    fn solid_overlapping<'a>(&'a self, aabb: &'a Aabb) -> impl Iterator<Item = IVec3> + 'a {
        Self::cells_overlapping(aabb)
            .filter(move |cell| self.is_solid(*cell) && Aabb::unit_cell(*cell).intersects(aabb))
    }

    fn solid_touching_sphere(&self, center: Vec3, radius: f32) -> Vec<IVec3> {
        let bounds = Aabb::new(center - Vec3::splat(radius), center + Vec3::splat(radius));
        Self::cells_overlapping(&bounds)
            .filter(|cell| {
                self.is_solid(*cell) && Aabb::unit_cell(*cell).overlaps_sphere(center, radius)
            })
            .collect()
    }
}

impl SpatialQuery for BlockGrid {
    fn sphere_cast(
        &self,
        origin: Vec3,
        radius: f32,
        direction: Vec3,
        max_distance: f32,
    ) -> Option<SweepHit> {
        let direction = direction.normalize_or_zero();
        if direction == Vec3::ZERO || max_distance <= 0.0 || radius <= 0.0 {
            return None;
        }

        let ignored: HashSet<IVec3> = self
            .solid_touching_sphere(origin, radius)
            .into_iter()
            .collect();
        let step = (radius * 0.25).max(0.02);

        let mut prev_t = 0.0_f32;
        loop {
            let t = (prev_t + step).min(max_distance);
            let center = origin + direction * t;
            let hit_cell = self
                .solid_touching_sphere(center, radius)
                .into_iter()
                .filter(|cell| !ignored.contains(cell))
                .min_by(|a, b| {
                    let da = Aabb::unit_cell(*a).closest_point(center).distance_squared(center);
                    let db = Aabb::unit_cell(*b).closest_point(center).distance_squared(center);
                    da.total_cmp(&db)
                });

            if let Some(cell) = hit_cell {
                let aabb = Aabb::unit_cell(cell);
                let (mut lo, mut hi) = (prev_t, t);
                for _ in 0..SWEEP_REFINE_STEPS {
                    let mid = (lo + hi) * 0.5;
                    if aabb.overlaps_sphere(origin + direction * mid, radius) {
                        hi = mid;
                    } else {
                        lo = mid;
                    }
                }
                let center = origin + direction * hi;
                let point = aabb.closest_point(center);
                let normal = (center - point).try_normalize().unwrap_or(-direction);
                return Some(SweepHit {
                    distance: hi,
                    point,
                    normal,
                    top_y: self.column_top(cell),
                });
            }

            if t >= max_distance {
                return None;
            }
            prev_t = t;
        }
    }

    fn is_solid_at(&self, point: Vec3) -> bool {
        self.is_solid(Self::cell_of(point))
    }
}

impl Locomotion for BlockGrid {
    fn move_body(&self, body: &Body, displacement: Vec3) -> MoveOutcome {
        let mut position = body.position;
        let mut grounded = false;

        // Horizontal axes first so a body sliding along a wall still falls.
        for axis in [0_usize, 2, 1] {
            let delta = displacement[axis];
            if delta == 0.0 {
                continue;
            }

            let before = Body::new(position, body.radius, body.height).aabb();
            let mut candidate = position;
            candidate[axis] += delta;
            let after = Body::new(candidate, body.radius, body.height).aabb();

            let blockers: Vec<IVec3> = self
                .solid_overlapping(&after)
                .filter(|cell| !Aabb::unit_cell(*cell).intersects(&before))
                .collect();

            if blockers.is_empty() {
                position = candidate;
                continue;
            }

            let below_extent = if axis == 1 { 0.0 } else { body.radius };
            let above_extent = if axis == 1 { body.height } else { body.radius };
            let resolved = if delta > 0.0 {
                let wall = blockers
                    .iter()
                    .map(|cell| cell[axis] as f32)
                    .fold(f32::INFINITY, f32::min);
                (wall - SKIN - above_extent).clamp(position[axis], candidate[axis])
            } else {
                let wall = blockers
                    .iter()
                    .map(|cell| (cell[axis] + 1) as f32)
                    .fold(f32::NEG_INFINITY, f32::max);
                (wall + SKIN + below_extent).clamp(candidate[axis], position[axis])
            };
            position[axis] = resolved;

            if axis == 1 && delta < 0.0 {
                grounded = true;
            }
        }

        let resting = Body::new(position, body.radius, body.height).aabb();
        if !grounded {
            let probe = resting.translated(Vec3::new(0.0, -GROUND_PROBE, 0.0));
            grounded = self
                .solid_overlapping(&probe)
                .any(|cell| !Aabb::unit_cell(cell).intersects(&resting));
        }

        let in_water = Self::cells_overlapping(&resting)
            .any(|cell| self.is_water(cell) && Aabb::unit_cell(cell).intersects(&resting));

        MoveOutcome {
            position,
            grounded,
            in_water,
        }
    }
}
