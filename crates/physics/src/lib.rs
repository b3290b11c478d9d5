#![warn(missing_docs)]
//! Physics primitives (AABB, sweeps, locomotion) and the voxel grid that answers them.

mod grid;

use glam::Vec3;

pub use grid::{BlockGrid, Cell};

/// Axis-aligned bounding box used for collisions.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Aabb {
    /// Minimum corner (x, y, z).
    pub min: Vec3,
    /// Maximum corner (x, y, z).
    pub max: Vec3,
}

impl Aabb {
    /// Create a new AABB ensuring min <= max per axis.
    pub fn new(min: Vec3, max: Vec3) -> Self {
        debug_assert!(min.x <= max.x && min.y <= max.y && min.z <= max.z);
        Self { min, max }
    }

    /// Box of a unit voxel cell whose minimum corner sits at `cell`.
    pub fn unit_cell(cell: glam::IVec3) -> Self {
        let min = cell.as_vec3();
        Self::new(min, min + Vec3::ONE)
    }

    /// Tests intersection with another AABB.
    pub fn intersects(&self, other: &Self) -> bool {
        self.min.x < other.max.x
            && self.max.x > other.min.x
            && self.min.y < other.max.y
            && self.max.y > other.min.y
            && self.min.z < other.max.z
            && self.max.z > other.min.z
    }

    /// Point inside the box closest to `point`.
    pub fn closest_point(&self, point: Vec3) -> Vec3 {
        point.clamp(self.min, self.max)
    }

    /// Whether a sphere overlaps this box.
    pub fn overlaps_sphere(&self, center: Vec3, radius: f32) -> bool {
        self.closest_point(center).distance_squared(center) < radius * radius
    }

    /// Shift the box by `offset`.
    pub fn translated(&self, offset: Vec3) -> Self {
        Self {
            min: self.min + offset,
            max: self.max + offset,
        }
    }
}

/// Upright body resolved by a [`Locomotion`] implementation.
///
/// `position` is the centre of the body's footprint at foot level.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Body {
    /// Feet position.
    pub position: Vec3,
    /// Horizontal half extent.
    pub radius: f32,
    /// Height above the feet.
    pub height: f32,
}

impl Body {
    /// Create a body at `position`.
    pub fn new(position: Vec3, radius: f32, height: f32) -> Self {
        Self {
            position,
            radius,
            height,
        }
    }

    /// Bounding box of the body.
    pub fn aabb(&self) -> Aabb {
        Aabb::new(
            self.position - Vec3::new(self.radius, 0.0, self.radius),
            self.position + Vec3::new(self.radius, self.height, self.radius),
        )
    }
}

/// Nearest blocking surface found by a sweep.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SweepHit {
    /// Distance travelled along the sweep direction before contact.
    pub distance: f32,
    /// Contact point on the blocking surface.
    pub point: Vec3,
    /// Surface normal at the contact point.
    pub normal: Vec3,
    /// Top of the obstacle that was hit.
    pub top_y: f32,
}

/// Result of moving a body by a displacement.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MoveOutcome {
    /// Feet position after collision resolution.
    pub position: Vec3,
    /// Whether the body is resting on something solid.
    pub grounded: bool,
    /// Whether the body overlaps water.
    pub in_water: bool,
}

/// Spatial queries used for obstacle avoidance and placement checks.
pub trait SpatialQuery {
    /// Sweep a sphere from `origin` along `direction` (normalised) for up to `max_distance`.
    ///
    /// Geometry already overlapping the sphere at `origin` is ignored.
    fn sphere_cast(
        &self,
        origin: Vec3,
        radius: f32,
        direction: Vec3,
        max_distance: f32,
    ) -> Option<SweepHit>;

    /// Whether the unit cell containing `point` is solid.
    fn is_solid_at(&self, point: Vec3) -> bool;
}

/// Moves bodies through the world, resolving collisions.
pub trait Locomotion {
    /// Move `body` by `displacement`, stopping at solid geometry.
    fn move_body(&self, body: &Body, displacement: Vec3) -> MoveOutcome;
}
