//! Grid raycasting (Amanatides-Woo DDA).
//!
//! The ray is first clipped against the grid's bounding box with a slab test,
//! then walked cell by cell. Each step crosses exactly one boundary, so a ray
//! visits at most `grid.x + grid.y + grid.z` cells.

use brickcast_core::{Aabb, OccupancyQuery, Ray};
use glam::{BVec3, IVec3, Vec3};

/// A solid cell struck by a ray.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RayHit {
    /// Distance from the ray origin along the normalized direction
    pub distance: f32,
    /// Outward normal of the face the ray entered through
    pub normal: IVec3,
    /// Grid cell that was hit
    pub cell: IVec3,
}

/// Walk a ray through a grid of `grid_size` cells of edge `voxel_size`
/// spanning `[0, grid_size * voxel_size]`.
///
/// Cells are tested by querying `world` at their minimum corner. Returns the
/// first occupied cell closer than `limit`, or `None` when the ray misses the
/// grid, hits nothing, or its direction is degenerate.
pub fn cast<Q>(
    origin: Vec3,
    direction: Vec3,
    world: &Q,
    voxel_size: f32,
    grid_size: IVec3,
    limit: f32,
) -> Option<RayHit>
where
    Q: OccupancyQuery + ?Sized,
{
    if voxel_size <= 0.0 || !voxel_size.is_finite() || grid_size.cmple(IVec3::ZERO).any() {
        return None;
    }
    let ray = Ray::try_new(origin, direction)?;
    let dir = ray.direction;

    let bounds = Aabb::from_extent(grid_size.as_vec3() * voxel_size);
    let slab = bounds.slab(ray.origin, dir);
    if !slab.hit {
        return None;
    }

    // Rays starting inside the grid begin at their origin.
    let entry = slab.t_min.max(0.0);
    let start = ray.at(entry);
    let max_cell = grid_size - IVec3::ONE;
    let mut cell = cell_at(start, voxel_size, max_cell);
    let last = cell_at(ray.at(slab.t_max), voxel_size, max_cell);

    let step = axis_sign(dir);
    let parallel = dir.cmpeq(Vec3::ZERO);
    let t_delta = Vec3::select(parallel, Vec3::INFINITY, voxel_size / dir.abs());
    let boundary = (cell + step.max(IVec3::ZERO)).as_vec3() * voxel_size;
    let mut t_next = Vec3::select(parallel, Vec3::INFINITY, (boundary - start) / dir);

    let mut mask = slab.entry_mask;
    let mut distance = 0.0;
    let max_steps = grid_size.x + grid_size.y + grid_size.z;
    let mut steps = 0;

    while cell != last && steps < max_steps && entry + distance < limit {
        if world.is_occupied(cell.as_vec3() * voxel_size) {
            return Some(hit(entry + distance, mask, step, cell));
        }

        let axis = nearest_axis(t_next);
        mask = BVec3::new(axis == 0, axis == 1, axis == 2);
        distance = t_next[axis];
        t_next[axis] += t_delta[axis];
        cell[axis] += step[axis];
        steps += 1;
    }

    // The loop stops before testing the exit cell.
    if entry + distance < limit && world.is_occupied(cell.as_vec3() * voxel_size) {
        return Some(hit(entry + distance, mask, step, cell));
    }

    None
}

#[inline]
fn hit(distance: f32, mask: BVec3, step: IVec3, cell: IVec3) -> RayHit {
    RayHit {
        distance,
        normal: IVec3::select(mask, -step, IVec3::ZERO),
        cell,
    }
}

#[inline]
fn cell_at(point: Vec3, voxel_size: f32, max_cell: IVec3) -> IVec3 {
    (point / voxel_size)
        .floor()
        .as_ivec3()
        .clamp(IVec3::ZERO, max_cell)
}

/// Per-axis sign with 0 for zero components (unlike `f32::signum`).
#[inline]
pub fn axis_sign(v: Vec3) -> IVec3 {
    IVec3::new(sign(v.x), sign(v.y), sign(v.z))
}

#[inline]
fn sign(value: f32) -> i32 {
    if value > 0.0 {
        1
    } else if value < 0.0 {
        -1
    } else {
        0
    }
}

/// Single axis with the smallest boundary distance; ties go to x, then y.
#[inline]
fn nearest_axis(t_next: Vec3) -> usize {
    if t_next.x <= t_next.y && t_next.x <= t_next.z {
        0
    } else if t_next.y <= t_next.z {
        1
    } else {
        2
    }
}
