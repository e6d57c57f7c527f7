//! Swept collision of a small cube against the voxel grid.
//!
//! The collider is never tested as a volume. Instead, rays are cast along the
//! direction of travel from points on the cube faces that lead the motion:
//! four per leading face, pulled in from the corners toward the face center.
//! The nearest hit stops the motion on that axis and the rest of the move
//! slides along the remaining axes.

use brickcast_core::OccupancyQuery;
use glam::{IVec3, Vec3};

use crate::config::MovementConfig;
use crate::raycast::{axis_sign, cast, RayHit};

const SIDES: [IVec3; 6] = [
    IVec3::X,
    IVec3::Y,
    IVec3::Z,
    IVec3::NEG_X,
    IVec3::NEG_Y,
    IVec3::NEG_Z,
];

const CORNERS: [IVec3; 8] = [
    IVec3::new(1, 1, 1),
    IVec3::new(1, 1, -1),
    IVec3::new(1, -1, 1),
    IVec3::new(1, -1, -1),
    IVec3::new(-1, 1, 1),
    IVec3::new(-1, 1, -1),
    IVec3::new(-1, -1, 1),
    IVec3::new(-1, -1, -1),
];

/// Each blocking hit removes one axis of motion, so three hits plus the final
/// free segment is the most a sweep can take.
const MAX_SWEEP_STEPS: usize = 4;

/// Move `position` up to `amount` along `direction`, stopping at and sliding
/// along solid cells. Returns the resulting position.
///
/// A zero or non-finite direction, or a non-positive amount, leaves the
/// position unchanged.
pub fn sweep<Q>(
    position: Vec3,
    direction: Vec3,
    amount: f32,
    world: &Q,
    grid_size: IVec3,
    config: &MovementConfig,
) -> Vec3
where
    Q: OccupancyQuery + ?Sized,
{
    let mut pos = position;
    let Some(mut dir) = direction.try_normalize() else {
        return pos;
    };
    let mut remaining = amount;

    for _ in 0..MAX_SWEEP_STEPS {
        if remaining <= 0.0 || remaining.is_nan() {
            break;
        }
        let Some((hit, side)) = nearest_probe_hit(pos, dir, remaining, world, grid_size, config)
        else {
            pos += dir * remaining;
            break;
        };

        pos += dir * hit.distance;

        let projected = dir * (IVec3::ONE - blocked_axis(&hit, side, dir)).as_vec3();
        if projected == dir {
            break;
        }
        remaining = (remaining - hit.distance) * projected.length();
        match projected.try_normalize() {
            Some(slide) => dir = slide,
            None => break,
        }
    }

    pos
}

/// Axis mask of the motion a probe hit cancels.
///
/// A probe that starts inside a solid cell hits at distance 0 with a face
/// normal that says nothing about the contact. The probe's own leading face is
/// the blocked axis then, as it is for a normal across which there is no motion.
fn blocked_axis(hit: &RayHit, side: IVec3, dir: Vec3) -> IVec3 {
    let normal = hit.normal.abs();
    let crosses_motion = (normal.as_vec3() * dir) != Vec3::ZERO;
    if hit.distance > 0.0 && crosses_motion {
        normal
    } else {
        side.abs()
    }
}

/// Nearest hit over every probe ray leading a move along `dir`, paired with
/// the collider face that cast it.
fn nearest_probe_hit<Q>(
    pos: Vec3,
    dir: Vec3,
    limit: f32,
    world: &Q,
    grid_size: IVec3,
    config: &MovementConfig,
) -> Option<(RayHit, IVec3)>
where
    Q: OccupancyQuery + ?Sized,
{
    leading_probes(dir, config.corner_blend)
        .filter_map(|(side, offset)| {
            let origin = pos + offset * config.collider_half_width;
            cast(origin, dir, world, config.voxel_size, grid_size, limit).map(|hit| (hit, side))
        })
        .min_by(|a, b| a.0.distance.total_cmp(&b.0.distance))
}

/// Probe origins on the unit collider for the faces facing `direction`.
pub fn probe_offsets(direction: Vec3, corner_blend: f32) -> impl Iterator<Item = Vec3> {
    leading_probes(direction, corner_blend).map(|(_, offset)| offset)
}

fn leading_probes(direction: Vec3, corner_blend: f32) -> impl Iterator<Item = (IVec3, Vec3)> {
    let move_sign = axis_sign(direction);
    SIDES
        .into_iter()
        .filter(move |&side| move_sign * side.abs() == side)
        .flat_map(move |side| {
            CORNERS
                .into_iter()
                .filter(move |&corner| corner * side.abs() == side)
                .map(move |corner| (side, corner.as_vec3().lerp(side.as_vec3(), corner_blend)))
        })
}
