//! Ground and surface probes.
//!
//! Two grounded checks exist because they answer different questions. While
//! the character is already on the ground a cheap overlap below the feet is
//! enough to keep it there. While airborne, landing needs the last move to
//! have touched down on a surface shallow enough to stand on.

use glam::Vec3;

use crate::collision::{LayerMask, SurfaceQueries};

use super::state::{KinematicBody, LocomotionState};

/// Extra reach of the surface probe past the step offset.
const SURFACE_PROBE_MARGIN: f32 = 0.5;

/// Normal of the surface under the capsule, or up if nothing is there.
pub fn surface_normal(world: &impl SurfaceQueries, body: &KinematicBody, mask: LayerMask) -> Vec3 {
    let capsule = &body.capsule;
    let distance = capsule.height * 0.5 + capsule.step_offset + SURFACE_PROBE_MARGIN;

    world
        .sphere_cast_down(body.center(), capsule.radius, distance, mask)
        .map_or(Vec3::Y, |hit| hit.normal)
}

/// Whether the surface under the capsule is within the slope limit.
pub fn surface_walkable(world: &impl SurfaceQueries, body: &KinematicBody, mask: LayerMask) -> bool {
    body.capsule.is_walkable(surface_normal(world, body, mask))
}

/// Overlap test just below the feet.
pub fn grounded_while_grounded(world: &impl SurfaceQueries, body: &KinematicBody, mask: LayerMask) -> bool {
    let radius = body.capsule.radius;
    world.overlap_sphere(body.position - Vec3::Y * radius, radius, mask)
}

/// Last move landed on something, and it is shallow enough to stand on.
pub fn grounded_while_airborne(world: &impl SurfaceQueries, body: &KinematicBody, mask: LayerMask) -> bool {
    body.collided_below && surface_walkable(world, body, mask)
}

/// Grounded check, picked by the state the character was in.
pub fn is_grounded(
    world: &impl SurfaceQueries,
    body: &KinematicBody,
    previous: LocomotionState,
    mask: LayerMask,
) -> bool {
    if previous.is_grounded() {
        grounded_while_grounded(world, body, mask)
    } else {
        grounded_while_airborne(world, body, mask)
    }
}
