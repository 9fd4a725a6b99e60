//! Slide move for collision response.
//!
//! Sweeps the capsule along the requested displacement, clips the remaining
//! motion against every plane it touches, and optionally tries to step up
//! over low ledges. This is what backs [`SurfaceQueries::move_capsule`] for
//! the reference world.
//!
//! [`SurfaceQueries::move_capsule`]: super::SurfaceQueries::move_capsule

use glam::Vec3;

use super::layers::LayerMask;
use super::query::CapsuleMove;
use super::trace::TraceShape;
use super::world::CollisionWorld;

/// Maximum number of collision planes to track during one slide.
const MAX_CLIP_PLANES: usize = 5;

/// Normal Y above which a contact counts as "below", and below whose
/// negation it counts as "above".
const CONTACT_VERTICAL_THRESHOLD: f32 = 0.1;

/// Tunables for the slide algorithm.
#[derive(Debug, Clone, Copy)]
pub struct SlideParams {
    /// Maximum sweep iterations per move.
    pub max_iterations: usize,
    /// Overbounce factor for velocity clipping (prevents sticking).
    pub overbounce: f32,
    /// Maximum ledge height to step over. Zero disables stepping.
    pub step_height: f32,
    /// Minimum normal Y that counts as standable after a step.
    pub min_ground_normal: f32,
}

impl Default for SlideParams {
    fn default() -> Self {
        Self {
            max_iterations: 4,
            overbounce: 1.001,
            step_height: 0.3,
            min_ground_normal: 0.7,
        }
    }
}

#[derive(Debug, Clone, Copy, Default)]
struct Contacts {
    below: bool,
    above: bool,
}

impl Contacts {
    fn record(&mut self, normal: Vec3) {
        if normal.y > CONTACT_VERTICAL_THRESHOLD {
            self.below = true;
        } else if normal.y < -CONTACT_VERTICAL_THRESHOLD {
            self.above = true;
        }
    }

    fn into_move(self, position: Vec3) -> CapsuleMove {
        CapsuleMove {
            position,
            collided_below: self.below,
            collided_above: self.above,
        }
    }
}

/// Clip a motion vector against a surface normal.
///
/// Removes the component going into the surface, plus a tiny overbounce so
/// the shape does not re-touch the same plane next iteration.
pub fn clip_velocity(velocity: Vec3, normal: Vec3, overbounce: f32) -> Vec3 {
    let backoff = velocity.dot(normal);
    let adjusted = if backoff < 0.0 {
        backoff * overbounce
    } else {
        backoff / overbounce
    };
    velocity - normal * adjusted
}

/// Slide `motion` from `position`, clipping against everything touched.
///
/// Returns true if the whole motion completed without touching anything.
fn slide_move(
    world: &CollisionWorld,
    position: &mut Vec3,
    motion: &mut Vec3,
    shape: TraceShape,
    mask: LayerMask,
    params: &SlideParams,
    contacts: &mut Contacts,
) -> bool {
    let initial_motion = *motion;
    let mut remaining = 1.0_f32;
    let mut planes = [Vec3::ZERO; MAX_CLIP_PLANES];
    let mut num_planes = 0;

    for _ in 0..params.max_iterations {
        if motion.length_squared() < 1e-10 {
            break;
        }

        let target = *position + *motion * remaining;
        let trace = world.trace(*position, target, shape, mask);

        if trace.fraction >= 1.0 {
            *position = trace.end_position;
            return num_planes == 0;
        }

        if trace.fraction > 0.0 {
            *position = trace.end_position;
        }
        remaining *= 1.0 - trace.fraction;

        let Some(normal) = trace.hit_normal else {
            continue;
        };
        contacts.record(normal);

        if trace.all_solid {
            *motion = Vec3::ZERO;
            return false;
        }

        if num_planes < MAX_CLIP_PLANES {
            planes[num_planes] = normal;
            num_planes += 1;
        }

        let mut found_valid = false;
        for i in 0..num_planes {
            let clipped = clip_velocity(*motion, planes[i], params.overbounce);
            let valid = (0..num_planes)
                .filter(|&j| j != i)
                .all(|j| clipped.dot(planes[j]) >= -0.01);
            if valid {
                *motion = clipped;
                found_valid = true;
                break;
            }
        }

        if !found_valid {
            if num_planes >= 2 {
                // Slide along the crease of the first two planes
                let crease = planes[0].cross(planes[1]).normalize_or_zero();
                *motion = crease * initial_motion.dot(crease);
                if motion.dot(planes[0]) < -0.01 || motion.dot(planes[1]) < -0.01 {
                    *motion = Vec3::ZERO;
                    return false;
                }
            } else {
                *motion = Vec3::ZERO;
                return false;
            }
        }
    }

    false
}

/// Slide move with stair stepping.
///
/// If the plain slide is blocked and stepping is enabled, retry the motion
/// from `step_height` higher, settle back down, and keep whichever attempt
/// got further horizontally.
pub fn step_slide_move(
    world: &CollisionWorld,
    start: Vec3,
    displacement: Vec3,
    shape: TraceShape,
    mask: LayerMask,
    params: &SlideParams,
) -> CapsuleMove {
    let mut position = start;
    let mut motion = displacement;
    let mut contacts = Contacts::default();

    let clear = slide_move(world, &mut position, &mut motion, shape, mask, params, &mut contacts);

    let horizontal = Vec3::new(displacement.x, 0.0, displacement.z);
    if clear || params.step_height <= 0.0 || horizontal.length_squared() < 1e-10 {
        return contacts.into_move(position);
    }

    let plain_dist_sq = Vec3::new(position.x - start.x, 0.0, position.z - start.z).length_squared();

    let up_trace = world.trace(start, start + Vec3::Y * params.step_height, shape, mask);
    if up_trace.all_solid {
        return contacts.into_move(position);
    }

    let mut stepped = up_trace.end_position;
    let mut stepped_motion = displacement;
    let mut stepped_contacts = Contacts::default();
    slide_move(
        world,
        &mut stepped,
        &mut stepped_motion,
        shape,
        mask,
        params,
        &mut stepped_contacts,
    );

    let down_trace = world.trace(
        stepped,
        stepped - Vec3::Y * (params.step_height + 0.01),
        shape,
        mask,
    );
    if !down_trace.all_solid {
        stepped = down_trace.end_position;
    }

    let stepped_dist_sq = Vec3::new(stepped.x - start.x, 0.0, stepped.z - start.z).length_squared();
    let landed = down_trace
        .hit_normal
        .is_some_and(|n| n.y >= params.min_ground_normal);

    if stepped_dist_sq > plain_dist_sq && landed {
        stepped_contacts.below = true;
        return stepped_contacts.into_move(stepped);
    }

    contacts.into_move(position)
}
