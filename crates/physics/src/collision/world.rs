//! Reference collision world built on parry3d.
//!
//! Hosts that already own a physics engine implement [`SurfaceQueries`]
//! themselves. This world exists for the demo, the test arena, and the
//! integration tests.

use glam::Vec3;
use parry3d::math::{Isometry, Point, Real, Vector};
use parry3d::query::{contact, Ray, RayCast};
use parry3d::shape::SharedShape;

use super::layers::LayerMask;
use super::query::{Capsule, CapsuleMove, RayHit, SphereHit, SurfaceQueries};
use super::slide::{step_slide_move, SlideParams};
use super::trace::{TraceResult, TraceShape};

/// A piece of collision geometry in the world.
#[derive(Clone)]
pub struct CollisionBrush {
    /// Unique identifier for this brush.
    pub id: u32,
    /// The collision shape.
    pub shape: SharedShape,
    /// Position and orientation in world space.
    pub transform: Isometry<Real>,
    /// Layers this brush belongs to.
    pub layers: LayerMask,
}

impl std::fmt::Debug for CollisionBrush {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CollisionBrush")
            .field("id", &self.id)
            .field("translation", &self.transform.translation.vector)
            .field("layers", &self.layers)
            .finish()
    }
}

/// Static collision geometry with sweep, overlap and ray queries.
///
/// The world is immutable while a tick runs, so a shared reference is all the
/// controller ever needs.
#[derive(Debug, Default)]
pub struct CollisionWorld {
    brushes: Vec<CollisionBrush>,
    next_id: u32,
    slide: SlideParams,
}

impl CollisionWorld {
    /// Create an empty collision world.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an axis-aligned box to the world.
    pub fn add_box(&mut self, center: Vec3, half_extents: Vec3, layers: LayerMask) -> u32 {
        let shape = SharedShape::cuboid(half_extents.x, half_extents.y, half_extents.z);
        let transform = Isometry::translation(center.x, center.y, center.z);
        self.push_brush(shape, transform, layers)
    }

    /// Add a box rotated about the Z axis by `tilt_degrees`.
    ///
    /// Used for ramps and steep walls. Positive tilt raises the -X end.
    pub fn add_tilted_box(
        &mut self,
        center: Vec3,
        half_extents: Vec3,
        tilt_degrees: f32,
        layers: LayerMask,
    ) -> u32 {
        let shape = SharedShape::cuboid(half_extents.x, half_extents.y, half_extents.z);
        let transform = Isometry::new(
            Vector::new(center.x, center.y, center.z),
            Vector::new(0.0, 0.0, -tilt_degrees.to_radians()),
        );
        self.push_brush(shape, transform, layers)
    }

    /// Get the number of collision brushes.
    pub fn brush_count(&self) -> usize {
        self.brushes.len()
    }

    /// Sweep `shape` from `start` to `end` and report the first contact.
    pub fn trace(&self, start: Vec3, end: Vec3, shape: TraceShape, mask: LayerMask) -> TraceResult {
        let delta = end - start;
        let distance = delta.length();

        if distance < 0.0001 {
            return if self.point_in_solid(start, shape, mask) {
                TraceResult {
                    fraction: 0.0,
                    end_position: start,
                    hit_normal: Some(Vec3::Y),
                    hit_layers: mask,
                    started_in_solid: true,
                    all_solid: true,
                }
            } else {
                TraceResult::no_hit(start)
            };
        }

        self.trace_binary_search(start, end, shape, mask, delta / distance)
    }

    /// Cast a ray and return the nearest hit as a trace result.
    pub fn raycast_trace(
        &self,
        origin: Vec3,
        direction: Vec3,
        max_distance: f32,
        mask: LayerMask,
    ) -> TraceResult {
        let dir = direction.normalize_or_zero();
        if dir == Vec3::ZERO || max_distance <= 0.0 {
            return TraceResult::no_hit(origin);
        }

        let ray = Ray::new(
            Point::new(origin.x, origin.y, origin.z),
            Vector::new(dir.x, dir.y, dir.z),
        );

        let mut closest: Option<(f32, &CollisionBrush)> = None;
        for brush in &self.brushes {
            if !mask.intersects(brush.layers) {
                continue;
            }
            if let Some(toi) = brush.shape.cast_ray(&brush.transform, &ray, max_distance, true) {
                if closest.map_or(true, |(best, _)| toi < best) {
                    closest = Some((toi, brush));
                }
            }
        }

        match closest {
            Some((toi, brush)) => TraceResult {
                fraction: toi / max_distance,
                end_position: origin + dir * toi,
                hit_normal: Some(Self::ray_normal(&ray, toi, brush)),
                hit_layers: brush.layers,
                started_in_solid: toi <= 0.0,
                all_solid: false,
            },
            None => TraceResult::no_hit(origin + dir * max_distance),
        }
    }

    /// Check if a shape placed at `position` overlaps any geometry in `mask`.
    pub fn point_in_solid(&self, position: Vec3, shape: TraceShape, mask: LayerMask) -> bool {
        let test_shape = Self::parry_shape(shape);
        let test_transform = Self::shape_transform(position, shape);

        self.brushes
            .iter()
            .filter(|brush| mask.intersects(brush.layers))
            .any(|brush| {
                matches!(
                    contact(
                        &test_transform,
                        test_shape.as_ref(),
                        &brush.transform,
                        brush.shape.as_ref(),
                        0.0,
                    ),
                    Ok(Some(_))
                )
            })
    }

    /// Push a shape out of overlapping geometry. Returns the corrected position.
    pub fn resolve_penetration(&self, position: Vec3, shape: TraceShape, mask: LayerMask) -> Vec3 {
        let test_shape = Self::parry_shape(shape);
        let test_transform = Self::shape_transform(position, shape);

        let mut correction = Vec3::ZERO;
        for brush in self.brushes.iter().filter(|b| mask.intersects(b.layers)) {
            if let Ok(Some(hit)) = contact(
                &test_transform,
                test_shape.as_ref(),
                &brush.transform,
                brush.shape.as_ref(),
                0.0,
            ) {
                // normal2 points out of the brush, toward the test shape.
                let normal = Vec3::new(hit.normal2.x, hit.normal2.y, hit.normal2.z);
                let depth = -hit.dist;
                if depth > 0.0 {
                    correction += normal * (depth + 0.001);
                }
            }
        }

        position + correction
    }

    // ========================================================================
    // Private helpers
    // ========================================================================

    fn push_brush(&mut self, shape: SharedShape, transform: Isometry<Real>, layers: LayerMask) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        self.brushes.push(CollisionBrush {
            id,
            shape,
            transform,
            layers,
        });
        id
    }

    fn trace_binary_search(
        &self,
        start: Vec3,
        end: Vec3,
        shape: TraceShape,
        mask: LayerMask,
        direction: Vec3,
    ) -> TraceResult {
        let started_in_solid = self.point_in_solid(start, shape, mask);

        if !self.point_in_solid(end, shape, mask) {
            return TraceResult {
                started_in_solid,
                ..TraceResult::no_hit(end)
            };
        }

        let mut lo = 0.0_f32;
        let mut hi = 1.0_f32;
        for _ in 0..12 {
            let mid = (lo + hi) * 0.5;
            if self.point_in_solid(start + (end - start) * mid, shape, mask) {
                hi = mid;
            } else {
                lo = mid;
            }
        }

        let penetrating = start + (end - start) * hi;
        let push = self.resolve_penetration(penetrating, shape, mask) - penetrating;
        let hit_normal = if push.length_squared() > 1e-8 {
            push.normalize()
        } else {
            let back = -direction;
            if back.length_squared() > 0.1 { back.normalize() } else { Vec3::Y }
        };

        TraceResult {
            fraction: lo,
            end_position: start + (end - start) * lo,
            hit_normal: Some(hit_normal),
            hit_layers: mask,
            started_in_solid,
            all_solid: started_in_solid && lo < 0.001,
        }
    }

    fn parry_shape(shape: TraceShape) -> SharedShape {
        match shape {
            TraceShape::Capsule { radius, height } => {
                let cylinder_half_height = (height - 2.0 * radius).max(0.0) / 2.0;
                SharedShape::capsule_y(cylinder_half_height, radius)
            }
            TraceShape::Sphere { radius } => SharedShape::ball(radius),
            TraceShape::Point => SharedShape::ball(0.001),
        }
    }

    fn shape_transform(position: Vec3, shape: TraceShape) -> Isometry<Real> {
        let center = position + shape.center_offset();
        Isometry::translation(center.x, center.y, center.z)
    }

    fn ray_normal(ray: &Ray, toi: f32, brush: &CollisionBrush) -> Vec3 {
        match brush
            .shape
            .cast_ray_and_get_normal(&brush.transform, ray, toi + 0.01, true)
        {
            Some(intersection) => Vec3::new(
                intersection.normal.x,
                intersection.normal.y,
                intersection.normal.z,
            ),
            None => -Vec3::new(ray.dir.x, ray.dir.y, ray.dir.z).normalize_or_zero(),
        }
    }
}

impl SurfaceQueries for CollisionWorld {
    fn overlap_sphere(&self, center: Vec3, radius: f32, mask: LayerMask) -> bool {
        self.point_in_solid(center, TraceShape::Sphere { radius }, mask)
    }

    fn sphere_cast_down(
        &self,
        center: Vec3,
        radius: f32,
        max_distance: f32,
        mask: LayerMask,
    ) -> Option<SphereHit> {
        let shape = TraceShape::Sphere { radius };
        let end = center - Vec3::Y * max_distance;
        let trace = self.trace(center, end, shape, mask);

        // Geometry already overlapping the start is ignored, like a
        // conventional sphere cast.
        if trace.started_in_solid || !trace.hit_something() {
            return None;
        }

        Some(SphereHit {
            normal: trace.normal_or_up(),
            distance: trace.fraction * max_distance,
        })
    }

    fn raycast(
        &self,
        origin: Vec3,
        direction: Vec3,
        max_distance: f32,
        mask: LayerMask,
    ) -> Option<RayHit> {
        let trace = self.raycast_trace(origin, direction, max_distance, mask);
        if !trace.hit_something() {
            return None;
        }

        Some(RayHit {
            point: trace.end_position,
            normal: trace.normal_or_up(),
            distance: (trace.end_position - origin).length(),
        })
    }

    fn move_capsule(
        &self,
        capsule: &Capsule,
        feet: Vec3,
        displacement: Vec3,
        mask: LayerMask,
    ) -> CapsuleMove {
        if displacement.length_squared() < 1e-10 {
            return CapsuleMove::unobstructed(feet);
        }

        let params = SlideParams {
            step_height: capsule.step_offset,
            min_ground_normal: capsule.min_ground_normal(),
            ..self.slide
        };
        step_slide_move(self, feet, displacement, capsule.shape(), mask, &params)
    }
}

// ============================================================================
// Tests
// ============================================================================
