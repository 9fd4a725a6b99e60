//! The query capability the movement core consumes.
//!
//! The controller never talks to a physics engine directly. Everything it
//! needs from the world goes through [`SurfaceQueries`], which keeps the core
//! testable against hand-built stub worlds and lets a host engine plug in its
//! own implementation.

use glam::Vec3;
use serde::{Deserialize, Serialize};

use super::layers::LayerMask;
use super::trace::TraceShape;

/// Collision capsule of the character.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Capsule {
    /// Radius of the cylinder and end caps (meters).
    pub radius: f32,
    /// Total height, feet to crown (meters).
    pub height: f32,
    /// Highest ledge the capsule may climb automatically in one move.
    pub step_offset: f32,
    /// Steepest walkable slope (degrees from horizontal).
    pub slope_limit: f32,
}

impl Default for Capsule {
    fn default() -> Self {
        Self {
            radius: 0.5,
            height: 2.0,
            step_offset: 0.3,
            slope_limit: 45.0,
        }
    }
}

impl Capsule {
    /// Trace shape for this capsule, anchored at the feet.
    #[inline]
    pub fn shape(&self) -> TraceShape {
        TraceShape::Capsule {
            radius: self.radius,
            height: self.height,
        }
    }

    /// Offset from the feet to the capsule center.
    #[inline]
    pub fn center_offset(&self) -> Vec3 {
        Vec3::new(0.0, self.height * 0.5, 0.0)
    }

    /// Minimum normal Y for a surface to count as walkable.
    #[inline]
    pub fn min_ground_normal(&self) -> f32 {
        self.slope_limit.to_radians().cos()
    }

    /// Whether a surface with the given normal is within the slope limit.
    #[inline]
    pub fn is_walkable(&self, normal: Vec3) -> bool {
        normal.angle_between(Vec3::Y).to_degrees() <= self.slope_limit
    }
}

/// Nearest hit of a downward sphere cast.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SphereHit {
    /// Surface normal at the contact.
    pub normal: Vec3,
    /// Distance the sphere traveled before touching.
    pub distance: f32,
}

/// Nearest hit of a ray.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RayHit {
    /// World-space impact point.
    pub point: Vec3,
    /// Surface normal at the impact.
    pub normal: Vec3,
    /// Distance from the ray origin to the impact.
    pub distance: f32,
}

/// Outcome of a collision-aware capsule move.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct CapsuleMove {
    /// Settled feet position after resolving collisions.
    pub position: Vec3,
    /// The capsule touched something underneath during the move.
    pub collided_below: bool,
    /// The capsule touched a ceiling during the move.
    pub collided_above: bool,
}

impl CapsuleMove {
    /// A move that went exactly where it was asked to.
    pub fn unobstructed(position: Vec3) -> Self {
        Self {
            position,
            ..Default::default()
        }
    }
}

/// World queries used by the movement core.
///
/// Misses are `None`, never errors. `move_capsule` blocks until penetration
/// for this move is resolved and returns the settled position.
pub trait SurfaceQueries {
    /// Does a sphere at `center` overlap any geometry in `mask`?
    fn overlap_sphere(&self, center: Vec3, radius: f32, mask: LayerMask) -> bool;

    /// Sweep a sphere straight down from `center` and report the nearest hit.
    fn sphere_cast_down(
        &self,
        center: Vec3,
        radius: f32,
        max_distance: f32,
        mask: LayerMask,
    ) -> Option<SphereHit>;

    /// Cast a ray and report the nearest hit.
    fn raycast(
        &self,
        origin: Vec3,
        direction: Vec3,
        max_distance: f32,
        mask: LayerMask,
    ) -> Option<RayHit>;

    /// Move the capsule from `feet` by `displacement`, sliding along and
    /// stepping over geometry in `mask`.
    fn move_capsule(
        &self,
        capsule: &Capsule,
        feet: Vec3,
        displacement: Vec3,
        mask: LayerMask,
    ) -> CapsuleMove;
}
