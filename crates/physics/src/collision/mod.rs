//! World collision for the character capsule.
//!
//! The movement core only ever sees the world through [`SurfaceQueries`].
//! [`CollisionWorld`] is the reference implementation on top of parry3d,
//! used by the demo arena and the tests.
//!
//! # Key Types
//!
//! - [`SurfaceQueries`]: overlap, sphere cast, raycast and capsule move
//! - [`CollisionWorld`]: static brushes with sweep and ray queries
//! - [`LayerMask`]: per-query layer filtering
//! - [`TraceResult`]: output from a shape sweep
//!
//! # Tracing Algorithm
//!
//! Sweeps are a binary search over overlap tests. The hit normal comes from
//! the penetration direction at the first overlapping sample, so sloped and
//! rotated brushes report their true face normals.

mod layers;
mod query;
mod slide;
mod trace;
mod world;

pub use layers::LayerMask;
pub use query::{Capsule, CapsuleMove, RayHit, SphereHit, SurfaceQueries};
pub use slide::{clip_velocity, step_slide_move, SlideParams};
pub use trace::{TraceResult, TraceShape};
pub use world::{CollisionBrush, CollisionWorld};
