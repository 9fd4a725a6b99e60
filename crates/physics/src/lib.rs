//! Tether Movement Core
//!
//! A third-person character controller: a locomotion state machine, kinematic
//! integrators for a capsule body, a grapple hook with direct pull and rope
//! swing, and camera/body rotation reconciliation.
//!
//! # Architecture
//!
//! The crate is split into two systems:
//!
//! - **Collision**: the [`SurfaceQueries`] capability the core consumes, plus a
//!   reference [`CollisionWorld`] built on parry3d
//! - **Movement**: uses those queries to classify, integrate and move the
//!   character once per tick
//!
//! Ticks are single-threaded and synchronous. The controller holds only
//! configuration; all mutable data lives in [`CharacterState`].

pub mod collision;
pub mod movement;

// Re-export commonly used types
pub use collision::{Capsule, CollisionWorld, LayerMask, SurfaceQueries, TraceResult, TraceShape};
pub use movement::{
    CameraFrame, CharacterController, CharacterState, ConfigError, GrapplePhase, InputSnapshot,
    LocomotionState, MovementConfig, RopeSegment, TickOutput, TickPhase,
};
