//! Third-person movement.
//!
//! This module implements the locomotion state machine and its integrators:
//!
//! - State selection from input, ground contact and vertical speed
//! - Gravity with ground adhesion, jump impulse and terminal clamp
//! - Camera-relative acceleration with drag and per-state speed ceilings
//! - Grapple hook pull and rope swing, with momentum carried on release
//! - Body rotation reconciled against the camera, with idle hysteresis
//!
//! # Design
//!
//! Movement is driven by the [`CharacterController`], which takes an
//! [`InputSnapshot`] each tick and updates a [`CharacterState`] through any
//! world implementing [`SurfaceQueries`](crate::collision::SurfaceQueries).
//! Every tick runs the phases in [`TickPhase::ORDER`].

mod classify;
mod config;
mod controller;
mod grapple;
mod ground;
mod lateral;
mod rotation;
mod schedule;
mod state;
mod swing;
mod vertical;

pub use classify::{classify, ClassifyInput};
pub use config::{ConfigError, MovementConfig};
pub use controller::{CharacterController, RopeSegment, TickOutput};
pub use grapple::{GrapplePhase, GrappleSession, ReleaseTrigger};
pub use rotation::{rotation_mismatch, RotationReconciler};
pub use schedule::TickPhase;
pub use state::{CameraFrame, CharacterState, InputSnapshot, KinematicBody, LocomotionState, MomentumCarry};
