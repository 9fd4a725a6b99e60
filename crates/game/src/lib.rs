//! Tether game layer
//!
//! This crate wraps the movement core in everything a playable character
//! needs around it:
//!
//! - Input mapping (edges, hold/toggle buttons, action latches)
//! - Third-person camera boom
//! - Animation parameters
//! - Levels and the fixed-step simulation loop
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────┐
//! │                        Simulation                            │
//! │  ┌──────────┐   ┌───────────┐   ┌────────────┐   ┌────────┐  │
//! │  │ Input    │──►│ Input     │──►│ Character  │──►│ Anim   │  │
//! │  │ Provider │   │ Mapper    │   │ Controller │   │ Driver │  │
//! │  └──────────┘   └───────────┘   └─────┬──────┘   └────────┘  │
//! │                                       │ queries              │
//! │                                 ┌─────▼──────┐               │
//! │                                 │ Level      │               │
//! │                                 └────────────┘               │
//! └──────────────────────────────────────────────────────────────┘
//! ```

pub mod animation;
pub mod camera;
pub mod input;
pub mod level;
pub mod simulation;

// Re-export main types
pub use animation::{AnimFlag, AnimFloat, AnimationConfig, AnimationDriver, AnimationFrame};
pub use camera::{CameraConfig, ThirdPersonRig};
pub use input::{InputConfig, InputMapper, InputProvider, PlayerInput, ScriptedInput};
pub use level::{Level, LevelDesc, SpawnPoint};
pub use simulation::{Simulation, SimulationConfig, TickReport};

// Re-export physics types for convenience
pub use tether_physics::{
    CameraFrame, CharacterController, CharacterState, CollisionWorld, GrapplePhase, InputSnapshot,
    LocomotionState, MovementConfig, TickOutput,
};
