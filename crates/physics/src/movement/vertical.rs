//! Vertical velocity: gravity, ground adhesion, jump impulse, terminal clamp.

use super::config::MovementConfig;
use super::state::LocomotionState;

/// Outcome of one vertical step.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VerticalStep {
    pub velocity: f32,
    /// A jump impulse was applied.
    pub jumped: bool,
}

/// Integrate vertical velocity for one tick.
///
/// On the ground the velocity is pinned to `-anti_bump` so the capsule hugs
/// slopes, then given back on sustained ground contact so a standing
/// character does not sink. Only downward speed is clamped.
pub fn integrate_vertical(
    config: &MovementConfig,
    velocity: f32,
    current: LocomotionState,
    previous: LocomotionState,
    jump_pressed: bool,
    dt: f32,
) -> VerticalStep {
    let grounded = current.is_grounded();
    let mut velocity = velocity - config.gravity * dt;
    let mut jumped = false;

    if grounded && velocity < 0.0 {
        velocity = -config.anti_bump;
    }

    if jump_pressed && grounded {
        velocity += config.jump_launch_speed();
        jumped = true;
    }

    if previous.is_grounded() && grounded {
        velocity += config.anti_bump;
    }

    if velocity < -config.terminal_velocity {
        velocity = -config.terminal_velocity;
    }

    VerticalStep { velocity, jumped }
}
