//! Lateral velocity: camera-relative acceleration, drag and speed clamps.

use glam::Vec3;

use super::config::MovementConfig;
use super::state::{CameraFrame, LocomotionState};

/// Advance the run speed ramp for one tick.
///
/// The ramp climbs while the character keeps moving (on foot or in the air)
/// and snaps back to the base speed otherwise. It never exceeds sprint speed.
pub fn ramp_run_speed(config: &MovementConfig, run_speed: f32, state: LocomotionState, dt: f32) -> f32 {
    let ramping = matches!(
        state,
        LocomotionState::Running
            | LocomotionState::Sprinting
            | LocomotionState::Jumping
            | LocomotionState::Falling
    );

    let speed = if ramping {
        run_speed + config.sprint_speed_increase * dt
    } else {
        config.run_speed
    };
    speed.min(config.sprint_speed)
}

/// Acceleration and speed ceiling for a state.
pub fn lateral_limits(config: &MovementConfig, state: LocomotionState, run_speed: f32) -> (f32, f32) {
    if !state.is_grounded() {
        return (config.in_air_acceleration, config.sprint_speed);
    }
    match state {
        LocomotionState::Walking => (config.walk_acceleration, config.walk_speed),
        LocomotionState::Sprinting => (config.sprint_acceleration, config.sprint_speed),
        _ => (config.run_acceleration, run_speed),
    }
}

/// Movement direction on the ground plane for the given input axis.
pub fn movement_direction(camera: &CameraFrame, movement: glam::Vec2) -> Vec3 {
    camera.right_xz() * movement.x + camera.forward_xz() * movement.y
}

/// Integrate lateral velocity for one tick.
///
/// `previous` is the horizontal velocity of the last move. Drag is applied
/// after acceleration and zeroes the velocity instead of reversing it.
pub fn integrate_lateral(
    config: &MovementConfig,
    previous: Vec3,
    direction: Vec3,
    state: LocomotionState,
    run_speed: f32,
    dt: f32,
) -> Vec3 {
    let (acceleration, ceiling) = lateral_limits(config, state, run_speed);

    let mut velocity = Vec3::new(previous.x, 0.0, previous.z) + direction * acceleration * dt;

    let drag = if state.is_grounded() { config.drag } else { config.in_air_drag };
    let drag_step = drag * dt;
    velocity = if velocity.length() > drag_step {
        velocity - velocity.normalize() * drag_step
    } else {
        Vec3::ZERO
    };

    velocity.clamp_length_max(ceiling)
}

/// Slide down surfaces too steep to stand on.
///
/// Only applies while falling, so a jump up a steep face is not cancelled.
pub fn project_on_steep_surface(
    velocity: Vec3,
    surface_normal: Vec3,
    walkable: bool,
    vertical_velocity: f32,
) -> Vec3 {
    if !walkable && vertical_velocity < 0.0 {
        velocity - surface_normal * velocity.dot(surface_normal)
    } else {
        velocity
    }
}
