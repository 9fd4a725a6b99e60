//! Pendulum motion on a grapple rope.
//!
//! The rope is inextensible but slack is allowed: the body moves freely
//! inside the rope sphere and is only constrained once it reaches the rope's
//! length, where the outward part of its velocity is removed.

use glam::Vec3;

use super::config::MovementConfig;

/// Result of one swing step, before collision.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SwingStep {
    /// Requested displacement for the capsule move.
    pub displacement: Vec3,
    /// Pendulum velocity after the rope constraint.
    pub velocity: Vec3,
}

/// Advance the pendulum by one tick.
///
/// `push` is the camera-relative movement direction. Only its component
/// tangent to the rope accelerates the swing.
pub fn swing_step(
    config: &MovementConfig,
    anchor: Vec3,
    rope_length: f32,
    position: Vec3,
    velocity: Vec3,
    push: Vec3,
    dt: f32,
) -> SwingStep {
    let mut velocity = velocity + Vec3::NEG_Y * config.gravity * config.swing_gravity_scale * dt;

    let radial = (position - anchor).normalize_or_zero();
    let tangential_push = push - radial * push.dot(radial);
    velocity += tangential_push * config.swing_acceleration * dt;

    velocity *= (1.0 - config.swing_damping * dt).max(0.0);

    let mut candidate = position + velocity * dt;
    let offset = candidate - anchor;
    let distance = offset.length();
    if distance > rope_length && distance > f32::EPSILON {
        let outward = offset / distance;
        candidate = anchor + outward * rope_length;
        let radial_speed = velocity.dot(outward);
        if radial_speed > 0.0 {
            velocity -= outward * radial_speed;
        }
    }

    SwingStep {
        displacement: candidate - position,
        velocity,
    }
}
