//! Camera look and body rotation reconciliation.
//!
//! The camera turns freely with look input. The body chases a target yaw
//! that accumulates the same horizontal input. While moving the body simply
//! follows; while idle it only turns once the camera has swung past the
//! tolerance, and then keeps turning until it faces the camera again.

use glam::{Quat, Vec3};
use serde::{Deserialize, Serialize};

use super::config::MovementConfig;
use super::state::{CameraFrame, InputSnapshot};

/// Idle turn bookkeeping.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct RotationReconciler {
    /// Counts down from `rotate_to_target_time` after each tolerance crossing.
    /// While it runs, any mismatch may start a turn.
    pub timer: f32,
    /// An idle turn is in progress.
    pub active: bool,
    /// Direction of the turn in progress: true for positive mismatch.
    pub turning_positive: bool,
}

impl RotationReconciler {
    /// Advance the idle turn. Returns true if the body should rotate.
    pub fn update_idle(&mut self, config: &MovementConfig, mismatch: f32, dt: f32) -> bool {
        let settled = mismatch.abs() <= config.rotation_settle_epsilon;
        if mismatch.abs() > config.rotation_tolerance {
            if !self.active {
                log::debug!("idle turn started, mismatch {mismatch:.1}");
            }
            self.active = true;
            self.timer = config.rotate_to_target_time;
            self.turning_positive = mismatch > 0.0;
        } else if !self.active && self.timer > 0.0 && !settled {
            self.active = true;
            self.turning_positive = mismatch > 0.0;
        }

        self.timer = (self.timer - dt).max(0.0);

        if !self.active {
            return false;
        }

        let same_side = if self.turning_positive { mismatch > 0.0 } else { mismatch < 0.0 };
        if same_side && !settled {
            true
        } else {
            self.active = false;
            false
        }
    }

    /// Drop any idle turn in progress.
    pub fn cancel(&mut self) {
        self.active = false;
        self.timer = 0.0;
    }
}

/// Apply look input to the camera and the body target yaw.
pub fn apply_look(config: &MovementConfig, camera: &mut CameraFrame, target_yaw: &mut f32, input: &InputSnapshot) {
    let yaw_delta = config.look_sense_h * input.look.x;
    camera.yaw += yaw_delta;
    camera.pitch = (camera.pitch - config.look_sense_v * input.look.y)
        .clamp(-config.look_limit_v, config.look_limit_v);
    *target_yaw += yaw_delta;
}

/// Step the body rotation toward `target_yaw` (degrees).
pub fn rotate_toward(config: &MovementConfig, rotation: Quat, target_yaw: f32, dt: f32) -> Quat {
    let target = Quat::from_rotation_y(target_yaw.to_radians());
    rotation.lerp(target, (config.rotation_speed * dt).min(1.0))
}

/// Signed angle in degrees from the body forward to the camera forward.
///
/// Positive when the camera faces to the body's right.
pub fn rotation_mismatch(body_forward: Vec3, camera_forward: Vec3) -> f32 {
    let angle = body_forward.angle_between(camera_forward).to_degrees();
    let sign = if body_forward.cross(camera_forward).dot(Vec3::Y) >= 0.0 { 1.0 } else { -1.0 };
    sign * angle
}
