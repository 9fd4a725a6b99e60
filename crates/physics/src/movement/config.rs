//! Movement configuration constants.
//!
//! All tunables are grouped here and read-only while a tick runs. Values are
//! in meters, seconds and degrees unless noted.

use glam::Vec3;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::collision::{Capsule, LayerMask};

/// Configuration for character movement.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct MovementConfig {
    // ========================================================================
    // Body
    // ========================================================================
    /// Collision capsule. `step_offset` here is the grounded value; it is
    /// zeroed while airborne.
    pub capsule: Capsule,

    /// Gun tip anchor in body space, where the rope starts.
    pub gun_tip_offset: Vec3,

    // ========================================================================
    // Lateral Movement
    // ========================================================================
    /// Acceleration while walking (m/s²).
    pub walk_acceleration: f32,

    /// Speed ceiling while walking (m/s).
    pub walk_speed: f32,

    /// Acceleration while running (m/s²).
    pub run_acceleration: f32,

    /// Base running speed. The live value ramps up from here.
    pub run_speed: f32,

    /// Acceleration while sprinting (m/s²).
    pub sprint_acceleration: f32,

    /// Speed ceiling while sprinting, and the cap for the run ramp.
    pub sprint_speed: f32,

    /// Run speed gained per second of sustained movement.
    pub sprint_speed_increase: f32,

    /// Acceleration while airborne (m/s²).
    pub in_air_acceleration: f32,

    /// Lateral drag while grounded (m/s²).
    pub drag: f32,

    /// Lateral drag while airborne (m/s²).
    pub in_air_drag: f32,

    /// Lateral speed above which the body counts as moving.
    pub moving_threshold: f32,

    // ========================================================================
    // Vertical Movement
    // ========================================================================
    /// Gravity acceleration (m/s²).
    pub gravity: f32,

    /// Maximum downward speed (m/s).
    pub terminal_velocity: f32,

    /// Jump strength. Launch speed is `sqrt(jump_speed * 3 * gravity)`.
    pub jump_speed: f32,

    /// Downward bias that keeps the capsule glued to the ground.
    pub anti_bump: f32,

    // ========================================================================
    // Momentum
    // ========================================================================
    /// Exponential decay rate of carried momentum (1/s).
    pub momentum_damping: f32,

    /// Carried momentum below this magnitude is dropped.
    pub momentum_threshold: f32,

    // ========================================================================
    // Grapple
    // ========================================================================
    /// Range of the aim raycast.
    pub max_grapple_distance: f32,

    /// Rope extension speed while throwing (m/s).
    pub throw_speed: f32,

    /// Lower clamp for the pull speed.
    pub grapple_speed_min: f32,

    /// Upper clamp for the pull speed.
    pub grapple_speed_max: f32,

    /// Multiplier applied to the clamped pull speed.
    pub grapple_speed_multiplier: f32,

    /// Distance to the target that counts as arrival.
    pub arrival_distance: f32,

    /// Momentum scale when released by re-pressing the grapple.
    pub repress_momentum_scale: f32,

    /// Momentum scale when released by jumping.
    pub jump_momentum_scale: f32,

    /// Upward speed added on a jump release.
    pub jump_release_boost: f32,

    /// Rate at which the rope end eases toward the target (1/s).
    pub rope_ease_rate: f32,

    /// Within this distance of the target the body turns to face the camera.
    pub grapple_face_distance: f32,

    // ========================================================================
    // Swing
    // ========================================================================
    /// Fraction of gravity applied while swinging.
    pub swing_gravity_scale: f32,

    /// Tangential push from movement input (m/s²).
    pub swing_acceleration: f32,

    /// Velocity damping while swinging (1/s).
    pub swing_damping: f32,

    /// Momentum scale when a swing is released.
    pub swing_release_scale: f32,

    // ========================================================================
    // Rotation and Look
    // ========================================================================
    /// Body rotation speed toward the target yaw (1/s).
    pub rotation_speed: f32,

    /// How long an idle turn is forced once it starts (seconds).
    pub rotate_to_target_time: f32,

    /// Idle mismatch that starts a turn (degrees).
    pub rotation_tolerance: f32,

    /// Mismatch that counts as settled (degrees).
    pub rotation_settle_epsilon: f32,

    /// Horizontal look sensitivity (degrees per input unit).
    pub look_sense_h: f32,

    /// Vertical look sensitivity (degrees per input unit).
    pub look_sense_v: f32,

    /// Pitch limit (degrees either side of level).
    pub look_limit_v: f32,

    // ========================================================================
    // Layers
    // ========================================================================
    /// Layers the ground checks treat as standable.
    pub ground_mask: LayerMask,

    /// Layers that block the capsule.
    pub solid_mask: LayerMask,

    /// Layers the grapple aim can hit.
    pub grapple_mask: LayerMask,
}

impl Default for MovementConfig {
    fn default() -> Self {
        Self {
            capsule: Capsule::default(),
            gun_tip_offset: Vec3::new(0.3, 1.4, 0.5),

            walk_acceleration: 25.0,
            walk_speed: 5.0,
            run_acceleration: 25.0,
            run_speed: 8.0,
            sprint_acceleration: 50.0,
            sprint_speed: 12.0,
            sprint_speed_increase: 0.02,
            in_air_acceleration: 25.0,
            drag: 15.0,
            in_air_drag: 5.0,
            moving_threshold: 0.01,

            gravity: 25.0,
            terminal_velocity: 50.0,
            jump_speed: 1.0,
            anti_bump: 12.0, // same as sprint speed

            momentum_damping: 5.0,
            momentum_threshold: 0.01,

            max_grapple_distance: 100.0,
            throw_speed: 70.0,
            grapple_speed_min: 10.0,
            grapple_speed_max: 40.0,
            grapple_speed_multiplier: 2.0,
            arrival_distance: 3.0,
            repress_momentum_scale: 1.5,
            jump_momentum_scale: 3.0,
            jump_release_boost: 40.0,
            rope_ease_rate: 4.0,
            grapple_face_distance: 3.0,

            swing_gravity_scale: 1.0,
            swing_acceleration: 15.0,
            swing_damping: 0.1,
            swing_release_scale: 1.0,

            rotation_speed: 10.0,
            rotate_to_target_time: 0.25,
            rotation_tolerance: 90.0,
            rotation_settle_epsilon: 0.5,
            look_sense_h: 0.1,
            look_sense_v: 0.1,
            look_limit_v: 89.0,

            ground_mask: LayerMask::MASK_GROUND,
            solid_mask: LayerMask::MASK_CHARACTER_SOLID,
            grapple_mask: LayerMask::MASK_GRAPPLE_AIM,
        }
    }
}

/// A configuration that cannot drive the controller.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    #[error("speed tiers out of order: walk {walk}, run {run}, sprint {sprint}")]
    SpeedTiers { walk: f32, run: f32, sprint: f32 },

    #[error("{field} must be positive, got {value}")]
    NotPositive { field: &'static str, value: f32 },

    #[error("capsule height {height} is shorter than its diameter (radius {radius})")]
    CapsuleTooShort { height: f32, radius: f32 },

    #[error("slope limit must be between 0 and 90 degrees, got {0}")]
    SlopeLimit(f32),

    #[error("grapple speed range is inverted: min {min}, max {max}")]
    GrappleSpeedRange { min: f32, max: f32 },

    #[error("vertical look limit must be in (0, 90] degrees, got {0}")]
    LookLimit(f32),
}

impl MovementConfig {
    /// Check the configuration for values the integrators cannot handle.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.walk_speed > self.run_speed || self.run_speed > self.sprint_speed {
            return Err(ConfigError::SpeedTiers {
                walk: self.walk_speed,
                run: self.run_speed,
                sprint: self.sprint_speed,
            });
        }

        let positive = [
            ("gravity", self.gravity),
            ("terminal_velocity", self.terminal_velocity),
            ("capsule.radius", self.capsule.radius),
        ];
        for (field, value) in positive {
            if value <= 0.0 {
                return Err(ConfigError::NotPositive { field, value });
            }
        }

        if self.capsule.height < 2.0 * self.capsule.radius {
            return Err(ConfigError::CapsuleTooShort {
                height: self.capsule.height,
                radius: self.capsule.radius,
            });
        }

        let slope = self.capsule.slope_limit;
        if slope <= 0.0 || slope >= 90.0 {
            return Err(ConfigError::SlopeLimit(slope));
        }

        if self.grapple_speed_min > self.grapple_speed_max {
            return Err(ConfigError::GrappleSpeedRange {
                min: self.grapple_speed_min,
                max: self.grapple_speed_max,
            });
        }

        if self.look_limit_v <= 0.0 || self.look_limit_v > 90.0 {
            return Err(ConfigError::LookLimit(self.look_limit_v));
        }

        Ok(())
    }

    /// Vertical launch speed of a jump.
    #[inline]
    pub fn jump_launch_speed(&self) -> f32 {
        (self.jump_speed * 3.0 * self.gravity).sqrt()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        assert_eq!(MovementConfig::default().validate(), Ok(()));
    }

    #[test]
    fn test_anti_bump_matches_sprint_speed() {
        let config = MovementConfig::default();
        assert_eq!(config.anti_bump, config.sprint_speed);
    }

    #[test]
    fn test_rejects_inverted_speed_tiers() {
        let config = MovementConfig {
            walk_speed: 9.0,
            ..Default::default()
        };
        assert!(matches!(config.validate(), Err(ConfigError::SpeedTiers { .. })));

        let config = MovementConfig {
            sprint_speed: 6.0,
            ..Default::default()
        };
        assert!(matches!(config.validate(), Err(ConfigError::SpeedTiers { .. })));
    }

    #[test]
    fn test_rejects_bad_physics_values() {
        let config = MovementConfig {
            gravity: 0.0,
            ..Default::default()
        };
        assert_eq!(
            config.validate(),
            Err(ConfigError::NotPositive { field: "gravity", value: 0.0 })
        );

        let mut config = MovementConfig::default();
        config.capsule.height = 0.8;
        assert!(matches!(config.validate(), Err(ConfigError::CapsuleTooShort { .. })));

        let mut config = MovementConfig::default();
        config.capsule.slope_limit = 90.0;
        assert_eq!(config.validate(), Err(ConfigError::SlopeLimit(90.0)));
    }

    #[test]
    fn test_rejects_grapple_and_look_ranges() {
        let config = MovementConfig {
            grapple_speed_min: 50.0,
            ..Default::default()
        };
        assert!(matches!(config.validate(), Err(ConfigError::GrappleSpeedRange { .. })));

        let config = MovementConfig {
            look_limit_v: 0.0,
            ..Default::default()
        };
        assert_eq!(config.validate(), Err(ConfigError::LookLimit(0.0)));
    }

    #[test]
    fn test_jump_launch_speed() {
        let config = MovementConfig::default();
        assert!((config.jump_launch_speed() - 75f32.sqrt()).abs() < 1e-5);
    }
}
