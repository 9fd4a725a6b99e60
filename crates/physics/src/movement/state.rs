//! Character state and per-tick input structures.

use glam::{EulerRot, Quat, Vec2, Vec3};
use serde::{Deserialize, Serialize};

use crate::collision::Capsule;

use super::config::MovementConfig;
use super::grapple::GrappleSession;
use super::rotation::RotationReconciler;

/// Discrete locomotion state. Exactly one is active per tick.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LocomotionState {
    #[default]
    Idling,
    Walking,
    Running,
    Sprinting,
    Jumping,
    Falling,
    Grappling,
    Swinging,
}

impl LocomotionState {
    /// Every state, in declaration order.
    pub const ALL: [Self; 8] = [
        Self::Idling,
        Self::Walking,
        Self::Running,
        Self::Sprinting,
        Self::Jumping,
        Self::Falling,
        Self::Grappling,
        Self::Swinging,
    ];

    /// Idling, Walking, Running or Sprinting.
    #[inline]
    pub fn is_grounded(self) -> bool {
        matches!(self, Self::Idling | Self::Walking | Self::Running | Self::Sprinting)
    }

    /// Jumping or Falling.
    #[inline]
    pub fn is_airborne(self) -> bool {
        matches!(self, Self::Jumping | Self::Falling)
    }

    /// Attached to a grapple target, pulling or swinging.
    #[inline]
    pub fn is_attached(self) -> bool {
        matches!(self, Self::Grappling | Self::Swinging)
    }
}

/// Already-debounced input for one tick.
///
/// `jump_pressed` is true only on the tick the press happened. Toggle fields
/// are levels produced by the input mapper, and the action fields stay
/// latched until the action is consumed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct InputSnapshot {
    /// Movement axis: x = strafe, y = forward.
    pub movement: Vec2,
    /// Look delta for this tick.
    pub look: Vec2,
    pub jump_pressed: bool,
    pub walk_toggle_on: bool,
    pub grapple_toggle_on: bool,
    pub swing_toggle_on: bool,
    pub attack_pressed: bool,
    pub gather_pressed: bool,
}

impl InputSnapshot {
    /// Movement input with the given axis and nothing else pressed.
    pub fn moving(movement: Vec2) -> Self {
        Self {
            movement,
            ..Default::default()
        }
    }

    /// Any movement input this tick.
    #[inline]
    pub fn has_movement(&self) -> bool {
        self.movement != Vec2::ZERO
    }

    /// Forward input dominates strafe, so running is allowed.
    #[inline]
    pub fn can_run(&self) -> bool {
        self.movement.y >= self.movement.x.abs()
    }
}

/// The moving capsule.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KinematicBody {
    /// Feet position in world space.
    pub position: Vec3,
    /// Actual velocity of the last move (displacement / dt).
    pub velocity: Vec3,
    /// Collision capsule. `step_offset` is zeroed while airborne.
    pub capsule: Capsule,
    /// Facing. Only yaw is ever applied.
    pub rotation: Quat,
    /// The last move touched something underneath.
    pub collided_below: bool,
}

impl KinematicBody {
    pub fn new(position: Vec3, capsule: Capsule) -> Self {
        Self {
            position,
            velocity: Vec3::ZERO,
            capsule,
            rotation: Quat::IDENTITY,
            collided_below: false,
        }
    }

    /// Center of the capsule.
    #[inline]
    pub fn center(&self) -> Vec3 {
        self.position + self.capsule.center_offset()
    }

    /// Horizontal part of the velocity.
    #[inline]
    pub fn lateral_velocity(&self) -> Vec3 {
        Vec3::new(self.velocity.x, 0.0, self.velocity.z)
    }

    /// Facing direction flattened onto the ground plane.
    pub fn forward(&self) -> Vec3 {
        let forward = self.rotation * Vec3::Z;
        Vec3::new(forward.x, 0.0, forward.z).normalize_or(Vec3::Z)
    }

    /// Facing yaw in degrees.
    pub fn yaw_degrees(&self) -> f32 {
        let forward = self.forward();
        forward.x.atan2(forward.z).to_degrees()
    }
}

/// Camera orientation and placement.
///
/// Angles are in degrees. Positive pitch looks down.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CameraFrame {
    pub yaw: f32,
    pub pitch: f32,
    /// World position of the eye. Used as the grapple aim origin.
    pub eye_position: Vec3,
    /// Boom length behind the pivot.
    pub zoom_distance: f32,
    /// Height of the orbit pivot above the feet.
    pub pivot_height: f32,
}

impl Default for CameraFrame {
    fn default() -> Self {
        Self {
            yaw: 0.0,
            pitch: 0.0,
            eye_position: Vec3::ZERO,
            zoom_distance: 3.0,
            pivot_height: 1.6,
        }
    }
}

impl CameraFrame {
    /// Full camera orientation.
    pub fn rotation(&self) -> Quat {
        Quat::from_euler(EulerRot::YXZ, self.yaw.to_radians(), self.pitch.to_radians(), 0.0)
    }

    /// View direction, including pitch.
    pub fn view_direction(&self) -> Vec3 {
        self.rotation() * Vec3::Z
    }

    /// Forward on the ground plane.
    pub fn forward_xz(&self) -> Vec3 {
        Quat::from_rotation_y(self.yaw.to_radians()) * Vec3::Z
    }

    /// Right on the ground plane.
    pub fn right_xz(&self) -> Vec3 {
        Quat::from_rotation_y(self.yaw.to_radians()) * Vec3::X
    }

    /// Place the eye behind the pivot above `feet`.
    pub fn follow(&mut self, feet: Vec3) {
        let pivot = feet + Vec3::Y * self.pivot_height;
        self.eye_position = pivot - self.view_direction() * self.zoom_distance;
    }
}

/// Velocity injected on grapple release that decays over time.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct MomentumCarry {
    pub velocity: Vec3,
}

impl MomentumCarry {
    /// Replace the carried momentum.
    pub fn inject(&mut self, velocity: Vec3) {
        self.velocity = velocity;
    }

    /// Exponential decay; drops to zero below `threshold`.
    pub fn decay(&mut self, damping: f32, threshold: f32, dt: f32) {
        self.velocity -= self.velocity * (damping * dt).min(1.0);
        if self.velocity.length() < threshold {
            self.velocity = Vec3::ZERO;
        }
    }

    #[inline]
    pub fn is_zero(&self) -> bool {
        self.velocity == Vec3::ZERO
    }
}

/// Everything the controller carries from one tick to the next.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CharacterState {
    /// State chosen this tick.
    pub locomotion: LocomotionState,
    /// State chosen last tick.
    pub previous_locomotion: LocomotionState,
    /// Result of the ground probe this tick.
    pub ground_contact: bool,

    pub body: KinematicBody,

    /// Integrated vertical velocity, before collision.
    pub vertical_velocity: f32,
    /// Live run speed; ramps toward sprint speed.
    pub run_speed: f32,
    /// A jump impulse was applied and has not been classified yet.
    pub jumped_last_frame: bool,
    pub momentum: MomentumCarry,

    /// Yaw the body rotates toward (degrees).
    pub target_yaw: f32,
    /// Signed angle from body forward to camera forward (degrees).
    pub rotation_mismatch: f32,
    pub rotation: RotationReconciler,

    /// Active grapple gesture, if any.
    pub grapple: Option<GrappleSession>,
    /// Moving end of the rope line.
    pub rope_end: Vec3,
}

impl CharacterState {
    /// Fresh state standing at `position`.
    pub fn new(position: Vec3, config: &MovementConfig) -> Self {
        Self {
            locomotion: LocomotionState::Idling,
            previous_locomotion: LocomotionState::Falling,
            ground_contact: false,
            body: KinematicBody::new(position, config.capsule),
            vertical_velocity: 0.0,
            run_speed: config.run_speed,
            jumped_last_frame: false,
            momentum: MomentumCarry::default(),
            target_yaw: 0.0,
            rotation_mismatch: 0.0,
            rotation: RotationReconciler::default(),
            grapple: None,
            rope_end: position,
        }
    }

    /// World position of the rope anchor on the gun.
    pub fn gun_tip(&self, config: &MovementConfig) -> Vec3 {
        self.body.position + self.body.rotation * config.gun_tip_offset
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_state_subsets() {
        for state in LocomotionState::ALL {
            let groups = [state.is_grounded(), state.is_airborne(), state.is_attached()];
            assert_eq!(groups.iter().filter(|&&g| g).count(), 1, "{state:?}");
        }
    }

    #[test]
    fn test_can_run() {
        assert!(InputSnapshot::moving(Vec2::new(0.0, 1.0)).can_run());
        assert!(InputSnapshot::moving(Vec2::new(0.7, 0.7)).can_run());
        assert!(!InputSnapshot::moving(Vec2::new(1.0, 0.0)).can_run());
        assert!(!InputSnapshot::moving(Vec2::new(0.0, -1.0)).can_run());
    }

    #[test]
    fn test_camera_axes() {
        let mut camera = CameraFrame::default();
        assert!((camera.forward_xz() - Vec3::Z).length() < 1e-5);
        assert!((camera.right_xz() - Vec3::X).length() < 1e-5);

        camera.yaw = 90.0;
        assert!((camera.forward_xz() - Vec3::X).length() < 1e-5);

        camera.yaw = 0.0;
        camera.pitch = 30.0;
        assert!(camera.view_direction().y < 0.0, "positive pitch looks down");
    }

    #[test]
    fn test_camera_follow() {
        let mut camera = CameraFrame {
            zoom_distance: 4.0,
            ..Default::default()
        };
        camera.follow(Vec3::new(1.0, 0.0, 1.0));
        assert!((camera.eye_position - Vec3::new(1.0, 1.6, -3.0)).length() < 1e-4);
    }

    #[test]
    fn test_momentum_decay() {
        let mut momentum = MomentumCarry::default();
        momentum.inject(Vec3::new(10.0, 0.0, 0.0));

        momentum.decay(5.0, 0.01, 0.1);
        assert!((momentum.velocity.x - 5.0).abs() < 1e-4);

        for _ in 0..100 {
            momentum.decay(5.0, 0.01, 0.1);
        }
        assert!(momentum.is_zero());
    }

    #[test]
    fn test_body_yaw() {
        let mut body = KinematicBody::new(Vec3::ZERO, Capsule::default());
        assert!(body.yaw_degrees().abs() < 1e-4);

        body.rotation = Quat::from_rotation_y(45f32.to_radians());
        assert!((body.yaw_degrees() - 45.0).abs() < 1e-3);
    }
}
