//! Grapple hook: aim, throw, attach, pull and release.
//!
//! A session lives for one gesture. Holding the grapple toggle starts aiming;
//! letting go fires a ray from the camera. On a hit the rope flies out at
//! throw speed and latches once it has covered the distance, either pulling
//! the character straight in or hanging it from the anchor as a pendulum.
//! Normal locomotion keeps running until the rope latches.

use glam::Vec3;
use serde::{Deserialize, Serialize};

use crate::collision::SurfaceQueries;

use super::config::MovementConfig;
use super::state::{CameraFrame, InputSnapshot};

/// Externally visible grapple phase.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum GrapplePhase {
    #[default]
    Idle,
    Aiming,
    Throwing,
    AttachedDirect,
    AttachedSwing,
}

/// One grapple gesture, from first press to release.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum GrappleSession {
    /// Toggle held, waiting for release to fire.
    Aiming,
    /// Rope in flight toward `target`.
    Throwing {
        target: Vec3,
        /// Aim ray hit distance.
        rope_length: f32,
        /// Rope paid out so far.
        extension: f32,
    },
    /// Pulling straight toward `target`.
    AttachedDirect { target: Vec3, rope_length: f32 },
    /// Hanging from `target` on a fixed-length rope.
    AttachedSwing {
        target: Vec3,
        rope_length: f32,
        /// Pendulum velocity from the last swing step.
        velocity: Vec3,
    },
}

impl GrappleSession {
    pub fn phase(&self) -> GrapplePhase {
        match self {
            Self::Aiming => GrapplePhase::Aiming,
            Self::Throwing { .. } => GrapplePhase::Throwing,
            Self::AttachedDirect { .. } => GrapplePhase::AttachedDirect,
            Self::AttachedSwing { .. } => GrapplePhase::AttachedSwing,
        }
    }

    /// Anchor point, once the aim has hit something.
    pub fn target(&self) -> Option<Vec3> {
        match *self {
            Self::Aiming => None,
            Self::Throwing { target, .. }
            | Self::AttachedDirect { target, .. }
            | Self::AttachedSwing { target, .. } => Some(target),
        }
    }
}

/// Phase of an optional session.
pub fn phase_of(session: Option<&GrappleSession>) -> GrapplePhase {
    session.map_or(GrapplePhase::Idle, GrappleSession::phase)
}

/// Advance aiming and throwing for a tick in which the rope is not attached.
///
/// `position` and `velocity` are the body's after this tick's move.
pub fn update_unattached(
    config: &MovementConfig,
    session: Option<GrappleSession>,
    input: &InputSnapshot,
    camera: &CameraFrame,
    world: &impl SurfaceQueries,
    position: Vec3,
    velocity: Vec3,
    dt: f32,
) -> Option<GrappleSession> {
    let session = match session {
        None if input.grapple_toggle_on => {
            log::debug!("grapple: aiming");
            Some(GrappleSession::Aiming)
        }
        Some(GrappleSession::Aiming) if !input.grapple_toggle_on => fire(config, camera, world),
        other => other,
    };

    match session {
        Some(GrappleSession::Throwing {
            target,
            rope_length,
            extension,
        }) => Some(extend_throw(
            config,
            target,
            rope_length,
            extension,
            input.swing_toggle_on,
            position,
            velocity,
            dt,
        )),
        other => other,
    }
}

/// Cast the aim ray. A miss cancels the session.
fn fire(config: &MovementConfig, camera: &CameraFrame, world: &impl SurfaceQueries) -> Option<GrappleSession> {
    let hit = world.raycast(
        camera.eye_position,
        camera.view_direction(),
        config.max_grapple_distance,
        config.grapple_mask,
    );

    match hit {
        Some(hit) => {
            log::debug!("grapple: throwing at {:?} ({:.1}m)", hit.point, hit.distance);
            Some(GrappleSession::Throwing {
                target: hit.point,
                rope_length: hit.distance,
                extension: 0.0,
            })
        }
        None => {
            log::debug!("grapple: aim missed");
            None
        }
    }
}

fn extend_throw(
    config: &MovementConfig,
    target: Vec3,
    rope_length: f32,
    extension: f32,
    swing: bool,
    position: Vec3,
    velocity: Vec3,
    dt: f32,
) -> GrappleSession {
    let extension = extension + config.throw_speed * dt;
    let distance = position.distance(target);

    if extension < distance {
        return GrappleSession::Throwing {
            target,
            rope_length,
            extension,
        };
    }

    if swing {
        log::debug!("grapple: attached (swing)");
        GrappleSession::AttachedSwing {
            target,
            rope_length: rope_length.min(distance),
            velocity: tangent_velocity(velocity, position, target),
        }
    } else {
        log::debug!("grapple: attached (direct)");
        GrappleSession::AttachedDirect { target, rope_length }
    }
}

/// Drop the part of `velocity` along the rope, keeping the swing direction.
fn tangent_velocity(velocity: Vec3, position: Vec3, target: Vec3) -> Vec3 {
    let radial = (position - target).normalize_or_zero();
    velocity - radial * velocity.dot(radial)
}

/// Direction and clamped speed of a direct pull.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Pull {
    pub direction: Vec3,
    /// Distance clamped to the grapple speed range, before the multiplier.
    pub speed: f32,
}

impl Pull {
    pub fn toward(config: &MovementConfig, position: Vec3, target: Vec3) -> Self {
        Self {
            direction: (target - position).normalize_or_zero(),
            speed: position
                .distance(target)
                .clamp(config.grapple_speed_min, config.grapple_speed_max),
        }
    }

    /// Displacement for one tick.
    pub fn displacement(&self, config: &MovementConfig, dt: f32) -> Vec3 {
        self.direction * self.speed * config.grapple_speed_multiplier * dt
    }
}

/// What ended an attached session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ReleaseTrigger {
    /// Reached the target.
    Arrival,
    /// Grapple toggle pressed again.
    Repress,
    /// Jumped while standing on something.
    Jump,
}

/// Pick the release trigger for this tick, if any.
///
/// When several fire together the later one in the list wins: jump beats
/// re-press beats arrival.
pub fn release_trigger(
    config: &MovementConfig,
    distance_to_target: f32,
    input: &InputSnapshot,
    standing: bool,
) -> Option<ReleaseTrigger> {
    if input.jump_pressed && standing {
        Some(ReleaseTrigger::Jump)
    } else if input.grapple_toggle_on {
        Some(ReleaseTrigger::Repress)
    } else if distance_to_target < config.arrival_distance {
        Some(ReleaseTrigger::Arrival)
    } else {
        None
    }
}

/// Momentum handed to locomotion when a direct pull ends.
pub fn direct_release_momentum(config: &MovementConfig, trigger: ReleaseTrigger, pull: &Pull) -> Vec3 {
    let carried = pull.direction * pull.speed;
    match trigger {
        ReleaseTrigger::Arrival => carried * config.grapple_speed_multiplier,
        ReleaseTrigger::Repress => carried * config.repress_momentum_scale,
        ReleaseTrigger::Jump => {
            carried * config.jump_momentum_scale + Vec3::Y * config.jump_release_boost
        }
    }
}

/// Momentum handed to locomotion when a swing ends.
pub fn swing_release_momentum(config: &MovementConfig, trigger: ReleaseTrigger, velocity: Vec3) -> Vec3 {
    let carried = velocity * config.swing_release_scale;
    match trigger {
        ReleaseTrigger::Jump => carried + Vec3::Y * config.jump_release_boost,
        ReleaseTrigger::Arrival | ReleaseTrigger::Repress => carried,
    }
}

/// Ease the loose rope end toward the anchor.
pub fn ease_rope_end(current: Vec3, target: Vec3, config: &MovementConfig, dt: f32) -> Vec3 {
    current.lerp(target, (config.rope_ease_rate * dt).min(1.0))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::collision::{CollisionWorld, LayerMask};

    const DT: f32 = 1.0 / 60.0;

    /// Grapple wall 20m ahead along +Z.
    fn create_test_world() -> CollisionWorld {
        let mut world = CollisionWorld::new();
        world.add_box(
            Vec3::new(0.0, 5.0, 20.5),
            Vec3::new(10.0, 5.0, 0.5),
            LayerMask::GRAPPLE,
        );
        world
    }

    fn camera_at(eye: Vec3) -> CameraFrame {
        CameraFrame {
            eye_position: eye,
            ..Default::default()
        }
    }

    fn held() -> InputSnapshot {
        InputSnapshot {
            grapple_toggle_on: true,
            ..Default::default()
        }
    }

    #[test]
    fn test_press_starts_aiming() {
        let world = create_test_world();
        let config = MovementConfig::default();
        let session = update_unattached(
            &config,
            None,
            &held(),
            &camera_at(Vec3::Y),
            &world,
            Vec3::ZERO,
            Vec3::ZERO,
            DT,
        );
        assert_eq!(session, Some(GrappleSession::Aiming));
    }

    #[test]
    fn test_release_with_hit_throws() {
        let world = create_test_world();
        let config = MovementConfig::default();
        let session = update_unattached(
            &config,
            Some(GrappleSession::Aiming),
            &InputSnapshot::default(),
            &camera_at(Vec3::new(0.0, 2.0, 0.0)),
            &world,
            Vec3::ZERO,
            Vec3::ZERO,
            DT,
        );

        match session {
            Some(GrappleSession::Throwing {
                target,
                rope_length,
                extension,
            }) => {
                assert!((target.z - 20.0).abs() < 0.1);
                assert!((rope_length - 20.0).abs() < 0.1);
                assert!((extension - 70.0 * DT).abs() < 1e-4);
            }
            other => panic!("expected throwing, got {other:?}"),
        }
    }

    #[test]
    fn test_release_with_miss_cancels() {
        let world = create_test_world();
        let config = MovementConfig::default();
        let mut camera = camera_at(Vec3::new(0.0, 2.0, 0.0));
        camera.yaw = 180.0;

        let session = update_unattached(
            &config,
            Some(GrappleSession::Aiming),
            &InputSnapshot::default(),
            &camera,
            &world,
            Vec3::ZERO,
            Vec3::ZERO,
            DT,
        );
        assert_eq!(session, None);
    }

    #[test]
    fn test_throw_latches_after_covering_distance() {
        let world = CollisionWorld::new();
        let config = MovementConfig::default();
        let target = Vec3::new(0.0, 0.0, 14.0);
        let mut session = Some(GrappleSession::Throwing {
            target,
            rope_length: 14.0,
            extension: 0.0,
        });

        // 14m at 70m/s takes 0.2s = 12 ticks
        let mut ticks = 0;
        while matches!(session, Some(GrappleSession::Throwing { .. })) {
            session = update_unattached(
                &config,
                session,
                &InputSnapshot::default(),
                &CameraFrame::default(),
                &world,
                Vec3::ZERO,
                Vec3::ZERO,
                DT,
            );
            ticks += 1;
            assert!(ticks < 20);
        }

        assert!((11..=13).contains(&ticks), "ticks={ticks}");
        assert_eq!(session.map(|s| s.phase()), Some(GrapplePhase::AttachedDirect));
    }

    #[test]
    fn test_swing_toggle_latches_swing() {
        let world = CollisionWorld::new();
        let config = MovementConfig::default();
        let input = InputSnapshot {
            swing_toggle_on: true,
            ..Default::default()
        };
        let session = update_unattached(
            &config,
            Some(GrappleSession::Throwing {
                target: Vec3::new(0.0, 5.0, 0.0),
                rope_length: 30.0,
                extension: 4.9,
            }),
            &input,
            &CameraFrame::default(),
            &world,
            Vec3::ZERO,
            Vec3::ZERO,
            DT,
        );

        match session {
            Some(GrappleSession::AttachedSwing { rope_length, .. }) => {
                assert!((rope_length - 5.0).abs() < 1e-4, "rope shortens to current distance");
            }
            other => panic!("expected swing, got {other:?}"),
        }
    }

    #[test]
    fn test_swing_keeps_tangential_velocity() {
        let world = CollisionWorld::new();
        let config = MovementConfig::default();
        let input = InputSnapshot {
            swing_toggle_on: true,
            ..Default::default()
        };

        // Anchor straight overhead: running along X stays, rising along Y goes
        let session = update_unattached(
            &config,
            Some(GrappleSession::Throwing {
                target: Vec3::new(0.0, 5.0, 0.0),
                rope_length: 5.0,
                extension: 4.9,
            }),
            &input,
            &CameraFrame::default(),
            &world,
            Vec3::ZERO,
            Vec3::new(8.0, 3.0, 0.0),
            DT,
        );

        match session {
            Some(GrappleSession::AttachedSwing { velocity, .. }) => {
                assert!((velocity - Vec3::new(8.0, 0.0, 0.0)).length() < 1e-4, "velocity={velocity:?}");
            }
            other => panic!("expected swing, got {other:?}"),
        }
    }

    #[test]
    fn test_pull_speed_clamped() {
        let config = MovementConfig::default();

        let near = Pull::toward(&config, Vec3::ZERO, Vec3::new(0.0, 0.0, 5.0));
        assert_eq!(near.speed, 10.0);

        let far = Pull::toward(&config, Vec3::ZERO, Vec3::new(0.0, 0.0, 90.0));
        assert_eq!(far.speed, 40.0);

        let mid = Pull::toward(&config, Vec3::ZERO, Vec3::new(0.0, 0.0, 25.0));
        assert!((mid.displacement(&config, 0.5) - Vec3::new(0.0, 0.0, 25.0)).length() < 1e-4);
    }

    #[test]
    fn test_release_priority() {
        let config = MovementConfig::default();
        let all = InputSnapshot {
            jump_pressed: true,
            grapple_toggle_on: true,
            ..Default::default()
        };

        assert_eq!(release_trigger(&config, 1.0, &all, true), Some(ReleaseTrigger::Jump));
        assert_eq!(release_trigger(&config, 1.0, &all, false), Some(ReleaseTrigger::Repress));
        assert_eq!(
            release_trigger(&config, 1.0, &InputSnapshot::default(), false),
            Some(ReleaseTrigger::Arrival)
        );
        assert_eq!(release_trigger(&config, 10.0, &InputSnapshot::default(), true), None);
    }

    #[test]
    fn test_direct_release_momentum() {
        let config = MovementConfig::default();
        let pull = Pull {
            direction: Vec3::Z,
            speed: 10.0,
        };

        assert_eq!(
            direct_release_momentum(&config, ReleaseTrigger::Arrival, &pull),
            Vec3::new(0.0, 0.0, 20.0)
        );
        assert_eq!(
            direct_release_momentum(&config, ReleaseTrigger::Repress, &pull),
            Vec3::new(0.0, 0.0, 15.0)
        );
        assert_eq!(
            direct_release_momentum(&config, ReleaseTrigger::Jump, &pull),
            Vec3::new(0.0, 40.0, 30.0)
        );
    }

    #[test]
    fn test_rope_end_eases() {
        let config = MovementConfig::default();
        let end = ease_rope_end(Vec3::ZERO, Vec3::new(10.0, 0.0, 0.0), &config, 0.1);
        assert!((end.x - 4.0).abs() < 1e-4);

        let end = ease_rope_end(Vec3::ZERO, Vec3::new(10.0, 0.0, 0.0), &config, 1.0);
        assert_eq!(end.x, 10.0);
    }
}
