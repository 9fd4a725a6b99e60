//! Character movement controller.
//!
//! This is the main entry point for character movement. Each tick it picks a
//! locomotion state, integrates velocity (or runs the grapple), moves the
//! capsule through the world, then reconciles camera and body rotation.

use glam::Vec3;
use serde::{Deserialize, Serialize};

use crate::collision::SurfaceQueries;

use super::classify::{classify, ClassifyInput};
use super::config::{ConfigError, MovementConfig};
use super::grapple::{
    direct_release_momentum, ease_rope_end, phase_of, release_trigger, swing_release_momentum,
    update_unattached, GrapplePhase, GrappleSession, Pull, ReleaseTrigger,
};
use super::ground::{grounded_while_grounded, is_grounded, surface_normal};
use super::lateral::{integrate_lateral, movement_direction, project_on_steep_surface, ramp_run_speed};
use super::rotation::{apply_look, rotate_toward, rotation_mismatch};
use super::schedule::TickPhase;
use super::state::{CameraFrame, CharacterState, InputSnapshot, LocomotionState};
use super::swing::swing_step;
use super::vertical::integrate_vertical;

/// Longest tick the integrators will take in one step (seconds).
const MAX_DELTA_TIME: f32 = 0.1;

/// Rope line from the gun tip to the loose end.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RopeSegment {
    pub start: Vec3,
    pub end: Vec3,
}

/// What a tick produced, for animation, camera and rope consumers.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TickOutput {
    pub state: LocomotionState,
    /// The state is one of the grounded states.
    pub grounded: bool,
    /// Signed body/camera mismatch in degrees.
    pub rotation_mismatch: f32,
    pub is_rotating_to_target: bool,
    pub grapple_phase: GrapplePhase,
    /// Present from aiming until release. Collapsed onto the gun tip
    /// until the aim has hit something.
    pub rope: Option<RopeSegment>,
    pub position: Vec3,
    pub velocity: Vec3,
}

/// Motion chosen by the integrate phase.
#[derive(Debug, Clone, Copy)]
enum MovePlan {
    Locomotion { displacement: Vec3 },
    Pull { pull: Pull, displacement: Vec3 },
    Swing { displacement: Vec3 },
}

impl MovePlan {
    fn displacement(&self) -> Vec3 {
        match *self {
            Self::Locomotion { displacement }
            | Self::Pull { displacement, .. }
            | Self::Swing { displacement } => displacement,
        }
    }
}

/// Third-person character controller.
///
/// Holds only configuration. All per-character data lives in
/// [`CharacterState`], so one controller can drive any number of characters.
///
/// # Example
///
/// ```ignore
/// let controller = CharacterController::new(MovementConfig::default())?;
/// let mut state = controller.spawn(spawn_position);
/// let mut camera = CameraFrame::default();
///
/// // Each frame:
/// let output = controller.tick(&mut state, &input, &mut camera, &world, delta_time);
/// ```
#[derive(Debug, Clone)]
pub struct CharacterController {
    /// Movement configuration.
    pub config: MovementConfig,
}

impl CharacterController {
    /// Create a controller, rejecting configurations the integrators cannot handle.
    pub fn new(config: MovementConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self { config })
    }

    /// Create a controller with default configuration.
    pub fn with_default_config() -> Self {
        Self {
            config: MovementConfig::default(),
        }
    }

    /// Fresh character state with its feet at `position`.
    pub fn spawn(&self, position: Vec3) -> CharacterState {
        let mut state = CharacterState::new(position, &self.config);
        state.rope_end = state.gun_tip(&self.config);
        state
    }

    /// Advance one character by one tick.
    pub fn tick(
        &self,
        state: &mut CharacterState,
        input: &InputSnapshot,
        camera: &mut CameraFrame,
        world: &impl SurfaceQueries,
        delta_time: f32,
    ) -> TickOutput {
        self.tick_observed(state, input, camera, world, delta_time, &mut |_| {})
    }

    /// Like [`tick`](Self::tick), reporting each phase as it starts.
    pub fn tick_observed(
        &self,
        state: &mut CharacterState,
        input: &InputSnapshot,
        camera: &mut CameraFrame,
        world: &impl SurfaceQueries,
        delta_time: f32,
        observer: &mut impl FnMut(TickPhase),
    ) -> TickOutput {
        if delta_time <= 0.0 || !delta_time.is_finite() {
            return self.output(state);
        }
        let dt = delta_time.min(MAX_DELTA_TIME);

        let mut plan = MovePlan::Locomotion {
            displacement: Vec3::ZERO,
        };
        for phase in TickPhase::ORDER {
            observer(phase);
            match phase {
                TickPhase::Classify => self.classify_phase(state, input, world),
                TickPhase::Integrate => plan = self.integrate_phase(state, input, camera, world, dt),
                TickPhase::Move => self.move_phase(state, input, camera, world, plan, dt),
                TickPhase::Reconcile => self.reconcile_phase(state, input, camera, dt),
            }
        }

        self.output(state)
    }

    // ========================================================================
    // Classify
    // ========================================================================

    fn classify_phase(&self, state: &mut CharacterState, input: &InputSnapshot, world: &impl SurfaceQueries) {
        let previous = state.locomotion;
        let grounded = is_grounded(world, &state.body, previous, self.config.ground_mask);
        let phase = phase_of(state.grapple.as_ref());

        let next = classify(&ClassifyInput {
            has_movement_input: input.has_movement(),
            moving_laterally: state.body.lateral_velocity().length() > self.config.moving_threshold,
            can_run: input.can_run(),
            walk_toggle_on: input.walk_toggle_on,
            attached_direct: phase == GrapplePhase::AttachedDirect,
            attached_swing: phase == GrapplePhase::AttachedSwing,
            grounded,
            jumped_last_frame: state.jumped_last_frame,
            vertical_speed: state.body.velocity.y,
            run_speed: state.run_speed,
            sprint_speed: self.config.sprint_speed,
        });

        if next.is_airborne() {
            state.jumped_last_frame = false;
            state.body.capsule.step_offset = 0.0;
        } else if next.is_grounded() {
            state.body.capsule.step_offset = self.config.capsule.step_offset;
        }

        if next != previous {
            log::debug!("locomotion: {:?} -> {:?}", previous, next);
        }

        state.previous_locomotion = previous;
        state.locomotion = next;
        state.ground_contact = grounded;
    }

    // ========================================================================
    // Integrate
    // ========================================================================

    fn integrate_phase(
        &self,
        state: &mut CharacterState,
        input: &InputSnapshot,
        camera: &CameraFrame,
        world: &impl SurfaceQueries,
        dt: f32,
    ) -> MovePlan {
        match state.grapple {
            Some(GrappleSession::AttachedDirect { target, .. }) => {
                let pull = Pull::toward(&self.config, state.body.position, target);
                MovePlan::Pull {
                    pull,
                    displacement: pull.displacement(&self.config, dt),
                }
            }
            Some(GrappleSession::AttachedSwing {
                target,
                rope_length,
                velocity,
            }) => {
                let push = movement_direction(camera, input.movement);
                let step = swing_step(
                    &self.config,
                    target,
                    rope_length,
                    state.body.position,
                    velocity,
                    push,
                    dt,
                );
                MovePlan::Swing {
                    displacement: step.displacement,
                }
            }
            _ => MovePlan::Locomotion {
                displacement: self.locomotion_velocity(state, input, camera, world, dt) * dt,
            },
        }
    }

    fn locomotion_velocity(
        &self,
        state: &mut CharacterState,
        input: &InputSnapshot,
        camera: &CameraFrame,
        world: &impl SurfaceQueries,
        dt: f32,
    ) -> Vec3 {
        let config = &self.config;

        let vertical = integrate_vertical(
            config,
            state.vertical_velocity,
            state.locomotion,
            state.previous_locomotion,
            input.jump_pressed,
            dt,
        );
        state.vertical_velocity = vertical.velocity;
        if vertical.jumped {
            log::debug!("jump, vy={:.2}", vertical.velocity);
            state.jumped_last_frame = true;
        }

        state.run_speed = ramp_run_speed(config, state.run_speed, state.locomotion, dt);

        let direction = movement_direction(camera, input.movement);
        let lateral = integrate_lateral(
            config,
            state.body.lateral_velocity(),
            direction,
            state.locomotion,
            state.run_speed,
            dt,
        );

        let mut velocity = lateral + Vec3::Y * state.vertical_velocity;
        if !state.locomotion.is_grounded() {
            let normal = surface_normal(world, &state.body, config.ground_mask);
            velocity = project_on_steep_surface(
                velocity,
                normal,
                state.body.capsule.is_walkable(normal),
                state.vertical_velocity,
            );
        }

        velocity + state.momentum.velocity
    }

    // ========================================================================
    // Move
    // ========================================================================

    fn move_phase(
        &self,
        state: &mut CharacterState,
        input: &InputSnapshot,
        camera: &CameraFrame,
        world: &impl SurfaceQueries,
        plan: MovePlan,
        dt: f32,
    ) {
        let config = &self.config;
        let start = state.body.position;
        let moved = world.move_capsule(&state.body.capsule, start, plan.displacement(), config.solid_mask);

        state.body.position = moved.position;
        state.body.velocity = (moved.position - start) / dt;
        state.body.collided_below = moved.collided_below;

        match plan {
            MovePlan::Locomotion { .. } => {
                if moved.collided_above && state.vertical_velocity > 0.0 {
                    state.vertical_velocity = 0.0;
                }
                state
                    .momentum
                    .decay(config.momentum_damping, config.momentum_threshold, dt);
                state.grapple = update_unattached(
                    config,
                    state.grapple.take(),
                    input,
                    camera,
                    world,
                    state.body.position,
                    state.body.velocity,
                    dt,
                );
            }
            MovePlan::Pull { pull, .. } => {
                if let Some(trigger) = self.release_check(state, input, world) {
                    self.release(state, trigger, direct_release_momentum(config, trigger, &pull));
                }
            }
            MovePlan::Swing { .. } => {
                let velocity = state.body.velocity;
                if let Some(GrappleSession::AttachedSwing { velocity: swing, .. }) = state.grapple.as_mut() {
                    *swing = velocity;
                }
                if let Some(trigger) = self.release_check(state, input, world) {
                    self.release(state, trigger, swing_release_momentum(config, trigger, velocity));
                }
            }
        }
    }

    fn release_check(
        &self,
        state: &CharacterState,
        input: &InputSnapshot,
        world: &impl SurfaceQueries,
    ) -> Option<ReleaseTrigger> {
        let target = state.grapple.as_ref().and_then(GrappleSession::target)?;
        let standing = grounded_while_grounded(world, &state.body, self.config.ground_mask);
        release_trigger(&self.config, state.body.position.distance(target), input, standing)
    }

    fn release(&self, state: &mut CharacterState, trigger: ReleaseTrigger, momentum: Vec3) {
        log::debug!("grapple: released by {:?}, momentum {:?}", trigger, momentum);
        state.grapple = None;
        state.momentum.inject(momentum);
        state.vertical_velocity = 0.0;
        state.locomotion = LocomotionState::Falling;
    }

    // ========================================================================
    // Reconcile
    // ========================================================================

    fn reconcile_phase(&self, state: &mut CharacterState, input: &InputSnapshot, camera: &mut CameraFrame, dt: f32) {
        let config = &self.config;
        apply_look(config, camera, &mut state.target_yaw, input);

        let rotate = match state.locomotion {
            LocomotionState::Grappling => {
                state.rotation.cancel();
                state
                    .grapple
                    .as_ref()
                    .and_then(GrappleSession::target)
                    .is_some_and(|target| state.body.position.distance(target) < config.grapple_face_distance)
            }
            LocomotionState::Idling => state.rotation.update_idle(config, state.rotation_mismatch, dt),
            _ => {
                state.rotation.cancel();
                true
            }
        };
        if rotate {
            state.body.rotation = rotate_toward(config, state.body.rotation, state.target_yaw, dt);
        }

        camera.follow(state.body.position);
        state.rotation_mismatch = rotation_mismatch(state.body.forward(), camera.forward_xz());

        let rope_target = state.grapple.as_ref().and_then(GrappleSession::target);
        state.rope_end = match rope_target {
            Some(target) => ease_rope_end(state.rope_end, target, config, dt),
            None => state.gun_tip(config),
        };
    }

    fn output(&self, state: &CharacterState) -> TickOutput {
        TickOutput {
            state: state.locomotion,
            grounded: state.locomotion.is_grounded(),
            rotation_mismatch: state.rotation_mismatch,
            is_rotating_to_target: state.rotation.active,
            grapple_phase: phase_of(state.grapple.as_ref()),
            rope: state.grapple.is_some().then(|| RopeSegment {
                start: state.gun_tip(&self.config),
                end: state.rope_end,
            }),
            position: state.body.position,
            velocity: state.body.velocity,
        }
    }
}

// ============================================================================
// Tests
// ============================================================================
