//! Animation parameters derived from the movement output.

use glam::Vec3;
use serde::{Deserialize, Serialize};
use tether_physics::{InputSnapshot, LocomotionState, TickOutput};

/// Boolean animation parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AnimFlag {
    Grounded,
    Idling,
    Jumping,
    Falling,
    RotatingToTarget,
    Attacking,
    Gathering,
    PlayingAction,
}

impl AnimFlag {
    pub const ALL: [Self; 8] = [
        Self::Grounded,
        Self::Idling,
        Self::Jumping,
        Self::Falling,
        Self::RotatingToTarget,
        Self::Attacking,
        Self::Gathering,
        Self::PlayingAction,
    ];

    #[inline]
    fn index(self) -> usize {
        self as usize
    }
}

/// Float animation parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AnimFloat {
    InputX,
    InputY,
    InputMagnitude,
    RotationMismatch,
}

impl AnimFloat {
    pub const ALL: [Self; 4] = [Self::InputX, Self::InputY, Self::InputMagnitude, Self::RotationMismatch];

    #[inline]
    fn index(self) -> usize {
        self as usize
    }
}

/// Actions that lock the character into a full-body clip.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ActionKind {
    Gather,
}

impl ActionKind {
    pub const ALL: [Self; 1] = [Self::Gather];

    /// Flag that shows the action is playing.
    pub fn flag(self) -> AnimFlag {
        match self {
            Self::Gather => AnimFlag::Gathering,
        }
    }
}

/// Blend settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AnimationConfig {
    /// How fast the blend input chases its target (per second).
    pub blend_speed: f32,
    pub sprint_max_blend: f32,
    pub run_max_blend: f32,
    pub walk_max_blend: f32,
}

impl Default for AnimationConfig {
    fn default() -> Self {
        Self {
            blend_speed: 4.0,
            sprint_max_blend: 1.5,
            run_max_blend: 1.0,
            walk_max_blend: 0.5,
        }
    }
}

impl AnimationConfig {
    /// Scale applied to the movement input in `state`.
    pub fn blend_scale(&self, state: LocomotionState) -> f32 {
        match state {
            LocomotionState::Sprinting => self.sprint_max_blend,
            LocomotionState::Running | LocomotionState::Jumping | LocomotionState::Falling => {
                self.run_max_blend
            }
            _ => self.walk_max_blend,
        }
    }
}

/// Parameter values for one tick.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct AnimationFrame {
    flags: [bool; 8],
    floats: [f32; 4],
}

impl AnimationFrame {
    #[inline]
    pub fn flag(&self, flag: AnimFlag) -> bool {
        self.flags[flag.index()]
    }

    #[inline]
    pub fn float(&self, float: AnimFloat) -> f32 {
        self.floats[float.index()]
    }

    pub fn set_flag(&mut self, flag: AnimFlag, value: bool) {
        self.flags[flag.index()] = value;
    }

    pub fn set_float(&mut self, float: AnimFloat, value: f32) {
        self.floats[float.index()] = value;
    }

    /// Every flag with its value.
    pub fn flags(&self) -> impl Iterator<Item = (AnimFlag, bool)> + '_ {
        AnimFlag::ALL.into_iter().map(|flag| (flag, self.flag(flag)))
    }

    /// Every float with its value.
    pub fn floats(&self) -> impl Iterator<Item = (AnimFloat, f32)> + '_ {
        AnimFloat::ALL.into_iter().map(|float| (float, self.float(float)))
    }
}

/// Smooths movement input and builds animation frames.
#[derive(Debug, Clone, Default)]
pub struct AnimationDriver {
    pub config: AnimationConfig,
    blend: Vec3,
}

impl AnimationDriver {
    pub fn new(config: AnimationConfig) -> Self {
        Self {
            config,
            blend: Vec3::ZERO,
        }
    }

    /// Build this tick's parameters.
    pub fn update(&mut self, output: &TickOutput, input: &InputSnapshot, dt: f32) -> AnimationFrame {
        let target = (input.movement * self.config.blend_scale(output.state)).extend(0.0);
        let t = (self.config.blend_speed * dt).clamp(0.0, 1.0);
        self.blend = self.blend.lerp(target, t);

        let mut frame = AnimationFrame::default();
        frame.set_flag(AnimFlag::Grounded, output.grounded);
        frame.set_flag(AnimFlag::Idling, output.state == LocomotionState::Idling);
        frame.set_flag(AnimFlag::Jumping, output.state == LocomotionState::Jumping);
        frame.set_flag(AnimFlag::Falling, output.state == LocomotionState::Falling);
        frame.set_flag(AnimFlag::RotatingToTarget, output.is_rotating_to_target);
        frame.set_flag(AnimFlag::Attacking, input.attack_pressed);
        frame.set_flag(AnimFlag::Gathering, input.gather_pressed);

        let playing_action = ActionKind::ALL.iter().any(|action| frame.flag(action.flag()));
        frame.set_flag(AnimFlag::PlayingAction, playing_action);

        frame.set_float(AnimFloat::InputX, self.blend.x);
        frame.set_float(AnimFloat::InputY, self.blend.y);
        frame.set_float(AnimFloat::InputMagnitude, self.blend.length());
        frame.set_float(AnimFloat::RotationMismatch, output.rotation_mismatch);
        frame
    }
}
