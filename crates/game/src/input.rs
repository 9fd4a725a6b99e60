//! Player input handling.
//!
//! This module turns raw button and axis states into the debounced
//! [`InputSnapshot`] the movement controller consumes. It owns the edge
//! detection and the hold-versus-toggle behavior of the action buttons.

use glam::Vec2;
use serde::{Deserialize, Serialize};
use tether_physics::{InputSnapshot, LocomotionState};

/// Raw player input for a single frame.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PlayerInput {
    /// Movement keys held.
    pub movement: MovementInput,

    /// Look delta this frame.
    pub look: Vec2,

    /// Scroll wheel delta this frame.
    pub scroll: Vec2,

    /// Action buttons held.
    pub actions: ActionInput,
}

/// Movement key states.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MovementInput {
    pub forward: bool,
    pub backward: bool,
    pub left: bool,
    pub right: bool,
}

/// Action button states (held, not edges).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActionInput {
    pub jump: bool,
    pub walk: bool,
    pub grapple: bool,
    pub swing: bool,
    pub attack: bool,
    pub gather: bool,
}

impl PlayerInput {
    /// Movement axis, normalized on diagonals.
    pub fn movement_axis(&self) -> Vec2 {
        let mut axis = Vec2::ZERO;
        if self.movement.forward {
            axis.y += 1.0;
        }
        if self.movement.backward {
            axis.y -= 1.0;
        }
        if self.movement.right {
            axis.x += 1.0;
        }
        if self.movement.left {
            axis.x -= 1.0;
        }

        if axis.length_squared() > 1.0 {
            axis.normalize()
        } else {
            axis
        }
    }
}

/// Hold-versus-toggle settings for the action buttons.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct InputConfig {
    /// Grapple is active only while the button is held.
    pub hold_to_grapple: bool,

    /// Swing is active only while the button is held.
    pub hold_to_swing: bool,
}

impl Default for InputConfig {
    fn default() -> Self {
        Self {
            hold_to_grapple: true,
            hold_to_swing: true,
        }
    }
}

/// Level that follows the button in hold mode and flips on press otherwise.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
struct ToggleButton {
    held_last_frame: bool,
    on: bool,
}

impl ToggleButton {
    fn update(&mut self, held: bool, hold_mode: bool) -> bool {
        let pressed = held && !self.held_last_frame;
        let released = !held && self.held_last_frame;
        self.held_last_frame = held;

        if pressed {
            self.on = hold_mode || !self.on;
        }
        if released {
            self.on = !hold_mode && self.on;
        }
        self.on
    }
}

/// Converts raw input into per-tick snapshots.
///
/// Attack and gather latch on press and stay set until the consumer clears
/// them. Gather is also dropped as soon as the character moves or leaves the
/// ground.
#[derive(Debug, Clone, Default)]
pub struct InputMapper {
    config: InputConfig,
    previous: ActionInput,
    walk_toggle_on: bool,
    grapple: ToggleButton,
    swing: ToggleButton,
    attack_pressed: bool,
    gather_pressed: bool,
}

impl InputMapper {
    pub fn new(config: InputConfig) -> Self {
        Self {
            config,
            ..Default::default()
        }
    }

    /// Build the snapshot for this tick.
    ///
    /// `locomotion` is the state the character ended the previous tick in.
    pub fn map(&mut self, raw: &PlayerInput, locomotion: LocomotionState) -> InputSnapshot {
        let actions = raw.actions;
        let pressed = |now: bool, before: bool| now && !before;

        if pressed(actions.walk, self.previous.walk) {
            self.walk_toggle_on = !self.walk_toggle_on;
        }
        if pressed(actions.attack, self.previous.attack) {
            self.attack_pressed = true;
        }
        if pressed(actions.gather, self.previous.gather) {
            self.gather_pressed = true;
        }

        let movement = raw.movement_axis();
        if movement != Vec2::ZERO || locomotion.is_airborne() {
            self.gather_pressed = false;
        }

        let snapshot = InputSnapshot {
            movement,
            look: raw.look,
            jump_pressed: pressed(actions.jump, self.previous.jump),
            walk_toggle_on: self.walk_toggle_on,
            grapple_toggle_on: self.grapple.update(actions.grapple, self.config.hold_to_grapple),
            swing_toggle_on: self.swing.update(actions.swing, self.config.hold_to_swing),
            attack_pressed: self.attack_pressed,
            gather_pressed: self.gather_pressed,
        };

        self.previous = actions;
        snapshot
    }

    /// The attack action has finished playing.
    pub fn clear_attack(&mut self) {
        self.attack_pressed = false;
    }

    /// The gather action has finished playing.
    pub fn clear_gather(&mut self) {
        self.gather_pressed = false;
    }
}

/// Source of raw input, polled once per tick.
pub trait InputProvider {
    /// Input for the given frame.
    fn poll(&mut self, frame: u64) -> PlayerInput;
}

/// Provider that never presses anything.
#[derive(Debug, Clone, Copy, Default)]
pub struct IdleInput;

impl InputProvider for IdleInput {
    fn poll(&mut self, _frame: u64) -> PlayerInput {
        PlayerInput::default()
    }
}

/// One step of a scripted input sequence.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScriptStep {
    /// How many frames to hold this input.
    pub frames: u32,
    pub input: PlayerInput,
}

/// Plays back a fixed input sequence, then idles.
#[derive(Debug, Clone, Default)]
pub struct ScriptedInput {
    steps: Vec<ScriptStep>,
    step: usize,
    frames_left: u32,
}

impl ScriptedInput {
    pub fn new(steps: Vec<ScriptStep>) -> Self {
        let frames_left = steps.first().map_or(0, |s| s.frames);
        Self {
            steps,
            step: 0,
            frames_left,
        }
    }

    /// Append a step to the end of the script.
    pub fn then(mut self, frames: u32, input: PlayerInput) -> Self {
        if self.steps.is_empty() {
            self.frames_left = frames;
        }
        self.steps.push(ScriptStep { frames, input });
        self
    }

    /// Every step has been played.
    pub fn is_finished(&self) -> bool {
        self.step >= self.steps.len()
    }
}

impl InputProvider for ScriptedInput {
    fn poll(&mut self, _frame: u64) -> PlayerInput {
        while let Some(step) = self.steps.get(self.step) {
            if self.frames_left > 0 {
                self.frames_left -= 1;
                return step.input.clone();
            }
            self.step += 1;
            self.frames_left = self.steps.get(self.step).map_or(0, |s| s.frames);
        }
        PlayerInput::default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn with_actions(actions: ActionInput) -> PlayerInput {
        PlayerInput {
            actions,
            ..Default::default()
        }
    }

    fn grapple(held: bool) -> PlayerInput {
        with_actions(ActionInput {
            grapple: held,
            ..Default::default()
        })
    }

    #[test]
    fn test_diagonal_is_normalized() {
        let mut input = PlayerInput::default();
        input.movement.forward = true;
        input.movement.right = true;

        let axis = input.movement_axis();
        assert!((axis.length() - 1.0).abs() < 1e-5);
        assert!(axis.x > 0.0 && axis.y > 0.0);

        input.movement.right = false;
        assert_eq!(input.movement_axis(), Vec2::new(0.0, 1.0));
    }

    #[test]
    fn test_hold_mode_follows_button() {
        let mut mapper = InputMapper::new(InputConfig::default());
        let idle = LocomotionState::Idling;

        assert!(mapper.map(&grapple(true), idle).grapple_toggle_on);
        assert!(mapper.map(&grapple(true), idle).grapple_toggle_on);
        assert!(!mapper.map(&grapple(false), idle).grapple_toggle_on);
    }

    #[test]
    fn test_toggle_mode_flips_on_press() {
        let mut mapper = InputMapper::new(InputConfig {
            hold_to_grapple: false,
            ..Default::default()
        });
        let idle = LocomotionState::Idling;

        assert!(mapper.map(&grapple(true), idle).grapple_toggle_on);
        assert!(mapper.map(&grapple(false), idle).grapple_toggle_on, "release keeps it on");
        assert!(!mapper.map(&grapple(true), idle).grapple_toggle_on, "second press turns it off");
        assert!(!mapper.map(&grapple(false), idle).grapple_toggle_on);
    }

    #[test]
    fn test_jump_is_an_edge_and_walk_toggles() {
        let mut mapper = InputMapper::default();
        let idle = LocomotionState::Idling;
        let jump_walk = with_actions(ActionInput {
            jump: true,
            walk: true,
            ..Default::default()
        });

        let first = mapper.map(&jump_walk, idle);
        assert!(first.jump_pressed);
        assert!(first.walk_toggle_on);

        let held = mapper.map(&jump_walk, idle);
        assert!(!held.jump_pressed);
        assert!(held.walk_toggle_on);

        mapper.map(&PlayerInput::default(), idle);
        assert!(!mapper.map(&jump_walk, idle).walk_toggle_on);
    }

    #[test]
    fn test_gather_latch() {
        let mut mapper = InputMapper::default();
        let idle = LocomotionState::Idling;
        let gather = with_actions(ActionInput {
            gather: true,
            ..Default::default()
        });

        assert!(mapper.map(&gather, idle).gather_pressed);
        assert!(mapper.map(&PlayerInput::default(), idle).gather_pressed, "latched");

        // Moving cancels it
        let mut moving = PlayerInput::default();
        moving.movement.forward = true;
        assert!(!mapper.map(&moving, idle).gather_pressed);

        // Leaving the ground cancels it
        mapper.map(&gather, idle);
        assert!(!mapper.map(&PlayerInput::default(), LocomotionState::Falling).gather_pressed);

        // So does the consumer
        mapper.map(&PlayerInput::default(), idle);
        mapper.map(&gather, idle);
        mapper.clear_gather();
        assert!(!mapper.map(&PlayerInput::default(), idle).gather_pressed);
    }

    #[test]
    fn test_attack_latched_until_cleared() {
        let mut mapper = InputMapper::default();
        let idle = LocomotionState::Idling;
        let attack = with_actions(ActionInput {
            attack: true,
            ..Default::default()
        });

        mapper.map(&attack, idle);
        let mut moving = PlayerInput::default();
        moving.movement.left = true;
        assert!(mapper.map(&moving, LocomotionState::Running).attack_pressed);

        mapper.clear_attack();
        assert!(!mapper.map(&moving, LocomotionState::Running).attack_pressed);
    }

    #[test]
    fn test_scripted_input_plays_in_order() {
        let mut forward = PlayerInput::default();
        forward.movement.forward = true;

        let mut script = ScriptedInput::default()
            .then(2, forward.clone())
            .then(1, grapple(true));

        assert_eq!(script.poll(0), forward);
        assert_eq!(script.poll(1), forward);
        assert_eq!(script.poll(2), grapple(true));
        assert!(!script.is_finished());
        assert_eq!(script.poll(3), PlayerInput::default());
        assert!(script.is_finished());
    }
}
