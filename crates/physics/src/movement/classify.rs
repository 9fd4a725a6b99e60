//! Locomotion state selection.
//!
//! Rules are checked in priority order and the first match wins. Every
//! combination of inputs lands in exactly one state.

use super::state::LocomotionState;

/// Facts the classifier decides on, gathered at the start of a tick.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct ClassifyInput {
    /// Movement input is non-zero.
    pub has_movement_input: bool,
    /// Lateral speed of the last move exceeded the moving threshold.
    pub moving_laterally: bool,
    /// Forward input dominates strafe.
    pub can_run: bool,
    pub walk_toggle_on: bool,
    pub attached_direct: bool,
    pub attached_swing: bool,
    pub grounded: bool,
    pub jumped_last_frame: bool,
    /// Vertical speed of the last move.
    pub vertical_speed: f32,
    /// Live (ramped) run speed.
    pub run_speed: f32,
    pub sprint_speed: f32,
}

/// Pick the locomotion state for this tick.
pub fn classify(input: &ClassifyInput) -> LocomotionState {
    if input.attached_direct {
        return LocomotionState::Grappling;
    }
    if input.attached_swing {
        return LocomotionState::Swinging;
    }

    let leaving_ground = !input.grounded || input.jumped_last_frame;
    if leaving_ground {
        return if input.vertical_speed > 0.0 {
            LocomotionState::Jumping
        } else {
            LocomotionState::Falling
        };
    }

    lateral_state(input)
}

/// Grounded sub-state from lateral movement alone.
fn lateral_state(input: &ClassifyInput) -> LocomotionState {
    if input.moving_laterally && (!input.can_run || input.walk_toggle_on) {
        LocomotionState::Walking
    } else if input.moving_laterally && input.run_speed >= input.sprint_speed {
        LocomotionState::Sprinting
    } else if input.moving_laterally || input.has_movement_input {
        LocomotionState::Running
    } else {
        LocomotionState::Idling
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn grounded() -> ClassifyInput {
        ClassifyInput {
            grounded: true,
            can_run: true,
            run_speed: 8.0,
            sprint_speed: 12.0,
            ..Default::default()
        }
    }

    #[test]
    fn test_idle_on_ground() {
        assert_eq!(classify(&grounded()), LocomotionState::Idling);
    }

    #[test]
    fn test_running_from_input_alone() {
        let input = ClassifyInput {
            has_movement_input: true,
            ..grounded()
        };
        assert_eq!(classify(&input), LocomotionState::Running);
    }

    #[test]
    fn test_walk_toggle_and_strafe_walk() {
        let toggled = ClassifyInput {
            moving_laterally: true,
            walk_toggle_on: true,
            ..grounded()
        };
        assert_eq!(classify(&toggled), LocomotionState::Walking);

        let strafing = ClassifyInput {
            moving_laterally: true,
            can_run: false,
            ..grounded()
        };
        assert_eq!(classify(&strafing), LocomotionState::Walking);
    }

    #[test]
    fn test_sprint_once_ramp_saturates() {
        let input = ClassifyInput {
            moving_laterally: true,
            run_speed: 12.0,
            ..grounded()
        };
        assert_eq!(classify(&input), LocomotionState::Sprinting);
    }

    #[test]
    fn test_airborne_split_on_vertical_speed() {
        let rising = ClassifyInput {
            grounded: false,
            vertical_speed: 3.0,
            ..grounded()
        };
        assert_eq!(classify(&rising), LocomotionState::Jumping);

        let level = ClassifyInput {
            grounded: false,
            vertical_speed: 0.0,
            ..grounded()
        };
        assert_eq!(classify(&level), LocomotionState::Falling);

        // Jump impulse applied last tick still reads as airborne
        let launched = ClassifyInput {
            jumped_last_frame: true,
            vertical_speed: 8.0,
            ..grounded()
        };
        assert_eq!(classify(&launched), LocomotionState::Jumping);
    }

    #[test]
    fn test_attached_overrides_everything() {
        let input = ClassifyInput {
            attached_direct: true,
            attached_swing: true,
            grounded: false,
            vertical_speed: -20.0,
            moving_laterally: true,
            ..grounded()
        };
        assert_eq!(classify(&input), LocomotionState::Grappling);

        let swing = ClassifyInput {
            attached_swing: true,
            ..grounded()
        };
        assert_eq!(classify(&swing), LocomotionState::Swinging);
    }

    #[test]
    fn test_landing_cancels_air_states() {
        let landed = ClassifyInput {
            grounded: true,
            vertical_speed: -12.0,
            ..grounded()
        };
        assert!(classify(&landed).is_grounded());
    }

    #[test]
    fn test_every_combination_is_classified() {
        for bits in 0u32..(1 << 8) {
            let flag = |i: u32| bits & (1 << i) != 0;
            for vertical_speed in [-5.0, 0.0, 5.0] {
                for run_speed in [8.0, 12.0] {
                    let input = ClassifyInput {
                        has_movement_input: flag(0),
                        moving_laterally: flag(1),
                        can_run: flag(2),
                        walk_toggle_on: flag(3),
                        attached_direct: flag(4),
                        attached_swing: flag(5),
                        grounded: flag(6),
                        jumped_last_frame: flag(7),
                        vertical_speed,
                        run_speed,
                        sprint_speed: 12.0,
                    };
                    let state = classify(&input);
                    assert!(LocomotionState::ALL.contains(&state));

                    if !input.attached_direct && !input.attached_swing {
                        let airborne = !input.grounded || input.jumped_last_frame;
                        assert_eq!(state.is_airborne(), airborne, "{input:?}");
                    }
                }
            }
        }
    }
}
