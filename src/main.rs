//! Tether - headless demo driver
//!
//! Runs a scripted play session through the movement controller and logs
//! what the character does. Tunables come from an optional TOML file.
//!
//! ```text
//! tether [CONFIG.toml]
//! tether --print-config
//! ```

use std::collections::HashMap;
use std::path::Path;

use anyhow::{Context, Result};
use glam::Vec2;
use serde::{Deserialize, Serialize};
use tether_game::input::ActionInput;
use tether_game::{Level, LevelDesc, PlayerInput, ScriptedInput, Simulation, SimulationConfig};
use tether_physics::LocomotionState;

/// Length of the gather and attack clips.
const ACTION_CLIP_FRAMES: u32 = 20;

/// Contents of a demo config file.
#[derive(Debug, Default, Serialize, Deserialize)]
#[serde(default)]
struct DemoFile {
    simulation: SimulationConfig,
    /// Replaces the built-in arena when present.
    #[serde(skip_serializing_if = "Option::is_none")]
    level: Option<LevelDesc>,
}

fn load_demo_file(path: &Path) -> Result<DemoFile> {
    let text = std::fs::read_to_string(path).with_context(|| format!("read config: {}", path.display()))?;
    let file: DemoFile = toml::from_str(&text).with_context(|| format!("parse config: {}", path.display()))?;
    Ok(file)
}

fn held(movement: impl FnOnce(&mut PlayerInput)) -> PlayerInput {
    let mut input = PlayerInput::default();
    movement(&mut input);
    input
}

/// A short session that walks through every locomotion state.
fn demo_script() -> ScriptedInput {
    let forward = held(|i| i.movement.forward = true);
    let strafe = held(|i| i.movement.right = true);
    let walk_press = held(|i| i.actions.walk = true);
    let jump = held(|i| {
        i.movement.forward = true;
        i.actions.jump = true;
    });
    let grapple = held(|i| i.actions.grapple = true);
    let grapple_swing = held(|i| {
        i.actions = ActionInput {
            grapple: true,
            swing: true,
            ..Default::default()
        }
    });
    let swing = held(|i| {
        i.movement.forward = true;
        i.actions.swing = true;
    });
    let turn_and_look_up = held(|i| i.look = Vec2::new(-900.0, 300.0));
    let gather = held(|i| i.actions.gather = true);
    let zoom_out = held(|i| i.scroll = Vec2::new(0.0, -1.0));

    ScriptedInput::default()
        .then(30, PlayerInput::default())
        .then(5, zoom_out)
        .then(90, forward.clone())
        .then(1, walk_press)
        .then(60, strafe)
        .then(1, held(|i| i.actions.walk = true))
        .then(1, forward.clone())
        .then(1, jump)
        .then(60, forward)
        .then(20, PlayerInput::default())
        .then(2, grapple)
        .then(240, PlayerInput::default())
        .then(1, turn_and_look_up)
        .then(2, grapple_swing)
        .then(180, swing)
        .then(120, PlayerInput::default())
        .then(1, gather)
        .then(30, PlayerInput::default())
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let arg = std::env::args().nth(1);
    if arg.as_deref() == Some("--print-config") {
        let text = toml::to_string_pretty(&DemoFile::default()).context("serialize default config")?;
        println!("{text}");
        return Ok(());
    }

    let demo = match arg {
        Some(path) => load_demo_file(Path::new(&path))?,
        None => DemoFile::default(),
    };
    demo.simulation
        .movement
        .validate()
        .context("invalid movement config")?;

    let level = match &demo.level {
        Some(desc) => Level::from_desc(desc),
        None => Level::test_arena(),
    };

    log::info!("Starting tether demo ({} Hz)", demo.simulation.tick_rate);

    let mut sim = Simulation::new(demo.simulation, level, demo_script())?;
    let mut frames_in_state: HashMap<LocomotionState, u32> = HashMap::new();
    let mut action_frames = 0;

    while !sim.provider_mut().is_finished() {
        let report = sim.tick();
        *frames_in_state.entry(report.output.state).or_default() += 1;

        // Stand-in for the clip end event
        if report.input.gather_pressed || report.input.attack_pressed {
            action_frames += 1;
            if action_frames >= ACTION_CLIP_FRAMES {
                sim.finish_actions();
                action_frames = 0;
            }
        }
        if report.frame % 60 == 0 {
            log::debug!(
                "frame {}: {:?} at {:.2?}, speed {:.2}",
                report.frame,
                report.output.state,
                report.output.position,
                report.output.velocity.length()
            );
        }
    }

    for state in LocomotionState::ALL {
        let frames = frames_in_state.get(&state).copied().unwrap_or(0);
        log::info!("{:?}: {} frames", state, frames);
    }
    log::info!(
        "Finished after {} frames at {:.2?}",
        sim.frame,
        sim.character.body.position
    );

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bundled_config_parses() {
        let file: DemoFile = toml::from_str(include_str!("../config/tether.toml")).expect("parse");
        assert_eq!(file.simulation.tick_rate, 60);
        assert_eq!(file.simulation.movement.sprint_speed, 12.0);
        assert!(file.level.is_none());
        file.simulation.movement.validate().expect("valid");
    }

    #[test]
    fn test_level_override() {
        let text = r#"
            [level]
            id = "flat"
            name = "Flat"

            [[level.brushes]]
            center = [0.0, -0.5, 0.0]
            half_extents = [20.0, 0.5, 20.0]

            [[level.spawn_points]]
            position = [0.0, 0.0, 0.0]
        "#;
        let file: DemoFile = toml::from_str(text).expect("parse");
        let level = Level::from_desc(file.level.as_ref().expect("level"));
        assert_eq!(level.collision.brush_count(), 1);
        assert_eq!(level.player_spawn_count(), 1);
    }

    #[test]
    fn test_demo_script_finishes() {
        let mut sim = Simulation::new(SimulationConfig::default(), Level::test_arena(), demo_script())
            .expect("valid config");
        let mut ticks = 0;
        while !sim.provider_mut().is_finished() {
            sim.tick();
            ticks += 1;
        }
        assert!(ticks > 800);
        assert!(sim.character.body.position.is_finite());
    }
}
