//! Fixed-step simulation driving one character.
//!
//! The simulation owns everything a tick touches: the input provider, the
//! mapper, the controller, the character and camera state, and the level.
//! Each tick polls input, runs the controller once, then derives animation
//! parameters from what the controller reported.

use glam::{Quat, Vec3};
use serde::{Deserialize, Serialize};
use tether_physics::{
    CameraFrame, CharacterController, CharacterState, ConfigError, GrapplePhase, InputSnapshot,
    LocomotionState, MovementConfig, TickOutput,
};

use crate::animation::{AnimationConfig, AnimationDriver, AnimationFrame};
use crate::camera::{CameraConfig, ThirdPersonRig};
use crate::input::{InputConfig, InputMapper, InputProvider};
use crate::level::{Level, SpawnPoint};

/// Simulation configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationConfig {
    /// Simulation tick rate (ticks per second).
    pub tick_rate: u32,

    /// Movement tunables.
    pub movement: MovementConfig,

    /// Hold-versus-toggle button behavior.
    pub input: InputConfig,

    /// Camera boom settings.
    pub camera: CameraConfig,

    /// Animation blend settings.
    pub animation: AnimationConfig,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            tick_rate: 60,
            movement: MovementConfig::default(),
            input: InputConfig::default(),
            camera: CameraConfig::default(),
            animation: AnimationConfig::default(),
        }
    }
}

impl SimulationConfig {
    /// Get the time step per tick in seconds.
    pub fn delta_time(&self) -> f32 {
        1.0 / self.tick_rate.max(1) as f32
    }
}

/// Everything one tick produced.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TickReport {
    /// Frame the tick ran on.
    pub frame: u64,
    /// Input the controller saw.
    pub input: InputSnapshot,
    pub output: TickOutput,
    pub animation: AnimationFrame,
}

/// The simulation loop for a single controlled character.
pub struct Simulation<P: InputProvider> {
    /// Current frame/tick number.
    pub frame: u64,

    /// Simulation configuration.
    pub config: SimulationConfig,

    /// Current level.
    pub level: Level,

    /// The controlled character.
    pub character: CharacterState,

    /// Camera orbiting the character.
    pub camera: CameraFrame,

    controller: CharacterController,
    rig: ThirdPersonRig,
    mapper: InputMapper,
    animation: AnimationDriver,
    provider: P,
}

impl<P: InputProvider> Simulation<P> {
    /// Create a simulation with the character at the level's first spawn.
    pub fn new(config: SimulationConfig, level: Level, provider: P) -> Result<Self, ConfigError> {
        let controller = CharacterController::new(config.movement.clone())?;
        let rig = ThirdPersonRig::new(config.camera.clone());

        let spawn = level.get_player_spawn(0);
        let position = spawn.map_or(Vec3::ZERO, |s| s.position);
        let facing = spawn.map_or(0.0, |s| s.facing);

        let mut character = controller.spawn(position);
        character.body.rotation = spawn.map_or(Quat::IDENTITY, SpawnPoint::rotation);
        character.target_yaw = facing;
        character.rope_end = character.gun_tip(&controller.config);

        let mut camera = rig.frame();
        camera.yaw = facing;
        camera.follow(position);

        log::info!("simulation: level '{}', spawn at {:?}", level.name, position);

        Ok(Self {
            frame: 0,
            mapper: InputMapper::new(config.input.clone()),
            animation: AnimationDriver::new(config.animation.clone()),
            config,
            level,
            character,
            camera,
            controller,
            rig,
            provider,
        })
    }

    /// Advance the simulation by one tick.
    pub fn tick(&mut self) -> TickReport {
        let delta_time = self.config.delta_time();
        let previous_state = self.character.locomotion;
        let previous_phase = self.grapple_phase();

        let raw = self.provider.poll(self.frame);
        let input = self.mapper.map(&raw, previous_state);
        self.rig.apply_scroll(&mut self.camera, raw.scroll);

        let output = self.controller.tick(
            &mut self.character,
            &input,
            &mut self.camera,
            &self.level.collision,
            delta_time,
        );
        let animation = self.animation.update(&output, &input, delta_time);

        if output.state != previous_state {
            log::info!("frame {}: {:?} -> {:?}", self.frame, previous_state, output.state);
        }
        if output.grapple_phase != previous_phase {
            log::debug!("frame {}: grapple {:?} -> {:?}", self.frame, previous_phase, output.grapple_phase);
        }

        let report = TickReport {
            frame: self.frame,
            input,
            output,
            animation,
        };
        self.frame += 1;
        report
    }

    /// Run `ticks` ticks and return every report.
    pub fn run(&mut self, ticks: u32) -> Vec<TickReport> {
        (0..ticks).map(|_| self.tick()).collect()
    }

    /// The attack and gather clips have finished.
    pub fn finish_actions(&mut self) {
        self.mapper.clear_attack();
        self.mapper.clear_gather();
    }

    /// Current locomotion state.
    pub fn locomotion(&self) -> LocomotionState {
        self.character.locomotion
    }

    /// Current grapple phase.
    pub fn grapple_phase(&self) -> GrapplePhase {
        self.character
            .grapple
            .as_ref()
            .map_or(GrapplePhase::Idle, |session| session.phase())
    }

    /// The active input provider.
    pub fn provider_mut(&mut self) -> &mut P {
        &mut self.provider
    }
}
